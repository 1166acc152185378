use kit::{async_trait, Middleware, Next, Redirect, Request, Response};

use crate::auth::CurrentUser;

/// Name of the login view anonymous requests are sent to
pub const LOGIN_ROUTE: &str = "authentication:login_view";

/// Redirect anonymous requests to the login view, keeping the target in `next`
pub struct RequireLogin;

#[async_trait]
impl Middleware for RequireLogin {
    async fn handle(&self, request: Request, next: Next) -> Response {
        if request.extensions().get::<CurrentUser>().is_some() {
            return next(request).await;
        }

        let login = request
            .url_for(LOGIN_ROUTE, &[])
            .unwrap_or_else(|_| "/authentication/login/".to_string());
        let target = match request.uri().query() {
            Some(query) => format!("{}?{}", request.path(), query),
            None => request.path().to_string(),
        };
        Redirect::to(login).query("next", target).into()
    }
}
