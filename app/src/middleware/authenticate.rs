use kit::{async_trait, Middleware, Next, Request, Response, SessionStore};
use sea_orm::EntityTrait;

use crate::auth::{self, CurrentUser};
use crate::models::users;

/// Resolve the session cookie into a [`CurrentUser`]
///
/// Requests without a valid session pass through anonymously.
pub struct Authenticate;

#[async_trait]
impl Middleware for Authenticate {
    async fn handle(&self, mut request: Request, next: Next) -> Response {
        let (Some(sessions), Ok(db)) = (request.extension::<SessionStore>(), kit::db(&request)) else {
            return next(request).await;
        };

        if let Some(user_id) = auth::session_user_id(&sessions, &request) {
            match users::Entity::find_by_id(user_id).one(db.inner()).await {
                Ok(Some(user)) if user.is_active => {
                    request.extensions_mut().insert(CurrentUser(user));
                }
                Ok(_) => tracing::debug!(user_id, "Session user is gone or inactive"),
                Err(e) => tracing::error!(error = %e, user_id, "Failed to load session user"),
            }
        }

        next(request).await
    }
}
