//! Session login and logout

use kit::{FormRequest, HttpResponse, Redirect, Request, Response, ValidationErrors, View};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use super::{form_invalid, validated};
use crate::auth;
use crate::config::AuthConfig;
use crate::middleware::LOGIN_ROUTE;

pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

const COMPONENT: &str = "Authentication/Login";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    pub next: Option<String>,
}

impl FormRequest for LoginForm {
    fn clean(&mut self) -> Result<(), ValidationErrors> {
        self.username = self.username.trim().to_string();
        Ok(())
    }
}

/// Only same-site paths are followed after login
fn safe_next(next: Option<&str>) -> Option<String> {
    next.filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .map(str::to_string)
}

fn props(next: Option<&str>) -> Value {
    json!({
        "title": "Log in",
        "next": next,
    })
}

pub async fn login_form(req: Request) -> Response {
    let query = req.query_data();
    View::render(&req, COMPONENT, props(query.get("next")))
}

pub async fn login(req: Request) -> Response {
    let db = kit::db(&req)?;
    let sessions = auth::sessions(&req)?;

    let form = match validated::<LoginForm>(&req)? {
        Ok(form) => form,
        Err(errors) => return form_invalid(&req, COMPONENT, props(None), &errors),
    };
    let next = safe_next(form.next.as_deref())
        .or_else(|| safe_next(req.query_data().get("next")));

    let Some(user) = auth::authenticate(&db, &form.username, &form.password).await? else {
        tracing::info!(username = %form.username, "Failed login attempt");
        let errors = ValidationErrors::single(ValidationErrors::NON_FIELD, INVALID_LOGIN_MESSAGE);
        return form_invalid(&req, COMPONENT, props(next.as_deref()), &errors);
    };

    let cookie = auth::login(&sessions, &user);
    let target = next.unwrap_or_else(|| AuthConfig::current().login_redirect);
    let response: HttpResponse = Redirect::to(target).into();
    Ok(response.header("Set-Cookie", cookie))
}

pub async fn logout(req: Request) -> Response {
    let sessions = auth::sessions(&req)?;
    let cookie = auth::logout(&sessions, &req);
    let login = req.url_for(LOGIN_ROUTE, &[])?;
    let response: HttpResponse = Redirect::to(login).into();
    Ok(response.header("Set-Cookie", cookie))
}
