//! Application middleware
//!
//! Each middleware has its own dedicated file following the framework convention.

mod authenticate;
mod require_login;

pub use authenticate::Authenticate;
pub use require_login::{RequireLogin, LOGIN_ROUTE};
