//! FormRequest trait for validated request data
//!
//! Static forms (a fixed set of fields) are plain structs deriving
//! `Deserialize` and `Validate`. Field-level rules live in `validator`
//! attributes; checks that need more than the submitted value go in
//! [`FormRequest::clean`].

use super::Request;
use crate::error::{FrameworkError, ValidationErrors};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Trait for validated form/JSON request data
///
/// # Example
///
/// ```rust,ignore
/// use kit::FormRequest;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// pub struct TagForm {
///     #[validate(length(min = 1, max = 128))]
///     pub label: String,
/// }
///
/// impl FormRequest for TagForm {}
///
/// pub async fn store(req: Request) -> Response {
///     let form = TagForm::extract(&req)?;  // 422 when invalid
///     // ...
/// }
/// ```
pub trait FormRequest: Sized + DeserializeOwned + Validate + Send {
    /// Check if the request is authorized
    ///
    /// Returning `false` will result in a 403 Forbidden response.
    fn authorize(_req: &Request) -> bool {
        true
    }

    /// Cross-field checks run after the `validator` rules pass
    fn clean(&mut self) -> Result<(), ValidationErrors> {
        Ok(())
    }

    /// Extract and validate data from the request
    ///
    /// 1. Checks authorization
    /// 2. Parses the request body (JSON or form based on Content-Type)
    /// 3. Validates the parsed data, then runs [`FormRequest::clean`]
    fn extract(req: &Request) -> Result<Self, FrameworkError> {
        if !Self::authorize(req) {
            return Err(FrameworkError::Unauthorized);
        }

        let mut data: Self = req.input()?;

        if let Err(errors) = data.validate() {
            return Err(FrameworkError::Validation(
                ValidationErrors::from_validator(errors),
            ));
        }

        data.clean().map_err(FrameworkError::Validation)?;
        Ok(data)
    }
}
