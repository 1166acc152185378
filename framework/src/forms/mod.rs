//! Form handling
//!
//! Three layers:
//! - [`FormData`]: the raw multi-valued submission;
//! - [`Field`] / [`DynamicForm`]: descriptor-driven fields, used for
//!   rendering every form and for cleaning forms whose fields are only
//!   known at runtime;
//! - [`ManagementForm`]: formset bookkeeping.
//!
//! Forms with a fixed field set use [`FormRequest`](crate::http::FormRequest)
//! structs instead and only borrow [`Field`] for rendering.

mod data;
mod dynamic;
mod field;
pub mod formset;

pub use data::FormData;
pub use dynamic::{CleanedData, DynamicForm};
pub use field::{
    is_falsy, Choice, Cleaned, Field, FieldKind, Record, Widget, INVALID_CHOICE_MESSAGE,
    REQUIRED_MESSAGE,
};
pub use formset::{form_prefix, ManagementForm, DEFAULT_PREFIX};

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum CheckboxValue {
    Flag(bool),
    Text(String),
}

/// Deserialize an HTML checkbox into a bool
///
/// Absent, empty, `off`, `false`, `0` and `no` are unchecked. Use with
/// `#[serde(default, deserialize_with = "kit::forms::deserialize_checkbox")]`.
pub fn deserialize_checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<CheckboxValue> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(CheckboxValue::Flag(flag)) => flag,
        Some(CheckboxValue::Text(text)) => !is_falsy(&text),
        None => false,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Deserialize a text input as submitted, leaving parsing to a [`Field`]
///
/// JSON bodies may send numbers where an HTML form sends text; both end
/// up as the string a user would have typed. Absent is empty.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<TextValue> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(TextValue::Text(text)) => text,
        Some(TextValue::Integer(number)) => number.to_string(),
        Some(TextValue::Float(number)) => number.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct StateForm {
        #[serde(default, deserialize_with = "deserialize_checkbox")]
        initial: bool,
    }

    #[test]
    fn checkbox_accepts_form_and_json_encodings() {
        let form: StateForm = serde_urlencoded::from_str("initial=on").unwrap();
        assert!(form.initial);
        let form: StateForm = serde_urlencoded::from_str("").unwrap();
        assert!(!form.initial);
        let form: StateForm = serde_json::from_str(r#"{"initial": true}"#).unwrap();
        assert!(form.initial);
        let form: StateForm = serde_json::from_str(r#"{"initial": "off"}"#).unwrap();
        assert!(!form.initial);
    }

    #[derive(Deserialize)]
    struct CountForm {
        #[serde(default, deserialize_with = "deserialize_text")]
        count: String,
    }

    #[test]
    fn text_accepts_form_and_json_encodings() {
        let form: CountForm = serde_urlencoded::from_str("count=abc").unwrap();
        assert_eq!(form.count, "abc");
        let form: CountForm = serde_urlencoded::from_str("count=").unwrap();
        assert_eq!(form.count, "");
        let form: CountForm = serde_json::from_str(r#"{"count": 42}"#).unwrap();
        assert_eq!(form.count, "42");
        let form: CountForm = serde_json::from_str("{}").unwrap();
        assert_eq!(form.count, "");
    }
}
