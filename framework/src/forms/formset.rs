//! Formsets: several instances of one form submitted together
//!
//! Each form's fields are prefixed `{prefix}-{index}-`; the management
//! form (`{prefix}-TOTAL_FORMS` and friends) tells how many forms were sent.

use serde_json::{json, Value};

use super::FormData;
use crate::error::ValidationErrors;

pub const DEFAULT_PREFIX: &str = "form";
pub const TOTAL_FORMS: &str = "TOTAL_FORMS";
pub const INITIAL_FORMS: &str = "INITIAL_FORMS";
pub const MIN_NUM_FORMS: &str = "MIN_NUM_FORMS";
pub const MAX_NUM_FORMS: &str = "MAX_NUM_FORMS";

const DEFAULT_MAX_NUM: usize = 1000;
const TAMPERED_MESSAGE: &str = "ManagementForm data is missing or has been tampered with.";

/// Prefix of the form at `index`, e.g. `form-0`
pub fn form_prefix(prefix: &str, index: usize) -> String {
    format!("{}-{}", prefix, index)
}

/// Bookkeeping fields submitted with every formset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagementForm {
    pub total_forms: usize,
    pub initial_forms: usize,
    pub min_num_forms: usize,
    pub max_num_forms: usize,
}

impl ManagementForm {
    /// Management form for a formset showing `count` initial forms and no extras
    pub fn for_initial(count: usize) -> Self {
        Self {
            total_forms: count,
            initial_forms: count,
            min_num_forms: 0,
            max_num_forms: DEFAULT_MAX_NUM,
        }
    }

    /// Read the management form from submitted data
    pub fn parse(prefix: &str, data: &FormData) -> Result<Self, ValidationErrors> {
        let read = |name: &str| -> Option<usize> {
            data.get(&format!("{}-{}", prefix, name))
                .and_then(|v| v.trim().parse().ok())
        };

        match (read(TOTAL_FORMS), read(INITIAL_FORMS)) {
            (Some(total_forms), Some(initial_forms)) => {
                let form = Self {
                    total_forms,
                    initial_forms,
                    min_num_forms: read(MIN_NUM_FORMS).unwrap_or(0),
                    max_num_forms: read(MAX_NUM_FORMS).unwrap_or(DEFAULT_MAX_NUM),
                };
                if form.total_forms > form.max_num_forms.max(DEFAULT_MAX_NUM) {
                    return Err(ValidationErrors::single(
                        ValidationErrors::NON_FIELD,
                        format!("Please submit at most {} forms.", form.max_num_forms),
                    ));
                }
                Ok(form)
            }
            _ => Err(ValidationErrors::single(
                ValidationErrors::NON_FIELD,
                TAMPERED_MESSAGE,
            )),
        }
    }

    /// Require the submission to describe exactly `expected` forms
    pub fn expect_total(&self, expected: usize) -> Result<(), ValidationErrors> {
        if self.total_forms == expected {
            Ok(())
        } else {
            Err(ValidationErrors::single(
                ValidationErrors::NON_FIELD,
                TAMPERED_MESSAGE,
            ))
        }
    }

    pub fn to_data(&self, prefix: &str) -> FormData {
        FormData::from_pairs([
            (format!("{}-{}", prefix, TOTAL_FORMS), self.total_forms.to_string()),
            (format!("{}-{}", prefix, INITIAL_FORMS), self.initial_forms.to_string()),
            (format!("{}-{}", prefix, MIN_NUM_FORMS), self.min_num_forms.to_string()),
            (format!("{}-{}", prefix, MAX_NUM_FORMS), self.max_num_forms.to_string()),
        ])
    }

    pub fn to_json(&self, prefix: &str) -> Value {
        json!({
            "prefix": prefix,
            "total_forms": self.total_forms,
            "initial_forms": self.initial_forms,
            "min_num_forms": self.min_num_forms,
            "max_num_forms": self.max_num_forms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn management_form_round_trips_through_data() {
        let form = ManagementForm::for_initial(3);
        let data = form.to_data(DEFAULT_PREFIX);
        assert_eq!(data.get("form-TOTAL_FORMS"), Some("3"));
        assert_eq!(ManagementForm::parse(DEFAULT_PREFIX, &data), Ok(form));
    }

    #[test]
    fn missing_management_data_is_tampering() {
        let errors = ManagementForm::parse(DEFAULT_PREFIX, &FormData::new()).unwrap_err();
        assert!(errors.has(ValidationErrors::NON_FIELD));
    }

    #[test]
    fn total_mismatch_is_rejected() {
        let form = ManagementForm::for_initial(2);
        assert!(form.expect_total(2).is_ok());
        assert!(form.expect_total(3).is_err());
        assert_eq!(form_prefix(DEFAULT_PREFIX, 4), "form-4");
    }
}
