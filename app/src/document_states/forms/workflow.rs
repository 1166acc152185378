use kit::forms::Field;
use kit::{FormRequest, ValidationErrors};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{not_blank, MAX_LABEL_LENGTH};
use crate::models::workflows;

const INTERNAL_NAME_HELP: &str = "This value will be used by other apps to reference this \
                                  workflow. Can only contain letters, numbers, and underscores.";

/// Create or edit a workflow
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct WorkflowForm {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub label: String,
    #[validate(
        custom(function = "internal_name"),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub internal_name: String,
}

fn internal_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if value
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        let mut error = ValidationError::new("internal_name");
        error.message =
            Some("This value can only contain letters, numbers, and underscores.".into());
        Err(error)
    }
}

impl FormRequest for WorkflowForm {
    fn clean(&mut self) -> Result<(), ValidationErrors> {
        self.label = self.label.trim().to_string();
        self.internal_name = self.internal_name.trim().to_string();
        Ok(())
    }
}

impl WorkflowForm {
    /// Field descriptors, filled from `instance` when editing
    pub fn fields(instance: Option<&workflows::Model>) -> Vec<Field> {
        let mut label = Field::char("label", "Label").max_length(MAX_LABEL_LENGTH);
        let mut internal_name = Field::char("internal_name", "Internal name")
            .max_length(MAX_LABEL_LENGTH)
            .help_text(INTERNAL_NAME_HELP);
        if let Some(workflow) = instance {
            label = label.initial(workflow.label.clone());
            internal_name = internal_name.initial(workflow.internal_name.clone());
        }
        vec![label, internal_name]
    }

    /// Report label or internal name clashes with other workflows
    pub async fn validate_unique(
        &self,
        db: &DatabaseConnection,
        exclude_id: Option<i64>,
    ) -> Result<ValidationErrors, DbErr> {
        let mut errors = ValidationErrors::new();

        let mut by_label =
            workflows::Entity::find().filter(workflows::Column::Label.eq(self.label.as_str()));
        let mut by_name = workflows::Entity::find()
            .filter(workflows::Column::InternalName.eq(self.internal_name.as_str()));
        if let Some(id) = exclude_id {
            by_label = by_label.filter(workflows::Column::Id.ne(id));
            by_name = by_name.filter(workflows::Column::Id.ne(id));
        }

        if by_label.one(db).await?.is_some() {
            errors.add("label", "Workflow with this Label already exists.");
        }
        if by_name.one(db).await?.is_some() {
            errors.add("internal_name", "Workflow with this Internal name already exists.");
        }
        Ok(errors)
    }

    pub fn into_active_model(self) -> workflows::ActiveModel {
        workflows::ActiveModel {
            label: Set(self.label),
            internal_name: Set(self.internal_name),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(label: &str, internal_name: &str) -> WorkflowForm {
        WorkflowForm {
            label: label.to_string(),
            internal_name: internal_name.to_string(),
        }
    }

    #[test]
    fn blank_fields_are_required() {
        let errors = ValidationErrors::from_validator(form(" ", "").validate().unwrap_err());
        assert_eq!(errors.get("label"), Some(&["This field is required.".to_string()][..]));
        assert!(errors.has("internal_name"));
    }

    #[test]
    fn internal_name_rejects_punctuation() {
        let errors = ValidationErrors::from_validator(form("Review", "needs-review").validate().unwrap_err());
        assert_eq!(
            errors.get("internal_name"),
            Some(&["This value can only contain letters, numbers, and underscores.".to_string()][..])
        );
        assert!(form("Review", "needs_review_2").validate().is_ok());
    }

    #[test]
    fn fields_carry_instance_values() {
        let workflow = workflows::Model {
            id: 3,
            label: "Invoices".to_string(),
            internal_name: "invoices".to_string(),
        };
        let fields = WorkflowForm::fields(Some(&workflow));
        assert_eq!(fields[0].initial, Some(serde_json::json!("Invoices")));
        assert_eq!(fields[1].initial, Some(serde_json::json!("invoices")));
    }
}
