use kit::forms::{deserialize_checkbox, deserialize_text, Field, FormData};
use kit::{FormRequest, ValidationErrors};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{not_blank, MAX_LABEL_LENGTH};
use crate::models::workflow_states;

/// Create or edit a workflow state
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct WorkflowStateForm {
    #[serde(deserialize_with = "deserialize_checkbox")]
    pub initial: bool,
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub label: String,
    /// Completion as typed; blank means the default
    #[serde(rename = "completion", deserialize_with = "deserialize_text")]
    #[validate(custom(function = "valid_completion"))]
    completion_input: String,
    #[serde(skip)]
    completion: i32,
}

fn completion_field() -> Field {
    Field::integer("completion", "Completion")
        .optional()
        .range(Some(0), Some(100))
        .default_value(0)
        .help_text(
            "The percent of completion that this state represents in relation to the \
             workflow. Use numbers without the percent sign.",
        )
}

fn clean_completion(input: &str) -> Result<i32, String> {
    let field = completion_field();
    let cleaned = field.clean(&FormData::from_pairs([("completion", input)]))?;
    let value = cleaned
        .and_then(|value| value.as_i64())
        .or_else(|| field.default.as_ref().and_then(|default| default.as_i64()))
        .unwrap_or_default();
    i32::try_from(value).map_err(|_| "Enter a whole number.".to_string())
}

fn valid_completion(input: &str) -> Result<(), ValidationError> {
    clean_completion(input).map(|_| ()).map_err(|message| {
        let mut error = ValidationError::new("completion");
        error.message = Some(message.into());
        error
    })
}

impl FormRequest for WorkflowStateForm {
    fn clean(&mut self) -> Result<(), ValidationErrors> {
        self.label = self.label.trim().to_string();
        self.completion = clean_completion(&self.completion_input)
            .map_err(|message| ValidationErrors::single("completion", message))?;
        Ok(())
    }
}

impl WorkflowStateForm {
    /// Cleaned completion percentage
    pub fn completion(&self) -> i32 {
        self.completion
    }

    pub fn fields(instance: Option<&workflow_states::Model>) -> Vec<Field> {
        let mut initial = Field::boolean("initial", "Initial").help_text(
            "The state at which the workflow will start in. Only one state can be the initial state.",
        );
        let mut label = Field::char("label", "Label").max_length(MAX_LABEL_LENGTH);
        let mut completion = completion_field();
        if let Some(state) = instance {
            initial = initial.initial(state.initial);
            label = label.initial(state.label.clone());
            completion = completion.initial(state.completion);
        }
        vec![initial, label, completion]
    }

    /// Report a label already used by another state of the workflow
    pub async fn validate_unique(
        &self,
        db: &DatabaseConnection,
        workflow_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<ValidationErrors, DbErr> {
        let mut query = workflow_states::Entity::find()
            .filter(workflow_states::Column::WorkflowId.eq(workflow_id))
            .filter(workflow_states::Column::Label.eq(self.label.as_str()));
        if let Some(id) = exclude_id {
            query = query.filter(workflow_states::Column::Id.ne(id));
        }

        let mut errors = ValidationErrors::new();
        if query.one(db).await?.is_some() {
            errors.add(
                "label",
                "Workflow state with this Workflow and Label already exists.",
            );
        }
        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaned(input: &str) -> Result<WorkflowStateForm, ValidationErrors> {
        let mut form = WorkflowStateForm {
            label: "Draft".to_string(),
            completion_input: input.to_string(),
            ..Default::default()
        };
        form.validate().map_err(ValidationErrors::from_validator)?;
        form.clean()?;
        Ok(form)
    }

    #[test]
    fn completion_is_a_percentage() {
        assert_eq!(cleaned("20").unwrap().completion(), 20);
        let errors = cleaned("101").unwrap_err();
        assert_eq!(
            errors.get("completion"),
            Some(&["Ensure this value is less than or equal to 100.".to_string()][..])
        );
    }

    #[test]
    fn blank_completion_defaults_to_zero() {
        assert_eq!(cleaned("").unwrap().completion(), 0);
        assert_eq!(cleaned("  ").unwrap().completion(), 0);
    }

    #[test]
    fn non_numeric_completion_is_a_field_error() {
        let errors = cleaned("abc").unwrap_err();
        assert_eq!(
            errors.get("completion"),
            Some(&["Enter a whole number.".to_string()][..])
        );
    }

    #[test]
    fn completion_errors_are_reported_with_label_errors() {
        let form = WorkflowStateForm {
            completion_input: "abc".to_string(),
            ..Default::default()
        };
        let errors = ValidationErrors::from_validator(form.validate().unwrap_err());
        assert!(errors.has("label"));
        assert!(errors.has("completion"));
    }

    #[test]
    fn json_submission_parses_checkbox_and_number() {
        let form: WorkflowStateForm = serde_json::from_value(serde_json::json!({
            "initial": "on",
            "label": "Draft",
            "completion": 30,
        }))
        .unwrap();
        assert!(form.initial);
        assert_eq!(form.completion_input, "30");
    }
}
