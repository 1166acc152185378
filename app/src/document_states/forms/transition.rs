use kit::forms::{DynamicForm, Field, FormData, Record};
use kit::ValidationErrors;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde_json::Value;

use super::MAX_LABEL_LENGTH;
use crate::models::{workflow_transitions, workflows};

/// Cleaned transition values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionData {
    pub label: String,
    pub origin_state_id: i64,
    pub destination_state_id: i64,
}

/// Create or edit a transition
///
/// Origin and destination choices are the states of the transition's own
/// workflow, so a state of another workflow is an invalid choice.
#[derive(Debug, Clone)]
pub struct WorkflowTransitionForm {
    form: DynamicForm,
}

impl WorkflowTransitionForm {
    pub async fn new(
        db: &DatabaseConnection,
        workflow: &workflows::Model,
        instance: Option<&workflow_transitions::Model>,
    ) -> Result<Self, DbErr> {
        let states: Vec<Record> = workflow
            .states(db)
            .await?
            .into_iter()
            .map(|state| Record::new(state.id, state.label))
            .collect();

        let mut label = Field::char("label", "Label").max_length(MAX_LABEL_LENGTH);
        let mut origin = Field::model_choice("origin_state", "Origin state", states.clone());
        let mut destination = Field::model_choice("destination_state", "Destination state", states);
        if let Some(transition) = instance {
            label = label.initial(transition.label.clone());
            origin = origin.initial(transition.origin_state_id);
            destination = destination.initial(transition.destination_state_id);
        }

        Ok(Self {
            form: DynamicForm::new(vec![label, origin, destination]),
        })
    }

    pub fn fields(&self) -> &[Field] {
        self.form.fields()
    }

    pub fn to_json(&self) -> Value {
        self.form.to_json()
    }

    pub fn clean(&self, data: &FormData) -> Result<TransitionData, ValidationErrors> {
        let cleaned = self.form.clean(data)?;
        Ok(TransitionData {
            label: cleaned.str("label").unwrap_or_default().to_string(),
            origin_state_id: cleaned.i64("origin_state").unwrap_or_default(),
            destination_state_id: cleaned.i64("destination_state").unwrap_or_default(),
        })
    }

    /// Report a label or a state pair already used by another transition
    pub async fn validate_unique(
        db: &DatabaseConnection,
        workflow_id: i64,
        data: &TransitionData,
        exclude_id: Option<i64>,
    ) -> Result<ValidationErrors, DbErr> {
        let siblings = workflow_transitions::Entity::find()
            .filter(workflow_transitions::Column::WorkflowId.eq(workflow_id))
            .all(db)
            .await?;

        let mut errors = ValidationErrors::new();
        for other in siblings.iter().filter(|t| Some(t.id) != exclude_id) {
            if other.label == data.label {
                errors.add(
                    "label",
                    "Workflow transition with this Workflow and Label already exists.",
                );
            }
            if other.origin_state_id == data.origin_state_id
                && other.destination_state_id == data.destination_state_id
            {
                errors.add(
                    ValidationErrors::NON_FIELD,
                    "Workflow transition with this Workflow, Origin state and Destination state already exists.",
                );
            }
        }
        Ok(errors)
    }
}
