use kit::forms::{DynamicForm, Field, FormData, Widget};
use kit::ValidationErrors;
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::{json, Value};

use super::MAX_LABEL_LENGTH;
use crate::document_states::actions::{self, ActionType};
use crate::document_states::ActionWhen;
use crate::models::workflow_state_actions;

/// Pick the type of a new state action
#[derive(Debug, Clone)]
pub struct WorkflowActionSelectionForm {
    field: Field,
}

impl Default for WorkflowActionSelectionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowActionSelectionForm {
    pub fn new() -> Self {
        Self {
            field: Field::choice("klass", "Action", actions::choices())
                .help_text("The action type for this action entry."),
        }
    }

    pub fn fields(&self) -> Vec<Field> {
        vec![self.field.clone()]
    }

    pub fn clean(&self, data: &FormData) -> Result<&'static ActionType, ValidationErrors> {
        let key = self
            .field
            .clean(data)
            .map_err(|message| ValidationErrors::single("klass", message))?
            .and_then(|cleaned| cleaned.as_str().map(str::to_string))
            .unwrap_or_default();
        actions::get(&key).ok_or_else(|| {
            ValidationErrors::single("klass", kit::forms::INVALID_CHOICE_MESSAGE)
        })
    }
}

/// Cleaned state action values, `action_data` already serialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateActionData {
    pub label: String,
    pub when: ActionWhen,
    pub enabled: bool,
    pub action_path: String,
    pub action_data: String,
}

/// Fields of every state action, ahead of the action type's schema
const STATIC_FIELDS: usize = 4;

/// Configure a state action of a given type
///
/// The form shows the fixed fields (`label`, `when`, `enabled` and the
/// hidden `action_data`) followed by the action type's schema. Cleaning
/// folds the schema fields into the JSON object stored as `action_data`.
#[derive(Debug, Clone)]
pub struct WorkflowStateActionDynamicForm {
    action_type: &'static ActionType,
    form: DynamicForm,
}

impl WorkflowStateActionDynamicForm {
    /// Build the form, seeding schema fields from an existing action's data
    ///
    /// Keys of the stored data the schema no longer declares are ignored.
    pub async fn new(
        db: &DatabaseConnection,
        action_type: &'static ActionType,
        instance: Option<&workflow_state_actions::Model>,
    ) -> Result<Self, DbErr> {
        let mut fields = vec![
            Field::char("label", "Label").max_length(MAX_LABEL_LENGTH),
            Field::choice("when", "When", ActionWhen::choices())
                .help_text("At which moment of the state this action will execute."),
            Field::boolean("enabled", "Enabled").initial(true),
            Field::char("action_data", "Action data")
                .optional()
                .widget(Widget::HiddenInput),
        ];
        fields.extend(action_type.fields(db).await?);
        let mut form = DynamicForm::new(fields);

        if let Some(action) = instance {
            form.set_initial("label", json!(action.label));
            form.set_initial("when", json!(action.when.to_string()));
            form.set_initial("enabled", json!(action.enabled));
            form.set_initial("action_data", json!(action.action_data));

            let schema: Vec<String> = form.fields()[STATIC_FIELDS..]
                .iter()
                .map(|field| field.name.clone())
                .collect();
            for (key, value) in action.action_data_map() {
                if schema.contains(&key) {
                    form.set_initial(&key, value);
                }
            }
        }

        Ok(Self { action_type, form })
    }

    pub fn action_type(&self) -> &'static ActionType {
        self.action_type
    }

    pub fn fields(&self) -> &[Field] {
        self.form.fields()
    }

    /// The action type's fields
    pub fn schema(&self) -> &[Field] {
        &self.form.fields()[STATIC_FIELDS..]
    }

    /// Submission reproducing the initial values
    pub fn initial_data(&self) -> FormData {
        self.form.initial_data()
    }

    pub fn to_json(&self) -> Value {
        self.form.to_json()
    }

    pub fn clean(&self, data: &FormData) -> Result<StateActionData, ValidationErrors> {
        let mut cleaned = self.form.clean(data)?;

        let when = cleaned
            .str("when")
            .and_then(|code| code.parse().ok())
            .and_then(ActionWhen::from_i32)
            .ok_or_else(|| ValidationErrors::single("when", kit::forms::REQUIRED_MESSAGE))?;
        let label = cleaned.str("label").unwrap_or_default().to_string();
        let enabled = cleaned.bool("enabled").unwrap_or(false);

        let payload = DynamicForm::consolidate(self.schema(), &mut cleaned)?;
        let action_data = serde_json::to_string(&payload).map_err(|e| {
            ValidationErrors::single(ValidationErrors::NON_FIELD, e.to_string())
        })?;

        Ok(StateActionData {
            label,
            when,
            enabled,
            action_path: self.action_type.key.to_string(),
            action_data,
        })
    }
}
