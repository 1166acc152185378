use kit::forms::{DynamicForm, Field, FormData, Record, Widget};
use kit::ValidationErrors;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use serde_json::Value;

use crate::acls::{self, AclObject};
use crate::document_states::permissions::PERMISSION_WORKFLOW_TRANSITION;
use crate::models::{users, workflow_instance_log_entries as log_entries, workflow_instances};

/// Cleaned transition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceTransitionData {
    pub transition_id: i64,
    pub comment: String,
}

/// Move a workflow instance along one of its available transitions
#[derive(Debug, Clone)]
pub struct WorkflowInstanceTransitionForm {
    form: DynamicForm,
}

impl WorkflowInstanceTransitionForm {
    /// Offer the transitions leaving the current state, when `user` may
    /// transition the instance's workflow
    pub async fn new(
        db: &DatabaseConnection,
        instance: &workflow_instances::Model,
        user: &users::Model,
    ) -> Result<Self, DbErr> {
        let allowed = match instance.workflow(db).await? {
            Some(workflow) => {
                acls::check_access(db, user, &[&PERMISSION_WORKFLOW_TRANSITION], workflow.acl_ref())
                    .await?
            }
            None => false,
        };
        let choices: Vec<Record> = if allowed {
            instance
                .transition_choices(db)
                .await?
                .into_iter()
                .map(|transition| Record::new(transition.id, transition.label))
                .collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            form: DynamicForm::new(vec![
                Field::model_choice("transition", "Transition", choices),
                Field::char("comment", "Comment")
                    .optional()
                    .widget(Widget::Textarea),
            ]),
        })
    }

    pub fn fields(&self) -> &[Field] {
        self.form.fields()
    }

    pub fn to_json(&self) -> Value {
        self.form.to_json()
    }

    pub fn clean(&self, data: &FormData) -> Result<InstanceTransitionData, ValidationErrors> {
        let cleaned = self.form.clean(data)?;
        Ok(InstanceTransitionData {
            transition_id: cleaned.i64("transition").unwrap_or_default(),
            comment: cleaned.str("comment").unwrap_or_default().to_string(),
        })
    }

    /// Record the transition in the instance's log
    pub async fn save(
        db: &DatabaseConnection,
        instance: &workflow_instances::Model,
        user: &users::Model,
        data: InstanceTransitionData,
    ) -> Result<log_entries::Model, DbErr> {
        let entry = log_entries::ActiveModel {
            instance_id: Set(instance.id),
            transition_id: Set(data.transition_id),
            user_id: Set(user.id),
            comment: Set(data.comment),
            datetime: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        tracing::info!(
            instance_id = instance.id,
            transition_id = entry.transition_id,
            user = %user.username,
            "Workflow instance transitioned"
        );
        Ok(entry)
    }
}
