//! A workflow running on one document

use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::Serialize;

use super::{workflow_instance_log_entries as log_entries, workflow_states, workflow_transitions, workflows};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "workflow_instances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub workflow_id: i64,
    /// Document owned by the documents app
    pub document_id: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn workflow(&self, db: &DatabaseConnection) -> Result<Option<workflows::Model>, DbErr> {
        workflows::Entity::find_by_id(self.workflow_id).one(db).await
    }

    /// Most recent log entry first
    pub async fn log_entries(&self, db: &DatabaseConnection) -> Result<Vec<log_entries::Model>, DbErr> {
        log_entries::Entity::find()
            .filter(log_entries::Column::InstanceId.eq(self.id))
            .order_by_desc(log_entries::Column::Datetime)
            .order_by_desc(log_entries::Column::Id)
            .all(db)
            .await
    }

    /// Destination of the latest transition, or the workflow's initial state
    pub async fn current_state(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Option<workflow_states::Model>, DbErr> {
        let latest = self.log_entries(db).await?.into_iter().next();
        if let Some(entry) = latest {
            if let Some(transition) = workflow_transitions::Entity::find_by_id(entry.transition_id)
                .one(db)
                .await?
            {
                return workflow_states::Entity::find_by_id(transition.destination_state_id)
                    .one(db)
                    .await;
            }
        }
        workflow_states::Entity::find()
            .filter(workflow_states::Column::WorkflowId.eq(self.workflow_id))
            .filter(workflow_states::Column::Initial.eq(true))
            .one(db)
            .await
    }

    /// Transitions leaving the current state
    pub async fn transition_choices(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Vec<workflow_transitions::Model>, DbErr> {
        let Some(state) = self.current_state(db).await? else {
            return Ok(Vec::new());
        };
        workflow_transitions::Entity::find()
            .filter(workflow_transitions::Column::WorkflowId.eq(self.workflow_id))
            .filter(workflow_transitions::Column::OriginStateId.eq(state.id))
            .order_by_asc(workflow_transitions::Column::Label)
            .all(db)
            .await
    }
}
