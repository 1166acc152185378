//! Workflow transitions between two states of the same workflow

use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::workflow_transition_trigger_events as trigger_events;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "workflow_transitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub workflow_id: i64,
    pub label: String,
    pub origin_state_id: i64,
    pub destination_state_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Ids of the event types that trigger this transition
    pub async fn trigger_event_type_ids(&self, db: &DatabaseConnection) -> Result<Vec<i64>, DbErr> {
        Ok(trigger_events::Entity::find()
            .filter(trigger_events::Column::TransitionId.eq(self.id))
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.event_type_id)
            .collect())
    }
}
