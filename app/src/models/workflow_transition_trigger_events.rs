//! Event types that fire a transition

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workflow_transition_trigger_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub transition_id: i64,
    pub event_type_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    pub async fn find_for<C: ConnectionTrait>(
        db: &C,
        transition_id: i64,
        event_type_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Self::find()
            .filter(Column::TransitionId.eq(transition_id))
            .filter(Column::EventTypeId.eq(event_type_id))
            .all(db)
            .await
    }
}
