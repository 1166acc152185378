//! Workflow definitions

use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::Serialize;

use super::{workflow_states, workflow_transitions};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "workflows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub label: String,
    #[sea_orm(unique)]
    pub internal_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    pub async fn all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Self::find().order_by_asc(Column::Label).all(db).await
    }
}

impl Model {
    /// States ordered by completion, then label
    pub async fn states(&self, db: &DatabaseConnection) -> Result<Vec<workflow_states::Model>, DbErr> {
        workflow_states::Entity::find()
            .filter(workflow_states::Column::WorkflowId.eq(self.id))
            .order_by_asc(workflow_states::Column::Completion)
            .order_by_asc(workflow_states::Column::Label)
            .all(db)
            .await
    }

    pub async fn initial_state(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Option<workflow_states::Model>, DbErr> {
        workflow_states::Entity::find()
            .filter(workflow_states::Column::WorkflowId.eq(self.id))
            .filter(workflow_states::Column::Initial.eq(true))
            .one(db)
            .await
    }

    pub async fn transitions(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Vec<workflow_transitions::Model>, DbErr> {
        workflow_transitions::Entity::find()
            .filter(workflow_transitions::Column::WorkflowId.eq(self.id))
            .order_by_asc(workflow_transitions::Column::Label)
            .all(db)
            .await
    }
}
