//! Workflow states
//!
//! A workflow has at most one initial state: saving a state flagged
//! `initial` clears the flag on its siblings.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue, QueryOrder};
use serde::Serialize;

use super::workflow_state_actions;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "workflow_states")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub workflow_id: i64,
    pub label: String,
    pub initial: bool,
    /// Percent of the workflow done once a document reaches this state
    pub completion: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let initial = matches!(
            self.initial,
            ActiveValue::Set(true) | ActiveValue::Unchanged(true)
        );
        let workflow_id = match self.workflow_id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => id,
            ActiveValue::NotSet => return Ok(self),
        };

        if initial {
            let mut siblings = Entity::update_many()
                .col_expr(Column::Initial, Expr::value(false))
                .filter(Column::WorkflowId.eq(workflow_id))
                .filter(Column::Initial.eq(true));
            if let ActiveValue::Set(id) | ActiveValue::Unchanged(id) = self.id {
                siblings = siblings.filter(Column::Id.ne(id));
            }
            siblings.exec(db).await?;
        }

        Ok(self)
    }
}

impl Model {
    pub async fn actions(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Vec<workflow_state_actions::Model>, DbErr> {
        workflow_state_actions::Entity::find()
            .filter(workflow_state_actions::Column::StateId.eq(self.id))
            .order_by_asc(workflow_state_actions::Column::Label)
            .all(db)
            .await
    }
}
