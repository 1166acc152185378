//! Actions run when a document enters or leaves a state

use sea_orm::entity::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "workflow_state_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub state_id: i64,
    pub label: String,
    pub enabled: bool,
    /// `1` on entry, `2` on exit
    pub when: i32,
    /// Registry key of the action type
    pub action_path: String,
    /// JSON object keyed by the action type's field names
    pub action_data: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Decoded `action_data`; empty or malformed payloads decode to an empty object
    pub fn action_data_map(&self) -> Map<String, Value> {
        if self.action_data.trim().is_empty() {
            return Map::new();
        }
        match serde_json::from_str::<Value>(&self.action_data) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(action_id = self.id, "Ignoring action data that is not a JSON object");
                Map::new()
            }
        }
    }
}
