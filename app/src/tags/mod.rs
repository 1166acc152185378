//! Tags attached to documents

mod workflow_actions;

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use crate::events::{EventType, EventTypeEntry};
use crate::models::tags;

pub static EVENT_TAG_ATTACH: EventType =
    EventType::new("tags", "tag_attach", "Tag attached to document");
pub static EVENT_TAG_REMOVE: EventType =
    EventType::new("tags", "tag_remove", "Tag removed from document");

inventory::submit!(EventTypeEntry(&EVENT_TAG_ATTACH));
inventory::submit!(EventTypeEntry(&EVENT_TAG_REMOVE));

pub async fn create_tag(db: &DatabaseConnection, label: &str, color: &str) -> Result<tags::Model, DbErr> {
    tags::ActiveModel {
        label: Set(label.to_string()),
        color: Set(color.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}
