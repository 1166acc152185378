//! Tag actions for workflow states

use kit::forms::{Field, Record};
use sea_orm::{DatabaseConnection, DbErr};

use crate::document_states::actions::{ActionType, SchemaFuture};
use crate::models::tags;

async fn tag_field(db: &DatabaseConnection, help_text: &str) -> Result<Vec<Field>, DbErr> {
    let records = tags::Entity::all(db)
        .await?
        .into_iter()
        .map(|tag| Record::new(tag.id, tag.label))
        .collect();
    Ok(vec![Field::model_multiple_choice("tags", "Tags", records).help_text(help_text)])
}

fn attach_tag_schema(db: &DatabaseConnection) -> SchemaFuture<'_> {
    Box::pin(tag_field(db, "Tags to attach to the document."))
}

fn remove_tag_schema(db: &DatabaseConnection) -> SchemaFuture<'_> {
    Box::pin(tag_field(db, "Tags to remove from the document."))
}

inventory::submit! {
    ActionType {
        key: "tags.attach_tag",
        label: "Attach tag",
        schema: attach_tag_schema,
    }
}

inventory::submit! {
    ActionType {
        key: "tags.remove_tag",
        label: "Remove tag",
        schema: remove_tag_schema,
    }
}
