//! Workflow action type registry
//!
//! Action types register at link time with a key, a label and an async
//! provider of the field schema their configuration form shows. The
//! provider may read the database, e.g. to offer the current tags.
//!
//! ```rust,ignore
//! fn schema(db: &DatabaseConnection) -> SchemaFuture<'_> {
//!     Box::pin(async move { Ok(vec![Field::char("url", "URL")]) })
//! }
//!
//! inventory::submit! {
//!     ActionType { key: "webhooks.ping", label: "Ping a URL", schema }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;

use kit::forms::{Choice, Field, Widget};
use sea_orm::{DatabaseConnection, DbErr};

/// Future resolving to an action type's field schema
pub type SchemaFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Field>, DbErr>> + Send + 'a>>;

pub type SchemaFn = for<'a> fn(&'a DatabaseConnection) -> SchemaFuture<'a>;

/// A kind of action that can be attached to a workflow state
pub struct ActionType {
    /// Registry key stored as the action's `action_path`
    pub key: &'static str,
    pub label: &'static str,
    pub schema: SchemaFn,
}

inventory::collect!(ActionType);

impl ActionType {
    /// Field schema of the action's configuration
    pub async fn fields(&self, db: &DatabaseConnection) -> Result<Vec<Field>, DbErr> {
        (self.schema)(db).await
    }

    pub fn choice(&self) -> Choice {
        Choice::new(self.key, self.label)
    }
}

impl std::fmt::Debug for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionType")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish()
    }
}

/// Find a registered action type by key
pub fn get(key: &str) -> Option<&'static ActionType> {
    inventory::iter::<ActionType>
        .into_iter()
        .find(|action| action.key == key)
}

/// Every registered action type, ordered by label
pub fn all() -> Vec<&'static ActionType> {
    let mut actions: Vec<&'static ActionType> = inventory::iter::<ActionType>.into_iter().collect();
    actions.sort_by_key(|action| (action.label, action.key));
    actions
}

pub fn choices() -> Vec<Choice> {
    all().into_iter().map(ActionType::choice).collect()
}

fn http_post_schema(_db: &DatabaseConnection) -> SchemaFuture<'_> {
    Box::pin(async {
        Ok::<_, DbErr>(vec![
            Field::char("url", "URL")
                .help_text("Can be an IP address, a domain or a template."),
            Field::char("payload", "Payload")
                .optional()
                .widget(Widget::Textarea)
                .help_text("A JSON document to include in the request."),
            Field::integer("timeout", "Timeout")
                .optional()
                .range(Some(0), None)
                .default_value(5)
                .help_text("Time in seconds to wait for a response."),
        ])
    })
}

inventory::submit! {
    ActionType {
        key: "document_states.http_post",
        label: "Perform a POST request",
        schema: http_post_schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_finds_builtin_actions() {
        let http = get("document_states.http_post").expect("registered");
        assert_eq!(http.label, "Perform a POST request");
        assert!(get("tags.attach_tag").is_some());
        assert!(get("tags.remove_tag").is_some());
        assert!(get("unknown.action").is_none());
    }

    #[test]
    fn all_is_ordered_by_label() {
        let labels: Vec<&str> = all().iter().map(|action| action.label).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }
}
