//! Event type registry
//!
//! Apps declare the events they emit; [`sync`] stores one row per event
//! type so transitions can be bound to them as triggers.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};

use crate::models::event_types;

/// An event an app can emit
#[derive(Debug, PartialEq, Eq)]
pub struct EventType {
    pub namespace: &'static str,
    pub name: &'static str,
    pub label: &'static str,
}

impl EventType {
    pub const fn new(namespace: &'static str, name: &'static str, label: &'static str) -> Self {
        Self {
            namespace,
            name,
            label,
        }
    }

    /// `namespace.name`
    pub fn id(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// Persisted row, created on first use; a changed label is updated
    pub async fn stored(&self, db: &DatabaseConnection) -> Result<event_types::Model, DbErr> {
        match event_types::Entity::find_by_name(db, &self.id()).await? {
            Some(existing) if existing.label == self.label => Ok(existing),
            Some(existing) => {
                let mut model: event_types::ActiveModel = existing.into();
                model.label = Set(self.label.to_string());
                model.update(db).await
            }
            None => {
                event_types::ActiveModel {
                    name: Set(self.id()),
                    label: Set(self.label.to_string()),
                    ..Default::default()
                }
                .insert(db)
                .await
            }
        }
    }
}

/// Registry entry submitted with `inventory::submit!`
pub struct EventTypeEntry(pub &'static EventType);

inventory::collect!(EventTypeEntry);

/// Every registered event type, ordered by id
pub fn all() -> Vec<&'static EventType> {
    let mut events: Vec<&'static EventType> =
        inventory::iter::<EventTypeEntry>.into_iter().map(|entry| entry.0).collect();
    events.sort_by_key(|event| event.id());
    events
}

/// Store every registered event type
pub async fn sync(db: &DatabaseConnection) -> Result<Vec<event_types::Model>, DbErr> {
    let mut stored = Vec::new();
    for event in all() {
        stored.push(event.stored(db).await?);
    }
    tracing::debug!(count = stored.len(), "Event types synchronized");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_sorted_by_id() {
        let ids: Vec<String> = all().iter().map(|event| event.id()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert!(ids.contains(&"tags.tag_attach".to_string()));
    }
}
