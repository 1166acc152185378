//! Per-event-type toggles binding trigger events to a transition

use kit::forms::{
    form_prefix, Choice, DynamicForm, Field, FormData, ManagementForm, Widget, DEFAULT_PREFIX,
    REQUIRED_MESSAGE,
};
use kit::ValidationErrors;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde_json::{json, Value};

use crate::events;
use crate::models::workflow_transition_trigger_events as trigger_events;
use crate::models::{event_types, workflow_transitions};

/// Whether an event type triggers the transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    No,
    Yes,
}

impl Relationship {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Yes => "yes",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "no" => Some(Self::No),
            "yes" => Some(Self::Yes),
            _ => None,
        }
    }

    pub fn choices() -> Vec<Choice> {
        vec![Choice::new("no", "No"), Choice::new("yes", "Yes")]
    }
}

/// Make the stored rows match `relationship`
///
/// `No` deletes every matching row, `Yes` creates one when none exists;
/// applying the same relationship twice changes nothing.
pub async fn set_relationship<C: ConnectionTrait>(
    db: &C,
    transition_id: i64,
    event_type_id: i64,
    relationship: Relationship,
) -> Result<(), DbErr> {
    match relationship {
        Relationship::No => {
            trigger_events::Entity::delete_many()
                .filter(trigger_events::Column::TransitionId.eq(transition_id))
                .filter(trigger_events::Column::EventTypeId.eq(event_type_id))
                .exec(db)
                .await?;
        }
        Relationship::Yes => {
            if trigger_events::Entity::find_for(db, transition_id, event_type_id)
                .await?
                .is_empty()
            {
                trigger_events::ActiveModel {
                    transition_id: Set(transition_id),
                    event_type_id: Set(event_type_id),
                    ..Default::default()
                }
                .insert(db)
                .await?;
            }
        }
    }
    Ok(())
}

/// Toggle for one event type
#[derive(Debug, Clone)]
pub struct TriggerEventRelationshipForm {
    pub transition_id: i64,
    pub event_type: event_types::Model,
    pub relationship: Relationship,
}

impl TriggerEventRelationshipForm {
    /// Initial relationship read from the stored trigger events
    pub async fn new(
        db: &DatabaseConnection,
        transition: &workflow_transitions::Model,
        event_type: event_types::Model,
    ) -> Result<Self, DbErr> {
        let linked = !trigger_events::Entity::find_for(db, transition.id, event_type.id)
            .await?
            .is_empty();
        Ok(Self {
            transition_id: transition.id,
            event_type,
            relationship: if linked { Relationship::Yes } else { Relationship::No },
        })
    }

    pub fn fields(&self) -> Vec<Field> {
        vec![
            Field::char("label", "Event type")
                .optional()
                .widget(Widget::ReadOnly)
                .initial(self.event_type.label.clone()),
            Field::choice("relationship", "Triggers", Relationship::choices())
                .widget(Widget::RadioSelect)
                .initial(self.relationship.as_str()),
        ]
    }

    /// Clean this form's unprefixed data; the read-only label is ignored
    pub fn clean(&self, data: &FormData) -> Result<Relationship, ValidationErrors> {
        let cleaned = DynamicForm::new(self.fields()).clean(data)?;
        cleaned
            .str("relationship")
            .and_then(Relationship::parse)
            .ok_or_else(|| ValidationErrors::single("relationship", REQUIRED_MESSAGE))
    }

    pub async fn save<C: ConnectionTrait>(
        &self,
        db: &C,
        relationship: Relationship,
    ) -> Result<(), DbErr> {
        set_relationship(db, self.transition_id, self.event_type.id, relationship).await
    }
}

/// One toggle per registered event type, with no extra forms
#[derive(Debug, Clone)]
pub struct TriggerEventFormSet {
    prefix: String,
    forms: Vec<TriggerEventRelationshipForm>,
}

impl TriggerEventFormSet {
    pub async fn new(
        db: &DatabaseConnection,
        transition: &workflow_transitions::Model,
    ) -> Result<Self, DbErr> {
        let mut forms = Vec::new();
        for event in events::all() {
            let event_type = event.stored(db).await?;
            forms.push(TriggerEventRelationshipForm::new(db, transition, event_type).await?);
        }
        Ok(Self {
            prefix: DEFAULT_PREFIX.to_string(),
            forms,
        })
    }

    pub fn forms(&self) -> &[TriggerEventRelationshipForm] {
        &self.forms
    }

    pub fn management_form(&self) -> ManagementForm {
        ManagementForm::for_initial(self.forms.len())
    }

    /// Submission reproducing the current state of every toggle
    pub fn initial_data(&self) -> FormData {
        let mut data = self.management_form().to_data(&self.prefix);
        for (index, form) in self.forms.iter().enumerate() {
            let prefix = form_prefix(&self.prefix, index);
            data.extend(DynamicForm::new(form.fields()).initial_data().prefixed(&prefix));
        }
        data
    }

    /// Validate the management form and every toggle
    ///
    /// Field errors are keyed by the prefixed field name, e.g.
    /// `form-1-relationship`.
    pub fn clean(&self, data: &FormData) -> Result<Vec<Relationship>, ValidationErrors> {
        let management = ManagementForm::parse(&self.prefix, data)?;
        management.expect_total(self.forms.len())?;

        let mut relationships = Vec::with_capacity(self.forms.len());
        let mut errors = ValidationErrors::new();
        for (index, form) in self.forms.iter().enumerate() {
            let prefix = form_prefix(&self.prefix, index);
            match form.clean(&data.subset(&prefix)) {
                Ok(relationship) => relationships.push(relationship),
                Err(form_errors) => errors.merge_prefixed(&prefix, form_errors),
            }
        }

        if errors.is_empty() {
            Ok(relationships)
        } else {
            Err(errors)
        }
    }

    /// Apply every toggle in one transaction
    pub async fn save(
        &self,
        db: &DatabaseConnection,
        relationships: &[Relationship],
    ) -> Result<(), DbErr> {
        let txn = db.begin().await?;
        for (form, relationship) in self.forms.iter().zip(relationships) {
            form.save(&txn, *relationship).await?;
        }
        txn.commit().await?;
        tracing::debug!(forms = self.forms.len(), "Trigger events saved");
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        let forms: Vec<Value> = self
            .forms
            .iter()
            .enumerate()
            .map(|(index, form)| {
                json!({
                    "prefix": form_prefix(&self.prefix, index),
                    "event_type": form.event_type.name,
                    "fields": form.fields(),
                })
            })
            .collect();
        json!({
            "management_form": self.management_form().to_json(&self.prefix),
            "forms": forms,
        })
    }
}
