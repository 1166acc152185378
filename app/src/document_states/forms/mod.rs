//! Forms binding workflow objects
//!
//! Forms with a fixed set of text fields are `FormRequest` structs; forms
//! whose choices come from the database are built from field descriptors
//! and cleaned as [`DynamicForm`](kit::forms::DynamicForm)s.

mod action;
mod instance;
mod preview;
mod state;
mod transition;
mod trigger_events;
mod workflow;

pub use action::{StateActionData, WorkflowActionSelectionForm, WorkflowStateActionDynamicForm};
pub use instance::{InstanceTransitionData, WorkflowInstanceTransitionForm};
pub use preview::WorkflowPreviewForm;
pub use state::WorkflowStateForm;
pub use transition::{TransitionData, WorkflowTransitionForm};
pub use trigger_events::{
    set_relationship, Relationship, TriggerEventFormSet, TriggerEventRelationshipForm,
};
pub use workflow::WorkflowForm;

use validator::ValidationError;

pub(crate) const MAX_LABEL_LENGTH: usize = 255;

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}
