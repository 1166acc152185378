//! SeaORM entities
//!
//! One module per table. Relations are resolved with explicit queries in
//! the model helpers rather than through `Related`.

pub mod access_control_lists;
pub mod acl_permissions;
pub mod event_types;
pub mod groups;
pub mod role_groups;
pub mod role_permissions;
pub mod roles;
pub mod stored_permissions;
pub mod tags;
pub mod user_groups;
pub mod users;
pub mod workflow_instance_log_entries;
pub mod workflow_instances;
pub mod workflow_state_actions;
pub mod workflow_states;
pub mod workflow_transition_trigger_events;
pub mod workflow_transitions;
pub mod workflows;
