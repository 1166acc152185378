//! Archivo document workflows
//!
//! Setup views for workflow templates: states, state actions,
//! transitions and their trigger events, plus moving workflow instances
//! along their transitions. Access is checked per workflow through
//! roles and access control lists.

pub mod acls;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod controllers;
pub mod document_states;
pub mod events;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod tags;
pub mod testing;
