//! Three-level checkable taxonomy pickers.
//!
//! The core is a generic tree-selection model ([`domain::SelectionState`])
//! with asymmetric toggle rules, an independent expansion tracker, a
//! projector that flattens the selection for forms, and a provider-scoped
//! accessor ([`domain::Scope`]). Two instances ship with the crate: the
//! expertise picker (domain → category → skill) and the location picker
//! (country → state → LGA).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
