//! AWS-oriented adapters and handlers for the workflow API.
//!
//! This crate owns runtime integration details (Lambda handlers, the
//! database collaborator boundary, and the Step Functions adapter) and
//! exposes a single runtime module boundary for the contract and reporting
//! primitives.

pub mod adapters;
pub mod handlers;
pub mod runtime;
