//! Module boundary re-exporting the domain primitives used at runtime.

pub use workflow_api_core::contract;
pub use workflow_api_core::report;
