pub mod artifact;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod report;
pub mod smoke;
pub mod util;

pub use config::VerifyConfig;
pub use pipeline::verify;

pub const TOOL_NAME: &str = "shipcheck";

/// JSON schema version of verification reports.
/// This must be bumped only when the report layout changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";
