//! OASIS Schemas - Content Studio Document Types
//!
//! # Ground Rules
//! 1. Document Types Are Data
//! 2. The Registry Is the Only Source of Types
//! 3. Every Created Document Is Validated
//! 4. Previews Never Fail
//! 5. Manifests Pin the Schema Hash

pub mod config;
pub mod content;
pub mod hashing;
pub mod pipeline;
pub mod preview;
pub mod registry;
pub mod schema;
pub mod types;
pub mod validation;

pub use config::{CliConfig, ConfigError, Settings, StudioConfig};
pub use content::ContentBlock;
pub use hashing::{canonical_json, compute_content_hash, compute_schema_hash};
pub use pipeline::{DocumentPipeline, PipelineError, PreparedDocument, SchemaManifest};
pub use preview::{Preview, PreviewOutput, Selection};
pub use registry::SchemaRegistry;
pub use schema::{ArrayMember, Constraint, DocumentType, Field, FieldType};
pub use validation::{
    DocumentValidator, FailureMode, SchemaRule, SchemaValidator, ValidationResult,
    ValidationViolation, ViolationSeverity,
};

pub const SCHEMA_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_MANIFEST_VERSION: &str = "1.0.0";
