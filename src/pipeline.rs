//! Document Pipeline - Single Entry Point for Document Payloads
//!
//! CRITICAL: prepare_create MUST call validate internally. No bypass.
//! Nothing here talks to the host platform; the output is the mutation body
//! the platform's HTTP API expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::hashing::{compute_content_hash, compute_schema_hash};
use crate::preview::PreviewOutput;
use crate::registry::SchemaRegistry;
use crate::schema::DocumentType;
use crate::types::star_template;
use crate::validation::{DocumentValidator, FailureMode, ValidationResult};
use crate::{MIN_MANIFEST_VERSION, SCHEMA_VERSION};

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Document type not found: {0}")]
    TypeNotFound(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Manifest version {manifest} is not compatible with schema version {current}")]
    ManifestVersion { manifest: String, current: String },

    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A document ready to be sent as a create mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedDocument {
    pub id: String,
    pub document_type: String,
    pub created_at: DateTime<Utc>,
    pub content_hash: String,
    pub validation: ValidationResult,
    pub document: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMatch {
    pub template_id: String,
    pub template_type: String,
    pub content_id: String,
    pub content_type: String,
}

pub struct DocumentPipeline {
    registry: SchemaRegistry,
    validator: DocumentValidator,
}

impl DocumentPipeline {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self::with_failure_mode(registry, FailureMode::default())
    }

    pub fn with_failure_mode(registry: SchemaRegistry, failure_mode: FailureMode) -> Self {
        Self {
            registry,
            validator: DocumentValidator::new(failure_mode),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn get_type(&self, name: &str) -> Result<&DocumentType, PipelineError> {
        self.registry
            .get(name)
            .ok_or_else(|| PipelineError::TypeNotFound(name.to_string()))
    }

    /// Validate a document against a registered type
    ///
    /// This is the ONLY document validation entry point.
    pub fn validate_document(
        &self,
        type_name: &str,
        document: &Value,
    ) -> Result<ValidationResult, PipelineError> {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        let document_type = self.get_type(type_name)?;
        Ok(self.validator.validate(document_type, document))
    }

    pub fn preview_document(
        &self,
        type_name: &str,
        document: &Value,
    ) -> Result<PreviewOutput, PipelineError> {
        Ok(self.get_type(type_name)?.preview(document))
    }

    /// Build a new document from a payload
    ///
    /// CRITICAL: This ALWAYS calls validate_document internally.
    pub fn prepare_create(
        &self,
        type_name: &str,
        payload: Value,
    ) -> Result<PreparedDocument, PipelineError> {
        let document_type = self.get_type(type_name)?;
        let Value::Object(fields) = payload else {
            return Err(PipelineError::InvalidPayload(
                "document payload must be a JSON object".to_string(),
            ));
        };

        let mut document = document_type.initial_document();
        merge(&mut document, Value::Object(fields));
        document_type.derive_slugs(&mut document);

        let id = match document.get("_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        if let Value::Object(map) = &mut document {
            map.insert("_id".to_string(), Value::String(id.clone()));
            map.insert("_type".to_string(), Value::String(document_type.name.clone()));
        }

        // MANDATORY: Validation is always called. This is non-negotiable.
        let validation = self.validate_document(type_name, &document)?;

        if !validation.valid {
            let messages: Vec<_> = validation
                .violations
                .iter()
                .map(|v| format!("{}: {}", v.path, v.message))
                .collect();
            warn!(document_type = type_name, errors = messages.len(), "rejected document");
            return Err(PipelineError::ValidationFailed(messages.join("; ")));
        }

        let content_hash = compute_content_hash(&document)?;
        debug!(document_type = type_name, %id, "prepared document");

        Ok(PreparedDocument {
            id,
            document_type: document_type.name.clone(),
            created_at: Utc::now(),
            content_hash,
            validation,
            document,
        })
    }
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new(SchemaRegistry::studio())
    }
}

/// Overlay `patch` onto `base`; nested objects merge, everything else
/// replaces.
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Request body for the host's mutate endpoint.
pub fn mutation_payload(documents: &[PreparedDocument]) -> Value {
    let mutations: Vec<Value> = documents
        .iter()
        .map(|prepared| json!({"create": prepared.document}))
        .collect();
    json!({ "mutations": mutations })
}

/// Reference value pointing at another document.
pub fn reference(id: &str) -> Value {
    json!({"_type": "reference", "_ref": id})
}

/// Pair STAR templates with the content they can generate a dApp from.
/// Inputs are stored documents; entries without `_id` are skipped.
pub fn match_templates_to_content(templates: &[Value], content: &[Value]) -> Vec<TemplateMatch> {
    let mut matches = vec![];
    for template in templates {
        let (Some(template_id), Some(template_type)) = (
            template.get("_id").and_then(Value::as_str),
            template.get("templateType").and_then(Value::as_str),
        ) else {
            continue;
        };
        let Some(target) = star_template::target_content_type(template_type) else {
            continue;
        };
        for item in content {
            let (Some(content_id), Some(content_type)) = (
                item.get("_id").and_then(Value::as_str),
                item.get("_type").and_then(Value::as_str),
            ) else {
                continue;
            };
            if content_type == target {
                matches.push(TemplateMatch {
                    template_id: template_id.to_string(),
                    template_type: template_type.to_string(),
                    content_id: content_id.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }
    }
    matches
}

// --- Schema manifest ---

/// Exported snapshot of a registry.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaManifest<'a> {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub type_names: Vec<String>,
    pub schema_hash: String,
    pub types: &'a [DocumentType],
}

impl<'a> SchemaManifest<'a> {
    pub fn build(registry: &'a SchemaRegistry) -> Result<Self, PipelineError> {
        Ok(Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            type_names: registry.names().into_iter().map(str::to_string).collect(),
            schema_hash: compute_schema_hash(registry.list())?,
            types: registry.list(),
        })
    }
}

/// The part of a manifest needed to compare it with the current schemas.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestHeader {
    pub schema_version: String,
    pub schema_hash: String,
    #[serde(default)]
    pub type_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestCheck {
    pub manifest_version: String,
    pub current_version: String,
    pub hash_matches: bool,
    pub missing_types: Vec<String>,
    pub added_types: Vec<String>,
}

fn parse_version(raw: &str) -> Result<semver::Version, PipelineError> {
    semver::Version::parse(raw).map_err(|_| PipelineError::InvalidVersion(raw.to_string()))
}

/// Compare a manifest with the current registry. A manifest is compatible
/// when it shares the major version, is not newer than this crate and not
/// older than [`MIN_MANIFEST_VERSION`].
pub fn verify_manifest(
    header: &ManifestHeader,
    registry: &SchemaRegistry,
) -> Result<ManifestCheck, PipelineError> {
    let current = parse_version(SCHEMA_VERSION)?;
    let minimum = parse_version(MIN_MANIFEST_VERSION)?;
    let manifest = parse_version(&header.schema_version)?;

    if manifest.major != current.major || manifest > current || manifest < minimum {
        return Err(PipelineError::ManifestVersion {
            manifest: header.schema_version.clone(),
            current: SCHEMA_VERSION.to_string(),
        });
    }

    let current_names = registry.names();
    let missing_types = header
        .type_names
        .iter()
        .filter(|name| !current_names.contains(&name.as_str()))
        .cloned()
        .collect();
    let added_types = current_names
        .iter()
        .filter(|name| !header.type_names.iter().any(|n| n == *name))
        .map(|name| name.to_string())
        .collect();

    Ok(ManifestCheck {
        manifest_version: header.schema_version.clone(),
        current_version: SCHEMA_VERSION.to_string(),
        hash_matches: compute_schema_hash(registry.list())? == header.schema_hash,
        missing_types,
        added_types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_deep() {
        let mut base = json!({"a": {"x": 1, "y": 2}, "b": 1});
        merge(&mut base, json!({"a": {"y": 3}, "c": [1]}));
        assert_eq!(base, json!({"a": {"x": 1, "y": 3}, "b": 1, "c": [1]}));
    }

    #[test]
    fn test_reference_shape() {
        assert_eq!(reference("av-1"), json!({"_type": "reference", "_ref": "av-1"}));
    }

    #[test]
    fn test_manifest_version_window() {
        let registry = SchemaRegistry::studio();
        let manifest = SchemaManifest::build(&registry).unwrap();
        let header = ManifestHeader {
            schema_version: manifest.schema_version.clone(),
            schema_hash: manifest.schema_hash.clone(),
            type_names: manifest.type_names.clone(),
        };
        let check = verify_manifest(&header, &registry).unwrap();
        assert!(check.hash_matches);
        assert!(check.missing_types.is_empty() && check.added_types.is_empty());

        let newer = ManifestHeader {
            schema_version: "99.0.0".to_string(),
            ..header.clone()
        };
        assert!(matches!(
            verify_manifest(&newer, &registry),
            Err(PipelineError::ManifestVersion { .. })
        ));

        let garbage = ManifestHeader {
            schema_version: "one".to_string(),
            ..header
        };
        assert!(matches!(
            verify_manifest(&garbage, &registry),
            Err(PipelineError::InvalidVersion(_))
        ));
    }
}
