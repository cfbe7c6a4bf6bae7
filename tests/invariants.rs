//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use oasis_schemas::{
    hashing::{canonical_json, compute_schema_hash},
    pipeline::{match_templates_to_content, mutation_payload, reference},
    preview::Selection,
    schema::{FieldType, SLUG_MAX_LENGTH},
    types::{carbon_credit, oasis_avatar},
    DocumentPipeline, FailureMode, SchemaRegistry, SchemaValidator, ViolationSeverity,
};

fn valid_retreat() -> Value {
    json!({
        "title": "Sacred Ohms Retreat",
        "description": "Five days of breathwork by the sea.",
        "avatar": reference("av-1"),
        "location": "Tulum, Mexico",
        "price": 2500,
        "maxParticipants": 20,
        "dates": {"start": "2026-03-01", "end": "2026-03-06"},
    })
}

#[test]
fn invariant_studio_registry_order() {
    let registry = SchemaRegistry::studio();
    assert_eq!(
        registry.names(),
        vec![
            "retreat",
            "housing",
            "carbonCredit",
            "contentCreatorSimple",
            "simpleTest",
            "oasisAvatar",
            "starTemplate",
        ]
    );
}

#[test]
fn invariant_catalog_schemas_are_well_formed() {
    // Field names, slug sources, option values and preview paths across every
    // known type, including the ones kept out of the studio.
    let report = SchemaValidator::new().validate_registry(&SchemaRegistry::catalog());
    let errors: Vec<_> = report
        .violations
        .iter()
        .filter(|v| v.severity == ViolationSeverity::Error)
        .map(|v| format!("{} {}: {}", v.rule, v.path, v.message))
        .collect();
    assert_eq!(errors, Vec::<String>::new());
    assert!(report.valid);
}

#[test]
fn invariant_slug_limits() {
    for document_type in SchemaRegistry::catalog().list() {
        for field in &document_type.fields {
            if let FieldType::Slug { source, max_length } = &field.field_type {
                assert!(*max_length <= SLUG_MAX_LENGTH, "{}.{}", document_type.name, field.name);
                assert!(document_type.field(source).is_some(), "{}.{}", document_type.name, field.name);
            }
        }
    }
}

#[test]
fn invariant_carbon_credit_missing_credits_show_zero() {
    let selection = Selection::from_value(&json!({
        "title": "Reef Restore",
        "avatarId": "av-1",
        "status": "planning",
        "projectType": "ocean_conservation",
    }));
    let output = carbon_credit::prepare(&selection);
    assert_eq!(output.title, "Reef Restore");
    assert_eq!(
        output.subtitle.as_deref(),
        Some("Avatar: av-1 | Type: ocean_conservation | Credits: 0 | Status: planning")
    );
}

#[test]
fn invariant_oasis_avatar_missing_karma_shows_zero() {
    let selection = Selection::from_value(&json!({
        "title": "alice",
        "avatarId": "a-42",
        "status": "active",
    }));
    let output = oasis_avatar::prepare(&selection);
    assert_eq!(output.title, "alice");
    assert_eq!(output.subtitle.as_deref(), Some("ID: a-42 | Karma: 0 | Status: active"));
}

#[test]
fn invariant_preview_never_fails_on_empty_documents() {
    for document_type in SchemaRegistry::catalog().list() {
        let output = document_type.preview(&json!({}));
        assert_eq!(output.title, "Untitled", "{}", document_type.name);
    }
}

#[test]
fn invariant_create_calls_validate() {
    // A document missing required fields must never become a mutation
    let pipeline = DocumentPipeline::default();

    let result = pipeline.prepare_create("retreat", json!({"title": "No price"}));

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Validation failed"));
    assert!(err.to_string().contains("price"));
}

#[test]
fn invariant_valid_document_creates() {
    let pipeline = DocumentPipeline::default();

    let prepared = pipeline.prepare_create("retreat", valid_retreat()).unwrap();
    assert!(prepared.validation.valid);
    assert_eq!(prepared.document_type, "retreat");
    assert_eq!(prepared.content_hash.len(), 64);

    let doc = &prepared.document;
    assert_eq!(doc["_type"], "retreat");
    assert_eq!(doc["_id"], prepared.id.as_str());
    assert_eq!(doc["slug"], json!({"_type": "slug", "current": "sacred-ohms-retreat"}));
    assert_eq!(doc["status"], "draft");
    assert_eq!(doc["currentParticipants"], 0);

    let payload = mutation_payload(&[prepared.clone()]);
    assert_eq!(payload["mutations"][0]["create"], prepared.document);
}

#[test]
fn invariant_supplied_id_is_kept() {
    let pipeline = DocumentPipeline::default();
    let mut retreat = valid_retreat();
    retreat["_id"] = json!("retreat-001");

    let prepared = pipeline.prepare_create("retreat", retreat).unwrap();
    assert_eq!(prepared.id, "retreat-001");
}

#[test]
fn invariant_content_hash_ignores_generated_ids() {
    let pipeline = DocumentPipeline::default();
    let a = pipeline.prepare_create("retreat", valid_retreat()).unwrap();
    let b = pipeline.prepare_create("retreat", valid_retreat()).unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.content_hash, b.content_hash);
}

#[test]
fn invariant_warn_mode_records_without_blocking() {
    let pipeline = DocumentPipeline::with_failure_mode(SchemaRegistry::studio(), FailureMode::Warn);

    let result = pipeline
        .validate_document("simpleTest", &json!({"description": "no title"}))
        .unwrap();
    assert!(result.valid);
    assert!(result.has_errors());
}

#[test]
fn invariant_type_not_found_error() {
    let pipeline = DocumentPipeline::default();

    let result = pipeline.prepare_create("retreatSimple", json!({"title": "x"}));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Document type not found"));

    let catalog = DocumentPipeline::new(SchemaRegistry::catalog());
    assert!(catalog.prepare_create("retreatSimple", json!({"title": "x"})).is_ok());
}

#[test]
fn invariant_validation_result_structure() {
    let pipeline = DocumentPipeline::default();

    let result = pipeline
        .validate_document(
            "carbonCredit",
            &json!({"title": "Reef", "projectType": "asteroid_mining"}),
        )
        .unwrap();

    assert!(!result.valid);
    assert!(!result.violations.is_empty());
    for v in &result.violations {
        assert!(!v.rule.is_empty());
        assert!(!v.path.is_empty());
        assert!(!v.message.is_empty());
    }
    assert_eq!(result.document_type, "carbonCredit");
}

#[test]
fn invariant_required_slug_needs_current() {
    let pipeline = DocumentPipeline::default();

    for slug in [json!({}), json!({"current": ""})] {
        let result = pipeline
            .validate_document("carbonCredit", &json!({"title": "Reef Restore", "slug": slug}))
            .unwrap();
        assert!(!result.valid);
        assert!(result
            .violations
            .iter()
            .any(|v| v.rule == "required" && v.path == "slug"));
    }
}

#[test]
fn invariant_body_blocks_follow_declared_styles() {
    let pipeline = DocumentPipeline::new(SchemaRegistry::catalog());

    let result = pipeline
        .validate_document(
            "contentCreator",
            &json!({"body": [{
                "_type": "block",
                "style": "h6",
                "children": [{"_type": "span", "text": "Hello", "marks": ["underline"]}]
            }]}),
        )
        .unwrap();

    let option_paths: Vec<_> = result
        .violations
        .iter()
        .filter(|v| v.rule == "option_value")
        .map(|v| v.path.as_str())
        .collect();
    assert_eq!(option_paths, vec!["body[0].style", "body[0].children[0].marks"]);
}

#[test]
fn invariant_schema_hash_stable() {
    let h1 = compute_schema_hash(SchemaRegistry::studio().list()).unwrap();
    let h2 = compute_schema_hash(SchemaRegistry::studio().list()).unwrap();
    assert_eq!(h1, h2);
}

#[test]
fn invariant_canonical_json_deterministic() {
    let obj1 = json!({"z": 1, "a": 2, "m": {"b": 1, "a": 2}});
    let obj2 = json!({"a": 2, "m": {"a": 2, "b": 1}, "z": 1});

    let c1 = canonical_json(&obj1).unwrap();
    let c2 = canonical_json(&obj2).unwrap();

    // Must be identical despite different input ordering
    assert_eq!(c1, c2);
}

#[test]
fn invariant_templates_match_content_by_type() {
    let templates = vec![
        json!({"_id": "t1", "_type": "starTemplate", "templateType": "retreat_booking"}),
        json!({"_id": "t2", "_type": "starTemplate", "templateType": "custom"}),
    ];
    let content = vec![
        json!({"_id": "r1", "_type": "retreat"}),
        json!({"_id": "h1", "_type": "housing"}),
        json!({"_type": "retreat"}),
    ];

    let matches = match_templates_to_content(&templates, &content);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].template_id, "t1");
    assert_eq!(matches[0].content_id, "r1");
}

#[test]
fn invariant_export_writes_one_file_per_type() {
    let dir = tempfile::tempdir().unwrap();
    let registry = SchemaRegistry::studio();

    let written = registry.export_to_dir(dir.path()).unwrap();
    assert_eq!(written.len(), 7);

    let raw = std::fs::read_to_string(dir.path().join("carbonCredit.json")).unwrap();
    let exported: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(exported["name"], "carbonCredit");
    assert_eq!(exported["type"], "document");
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_create_increments_validation_counter() {
    use oasis_schemas::pipeline::{get_validation_call_count, reset_validation_call_count};

    reset_validation_call_count();
    let pipeline = DocumentPipeline::default();
    let _ = pipeline.prepare_create("simpleTest", json!({"title": "hello"}));
    let _ = pipeline.prepare_create("simpleTest", json!({}));
    assert!(get_validation_call_count() >= 2);
}
