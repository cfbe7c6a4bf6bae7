//! Validation System - Schema Rules and Document Constraints
//!
//! Schema rules check the definitions themselves (unique names, slug
//! sources, option tokens, preview paths). The document validator evaluates
//! constraint descriptors against stored JSON. Both produce structured
//! violations; `FailureMode` maps them to a verdict.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

use crate::content::{ContentBlock, Paragraph, DECORATORS};
use crate::registry::SchemaRegistry;
use crate::schema::{
    ArrayMember, Constraint, DocumentType, Field, FieldType, OptionItem, SLUG_MAX_LENGTH,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ValidationViolation {
    pub fn error(rule: &str, path: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            severity: ViolationSeverity::Error,
            path: path.to_string(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    pub fn warning(rule: &str, path: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ViolationSeverity::Warning,
            ..Self::error(rule, path, message)
        }
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    pub document_type: String,
}

impl ValidationResult {
    pub fn success(document_type: &DocumentType) -> Self {
        Self {
            valid: true,
            violations: vec![],
            document_type: document_type.name.clone(),
        }
    }

    pub fn failure(document_type: &DocumentType, violations: Vec<ValidationViolation>) -> Self {
        Self {
            valid: false,
            violations,
            document_type: document_type.name.clone(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }
}

/// What a failed check does to the verdict.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Errors invalidate the document; warnings alone do not.
    #[default]
    Block,
    /// Never invalidate, only record.
    Warn,
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Every record in a field tree with its dotted prefix, root first.
fn records<'a>(fields: &'a [Field], prefix: &str, out: &mut Vec<(String, &'a [Field])>) {
    out.push((prefix.to_string(), fields));
    for field in fields {
        let path = join_path(prefix, &field.name);
        for nested in field.nested_records() {
            records(nested, &path, out);
        }
    }
}

fn all_records(document_type: &DocumentType) -> Vec<(String, &[Field])> {
    let mut out = Vec::new();
    records(&document_type.fields, &document_type.name, &mut out);
    out
}

// --- Schema rules ---

/// Structural rule over one document type definition.
pub trait SchemaRule {
    fn name(&self) -> &'static str;
    fn check(&self, document_type: &DocumentType) -> Vec<ValidationViolation>;
}

pub struct FieldMetadataRule;

impl SchemaRule for FieldMetadataRule {
    fn name(&self) -> &'static str { "field_metadata" }

    fn check(&self, document_type: &DocumentType) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        if document_type.name.trim().is_empty() || document_type.title.trim().is_empty() {
            violations.push(ValidationViolation::error(
                self.name(),
                &document_type.name,
                "Document type needs a name and a title",
            ));
        }
        for (prefix, fields) in all_records(document_type) {
            for field in fields {
                if field.name.trim().is_empty() || field.title.trim().is_empty() {
                    violations.push(
                        ValidationViolation::error(
                            self.name(),
                            &join_path(&prefix, &field.name),
                            "Field needs a name and a title",
                        )
                        .actual(format!("name={:?} title={:?}", field.name, field.title)),
                    );
                }
            }
        }
        violations
    }
}

pub struct UniqueFieldNamesRule;

impl SchemaRule for UniqueFieldNamesRule {
    fn name(&self) -> &'static str { "unique_field_names" }

    fn check(&self, document_type: &DocumentType) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for (prefix, fields) in all_records(document_type) {
            let mut seen = HashSet::new();
            for field in fields {
                if !seen.insert(field.name.as_str()) {
                    violations.push(ValidationViolation::error(
                        self.name(),
                        &join_path(&prefix, &field.name),
                        format!("Field name '{}' is declared more than once", field.name),
                    ));
                }
            }
        }
        violations
    }
}

pub struct SlugSourceRule;

impl SchemaRule for SlugSourceRule {
    fn name(&self) -> &'static str { "slug_source" }

    fn check(&self, document_type: &DocumentType) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for (prefix, fields) in all_records(document_type) {
            for field in fields {
                let FieldType::Slug { source, max_length } = &field.field_type else {
                    continue;
                };
                let path = join_path(&prefix, &field.name);
                let has_source = fields.iter().any(|f| f.name == *source && f.name != field.name);
                if !has_source {
                    violations.push(
                        ValidationViolation::error(self.name(), &path, "Slug source is not a sibling field")
                            .actual(source.clone()),
                    );
                }
                if *max_length == 0 || *max_length > SLUG_MAX_LENGTH {
                    violations.push(
                        ValidationViolation::error(self.name(), &path, "Slug max length out of range")
                            .expected(format!("1..={SLUG_MAX_LENGTH}"))
                            .actual(max_length.to_string()),
                    );
                }
            }
        }
        violations
    }
}

pub struct UniqueOptionValuesRule;

impl UniqueOptionValuesRule {
    fn check_list<'a>(
        &self,
        path: &str,
        values: impl Iterator<Item = &'a str>,
        violations: &mut Vec<ValidationViolation>,
    ) {
        let mut seen = HashSet::new();
        for value in values {
            if value.trim().is_empty() {
                violations.push(ValidationViolation::error(self.name(), path, "Option value is empty"));
            } else if !seen.insert(value) {
                violations.push(
                    ValidationViolation::error(self.name(), path, "Option value is listed more than once")
                        .actual(value.to_string()),
                );
            }
        }
    }
}

impl SchemaRule for UniqueOptionValuesRule {
    fn name(&self) -> &'static str { "unique_option_values" }

    fn check(&self, document_type: &DocumentType) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for (prefix, fields) in all_records(document_type) {
            for field in fields {
                let path = join_path(&prefix, &field.name);
                self.check_list(&path, field.options.list.iter().map(|o| o.value.as_str()), &mut violations);
                if let FieldType::Array { of } = &field.field_type {
                    for member in of {
                        if let ArrayMember::Block { styles, decorators, .. } = member {
                            self.check_list(&path, styles.iter().map(|o| o.value.as_str()), &mut violations);
                            self.check_list(&path, decorators.iter().map(|o| o.value.as_str()), &mut violations);
                        }
                    }
                }
            }
        }
        violations
    }
}

pub struct PreviewPathsRule;

impl SchemaRule for PreviewPathsRule {
    fn name(&self) -> &'static str { "preview_paths" }

    fn check(&self, document_type: &DocumentType) -> Vec<ValidationViolation> {
        let Some(preview) = &document_type.preview else {
            return vec![];
        };
        preview
            .select
            .iter()
            .filter(|(_, path)| document_type.resolve_path(path).is_none())
            .map(|(key, path)| {
                ValidationViolation::error(
                    self.name(),
                    &join_path(&document_type.name, "preview"),
                    format!("Preview key '{key}' selects an undeclared field"),
                )
                .actual(path.clone())
            })
            .collect()
    }
}

/// Runs every schema rule over single types or a whole registry.
pub struct SchemaValidator {
    rules: Vec<Box<dyn SchemaRule>>,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(FieldMetadataRule),
                Box::new(UniqueFieldNamesRule),
                Box::new(SlugSourceRule),
                Box::new(UniqueOptionValuesRule),
                Box::new(PreviewPathsRule),
            ],
        }
    }

    pub fn validate(&self, document_type: &DocumentType) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(document_type))
            .collect();
        debug!(document_type = %document_type.name, violations = violations.len(), "checked schema");
        if violations.is_empty() {
            ValidationResult::success(document_type)
        } else {
            ValidationResult::failure(document_type, violations)
        }
    }

    /// Per-type rules plus the checks that need the whole registry:
    /// duplicate type names and reference targets.
    pub fn validate_registry(&self, registry: &SchemaRegistry) -> RegistryReport {
        let mut violations = vec![];
        let mut seen = HashSet::new();
        for document_type in registry.list() {
            if !seen.insert(document_type.name.as_str()) {
                violations.push(ValidationViolation::error(
                    "duplicate_type_name",
                    &document_type.name,
                    format!("Document type '{}' is registered more than once", document_type.name),
                ));
            }
            violations.extend(self.validate(document_type).violations);
            violations.extend(reference_target_violations(document_type, registry));
        }
        RegistryReport {
            valid: violations.iter().all(|v| v.severity != ViolationSeverity::Error),
            types: registry.len(),
            violations,
        }
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn reference_target_violations(
    document_type: &DocumentType,
    registry: &SchemaRegistry,
) -> Vec<ValidationViolation> {
    let mut violations = vec![];
    for (prefix, fields) in all_records(document_type) {
        for field in fields {
            let FieldType::Reference { to } = &field.field_type else {
                continue;
            };
            let path = join_path(&prefix, &field.name);
            if to.is_empty() {
                violations.push(ValidationViolation::error("reference_targets", &path, "Reference has no target type"));
            }
            for target in to.iter().filter(|t| registry.get(t).is_none()) {
                violations.push(
                    ValidationViolation::error("reference_targets", &path, "Reference targets an unregistered type")
                        .actual(target.clone()),
                );
            }
        }
    }
    violations
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryReport {
    pub valid: bool,
    pub types: usize,
    pub violations: Vec<ValidationViolation>,
}

// --- Document validation ---

/// A slug is blank until it has a non-empty `current`, whatever its `_type`.
fn is_blank(field_type: &FieldType, value: &Value) -> bool {
    match (field_type, value) {
        (_, Value::Null) => true,
        (FieldType::Slug { .. }, Value::Object(map)) => map
            .get("current")
            .and_then(Value::as_str)
            .map_or(true, |s| s.trim().is_empty()),
        (_, Value::String(s)) => s.trim().is_empty(),
        (_, Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

/// Evaluate one constraint against a field value (`None` when absent).
/// Range and length constraints ignore values of other kinds; type checks
/// report those.
pub fn evaluate_constraint(
    constraint: &Constraint,
    field_type: &FieldType,
    path: &str,
    value: Option<&Value>,
) -> Option<ValidationViolation> {
    match (constraint, value) {
        (Constraint::Required, None) => {
            Some(ValidationViolation::error("required", path, "Required field is missing"))
        }
        (Constraint::Required, Some(v)) if is_blank(field_type, v) => {
            Some(ValidationViolation::error("required", path, "Required field is empty"))
        }
        (Constraint::MinValue(min), Some(Value::Number(n))) => match n.as_f64() {
            Some(actual) if actual < *min => Some(
                ValidationViolation::error("min_value", path, "Value is below the minimum")
                    .expected(format!(">= {min}"))
                    .actual(actual.to_string()),
            ),
            _ => None,
        },
        (Constraint::MaxValue(max), Some(Value::Number(n))) => match n.as_f64() {
            Some(actual) if actual > *max => Some(
                ValidationViolation::error("max_value", path, "Value is above the maximum")
                    .expected(format!("<= {max}"))
                    .actual(actual.to_string()),
            ),
            _ => None,
        },
        (Constraint::MaxLength(max), Some(Value::String(s))) if s.chars().count() > *max => Some(
            ValidationViolation::error("max_length", path, "Text is too long")
                .expected(format!("<= {max} characters"))
                .actual(format!("{} characters", s.chars().count())),
        ),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(path: &str, expected: &str, value: &Value) -> ValidationViolation {
    ValidationViolation::error("type_mismatch", path, "Value has the wrong type")
        .expected(expected.to_string())
        .actual(json_kind(value).to_string())
}

fn is_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_datetime(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

fn is_url(s: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| s.len() > scheme.len() && s.starts_with(scheme))
}

/// Walks a document against its type, evaluating every constraint.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    failure_mode: FailureMode,
}

impl DocumentValidator {
    pub fn new(failure_mode: FailureMode) -> Self {
        Self { failure_mode }
    }

    pub fn validate(&self, document_type: &DocumentType, document: &Value) -> ValidationResult {
        let mut all_violations = vec![];
        match document {
            Value::Object(record) => {
                if let Some(tag) = record.get("_type").and_then(Value::as_str) {
                    if tag != document_type.name {
                        all_violations.push(
                            ValidationViolation::error("document_type", "_type", "Document type tag does not match")
                                .expected(document_type.name.clone())
                                .actual(tag.to_string()),
                        );
                    }
                }
                check_record(&document_type.fields, record, "", &mut all_violations);
            }
            other => all_violations.push(type_mismatch("", "object", other)),
        }
        debug!(
            document_type = %document_type.name,
            violations = all_violations.len(),
            "validated document"
        );

        let has_errors = all_violations
            .iter()
            .any(|v| v.severity == ViolationSeverity::Error);

        match self.failure_mode {
            FailureMode::Block if has_errors => ValidationResult::failure(document_type, all_violations),
            // Warnings don't block
            FailureMode::Block => ValidationResult::success(document_type),
            FailureMode::Warn => ValidationResult {
                valid: true,
                violations: all_violations,
                document_type: document_type.name.clone(),
            },
        }
    }
}

fn check_record(
    fields: &[Field],
    record: &Map<String, Value>,
    prefix: &str,
    out: &mut Vec<ValidationViolation>,
) {
    for field in fields {
        let path = join_path(prefix, &field.name);
        let value = record.get(&field.name).filter(|v| !v.is_null());
        out.extend(
            field
                .validation
                .iter()
                .filter_map(|constraint| evaluate_constraint(constraint, &field.field_type, &path, value)),
        );
        if let Some(value) = value {
            check_value(field, value, &path, out);
        }
    }
    for key in record.keys() {
        if key.starts_with('_') || fields.iter().any(|f| &f.name == key) {
            continue;
        }
        out.push(ValidationViolation::warning(
            "unknown_field",
            &join_path(prefix, key),
            "Field is not declared in the schema",
        ));
    }
}

fn check_option(field: &Field, token: &str, path: &str, out: &mut Vec<ValidationViolation>) {
    if !field.allows(token) {
        let allowed: Vec<_> = field.options.list.iter().map(|o| o.value.as_str()).collect();
        out.push(
            ValidationViolation::error("option_value", path, "Value is not in the option list")
                .expected(allowed.join(", "))
                .actual(token.to_string()),
        );
    }
}

fn check_value(field: &Field, value: &Value, path: &str, out: &mut Vec<ValidationViolation>) {
    match (&field.field_type, value) {
        (FieldType::String, Value::String(s)) => check_option(field, s, path, out),
        (FieldType::Text { .. }, Value::String(_)) => {}
        (FieldType::Number, Value::Number(_)) => {}
        (FieldType::Boolean, Value::Bool(_)) => {}
        (FieldType::Date, Value::String(s)) if is_date(s) => {}
        (FieldType::Datetime, Value::String(s)) if is_datetime(s) => {}
        (FieldType::Url, Value::String(s)) if is_url(s) => {}
        (FieldType::Date | FieldType::Datetime | FieldType::Url, Value::String(s)) => out.push(
            ValidationViolation::error("format", path, "Text is not in the expected format")
                .expected(field.field_type.type_name().to_string())
                .actual(s.clone()),
        ),
        (FieldType::Slug { max_length, .. }, Value::Object(map)) => {
            match map.get("current") {
                Some(Value::String(current)) if current.chars().count() > *max_length => out.push(
                    ValidationViolation::error("max_length", path, "Slug is too long")
                        .expected(format!("<= {max_length} characters"))
                        .actual(format!("{} characters", current.chars().count())),
                ),
                Some(Value::String(_)) | None => {}
                Some(other) => out.push(type_mismatch(&join_path(path, "current"), "string", other)),
            }
        }
        (FieldType::Image, Value::Object(_)) => {}
        (FieldType::Object { fields }, Value::Object(map)) => check_record(fields, map, path, out),
        (FieldType::Reference { .. }, Value::Object(map)) => {
            if !map.get("_ref").is_some_and(Value::is_string) {
                out.push(ValidationViolation::error("reference", path, "Reference has no _ref id"));
            }
        }
        (FieldType::Array { of }, Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                check_member(field, of, item, &format!("{path}[{index}]"), out);
            }
        }
        (field_type, other) => out.push(type_mismatch(path, field_type.type_name(), other)),
    }
}

fn check_member(
    field: &Field,
    of: &[ArrayMember],
    item: &Value,
    path: &str,
    out: &mut Vec<ValidationViolation>,
) {
    let expected = || of.iter().map(ArrayMember::type_name).collect::<Vec<_>>().join(" | ");
    match item {
        Value::String(s) if of.contains(&ArrayMember::String) => check_option(field, s, path, out),
        Value::Object(map) => {
            let tag = map.get("_type").and_then(Value::as_str);
            let accepts_tag = |name: &str| of.iter().any(|m| m.type_name() == name);
            match tag {
                Some(tag @ ("block" | "image" | "code")) if accepts_tag(tag) => {
                    match serde_json::from_value::<ContentBlock>(item.clone()) {
                        Ok(block) => {
                            if let ContentBlock::Block(paragraph) = &block {
                                check_paragraph(of, paragraph, path, out);
                            }
                            out.extend(
                                block
                                    .issues()
                                    .into_iter()
                                    .map(|issue| ValidationViolation::warning("content_block", path, issue)),
                            );
                        }
                        Err(error) => out.push(
                            ValidationViolation::error("content_block", path, "Malformed content block")
                                .expected(tag.to_string())
                                .actual(error.to_string()),
                        ),
                    }
                }
                _ => match of.iter().find_map(|m| match m {
                    ArrayMember::Object { fields } => Some(fields),
                    _ => None,
                }) {
                    Some(fields) => check_record(fields, map, path, out),
                    None => out.push(type_mismatch(path, &expected(), item)),
                },
            }
        }
        other => out.push(type_mismatch(path, &expected(), other)),
    }
}

fn tokens(items: &[OptionItem]) -> Vec<&str> {
    items.iter().map(|o| o.value.as_str()).collect()
}

/// Style and decorator marks of a paragraph against the block member's
/// declared lists. An empty list leaves the host defaults in force.
fn check_paragraph(
    of: &[ArrayMember],
    paragraph: &Paragraph,
    path: &str,
    out: &mut Vec<ValidationViolation>,
) {
    let Some((styles, decorators)) = of.iter().find_map(|m| match m {
        ArrayMember::Block { styles, decorators, .. } => Some((styles, decorators)),
        _ => None,
    }) else {
        return;
    };
    let allowed_styles = tokens(styles);
    if !allowed_styles.is_empty() && !allowed_styles.contains(&paragraph.style.as_str()) {
        out.push(
            ValidationViolation::error("option_value", &join_path(path, "style"), "Block style is not allowed")
                .expected(allowed_styles.join(", "))
                .actual(paragraph.style.clone()),
        );
    }

    let allowed_marks = tokens(decorators);
    if allowed_marks.is_empty() {
        return;
    }
    for (index, span) in paragraph.children.iter().enumerate() {
        for mark in &span.marks {
            let is_decorator = DECORATORS.contains(&mark.as_str())
                && !paragraph.mark_defs.iter().any(|def| &def.key == mark);
            if is_decorator && !allowed_marks.contains(&mark.as_str()) {
                out.push(
                    ValidationViolation::error(
                        "option_value",
                        &format!("{path}.children[{index}].marks"),
                        "Decorator is not allowed",
                    )
                    .expected(allowed_marks.join(", "))
                    .actual(mark.clone()),
                );
            }
        }
    }
}
