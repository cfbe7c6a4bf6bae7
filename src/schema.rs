//! Schema Model - Declarative Record Shapes
//!
//! A document type is a tree of fields. Constraints are plain descriptors;
//! nothing in this module evaluates them (see `validation`).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::preview::{lookup, Preview, PreviewOutput, Selection};

/// Upper bound for every slug field.
pub const SLUG_MAX_LENGTH: usize = 96;

/// Constraint descriptor evaluated by [`crate::validation::evaluate_constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "param", rename_all = "camelCase")]
pub enum Constraint {
    Required,
    MinValue(f64),
    MaxValue(f64),
    MaxLength(usize),
}

/// One entry of a closed option list. `value` is the stored token, `label`
/// is display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    #[serde(rename = "title")]
    pub label: String,
    pub value: String,
}

impl OptionItem {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

pub fn option_list(items: &[(&str, &str)]) -> Vec<OptionItem> {
    items
        .iter()
        .map(|(label, value)| OptionItem::new(label, value))
        .collect()
}

/// The host's `options` record: a closed option list and the image hotspot
/// switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<OptionItem>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hotspot: bool,
}

impl FieldOptions {
    pub fn hotspot() -> Self {
        Self {
            list: vec![],
            hotspot: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty() && !self.hotspot
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldType {
    String,
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rows: Option<u32>,
    },
    Number,
    Boolean,
    Date,
    Datetime,
    Url,
    Slug {
        source: String,
        #[serde(rename = "maxLength")]
        max_length: usize,
    },
    Image,
    Object {
        fields: Vec<Field>,
    },
    Array {
        of: Vec<ArrayMember>,
    },
    Reference {
        to: Vec<String>,
    },
}

impl FieldType {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text { .. } => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Url => "url",
            FieldType::Slug { .. } => "slug",
            FieldType::Image => "image",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
            FieldType::Reference { .. } => "reference",
        }
    }
}

/// Member schema allowed inside an array field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ArrayMember {
    String,
    Image {
        #[serde(default, skip_serializing_if = "FieldOptions::is_empty")]
        options: FieldOptions,
    },
    Object {
        fields: Vec<Field>,
    },
    /// Rich-text paragraph
    Block {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        styles: Vec<OptionItem>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        decorators: Vec<OptionItem>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        annotations: Vec<Field>,
    },
    Code {
        rows: u32,
    },
}

impl ArrayMember {
    pub fn type_name(&self) -> &'static str {
        match self {
            ArrayMember::String => "string",
            ArrayMember::Image { .. } => "image",
            ArrayMember::Object { .. } => "object",
            ArrayMember::Block { .. } => "block",
            ArrayMember::Code { .. } => "code",
        }
    }

    /// Image member with hotspot cropping.
    pub fn image() -> Self {
        ArrayMember::Image {
            options: FieldOptions::hotspot(),
        }
    }

    /// Plain paragraph block with the host defaults.
    pub fn block() -> Self {
        ArrayMember::Block {
            styles: vec![],
            decorators: vec![],
            annotations: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    pub title: String,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "FieldOptions::is_empty")]
    pub options: FieldOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<Value>,
}

impl Field {
    pub fn new(name: &str, title: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            field_type,
            description: None,
            options: FieldOptions::default(),
            validation: vec![],
            initial_value: None,
        }
    }

    pub fn string(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::String)
    }

    pub fn text(name: &str, title: &str, rows: u32) -> Self {
        Self::new(name, title, FieldType::Text { rows: Some(rows) })
    }

    pub fn number(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Number)
    }

    pub fn boolean(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Boolean)
    }

    pub fn date(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Date)
    }

    pub fn datetime(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Datetime)
    }

    pub fn url(name: &str, title: &str) -> Self {
        Self::new(name, title, FieldType::Url)
    }

    /// Slug derived from `source`, capped at [`SLUG_MAX_LENGTH`].
    pub fn slug(name: &str, title: &str, source: &str) -> Self {
        Self::new(
            name,
            title,
            FieldType::Slug {
                source: source.to_string(),
                max_length: SLUG_MAX_LENGTH,
            },
        )
    }

    pub fn image(name: &str, title: &str) -> Self {
        let mut field = Self::new(name, title, FieldType::Image);
        field.options = FieldOptions::hotspot();
        field
    }

    pub fn object(name: &str, title: &str, fields: Vec<Field>) -> Self {
        Self::new(name, title, FieldType::Object { fields })
    }

    pub fn array(name: &str, title: &str, of: Vec<ArrayMember>) -> Self {
        Self::new(name, title, FieldType::Array { of })
    }

    pub fn strings(name: &str, title: &str) -> Self {
        Self::array(name, title, vec![ArrayMember::String])
    }

    pub fn images(name: &str, title: &str) -> Self {
        Self::array(name, title, vec![ArrayMember::image()])
    }

    /// Array whose members all share one object shape.
    pub fn objects(name: &str, title: &str, fields: Vec<Field>) -> Self {
        Self::array(name, title, vec![ArrayMember::Object { fields }])
    }

    pub fn reference(name: &str, title: &str, to: &[&str]) -> Self {
        Self::new(
            name,
            title,
            FieldType::Reference {
                to: to.iter().map(|t| t.to_string()).collect(),
            },
        )
    }

    pub fn required(mut self) -> Self {
        self.validation.push(Constraint::Required);
        self
    }

    pub fn min(mut self, value: f64) -> Self {
        self.validation.push(Constraint::MinValue(value));
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.validation.push(Constraint::MaxValue(value));
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.validation.push(Constraint::MaxLength(length));
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn options(mut self, items: &[(&str, &str)]) -> Self {
        self.options.list = option_list(items);
        self
    }

    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.validation.contains(&Constraint::Required)
    }

    pub fn allows(&self, token: &str) -> bool {
        let list = &self.options.list;
        list.is_empty() || list.iter().any(|item| item.value == token)
    }

    /// Sub-fields when this field is a nested object.
    pub fn sub_fields(&self) -> Option<&[Field]> {
        match &self.field_type {
            FieldType::Object { fields } => Some(fields),
            _ => None,
        }
    }

    /// Every record nested below this field: object sub-fields, object
    /// members of arrays and block annotations.
    pub fn nested_records(&self) -> Vec<&[Field]> {
        match &self.field_type {
            FieldType::Object { fields } => vec![fields.as_slice()],
            FieldType::Array { of } => of
                .iter()
                .filter_map(|member| match member {
                    ArrayMember::Object { fields } => Some(fields.as_slice()),
                    ArrayMember::Block { annotations, .. } if !annotations.is_empty() => {
                        Some(annotations.as_slice())
                    }
                    _ => None,
                })
                .collect(),
            _ => vec![],
        }
    }
}

/// Resolve a dotted path (`carbonMetrics.totalCredits`) through nested
/// objects.
pub fn resolve_path<'a>(fields: &'a [Field], path: &str) -> Option<&'a Field> {
    let mut segments = path.split('.');
    let head = segments.next()?;
    let mut current = fields.iter().find(|f| f.name == head)?;
    for segment in segments {
        current = current.sub_fields()?.iter().find(|f| f.name == segment)?;
    }
    Some(current)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Document,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentType {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

impl DocumentType {
    pub fn new(name: &str, title: &str, fields: Vec<Field>) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            kind: SchemaKind::Document,
            fields,
            preview: None,
        }
    }

    pub fn with_preview(mut self, preview: Preview) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn resolve_path(&self, path: &str) -> Option<&Field> {
        resolve_path(&self.fields, path)
    }

    /// New document carrying `_type` and every declared initial value.
    pub fn initial_document(&self) -> Value {
        let mut doc = initial_values(&self.fields);
        doc.insert("_type".to_string(), Value::String(self.name.clone()));
        Value::Object(doc)
    }

    /// Fill slug fields that have no `current` value from their source field.
    pub fn derive_slugs(&self, document: &mut Value) {
        if let Value::Object(record) = document {
            fill_slugs(&self.fields, record);
        }
    }

    /// Display pair for a stored document. Types without a projection show
    /// their `title` (or `name`) field and no subtitle.
    pub fn preview(&self, document: &Value) -> PreviewOutput {
        match &self.preview {
            Some(preview) => preview.project(document),
            None => {
                let title = lookup(document, "title")
                    .or_else(|| lookup(document, "name"))
                    .cloned()
                    .unwrap_or(Value::Null);
                let mut selection = Selection::default();
                selection.insert("title", title);
                PreviewOutput::titled(selection.title("title"))
            }
        }
    }
}

fn initial_values(fields: &[Field]) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = &field.initial_value {
            out.insert(field.name.clone(), value.clone());
        } else if let Some(sub_fields) = field.sub_fields() {
            let nested = initial_values(sub_fields);
            if !nested.is_empty() {
                out.insert(field.name.clone(), Value::Object(nested));
            }
        }
    }
    out
}

fn fill_slugs(fields: &[Field], record: &mut Map<String, Value>) {
    for field in fields {
        match &field.field_type {
            FieldType::Slug { source, max_length } => {
                let has_current = record
                    .get(&field.name)
                    .and_then(|v| v.get("current"))
                    .and_then(Value::as_str)
                    .is_some_and(|s| !s.is_empty());
                if has_current {
                    continue;
                }
                let derived = record
                    .get(source)
                    .and_then(Value::as_str)
                    .map(|s| slugify(s, *max_length));
                if let Some(current) = derived.filter(|s| !s.is_empty()) {
                    record.insert(
                        field.name.clone(),
                        json!({"_type": "slug", "current": current}),
                    );
                }
            }
            FieldType::Object { fields } => {
                if let Some(Value::Object(nested)) = record.get_mut(&field.name) {
                    fill_slugs(fields, nested);
                }
            }
            _ => {}
        }
    }
}

/// Lowercase ASCII slug: alphanumeric runs joined by `-`, at most
/// `max_length` characters, never ending in `-`. Latin letters with
/// diacritics fold to their base letter; other non-ASCII characters act as
/// separators.
pub fn slugify(source: &str, max_length: usize) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in source.chars().flat_map(char::to_lowercase) {
        let folded = match ch {
            c if c.is_ascii_alphanumeric() => Some(FoldedChar::Ascii(c)),
            c => fold_latin(c).map(FoldedChar::Text),
        };
        let Some(folded) = folded else {
            pending_dash = true;
            continue;
        };
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        match folded {
            FoldedChar::Ascii(c) => slug.push(c),
            FoldedChar::Text(text) => slug.push_str(text),
        }
    }
    slug.truncate(max_length);
    slug.trim_end_matches('-').to_string()
}

enum FoldedChar {
    Ascii(char),
    Text(&'static str),
}

/// Base letters for lowercase Latin-1 and Latin Extended-A letters.
fn fold_latin(ch: char) -> Option<&'static str> {
    let base = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(base)
}
