//! Content Blocks - Rich Body Values
//!
//! Body arrays hold paragraphs, images and raw code. Each variant is tagged
//! by `_type` exactly as the studio stores it, so a body can be decoded
//! straight from document JSON and rendered with an exhaustive match.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "lowercase")]
pub enum ContentBlock {
    Block(Paragraph),
    Image(ImageBlock),
    Code(CodeBlock),
}

impl ContentBlock {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Block(_) => "block",
            ContentBlock::Image(_) => "image",
            ContentBlock::Code(_) => "code",
        }
    }

    /// Problems that decode fine but make the block unusable.
    pub fn issues(&self) -> Vec<String> {
        match self {
            ContentBlock::Block(paragraph) => paragraph
                .children
                .iter()
                .flat_map(|span| span.marks.iter())
                .filter(|mark| !DECORATORS.contains(&mark.as_str()))
                .filter(|mark| paragraph.mark_def(mark).is_none())
                .map(|mark| format!("mark '{mark}' has no definition"))
                .collect(),
            ContentBlock::Image(image) => {
                let mut issues = vec![];
                if image.asset.is_none() {
                    issues.push("image has no asset".to_string());
                }
                if let Some(hotspot) = &image.hotspot {
                    if !hotspot.in_bounds() {
                        issues.push("hotspot lies outside the image".to_string());
                    }
                }
                issues
            }
            ContentBlock::Code(_) => vec![],
        }
    }
}

/// Decorator marks that need no definition.
pub const DECORATORS: &[&str] = &["strong", "em", "code", "underline", "strike-through"];

fn default_style() -> String {
    "normal".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDef>,
}

impl Paragraph {
    fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|def| def.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// Annotation referenced from span marks by key (links).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspot: Option<Hotspot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref")]
    pub reference: String,
}

/// Focus area chosen in the studio, as fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Hotspot {
    pub fn in_bounds(&self) -> bool {
        let unit = 0.0..=1.0;
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| unit.contains(v))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Render a body as Markdown.
pub fn render_markdown(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(block: &ContentBlock) -> String {
    match block {
        ContentBlock::Block(paragraph) => {
            let text: String = paragraph
                .children
                .iter()
                .map(|span| render_span(paragraph, span))
                .collect();
            let prefix = match paragraph.style.as_str() {
                "h1" => "# ",
                "h2" => "## ",
                "h3" => "### ",
                "blockquote" => "> ",
                _ => "",
            };
            format!("{prefix}{text}")
        }
        ContentBlock::Image(image) => {
            let alt = image.alt.as_deref().unwrap_or("image");
            let target = image.asset.as_ref().map_or("", |a| a.reference.as_str());
            format!("![{alt}]({target})")
        }
        ContentBlock::Code(code) => {
            let language = code.language.as_deref().unwrap_or("");
            format!("```{language}\n{}\n```", code.code)
        }
    }
}

fn render_span(paragraph: &Paragraph, span: &Span) -> String {
    let mut text = span.text.clone();
    for mark in &span.marks {
        text = match mark.as_str() {
            "strong" => format!("**{text}**"),
            "em" => format!("_{text}_"),
            "code" => format!("`{text}`"),
            key => match paragraph.mark_def(key).and_then(|def| def.href.as_deref()) {
                Some(href) => format!("[{text}]({href})"),
                None => text,
            },
        };
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> Vec<ContentBlock> {
        serde_json::from_value(json!([
            {
                "_type": "block",
                "_key": "a1",
                "style": "h2",
                "children": [{"_type": "span", "text": "Getting started", "marks": []}],
                "markDefs": []
            },
            {
                "_type": "block",
                "children": [
                    {"_type": "span", "text": "Read ", "marks": []},
                    {"_type": "span", "text": "the docs", "marks": ["strong", "l1"]}
                ],
                "markDefs": [{"_key": "l1", "_type": "link", "href": "https://docs.oasis"}]
            },
            {
                "_type": "image",
                "asset": {"_type": "reference", "_ref": "image-abc-200x200-png"},
                "hotspot": {"x": 0.5, "y": 0.5, "width": 0.2, "height": 0.2}
            },
            {"_type": "code", "code": "let x = 1;", "language": "rust"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_decodes_each_variant() {
        let kinds: Vec<_> = body().iter().map(ContentBlock::kind).collect();
        assert_eq!(kinds, vec!["block", "block", "image", "code"]);
        assert!(body().iter().all(|b| b.issues().is_empty()));
    }

    #[test]
    fn test_render_markdown() {
        let rendered = render_markdown(&body());
        assert_eq!(
            rendered,
            "## Getting started\n\nRead [**the docs**](https://docs.oasis)\n\n\
             ![image](image-abc-200x200-png)\n\n```rust\nlet x = 1;\n```"
        );
    }

    #[test]
    fn test_issues() {
        let block: ContentBlock = serde_json::from_value(json!({
            "_type": "image",
            "hotspot": {"x": 1.5, "y": 0.0, "width": 0.1, "height": 0.1}
        }))
        .unwrap();
        assert_eq!(block.issues().len(), 2);

        let block: ContentBlock = serde_json::from_value(json!({
            "_type": "block",
            "children": [{"text": "x", "marks": ["missing"]}]
        }))
        .unwrap();
        assert_eq!(block.issues(), vec!["mark 'missing' has no definition".to_string()]);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let result = serde_json::from_value::<ContentBlock>(json!({"_type": "video"}));
        assert!(result.is_err());
    }
}
