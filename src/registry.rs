//! Schema Registry - Single Composition Point
//!
//! Insertion order is listing order. The registry never deduplicates or
//! validates; see `validation::SchemaValidator::validate_registry`.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::schema::DocumentType;
use crate::types;

pub type TypeName = String;

/// Ordered collection of document types handed to the studio.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: Vec<DocumentType>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// The seven types registered with the studio, in studio order.
    pub fn studio() -> Self {
        let mut registry = Self::new();
        registry.register(types::retreat());
        registry.register(types::housing());
        registry.register(types::carbon_credit());
        registry.register(types::content_creator_simple());
        registry.register(types::simple_test());
        registry.register(types::oasis_avatar());
        registry.register(types::star_template());
        debug!(count = registry.len(), "built studio schema registry");
        registry
    }

    /// Studio types followed by the definitions the studio does not load.
    pub fn catalog() -> Self {
        let mut registry = Self::studio();
        registry.register(types::content_creator());
        registry.register(types::retreat_simple());
        debug!(count = registry.len(), "built schema catalog");
        registry
    }

    pub fn register(&mut self, document_type: DocumentType) {
        self.types.push(document_type);
    }

    pub fn get(&self, name: &str) -> Option<&DocumentType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn list(&self) -> &[DocumentType] {
        &self.types
    }

    pub fn names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Write one `<name>.json` file per type into `dir`, creating it if
    /// needed. Returns the written type names in order.
    pub fn export_to_dir(&self, dir: &Path) -> Result<Vec<TypeName>, std::io::Error> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.types.len());
        for document_type in &self.types {
            let path = dir.join(format!("{}.json", document_type.name));
            let content = serde_json::to_string_pretty(document_type)?;
            fs::write(&path, content)?;
            debug!(path = %path.display(), "exported schema type");
            written.push(document_type.name.clone());
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_studio_order() {
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
    fn test_catalog_extends_studio() {
        let registry = SchemaRegistry::catalog();
        assert_eq!(registry.len(), 9);
        assert_eq!(&registry.names()[7..], &["contentCreator", "retreatSimple"]);
    }

    #[test]
    fn test_register_keeps_duplicates() {
        let mut registry = SchemaRegistry::new();
        registry.register(types::simple_test());
        registry.register(types::simple_test());
        assert_eq!(registry.len(), 2);
        assert!(registry.get("simpleTest").is_some());
        assert!(registry.get("missing").is_none());
    }
}
