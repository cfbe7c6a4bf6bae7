//! Minimal document used to smoke-test the studio setup.

use crate::schema::{DocumentType, Field, FieldType};

pub const NAME: &str = "simpleTest";

pub fn simple_test() -> DocumentType {
    DocumentType::new(
        NAME,
        "Simple Test",
        vec![
            Field::string("title", "Title").required(),
            Field::new("description", "Description", FieldType::Text { rows: None }),
        ],
    )
}
