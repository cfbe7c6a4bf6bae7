//! Retreat listings and the simplified retreat form.

use crate::preview::{Preview, PreviewOutput, Selection};
use crate::schema::{DocumentType, Field, FieldType};

use super::{coordinates, crypto_price, nft_collection, published_at, tags};

pub const NAME: &str = "retreat";
pub const SIMPLE_NAME: &str = "retreatSimple";

pub fn retreat() -> DocumentType {
    DocumentType::new(
        NAME,
        "Retreat",
        vec![
            Field::string("title", "Title").required(),
            Field::slug("slug", "Slug", "title").required(),
            Field::text("description", "Description", 4).required(),
            Field::reference("avatar", "OASIS Avatar", &[super::oasis_avatar::NAME])
                .describe("The OASIS avatar that created this retreat")
                .required(),
            Field::string("avatarWallet", "Avatar Wallet Address")
                .describe("Wallet address for payments and NFT minting"),
            Field::object(
                "dates",
                "Retreat Dates",
                vec![
                    Field::date("start", "Start Date").required(),
                    Field::date("end", "End Date").required(),
                ],
            ),
            Field::string("location", "Location").required(),
            coordinates(),
            Field::number("price", "Price (USD)").required().min(0.0),
            crypto_price(),
            Field::number("maxParticipants", "Maximum Participants")
                .required()
                .min(1.0),
            Field::number("currentParticipants", "Current Participants").initial(0),
            Field::strings("amenities", "Amenities"),
            Field::images("images", "Images"),
            nft_collection(),
            Field::string("status", "Status")
                .options(&[
                    ("Draft", "draft"),
                    ("Published", "published"),
                    ("Booking Open", "booking_open"),
                    ("Fully Booked", "fully_booked"),
                    ("Completed", "completed"),
                    ("Cancelled", "cancelled"),
                ])
                .initial("draft"),
            tags(),
            published_at(),
        ],
    )
    .with_preview(Preview::new(
        &[
            ("title", "title"),
            ("avatarId", "avatar"),
            ("status", "status"),
            ("price", "price"),
        ],
        prepare,
    ))
}

fn prepare(selection: &Selection) -> PreviewOutput {
    PreviewOutput::new(
        selection.title("title"),
        format!(
            "Avatar: {} | Status: {} | ${}",
            selection.text("avatarId"),
            selection.text("status"),
            selection.number("price"),
        ),
    )
}

/// Flat retreat form kept outside the studio registry.
pub fn retreat_simple() -> DocumentType {
    DocumentType::new(
        SIMPLE_NAME,
        "Retreat (Simple)",
        vec![
            Field::string("title", "Title"),
            Field::new("description", "Description", FieldType::Text { rows: None }),
            Field::string("avatarId", "OASIS Avatar ID"),
            Field::number("price", "Price (USD)"),
            Field::string("location", "Location"),
            Field::string("status", "Status").options(&[
                ("Draft", "draft"),
                ("Published", "published"),
                ("Booking Open", "booking_open"),
            ]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_shows_reference_and_price() {
        let doc = json!({
            "title": "Sacred Ohms",
            "avatar": {"_type": "reference", "_ref": "av-1"},
            "status": "booking_open",
            "price": 2500,
        });
        let output = retreat().preview(&doc);
        assert_eq!(output.title, "Sacred Ohms");
        assert_eq!(
            output.subtitle.as_deref(),
            Some("Avatar: av-1 | Status: booking_open | $2500")
        );
    }

    #[test]
    fn test_simple_variant_has_no_preview() {
        let output = retreat_simple().preview(&json!({"title": "Plain"}));
        assert_eq!(output.title, "Plain");
        assert!(output.subtitle.is_none());
    }
}
