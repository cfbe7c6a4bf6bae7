//! Housing projects: units, fractional ownership, supply chain and funding.

use crate::preview::{Preview, PreviewOutput, Selection};
use crate::schema::{DocumentType, Field};

use super::{coordinates, published_at, tags};

pub const NAME: &str = "housing";

pub fn housing() -> DocumentType {
    DocumentType::new(
        NAME,
        "Housing Project",
        vec![
            Field::string("title", "Project Title").required(),
            Field::slug("slug", "Slug", "title").required(),
            Field::text("description", "Description", 4).required(),
            Field::string("avatarId", "OASIS Avatar ID")
                .describe("The OASIS avatar that created this housing project")
                .required(),
            Field::string("avatarWallet", "Avatar Wallet Address")
                .describe("Wallet address for project funding and token distribution"),
            Field::string("projectType", "Project Type")
                .options(&[
                    ("Modular Home", "modular"),
                    ("Tiny House", "tiny_house"),
                    ("Co-housing Community", "co_housing"),
                    ("Sustainable Village", "sustainable_village"),
                    ("Off-grid Community", "off_grid"),
                ])
                .required(),
            Field::string("location", "Location").required(),
            coordinates(),
            Field::number("totalUnits", "Total Units").required().min(1.0),
            Field::number("availableUnits", "Available Units").initial(0),
            Field::number("unitPrice", "Unit Price (USD)").required().min(0.0),
            Field::object(
                "fractionalOwnership",
                "Fractional Ownership",
                vec![
                    Field::boolean("enabled", "Enable Fractional Ownership").initial(false),
                    Field::number("minFraction", "Minimum Fraction (%)").initial(1),
                    Field::string("tokenContract", "Token Contract Address"),
                    Field::number("totalTokens", "Total Tokens"),
                ],
            ),
            Field::object(
                "supplyChain",
                "Supply Chain",
                vec![
                    Field::objects(
                        "materials",
                        "Materials",
                        vec![
                            Field::string("name", "Material Name"),
                            Field::string("source", "Source"),
                            Field::number("sustainability", "Sustainability Rating")
                                .min(1.0)
                                .max(10.0),
                            Field::string("blockchainId", "Blockchain ID")
                                .describe("Unique identifier on blockchain for tracking"),
                        ],
                    ),
                    Field::objects(
                        "suppliers",
                        "Suppliers",
                        vec![
                            Field::string("name", "Supplier Name"),
                            Field::string("avatarId", "OASIS Avatar ID"),
                            Field::number("rating", "Rating").min(1.0).max(5.0),
                        ],
                    ),
                ],
            ),
            Field::object(
                "sustainability",
                "Sustainability Features",
                vec![
                    Field::string("energyRating", "Energy Rating").options(&[
                        ("A+", "A_plus"),
                        ("A", "A"),
                        ("B", "B"),
                        ("C", "C"),
                        ("D", "D"),
                        ("E", "E"),
                        ("F", "F"),
                        ("G", "G"),
                    ]),
                    Field::boolean("renewableEnergy", "Renewable Energy").initial(false),
                    Field::boolean("waterRecycling", "Water Recycling").initial(false),
                    Field::number("carbonFootprint", "Carbon Footprint (tons CO2)"),
                ],
            ),
            Field::object(
                "funding",
                "Funding",
                vec![
                    Field::number("targetAmount", "Target Amount (USD)"),
                    Field::number("raisedAmount", "Raised Amount (USD)").initial(0),
                    Field::string("fundingType", "Funding Type").options(&[
                        ("Crowdfunding", "crowdfunding"),
                        ("DAO", "dao"),
                        ("Traditional", "traditional"),
                        ("Hybrid", "hybrid"),
                    ]),
                    Field::string("daoContract", "DAO Contract Address"),
                ],
            ),
            Field::images("images", "Images"),
            Field::string("status", "Status")
                .options(&[
                    ("Planning", "planning"),
                    ("Funding", "funding"),
                    ("Construction", "construction"),
                    ("Pre-sale", "pre_sale"),
                    ("Available", "available"),
                    ("Completed", "completed"),
                    ("Cancelled", "cancelled"),
                ])
                .initial("planning"),
            tags(),
            published_at(),
        ],
    )
    .with_preview(Preview::new(
        &[
            ("title", "title"),
            ("avatarId", "avatarId"),
            ("status", "status"),
            ("projectType", "projectType"),
        ],
        prepare,
    ))
}

fn prepare(selection: &Selection) -> PreviewOutput {
    PreviewOutput::new(
        selection.title("title"),
        format!(
            "Avatar: {} | Type: {} | Status: {}",
            selection.text("avatarId"),
            selection.text("projectType"),
            selection.text("status"),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_with_missing_type() {
        let output = housing().preview(&json!({
            "title": "Eco Village",
            "avatarId": "av-3",
            "status": "funding",
        }));
        assert_eq!(
            output.subtitle.as_deref(),
            Some("Avatar: av-3 | Type: n/a | Status: funding")
        );
    }

    #[test]
    fn test_initial_document() {
        let doc = housing().initial_document();
        assert_eq!(doc["status"], "planning");
        assert_eq!(doc["fractionalOwnership"]["minFraction"], 1);
        assert_eq!(doc["funding"]["raisedAmount"], 0);
        assert_eq!(doc["sustainability"]["waterRecycling"], false);
    }
}
