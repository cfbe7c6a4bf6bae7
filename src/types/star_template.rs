//! STAR templates used to generate dApps from studio content.

use crate::preview::{Preview, PreviewOutput, Selection};
use crate::schema::{ArrayMember, DocumentType, Field};

pub const NAME: &str = "starTemplate";

pub fn star_template() -> DocumentType {
    DocumentType::new(
        NAME,
        "STAR Template",
        vec![
            Field::string("name", "Template Name").required(),
            Field::text("description", "Description", 3),
            Field::string("templateType", "Template Type")
                .options(&[
                    ("Retreat Booking", "retreat_booking"),
                    ("Housing Purchase", "housing_purchase"),
                    ("Carbon Credit Trading", "carbon_trading"),
                    ("Content Monetization", "content_monetization"),
                    ("NFT Marketplace", "nft_marketplace"),
                    ("DAO Governance", "dao_governance"),
                ])
                .required(),
            Field::string("platform", "Target Platform")
                .options(&[
                    ("Web", "web"),
                    ("Unity", "unity"),
                    ("Mobile", "mobile"),
                    ("Console", "console"),
                    ("VR/AR", "vr_ar"),
                ])
                .required(),
            Field::text("templateCode", "Template Code", 20)
                .describe("STAR template code for generating dApps"),
            Field::object(
                "walletIntegration",
                "Wallet Integration",
                vec![
                    Field::boolean("enabled", "Enable Wallet Integration").initial(true),
                    Field::array("supportedChains", "Supported Blockchains", vec![ArrayMember::String])
                        .options(&[
                            ("Ethereum", "ethereum"),
                            ("Solana", "solana"),
                            ("Polygon", "polygon"),
                            ("Arbitrum", "arbitrum"),
                            ("Holochain", "holochain"),
                        ]),
                    Field::array("paymentMethods", "Payment Methods", vec![ArrayMember::String])
                        .options(&[
                            ("Crypto", "crypto"),
                            ("Credit Card", "credit_card"),
                            ("Bank Transfer", "bank_transfer"),
                            ("Karma", "karma"),
                        ]),
                ],
            ),
            Field::array("interactiveFeatures", "Interactive Features", vec![ArrayMember::String])
                .options(&[
                    ("Booking System", "booking"),
                    ("Payment Processing", "payment"),
                    ("NFT Minting", "nft_minting"),
                    ("Voting System", "voting"),
                    ("Chat/Messaging", "chat"),
                    ("Real-time Updates", "realtime"),
                    ("3D Visualization", "3d_visualization"),
                    ("AR/VR Support", "ar_vr"),
                ]),
            Field::string("deploymentStatus", "Deployment Status")
                .options(&[
                    ("Draft", "draft"),
                    ("Testing", "testing"),
                    ("Deployed", "deployed"),
                    ("Archived", "archived"),
                ])
                .initial("draft"),
            Field::url("deployedUrl", "Deployed URL")
                .describe("URL where the generated dApp is deployed"),
            Field::reference("createdBy", "Created By", &[super::oasis_avatar::NAME]),
            Field::string("version", "Version").initial("1.0.0"),
            super::tags(),
        ],
    )
    .with_preview(Preview::new(
        &[
            ("title", "name"),
            ("templateType", "templateType"),
            ("platform", "platform"),
            ("deploymentStatus", "deploymentStatus"),
        ],
        prepare,
    ))
}

fn prepare(selection: &Selection) -> PreviewOutput {
    PreviewOutput::new(
        selection.title("title"),
        format!(
            "{} | {} | {}",
            selection.text("templateType"),
            selection.text("platform"),
            selection.text("deploymentStatus"),
        ),
    )
}

/// Content type a template of the given kind is generated from.
pub fn target_content_type(template_type: &str) -> Option<&'static str> {
    match template_type {
        "retreat_booking" => Some(super::retreat::NAME),
        "housing_purchase" => Some(super::housing::NAME),
        "carbon_trading" => Some(super::carbon_credit::NAME),
        "content_monetization" => Some(super::content_creator::SIMPLE_NAME),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_joins_status_tokens() {
        let output = star_template().preview(&json!({
            "name": "Retreat Booking dApp",
            "templateType": "retreat_booking",
            "platform": "web",
            "deploymentStatus": "draft",
        }));
        assert_eq!(output.title, "Retreat Booking dApp");
        assert_eq!(output.subtitle.as_deref(), Some("retreat_booking | web | draft"));
    }

    #[test]
    fn test_target_content_type() {
        assert_eq!(target_content_type("carbon_trading"), Some("carbonCredit"));
        assert_eq!(target_content_type("content_monetization"), Some("contentCreatorSimple"));
        assert_eq!(target_content_type("dao_governance"), None);
    }
}
