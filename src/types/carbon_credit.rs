//! Carbon credit projects: certification, metrics, tokenization and
//! monitoring.

use crate::preview::{Preview, PreviewOutput, Selection};
use crate::schema::{DocumentType, Field};

use super::{coordinates, published_at, tags};

pub const NAME: &str = "carbonCredit";

pub fn carbon_credit() -> DocumentType {
    DocumentType::new(
        NAME,
        "Carbon Credit Project",
        vec![
            Field::string("title", "Project Title").required(),
            Field::slug("slug", "Slug", "title").required(),
            Field::text("description", "Description", 4).required(),
            Field::string("avatarId", "OASIS Avatar ID")
                .describe("The OASIS avatar that created this carbon credit project")
                .required(),
            Field::string("avatarWallet", "Avatar Wallet Address")
                .describe("Wallet address for carbon credit tokenization and trading"),
            Field::string("projectType", "Project Type")
                .options(&[
                    ("Reforestation", "reforestation"),
                    ("Renewable Energy", "renewable_energy"),
                    ("Ocean Conservation", "ocean_conservation"),
                    ("Waste Management", "waste_management"),
                    ("Sustainable Agriculture", "sustainable_agriculture"),
                    ("Clean Technology", "clean_technology"),
                    ("Forest Conservation", "forest_conservation"),
                    ("Blue Carbon", "blue_carbon"),
                ])
                .required(),
            Field::string("location", "Project Location").required(),
            coordinates(),
            Field::object(
                "certification",
                "Certification",
                vec![
                    Field::string("standard", "Certification Standard").options(&[
                        ("Gold Standard", "gold_standard"),
                        ("Verified Carbon Standard (VCS)", "vcs"),
                        ("Climate Action Reserve", "climate_action_reserve"),
                        ("American Carbon Registry", "american_carbon_registry"),
                        ("Plan Vivo", "plan_vivo"),
                        ("OASIS Carbon Standard", "oasis_standard"),
                    ]),
                    Field::string("certificationId", "Certification ID"),
                    Field::date("certificationDate", "Certification Date"),
                    Field::date("validUntil", "Valid Until"),
                ],
            ),
            Field::object(
                "carbonMetrics",
                "Carbon Metrics",
                vec![
                    Field::number("totalCredits", "Total Carbon Credits (tons CO2e)")
                        .required()
                        .min(0.0),
                    Field::number("availableCredits", "Available Credits (tons CO2e)").initial(0),
                    Field::number("soldCredits", "Sold Credits (tons CO2e)").initial(0),
                    Field::number("pricePerCredit", "Price per Credit (USD)")
                        .required()
                        .min(0.0),
                    Field::number("projectLifetime", "Project Lifetime (years)"),
                    Field::number("annualReduction", "Annual CO2 Reduction (tons)"),
                ],
            ),
            Field::object(
                "tokenization",
                "Tokenization",
                vec![
                    Field::boolean("enabled", "Enable Tokenization").initial(false),
                    Field::string("tokenContract", "Token Contract Address"),
                    Field::string("tokenSymbol", "Token Symbol"),
                    Field::number("tokensPerCredit", "Tokens per Carbon Credit").initial(1),
                    Field::string("blockchain", "Blockchain").options(&[
                        ("Ethereum", "ethereum"),
                        ("Polygon", "polygon"),
                        ("Solana", "solana"),
                        ("Arbitrum", "arbitrum"),
                        ("OASIS Chain", "oasis_chain"),
                    ]),
                    Field::boolean("tradingEnabled", "Enable Trading").initial(false),
                ],
            ),
            Field::object(
                "environmentalImpact",
                "Environmental Impact",
                vec![
                    Field::text("biodiversity", "Biodiversity Impact", 3),
                    Field::number("waterConservation", "Water Conservation (liters/year)"),
                    Field::text("airQuality", "Air Quality Improvement", 2),
                    Field::text("soilHealth", "Soil Health Impact", 2),
                    Field::text("communityBenefit", "Community Benefits", 3),
                ],
            ),
            Field::object(
                "monitoring",
                "Monitoring & Verification",
                vec![
                    Field::string("monitoringFrequency", "Monitoring Frequency").options(&[
                        ("Monthly", "monthly"),
                        ("Quarterly", "quarterly"),
                        ("Semi-annually", "semi_annually"),
                        ("Annually", "annually"),
                    ]),
                    Field::objects(
                        "verificationReports",
                        "Verification Reports",
                        vec![
                            Field::date("reportDate", "Report Date"),
                            Field::string("verifier", "Verifier"),
                            Field::number("creditsVerified", "Credits Verified"),
                            Field::url("reportUrl", "Report URL"),
                        ],
                    ),
                    Field::images("satelliteImagery", "Satellite Imagery"),
                ],
            ),
            Field::objects(
                "partners",
                "Project Partners",
                vec![
                    Field::string("name", "Partner Name"),
                    Field::string("avatarId", "OASIS Avatar ID"),
                    Field::string("role", "Role"),
                    Field::number("contribution", "Contribution (%)"),
                ],
            ),
            Field::images("images", "Project Images"),
            Field::string("status", "Status")
                .options(&[
                    ("Planning", "planning"),
                    ("Development", "development"),
                    ("Certification", "certification"),
                    ("Active", "active"),
                    ("Trading", "trading"),
                    ("Completed", "completed"),
                    ("Suspended", "suspended"),
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
            ("totalCredits", "carbonMetrics.totalCredits"),
        ],
        prepare,
    ))
}

pub fn prepare(selection: &Selection) -> PreviewOutput {
    PreviewOutput::new(
        selection.title("title"),
        format!(
            "Avatar: {} | Type: {} | Credits: {} | Status: {}",
            selection.text("avatarId"),
            selection.text("projectType"),
            selection.number("totalCredits"),
            selection.text("status"),
        ),
    )
}
