//! Creator content: articles, tutorials and posts with monetization and
//! engagement data. The simplified form is the one registered in the studio.

use crate::preview::{Preview, PreviewOutput, Selection};
use crate::schema::{option_list, ArrayMember, DocumentType, Field, FieldType};

use super::{crypto_price, nft_collection, tags};

pub const NAME: &str = "contentCreator";
pub const SIMPLE_NAME: &str = "contentCreatorSimple";

pub fn content_creator() -> DocumentType {
    DocumentType::new(
        NAME,
        "Content Creator",
        vec![
            Field::string("title", "Content Title").required(),
            Field::slug("slug", "Slug", "title").required(),
            Field::string("contentType", "Content Type")
                .options(&[
                    ("Blog Post", "blog_post"),
                    ("Article", "article"),
                    ("Tutorial", "tutorial"),
                    ("Review", "review"),
                    ("Interview", "interview"),
                    ("Case Study", "case_study"),
                    ("News", "news"),
                    ("Opinion", "opinion"),
                ])
                .required(),
            Field::string("avatarId", "OASIS Avatar ID")
                .describe("The OASIS avatar that created this content")
                .required(),
            Field::string("avatarWallet", "Avatar Wallet Address")
                .describe("Wallet address for content monetization and tips"),
            Field::text("excerpt", "Excerpt", 3).describe("Brief summary of the content"),
            Field::array(
                "body",
                "Body",
                vec![
                    ArrayMember::Block {
                        styles: option_list(&[
                            ("Normal", "normal"),
                            ("H1", "h1"),
                            ("H2", "h2"),
                            ("H3", "h3"),
                            ("Quote", "blockquote"),
                        ]),
                        decorators: option_list(&[
                            ("Strong", "strong"),
                            ("Emphasis", "em"),
                            ("Code", "code"),
                        ]),
                        annotations: vec![Field::object(
                            "link",
                            "URL",
                            vec![Field::url("href", "URL")],
                        )],
                    },
                    ArrayMember::image(),
                    ArrayMember::Code { rows: 10 },
                ],
            ),
            Field::image("featuredImage", "Featured Image"),
            Field::string("category", "Category").options(&[
                ("Technology", "technology"),
                ("Web3", "web3"),
                ("Blockchain", "blockchain"),
                ("Sustainability", "sustainability"),
                ("Wellness", "wellness"),
                ("Business", "business"),
                ("Lifestyle", "lifestyle"),
                ("Education", "education"),
                ("Entertainment", "entertainment"),
                ("Other", "other"),
            ]),
            tags(),
            Field::object(
                "monetization",
                "Monetization",
                vec![
                    Field::boolean("isPremium", "Premium Content").initial(false),
                    Field::number("price", "Price (USD)").initial(0),
                    crypto_price(),
                    Field::boolean("allowTips", "Allow Tips").initial(true),
                    Field::number("minTipAmount", "Minimum Tip Amount (USD)").initial(1),
                    nft_collection(),
                ],
            ),
            Field::object(
                "engagement",
                "Engagement Metrics",
                vec![
                    Field::number("views", "Views").initial(0),
                    Field::number("likes", "Likes").initial(0),
                    Field::number("shares", "Shares").initial(0),
                    Field::number("comments", "Comments").initial(0),
                    Field::number("tipsReceived", "Tips Received (USD)").initial(0),
                    Field::number("nftsMinted", "NFTs Minted").initial(0),
                ],
            ),
            Field::object(
                "collaboration",
                "Collaboration",
                vec![
                    Field::objects(
                        "collaborators",
                        "Collaborators",
                        vec![
                            Field::string("avatarId", "OASIS Avatar ID"),
                            Field::string("role", "Role"),
                            Field::number("contribution", "Contribution (%)"),
                        ],
                    ),
                    Field::boolean("revenueSharing", "Revenue Sharing").initial(false),
                ],
            ),
            Field::object(
                "seo",
                "SEO",
                vec![
                    Field::string("metaTitle", "Meta Title"),
                    Field::text("metaDescription", "Meta Description", 2),
                    Field::strings("keywords", "Keywords"),
                ],
            ),
            Field::string("status", "Status")
                .options(&[
                    ("Draft", "draft"),
                    ("Review", "review"),
                    ("Published", "published"),
                    ("Archived", "archived"),
                    ("Deleted", "deleted"),
                ])
                .initial("draft"),
            Field::datetime("publishedAt", "Published at"),
            Field::datetime("updatedAt", "Updated at"),
        ],
    )
    .with_preview(Preview::new(
        &[
            ("title", "title"),
            ("avatarId", "avatarId"),
            ("contentType", "contentType"),
            ("status", "status"),
            ("views", "engagement.views"),
        ],
        prepare,
    ))
}

fn prepare(selection: &Selection) -> PreviewOutput {
    PreviewOutput::new(
        selection.title("title"),
        format!(
            "Avatar: {} | Type: {} | Views: {} | Status: {}",
            selection.text("avatarId"),
            selection.text("contentType"),
            selection.number("views"),
            selection.text("status"),
        ),
    )
}

pub fn content_creator_simple() -> DocumentType {
    DocumentType::new(
        SIMPLE_NAME,
        "Content Creator (Simple)",
        vec![
            Field::string("title", "Content Title"),
            Field::string("contentType", "Content Type").options(&[
                ("Blog Post", "blog_post"),
                ("Article", "article"),
                ("Tutorial", "tutorial"),
            ]),
            Field::string("avatarId", "OASIS Avatar ID"),
            Field::new("description", "Description", FieldType::Text { rows: None }),
            Field::array(
                "body",
                "Body",
                vec![ArrayMember::block(), ArrayMember::image()],
            ),
            Field::string("category", "Category").options(&[
                ("Technology", "technology"),
                ("Web3", "web3"),
                ("Blockchain", "blockchain"),
            ]),
            Field::string("status", "Status")
                .options(&[("Draft", "draft"), ("Published", "published")]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_preview_counts_views() {
        let output = content_creator().preview(&json!({
            "title": "Intro to Web3",
            "avatarId": "av-2",
            "contentType": "tutorial",
            "status": "published",
            "engagement": {"views": 42},
        }));
        assert_eq!(
            output.subtitle.as_deref(),
            Some("Avatar: av-2 | Type: tutorial | Views: 42 | Status: published")
        );
    }

    #[test]
    fn test_body_members() {
        let schema = content_creator();
        let body = schema.field("body").unwrap();
        match &body.field_type {
            FieldType::Array { of } => {
                let kinds: Vec<_> = of.iter().map(ArrayMember::type_name).collect();
                assert_eq!(kinds, vec!["block", "image", "code"]);
            }
            other => panic!("unexpected body type {other:?}"),
        }
    }
}
