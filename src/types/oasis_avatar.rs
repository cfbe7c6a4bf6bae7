//! OASIS avatars: identity, karma, wallets and NFTs.

use crate::preview::{Preview, PreviewOutput, Selection};
use crate::schema::{DocumentType, Field, FieldType};

pub const NAME: &str = "oasisAvatar";

pub fn oasis_avatar() -> DocumentType {
    DocumentType::new(
        NAME,
        "OASIS Avatar",
        vec![
            Field::string("avatarId", "Avatar ID").required(),
            Field::string("username", "Username").required(),
            Field::string("email", "Email"),
            Field::number("karma", "Karma Level").initial(0),
            Field::objects(
                "wallets",
                "Wallets",
                vec![
                    Field::string("chain", "Blockchain").options(&[
                        ("Ethereum", "ethereum"),
                        ("Solana", "solana"),
                        ("Polygon", "polygon"),
                        ("Arbitrum", "arbitrum"),
                        ("Holochain", "holochain"),
                    ]),
                    Field::string("address", "Wallet Address"),
                    Field::boolean("isDefault", "Default Wallet").initial(false),
                ],
            ),
            Field::objects(
                "nfts",
                "NFTs",
                vec![
                    Field::string("tokenId", "Token ID"),
                    Field::string("contractAddress", "Contract Address"),
                    Field::string("chain", "Blockchain"),
                    Field::new(
                        "metadata",
                        "Metadata",
                        FieldType::Text { rows: None },
                    ),
                ],
            ),
            Field::image("profileImage", "Profile Image"),
            Field::text("bio", "Bio", 3),
            Field::string("status", "Status")
                .options(&[
                    ("Active", "active"),
                    ("Inactive", "inactive"),
                    ("Suspended", "suspended"),
                ])
                .initial("active"),
            Field::datetime("createdAt", "Created At"),
            Field::datetime("lastActive", "Last Active"),
        ],
    )
    .with_preview(Preview::new(
        &[
            ("title", "username"),
            ("avatarId", "avatarId"),
            ("karma", "karma"),
            ("status", "status"),
        ],
        prepare,
    ))
}

pub fn prepare(selection: &Selection) -> PreviewOutput {
    PreviewOutput::new(
        selection.title("title"),
        format!(
            "ID: {} | Karma: {} | Status: {}",
            selection.text("avatarId"),
            selection.number("karma"),
            selection.text("status"),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preview_uses_username_as_title() {
        let output = oasis_avatar().preview(&json!({
            "username": "wellness_guru",
            "avatarId": "a-1",
            "karma": 150,
            "status": "active",
        }));
        assert_eq!(output.title, "wellness_guru");
        assert_eq!(output.subtitle.as_deref(), Some("ID: a-1 | Karma: 150 | Status: active"));
    }
}
