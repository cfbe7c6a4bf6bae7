//! Document type definitions.
//!
//! Each submodule builds one self-contained document type. The helpers below
//! are field groups repeated verbatim across several types.

pub mod carbon_credit;
pub mod content_creator;
pub mod housing;
pub mod oasis_avatar;
pub mod retreat;
pub mod simple_test;
pub mod star_template;

pub use carbon_credit::carbon_credit;
pub use content_creator::{content_creator, content_creator_simple};
pub use housing::housing;
pub use oasis_avatar::oasis_avatar;
pub use retreat::{retreat, retreat_simple};
pub use simple_test::simple_test;
pub use star_template::star_template;

use crate::schema::Field;

pub(crate) fn coordinates() -> Field {
    Field::object(
        "coordinates",
        "Coordinates",
        vec![
            Field::number("lat", "Latitude"),
            Field::number("lng", "Longitude"),
        ],
    )
}

pub(crate) fn crypto_price() -> Field {
    Field::object(
        "cryptoPrice",
        "Crypto Price",
        vec![
            Field::number("ethereum", "Ethereum (ETH)"),
            Field::number("solana", "Solana (SOL)"),
            Field::number("oasisToken", "OASIS Token"),
        ],
    )
}

pub(crate) fn nft_collection() -> Field {
    Field::object(
        "nftCollection",
        "NFT Collection",
        vec![
            Field::string("contractAddress", "Contract Address"),
            Field::string("chain", "Blockchain").options(&[
                ("Ethereum", "ethereum"),
                ("Solana", "solana"),
                ("Polygon", "polygon"),
                ("Arbitrum", "arbitrum"),
            ]),
            Field::number("mintPrice", "Mint Price"),
        ],
    )
}

pub(crate) fn tags() -> Field {
    Field::strings("tags", "Tags")
}

pub(crate) fn published_at() -> Field {
    Field::datetime("publishedAt", "Published at")
}
