//! Metadata resolution for the galeria NFT viewer.
//!
//! Given a token id, read the contract-reported URI, rewrite
//! content-addressed (`ipfs://`) pointers to a fetchable gateway address,
//! fetch and parse the JSON document, and merge everything into a
//! display-ready [`MetadataRecord`]. Individual tokens degrade to a
//! placeholder record on failure so a batch never fails atomically.

pub mod contract;
pub mod record;
pub mod resolver;
pub mod uri;

pub use contract::{CollectionMetadata, ContractError, Erc721Contract, TokenContract};
pub use record::MetadataRecord;
pub use resolver::{MetadataResolver, ResolveError, ResolverConfig};
pub use uri::normalize_token_uri;
