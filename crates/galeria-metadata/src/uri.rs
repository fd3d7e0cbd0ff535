//! Token URI normalization.
//!
//! Contracts report pointers in whatever scheme the minter chose. HTTP(S)
//! addresses pass through; `ipfs://` addresses get a fixed-gateway rewrite
//! (prefix replacement only); anything else is non-fetchable and the caller
//! falls back to a placeholder.

pub const IPFS_SCHEME: &str = "ipfs://";
pub const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Rewrite a contract-reported pointer into a fetchable HTTP(S) address.
///
/// Returns `None` for pointers no gateway can serve.
pub fn normalize_token_uri(uri: &str) -> Option<String> {
    if let Some(cid) = uri.strip_prefix(IPFS_SCHEME) {
        return Some(format!("{IPFS_GATEWAY}{cid}"));
    }
    if uri.starts_with("https://") || uri.starts_with("http://") {
        return Some(uri.to_owned());
    }
    None
}
