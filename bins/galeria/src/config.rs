//! Configuration for the headless gallery.

use clap::Parser;

/// Headless NFT gallery.
///
/// Resolves token metadata from an ERC-721 collection over a JSON-RPC
/// endpoint and prints the result, one card per token.
///
/// # Examples
///
/// ```bash
/// # Default collection (Polygon mainnet), token 1
/// galeria
///
/// # A specific token list, JSON output
/// galeria --tokens 1,2,3 --json
///
/// # Skip tokens that do not exist instead of padding them
/// galeria --tokens 1,999 --probe-ownership
/// ```
#[derive(Parser, Debug)]
#[command(name = "galeria")]
#[command(about = "Resolve and display NFT metadata from an ERC-721 collection", long_about = None)]
pub struct Config {
    /// JSON-RPC endpoint for the collection's chain
    #[arg(
        long,
        env = "GALERIA_RPC_URL",
        default_value = "https://polygon-rpc.com"
    )]
    pub rpc_url: String,

    /// ERC-721 contract address
    #[arg(
        long,
        env = "GALERIA_CONTRACT",
        default_value = "0xb7ce52a3c58ab9fa9fccf42d46c068acb368691b"
    )]
    pub contract: String,

    /// Token ids to resolve (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "1")]
    pub tokens: Vec<u64>,

    /// Chain id the collection lives on (decimal)
    #[arg(long, default_value = "137")]
    pub chain_id: u64,

    /// Probe ownerOf first; missing tokens are reported instead of padded
    /// with placeholder records
    #[arg(long)]
    pub probe_ownership: bool,

    /// Print records as a JSON array instead of text cards
    #[arg(long)]
    pub json: bool,

    /// Image substituted for tokens whose metadata cannot be resolved
    #[arg(long)]
    pub placeholder_image: Option<String>,
}
