//! galeria — headless NFT gallery.
//!
//! Connects to a JSON-RPC endpoint, verifies it serves the collection's
//! chain, resolves the requested tokens concurrently and prints the gallery.

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;

use alloy_primitives::Address;
use galeria_metadata::{Erc721Contract, MetadataRecord, MetadataResolver, ResolverConfig};
use galeria_wallet::{
    chain_name, ChainDescriptor, ChainId, HttpProvider, WalletError, WalletGateway,
};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    let config = Config::parse();
    run(config).await
}

async fn run(config: Config) -> Result<()> {
    let provider =
        Arc::new(HttpProvider::new(&config.rpc_url).context("failed to build rpc provider")?);
    let gateway = WalletGateway::new(provider.clone());

    let required = ChainId::new(config.chain_id);
    let descriptor = if required == ChainId::POLYGON {
        ChainDescriptor::polygon()
    } else {
        ChainDescriptor::minimal(required, chain_name(required.value()), &config.rpc_url)
    };
    if !gateway.ensure_chain(required, &descriptor).await? {
        let active = gateway.active_chain().await?;
        tracing::error!(
            active = chain_name(active.value()),
            required = chain_name(required.value()),
            "endpoint serves the wrong chain"
        );
        return Err(WalletError::WrongNetwork { active, required }.into());
    }

    let address: Address = config
        .contract
        .parse()
        .context("invalid contract address")?;
    let contract = Erc721Contract::new(provider, address);

    let collection = contract.collection().await;
    if let Some(name) = &collection.name {
        tracing::info!(
            collection = %name,
            symbol = collection.symbol.as_deref().unwrap_or("?"),
            "resolved collection"
        );
    }

    let mut resolver_config = ResolverConfig {
        probe_ownership: config.probe_ownership,
        ..ResolverConfig::default()
    };
    if let Some(placeholder) = config.placeholder_image.clone() {
        resolver_config.placeholder_image = placeholder;
    }
    let resolver = MetadataResolver::with_config(contract, resolver_config);

    let outcomes = resolver.resolve_many(&config.tokens).await;

    if config.json {
        let records: Vec<&MetadataRecord> =
            outcomes.iter().filter_map(|o| o.as_ref().ok()).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for (token_id, outcome) in config.tokens.iter().zip(&outcomes) {
        match outcome {
            Ok(record) => {
                println!("#{token_id}  {}", record.name.as_deref().unwrap_or("(unnamed)"));
                if let Some(description) = &record.description {
                    println!("    {description}");
                }
                println!("    {}", record.image);
            }
            Err(e) => println!("#{token_id}  not found ({e})"),
        }
    }
    Ok(())
}
