use std::collections::HashMap;

use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use galeria_metadata::{
    ContractError, MetadataRecord, MetadataResolver, ResolveError, ResolverConfig, TokenContract,
};
use galeria_wallet::ProviderError;

/// What the mock contract does for a given token id.
#[derive(Clone)]
enum TokenBehavior {
    Uri(String),
    EmptyUri,
    Revert,
}

struct MockContract {
    tokens: HashMap<u64, TokenBehavior>,
    /// Tokens with an owner; everything else reverts `ownerOf`.
    owned: Vec<u64>,
}

impl MockContract {
    fn new() -> Self {
        Self {
            tokens: HashMap::new(),
            owned: Vec::new(),
        }
    }

    fn with_uri(mut self, token_id: u64, uri: impl Into<String>) -> Self {
        self.tokens.insert(token_id, TokenBehavior::Uri(uri.into()));
        self.owned.push(token_id);
        self
    }

    fn with_empty_uri(mut self, token_id: u64) -> Self {
        self.tokens.insert(token_id, TokenBehavior::EmptyUri);
        self.owned.push(token_id);
        self
    }

    fn with_revert(mut self, token_id: u64) -> Self {
        self.tokens.insert(token_id, TokenBehavior::Revert);
        self
    }
}

#[async_trait]
impl TokenContract for MockContract {
    async fn token_uri(&self, token_id: u64) -> Result<String, ContractError> {
        match self.tokens.get(&token_id) {
            Some(TokenBehavior::Uri(uri)) => Ok(uri.clone()),
            Some(TokenBehavior::EmptyUri) => Err(ContractError::EmptyUri),
            Some(TokenBehavior::Revert) | None => Err(ContractError::Call(
                ProviderError::from_code(-32000, "execution reverted"),
            )),
        }
    }

    async fn owner_of(&self, token_id: u64) -> Result<Address, ContractError> {
        if self.owned.contains(&token_id) {
            Ok(Address::ZERO)
        } else {
            Err(ContractError::Call(ProviderError::from_code(
                -32000,
                "ERC721: invalid token ID",
            )))
        }
    }
}

/// Serve the same canned HTTP response to every connection; returns the base
/// URL. Stands in for the metadata host.
async fn serve(status_line: &'static str, content_type: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status_line}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });
    format!("http://{addr}")
}

async fn serve_json(body: &'static str) -> String {
    serve("200 OK", "application/json", body).await
}

#[tokio::test]
async fn resolves_token_and_normalizes_ipfs_image() {
    let base = serve_json(r#"{"name":"A","image":"ipfs://Qm1"}"#).await;
    let contract = MockContract::new().with_uri(1, format!("{base}/1.json"));
    let resolver = MetadataResolver::new(contract);

    let record = resolver.resolve_one(1).await.unwrap();
    assert_eq!(record.token_id, 1);
    assert_eq!(record.name.as_deref(), Some("A"));
    assert_eq!(record.image, "https://ipfs.io/ipfs/Qm1");
}

#[tokio::test]
async fn contract_revert_degrades_to_fallback_record() {
    let contract = MockContract::new().with_revert(2);
    let resolver = MetadataResolver::new(contract);

    let record = resolver.resolve_one(2).await.unwrap();
    assert_eq!(record.token_id, 2);
    assert_eq!(record.name.as_deref(), Some("NFT #2"));
    assert_eq!(record.description.as_deref(), Some("Metadata no disponible"));
    assert!(!record.image.is_empty());
}

#[tokio::test]
async fn empty_uri_degrades_to_fallback_record() {
    let contract = MockContract::new().with_empty_uri(3);
    let resolver = MetadataResolver::new(contract);

    let record = resolver.resolve_one(3).await.unwrap();
    assert_eq!(record.name.as_deref(), Some("NFT #3"));
}

#[tokio::test]
async fn non_fetchable_scheme_degrades_to_fallback_record() {
    let contract = MockContract::new().with_uri(4, "ar://some-blob");
    let resolver = MetadataResolver::new(contract);

    let record = resolver.resolve_one(4).await.unwrap();
    assert_eq!(record.name.as_deref(), Some("NFT #4"));
}

#[tokio::test]
async fn http_error_status_degrades_to_fallback_record() {
    let base = serve("404 Not Found", "text/plain", "nope").await;
    let contract = MockContract::new().with_uri(5, format!("{base}/5.json"));
    let resolver = MetadataResolver::new(contract);

    let record = resolver.resolve_one(5).await.unwrap();
    assert_eq!(record.name.as_deref(), Some("NFT #5"));
}

#[tokio::test]
async fn malformed_json_degrades_to_fallback_record() {
    let base = serve_json("this is not json").await;
    let contract = MockContract::new().with_uri(6, format!("{base}/6.json"));
    let resolver = MetadataResolver::new(contract);

    let record = resolver.resolve_one(6).await.unwrap();
    assert_eq!(record.name.as_deref(), Some("NFT #6"));
}

#[tokio::test]
async fn missing_payload_image_gets_the_placeholder() {
    let base = serve_json(r#"{"name":"sin imagen"}"#).await;
    let contract = MockContract::new().with_uri(7, format!("{base}/7.json"));
    let config = ResolverConfig {
        placeholder_image: "https://p/placeholder.png".to_owned(),
        ..ResolverConfig::default()
    };
    let resolver = MetadataResolver::with_config(contract, config);

    let record = resolver.resolve_one(7).await.unwrap();
    assert_eq!(record.name.as_deref(), Some("sin imagen"));
    assert_eq!(record.image, "https://p/placeholder.png");
}

#[tokio::test]
async fn extra_payload_fields_pass_through() {
    let base = serve_json(r#"{"name":"A","image":"https://x/i.png","edition":7}"#).await;
    let contract = MockContract::new().with_uri(8, format!("{base}/8.json"));
    let resolver = MetadataResolver::new(contract);

    let record = resolver.resolve_one(8).await.unwrap();
    assert_eq!(record.extra["edition"], 7);
}

#[tokio::test]
async fn resolve_many_settles_all_and_keeps_input_order() {
    let base = serve_json(r#"{"name":"ok","image":"https://x/i.png"}"#).await;
    let contract = MockContract::new()
        .with_uri(10, format!("{base}/10.json"))
        .with_revert(11)
        .with_uri(12, format!("{base}/12.json"));
    let resolver = MetadataResolver::new(contract);

    let outcomes = resolver.resolve_many(&[10, 11, 12]).await;
    assert_eq!(outcomes.len(), 3);

    let records: Vec<&MetadataRecord> = outcomes.iter().map(|o| o.as_ref().unwrap()).collect();
    assert_eq!(records[0].token_id, 10);
    assert_eq!(records[0].name.as_deref(), Some("ok"));
    // The middle token degrades without touching its siblings.
    assert_eq!(records[1].name.as_deref(), Some("NFT #11"));
    assert_eq!(records[2].token_id, 12);
    assert_eq!(records[2].name.as_deref(), Some("ok"));
}

#[tokio::test]
async fn ownership_probe_surfaces_missing_tokens_instead_of_fabricating() {
    let base = serve_json(r#"{"name":"ok","image":"https://x/i.png"}"#).await;
    let contract = MockContract::new()
        .with_uri(20, format!("{base}/20.json"))
        .with_revert(21)
        .with_uri(22, format!("{base}/22.json"));
    let config = ResolverConfig {
        probe_ownership: true,
        ..ResolverConfig::default()
    };
    let resolver = MetadataResolver::with_config(contract, config);

    let outcomes = resolver.resolve_many(&[20, 21, 22]).await;
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_ok());
    assert!(matches!(
        outcomes[1],
        Err(ResolveError::TokenNotFound { token_id: 21, .. })
    ));
    assert!(outcomes[2].is_ok());
}
