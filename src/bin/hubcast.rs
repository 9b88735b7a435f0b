//! Hubcast binary: sign and submit a cast end to end.

use alloy::network::EthereumWallet;
use alloy::providers::ProviderBuilder;
use hubcast::proto::CastAddBody;
use hubcast::{
    factory, registrar, signer, AppKeySigner, Config, CredentialStore, HubClient, KeyRegistrar,
    MessageHeader, MessageSigner, SubmitAck, UnregisteredAppKey,
};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hubcast");

    let cfg: Config = config::Config::builder()
        .add_source(config::File::with_name("hubcast").required(false))
        .add_source(config::Environment::with_prefix("HUBCAST").try_parsing(true))
        .build()?
        .try_deserialize()
        .unwrap_or_default();
    cfg.validate()?;

    info!(network = %cfg.network, fid = cfg.fid, hub = %cfg.hub_url, "Configuration loaded");

    let store = load_credentials()?;
    let message_signer = select_signer(&cfg, &store).await?;
    info!(signer = ?message_signer, "Signer ready");

    let text = std::env::var("HUBCAST_TEXT")
        .unwrap_or_else(|_| "Sent from my custom hub! Yay :)".into());
    let header = MessageHeader {
        fid: cfg.fid,
        network: cfg.farcaster_network()?,
        timestamp: None,
    };
    let message = factory::build(CastAddBody::text(text), header, &message_signer).await?;

    let hub = HubClient::new(&cfg.hub_url, cfg.hub_timeout())?;
    match hub.submit(&message).await? {
        SubmitAck::Accepted { hash } => {
            info!(hash = %hex::encode(hash), "Submission was successful")
        }
        SubmitAck::Duplicate { hash } => {
            info!(hash = %hex::encode(hash), "Message was already merged")
        }
    }

    Ok(())
}

/// Credentials come from the environment, never from disk.
fn load_credentials() -> Result<CredentialStore, hubcast::Error> {
    if let Ok(key) = std::env::var("HUBCAST_PRIVATE_KEY") {
        return CredentialStore::from_private_key_hex(&key);
    }
    match std::env::var("HUBCAST_MNEMONIC") {
        Ok(phrase) => CredentialStore::from_mnemonic(&phrase),
        Err(_) => Err(hubcast::Error::KeyMaterialMissing(
            "set HUBCAST_MNEMONIC or HUBCAST_PRIVATE_KEY".into(),
        )),
    }
}

/// Pick the signing backend:
/// - `HUBCAST_APP_KEY` (hex seed): an app key registered in a prior session;
/// - `HUBCAST_REGISTER_APP_KEY=1`: register a fresh app key, then use it;
/// - otherwise the wallet's derived EIP-712 signer.
async fn select_signer(
    cfg: &Config,
    store: &CredentialStore,
) -> Result<MessageSigner, Box<dyn std::error::Error>> {
    if let Ok(seed_hex) = std::env::var("HUBCAST_APP_KEY") {
        let seed = parse_app_key_seed(&seed_hex)?;
        let key = UnregisteredAppKey::from_seed(&seed)?;
        return Ok(MessageSigner::app_key(AppKeySigner::assume_registered(key)));
    }

    if std::env::var("HUBCAST_REGISTER_APP_KEY").is_ok() {
        return Ok(register_app_key(cfg, store).await?);
    }

    Ok(MessageSigner::derived(store)?)
}

async fn register_app_key(
    cfg: &Config,
    store: &CredentialStore,
) -> Result<MessageSigner, Box<dyn std::error::Error>> {
    let account = MessageSigner::custody(store)?;
    let wallet = EthereumWallet::from(signer::wallet_key(store)?);
    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .connect_http(cfg.chain_rpc_url.parse()?);
    let registrar = KeyRegistrar::new(
        provider,
        cfg.gateway()?,
        cfg.confirmation_timeout(),
        cfg.settle_delay(),
    );

    let key = UnregisteredAppKey::generate();
    info!(key = %hex::encode(key.public_key()), "Registering new app key");

    let deadline = registrar::deadline_in(Duration::from_secs(3600));
    let app_key = registrar.register(&account, key, cfg.fid, deadline).await?;
    Ok(MessageSigner::app_key(app_key))
}

fn parse_app_key_seed(seed_hex: &str) -> Result<[u8; 32], hubcast::Error> {
    let bytes = hex::decode(seed_hex.trim().trim_start_matches("0x"))
        .map_err(|e| hubcast::Error::KeyMaterialMissing(format!("invalid app key seed: {e}")))?;
    bytes.try_into().map_err(|_| {
        hubcast::Error::KeyMaterialMissing("app key seed must be 32 bytes".into())
    })
}
