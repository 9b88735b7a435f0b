//! Toolkit configuration.

use alloy::primitives::Address;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::proto::FarcasterNetwork;

/// Configuration for a submission session.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Protocol network: "mainnet", "testnet" or "devnet".
    #[serde(default = "defaults::network")]
    pub network: String,

    /// Account identifier the messages are attributed to.
    #[serde(default = "defaults::fid")]
    pub fid: u64,

    /// Hub endpoint, `host:port`.
    #[serde(default = "defaults::hub_url")]
    pub hub_url: String,

    /// Chain RPC endpoint for key registration.
    #[serde(default = "defaults::chain_rpc_url")]
    pub chain_rpc_url: String,

    /// KeyGateway contract address.
    #[serde(default = "defaults::gateway_address")]
    pub gateway_address: String,

    /// Bound on the on-chain confirmation wait.
    #[serde(default = "defaults::confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,

    /// Settling delay after key confirmation, while hubs index the chain.
    /// Empirical and protocol-dependent, hence configurable.
    #[serde(default = "defaults::key_settle_delay_secs")]
    pub key_settle_delay_secs: u64,

    /// Bound on the hub submit round trip.
    #[serde(default = "defaults::hub_timeout_secs")]
    pub hub_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: defaults::network(),
            fid: defaults::fid(),
            hub_url: defaults::hub_url(),
            chain_rpc_url: defaults::chain_rpc_url(),
            gateway_address: defaults::gateway_address(),
            confirmation_timeout_secs: defaults::confirmation_timeout_secs(),
            key_settle_delay_secs: defaults::key_settle_delay_secs(),
            hub_timeout_secs: defaults::hub_timeout_secs(),
        }
    }
}

impl Config {
    /// The configured network as the protocol enum.
    pub fn farcaster_network(&self) -> Result<FarcasterNetwork, crate::Error> {
        match self.network.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(FarcasterNetwork::Mainnet),
            "testnet" => Ok(FarcasterNetwork::Testnet),
            "devnet" => Ok(FarcasterNetwork::Devnet),
            other => Err(crate::Error::Config(format!("unknown network: {other}"))),
        }
    }

    /// The gateway contract address.
    pub fn gateway(&self) -> Result<Address, crate::Error> {
        Address::from_str(&self.gateway_address)
            .map_err(|e| crate::Error::Config(format!("invalid gateway address: {e}")))
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.key_settle_delay_secs)
    }

    pub fn hub_timeout(&self) -> Duration {
        Duration::from_secs(self.hub_timeout_secs)
    }

    /// Check the fields a session cannot run without.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.fid == 0 {
            return Err(crate::Error::Config("fid is not set".into()));
        }
        self.farcaster_network()?;
        self.gateway()?;
        if self.hub_url.is_empty() {
            return Err(crate::Error::Config("hub_url is not set".into()));
        }
        Ok(())
    }
}

mod defaults {
    fn network_name() -> String {
        std::env::var("HUBCAST_NETWORK").unwrap_or_else(|_| "mainnet".into())
    }

    pub fn network() -> String {
        network_name()
    }

    pub fn fid() -> u64 {
        0
    }

    pub fn hub_url() -> String {
        if network_name().contains("mainnet") {
            "nemes.farcaster.xyz:2281".into()
        } else {
            "testnet1.farcaster.xyz:2281".into()
        }
    }

    pub fn chain_rpc_url() -> String {
        if network_name().contains("mainnet") {
            "https://mainnet.optimism.io".into()
        } else {
            "https://sepolia.optimism.io".into()
        }
    }

    pub fn gateway_address() -> String {
        crate::eip712::KEY_GATEWAY_ADDRESS.to_string()
    }

    pub fn confirmation_timeout_secs() -> u64 {
        120
    }

    pub fn key_settle_delay_secs() -> u64 {
        30
    }

    pub fn hub_timeout_secs() -> u64 {
        10
    }
}
