//! # Hubcast
//!
//! Client toolkit for Farcaster: build a typed cast, sign it under one of
//! several credential schemes, and submit it to a hub node, optionally
//! after registering a new Ed25519 app key on-chain through the KeyGateway
//! contract.
//!
//! ## Pipeline
//!
//! credentials → signer → (optional key registration, confirmed + settled)
//! → message factory → hub client
//!
//! ## Quick Start
//! ```bash
//! HUBCAST_FID=10626 HUBCAST_MNEMONIC="..." cargo run --bin hubcast
//! ```

pub mod config;
pub mod credentials;
pub mod eip712;
mod error;
pub mod factory;
pub mod hub;
pub mod proto;
pub mod registrar;
pub mod signer;
pub mod time;

pub use config::Config;
pub use credentials::CredentialStore;
pub use error::Error;
pub use factory::MessageHeader;
pub use hub::{HubClient, SubmitAck};
pub use registrar::KeyRegistrar;
pub use signer::{AppKeySigner, MessageSigner, UnregisteredAppKey};
