//! Signer abstraction over the three credential backends.
//!
//! `MessageSigner` is a closed enum: custody and derived wallets sign
//! envelope digests as EIP-712 typed data with secp256k1, app keys sign the
//! raw digest with Ed25519. Downstream code only sees `sign`, `public_key`
//! and `scheme`.

use alloy::primitives::B256;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use alloy::signers::Signer as _;
use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};

use crate::credentials::CredentialStore;
use crate::proto::SignatureScheme;

/// Signing backend for protocol messages.
pub enum MessageSigner {
    /// The account-owning wallet credential.
    Custody { wallet: PrivateKeySigner },
    /// Key derived from the mnemonic at index 0; the phrase is not retained.
    Derived { key: PrivateKeySigner },
    /// A delegated Ed25519 app key, registered on-chain before use.
    AppKey(AppKeySigner),
}

impl MessageSigner {
    /// Custody signer from the session credentials (raw key, or the
    /// mnemonic's account key when no raw key is present).
    pub fn custody(store: &CredentialStore) -> Result<Self, crate::Error> {
        Ok(Self::Custody {
            wallet: wallet_key(store)?,
        })
    }

    /// Derived signer: deterministic derivation from the mnemonic phrase.
    /// Produces the same signatures as a custody signer over the same key.
    pub fn derived(store: &CredentialStore) -> Result<Self, crate::Error> {
        let phrase = store.mnemonic().ok_or_else(|| {
            crate::Error::KeyMaterialMissing("derived signer requires a mnemonic".into())
        })?;
        Ok(Self::Derived {
            key: derive_evm_key(phrase, 0)?,
        })
    }

    /// Wrap a registered app key.
    pub fn app_key(signer: AppKeySigner) -> Self {
        Self::AppKey(signer)
    }

    /// Sign a message digest.
    ///
    /// EIP-712 variants wrap the digest in the message typed-data payload;
    /// the app key signs the digest bytes directly.
    pub async fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, crate::Error> {
        if digest.is_empty() {
            return Err(crate::Error::Signing("empty digest".into()));
        }
        match self {
            Self::Custody { wallet } => sign_eip712(wallet, digest).await,
            Self::Derived { key } => sign_eip712(key, digest).await,
            Self::AppKey(app_key) => Ok(app_key.sign_raw(digest)),
        }
    }

    /// Authorize a new app key: EIP-712 signature over the signed key
    /// request. Only the account's wallet-backed variants can do this.
    pub async fn sign_key_request(
        &self,
        request_fid: u64,
        key: &[u8],
        deadline: u64,
    ) -> Result<Vec<u8>, crate::Error> {
        let wallet = match self {
            Self::Custody { wallet } => wallet,
            Self::Derived { key } => key,
            Self::AppKey(_) => {
                return Err(crate::Error::Signing(
                    "app keys cannot authorize key requests".into(),
                ))
            }
        };
        let hash = crate::eip712::signed_key_request_hash(request_fid, key, deadline);
        let signature = wallet
            .sign_hash(&hash)
            .await
            .map_err(|e| crate::Error::Signing(format!("key request signature: {e}")))?;
        Ok(signature.as_bytes().to_vec())
    }

    /// Public key bytes: the 20-byte wallet address for EIP-712 variants,
    /// the 32-byte Ed25519 key for app keys.
    pub fn public_key(&self) -> Vec<u8> {
        match self {
            Self::Custody { wallet } => wallet.address().to_vec(),
            Self::Derived { key } => key.address().to_vec(),
            Self::AppKey(app_key) => app_key.public_key().to_vec(),
        }
    }

    /// The scheme this signer produces signatures under.
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            Self::Custody { .. } | Self::Derived { .. } => SignatureScheme::Eip712,
            Self::AppKey(_) => SignatureScheme::Ed25519,
        }
    }

    /// Verify one of this signer's own signatures over a digest.
    pub fn verify(&self, digest: &[u8], signature: &[u8]) -> Result<(), crate::Error> {
        verify_signature(self.scheme(), &self.public_key(), digest, signature)
    }
}

impl std::fmt::Debug for MessageSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custody { wallet } => write!(f, "MessageSigner::Custody({})", wallet.address()),
            Self::Derived { key } => write!(f, "MessageSigner::Derived({})", key.address()),
            Self::AppKey(app_key) => {
                write!(f, "MessageSigner::AppKey({})", hex::encode(app_key.public_key()))
            }
        }
    }
}

/// Verify a signature against (digest, public key, scheme).
pub fn verify_signature(
    scheme: SignatureScheme,
    public_key: &[u8],
    digest: &[u8],
    signature: &[u8],
) -> Result<(), crate::Error> {
    match scheme {
        SignatureScheme::Ed25519 => {
            let key: [u8; 32] = public_key.try_into().map_err(|_| {
                crate::Error::Signing("ed25519 public key must be 32 bytes".into())
            })?;
            let verifying_key = VerifyingKey::from_bytes(&key)
                .map_err(|e| crate::Error::Signing(format!("invalid ed25519 public key: {e}")))?;
            let signature = ed25519_dalek::Signature::from_slice(signature)
                .map_err(|e| crate::Error::Signing(format!("invalid ed25519 signature: {e}")))?;
            verifying_key
                .verify(digest, &signature)
                .map_err(|_| crate::Error::Signing("ed25519 signature does not verify".into()))
        }
        SignatureScheme::Eip712 => {
            let signature = alloy::primitives::Signature::from_raw(signature)
                .map_err(|e| crate::Error::Signing(format!("invalid eip712 signature: {e}")))?;
            let hash = crate::eip712::message_signing_hash(digest);
            let recovered = signature
                .recover_address_from_prehash(&hash)
                .map_err(|e| crate::Error::Signing(format!("signature recovery failed: {e}")))?;
            if recovered.as_slice() != public_key {
                return Err(crate::Error::Signing(
                    "recovered address does not match signer".into(),
                ));
            }
            Ok(())
        }
        SignatureScheme::None => Err(crate::Error::Signing("unsigned scheme".into())),
    }
}

/// An Ed25519 app key that has not been registered on-chain yet.
///
/// It cannot sign messages; [`crate::registrar::KeyRegistrar::register`]
/// consumes it and hands back an [`AppKeySigner`] once the chain confirms.
pub struct UnregisteredAppKey {
    signing_key: SigningKey,
}

impl UnregisteredAppKey {
    /// Generate a fresh random app key.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Rebuild an app key from its 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, crate::Error> {
        if seed == &[0u8; 32] {
            return Err(crate::Error::KeyMaterialMissing(
                "app key seed is all zeroes".into(),
            ));
        }
        Ok(Self {
            signing_key: SigningKey::from_bytes(seed),
        })
    }

    /// The public key that will be registered on-chain.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    pub(crate) fn into_signing_key(self) -> SigningKey {
        self.signing_key
    }
}

impl std::fmt::Debug for UnregisteredAppKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UnregisteredAppKey({})", hex::encode(self.public_key()))
    }
}

/// A registered Ed25519 app key, ready to sign messages.
pub struct AppKeySigner {
    signing_key: SigningKey,
}

impl AppKeySigner {
    pub(crate) fn new(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }

    /// Wrap a key the caller asserts was registered in an earlier session.
    pub fn assume_registered(key: UnregisteredAppKey) -> Self {
        Self::new(key.into_signing_key())
    }

    /// The registered 32-byte public key.
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    fn sign_raw(&self, digest: &[u8]) -> Vec<u8> {
        self.signing_key.sign(digest).to_bytes().to_vec()
    }
}

impl std::fmt::Debug for AppKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AppKeySigner({})", hex::encode(self.public_key()))
    }
}

async fn sign_eip712(
    wallet: &PrivateKeySigner,
    digest: &[u8],
) -> Result<Vec<u8>, crate::Error> {
    let hash = crate::eip712::message_signing_hash(digest);
    let signature = wallet
        .sign_hash(&hash)
        .await
        .map_err(|e| crate::Error::Signing(format!("eip712 signature: {e}")))?;
    Ok(signature.as_bytes().to_vec())
}

/// The account's secp256k1 key as an alloy signer, for wiring a provider
/// wallet. Prefers the raw private key, falls back to the mnemonic.
pub fn wallet_key(store: &CredentialStore) -> Result<PrivateKeySigner, crate::Error> {
    if let Some(key) = store.private_key() {
        return PrivateKeySigner::from_bytes(&B256::from(*key))
            .map_err(|e| crate::Error::KeyMaterialMissing(format!("invalid private key: {e}")));
    }
    if let Some(phrase) = store.mnemonic() {
        return derive_evm_key(phrase, 0);
    }
    Err(crate::Error::KeyMaterialMissing(
        "credential store holds no key material".into(),
    ))
}

fn derive_evm_key(phrase: &str, index: u32) -> Result<PrivateKeySigner, crate::Error> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .index(index)
        .map_err(|e| crate::Error::KeyMaterialMissing(format!("bad derivation index: {e}")))?
        .build()
        .map_err(|e| crate::Error::KeyMaterialMissing(format!("mnemonic derivation failed: {e}")))
}
