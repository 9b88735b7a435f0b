//! Credential storage: raw key material for the session.
//!
//! Holds the caller-supplied mnemonic phrase or custody private key in
//! zeroize-on-drop buffers. Nothing here is ever persisted or logged;
//! signers derive what they need and the store drops with the session.

use zeroize::Zeroizing;

/// Session credentials: a mnemonic phrase, a raw private key, or both.
pub struct CredentialStore {
    mnemonic: Option<Zeroizing<String>>,
    private_key: Option<Zeroizing<[u8; 32]>>,
}

impl CredentialStore {
    /// Store a BIP-39 mnemonic phrase.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, crate::Error> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(crate::Error::KeyMaterialMissing(
                "empty mnemonic phrase".into(),
            ));
        }
        Ok(Self {
            mnemonic: Some(Zeroizing::new(phrase.to_string())),
            private_key: None,
        })
    }

    /// Store a raw 32-byte secp256k1 private key.
    pub fn from_private_key(key: [u8; 32]) -> Result<Self, crate::Error> {
        if key == [0u8; 32] {
            return Err(crate::Error::KeyMaterialMissing(
                "private key is all zeroes".into(),
            ));
        }
        Ok(Self {
            mnemonic: None,
            private_key: Some(Zeroizing::new(key)),
        })
    }

    /// Store a hex-encoded private key (with or without `0x` prefix).
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, crate::Error> {
        let stripped = hex_key.trim().trim_start_matches("0x");
        let bytes = hex::decode(stripped)
            .map_err(|e| crate::Error::KeyMaterialMissing(format!("invalid hex key: {e}")))?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| {
            crate::Error::KeyMaterialMissing("private key must be 32 bytes".into())
        })?;
        Self::from_private_key(key)
    }

    /// The mnemonic phrase, if this store holds one.
    pub fn mnemonic(&self) -> Option<&str> {
        self.mnemonic.as_deref().map(String::as_str)
    }

    /// The raw private key, if this store holds one.
    pub fn private_key(&self) -> Option<&[u8; 32]> {
        self.private_key.as_deref()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of Debug output.
        f.debug_struct("CredentialStore")
            .field("mnemonic", &self.mnemonic.is_some())
            .field("private_key", &self.private_key.is_some())
            .finish()
    }
}
