//! EIP-712 domains and typed payloads.
//!
//! Two separate domains are in play: message envelopes are signed under the
//! Farcaster message domain (salt-separated, chain-independent), while app
//! key authorizations are signed under the SignedKeyRequestValidator domain
//! pinned to the validator contract on Optimism.

use alloy::primitives::{address, b256, Address, Bytes, B256, U256};
use alloy::sol;
use alloy::sol_types::{eip712_domain, Eip712Domain, SolStruct, SolValue};

/// KeyGateway contract on Optimism: the registration entry point.
pub const KEY_GATEWAY_ADDRESS: Address = address!("00000000fC56947c7E7183f8Ca4B62398CaAdf0B");

/// SignedKeyRequestValidator contract on Optimism: verifies key metadata.
pub const SIGNED_KEY_REQUEST_VALIDATOR: Address =
    address!("00000000FC700472606ED4fA22623Acf62c60553");

/// Key type for Ed25519 app keys in the gateway's `add` call.
pub const KEY_TYPE_ED25519: u32 = 1;

/// Metadata type for signed key requests in the gateway's `add` call.
pub const METADATA_TYPE_SIGNED_KEY_REQUEST: u32 = 1;

sol! {
    /// Typed payload a custody wallet signs to authorize a new app key.
    struct SignedKeyRequest {
        uint256 requestFid;
        bytes key;
        uint256 deadline;
    }

    /// On-chain metadata passed to `KeyGateway.add`, ABI-encoded as a tuple.
    struct SignedKeyRequestMetadata {
        uint256 requestFid;
        address requestSigner;
        bytes signature;
        uint256 deadline;
    }

    /// Typed payload for envelope signing: just the message digest.
    struct MessageData {
        bytes hash;
    }

    /// Gateway entry point for registering app keys.
    contract KeyGateway {
        function add(uint32 keyType, bytes calldata key, uint32 metadataType, bytes calldata metadata) external;
    }
}

/// Domain for message envelope signatures.
pub fn message_domain() -> Eip712Domain {
    eip712_domain! {
        name: "Farcaster Verify Ethereum Address",
        version: "2.0.0",
        salt: b256!("f2d857f4a3edcb9b78b4d503bfe733db1e3f6cdc2b7971ee739626c97e86a558"),
    }
}

/// Domain for signed key request signatures.
pub fn signed_key_request_domain() -> Eip712Domain {
    eip712_domain! {
        name: "Farcaster SignedKeyRequestValidator",
        version: "1",
        chain_id: 10,
        verifying_contract: SIGNED_KEY_REQUEST_VALIDATOR,
    }
}

/// EIP-712 signing hash for a message digest.
pub fn message_signing_hash(digest: &[u8]) -> B256 {
    let payload = MessageData {
        hash: Bytes::copy_from_slice(digest),
    };
    payload.eip712_signing_hash(&message_domain())
}

/// EIP-712 signing hash for a signed key request.
pub fn signed_key_request_hash(request_fid: u64, key: &[u8], deadline: u64) -> B256 {
    let request = SignedKeyRequest {
        requestFid: U256::from(request_fid),
        key: Bytes::copy_from_slice(key),
        deadline: U256::from(deadline),
    };
    request.eip712_signing_hash(&signed_key_request_domain())
}

/// ABI-encode the metadata tuple the gateway contract validates.
pub fn encode_signed_key_request_metadata(
    request_fid: u64,
    request_signer: Address,
    signature: &[u8],
    deadline: u64,
) -> Vec<u8> {
    SignedKeyRequestMetadata {
        requestFid: U256::from(request_fid),
        requestSigner: request_signer,
        signature: Bytes::copy_from_slice(signature),
        deadline: U256::from(deadline),
    }
    .abi_encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_key_request_type_string() {
        assert_eq!(
            SignedKeyRequest::eip712_root_type(),
            "SignedKeyRequest(uint256 requestFid,bytes key,uint256 deadline)"
        );
        assert_eq!(MessageData::eip712_root_type(), "MessageData(bytes hash)");
    }

    #[test]
    fn signing_hashes_are_deterministic() {
        let key = [7u8; 32];
        let a = signed_key_request_hash(10626, &key, 1_700_000_000);
        let b = signed_key_request_hash(10626, &key, 1_700_000_000);
        assert_eq!(a, b);

        let digest = [1u8; 20];
        assert_eq!(message_signing_hash(&digest), message_signing_hash(&digest));
    }

    #[test]
    fn signing_hashes_separate_inputs_and_domains() {
        let key = [7u8; 32];
        let base = signed_key_request_hash(10626, &key, 1_700_000_000);
        assert_ne!(base, signed_key_request_hash(10627, &key, 1_700_000_000));
        assert_ne!(base, signed_key_request_hash(10626, &key, 1_700_000_001));
        assert_ne!(base, signed_key_request_hash(10626, &[8u8; 32], 1_700_000_000));
        // Same bytes under the message domain must not collide.
        assert_ne!(base, message_signing_hash(&key));
    }

    #[test]
    fn metadata_encoding_round_trips() {
        let signer = address!("742d35cc6634c0532925a3b8d404cb8b3d3a5d3a");
        let signature = [0x42u8; 65];
        let encoded =
            encode_signed_key_request_metadata(10626, signer, &signature, 1_700_000_000);

        let decoded = SignedKeyRequestMetadata::abi_decode(&encoded).unwrap();
        assert_eq!(decoded.requestFid, U256::from(10626u64));
        assert_eq!(decoded.requestSigner, signer);
        assert_eq!(decoded.signature.as_ref(), &signature[..]);
        assert_eq!(decoded.deadline, U256::from(1_700_000_000u64));
    }
}
