//! Wire types for hub messages.
//!
//! Hand-derived prost messages matching the hub message schema. The prost
//! encoding of [`MessageData`] (fields in tag order) is the canonical byte
//! form that gets hashed and signed; the envelope carries those exact bytes
//! in `data_bytes` so the hub verifies against the same encoding.

/// Network a message is intended for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, prost::Enumeration)]
#[repr(i32)]
pub enum FarcasterNetwork {
    None = 0,
    Mainnet = 1,
    Testnet = 2,
    Devnet = 3,
}

/// Message payload discriminator. Only cast-add is produced by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, prost::Enumeration)]
#[repr(i32)]
pub enum MessageType {
    None = 0,
    CastAdd = 1,
}

/// Hash function used over the canonical message bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, prost::Enumeration)]
#[repr(i32)]
pub enum HashScheme {
    None = 0,
    Blake3 = 1,
}

/// Signature algorithm used over the message hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, prost::Enumeration)]
#[repr(i32)]
pub enum SignatureScheme {
    None = 0,
    /// Ed25519 over the raw digest, signed with a registered app key.
    Ed25519 = 1,
    /// EIP-712 typed-data signature from the custody (or derived) wallet.
    Eip712 = 2,
}

/// Rendering variant of a cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, prost::Enumeration)]
#[repr(i32)]
pub enum CastType {
    Cast = 0,
    LongCast = 1,
}

/// Identifier of an existing cast, for embeds.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CastId {
    #[prost(uint64, tag = "1")]
    pub fid: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub hash: Vec<u8>,
}

/// A single embedded object: a URL or a reference to another cast.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Embed {
    #[prost(oneof = "embed::Embed", tags = "1, 2")]
    pub embed: Option<embed::Embed>,
}

pub mod embed {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Embed {
        #[prost(string, tag = "1")]
        Url(String),
        #[prost(message, tag = "2")]
        CastId(super::CastId),
    }
}

/// Body of a content post ("cast").
///
/// `mentions` and `mentions_positions` are parallel: the i-th mentioned fid
/// is spliced into `text` at byte offset `mentions_positions[i]`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CastAddBody {
    #[prost(string, repeated, tag = "1")]
    pub embeds_deprecated: Vec<String>,
    #[prost(uint64, repeated, tag = "2")]
    pub mentions: Vec<u64>,
    #[prost(string, tag = "4")]
    pub text: String,
    #[prost(uint32, repeated, tag = "5")]
    pub mentions_positions: Vec<u32>,
    #[prost(message, repeated, tag = "6")]
    pub embeds: Vec<Embed>,
    #[prost(enumeration = "CastType", tag = "8")]
    pub r#type: i32,
}

impl CastAddBody {
    /// A plain text cast with no embeds or mentions.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            r#type: CastType::Cast as i32,
            ..Default::default()
        }
    }
}

/// The signed-over portion of a message: body plus header fields.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MessageData {
    #[prost(enumeration = "MessageType", tag = "1")]
    pub r#type: i32,
    #[prost(uint64, tag = "2")]
    pub fid: u64,
    #[prost(uint32, tag = "3")]
    pub timestamp: u32,
    #[prost(enumeration = "FarcasterNetwork", tag = "4")]
    pub network: i32,
    #[prost(oneof = "message_data::Body", tags = "5")]
    pub body: Option<message_data::Body>,
}

pub mod message_data {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Body {
        #[prost(message, tag = "5")]
        CastAddBody(super::CastAddBody),
    }
}

/// The signed, hash-addressed envelope submitted to a hub.
///
/// Immutable once built: `hash` is blake3-160 over `data_bytes`, and the
/// signature covers `hash` under `signature_scheme` / `signer`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Message {
    #[prost(message, optional, tag = "1")]
    pub data: Option<MessageData>,
    #[prost(bytes = "vec", tag = "2")]
    pub hash: Vec<u8>,
    #[prost(enumeration = "HashScheme", tag = "3")]
    pub hash_scheme: i32,
    #[prost(bytes = "vec", tag = "4")]
    pub signature: Vec<u8>,
    #[prost(enumeration = "SignatureScheme", tag = "5")]
    pub signature_scheme: i32,
    #[prost(bytes = "vec", tag = "6")]
    pub signer: Vec<u8>,
    /// Exact encoded `MessageData` bytes the hash was computed over.
    #[prost(bytes = "vec", optional, tag = "7")]
    pub data_bytes: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message as _;

    #[test]
    fn encoding_is_deterministic() {
        let data = MessageData {
            r#type: MessageType::CastAdd as i32,
            fid: 10626,
            timestamp: 107_778_482,
            network: FarcasterNetwork::Mainnet as i32,
            body: Some(message_data::Body::CastAddBody(CastAddBody::text("hello"))),
        };
        assert_eq!(data.encode_to_vec(), data.clone().encode_to_vec());
    }

    #[test]
    fn distinct_payloads_encode_differently() {
        let a = MessageData {
            r#type: MessageType::CastAdd as i32,
            fid: 1,
            timestamp: 100,
            network: FarcasterNetwork::Mainnet as i32,
            body: Some(message_data::Body::CastAddBody(CastAddBody::text("a"))),
        };
        let mut b = a.clone();
        b.timestamp = 101;
        assert_ne!(a.encode_to_vec(), b.encode_to_vec());
    }

    #[test]
    fn round_trip_preserves_fields() {
        let body = CastAddBody {
            mentions: vec![10626],
            mentions_positions: vec![0],
            embeds: vec![Embed {
                embed: Some(embed::Embed::Url("https://example.com".into())),
            }],
            ..CastAddBody::text("gm ")
        };
        let data = MessageData {
            r#type: MessageType::CastAdd as i32,
            fid: 10626,
            timestamp: 1,
            network: FarcasterNetwork::Testnet as i32,
            body: Some(message_data::Body::CastAddBody(body.clone())),
        };
        let decoded = MessageData::decode(data.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, data);
        match decoded.body {
            Some(message_data::Body::CastAddBody(b)) => assert_eq!(b, body),
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
