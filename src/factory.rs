//! Message assembly: canonical encoding, hashing, signing.
//!
//! A built envelope always embeds the exact bytes its hash was computed
//! over, and its signature is checked before it leaves this module, so no
//! envelope with a stale hash or unverifiable signature can exist.

use prost::Message as _;

use crate::proto::{
    message_data, CastAddBody, FarcasterNetwork, HashScheme, Message, MessageData, MessageType,
    SignatureScheme,
};
use crate::signer::{self, MessageSigner};

/// Envelope hashes are blake3-256 truncated to 20 bytes.
pub const MESSAGE_HASH_LENGTH: usize = 20;

/// Per-message header fields.
///
/// `timestamp` is in Farcaster seconds; `None` means "now".
#[derive(Clone, Copy, Debug)]
pub struct MessageHeader {
    pub fid: u64,
    pub network: FarcasterNetwork,
    pub timestamp: Option<u32>,
}

/// Build a signed cast-add envelope.
pub async fn build(
    body: CastAddBody,
    header: MessageHeader,
    signer: &MessageSigner,
) -> Result<Message, crate::Error> {
    let timestamp = match header.timestamp {
        Some(ts) => ts,
        None => crate::time::farcaster_time()?,
    };
    crate::time::validate_timestamp(timestamp)?;

    let data = MessageData {
        r#type: MessageType::CastAdd as i32,
        fid: header.fid,
        timestamp,
        network: header.network as i32,
        body: Some(message_data::Body::CastAddBody(body)),
    };

    let data_bytes = data.encode_to_vec();
    let hash = message_hash(&data_bytes);

    let signature = signer.sign(&hash).await?;
    signer.verify(&hash, &signature)?;

    Ok(Message {
        data: Some(data),
        hash,
        hash_scheme: HashScheme::Blake3 as i32,
        signature,
        signature_scheme: signer.scheme() as i32,
        signer: signer.public_key(),
        data_bytes: Some(data_bytes),
    })
}

/// Canonical hash of encoded message data.
pub fn message_hash(data_bytes: &[u8]) -> Vec<u8> {
    blake3::hash(data_bytes).as_bytes()[..MESSAGE_HASH_LENGTH].to_vec()
}

/// Check an envelope's internal invariants: the hash matches its own
/// canonical bytes and the signature validates under the declared scheme.
pub fn verify_envelope(message: &Message) -> Result<(), crate::Error> {
    let data_bytes = match &message.data_bytes {
        Some(bytes) => bytes.clone(),
        None => message
            .data
            .as_ref()
            .ok_or_else(|| crate::Error::Signing("envelope has no message data".into()))?
            .encode_to_vec(),
    };

    if message.hash_scheme != HashScheme::Blake3 as i32 {
        return Err(crate::Error::Signing("unsupported hash scheme".into()));
    }
    if message.hash != message_hash(&data_bytes) {
        return Err(crate::Error::Signing(
            "envelope hash does not match its canonical bytes".into(),
        ));
    }

    let scheme = SignatureScheme::try_from(message.signature_scheme)
        .map_err(|_| crate::Error::Signing("unknown signature scheme".into()))?;
    signer::verify_signature(scheme, &message.signer, &message.hash, &message.signature)
}
