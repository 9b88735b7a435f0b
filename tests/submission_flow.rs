// =============================================================================
// Submission Flow Integration Tests
// =============================================================================
// End-to-end coverage of the signing pipeline, no live hub or chain:
// - Credentials -> signer -> factory -> verified envelope, per scheme
// - Canonical hash stability across independent builds
// - The hub-side identity (hash) is what dedup keys on
//
// Run with:
//   cargo test --test submission_flow

use hubcast::proto::{CastAddBody, FarcasterNetwork, HashScheme, SignatureScheme};
use hubcast::{
    factory, AppKeySigner, CredentialStore, MessageHeader, MessageSigner, UnregisteredAppKey,
};

const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

fn make_deterministic_app_key() -> MessageSigner {
    // Stable key for deterministic test behavior.
    let key = UnregisteredAppKey::from_seed(&[7u8; 32]).unwrap();
    MessageSigner::app_key(AppKeySigner::assume_registered(key))
}

fn mainnet_header(timestamp: u32) -> MessageHeader {
    MessageHeader {
        fid: 10626,
        network: FarcasterNetwork::Mainnet,
        timestamp: Some(timestamp),
    }
}

#[tokio::test]
async fn app_key_envelope_is_stable_and_verifiable() {
    let signer = make_deterministic_app_key();
    let timestamp = hubcast::time::farcaster_time().unwrap();

    let first = factory::build(CastAddBody::text("hello"), mainnet_header(timestamp), &signer)
        .await
        .unwrap();
    let second = factory::build(CastAddBody::text("hello"), mainnet_header(timestamp), &signer)
        .await
        .unwrap();

    // Two independent builds of the same (body, header) share an identity.
    assert_eq!(first.hash, second.hash);
    assert_eq!(first.hash.len(), factory::MESSAGE_HASH_LENGTH);
    assert_eq!(first.hash_scheme, HashScheme::Blake3 as i32);
    assert_eq!(first.signature_scheme, SignatureScheme::Ed25519 as i32);
    assert_eq!(first.signer.len(), 32);

    factory::verify_envelope(&first).unwrap();
    factory::verify_envelope(&second).unwrap();
}

#[tokio::test]
async fn wallet_backed_envelopes_verify_under_eip712() {
    let store = CredentialStore::from_mnemonic(TEST_MNEMONIC).unwrap();
    let custody = MessageSigner::custody(&store).unwrap();
    let derived = MessageSigner::derived(&store).unwrap();
    let timestamp = hubcast::time::farcaster_time().unwrap();

    let from_custody = factory::build(
        CastAddBody::text("hello"),
        mainnet_header(timestamp),
        &custody,
    )
    .await
    .unwrap();
    let from_derived = factory::build(
        CastAddBody::text("hello"),
        mainnet_header(timestamp),
        &derived,
    )
    .await
    .unwrap();

    assert_eq!(from_custody.signature_scheme, SignatureScheme::Eip712 as i32);
    assert_eq!(from_custody.signer.len(), 20);
    // Same key, same payload: the two wallet backends are interchangeable.
    assert_eq!(from_custody.hash, from_derived.hash);
    assert_eq!(from_custody.signature, from_derived.signature);

    factory::verify_envelope(&from_custody).unwrap();
    factory::verify_envelope(&from_derived).unwrap();
}

#[tokio::test]
async fn envelope_identity_tracks_content() {
    let signer = make_deterministic_app_key();
    let timestamp = hubcast::time::farcaster_time().unwrap();

    let base = factory::build(CastAddBody::text("hello"), mainnet_header(timestamp), &signer)
        .await
        .unwrap();

    let different_text = factory::build(
        CastAddBody::text("hello world"),
        mainnet_header(timestamp),
        &signer,
    )
    .await
    .unwrap();
    assert_ne!(base.hash, different_text.hash);

    let different_time = factory::build(
        CastAddBody::text("hello"),
        mainnet_header(timestamp + 1),
        &signer,
    )
    .await
    .unwrap();
    assert_ne!(base.hash, different_time.hash);

    let different_network = factory::build(
        CastAddBody::text("hello"),
        MessageHeader {
            fid: 10626,
            network: FarcasterNetwork::Testnet,
            timestamp: Some(timestamp),
        },
        &signer,
    )
    .await
    .unwrap();
    assert_ne!(base.hash, different_network.hash);
}

#[tokio::test]
async fn mentions_and_embeds_survive_the_round_trip() {
    use hubcast::proto::{embed, Embed};

    let body = CastAddBody {
        mentions: vec![10626],
        mentions_positions: vec![3],
        embeds: vec![Embed {
            embed: Some(embed::Embed::Url("https://example.com/post".into())),
        }],
        ..CastAddBody::text("gm ")
    };
    let signer = make_deterministic_app_key();
    let timestamp = hubcast::time::farcaster_time().unwrap();

    let message = factory::build(body.clone(), mainnet_header(timestamp), &signer)
        .await
        .unwrap();
    factory::verify_envelope(&message).unwrap();

    let data = message.data.unwrap();
    assert_eq!(data.fid, 10626);
    match data.body.unwrap() {
        hubcast::proto::message_data::Body::CastAddBody(decoded) => {
            assert_eq!(decoded, body);
        }
    }
}
