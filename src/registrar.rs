//! On-chain app key registration through the KeyGateway contract.
//!
//! The flow is strictly ordered: sign the key request with the account's
//! wallet, simulate `add()`, broadcast, wait (bounded) for one confirmation,
//! then sleep the settling delay so hubs catch up with chain state. The
//! returned [`AppKeySigner`] does not exist before that point, which is what
//! keeps "submit before the key is indexed" out of reach.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use std::time::Duration;
use tracing::info;

use crate::eip712::{self, KeyGateway};
use crate::signer::{AppKeySigner, MessageSigner, UnregisteredAppKey};

/// Registers app keys against a KeyGateway deployment.
pub struct KeyRegistrar<P> {
    provider: P,
    gateway: Address,
    confirmation_timeout: Duration,
    settle_delay: Duration,
}

impl<P: Provider> KeyRegistrar<P> {
    /// The provider must carry a wallet for the custody account so it can
    /// broadcast `add()` transactions.
    pub fn new(
        provider: P,
        gateway: Address,
        confirmation_timeout: Duration,
        settle_delay: Duration,
    ) -> Self {
        Self {
            provider,
            gateway,
            confirmation_timeout,
            settle_delay,
        }
    }

    /// Register `key` for `request_fid` and return it as a usable signer.
    ///
    /// `deadline` is unix seconds; the gateway rejects metadata whose
    /// deadline has passed by the time the transaction mines, so expired
    /// deadlines are refused here before anything is signed or broadcast.
    pub async fn register(
        &self,
        account_signer: &MessageSigner,
        key: UnregisteredAppKey,
        request_fid: u64,
        deadline: u64,
    ) -> Result<AppKeySigner, crate::Error> {
        ensure_deadline_valid(deadline, crate::time::unix_now_secs())?;

        let public_key = key.public_key();
        let signature = account_signer
            .sign_key_request(request_fid, &public_key, deadline)
            .await?;
        let request_signer = Address::from_slice(&account_signer.public_key());
        let metadata = eip712::encode_signed_key_request_metadata(
            request_fid,
            request_signer,
            &signature,
            deadline,
        );

        let call = KeyGateway::addCall {
            keyType: eip712::KEY_TYPE_ED25519,
            key: Bytes::copy_from_slice(&public_key),
            metadataType: eip712::METADATA_TYPE_SIGNED_KEY_REQUEST,
            metadata: Bytes::from(metadata),
        };
        let tx = TransactionRequest::default()
            .with_to(self.gateway)
            .with_input(call.abi_encode());

        // Simulate before spending gas; a revert here means bad arguments
        // or missing authorization, not a transient fault.
        if let Err(e) = self.provider.call(tx.clone()).await {
            return Err(match e.as_error_resp() {
                Some(payload) => {
                    crate::Error::ContractValidation(format!("add() simulation reverted: {payload}"))
                }
                None => crate::Error::Rpc(format!("add() simulation failed: {e}")),
            });
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| crate::Error::Rpc(format!("broadcast failed: {e}")))?;
        let tx_hash = *pending.tx_hash();
        info!(tx = %tx_hash, key = %hex::encode(public_key), "Key registration broadcast");

        let receipt = match tokio::time::timeout(
            self.confirmation_timeout,
            pending.with_required_confirmations(1).get_receipt(),
        )
        .await
        {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                return Err(crate::Error::Rpc(format!("confirmation watch failed: {e}")))
            }
            Err(_) => {
                return Err(crate::Error::ContractTimeout(format!(
                    "transaction {tx_hash} unconfirmed after {}s",
                    self.confirmation_timeout.as_secs()
                )))
            }
        };

        if !receipt.status() {
            // A revert after mining is usually metadata whose deadline
            // lapsed while the transaction sat in the mempool.
            return Err(if crate::time::unix_now_secs() > deadline {
                crate::Error::DeadlineExpired(format!(
                    "deadline {deadline} passed before transaction {tx_hash} mined"
                ))
            } else {
                crate::Error::ContractValidation(format!("add() reverted in transaction {tx_hash}"))
            });
        }

        info!(
            tx = %receipt.transaction_hash,
            block = receipt.block_number.unwrap_or_default(),
            "Key registration confirmed"
        );

        if !self.settle_delay.is_zero() {
            info!(
                delay_secs = self.settle_delay.as_secs(),
                "Waiting for hubs to index the new key"
            );
            tokio::time::sleep(self.settle_delay).await;
        }

        Ok(AppKeySigner::assume_registered(key))
    }
}

/// A deadline `duration` from now, in unix seconds.
pub fn deadline_in(duration: Duration) -> u64 {
    crate::time::unix_now_secs() + duration.as_secs()
}

fn ensure_deadline_valid(deadline: u64, now: u64) -> Result<(), crate::Error> {
    if deadline <= now {
        return Err(crate::Error::DeadlineExpired(format!(
            "deadline {deadline} is not in the future (now {now})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialStore;
    use alloy::providers::ProviderBuilder;

    const TEST_MNEMONIC: &str =
        "test test test test test test test test test test test junk";

    #[test]
    fn deadline_must_be_in_the_future() {
        assert!(ensure_deadline_valid(101, 100).is_ok());
        assert!(matches!(
            ensure_deadline_valid(100, 100),
            Err(crate::Error::DeadlineExpired(_))
        ));
        assert!(matches!(
            ensure_deadline_valid(99, 100),
            Err(crate::Error::DeadlineExpired(_))
        ));
    }

    #[tokio::test]
    async fn expired_deadline_fails_before_any_broadcast() {
        // Unroutable endpoint: the check must fire before any RPC traffic.
        let provider = ProviderBuilder::new().connect_http("http://127.0.0.1:9".parse().unwrap());
        let registrar = KeyRegistrar::new(
            provider,
            eip712::KEY_GATEWAY_ADDRESS,
            Duration::from_secs(1),
            Duration::ZERO,
        );

        let store = CredentialStore::from_mnemonic(TEST_MNEMONIC).unwrap();
        let account = MessageSigner::derived(&store).unwrap();
        let key = UnregisteredAppKey::from_seed(&[5u8; 32]).unwrap();

        let past = crate::time::unix_now_secs() - 1;
        let err = registrar
            .register(&account, key, 10626, past)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::DeadlineExpired(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn deadline_in_adds_to_now() {
        let deadline = deadline_in(Duration::from_secs(3600));
        let now = crate::time::unix_now_secs();
        assert!(deadline >= now + 3599 && deadline <= now + 3601);
    }
}
