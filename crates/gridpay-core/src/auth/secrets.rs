//! Per-login session secrets.
//!
//! A fresh ed25519 session key is generated for every login. Its public half
//! is registered with Grid when authentication completes; the secret half
//! stays in process memory and signs every transaction of the session.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::VersionedTransaction;
use thiserror::Error;
use tracing::debug;

use crate::api::TransactionPayload;

/// Provider tag reported for the session key
pub const SESSION_KEY_PROVIDER: &str = "solana";

#[derive(Error, Debug)]
pub enum SigningError {
    #[error("transaction is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("transaction could not be decoded: {0}")]
    Deserialize(#[source] bincode::Error),

    #[error("transaction could not be re-encoded: {0}")]
    Serialize(#[source] bincode::Error),

    #[error("session key {0} is not a required signer of this transaction")]
    NotASigner(Pubkey),

    #[error("missing session signing context")]
    MissingContext,
}

/// Secret material for one login session. Never serialized or persisted.
pub struct SessionSecrets {
    keypair: Keypair,
    pub provider: &'static str,
    pub created_at: DateTime<Utc>,
}

impl SessionSecrets {
    pub fn generate() -> Self {
        let secrets = Self {
            keypair: Keypair::new(),
            provider: SESSION_KEY_PROVIDER,
            created_at: Utc::now(),
        };
        debug!(public_key = %secrets.public_key(), "Generated session key");
        secrets
    }

    pub fn public_key(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Sign a base64 transaction with the session key, filling the session
    /// key's required-signer slot. Other fields of the payload pass through.
    pub fn sign_payload(&self, payload: &TransactionPayload) -> Result<TransactionPayload, SigningError> {
        let bytes = BASE64.decode(payload.transaction.trim())?;
        let mut tx: VersionedTransaction =
            bincode::deserialize(&bytes).map_err(SigningError::Deserialize)?;

        let signer = self.public_key();
        let required = usize::from(tx.message.header().num_required_signatures);
        let position = tx
            .message
            .static_account_keys()
            .iter()
            .take(required)
            .position(|key| *key == signer)
            .ok_or(SigningError::NotASigner(signer))?;

        let signature = self.keypair.sign_message(&tx.message.serialize());
        if tx.signatures.len() < required {
            tx.signatures.resize(required, Signature::default());
        }
        tx.signatures[position] = signature;
        debug!(%signature, position, "Signed transaction with session key");

        let encoded = bincode::serialize(&tx).map_err(SigningError::Serialize)?;
        Ok(TransactionPayload {
            transaction: BASE64.encode(encoded),
            ..payload.clone()
        })
    }
}

impl fmt::Debug for SessionSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSecrets")
            .field("public_key", &self.public_key())
            .field("provider", &self.provider)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::hash::Hash;
    use solana_sdk::transaction::Transaction;

    fn payload_for(tx: &Transaction) -> TransactionPayload {
        TransactionPayload {
            transaction: BASE64.encode(bincode::serialize(tx).unwrap()),
            kms_payloads: Some(serde_json::json!([{ "provider": "privy" }])),
            transaction_signers: vec![],
        }
    }

    fn transfer_from(payer: &Pubkey) -> Transaction {
        let recipient = Pubkey::new_unique();
        let ix = solana_system_interface::instruction::transfer(payer, &recipient, 5_000);
        let mut tx = Transaction::new_with_payer(&[ix], Some(payer));
        tx.message.recent_blockhash = Hash::new_unique();
        tx
    }

    #[test]
    fn test_fresh_keys_per_session() {
        let a = SessionSecrets::generate();
        let b = SessionSecrets::generate();
        assert_ne!(a.public_key(), b.public_key());
        assert_eq!(a.provider, SESSION_KEY_PROVIDER);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let secrets = SessionSecrets::generate();
        let printed = format!("{:?}", secrets);
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains(&secrets.public_key().to_string()));
    }

    #[test]
    fn test_sign_payload_fills_signer_slot() {
        let secrets = SessionSecrets::generate();
        let tx = transfer_from(&secrets.public_key());
        let payload = payload_for(&tx);

        let signed = secrets.sign_payload(&payload).unwrap();
        assert_eq!(signed.kms_payloads, payload.kms_payloads);

        let bytes = BASE64.decode(&signed.transaction).unwrap();
        let decoded: VersionedTransaction = bincode::deserialize(&bytes).unwrap();
        let message = decoded.message.serialize();
        assert!(decoded.signatures[0].verify(secrets.public_key().as_ref(), &message));
    }

    #[test]
    fn test_sign_payload_rejects_foreign_transaction() {
        let secrets = SessionSecrets::generate();
        let tx = transfer_from(&Pubkey::new_unique());
        let err = secrets.sign_payload(&payload_for(&tx)).unwrap_err();
        assert!(matches!(err, SigningError::NotASigner(key) if key == secrets.public_key()));
    }

    #[test]
    fn test_sign_payload_rejects_garbage() {
        let secrets = SessionSecrets::generate();
        let bad_base64 = TransactionPayload {
            transaction: "not base64!".into(),
            kms_payloads: None,
            transaction_signers: vec![],
        };
        assert!(matches!(secrets.sign_payload(&bad_base64), Err(SigningError::Decode(_))));

        let bad_tx = TransactionPayload {
            transaction: BASE64.encode([1u8, 2, 3]),
            ..bad_base64
        };
        assert!(matches!(secrets.sign_payload(&bad_tx), Err(SigningError::Deserialize(_))));
    }
}
