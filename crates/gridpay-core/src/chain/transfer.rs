use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;
use solana_system_interface::instruction as system_instruction;

use super::ChainError;

/// Build an unsigned native SOL transfer with `from` as the fee payer.
pub fn build_native_transfer(from: &Pubkey, to: &Pubkey, lamports: u64, blockhash: Hash) -> Transaction {
    let ix = system_instruction::transfer(from, to, lamports);
    let mut tx = Transaction::new_with_payer(&[ix], Some(from));
    tx.message.recent_blockhash = blockhash;
    tx
}

/// Serialize a transaction without signatures and encode it as base64.
pub fn encode_unsigned(tx: &Transaction) -> Result<String, ChainError> {
    let bytes = bincode::serialize(tx)?;
    Ok(BASE64.encode(bytes))
}
