// src/parser.rs
use alloy::sol;
use alloy::sol_types::SolEvent;

use crate::error::DecodeError;
use crate::models::DepositRecord;

sol! {
    /// Emitted by the deposit contract for every validator deposit
    event DepositEvent(bytes pubkey, bytes withdrawal_credentials, bytes amount, bytes signature, bytes index);
}

/// The five `bytes` arguments of a `DepositEvent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDeposit {
    pub pubkey: Vec<u8>,                 // 48 bytes BLS public key
    pub withdrawal_credentials: Vec<u8>, // 32 bytes
    pub amount: Vec<u8>,                 // 8 bytes, little-endian gwei
    pub signature: Vec<u8>,              // 96 bytes BLS signature
    pub index: Vec<u8>,                  // 8 bytes, little-endian deposit count
}

impl DecodedDeposit {
    pub fn amount_gwei(&self) -> Option<u64> {
        le_u64(&self.amount)
    }

    pub fn deposit_index(&self) -> Option<u64> {
        le_u64(&self.index)
    }

    pub fn into_record(self, block: u64) -> DepositRecord {
        DepositRecord {
            block,
            amount_gwei: self.amount_gwei(),
            index: self.deposit_index(),
            pubkey: format!("0x{}", hex::encode(&self.pubkey)),
            withdrawal_credentials: format!("0x{}", hex::encode(&self.withdrawal_credentials)),
            signature: format!("0x{}", hex::encode(&self.signature)),
        }
    }
}

fn le_u64(bytes: &[u8]) -> Option<u64> {
    let arr: [u8; 8] = bytes.try_into().ok()?;
    Some(u64::from_le_bytes(arr))
}

/// Decode the ABI data of a deposit log (`0x`-prefixed hex)
pub fn decode_deposit(data: &str) -> Result<DecodedDeposit, DecodeError> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    let buf = hex::decode(digits)?;

    let (pubkey, withdrawal_credentials, amount, signature, index) =
        DepositEvent::abi_decode_data(&buf)?;

    Ok(DecodedDeposit {
        pubkey: pubkey.to_vec(),
        withdrawal_credentials: withdrawal_credentials.to_vec(),
        amount: amount.to_vec(),
        signature: signature.to_vec(),
        index: index.to_vec(),
    })
}
