use alloy_primitives::B256;
use keel_bls::{BLSSignature, PublicKey};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct DepositRequest {
    #[serde(rename = "pubkey")]
    pub public_key: PublicKey,
    pub withdrawal_credentials: B256,
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
    pub signature: BLSSignature,
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_request_from_api_json() {
        let json = format!(
            r#"{{
                "pubkey": "0x{}",
                "withdrawal_credentials": "0x01{}",
                "amount": "32000000000",
                "signature": "0x{}",
                "index": "1337"
            }}"#,
            "a1".repeat(48),
            "00".repeat(31),
            "c0".to_string() + &"00".repeat(95),
        );

        let deposit_request: DepositRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(deposit_request.public_key.to_bytes(), &[0xa1; 48]);
        assert_eq!(deposit_request.withdrawal_credentials[0], 0x01);
        assert_eq!(deposit_request.amount, 32_000_000_000);
        assert!(deposit_request.signature.is_infinity());
        assert_eq!(deposit_request.index, 1337);

        let reencoded = serde_json::to_value(&deposit_request).unwrap();
        assert_eq!(reencoded["amount"], "32000000000");
        assert_eq!(reencoded["index"], "1337");
    }
}
