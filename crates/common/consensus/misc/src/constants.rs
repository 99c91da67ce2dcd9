use alloy_primitives::{aliases::B32, fixed_bytes};

pub const DOMAIN_AGGREGATE_AND_PROOF: B32 = fixed_bytes!("0x06000000");
pub const DOMAIN_BEACON_ATTESTER: B32 = fixed_bytes!("0x01000000");
pub const DOMAIN_BEACON_PROPOSER: B32 = fixed_bytes!("0x00000000");
pub const DOMAIN_BLS_TO_EXECUTION_CHANGE: B32 = fixed_bytes!("0x0A000000");
pub const DOMAIN_DEPOSIT: B32 = fixed_bytes!("0x03000000");
pub const DOMAIN_RANDAO: B32 = fixed_bytes!("0x02000000");
pub const DOMAIN_SYNC_COMMITTEE: B32 = fixed_bytes!("0x07000000");
pub const DOMAIN_VOLUNTARY_EXIT: B32 = fixed_bytes!("0x04000000");
pub const EFFECTIVE_BALANCE_INCREMENT: u64 = 1_000_000_000;
pub const FAR_FUTURE_EPOCH: u64 = 18446744073709551615;
pub const GENESIS_EPOCH: u64 = 0;
pub const GENESIS_SLOT: u64 = 0;
pub const MAX_SEED_LOOKAHEAD: u64 = 4;
pub const MIN_EPOCHS_TO_INACTIVITY_PENALTY: u64 = 4;
pub const SLOTS_PER_EPOCH: u64 = 32;

// Withdrawal prefixes
pub const BLS_WITHDRAWAL_PREFIX: u8 = 0x00;
pub const COMPOUNDING_WITHDRAWAL_PREFIX: u8 = 0x02;
pub const ETH1_ADDRESS_WITHDRAWAL_PREFIX: u8 = 0x01;

// Misc
pub const UNSET_DEPOSIT_REQUESTS_START_INDEX: u64 = u64::MAX;

// Gwei values
pub const MAX_EFFECTIVE_BALANCE_ELECTRA: u64 = 2_048_000_000_000;
pub const MIN_ACTIVATION_BALANCE: u64 = 32_000_000_000;
