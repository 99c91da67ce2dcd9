#![warn(clippy::unwrap_used)]

pub mod beacon_block_header;
pub mod checkpoint;
pub mod constants;
pub mod deposit_message;
pub mod deposit_request;
pub mod eth_1_data;
pub mod fork;
pub mod fork_data;
pub mod historical_summary;
pub mod misc;
pub mod pending_deposit;
pub mod pending_partial_withdrawal;
pub mod signing_data;
pub mod withdrawal;
