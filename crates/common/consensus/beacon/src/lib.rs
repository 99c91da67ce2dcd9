#![warn(clippy::unwrap_used)]

pub mod beacon_state;
pub mod deneb;
pub mod electra;
pub mod errors;
pub mod fork_name;
pub mod serde_helpers;
pub mod view;
