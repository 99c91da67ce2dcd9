#![warn(clippy::unwrap_used)]

pub mod churn;
pub mod deposit_requests;
pub mod epoch;
pub mod errors;
pub mod exit;
pub mod pending_deposits;
pub mod registry_updates;
pub mod upgrade;

#[cfg(test)]
pub(crate) mod test_utils;
