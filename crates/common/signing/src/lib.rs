#![warn(clippy::unwrap_used)]

pub mod domain;
pub mod errors;
pub mod fork_digest_cache;
pub mod verify;

pub use domain::SigningDomain;
pub use errors::SigningError;
pub use fork_digest_cache::ForkDigestCache;
