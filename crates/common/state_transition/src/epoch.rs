use keel_consensus_beacon::view::BeaconStateAccess;
use keel_network_spec::networks::BeaconNetworkSpec;
use keel_signing::SigningDomain;
use tracing::info;

use crate::{
    errors::TransitionError,
    pending_deposits::{PendingDepositsOutcome, apply_pending_deposits},
    registry_updates::{RegistryUpdates, apply_registry_updates},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpochOutcome {
    pub registry_updates: RegistryUpdates,
    pub pending_deposits: PendingDepositsOutcome,
}

/// Registry updates followed by the pending deposit queue. Both run on one copy of ``state``,
/// which replaces ``state`` only once both have succeeded.
pub fn process_epoch<S: BeaconStateAccess>(
    state: &mut S,
    network_spec: &BeaconNetworkSpec,
    signing_domain: &SigningDomain,
) -> Result<EpochOutcome, TransitionError> {
    let mut next_state = state.copy();
    let registry_updates = apply_registry_updates(&mut next_state, network_spec)?;
    let pending_deposits = apply_pending_deposits(&mut next_state, network_spec, signing_domain)?;
    *state = next_state;

    info!(epoch = state.get_current_epoch()?, "Processed epoch");
    Ok(EpochOutcome {
        registry_updates,
        pending_deposits,
    })
}
