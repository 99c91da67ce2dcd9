use std::cmp::max;

use keel_consensus_beacon::view::{ExitChurnView, ValidatorView};
use keel_consensus_misc::{constants::FAR_FUTURE_EPOCH, misc::compute_activation_exit_epoch};
use keel_network_spec::networks::BeaconNetworkSpec;

use crate::{churn::get_activation_exit_churn_limit, errors::ExitError};

/// How the exit epoch of a validator is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitChurn {
    /// Exit at the first epoch an exit initiated now can take effect, without touching the exit
    /// queue.
    Disabled,
    /// Queue the exit behind the balance-weighted exit churn.
    Enabled,
}

/// Initiate the exit of the validator with index ``index``. Returns the new exit epoch.
pub fn initiate_validator_exit<S>(
    state: &mut S,
    index: u64,
    churn: ExitChurn,
    network_spec: &BeaconNetworkSpec,
) -> Result<u64, ExitError>
where
    S: ValidatorView + ExitChurnView,
{
    let mut validator = state.validator_at(index)?.clone();

    // Return if validator already initiated exit
    if validator.exit_epoch != FAR_FUTURE_EPOCH {
        return Err(ExitError::AlreadyExited {
            index,
            exit_epoch: validator.exit_epoch,
        });
    }

    let exit_queue_epoch = match churn {
        ExitChurn::Disabled => compute_activation_exit_epoch(state.get_current_epoch()?),
        ExitChurn::Enabled => {
            compute_exit_epoch_and_update_churn(state, validator.effective_balance, network_spec)?
        }
    };

    // Set validator exit epoch and withdrawable epoch
    validator.exit_epoch = exit_queue_epoch;
    validator.withdrawable_epoch =
        exit_queue_epoch.saturating_add(network_spec.min_validator_withdrawability_delay);
    state.update_validator_at(index, validator)?;
    Ok(exit_queue_epoch)
}

pub fn compute_exit_epoch_and_update_churn<S>(
    state: &mut S,
    exit_balance: u64,
    network_spec: &BeaconNetworkSpec,
) -> Result<u64, ExitError>
where
    S: ValidatorView + ExitChurnView,
{
    let mut earliest_exit_epoch = max(
        state.earliest_exit_epoch()?,
        compute_activation_exit_epoch(state.get_current_epoch()?),
    );
    let per_epoch_churn =
        get_activation_exit_churn_limit(state.total_active_balance()?, network_spec);

    // New epoch for exits.
    let mut exit_balance_to_consume = if state.earliest_exit_epoch()? < earliest_exit_epoch {
        per_epoch_churn
    } else {
        state.exit_balance_to_consume()?
    };

    // Exit doesn't fit in the current earliest epoch.
    if exit_balance > exit_balance_to_consume {
        let balance_to_process = exit_balance - exit_balance_to_consume;
        let additional_epochs = (balance_to_process - 1) / per_epoch_churn + 1;
        earliest_exit_epoch += additional_epochs;
        exit_balance_to_consume += additional_epochs * per_epoch_churn;
    }

    // Consume the balance and update state variables.
    state.set_exit_balance_to_consume(exit_balance_to_consume - exit_balance)?;
    state.set_earliest_exit_epoch(earliest_exit_epoch)?;

    Ok(earliest_exit_epoch)
}
