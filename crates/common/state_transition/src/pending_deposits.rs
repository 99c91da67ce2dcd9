use std::{
    cmp::{max, min},
    collections::HashMap,
};

use keel_bls::{BLSSignature, PublicKey};
use keel_consensus_beacon::{electra::validator::Validator, view::BeaconStateAccess};
use keel_consensus_misc::{
    constants::{
        EFFECTIVE_BALANCE_INCREMENT, FAR_FUTURE_EPOCH, GENESIS_SLOT, MIN_ACTIVATION_BALANCE,
    },
    pending_deposit::PendingDeposit,
};
use keel_network_spec::networks::BeaconNetworkSpec;
use keel_signing::SigningDomain;
use tracing::{debug, info, warn};

use crate::{
    churn::get_activation_exit_churn_limit,
    errors::{InvalidDeposit, TransitionError},
};

/// What one pass over the pending deposit queue did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingDepositsOutcome {
    /// Gwei consumed from the churn budget.
    pub processed_amount: u64,
    pub topped_up: Vec<u64>,
    pub created: Vec<u64>,
    pub requeued: usize,
    pub dropped: Vec<(PublicKey, InvalidDeposit)>,
}

/// Drain the pending deposit queue against this epoch's churn budget. On error the state is left
/// as it was.
pub fn process_pending_deposits<S: BeaconStateAccess>(
    state: &mut S,
    network_spec: &BeaconNetworkSpec,
    signing_domain: &SigningDomain,
) -> Result<PendingDepositsOutcome, TransitionError> {
    let mut next_state = state.copy();
    let outcome = apply_pending_deposits(&mut next_state, network_spec, signing_domain)?;
    *state = next_state;
    Ok(outcome)
}

pub(crate) fn apply_pending_deposits<S: BeaconStateAccess>(
    state: &mut S,
    network_spec: &BeaconNetworkSpec,
    signing_domain: &SigningDomain,
) -> Result<PendingDepositsOutcome, TransitionError> {
    let validator_count = state.validator_count()?;
    let balance_count = state.balance_count()?;
    if validator_count != balance_count {
        return Err(TransitionError::InvalidState(format!(
            "{validator_count} validators but {balance_count} balances"
        )));
    }

    let current_epoch = state.get_current_epoch()?;
    let churn_limit = get_activation_exit_churn_limit(state.total_active_balance()?, network_spec);
    let available_for_processing = max(churn_limit, state.deposit_balance_to_consume()?);

    let mut validator_indices = HashMap::with_capacity(validator_count as usize);
    state.read_all_validators(|index, validator| {
        validator_indices.insert(validator.public_key.clone(), index);
        Ok(())
    })?;

    let pending_deposits = state.pending_deposits()?.to_vec();
    let mut outcome = PendingDepositsOutcome::default();
    let mut next_deposit_index = 0;
    // Postponed deposits and the excess of new validators, in the order they were met.
    let mut deposits_to_append = vec![];

    for deposit in &pending_deposits {
        let validator_index = validator_indices.get(&deposit.public_key).copied();

        if let Some(index) = validator_index
            && state.validator_at(index)?.is_exiting(current_epoch)
        {
            // Validator is exiting, postpone the deposit without consuming churn
            debug!(index, amount = deposit.amount, "Postponing deposit of exiting validator");
            deposits_to_append.push(deposit.clone());
            outcome.requeued += 1;
            next_deposit_index += 1;
            continue;
        }

        // Check if deposit fits in the churn, otherwise, do no more deposit processing in this
        // epoch.
        let processed_amount = outcome.processed_amount.saturating_add(deposit.amount);
        if processed_amount > available_for_processing {
            break;
        }
        outcome.processed_amount = processed_amount;
        next_deposit_index += 1;

        match validator_index {
            Some(index) => {
                apply_top_up(state, index, deposit.amount)?;
                outcome.topped_up.push(index);
            }
            None => match validate_new_deposit(deposit, signing_domain) {
                Ok(()) => {
                    let index = add_validator_to_registry(state, deposit)?;
                    validator_indices.insert(deposit.public_key.clone(), index);
                    outcome.created.push(index);

                    if deposit.amount > MIN_ACTIVATION_BALANCE {
                        deposits_to_append.push(PendingDeposit {
                            public_key: deposit.public_key.clone(),
                            withdrawal_credentials: deposit.withdrawal_credentials,
                            amount: deposit.amount - MIN_ACTIVATION_BALANCE,
                            signature: BLSSignature::infinity(),
                            slot: GENESIS_SLOT,
                        });
                    }
                }
                Err(reason) => {
                    warn!(
                        public_key = ?deposit.public_key,
                        amount = deposit.amount,
                        "Dropping deposit: {reason}"
                    );
                    outcome.dropped.push((deposit.public_key.clone(), reason));
                }
            },
        }
    }

    let remaining_deposits = pending_deposits
        .into_iter()
        .skip(next_deposit_index)
        .chain(deposits_to_append)
        .collect::<Vec<_>>();
    let queued = remaining_deposits.len();
    state.set_pending_deposits(remaining_deposits)?;
    state.set_deposit_balance_to_consume(available_for_processing - outcome.processed_amount)?;

    info!(
        epoch = current_epoch,
        processed_amount = outcome.processed_amount,
        topped_up = outcome.topped_up.len(),
        created = outcome.created.len(),
        requeued = outcome.requeued,
        dropped = outcome.dropped.len(),
        queued,
        "Processed pending deposits"
    );
    Ok(outcome)
}

/// A deposit for an unknown key must carry enough to activate and a valid proof of possession.
fn validate_new_deposit(
    deposit: &PendingDeposit,
    signing_domain: &SigningDomain,
) -> Result<(), InvalidDeposit> {
    if deposit.amount < MIN_ACTIVATION_BALANCE {
        return Err(InvalidDeposit::BelowActivationBalance {
            amount: deposit.amount,
        });
    }
    if !signing_domain.is_valid_deposit_signature(deposit) {
        return Err(InvalidDeposit::InvalidSignature);
    }
    Ok(())
}

/// Credit ``amount`` to an existing validator. The principal follows the balance up to the
/// validator's max effective balance.
fn apply_top_up<S: BeaconStateAccess>(
    state: &mut S,
    index: u64,
    amount: u64,
) -> Result<(), TransitionError> {
    state.increase_balance(index, amount)?;

    let mut validator = state.validator_at(index)?.clone();
    let principal_balance = validator
        .principal_balance
        .saturating_add(amount)
        .min(validator.get_max_effective_balance());
    if principal_balance != validator.principal_balance {
        validator.principal_balance = principal_balance;
        state.update_validator_at(index, validator)?;
    }
    Ok(())
}

pub fn get_validator_from_deposit(deposit: &PendingDeposit, balance: u64) -> Validator {
    let mut validator = Validator {
        public_key: deposit.public_key.clone(),
        withdrawal_credentials: deposit.withdrawal_credentials,
        effective_balance: 0,
        slashed: false,
        activation_eligibility_epoch: FAR_FUTURE_EPOCH,
        activation_epoch: FAR_FUTURE_EPOCH,
        exit_epoch: FAR_FUTURE_EPOCH,
        withdrawable_epoch: FAR_FUTURE_EPOCH,
        principal_balance: 0,
    };

    let max_effective_balance = validator.get_max_effective_balance();
    validator.effective_balance = min(
        balance - balance % EFFECTIVE_BALANCE_INCREMENT,
        max_effective_balance,
    );
    validator.principal_balance = balance.min(max_effective_balance);
    validator
}

/// Append a validator funded with the activation balance. Returns its index.
fn add_validator_to_registry<S: BeaconStateAccess>(
    state: &mut S,
    deposit: &PendingDeposit,
) -> Result<u64, TransitionError> {
    let validator = get_validator_from_deposit(deposit, MIN_ACTIVATION_BALANCE);
    let index = state.push_validator(validator, MIN_ACTIVATION_BALANCE)?;
    debug!(index, public_key = ?deposit.public_key, "Added validator from deposit");
    Ok(index)
}
