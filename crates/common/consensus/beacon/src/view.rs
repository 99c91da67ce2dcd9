use alloy_primitives::B256;
use keel_consensus_misc::{
    constants::{EFFECTIVE_BALANCE_INCREMENT, GENESIS_EPOCH, MIN_EPOCHS_TO_INACTIVITY_PENALTY},
    fork::Fork,
    misc::compute_epoch_at_slot,
    pending_deposit::PendingDeposit,
};
use ssz_types::VariableList;

use crate::{
    beacon_state::{BeaconState, map_beacon_state},
    electra::validator::Validator,
    errors::{StateError, checked_index},
    fork_name::ForkName,
};

pub trait CoreView {
    fn fork_name(&self) -> ForkName;
    fn slot(&self) -> Result<u64, StateError>;
    fn fork(&self) -> Result<Fork, StateError>;
    fn genesis_validators_root(&self) -> Result<B256, StateError>;
    fn finalized_checkpoint_epoch(&self) -> Result<u64, StateError>;

    /// Return the current epoch.
    fn get_current_epoch(&self) -> Result<u64, StateError> {
        Ok(compute_epoch_at_slot(self.slot()?))
    }

    /// Return the previous epoch (unless the current epoch is ``GENESIS_EPOCH``).
    fn get_previous_epoch(&self) -> Result<u64, StateError> {
        let current_epoch = self.get_current_epoch()?;
        Ok(if current_epoch == GENESIS_EPOCH {
            GENESIS_EPOCH
        } else {
            current_epoch - 1
        })
    }

    fn get_finality_delay(&self) -> Result<u64, StateError> {
        Ok(self
            .get_previous_epoch()?
            .saturating_sub(self.finalized_checkpoint_epoch()?))
    }

    fn is_in_inactivity_leak(&self) -> Result<bool, StateError> {
        Ok(self.get_finality_delay()? > MIN_EPOCHS_TO_INACTIVITY_PENALTY)
    }
}

pub trait ValidatorView: CoreView {
    fn validator_count(&self) -> Result<u64, StateError>;
    fn validator_at(&self, index: u64) -> Result<&Validator, StateError>;
    fn update_validator_at(&mut self, index: u64, validator: Validator) -> Result<(), StateError>;

    /// Visit every validator in index order without copying the registry.
    fn read_all_validators<F>(&self, visitor: F) -> Result<(), StateError>
    where
        F: FnMut(u64, &Validator) -> Result<(), StateError>;

    /// Append ``validator`` with ``balance`` and zeroed participation and inactivity entries.
    /// Returns the new validator index.
    fn push_validator(&mut self, validator: Validator, balance: u64) -> Result<u64, StateError>;

    /// Return the combined effective balance of the active validators, at least
    /// ``EFFECTIVE_BALANCE_INCREMENT`` to avoid divisions by zero.
    fn total_active_balance(&self) -> Result<u64, StateError> {
        let current_epoch = self.get_current_epoch()?;
        let mut total = 0u64;
        self.read_all_validators(|_, validator| {
            if validator.is_active_validator(current_epoch) {
                total = total.saturating_add(validator.effective_balance);
            }
            Ok(())
        })?;
        Ok(total.max(EFFECTIVE_BALANCE_INCREMENT))
    }
}

pub trait BalanceView: CoreView {
    fn balance_count(&self) -> Result<u64, StateError>;
    fn balance_at(&self, index: u64) -> Result<u64, StateError>;
    fn update_balance_at(&mut self, index: u64, balance: u64) -> Result<(), StateError>;

    /// Increase the validator balance at index ``index`` by ``delta``.
    fn increase_balance(&mut self, index: u64, delta: u64) -> Result<(), StateError> {
        let balance = self.balance_at(index)?;
        self.update_balance_at(index, balance.saturating_add(delta))
    }
}

pub trait InactivityView: CoreView {
    fn inactivity_score_at(&self, index: u64) -> Result<u64, StateError>;
}

pub trait PendingDepositsView: CoreView {
    fn pending_deposits(&self) -> Result<&[PendingDeposit], StateError>;
    fn set_pending_deposits(&mut self, deposits: Vec<PendingDeposit>) -> Result<(), StateError>;
    fn append_pending_deposit(&mut self, deposit: PendingDeposit) -> Result<(), StateError>;
    fn deposit_balance_to_consume(&self) -> Result<u64, StateError>;
    fn set_deposit_balance_to_consume(&mut self, amount: u64) -> Result<(), StateError>;
    fn deposit_requests_start_index(&self) -> Result<u64, StateError>;
    fn set_deposit_requests_start_index(&mut self, index: u64) -> Result<(), StateError>;
}

pub trait ExitChurnView: CoreView {
    fn exit_balance_to_consume(&self) -> Result<u64, StateError>;
    fn set_exit_balance_to_consume(&mut self, amount: u64) -> Result<(), StateError>;
    fn earliest_exit_epoch(&self) -> Result<u64, StateError>;
    fn set_earliest_exit_epoch(&mut self, epoch: u64) -> Result<(), StateError>;
}

/// Everything the epoch transitions need from a state.
pub trait BeaconStateAccess:
    ValidatorView + BalanceView + InactivityView + PendingDepositsView + ExitChurnView + Clone
{
    /// Deep, independent copy of the state.
    fn copy(&self) -> Self {
        self.clone()
    }
}

impl<T> BeaconStateAccess for T where
    T: ValidatorView + BalanceView + InactivityView + PendingDepositsView + ExitChurnView + Clone
{
}

fn push_list<T, N: ssz_types::typenum::Unsigned>(
    list: &mut VariableList<T, N>,
    field: &'static str,
    value: T,
) -> Result<(), StateError> {
    list.push(value)
        .map_err(|err| StateError::Encoding(format!("Couldn't push to {field}: {err:?}")))
}

impl CoreView for BeaconState {
    fn fork_name(&self) -> ForkName {
        BeaconState::fork_name(self)
    }

    fn slot(&self) -> Result<u64, StateError> {
        Ok(map_beacon_state!(self, state => state.slot))
    }

    fn fork(&self) -> Result<Fork, StateError> {
        Ok(map_beacon_state!(self, state => state.fork))
    }

    fn genesis_validators_root(&self) -> Result<B256, StateError> {
        Ok(map_beacon_state!(self, state => state.genesis_validators_root))
    }

    fn finalized_checkpoint_epoch(&self) -> Result<u64, StateError> {
        Ok(map_beacon_state!(self, state => state.finalized_checkpoint.epoch))
    }
}

impl ValidatorView for BeaconState {
    fn validator_count(&self) -> Result<u64, StateError> {
        Ok(self.electra_field("validators")?.validators.len() as u64)
    }

    fn validator_at(&self, index: u64) -> Result<&Validator, StateError> {
        let validators = &self.electra_field("validators")?.validators;
        Ok(&validators[checked_index("validators", index, validators.len())?])
    }

    fn update_validator_at(&mut self, index: u64, validator: Validator) -> Result<(), StateError> {
        let validators = &mut self.electra_field_mut("validators")?.validators;
        let index = checked_index("validators", index, validators.len())?;
        validators[index] = validator;
        Ok(())
    }

    fn read_all_validators<F>(&self, mut visitor: F) -> Result<(), StateError>
    where
        F: FnMut(u64, &Validator) -> Result<(), StateError>,
    {
        for (index, validator) in self.electra_field("validators")?.validators.iter().enumerate() {
            visitor(index as u64, validator)?;
        }
        Ok(())
    }

    fn push_validator(&mut self, validator: Validator, balance: u64) -> Result<u64, StateError> {
        let state = self.electra_field_mut("validators")?;
        let index = state.validators.len() as u64;
        push_list(&mut state.validators, "validators", validator)?;
        push_list(&mut state.balances, "balances", balance)?;
        push_list(
            &mut state.previous_epoch_participation,
            "previous_epoch_participation",
            0,
        )?;
        push_list(
            &mut state.current_epoch_participation,
            "current_epoch_participation",
            0,
        )?;
        push_list(&mut state.inactivity_scores, "inactivity_scores", 0)?;
        Ok(index)
    }
}

impl BalanceView for BeaconState {
    fn balance_count(&self) -> Result<u64, StateError> {
        Ok(map_beacon_state!(self, state => state.balances.len() as u64))
    }

    fn balance_at(&self, index: u64) -> Result<u64, StateError> {
        map_beacon_state!(self, state => {
            let index = checked_index("balances", index, state.balances.len())?;
            Ok(state.balances[index])
        })
    }

    fn update_balance_at(&mut self, index: u64, balance: u64) -> Result<(), StateError> {
        map_beacon_state!(self, state => {
            let index = checked_index("balances", index, state.balances.len())?;
            state.balances[index] = balance;
            Ok(())
        })
    }
}

impl InactivityView for BeaconState {
    fn inactivity_score_at(&self, index: u64) -> Result<u64, StateError> {
        map_beacon_state!(self, state => {
            let index = checked_index("inactivity_scores", index, state.inactivity_scores.len())?;
            Ok(state.inactivity_scores[index])
        })
    }
}

impl PendingDepositsView for BeaconState {
    fn pending_deposits(&self) -> Result<&[PendingDeposit], StateError> {
        Ok(&self.electra_field("pending_deposits")?.pending_deposits)
    }

    fn set_pending_deposits(&mut self, deposits: Vec<PendingDeposit>) -> Result<(), StateError> {
        self.electra_field_mut("pending_deposits")?.pending_deposits = VariableList::new(deposits)
            .map_err(|err| StateError::Encoding(format!("Too many pending deposits: {err:?}")))?;
        Ok(())
    }

    fn append_pending_deposit(&mut self, deposit: PendingDeposit) -> Result<(), StateError> {
        push_list(
            &mut self.electra_field_mut("pending_deposits")?.pending_deposits,
            "pending_deposits",
            deposit,
        )
    }

    fn deposit_balance_to_consume(&self) -> Result<u64, StateError> {
        Ok(self
            .electra_field("deposit_balance_to_consume")?
            .deposit_balance_to_consume)
    }

    fn set_deposit_balance_to_consume(&mut self, amount: u64) -> Result<(), StateError> {
        self.electra_field_mut("deposit_balance_to_consume")?
            .deposit_balance_to_consume = amount;
        Ok(())
    }

    fn deposit_requests_start_index(&self) -> Result<u64, StateError> {
        Ok(self
            .electra_field("deposit_requests_start_index")?
            .deposit_requests_start_index)
    }

    fn set_deposit_requests_start_index(&mut self, index: u64) -> Result<(), StateError> {
        self.electra_field_mut("deposit_requests_start_index")?
            .deposit_requests_start_index = index;
        Ok(())
    }
}

impl ExitChurnView for BeaconState {
    fn exit_balance_to_consume(&self) -> Result<u64, StateError> {
        Ok(self
            .electra_field("exit_balance_to_consume")?
            .exit_balance_to_consume)
    }

    fn set_exit_balance_to_consume(&mut self, amount: u64) -> Result<(), StateError> {
        self.electra_field_mut("exit_balance_to_consume")?
            .exit_balance_to_consume = amount;
        Ok(())
    }

    fn earliest_exit_epoch(&self) -> Result<u64, StateError> {
        Ok(self.electra_field("earliest_exit_epoch")?.earliest_exit_epoch)
    }

    fn set_earliest_exit_epoch(&mut self, epoch: u64) -> Result<(), StateError> {
        self.electra_field_mut("earliest_exit_epoch")?
            .earliest_exit_epoch = epoch;
        Ok(())
    }
}
