use keel_consensus_beacon::view::BeaconStateAccess;
use keel_consensus_misc::{
    constants::{
        BLS_WITHDRAWAL_PREFIX, COMPOUNDING_WITHDRAWAL_PREFIX, ETH1_ADDRESS_WITHDRAWAL_PREFIX,
        UNSET_DEPOSIT_REQUESTS_START_INDEX,
    },
    deposit_request::DepositRequest,
    pending_deposit::PendingDeposit,
};
use tracing::{debug, warn};

use crate::errors::{InvalidDeposit, TransitionError};

/// Queue the deposit requests of an execution payload. A missing entry fails the whole batch
/// before anything is written; a malformed request is skipped and reported by its position.
pub fn process_deposit_requests<S: BeaconStateAccess>(
    state: &mut S,
    deposit_requests: &[Option<DepositRequest>],
) -> Result<Vec<(usize, InvalidDeposit)>, TransitionError> {
    let deposit_requests = deposit_requests
        .iter()
        .enumerate()
        .map(|(position, request)| {
            request.as_ref().ok_or_else(|| {
                TransitionError::InvalidState(format!("Deposit request {position} is missing"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut next_state = state.copy();
    let slot = next_state.slot()?;
    let mut rejected = vec![];
    for (position, deposit_request) in deposit_requests.into_iter().enumerate() {
        if let Err(reason) = validate_deposit_request(deposit_request) {
            warn!(
                position,
                index = deposit_request.index,
                "Skipping deposit request: {reason}"
            );
            rejected.push((position, reason));
            continue;
        }

        // Set deposit request start index
        if next_state.deposit_requests_start_index()? == UNSET_DEPOSIT_REQUESTS_START_INDEX {
            next_state.set_deposit_requests_start_index(deposit_request.index)?;
        }

        next_state.append_pending_deposit(PendingDeposit {
            public_key: deposit_request.public_key.clone(),
            withdrawal_credentials: deposit_request.withdrawal_credentials,
            amount: deposit_request.amount,
            signature: deposit_request.signature.clone(),
            slot,
        })?;
        debug!(
            index = deposit_request.index,
            amount = deposit_request.amount,
            "Queued deposit request"
        );
    }

    *state = next_state;
    Ok(rejected)
}

fn validate_deposit_request(deposit_request: &DepositRequest) -> Result<(), InvalidDeposit> {
    if deposit_request.amount == 0 {
        return Err(InvalidDeposit::ZeroAmount);
    }
    match deposit_request.withdrawal_credentials[0] {
        BLS_WITHDRAWAL_PREFIX | ETH1_ADDRESS_WITHDRAWAL_PREFIX | COMPOUNDING_WITHDRAWAL_PREFIX => {
            Ok(())
        }
        prefix => Err(InvalidDeposit::UnknownWithdrawalPrefix(prefix)),
    }
}
