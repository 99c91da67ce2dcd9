use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz::{Decode, Encode};
use tree_hash::TreeHash;

use crate::{
    deneb::beacon_state::BeaconState as DenebBeaconState,
    electra::beacon_state::BeaconState as ElectraBeaconState, errors::StateError,
    fork_name::ForkName,
};

/// A beacon state tagged with the schema version it is encoded in.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "version", content = "data", rename_all = "lowercase")]
pub enum BeaconState {
    Deneb(Box<DenebBeaconState>),
    Electra(Box<ElectraBeaconState>),
}

/// Run ``$body`` against whichever schema ``$state`` holds. Only for fields both schemas share.
macro_rules! map_beacon_state {
    ($state:expr, $inner:ident => $body:expr) => {
        match $state {
            $crate::beacon_state::BeaconState::Deneb($inner) => $body,
            $crate::beacon_state::BeaconState::Electra($inner) => $body,
        }
    };
}

pub(crate) use map_beacon_state;

impl BeaconState {
    pub fn fork_name(&self) -> ForkName {
        match self {
            BeaconState::Deneb(_) => ForkName::Deneb,
            BeaconState::Electra(_) => ForkName::Electra,
        }
    }

    pub fn as_deneb(&self) -> Result<&DenebBeaconState, StateError> {
        match self {
            BeaconState::Deneb(state) => Ok(state),
            BeaconState::Electra(_) => Err(StateError::SchemaMismatch {
                field: "deneb state",
                fork: ForkName::Electra,
            }),
        }
    }

    pub fn as_electra(&self) -> Result<&ElectraBeaconState, StateError> {
        self.electra_field("electra state")
    }

    pub fn as_electra_mut(&mut self) -> Result<&mut ElectraBeaconState, StateError> {
        self.electra_field_mut("electra state")
    }

    /// Borrow the Electra schema in order to reach ``field``.
    pub(crate) fn electra_field(
        &self,
        field: &'static str,
    ) -> Result<&ElectraBeaconState, StateError> {
        match self {
            BeaconState::Electra(state) => Ok(state),
            BeaconState::Deneb(_) => Err(StateError::SchemaMismatch {
                field,
                fork: ForkName::Deneb,
            }),
        }
    }

    pub(crate) fn electra_field_mut(
        &mut self,
        field: &'static str,
    ) -> Result<&mut ElectraBeaconState, StateError> {
        match self {
            BeaconState::Electra(state) => Ok(state),
            BeaconState::Deneb(_) => Err(StateError::SchemaMismatch {
                field,
                fork: ForkName::Deneb,
            }),
        }
    }

    pub fn from_ssz_bytes(fork_name: ForkName, bytes: &[u8]) -> Result<Self, StateError> {
        let to_error = |err: ssz::DecodeError| StateError::Encoding(format!("{err:?}"));
        Ok(match fork_name {
            ForkName::Deneb => BeaconState::Deneb(Box::new(
                DenebBeaconState::from_ssz_bytes(bytes).map_err(to_error)?,
            )),
            ForkName::Electra => BeaconState::Electra(Box::new(
                ElectraBeaconState::from_ssz_bytes(bytes).map_err(to_error)?,
            )),
        })
    }

    pub fn as_ssz_bytes(&self) -> Vec<u8> {
        map_beacon_state!(self, state => state.as_ssz_bytes())
    }

    pub fn tree_hash_root(&self) -> B256 {
        map_beacon_state!(self, state => state.tree_hash_root())
    }
}

impl From<DenebBeaconState> for BeaconState {
    fn from(state: DenebBeaconState) -> Self {
        BeaconState::Deneb(Box::new(state))
    }
}

impl From<ElectraBeaconState> for BeaconState {
    fn from(state: ElectraBeaconState) -> Self {
        BeaconState::Electra(Box::new(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_accessors() {
        let mut state = BeaconState::from(DenebBeaconState::default());
        assert_eq!(state.fork_name(), ForkName::Deneb);
        assert!(state.as_deneb().is_ok());
        assert_eq!(
            state.as_electra_mut().map(|_| ()),
            Err(StateError::SchemaMismatch {
                field: "electra state",
                fork: ForkName::Deneb,
            })
        );

        let state = BeaconState::from(ElectraBeaconState::default());
        assert_eq!(state.fork_name(), ForkName::Electra);
        assert!(state.as_deneb().is_err());
    }

    #[test]
    fn test_ssz_bytes_are_tied_to_the_schema() {
        let state = BeaconState::from(ElectraBeaconState {
            slot: 65,
            ..Default::default()
        });
        let bytes = state.as_ssz_bytes();
        let decoded =
            BeaconState::from_ssz_bytes(ForkName::Electra, &bytes).expect("same schema decodes");
        assert_eq!(decoded, state);
        assert_eq!(decoded.tree_hash_root(), state.tree_hash_root());

        assert!(matches!(
            BeaconState::from_ssz_bytes(ForkName::Deneb, &bytes),
            Err(StateError::Encoding(_))
        ));
    }
}
