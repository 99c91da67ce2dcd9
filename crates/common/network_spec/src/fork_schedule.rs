use std::slice::Iter;

use keel_consensus_misc::fork::Fork;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkSchedule(pub [Fork; ForkSchedule::TOTAL]);

impl ForkSchedule {
    /// Genesis, Deneb and Electra.
    pub const TOTAL: usize = 3;

    pub const fn new(forks: [Fork; ForkSchedule::TOTAL]) -> Self {
        Self(forks)
    }

    pub fn iter(&self) -> Iter<'_, Fork> {
        self.0.iter()
    }

    pub fn scheduled(&self) -> impl Iterator<Item = &Fork> {
        self.iter()
            .filter(|fork| fork.epoch != Fork::UNSCHEDULED_EPOCH)
    }

    /// Return the last scheduled fork that is active at ``epoch``.
    pub fn fork_at_epoch(&self, epoch: u64) -> &Fork {
        self.scheduled()
            .filter(|fork| fork.epoch <= epoch)
            .last()
            .unwrap_or(&self.0[0])
    }
}
