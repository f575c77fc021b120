use serde::{Deserialize, Serialize};

use crate::{
    core::Ticks,
    error::{Result, SchedError},
    scheduler::Policy,
};

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of processing cores
    pub cores: usize,

    /// Scheduling discipline
    pub policy: Policy,

    /// Time slice between quantum expiries, used by round-robin only
    pub quantum: Ticks,
}

impl SimConfig {
    pub fn new(cores: usize, policy: Policy) -> Self {
        Self {
            cores,
            policy,
            ..Self::default()
        }
    }

    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_quantum(mut self, quantum: Ticks) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cores == 0 {
            return Err(SchedError::NoCores);
        }
        if self.policy.is_round_robin() && self.quantum == 0 {
            return Err(SchedError::ZeroQuantum);
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cores: 1,
            policy: Policy::Fcfs,
            quantum: 2,
        }
    }
}
