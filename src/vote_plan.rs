use crate::constants::{PROJECT_IDS, VOTE_WEIGHTS};
use alloy::primitives::{B256, U256};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VotePlanError {
    #[error("{ids} project ids but {weights} vote weights")]
    LengthMismatch { ids: usize, weights: usize },

    #[error("vote plan has no projects")]
    Empty,
}

/// Ordered project ids paired with 18-decimal token weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotePlan {
    project_ids: Vec<B256>,
    weights: Vec<U256>,
}

impl VotePlan {
    pub fn new(project_ids: Vec<B256>, weights: Vec<U256>) -> Result<Self, VotePlanError> {
        if project_ids.len() != weights.len() {
            return Err(VotePlanError::LengthMismatch {
                ids: project_ids.len(),
                weights: weights.len(),
            });
        }
        if project_ids.is_empty() {
            return Err(VotePlanError::Empty);
        }
        Ok(Self {
            project_ids,
            weights,
        })
    }

    pub fn project_ids(&self) -> &[B256] {
        &self.project_ids
    }

    pub fn weights(&self) -> &[U256] {
        &self.weights
    }

    pub fn entries(&self) -> impl Iterator<Item = (&B256, &U256)> {
        self.project_ids.iter().zip(self.weights.iter())
    }

    /// Allowance the voting contract needs to pull every weight.
    pub fn required_allowance(&self) -> U256 {
        self.weights
            .iter()
            .fold(U256::ZERO, |total, weight| total.saturating_add(*weight))
    }

    /// Approvals are submitted for twice the requirement.
    pub fn approval_amount(&self) -> U256 {
        self.required_allowance().saturating_mul(U256::from(2u8))
    }

    pub fn needs_approval(&self, current_allowance: U256) -> bool {
        current_allowance < self.required_allowance()
    }
}

impl Default for VotePlan {
    fn default() -> Self {
        Self {
            project_ids: PROJECT_IDS.to_vec(),
            weights: VOTE_WEIGHTS.to_vec(),
        }
    }
}
