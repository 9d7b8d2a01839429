//! Multi-criteria applicant ranking for a single vacancy.

pub mod matrix;
pub mod projector;
pub mod topsis;

pub use matrix::{DecisionMatrix, MatrixRow};
pub use projector::project_absolute;
pub use topsis::{Separation, TopsisEngine, TopsisOutcome, TopsisStage};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, trace};

use super::domain::{CandidateId, CandidateProfile, CriterionWeights, JobRequirement, ScoreVector};

/// A candidate's place in the employer-facing ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub position: usize,
    pub candidate_id: CandidateId,
    pub scores: ScoreVector,
    /// TOPSIS relative closeness, or the absolute score when the pool has one candidate.
    pub closeness: f64,
    pub absolute_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

impl RankedCandidate {
    pub fn match_percent(&self) -> u32 {
        (self.absolute_score.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

/// Rank every candidate in the pool against the requirement.
///
/// Employer weights are rescaled to sum to 1 before they reach the engine and the projector.
/// Ties on score go to the later application, then to the lower candidate id.
pub fn rank_candidates(
    requirement: &JobRequirement,
    weights: &CriterionWeights,
    candidates: &[CandidateProfile],
) -> Vec<RankedCandidate> {
    let weights = weights.normalized();
    let matrix = DecisionMatrix::build(requirement, candidates);
    rank_matrix(&matrix, &weights, requirement.driver_license_required)
}

/// Rank an already-built matrix with weights used as given.
pub fn rank_matrix(
    matrix: &DecisionMatrix,
    weights: &CriterionWeights,
    license_required: bool,
) -> Vec<RankedCandidate> {
    if matrix.is_empty() {
        return Vec::new();
    }

    let absolute: Vec<f64> = matrix
        .rows()
        .iter()
        .map(|row| project_absolute(&row.scores, weights, license_required, row.has_driver_license))
        .collect();

    let closeness = if matrix.len() == 1 {
        debug!("single candidate pool, ranking by absolute score");
        absolute.clone()
    } else {
        TopsisEngine::new(*weights).evaluate(matrix).closeness
    };

    let mut ranked: Vec<RankedCandidate> = matrix
        .rows()
        .iter()
        .zip(closeness)
        .zip(absolute)
        .map(|((row, closeness), absolute_score)| RankedCandidate {
            position: 0,
            candidate_id: row.candidate_id.clone(),
            scores: row.scores,
            closeness,
            absolute_score,
            applied_at: row.applied_at,
        })
        .collect();

    ranked.sort_by(compare_ranked);
    for (index, candidate) in ranked.iter_mut().enumerate() {
        candidate.position = index + 1;
    }
    trace!(stage = ?TopsisStage::Sorted, candidates = ranked.len());

    ranked
}

fn compare_ranked(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.closeness
        .total_cmp(&a.closeness)
        .then_with(|| b.applied_at.cmp(&a.applied_at))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}
