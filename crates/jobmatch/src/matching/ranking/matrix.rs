use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::criteria::score_vector;
use crate::matching::domain::{
    CandidateId, CandidateProfile, Criterion, JobRequirement, ScoreVector, CRITERIA_COUNT,
};

/// One candidate's row: identity, tie-break timestamp, and the five sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub candidate_id: CandidateId,
    pub applied_at: Option<DateTime<Utc>>,
    pub has_driver_license: bool,
    pub scores: ScoreVector,
}

/// Candidates × criteria matrix for a single vacancy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionMatrix {
    rows: Vec<MatrixRow>,
}

impl DecisionMatrix {
    /// Rows are independent of each other; only the later column-wide steps need the full pool.
    pub fn build(requirement: &JobRequirement, candidates: &[CandidateProfile]) -> Self {
        let rows = candidates
            .iter()
            .map(|candidate| MatrixRow {
                candidate_id: candidate.id.clone(),
                applied_at: candidate.applied_at,
                has_driver_license: candidate.has_driver_license,
                scores: score_vector(requirement, candidate),
            })
            .collect();

        Self { rows }
    }

    pub fn from_rows(rows: Vec<MatrixRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values(&self) -> Vec<[f64; CRITERIA_COUNT]> {
        self.rows.iter().map(|row| row.scores.as_array()).collect()
    }

    pub fn column(&self, criterion: Criterion) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.scores.get(criterion))
            .collect()
    }
}
