use serde::{Deserialize, Serialize};
use tracing::trace;

use super::matrix::DecisionMatrix;
use crate::matching::domain::{CriterionWeights, CRITERIA_COUNT};

type Row = [f64; CRITERIA_COUNT];

/// Fixed pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TopsisStage {
    RawMatrix,
    Normalized,
    Weighted,
    IdealSolutions,
    Separations,
    Closeness,
    Sorted,
}

/// Euclidean distances of one row to the positive and negative ideal vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Separation {
    pub positive: f64,
    pub negative: f64,
}

impl Separation {
    /// 0 when the row coincides with both ideals.
    pub fn relative_closeness(&self) -> f64 {
        let span = self.positive + self.negative;
        if span <= 0.0 {
            return 0.0;
        }
        (self.negative / span).clamp(0.0, 1.0)
    }
}

/// Every intermediate product of a TOPSIS run, row-aligned with the input matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopsisOutcome {
    pub normalized: Vec<Row>,
    pub weighted: Vec<Row>,
    pub ideal: Row,
    pub anti_ideal: Row,
    pub separations: Vec<Separation>,
    pub closeness: Vec<f64>,
}

/// TOPSIS over benefit-only criteria.
///
/// Weights are used exactly as supplied. A single-row matrix yields closeness 0; callers rank a
/// lone candidate by absolute score instead.
#[derive(Debug, Clone)]
pub struct TopsisEngine {
    weights: CriterionWeights,
}

impl TopsisEngine {
    pub fn new(weights: CriterionWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &CriterionWeights {
        &self.weights
    }

    pub fn evaluate(&self, matrix: &DecisionMatrix) -> TopsisOutcome {
        self.evaluate_values(&matrix.values())
    }

    pub fn evaluate_values(&self, values: &[Row]) -> TopsisOutcome {
        trace!(stage = ?TopsisStage::RawMatrix, rows = values.len());

        let normalized = normalize(values);
        trace!(stage = ?TopsisStage::Normalized);

        let weighted = apply_weights(&normalized, &self.weights);
        trace!(stage = ?TopsisStage::Weighted);

        let (ideal, anti_ideal) = ideal_solutions(&weighted);
        trace!(stage = ?TopsisStage::IdealSolutions, ?ideal, ?anti_ideal);

        let separations = separations(&weighted, &ideal, &anti_ideal);
        trace!(stage = ?TopsisStage::Separations);

        let closeness = separations
            .iter()
            .map(Separation::relative_closeness)
            .collect();
        trace!(stage = ?TopsisStage::Closeness);

        TopsisOutcome {
            normalized,
            weighted,
            ideal,
            anti_ideal,
            separations,
            closeness,
        }
    }
}

/// Vector normalisation: each column divided by its Euclidean norm. Zero-norm columns become 0.
pub fn normalize(values: &[Row]) -> Vec<Row> {
    let mut norms = [0.0; CRITERIA_COUNT];
    for row in values {
        for (norm, value) in norms.iter_mut().zip(row) {
            *norm += value * value;
        }
    }
    let norms = norms.map(f64::sqrt);

    values
        .iter()
        .map(|row| {
            let mut normalized = [0.0; CRITERIA_COUNT];
            for (column, slot) in normalized.iter_mut().enumerate() {
                if norms[column] > 0.0 {
                    *slot = row[column] / norms[column];
                }
            }
            normalized
        })
        .collect()
}

pub fn apply_weights(normalized: &[Row], weights: &CriterionWeights) -> Vec<Row> {
    let weights = weights.as_array();
    normalized
        .iter()
        .map(|row| {
            let mut weighted = *row;
            for (value, weight) in weighted.iter_mut().zip(weights) {
                *value *= weight;
            }
            weighted
        })
        .collect()
}

/// Column-wise maximum and minimum. Both are zero vectors for an empty matrix.
pub fn ideal_solutions(weighted: &[Row]) -> (Row, Row) {
    let Some(first) = weighted.first() else {
        return ([0.0; CRITERIA_COUNT], [0.0; CRITERIA_COUNT]);
    };

    let mut ideal = *first;
    let mut anti_ideal = *first;
    for row in &weighted[1..] {
        for column in 0..CRITERIA_COUNT {
            ideal[column] = ideal[column].max(row[column]);
            anti_ideal[column] = anti_ideal[column].min(row[column]);
        }
    }

    (ideal, anti_ideal)
}

pub fn separations(weighted: &[Row], ideal: &Row, anti_ideal: &Row) -> Vec<Separation> {
    weighted
        .iter()
        .map(|row| Separation {
            positive: euclidean(row, ideal),
            negative: euclidean(row, anti_ideal),
        })
        .collect()
}

fn euclidean(left: &Row, right: &Row) -> f64 {
    left.iter()
        .zip(right)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}
