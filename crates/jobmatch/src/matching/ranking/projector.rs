use crate::matching::domain::{CriterionWeights, ScoreVector};

const LICENSE_MISSING_FACTOR: f64 = 0.5;
const LICENSE_HELD_FACTOR: f64 = 1.2;

/// Weighted sum of the sub-scores shown to employers as "% match".
///
/// Weights are applied as given; the result is a weighted average only when they sum to 1.
pub fn project_absolute(
    scores: &ScoreVector,
    weights: &CriterionWeights,
    license_required: bool,
    has_license: bool,
) -> f64 {
    let weighted: f64 = scores
        .as_array()
        .iter()
        .zip(weights.as_array())
        .map(|(score, weight)| score * weight)
        .sum();

    match (license_required, has_license) {
        (true, false) => weighted * LICENSE_MISSING_FACTOR,
        (true, true) => (weighted * LICENSE_HELD_FACTOR).min(1.0),
        (false, _) => weighted,
    }
}
