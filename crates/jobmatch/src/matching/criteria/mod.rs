//! Per-criterion sub-scorers feeding the decision matrix.
//!
//! Every function here is total: missing data resolves to a documented default and each result
//! stays within [0, 1].

mod education;
mod experience;
mod field;
mod language;
mod location;

pub use education::education_score;
pub use experience::experience_score;
pub use field::field_match_score;
pub use language::language_score;
pub use location::location_score;

use super::domain::{CandidateProfile, JobRequirement, ScoreVector};

/// Score one candidate against a requirement on all five criteria.
pub fn score_vector(requirement: &JobRequirement, candidate: &CandidateProfile) -> ScoreVector {
    ScoreVector {
        education: education_score(&requirement.education, &candidate.education),
        experience: experience_score(
            requirement.required_experience_years,
            &requirement.job_field,
            &requirement.job_specialization,
            &candidate.work_experience,
        ),
        field_match: field_match_score(
            &requirement.job_field,
            &requirement.job_specialization,
            candidate,
        ),
        language: language_score(&requirement.languages, &candidate.languages),
        location: location_score(&requirement.location, &candidate.location),
    }
}
