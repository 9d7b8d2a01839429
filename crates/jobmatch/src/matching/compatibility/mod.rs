//! Coarse compatibility scoring used to filter and order postings shown to a job seeker.
//!
//! Unlike the ranking criteria this score is an unbounded bonus/penalty tally. It must never be
//! mixed with the [0, 1] sub-scores of the decision matrix.

pub mod feed;
mod rules;

pub use feed::{build_feed, FeedEntry, FeedPolicy, FeedPosting, MatchTier};

use serde::{Deserialize, Serialize};

use super::domain::{CandidateProfile, JobRequirement, VacancyId};

/// Factors that can move the compatibility tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompatibilityFactor {
    DriverLicense,
    Distance,
    Education,
    Experience,
    StudyField,
    Specialization,
    JobField,
    JobSpecialization,
    MissingEssential,
}

/// Discrete contribution to the tally so a displayed score can be explained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityComponent {
    pub factor: CompatibilityFactor,
    pub points: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityOutcome {
    pub vacancy_id: VacancyId,
    pub score: f64,
    pub disqualified: bool,
    pub missing_essential: bool,
    pub components: Vec<CompatibilityComponent>,
}

impl CompatibilityOutcome {
    /// The `(score, disqualified)` pair consumed by discovery ordering.
    pub fn verdict(&self) -> (f64, bool) {
        (self.score, self.disqualified)
    }
}

/// Score one posting for one seeker. `distance_km` is ignored for remote postings.
pub fn score_compatibility(
    requirement: &JobRequirement,
    candidate: &CandidateProfile,
    distance_km: Option<f64>,
) -> CompatibilityOutcome {
    let tally = rules::tally(requirement, candidate, distance_km);

    let score = if tally.disqualified {
        0.0
    } else {
        tally.total.max(0.0)
    };

    CompatibilityOutcome {
        vacancy_id: requirement.id.clone(),
        score,
        disqualified: tally.disqualified,
        missing_essential: tally.missing_essential,
        components: tally.components,
    }
}
