use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{score_compatibility, CompatibilityOutcome};
use crate::matching::domain::{is_blank, CandidateProfile, JobRequirement, VacancyId};

const DEFAULT_MINIMUM_SCORE: f64 = 20.0;
/// Scores closer than this are ordered by distance instead.
const DISTANCE_TIE_WINDOW: f64 = 10.0;

/// Display rules for the discovery feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedPolicy {
    pub minimum_score: f64,
    pub enforce_travel_radius: bool,
}

impl Default for FeedPolicy {
    fn default() -> Self {
        Self {
            minimum_score: DEFAULT_MINIMUM_SCORE,
            enforce_travel_radius: true,
        }
    }
}

/// A posting considered for the feed, with its great-circle distance when known.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPosting {
    pub requirement: JobRequirement,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Perfect,
    FieldOnly,
    Other,
}

impl MatchTier {
    pub const fn label(self) -> &'static str {
        match self {
            MatchTier::Perfect => "perfect",
            MatchTier::FieldOnly => "field_only",
            MatchTier::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub vacancy_id: VacancyId,
    pub title: String,
    pub tier: MatchTier,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub remote: bool,
}

/// Score, filter, and order postings for one seeker.
pub fn build_feed(
    candidate: &CandidateProfile,
    postings: &[FeedPosting],
    policy: &FeedPolicy,
) -> Vec<FeedEntry> {
    let mut entries: Vec<FeedEntry> = postings
        .iter()
        .filter_map(|posting| {
            let outcome = score_compatibility(&posting.requirement, candidate, posting.distance_km);
            admit(candidate, posting, &outcome, policy).then(|| FeedEntry {
                vacancy_id: posting.requirement.id.clone(),
                title: posting.requirement.title.clone(),
                tier: classify(&posting.requirement, candidate, &outcome),
                score: outcome.score,
                distance_km: posting.distance_km,
                remote: posting.requirement.is_remote(),
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        a.tier
            .cmp(&b.tier)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| a.vacancy_id.cmp(&b.vacancy_id))
    });
    settle_by_distance(&mut entries);

    debug!(
        candidate = %candidate.id.0,
        considered = postings.len(),
        shown = entries.len(),
        "discovery feed built"
    );

    entries
}

fn admit(
    candidate: &CandidateProfile,
    posting: &FeedPosting,
    outcome: &CompatibilityOutcome,
    policy: &FeedPolicy,
) -> bool {
    if outcome.disqualified || outcome.score < policy.minimum_score {
        return false;
    }

    if policy.enforce_travel_radius && !posting.requirement.is_remote() {
        if let (Some(distance), Some(acceptable)) = (
            posting.distance_km,
            candidate.location.acceptable_distance_km,
        ) {
            if acceptable > 0.0 && distance > acceptable {
                return false;
            }
        }
    }

    true
}

fn classify(
    requirement: &JobRequirement,
    candidate: &CandidateProfile,
    outcome: &CompatibilityOutcome,
) -> MatchTier {
    let explicit_field =
        !is_blank(&requirement.job_field) && candidate.prefers_field(&requirement.job_field);
    let specialization_ok = is_blank(&requirement.job_specialization)
        || candidate.prefers_specialization(&requirement.job_specialization);

    if explicit_field && specialization_ok && !outcome.missing_essential {
        MatchTier::Perfect
    } else if explicit_field || candidate.open_to_all_fields {
        MatchTier::FieldOnly
    } else {
        MatchTier::Other
    }
}

/// Pairwise rule: nearer on-site postings move ahead of close-scoring neighbours in their tier.
///
/// The rule is not transitive, so it is applied with a bounded insertion pass rather than a
/// library sort.
fn settle_by_distance(entries: &mut [FeedEntry]) {
    for index in 1..entries.len() {
        let mut cursor = index;
        while cursor > 0 && precedes(&entries[cursor], &entries[cursor - 1]) {
            entries.swap(cursor, cursor - 1);
            cursor -= 1;
        }
    }
}

fn precedes(candidate: &FeedEntry, incumbent: &FeedEntry) -> bool {
    if candidate.tier != incumbent.tier || candidate.remote || incumbent.remote {
        return false;
    }
    if (candidate.score - incumbent.score).abs() >= DISTANCE_TIE_WINDOW {
        return false;
    }

    match (candidate.distance_km, incumbent.distance_km) {
        (Some(near), Some(far)) => near.total_cmp(&far) == Ordering::Less,
        _ => false,
    }
}
