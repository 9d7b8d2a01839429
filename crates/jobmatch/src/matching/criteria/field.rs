use std::collections::BTreeSet;

use crate::matching::domain::{eq_ignore_case, is_blank, CandidateProfile};

const OPEN_PREFERENCE_SCORE: f64 = 0.5;
const CONTAINMENT_SCORE: f64 = 0.7;
const SHARED_WORD_BASE: f64 = 0.3;
const SHARED_WORD_SPAN: f64 = 0.4;
const SPECIALIZATION_BONUS: f64 = 0.1;
const NO_MATCH_FLOOR: f64 = 0.2;

/// How well the posting's field fits the seeker's preferred job fields.
pub fn field_match_score(
    job_field: &str,
    job_specialization: &str,
    candidate: &CandidateProfile,
) -> f64 {
    if is_blank(job_field) || candidate.open_to_all_fields {
        return OPEN_PREFERENCE_SCORE;
    }

    let preferences: Vec<_> = candidate
        .preferred_fields
        .iter()
        .filter(|preference| !is_blank(&preference.field))
        .collect();
    if preferences.is_empty() {
        return 0.0;
    }

    let exact = preferences.iter().any(|preference| {
        eq_ignore_case(&preference.field, job_field)
            && (is_blank(job_specialization)
                || preference
                    .specializations
                    .iter()
                    .any(|specialization| eq_ignore_case(specialization, job_specialization)))
    });
    if exact {
        return 1.0;
    }

    let best = preferences
        .iter()
        .map(|preference| partial_similarity(job_field, &preference.field))
        .fold(0.0_f64, f64::max);
    if best <= 0.0 {
        return NO_MATCH_FLOOR;
    }

    if !is_blank(job_specialization) && candidate.prefers_specialization(job_specialization) {
        (best + SPECIALIZATION_BONUS).min(1.0)
    } else {
        best
    }
}

/// Containment in either direction beats shared words; no overlap scores 0.
fn partial_similarity(job_field: &str, candidate_field: &str) -> f64 {
    let job = job_field.trim().to_lowercase();
    let candidate = candidate_field.trim().to_lowercase();

    if job.contains(&candidate) || candidate.contains(&job) {
        return CONTAINMENT_SCORE;
    }

    let job_words: BTreeSet<&str> = job.split_whitespace().collect();
    let candidate_words: BTreeSet<&str> = candidate.split_whitespace().collect();
    let shared = job_words.intersection(&candidate_words).count();
    if shared == 0 {
        return 0.0;
    }

    let longest = job_words.len().max(candidate_words.len()) as f64;
    SHARED_WORD_BASE + SHARED_WORD_SPAN * (shared as f64 / longest)
}
