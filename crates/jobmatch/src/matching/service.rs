use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::compatibility::{
    build_feed, score_compatibility, CompatibilityOutcome, FeedEntry, FeedPolicy, FeedPosting,
};
use super::domain::{CandidateId, CandidateProfile, CriterionWeights, JobRequirement, VacancyId};
use super::intake::{IntakeError, ProfileIntake};
use super::ranking::{rank_candidates, RankedCandidate};
use super::repository::{ApplicantRef, MatchingStore, RankingRecord, StoreError};
use crate::config::MatchingConfig;
use crate::geo::haversine_km;

/// Applicant left out of a ranking because their profile could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedCandidate {
    pub candidate_id: CandidateId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    pub vacancy_id: VacancyId,
    pub ranked: Vec<RankedCandidate>,
    pub excluded: Vec<ExcludedCandidate>,
}

impl RankingReport {
    pub fn order(&self) -> Vec<CandidateId> {
        self.ranked
            .iter()
            .map(|candidate| candidate.candidate_id.clone())
            .collect()
    }
}

/// Service composing the document store, the intake adapter, and the scoring core.
pub struct MatchingService<S> {
    store: Arc<S>,
    intake: ProfileIntake,
    config: MatchingConfig,
}

impl<S> MatchingService<S>
where
    S: MatchingStore + 'static,
{
    pub fn new(store: Arc<S>, config: MatchingConfig) -> Self {
        Self::with_intake(store, ProfileIntake::default(), config)
    }

    pub fn with_intake(store: Arc<S>, intake: ProfileIntake, config: MatchingConfig) -> Self {
        Self {
            store,
            intake,
            config,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Rank every applicant of a vacancy and persist the resulting order.
    pub fn rank_vacancy(
        &self,
        vacancy_id: &VacancyId,
    ) -> Result<RankingReport, MatchingServiceError> {
        let document = self
            .store
            .vacancy(vacancy_id)?
            .ok_or_else(|| MatchingServiceError::VacancyNotFound(vacancy_id.clone()))?;
        let requirement = self
            .intake
            .requirement_from_document(vacancy_id, &document)?;

        let applicants = self.store.applicants(vacancy_id)?;
        let mut candidates = Vec::with_capacity(applicants.len());
        let mut excluded = Vec::new();

        for applicant in &applicants {
            match self.enrich_applicant(applicant) {
                Ok(profile) => candidates.push(profile),
                Err(reason) => {
                    warn!(
                        vacancy = %vacancy_id,
                        candidate = %applicant.candidate_id,
                        %reason,
                        "applicant excluded from ranking"
                    );
                    excluded.push(ExcludedCandidate {
                        candidate_id: applicant.candidate_id.clone(),
                        reason,
                    });
                }
            }
        }

        let weights = requirement.weights.unwrap_or(self.config.default_weights);
        let ranked = rank_candidates(&requirement, &weights, &candidates);

        let report = RankingReport {
            vacancy_id: vacancy_id.clone(),
            ranked,
            excluded,
        };

        self.store.save_ranking(RankingRecord {
            vacancy_id: vacancy_id.clone(),
            order: report.order(),
            ranked_at: Utc::now(),
        })?;

        info!(
            vacancy = %vacancy_id,
            applicants = applicants.len(),
            ranked = report.ranked.len(),
            excluded = report.excluded.len(),
            "vacancy ranked"
        );

        Ok(report)
    }

    pub fn stored_ranking(
        &self,
        vacancy_id: &VacancyId,
    ) -> Result<RankingRecord, MatchingServiceError> {
        self.store
            .ranking(vacancy_id)?
            .ok_or_else(|| MatchingServiceError::RankingNotFound(vacancy_id.clone()))
    }

    /// Open postings filtered and ordered for one job seeker.
    pub fn discovery_feed(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<FeedEntry>, MatchingServiceError> {
        let candidate = match self.load_candidate(candidate_id) {
            Ok(Some(profile)) => profile,
            Ok(None) => return Err(MatchingServiceError::CandidateNotFound(candidate_id.clone())),
            Err(error) => return Err(error),
        };

        let postings: Vec<FeedPosting> = self
            .store
            .open_vacancies()?
            .into_iter()
            .filter_map(|(vacancy_id, document)| {
                match self.intake.requirement_from_document(&vacancy_id, &document) {
                    Ok(requirement) => Some(requirement),
                    Err(error) => {
                        warn!(vacancy = %vacancy_id, %error, "skipping unreadable vacancy");
                        None
                    }
                }
            })
            .map(|requirement| FeedPosting {
                distance_km: posting_distance(&requirement, &candidate),
                requirement,
            })
            .collect();

        let policy = FeedPolicy::from(&self.config);
        Ok(build_feed(&candidate, &postings, &policy))
    }

    fn enrich_applicant(&self, applicant: &ApplicantRef) -> Result<CandidateProfile, String> {
        match self.load_candidate(&applicant.candidate_id) {
            Ok(Some(mut profile)) => {
                if applicant.applied_at.is_some() {
                    profile.applied_at = applicant.applied_at;
                }
                Ok(profile)
            }
            Ok(None) => Err("candidate profile not found".to_string()),
            Err(error) => Err(error.to_string()),
        }
    }

    /// Fetch the seeker document plus both subcollections. Either every read succeeds or the
    /// profile is not produced at all.
    fn load_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Option<CandidateProfile>, MatchingServiceError> {
        let Some(document) = self.with_retries(|| self.store.candidate(candidate_id))? else {
            return Ok(None);
        };
        let experience = self.with_retries(|| self.store.work_experience(candidate_id))?;
        let languages = self.with_retries(|| self.store.languages(candidate_id))?;

        let profile = self.intake.candidate_from_documents(
            candidate_id,
            &document,
            &experience,
            &languages,
        )?;
        Ok(Some(profile))
    }

    fn with_retries<T>(
        &self,
        mut read: impl FnMut() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let attempts = self.config.enrichment_attempts.max(1);
        let mut attempt = 1;
        loop {
            match read() {
                Err(StoreError::Unavailable(reason)) if attempt < attempts => {
                    debug!(attempt, %reason, "store read failed, retrying");
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}

/// Great-circle distance for on-site postings when both sides carry coordinates.
pub fn posting_distance(requirement: &JobRequirement, candidate: &CandidateProfile) -> Option<f64> {
    if requirement.is_remote() {
        return None;
    }
    let posting = requirement.location.coordinates?;
    let home = candidate.location.coordinates?;
    Some(haversine_km(home, posting))
}

/// Compatibility of one pair, deriving the distance from coordinates when none is supplied.
pub fn score_pair(
    requirement: &JobRequirement,
    candidate: &CandidateProfile,
    distance_km: Option<f64>,
) -> CompatibilityOutcome {
    let distance_km = distance_km.or_else(|| posting_distance(requirement, candidate));
    score_compatibility(requirement, candidate, distance_km)
}

/// Rank an in-memory pool. Explicit weights win over the vacancy's own, then the defaults.
pub fn rank_pool(
    requirement: &JobRequirement,
    weights: Option<CriterionWeights>,
    candidates: &[CandidateProfile],
) -> Vec<RankedCandidate> {
    let weights = weights.or(requirement.weights).unwrap_or_default();
    rank_candidates(requirement, &weights, candidates)
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("vacancy '{0}' not found")]
    VacancyNotFound(VacancyId),
    #[error("candidate '{0}' not found")]
    CandidateNotFound(CandidateId),
    #[error("no ranking stored for vacancy '{0}'")]
    RankingNotFound(VacancyId),
}
