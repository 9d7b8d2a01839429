//! Matching core: criterion sub-scorers, the discovery compatibility tally, and applicant ranking,
//! plus the store boundary, service, and HTTP surface built on top of them.

pub mod compatibility;
pub mod criteria;
pub mod domain;
pub mod export;
pub mod intake;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use compatibility::{
    build_feed, score_compatibility, CompatibilityComponent, CompatibilityFactor,
    CompatibilityOutcome, FeedEntry, FeedPolicy, FeedPosting, MatchTier,
};
pub use domain::{
    CandidateId, CandidateLocation, CandidateProfile, Coordinates, Criterion, CriterionWeights,
    EducationBackground, EducationLevel, EducationRequirement, FieldPreference, JobRequirement,
    JobType, LanguageRequirement, LanguageSkill, Location, Proficiency, ScoreVector, VacancyId,
    WorkExperience,
};
pub use export::write_shortlist_csv;
pub use intake::{parse_candidate, parse_vacancy, IntakeError, ProfileIntake};
pub use ranking::{
    project_absolute, rank_candidates, DecisionMatrix, RankedCandidate, TopsisEngine,
    TopsisOutcome,
};
pub use repository::{ApplicantRef, MatchingStore, RankingRecord, StoreError};
pub use router::{matching_router, CompatibilityRequest, FeedView, RankRequest, RankResponse};
pub use service::{
    posting_distance, rank_pool, score_pair, ExcludedCandidate, MatchingService,
    MatchingServiceError, RankingReport,
};
