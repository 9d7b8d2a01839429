use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{CandidateId, VacancyId};

/// One application against a vacancy, as recorded by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRef {
    pub candidate_id: CandidateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

/// Persisted applicant order for a vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub vacancy_id: VacancyId,
    pub order: Vec<CandidateId>,
    pub ranked_at: DateTime<Utc>,
}

/// Document store collaborator. Records cross this boundary as raw JSON documents and are typed
/// by the intake adapter.
pub trait MatchingStore: Send + Sync {
    fn vacancy(&self, id: &VacancyId) -> Result<Option<Value>, StoreError>;
    fn applicants(&self, id: &VacancyId) -> Result<Vec<ApplicantRef>, StoreError>;
    fn candidate(&self, id: &CandidateId) -> Result<Option<Value>, StoreError>;
    fn work_experience(&self, id: &CandidateId) -> Result<Vec<Value>, StoreError>;
    fn languages(&self, id: &CandidateId) -> Result<Vec<Value>, StoreError>;
    /// Every vacancy currently accepting applications, keyed by id.
    fn open_vacancies(&self) -> Result<Vec<(VacancyId, Value)>, StoreError>;
    fn save_ranking(&self, record: RankingRecord) -> Result<(), StoreError>;
    fn ranking(&self, id: &VacancyId) -> Result<Option<RankingRecord>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
