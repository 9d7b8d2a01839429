use chrono::{DateTime, NaiveDate, Utc};
use jobmatch::error::AppError;
use jobmatch::matching::{
    ApplicantRef, CandidateId, MatchingStore, RankingRecord, StoreError, VacancyId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seed file layout: raw vacancy and candidate documents plus the applications linking them.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SeedData {
    pub(crate) vacancies: BTreeMap<String, Value>,
    pub(crate) candidates: BTreeMap<String, SeedCandidate>,
    pub(crate) applications: Vec<SeedApplication>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SeedCandidate {
    pub(crate) profile: Value,
    pub(crate) work_experience: Vec<Value>,
    pub(crate) languages: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SeedApplication {
    pub(crate) vacancy_id: String,
    pub(crate) candidate_id: String,
    #[serde(default)]
    pub(crate) applied_at: Option<DateTime<Utc>>,
}

pub(crate) fn load_seed(path: &Path) -> Result<SeedData, AppError> {
    let raw = std::fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryMatchingStore {
    vacancies: Arc<Mutex<BTreeMap<String, Value>>>,
    candidates: Arc<Mutex<HashMap<String, SeedCandidate>>>,
    applications: Arc<Mutex<HashMap<String, Vec<ApplicantRef>>>>,
    rankings: Arc<Mutex<HashMap<VacancyId, RankingRecord>>>,
}

impl InMemoryMatchingStore {
    pub(crate) fn from_seed(seed: SeedData) -> Self {
        let mut applications: HashMap<String, Vec<ApplicantRef>> = HashMap::new();
        for application in seed.applications {
            applications
                .entry(application.vacancy_id)
                .or_default()
                .push(ApplicantRef {
                    candidate_id: CandidateId(application.candidate_id),
                    applied_at: application.applied_at,
                });
        }

        Self {
            vacancies: Arc::new(Mutex::new(seed.vacancies)),
            candidates: Arc::new(Mutex::new(seed.candidates.into_iter().collect())),
            applications: Arc::new(Mutex::new(applications)),
            rankings: Arc::default(),
        }
    }

    pub(crate) fn vacancy_count(&self) -> usize {
        lock(&self.vacancies).map(|guard| guard.len()).unwrap_or(0)
    }

    pub(crate) fn candidate_count(&self) -> usize {
        lock(&self.candidates).map(|guard| guard.len()).unwrap_or(0)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("in-memory store mutex poisoned".to_string()))
}

impl MatchingStore for InMemoryMatchingStore {
    fn vacancy(&self, id: &VacancyId) -> Result<Option<Value>, StoreError> {
        Ok(lock(&self.vacancies)?.get(&id.0).cloned())
    }

    fn applicants(&self, id: &VacancyId) -> Result<Vec<ApplicantRef>, StoreError> {
        Ok(lock(&self.applications)?
            .get(&id.0)
            .cloned()
            .unwrap_or_default())
    }

    fn candidate(&self, id: &CandidateId) -> Result<Option<Value>, StoreError> {
        Ok(lock(&self.candidates)?
            .get(&id.0)
            .map(|record| record.profile.clone()))
    }

    fn work_experience(&self, id: &CandidateId) -> Result<Vec<Value>, StoreError> {
        Ok(lock(&self.candidates)?
            .get(&id.0)
            .map(|record| record.work_experience.clone())
            .unwrap_or_default())
    }

    fn languages(&self, id: &CandidateId) -> Result<Vec<Value>, StoreError> {
        Ok(lock(&self.candidates)?
            .get(&id.0)
            .map(|record| record.languages.clone())
            .unwrap_or_default())
    }

    fn open_vacancies(&self) -> Result<Vec<(VacancyId, Value)>, StoreError> {
        Ok(lock(&self.vacancies)?
            .iter()
            .map(|(id, document)| (VacancyId(id.clone()), document.clone()))
            .collect())
    }

    fn save_ranking(&self, record: RankingRecord) -> Result<(), StoreError> {
        lock(&self.rankings)?.insert(record.vacancy_id.clone(), record);
        Ok(())
    }

    fn ranking(&self, id: &VacancyId) -> Result<Option<RankingRecord>, StoreError> {
        Ok(lock(&self.rankings)?.get(id).cloned())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
