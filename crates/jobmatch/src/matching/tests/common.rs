use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use crate::config::MatchingConfig;
use crate::matching::domain::{
    CandidateId, CandidateLocation, CandidateProfile, Coordinates, EducationBackground,
    EducationLevel, EducationRequirement, FieldPreference, JobRequirement, JobType,
    LanguageRequirement, LanguageSkill, Location, Proficiency, VacancyId, WorkExperience,
};
use crate::matching::intake::ProfileIntake;
use crate::matching::repository::{ApplicantRef, MatchingStore, RankingRecord, StoreError};
use crate::matching::router::matching_router;
use crate::matching::service::MatchingService;

pub(super) const BERLIN: Coordinates = Coordinates {
    latitude: 52.52,
    longitude: 13.405,
};
pub(super) const POTSDAM: Coordinates = Coordinates {
    latitude: 52.3906,
    longitude: 13.0645,
};
pub(super) const MUNICH: Coordinates = Coordinates {
    latitude: 48.1351,
    longitude: 11.582,
};

pub(super) fn timestamp(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

/// Bachelor, 2 years in Engineering, English at B2, on site in Berlin.
pub(super) fn engineering_requirement() -> JobRequirement {
    JobRequirement {
        id: VacancyId("vac-eng".to_string()),
        title: "Mechanical Engineer".to_string(),
        education: EducationRequirement {
            level: EducationLevel::Bachelor,
            study_field: String::new(),
            specialization: String::new(),
        },
        required_experience_years: 2.0,
        job_field: "Engineering".to_string(),
        job_specialization: String::new(),
        languages: vec![LanguageRequirement {
            name: "English".to_string(),
            minimum: Some(Proficiency::B2),
        }],
        location: Location {
            city: "Berlin".to_string(),
            country: "Germany".to_string(),
            coordinates: Some(BERLIN),
            place_id: None,
        },
        job_type: JobType::FullTime,
        driver_license_required: false,
        weights: None,
    }
}

/// Master, 3 years of Engineering, English at C1, lives in Berlin.
pub(super) fn candidate_a() -> CandidateProfile {
    CandidateProfile {
        id: CandidateId("cand-a".to_string()),
        education: EducationBackground {
            level: EducationLevel::Master,
            study_field: String::new(),
            specialization: String::new(),
        },
        experience_years: 0.0,
        work_experience: vec![WorkExperience {
            field: "Engineering".to_string(),
            specialization: String::new(),
            years: 3.0,
            current: true,
        }],
        open_to_all_fields: false,
        preferred_fields: vec![FieldPreference {
            field: "Engineering".to_string(),
            specializations: Vec::new(),
        }],
        languages: vec![LanguageSkill {
            name: "English".to_string(),
            proficiency: Some(Proficiency::C1),
        }],
        location: CandidateLocation {
            city: "Berlin".to_string(),
            country: "Germany".to_string(),
            coordinates: Some(BERLIN),
            acceptable_distance_km: Some(50.0),
        },
        has_driver_license: true,
        applied_at: Some(timestamp(1, 9)),
    }
}

/// Secondary education, no experience, no English, lives in Munich.
pub(super) fn candidate_b() -> CandidateProfile {
    CandidateProfile {
        id: CandidateId("cand-b".to_string()),
        education: EducationBackground {
            level: EducationLevel::Secondary,
            ..EducationBackground::default()
        },
        open_to_all_fields: true,
        location: CandidateLocation {
            city: "Munich".to_string(),
            country: "Germany".to_string(),
            coordinates: Some(MUNICH),
            acceptable_distance_km: Some(30.0),
        },
        applied_at: Some(timestamp(2, 9)),
        ..CandidateProfile::default()
    }
}

pub(super) fn vacancy_document() -> Value {
    json!({
        "title": "Mechanical Engineer",
        "requiredEducationLevel": "Bachelor",
        "requiredExperience": "2",
        "jobField": "Engineering",
        "requiredLanguages": [{ "language": "English", "proficiency": "B2" }],
        "city": "Berlin",
        "country": "Germany",
        "latitude": BERLIN.latitude,
        "longitude": BERLIN.longitude,
        "jobType": "Full Time",
        "requiresDriverLicense": false,
        "criteriaWeights": {
            "education": 3,
            "experience": 3,
            "fieldMatch": 2,
            "language": 1,
            "location": 1
        }
    })
}

pub(super) fn candidate_a_document() -> Value {
    json!({
        "educationLevel": "Master's",
        "preferredJobFields": [{ "field": "Engineering", "specializations": [] }],
        "selectedAllFields": false,
        "city": "Berlin",
        "country": "Germany",
        "latitude": BERLIN.latitude,
        "longitude": BERLIN.longitude,
        "acceptableDistance": 50,
        "hasDriverLicense": true
    })
}

pub(super) fn candidate_a_experience() -> Vec<Value> {
    vec![json!({ "field": "Engineering", "duration": 3, "current": true })]
}

pub(super) fn candidate_a_languages() -> Vec<Value> {
    vec![json!({ "language": "English", "proficiency": "C1" })]
}

pub(super) fn candidate_b_document() -> Value {
    json!({
        "educationLevel": "Secondary",
        "preferredJobFields": [],
        "city": "Munich",
        "country": "Germany",
        "latitude": MUNICH.latitude,
        "longitude": MUNICH.longitude,
        "acceptableDistance": "30"
    })
}

pub(super) fn matching_config() -> MatchingConfig {
    MatchingConfig::default()
}

#[derive(Default)]
pub(super) struct MemoryStore {
    vacancies: Mutex<HashMap<VacancyId, Value>>,
    applicants: Mutex<HashMap<VacancyId, Vec<ApplicantRef>>>,
    candidates: Mutex<HashMap<CandidateId, Value>>,
    experience: Mutex<HashMap<CandidateId, Vec<Value>>>,
    languages: Mutex<HashMap<CandidateId, Vec<Value>>>,
    rankings: Mutex<HashMap<VacancyId, RankingRecord>>,
    pending_failures: Mutex<HashMap<CandidateId, u32>>,
    candidate_reads: Mutex<HashMap<CandidateId, u32>>,
}

impl MemoryStore {
    pub(super) fn insert_vacancy(&self, id: &str, document: Value) {
        self.vacancies
            .lock()
            .expect("store mutex poisoned")
            .insert(VacancyId(id.to_string()), document);
    }

    pub(super) fn insert_candidate(
        &self,
        id: &str,
        document: Value,
        experience: Vec<Value>,
        languages: Vec<Value>,
    ) {
        let id = CandidateId(id.to_string());
        self.candidates
            .lock()
            .expect("store mutex poisoned")
            .insert(id.clone(), document);
        self.experience
            .lock()
            .expect("store mutex poisoned")
            .insert(id.clone(), experience);
        self.languages
            .lock()
            .expect("store mutex poisoned")
            .insert(id, languages);
    }

    pub(super) fn apply(&self, vacancy: &str, candidate: &str, applied_at: Option<DateTime<Utc>>) {
        self.applicants
            .lock()
            .expect("store mutex poisoned")
            .entry(VacancyId(vacancy.to_string()))
            .or_default()
            .push(ApplicantRef {
                candidate_id: CandidateId(candidate.to_string()),
                applied_at,
            });
    }

    /// The next `count` profile reads for the candidate report the store as unavailable.
    pub(super) fn fail_reads(&self, candidate: &str, count: u32) {
        self.pending_failures
            .lock()
            .expect("store mutex poisoned")
            .insert(CandidateId(candidate.to_string()), count);
    }

    pub(super) fn reads_of(&self, candidate: &str) -> u32 {
        self.candidate_reads
            .lock()
            .expect("store mutex poisoned")
            .get(&CandidateId(candidate.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

impl MatchingStore for MemoryStore {
    fn vacancy(&self, id: &VacancyId) -> Result<Option<Value>, StoreError> {
        Ok(self
            .vacancies
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn applicants(&self, id: &VacancyId) -> Result<Vec<ApplicantRef>, StoreError> {
        Ok(self
            .applicants
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    fn candidate(&self, id: &CandidateId) -> Result<Option<Value>, StoreError> {
        *self
            .candidate_reads
            .lock()
            .expect("store mutex poisoned")
            .entry(id.clone())
            .or_default() += 1;

        let mut failures = self.pending_failures.lock().expect("store mutex poisoned");
        if let Some(remaining) = failures.get_mut(id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(StoreError::Unavailable("profile shard offline".to_string()));
            }
        }

        Ok(self
            .candidates
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn work_experience(&self, id: &CandidateId) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .experience
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    fn languages(&self, id: &CandidateId) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .languages
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    fn open_vacancies(&self) -> Result<Vec<(VacancyId, Value)>, StoreError> {
        let mut vacancies: Vec<_> = self
            .vacancies
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .map(|(id, document)| (id.clone(), document.clone()))
            .collect();
        vacancies.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(vacancies)
    }

    fn save_ranking(&self, record: RankingRecord) -> Result<(), StoreError> {
        self.rankings
            .lock()
            .expect("store mutex poisoned")
            .insert(record.vacancy_id.clone(), record);
        Ok(())
    }

    fn ranking(&self, id: &VacancyId) -> Result<Option<RankingRecord>, StoreError> {
        Ok(self
            .rankings
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }
}

pub(super) struct UnavailableStore;

impl MatchingStore for UnavailableStore {
    fn vacancy(&self, _id: &VacancyId) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn applicants(&self, _id: &VacancyId) -> Result<Vec<ApplicantRef>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn candidate(&self, _id: &CandidateId) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn work_experience(&self, _id: &CandidateId) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn languages(&self, _id: &CandidateId) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn open_vacancies(&self) -> Result<Vec<(VacancyId, Value)>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn save_ranking(&self, _record: RankingRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn ranking(&self, _id: &VacancyId) -> Result<Option<RankingRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Store holding the engineering vacancy with candidates A and B applied.
pub(super) fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::default());
    store.insert_vacancy("vac-eng", vacancy_document());
    store.insert_candidate(
        "cand-a",
        candidate_a_document(),
        candidate_a_experience(),
        candidate_a_languages(),
    );
    store.insert_candidate("cand-b", candidate_b_document(), Vec::new(), Vec::new());
    store.apply("vac-eng", "cand-b", Some(timestamp(2, 9)));
    store.apply("vac-eng", "cand-a", Some(timestamp(1, 9)));
    store
}

pub(super) fn build_service(store: Arc<MemoryStore>) -> MatchingService<MemoryStore> {
    MatchingService::with_intake(
        store,
        ProfileIntake::as_of(reference_date()),
        matching_config(),
    )
}

pub(super) fn router_with_store(store: Arc<MemoryStore>) -> axum::Router {
    matching_router(Arc::new(build_service(store)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
