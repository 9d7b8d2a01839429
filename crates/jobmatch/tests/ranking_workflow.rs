//! End-to-end scenarios through the public service facade: documents in, ranked shortlist and
//! discovery feed out.

mod common {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::{json, Value};

    use jobmatch::matching::{
        ApplicantRef, CandidateId, MatchingStore, RankingRecord, StoreError, VacancyId,
    };

    #[derive(Default)]
    pub(super) struct DocumentStore {
        pub(super) vacancies: HashMap<String, Value>,
        pub(super) candidates: HashMap<String, (Value, Vec<Value>, Vec<Value>)>,
        pub(super) applicants: Vec<ApplicantRef>,
        pub(super) rankings: Mutex<HashMap<VacancyId, RankingRecord>>,
    }

    impl MatchingStore for DocumentStore {
        fn vacancy(&self, id: &VacancyId) -> Result<Option<Value>, StoreError> {
            Ok(self.vacancies.get(&id.0).cloned())
        }

        fn applicants(&self, _id: &VacancyId) -> Result<Vec<ApplicantRef>, StoreError> {
            Ok(self.applicants.clone())
        }

        fn candidate(&self, id: &CandidateId) -> Result<Option<Value>, StoreError> {
            Ok(self.candidates.get(&id.0).map(|entry| entry.0.clone()))
        }

        fn work_experience(&self, id: &CandidateId) -> Result<Vec<Value>, StoreError> {
            Ok(self
                .candidates
                .get(&id.0)
                .map(|entry| entry.1.clone())
                .unwrap_or_default())
        }

        fn languages(&self, id: &CandidateId) -> Result<Vec<Value>, StoreError> {
            Ok(self
                .candidates
                .get(&id.0)
                .map(|entry| entry.2.clone())
                .unwrap_or_default())
        }

        fn open_vacancies(&self) -> Result<Vec<(VacancyId, Value)>, StoreError> {
            let mut open: Vec<_> = self
                .vacancies
                .iter()
                .map(|(id, document)| (VacancyId(id.clone()), document.clone()))
                .collect();
            open.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(open)
        }

        fn save_ranking(&self, record: RankingRecord) -> Result<(), StoreError> {
            self.rankings
                .lock()
                .map_err(|_| StoreError::Unavailable("poisoned".to_string()))?
                .insert(record.vacancy_id.clone(), record);
            Ok(())
        }

        fn ranking(&self, id: &VacancyId) -> Result<Option<RankingRecord>, StoreError> {
            Ok(self
                .rankings
                .lock()
                .map_err(|_| StoreError::Unavailable("poisoned".to_string()))?
                .get(id)
                .cloned())
        }
    }

    pub(super) fn warehouse_store() -> DocumentStore {
        let mut store = DocumentStore::default();
        store.vacancies.insert(
            "vac-warehouse".to_string(),
            json!({
                "title": "Warehouse Lead",
                "requiredEducationLevel": "Vocational",
                "requiredExperience": 3,
                "jobField": "Logistics",
                "jobSpecialization": "Warehousing",
                "requiredLanguages": [{ "language": "German", "proficiency": "B1" }],
                "city": "Hamburg",
                "country": "Germany",
                "latitude": 53.5511,
                "longitude": 9.9937,
                "requiresDriverLicense": true
            }),
        );
        store.vacancies.insert(
            "vac-remote".to_string(),
            json!({
                "title": "Remote Dispatcher",
                "jobField": "Logistics",
                "jobType": "Remote"
            }),
        );

        store.candidates.insert(
            "cand-lena".to_string(),
            (
                json!({
                    "educationLevel": "Technical",
                    "preferredJobFields": ["Logistics"],
                    "preferredSpecializations": ["Warehousing"],
                    "city": "Hamburg",
                    "country": "Germany",
                    "latitude": 53.56,
                    "longitude": 10.0,
                    "acceptableDistance": 25,
                    "hasDriverLicense": true
                }),
                vec![json!({ "field": "Logistics", "specialization": "Warehousing", "duration": 4 })],
                vec![json!({ "language": "German", "proficiency": "Mother Tongue" })],
            ),
        );
        store.candidates.insert(
            "cand-omar".to_string(),
            (
                json!({
                    "educationLevel": "Secondary",
                    "preferredJobFields": [{ "field": "Logistics", "specializations": ["Fleet"] }],
                    "city": "Bremen",
                    "country": "Germany",
                    "acceptableDistance": 150,
                    "hasDriverLicense": false
                }),
                vec![json!({ "field": "Logistics", "specialization": "Fleet", "duration": 2 })],
                vec![json!({ "language": "German", "proficiency": "A2" })],
            ),
        );

        store.applicants = vec![
            ApplicantRef {
                candidate_id: CandidateId("cand-omar".to_string()),
                applied_at: None,
            },
            ApplicantRef {
                candidate_id: CandidateId("cand-lena".to_string()),
                applied_at: None,
            },
        ];
        store
    }
}

use std::sync::Arc;

use common::*;
use jobmatch::config::MatchingConfig;
use jobmatch::matching::{
    write_shortlist_csv, CandidateId, MatchTier, MatchingService, VacancyId,
};

#[test]
fn vacancy_ranking_produces_a_shortlist() {
    let store = Arc::new(warehouse_store());
    let service = MatchingService::new(store.clone(), MatchingConfig::default());

    let report = service
        .rank_vacancy(&VacancyId("vac-warehouse".to_string()))
        .expect("ranking succeeds");

    let order: Vec<&str> = report
        .ranked
        .iter()
        .map(|candidate| candidate.candidate_id.0.as_str())
        .collect();
    assert_eq!(order, vec!["cand-lena", "cand-omar"]);
    assert!(report.ranked[0].absolute_score > report.ranked[1].absolute_score);
    assert!(report.ranked[0].match_percent() >= 90);

    let stored = service
        .stored_ranking(&VacancyId("vac-warehouse".to_string()))
        .expect("ranking stored");
    assert_eq!(stored.order, report.order());

    let mut csv = Vec::new();
    write_shortlist_csv(&mut csv, &report.ranked).expect("csv export");
    let csv = String::from_utf8(csv).expect("utf8");
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().nth(1).is_some_and(|line| line.starts_with("1,cand-lena,")));
}

#[test]
fn discovery_feed_puts_perfect_matches_first() {
    let service = MatchingService::new(Arc::new(warehouse_store()), MatchingConfig::default());

    let feed = service
        .discovery_feed(&CandidateId("cand-lena".to_string()))
        .expect("feed builds");

    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].vacancy_id.0, "vac-warehouse");
    assert_eq!(feed[0].tier, MatchTier::Perfect);
    assert!(feed[0].distance_km.is_some_and(|distance| distance < 5.0));
    assert_eq!(feed[1].vacancy_id.0, "vac-remote");
    assert!(feed[1].remote);
}

#[test]
fn unlicensed_seekers_never_see_postings_that_require_a_license() {
    let service = MatchingService::new(Arc::new(warehouse_store()), MatchingConfig::default());

    let feed = service
        .discovery_feed(&CandidateId("cand-omar".to_string()))
        .expect("feed builds");

    assert!(feed
        .iter()
        .all(|entry| entry.vacancy_id.0 != "vac-warehouse"));
}
