use crate::matching::domain::{eq_ignore_case, is_blank, CandidateProfile, JobRequirement};

use super::{CompatibilityComponent, CompatibilityFactor};

const BEYOND_RADIUS_POINTS: f64 = 5.0;
const DISTANCE_TIERS: [(f64, f64); 3] = [(0.2, 30.0), (0.5, 20.0), (0.8, 10.0)];
const FAR_WITHIN_RADIUS_POINTS: f64 = 5.0;
const EDUCATION_POINTS: f64 = 15.0;
const EXPERIENCE_MET_POINTS: f64 = 20.0;
const EXPERIENCE_RATIO_CAP: f64 = 2.0;
const EXPERIENCE_PARTIAL_POINTS: f64 = 10.0;
const EXPERIENCE_ESSENTIAL_RATIO: f64 = 0.5;
const EXPERIENCE_UNREQUIRED_POINTS: f64 = 5.0;
const STUDY_FIELD_MATCH: f64 = 20.0;
const STUDY_FIELD_MISMATCH: f64 = -10.0;
const SPECIALIZATION_MATCH: f64 = 25.0;
const SPECIALIZATION_MISMATCH: f64 = -5.0;
const JOB_FIELD_MATCH: f64 = 30.0;
const JOB_SPECIALIZATION_MATCH: f64 = 40.0;
const JOB_SPECIALIZATION_MISMATCH: f64 = -10.0;
const JOB_FIELD_MISMATCH: f64 = -30.0;
const OPEN_TO_ALL_FIELDS: f64 = 10.0;
const MISSING_ESSENTIAL_PENALTY: f64 = 40.0;

pub(crate) struct Tally {
    pub total: f64,
    pub disqualified: bool,
    pub missing_essential: bool,
    pub components: Vec<CompatibilityComponent>,
}

impl Tally {
    fn new() -> Self {
        Self {
            total: 0.0,
            disqualified: false,
            missing_essential: false,
            components: Vec::new(),
        }
    }

    fn award(&mut self, factor: CompatibilityFactor, points: f64, notes: String) {
        self.total += points;
        self.components.push(CompatibilityComponent {
            factor,
            points,
            notes,
        });
    }

    fn flag(&mut self, factor: CompatibilityFactor, notes: String) {
        self.missing_essential = true;
        self.components.push(CompatibilityComponent {
            factor,
            points: 0.0,
            notes,
        });
    }
}

pub(crate) fn tally(
    requirement: &JobRequirement,
    candidate: &CandidateProfile,
    distance_km: Option<f64>,
) -> Tally {
    let mut tally = Tally::new();

    if requirement.driver_license_required && !candidate.has_driver_license {
        tally.disqualified = true;
        tally.components.push(CompatibilityComponent {
            factor: CompatibilityFactor::DriverLicense,
            points: 0.0,
            notes: "driver's license required but not held".to_string(),
        });
    }

    if !requirement.is_remote() {
        score_distance(&mut tally, distance_km, candidate.location.acceptable_distance_km);
    }
    score_education(&mut tally, requirement, candidate);
    score_experience(&mut tally, requirement, candidate);
    score_study(&mut tally, requirement, candidate);
    score_job_field(&mut tally, requirement, candidate);

    if tally.missing_essential {
        let deduction = MISSING_ESSENTIAL_PENALTY.min(tally.total.max(0.0));
        tally.total = (tally.total - MISSING_ESSENTIAL_PENALTY).max(0.0);
        tally.components.push(CompatibilityComponent {
            factor: CompatibilityFactor::MissingEssential,
            points: -deduction,
            notes: format!("essential requirement missing, -{MISSING_ESSENTIAL_PENALTY:.0}"),
        });
    }

    tally
}

/// Beyond-radius postings still earn the weakest bonus here; the hard cutoff lives in the feed.
fn score_distance(tally: &mut Tally, distance_km: Option<f64>, acceptable_km: Option<f64>) {
    let (Some(distance), Some(acceptable)) = (distance_km, acceptable_km) else {
        return;
    };
    if !distance.is_finite() || distance < 0.0 || !acceptable.is_finite() || acceptable <= 0.0 {
        return;
    }

    if distance > acceptable {
        tally.award(
            CompatibilityFactor::Distance,
            BEYOND_RADIUS_POINTS,
            format!("{distance:.1} km exceeds acceptable {acceptable:.1} km"),
        );
        return;
    }

    let ratio = distance / acceptable;
    let points = DISTANCE_TIERS
        .iter()
        .find(|(limit, _)| ratio < *limit)
        .map(|(_, points)| *points)
        .unwrap_or(FAR_WITHIN_RADIUS_POINTS);
    tally.award(
        CompatibilityFactor::Distance,
        points,
        format!("{distance:.1} km is {:.0}% of acceptable distance", ratio * 100.0),
    );
}

fn score_education(tally: &mut Tally, requirement: &JobRequirement, candidate: &CandidateProfile) {
    let required = requirement.education.level;
    let actual = candidate.education.level;
    if actual.satisfies(required) {
        tally.award(
            CompatibilityFactor::Education,
            EDUCATION_POINTS,
            format!("{} meets {}", actual.label(), required.label()),
        );
    } else {
        tally.flag(
            CompatibilityFactor::Education,
            format!("{} below required {}", actual.label(), required.label()),
        );
    }
}

fn score_experience(tally: &mut Tally, requirement: &JobRequirement, candidate: &CandidateProfile) {
    let required = requirement.required_experience_years;
    let actual = candidate.years_of_experience();

    if !required.is_finite() || required <= 0.0 {
        if actual > 0.0 {
            tally.award(
                CompatibilityFactor::Experience,
                EXPERIENCE_UNREQUIRED_POINTS,
                format!("{actual:.1} years of experience, none required"),
            );
        }
        return;
    }

    if actual <= 0.0 {
        tally.flag(
            CompatibilityFactor::Experience,
            format!("no experience, {required:.1} years required"),
        );
        return;
    }

    let ratio = actual / required;
    if actual >= required {
        tally.award(
            CompatibilityFactor::Experience,
            EXPERIENCE_MET_POINTS * ratio.min(EXPERIENCE_RATIO_CAP),
            format!("{actual:.1} of {required:.1} required years"),
        );
    } else {
        tally.award(
            CompatibilityFactor::Experience,
            EXPERIENCE_PARTIAL_POINTS * ratio,
            format!("{actual:.1} of {required:.1} required years"),
        );
        if ratio < EXPERIENCE_ESSENTIAL_RATIO {
            tally.flag(
                CompatibilityFactor::Experience,
                "less than half the required experience".to_string(),
            );
        }
    }
}

fn score_study(tally: &mut Tally, requirement: &JobRequirement, candidate: &CandidateProfile) {
    compare_strings(
        tally,
        CompatibilityFactor::StudyField,
        &requirement.education.study_field,
        &candidate.education.study_field,
        (STUDY_FIELD_MATCH, STUDY_FIELD_MISMATCH),
    );
    compare_strings(
        tally,
        CompatibilityFactor::Specialization,
        &requirement.education.specialization,
        &candidate.education.specialization,
        (SPECIALIZATION_MATCH, SPECIALIZATION_MISMATCH),
    );
}

fn compare_strings(
    tally: &mut Tally,
    factor: CompatibilityFactor,
    required: &str,
    actual: &str,
    (matched, mismatched): (f64, f64),
) {
    if is_blank(required) || is_blank(actual) {
        return;
    }

    if eq_ignore_case(required, actual) {
        tally.award(factor, matched, format!("'{}' matches", required.trim()));
    } else {
        tally.award(
            factor,
            mismatched,
            format!("'{}' differs from '{}'", actual.trim(), required.trim()),
        );
    }
}

fn score_job_field(tally: &mut Tally, requirement: &JobRequirement, candidate: &CandidateProfile) {
    if candidate.open_to_all_fields {
        tally.award(
            CompatibilityFactor::JobField,
            OPEN_TO_ALL_FIELDS,
            "open to all job fields".to_string(),
        );
        return;
    }

    let field = &requirement.job_field;
    if is_blank(field) {
        return;
    }

    if !candidate.prefers_field(field) {
        tally.award(
            CompatibilityFactor::JobField,
            JOB_FIELD_MISMATCH,
            format!("'{}' not among preferred fields", field.trim()),
        );
        tally.flag(
            CompatibilityFactor::JobField,
            "job field outside preferences".to_string(),
        );
        return;
    }

    tally.award(
        CompatibilityFactor::JobField,
        JOB_FIELD_MATCH,
        format!("'{}' is a preferred field", field.trim()),
    );

    let specialization = &requirement.job_specialization;
    if is_blank(specialization) {
        return;
    }
    if candidate.prefers_specialization(specialization) {
        tally.award(
            CompatibilityFactor::JobSpecialization,
            JOB_SPECIALIZATION_MATCH,
            format!("'{}' is a preferred specialization", specialization.trim()),
        );
    } else if candidate.has_specialization_preferences() {
        tally.award(
            CompatibilityFactor::JobSpecialization,
            JOB_SPECIALIZATION_MISMATCH,
            format!("'{}' not among preferred specializations", specialization.trim()),
        );
    }
}
