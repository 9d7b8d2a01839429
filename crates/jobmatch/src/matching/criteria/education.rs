use crate::matching::domain::{
    eq_ignore_case, is_blank, EducationBackground, EducationLevel, EducationRequirement,
};

const FIELD_MISMATCH_PENALTY: f64 = 0.2;

pub fn education_score(required: &EducationRequirement, candidate: &EducationBackground) -> f64 {
    if required.level == EducationLevel::NoEducation {
        return 1.0;
    }

    let mut score = if candidate.level.satisfies(required.level) {
        1.0
    } else {
        f64::from(candidate.level.ordinal()) / f64::from(required.level.ordinal())
    };

    if differs(&required.study_field, &candidate.study_field) {
        score -= FIELD_MISMATCH_PENALTY;
    }
    if differs(&required.specialization, &candidate.specialization) {
        score -= FIELD_MISMATCH_PENALTY;
    }

    score.clamp(0.0, 1.0)
}

/// Both sides filled in and not equal, ignoring case.
fn differs(required: &str, candidate: &str) -> bool {
    !is_blank(required) && !is_blank(candidate) && !eq_ignore_case(required, candidate)
}
