use crate::matching::domain::{eq_ignore_case, is_blank, WorkExperience};

const SPECIALIZATION_MISMATCH_CREDIT: f64 = 0.7;
const UNRELATED_FIELD_CREDIT: f64 = 0.2;

/// Share of the required experience covered by relevant months, capped at 1.
pub fn experience_score(
    required_years: f64,
    job_field: &str,
    job_specialization: &str,
    entries: &[WorkExperience],
) -> f64 {
    if !required_years.is_finite() || required_years <= 0.0 {
        return 1.0;
    }
    if entries.is_empty() {
        return 0.0;
    }

    let relevant_months: f64 = entries
        .iter()
        .map(|entry| relevant_months(entry, job_field, job_specialization))
        .sum();

    (relevant_months / (required_years * 12.0)).min(1.0)
}

fn relevant_months(entry: &WorkExperience, job_field: &str, job_specialization: &str) -> f64 {
    if is_blank(&entry.field) || is_blank(job_field) {
        return 0.0;
    }

    let months = entry.months();
    if !eq_ignore_case(&entry.field, job_field) {
        return months * UNRELATED_FIELD_CREDIT;
    }

    if is_blank(job_specialization) || eq_ignore_case(&entry.specialization, job_specialization) {
        months
    } else {
        months * SPECIALIZATION_MISMATCH_CREDIT
    }
}
