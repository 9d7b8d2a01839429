use crate::matching::domain::{EducationLevel, JobType, Proficiency};

/// Lowercase and drop everything but letters and digits ("Bachelor's" -> "bachelors").
fn canonical(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Unknown labels fall back to `NoEducation`.
pub fn parse_education_level(raw: &str) -> EducationLevel {
    match canonical(raw).as_str() {
        "secondary" | "secondaryschool" | "highschool" => EducationLevel::Secondary,
        "vocational" | "vocationaltraining" => EducationLevel::Vocational,
        "technical" | "technicalcollege" | "associate" | "associates" => EducationLevel::Technical,
        "bachelor" | "bachelors" | "bachelordegree" | "bsc" | "ba" => EducationLevel::Bachelor,
        "master" | "masters" | "masterdegree" | "msc" | "ma" | "mba" => EducationLevel::Master,
        "doctoral" | "doctorate" | "phd" => EducationLevel::Doctoral,
        _ => EducationLevel::NoEducation,
    }
}

pub fn parse_proficiency(raw: &str) -> Option<Proficiency> {
    match canonical(raw).as_str() {
        "a1" => Some(Proficiency::A1),
        "a2" => Some(Proficiency::A2),
        "b1" => Some(Proficiency::B1),
        "b2" => Some(Proficiency::B2),
        "c1" => Some(Proficiency::C1),
        "c2" => Some(Proficiency::C2),
        "mothertongue" | "native" | "nativespeaker" => Some(Proficiency::MotherTongue),
        _ => None,
    }
}

pub fn parse_job_type(raw: &str) -> JobType {
    match canonical(raw).as_str() {
        "" | "fulltime" => JobType::FullTime,
        "parttime" => JobType::PartTime,
        "contract" | "freelance" => JobType::Contract,
        "internship" | "intern" => JobType::Internship,
        "remote" => JobType::Remote,
        _ => JobType::Other(raw.trim().to_string()),
    }
}
