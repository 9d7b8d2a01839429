use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VacancyId(pub String);

/// Identifier wrapper for job seekers.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for VacancyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Education tiers shared by both scorers.
///
/// A single ordinal table is applied everywhere; `Technical` sits between `Vocational` and
/// `Bachelor`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EducationLevel {
    #[default]
    NoEducation,
    Secondary,
    Vocational,
    Technical,
    Bachelor,
    Master,
    Doctoral,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 7] = [
        EducationLevel::NoEducation,
        EducationLevel::Secondary,
        EducationLevel::Vocational,
        EducationLevel::Technical,
        EducationLevel::Bachelor,
        EducationLevel::Master,
        EducationLevel::Doctoral,
    ];

    pub const fn ordinal(self) -> u8 {
        match self {
            EducationLevel::NoEducation => 0,
            EducationLevel::Secondary => 1,
            EducationLevel::Vocational => 2,
            EducationLevel::Technical => 3,
            EducationLevel::Bachelor => 4,
            EducationLevel::Master => 5,
            EducationLevel::Doctoral => 6,
        }
    }

    /// `NoEducation` as a requirement is satisfied by every candidate.
    pub fn satisfies(self, required: EducationLevel) -> bool {
        required == EducationLevel::NoEducation || self.ordinal() >= required.ordinal()
    }

    pub const fn label(self) -> &'static str {
        match self {
            EducationLevel::NoEducation => "No Education",
            EducationLevel::Secondary => "Secondary",
            EducationLevel::Vocational => "Vocational",
            EducationLevel::Technical => "Technical",
            EducationLevel::Bachelor => "Bachelor",
            EducationLevel::Master => "Master",
            EducationLevel::Doctoral => "Doctoral",
        }
    }
}

/// Language proficiency scale. `MotherTongue` ranks above `C2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Proficiency {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
    MotherTongue,
}

impl Proficiency {
    pub const fn rank(self) -> u8 {
        match self {
            Proficiency::A1 => 1,
            Proficiency::A2 => 2,
            Proficiency::B1 => 3,
            Proficiency::B2 => 4,
            Proficiency::C1 => 5,
            Proficiency::C2 => 6,
            Proficiency::MotherTongue => 7,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Proficiency::A1 => "A1",
            Proficiency::A2 => "A2",
            Proficiency::B1 => "B1",
            Proficiency::B2 => "B2",
            Proficiency::C1 => "C1",
            Proficiency::C2 => "C2",
            Proficiency::MotherTongue => "Mother Tongue",
        }
    }
}

/// Rank of an optional proficiency; unknown levels rank 0.
pub fn proficiency_rank(level: Option<Proficiency>) -> u8 {
    level.map(Proficiency::rank).unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
    Other(String),
}

impl JobType {
    pub fn is_remote(&self) -> bool {
        matches!(self, JobType::Remote)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where a posting is located or where a seeker lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub coordinates: Option<Coordinates>,
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationRequirement {
    pub level: EducationLevel,
    pub study_field: String,
    pub specialization: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageRequirement {
    pub name: String,
    pub minimum: Option<Proficiency>,
}

/// Everything the scorers need to know about a posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirement {
    pub id: VacancyId,
    pub title: String,
    pub education: EducationRequirement,
    pub required_experience_years: f64,
    pub job_field: String,
    pub job_specialization: String,
    pub languages: Vec<LanguageRequirement>,
    pub location: Location,
    pub job_type: JobType,
    pub driver_license_required: bool,
    pub weights: Option<CriterionWeights>,
}

impl JobRequirement {
    pub fn is_remote(&self) -> bool {
        self.job_type.is_remote()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationBackground {
    pub level: EducationLevel,
    pub study_field: String,
    pub specialization: String,
}

/// One flattened work-experience entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub field: String,
    pub specialization: String,
    pub years: f64,
    pub current: bool,
}

impl WorkExperience {
    pub fn months(&self) -> f64 {
        self.years.max(0.0) * 12.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub name: String,
    pub proficiency: Option<Proficiency>,
}

/// Canonical preferred-field entry: a job field and the specializations chosen under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldPreference {
    pub field: String,
    pub specializations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateLocation {
    pub city: String,
    pub country: String,
    pub coordinates: Option<Coordinates>,
    pub acceptable_distance_km: Option<f64>,
}

/// Everything the scorers need to know about a job seeker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub id: CandidateId,
    pub education: EducationBackground,
    pub experience_years: f64,
    pub work_experience: Vec<WorkExperience>,
    pub open_to_all_fields: bool,
    pub preferred_fields: Vec<FieldPreference>,
    pub languages: Vec<LanguageSkill>,
    pub location: CandidateLocation,
    pub has_driver_license: bool,
    pub applied_at: Option<DateTime<Utc>>,
}

impl CandidateProfile {
    /// Declared years, falling back to the summed work-experience durations.
    pub fn years_of_experience(&self) -> f64 {
        if self.experience_years > 0.0 {
            return self.experience_years;
        }

        self.work_experience
            .iter()
            .map(|entry| entry.years.max(0.0))
            .sum()
    }

    pub fn prefers_field(&self, field: &str) -> bool {
        self.preferred_fields
            .iter()
            .any(|preference| eq_ignore_case(&preference.field, field))
    }

    pub fn prefers_specialization(&self, specialization: &str) -> bool {
        self.preferred_fields
            .iter()
            .flat_map(|preference| preference.specializations.iter())
            .any(|candidate| eq_ignore_case(candidate, specialization))
    }

    pub fn has_specialization_preferences(&self) -> bool {
        self.preferred_fields
            .iter()
            .any(|preference| preference.specializations.iter().any(|s| !is_blank(s)))
    }
}

/// The five ranking criteria, in matrix column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    Education,
    Experience,
    FieldMatch,
    Language,
    Location,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Education,
        Criterion::Experience,
        Criterion::FieldMatch,
        Criterion::Language,
        Criterion::Location,
    ];

    pub const fn index(self) -> usize {
        match self {
            Criterion::Education => 0,
            Criterion::Experience => 1,
            Criterion::FieldMatch => 2,
            Criterion::Language => 3,
            Criterion::Location => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Criterion::Education => "education",
            Criterion::Experience => "experience",
            Criterion::FieldMatch => "field_match",
            Criterion::Language => "language",
            Criterion::Location => "location",
        }
    }
}

pub const CRITERIA_COUNT: usize = 5;

/// Employer importance weights. Values need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionWeights {
    pub education: f64,
    pub experience: f64,
    pub field_match: f64,
    pub language: f64,
    pub location: f64,
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            education: 0.3,
            experience: 0.3,
            field_match: 0.2,
            language: 0.1,
            location: 0.1,
        }
    }
}

impl CriterionWeights {
    pub const UNIFORM: CriterionWeights = CriterionWeights {
        education: 0.2,
        experience: 0.2,
        field_match: 0.2,
        language: 0.2,
        location: 0.2,
    };

    pub fn from_array(values: [f64; CRITERIA_COUNT]) -> Self {
        Self {
            education: values[0],
            experience: values[1],
            field_match: values[2],
            language: values[3],
            location: values[4],
        }
    }

    pub fn as_array(&self) -> [f64; CRITERIA_COUNT] {
        [
            self.education,
            self.experience,
            self.field_match,
            self.language,
            self.location,
        ]
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.as_array()[criterion.index()]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Rescale so the weights sum to 1. Negative or non-finite entries count as 0; an all-zero
    /// vector becomes uniform.
    pub fn normalized(&self) -> Self {
        let sanitized = self
            .as_array()
            .map(|value| if value.is_finite() && value > 0.0 { value } else { 0.0 });
        let total: f64 = sanitized.iter().sum();
        if total <= 0.0 {
            return Self::UNIFORM;
        }

        Self::from_array(sanitized.map(|value| value / total))
    }
}

/// Per-criterion sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub education: f64,
    pub experience: f64,
    pub field_match: f64,
    pub language: f64,
    pub location: f64,
}

impl ScoreVector {
    pub fn from_array(values: [f64; CRITERIA_COUNT]) -> Self {
        Self {
            education: values[0],
            experience: values[1],
            field_match: values[2],
            language: values[3],
            location: values[4],
        }
    }

    pub fn as_array(&self) -> [f64; CRITERIA_COUNT] {
        [
            self.education,
            self.experience,
            self.field_match,
            self.language,
            self.location,
        ]
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.as_array()[criterion.index()]
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub(crate) fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}
