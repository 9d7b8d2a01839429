//! Boundary adapter turning stored attribute documents into typed matching records.
//!
//! Documents arrive as loosely typed JSON. Everything past this module works on
//! [`JobRequirement`] and [`CandidateProfile`] only. Missing or malformed attributes take their
//! zero value; the one hard failure is a document that is not an object at all.

mod attributes;
mod vocabulary;

pub use attributes::AttributeMap;
pub use vocabulary::{parse_education_level, parse_job_type, parse_proficiency};

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use super::domain::{
    CandidateId, CandidateLocation, CandidateProfile, Coordinates, CriterionWeights,
    EducationBackground, EducationRequirement, FieldPreference, JobRequirement,
    LanguageRequirement, LanguageSkill, Location, VacancyId, WorkExperience,
};

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("{kind} document '{id}' is not an object")]
    NotAnObject { kind: &'static str, id: String },
}

/// Converts stored documents into matching records, resolving open-ended ("current") work
/// experience against a fixed reference date.
#[derive(Debug, Clone, Copy)]
pub struct ProfileIntake {
    as_of: NaiveDate,
}

impl Default for ProfileIntake {
    fn default() -> Self {
        Self::as_of(Utc::now().date_naive())
    }
}

impl ProfileIntake {
    pub fn as_of(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.as_of
    }

    pub fn requirement_from_document(
        &self,
        id: &VacancyId,
        document: &Value,
    ) -> Result<JobRequirement, IntakeError> {
        let attributes =
            AttributeMap::from_value(document).ok_or_else(|| IntakeError::NotAnObject {
                kind: "vacancy",
                id: id.0.clone(),
            })?;

        Ok(JobRequirement {
            id: id.clone(),
            title: attributes.text("title"),
            education: EducationRequirement {
                level: parse_education_level(&attributes.text("requiredEducationLevel")),
                study_field: attributes.text("studyField"),
                specialization: attributes.text("specialization"),
            },
            required_experience_years: attributes.number("requiredExperience").max(0.0),
            job_field: attributes.text("jobField"),
            job_specialization: attributes.text("jobSpecialization"),
            languages: required_languages(&attributes),
            location: Location {
                city: attributes.text("city"),
                country: attributes.text("country"),
                coordinates: coordinates(&attributes),
                place_id: Some(attributes.text("placeId")).filter(|id| !id.is_empty()),
            },
            job_type: parse_job_type(&attributes.text("jobType")),
            driver_license_required: attributes.flag("requiresDriverLicense"),
            weights: attributes.object("criteriaWeights").map(|weights| {
                CriterionWeights {
                    education: weights.number("education").max(0.0),
                    experience: weights.number("experience").max(0.0),
                    field_match: weights.number("fieldMatch").max(0.0),
                    language: weights.number("language").max(0.0),
                    location: weights.number("location").max(0.0),
                }
            }),
        })
    }

    /// Build a profile from the candidate document and its enrichment subcollections.
    ///
    /// When a subcollection slice is empty the same-named array embedded in the document
    /// (`workExperience`, `languages`) is used instead.
    pub fn candidate_from_documents(
        &self,
        id: &CandidateId,
        document: &Value,
        experience: &[Value],
        languages: &[Value],
    ) -> Result<CandidateProfile, IntakeError> {
        let attributes =
            AttributeMap::from_value(document).ok_or_else(|| IntakeError::NotAnObject {
                kind: "candidate",
                id: id.0.clone(),
            })?;

        let experience = subcollection(&attributes, experience, "workExperience");
        let languages = subcollection(&attributes, languages, "languages");

        let preferred_fields = preferred_fields(&attributes);
        let open_to_all_fields = attributes
            .optional_flag("selectedAllFields")
            .unwrap_or(preferred_fields.is_empty());

        Ok(CandidateProfile {
            id: id.clone(),
            education: EducationBackground {
                level: parse_education_level(&attributes.text("educationLevel")),
                study_field: attributes.text("studyField"),
                specialization: attributes.text("specialization"),
            },
            experience_years: attributes.number("yearsOfExperience").max(0.0),
            work_experience: experience
                .iter()
                .filter_map(AttributeMap::from_value)
                .map(|entry| self.work_experience(&entry))
                .collect(),
            open_to_all_fields,
            preferred_fields,
            languages: languages
                .iter()
                .filter_map(AttributeMap::from_value)
                .filter_map(|entry| language_skill(&entry))
                .collect(),
            location: CandidateLocation {
                city: attributes.text("city"),
                country: attributes.text("country"),
                coordinates: coordinates(&attributes),
                acceptable_distance_km: attributes
                    .optional_number("acceptableDistance")
                    .filter(|distance| *distance > 0.0),
            },
            has_driver_license: attributes.flag("hasDriverLicense"),
            applied_at: attributes.timestamp("appliedAt"),
        })
    }

    fn work_experience(&self, entry: &AttributeMap<'_>) -> WorkExperience {
        let current = entry.flag("current");
        let declared = entry.number("duration");
        let years = if declared > 0.0 {
            declared
        } else {
            self.derived_years(entry, current)
        };

        WorkExperience {
            field: entry.text("field"),
            specialization: entry.text("specialization"),
            years,
            current,
        }
    }

    fn derived_years(&self, entry: &AttributeMap<'_>, current: bool) -> f64 {
        let Some(start) = entry.date("startDate") else {
            return 0.0;
        };
        let end = match entry.date("endDate") {
            Some(end) => end,
            None if current => self.as_of,
            None => return 0.0,
        };

        let days = (end - start).num_days();
        if days <= 0 {
            0.0
        } else {
            days as f64 / DAYS_PER_YEAR
        }
    }
}

/// [`ProfileIntake::requirement_from_document`] as of today.
pub fn parse_vacancy(id: &VacancyId, document: &Value) -> Result<JobRequirement, IntakeError> {
    ProfileIntake::default().requirement_from_document(id, document)
}

/// [`ProfileIntake::candidate_from_documents`] as of today.
pub fn parse_candidate(
    id: &CandidateId,
    document: &Value,
    experience: &[Value],
    languages: &[Value],
) -> Result<CandidateProfile, IntakeError> {
    ProfileIntake::default().candidate_from_documents(id, document, experience, languages)
}

fn subcollection<'a>(
    attributes: &AttributeMap<'a>,
    fetched: &'a [Value],
    embedded_key: &str,
) -> &'a [Value] {
    if !fetched.is_empty() {
        return fetched;
    }
    attributes
        .array(embedded_key)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn coordinates(attributes: &AttributeMap<'_>) -> Option<Coordinates> {
    let latitude = attributes.optional_number("latitude")?;
    let longitude = attributes.optional_number("longitude")?;
    let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
    valid.then_some(Coordinates {
        latitude,
        longitude,
    })
}

fn required_languages(attributes: &AttributeMap<'_>) -> Vec<LanguageRequirement> {
    let Some(items) = attributes.array("requiredLanguages") else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(LanguageRequirement {
                name: name.trim().to_string(),
                minimum: None,
            }),
            other => AttributeMap::from_value(other).map(|entry| LanguageRequirement {
                name: entry.text_any(&["language", "name"]),
                minimum: parse_proficiency(&entry.text_any(&["proficiency", "level"])),
            }),
        })
        .filter(|requirement| !requirement.name.is_empty())
        .collect()
}

fn language_skill(entry: &AttributeMap<'_>) -> Option<LanguageSkill> {
    let name = entry.text_any(&["language", "name"]);
    if name.is_empty() {
        return None;
    }

    Some(LanguageSkill {
        name,
        proficiency: parse_proficiency(&entry.text_any(&["proficiency", "level"])),
    })
}

/// Accepts both stored shapes of `preferredJobFields`:
/// objects `{field, specializations}` or plain strings paired by index with the flat
/// `preferredSpecializations` list. Leftover flat specializations attach to the last field.
fn preferred_fields(attributes: &AttributeMap<'_>) -> Vec<FieldPreference> {
    let Some(items) = attributes.array("preferredJobFields") else {
        return Vec::new();
    };
    let flat_specializations = attributes.strings("preferredSpecializations");

    let mut preferences: Vec<FieldPreference> = Vec::new();
    let mut legacy_indices = Vec::new();
    for item in items {
        match item {
            Value::String(field) if !field.trim().is_empty() => {
                legacy_indices.push(preferences.len());
                preferences.push(FieldPreference {
                    field: field.trim().to_string(),
                    specializations: Vec::new(),
                });
            }
            Value::Object(_) => {
                let Some(entry) = AttributeMap::from_value(item) else {
                    continue;
                };
                let field = entry.text_any(&["field", "name", "jobField"]);
                if field.is_empty() {
                    continue;
                }
                let mut specializations = entry.strings("specializations");
                specializations.extend(entry.strings("specialization"));
                preferences.push(FieldPreference {
                    field,
                    specializations,
                });
            }
            _ => {}
        }
    }

    if let Some(&last) = legacy_indices.last() {
        for (position, specialization) in flat_specializations.into_iter().enumerate() {
            let target = legacy_indices.get(position).copied().unwrap_or(last);
            preferences[target].specializations.push(specialization);
        }
    }

    preferences
}
