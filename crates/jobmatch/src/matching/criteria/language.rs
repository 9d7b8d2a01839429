use crate::matching::domain::{
    eq_ignore_case, is_blank, proficiency_rank, LanguageRequirement, LanguageSkill,
};

/// Mean over required languages of the seeker's best same-named skill.
pub fn language_score(required: &[LanguageRequirement], spoken: &[LanguageSkill]) -> f64 {
    let required: Vec<_> = required
        .iter()
        .filter(|language| !is_blank(&language.name))
        .collect();
    if required.is_empty() {
        return 1.0;
    }
    if spoken.is_empty() {
        return 0.0;
    }

    let total: f64 = required
        .iter()
        .map(|requirement| {
            spoken
                .iter()
                .filter(|skill| eq_ignore_case(&skill.name, &requirement.name))
                .map(|skill| proficiency_match(requirement, skill))
                .fold(0.0_f64, f64::max)
        })
        .sum();

    total / required.len() as f64
}

fn proficiency_match(requirement: &LanguageRequirement, skill: &LanguageSkill) -> f64 {
    let required_rank = proficiency_rank(requirement.minimum);
    let candidate_rank = proficiency_rank(skill.proficiency);
    if candidate_rank >= required_rank {
        1.0
    } else {
        f64::from(candidate_rank) / f64::from(required_rank)
    }
}
