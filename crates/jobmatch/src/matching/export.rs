use std::io::Write;

use serde::Serialize;

use super::ranking::RankedCandidate;

#[derive(Debug, Serialize)]
struct ShortlistRow<'a> {
    position: usize,
    candidate_id: &'a str,
    closeness: String,
    match_percent: u32,
    education: String,
    experience: String,
    field_match: String,
    language: String,
    location: String,
    applied_at: String,
}

impl<'a> From<&'a RankedCandidate> for ShortlistRow<'a> {
    fn from(candidate: &'a RankedCandidate) -> Self {
        let scores = &candidate.scores;
        Self {
            position: candidate.position,
            candidate_id: &candidate.candidate_id.0,
            closeness: fixed(candidate.closeness),
            match_percent: candidate.match_percent(),
            education: fixed(scores.education),
            experience: fixed(scores.experience),
            field_match: fixed(scores.field_match),
            language: fixed(scores.language),
            location: fixed(scores.location),
            applied_at: candidate
                .applied_at
                .map(|timestamp| timestamp.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

fn fixed(value: f64) -> String {
    format!("{value:.4}")
}

/// Write the ranked shortlist with a header row, in ranking order.
pub fn write_shortlist_csv<W: Write>(
    writer: W,
    ranked: &[RankedCandidate],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);

    if ranked.is_empty() {
        csv_writer.write_record([
            "position",
            "candidate_id",
            "closeness",
            "match_percent",
            "education",
            "experience",
            "field_match",
            "language",
            "location",
            "applied_at",
        ])?;
    }
    for candidate in ranked {
        csv_writer.serialize(ShortlistRow::from(candidate))?;
    }

    csv_writer.flush()?;
    Ok(())
}
