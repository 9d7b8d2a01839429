use crate::infra::{load_seed, InMemoryMatchingStore, SeedData};
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use jobmatch::config::MatchingConfig;
use jobmatch::error::AppError;
use jobmatch::matching::{
    write_shortlist_csv, CandidateId, Criterion, FeedEntry, MatchingService, ProfileIntake,
    RankingReport, VacancyId,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// JSON seed file with vacancies, candidates, and applications
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// Vacancy whose applicants should be ranked
    #[arg(long)]
    pub(crate) vacancy: String,
    /// Output format for the shortlist
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Date used for ongoing work experience (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct FeedArgs {
    /// JSON seed file with vacancies, candidates, and applications
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// Job seeker whose feed should be built
    #[arg(long)]
    pub(crate) candidate: String,
    /// Output format for the feed (csv is treated as table)
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Date used for ongoing work experience (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date used for ongoing work experience (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

fn build_service(
    seed: SeedData,
    as_of: Option<NaiveDate>,
    config: MatchingConfig,
) -> MatchingService<InMemoryMatchingStore> {
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    MatchingService::with_intake(
        Arc::new(InMemoryMatchingStore::from_seed(seed)),
        ProfileIntake::as_of(as_of),
        config,
    )
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        seed,
        vacancy,
        format,
        as_of,
    } = args;

    let service = build_service(load_seed(&seed)?, as_of, MatchingConfig::from_env()?);
    let report = service.rank_vacancy(&VacancyId(vacancy))?;

    match format {
        OutputFormat::Table => render_ranking(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => write_shortlist_csv(std::io::stdout().lock(), &report.ranked)?,
    }
    Ok(())
}

pub(crate) fn run_feed(args: FeedArgs) -> Result<(), AppError> {
    let FeedArgs {
        seed,
        candidate,
        format,
        as_of,
    } = args;

    let service = build_service(load_seed(&seed)?, as_of, MatchingConfig::from_env()?);
    let candidate_id = CandidateId(candidate);
    let feed = service.discovery_feed(&candidate_id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&feed)?),
        OutputFormat::Table | OutputFormat::Csv => render_feed(&candidate_id, &feed),
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let service = build_service(demo_seed()?, args.as_of, MatchingConfig::default());

    println!("Job match demo");
    println!("Vacancy vac-eng: Mechanical Engineer in Berlin (Bachelor, 2 years, English B2)");
    println!("Employer weights: education 3 | experience 3 | field 2 | language 1 | location 1");

    let report = service.rank_vacancy(&VacancyId("vac-eng".to_string()))?;
    render_ranking(&report);

    let candidate_id = CandidateId("cand-a".to_string());
    let feed = service.discovery_feed(&candidate_id)?;
    render_feed(&candidate_id, &feed);
    Ok(())
}

fn render_ranking(report: &RankingReport) {
    println!("\nShortlist for {}", report.vacancy_id);
    if report.ranked.is_empty() {
        println!("  No applicants could be ranked");
    }
    for candidate in &report.ranked {
        println!(
            "  {}. {} | closeness {:.3} | match {}%",
            candidate.position,
            candidate.candidate_id,
            candidate.closeness,
            candidate.match_percent()
        );
        let breakdown: Vec<String> = Criterion::ALL
            .iter()
            .zip(candidate.scores.as_array())
            .map(|(criterion, value)| format!("{} {:.2}", criterion.label(), value))
            .collect();
        println!("     {}", breakdown.join(" | "));
    }
    for excluded in &report.excluded {
        println!("  - skipped {}: {}", excluded.candidate_id, excluded.reason);
    }
}

fn render_feed(candidate_id: &CandidateId, feed: &[FeedEntry]) {
    println!("\nDiscovery feed for {candidate_id}");
    if feed.is_empty() {
        println!("  No postings cleared the minimum score");
    }
    for entry in feed {
        let distance = match (entry.remote, entry.distance_km) {
            (true, _) => "remote".to_string(),
            (false, Some(km)) => format!("{km:.1} km"),
            (false, None) => "distance unknown".to_string(),
        };
        println!(
            "  - {} ({}) | {} | score {:.0} | {}",
            entry.title,
            entry.vacancy_id,
            entry.tier.label(),
            entry.score,
            distance
        );
    }
}

fn demo_seed() -> Result<SeedData, AppError> {
    let seed = json!({
        "vacancies": {
            "vac-eng": {
                "title": "Mechanical Engineer",
                "requiredEducationLevel": "Bachelor",
                "requiredExperience": 2,
                "jobField": "Engineering",
                "requiredLanguages": [{ "language": "English", "proficiency": "B2" }],
                "city": "Berlin",
                "country": "Germany",
                "latitude": 52.52,
                "longitude": 13.405,
                "criteriaWeights": {
                    "education": 3,
                    "experience": 3,
                    "fieldMatch": 2,
                    "language": 1,
                    "location": 1
                }
            },
            "vac-remote": {
                "title": "Remote CAD Reviewer",
                "requiredEducationLevel": "Technical",
                "jobField": "Engineering",
                "jobType": "Remote"
            },
            "vac-bank": {
                "title": "Bank Teller",
                "jobField": "Finance",
                "city": "Munich",
                "country": "Germany",
                "latitude": 48.1351,
                "longitude": 11.582,
                "requiresDriverLicense": true
            }
        },
        "candidates": {
            "cand-a": {
                "profile": {
                    "educationLevel": "Master",
                    "preferredJobFields": [{ "field": "Engineering", "specializations": [] }],
                    "selectedAllFields": false,
                    "city": "Berlin",
                    "country": "Germany",
                    "latitude": 52.52,
                    "longitude": 13.405,
                    "acceptableDistance": 50,
                    "hasDriverLicense": false
                },
                "workExperience": [{ "field": "Engineering", "duration": 3 }],
                "languages": [{ "language": "English", "proficiency": "C1" }]
            },
            "cand-b": {
                "profile": {
                    "educationLevel": "Secondary",
                    "city": "Munich",
                    "country": "Germany",
                    "latitude": 48.1351,
                    "longitude": 11.582,
                    "acceptableDistance": 30
                }
            }
        },
        "applications": [
            { "vacancyId": "vac-eng", "candidateId": "cand-b", "appliedAt": "2025-03-02T10:00:00Z" },
            { "vacancyId": "vac-eng", "candidateId": "cand-a", "appliedAt": "2025-03-01T09:00:00Z" }
        ]
    });
    Ok(serde_json::from_value(seed)?)
}
