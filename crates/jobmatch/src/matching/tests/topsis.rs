use crate::matching::domain::{Criterion, CriterionWeights, ScoreVector};
use crate::matching::ranking::topsis::{ideal_solutions, normalize, separations};
use crate::matching::ranking::{DecisionMatrix, MatrixRow, Separation, TopsisEngine};
use crate::matching::CandidateId;

const TOLERANCE: f64 = 1e-9;

fn row(id: &str, values: [f64; 5]) -> MatrixRow {
    MatrixRow {
        candidate_id: CandidateId(id.to_string()),
        applied_at: None,
        has_driver_license: false,
        scores: ScoreVector::from_array(values),
    }
}

fn matrix() -> DecisionMatrix {
    DecisionMatrix::from_rows(vec![
        row("c1", [1.0, 0.5, 0.2, 0.0, 1.0]),
        row("c2", [0.5, 1.0, 0.7, 0.0, 0.8]),
        row("c3", [0.25, 0.0, 1.0, 0.0, 0.5]),
    ])
}

#[test]
fn normalized_columns_have_unit_length_or_are_zero() {
    let normalized = normalize(&matrix().values());

    for column in 0..5 {
        let sum_of_squares: f64 = normalized.iter().map(|row| row[column] * row[column]).sum();
        if column == Criterion::Language.index() {
            assert_eq!(sum_of_squares, 0.0);
        } else {
            assert!((sum_of_squares - 1.0).abs() < TOLERANCE, "column {column}");
        }
    }
}

#[test]
fn engine_does_not_rescale_weights() {
    let weights = CriterionWeights::from_array([2.0, 0.0, 0.0, 0.0, 0.0]);
    let outcome = TopsisEngine::new(weights).evaluate(&matrix());

    let norm = (1.0_f64 + 0.25 + 0.0625).sqrt();
    assert!((outcome.weighted[0][0] - 2.0 / norm).abs() < TOLERANCE);
    assert_eq!(outcome.weighted[0][1], 0.0);
    assert_eq!(outcome.ideal[0], outcome.weighted[0][0]);
    assert_eq!(outcome.anti_ideal[0], outcome.weighted[2][0]);
}

#[test]
fn dominating_row_has_closeness_one() {
    let matrix = DecisionMatrix::from_rows(vec![
        row("best", [1.0, 1.0, 1.0, 1.0, 1.0]),
        row("worst", [0.0, 0.0, 0.0, 0.0, 0.0]),
    ]);

    let outcome = TopsisEngine::new(CriterionWeights::default()).evaluate(&matrix);

    assert_eq!(outcome.closeness, vec![1.0, 0.0]);
    assert_eq!(outcome.separations[0].positive, 0.0);
    assert_eq!(outcome.separations[1].negative, 0.0);
}

#[test]
fn closeness_stays_within_unit_interval() {
    let outcome = TopsisEngine::new(CriterionWeights::default()).evaluate(&matrix());

    assert_eq!(outcome.closeness.len(), 3);
    for closeness in &outcome.closeness {
        assert!((0.0..=1.0).contains(closeness));
    }
    assert!(outcome.closeness[0] > outcome.closeness[2]);
}

#[test]
fn identical_rows_have_zero_closeness() {
    let matrix = DecisionMatrix::from_rows(vec![
        row("twin-1", [0.5, 0.5, 0.5, 0.5, 0.5]),
        row("twin-2", [0.5, 0.5, 0.5, 0.5, 0.5]),
    ]);

    let outcome = TopsisEngine::new(CriterionWeights::UNIFORM).evaluate(&matrix);

    assert_eq!(outcome.closeness, vec![0.0, 0.0]);
    assert_eq!(outcome.ideal, outcome.anti_ideal);
}

#[test]
fn separations_measure_euclidean_distance() {
    let weighted = vec![[3.0, 4.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0, 0.0]];
    let (ideal, anti_ideal) = ideal_solutions(&weighted);

    let distances = separations(&weighted, &ideal, &anti_ideal);

    assert_eq!(
        distances,
        vec![
            Separation {
                positive: 0.0,
                negative: 5.0
            },
            Separation {
                positive: 5.0,
                negative: 0.0
            },
        ]
    );
    assert_eq!(distances[0].relative_closeness(), 1.0);
}

#[test]
fn empty_matrix_produces_empty_outcome() {
    let outcome =
        TopsisEngine::new(CriterionWeights::default()).evaluate(&DecisionMatrix::default());
    assert!(outcome.closeness.is_empty());
    assert_eq!(outcome.ideal, [0.0; 5]);
}
