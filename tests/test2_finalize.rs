mod common;

use chrono::NaiveDate;
use golf_results::ResultsError;
use golf_results::model::{
    CompetitionResultRow, CompetitionSnapshot, PointsTemplate, ScoringMode, ScoringType,
};
use golf_results::score::{compute_results, finalize_competition};
use golf_results::storage::{MemoryStore, ResultStore};
use serde_json::json;

fn at(hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 4, 11)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

fn row(
    participant_id: i64,
    scoring_type: ScoringType,
    position: usize,
    points: i32,
    score: i32,
    relative_to_par: i32,
) -> CompetitionResultRow {
    CompetitionResultRow {
        competition_id: 41,
        participant_id,
        scoring_type,
        position,
        points,
        score,
        relative_to_par,
    }
}

#[tokio::test]
async fn spring_medal_rows() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::with_competitions([common::spring_medal()]);
    let summary = finalize_competition(&store, 41, at(18)).await?;
    assert_eq!(summary.rows_written, 9);

    let rows = store.get_results(41).await?;
    let expected = vec![
        row(3, ScoringType::Gross, 1, 7, 72, 0),
        row(1, ScoringType::Gross, 2, 4, 74, 2),
        row(2, ScoringType::Gross, 2, 4, 74, 2),
        row(8, ScoringType::Gross, 4, 2, 77, 5),
        row(4, ScoringType::Gross, 5, 1, 80, 8),
        row(3, ScoringType::Net, 1, 6, 51, -21),
        row(2, ScoringType::Net, 2, 4, 58, -14),
        row(1, ScoringType::Net, 3, 2, 69, -3),
        row(4, ScoringType::Net, 4, 1, 72, 0),
    ];
    assert_eq!(rows, expected);

    let snapshot = store.get_competition(41).await?;
    assert_eq!(snapshot.finalized_at, Some(at(18)));
    Ok(())
}

#[tokio::test]
async fn unfinished_players_are_never_persisted() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::with_competitions([common::spring_medal()]);
    finalize_competition(&store, 41, at(18)).await?;
    let rows = store.get_results(41).await?;
    // Eve did not finish, Finn gave up on a hole, Gus was disqualified
    for id in [5, 6, 7] {
        assert!(rows.iter().all(|r| r.participant_id != id), "participant {id} persisted");
    }
    Ok(())
}

#[tokio::test]
async fn recalculate_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::with_competitions([common::spring_medal()]);
    finalize_competition(&store, 41, at(18)).await?;
    let first = serde_json::to_string(&store.get_results(41).await?)?;
    finalize_competition(&store, 41, at(19)).await?;
    let second = serde_json::to_string(&store.get_results(41).await?)?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn recalculate_replaces_every_row() -> Result<(), Box<dyn std::error::Error>> {
    let store = MemoryStore::with_competitions([common::spring_medal()]);
    finalize_competition(&store, 41, at(18)).await?;

    let mut snapshot = store.get_competition(41).await?;
    snapshot.settings.scoring_mode = ScoringMode::Gross;
    snapshot.participants.retain(|p| p.participant_id != 8);
    store.put_competition(snapshot).await;
    let summary = finalize_competition(&store, 41, at(19)).await?;

    let rows = store.get_results(41).await?;
    assert_eq!(summary.rows_written, 4);
    assert!(rows.iter().all(|r| r.scoring_type == ScoringType::Gross));
    assert!(rows.iter().all(|r| r.participant_id != 8));
    // field shrank to four finishers
    assert_eq!(rows[0].points, 6);
    Ok(())
}

#[tokio::test]
async fn unknown_competition_writes_nothing() {
    let store = MemoryStore::new();
    let err = finalize_competition(&store, 99, at(18)).await.unwrap_err();
    assert!(matches!(err, ResultsError::NotFound(_)));
}

#[tokio::test]
async fn scoring_errors_abort_before_writes() -> Result<(), Box<dyn std::error::Error>> {
    let mut snapshot = common::spring_medal();
    if let Some(course) = snapshot.course.as_mut() {
        course.stroke_index = None;
    }
    let store = MemoryStore::with_competitions([snapshot]);
    let err = finalize_competition(&store, 41, at(18)).await.unwrap_err();
    assert_eq!(err, ResultsError::MissingStrokeIndex);
    assert!(store.get_results(41).await?.is_empty());
    assert_eq!(store.get_competition(41).await?.finalized_at, None);

    let mut snapshot = common::spring_medal();
    snapshot.course = None;
    store.put_competition(snapshot).await;
    let err = finalize_competition(&store, 41, at(18)).await.unwrap_err();
    assert!(matches!(err, ResultsError::NotFound(_)));
    assert!(store.get_results(41).await?.is_empty());
    Ok(())
}

#[test]
fn gross_only_still_works_without_stroke_index() {
    let mut snapshot = common::spring_medal();
    snapshot.settings.scoring_mode = ScoringMode::Gross;
    if let Some(course) = snapshot.course.as_mut() {
        course.stroke_index = None;
    }
    let computed = compute_results(&snapshot).unwrap();
    assert_eq!(computed.results.gross.map(|g| g.len()), Some(5));
    assert!(computed.results.net.is_none());
}

#[test]
fn net_only_mode_sets_primary_positions_from_net() {
    let mut snapshot = common::spring_medal();
    snapshot.settings.scoring_mode = ScoringMode::Net;
    let computed = compute_results(&snapshot).unwrap();
    assert!(computed.results.gross.is_none());
    let carla = computed
        .participants
        .iter()
        .find(|p| p.participant_id == 3)
        .unwrap();
    assert_eq!(carla.position, Some(1));
    assert_eq!(carla.points, Some(6));
    let hal = computed
        .participants
        .iter()
        .find(|p| p.participant_id == 8)
        .unwrap();
    assert_eq!(hal.position, None);
}

#[test]
fn category_tee_changes_course_handicap() {
    let snapshot = common::spring_medal();
    let computed = compute_results(&snapshot).unwrap();
    let bob = computed
        .participants
        .iter()
        .find(|p| p.participant_id == 2)
        .unwrap();
    // 12.3 * 131 / 113 + (73.5 - 72) rounds to 16; the default tee gives 13
    assert_eq!(bob.course_handicap, Some(16));
    assert_eq!(bob.net_total, Some(58));
}

#[test]
fn enrollment_override_sets_field_size() {
    let mut snapshot = common::spring_medal();
    snapshot.settings.scoring_mode = ScoringMode::Gross;
    snapshot.settings.enrollment_override = Some(20);
    snapshot.settings.points_multiplier = 0.5;
    let computed = compute_results(&snapshot).unwrap();
    let gross = computed.results.gross.unwrap();
    // 22 * 0.5 for the winner; (20 + 18) / 2 * 0.5 for the tie
    assert_eq!(gross[0].points, 11);
    assert_eq!(gross[1].points, 10);
    assert_eq!(gross[2].points, 10);
}

#[test]
fn template_multiplier_stacks_with_competition_multiplier() {
    let players = vec![
        common::finished_player(1, -2),
        common::finished_player(2, 0),
        common::finished_player(3, 0),
    ];
    let mut snapshot = common::competition(5, players);
    snapshot.settings.points_template = Some(
        PointsTemplate::from_json(&json!({"1": 10, "2": 6, "3": 4, "multiplier": 2})).unwrap(),
    );
    snapshot.settings.points_multiplier = 3.0;
    let gross = compute_results(&snapshot).unwrap().results.gross.unwrap();
    // 10 * 2 * 3 for the winner; (6 + 4) * 2 / 2 * 3 for the tie
    let points: Vec<i32> = gross.iter().map(|e| e.points).collect();
    assert_eq!(points, vec![60, 30, 30]);
}

#[test]
fn stored_text_arrays_in_snapshot() {
    let mut raw: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/spring_medal.json")).unwrap();
    let pars = raw["course"]["pars"].to_string();
    raw["course"]["pars"] = json!(pars);
    raw["participants"][0]["score"] = json!("garbage");
    let snapshot: CompetitionSnapshot = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(snapshot.course.as_ref().unwrap().pars, common::PARS.to_vec());

    let computed = compute_results(&snapshot).unwrap();
    let alice = &computed.participants[0];
    assert_eq!(alice.holes_played, 0);
    assert!(!alice.is_finished);
    let gross = computed.results.gross.unwrap();
    assert!(gross.iter().all(|e| e.participant_id != 1));

    // unreadable pars fall back to a neutral par 72
    raw["course"]["pars"] = json!("[4,4,4");
    let snapshot: CompetitionSnapshot = serde_json::from_value(raw).unwrap();
    assert_eq!(snapshot.course.unwrap().pars, vec![4; 18]);
}
