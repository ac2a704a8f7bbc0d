#![allow(dead_code)]

use golf_results::model::{CompetitionSnapshot, Course, HoleScores, ParticipantInput};

pub const PARS: [i32; 18] = [4, 4, 3, 5, 4, 4, 3, 5, 4, 4, 4, 3, 5, 4, 4, 3, 5, 4];
pub const STROKE_INDEX: [i32; 18] = [7, 15, 1, 11, 3, 17, 5, 13, 9, 8, 16, 2, 12, 4, 18, 6, 14, 10];

pub fn spring_medal() -> CompetitionSnapshot {
    serde_json::from_str(include_str!("../fixtures/spring_medal.json"))
        .expect("spring_medal.json is a valid snapshot")
}

pub fn thursday_stableford() -> CompetitionSnapshot {
    serde_json::from_str(include_str!("../fixtures/thursday_stableford.json"))
        .expect("thursday_stableford.json is a valid snapshot")
}

pub fn course() -> Course {
    Course {
        pars: PARS.to_vec(),
        stroke_index: Some(STROKE_INDEX.to_vec()),
        course_rating: None,
        slope_rating: None,
    }
}

/// Par card with `delta` added on the first `|delta|` holes.
pub fn card_relative(delta: i32) -> [i32; 18] {
    let mut holes = PARS;
    let step = delta.signum();
    for hole in holes.iter_mut().take(delta.unsigned_abs() as usize) {
        *hole += step;
    }
    holes
}

pub fn finished_player(id: i64, relative: i32) -> ParticipantInput {
    ParticipantInput {
        participant_id: id,
        name: format!("Player {id:02}"),
        score: HoleScores(card_relative(relative)),
        locked: true,
        ..ParticipantInput::default()
    }
}

pub fn competition(id: i64, participants: Vec<ParticipantInput>) -> CompetitionSnapshot {
    CompetitionSnapshot {
        competition_id: id,
        name: format!("Competition {id}"),
        course: Some(course()),
        participants,
        ..CompetitionSnapshot::default()
    }
}
