//! Match scoring rules (MoSS).
//!
//! A tossup answered correctly is worth 4 points. An incorrect tossup
//! answer costs 4 points when the player interrupted the reader and
//! nothing when the buzz came after the question was fully read. A bonus
//! is worth 10 points when answered correctly and nothing otherwise.

use std::collections::BTreeMap;

use scibowl_types::{QuestionType, ScoringEvent, ScoringEventType, TeamId, TeamStanding, percentage};

/// Points for a correct tossup.
pub const TOSSUP_CORRECT: i32 = 4;

/// Points for an interrupting incorrect tossup.
pub const TOSSUP_INTERRUPT_PENALTY: i32 = -4;

/// Points for a correct bonus.
pub const BONUS_CORRECT: i32 = 10;

/// How an attempt at a question was ruled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ruling {
    /// Accepted.
    Correct,
    /// Rejected.
    Incorrect,
}

/// One ruled attempt at a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    /// The moderator's ruling.
    pub ruling: Ruling,
    /// Whether the buzz came after the question was fully read.
    pub at_end: bool,
}

/// Points earned by `attempt` on a question of `question_type`.
pub const fn points_for_attempt(attempt: Attempt, question_type: QuestionType) -> i32 {
    match (question_type, attempt.ruling) {
        (QuestionType::Bonus, Ruling::Correct) => BONUS_CORRECT,
        (QuestionType::Bonus, Ruling::Incorrect) => 0,
        (QuestionType::Tossup, Ruling::Correct) => TOSSUP_CORRECT,
        (QuestionType::Tossup, Ruling::Incorrect) => {
            if attempt.at_end {
                0
            } else {
                TOSSUP_INTERRUPT_PENALTY
            }
        }
    }
}

/// Points recorded for an event whose client omitted them.
pub const fn default_points(event_type: ScoringEventType) -> i32 {
    match event_type {
        ScoringEventType::Correct => TOSSUP_CORRECT,
        ScoringEventType::Incorrect => TOSSUP_INTERRUPT_PENALTY,
        ScoringEventType::Bonus => BONUS_CORRECT,
        ScoringEventType::Answer | ScoringEventType::Buzzer | ScoringEventType::Tossup => 0,
    }
}

/// Points to record for an event.
///
/// Explicit client points win. Otherwise the event type's default applies,
/// except that an incorrect tossup buzzed after the full read costs nothing.
pub const fn resolve_points(event_type: ScoringEventType, points: Option<i32>, at_end: bool) -> i32 {
    if let Some(points) = points {
        return points;
    }
    match event_type {
        ScoringEventType::Incorrect => points_for_attempt(
            Attempt {
                ruling: Ruling::Incorrect,
                at_end,
            },
            QuestionType::Tossup,
        ),
        other => default_points(other),
    }
}

/// Per-player counters updated by scoring events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStats {
    /// Sum of points from events credited to the player.
    pub total_points: i32,
    /// Tossups the player was present for.
    pub tossups_heard: u32,
    /// Correct tossup answers.
    pub correct_buzzes: u32,
    /// Incorrect tossup answers.
    pub incorrect_buzzes: u32,
}

impl PlayerStats {
    /// Fold one event credited to this player into the counters.
    pub const fn apply(&mut self, event_type: ScoringEventType, points: i32) {
        match event_type {
            ScoringEventType::Correct => {
                self.correct_buzzes = self.correct_buzzes.saturating_add(1);
            }
            ScoringEventType::Incorrect => {
                self.incorrect_buzzes = self.incorrect_buzzes.saturating_add(1);
            }
            ScoringEventType::Tossup => {
                self.tossups_heard = self.tossups_heard.saturating_add(1);
            }
            ScoringEventType::Answer | ScoringEventType::Buzzer | ScoringEventType::Bonus => {}
        }
        self.total_points = self.total_points.saturating_add(points);
    }

    /// Correct buzzes as a percentage of all buzzes.
    pub fn accuracy(&self) -> f64 {
        percentage(
            self.correct_buzzes,
            self.correct_buzzes.saturating_add(self.incorrect_buzzes),
        )
    }
}

/// Team standings for one tournament.
///
/// Every team in `teams` appears, even without events. Events credited to
/// unknown teams are ignored. Ordered by points descending, then name.
pub fn standings(teams: &[(TeamId, String)], events: &[ScoringEvent]) -> Vec<TeamStanding> {
    let mut totals: BTreeMap<TeamId, (i32, u32)> =
        teams.iter().map(|(id, _)| (*id, (0, 0))).collect();

    for event in events {
        let Some(team_id) = event.team_id else {
            continue;
        };
        if let Some((points, count)) = totals.get_mut(&team_id) {
            *points = points.saturating_add(event.points);
            *count = count.saturating_add(1);
        }
    }

    let mut rows: Vec<TeamStanding> = teams
        .iter()
        .map(|(id, name)| {
            let (points, events) = totals.get(id).copied().unwrap_or_default();
            TeamStanding {
                team_id: *id,
                team_name: name.clone(),
                points,
                events,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.team_name.cmp(&b.team_name))
    });
    rows
}
