//! Standings and round-progression engine.
//!
//! Pure functions over a fetched championship snapshot:
//! - Round grouping and active-round detection
//! - Points table with tie-breaks
//! - Round completion and tournament conclusion
//! - Bracket view with resolved team names
//! - Field validation for results and schedules

pub mod bracket;
pub mod progress;
pub mod rounds;
pub mod standings;
pub mod validate;

pub use bracket::{build_bracket, BracketMatch, BracketRound, BracketView, ScoreLine};
pub use progress::{
    can_request_next_round, champion, final_outcome, is_round_complete, is_tournament_finished,
    round_progress, FinalOutcome, RoundProgress,
};
pub use rounds::{group_by_round, RoundGroup, RoundGroups};
pub use standings::{championship_standings, compute_standings};
pub use validate::{
    validate_result, validate_schedule, ResultInput, ScheduleInput, ValidatedResult,
    ValidationError,
};
