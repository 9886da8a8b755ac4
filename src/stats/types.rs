//! Record types for the stats pipeline.
//!
//! Two layers: the flattened shapes the API client produces from upstream
//! responses (schedule games, box data, feed data, raw transactions), and the
//! report shapes handed to templates. Everything here is plain data; the
//! reshaping logic lives in [`report`](crate::stats::report).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---- schedule ----

/// One game from the schedule endpoint, flattened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub game_id: u64,
    /// First pitch, as reported upstream (UTC).
    pub start_time: DateTime<Utc>,
    pub away_name: String,
    pub home_name: String,
    pub away_probable_pitcher: Option<String>,
    pub home_probable_pitcher: Option<String>,
}

// ---- box score building blocks ----

/// A label with an optional free-text value, as printed box scores carry them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledField {
    pub label: String,
    pub value: Option<String>,
}

/// A titled group of labeled fields (BATTING, FIELDING, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoSection {
    pub title: String,
    pub fields: Vec<LabeledField>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatterLine {
    pub name: String,
    pub position: String,
    pub at_bats: u32,
    pub runs: u32,
    pub hits: u32,
    pub rbi: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub avg: String,
    pub ops: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattingTotals {
    pub at_bats: u32,
    pub runs: u32,
    pub hits: u32,
    pub rbi: u32,
    pub walks: u32,
    pub strikeouts: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitcherLine {
    pub name: String,
    pub innings_pitched: String,
    pub hits: u32,
    pub runs: u32,
    pub earned_runs: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub home_runs: u32,
    pub era: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitchingTotals {
    pub innings_pitched: String,
    pub hits: u32,
    pub runs: u32,
    pub earned_runs: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub home_runs: u32,
}

/// One team's half of the box score data, before the win-loss record from
/// the game feed is merged in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamBoxData {
    pub name: String,
    pub batters: Vec<BatterLine>,
    pub batting_totals: BattingTotals,
    pub batting_notes: Vec<String>,
    pub info: Vec<InfoSection>,
    pub pitchers: Vec<PitcherLine>,
    pub pitching_totals: PitchingTotals,
}

/// Cooked output of the boxscore endpoint for one game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxscoreData {
    pub away: TeamBoxData,
    pub home: TeamBoxData,
    pub game_info: Vec<LabeledField>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InningLine {
    pub num: u32,
    /// Absent when the half-inning was not played (walk-off, rainout).
    pub away_runs: Option<u32>,
    pub home_runs: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LineTotals {
    pub runs: u32,
    pub hits: u32,
    pub errors: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Linescore {
    pub innings: Vec<InningLine>,
    pub away: LineTotals,
    pub home: LineTotals,
}

/// Cooked output of the live game feed for one game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameFeedData {
    pub status_code: String,
    pub linescore: Linescore,
    pub away_record: WinLoss,
    pub home_record: WinLoss,
}

// ---- report shapes ----

/// One team's side of a finished box score, as rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamBoxSide {
    pub name: String,
    /// Season record formatted `"{wins}-{losses}"`.
    pub record: String,
    pub batters: Vec<BatterLine>,
    pub batting_totals: BattingTotals,
    pub batting_notes: Vec<String>,
    pub info: Vec<InfoSection>,
    pub pitchers: Vec<PitcherLine>,
    pub pitching_totals: PitchingTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxSides {
    pub away: TeamBoxSide,
    pub home: TeamBoxSide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameBoxScore {
    /// Upstream status code for the game (e.g. `F` for final).
    pub status: String,
    pub linescore: Linescore,
    pub teams: BoxSides,
    pub info: Vec<LabeledField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbableSide {
    pub name: String,
    pub pitcher: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupTeams {
    pub away: ProbableSide,
    pub home: ProbableSide,
}

/// A scheduled game with its probable starters and localized start time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbableMatchup {
    pub teams: MatchupTeams,
    /// Display-timezone start time, `"H:MM AM/PM"` with no leading zero.
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStanding {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    /// Upstream formats games-back as a string (`"-"` for the leader).
    pub games_back: String,
    pub rank: String,
}

/// Standings for one division as fetched, before display ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionRecords {
    pub division_id: u32,
    pub teams: Vec<TeamStanding>,
}

/// Standings for one division, resolved to its display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionStandings {
    pub division_id: u32,
    pub division: String,
    pub teams: Vec<TeamStanding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderRow {
    pub rank: u32,
    pub name: String,
    pub team: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryLeaders {
    pub category: String,
    pub leaders: Vec<LeaderRow>,
}

/// Leader tables for one stat group, split by league.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSplit {
    pub american: Vec<CategoryLeaders>,
    pub national: Vec<CategoryLeaders>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueLeaders {
    pub batting: LeagueSplit,
    pub pitching: LeagueSplit,
}

// ---- transactions ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
}

/// A transaction as fetched, before team filtering and description rewriting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    pub from_team: Option<TeamRef>,
    pub to_team: Option<TeamRef>,
    pub description: Option<String>,
}

/// A transaction as rendered: resolved team plus rewritten description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub team: String,
    pub description: String,
}
