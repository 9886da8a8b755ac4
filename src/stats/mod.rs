//! MLB stats: API client, record types, and report assembly.

pub mod client;
pub mod report;
pub mod types;

pub use client::{MlbApiClient, StatGroup, StatsApi};
pub use report::{
    display_date, ReportBuilder, AMERICAN_LEAGUE_ID, DIVISION_ORDER, NATIONAL_LEAGUE_ID,
};
pub use types::{
    BoxscoreData, DivisionStandings, GameBoxScore, GameFeedData, LeagueLeaders, ProbableMatchup,
    RawTransaction, ScheduledGame, Transaction,
};
