//! HTTP client for the MLB stats API.
//!
//! [`MlbApiClient`] talks to the public stats API and flattens its deeply
//! nested responses into the record types in [`types`](crate::stats::types).
//! The [`StatsApi`] trait is the seam the report builder and tests consume;
//! swap in a canned implementation to exercise report logic offline.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::stats::types::{
    BatterLine, BattingTotals, BoxscoreData, DivisionRecords, GameFeedData, InfoSection,
    InningLine, LabeledField, LeaderRow, LineTotals, Linescore, PitcherLine, PitchingTotals,
    RawTransaction, ScheduledGame, TeamBoxData, TeamRef, TeamStanding, WinLoss,
};

/// Stat group selector for the leaders endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatGroup {
    Hitting,
    Pitching,
}

impl StatGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatGroup::Hitting => "hitting",
            StatGroup::Pitching => "pitching",
        }
    }
}

/// Read access to the upstream stats feeds.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Games scheduled on a date, with probable pitchers when announced.
    async fn schedule(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>>;

    /// Full box score data for one game.
    async fn boxscore(&self, game_id: u64) -> Result<BoxscoreData>;

    /// Live feed extract for one game: status, linescore, season records.
    async fn game_feed(&self, game_id: u64) -> Result<GameFeedData>;

    /// Current regular-season standings for both leagues, unordered.
    async fn standings(&self) -> Result<Vec<DivisionRecords>>;

    /// Top leaders for one category within a stat group and league.
    /// A category the upstream has no data for yields an empty list.
    async fn league_leaders(
        &self,
        category: &str,
        group: StatGroup,
        league_id: u32,
    ) -> Result<Vec<LeaderRow>>;

    /// All transactions recorded on a date, unfiltered.
    async fn transactions(&self, date: NaiveDate) -> Result<Vec<RawTransaction>>;
}

/// Client for the MLB stats API over HTTPS.
#[derive(Debug, Clone)]
pub struct MlbApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl MlbApiClient {
    /// Creates a client rooted at `base_url` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "Fetching from stats API");
        let response = self.http.get(&url).query(query).send().await?;
        let payload = response.error_for_status()?.json::<T>().await?;
        Ok(payload)
    }
}

/// Upstream expects dates formatted `MM/DD/YYYY`.
fn api_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

#[async_trait]
impl StatsApi for MlbApiClient {
    async fn schedule(&self, date: NaiveDate) -> Result<Vec<ScheduledGame>> {
        let day = api_date(date);
        let response: wire::ScheduleResponse = self
            .get_json(
                "/v1/schedule",
                &[
                    ("sportId", "1".to_string()),
                    ("startDate", day.clone()),
                    ("endDate", day),
                    ("hydrate", "probablePitcher".to_string()),
                ],
            )
            .await?;

        let games = response
            .dates
            .into_iter()
            .flat_map(|d| d.games)
            .map(|g| ScheduledGame {
                game_id: g.game_pk,
                start_time: g.game_date,
                away_name: g.teams.away.team.name,
                home_name: g.teams.home.team.name,
                away_probable_pitcher: g.teams.away.probable_pitcher.map(|p| p.full_name),
                home_probable_pitcher: g.teams.home.probable_pitcher.map(|p| p.full_name),
            })
            .collect();
        Ok(games)
    }

    async fn boxscore(&self, game_id: u64) -> Result<BoxscoreData> {
        let path = format!("/v1/game/{game_id}/boxscore");
        let response: wire::BoxscoreResponse = self.get_json(&path, &[]).await?;
        Ok(BoxscoreData {
            away: cook_team_box(response.teams.away),
            home: cook_team_box(response.teams.home),
            game_info: response.info.into_iter().map(cook_labeled).collect(),
        })
    }

    async fn game_feed(&self, game_id: u64) -> Result<GameFeedData> {
        let path = format!("/v1.1/game/{game_id}/feed/live");
        let response: wire::FeedResponse = self.get_json(&path, &[]).await?;

        let linescore = Linescore {
            innings: response
                .live_data
                .linescore
                .innings
                .into_iter()
                .map(|i| InningLine {
                    num: i.num,
                    away_runs: i.away.runs,
                    home_runs: i.home.runs,
                })
                .collect(),
            away: cook_line_totals(response.live_data.linescore.teams.away),
            home: cook_line_totals(response.live_data.linescore.teams.home),
        };

        Ok(GameFeedData {
            status_code: response.game_data.status.status_code,
            linescore,
            away_record: WinLoss {
                wins: response.game_data.teams.away.record.wins,
                losses: response.game_data.teams.away.record.losses,
            },
            home_record: WinLoss {
                wins: response.game_data.teams.home.record.wins,
                losses: response.game_data.teams.home.record.losses,
            },
        })
    }

    async fn standings(&self) -> Result<Vec<DivisionRecords>> {
        let response: wire::StandingsResponse = self
            .get_json(
                "/v1/standings",
                &[
                    ("leagueId", "103,104".to_string()),
                    ("standingsTypes", "regularSeason".to_string()),
                ],
            )
            .await?;

        let records = response
            .records
            .into_iter()
            .map(|r| DivisionRecords {
                division_id: r.division.id,
                teams: r
                    .team_records
                    .into_iter()
                    .map(|t| TeamStanding {
                        name: t.team.name,
                        wins: t.wins,
                        losses: t.losses,
                        games_back: t.games_back,
                        rank: t.division_rank,
                    })
                    .collect(),
            })
            .collect();
        Ok(records)
    }

    async fn league_leaders(
        &self,
        category: &str,
        group: StatGroup,
        league_id: u32,
    ) -> Result<Vec<LeaderRow>> {
        let response: wire::LeadersResponse = self
            .get_json(
                "/v1/stats/leaders",
                &[
                    ("leaderCategories", category.to_string()),
                    ("statGroup", group.as_str().to_string()),
                    ("leagueId", league_id.to_string()),
                    ("limit", "5".to_string()),
                ],
            )
            .await?;

        let rows = response
            .league_leaders
            .into_iter()
            .flat_map(|c| c.leaders)
            .map(|l| LeaderRow {
                rank: l.rank,
                name: l.person.full_name,
                team: l.team.map(|t| t.name).unwrap_or_default(),
                value: l.value,
            })
            .collect();
        Ok(rows)
    }

    async fn transactions(&self, date: NaiveDate) -> Result<Vec<RawTransaction>> {
        let day = api_date(date);
        let response: wire::TransactionsResponse = self
            .get_json(
                "/v1/transactions",
                &[("startDate", day.clone()), ("endDate", day)],
            )
            .await?;

        let rows = response
            .transactions
            .into_iter()
            .map(|t| RawTransaction {
                from_team: t.from_team.map(cook_team_ref),
                to_team: t.to_team.map(cook_team_ref),
                description: t.description,
            })
            .collect();
        Ok(rows)
    }
}

fn cook_team_ref(team: wire::NamedRef) -> TeamRef {
    TeamRef {
        id: team.id,
        name: team.name,
    }
}

fn cook_labeled(field: wire::Labeled) -> LabeledField {
    LabeledField {
        label: field.label,
        value: field.value,
    }
}

fn cook_line_totals(totals: wire::LineTotalsWire) -> LineTotals {
    LineTotals {
        runs: totals.runs,
        hits: totals.hits,
        errors: totals.errors,
    }
}

/// Resolves player ids against the `players` map to build the ordered batting
/// and pitching lines for one side. Ids without a roster entry are skipped.
fn cook_team_box(side: wire::BoxTeamWire) -> TeamBoxData {
    let players: HashMap<String, wire::PlayerWire> = side.players;

    let batters = side
        .batters
        .iter()
        .filter_map(|id| players.get(&format!("ID{id}")))
        .map(|p| BatterLine {
            name: p.person.full_name.clone(),
            position: p.position.abbreviation.clone(),
            at_bats: p.stats.batting.at_bats,
            runs: p.stats.batting.runs,
            hits: p.stats.batting.hits,
            rbi: p.stats.batting.rbi,
            walks: p.stats.batting.base_on_balls,
            strikeouts: p.stats.batting.strike_outs,
            avg: p.season_stats.batting.avg.clone(),
            ops: p.season_stats.batting.ops.clone(),
        })
        .collect();

    let pitchers = side
        .pitchers
        .iter()
        .filter_map(|id| players.get(&format!("ID{id}")))
        .map(|p| PitcherLine {
            name: p.person.full_name.clone(),
            innings_pitched: p.stats.pitching.innings_pitched.clone(),
            hits: p.stats.pitching.hits,
            runs: p.stats.pitching.runs,
            earned_runs: p.stats.pitching.earned_runs,
            walks: p.stats.pitching.base_on_balls,
            strikeouts: p.stats.pitching.strike_outs,
            home_runs: p.stats.pitching.home_runs,
            era: p.season_stats.pitching.era.clone(),
        })
        .collect();

    let batting_notes = side
        .note
        .into_iter()
        .map(|n| match n.value {
            Some(value) => format!("{}-{}", n.label, value),
            None => n.label,
        })
        .collect();

    let info = side
        .info
        .into_iter()
        .map(|s| InfoSection {
            title: s.title,
            fields: s.field_list.into_iter().map(cook_labeled).collect(),
        })
        .collect();

    TeamBoxData {
        name: side.team.name,
        batters,
        batting_totals: BattingTotals {
            at_bats: side.team_stats.batting.at_bats,
            runs: side.team_stats.batting.runs,
            hits: side.team_stats.batting.hits,
            rbi: side.team_stats.batting.rbi,
            walks: side.team_stats.batting.base_on_balls,
            strikeouts: side.team_stats.batting.strike_outs,
        },
        batting_notes,
        info,
        pitchers,
        pitching_totals: PitchingTotals {
            innings_pitched: side.team_stats.pitching.innings_pitched,
            hits: side.team_stats.pitching.hits,
            runs: side.team_stats.pitching.runs,
            earned_runs: side.team_stats.pitching.earned_runs,
            walks: side.team_stats.pitching.base_on_balls,
            strikeouts: side.team_stats.pitching.strike_outs,
            home_runs: side.team_stats.pitching.home_runs,
        },
    }
}

/// Deserialization targets for upstream payloads. Fields the report never
/// consumes are left out; serde ignores the rest of each document.
mod wire {
    use std::collections::HashMap;

    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub(super) struct ScheduleResponse {
        #[serde(default)]
        pub dates: Vec<ScheduleDate>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct ScheduleDate {
        #[serde(default)]
        pub games: Vec<ScheduleGameWire>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct ScheduleGameWire {
        pub game_pk: u64,
        pub game_date: chrono::DateTime<chrono::Utc>,
        pub teams: ScheduleSides,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct ScheduleSides {
        pub away: ScheduleSide,
        pub home: ScheduleSide,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct ScheduleSide {
        pub team: NamedRef,
        #[serde(default)]
        pub probable_pitcher: Option<PersonRef>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct NamedRef {
        #[serde(default)]
        pub id: u32,
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct PersonRef {
        pub full_name: String,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct Labeled {
        pub label: String,
        #[serde(default)]
        pub value: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct BoxscoreResponse {
        pub teams: BoxSidesWire,
        #[serde(default)]
        pub info: Vec<Labeled>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct BoxSidesWire {
        pub away: BoxTeamWire,
        pub home: BoxTeamWire,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct BoxTeamWire {
        pub team: NamedRef,
        #[serde(default)]
        pub team_stats: TeamStatsWire,
        #[serde(default)]
        pub players: HashMap<String, PlayerWire>,
        #[serde(default)]
        pub batters: Vec<u64>,
        #[serde(default)]
        pub pitchers: Vec<u64>,
        #[serde(default)]
        pub note: Vec<Labeled>,
        #[serde(default)]
        pub info: Vec<InfoSectionWire>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct TeamStatsWire {
        #[serde(default)]
        pub batting: BattingStatsWire,
        #[serde(default)]
        pub pitching: PitchingStatsWire,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct BattingStatsWire {
        #[serde(default)]
        pub at_bats: u32,
        #[serde(default)]
        pub runs: u32,
        #[serde(default)]
        pub hits: u32,
        #[serde(default)]
        pub rbi: u32,
        #[serde(default)]
        pub base_on_balls: u32,
        #[serde(default)]
        pub strike_outs: u32,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct PitchingStatsWire {
        #[serde(default)]
        pub innings_pitched: String,
        #[serde(default)]
        pub hits: u32,
        #[serde(default)]
        pub runs: u32,
        #[serde(default)]
        pub earned_runs: u32,
        #[serde(default)]
        pub base_on_balls: u32,
        #[serde(default)]
        pub strike_outs: u32,
        #[serde(default)]
        pub home_runs: u32,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct SeasonStatsWire {
        #[serde(default)]
        pub batting: SeasonBattingWire,
        #[serde(default)]
        pub pitching: SeasonPitchingWire,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct SeasonBattingWire {
        #[serde(default)]
        pub avg: String,
        #[serde(default)]
        pub ops: String,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct SeasonPitchingWire {
        #[serde(default)]
        pub era: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct PlayerWire {
        pub person: PersonRef,
        #[serde(default)]
        pub position: PositionWire,
        #[serde(default)]
        pub stats: TeamStatsWire,
        #[serde(default)]
        pub season_stats: SeasonStatsWire,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct PositionWire {
        #[serde(default)]
        pub abbreviation: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct InfoSectionWire {
        pub title: String,
        #[serde(default)]
        pub field_list: Vec<Labeled>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct FeedResponse {
        pub game_data: GameDataWire,
        pub live_data: LiveDataWire,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct GameDataWire {
        pub status: StatusWire,
        pub teams: FeedTeamsWire,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct StatusWire {
        pub status_code: String,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct FeedTeamsWire {
        pub away: FeedTeamWire,
        pub home: FeedTeamWire,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct FeedTeamWire {
        #[serde(default)]
        pub record: RecordWire,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct RecordWire {
        #[serde(default)]
        pub wins: u32,
        #[serde(default)]
        pub losses: u32,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct LiveDataWire {
        #[serde(default)]
        pub linescore: LinescoreWire,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct LinescoreWire {
        #[serde(default)]
        pub innings: Vec<InningWire>,
        #[serde(default)]
        pub teams: LineTeamsWire,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct InningWire {
        pub num: u32,
        #[serde(default)]
        pub away: InningHalfWire,
        #[serde(default)]
        pub home: InningHalfWire,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct InningHalfWire {
        #[serde(default)]
        pub runs: Option<u32>,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct LineTeamsWire {
        #[serde(default)]
        pub away: LineTotalsWire,
        #[serde(default)]
        pub home: LineTotalsWire,
    }

    #[derive(Debug, Default, Deserialize)]
    pub(super) struct LineTotalsWire {
        #[serde(default)]
        pub runs: u32,
        #[serde(default)]
        pub hits: u32,
        #[serde(default)]
        pub errors: u32,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct StandingsResponse {
        #[serde(default)]
        pub records: Vec<StandingsRecordWire>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct StandingsRecordWire {
        pub division: IdRef,
        #[serde(default)]
        pub team_records: Vec<TeamRecordWire>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct IdRef {
        pub id: u32,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct TeamRecordWire {
        pub team: NamedRef,
        pub wins: u32,
        pub losses: u32,
        #[serde(default)]
        pub games_back: String,
        #[serde(default)]
        pub division_rank: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct LeadersResponse {
        #[serde(default)]
        pub league_leaders: Vec<LeaderCategoryWire>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct LeaderCategoryWire {
        #[serde(default)]
        pub leaders: Vec<LeaderWire>,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct LeaderWire {
        pub rank: u32,
        pub person: PersonRef,
        #[serde(default)]
        pub team: Option<NamedRef>,
        #[serde(default)]
        pub value: String,
    }

    #[derive(Debug, Deserialize)]
    pub(super) struct TransactionsResponse {
        #[serde(default)]
        pub transactions: Vec<TransactionWire>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct TransactionWire {
        #[serde(default)]
        pub from_team: Option<NamedRef>,
        #[serde(default)]
        pub to_team: Option<NamedRef>,
        #[serde(default)]
        pub description: Option<String>,
    }
}

// ============================================================================
// Stats client tests
// ============================================================================

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
    }

    #[tokio::test]
    async fn test_schedule_flattens_games_and_probables() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/schedule")
                    .query_param("sportId", "1")
                    .query_param("startDate", "07/04/2025")
                    .query_param("endDate", "07/04/2025")
                    .query_param("hydrate", "probablePitcher");
                then.status(200).json_body(json!({
                    "dates": [{
                        "games": [{
                            "gamePk": 745_123,
                            "gameDate": "2025-07-04T23:05:00Z",
                            "teams": {
                                "away": {
                                    "team": {"id": 147, "name": "New York Yankees"},
                                    "probablePitcher": {"fullName": "Gerrit Cole"}
                                },
                                "home": {
                                    "team": {"id": 111, "name": "Boston Red Sox"}
                                }
                            }
                        }]
                    }]
                }));
            })
            .await;

        let client = MlbApiClient::new(server.base_url()).unwrap();
        let games = client.schedule(test_date()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, 745_123);
        assert_eq!(games[0].away_name, "New York Yankees");
        assert_eq!(games[0].home_name, "Boston Red Sox");
        assert_eq!(games[0].away_probable_pitcher.as_deref(), Some("Gerrit Cole"));
        assert_eq!(games[0].home_probable_pitcher, None);
        assert_eq!(games[0].start_time.to_rfc3339(), "2025-07-04T23:05:00+00:00");
    }

    #[tokio::test]
    async fn test_schedule_with_no_dates_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/schedule");
                then.status(200).json_body(json!({"totalGames": 0}));
            })
            .await;

        let client = MlbApiClient::new(server.base_url()).unwrap();
        let games = client.schedule(test_date()).await.unwrap();
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn test_boxscore_resolves_players_in_batting_order() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/game/745123/boxscore");
                then.status(200).json_body(json!({
                    "teams": {
                        "away": {
                            "team": {"id": 147, "name": "New York Yankees"},
                            "teamStats": {
                                "batting": {"atBats": 34, "runs": 5, "hits": 9, "rbi": 5, "baseOnBalls": 3, "strikeOuts": 8},
                                "pitching": {"inningsPitched": "9.0", "hits": 4, "runs": 1, "earnedRuns": 1, "baseOnBalls": 2, "strikeOuts": 11, "homeRuns": 1}
                            },
                            "players": {
                                "ID100": {
                                    "person": {"fullName": "Aaron Judge"},
                                    "position": {"abbreviation": "RF"},
                                    "stats": {"batting": {"atBats": 4, "runs": 2, "hits": 3, "rbi": 2, "baseOnBalls": 0, "strikeOuts": 1}},
                                    "seasonStats": {"batting": {"avg": ".331", "ops": "1.134"}}
                                },
                                "ID200": {
                                    "person": {"fullName": "Juan Soto"},
                                    "position": {"abbreviation": "LF"},
                                    "stats": {"batting": {"atBats": 3, "runs": 1, "hits": 1, "rbi": 1, "baseOnBalls": 1, "strikeOuts": 0}},
                                    "seasonStats": {"batting": {"avg": ".302", "ops": ".989"}}
                                },
                                "ID300": {
                                    "person": {"fullName": "Gerrit Cole"},
                                    "position": {"abbreviation": "P"},
                                    "stats": {"pitching": {"inningsPitched": "7.0", "hits": 3, "runs": 1, "earnedRuns": 1, "baseOnBalls": 1, "strikeOuts": 9, "homeRuns": 1}},
                                    "seasonStats": {"pitching": {"era": "2.78"}}
                                }
                            },
                            "batters": [200, 100],
                            "pitchers": [300],
                            "note": [{"label": "a", "value": "Singled in the 9th."}],
                            "info": [{"title": "BATTING", "fieldList": [{"label": "2B", "value": "Judge (29)."}]}]
                        },
                        "home": {
                            "team": {"id": 111, "name": "Boston Red Sox"},
                            "teamStats": {},
                            "players": {},
                            "batters": [],
                            "pitchers": []
                        }
                    },
                    "info": [
                        {"label": "Weather", "value": "72 degrees, Clear."},
                        {"label": "July 4, 2025"}
                    ]
                }));
            })
            .await;

        let client = MlbApiClient::new(server.base_url()).unwrap();
        let box_data = client.boxscore(745_123).await.unwrap();

        assert_eq!(box_data.away.name, "New York Yankees");
        // batters follow the order of the id list, not the map
        assert_eq!(box_data.away.batters.len(), 2);
        assert_eq!(box_data.away.batters[0].name, "Juan Soto");
        assert_eq!(box_data.away.batters[1].name, "Aaron Judge");
        assert_eq!(box_data.away.batters[1].hits, 3);
        assert_eq!(box_data.away.batters[1].avg, ".331");
        assert_eq!(box_data.away.batting_totals.at_bats, 34);
        assert_eq!(box_data.away.batting_notes, vec!["a-Singled in the 9th."]);
        assert_eq!(box_data.away.info[0].title, "BATTING");
        assert_eq!(box_data.away.pitchers[0].name, "Gerrit Cole");
        assert_eq!(box_data.away.pitchers[0].innings_pitched, "7.0");
        assert_eq!(box_data.away.pitchers[0].era, "2.78");
        assert_eq!(box_data.away.pitching_totals.strikeouts, 11);
        assert!(box_data.home.batters.is_empty());
        assert_eq!(box_data.game_info.len(), 2);
        assert_eq!(box_data.game_info[1].label, "July 4, 2025");
        assert_eq!(box_data.game_info[1].value, None);
    }

    #[tokio::test]
    async fn test_game_feed_extracts_status_linescore_and_records() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1.1/game/745123/feed/live");
                then.status(200).json_body(json!({
                    "gameData": {
                        "status": {"statusCode": "F"},
                        "teams": {
                            "away": {"record": {"wins": 52, "losses": 36}},
                            "home": {"record": {"wins": 47, "losses": 41}}
                        }
                    },
                    "liveData": {
                        "linescore": {
                            "innings": [
                                {"num": 1, "away": {"runs": 2}, "home": {"runs": 0}},
                                {"num": 2, "away": {"runs": 0}, "home": {}}
                            ],
                            "teams": {
                                "away": {"runs": 2, "hits": 5, "errors": 0},
                                "home": {"runs": 0, "hits": 3, "errors": 1}
                            }
                        }
                    }
                }));
            })
            .await;

        let client = MlbApiClient::new(server.base_url()).unwrap();
        let feed = client.game_feed(745_123).await.unwrap();

        assert_eq!(feed.status_code, "F");
        assert_eq!(feed.away_record.wins, 52);
        assert_eq!(feed.home_record.losses, 41);
        assert_eq!(feed.linescore.innings.len(), 2);
        assert_eq!(feed.linescore.innings[0].away_runs, Some(2));
        assert_eq!(feed.linescore.innings[1].home_runs, None);
        assert_eq!(feed.linescore.home.errors, 1);
    }

    #[tokio::test]
    async fn test_standings_keeps_upstream_division_grouping() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/standings")
                    .query_param("leagueId", "103,104")
                    .query_param("standingsTypes", "regularSeason");
                then.status(200).json_body(json!({
                    "records": [{
                        "division": {"id": 201},
                        "teamRecords": [{
                            "team": {"id": 147, "name": "New York Yankees"},
                            "wins": 52,
                            "losses": 36,
                            "gamesBack": "-",
                            "divisionRank": "1"
                        }, {
                            "team": {"id": 111, "name": "Boston Red Sox"},
                            "wins": 47,
                            "losses": 41,
                            "gamesBack": "5.0",
                            "divisionRank": "2"
                        }]
                    }]
                }));
            })
            .await;

        let client = MlbApiClient::new(server.base_url()).unwrap();
        let records = client.standings().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].division_id, 201);
        assert_eq!(records[0].teams[0].name, "New York Yankees");
        assert_eq!(records[0].teams[0].games_back, "-");
        assert_eq!(records[0].teams[1].rank, "2");
    }

    #[tokio::test]
    async fn test_league_leaders_flattens_rows() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/stats/leaders")
                    .query_param("leaderCategories", "homeRuns")
                    .query_param("statGroup", "hitting")
                    .query_param("leagueId", "103");
                then.status(200).json_body(json!({
                    "leagueLeaders": [{
                        "leaderCategory": "homeRuns",
                        "leaders": [{
                            "rank": 1,
                            "person": {"fullName": "Aaron Judge"},
                            "team": {"id": 147, "name": "New York Yankees"},
                            "value": "33"
                        }]
                    }]
                }));
            })
            .await;

        let client = MlbApiClient::new(server.base_url()).unwrap();
        let rows = client
            .league_leaders("homeRuns", StatGroup::Hitting, 103)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].name, "Aaron Judge");
        assert_eq!(rows[0].team, "New York Yankees");
        assert_eq!(rows[0].value, "33");
    }

    #[tokio::test]
    async fn test_league_leaders_with_no_data_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/stats/leaders");
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = MlbApiClient::new(server.base_url()).unwrap();
        let rows = client
            .league_leaders("saves", StatGroup::Pitching, 104)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_transactions_carries_optional_teams() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/transactions")
                    .query_param("startDate", "07/04/2025")
                    .query_param("endDate", "07/04/2025");
                then.status(200).json_body(json!({
                    "transactions": [{
                        "toTeam": {"id": 147, "name": "New York Yankees"},
                        "description": "New York Yankees signed free agent RHP John Doe."
                    }, {
                        "fromTeam": {"id": 119, "name": "Los Angeles Dodgers"},
                        "toTeam": {"id": 158, "name": "Milwaukee Brewers"},
                        "description": "Traded to Milwaukee."
                    }]
                }));
            })
            .await;

        let client = MlbApiClient::new(server.base_url()).unwrap();
        let rows = client.transactions(test_date()).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].from_team.is_none());
        assert_eq!(rows[0].to_team.as_ref().map(|t| t.id), Some(147));
        assert_eq!(rows[1].from_team.as_ref().map(|t| t.id), Some(119));
    }

    #[tokio::test]
    async fn test_upstream_error_status_propagates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/standings");
                then.status(404);
            })
            .await;

        let client = MlbApiClient::new(server.base_url()).unwrap();
        let err = client.standings().await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_tolerated() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/schedule");
                then.status(200).json_body(json!({"dates": []}));
            })
            .await;

        let client = MlbApiClient::new(format!("{}/", server.base_url())).unwrap();
        let games = client.schedule(test_date()).await.unwrap();
        assert!(games.is_empty());
    }
}
