//! Report assembly on top of the stats API.
//!
//! [`ReportBuilder`] turns the client's flattened records into the shapes the
//! templates render: box scores with merged season records, probable pitchers
//! with localized start times, standings in fixed display order, leader tables
//! for both leagues, and filtered major-league transactions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::error::{DugoutError, Result};
use crate::stats::client::{StatGroup, StatsApi};
use crate::stats::types::{
    BoxSides, CategoryLeaders, DivisionStandings, GameBoxScore, LeagueLeaders, LeagueSplit,
    MatchupTeams, ProbableMatchup, ProbableSide, RawTransaction, TeamBoxData, TeamBoxSide,
    Transaction, WinLoss,
};

pub const AMERICAN_LEAGUE_ID: u32 = 103;
pub const NATIONAL_LEAGUE_ID: u32 = 104;

/// Division ids paired with display names, in the order reports show them:
/// the American League east to west, then the National League.
pub const DIVISION_ORDER: [(u32, &str); 6] = [
    (201, "AL East"),
    (202, "AL Central"),
    (200, "AL West"),
    (204, "NL East"),
    (205, "NL Central"),
    (203, "NL West"),
];

const BATTING_CATEGORIES: [(&str, &str); 5] = [
    ("battingAverage", "Batting Average"),
    ("homeRuns", "Home Runs"),
    ("runsBattedIn", "Runs Batted In"),
    ("onBasePlusSlugging", "OPS"),
    ("stolenBases", "Stolen Bases"),
];

const PITCHING_CATEGORIES: [(&str, &str); 5] = [
    ("wins", "Wins"),
    ("strikeouts", "Strikeouts"),
    ("earnedRunAverage", "ERA"),
    ("walksAndHitsPerInningPitched", "WHIP"),
    ("saves", "Saves"),
];

/// 12-hour clock without a leading zero, e.g. `7:05 PM`.
const START_TIME_FORMAT: &str = "%-I:%M %p";

/// Dates as reports show them to readers, `MM/DD/YYYY`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// Major-league team ids. Everything else (minor-league affiliates,
/// league-level pseudo-teams) is treated as no team at all.
fn is_major_league_team(id: u32) -> bool {
    matches!(id, 108..=121 | 133..=147 | 158)
}

/// Strips a leading occurrence of the team name from a transaction
/// description and capitalizes the first remaining character.
fn rewrite_description(team_name: &str, description: &str) -> String {
    let stripped = description
        .strip_prefix(team_name)
        .map(str::trim_start)
        .unwrap_or(description);
    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn cook_transaction(raw: RawTransaction) -> Option<Transaction> {
    let team = [raw.from_team, raw.to_team]
        .into_iter()
        .flatten()
        .find(|t| is_major_league_team(t.id))?;
    let description = rewrite_description(&team.name, &raw.description?);
    Some(Transaction {
        team: team.name,
        description,
    })
}

fn finish_side(side: TeamBoxData, record: WinLoss) -> TeamBoxSide {
    TeamBoxSide {
        name: side.name,
        record: format!("{}-{}", record.wins, record.losses),
        batters: side.batters,
        batting_totals: side.batting_totals,
        batting_notes: side.batting_notes,
        info: side.info,
        pitchers: side.pitchers,
        pitching_totals: side.pitching_totals,
    }
}

/// Builds display-ready reports from upstream stats data.
#[derive(Clone)]
pub struct ReportBuilder {
    api: Arc<dyn StatsApi>,
    tz: Tz,
}

impl ReportBuilder {
    /// `tz` is the display timezone for game start times.
    pub fn new(api: Arc<dyn StatsApi>, tz: Tz) -> Self {
        Self { api, tz }
    }

    /// The current date in the display timezone. Reports anchor "today" here,
    /// not in UTC, so a late East Coast evening still counts as today.
    pub fn local_today(&self) -> NaiveDate {
        chrono::Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// Full box scores for every game on `date`, in schedule order.
    /// A day with no games yields an empty list.
    pub async fn boxscores_for_date(&self, date: NaiveDate) -> Result<Vec<GameBoxScore>> {
        let games = self.api.schedule(date).await?;
        let mut boxes = Vec::with_capacity(games.len());
        for game in games {
            let box_data = self.api.boxscore(game.game_id).await?;
            let feed = self.api.game_feed(game.game_id).await?;
            boxes.push(GameBoxScore {
                status: feed.status_code,
                linescore: feed.linescore,
                teams: BoxSides {
                    away: finish_side(box_data.away, feed.away_record),
                    home: finish_side(box_data.home, feed.home_record),
                },
                info: box_data.game_info,
            });
        }
        Ok(boxes)
    }

    /// Matchups for `date` with probable starters and localized start times.
    pub async fn probables_for_date(&self, date: NaiveDate) -> Result<Vec<ProbableMatchup>> {
        let games = self.api.schedule(date).await?;
        let matchups = games
            .into_iter()
            .map(|game| ProbableMatchup {
                time: game
                    .start_time
                    .with_timezone(&self.tz)
                    .format(START_TIME_FORMAT)
                    .to_string(),
                teams: MatchupTeams {
                    away: ProbableSide {
                        name: game.away_name,
                        pitcher: game.away_probable_pitcher,
                    },
                    home: ProbableSide {
                        name: game.home_name,
                        pitcher: game.home_probable_pitcher,
                    },
                },
            })
            .collect();
        Ok(matchups)
    }

    /// Standings for all six divisions in fixed display order, regardless of
    /// how the upstream response orders its records.
    pub async fn standings(&self) -> Result<Vec<DivisionStandings>> {
        let records = self.api.standings().await?;
        let mut by_id: HashMap<u32, _> = records
            .into_iter()
            .map(|r| (r.division_id, r.teams))
            .collect();

        let mut divisions = Vec::with_capacity(DIVISION_ORDER.len());
        for (id, name) in DIVISION_ORDER {
            let teams = by_id.remove(&id).ok_or_else(|| {
                DugoutError::internal(format!("Standings response is missing division {id}"))
            })?;
            divisions.push(DivisionStandings {
                division_id: id,
                division: name.to_string(),
                teams,
            });
        }
        Ok(divisions)
    }

    /// Leader tables: five batting and five pitching categories, each split
    /// by league. Categories the upstream has no data for come back as empty
    /// tables rather than errors.
    pub async fn league_leaders(&self) -> Result<LeagueLeaders> {
        let batting = LeagueSplit {
            american: self
                .group_leaders(&BATTING_CATEGORIES, StatGroup::Hitting, AMERICAN_LEAGUE_ID)
                .await?,
            national: self
                .group_leaders(&BATTING_CATEGORIES, StatGroup::Hitting, NATIONAL_LEAGUE_ID)
                .await?,
        };
        let pitching = LeagueSplit {
            american: self
                .group_leaders(&PITCHING_CATEGORIES, StatGroup::Pitching, AMERICAN_LEAGUE_ID)
                .await?,
            national: self
                .group_leaders(&PITCHING_CATEGORIES, StatGroup::Pitching, NATIONAL_LEAGUE_ID)
                .await?,
        };
        Ok(LeagueLeaders { batting, pitching })
    }

    async fn group_leaders(
        &self,
        categories: &[(&str, &str)],
        group: StatGroup,
        league_id: u32,
    ) -> Result<Vec<CategoryLeaders>> {
        let mut tables = Vec::with_capacity(categories.len());
        for (key, title) in categories {
            let leaders = self.api.league_leaders(key, group, league_id).await?;
            tables.push(CategoryLeaders {
                category: (*title).to_string(),
                leaders,
            });
        }
        Ok(tables)
    }

    /// Major-league transactions for `date`, sorted by team name, with team
    /// names stripped from descriptions. Fetch failures are logged and yield
    /// `None` so a flaky feed never takes the rest of a report down.
    pub async fn transactions_for_date(&self, date: NaiveDate) -> Option<Vec<Transaction>> {
        let raw = match self.api.transactions(date).await {
            Ok(raw) => raw,
            Err(error) => {
                tracing::error!(error = %error, date = %date, "Failed to fetch transactions");
                return None;
            }
        };

        let mut transactions: Vec<Transaction> =
            raw.into_iter().filter_map(cook_transaction).collect();
        transactions.sort_by(|a, b| a.team.cmp(&b.team));
        Some(transactions)
    }
}

// ============================================================================
// Report builder tests
// ============================================================================

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::stats::types::{
        BoxscoreData, DivisionRecords, GameFeedData, LeaderRow, RawTransaction, ScheduledGame,
        TeamRef, TeamStanding,
    };

    #[derive(Default)]
    struct StubApi {
        games: Vec<ScheduledGame>,
        boxscores: HashMap<u64, BoxscoreData>,
        feeds: HashMap<u64, GameFeedData>,
        standings: Vec<DivisionRecords>,
        leaders: HashMap<(String, u32), Vec<LeaderRow>>,
        transactions: Vec<RawTransaction>,
        fail_transactions: bool,
    }

    #[async_trait]
    impl StatsApi for StubApi {
        async fn schedule(&self, _date: NaiveDate) -> Result<Vec<ScheduledGame>> {
            Ok(self.games.clone())
        }

        async fn boxscore(&self, game_id: u64) -> Result<BoxscoreData> {
            self.boxscores
                .get(&game_id)
                .cloned()
                .ok_or_else(|| DugoutError::not_found(format!("no boxscore for game {game_id}")))
        }

        async fn game_feed(&self, game_id: u64) -> Result<GameFeedData> {
            self.feeds
                .get(&game_id)
                .cloned()
                .ok_or_else(|| DugoutError::not_found(format!("no feed for game {game_id}")))
        }

        async fn standings(&self) -> Result<Vec<DivisionRecords>> {
            Ok(self.standings.clone())
        }

        async fn league_leaders(
            &self,
            category: &str,
            _group: StatGroup,
            league_id: u32,
        ) -> Result<Vec<LeaderRow>> {
            Ok(self
                .leaders
                .get(&(category.to_string(), league_id))
                .cloned()
                .unwrap_or_default())
        }

        async fn transactions(&self, _date: NaiveDate) -> Result<Vec<RawTransaction>> {
            if self.fail_transactions {
                return Err(DugoutError::service_unavailable("stats API is down"));
            }
            Ok(self.transactions.clone())
        }
    }

    fn builder(api: StubApi) -> ReportBuilder {
        ReportBuilder::new(Arc::new(api), chrono_tz::America::New_York)
    }

    fn report_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
    }

    fn game(game_id: u64, start_utc: &str) -> ScheduledGame {
        ScheduledGame {
            game_id,
            start_time: start_utc.parse::<DateTime<Utc>>().unwrap(),
            away_name: "New York Yankees".to_string(),
            home_name: "Boston Red Sox".to_string(),
            away_probable_pitcher: Some("Gerrit Cole".to_string()),
            home_probable_pitcher: None,
        }
    }

    fn division(id: u32, leader: &str) -> DivisionRecords {
        DivisionRecords {
            division_id: id,
            teams: vec![TeamStanding {
                name: leader.to_string(),
                wins: 50,
                losses: 30,
                games_back: "-".to_string(),
                rank: "1".to_string(),
            }],
        }
    }

    fn transaction(
        from: Option<(u32, &str)>,
        to: Option<(u32, &str)>,
        description: &str,
    ) -> RawTransaction {
        let team_ref = |(id, name): (u32, &str)| TeamRef {
            id,
            name: name.to_string(),
        };
        RawTransaction {
            from_team: from.map(team_ref),
            to_team: to.map(team_ref),
            description: Some(description.to_string()),
        }
    }

    // ---- team id filter ----

    #[test]
    fn test_major_league_id_ranges() {
        assert!(is_major_league_team(108));
        assert!(is_major_league_team(121));
        assert!(is_major_league_team(133));
        assert!(is_major_league_team(147));
        assert!(is_major_league_team(158));
        assert!(!is_major_league_team(107));
        assert!(!is_major_league_team(122));
        assert!(!is_major_league_team(132));
        assert!(!is_major_league_team(148));
        assert!(!is_major_league_team(200));
    }

    // ---- description rewriting ----

    #[test]
    fn test_description_drops_leading_team_name() {
        assert_eq!(
            rewrite_description("Yankees", "Yankees signed a pitcher"),
            "Signed a pitcher"
        );
    }

    #[test]
    fn test_description_without_team_prefix_is_capitalized_only() {
        assert_eq!(
            rewrite_description("New York Mets", "recalled 2B Jeff McNeil"),
            "Recalled 2B Jeff McNeil"
        );
    }

    #[test]
    fn test_description_equal_to_team_name_becomes_empty() {
        assert_eq!(rewrite_description("Milwaukee Brewers", "Milwaukee Brewers"), "");
    }

    // ---- probables ----

    #[tokio::test]
    async fn test_probable_times_use_display_timezone_without_leading_zero() {
        let api = StubApi {
            games: vec![game(1, "2025-07-04T23:05:00Z")],
            ..StubApi::default()
        };
        let matchups = builder(api).probables_for_date(report_date()).await.unwrap();

        assert_eq!(matchups.len(), 1);
        assert_eq!(matchups[0].time, "7:05 PM");
        assert_eq!(matchups[0].teams.away.name, "New York Yankees");
        assert_eq!(matchups[0].teams.away.pitcher.as_deref(), Some("Gerrit Cole"));
        assert_eq!(matchups[0].teams.home.pitcher, None);
    }

    #[tokio::test]
    async fn test_probable_time_past_midnight_utc_lands_on_previous_evening() {
        let api = StubApi {
            games: vec![game(1, "2025-07-05T02:10:00Z")],
            ..StubApi::default()
        };
        let matchups = builder(api).probables_for_date(report_date()).await.unwrap();
        assert_eq!(matchups[0].time, "10:10 PM");
    }

    #[tokio::test]
    async fn test_empty_schedule_yields_no_probables_or_boxscores() {
        let matchups = builder(StubApi::default())
            .probables_for_date(report_date())
            .await
            .unwrap();
        assert!(matchups.is_empty());

        let boxes = builder(StubApi::default())
            .boxscores_for_date(report_date())
            .await
            .unwrap();
        assert!(boxes.is_empty());
    }

    // ---- box scores ----

    #[tokio::test]
    async fn test_boxscores_merge_feed_status_and_records() {
        let mut boxscores = HashMap::new();
        boxscores.insert(
            7,
            BoxscoreData {
                away: TeamBoxData {
                    name: "New York Yankees".to_string(),
                    ..TeamBoxData::default()
                },
                home: TeamBoxData {
                    name: "Boston Red Sox".to_string(),
                    ..TeamBoxData::default()
                },
                game_info: Vec::new(),
            },
        );
        let mut feeds = HashMap::new();
        feeds.insert(
            7,
            GameFeedData {
                status_code: "F".to_string(),
                away_record: WinLoss { wins: 52, losses: 36 },
                home_record: WinLoss { wins: 47, losses: 41 },
                ..GameFeedData::default()
            },
        );
        let api = StubApi {
            games: vec![game(7, "2025-07-04T23:05:00Z")],
            boxscores,
            feeds,
            ..StubApi::default()
        };

        let boxes = builder(api).boxscores_for_date(report_date()).await.unwrap();

        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].status, "F");
        assert_eq!(boxes[0].teams.away.record, "52-36");
        assert_eq!(boxes[0].teams.home.record, "47-41");
        assert_eq!(boxes[0].teams.away.name, "New York Yankees");
    }

    // ---- standings ----

    #[tokio::test]
    async fn test_standings_come_back_in_fixed_display_order() {
        // deliberately scrambled upstream order
        let api = StubApi {
            standings: vec![
                division(203, "Los Angeles Dodgers"),
                division(200, "Houston Astros"),
                division(205, "Milwaukee Brewers"),
                division(201, "New York Yankees"),
                division(204, "Philadelphia Phillies"),
                division(202, "Cleveland Guardians"),
            ],
            ..StubApi::default()
        };

        let divisions = builder(api).standings().await.unwrap();

        let ids: Vec<u32> = divisions.iter().map(|d| d.division_id).collect();
        assert_eq!(ids, vec![201, 202, 200, 204, 205, 203]);
        let names: Vec<&str> = divisions.iter().map(|d| d.division.as_str()).collect();
        assert_eq!(
            names,
            vec!["AL East", "AL Central", "AL West", "NL East", "NL Central", "NL West"]
        );
        assert_eq!(divisions[0].teams[0].name, "New York Yankees");
        assert_eq!(divisions[5].teams[0].name, "Los Angeles Dodgers");
    }

    #[tokio::test]
    async fn test_standings_missing_a_division_is_an_error() {
        let api = StubApi {
            standings: vec![division(201, "New York Yankees")],
            ..StubApi::default()
        };
        let err = builder(api).standings().await.unwrap_err();
        assert!(err.to_string().contains("missing division"));
    }

    // ---- leaders ----

    #[tokio::test]
    async fn test_leaders_cover_five_categories_per_group_and_league() {
        let mut leaders = HashMap::new();
        leaders.insert(
            ("homeRuns".to_string(), AMERICAN_LEAGUE_ID),
            vec![LeaderRow {
                rank: 1,
                name: "Aaron Judge".to_string(),
                team: "New York Yankees".to_string(),
                value: "33".to_string(),
            }],
        );
        leaders.insert(
            ("saves".to_string(), NATIONAL_LEAGUE_ID),
            vec![LeaderRow {
                rank: 1,
                name: "Edwin Diaz".to_string(),
                team: "New York Mets".to_string(),
                value: "24".to_string(),
            }],
        );
        let api = StubApi {
            leaders,
            ..StubApi::default()
        };

        let all = builder(api).league_leaders().await.unwrap();

        let batting_titles: Vec<&str> = all
            .batting
            .american
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(
            batting_titles,
            vec!["Batting Average", "Home Runs", "Runs Batted In", "OPS", "Stolen Bases"]
        );
        let pitching_titles: Vec<&str> = all
            .pitching
            .national
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(pitching_titles, vec!["Wins", "Strikeouts", "ERA", "WHIP", "Saves"]);

        // populated category
        assert_eq!(all.batting.american[1].leaders[0].name, "Aaron Judge");
        assert_eq!(all.pitching.national[4].leaders[0].name, "Edwin Diaz");
        // categories without upstream data are present but empty
        assert!(all.batting.american[0].leaders.is_empty());
        assert!(all.batting.national[1].leaders.is_empty());
        assert!(all.pitching.american[4].leaders.is_empty());
    }

    // ---- transactions ----

    #[tokio::test]
    async fn test_transactions_prefer_from_team_and_fall_back_to_to_team() {
        let api = StubApi {
            transactions: vec![
                transaction(
                    Some((119, "Los Angeles Dodgers")),
                    Some((158, "Milwaukee Brewers")),
                    "Los Angeles Dodgers traded RHP John Doe.",
                ),
                transaction(
                    None,
                    Some((147, "New York Yankees")),
                    "New York Yankees signed a pitcher",
                ),
            ],
            ..StubApi::default()
        };

        let transactions = builder(api)
            .transactions_for_date(report_date())
            .await
            .unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].team, "Los Angeles Dodgers");
        assert_eq!(transactions[0].description, "Traded RHP John Doe.");
        assert_eq!(transactions[1].team, "New York Yankees");
        assert_eq!(transactions[1].description, "Signed a pitcher");
    }

    #[tokio::test]
    async fn test_transactions_outside_major_league_ids_are_dropped() {
        let api = StubApi {
            transactions: vec![
                transaction(Some((200, "AL West")), None, "Something league-level."),
                transaction(
                    Some((402, "Triple-A Affiliate")),
                    Some((590, "Another Affiliate")),
                    "Minor league move.",
                ),
                transaction(None, Some((108, "Los Angeles Angels")), "Angels claimed OF."),
            ],
            ..StubApi::default()
        };

        let transactions = builder(api)
            .transactions_for_date(report_date())
            .await
            .unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].team, "Los Angeles Angels");
    }

    #[tokio::test]
    async fn test_transaction_with_invalid_from_team_keeps_valid_to_team() {
        let api = StubApi {
            transactions: vec![transaction(
                Some((590, "Triple-A Affiliate")),
                Some((142, "Minnesota Twins")),
                "Minnesota Twins recalled SS Royce Lewis.",
            )],
            ..StubApi::default()
        };

        let transactions = builder(api)
            .transactions_for_date(report_date())
            .await
            .unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].team, "Minnesota Twins");
        assert_eq!(transactions[0].description, "Recalled SS Royce Lewis.");
    }

    #[tokio::test]
    async fn test_transactions_sort_by_team_name() {
        let api = StubApi {
            transactions: vec![
                transaction(Some((147, "New York Yankees")), None, "Signed X."),
                transaction(Some((109, "Arizona Diamondbacks")), None, "Signed Y."),
                transaction(Some((158, "Milwaukee Brewers")), None, "Signed Z."),
            ],
            ..StubApi::default()
        };

        let transactions = builder(api)
            .transactions_for_date(report_date())
            .await
            .unwrap();

        let teams: Vec<&str> = transactions.iter().map(|t| t.team.as_str()).collect();
        assert_eq!(
            teams,
            vec!["Arizona Diamondbacks", "Milwaukee Brewers", "New York Yankees"]
        );
    }

    #[tokio::test]
    async fn test_transaction_fetch_failure_yields_none() {
        let api = StubApi {
            fail_transactions: true,
            ..StubApi::default()
        };
        assert!(builder(api)
            .transactions_for_date(report_date())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_empty_transaction_day_yields_empty_list() {
        let transactions = builder(StubApi::default())
            .transactions_for_date(report_date())
            .await
            .unwrap();
        assert!(transactions.is_empty());
    }
}
