//! In-process fixtures: a full application context on in-memory backends.
//!
//! [`test_app`] wires the real context builder to a [`StubStatsApi`] serving
//! canned upstream data and a [`RecordingMailer`] that captures outbound mail
//! instead of sending it. Seed helpers insert users and mail settings through
//! the same store traits the handlers use.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::app::AppContext;
use crate::auth::{PasswordConfig, PasswordHasher};
use crate::config::Config;
use crate::core::App;
use crate::error::Result;
use crate::jobs::InMemoryJobQueue;
use crate::render::Renderer;
use crate::session::InMemorySessionStore;
use crate::stats::client::{StatGroup, StatsApi};
use crate::stats::types::{
    BoxscoreData, DivisionRecords, GameFeedData, LeaderRow, RawTransaction, ScheduledGame,
    TeamBoxData, TeamStanding,
};
use crate::stats::{ReportBuilder, DIVISION_ORDER};
use crate::store::{MailSettings, MailSettingsInput, MemoryStore, NewUser, User};
use crate::traits::mailer::{Mailer, OutboundMail};
use crate::web::{AuthModule, PagesModule, SettingsModule};

/// A mailer that records every delivery instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundMail>>,
}

impl RecordingMailer {
    /// Everything delivered so far, in order.
    pub async fn sent(&self) -> Vec<OutboundMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn deliver(&self, mail: &OutboundMail) -> Result<()> {
        self.sent.lock().await.push(mail.clone());
        Ok(())
    }
}

/// Stats API stub serving canned data.
///
/// Every date gets the same schedule, so tests stay independent of the clock.
/// [`with_game`](Self::with_game) registers a matchup along with a minimal
/// final box score; [`with_standings`](Self::with_standings) seeds one leader
/// per division, which the report layer requires before it renders anything.
#[derive(Debug, Clone, Default)]
pub struct StubStatsApi {
    games: Vec<ScheduledGame>,
    boxscores: HashMap<u64, BoxscoreData>,
    feeds: HashMap<u64, GameFeedData>,
    divisions: Vec<DivisionRecords>,
    leaders: Vec<LeaderRow>,
    transactions: Vec<RawTransaction>,
}

/// 7:05 PM Eastern on the Fourth of July.
fn first_pitch() -> DateTime<Utc> {
    "2025-07-04T23:05:00Z".parse().unwrap()
}

impl StubStatsApi {
    /// Register a game: a schedule entry plus a final box score and feed.
    #[must_use]
    pub fn with_game(
        mut self,
        game_id: u64,
        away: &str,
        home: &str,
        away_pitcher: Option<&str>,
        home_pitcher: Option<&str>,
    ) -> Self {
        self.games.push(ScheduledGame {
            game_id,
            start_time: first_pitch(),
            away_name: away.to_string(),
            home_name: home.to_string(),
            away_probable_pitcher: away_pitcher.map(str::to_string),
            home_probable_pitcher: home_pitcher.map(str::to_string),
        });
        self.boxscores.insert(
            game_id,
            BoxscoreData {
                away: TeamBoxData {
                    name: away.to_string(),
                    ..TeamBoxData::default()
                },
                home: TeamBoxData {
                    name: home.to_string(),
                    ..TeamBoxData::default()
                },
                game_info: Vec::new(),
            },
        );
        self.feeds.insert(
            game_id,
            GameFeedData {
                status_code: "F".to_string(),
                ..GameFeedData::default()
            },
        );
        self
    }

    /// Seed one team per division, covering all six divisions.
    #[must_use]
    pub fn with_standings(mut self) -> Self {
        self.divisions = DIVISION_ORDER
            .iter()
            .map(|(id, name)| DivisionRecords {
                division_id: *id,
                teams: vec![TeamStanding {
                    name: format!("{name} Leader"),
                    wins: 60,
                    losses: 40,
                    games_back: "-".to_string(),
                    rank: "1".to_string(),
                }],
            })
            .collect();
        self
    }

    /// Serve the same leader rows for every category.
    #[must_use]
    pub fn with_leaders(mut self, leaders: Vec<LeaderRow>) -> Self {
        self.leaders = leaders;
        self
    }

    /// Serve these raw transactions for every date.
    #[must_use]
    pub fn with_transactions(mut self, transactions: Vec<RawTransaction>) -> Self {
        self.transactions = transactions;
        self
    }
}

#[async_trait]
impl StatsApi for StubStatsApi {
    async fn schedule(&self, _date: NaiveDate) -> Result<Vec<ScheduledGame>> {
        Ok(self.games.clone())
    }

    async fn boxscore(&self, game_id: u64) -> Result<BoxscoreData> {
        self.boxscores.get(&game_id).cloned().ok_or_else(|| {
            crate::error::DugoutError::not_found(format!("no boxscore for game {game_id}"))
        })
    }

    async fn game_feed(&self, game_id: u64) -> Result<GameFeedData> {
        self.feeds.get(&game_id).cloned().ok_or_else(|| {
            crate::error::DugoutError::not_found(format!("no feed for game {game_id}"))
        })
    }

    async fn standings(&self) -> Result<Vec<DivisionRecords>> {
        Ok(self.divisions.clone())
    }

    async fn league_leaders(
        &self,
        _category: &str,
        _group: StatGroup,
        _league_id: u32,
    ) -> Result<Vec<LeaderRow>> {
        Ok(self.leaders.clone())
    }

    async fn transactions(&self, _date: NaiveDate) -> Result<Vec<RawTransaction>> {
        Ok(self.transactions.clone())
    }
}

/// An application wired for tests, with a handle on the captured outbox.
pub struct TestApp {
    pub ctx: AppContext,
    pub outbox: Arc<RecordingMailer>,
}

impl TestApp {
    /// A fresh router over the same context, with every module registered.
    pub fn router(&self) -> Router {
        App::new(self.ctx.clone())
            .register_module(PagesModule)
            .register_module(AuthModule)
            .register_module(SettingsModule)
            .into_test_router()
    }
}

/// Build a test application around the given stats stub.
pub async fn test_app_with(stats: StubStatsApi) -> TestApp {
    let config = Arc::new(Config::default());
    let store = Arc::new(MemoryStore::new());
    let outbox = Arc::new(RecordingMailer::default());
    let tz = config.stats.tz().expect("default timezone parses");

    let ctx = AppContext::builder()
        .with_config(config.clone())
        .with_users(store.clone())
        .with_settings(store)
        .with_sessions(Arc::new(InMemorySessionStore::new(
            config.session.default_ttl(),
        )))
        .with_mailer(outbox.clone())
        .with_reports(Arc::new(ReportBuilder::new(Arc::new(stats), tz)))
        .with_renderer(Arc::new(Renderer::new().expect("bundled templates compile")))
        .with_job_queue(Arc::new(InMemoryJobQueue::new(
            config.jobs.max_retries,
            config.jobs.retry_backoff_seconds,
        )))
        .build()
        .expect("test context has every dependency");

    TestApp { ctx, outbox }
}

/// Build a test application with no upstream data at all.
pub async fn test_app() -> TestApp {
    test_app_with(StubStatsApi::default()).await
}

/// A bare context for tests that never touch the router.
pub async fn test_context() -> AppContext {
    test_app().await.ctx
}

/// Create a user with the given flags. The password is hashed with reduced
/// cost parameters so tests stay fast.
pub async fn seed_user(
    ctx: &AppContext,
    email: &str,
    password: &str,
    active: bool,
    admin: bool,
) -> User {
    let hash = PasswordHasher::new(PasswordConfig::fast())
        .hash(password)
        .expect("password hashes");
    ctx.users
        .create_user(NewUser {
            email: email.to_string(),
            password_hash: hash,
            active,
            admin,
        })
        .await
        .expect("email not already seeded")
}

/// An active non-admin account with the password `password`.
pub async fn seed_subscriber(ctx: &AppContext, email: &str) -> User {
    seed_user(ctx, email, "password", true, false).await
}

/// An active admin account.
pub async fn seed_admin(ctx: &AppContext, email: &str, password: &str) -> User {
    seed_user(ctx, email, password, true, true).await
}

/// Insert an active mail settings row sending as `reports@example.com`.
pub async fn seed_mail_settings(ctx: &AppContext, ssl: bool) -> MailSettings {
    ctx.settings
        .insert_settings(MailSettingsInput {
            username: "mailer".to_string(),
            password: "secret".to_string(),
            from_email: "reports@example.com".to_string(),
            smtp_host: "smtp.example.com".to_string(),
            port: if ssl { 465 } else { 587 },
            ssl,
        })
        .await
        .expect("settings row inserts")
}
