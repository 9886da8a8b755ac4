//! The daily email digest.
//!
//! One job composes the whole report: yesterday's box scores, today's
//! probable pitchers, standings, today's transactions and the league leader
//! tables, rendered to HTML and mailed to every active subscriber. Days with
//! nothing to report and missing mail configuration are normal outcomes, so
//! the job logs them and returns Ok rather than failing the run.

use async_trait::async_trait;
use chrono::Duration;
use serde::Serialize;

use crate::app::AppContext;
use crate::error::Result;
use crate::jobs::JobRegistry;
use crate::stats::display_date;
use crate::stats::types::{
    DivisionStandings, GameBoxScore, LeagueLeaders, ProbableMatchup, Transaction,
};
use crate::traits::job::Job;
use crate::traits::mailer::{OutboundMail, Recipients};

pub const DAILY_DIGEST_JOB_TYPE: &str = "daily_digest";

/// Everything the `daily` template renders.
#[derive(Debug, Serialize)]
struct DigestContext {
    today: String,
    yesterday: String,
    boxscores: Vec<GameBoxScore>,
    probables: Vec<ProbableMatchup>,
    standings: Vec<DivisionStandings>,
    /// `None` when the transactions fetch failed; the template skips the
    /// section entirely in that case.
    transactions: Option<Vec<Transaction>>,
    leaders: LeagueLeaders,
}

/// Composes and sends the daily report email.
///
/// The job carries no payload; everything it needs comes from the
/// [`AppContext`] at execution time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyDigestJob;

#[async_trait]
impl Job for DailyDigestJob {
    fn job_type(&self) -> &str {
        DAILY_DIGEST_JOB_TYPE
    }

    fn serialize(&self) -> Result<serde_json::Value> {
        Ok(serde_json::json!({}))
    }

    async fn execute(&self, ctx: &AppContext) -> Result<()> {
        let today = ctx.reports.local_today();
        let yesterday = today - Duration::days(1);

        let boxscores = ctx.reports.boxscores_for_date(yesterday).await?;
        let probables = ctx.reports.probables_for_date(today).await?;
        let standings = ctx.reports.standings().await?;
        let transactions = ctx.reports.transactions_for_date(today).await;
        let leaders = ctx.reports.league_leaders().await?;

        if boxscores.is_empty() && probables.is_empty() {
            tracing::info!(date = %today, "No games to report; skipping digest");
            return Ok(());
        }

        let context = DigestContext {
            today: display_date(today),
            yesterday: display_date(yesterday),
            boxscores,
            probables,
            standings,
            transactions,
            leaders,
        };
        let html = ctx.renderer.render("daily", &context)?;

        let recipients = Recipients::new(ctx.users.active_emails().await?);
        if recipients.is_empty() {
            tracing::info!("No active subscribers; skipping digest");
            return Ok(());
        }

        let Some(settings) = ctx.settings.active_settings().await? else {
            tracing::info!("No active mail settings; skipping digest");
            return Ok(());
        };

        let subject = format!("Daily MLB Report - {}", display_date(today));
        let mail = OutboundMail::new(settings.from_email, recipients, subject, html);
        ctx.mailer.deliver(&mail).await?;

        tracing::info!(
            recipients = mail.to.len(),
            date = %today,
            "Daily digest sent"
        );
        Ok(())
    }
}

/// Wire the digest job into a registry so workers can run it.
pub async fn register_daily_digest(registry: &JobRegistry) {
    registry
        .register(DAILY_DIGEST_JOB_TYPE, |_data, ctx| {
            Box::pin(async move { DailyDigestJob.execute(&ctx).await })
        })
        .await;
}

// ============================================================================
// Daily digest tests
// ============================================================================
