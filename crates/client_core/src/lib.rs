use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use loaf_render::ProgressState;
use reqwest::Client;
use shared::protocol::{Interaction, Stats};
use tracing::info;
use url::Url;

pub mod keypad;
pub mod tally;

pub use keypad::Keypad;
pub use tally::{ChangeOutcome, Tally, TallyError, TallyEvent};

#[async_trait]
pub trait CrumbSource: Send + Sync {
    async fn fetch_stats(&self) -> Result<Stats>;
    async fn log_interaction(&self, interaction: &Interaction) -> Result<Interaction>;
}

pub struct HttpCrumbSource {
    http: Client,
    api_url: Url,
}

impl HttpCrumbSource {
    pub fn new(api_url: &str) -> Result<Self> {
        let mut api_url =
            Url::parse(api_url).with_context(|| format!("invalid api url '{api_url}'"))?;
        if api_url.cannot_be_a_base() {
            return Err(anyhow!("api url '{api_url}' cannot be used as a base"));
        }
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            api_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .with_context(|| format!("failed to build endpoint '{path}'"))
    }
}

#[async_trait]
impl CrumbSource for HttpCrumbSource {
    async fn fetch_stats(&self) -> Result<Stats> {
        let stats: Stats = self
            .http
            .get(self.endpoint("stats/")?)
            .send()
            .await?
            .error_for_status()
            .context("failed to fetch stats")?
            .json()
            .await?;
        info!(
            total_crumbs = stats.total_crumbs,
            goal = stats.goal,
            "stats: fetched"
        );
        Ok(stats)
    }

    async fn log_interaction(&self, interaction: &Interaction) -> Result<Interaction> {
        let stored: Interaction = self
            .http
            .post(self.endpoint("interactions/")?)
            .json(interaction)
            .send()
            .await?
            .error_for_status()
            .context("failed to log interaction")?
            .json()
            .await?;
        Ok(stored)
    }
}

pub async fn submit_batch(
    source: &dyn CrumbSource,
    batch: &[Interaction],
) -> Result<Vec<Interaction>> {
    info!(records = batch.len(), "interactions: submitting batch");
    let stored = try_join_all(batch.iter().map(|record| source.log_interaction(record))).await?;
    let crumbs: i64 = stored.iter().map(|record| record.crumbs).sum();
    info!(records = stored.len(), crumbs, "interactions: batch stored");
    Ok(stored)
}

pub fn progress_state(stats: &Stats) -> ProgressState {
    ProgressState::new(stats.total_crumbs, stats.goal)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
