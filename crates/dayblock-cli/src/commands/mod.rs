//! CLI subcommands and the shared data-directory context.

pub mod block;
pub mod config;

use chrono::{Local, NaiveDate};
use dayblock_core::{PlannerConfig, PlannerSession, Snapshot};
use std::path::PathBuf;

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Where the CLI reads and writes its files.
pub struct Context {
    data_dir: PathBuf,
}

impl Context {
    pub fn new(data_dir: Option<PathBuf>) -> CliResult<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => dayblock_core::data_dir()?,
        };
        tracing::debug!(data_dir = %data_dir.display(), "using data directory");
        Ok(Self { data_dir })
    }

    pub fn config_path(&self) -> PathBuf {
        PlannerConfig::path_in(&self.data_dir)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        Snapshot::path_in(&self.data_dir)
    }

    pub fn load_config(&self) -> CliResult<PlannerConfig> {
        Ok(PlannerConfig::load_from(&self.config_path())?)
    }

    /// Load the saved session and point it at `date` (default: today).
    pub fn load_session(&self, date: Option<NaiveDate>) -> CliResult<PlannerSession> {
        let config = self.load_config()?;
        let snapshot = Snapshot::read_from(&self.snapshot_path())?;
        let today = Local::now().date_naive();
        let mut session = PlannerSession::load(&config, snapshot, today)?;
        session.set_active_date(date.unwrap_or(today));
        Ok(session)
    }

    pub fn save_session(&self, session: &PlannerSession) -> CliResult {
        session.export().write_to(&self.snapshot_path())?;
        Ok(())
    }
}

/// clap value parser for `HH:MM` arguments.
pub fn parse_clock_arg(value: &str) -> Result<i64, String> {
    dayblock_core::parse_clock(value).ok_or_else(|| format!("expected HH:MM, got '{value}'"))
}
