//! CLI subcommands.

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use woodcraft_storefront::{InMemoryCatalog, StorefrontConfig, StorefrontError, StorefrontSession};

pub mod catalog;
pub mod checkout;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Load configuration and the catalog, and start a session.
///
/// # Errors
///
/// Returns an error if the configuration or catalog cannot be loaded.
pub fn open_session() -> Result<StorefrontSession, CliError> {
    let config = StorefrontConfig::from_env().map_err(StorefrontError::from)?;
    let catalog = InMemoryCatalog::load(&config).map_err(StorefrontError::from)?;
    tracing::debug!(products = catalog.len(), "Catalog ready");
    Ok(StorefrontSession::new(Arc::new(catalog), config))
}

/// Where command output goes, and in which format.
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Write a value as pretty-printed JSON.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), CliError> {
        let mut out = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
        Ok(())
    }

    /// Write lines of text.
    pub fn lines<I, S>(&self, lines: I) -> Result<(), CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = std::io::stdout().lock();
        for line in lines {
            writeln!(out, "{}", line.as_ref())?;
        }
        Ok(())
    }
}
