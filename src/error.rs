//! Errors that stop the reporter from being set up or from reading events.

use jira_api::JiraError;
use std::io;
use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, ReporterError>;

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build jira client: {0}")]
    Client(#[from] JiraError),
    #[error("failed to read events: {0}")]
    Io(#[from] io::Error),
}
