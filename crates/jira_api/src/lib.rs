//! Typed Jira API client crate used to file issues for failed tests.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{JiraClient, RawResponse};
pub use config::JiraConfig;
pub use error::{JiraError, Result};
pub use models::{IssueCreateRequest, IssueFields, IssueTypeRef, ProjectRef};
