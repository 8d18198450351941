//! Test-runner extension that files a Jira issue for every failed test.
//!
//! The runner notifies the [`JiraReporter`] through an [`EventBus`]; failure
//! details are collected per test and turned into a single issue when the
//! terminal `test.fail` event arrives, unless `debugMode` is set.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod extension;
pub mod payload;
pub mod reporter;
pub mod sanitize;

pub use cli::run;
pub use config::{ConfigError, Settings};
pub use context::{ContextRegistry, FailureContext, STEP_DESCRIPTION_LIMIT};
pub use error::{ReporterError, Result};
pub use event::{EventKind, FailEvent, LifecycleEvent, StepEvent, SuiteEvent, TestEvent, TestRef};
pub use extension::{EventBus, Extension};
pub use reporter::{JiraReporter, Mode, Submission};
pub use sanitize::FileNameSanitizer;
