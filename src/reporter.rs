//! Jira extension: routes lifecycle events into failure contexts and files
//! one issue per failed test.

use async_trait::async_trait;
use jira_api::JiraClient;
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::io::{self, Stdout, Write};

use crate::config::Settings;
use crate::context::{ContextRegistry, FailureContext, STEP_DESCRIPTION_LIMIT};
use crate::error::Result;
use crate::event::{EventKind, FailEvent, LifecycleEvent, StepEvent, TestRef};
use crate::extension::Extension;
use crate::payload::build_issue;
use crate::sanitize::FileNameSanitizer;

pub const SUPPRESSED_NOTICE: &str = "Debug mode is active, no Jira issue will be created.";
pub const CREATING_NOTICE: &str = "CREATING JIRA ISSUE";

const SUBSCRIPTIONS: &[EventKind] = &[
    EventKind::SuiteBefore,
    EventKind::SuiteAfter,
    EventKind::TestStart,
    EventKind::TestEnd,
    EventKind::StepAfter,
    EventKind::TestFail,
];

/// Fixed at initialization from `debugMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Armed,
    Suppressed,
}

/// What happened to one failed test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Suppressed,
    Sent { status: u16, body: String },
    Failed { reason: String },
}

pub struct JiraReporter<W: Write = Stdout> {
    settings: Settings,
    mode: Mode,
    client: JiraClient,
    sanitizer: FileNameSanitizer,
    contexts: ContextRegistry,
    out: W,
}

impl JiraReporter<Stdout> {
    /// Validates the configuration map and prepares the client. A reporter
    /// that fails here must not be registered.
    pub fn initialize(map: &Map<String, Value>) -> Result<Self> {
        let settings = Settings::from_map(map)?;
        Self::with_output(settings, io::stdout())
    }
}

impl<W: Write> JiraReporter<W> {
    pub fn with_output(settings: Settings, out: W) -> Result<Self> {
        let client = JiraClient::new(settings.jira_config())?;
        let sanitizer = settings.sanitizer();
        let mode = if settings.debug_mode {
            Mode::Suppressed
        } else {
            Mode::Armed
        };
        info!(
            "Jira reporter ready for project {} ({:?})",
            settings.project_key, mode
        );
        Ok(Self {
            settings,
            mode,
            client,
            sanitizer,
            contexts: ContextRegistry::default(),
            out,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Number of tests with failure details still pending.
    pub fn pending_contexts(&self) -> usize {
        self.contexts.len()
    }

    pub fn on_step_after(&mut self, event: &StepEvent) {
        if self.mode == Mode::Suppressed || !event.has_failed() {
            return;
        }
        debug!("step failed in {}: {}", event.test.name, event.step);
        self.contexts
            .entry(&event.test)
            .record_step_failure(true, &event.render(STEP_DESCRIPTION_LIMIT));
    }

    /// Files the issue for a failed test, or prints the suppression notice.
    pub async fn on_test_fail(&mut self, event: &FailEvent) -> Submission {
        if self.mode == Mode::Suppressed {
            self.contexts.discard(&event.test);
            self.print(SUPPRESSED_NOTICE);
            return Submission::Suppressed;
        }

        self.contexts.entry(&event.test).record_test_failure(
            event.message(),
            event.trace(),
            event.file_name(),
            event.test_name(),
        );
        let context = self.contexts.take(&event.test);
        self.submit(context).await
    }

    /// Drops whatever was collected for `test` at its start or end.
    pub fn on_test_boundary(&mut self, test: &TestRef) {
        self.contexts.discard(test);
    }

    async fn submit(&mut self, context: FailureContext) -> Submission {
        self.print(CREATING_NOTICE);

        let file_name = self.sanitizer.sanitize(&context.file_name);
        let issue = build_issue(&self.settings, &context, &file_name);
        info!("Creating Jira issue '{}'", issue.fields.summary);

        match self.client.create_issue(&issue).await {
            Ok(response) => {
                self.print(&format!("Jira response: {}", response.body));
                Submission::Sent {
                    status: response.status.as_u16(),
                    body: response.body,
                }
            }
            Err(err) => {
                let reason = redact_log_details(&err.to_string());
                warn!("Jira issue submission failed: {}", reason);
                self.print(&failure_notice(&reason));
                Submission::Failed { reason }
            }
        }
    }

    fn print(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{}\n", line) {
            warn!("Failed to write reporter output: {}", err);
        }
    }
}

#[async_trait(?Send)]
impl<W: Write> Extension for JiraReporter<W> {
    fn name(&self) -> &str {
        "jira"
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        SUBSCRIPTIONS
    }

    async fn handle_event(&mut self, event: &LifecycleEvent) {
        match event {
            LifecycleEvent::StepAfter(step) => self.on_step_after(step),
            LifecycleEvent::TestFail(fail) => {
                self.on_test_fail(fail).await;
            }
            LifecycleEvent::TestStart(test) | LifecycleEvent::TestEnd(test) => {
                self.on_test_boundary(&test.test)
            }
            LifecycleEvent::SuiteBefore(suite) => debug!("suite started: {}", suite.suite),
            LifecycleEvent::SuiteAfter(suite) => debug!("suite finished: {}", suite.suite),
        }
    }
}

fn failure_notice(reason: &str) -> String {
    format!("Jira issue could not be created: {}", reason)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps transport errors readable in logs without echoing credentials.
fn redact_log_details(value: &str) -> String {
    let collapsed = collapse_whitespace(value);
    let category = collapsed
        .split(':')
        .next()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .unwrap_or("error");
    let lowered = collapsed.to_lowercase();
    let has_sensitive_hint = ["token", "authorization", "basic ", "password", "set-cookie"]
        .iter()
        .any(|hint| lowered.contains(hint));

    if has_sensitive_hint {
        return format!("{}: <redacted-sensitive-details>", category);
    }

    collapsed
}
