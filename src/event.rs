//! Lifecycle notifications emitted by the test runner.
//!
//! Events carry the runner's own names (`suite.before`, `step.after`,
//! `test.fail`, ...) so a stream produced by the runner can be decoded
//! directly, one JSON object per line, with the name in the `event` field.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::truncate_chars;

/// Identity of a single test: display name plus originating file. Both are
/// required so every event of one test resolves to the same context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestRef {
    pub name: String,
    pub file: String,
}

impl TestRef {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteEvent {
    pub suite: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvent {
    pub test: TestRef,
}

/// A step has finished, successfully or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    pub test: TestRef,
    pub step: String,
    #[serde(default)]
    pub failed: bool,
}

impl StepEvent {
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Step description cut to `limit` characters.
    pub fn render(&self, limit: usize) -> String {
        truncate_chars(&self.step, limit)
    }
}

/// Terminal failure of a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailEvent {
    pub test: TestRef,
    pub message: String,
    #[serde(default)]
    pub trace: String,
}

impl FailEvent {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn file_name(&self) -> &str {
        &self.test.file
    }

    pub fn test_name(&self) -> &str {
        &self.test.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LifecycleEvent {
    #[serde(rename = "suite.before")]
    SuiteBefore(SuiteEvent),
    #[serde(rename = "suite.after")]
    SuiteAfter(SuiteEvent),
    #[serde(rename = "test.start")]
    TestStart(TestEvent),
    #[serde(rename = "test.end")]
    TestEnd(TestEvent),
    #[serde(rename = "step.after")]
    StepAfter(StepEvent),
    #[serde(rename = "test.fail")]
    TestFail(FailEvent),
}

/// Names extensions subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SuiteBefore,
    SuiteAfter,
    TestStart,
    TestEnd,
    StepAfter,
    TestFail,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SuiteBefore => "suite.before",
            EventKind::SuiteAfter => "suite.after",
            EventKind::TestStart => "test.start",
            EventKind::TestEnd => "test.end",
            EventKind::StepAfter => "step.after",
            EventKind::TestFail => "test.fail",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LifecycleEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LifecycleEvent::SuiteBefore(_) => EventKind::SuiteBefore,
            LifecycleEvent::SuiteAfter(_) => EventKind::SuiteAfter,
            LifecycleEvent::TestStart(_) => EventKind::TestStart,
            LifecycleEvent::TestEnd(_) => EventKind::TestEnd,
            LifecycleEvent::StepAfter(_) => EventKind::StepAfter,
            LifecycleEvent::TestFail(_) => EventKind::TestFail,
        }
    }

    /// Decodes one line of a runner event stream.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}
