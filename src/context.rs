//! Failure details collected while a single test runs.

use std::collections::HashMap;

use crate::event::TestRef;

/// Longest failed-step description kept, in characters.
pub const STEP_DESCRIPTION_LIMIT: usize = 1000;

/// Everything the issue description needs about one failed test. Later writes
/// overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureContext {
    pub failed_step: String,
    pub test_name: String,
    pub file_name: String,
    pub failure_message: String,
    pub stack_trace: String,
}

impl FailureContext {
    /// Called for every completed step; only failed steps are kept.
    pub fn record_step_failure(&mut self, failed: bool, description: &str) {
        if failed {
            self.failed_step = truncate_chars(description, STEP_DESCRIPTION_LIMIT);
        }
    }

    pub fn record_test_failure(
        &mut self,
        message: &str,
        trace: &str,
        file_name: &str,
        test_name: &str,
    ) {
        self.failure_message = message.to_string();
        self.stack_trace = trace.to_string();
        self.file_name = file_name.to_string();
        self.test_name = test_name.to_string();
    }
}

/// Cuts `value` to at most `limit` characters without splitting a character.
pub fn truncate_chars(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((end, _)) => value[..end].to_string(),
        None => value.to_string(),
    }
}

/// One [`FailureContext`] per running test, so interleaved tests never see
/// each other's steps.
#[derive(Debug, Default)]
pub struct ContextRegistry {
    contexts: HashMap<TestRef, FailureContext>,
}

impl ContextRegistry {
    pub fn entry(&mut self, test: &TestRef) -> &mut FailureContext {
        self.contexts.entry(test.clone()).or_default()
    }

    /// Removes and returns the context of `test`, empty if nothing was
    /// recorded for it.
    pub fn take(&mut self, test: &TestRef) -> FailureContext {
        self.contexts.remove(test).unwrap_or_default()
    }

    pub fn discard(&mut self, test: &TestRef) {
        self.contexts.remove(test);
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
