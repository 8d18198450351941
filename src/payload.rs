//! Turns a collected failure into the issue Jira receives.

use jira_api::IssueCreateRequest;

use crate::config::Settings;
use crate::context::FailureContext;

pub fn summary(sanitized_file_name: &str, test_name: &str) -> String {
    format!("{} : {}", sanitized_file_name, test_name)
}

/// Multi-line issue description. The failed step is prefixed with `I ` so it
/// reads like the step sentence the runner printed.
pub fn describe(context: &FailureContext) -> String {
    format!(
        "Test Name: {}\nFailed Message: {}\nFailed Step: I {}\nFile Name: {}\nStack Trace:\n{}",
        context.test_name,
        context.failure_message,
        context.failed_step,
        context.file_name,
        context.stack_trace,
    )
}

pub fn build_issue(
    settings: &Settings,
    context: &FailureContext,
    sanitized_file_name: &str,
) -> IssueCreateRequest {
    IssueCreateRequest::new(
        settings.project_key.clone(),
        settings.issue_type.clone(),
        summary(sanitized_file_name, &context.test_name),
        describe(context),
        settings.labels.clone(),
    )
}
