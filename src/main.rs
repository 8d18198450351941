use std::process::ExitCode;

fn main() -> ExitCode {
    jira_reporter_lib::run()
}
