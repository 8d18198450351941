mod issue;

pub use issue::{IssueCreateRequest, IssueFields, IssueTypeRef, ProjectRef};
