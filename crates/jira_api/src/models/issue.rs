use serde::Serialize;

/// Body of `POST /rest/api/2/issue`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct IssueCreateRequest {
    pub fields: IssueFields,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct IssueFields {
    pub project: ProjectRef,
    pub summary: String,
    pub description: String,
    #[serde(rename = "issuetype")]
    pub issue_type: IssueTypeRef,
    pub labels: Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct IssueTypeRef {
    pub name: String,
}

impl IssueCreateRequest {
    pub fn new(
        project_key: impl Into<String>,
        issue_type: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
        labels: Vec<String>,
    ) -> Self {
        Self {
            fields: IssueFields {
                project: ProjectRef {
                    key: project_key.into(),
                },
                summary: summary.into(),
                description: description.into(),
                issue_type: IssueTypeRef {
                    name: issue_type.into(),
                },
                labels,
            },
        }
    }
}
