//! Frontend Models
//!
//! Data structures matching backend entities, plus the pure projections
//! that turn them into select options.

use serde::{Deserialize, Serialize};
use viewflow::{CollectionRecord, PageMeta, SelectOption};

/// Project data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// Milestone data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub name: String,
    #[serde(rename = "projectId")]
    pub project_id: u64,
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    #[serde(rename = "milestoneId")]
    pub milestone_id: u64,
}

/// Subtask data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: u64,
    pub name: String,
    #[serde(rename = "taskId")]
    pub task_id: u64,
}

/// User data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

/// Stored attachment on an issue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    pub name: String,
}

/// Attachment picked in the UI, inlined into the create payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttachmentDraft {
    pub name: String,
    pub mime: String,
    #[serde(rename = "dataBase64")]
    pub data_base64: String,
}

/// Issue row as displayed in the table. Hash/Eq cover every field so the
/// table can re-key rows whenever a refetch brings back changed data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    pub status: String,
    #[serde(rename = "issueType")]
    pub issue_type: String,
    #[serde(rename = "responsiblePersonId")]
    pub responsible_id: Option<u64>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub priority: String,
    pub comment: Option<String>,
    /// Id of the latest comment entity; absent until the first comment
    /// is created.
    #[serde(rename = "commentId")]
    pub comment_id: Option<u64>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl CollectionRecord for Issue {
    fn id(&self) -> u64 {
        self.id
    }
    fn comment_id(&self) -> Option<u64> {
        self.comment_id
    }
}

/// One page of issues as returned by the list/search endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IssuePage {
    #[serde(default)]
    pub items: Vec<Issue>,
    #[serde(default)]
    pub pagination: PageMeta,
}

// ========================
// Option Projections
// ========================

impl Project {
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(self.id, self.name.clone())
    }
}

impl Milestone {
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(self.id, self.name.clone())
    }
}

impl Task {
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(self.id, self.name.clone())
    }
}

impl Subtask {
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(self.id, self.name.clone())
    }
}

impl User {
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(self.id, self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_projection() {
        let project = Project { id: 3, name: "Atlas".to_string() };
        let opt = project.to_option();
        assert_eq!(opt.id, 3);
        assert_eq!(opt.label, "Atlas");
    }

    #[test]
    fn test_issue_comment_identity() {
        let issue = Issue {
            id: 8,
            title: "Broken login".to_string(),
            status: "open".to_string(),
            issue_type: "bug".to_string(),
            responsible_id: None,
            start_date: None,
            end_date: Some("2025-02-01".to_string()),
            priority: "high".to_string(),
            comment: None,
            comment_id: None,
            attachments: vec![],
        };
        assert_eq!(CollectionRecord::id(&issue), 8);
        assert_eq!(issue.comment_id(), None);
    }
}
