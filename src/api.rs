//! REST Command Wrappers
//!
//! Frontend bindings to the backend REST API. One async fn per endpoint,
//! all returning `Result<_, ApiFailure>` so callers get the server
//! message / generic message / fallback chain for free.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use viewflow::{ApiFailure, FetchPlan, MutationCommand, SelectOption};

use crate::models::{
    AttachmentDraft, Issue, IssuePage, Milestone, Project, Subtask, Task, User,
};

/// Error body shape the backend uses for non-2xx responses
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn api_base() -> String {
    let origin = web_sys::window()
        .map(|w| w.location())
        .and_then(|l| l.origin().ok())
        .unwrap_or_default();
    format!("{origin}/api")
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiFailure> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let generic = format!("request failed with status {}", resp.status());
    let server_message = resp.json::<ErrorBody>().await.ok().and_then(|b| b.message);
    Err(ApiFailure {
        server_message,
        message: Some(generic),
    })
}

async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiFailure> {
    let resp = Client::new()
        .get(format!("{}{}", api_base(), path))
        .send()
        .await
        .map_err(|e| ApiFailure::transport(e.to_string()))?;
    check(resp)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ApiFailure::transport(e.to_string()))
}

async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiFailure> {
    let resp = Client::new()
        .post(format!("{}{}", api_base(), path))
        .json(body)
        .send()
        .await
        .map_err(|e| ApiFailure::transport(e.to_string()))?;
    check(resp)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ApiFailure::transport(e.to_string()))
}

async fn patch_json<B: Serialize>(path: &str, body: &B) -> Result<(), ApiFailure> {
    let resp = Client::new()
        .patch(format!("{}{}", api_base(), path))
        .json(body)
        .send()
        .await
        .map_err(|e| ApiFailure::transport(e.to_string()))?;
    check(resp).await.map(|_| ())
}

// ========================
// Lookup Commands
// ========================

pub async fn list_projects() -> Result<Vec<Project>, ApiFailure> {
    get_json("/projects").await
}

pub async fn list_milestones(project_id: u64) -> Result<Vec<Milestone>, ApiFailure> {
    get_json(&format!("/projects/{project_id}/milestones")).await
}

pub async fn list_tasks(milestone_id: u64) -> Result<Vec<Task>, ApiFailure> {
    get_json(&format!("/milestones/{milestone_id}/tasks")).await
}

pub async fn list_subtasks(task_id: u64) -> Result<Vec<Subtask>, ApiFailure> {
    get_json(&format!("/tasks/{task_id}/subtasks")).await
}

pub async fn list_users() -> Result<Vec<User>, ApiFailure> {
    get_json("/users").await
}

/// Options for a downstream chain stage, scoped by the upstream id.
/// The first stage ("project") is unscoped and loaded separately.
pub async fn fetch_stage_options(
    stage_key: &str,
    scope_id: u64,
) -> Result<Vec<SelectOption>, ApiFailure> {
    match stage_key {
        "milestone" => Ok(list_milestones(scope_id)
            .await?
            .iter()
            .map(Milestone::to_option)
            .collect()),
        "task" => Ok(list_tasks(scope_id)
            .await?
            .iter()
            .map(Task::to_option)
            .collect()),
        "subtask" => Ok(list_subtasks(scope_id)
            .await?
            .iter()
            .map(Subtask::to_option)
            .collect()),
        other => Err(ApiFailure::transport(format!("unknown stage {other}"))),
    }
}

// ========================
// Issue Commands
// ========================

/// Run whichever fetch path the view's plan selected.
pub async fn fetch_issue_page(plan: &FetchPlan) -> Result<IssuePage, ApiFailure> {
    let path = match plan {
        FetchPlan::Plain { page, page_size } => {
            format!("/issues?page={page}&pageSize={page_size}")
        }
        FetchPlan::Status { status, page, page_size } => {
            format!("/issues?status={}&page={page}&pageSize={page_size}", encode(status))
        }
        FetchPlan::Structured { query, page, page_size } => {
            format!("/issues/search?q={}&page={page}&pageSize={page_size}", encode(query))
        }
    };
    get_json(&path).await
}

#[derive(Serialize)]
pub struct CreateIssueArgs<'a> {
    pub title: &'a str,
    #[serde(rename = "issueType")]
    pub issue_type: &'a str,
    pub priority: &'a str,
    #[serde(rename = "responsiblePersonId", skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<u64>,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<&'a str>,
    #[serde(rename = "endDate")]
    pub end_date: &'a str,
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(rename = "milestoneId", skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    #[serde(rename = "taskId", skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(rename = "subtaskId", skip_serializing_if = "Option::is_none")]
    pub subtask_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
    pub attachments: &'a [AttachmentDraft],
}

pub async fn create_issue(args: &CreateIssueArgs<'_>) -> Result<Issue, ApiFailure> {
    post_json("/issues", args).await
}

/// Partial update of a single field on one issue.
pub async fn update_issue_field(issue_id: u64, field: &str, value: &str) -> Result<(), ApiFailure> {
    let mut body = serde_json::Map::new();
    body.insert(field.to_string(), serde_json::Value::String(value.to_string()));
    patch_json(&format!("/issues/{issue_id}"), &body).await
}

// ========================
// Comment Commands
// ========================

#[derive(Serialize)]
struct CommentArgs<'a> {
    text: &'a str,
}

pub async fn create_comment(issue_id: u64, text: &str) -> Result<(), ApiFailure> {
    post_json::<_, serde_json::Value>(&format!("/issues/{issue_id}/comments"), &CommentArgs { text })
        .await
        .map(|_| ())
}

pub async fn update_comment(comment_id: u64, text: &str) -> Result<(), ApiFailure> {
    patch_json(&format!("/comments/{comment_id}"), &CommentArgs { text }).await
}

/// Execute a mutation command handed out by the collection view.
pub async fn run_mutation(command: &MutationCommand) -> Result<(), ApiFailure> {
    match command {
        MutationCommand::UpdateField { record_id, field, value } => {
            update_issue_field(*record_id, field, value).await
        }
        MutationCommand::UpdateComment { comment_id, text } => {
            update_comment(*comment_id, text).await
        }
        MutationCommand::CreateComment { record_id, text } => {
            create_comment(*record_id, text).await
        }
    }
}
