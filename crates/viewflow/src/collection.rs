//! Filtered, Paginated Collection View
//!
//! State machine for a server-paginated table that can run unfiltered or
//! under a persisted filter, with per-field inline editing and inline row
//! creation. All edits are serialized through a single `mutation_in_flight`
//! flag owned by the view instance: a second edit attempted while one is
//! outstanding is ignored, not queued.

use serde::Deserialize;

use crate::message::ApiFailure;

/// Record displayed by a collection view.
pub trait CollectionRecord {
    fn id(&self) -> u64;
    /// Id of the record's most recent comment entity, when one exists.
    /// Drives the create-first-comment vs update-existing-comment split.
    fn comment_id(&self) -> Option<u64>;
}

/// Server-reported pagination metadata. `current_page` is 1-based and is
/// the source of truth for the view's 0-based page index.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

/// Persisted filter narrowing the collection fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterContext {
    None,
    /// Opaque multi-field query blob.
    Structured(String),
    /// Single status shortcut.
    Status(String),
}

impl FilterContext {
    /// Resolve the two persisted forms into the one honored filter.
    /// The structured filter takes precedence when both are present;
    /// blank strings count as absent.
    pub fn resolve(structured: Option<String>, status: Option<String>) -> Self {
        if let Some(q) = structured.filter(|s| !s.trim().is_empty()) {
            return Self::Structured(q);
        }
        if let Some(s) = status.filter(|s| !s.trim().is_empty()) {
            return Self::Status(s);
        }
        Self::None
    }
}

/// Which fetch path to take for the current page. `page` is 1-based as
/// the server expects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchPlan {
    Plain {
        page: u32,
        page_size: u32,
    },
    Structured {
        query: String,
        page: u32,
        page_size: u32,
    },
    Status {
        status: String,
        page: u32,
        page_size: u32,
    },
}

/// Mutation the caller must issue. Comment edits are routed by the
/// record's `comment_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationCommand {
    UpdateField {
        record_id: u64,
        field: String,
        value: String,
    },
    UpdateComment {
        comment_id: u64,
        text: String,
    },
    CreateComment {
        record_id: u64,
        text: String,
    },
}

/// Client-side required-field check for the inline create flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DraftValidation {
    pub title_missing: bool,
    pub end_date_missing: bool,
    pub task_missing: bool,
}

impl DraftValidation {
    /// `require_task` is set in the table inline-create flow, where a
    /// selected task id is mandatory.
    pub fn check(title: &str, end_date: &str, task_id: Option<u64>, require_task: bool) -> Self {
        Self {
            title_missing: title.trim().is_empty(),
            end_date_missing: end_date.trim().is_empty(),
            task_missing: require_task && task_id.is_none(),
        }
    }

    pub fn ok(&self) -> bool {
        !(self.title_missing || self.end_date_missing || self.task_missing)
    }
}

/// Outcome of [`CollectionView::begin_create`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateAttempt {
    /// Required fields missing; no server call is made.
    Invalid(DraftValidation),
    /// Another mutation is in flight; the attempt is ignored.
    Busy,
    /// Flag taken; the caller must issue the create call and report back
    /// through [`CollectionView::finish_create`].
    Ready,
}

/// Outcome of [`CollectionView::finish_create`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOutcome {
    /// Reload to run; present only on success.
    pub refetch: Option<FetchPlan>,
    /// Whether the inline add-row should close and clear. On failure it
    /// stays open with the entered data intact.
    pub close_row: bool,
}

/// The collection view state machine.
#[derive(Clone, Debug)]
pub struct CollectionView<R> {
    records: Vec<R>,
    page_index: usize,
    page_size: u32,
    meta: PageMeta,
    loading: bool,
    load_error: Option<String>,
    mutation_in_flight: bool,
    mutation_error: Option<String>,
}

impl<R: CollectionRecord> CollectionView<R> {
    pub fn new(page_size: u32) -> Self {
        Self {
            records: Vec::new(),
            page_index: 0,
            page_size,
            meta: PageMeta::default(),
            loading: false,
            load_error: None,
            mutation_in_flight: false,
            mutation_error: None,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_updating(&self) -> bool {
        self.mutation_in_flight
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Drain the message recorded by the most recent failed mutation.
    pub fn take_mutation_error(&mut self) -> Option<String> {
        self.mutation_error.take()
    }

    /// Move to a 0-based page. Clamped to the known page range.
    pub fn set_page(&mut self, page_index: usize) {
        let max = (self.meta.total_pages as usize).saturating_sub(1);
        self.page_index = page_index.min(max);
    }

    /// Fetch path for the current page under the active filter; the
    /// structured filter takes precedence over the status shortcut.
    pub fn fetch_plan(&self, filter: &FilterContext) -> FetchPlan {
        let page = self.page_index as u32 + 1;
        match filter {
            FilterContext::Structured(query) => FetchPlan::Structured {
                query: query.clone(),
                page,
                page_size: self.page_size,
            },
            FilterContext::Status(status) => FetchPlan::Status {
                status: status.clone(),
                page,
                page_size: self.page_size,
            },
            FilterContext::None => FetchPlan::Plain {
                page,
                page_size: self.page_size,
            },
        }
    }

    pub fn load_started(&mut self) {
        self.loading = true;
        self.load_error = None;
    }

    /// Apply one page of results. A failed or malformed response falls
    /// back to an empty record list plus an error state; a successful one
    /// re-synchronizes the page index from the server's `current_page`.
    pub fn load_finished(&mut self, result: Result<(Vec<R>, PageMeta), ApiFailure>) {
        self.loading = false;
        match result {
            Ok((records, meta)) => {
                self.page_index = meta.current_page.saturating_sub(1) as usize;
                self.records = records;
                self.meta = meta;
                self.load_error = None;
            }
            Err(err) => {
                self.records = Vec::new();
                self.load_error = Some(err.user_message());
            }
        }
    }

    /// Start a single-field inline edit. Returns `None` (ignored, not
    /// queued) when another mutation is in flight or the record is not on
    /// the current page.
    pub fn begin_edit(
        &mut self,
        record_id: u64,
        field: &str,
        value: &str,
    ) -> Option<MutationCommand> {
        if self.mutation_in_flight || !self.has_record(record_id) {
            return None;
        }
        self.mutation_in_flight = true;
        Some(MutationCommand::UpdateField {
            record_id,
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    /// Start a comment edit, routed to update-existing or create-first
    /// depending on the record's `comment_id`.
    pub fn begin_comment_edit(&mut self, record_id: u64, text: &str) -> Option<MutationCommand> {
        if self.mutation_in_flight {
            return None;
        }
        let record = self.records.iter().find(|r| r.id() == record_id)?;
        let command = match record.comment_id() {
            Some(comment_id) => MutationCommand::UpdateComment {
                comment_id,
                text: text.to_string(),
            },
            None => MutationCommand::CreateComment {
                record_id,
                text: text.to_string(),
            },
        };
        self.mutation_in_flight = true;
        Some(command)
    }

    /// Complete an edit mutation. Always releases the in-flight flag and
    /// always returns the resynchronizing refetch for the active filter;
    /// a failure additionally records the user-facing message.
    pub fn finish_mutation(
        &mut self,
        result: Result<(), ApiFailure>,
        filter: &FilterContext,
    ) -> FetchPlan {
        self.mutation_in_flight = false;
        if let Err(err) = result {
            self.mutation_error = Some(err.user_message());
        }
        self.fetch_plan(filter)
    }

    /// Start the inline create flow. Validation runs first and blocks the
    /// server call entirely when a required field is missing.
    pub fn begin_create(
        &mut self,
        title: &str,
        end_date: &str,
        task_id: Option<u64>,
        require_task: bool,
    ) -> CreateAttempt {
        let validation = DraftValidation::check(title, end_date, task_id, require_task);
        if !validation.ok() {
            return CreateAttempt::Invalid(validation);
        }
        if self.mutation_in_flight {
            return CreateAttempt::Busy;
        }
        self.mutation_in_flight = true;
        CreateAttempt::Ready
    }

    /// Complete the create call. Success reloads the current page and
    /// closes the add-row; failure records the message and leaves the row
    /// open so the user does not lose input.
    pub fn finish_create(
        &mut self,
        result: Result<(), ApiFailure>,
        filter: &FilterContext,
    ) -> CreateOutcome {
        self.mutation_in_flight = false;
        match result {
            Ok(()) => CreateOutcome {
                refetch: Some(self.fetch_plan(filter)),
                close_row: true,
            },
            Err(err) => {
                self.mutation_error = Some(err.user_message());
                CreateOutcome {
                    refetch: None,
                    close_row: false,
                }
            }
        }
    }

    fn has_record(&self, record_id: u64) -> bool {
        self.records.iter().any(|r| r.id() == record_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: u64,
        comment_id: Option<u64>,
    }

    impl CollectionRecord for Row {
        fn id(&self) -> u64 {
            self.id
        }
        fn comment_id(&self) -> Option<u64> {
            self.comment_id
        }
    }

    fn meta(current_page: u32, total_pages: u32, total_count: u64) -> PageMeta {
        PageMeta {
            current_page,
            total_pages,
            total_count,
        }
    }

    fn loaded_view() -> CollectionView<Row> {
        let mut view = CollectionView::new(10);
        view.load_started();
        view.load_finished(Ok((
            vec![
                Row { id: 1, comment_id: None },
                Row { id: 2, comment_id: Some(77) },
            ],
            meta(1, 3, 25),
        )));
        view
    }

    #[test]
    fn test_filter_precedence() {
        let filter = FilterContext::resolve(Some("prio=high".into()), Some("open".into()));
        assert_eq!(filter, FilterContext::Structured("prio=high".into()));
        let filter = FilterContext::resolve(Some("  ".into()), Some("open".into()));
        assert_eq!(filter, FilterContext::Status("open".into()));
        assert_eq!(FilterContext::resolve(None, None), FilterContext::None);
    }

    #[test]
    fn test_load_failure_falls_back_to_empty() {
        let mut view = loaded_view();
        view.load_started();
        view.load_finished(Err(ApiFailure::transport("decode error")));
        assert!(view.records().is_empty());
        assert_eq!(view.load_error(), Some("decode error"));
        assert!(!view.is_loading());
    }

    #[test]
    fn test_load_resyncs_page_index_from_server() {
        let mut view = loaded_view();
        view.set_page(2);
        // Server reports we actually landed on page 2 (1-based) after a
        // record was deleted and the pages shifted.
        view.load_finished(Ok((vec![Row { id: 9, comment_id: None }], meta(2, 2, 11))));
        assert_eq!(view.page_index(), 1);
        assert_eq!(view.meta().total_pages, 2);
    }

    #[test]
    fn test_single_mutation_in_flight() {
        let mut view = loaded_view();
        let first = view.begin_edit(1, "status", "closed");
        assert!(first.is_some());
        // Second edit while the first is unresolved is a no-op
        assert_eq!(view.begin_edit(2, "title", "x"), None);
        assert_eq!(view.begin_comment_edit(1, "hi"), None);
        assert_eq!(view.begin_create("t", "2025-01-01", Some(1), true), CreateAttempt::Busy);
        // Completion releases the flag
        view.finish_mutation(Ok(()), &FilterContext::None);
        assert!(view.begin_edit(2, "title", "x").is_some());
    }

    #[test]
    fn test_edit_unknown_record_ignored() {
        let mut view = loaded_view();
        assert_eq!(view.begin_edit(99, "status", "closed"), None);
        assert!(!view.is_updating());
    }

    #[test]
    fn test_refetch_after_edit_honors_structured_filter() {
        let mut view = loaded_view();
        view.begin_edit(1, "priority", "high").unwrap();
        let filter = FilterContext::Structured("assignee=3".into());
        let plan = view.finish_mutation(Ok(()), &filter);
        assert_eq!(
            plan,
            FetchPlan::Structured {
                query: "assignee=3".into(),
                page: 1,
                page_size: 10,
            }
        );
    }

    #[test]
    fn test_failed_edit_still_refetches_and_records_message() {
        let mut view = loaded_view();
        view.begin_edit(1, "status", "closed").unwrap();
        let plan = view.finish_mutation(
            Err(ApiFailure::server("status transition not allowed")),
            &FilterContext::Status("open".into()),
        );
        assert_eq!(
            plan,
            FetchPlan::Status {
                status: "open".into(),
                page: 1,
                page_size: 10,
            }
        );
        assert_eq!(
            view.take_mutation_error().as_deref(),
            Some("status transition not allowed")
        );
        assert!(!view.is_updating());
    }

    #[test]
    fn test_comment_edit_routing() {
        let mut view = loaded_view();
        // No comment yet: create scoped to the record
        let cmd = view.begin_comment_edit(1, "first note").unwrap();
        assert_eq!(
            cmd,
            MutationCommand::CreateComment {
                record_id: 1,
                text: "first note".into(),
            }
        );
        view.finish_mutation(Ok(()), &FilterContext::None);
        // Existing comment: update it
        let cmd = view.begin_comment_edit(2, "edited").unwrap();
        assert_eq!(
            cmd,
            MutationCommand::UpdateComment {
                comment_id: 77,
                text: "edited".into(),
            }
        );
    }

    #[test]
    fn test_validation_blocks_submission() {
        let mut view = loaded_view();
        let attempt = view.begin_create("", "2025-01-01", Some(42), true);
        match attempt {
            CreateAttempt::Invalid(v) => {
                assert!(v.title_missing);
                assert!(!v.end_date_missing);
                assert!(!v.task_missing);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        // No command was handed out, so no call can have been made
        assert!(!view.is_updating());
    }

    #[test]
    fn test_round_trip_create() {
        let mut view = loaded_view();
        let attempt = view.begin_create("Fix bug", "2025-01-01", Some(42), true);
        assert_eq!(attempt, CreateAttempt::Ready);
        let outcome = view.finish_create(Ok(()), &FilterContext::None);
        assert!(outcome.close_row);
        assert_eq!(
            outcome.refetch,
            Some(FetchPlan::Plain { page: 1, page_size: 10 })
        );
    }

    #[test]
    fn test_failed_create_keeps_row_open() {
        let mut view = loaded_view();
        assert_eq!(view.begin_create("Fix bug", "2025-01-01", Some(42), true), CreateAttempt::Ready);
        let outcome = view.finish_create(Err(ApiFailure::default()), &FilterContext::None);
        assert!(!outcome.close_row);
        assert_eq!(outcome.refetch, None);
        assert_eq!(
            view.take_mutation_error().as_deref(),
            Some(crate::message::FALLBACK_MESSAGE)
        );
        assert!(!view.is_updating());
    }

    #[test]
    fn test_form_flow_does_not_require_task() {
        let v = DraftValidation::check("Fix bug", "2025-01-01", None, false);
        assert!(v.ok());
        let v = DraftValidation::check("Fix bug", "", None, false);
        assert!(v.end_date_missing);
        assert!(!v.ok());
    }
}
