//! Dependent Selection Chain
//!
//! A linear sequence of remote-backed selects (Project -> Milestone ->
//! Task -> Subtask) where each selection scopes the next stage's option
//! fetch. Changing stage i clears every stage after it and schedules a
//! fetch for stage i+1 only; fetch responses are tagged with the scoping
//! id they were issued for and discarded when that id no longer matches
//! the current upstream selection.

use crate::message::ApiFailure;

/// One selectable option, projected from a domain record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub id: u64,
    pub label: String,
}

impl SelectOption {
    pub fn new(id: u64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// One level of the chain.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    pub key: &'static str,
    pub selected: Option<u64>,
    pub options: Vec<SelectOption>,
    pub loading: bool,
    pub error: Option<String>,
    /// Pre-seeded stage whose selection is fixed by the caller.
    pub locked: bool,
}

impl Stage {
    fn new(key: &'static str) -> Self {
        Self {
            key,
            selected: None,
            options: Vec::new(),
            loading: false,
            error: None,
            locked: false,
        }
    }

    fn clear(&mut self) {
        self.selected = None;
        self.options.clear();
        self.loading = false;
        self.error = None;
    }
}

/// Fetch the caller must issue for a downstream stage.
///
/// `scope_id` is the upstream selection the fetch is scoped to; it must
/// be passed back to [`DependentChain::apply_options`] so stale responses
/// can be discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchSpec {
    pub stage_index: usize,
    pub scope_id: u64,
}

/// The chain state machine.
#[derive(Clone, Debug, PartialEq)]
pub struct DependentChain {
    stages: Vec<Stage>,
}

impl DependentChain {
    pub fn new(keys: &[&'static str]) -> Self {
        Self {
            stages: keys.iter().map(|k| Stage::new(k)).collect(),
        }
    }

    /// Chain whose first stage is fixed to an externally supplied id
    /// (e.g. opened from within an already-known project). The stage is
    /// locked against user edits; the returned spec is the initial fetch
    /// for stage 1, exactly as if the user had selected the seed.
    pub fn seeded(keys: &[&'static str], first_id: u64) -> (Self, Option<FetchSpec>) {
        let mut chain = Self::new(keys);
        chain.stages[0].selected = Some(first_id);
        chain.stages[0].locked = true;
        let spec = if chain.stages.len() > 1 {
            chain.stages[1].loading = true;
            Some(FetchSpec {
                stage_index: 1,
                scope_id: first_id,
            })
        } else {
            None
        };
        (chain, spec)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, key: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.key == key)
    }

    pub fn selection(&self, key: &str) -> Option<u64> {
        self.stage(key).and_then(|s| s.selected)
    }

    pub fn key_of(&self, stage_index: usize) -> Option<&'static str> {
        self.stages.get(stage_index).map(|s| s.key)
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.key == key)
    }

    /// Select (or clear) the value at a stage.
    ///
    /// Clears every stage after it and returns the fetch the caller must
    /// issue for the next stage, if any. Selecting on an unknown key or a
    /// locked stage is a no-op.
    pub fn set_selection(&mut self, key: &str, id: Option<u64>) -> Option<FetchSpec> {
        let i = self.index_of(key)?;
        if self.stages[i].locked {
            return None;
        }
        self.stages[i].selected = id;
        self.stages[i].error = None;
        for stage in &mut self.stages[i + 1..] {
            stage.clear();
        }
        let scope_id = id?;
        if i + 1 < self.stages.len() {
            self.stages[i + 1].loading = true;
            Some(FetchSpec {
                stage_index: i + 1,
                scope_id,
            })
        } else {
            None
        }
    }

    /// Mark the first (unscoped) stage as loading its option list.
    pub fn root_fetch_started(&mut self) {
        if let Some(stage) = self.stages.first_mut() {
            stage.loading = true;
        }
    }

    /// Apply the option list for the first stage. No scoping id exists at
    /// the root, so nothing is discarded here.
    pub fn apply_root_options(&mut self, result: Result<Vec<SelectOption>, ApiFailure>) {
        if let Some(stage) = self.stages.first_mut() {
            Self::store_result(stage, result);
        }
    }

    /// Apply a fetch result for a downstream stage.
    ///
    /// The response is discarded silently when `scope_id` no longer equals
    /// the upstream stage's current selection (a later selection superseded
    /// the fetch). On error the stage keeps empty options and records the
    /// user message; there is no automatic retry.
    pub fn apply_options(
        &mut self,
        stage_index: usize,
        scope_id: u64,
        result: Result<Vec<SelectOption>, ApiFailure>,
    ) {
        if stage_index == 0 || stage_index >= self.stages.len() {
            return;
        }
        if self.stages[stage_index - 1].selected != Some(scope_id) {
            return; // stale response
        }
        Self::store_result(&mut self.stages[stage_index], result);
    }

    fn store_result(stage: &mut Stage, result: Result<Vec<SelectOption>, ApiFailure>) {
        stage.loading = false;
        match result {
            Ok(options) => {
                // A previously selected id that the fresh list no longer
                // contains counts as cleared.
                if let Some(sel) = stage.selected {
                    if !options.iter().any(|o| o.id == sel) {
                        stage.selected = None;
                    }
                }
                stage.options = options;
                stage.error = None;
            }
            Err(err) => {
                stage.options.clear();
                stage.error = Some(err.user_message());
            }
        }
    }

    /// Clear every stage back to its initial state, used after a
    /// successful submit or an explicit cancel. A locked seed stage keeps
    /// its id and re-emits its fetch spec so the form can be reused.
    pub fn reset(&mut self) -> Option<FetchSpec> {
        let mut seed = None;
        for (i, stage) in self.stages.iter_mut().enumerate() {
            if stage.locked {
                seed = stage.selected.map(|id| (i, id));
                stage.options.clear();
                stage.loading = false;
                stage.error = None;
            } else {
                stage.clear();
            }
        }
        let (i, scope_id) = seed?;
        if i + 1 < self.stages.len() {
            self.stages[i + 1].loading = true;
            Some(FetchSpec {
                stage_index: i + 1,
                scope_id,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[&str] = &["project", "milestone", "task", "subtask"];

    fn options(ids: &[u64]) -> Vec<SelectOption> {
        ids.iter().map(|&id| SelectOption::new(id, format!("#{id}"))).collect()
    }

    fn chain_with_selections() -> DependentChain {
        let mut chain = DependentChain::new(KEYS);
        chain.apply_root_options(Ok(options(&[1, 2])));
        let spec = chain.set_selection("project", Some(1)).unwrap();
        chain.apply_options(spec.stage_index, spec.scope_id, Ok(options(&[10, 11])));
        let spec = chain.set_selection("milestone", Some(10)).unwrap();
        chain.apply_options(spec.stage_index, spec.scope_id, Ok(options(&[100])));
        let spec = chain.set_selection("task", Some(100)).unwrap();
        chain.apply_options(spec.stage_index, spec.scope_id, Ok(options(&[1000])));
        chain.set_selection("subtask", Some(1000));
        chain
    }

    #[test]
    fn test_selection_schedules_next_stage_only() {
        let mut chain = DependentChain::new(KEYS);
        let spec = chain.set_selection("project", Some(7)).unwrap();
        assert_eq!(spec, FetchSpec { stage_index: 1, scope_id: 7 });
        assert!(chain.stage("milestone").unwrap().loading);
        // Stages further down are not fetched eagerly
        assert!(!chain.stage("task").unwrap().loading);
        // Clearing issues no fetch
        assert_eq!(chain.set_selection("project", None), None);
        assert!(!chain.stage("milestone").unwrap().loading);
    }

    #[test]
    fn test_cascade_clear_downstream() {
        let mut chain = chain_with_selections();
        // Re-selecting at milestone must wipe task and subtask entirely
        let spec = chain.set_selection("milestone", Some(11)).unwrap();
        assert_eq!(spec.scope_id, 11);
        for key in ["task", "subtask"] {
            let stage = chain.stage(key).unwrap();
            assert_eq!(stage.selected, None, "{key} selection survived");
            assert!(stage.options.is_empty(), "{key} options survived");
        }
        // Upstream project is untouched
        assert_eq!(chain.selection("project"), Some(1));
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut chain = DependentChain::new(KEYS);
        chain.apply_root_options(Ok(options(&[1, 2])));
        let first = chain.set_selection("project", Some(1)).unwrap();
        // User re-selects before the first fetch resolves
        let second = chain.set_selection("project", Some(2)).unwrap();
        // Late response for the superseded scope must not land
        chain.apply_options(first.stage_index, first.scope_id, Ok(options(&[10, 11])));
        assert!(chain.stage("milestone").unwrap().options.is_empty());
        assert!(chain.stage("milestone").unwrap().loading);
        // The current scope's response does land
        chain.apply_options(second.stage_index, second.scope_id, Ok(options(&[20])));
        assert_eq!(chain.stage("milestone").unwrap().options, options(&[20]));
        assert!(!chain.stage("milestone").unwrap().loading);
    }

    #[test]
    fn test_fetch_error_is_per_stage() {
        let mut chain = DependentChain::new(KEYS);
        let spec = chain.set_selection("project", Some(1)).unwrap();
        chain.apply_options(spec.stage_index, spec.scope_id, Err(ApiFailure::server("boom")));
        let stage = chain.stage("milestone").unwrap();
        assert_eq!(stage.error.as_deref(), Some("boom"));
        assert!(stage.options.is_empty());
        assert!(!stage.loading);
        // Re-selecting the same upstream value re-triggers the fetch
        let retry = chain.set_selection("project", Some(1)).unwrap();
        assert_eq!(retry.scope_id, 1);
        assert!(chain.stage("milestone").unwrap().loading);
        assert_eq!(chain.stage("milestone").unwrap().error, None);
    }

    #[test]
    fn test_refreshed_options_clear_invalid_selection() {
        let mut chain = chain_with_selections();
        let spec = FetchSpec { stage_index: 2, scope_id: 10 };
        // A fresh task list without the selected id clears the selection
        chain.apply_options(spec.stage_index, spec.scope_id, Ok(options(&[101, 102])));
        assert_eq!(chain.selection("task"), None);
        assert_eq!(chain.stage("task").unwrap().options, options(&[101, 102]));
    }

    #[test]
    fn test_seeded_chain_locks_first_stage() {
        let (mut chain, spec) = DependentChain::seeded(KEYS, 5);
        assert_eq!(spec, Some(FetchSpec { stage_index: 1, scope_id: 5 }));
        assert!(chain.stage("project").unwrap().locked);
        // The seed is not user-editable
        assert_eq!(chain.set_selection("project", Some(6)), None);
        assert_eq!(chain.selection("project"), Some(5));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut chain = chain_with_selections();
        assert_eq!(chain.reset(), None);
        for stage in chain.stages() {
            assert_eq!(stage.selected, None);
            assert!(stage.options.is_empty());
        }
    }

    #[test]
    fn test_reset_keeps_seed_and_refetches() {
        let (mut chain, spec) = DependentChain::seeded(KEYS, 5);
        let spec = spec.unwrap();
        chain.apply_options(spec.stage_index, spec.scope_id, Ok(options(&[10])));
        chain.set_selection("milestone", Some(10));
        let refetch = chain.reset().unwrap();
        assert_eq!(refetch, FetchSpec { stage_index: 1, scope_id: 5 });
        assert_eq!(chain.selection("project"), Some(5));
        assert_eq!(chain.selection("milestone"), None);
    }
}
