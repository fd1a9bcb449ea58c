//! Headless View Orchestration
//!
//! State machines for remote-backed UI flows, shared by the Workboard
//! console. No DOM and no network in here: operations return command
//! descriptors (which fetch or mutation to issue) and accept completion
//! calls that apply the result, so every flow is unit-testable without
//! a browser harness.

pub mod chain;
pub mod collection;
pub mod message;
pub mod pagination;

pub use chain::{DependentChain, FetchSpec, SelectOption, Stage};
pub use collection::{
    CollectionRecord, CollectionView, CreateAttempt, CreateOutcome, DraftValidation,
    FetchPlan, FilterContext, MutationCommand, PageMeta,
};
pub use message::{ApiFailure, FALLBACK_MESSAGE};
