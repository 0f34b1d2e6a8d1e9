//! # taskboard-mutation
//!
//! Client-side validation and submission of task and project mutations.
//!
//! - [`TaskDraft`] is the form model; [`validate`] checks it locally and
//!   never touches the network
//! - [`MutationPipeline`] coerces a valid draft into a wire payload, checks
//!   its references against the store snapshot, submits it, and on success
//!   asks the store to refresh rather than patching the snapshot in place.
//!   Moves, deletes and project create/delete take the same refresh path.

#![deny(unsafe_code)]

pub mod draft;
pub mod pipeline;

pub use draft::{Field, TaskDraft, ValidationReport, check_references, normalize_due_date, validate};
pub use pipeline::{Confirmation, DeleteOutcome, MutationPipeline, SubmitError};
