//! Move-request reconciliation: the form model behind scheduling, editing
//! and (re)assigning bin moves, and the submit flow that turns it into
//! backend calls.
//!
//! A submission either completes, fails, or pauses on a route conflict with
//! a [`PendingOperation`] that [`MoveRequestEditor::resolve`] resumes once
//! the operator has chosen how to handle the driver's live route.

pub mod api;
pub mod cache;
pub mod conflict;
pub mod editor;
pub mod error;
pub mod form;
pub mod pending;
pub mod picker;

pub use api::MoveRequestApi;
pub use cache::{collections_for_event, CacheInvalidator, Collection, QueryCache};
pub use conflict::{classify_error, ErrorClass, InProgressConflict};
pub use editor::{AssignmentFailure, CreateReport, MoveRequestEditor, SubmitOutcome};
pub use error::{SubmitError, ValidationError};
pub use form::{
    AssignmentChoice, AssignmentTarget, BinTarget, DatePreset, DestinationDraft, EntryMode,
    MoveDetails, MoveDraft, MoveFields, MoveForm, SubmitTargets, ValidatedForm,
};
pub use pending::{PendingOperation, Resolution, Resume};
pub use picker::{load_picker, ShiftInsertion, ShiftMode, ShiftPicker};
