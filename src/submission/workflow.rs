use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::store::SharedStore;

use super::fields::{ArtworkForm, FieldError};

pub const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to submit artwork";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Rejected before the store was contacted.
    Invalid(Vec<FieldError>),
    /// An insert for this form is still outstanding.
    InFlight,
    /// The last submission succeeded and the form has not been reset.
    NotReady,
    /// The store reported a failure; carries the message shown to the user.
    Store(String),
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Invalid(errors) => {
                let joined = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                write!(f, "Invalid submission: {joined}")
            }
            SubmissionError::InFlight => write!(f, "A submission is already in progress"),
            SubmissionError::NotReady => write!(f, "Reset the form before submitting again"),
            SubmissionError::Store(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SubmissionError {}

/// Point-in-time copy of the workflow for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionSnapshot {
    pub state: SubmissionState,
    pub form: ArtworkForm,
    pub field_errors: Vec<FieldError>,
}

/// Drives one submission form against the store.
///
/// `idle -> submitting -> {succeeded | failed}`, `failed -> submitting` on
/// resubmit, and `succeeded -> idle` only through [`reset`](Self::reset).
/// The lock is released before the insert is awaited; the move to
/// `submitting` happens under it, so overlapping triggers see the first one
/// and back off.
pub struct SubmissionWorkflow {
    store: SharedStore,
    inner: Mutex<SubmissionSnapshot>,
}

impl SubmissionWorkflow {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            inner: Mutex::new(SubmissionSnapshot::default()),
        }
    }

    pub fn snapshot(&self) -> SubmissionSnapshot {
        self.lock().clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().state.clone()
    }

    pub fn form(&self) -> ArtworkForm {
        self.lock().form.clone()
    }

    /// Replace the form values. Ignored while submitting or after success.
    pub fn edit(&self, form: ArtworkForm) -> bool {
        let mut inner = self.lock();
        match inner.state {
            SubmissionState::Idle | SubmissionState::Failed(_) => {
                inner.form = form;
                true
            }
            SubmissionState::Submitting | SubmissionState::Succeeded => false,
        }
    }

    /// One insert attempt for `form`. Never retried automatically.
    pub async fn submit(&self, form: ArtworkForm) -> Result<(), SubmissionError> {
        let input = {
            let mut inner = self.lock();
            match inner.state {
                SubmissionState::Submitting => return Err(SubmissionError::InFlight),
                SubmissionState::Succeeded => return Err(SubmissionError::NotReady),
                SubmissionState::Idle | SubmissionState::Failed(_) => {}
            }

            let validated = form.validate();
            inner.form = form;
            match validated {
                Ok(input) => {
                    inner.field_errors.clear();
                    inner.state = SubmissionState::Submitting;
                    input
                }
                Err(errors) => {
                    tracing::debug!("Submission rejected before insert: {errors:?}");
                    inner.field_errors = errors.clone();
                    return Err(SubmissionError::Invalid(errors));
                }
            }
        };

        let result = self.store.insert(&input).await;

        let mut inner = self.lock();
        match result {
            Ok(()) => {
                tracing::info!("Artwork '{}' submitted by {}", input.title, input.creator_name);
                inner.state = SubmissionState::Succeeded;
                inner.form = ArtworkForm::default();
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Artwork submission failed: {err}");
                let message = err.message_or(SUBMIT_FALLBACK_MESSAGE);
                inner.state = SubmissionState::Failed(message.clone());
                Err(SubmissionError::Store(message))
            }
        }
    }

    /// "Submit another": `succeeded -> idle` with every field empty.
    /// Returns false (and changes nothing) from any other state.
    pub fn reset(&self) -> bool {
        let mut inner = self.lock();
        if inner.state != SubmissionState::Succeeded {
            return false;
        }
        *inner = SubmissionSnapshot::default();
        true
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
