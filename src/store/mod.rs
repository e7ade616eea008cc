//! Seam between the workflows and the hosted art store.
//!
//! The store owns persistence, ordering and authoritative validation. This
//! side only issues the two calls the site needs and reports failures as a
//! message the views can show.

pub mod rest;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{ArtSubmission, ArtSubmissionInput};

pub use rest::RestStore;

pub type SharedStore = Arc<dyn ArtStore>;

#[async_trait]
pub trait ArtStore: Send + Sync {
    /// Insert one artwork. The store assigns `id` and `created_at`.
    async fn insert(&self, record: &ArtSubmissionInput) -> Result<(), StoreError>;

    /// Every artwork, newest `created_at` first.
    async fn select_all(&self) -> Result<Vec<ArtSubmission>, StoreError>;
}

/// What went wrong talking to the store. Only used for logging; the views
/// treat every kind the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Transport,
    Rejected { status: u16 },
    Decode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: Option<String>,
}

impl StoreError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Transport, Some(message.into()))
    }

    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::new(StoreErrorKind::Rejected { status }, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Decode, Some(message.into()))
    }

    fn new(kind: StoreErrorKind, message: Option<String>) -> Self {
        let message = message.filter(|m| !m.trim().is_empty());
        Self { kind, message }
    }

    /// The store's own message, or `fallback` when it sent none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = self.message.as_deref().unwrap_or("no message");
        match self.kind {
            StoreErrorKind::Transport => write!(f, "Store unreachable: {message}"),
            StoreErrorKind::Rejected { status } => {
                write!(f, "Store rejected request ({status}): {message}")
            }
            StoreErrorKind::Decode => write!(f, "Unreadable store response: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}
