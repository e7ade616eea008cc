use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::ArtSubmission;
use crate::store::SharedStore;

use super::card::ArtworkCard;

pub const LOAD_FALLBACK_MESSAGE: &str = "Failed to load artworks";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingState {
    Loading,
    /// An empty list is the "no artworks yet" view, not an error.
    Loaded(Vec<ArtSubmission>),
    Errored(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    Store(String),
    /// `retry` was called while not in the errored state.
    NotRetryable,
}

impl std::fmt::Display for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListError::Store(msg) => write!(f, "{msg}"),
            ListError::NotRetryable => write!(f, "Gallery is not in an error state"),
        }
    }
}

impl std::error::Error for ListError {}

struct Inner {
    state: ListingState,
    /// Ids whose image failed to render. Kept across reloads for as long as
    /// the artwork is still listed, so later pages serve the placeholder.
    broken_images: HashSet<String>,
    /// Bumped on every load so a slower, older fetch cannot overwrite a newer one.
    generation: u64,
}

/// Fetch-all listing of the gallery. Every load pulls the whole table.
pub struct ListingWorkflow {
    store: SharedStore,
    inner: Mutex<Inner>,
}

impl ListingWorkflow {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            inner: Mutex::new(Inner {
                state: ListingState::Loading,
                broken_images: HashSet::new(),
                generation: 0,
            }),
        }
    }

    pub fn state(&self) -> ListingState {
        self.lock().state.clone()
    }

    pub async fn load(&self) -> Result<Vec<ArtSubmission>, ListError> {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = ListingState::Loading;
            inner.generation
        };

        let result = self.store.select_all().await;

        let (state, outcome) = match result {
            Ok(mut artworks) => {
                // stable, so equal timestamps keep the store's order
                artworks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                tracing::debug!("Loaded {} artworks", artworks.len());
                (ListingState::Loaded(artworks.clone()), Ok(artworks))
            }
            Err(err) => {
                tracing::warn!("Gallery load failed: {err}");
                let message = err.message_or(LOAD_FALLBACK_MESSAGE);
                (
                    ListingState::Errored(message.clone()),
                    Err(ListError::Store(message)),
                )
            }
        };

        let mut inner = self.lock();
        if inner.generation == generation {
            if let ListingState::Loaded(artworks) = &state {
                let listed: HashSet<&str> = artworks.iter().map(|a| a.id.as_str()).collect();
                inner.broken_images.retain(|id| listed.contains(id.as_str()));
            }
            inner.state = state;
        }

        outcome
    }

    /// User-triggered "Try again". Only valid from the errored state.
    pub async fn retry(&self) -> Result<Vec<ArtSubmission>, ListError> {
        let errored = matches!(self.lock().state, ListingState::Errored(_));
        if !errored {
            return Err(ListError::NotRetryable);
        }
        self.load().await
    }

    /// Record that an artwork's image failed to render. Only that card swaps
    /// to the placeholder; the listing state is untouched.
    pub fn mark_image_failed(&self, id: &str) -> bool {
        let mut inner = self.lock();
        let known = match &inner.state {
            ListingState::Loaded(artworks) => artworks.iter().any(|a| a.id == id),
            ListingState::Loading | ListingState::Errored(_) => false,
        };
        if known {
            inner.broken_images.insert(id.to_string());
        }
        known
    }

    /// Cards for the loaded artworks, in listing order. Empty unless loaded.
    pub fn cards(&self) -> Vec<ArtworkCard> {
        let inner = self.lock();
        match &inner.state {
            ListingState::Loaded(artworks) => card_list(artworks, &inner.broken_images),
            ListingState::Loading | ListingState::Errored(_) => Vec::new(),
        }
    }

    /// Cards for `artworks` as returned by one particular load, with the
    /// recorded image failures applied. Independent of whatever load ran since.
    pub fn cards_for(&self, artworks: &[ArtSubmission]) -> Vec<ArtworkCard> {
        card_list(artworks, &self.lock().broken_images)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn card_list(artworks: &[ArtSubmission], broken_images: &HashSet<String>) -> Vec<ArtworkCard> {
    artworks
        .iter()
        .map(|a| ArtworkCard::new(a, broken_images.contains(&a.id)))
        .collect()
}
