//! Per-visitor application state: the page selector plus the submission and
//! gallery workflows, driven by explicit [`Command`]s.

pub mod nav;

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::gallery::{ArtworkCard, ListError, ListingWorkflow};
use crate::store::SharedStore;
use crate::submission::{ArtworkForm, SubmissionError, SubmissionWorkflow};

pub use nav::{Navigator, Page};

/// Everything a visitor can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate(Page),
    Edit(ArtworkForm),
    Submit(ArtworkForm),
    /// Leave the confirmation view for a fresh, empty form.
    SubmitAnother,
    /// Jump from the confirmation view to the gallery.
    ViewGallery,
    /// "Try again" on a failed gallery load.
    Retry,
    ImageFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Navigated(Page),
    /// Navigated to the gallery and ran (or retried) its load. Carries the
    /// cards from that load, not from any load that finished after it.
    Listed(Result<Vec<ArtworkCard>, ListError>),
    Edited(bool),
    Submitted(Result<(), SubmissionError>),
    Reset(bool),
    ImageMarked(bool),
}

pub struct App {
    nav: Mutex<Navigator>,
    submission: SubmissionWorkflow,
    listing: ListingWorkflow,
}

impl App {
    pub fn new(store: SharedStore) -> Self {
        Self {
            nav: Mutex::new(Navigator::new()),
            submission: SubmissionWorkflow::new(store.clone()),
            listing: ListingWorkflow::new(store),
        }
    }

    pub fn current_page(&self) -> Page {
        self.nav().current()
    }

    pub fn submission(&self) -> &SubmissionWorkflow {
        &self.submission
    }

    pub fn listing(&self) -> &ListingWorkflow {
        &self.listing
    }

    pub async fn dispatch(&self, command: Command) -> Outcome {
        match command {
            Command::Navigate(Page::Gallery) | Command::ViewGallery => {
                self.navigate(Page::Gallery);
                let loaded = self.listing.load().await;
                Outcome::Listed(loaded.map(|items| self.listing.cards_for(&items)))
            }
            Command::Navigate(page) => {
                self.navigate(page);
                Outcome::Navigated(page)
            }
            Command::Edit(form) => Outcome::Edited(self.submission.edit(form)),
            Command::Submit(form) => {
                self.navigate(Page::Submit);
                Outcome::Submitted(self.submission.submit(form).await)
            }
            Command::SubmitAnother => {
                self.navigate(Page::Submit);
                Outcome::Reset(self.submission.reset())
            }
            Command::Retry => {
                self.navigate(Page::Gallery);
                let retried = self.listing.retry().await;
                Outcome::Listed(retried.map(|items| self.listing.cards_for(&items)))
            }
            Command::ImageFailed(id) => Outcome::ImageMarked(self.listing.mark_image_failed(&id)),
        }
    }

    fn navigate(&self, to: Page) {
        let previous = self.nav().navigate(to);
        if previous != to {
            tracing::trace!("Navigated {} -> {}", previous.id(), to.id());
        }
    }

    fn nav(&self) -> MutexGuard<'_, Navigator> {
        self.nav.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
