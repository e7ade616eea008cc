pub mod card;
pub mod workflow;

pub use card::{ArtworkCard, FALLBACK_IMAGE_URL};
pub use workflow::{LOAD_FALLBACK_MESSAGE, ListError, ListingState, ListingWorkflow};
