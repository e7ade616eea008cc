pub mod artwork;
pub mod contact;

pub use artwork::{ART_SUBMISSIONS_TABLE, ArtSubmission, ArtSubmissionInput};
pub use contact::{CONTACT_MESSAGES_TABLE, ContactMessage};
