pub mod fields;
pub mod workflow;

pub use fields::{ArtworkForm, Field, FieldError};
pub use workflow::{
    SUBMIT_FALLBACK_MESSAGE, SubmissionError, SubmissionSnapshot, SubmissionState,
    SubmissionWorkflow,
};
