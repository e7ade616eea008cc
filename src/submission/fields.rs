use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::models::ArtSubmissionInput;

/// Same shape browsers accept for `<input type="email">`.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// The five editable values of the submission form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkForm {
    pub title: String,
    pub creator_name: String,
    pub email: String,
    pub description: String,
    pub artwork_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    CreatorName,
    Email,
    Description,
    ArtworkUrl,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::CreatorName => "creator_name",
            Field::Email => "email",
            Field::Description => "description",
            Field::ArtworkUrl => "artwork_url",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Artwork title",
            Field::CreatorName => "Your name",
            Field::Email => "Email address",
            Field::Description => "Description",
            Field::ArtworkUrl => "Artwork image URL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required(Field),
    InvalidEmail,
    InvalidUrl,
}

impl FieldError {
    pub fn field(self) -> Field {
        match self {
            FieldError::Required(field) => field,
            FieldError::InvalidEmail => Field::Email,
            FieldError::InvalidUrl => Field::ArtworkUrl,
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::Required(field) => write!(f, "{} is required", field.label()),
            FieldError::InvalidEmail => write!(f, "Please enter a valid email address"),
            FieldError::InvalidUrl => {
                write!(f, "Please enter a full image link starting with http:// or https://")
            }
        }
    }
}

impl ArtworkForm {
    /// Client-side checks run before the store is contacted. The store stays
    /// the authority; passing here only means the insert is worth attempting.
    pub fn validate(&self) -> Result<ArtSubmissionInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = required(&self.title, Field::Title, &mut errors);
        let creator_name = required(&self.creator_name, Field::CreatorName, &mut errors);

        let email = required(&self.email, Field::Email, &mut errors);
        if !email.is_empty() && !is_email(email) {
            errors.push(FieldError::InvalidEmail);
        }

        let artwork_url = required(&self.artwork_url, Field::ArtworkUrl, &mut errors);
        if !artwork_url.is_empty() && !is_url(artwork_url) {
            errors.push(FieldError::InvalidUrl);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let description = self.description.trim();
        Ok(ArtSubmissionInput {
            title: title.to_string(),
            creator_name: creator_name.to_string(),
            email: email.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            artwork_url: artwork_url.to_string(),
        })
    }
}

fn required<'a>(value: &'a str, field: Field, errors: &mut Vec<FieldError>) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::Required(field));
    }
    value
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Absolute http(s) URL with a host.
pub fn is_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
