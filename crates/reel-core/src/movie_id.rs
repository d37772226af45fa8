use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The key a movie record is stored under.
///
/// Keys must be valid path segments for the document store: 1-768 bytes,
/// without `.`, `$`, `#`, `[`, `]`, `/` or ASCII control characters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

const MAX_LENGTH: usize = 768;
const FORBIDDEN: [char; 6] = ['.', '$', '#', '[', ']', '/'];

impl MovieId {
    /// Creates a new `MovieId` after validating the input.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Creates a `MovieId` without validation.
    ///
    /// Use this only for keys produced by trusted internal sources
    /// (e.g. key generators that are guaranteed to produce valid output).
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn validate(id: &str) -> Result<(), CoreError> {
        if id.is_empty() || id.len() > MAX_LENGTH {
            return Err(CoreError::InvalidMovieId(format!(
                "length must be between 1 and {} bytes, got {}",
                MAX_LENGTH,
                id.len()
            )));
        }

        if let Some(c) = id
            .chars()
            .find(|c| c.is_ascii_control() || FORBIDDEN.contains(c))
        {
            return Err(CoreError::InvalidMovieId(format!(
                "must not contain {:?}: '{}'",
                c,
                id.escape_debug()
            )));
        }

        Ok(())
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MovieId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for MovieId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
