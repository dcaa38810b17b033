//! Genre lists stored as delimited text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator used when a genre list is persisted as a single column.
pub const GENRE_DELIMITER: char = ',';

/// Rejected genre input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenreError {
    #[error("genre '{0}' contains the ',' delimiter")]
    ContainsDelimiter(String),

    #[error("genre names cannot be blank")]
    Blank,
}

/// An ordered, de-duplicated set of genre names.
///
/// No genre contains [`GENRE_DELIMITER`], so `parse_stored(to_stored())` is
/// lossless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genres(Vec<String>);

impl Genres {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a genre set from user input, rejecting blank values and values
    /// containing the delimiter. Duplicates keep their first position.
    pub fn try_from_values<I, S>(values: I) -> Result<Self, GenreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut genres = Self::new();
        for value in values {
            let value = value.as_ref().trim();
            if value.is_empty() {
                return Err(GenreError::Blank);
            }
            if value.contains(GENRE_DELIMITER) {
                return Err(GenreError::ContainsDelimiter(value.to_string()));
            }
            genres.push_unique(value);
        }
        Ok(genres)
    }

    /// Parses the stored column value. Empty segments are skipped.
    pub fn parse_stored(text: &str) -> Self {
        let mut genres = Self::new();
        for part in text.split(GENRE_DELIMITER) {
            let part = part.trim();
            if !part.is_empty() {
                genres.push_unique(part);
            }
        }
        genres
    }

    /// Renders the column value.
    pub fn to_stored(&self) -> String {
        self.0.join(&GENRE_DELIMITER.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.0.iter().any(|g| g == genre)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    fn push_unique(&mut self, genre: &str) {
        if !self.contains(genre) {
            self.0.push(genre.to_string());
        }
    }
}

impl std::fmt::Display for Genres {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_stored())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_text_round_trips() {
        let genres = Genres::try_from_values(["Jazz", "Blues", "Folk"]).unwrap();
        assert_eq!(genres.to_stored(), "Jazz,Blues,Folk");
        assert_eq!(Genres::parse_stored(&genres.to_stored()), genres);
    }

    #[test]
    fn rejects_values_containing_delimiter() {
        let err = Genres::try_from_values(["Rock,Pop"]).unwrap_err();
        assert_eq!(err, GenreError::ContainsDelimiter("Rock,Pop".to_string()));
    }

    #[test]
    fn rejects_blank_values() {
        assert_eq!(Genres::try_from_values(["Jazz", "  "]), Err(GenreError::Blank));
    }

    #[test]
    fn duplicates_keep_first_position() {
        let genres = Genres::try_from_values(["Jazz", "Soul", "Jazz"]).unwrap();
        assert_eq!(genres.as_slice(), ["Jazz", "Soul"]);
    }

    #[test]
    fn parse_skips_empty_segments() {
        let genres = Genres::parse_stored(" Jazz,, Reggae ,");
        assert_eq!(genres.as_slice(), ["Jazz", "Reggae"]);
        assert!(Genres::parse_stored("").is_empty());
    }

    #[test]
    fn serializes_as_list() {
        let genres = Genres::try_from_values(["Hip-Hop"]).unwrap();
        assert_eq!(serde_json::to_string(&genres).unwrap(), r#"["Hip-Hop"]"#);
    }
}
