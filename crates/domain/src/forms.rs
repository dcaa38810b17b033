//! Submitted create/edit forms and their conversion into row fields.

use chrono::{DateTime, NaiveDateTime, Utc};
use common::{ArtistId, Genres, VenueId};
use serde::{Deserialize, Serialize};
use store::{Artist, ArtistFields, ShowFields, Venue, VenueFields};

use crate::validation::{LONG_TEXT, SHORT_TEXT, ValidationError, Validator};

/// Two-letter codes accepted in the `state` field.
pub const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Timestamp layout used by the show form's date picker.
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Venue create/edit submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub seeking_talent: bool,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

impl VenueForm {
    /// Validates every field, reporting all problems at once.
    pub fn validate(&self) -> Result<VenueFields, ValidationError> {
        let mut v = Validator::new();
        let name = v.required("name", &self.name, SHORT_TEXT);
        let city = v.required("city", &self.city, SHORT_TEXT);
        let state = validate_state(&mut v, &self.state);
        let address = v.required("address", &self.address, SHORT_TEXT);
        let phone = v.optional_phone("phone", self.phone.as_deref());
        let genres = validate_genres(&mut v, &self.genres);
        let website = v.optional_url("website", self.website.as_deref(), SHORT_TEXT);
        let facebook_link =
            v.optional_url("facebook_link", self.facebook_link.as_deref(), SHORT_TEXT);
        let image_link = v.optional_url("image_link", self.image_link.as_deref(), LONG_TEXT);
        let seeking_description = v.optional(
            "seeking_description",
            self.seeking_description.as_deref(),
            LONG_TEXT,
        );
        v.finish()?;

        Ok(VenueFields {
            name,
            genres,
            address,
            city,
            state,
            phone,
            website,
            facebook_link,
            seeking_talent: self.seeking_talent,
            seeking_description,
            image_link,
        })
    }
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            genres: venue.genres.iter().map(str::to_string).collect(),
            website: venue.website.clone(),
            facebook_link: venue.facebook_link.clone(),
            image_link: venue.image_link.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone(),
        }
    }
}

/// Artist create/edit submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<ArtistFields, ValidationError> {
        let mut v = Validator::new();
        let name = v.required("name", &self.name, SHORT_TEXT);
        let city = v.required("city", &self.city, SHORT_TEXT);
        let state = validate_state(&mut v, &self.state);
        let phone = v.optional_phone("phone", self.phone.as_deref());
        let genres = validate_genres(&mut v, &self.genres);
        let website = v.optional_url("website", self.website.as_deref(), SHORT_TEXT);
        let facebook_link =
            v.optional_url("facebook_link", self.facebook_link.as_deref(), SHORT_TEXT);
        let image_link = v.optional_url("image_link", self.image_link.as_deref(), LONG_TEXT);
        let seeking_description = v.optional(
            "seeking_description",
            self.seeking_description.as_deref(),
            LONG_TEXT,
        );
        v.finish()?;

        Ok(ArtistFields {
            name,
            genres,
            city,
            state,
            phone,
            website,
            facebook_link,
            seeking_venue: self.seeking_venue,
            seeking_description,
            image_link,
        })
    }
}

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            genres: artist.genres.iter().map(str::to_string).collect(),
            website: artist.website.clone(),
            facebook_link: artist.facebook_link.clone(),
            image_link: artist.image_link.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone(),
        }
    }
}

/// Show create/edit submission.
///
/// `start_time` accepts RFC 3339 or `YYYY-MM-DD HH:MM:SS` (read as UTC);
/// when omitted the show starts at the submission instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub venue_id: Option<i64>,
    #[serde(default)]
    pub artist_id: Option<i64>,
    #[serde(default)]
    pub start_time: Option<String>,
}

impl ShowForm {
    /// Validates the form. Whether the referenced rows exist is checked by
    /// the service against the store.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ShowFields, ValidationError> {
        let mut v = Validator::new();
        let venue_id = v.required_id("venue_id", self.venue_id);
        let artist_id = v.required_id("artist_id", self.artist_id);
        let start_time = match self.start_time.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(text) => parse_start_time(text).unwrap_or_else(|| {
                v.reject("start_time", format!("'{text}' is not a valid date and time"));
                now
            }),
        };
        v.finish()?;

        Ok(ShowFields {
            venue_id: VenueId::new(venue_id),
            artist_id: ArtistId::new(artist_id),
            start_time,
        })
    }
}

fn parse_start_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, FORM_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn validate_state(v: &mut Validator, state: &str) -> String {
    let state = state.trim().to_ascii_uppercase();
    if state.is_empty() {
        v.reject("state", "is required");
    } else if !US_STATES.contains(&state.as_str()) {
        v.reject("state", format!("'{state}' is not a US state"));
    }
    state
}

fn validate_genres(v: &mut Validator, values: &[String]) -> Genres {
    if values.is_empty() {
        v.reject("genres", "select at least one genre");
        return Genres::new();
    }
    match Genres::try_from_values(values) {
        Ok(genres) => {
            if genres.to_stored().chars().count() > SHORT_TEXT {
                v.reject("genres", format!("must be at most {SHORT_TEXT} characters"));
            }
            genres
        }
        Err(e) => {
            v.reject("genres", e.to_string());
            Genres::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn venue_form() -> VenueForm {
        VenueForm {
            name: " The Dueling Pianos Bar ".to_string(),
            city: "New York".to_string(),
            state: "ny".to_string(),
            address: "335 Delancey Street".to_string(),
            phone: Some("914-003-1132".to_string()),
            genres: vec!["Classical".to_string(), "R&B".to_string()],
            website: Some("https://www.theduelingpianos.com".to_string()),
            facebook_link: Some(String::new()),
            image_link: None,
            seeking_talent: false,
            seeking_description: None,
        }
    }

    #[test]
    fn valid_venue_form_is_normalized() {
        let fields = venue_form().validate().unwrap();
        assert_eq!(fields.name, "The Dueling Pianos Bar");
        assert_eq!(fields.state, "NY");
        assert_eq!(fields.genres.to_stored(), "Classical,R&B");
        assert_eq!(fields.facebook_link, None);
    }

    #[test]
    fn venue_form_reports_every_bad_field() {
        let form = VenueForm {
            name: String::new(),
            state: "Texas".to_string(),
            genres: vec![],
            website: Some("www.example.com".to_string()),
            ..venue_form()
        };
        let err = form.validate().unwrap_err();
        assert!(err.has_field("name"));
        assert!(err.has_field("state"));
        assert!(err.has_field("genres"));
        assert!(err.has_field("website"));
        assert!(!err.has_field("city"));
    }

    #[test]
    fn genre_containing_delimiter_is_rejected() {
        let form = VenueForm {
            genres: vec!["Rock,Pop".to_string()],
            ..venue_form()
        };
        assert!(form.validate().unwrap_err().has_field("genres"));
    }

    #[test]
    fn artist_form_round_trips_through_row() {
        let form = ArtistForm {
            name: "Matt Quevedo".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            phone: Some("300-400-5000".to_string()),
            genres: vec!["Jazz".to_string()],
            seeking_venue: true,
            ..ArtistForm::default()
        };
        let fields = form.validate().unwrap();
        let artist = Artist::from_fields(ArtistId::new(1), fields);
        assert_eq!(ArtistForm::from(&artist), form);
    }

    #[test]
    fn show_form_requires_both_references() {
        let err = ShowForm::default().validate(Utc::now()).unwrap_err();
        assert!(err.has_field("venue_id"));
        assert!(err.has_field("artist_id"));
    }

    #[test]
    fn show_form_defaults_start_time_to_now() {
        let now = Utc::now();
        let form = ShowForm {
            venue_id: Some(1),
            artist_id: Some(4),
            start_time: None,
        };
        assert_eq!(form.validate(now).unwrap().start_time, now);
    }

    #[test]
    fn show_form_parses_both_time_layouts() {
        let expected = Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap();
        for text in ["2035-04-01 20:00:00", "2035-04-01T20:00:00Z", "2035-04-01T22:00:00+02:00"] {
            let form = ShowForm {
                venue_id: Some(1),
                artist_id: Some(4),
                start_time: Some(text.to_string()),
            };
            assert_eq!(form.validate(Utc::now()).unwrap().start_time, expected);
        }
    }

    #[test]
    fn show_form_rejects_garbage_time() {
        let form = ShowForm {
            venue_id: Some(1),
            artist_id: Some(4),
            start_time: Some("next friday".to_string()),
        };
        assert!(form.validate(Utc::now()).unwrap_err().has_field("start_time"));
    }
}
