//! Movie entity and its request DTOs.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Backend-assigned movie identifier (UUID string or ObjectId hex).
pub type MovieId = String;

/// Earliest release year accepted on input.
pub const MIN_YEAR: i32 = 1888;

/// Latest release year accepted on input.
pub const MAX_YEAR: i32 = 2100;

/// Upper bound for the optional rating.
pub const MAX_RATE: f64 = 10.0;

/// A stored movie, as returned by every backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    pub poster: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

/// DTO for creating a movie. Every field but `rate` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewMovie {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(range(min = MIN_YEAR, max = MAX_YEAR))]
    pub year: i32,
    #[validate(length(min = 1, message = "director must not be empty"))]
    pub director: String,
    #[validate(range(min = 1, message = "duration must be a positive number of minutes"))]
    pub duration: i32,
    #[validate(url(message = "poster must be a valid URL"))]
    pub poster: String,
    #[validate(
        length(min = 1, message = "genre must contain at least one entry"),
        custom(function = "validate_genres")
    )]
    pub genre: Vec<String>,
    #[validate(range(min = 0.0, max = MAX_RATE))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

impl NewMovie {
    /// Attach an identifier, producing the record a backend stores.
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            year: self.year,
            director: self.director,
            duration: self.duration,
            poster: self.poster,
            genre: self.genre,
            rate: self.rate,
        }
    }
}

/// DTO for partially updating a movie.
///
/// Absent fields are left untouched. A supplied `genre` replaces the whole
/// list rather than merging into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct MoviePatch {
    #[validate(length(min = 1, message = "title must not be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(range(min = MIN_YEAR, max = MAX_YEAR))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[validate(length(min = 1, message = "director must not be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[validate(range(min = 1, message = "duration must be a positive number of minutes"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[validate(url(message = "poster must be a valid URL"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[validate(
        length(min = 1, message = "genre must contain at least one entry"),
        custom(function = "validate_genres")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[validate(range(min = 0.0, max = MAX_RATE))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

impl MoviePatch {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.director.is_none()
            && self.duration.is_none()
            && self.poster.is_none()
            && self.genre.is_none()
            && self.rate.is_none()
    }
}

impl Movie {
    /// Merge the supplied fields of `patch` into this movie.
    pub fn apply(&mut self, patch: MoviePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(director) = patch.director {
            self.director = director;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(poster) = patch.poster {
            self.poster = poster;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(rate) = patch.rate {
            self.rate = Some(rate);
        }
    }
}

#[allow(clippy::ptr_arg)]
fn validate_genres(genres: &Vec<String>) -> Result<(), ValidationError> {
    if genres.iter().any(|g| g.trim().is_empty()) {
        let mut err = ValidationError::new("genre_blank");
        err.message = Some("genre entries must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deadpool() -> NewMovie {
        NewMovie {
            title: "Deadpool 3".to_string(),
            year: 2024,
            director: "Shawn Levy".to_string(),
            duration: 1000,
            poster: "https://www.imdb.com/title/tt6264654/".to_string(),
            genre: vec!["Action".into(), "Comedy".into(), "Sci-Fi".into()],
            rate: None,
        }
    }

    #[test]
    fn valid_new_movie_passes() {
        assert!(deadpool().validate().is_ok());
    }

    #[test]
    fn empty_genre_list_is_rejected() {
        let mut movie = deadpool();
        movie.genre.clear();
        let errors = movie.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("genre"));
    }

    #[test]
    fn blank_genre_entry_is_rejected() {
        let mut movie = deadpool();
        movie.genre.push("  ".into());
        let errors = movie.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("genre"));
    }

    #[test]
    fn poster_must_be_url() {
        let mut movie = deadpool();
        movie.poster = "not a url".into();
        let errors = movie.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("poster"));
    }

    #[test]
    fn rate_out_of_range_is_rejected() {
        let mut movie = deadpool();
        movie.rate = Some(11.5);
        assert!(movie.validate().is_err());
    }

    #[test]
    fn missing_fields_fail_deserialization() {
        let result = serde_json::from_str::<NewMovie>("{}");
        assert!(result.is_err());
    }

    #[test]
    fn empty_patch_is_valid_and_empty() {
        let patch: MoviePatch = serde_json::from_str("{}").unwrap();
        assert!(patch.validate().is_ok());
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_rules_apply_to_present_fields() {
        let patch = MoviePatch {
            year: Some(1200),
            ..Default::default()
        };
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("year"));
    }

    #[test]
    fn apply_merges_only_supplied_fields() {
        let mut movie = deadpool().into_movie("abc".into());
        movie.apply(MoviePatch {
            title: Some("Deadpool & Wolverine".into()),
            duration: Some(1234),
            ..Default::default()
        });

        assert_eq!(movie.id, "abc");
        assert_eq!(movie.title, "Deadpool & Wolverine");
        assert_eq!(movie.duration, 1234);
        assert_eq!(movie.director, "Shawn Levy");
        assert_eq!(movie.genre.len(), 3);
    }

    #[test]
    fn apply_replaces_genre_wholesale() {
        let mut movie = deadpool().into_movie("abc".into());
        movie.apply(MoviePatch {
            genre: Some(vec!["Drama".into()]),
            ..Default::default()
        });
        assert_eq!(movie.genre, vec!["Drama".to_string()]);
    }

    #[test]
    fn patch_serialization_skips_absent_fields() {
        let patch = MoviePatch {
            title: Some("X".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "X" }));
    }
}
