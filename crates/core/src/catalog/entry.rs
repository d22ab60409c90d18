//! Canonical catalog entry decoded from a single search result record.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::DecodeError;

/// Kind string assumed when a record carries no `kind` key.
const DEFAULT_KIND: &str = "audiobook";

/// The kind of item a catalog entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Album,
    AudioBook,
    Book,
    EBook,
    FeatureMovie,
    MusicVideo,
    Podcast,
    Software,
    Song,
    TvEpisode,
    /// A kind string outside the fixed table.
    Unrecognized,
}

impl CatalogKind {
    /// Map a feed kind string to its variant.
    pub fn from_feed(kind: &str) -> Self {
        match kind {
            "album" => Self::Album,
            "audiobook" => Self::AudioBook,
            "book" => Self::Book,
            "ebook" => Self::EBook,
            "feature-movie" => Self::FeatureMovie,
            "music-video" => Self::MusicVideo,
            "podcast" => Self::Podcast,
            "software" => Self::Software,
            "song" => Self::Song,
            "tv-episode" => Self::TvEpisode,
            _ => Self::Unrecognized,
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Album => "Album",
            Self::AudioBook => "Audio Book",
            Self::Book => "Book",
            Self::EBook => "E-Book",
            Self::FeatureMovie => "Feature Movie",
            Self::MusicVideo => "Music Video",
            Self::Podcast => "Podcast",
            Self::Software => "Software",
            Self::Song => "Song",
            Self::TvEpisode => "TV Episode",
            Self::Unrecognized => "Unknown",
        }
    }
}

/// One decoded catalog record.
///
/// Only the raw feed fields are stored. Display name, price, store URL, genre
/// and type label are resolved on every call from those fields, so they can
/// never drift apart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(default, deserialize_with = "lenient")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    artist_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    currency: String,

    #[serde(default, deserialize_with = "lenient")]
    track_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    track_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    track_view_url: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    collection_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    collection_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    collection_view_url: Option<String>,

    /// Item-level price; present on some kinds, not used by `price()`.
    #[serde(rename = "price", default, deserialize_with = "lenient_price")]
    item_price: Option<f64>,

    #[serde(rename = "artworkUrl60", default, deserialize_with = "lenient_or_default")]
    image_small: String,
    #[serde(rename = "artworkUrl100", default, deserialize_with = "lenient_or_default")]
    image_large: String,

    #[serde(rename = "primaryGenreName", default, deserialize_with = "lenient")]
    primary_genre: Option<String>,
    #[serde(rename = "genres", default, deserialize_with = "lenient")]
    genre_names: Option<Vec<String>>,
}

impl CatalogEntry {
    /// Decode one raw result record.
    ///
    /// Only a record that is not a JSON object is rejected. Missing or
    /// mistyped fields fall back to their defaults.
    pub fn decode(raw: &Value) -> Result<Self, DecodeError> {
        if !raw.is_object() {
            return Err(DecodeError::NotAMapping {
                found: json_type_name(raw),
            });
        }

        // Every field deserializer is infallible, so this only fails on
        // serde_json internals.
        Self::deserialize(raw).map_err(|e| DecodeError::Malformed(e.to_string()))
    }

    /// Track name when non-empty, otherwise the collection name.
    pub fn display_name(&self) -> &str {
        match self.track_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.collection_name.as_deref().unwrap_or(""),
        }
    }

    pub fn price(&self) -> f64 {
        self.track_price.or(self.collection_price).unwrap_or(0.0)
    }

    pub fn store_url(&self) -> &str {
        self.track_view_url
            .as_deref()
            .or(self.collection_view_url.as_deref())
            .unwrap_or("")
    }

    /// Primary genre, or the multi-genre list joined with `", "`.
    pub fn genre(&self) -> String {
        if let Some(genre) = &self.primary_genre {
            return genre.clone();
        }
        match &self.genre_names {
            Some(names) => names.join(", "),
            None => String::new(),
        }
    }

    /// Typed kind. A record without a kind is treated as an audiobook.
    pub fn kind(&self) -> CatalogKind {
        CatalogKind::from_feed(self.kind.as_deref().unwrap_or(DEFAULT_KIND))
    }

    pub fn type_label(&self) -> &'static str {
        self.kind().label()
    }

    /// Raw kind string as sent by the feed.
    pub fn raw_kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn artist(&self) -> &str {
        self.artist_name.as_deref().unwrap_or("")
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// 60px artwork URL, used for grid thumbnails.
    pub fn image_small(&self) -> &str {
        &self.image_small
    }

    /// 100px artwork URL, used by the detail popup.
    pub fn image_large(&self) -> &str {
        &self.image_large
    }

    pub fn item_price(&self) -> Option<f64> {
        self.item_price
    }

    /// Orders entries by display name the way a person would sort them:
    /// case-insensitive, with digit runs compared by numeric value, so
    /// "Track 2" sorts before "track 10".
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        natural_cmp(self.display_name(), other.display_name())
    }
}

fn natural_cmp(left: &str, right: &str) -> Ordering {
    let mut left = left.chars().peekable();
    let mut right = right.chars().peekable();

    loop {
        let ordering = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                let a = take_digits(&mut left);
                let b = take_digits(&mut right);
                let a = a.trim_start_matches('0');
                let b = b.trim_start_matches('0');
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Some(a), Some(b)) => {
                left.next();
                right.next();
                a.to_lowercase().cmp(b.to_lowercase())
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Result - Kind: {}, Name: {}, Artist Name: {}",
            self.kind.as_deref().unwrap_or("None"),
            self.display_name(),
            self.artist_name.as_deref().unwrap_or("None")
        )
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accept any JSON value; keep it only when it has the expected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Prices must be finite and non-negative to count as present.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let price: Option<f64> = lenient(deserializer)?;
    Ok(price.filter(|p| p.is_finite() && *p >= 0.0))
}
