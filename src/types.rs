use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

use crate::error::CoachError;

/// Number of top tracks and top artists requested per listening-history fetch.
pub const TOP_ITEMS_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            height: None,
            width: None,
        }
    }
}

/// Picks the small thumbnail Spotify puts third in its image list, falling
/// back to the first (largest) one.
fn thumbnail(images: &[Image]) -> Option<&str> {
    images
        .get(2)
        .or_else(|| images.first())
        .map(|i| i.url.as_str())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackArtist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    #[serde(default)]
    pub album: AlbumRef,
}

impl Track {
    pub fn new(id: &str, name: &str, artists: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            artists: artists
                .iter()
                .map(|a| TrackArtist {
                    id: None,
                    name: a.to_string(),
                })
                .collect(),
            album: AlbumRef::default(),
        }
    }

    /// Contributing artists joined with `", "`, or `"Unknown"` when empty.
    pub fn joined_artists(&self) -> String {
        if self.artists.is_empty() {
            return "Unknown".to_string();
        }
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }

    pub fn thumbnail(&self) -> Option<&str> {
        thumbnail(&self.album.images)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Artist {
    pub fn new(id: &str, name: &str, genres: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            images: Vec::new(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    pub fn thumbnail(&self) -> Option<&str> {
        thumbnail(&self.images)
    }
}

/// Paged list envelope returned by the top-tracks and top-artists endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Look-back window for listening-history queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    #[default]
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ShortTerm,
        TimeRange::MediumTerm,
        TimeRange::LongTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "Last 4 Weeks",
            TimeRange::MediumTerm => "Last 6 Months",
            TimeRange::LongTerm => "All Time",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "short" | "short_term" => Ok(TimeRange::ShortTerm),
            "medium" | "medium_term" => Ok(TimeRange::MediumTerm),
            "long" | "long_term" => Ok(TimeRange::LongTerm),
            other => Err(format!(
                "invalid time range '{}', expected one of: short, medium, long",
                other
            )),
        }
    }
}

/// Song difficulty on the 1 (beginner) to 5 (expert) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, CoachError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoachError::InvalidInput(format!(
                "difficulty {} is outside {}..={}",
                value,
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn random() -> Self {
        Self(rand::rng().random_range(Self::MIN..=Self::MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Whether a nudge in `direction` stays inside the scale.
    pub fn can_adjust(&self, direction: DifficultyAdjustment) -> bool {
        match direction {
            DifficultyAdjustment::Up => self.0 < Self::MAX,
            DifficultyAdjustment::Down => self.0 > Self::MIN,
        }
    }

    /// Filled and empty stars, e.g. `★★★☆☆` for 3.
    pub fn stars(&self) -> String {
        (Self::MIN..=Self::MAX)
            .map(|s| if s <= self.0 { '★' } else { '☆' })
            .collect()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyAdjustment {
    Up,
    Down,
}

impl fmt::Display for DifficultyAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyAdjustment::Up => f.write_str("up"),
            DifficultyAdjustment::Down => f.write_str("down"),
        }
    }
}

/// Target of a "generate something similar to this" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimilarSeed {
    Track {
        name: String,
        artist_name: Option<String>,
    },
    Artist {
        name: String,
    },
}

impl SimilarSeed {
    pub fn kind(&self) -> &'static str {
        match self {
            SimilarSeed::Track { .. } => "track",
            SimilarSeed::Artist { .. } => "artist",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SimilarSeed::Track { name, .. } | SimilarSeed::Artist { name } => name,
        }
    }

    pub fn artist_name(&self) -> Option<&str> {
        match self {
            SimilarSeed::Track { artist_name, .. } => artist_name.as_deref(),
            SimilarSeed::Artist { .. } => None,
        }
    }
}

/// A track or artist the user picked in the Find Songs view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedItem {
    Track {
        name: String,
        artists: String,
        primary_artist: Option<String>,
    },
    Artist {
        name: String,
    },
}

impl SelectedItem {
    pub fn from_track(track: &Track) -> Self {
        SelectedItem::Track {
            name: track.name.clone(),
            artists: track.joined_artists(),
            primary_artist: track.primary_artist().map(str::to_string),
        }
    }

    pub fn from_artist(artist: &Artist) -> Self {
        SelectedItem::Artist {
            name: artist.name.clone(),
        }
    }

    pub fn to_seed(&self) -> SimilarSeed {
        match self {
            SelectedItem::Track {
                name,
                primary_artist,
                ..
            } => SimilarSeed::Track {
                name: name.clone(),
                artist_name: primary_artist.clone(),
            },
            SelectedItem::Artist { name } => SimilarSeed::Artist { name: name.clone() },
        }
    }

    /// Two selections match when they have the same kind and name.
    pub fn same_target(&self, other: &SelectedItem) -> bool {
        match (self, other) {
            (SelectedItem::Track { name: a, .. }, SelectedItem::Track { name: b, .. }) => a == b,
            (SelectedItem::Artist { name: a }, SelectedItem::Artist { name: b }) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateSongRequest<'a> {
    pub top_tracks: &'a [Track],
    pub top_artists: &'a [Artist],
    pub current_difficulty: Difficulty,
    pub adjust_difficulty: Option<DifficultyAdjustment>,
    pub previous_songs: &'a [String],
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateSimilarRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'a str,
    pub artist_name: Option<&'a str>,
    pub current_difficulty: Difficulty,
    pub previous_songs: &'a [String],
}

/// Raw recommendation as returned by the generation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub artist: String,
    pub difficulty: i64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Recommendation {
    /// Entry recorded in the previously-recommended songs log.
    pub fn history_entry(&self) -> String {
        format!("{} by {}", self.name, self.artist)
    }
}

/// Result of resolving a recommended song to a playable Spotify track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMatch {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub album_image: Option<String>,
    #[serde(default)]
    pub spotify_id: Option<String>,
    #[serde(default)]
    pub matched_name: Option<String>,
    #[serde(default)]
    pub matched_artist: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedSong {
    pub name: String,
    pub artist: String,
    pub artist_image: Option<String>,
    pub spotify_id: Option<String>,
    pub difficulty: Difficulty,
    pub skills: Vec<String>,
    pub description: String,
}

impl RecommendedSong {
    pub fn new(recommendation: Recommendation, difficulty: Difficulty) -> Self {
        Self {
            name: recommendation.name,
            artist: recommendation.artist,
            artist_image: None,
            spotify_id: None,
            difficulty,
            skills: recommendation.skills,
            description: recommendation.description,
        }
    }

    pub fn with_media(mut self, media: MediaMatch) -> Self {
        self.artist_image = media.album_image;
        self.spotify_id = media.spotify_id;
        self
    }

    /// Spotify embed player URL, when a track id was resolved.
    pub fn embed_url(&self) -> Option<String> {
        self.spotify_id.as_ref().map(|id| {
            format!(
                "https://open.spotify.com/embed/track/{}?utm_source=generator&theme=1&size=large",
                id
            )
        })
    }

    pub fn track_url(&self) -> Option<String> {
        self.spotify_id
            .as_ref()
            .map(|id| format!("https://open.spotify.com/track/{}", id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Identity-service session persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub obtained_at: u64,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub spotify_access_token: Option<String>,
    #[serde(default)]
    pub has_completed_questionnaire: Option<bool>,
}

impl Profile {
    pub fn spotify_connected(&self) -> bool {
        self.spotify_access_token
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_completed_questionnaire: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            other => Err(format!(
                "invalid skill level '{}', expected beginner, intermediate or advanced",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PracticePlanRequest {
    pub song_title: String,
    pub artist: Option<String>,
    pub minutes_per_day: u32,
    pub days_per_week: u32,
    pub goals: Vec<String>,
    pub struggles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<SkillLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanResource {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub why: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticePlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_summary: Option<String>,
    #[serde(default)]
    pub plan: Vec<Value>,
    #[serde(default)]
    pub resources: Vec<PlanResource>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Outcome reported by the backend after a Spotify linking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotifyLink {
    Connected,
    Failed(String),
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub track: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub artist: String,
    pub genres: String,
}

#[derive(Tabled)]
pub struct HistoryTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub song: String,
}
