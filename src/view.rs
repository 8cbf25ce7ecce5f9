//! Text rendering of the Find Songs screen.
//!
//! Pure functions from store state to strings; the `songs` command prints
//! them. Kept apart from the CLI so layouts can be checked in tests.

use colored::Colorize;
use tabled::Table;

use crate::{
    store::{FindSongsStore, ViewPhase},
    types::{
        Artist, ArtistTableRow, DifficultyAdjustment, HistoryTableRow, RecommendedSong,
        SelectedItem, TimeRange, Track, TrackTableRow,
    },
};

pub const HELP: &str = "\
g            generate a song
up / down    harder / easier than the current song
t <n>        select track n (again to unselect)
a <n>        select artist n (again to unselect)
y            generate a song similar to the selection
r <range>    time range: short, medium, long
h            show / hide previously recommended songs
c            clear previously recommended songs
q            quit";

pub fn track_rows(tracks: &[Track]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            rank: i + 1,
            track: t.name.clone(),
            artists: t.joined_artists(),
        })
        .collect()
}

pub fn artist_rows(artists: &[Artist]) -> Vec<ArtistTableRow> {
    artists
        .iter()
        .enumerate()
        .map(|(i, a)| ArtistTableRow {
            rank: i + 1,
            artist: a.name.clone(),
            genres: a
                .genres
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect()
}

pub fn history_rows(entries: &[String]) -> Vec<HistoryTableRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| HistoryTableRow {
            index: i + 1,
            song: e.clone(),
        })
        .collect()
}

pub fn time_range_bar(active: TimeRange) -> String {
    TimeRange::ALL
        .iter()
        .map(|r| {
            if *r == active {
                format!("[{}]", r.label()).bold().to_string()
            } else {
                r.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn recommendation(song: &RecommendedSong) -> String {
    let mut out = format!(
        "{} by {}\nDifficulty: {} ({})",
        song.name.bold(),
        song.artist,
        song.difficulty.stars(),
        song.difficulty
    );
    if !song.skills.is_empty() {
        out.push_str(&format!("\nSkills: {}", song.skills.join(", ")));
    }
    if !song.description.is_empty() {
        out.push_str(&format!("\n{}", song.description));
    }
    if let Some(url) = song.track_url() {
        out.push_str(&format!("\nListen: {}", url));
    }
    out
}

pub fn selection(item: &SelectedItem) -> String {
    match item {
        SelectedItem::Track { name, artists, .. } => {
            format!("Selected track: {} by {} (y: find similar)", name, artists)
        }
        SelectedItem::Artist { name } => format!("Selected artist: {} (y: find similar)", name),
    }
}

fn arrows(store: &FindSongsStore) -> String {
    let arrow = |dir: DifficultyAdjustment, label: &str| {
        if store.can_adjust(dir) {
            label.to_string()
        } else {
            label.dimmed().to_string()
        }
    };
    format!(
        "{}  {}",
        arrow(DifficultyAdjustment::Down, "down: easier"),
        arrow(DifficultyAdjustment::Up, "up: harder")
    )
}

/// Whole screen for the current store state.
pub fn render(store: &FindSongsStore, history: &[String]) -> String {
    match store.phase() {
        ViewPhase::Idle | ViewPhase::Loading => {
            return "Loading your Spotify data...".to_string();
        }
        ViewPhase::Error(message) => return message.red().to_string(),
        ViewPhase::Ready => {}
    }

    let mut sections = vec![time_range_bar(store.time_range())];

    sections.push(format!(
        "{}\n{}",
        "Your Top Tracks".bold(),
        Table::new(track_rows(store.tracks()))
    ));

    let mut rec = vec!["Recommended Song".bold().to_string()];
    match (store.is_generating(), store.recommended()) {
        (true, _) => rec.push("Finding the perfect song...".to_string()),
        (false, Some(song)) => {
            rec.push(recommendation(song));
            rec.push(arrows(store));
        }
        (false, None) if store.can_generate() => {
            rec.push("Press g to get a song recommendation.".to_string())
        }
        (false, None) => rec.push("No tracks to base a recommendation on.".to_string()),
    }
    if let Some(message) = store.generation_error() {
        rec.push(message.red().to_string());
    }
    sections.push(rec.join("\n"));

    sections.push(format!(
        "{}\n{}",
        "Your Top Artists".bold(),
        Table::new(artist_rows(store.artists()))
    ));

    if let Some(item) = store.selected() {
        sections.push(selection(item));
    }

    if store.show_history() {
        sections.push(history_panel(history));
    }

    sections.join("\n\n")
}

pub fn history_panel(history: &[String]) -> String {
    let title = format!("Previously Recommended ({})", history.len()).bold();
    if history.is_empty() {
        return format!("{}\nNo songs recommended yet.", title);
    }
    format!("{}\n{}", title, Table::new(history_rows(history)))
}
