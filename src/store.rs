//! View state of the Find Songs screen.
//!
//! [`FindSongsStore`] is a plain owned object: every transition is an explicit
//! method call, so the whole screen can be driven and inspected without a
//! terminal. The outer lifecycle is `Idle → Loading → Ready | Error`;
//! generation runs its own `idle → generating → idle` cycle and is only
//! possible while `Ready`.

use crate::{
    error::CoachError,
    types::{
        Artist, Difficulty, DifficultyAdjustment, RecommendedSong, SelectedItem, TimeRange, Track,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPhase {
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Identifies one listening-history fetch.
///
/// Tickets increase monotonically; results carrying an older ticket than the
/// latest issued one are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone)]
pub struct FindSongsStore {
    phase: ViewPhase,
    time_range: TimeRange,
    tracks: Vec<Track>,
    artists: Vec<Artist>,
    recommended: Option<RecommendedSong>,
    generating: bool,
    generation_error: Option<String>,
    selected: Option<SelectedItem>,
    show_history: bool,
    latest_ticket: u64,
}

impl Default for FindSongsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FindSongsStore {
    pub fn new() -> Self {
        Self {
            phase: ViewPhase::Idle,
            time_range: TimeRange::default(),
            tracks: Vec::new(),
            artists: Vec::new(),
            recommended: None,
            generating: false,
            generation_error: None,
            selected: None,
            show_history: false,
            latest_ticket: 0,
        }
    }

    pub fn phase(&self) -> &ViewPhase {
        &self.phase
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn recommended(&self) -> Option<&RecommendedSong> {
        self.recommended.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ViewPhase::Loading
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Error replacing the whole view (auth or history fetch).
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            ViewPhase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Error of the last generation attempt; earlier content stays visible.
    pub fn generation_error(&self) -> Option<&str> {
        self.generation_error.as_deref()
    }

    pub fn selected(&self) -> Option<&SelectedItem> {
        self.selected.as_ref()
    }

    pub fn show_history(&self) -> bool {
        self.show_history
    }

    /// Starts a fetch for `time_range` and returns its ticket.
    pub fn begin_fetch(&mut self, time_range: TimeRange) -> FetchTicket {
        self.latest_ticket += 1;
        self.time_range = time_range;
        self.phase = ViewPhase::Loading;
        FetchTicket(self.latest_ticket)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest_ticket
    }

    /// Replaces both lists at once. Returns `false` and changes nothing when
    /// the ticket is stale.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        tracks: Vec<Track>,
        artists: Vec<Artist>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.tracks = tracks;
        self.artists = artists;
        self.phase = ViewPhase::Ready;
        true
    }

    /// Puts the view in the error state. Returns `false` for a stale ticket.
    pub fn fail_fetch(&mut self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.phase = ViewPhase::Error(message.into());
        true
    }

    /// Replaces the view with a session error, whatever was in flight.
    pub fn fail_session(&mut self, message: impl Into<String>) {
        self.phase = ViewPhase::Error(message.into());
    }

    /// Whether the generate action is available.
    pub fn can_generate(&self) -> bool {
        self.phase == ViewPhase::Ready && !self.generating && !self.tracks.is_empty()
    }

    pub fn current_difficulty(&self) -> Option<Difficulty> {
        self.recommended.as_ref().map(|r| r.difficulty)
    }

    /// Whether the difficulty arrow for `direction` is enabled.
    ///
    /// Both arrows need a displayed recommendation; "down" is disabled at 1
    /// and "up" at 5.
    pub fn can_adjust(&self, direction: DifficultyAdjustment) -> bool {
        !self.generating
            && self
                .current_difficulty()
                .is_some_and(|d| d.can_adjust(direction))
    }

    /// Enters the generating sub-state and clears the selection.
    pub fn begin_generation(&mut self) -> Result<(), CoachError> {
        if self.phase != ViewPhase::Ready {
            return Err(CoachError::NotReady(
                "listening history is not loaded".to_string(),
            ));
        }
        if self.generating {
            return Err(CoachError::NotReady(
                "a recommendation is already being generated".to_string(),
            ));
        }
        self.selected = None;
        self.generating = true;
        self.generation_error = None;
        Ok(())
    }

    /// Leaves the generating sub-state.
    ///
    /// A new song replaces the previous one entirely; a failure keeps the
    /// previous song and records the message.
    pub fn finish_generation(&mut self, outcome: Result<RecommendedSong, String>) {
        self.generating = false;
        match outcome {
            Ok(song) => {
                self.recommended = Some(song);
                self.generation_error = None;
            }
            Err(message) => self.generation_error = Some(message),
        }
    }

    /// Selects `item`, or clears the selection when it is already selected.
    pub fn toggle_selection(&mut self, item: SelectedItem) {
        let same = self
            .selected
            .as_ref()
            .is_some_and(|current| current.same_target(&item));
        self.selected = if same { None } else { Some(item) };
    }

    /// Toggles selection of the track at zero-based `index`.
    pub fn select_track(&mut self, index: usize) -> Result<(), CoachError> {
        let track = self
            .tracks
            .get(index)
            .ok_or_else(|| CoachError::InvalidInput(format!("no track #{}", index + 1)))?;
        let item = SelectedItem::from_track(track);
        self.toggle_selection(item);
        Ok(())
    }

    /// Toggles selection of the artist at zero-based `index`.
    pub fn select_artist(&mut self, index: usize) -> Result<(), CoachError> {
        let artist = self
            .artists
            .get(index)
            .ok_or_else(|| CoachError::InvalidInput(format!("no artist #{}", index + 1)))?;
        let item = SelectedItem::from_artist(artist);
        self.toggle_selection(item);
        Ok(())
    }

    pub fn toggle_history(&mut self) -> bool {
        self.show_history = !self.show_history;
        self.show_history
    }

    pub fn hide_history(&mut self) {
        self.show_history = false;
    }
}
