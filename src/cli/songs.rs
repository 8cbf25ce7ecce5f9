use std::sync::Arc;

use super::identity_client;
use crate::{
    Res,
    backend::BackendClient,
    error,
    error::CoachError,
    info,
    management::SongHistory,
    recommend::FindSongs,
    success,
    types::{DifficultyAdjustment, TimeRange},
    utils, view, warning,
};

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SongsCommand {
    Generate,
    Adjust(DifficultyAdjustment),
    SelectTrack(usize),
    SelectArtist(usize),
    Similar,
    TimeRange(TimeRange),
    ToggleHistory,
    ClearHistory,
    Help,
    Quit,
}

impl std::str::FromStr for SongsCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let arg = parts.next();

        let command = match (cmd, arg) {
            ("g", None) => SongsCommand::Generate,
            ("up", None) => SongsCommand::Adjust(DifficultyAdjustment::Up),
            ("down", None) => SongsCommand::Adjust(DifficultyAdjustment::Down),
            ("t", Some(n)) => SongsCommand::SelectTrack(utils::parse_index(n)?),
            ("a", Some(n)) => SongsCommand::SelectArtist(utils::parse_index(n)?),
            ("y", None) => SongsCommand::Similar,
            ("r", Some(range)) => SongsCommand::TimeRange(utils::parse_time_range(range)?),
            ("h", None) => SongsCommand::ToggleHistory,
            ("c", None) => SongsCommand::ClearHistory,
            ("?" | "help", None) => SongsCommand::Help,
            ("q", None) => SongsCommand::Quit,
            _ => return Err(format!("unknown command '{}', type ? for help", line.trim())),
        };

        if parts.next().is_some() {
            return Err(format!("too many arguments in '{}'", line.trim()));
        }
        Ok(command)
    }
}

impl SongsCommand {
    /// Commands still available while the screen shows a load or session error.
    pub fn allowed_after_error(&self) -> bool {
        matches!(
            self,
            SongsCommand::TimeRange(_)
                | SongsCommand::ToggleHistory
                | SongsCommand::Help
                | SongsCommand::Quit
        )
    }
}

pub async fn songs(time_range: TimeRange) {
    let identity = Arc::new(identity_client());
    let history = SongHistory::open_default().await;
    let mut flow = FindSongs::new(identity, BackendClient::from_config(), history);

    load(&mut flow, time_range).await;
    print_screen(&flow);

    if let Err(e) = repl(&mut flow).await {
        warning!("Cannot read input. Err: {}", e);
    }

    flow.settle().await;
}

async fn load(flow: &mut FindSongs, time_range: TimeRange) {
    let pb = utils::spinner(format!("Loading your Spotify data ({})...", time_range.label()));
    // the store keeps the message; the screen shows it
    let _ = flow.load(time_range).await;
    pb.finish_and_clear();
}

fn print_screen(flow: &FindSongs) {
    println!("{}", view::render(flow.store(), flow.history().entries()));
}

async fn repl(flow: &mut FindSongs) -> Res<()> {
    info!("Type ? for help.");

    while let Some(line) = utils::prompt("> ")? {
        if line.is_empty() {
            continue;
        }

        let command = match line.parse::<SongsCommand>() {
            Ok(command) => command,
            Err(message) => {
                warning!("{}", message);
                continue;
            }
        };

        if !dispatch(flow, command).await {
            break;
        }
    }

    Ok(())
}

/// Runs one command against the session and redraws the screen.
///
/// Returns `false` once the user quits. While the view is in its error
/// state only [`SongsCommand::allowed_after_error`] commands run.
pub async fn dispatch(flow: &mut FindSongs, command: SongsCommand) -> bool {
    if flow.store().error().is_some() && !command.allowed_after_error() {
        warning!("Change the time range (r short|medium|long) to try again.");
        return true;
    }

    match command {
        SongsCommand::Quit => return false,
        SongsCommand::Help => {
            println!("{}", view::HELP);
            return true;
        }
        SongsCommand::Generate => generate(flow, None).await,
        SongsCommand::Adjust(direction) => generate(flow, Some(direction)).await,
        SongsCommand::Similar => {
            if flow.store().selected().is_none() {
                warning!("Select a track (t <n>) or an artist (a <n>) first.");
                return true;
            }
            let pb = utils::spinner("Finding the perfect song...");
            let result = flow.generate_from_selection().await;
            pb.finish_and_clear();
            report(result.map(|_| ()));
        }
        SongsCommand::SelectTrack(index) => report(flow.select_track(index)),
        SongsCommand::SelectArtist(index) => report(flow.select_artist(index)),
        SongsCommand::TimeRange(range) => load(flow, range).await,
        SongsCommand::ToggleHistory => {
            flow.toggle_history();
        }
        SongsCommand::ClearHistory => match flow.clear_history().await {
            Ok(()) => success!("Cleared previously recommended songs."),
            Err(e) => warning!("Cannot clear history: {}", e),
        },
    }

    print_screen(flow);
    true
}

async fn generate(flow: &mut FindSongs, adjust: Option<DifficultyAdjustment>) {
    let pb = utils::spinner("Finding the perfect song...");
    let result = flow.generate(adjust, None).await;
    pb.finish_and_clear();

    match result {
        Ok(Some(_)) => {}
        Ok(None) => warning!("No tracks loaded to base a recommendation on."),
        Err(e) => report::<()>(Err(e)),
    }
}

/// Warns about errors the screen does not show by itself.
fn report<T>(result: Result<T, CoachError>) {
    match result {
        Err(e @ CoachError::DifficultyOutOfRange { .. })
        | Err(e @ CoachError::InvalidInput(_))
        | Err(e @ CoachError::NotReady(_)) => warning!("{}", e),
        _ => {}
    }
}

pub async fn show_history() {
    let history = SongHistory::open_default().await;
    println!("{}", view::history_panel(history.entries()));
}

pub async fn clear_history() {
    let mut history = SongHistory::open_default().await;
    match history.clear().await {
        Ok(()) => success!("Cleared previously recommended songs."),
        Err(e) => error!("Cannot clear history: {}", e),
    }
}
