use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use guitarcoach::{
    cli, config, error,
    types::{SkillLevel, TimeRange},
    utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in with email and password
    Login(LoginOptions),

    /// Create an account
    Signup(SignupOptions),

    /// Log out and forget the local session
    Logout,

    /// Show your profile
    Profile,

    /// Link your Spotify account
    ConnectSpotify,

    /// Answer the onboarding questionnaire
    Questionnaire,

    /// Find songs to learn from your listening history
    Songs(SongsOptions),

    /// Show the weekly practice schedule
    Schedule,

    /// Generate a practice plan for a song
    Plan(PlanArgs),

    /// Overview of what you can do
    Dashboard,

    /// Check that the backend is reachable
    Health,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginOptions {
    #[clap(long)]
    pub email: Option<String>,
    #[clap(long)]
    pub password: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SignupOptions {
    /// At least 6 characters
    #[clap(long)]
    pub username: Option<String>,
    #[clap(long)]
    pub email: Option<String>,
    /// At least 6 characters
    #[clap(long)]
    pub password: Option<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Find songs to learn from your listening history",
    args_conflicts_with_subcommands = true
)]
pub struct SongsOptions {
    /// Listening history window: short, medium or long
    #[clap(long, default_value = "medium", value_parser = utils::parse_time_range)]
    pub time_range: TimeRange,

    #[command(subcommand)]
    pub command: Option<SongsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SongsSubcommand {
    /// Show previously recommended songs
    History(HistoryOptions),
}

#[derive(Parser, Debug, Clone)]
pub struct HistoryOptions {
    /// Forget all previously recommended songs
    #[clap(long)]
    pub clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    /// Song title
    #[clap(long)]
    pub song: String,
    #[clap(long)]
    pub artist: Option<String>,
    /// Minutes per day
    #[clap(long, default_value_t = 15)]
    pub minutes: u32,
    /// Days per week (1-7)
    #[clap(long, default_value_t = 5)]
    pub days: u32,
    /// Comma-separated goals
    #[clap(long, default_value = "")]
    pub goals: String,
    /// Comma-separated struggles
    #[clap(long, default_value = "")]
    pub struggles: String,
    /// beginner, intermediate or advanced
    #[clap(long, value_parser = parse_skill_level)]
    pub skill_level: Option<SkillLevel>,
}

fn parse_skill_level(s: &str) -> Result<SkillLevel, String> {
    s.parse()
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Login(opt) => cli::login(opt.email, opt.password).await,
        Command::Signup(opt) => cli::signup(opt.username, opt.email, opt.password).await,
        Command::Logout => cli::logout().await,
        Command::Profile => cli::profile().await,
        Command::ConnectSpotify => cli::connect_spotify().await,
        Command::Questionnaire => cli::questionnaire().await,
        Command::Songs(opt) => match opt.command {
            Some(SongsSubcommand::History(h)) if h.clear => cli::clear_history().await,
            Some(SongsSubcommand::History(_)) => cli::show_history().await,
            None => cli::songs(opt.time_range).await,
        },
        Command::Schedule => cli::schedule().await,
        Command::Plan(opt) => {
            cli::plan(cli::PlanOptions {
                song: opt.song,
                artist: opt.artist,
                minutes: opt.minutes,
                days: opt.days,
                goals: opt.goals,
                struggles: opt.struggles,
                skill_level: opt.skill_level,
            })
            .await
        }
        Command::Dashboard => cli::dashboard().await,
        Command::Health => cli::health().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
