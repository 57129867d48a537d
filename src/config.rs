use std::path::PathBuf;
use std::time::Duration;

use chrono::Datelike;
use clap::Parser;

use crate::normalize::league_name;

pub const DEFAULT_CLUBS_URL: &str =
    "https://www.transfermarkt.com/premier-league/startseite/wettbewerb/GB1";

/// Scrape club and player data from Transfermarkt for use in SWOS
#[derive(Parser, Debug)]
#[command(name = "TMScraper4SWOS", version, about)]
pub struct Args {
    /// URL of the overview page of the league
    #[arg(short = 'u', long = "clubs-url", default_value = DEFAULT_CLUBS_URL)]
    pub clubs_url: String,

    /// Number of clubs to download
    #[arg(short = 'n', long = "number-of-clubs", default_value_t = 1)]
    pub number_of_clubs: usize,

    /// Output CSV path [default: <League-Name>_players_data.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Season used for the club schedule links [default: current year]
    #[arg(long)]
    pub season: Option<i32>,

    /// HTTP timeout per request, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Pause between clubs, in seconds
    #[arg(long, default_value_t = 2)]
    pub delay: u64,

    /// Build players from the squad table only, without fetching profiles
    #[arg(long)]
    pub skip_profiles: bool,

    /// Do not draw the progress line
    #[arg(short, long)]
    pub quiet: bool,
}

/// Resolved run settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub clubs_url: String,
    pub league_name: String,
    pub number_of_clubs: usize,
    pub output: PathBuf,
    pub season: i32,
    pub timeout: Duration,
    pub delay: Duration,
    pub fetch_profiles: bool,
    pub quiet: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let clubs_url = args.clubs_url.trim().to_string();
        let league_name = league_name(&clubs_url).unwrap_or_else(|| "League".to_string());
        let output = args.output.unwrap_or_else(|| default_output(&league_name));

        Self {
            clubs_url,
            league_name,
            number_of_clubs: args.number_of_clubs,
            output,
            season: args.season.unwrap_or_else(|| chrono::Local::now().year()),
            timeout: Duration::from_secs(args.timeout),
            delay: Duration::from_secs(args.delay),
            fetch_profiles: !args.skip_profiles,
            quiet: args.quiet,
        }
    }
}

fn default_output(league_name: &str) -> PathBuf {
    PathBuf::from(format!("{}_players_data.csv", league_name.replace(' ', "-")))
}
