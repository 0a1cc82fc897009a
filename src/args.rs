use clap::{Parser, Subcommand};

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "Fight League",
    author = "Fight League",
    long_about = "Runs a combat-sports league career simulation one week at a time"
)]
pub struct Args {
    /// Path of the league save file
    #[arg(
        short,
        long,
        env = "LEAGUE_DATA_PATH",
        default_value = "league.json",
        help = "League save file"
    )]
    pub data: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Generates a new league and plans its first events
    Init {
        #[arg(long, env = "LEAGUE_SEED", help = "Seed for generation and simulation")]
        seed: Option<u64>,

        /// First day of the league, YYYY-MM-DD
        #[arg(long, env = "LEAGUE_START_DATE")]
        start_date: Option<String>,

        #[arg(long, default_value_t = 24, help = "Competitors per division")]
        roster_size: usize,

        /// Comma separated division names. Defaults to eight weight classes.
        #[arg(long, value_delimiter = ',')]
        divisions: Vec<String>,

        #[arg(long, action = clap::ArgAction::SetTrue, help = "Overwrite an existing save")]
        force: bool
    },
    /// Runs weekly ticks, saving after each one
    Advance {
        #[arg(short, long, default_value_t = 1)]
        weeks: u32
    },
    /// Prints rankings and upcoming events
    Show {
        /// Only this division
        #[arg(long)]
        division: Option<String>,

        #[arg(long, default_value_t = 4, help = "Upcoming events to list")]
        events: usize
    }
}
