use chrono::NaiveDate;
use clap::Parser;
use fight_league::{
    args::{Args, Command},
    config::LeagueConfig,
    database::db::{JsonFileStore, LeagueStore},
    error::LeagueError,
    model::game_service::GameService,
    utils::{progress_utils::progress_bar, report, roster_gen}
};
use tracing::{error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(&args.log_level);

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn run(args: Args) -> Result<(), LeagueError> {
    let store = JsonFileStore::new(&args.data);

    match args.command {
        Command::Init {
            seed,
            start_date,
            roster_size,
            divisions,
            force
        } => init(&store, seed, start_date, roster_size, divisions, force),
        Command::Advance { weeks } => advance(&store, weeks),
        Command::Show { division, events } => show(&store, division, events)
    }
}

fn init(
    store: &JsonFileStore,
    seed: Option<u64>,
    start_date: Option<String>,
    roster_size: usize,
    divisions: Vec<String>,
    force: bool
) -> Result<(), LeagueError> {
    if store.exists() && !force {
        return Err(LeagueError::SaveExists(store.path().display().to_string()));
    }

    let config = LeagueConfig::from_env();
    let seed = seed.unwrap_or(config.seed);
    let start_date = match start_date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| LeagueError::InvalidDate(raw))?,
        None => config.start_date
    };

    let divisions: Vec<&str> = if divisions.is_empty() {
        roster_gen::DEFAULT_DIVISIONS.to_vec()
    } else {
        divisions.iter().map(|d| d.trim()).filter(|d| !d.is_empty()).collect()
    };

    let mut state = roster_gen::generate_league(seed, &divisions, roster_size, start_date);
    let mut service = GameService::new(&state.meta);
    service.initialize(&mut state)?;
    store.save(&state)?;

    info!(
        path = %store.path().display(),
        seed,
        start = %start_date,
        events = state.events.len(),
        "League created"
    );
    Ok(())
}

fn advance(store: &JsonFileStore, weeks: u32) -> Result<(), LeagueError> {
    let mut state = store.load()?;
    let mut service = GameService::new(&state.meta);
    let bar = progress_bar(weeks as u64, "Advancing weeks");

    for _ in 0..weeks {
        // A failed tick leaves the last saved week on disk
        match service.advance_week(&mut state)? {
            Some(event_id) => info!(event_id, date = %state.meta.current_date, "Event completed"),
            None => warn!(date = %state.meta.current_date, "No event this week")
        }
        store.save(&state)?;
        bar.inc(1);
    }

    bar.finish_with_message(format!("League date {}", state.meta.current_date));
    Ok(())
}

fn show(store: &JsonFileStore, division: Option<String>, events: usize) -> Result<(), LeagueError> {
    let state = store.load()?;
    let service = GameService::new(&state.meta);

    println!("League date: {}", state.meta.current_date);
    println!();

    let divisions = match division {
        Some(d) => vec![d],
        None => state.division_names()
    };
    for d in &divisions {
        for line in report::division_table(&state, d)? {
            println!("{}", line);
        }
        println!();
    }

    println!("Upcoming events");
    for line in report::upcoming_events(&state, &service.plan.brand, events) {
        println!("{}", line);
    }

    Ok(())
}
