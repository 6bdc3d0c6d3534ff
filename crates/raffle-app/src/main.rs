use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use raffle_app::{
    open_store, App, ConsoleCelebration, ConsolePresenter, Presenter, RaffleConfig,
    StdinConfirmation, StoreLocation,
};
use raffle_kernel::effects::{AlwaysConfirm, Confirmation};
use raffle_kernel::random::StdRandom;
use raffle_kernel::{AppState, RaffleView};
use std::path::PathBuf;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("raffle")
        .version(raffle_app::VERSION)
        .about("Prize raffle with a rolling name display")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with prizes and participants (default: built-in demo)"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .default_value(".raffle")
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the winner history record"),
        )
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Keep winner history in memory only"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Random seed for reproducible draws"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .help("Log filter when RUST_LOG is not set"),
        )
        .subcommand(Command::new("run").about("Interactive raffle (default)"))
        .subcommand(Command::new("draw").about("Draw one winner and exit"))
        .subcommand(Command::new("status").about("Show state and next prize"))
        .subcommand(
            Command::new("history").about("List winners").arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(
            Command::new("reset").about("Clear winner history").arg(
                Arg::new("yes")
                    .long("yes")
                    .short('y')
                    .action(ArgAction::SetTrue)
                    .help("Skip the confirmation prompt"),
            ),
        )
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<RaffleConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => RaffleConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(RaffleConfig::demo()),
    }
}

fn store_location(matches: &ArgMatches) -> StoreLocation {
    if matches.get_flag("ephemeral") {
        return StoreLocation::Ephemeral;
    }
    match matches.get_one::<PathBuf>("data-dir") {
        Some(dir) => StoreLocation::Dir(dir.clone()),
        None => StoreLocation::Dir(PathBuf::from(".raffle")),
    }
}

fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });
    rx
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let level = matches
        .get_one::<String>("log-level")
        .map_or("warn", String::as_str);
    init_tracing(level);

    let config = load_config(&matches)?;
    let roster = config.roster().context("invalid roster")?;
    let store = open_store(&store_location(&matches), &config);
    let random = match matches.get_one::<u64>("seed") {
        Some(seed) => StdRandom::seeded(*seed),
        None => StdRandom::from_entropy(),
    };

    let mut app = App::new(
        roster,
        config.settings(),
        store,
        random,
        ConsoleCelebration::stdout(),
        ConsolePresenter::stdout(),
        config.roll_interval(),
    );

    match matches.subcommand() {
        Some(("draw", _)) => match app.draw_once().await {
            Some(_) => {}
            None => {
                let view = app.controller().view();
                app.presenter_mut().render(&view);
                app.presenter_mut().notice("Nothing to draw.");
            }
        },
        Some(("status", _)) => {
            let view = app.controller().view();
            app.presenter_mut().render(&view);
        }
        Some(("history", args)) => {
            let view = app.controller().view();
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&view.history)?);
            } else {
                app.presenter_mut().history(&view);
            }
        }
        Some(("reset", args)) => {
            let confirmation: Box<dyn Confirmation> = if args.get_flag("yes") {
                Box::new(AlwaysConfirm)
            } else {
                Box::new(StdinConfirmation)
            };
            let notice = if app.controller_mut().reset(confirmation.as_ref()) {
                "Winner history cleared."
            } else {
                "Nothing reset."
            };
            app.presenter_mut().notice(notice);
        }
        _ => {
            app.run(stdin_lines()).await;
            let line = summary(&app.controller().view());
            app.presenter_mut().notice(&line);
        }
    }

    Ok(())
}

fn summary(view: &RaffleView) -> String {
    if view.phase == AppState::Finished {
        format!("Raffle complete: {} winners.", view.history.len())
    } else {
        format!(
            "{} of {} prizes awarded.",
            view.total_prizes.saturating_sub(view.remaining_prizes),
            view.total_prizes
        )
    }
}
