use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use rosterbot::{compose_reply, Bot, Composed, Config, ScriptedSurface};

#[derive(Parser)]
#[command(name = "rosterbot")]
#[command(about = "Chat-group roster automation")]
#[command(version)]
struct Cli {
    /// Config file to run
    config: PathBuf,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Saved roster text to rehearse against instead of a live session
    #[arg(long, value_name = "FILE")]
    roster_file: Option<PathBuf>,

    /// Run the full watch loop against the rehearsal text
    #[arg(long, requires = "roster_file")]
    watch: bool,

    /// Leave the reply in the compose box without sending (overrides config)
    #[arg(long)]
    no_send: bool,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> rosterbot::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let mut config = Config::load(&cli.config)?;
    if cli.no_send {
        config.send = false;
    }

    if cli.check {
        println!("Config valid: {}", config.name);
        println!("  Group: {}", config.group);
        println!(
            "  Insert: {} ({:?}, {:?})",
            config.roster.insert_name, config.roster.mode, config.roster.strategy
        );
        let days = if config.schedule.weekdays.is_empty() {
            "every day".to_string()
        } else {
            format!("{:?}", config.schedule.weekdays)
        };
        println!(
            "  Window: {} from {} until {}:00 ({})",
            days, config.schedule.start, config.schedule.end_hour, config.schedule.timezone
        );
        println!(
            "  Alert: {}-{}",
            config.schedule.alert_start, config.schedule.alert_end
        );
        println!("  Send: {}", config.send);
        return Ok(());
    }

    let Some(ref roster_path) = cli.roster_file else {
        eprintln!(
            "No chat driver is built into this binary. Pass --roster-file to \
             rehearse against a saved roster, or embed the library with your \
             own ChatSurface implementation."
        );
        std::process::exit(2);
    };
    let raw = std::fs::read_to_string(roster_path)?;

    if cli.watch {
        // Full loop against a scripted surface: real gate, real pacing,
        // canned chat.
        let surface = ScriptedSurface::new(raw);
        let mut bot = Bot::new(config, surface);
        bot.run().await;
        return Ok(());
    }

    println!("Rehearsing: {}", config.name);
    match compose_reply(&config.roster, &raw) {
        Composed::Reply(reply) => {
            println!();
            println!("{}", reply);
        }
        Composed::AlreadyListed => {
            println!(
                "'{}' is already on the list; nothing to do",
                config.roster.insert_name
            );
        }
        Composed::Unusable => {
            eprintln!(
                "no roster sections found in {} (markers '{}'/'{}')",
                roster_path.display(),
                config.roster.going_marker,
                config.roster.returning_marker
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
