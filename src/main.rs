use clap::Parser;
use color_eyre::Result;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use settle::DebounceOptions;
use settle::config::{self, ConfigResult};
use settle::timeline::{Timeline, replay};

/// Replay a call timeline through a debouncer
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Replay a call timeline through a debouncer and report every execution"
)]
struct Args {
    /// Timeline JSON file: [{ "at": ms, "op": "call" | "flush" | "cancel", "arg": ... }]
    timeline: PathBuf,

    /// Trailing-edge delay in milliseconds
    #[arg(long, value_name = "MS")]
    wait: Option<u64>,

    /// Upper bound between executions in milliseconds
    #[arg(long, value_name = "MS")]
    max_wait: Option<u64>,

    /// Execute on the call that opens a window
    #[arg(long)]
    leading: bool,

    /// Do not execute when a window closes
    #[arg(long)]
    no_trailing: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Config file (defaults to ~/.config/settle/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    color_eyre::install()?;

    let args = Args::parse();

    let config_result = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let options = resolve_options(&args, config_result)?;

    let timeline = Timeline::load(&args.timeline)?;
    log::debug!(
        "Replaying {} entries from {:?}",
        timeline.entries().len(),
        args.timeline
    );

    let report = replay(&timeline, options);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }

    Ok(())
}

/// Logs to stderr, filtered by RUST_LOG (warnings and errors by default)
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            let datetime = chrono::Local::now();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();
}

/// Config file values first, command line flags on top
fn resolve_options(args: &Args, config_result: ConfigResult) -> Result<DebounceOptions> {
    if let Some(warning) = config_result.warning {
        eprintln!("warning: {}", warning);
    }

    let mut options = config_result.config.debounce.to_options()?;
    if let Some(wait) = args.wait {
        options.wait = Duration::from_millis(wait);
    }
    if let Some(max_wait) = args.max_wait {
        options.max_wait = Some(Duration::from_millis(max_wait));
    }
    if args.leading {
        options.leading = true;
    }
    if args.no_trailing {
        options.trailing = false;
    }
    Ok(options)
}
