//! # Backdrop Simulator
//!
//! Runs a particle field headless and logs its population.
//!
//! ## Usage
//!
//! ```bash
//! backdrop_sim --config data/backdrop.toml --simulated --duration 600 --html field.html
//! ```

use backdrop::{spawn_runner, AppConfig, AppError, AppResult, Runner};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    duration_secs: Option<u64>,
    tick_rate: Option<u32>,
    simulated: bool,
    html: Option<PathBuf>,
    help: bool,
}

fn parse_args(raw: &[String]) -> AppResult<Args> {
    fn value<'a>(raw: &'a [String], i: usize, flag: &str) -> AppResult<&'a str> {
        raw.get(i + 1)
            .map(String::as_str)
            .ok_or_else(|| AppError::Arguments(format!("{flag} needs a value")))
    }

    fn number<T: std::str::FromStr>(text: &str, flag: &str) -> AppResult<T> {
        text.parse()
            .map_err(|_| AppError::Arguments(format!("{flag}: not a number: {text}")))
    }

    let mut args = Args::default();
    let mut i = 1;
    while i < raw.len() {
        let flag = raw[i].as_str();
        match flag {
            "--config" | "-c" => {
                args.config = Some(PathBuf::from(value(raw, i, flag)?));
                i += 1;
            }
            "--seed" | "-s" => {
                args.seed = Some(number(value(raw, i, flag)?, flag)?);
                i += 1;
            }
            "--duration" | "-d" => {
                args.duration_secs = Some(number(value(raw, i, flag)?, flag)?);
                i += 1;
            }
            "--tick-rate" | "-t" => {
                args.tick_rate = Some(number(value(raw, i, flag)?, flag)?);
                i += 1;
            }
            "--html" => {
                args.html = Some(PathBuf::from(value(raw, i, flag)?));
                i += 1;
            }
            "--simulated" => args.simulated = true,
            "--help" | "-h" => args.help = true,
            other => return Err(AppError::Arguments(format!("unknown option: {other}"))),
        }
        i += 1;
    }
    Ok(args)
}

fn print_usage() {
    println!("Usage: backdrop_sim [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>        TOML config (default: built-in defaults)");
    println!("  -s, --seed <SEED>          Fix the particle generator seed");
    println!("  -d, --duration <SECS>      Stop after this many seconds");
    println!("  -t, --tick-rate <RATE>     Frames per second (default: 60)");
    println!("      --simulated            Fast-forward instead of waiting on the wall clock");
    println!("      --html <PATH>          Write the final container HTML");
    println!("  -h, --help                 Show this help");
}

fn load_config(args: &Args) -> AppResult<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.field.seed = Some(seed);
    }
    if let Some(secs) = args.duration_secs {
        config.runner.duration_secs = Some(secs);
    }
    if let Some(rate) = args.tick_rate {
        config.runner.tick_rate = rate;
    }
    if args.simulated {
        config.runner.simulated = true;
    }
    if config.runner.simulated && config.runner.duration_secs.is_none() {
        return Err(AppError::Arguments(
            "a simulated run needs --duration or runner.duration_secs".to_string(),
        ));
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> AppResult<()> {
    let config = load_config(args)?;
    let runner = Runner::new(config.runner.clone(), config.field.clone())?;
    let handle = spawn_runner(runner);

    for report in handle.reports() {
        tracing::info!(
            frame = report.frame,
            at = %report.now,
            live = report.live,
            respawns = report.respawns,
            max_generation = report.stats.max_generation,
            "field report"
        );
    }

    let html = handle.latest_html();
    let summary = handle.join()?;

    println!();
    println!("Frames run:        {}", summary.frames);
    println!("Simulated time:    {}", summary.elapsed);
    println!("Live particles:    {}", summary.stats.live);
    println!("Respawns:          {}", summary.respawns);
    println!("Max generation:    {}", summary.stats.max_generation);
    println!("Mean frame work:   {}µs", summary.frame_stats.mean_work_us());
    println!("Late frames:       {}", summary.frame_stats.late_frames);
    println!("Skipped frames:    {}", summary.frame_stats.skipped_frames);

    if let Some(path) = &args.html {
        std::fs::write(path, html).map_err(|source| AppError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "container html written");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let raw: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(error) => {
            eprintln!("{error}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    if args.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "backdrop_sim failed");
            ExitCode::FAILURE
        }
    }
}
