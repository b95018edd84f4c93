use clap::{Arg, Command};
use colored::Colorize;
use std::io::{self, Write};
use std::time::Instant;
use strcat::alloc::CountingAllocator;
use strcat::error::Error;
use strcat::runner::Runner;
use strcat::runner::config::{BenchTime, RunnerConfig, parse_sizes};
use strcat::runner::report;

use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator::system();

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let matches = Command::new("strcat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Benchmark string concatenation strategies")
        .arg(
            Arg::new("bench")
                .short('b')
                .long("bench")
                .value_name("REGEX")
                .help("Run only benchmarks whose name matches REGEX (e.g. Join, 10000$)"),
        )
        .arg(
            Arg::new("benchtime")
                .short('t')
                .long("benchtime")
                .value_name("TIME")
                .help("Target time per benchmark (1s, 250ms) or exact iterations (100x)"),
        )
        .arg(
            Arg::new("count")
                .short('c')
                .long("count")
                .value_name("N")
                .help("Run each benchmark N times")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("sizes")
                .short('s')
                .long("sizes")
                .value_name("LIST")
                .help("Comma separated input sizes (default 10,100,1000,10000)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Reduce log output")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(&matches)?;

    let config = load_configuration(&matches).map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    let json = config.json;

    let runner = Runner::new(config)
        .map_err(|e| {
            error!("Invalid configuration: {}", e);
            e
        })?
        .with_alloc_source(&GLOBAL);

    let started = Instant::now();
    let mut out = io::stdout().lock();

    if json {
        let results = runner.run(|_| Ok(()))?;
        report::write_json(&mut out, &results)?;
        return Ok(());
    }

    writeln!(out, "os: {}", std::env::consts::OS)?;
    writeln!(out, "arch: {}", std::env::consts::ARCH)?;
    writeln!(out, "pkg: {}", env!("CARGO_PKG_NAME"))?;

    let name_width = runner.name_width(&runner.selected());
    let outcome = runner.run(|result| report::write_line(&mut out, result, name_width));
    let elapsed = started.elapsed().as_secs_f64();

    match outcome {
        Ok(_) => {
            writeln!(out, "PASS")?;
            writeln!(out, "{}  \t{}\t{elapsed:.3}s", "ok".green().bold(), env!("CARGO_PKG_NAME"))?;
            Ok(())
        }
        Err(e) => {
            error!("Benchmark run failed: {}", e);
            writeln!(out, "{}\t{}\t{elapsed:.3}s", "FAIL".red().bold(), env!("CARGO_PKG_NAME"))?;
            Err(e.into())
        }
    }
}

fn init_logging(matches: &clap::ArgMatches) -> Result<(), Error> {
    let verbose = matches.get_flag("verbose");
    let quiet = matches.get_flag("quiet");

    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("strcat={default_level}")))
        .map_err(|e| Error::configuration(format!("Failed to create log filter: {e}")))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbose)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(verbose)
                .with_line_number(verbose)
                .compact(),
        )
        .init();

    Ok(())
}

fn load_configuration(matches: &clap::ArgMatches) -> Result<RunnerConfig, Error> {
    let mut config = RunnerConfig::from_env();

    if let Some(pattern) = matches.get_one::<String>("bench") {
        config.pattern.clone_from(pattern);
    }

    if let Some(benchtime) = matches.get_one::<String>("benchtime") {
        config.benchtime = benchtime.parse::<BenchTime>()?;
    }

    if let Some(&count) = matches.get_one::<u32>("count") {
        config.count = count;
    }

    if let Some(sizes) = matches.get_one::<String>("sizes") {
        config.sizes = parse_sizes(sizes)?;
    }

    config.json = matches.get_flag("json");

    Ok(config)
}
