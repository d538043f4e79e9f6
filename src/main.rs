// main.rs - CLI entry point

use std::path::Path;
use std::process;

use barclust::cli::{flank_settings, primer_settings, Args, Command, Config, FlanksArgs, PrimersArgs};
use barclust::prelude::*;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

fn main() {
    // BARCLUST_LOG takes a filter directive, e.g. "debug" or "barclust=warn"
    let log_level = std::env::var("BARCLUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M".to_string()))
        .with_target(false)
        .init();

    if let Err(e) = run_main() {
        tracing::error!("{}", e);
        process::exit(e.exit_code());
    }
}

fn run_main() -> ClusterResult<()> {
    let args: Args = argh::from_env();

    if args.generate_config {
        println!("{}", Config::generate_sample());
        eprintln!("Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    match args.command {
        Some(Command::Flanks(flanks)) => {
            let flanks = match &args.config {
                Some(path) => flanks.with_config_file(path)?,
                None => flanks,
            };
            run_flanks(flanks)
        }
        Some(Command::Primers(primers)) => {
            let primers = match &args.config {
                Some(path) => primers.with_config_file(path)?,
                None => primers,
            };
            run_primers(primers)
        }
        None => Err(ClusterError::InvalidConfiguration(
            "a subcommand is required: flanks or primers (see --help)".to_string(),
        )),
    }
}

fn run_flanks(args: FlanksArgs) -> ClusterResult<()> {
    let diag = TracingDiagnostics::new("flanks");
    diag.info(&format!("barclust v{}", barclust::VERSION));

    let settings = flank_settings(&args, &diag)?;
    let input = args
        .input
        .as_deref()
        .ok_or_else(|| ClusterError::MissingInput("--input is required".to_string()))?;
    log_settings(&settings, &diag);

    let caps = Capabilities::native(&settings, settings.identity.is_none(), &diag)?;
    cluster_flanks(Path::new(input), args.output.as_deref(), &settings, &caps, &diag)?;
    Ok(())
}

fn run_primers(args: PrimersArgs) -> ClusterResult<()> {
    let diag = TracingDiagnostics::new("primers");
    diag.info(&format!("barclust v{}", barclust::VERSION));

    let settings = primer_settings(&args, &diag)?;
    log_settings(&settings, &diag);

    let caps = Capabilities::native(&settings, true, &diag)?;
    cluster_primers(
        args.input.as_deref().map(Path::new),
        args.output.as_deref(),
        &settings,
        &caps,
        &diag,
    )?;
    Ok(())
}

fn log_settings(settings: &ClusterSettings, diag: &dyn Diagnostics) {
    let threads = barclust::core::parallel::worker_count(settings.threads);
    match settings.identity {
        Some(identity) => diag.info(&format!("Identity clustering at {}, {} threads", identity, threads)),
        None => diag.info(&format!(
            "Alignment: {}, distance: {}, min_samples: {}, {} threads",
            settings.alignment.mode.description(),
            settings.metric.description(),
            settings.min_samples,
            threads
        )),
    }
}
