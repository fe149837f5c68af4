//! Times every ordering variant over a Parquet dataset.
//!
//! Usage: `sortbench [config.json]`. Without an argument the compiled-in
//! defaults from `indisort::config` are used.

use std::path::Path;
use std::process::ExitCode;

use log::LevelFilter;

use indisort::config::BenchConfig;
use indisort::error::Result;
use indisort::harness::BenchRun;

fn init_logging() {
    let mut builder = env_logger::Builder::new();

    builder.filter_level(LevelFilter::Info);
    // RUST_LOG still wins when set.
    builder.parse_default_env();

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });

    let _ = builder.try_init();
}

fn load_config() -> Result<BenchConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("reading config from {}", path);
            BenchConfig::from_json_file(Path::new(&path))
        }
        None => Ok(BenchConfig::default()),
    }
}

fn run() -> Result<()> {
    let config = load_config()?;
    log::info!(
        "dataset {} | prefix {} | keys {} | {} trials ({} warmup)",
        config.dataset_uri,
        config.column_prefix.width(),
        config.key_mode,
        config.trials,
        config.warmup
    );

    let mut bench = BenchRun::new(config);
    bench.run()?;
    bench.print_report();
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    log::info!("sortbench v{}", indisort::VERSION);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::from(1)
        }
    }
}
