use clap::{Arg, Command};
use tracing::error;
use tracing_subscriber::EnvFilter;

use fatigue_cycles::app_logic;

/// RUST_LOG wins over the command line level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let matches = Command::new("fatigue-cycles")
        .version("0.1.0")
        .about("Fatigue cycle counting after ASTM E1049-85 and its extensions")
        .arg(
            Arg::new("run")
                .short('r')
                .long("run")
                .value_name("CONFIG")
                .help("Run file (YAML, or TOML with a .toml extension)")
                .required(true),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .default_value("info")
                .help("Log level when RUST_LOG is not set"),
        )
        .after_help(
            "Methods: level_crossing, peak, simple_range, rainflow, range_pair, \
             repeat_history, four_point, johannesson, rychlik",
        )
        .get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("info");
    init_logging(level);

    if let Some(r) = matches.get_one::<String>("run") {
        if let Err(err) = app_logic::run(r) {
            error!("{:#}", err);
            std::process::exit(1);
        }
    }
}
