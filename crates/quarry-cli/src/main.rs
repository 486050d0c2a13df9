mod cli;
mod commands;

use cli::{AggregateParams, BuildParams, DumpParams, EmitParams, build_cli};
use tracing_subscriber::EnvFilter;

/// Log filter variable; falls back to `warn`.
const LOG_ENV: &str = "QUARRY_LOG";

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("emit", m)) => {
            let params = EmitParams::from_matches(m);
            commands::emit::run(params.into());
        }
        Some(("build", m)) => {
            let params = BuildParams::from_matches(m);
            commands::build::run(params.into());
        }
        Some(("aggregate", m)) => {
            let params = AggregateParams::from_matches(m);
            commands::aggregate::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
