#![warn(clippy::uninlined_format_args)]

mod config;
mod render;

use config::AppConfig;
use render::ReportPresenter;
use std::{
    borrow::Cow,
    env,
    io::{self, Write},
    path::Path,
    process,
};
use tabshare_application::{LedgerProcessor, RecordStore};
use tabshare_infrastructure::JsonRecordStore;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    init_logging();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// Logs go to stderr so the report on stdout stays clean; `RUST_LOG` overrides the level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err("Usage: tabshare <ledger.json>".into());
    };

    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    report_ledger(&path, config, &mut io::stdout().lock())
}

/// Writes the balance report, then the transfer table.
///
/// Balances are written before planning so they are still shown when the plan
/// is rejected.
fn report_ledger(
    path: impl AsRef<Path>,
    config: AppConfig,
    out: &mut dyn Write,
) -> CliResult<()> {
    let store = JsonRecordStore::from_path(path).map_err(|err| err.to_string())?;
    let participants = store.participants().map_err(|err| err.to_string())?;

    let processor = LedgerProcessor::new(&store, config.context, config.policy)
        .map_err(|err| err.to_string())?;
    let presenter = ReportPresenter::new(&participants, config.context);

    let batch = processor.load_batch().map_err(|err| err.to_string())?;
    let balance = processor
        .calculate_balances(&batch)
        .map_err(|err| err.to_string())?;
    writeln!(out, "{}", presenter.render_balances(&balance))
        .map_err(|err| format!("failed to write report: {err}"))?;

    let settlement = processor
        .plan_settlement(&balance)
        .map_err(|err| err.to_string())?;
    write!(out, "{}", presenter.render_settlement(&settlement))
        .map_err(|err| format!("failed to write report: {err}"))?;

    Ok(())
}
