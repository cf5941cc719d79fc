//! Line-oriented Fluxo terminal over a headless desktop (`fluxo_terminal`).
//!
//! Boots a desktop with one terminal window, then evaluates stdin line by line and prints each
//! result to stdout. Logs go to stderr, filtered by `RUST_LOG` (default `warn`). Set
//! `FLUXO_DESKTOP_CONFIG` to load a TOML desktop config instead of the bundled one.

use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use desktop_app_terminal::{TerminalSession, TerminalTranscriptEntry};
use desktop_runtime::{run_effects, DesktopConfig, DesktopRuntime};
use futures::executor::block_on;
use platform_host::NoopAppStateStore;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "FLUXO_DESKTOP_CONFIG";

fn main() -> ExitCode {
    init_tracing();

    let config = match env::var_os(CONFIG_ENV) {
        Some(path) => match DesktopConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::from(2);
            }
        },
        None => DesktopConfig::default(),
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(config: DesktopConfig) -> io::Result<()> {
    let store = NoopAppStateStore;
    let mut runtime = DesktopRuntime::new(config);
    let window_id = runtime.open_window("terminal", None);
    if window_id.is_none() {
        tracing::warn!("no terminal app in the catalog; running without a window");
    }
    block_on(run_effects(&mut runtime, &store));

    let mut session = TerminalSession::new(window_id);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in session.rendered_lines() {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let appended = session.submit(&mut runtime, &line).to_vec();
        for entry in appended {
            // Input is already visible on the controlling terminal.
            if matches!(entry, TerminalTranscriptEntry::Prompt { .. }) {
                continue;
            }
            writeln!(out, "{}", entry.render())?;
        }
        out.flush()?;
        block_on(run_effects(&mut runtime, &store));
    }
    Ok(())
}
