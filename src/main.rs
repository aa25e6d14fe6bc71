use anyhow::Context;
use memdb::shell::{self, Reply};
use memdb::{BackendRegistry, DbConfig};
use std::io::{self, BufRead, Write};
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with command replies
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DbConfig::load(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => DbConfig::default(),
    };

    let registry = BackendRegistry::with_defaults();
    let db = registry
        .open(&config)
        .with_context(|| format!("failed to open {} database '{}'", config.backend, config.name))?;
    info!("memdb ready (backend={}, name={})", config.backend, config.name);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;
        match shell::execute(db.as_ref(), &line)? {
            Reply::Lines(lines) => {
                for reply in lines {
                    writeln!(stdout, "{}", reply)?;
                }
                stdout.flush()?;
            }
            Reply::Quit => break,
        }
    }

    db.close()?;
    info!("memdb stopped");
    Ok(())
}
