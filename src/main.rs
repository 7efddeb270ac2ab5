use sidecar_guard::config::GuardConfig;
use sidecar_guard::lifecycle::{cancel_channel, wait_for_signal};
use sidecar_guard::{wait_until, Readiness, Sidecar};
use tracing::{error, info, warn};

/// Subcommand selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Block until the sidecar is ready
    Wait,
    /// Ask the sidecar to exit
    Quit,
}

/// Parse the first argument into a `Command`
pub fn parse_command(arg: Option<&str>) -> anyhow::Result<Command> {
    match arg {
        Some("wait") => Ok(Command::Wait),
        Some("quit") => Ok(Command::Quit),
        Some(other) => Err(anyhow::anyhow!(
            "unknown command {:?} (expected 'wait' or 'quit')",
            other
        )),
        None => Err(anyhow::anyhow!("usage: sidecar-guard <wait|quit>")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let arg = std::env::args().nth(1);
    let command = parse_command(arg.as_deref())?;

    let config = match GuardConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid sidecar guard configuration");
            return Err(e.into());
        }
    };
    info!(enabled = config.enabled, command = ?command, "Starting sidecar guard");

    match command {
        Command::Wait => {
            let (canceller, signal) = cancel_channel();
            tokio::spawn(async move {
                let name = wait_for_signal().await;
                info!(signal = name, "Abandoning sidecar wait");
                canceller.cancel();
            });

            let sidecar = wait_until(config.enabled, config.options(), signal).await?;
            match sidecar.readiness() {
                Readiness::Ready { addr } => info!(addr = %addr, "Sidecar is ready"),
                Readiness::Disabled => info!("Sidecar guard disabled - not waiting"),
                Readiness::Cancelled => {
                    warn!("Sidecar did not become ready");
                    return Err(anyhow::anyhow!("sidecar wait cancelled"));
                }
                Readiness::Unprobed => {
                    return Err(anyhow::anyhow!("sidecar readiness was never checked"));
                }
            }
        }
        Command::Quit => {
            let sidecar = Sidecar::resolve(config.enabled, config.options())?;
            sidecar.quit().await;
            info!(addr = %sidecar.config().quit_addr(), "Sidecar guard done");
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
