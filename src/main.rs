//! jwatch - watch remote agent sessions from the terminal

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for the status panel
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwatch=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting jwatch v{}", env!("CARGO_PKG_VERSION"));

    // Run CLI
    jwatch::cli::run()?;

    Ok(())
}
