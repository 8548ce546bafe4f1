use clap::Parser;
use hitline::{cli::Cli, headless, session};
use hitline_core::{config::Config, export};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&cli.log_file)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!(path = %cli.log_file.display(), "hitline debug log started");
    }

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, using defaults");
        Config::defaults()
    });

    let text = session::read_input(cli.file.as_deref()).await?;
    let viewer = session::open(&text, &cli.view_options(), &config).await?;
    let source = cli.source_name();

    if let Some(dir) = &cli.export {
        let path = export::write_export(dir, viewer.records_in_view(), chrono::Utc::now())?;
        eprintln!("exported {} records to {}", viewer.view().len(), path.display());
    }

    if cli.headless {
        let stdout = std::io::stdout();
        headless::write_report(&mut stdout.lock(), &source, &viewer)?;
        return Ok(());
    }

    hitline_tui::run(viewer, source, config)
}
