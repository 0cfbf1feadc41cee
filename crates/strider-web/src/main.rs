//! Native desktop runner, mainly for development

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use clap::Parser;
    use std::path::PathBuf;
    use strider_core::config::Tunables;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    #[derive(Parser, Debug)]
    #[command(name = "strider")]
    #[command(about = "Third-person movement demo")]
    #[command(version)]
    struct Args {
        /// Path to a tunables file (defaults to the embedded strider.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        log_level: String,
    }

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Strider v{}", env!("CARGO_PKG_VERSION"));

    let tunables = match &args.config {
        Some(path) => Tunables::from_file(path)
            .with_context(|| format!("Failed to load tunables from {}", path.display()))?,
        None => strider_web::config::embedded_tunables()?,
    };

    strider_web::app::run(tunables);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
