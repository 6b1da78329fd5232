use clap::Parser;
use tenant_guard::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env if present so GUARD_* and APP_ENV apply to local runs
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = tenant_guard::config::config();
    tracing::debug!("Starting tenant-guard in {:?} mode", config.environment);

    let cli = Cli::parse();

    match tenant_guard::cli::run(cli) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            match std::env::var("CLI_VERBOSE").as_deref() {
                Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                _ => eprintln!("Error: {e}"),
            }
            std::process::exit(1);
        }
    }
}
