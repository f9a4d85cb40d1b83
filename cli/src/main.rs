use clap::Parser;
use roster_cli::{config::Cli, tracing_config};
use tracing::{event, Level};

#[tokio::main]
async fn main() -> Result<(), eyre::Report> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    let Cli { config, command } = Cli::parse();

    tracing_config::configure("roster", config.log_format)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let result = roster_cli::run(config, command, &mut stdout.lock(), &mut stdin.lock()).await;

    if let Err(e) = result {
        event!(Level::ERROR, kind = e.error_kind(), error = %e, "Command failed");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}
