use anyhow::Context;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bookshelf-cli")]
#[command(about = "Operate the bookshelf service", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the resolved configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => bookshelf::run(settings).await,
        Command::Migrate => {
            bookshelf::connect_and_migrate(&settings).await?;
            tracing::info!(db = %settings.database, "schema is up to date");
            Ok(())
        }
        Command::Config => {
            println!("environment = {:?}", settings.environment);
            println!("listen      = {}", settings.server.bind_address());
            println!("timeout_ms  = {}", settings.server.request_timeout_ms);
            println!("database    = {}", settings.database);
            println!("pool        = {:?}", settings.database.pool);
            println!("log_format  = {:?}", settings.telemetry.log_format);
            Ok(())
        }
    }
}
