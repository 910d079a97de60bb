use anyhow::Result;
use clap::Parser;
use log::info;

use taxon::implementations::config::GatewayConfig;
use taxon::implementations::gateway::HttpKnowledgeGateway;
use taxon::session::EditorSession;

mod cli;
use cli::{Commands, TaxonCli};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up TAXON_SERVICE_URL and friends from a local .env, if present
    dotenv::dotenv().ok();

    // Parse the command line arguments
    let cli = TaxonCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    // Build the gateway and the editing session
    let config = GatewayConfig::resolve(cli.config.as_deref())?;
    let gateway = HttpKnowledgeGateway::new(config)?;
    let mut session = EditorSession::new(Box::new(gateway));

    // Every command operates on a fresh schema snapshot
    let spinner = cli::ui::create_spinner("Syncing with the knowledge service...");
    let refreshed = session.refresh().await;
    spinner.finish_and_clear();
    if let Err(e) = refreshed {
        cli::ui::print_error(&e.to_string());
        return Err(e.into());
    }

    let outcome = match &cli.command {
        Commands::Types { action } => cli::commands::schema::types(&mut session, action).await,
        Commands::Props { action } => cli::commands::schema::props(&mut session, action).await,
        Commands::Values { property, action } => {
            cli::commands::schema::values(&mut session, property, action).await
        }
        Commands::Assign { type_id, property } => {
            cli::commands::assign::assign(&mut session, *type_id, property).await
        }
        Commands::Unassign { type_id, property } => {
            cli::commands::assign::unassign(&mut session, *type_id, property).await
        }
        Commands::Set {
            type_id,
            property,
            value,
        } => cli::commands::assign::set(&mut session, *type_id, property, value).await,
        Commands::Unset {
            type_id,
            property,
            value,
        } => cli::commands::assign::unset(&mut session, *type_id, property, value).await,
        Commands::Show { type_id, property } => {
            cli::commands::assign::show(&mut session, *type_id, property.as_deref()).await
        }
        Commands::Check => cli::commands::audit::check(&session).await,
        Commands::Classify {
            ai,
            values,
            interactive,
        } => cli::commands::audit::classify(&session, *ai, values, *interactive).await,
    };

    if let Err(e) = &outcome {
        cli::ui::print_error(&e.to_string());
    }
    outcome
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Warn,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
