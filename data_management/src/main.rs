use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use health_demo_data_management::DataManager;
use health_demo_lib::privacy_mode::PrivacyMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "SessionCLI")]
#[command(about = "A CLI to inspect fitness sessions and the privacy preference", long_about = None)]
struct Cli {
    /// Data directory holding the database, preferences and the `sessions` fixtures.
    /// Defaults to `data/` in the project root
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all sessions
    List,
    /// Print a session with its measurements as JSON
    Show { session_id: i64 },
    /// Print route and heartrate statistics of a session
    Summary { session_id: i64 },
    /// Store the session in a JSON fixture file
    Import { file: PathBuf },
    /// Delete a session and its measurements
    Remove { session_id: i64 },
    /// Print the selected privacy mode
    Privacy,
    /// Select a privacy mode by id
    PrivacySet { mode_id: i32 },
    /// List the privacy modes a user can choose from
    PrivacyModes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info,health_demo_data_management=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut data_manager = match &cli.data_dir {
        Some(dir) => DataManager::start_in(dir).await,
        None => DataManager::start().await,
    }.context("Failed to start data manager")?;

    let result = run(&mut data_manager, cli.command).await;
    data_manager.close().await;
    result
}

async fn run(data_manager: &mut DataManager, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => {
            for session in data_manager.list_sessions().await? {
                println!("{}\t{}\t{}", session.id, session.session_type, session.description);
            }
        },
        Commands::Show { session_id } => {
            let session = data_manager.get_session(session_id).await?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        },
        Commands::Summary { session_id } => {
            let session = data_manager.get_session(session_id).await?;
            let Some(summary) = session.summary() else {
                bail!("Session {} has no measurements", session_id);
            };

            println!("{} ({})", session.description, session.session_type);
            println!("Measurements:\t{}", summary.measurement_count);
            println!("Time:\t\t{} - {}", summary.first_timestamp, summary.last_timestamp);
            println!("Start:\t\t{:.5}, {:.5}", summary.start.0, summary.start.1);
            println!("Destination:\t{:.5}, {:.5}", summary.destination.0, summary.destination.1);
            println!("Distance:\t{:.2} km", summary.distance);
            println!("Heartrate:\t{} - {} (avg {:.1})", summary.min_heartrate, summary.max_heartrate, summary.average_heartrate);
        },
        Commands::Import { file } => {
            let id = data_manager.import_fixture(&file).await
                .with_context(|| format!("Failed to import {:?}", file))?;
            println!("Imported session {}", id);
        },
        Commands::Remove { session_id } => {
            data_manager.remove_session(session_id).await?;
            tracing::info!("Removed session {}", session_id);
        },
        Commands::Privacy => {
            let mode = data_manager.privacy_mode();
            let pending = if data_manager.privacy_setup_pending() { " (setup pending)" } else { "" };
            println!("{}\t{}{}", mode.id(), mode, pending);
        },
        Commands::PrivacySet { mode_id } => {
            let mode = PrivacyMode::from_id(mode_id);
            if mode == PrivacyMode::Unknown {
                bail!("{} is not a selectable privacy mode, see `privacy-modes`", mode_id);
            }
            data_manager.set_privacy_mode(mode)?;
            tracing::info!("Selected privacy mode {} ({})", mode, mode.id());
        },
        Commands::PrivacyModes => {
            let current = data_manager.privacy_mode();
            for mode in PrivacyMode::user_modes() {
                let marker = if mode == current { "*" } else { " " };
                println!("{} {}\t{}\t{}", marker, mode.id(), mode, mode.icon());
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use health_demo_data_management::DataManagerError;

    use super::*;

    #[tokio::test]
    async fn remove_and_privacy_set() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("5.json");
        std::fs::write(&fixture, r#"{ "type": "run", "description": "Intervals" }"#).unwrap();

        let mut data_manager = DataManager::start_in(dir.path().join("data")).await.unwrap();

        run(&mut data_manager, Commands::Import { file: fixture }).await.unwrap();
        run(&mut data_manager, Commands::Remove { session_id: 5 }).await.unwrap();
        assert!(matches!(data_manager.get_session(5).await, Err(DataManagerError::NotFound(5))));
        assert!(run(&mut data_manager, Commands::Remove { session_id: 5 }).await.is_err());

        run(&mut data_manager, Commands::PrivacySet { mode_id: PrivacyMode::UserDefined.id() }).await.unwrap();
        assert_eq!(data_manager.privacy_mode(), PrivacyMode::UserDefined);
        assert!(!data_manager.privacy_setup_pending());

        assert!(run(&mut data_manager, Commands::PrivacySet { mode_id: 7 }).await.is_err());
        assert_eq!(data_manager.privacy_mode(), PrivacyMode::UserDefined);

        data_manager.close().await;
    }
}
