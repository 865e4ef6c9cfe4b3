//! Bridge Engine - Main entry point.
//!
//! Builds the in-memory engine, imports the configured seed hierarchy and
//! logs what was loaded.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bridge_engine::infrastructure::seed::{import_seed, load_seed_file};
use bridge_engine::infrastructure::settings::EngineSettings;
use bridge_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bridge_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bridge Engine");

    let settings = EngineSettings::from_env();
    tracing::info!(
        shortfall_policy = %settings.shortfall_policy,
        default_locale = %settings.default_locale,
        seed_path = ?settings.seed_path,
        "Loaded settings"
    );

    let app = App::in_memory(settings);

    match app.settings.seed_path.clone() {
        Some(path) => {
            let roots = load_seed_file(&path).await?;
            import_seed(&app.hierarchy, &roots).await?;
        }
        None => tracing::info!("No seed file configured, starting with an empty hierarchy"),
    }

    for root in app.hierarchy.roots().await? {
        let size = app.hierarchy.subtree_size(root.id()).await?;
        tracing::info!(
            root = %root.name(),
            root_id = %root.id(),
            nodes = size,
            "Hierarchy root"
        );
    }
    tracing::info!(
        total_nodes = app.hierarchy.count().await?,
        "Bridge Engine ready"
    );

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
