//! Serve command implementation

use anyhow::Result;
use tracing::info;

use farmstead::config::Config;
use farmstead::server::GameServer;
use farmstead::GameManager;

/// Run the API server until the process is stopped
pub fn serve_command(config: &Config) -> Result<()> {
    let db_path = config.database_path();
    info!("Opening game database at {}", db_path.display());
    let manager = GameManager::open(&db_path)?;
    info!(
        "Level catalog loaded: {} levels, top level '{}'",
        manager.catalog().len(),
        manager.catalog().max_level().name
    );

    let server = GameServer::bind(manager, &config.bind_addr())?;
    server.run();
    Ok(())
}
