//! Grant command implementation
//!
//! Admin-side experience grant, useful for testing and support.

use anyhow::{bail, Result};

use farmstead::config::Config;
use farmstead::GameManager;

/// Grant experience to a player
pub fn grant_command(config: &Config, player_id: i64, amount: i64) -> Result<()> {
    let manager = GameManager::open(&config.database_path())?;

    let Some(user) = manager.users().get(player_id)? else {
        bail!("No user with id {player_id}");
    };

    let (progress, outcome) = manager.grant_xp(user.id, &user.name, amount)?;

    println!("Granted {amount} xp to {} (#{})", user.name, user.id);
    println!("  XP: {}", progress.xp);
    if outcome.leveled_up() {
        let names: Vec<String> = outcome
            .levels_gained
            .iter()
            .map(|id| {
                manager
                    .catalog()
                    .get(*id)
                    .map(|l| format!("{} ({})", id, l.name))
                    .unwrap_or_else(|| id.to_string())
            })
            .collect();
        println!("  Leveled up: {}", names.join(" -> "));
    } else {
        println!("  Level: {} (unchanged)", progress.level_id);
    }

    Ok(())
}
