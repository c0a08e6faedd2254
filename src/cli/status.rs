//! Status command implementation

use anyhow::Result;

use farmstead::config::Config;
use farmstead::GameManager;

/// Show a player's progression
pub fn status_command(config: &Config, player_id: i64) -> Result<()> {
    let manager = GameManager::open(&config.database_path())?;

    let Some(progress) = manager.progress().get(player_id)? else {
        println!("No progress recorded for player #{player_id}.");
        return Ok(());
    };

    let engine = manager.progression();
    let catalog = manager.catalog();
    let level_name = catalog
        .get(progress.level_id)
        .map(|l| l.name.as_str())
        .unwrap_or("<unknown level>");

    println!("Player #{} - {}", progress.player_id, progress.display_name);
    println!("  Level: {} ({})", progress.level_id, level_name);
    println!("  XP: {}", progress.xp);

    match catalog.next_level(progress.level_id) {
        Some(next) => println!(
            "  Next: {} at {} xp ({:.0}% there)",
            next.name,
            next.xp_required,
            engine.progress_to_next_level(&progress)
        ),
        None => println!("  At the top of the ladder."),
    }

    let unlocks = engine.available_unlocks(&progress)?;
    println!("  Unlocks: {}", unlocks.len());
    for unlock in unlocks {
        println!(
            "    [{}] {} #{}",
            unlock.level_id,
            unlock.reward.kind(),
            unlock.reward.item_id()
        );
    }

    Ok(())
}
