//! Core domain types for the farm game

mod item;
mod level;
mod progress;
mod unlock;

pub use item::{IrrigationMethod, Plant};
pub use level::{CatalogError, Level, LevelCatalog, LevelId};
pub use progress::PlayerProgress;
pub use unlock::{Unlock, UnlockReward};
