//! Unlockable catalog items: plants and irrigation methods

use serde::{Deserialize, Serialize};

/// A crop the player can grow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: i64,
    pub name: String,
    pub kind: String,
    /// Time from planting to harvest, in seconds
    pub growth_secs: i64,
    /// Sale value at harvest
    pub value: i64,
}

impl Plant {
    /// Growth time as a compact human-readable string ("1h 30m", "45s")
    pub fn growth_time_display(&self) -> String {
        if self.growth_secs <= 0 {
            return "instant".to_string();
        }
        let hours = self.growth_secs / 3600;
        let minutes = (self.growth_secs % 3600) / 60;
        let seconds = self.growth_secs % 60;

        let mut parts = Vec::new();
        if hours > 0 {
            parts.push(format!("{hours}h"));
        }
        if minutes > 0 {
            parts.push(format!("{minutes}m"));
        }
        if seconds > 0 {
            parts.push(format!("{seconds}s"));
        }
        parts.join(" ")
    }
}

/// A way of watering crops, with a water-delivery efficiency in [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrigationMethod {
    pub id: i64,
    pub name: String,
    pub efficiency: f64,
    pub cost: i64,
}

impl IrrigationMethod {
    /// Efficiency formatted as a whole percentage ("80%")
    pub fn efficiency_display(&self) -> String {
        format!("{:.0}%", self.efficiency * 100.0)
    }

    pub fn is_max_efficiency(&self) -> bool {
        self.efficiency >= 1.0
    }

    /// Cost per point of efficiency; zero when efficiency is not positive
    pub fn cost_per_efficiency(&self) -> f64 {
        if self.efficiency <= 0.0 {
            return 0.0;
        }
        (self.cost as f64 / self.efficiency * 100.0).round() / 100.0
    }
}
