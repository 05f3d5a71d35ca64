//! The machines a laundry room has, and their built-in defaults

use std::{fmt, str::FromStr};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: i64 = 60;

/// Static configuration of one machine kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Stable identifier, also the preference key
    pub key: &'static str,
    /// Human-readable name
    pub label: &'static str,
    /// Countdown length used when no preference is stored
    pub default_minutes: u32,
}

const WASHER: MachineConfig = MachineConfig {
    key: "washer",
    label: "Washer",
    default_minutes: 45,
};

const DRYER: MachineConfig = MachineConfig {
    key: "dryer",
    label: "Dryer",
    default_minutes: 60,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineKind {
    Washer,
    Dryer,
}

impl MachineKind {
    pub const ALL: [MachineKind; 2] = [MachineKind::Washer, MachineKind::Dryer];

    pub fn config(self) -> &'static MachineConfig {
        match self {
            MachineKind::Washer => &WASHER,
            MachineKind::Dryer => &DRYER,
        }
    }

    pub fn key(self) -> &'static str {
        self.config().key
    }

    pub fn label(self) -> &'static str {
        self.config().label
    }

    /// Built-in countdown length
    pub fn default_duration(self) -> TimeDelta {
        minutes(self.config().default_minutes)
    }
}

impl fmt::Display for MachineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MachineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "washer" | "w" => Ok(MachineKind::Washer),
            "dryer" | "d" => Ok(MachineKind::Dryer),
            other => Err(format!("Unknown machine '{}' (expected washer or dryer)", other)),
        }
    }
}

/// Convert whole minutes into a countdown duration
pub fn minutes(minutes: u32) -> TimeDelta {
    TimeDelta::seconds(i64::from(minutes) * SECONDS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_typical_laundry_room() {
        assert_eq!(MachineKind::Washer.default_duration(), TimeDelta::seconds(2700));
        assert_eq!(MachineKind::Dryer.default_duration(), TimeDelta::seconds(3600));
        assert_eq!(MachineKind::Washer.key(), "washer");
        assert_eq!(MachineKind::Dryer.label(), "Dryer");
    }

    #[test]
    fn parses_names_and_short_forms() {
        assert_eq!("washer".parse(), Ok(MachineKind::Washer));
        assert_eq!(" Dryer ".parse(), Ok(MachineKind::Dryer));
        assert_eq!("w".parse(), Ok(MachineKind::Washer));
        assert_eq!("D".parse(), Ok(MachineKind::Dryer));
        assert!("oven".parse::<MachineKind>().is_err());
    }

    #[test]
    fn display_uses_preference_key() {
        for kind in MachineKind::ALL {
            assert_eq!(kind.to_string(), kind.key());
        }
    }
}
