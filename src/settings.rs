// Import necessary libraries and modules for file I/O and serialization.
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::rot::{DEFAULT_SUIT_RATING, RESISTANT_DICE};

pub const SETTINGS_FILE: &str = "settings.json";

// Define a structure to hold application settings with serialization and deserialization capabilities.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub animation_ms: u64,        // How long the front end shows dice tumbling.
    pub resistant_dice: u32,      // Green dice granted by the rot resistant talent.
    pub default_suit_rating: u8,  // Starting rating of a newly donned rot suit.
    pub debug_mode: bool,         // Flag to enable or disable debug logging.
    pub data_dir: Option<PathBuf>, // Overrides where history and the sheet are stored.
}

// Implement the Default trait for Settings to provide a method to create default settings.
impl Default for Settings {
    fn default() -> Self {
        Settings {
            animation_ms: 1000,
            resistant_dice: RESISTANT_DICE,
            default_suit_rating: DEFAULT_SUIT_RATING,
            debug_mode: false,
            data_dir: None,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    // Settings are optional: a missing or broken file means defaults.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        if !path.exists() {
            return Self::default();
        }
        Self::load_settings_from_file(&path).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings at {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, data_dir: &Path) -> io::Result<()> {
        self.save_to_file(&data_dir.join(SETTINGS_FILE))
    }

    // Load settings from a specified file path.
    pub fn load_settings_from_file(path: &Path) -> io::Result<Self> {
        let data = fs::read_to_string(path)?; // Read settings from file.
        let settings = serde_json::from_str(&data)?; // Deserialize JSON data into settings.
        Ok(settings)
    }

    // Save current settings to a specified file path.
    pub fn save_to_file(&self, path: &Path) -> io::Result<()> {
        let data = serde_json::to_string_pretty(self)?; // Serialize settings into pretty JSON format.
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?; // Create or overwrite the file.
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    // Where history and the character sheet live.
    pub fn storage_dir(&self, default_dir: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| default_dir.to_path_buf())
    }
}
