// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file, holding the
//! details needed to reach the playlist server: the server origin and the
//! credentials it expects.

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "wavelist";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub version: u32,
    /// Base URL of the playlist server, e.g. `http://music.example.com`.
    pub origin: String,
    pub user_name: String,
    pub key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            origin: String::new(),
            user_name: String::new(),
            key: String::new(),
        }
    }
}

// confy materialises a default config file on first load, so there is a
// file to edit after the first run without an explicit store here
pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_credentials() {
        let config = AppConfig::default();
        assert_eq!(config.version, 1);
        assert!(config.origin.is_empty());
        assert!(config.user_name.is_empty());
        assert!(config.key.is_empty());
    }
}
