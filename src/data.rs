// src/data.rs
//
// Shapes that cross module boundaries: one scraped player, one team file, and
// one discovered team. Serialized field names match the on-disk team JSON.

use serde::{Deserialize, Serialize};

use crate::core::sanitize::name_key;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Numeric profile id as text; empty when the row had no profile link.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub age: String,
    #[serde(default)]
    pub nationalities: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contract: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub market_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Profile link as found; only used as a last-resort identity.
    #[serde(skip)]
    pub href: String,
}

impl PlayerRecord {
    /// Merge key: profile id, else `name_key(name)`, else the trimmed link.
    pub fn identity(&self) -> String {
        if !self.id.is_empty() {
            return self.id.clone();
        }
        let key = name_key(&self.name);
        if !key.is_empty() {
            return key;
        }
        self.href.trim().to_lowercase()
    }
}

/// One `<team id>.json` file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDocument {
    pub team: String,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
}

/// A team found on a league landing page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamEntry {
    pub team_id: String,
    /// Display name as it appeared on the page.
    pub label: String,
    pub roster_url: String,
}
