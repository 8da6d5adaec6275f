//! Capability enum for the `provides` field
//!
//! A capability names a unified app schema (Tasks, Books, Contacts, ...)
//! that multiple connectors can implement. The external host uses it to
//! route app-level requests to whichever connector provides it.

use serde::{Deserialize, Serialize};

/// A unified app capability a tool can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Tasks,
    Notes,
    Events,
    Contacts,
    Books,
    Files,
    Mail,
    Messages,
    Music,
}

impl Capability {
    /// Returns all recognized capabilities
    pub fn all() -> &'static [Capability] {
        &[
            Capability::Tasks,
            Capability::Notes,
            Capability::Events,
            Capability::Contacts,
            Capability::Books,
            Capability::Files,
            Capability::Mail,
            Capability::Messages,
            Capability::Music,
        ]
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Capability::Tasks => "tasks",
            Capability::Notes => "notes",
            Capability::Events => "events",
            Capability::Contacts => "contacts",
            Capability::Books => "books",
            Capability::Files => "files",
            Capability::Mail => "mail",
            Capability::Messages => "messages",
            Capability::Music => "music",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tasks" => Ok(Capability::Tasks),
            "notes" => Ok(Capability::Notes),
            "events" => Ok(Capability::Events),
            "contacts" => Ok(Capability::Contacts),
            "books" => Ok(Capability::Books),
            "files" => Ok(Capability::Files),
            "mail" => Ok(Capability::Mail),
            "messages" => Ok(Capability::Messages),
            "music" => Ok(Capability::Music),
            _ => Err(format!("Unknown capability: {}", s)),
        }
    }
}
