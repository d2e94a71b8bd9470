use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regional platforms hosting the RMM API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Pinotage,
    Merlot,
    Concord,
    Vidal,
    Zinfandel,
    Syrah,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Pinotage,
        Platform::Merlot,
        Platform::Concord,
        Platform::Vidal,
        Platform::Zinfandel,
        Platform::Syrah,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Platform::Pinotage => "pinotage",
            Platform::Merlot => "merlot",
            Platform::Concord => "concord",
            Platform::Vidal => "vidal",
            Platform::Zinfandel => "zinfandel",
            Platform::Syrah => "syrah",
        }
    }

    /// API base URL for this platform.
    pub fn api_url(self) -> &'static str {
        match self {
            Platform::Pinotage => "https://pinotage-api.centrastage.net",
            Platform::Merlot => "https://merlot-api.centrastage.net",
            Platform::Concord => "https://concord-api.centrastage.net",
            Platform::Vidal => "https://vidal-api.centrastage.net",
            Platform::Zinfandel => "https://zinfandel-api.centrastage.net",
            Platform::Syrah => "https://syrah-api.centrastage.net",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Platform::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| format!("unknown platform '{}'", s))
    }
}
