//! Logical backend targets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named backend role, decoupled from the origin it currently maps to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseTarget {
    /// Authorization server
    #[serde(rename = "auth")]
    Auth,
    /// Generic API
    #[default]
    #[serde(rename = "api")]
    Api,
    /// Versioned user API
    #[serde(rename = "apiV1")]
    ApiV1,
}

impl BaseTarget {
    pub const ALL: [Self; 3] = [Self::Auth, Self::Api, Self::ApiV1];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Api => "api",
            Self::ApiV1 => "apiV1",
        }
    }
}

impl fmt::Display for BaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auth" => Ok(Self::Auth),
            "api" => Ok(Self::Api),
            "apiv1" | "api_v1" => Ok(Self::ApiV1),
            _ => Err(format!("Invalid BaseTarget: {s}")),
        }
    }
}
