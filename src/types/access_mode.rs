use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// AccessMode is the level of access a user holds on a repository.
/// Levels are ordered: each one implies every level below it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    #[default]
    None,
    Read,
    Write,
    Admin,
    Owner,
}

impl AccessMode {
    pub const fn as_i64(self) -> i64 {
        match self {
            AccessMode::None => 0,
            AccessMode::Read => 1,
            AccessMode::Write => 2,
            AccessMode::Admin => 3,
            AccessMode::Owner => 4,
        }
    }

    /// Converts a stored integer to a mode. Unknown values clamp to the nearest level.
    pub const fn from_i64(value: i64) -> Self {
        match value {
            i64::MIN..=0 => AccessMode::None,
            1 => AccessMode::Read,
            2 => AccessMode::Write,
            3 => AccessMode::Admin,
            _ => AccessMode::Owner,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AccessMode::None => "none",
            AccessMode::Read => "read",
            AccessMode::Write => "write",
            AccessMode::Admin => "admin",
            AccessMode::Owner => "owner",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(AccessMode::None),
            "read" => Ok(AccessMode::Read),
            "write" => Ok(AccessMode::Write),
            "admin" => Ok(AccessMode::Admin),
            "owner" => Ok(AccessMode::Owner),
            other => Err(format!("invalid access mode: {other}")),
        }
    }
}

impl From<i64> for AccessMode {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<AccessMode> for i64 {
    fn from(mode: AccessMode) -> Self {
        mode.as_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_mode_ordering() {
        assert!(AccessMode::Owner > AccessMode::Admin);
        assert!(AccessMode::Write >= AccessMode::Read);
        assert!(AccessMode::None < AccessMode::Read);
    }

    #[test]
    fn test_access_mode_from_i64_clamps() {
        assert_eq!(AccessMode::from_i64(-3), AccessMode::None);
        assert_eq!(AccessMode::from_i64(2), AccessMode::Write);
        assert_eq!(AccessMode::from_i64(99), AccessMode::Owner);
    }

    #[test]
    fn test_parse_access_mode() {
        assert_eq!("Read".parse::<AccessMode>(), Ok(AccessMode::Read));
        assert!("invalid".parse::<AccessMode>().is_err());
    }
}
