//! Access identity (role + user id) and data-source mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParseError;

/// Role sent in the `X-Role` header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Trader,
}

impl Role {
    /// Header / storage spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Trader => "TRADER",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Role::Admin => Role::Trader,
            Role::Trader => Role::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "TRADER" => Ok(Role::Trader),
            _ => Err(ParseError::Role(s.to_string())),
        }
    }
}

/// Identity attached to every live request.
///
/// Stored as `{"role":"TRADER","telegram_user_id":1001}` so that a record
/// written by older clients reads back unchanged. A numeric string id
/// (`"1001"`) is read as the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessState {
    pub role: Role,
    #[serde(rename = "telegram_user_id", deserialize_with = "coerce_id")]
    pub identity_id: i64,
}

impl AccessState {
    pub const DEFAULT_IDENTITY_ID: i64 = 1001;

    pub fn new(role: Role, identity_id: i64) -> Self {
        Self { role, identity_id }
    }
}

impl Default for AccessState {
    fn default() -> Self {
        Self {
            role: Role::Trader,
            identity_id: Self::DEFAULT_IDENTITY_ID,
        }
    }
}

fn coerce_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid user id `{}`", s))),
    }
}

/// Where data comes from: bundled fixtures or the live API.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiMode {
    #[default]
    Demo,
    Api,
}

impl UiMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UiMode::Demo => "demo",
            UiMode::Api => "api",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UiMode::Demo => UiMode::Api,
            UiMode::Api => UiMode::Demo,
        }
    }
}

impl fmt::Display for UiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UiMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(UiMode::Demo),
            "api" | "live" => Ok(UiMode::Api),
            _ => Err(ParseError::Mode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_uses_legacy_field_name() {
        let json = serde_json::to_string(&AccessState::new(Role::Admin, 42)).unwrap();
        assert_eq!(json, r#"{"role":"ADMIN","telegram_user_id":42}"#);

        let back: AccessState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AccessState::new(Role::Admin, 42));
    }

    #[test]
    fn numeric_string_id_is_coerced() {
        let access: AccessState =
            serde_json::from_str(r#"{"role":"ADMIN","telegram_user_id":" 12"}"#).unwrap();
        assert_eq!(access, AccessState::new(Role::Admin, 12));

        assert!(serde_json::from_str::<AccessState>(r#"{"role":"ADMIN","telegram_user_id":"abc"}"#).is_err());
        assert!(serde_json::from_str::<AccessState>(r#"{"role":"ADMIN","telegram_user_id":1.5}"#).is_err());
    }

    #[test]
    fn default_identity_is_trader_1001() {
        let access = AccessState::default();
        assert_eq!(access.role, Role::Trader);
        assert_eq!(access.identity_id, 1001);
    }

    #[test]
    fn role_and_mode_parse_case_insensitively() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" TRADER ".parse::<Role>(), Ok(Role::Trader));
        assert!("root".parse::<Role>().is_err());

        assert_eq!("API".parse::<UiMode>(), Ok(UiMode::Api));
        assert_eq!("demo".parse::<UiMode>(), Ok(UiMode::Demo));
        assert!("offline".parse::<UiMode>().is_err());
    }

    #[test]
    fn toggles_flip() {
        assert_eq!(Role::Trader.toggled(), Role::Admin);
        assert_eq!(UiMode::Api.toggled(), UiMode::Demo);
    }
}
