// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Loads and validates `appSettings.json`.
//!
//! The endpoint URL and authorization key are available from the Azure Management Portal on the
//! account blade under "Keys". Together they provide administrative access to the account, so the
//! settings file must be kept in a safe and secure location.

use std::{fmt::Display, fs, path::Path};

use serde::Deserialize;
use url::Url;

/// The key shipped in the sample settings file. Running with it means the file was never edited,
/// so it is rejected before any request is made.
const PLACEHOLDER_KEY: &str = "Super secret key";

const DEFAULT_DATABASE_ID: &str = "products";

#[derive(Debug, Deserialize)]
struct AppSettings {
    #[serde(rename = "EndPointUrl", default)]
    end_point_url: Option<String>,
    #[serde(rename = "AuthorizationKey", default)]
    authorization_key: Option<String>,
    #[serde(rename = "DatabaseId", default)]
    database_id: Option<String>,
}

/// Validated configuration for one provisioning run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: Url,
    pub authorization_key: String,
    pub database_id: String,
}

impl Settings {
    /// Reads and validates settings from a JSON file. Unknown fields are ignored; the file is
    /// never written to.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let settings: AppSettings = serde_json::from_str(raw).map_err(ConfigError::Parse)?;

        let endpoint = match settings.end_point_url {
            Some(url) if !url.is_empty() => url,
            _ => return Err(ConfigError::MissingEndpoint),
        };
        let endpoint = endpoint.parse().map_err(ConfigError::InvalidEndpoint)?;

        let authorization_key = match settings.authorization_key {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_KEY => key,
            _ => return Err(ConfigError::InvalidCredential),
        };

        let database_id = settings
            .database_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_ID.to_string());

        Ok(Self {
            endpoint,
            authorization_key,
            database_id,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// `EndPointUrl` is absent or empty.
    MissingEndpoint,

    /// `EndPointUrl` is not a valid URL.
    InvalidEndpoint(url::ParseError),

    /// `AuthorizationKey` is absent, empty, or still the sample placeholder.
    InvalidCredential,

    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::MissingEndpoint => {
                write!(f, "please specify a valid EndPointUrl in appSettings.json")
            }
            ConfigError::InvalidEndpoint(_) => {
                write!(f, "the EndPointUrl in appSettings.json is not a valid URL")
            }
            ConfigError::InvalidCredential => {
                write!(
                    f,
                    "please specify a valid AuthorizationKey in appSettings.json"
                )
            }
            ConfigError::Io(_) => write!(f, "failed to read appSettings.json"),
            ConfigError::Parse(_) => write!(f, "appSettings.json is not valid JSON"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidEndpoint(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::MissingEndpoint | ConfigError::InvalidCredential => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ConfigError, Settings};

    #[test]
    fn valid_settings_parse() {
        let settings = Settings::from_json(
            r#"{
                "EndPointUrl": "https://example.documents.azure.com",
                "AuthorizationKey": "c29tZSByZWFsIGtleQ=="
            }"#,
        )
        .unwrap();

        assert_eq!(
            settings.endpoint.as_str(),
            "https://example.documents.azure.com/"
        );
        assert_eq!(settings.authorization_key, "c29tZSByZWFsIGtleQ==");
        assert_eq!(settings.database_id, "products");
    }

    #[test]
    fn database_id_can_be_overridden() {
        let settings = Settings::from_json(
            r#"{
                "EndPointUrl": "https://example.documents.azure.com",
                "AuthorizationKey": "c29tZSByZWFsIGtleQ==",
                "DatabaseId": "staging-products"
            }"#,
        )
        .unwrap();

        assert_eq!(settings.database_id, "staging-products");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let settings = Settings::from_json(
            r#"{
                "EndPointUrl": "https://example.documents.azure.com",
                "AuthorizationKey": "c29tZSByZWFsIGtleQ==",
                "ConnectionMode": "Gateway"
            }"#,
        );

        assert!(settings.is_ok());
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let result = Settings::from_json(r#"{ "AuthorizationKey": "c29tZSByZWFsIGtleQ==" }"#);
        assert!(matches!(result, Err(ConfigError::MissingEndpoint)));
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let result = Settings::from_json(
            r#"{ "EndPointUrl": "", "AuthorizationKey": "c29tZSByZWFsIGtleQ==" }"#,
        );
        assert!(matches!(result, Err(ConfigError::MissingEndpoint)));
    }

    #[test]
    fn unparseable_endpoint_is_rejected() {
        let result = Settings::from_json(
            r#"{ "EndPointUrl": "not a url", "AuthorizationKey": "c29tZSByZWFsIGtleQ==" }"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidEndpoint(_))));
    }

    #[test]
    fn missing_key_is_rejected() {
        let result =
            Settings::from_json(r#"{ "EndPointUrl": "https://example.documents.azure.com" }"#);
        assert!(matches!(result, Err(ConfigError::InvalidCredential)));
    }

    #[test]
    fn placeholder_key_is_rejected() {
        let result = Settings::from_json(
            r#"{
                "EndPointUrl": "https://example.documents.azure.com",
                "AuthorizationKey": "Super secret key"
            }"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidCredential)));
    }
}
