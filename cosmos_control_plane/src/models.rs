// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Wire models for control-plane resources.
//!
//! Responses carry system-generated properties (`_rid`, `_etag`, `_ts`, ...) beyond these fields;
//! they are ignored on deserialization.

use serde::{Deserialize, Serialize};

/// `defaultTtl` sentinel: expiry is enabled on the container, but no item expires unless it sets
/// its own `ttl`.
pub const TTL_PER_ITEM: i64 = -1;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseProperties {
    pub id: String,
}

impl DatabaseProperties {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartitionKeyDefinition {
    pub paths: Vec<String>,
    #[serde(default = "default_partition_key_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
}

fn default_partition_key_kind() -> String {
    "Hash".to_string()
}

impl From<&str> for PartitionKeyDefinition {
    /// A single-path hash partition key, the only shape this tool provisions.
    fn from(path: &str) -> Self {
        Self {
            paths: vec![path.to_string()],
            kind: default_partition_key_kind(),
            version: Some(2),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerProperties {
    pub id: String,
    pub partition_key: PartitionKeyDefinition,
    /// Time-to-live for items, in seconds. Absent means expiry is disabled; see [`TTL_PER_ITEM`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ttl: Option<i64>,
}

impl ContainerProperties {
    pub fn new(id: impl Into<String>, partition_key_path: &str) -> Self {
        Self {
            id: id.into(),
            partition_key: partition_key_path.into(),
            default_ttl: None,
        }
    }

    pub fn with_default_ttl(mut self, ttl: i64) -> Self {
        self.default_ttl = Some(ttl);
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{ContainerProperties, TTL_PER_ITEM};

    #[test]
    fn container_with_ttl_serializes_the_service_shape() {
        let properties = ContainerProperties::new("cart", "/cartId").with_default_ttl(TTL_PER_ITEM);

        let serialized = serde_json::to_value(&properties).unwrap();
        assert_eq!(
            serialized,
            json!({
                "id": "cart",
                "partitionKey": {
                    "paths": ["/cartId"],
                    "kind": "Hash",
                    "version": 2,
                },
                "defaultTtl": -1,
            })
        );
    }

    #[test]
    fn default_ttl_is_omitted_when_unset() {
        let properties = ContainerProperties::new("product", "/categoryId");

        let serialized = serde_json::to_value(&properties).unwrap();
        assert!(serialized.get("defaultTtl").is_none());
    }

    #[test]
    fn deserialization_ignores_system_properties() {
        let body = json!({
            "id": "lease",
            "partitionKey": { "paths": ["/id"], "kind": "Hash", "version": 2 },
            "indexingPolicy": { "indexingMode": "consistent" },
            "_rid": "1tAvAA==",
            "_etag": "\"00000000-0000-0000-0000-000000000000\"",
            "_ts": 1650000000,
        })
        .to_string();

        let properties: ContainerProperties = serde_json::from_str(&body).unwrap();
        assert_eq!(properties, ContainerProperties::new("lease", "/id"));
    }

    #[test]
    fn partition_key_kind_defaults_to_hash() {
        let body = json!({
            "id": "lease",
            "partitionKey": { "paths": ["/id"], "version": 2 },
        })
        .to_string();

        let properties: ContainerProperties = serde_json::from_str(&body).unwrap();
        assert_eq!(properties.partition_key.kind, "Hash");
    }
}
