// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A thin client for the Cosmos DB control plane.
//!
//! Covers the handful of account-management operations a provisioning tool needs: creating and
//! reading databases and containers, authorized with one of the account's shared keys. Requests
//! are plain HTTPS against the account endpoint, signed per the service's
//! [access-control contract](https://learn.microsoft.com/rest/api/cosmos-db/access-control-on-cosmosdb-resources).

use reqwest::{
    Client, Method, Request, Response, StatusCode, Url,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::pipeline::AuthorizationPolicy;

mod error;
pub mod models;
mod pipeline;
mod resource_link;

pub(crate) use error::Result;
pub use error::{Error, ErrorKind};
pub use resource_link::{ResourceLink, ResourceType};

use crate::models::{ContainerProperties, DatabaseProperties};

/// Well-known endpoint of the local emulator, which serves a self-signed certificate.
const EMULATOR_ENDPOINT: &str = "https://localhost:8081";

const ACTIVITY_ID: &str = "x-ms-activity-id";

fn url_encode(s: impl AsRef<[u8]>) -> String {
    url::form_urlencoded::byte_serialize(s.as_ref()).collect::<String>()
}

pub struct CosmosControlClient {
    endpoint: Url,
    client: Client,
    auth_policy: AuthorizationPolicy,
}

impl CosmosControlClient {
    /// Creates a client for the account at `endpoint`, authorizing with the given shared key.
    ///
    /// Fails with [`ErrorKind::InvalidCredential`] when the key is not valid base64, so an
    /// unusable key is rejected before any request is made. Dropping the client releases its
    /// connections, on every exit path.
    pub fn new(endpoint: Url, key: String) -> Result<Self> {
        if endpoint.cannot_be_a_base() {
            return Err(ErrorKind::InvalidEndpoint
                .with_message(format!("'{endpoint}' cannot serve as an account endpoint")));
        }

        let mut builder = Client::builder()
            .user_agent(concat!("cosmos-db-init/", env!("CARGO_PKG_VERSION")));
        if endpoint.as_str().trim_end_matches('/') == EMULATOR_ENDPOINT {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| ErrorKind::TransportError.with_source(e))?;
        let auth_policy = AuthorizationPolicy::from_shared_key(key)?;
        Ok(Self {
            endpoint,
            client,
            auth_policy,
        })
    }

    /// Ensures the database `id` exists.
    ///
    /// A `409 Conflict` means the database already exists; the existing descriptor is read back
    /// and returned unchanged, making the call idempotent.
    pub async fn create_database_if_not_exists(&self, id: &str) -> Result<DatabaseProperties> {
        let feed = ResourceLink::root(ResourceType::Databases);
        let body = serde_json::to_string(&DatabaseProperties::new(id))?;
        let response = self.send(&feed, Method::POST, Some(body)).await?;

        if response.status() == StatusCode::CONFLICT {
            debug!(database = id, "database already exists");
            return self.database_client(id).read().await;
        }

        read_json(check_response(response).await?).await
    }

    /// A handle scoped to the database `id`. The database is not required to exist yet.
    pub fn database_client(&self, id: &str) -> DatabaseClient<'_> {
        DatabaseClient {
            client: self,
            link: ResourceLink::root(ResourceType::Databases).item(id),
        }
    }

    async fn send(
        &self,
        link: &ResourceLink,
        method: Method,
        body: Option<String>,
    ) -> Result<Response> {
        let mut request = Request::new(method, link.url(&self.endpoint));
        if let Some(body) = body {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *request.body_mut() = Some(body.into());
        }
        self.auth_policy.enrich_request(link, &mut request)?;
        Ok(self.client.execute(request).await?)
    }
}

pub struct DatabaseClient<'a> {
    client: &'a CosmosControlClient,
    link: ResourceLink,
}

impl DatabaseClient<'_> {
    /// Reads the database descriptor.
    pub async fn read(&self) -> Result<DatabaseProperties> {
        let response = self.client.send(&self.link, Method::GET, None).await?;
        read_json(check_response(response).await?).await
    }

    /// Ensures a container with the given properties exists in this database.
    ///
    /// A `409 Conflict` means a container with that id already exists; it is read back and
    /// returned unchanged, unless its partition key paths differ from the requested ones, in
    /// which case the call fails with [`ErrorKind::ResourceConflict`]. The existing container is
    /// never modified either way.
    pub async fn create_container_if_not_exists(
        &self,
        properties: ContainerProperties,
    ) -> Result<ContainerProperties> {
        let feed = self.link.clone().feed(ResourceType::Containers);
        let body = serde_json::to_string(&properties)?;
        let response = self.client.send(&feed, Method::POST, Some(body)).await?;

        if response.status() == StatusCode::CONFLICT {
            debug!(container = %properties.id, "container already exists");
            let existing = self.read_container(&properties.id).await?;
            if existing.partition_key.paths != properties.partition_key.paths {
                return Err(ErrorKind::ResourceConflict.with_message(format!(
                    "container '{}' already exists with partition key paths {:?}, not {:?}",
                    properties.id, existing.partition_key.paths, properties.partition_key.paths
                )));
            }
            return Ok(existing);
        }

        read_json(check_response(response).await?).await
    }

    /// Reads the descriptor of the container `id`.
    pub async fn read_container(&self, id: &str) -> Result<ContainerProperties> {
        let link = self.link.clone().feed(ResourceType::Containers).item(id);
        let response = self.client.send(&link, Method::GET, None).await?;
        read_json(check_response(response).await?).await
    }
}

/// Turns a non-success response into a [`ErrorKind::ServiceError`] carrying the status, the
/// request's activity id, and the service's diagnostic payload.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let activity_id = response
        .headers()
        .get(ACTIVITY_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.text().await.unwrap_or_default();

    let mut error = Error::from(ErrorKind::ServiceError)
        .with_message("service request failed")
        .with_status(status)
        .with_body(body);
    if let Some(activity_id) = activity_id {
        error = error.with_activity_id(activity_id);
    }
    Err(error)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ErrorKind::DeserializationError.with_source(e).with_body(body))
}
