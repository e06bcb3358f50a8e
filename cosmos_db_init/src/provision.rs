// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The provisioning sequence: one database and its four containers.

use cosmos_control_plane::{
    CosmosControlClient, Error,
    models::{ContainerProperties, TTL_PER_ITEM},
};
use tracing::info;

/// Ensures the database and its four containers exist.
///
/// Steps run strictly in order and each one is idempotent, so a failed run can simply be rerun
/// and resumes where it left off; nothing is rolled back on failure.
pub async fn provision(client: &CosmosControlClient, database_id: &str) -> Result<(), Error> {
    // Create the database
    let database = client.create_database_if_not_exists(database_id).await?;
    info!(database = %database.id, "created database");

    let database_client = client.database_client(database_id);

    // Create the lease container
    let lease = database_client
        .create_container_if_not_exists(ContainerProperties::new("lease", "/id"))
        .await?;
    info!(container = %lease.id, "created lease container");

    // Create the cart container partitioned on /cartId, with TTL enabled but left to each item
    let cart = database_client
        .create_container_if_not_exists(
            ContainerProperties::new("cart", "/cartId").with_default_ttl(TTL_PER_ITEM),
        )
        .await?;
    info!(container = %cart.id, "created cart container");

    // Create the product container partitioned on /categoryId
    let product = database_client
        .create_container_if_not_exists(ContainerProperties::new("product", "/categoryId"))
        .await?;
    info!(container = %product.id, "created product container");

    // Create the productMeta container partitioned on /type
    let product_meta = database_client
        .create_container_if_not_exists(ContainerProperties::new("productMeta", "/type"))
        .await?;
    info!(container = %product_meta.id, "created productMeta container");

    Ok(())
}
