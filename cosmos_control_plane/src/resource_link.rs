// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Identifies the resource a request addresses.
//!
//! The control plane addresses resources by path (`dbs/products/colls/cart`), and the
//! authorization signature covers both the resource type and the resource link, which differ
//! depending on whether a request targets a specific item or a feed (creating in, or listing, a
//! collection of resources). A [`ResourceLink`] captures all three views of the same resource.

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Databases,
    Containers,
}

impl ResourceType {
    /// The path segment for this resource type, which is also the resource type string covered by
    /// the authorization signature.
    pub(crate) fn path_segment(self) -> &'static str {
        match self {
            ResourceType::Databases => "dbs",
            ResourceType::Containers => "colls",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    /// Link of the item that owns this feed; empty at the account root.
    parent_path: String,
    resource_type: ResourceType,
    item_id: Option<String>,
}

impl ResourceLink {
    /// A feed of the given type at the account root, e.g. `dbs`.
    pub fn root(resource_type: ResourceType) -> Self {
        Self {
            parent_path: String::new(),
            resource_type,
            item_id: None,
        }
    }

    /// Narrows this feed to the item with the given id.
    pub fn item(mut self, id: impl Into<String>) -> Self {
        self.item_id = Some(id.into());
        self
    }

    /// A feed of the given type owned by this item, e.g. `dbs/products` -> `dbs/products/colls`.
    pub fn feed(self, resource_type: ResourceType) -> Self {
        Self {
            parent_path: self.link(),
            resource_type,
            item_id: None,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// The resource link covered by the authorization signature.
    ///
    /// Items sign with their own path; feeds sign with the path of their parent item (empty at
    /// the account root), per the service's access-control contract.
    pub fn link(&self) -> String {
        match &self.item_id {
            Some(id) if self.parent_path.is_empty() => {
                format!("{}/{}", self.resource_type.path_segment(), id)
            }
            Some(id) => format!(
                "{}/{}/{}",
                self.parent_path,
                self.resource_type.path_segment(),
                id
            ),
            None => self.parent_path.clone(),
        }
    }

    /// The URL path of this resource relative to the account endpoint.
    pub fn path(&self) -> String {
        if self.item_id.is_some() {
            self.link()
        } else if self.parent_path.is_empty() {
            self.resource_type.path_segment().to_string()
        } else {
            format!("{}/{}", self.parent_path, self.resource_type.path_segment())
        }
    }

    /// The absolute URL of this resource under the given account endpoint.
    pub fn url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.set_path(&self.path());
        url
    }
}
