// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The canonical string-to-sign for key-based authorization.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use openssl::{hash::MessageDigest, pkey::PKey, sign::Signer};
use reqwest::Method;

use crate::{
    error::{ErrorKind, Result},
    resource_link::ResourceLink,
};

/// The parts of a request covered by the authorization signature.
///
/// The service recomputes the same string on its side, so every component must match the request
/// exactly: the HTTP method, the resource type, the resource link, and the `x-ms-date` header
/// value, all lowercased, newline-separated, with two trailing newlines.
pub struct SignatureTarget<'a> {
    method: Method,
    resource_link: &'a ResourceLink,
    date_string: &'a str,
}

impl<'a> SignatureTarget<'a> {
    pub fn new(method: Method, resource_link: &'a ResourceLink, date_string: &'a str) -> Self {
        Self {
            method,
            resource_link,
            date_string,
        }
    }

    fn string_to_sign(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n\n",
            self.method.as_str().to_lowercase(),
            self.resource_link.resource_type().path_segment(),
            self.resource_link.link(),
            self.date_string,
        )
    }

    /// Signs the canonical string with the account's primary key (HMAC-SHA256 over the
    /// base64-decoded key) and renders the `authorization` token, not yet URL-encoded.
    pub fn into_authorization(self, key: &str) -> Result<String> {
        let key = BASE64.decode(key).map_err(|e| {
            ErrorKind::InvalidCredential
                .with_message("authorization key is not valid base64")
                .with_source(e)
        })?;

        let key = PKey::hmac(&key).map_err(|e| ErrorKind::InvalidCredential.with_source(e))?;
        let mut signer = Signer::new(MessageDigest::sha256(), &key)
            .map_err(|e| ErrorKind::InvalidCredential.with_source(e))?;
        signer
            .update(self.string_to_sign().as_bytes())
            .map_err(|e| ErrorKind::InvalidCredential.with_source(e))?;
        let signature = signer
            .sign_to_vec()
            .map_err(|e| ErrorKind::InvalidCredential.with_source(e))?;

        Ok(format!(
            "type=master&ver=1.0&sig={}",
            BASE64.encode(signature)
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use reqwest::Method;

    use super::SignatureTarget;
    use crate::resource_link::{ResourceLink, ResourceType};

    #[test]
    fn string_to_sign_is_lowercased_and_newline_terminated() {
        let link = ResourceLink::root(ResourceType::Databases)
            .item("products")
            .feed(ResourceType::Containers);
        let target = SignatureTarget::new(Method::POST, &link, "thu, 27 apr 2017 00:51:12 gmt");

        assert_eq!(
            target.string_to_sign(),
            "post\ncolls\ndbs/products\nthu, 27 apr 2017 00:51:12 gmt\n\n"
        );
    }
}
