// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

//! Defines Cosmos DB's unique Authentication Policy.
//!
//! The Cosmos DB control plane doesn't use a standard `Authorization: Bearer` header for authentication.
//! Instead, it uses a custom header format, as defined in the [official documentation](https://learn.microsoft.com/rest/api/cosmos-db/access-control-on-cosmosdb-resources).
//! We implement that policy here, because we can't use any standard Azure SDK authentication policy.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Request;
use reqwest::header::HeaderValue;
use time::OffsetDateTime;
use tracing::trace;

use crate::{
    error::{ErrorKind, Result},
    pipeline::signature_target::SignatureTarget,
    resource_link::ResourceLink,
    url_encode,
};

const AZURE_VERSION: &str = "2020-07-15";
const MS_DATE: &str = "x-ms-date";
const VERSION: &str = "x-ms-version";
const AUTHORIZATION: &str = "authorization";

#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    /// One of the two service-level keys of the account, base64-encoded.
    key: String,
}

impl AuthorizationPolicy {
    pub(crate) fn from_shared_key(key: String) -> Result<Self> {
        // The signature needs the decoded key, so a key that doesn't decode is rejected here,
        // before any request is made.
        BASE64.decode(&key).map_err(|e| {
            ErrorKind::InvalidCredential
                .with_message("authorization key is not valid base64")
                .with_source(e)
        })?;
        Ok(Self { key })
    }

    pub fn enrich_request(&self, resource_link: &ResourceLink, request: &mut Request) -> Result<()> {
        trace!(link = %resource_link.link(), "signing request");

        // x-ms-date and the string used in the signature must be exactly the same, so just generate it here once.
        let date_string = super::to_rfc7231(&OffsetDateTime::now_utc()).to_lowercase();

        let auth = generate_authorization(
            &self.key,
            SignatureTarget::new(request.method().clone(), resource_link, &date_string),
        )?;

        let headers = request.headers_mut();
        headers.append(MS_DATE, header_value(&date_string)?);
        headers.append(VERSION, header_value(AZURE_VERSION)?);
        headers.append(AUTHORIZATION, header_value(&auth)?);

        Ok(())
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ErrorKind::TransportError.with_source(e))
}

/// Generates the 'Authorization' header value based on the provided values.
///
/// The signature is constructed by signing the HTTP method, resource type, resource link (the
/// relative URI) and the current time with the account key, and the result is URL-encoded as the
/// header requires.
fn generate_authorization(key: &str, signature_target: SignatureTarget<'_>) -> Result<String> {
    let token = signature_target.into_authorization(key)?;
    Ok(url_encode(token))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use reqwest::Method;

    use crate::{
        pipeline::{authorization_policy::generate_authorization, parse_rfc3339, to_rfc7231},
        pipeline::signature_target::SignatureTarget,
        resource_link::{ResourceLink, ResourceType},
        url_encode,
    };

    #[test]
    fn generate_authorization_for_primary_key_0() {
        let time_nonce = parse_rfc3339("1900-01-01T01:00:00.000000000+00:00").unwrap();
        let date_string = to_rfc7231(&time_nonce).to_lowercase();

        let key = "8F8xXXOptJxkblM1DBXW7a6NMI5oE8NnwPGYBmwxLCKfejOK7B7yhcCHMGvN3PBrlMLIOeol1Hv9RCdzAZR5sg==";

        let ret = generate_authorization(
            key,
            SignatureTarget::new(
                Method::GET,
                &ResourceLink::root(ResourceType::Databases)
                    .item("MyDatabase")
                    .feed(ResourceType::Containers)
                    .item("MyCollection"),
                &date_string,
            ),
        )
        .unwrap();

        let expected: String =
            url_encode(b"type=master&ver=1.0&sig=vrHmd02almbIg1e4htVWH+Eg/OhEHip3VTwFivZLH0A=");

        assert_eq!(ret, expected);
    }

    #[test]
    fn generate_authorization_for_primary_key_1() {
        let time_nonce = parse_rfc3339("2017-04-27T00:51:12.000000000+00:00").unwrap();
        let date_string = to_rfc7231(&time_nonce).to_lowercase();

        let key = "dsZQi3KtZmCv1ljt3VNWNm7sQUF1y5rJfC6kv5JiwvW0EndXdDku/dkKBp8/ufDToSxL";

        let ret = generate_authorization(
            key,
            SignatureTarget::new(
                Method::GET,
                &ResourceLink::root(ResourceType::Databases).item("ToDoList"),
                &date_string,
            ),
        )
        .unwrap();

        let expected: String =
            url_encode(b"type=master&ver=1.0&sig=KvBM8vONofkv3yKm/8zD9MEGlbu6jjHDJBp4E9c2ZZI=");

        assert_eq!(ret, expected);
    }
}
