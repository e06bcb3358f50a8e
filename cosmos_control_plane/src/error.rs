// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{borrow::Cow, fmt::Display};

use reqwest::StatusCode;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Indicates that the account endpoint cannot serve as a base for resource URLs.
    InvalidEndpoint,

    /// Indicates that the authorization key cannot be used to sign requests, for example because it is not valid base64.
    InvalidCredential,

    /// Indicates a request-level failure (connection, TLS, or reading the response body), the details of which should be available in [`Error::source`](std::error::Error::source).
    TransportError,

    /// Indicates that the service answered with a non-success status.
    ///
    /// The status, activity id, and diagnostic payload returned by the service are available on the [`Error`].
    ServiceError,

    /// Indicates that a resource already exists with a definition incompatible with the requested one.
    ///
    /// "Create if not exists" never modifies an existing resource, so an immutable setting (the partition key) that differs from the request is surfaced as this error.
    ResourceConflict,

    /// Indicates that a response body could not be deserialized, the details of which should be available in [`Error::source`](std::error::Error::source).
    DeserializationError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidEndpoint => write!(f, "invalid account endpoint"),
            ErrorKind::InvalidCredential => write!(f, "invalid authorization key"),
            ErrorKind::TransportError => write!(f, "transport error"),
            ErrorKind::ServiceError => write!(f, "service error"),
            ErrorKind::ResourceConflict => write!(f, "conflicting resource definition"),
            ErrorKind::DeserializationError => write!(f, "deserialization error"),
        }
    }
}

impl ErrorKind {
    pub fn with_source(self, source: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(self).with_source(source)
    }

    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error {
        Error::from(self).with_message(message)
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    message: Option<Cow<'static, str>>,
    status: Option<StatusCode>,
    activity_id: Option<String>,
    body: Option<String>,
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            source: None,
            message: None,
            status: None,
            activity_id: None,
            body: None,
        }
    }
}

impl Error {
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_activity_id(mut self, activity_id: impl Into<String>) -> Self {
        self.activity_id = Some(activity_id.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The HTTP status the service answered with, if the error came from a service response.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The `x-ms-activity-id` of the failed request, if the service returned one.
    pub fn activity_id(&self) -> Option<&str> {
        self.activity_id.as_deref()
    }

    /// The raw diagnostic payload the service answered with, if any.
    pub fn diagnostics(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{message}")?,
            None => write!(f, "{}", self.kind)?,
        }
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source = self.source.as_ref()?;
        Some(&**source)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        ErrorKind::TransportError.with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        ErrorKind::DeserializationError.with_source(err)
    }
}
