//! # Schema Source
//!
//! Fetches OpenAPI documents from an authenticated documentation server and
//! answers `$ref` lookups against them.
//!
//! ## Flow
//!
//! ```text
//! SchemaSource::connect ── POST {base}/user/auth/login ──► Session { access, refresh }
//!        │
//!        ▼
//! fetch_document(url) ── GET url (Bearer access) ──► 200 ──► ApiDocument
//!                                     │
//!                                    401
//!                                     ▼
//!                 refresh (POST {base}/user/auth/refresh)
//!                 └─ on failure: full re-login
//!                                     ▼
//!                           retry once, then give up
//! ```
//!
//! Every call goes through [`session::with_auth_retry`], a bounded retry
//! combinator that performs at most [`session::MAX_AUTH_RETRIES`] retries per
//! original request. Domains are fetched one after another against a single
//! [`Session`]; parallel requests would race the token refresh.
//!
//! ## `$ref` Resolution
//!
//! [`ApiDocument::resolve_ref`] walks `#/a/b/c` as `doc.a.b.c` and returns
//! `None` with a warning when any segment is missing. Callers degrade: a field
//! or schema that cannot be resolved is skipped, and the run continues.

mod document;
mod session;
mod transport;


pub use document::{load_document_file, ApiDocument, HTTP_METHODS};
pub use session::{with_auth_retry, Session, MAX_AUTH_RETRIES};
pub use transport::{HttpTransport, Reply, Transport};

use crate::settings::Credentials;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure while talking to the documentation server.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("credentials are not configured (SWAGGER_USERNAME / SWAGGER_PASSWORD)")]
    MissingCredentials,
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode document from {origin}: {message}")]
    Decode { origin: String, message: String },
}

/// Authenticated access to one documentation server.
///
/// Owns the [`Session`] shared by every fetch of a run.
pub struct SchemaSource<T: Transport> {
    transport: T,
    base_url: String,
    credentials: Option<Credentials>,
    session: Session,
}

impl<T: Transport> SchemaSource<T> {
    pub fn new(transport: T, base_url: impl Into<String>, credentials: Option<Credentials>) -> Self {
        SchemaSource {
            transport,
            base_url: base_url.into(),
            credentials,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Log in unless the session already holds an access token.
    pub fn connect(&mut self) -> Result<(), SourceError> {
        if self.session.is_authenticated() {
            return Ok(());
        }
        let credentials = self.credentials.as_ref().ok_or(SourceError::MissingCredentials)?;
        self.session = Session::login(&self.transport, &self.base_url, credentials)?;
        info!(base_url = %self.base_url, "authenticated against documentation server");
        Ok(())
    }

    /// Fetch and parse the document at `url`, retrying once on 401.
    pub fn fetch_document(&mut self, url: &str) -> Result<ApiDocument, SourceError> {
        self.connect()?;
        let reply = with_auth_retry(
            &self.transport,
            &self.base_url,
            self.credentials.as_ref(),
            &mut self.session,
            |transport, token| transport.get(url, token),
        )?;
        if !reply.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: reply.status,
            });
        }
        debug!(url, bytes = reply.body.len(), "fetched api document");
        ApiDocument::parse(&reply.body, url)
    }

    /// Issue an authenticated GET and report whether it succeeded.
    ///
    /// Used to smoke-test the list endpoints of an extracted entity.
    pub fn probe(&mut self, url: &str) -> bool {
        if let Err(err) = self.connect() {
            warn!(url, error = %err, "probe skipped, not authenticated");
            return false;
        }
        match with_auth_retry(
            &self.transport,
            &self.base_url,
            self.credentials.as_ref(),
            &mut self.session,
            |transport, token| transport.get(url, token),
        ) {
            Ok(reply) => reply.is_success(),
            Err(err) => {
                warn!(url, error = %err, "probe failed");
                false
            }
        }
    }
}
