use super::transport::{Reply, Transport};
use super::SourceError;
use crate::logging::redact;
use crate::settings::Credentials;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Upper bound on retries after a 401, per original request.
pub const MAX_AUTH_RETRIES: u32 = 1;

const LOGIN_PATH: &str = "/user/auth/login";
const REFRESH_PATH: &str = "/user/auth/refresh";

/// Token pair issued by the auth API.
///
/// Passed explicitly to every fetch instead of living in global state.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &self.access_token.as_deref().map(redact))
            .field("refresh_token", &self.refresh_token.as_deref().map(redact))
            .finish()
    }
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Session {
            access_token: Some(access_token.into()),
            refresh_token,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// `POST {base}/user/auth/login` with username and password.
    pub fn login<T: Transport + ?Sized>(
        transport: &T,
        base_url: &str,
        credentials: &Credentials,
    ) -> Result<Session, SourceError> {
        let url = format!("{base_url}{LOGIN_PATH}");
        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
        });
        let reply = transport.post_json(&url, &body, None)?;
        if !reply.is_success() {
            return Err(SourceError::Auth(format!("login answered HTTP {}", reply.status)));
        }
        Session::from_token_reply(&reply)
            .ok_or_else(|| SourceError::Auth("login response carried no access token".to_string()))
    }

    /// `POST {base}/user/auth/refresh`; `None` when there is no refresh token
    /// or the server rejects it.
    pub fn refresh<T: Transport + ?Sized>(&self, transport: &T, base_url: &str) -> Option<Session> {
        let refresh_token = self.refresh_token.as_deref()?;
        let url = format!("{base_url}{REFRESH_PATH}");
        let reply = match transport.post_json(&url, &json!({ "refreshToken": refresh_token }), None) {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "token refresh request failed");
                return None;
            }
        };
        if !reply.is_success() {
            debug!(status = reply.status, "token refresh rejected");
            return None;
        }
        let mut refreshed = Session::from_token_reply(&reply)?;
        // Servers may rotate only the access token.
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = self.refresh_token.clone();
        }
        Some(refreshed)
    }

    /// Parse `{status: "success", data: {accessToken, refreshToken}}`.
    fn from_token_reply(reply: &Reply) -> Option<Session> {
        let body = reply.json()?;
        if body.get("status").and_then(Value::as_str) != Some("success") {
            return None;
        }
        let data = body.get("data")?;
        let access = data.get("accessToken").and_then(Value::as_str)?;
        let refresh = data
            .get("refreshToken")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Session::new(access, refresh))
    }

    /// Refresh the session, falling back to a full login.
    fn reauthorize<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        base_url: &str,
        credentials: Option<&Credentials>,
    ) -> Result<(), SourceError> {
        if let Some(refreshed) = self.refresh(transport, base_url) {
            debug!("access token refreshed");
            *self = refreshed;
            return Ok(());
        }
        let credentials = credentials.ok_or(SourceError::MissingCredentials)?;
        info!("refresh unavailable, logging in again");
        *self = Session::login(transport, base_url, credentials)?;
        Ok(())
    }
}

/// Run `call` with the session's bearer token, retrying after a 401.
///
/// On a 401 the session is refreshed (or re-established by logging in) and
/// `call` runs again. At most [`MAX_AUTH_RETRIES`] retries happen; the reply
/// of the last attempt is returned as is, even if it is still a 401.
pub fn with_auth_retry<T, F>(
    transport: &T,
    base_url: &str,
    credentials: Option<&Credentials>,
    session: &mut Session,
    mut call: F,
) -> Result<Reply, SourceError>
where
    T: Transport + ?Sized,
    F: FnMut(&T, Option<&str>) -> Result<Reply, SourceError>,
{
    let mut retries = 0;
    loop {
        let reply = call(transport, session.access_token())?;
        if !reply.is_unauthorized() || retries >= MAX_AUTH_RETRIES {
            return Ok(reply);
        }
        retries += 1;
        warn!(attempt = retries, "request unauthorized, reauthorizing");
        session.reauthorize(transport, base_url, credentials)?;
    }
}
