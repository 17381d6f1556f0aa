//! Typed client for the studio API.
//!
//! Thin [`reqwest`] wrapper over the lead and identity endpoints. URLs are
//! absolute, built from the origin the boot probe reported, because the
//! wasm fetch backend refuses relative ones. The admin session token lives
//! in the browser session store, which also mirrors it into
//! `sessionStorage` so a hard refresh keeps the dashboard signed in.

use std::sync::Arc;

use atelier::features::identity::model::{SessionResponse, SignInRequest, StaffUser};
use atelier::features::leads::model::{
    Lead, LeadStats, LeadStatus, LeadStatusUpdate, QuoteSubmission,
};
use atelier::features::leads::validation::FieldErrors;
use atelier::kernel::session::SessionStore;
use dioxus::prelude::*;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::bridge::BrowserSessionStore;
use crate::error::SiteError;

/// Session-store key holding the admin bearer token.
pub const ADMIN_SESSION: &str = "admin_session";

/// The boot-provided [`ApiClient`], absent until the probe resolves.
pub fn use_api() -> Signal<Option<ApiClient>> {
    use_context()
}

/// Error body as the API serializes it; the server-side type is not
/// compiled into the client, so the contract is mirrored here.
#[derive(Debug, Clone, Deserialize)]
struct ProblemBody {
    #[serde(default)]
    status: u16,
    #[serde(default)]
    title: String,
    #[serde(default)]
    errors: Option<FieldErrors>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    origin: String,
    store: Arc<BrowserSessionStore>,
}

impl ApiClient {
    #[must_use]
    pub fn new(origin: &str, store: Arc<BrowserSessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            origin: origin.trim_end_matches('/').to_owned(),
            store,
        }
    }

    /// True when a token is present; says nothing about its validity.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.store.get(ADMIN_SESSION).is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.origin)
    }

    fn bearer(&self) -> Result<String, SiteError> {
        self.store.get(ADMIN_SESSION).ok_or_else(|| SiteError::Api {
            status: 401,
            title: "Not signed in".into(),
            errors: None,
        })
    }

    // --- Leads ---

    /// Submits the public quote form; no session required.
    pub async fn submit_quote(&self, submission: &QuoteSubmission) -> Result<Lead, SiteError> {
        let response =
            self.http.post(self.url("/api/leads")).json(submission).send().await?;
        decode(response).await
    }

    /// Lists leads for the dashboard, newest first.
    pub async fn list_leads(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>, SiteError> {
        let mut request = self.http.get(self.url("/api/leads")).bearer_auth(self.bearer()?);
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        decode(request.send().await?).await
    }

    /// Pipeline counters for the dashboard header.
    pub async fn lead_stats(&self) -> Result<LeadStats, SiteError> {
        let request = self.http.get(self.url("/api/leads/stats")).bearer_auth(self.bearer()?);
        decode(request.send().await?).await
    }

    /// Moves one lead to another pipeline stage.
    pub async fn update_lead_status(
        &self,
        id: &str,
        status: LeadStatus,
    ) -> Result<Lead, SiteError> {
        let request = self
            .http
            .patch(self.url(&format!("/api/leads/{id}")))
            .bearer_auth(self.bearer()?)
            .json(&LeadStatusUpdate { status });
        decode(request.send().await?).await
    }

    // --- Identity ---

    /// Exchanges credentials for a session and stores the token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<StaffUser, SiteError> {
        let body = SignInRequest { email: email.to_owned(), password: password.to_owned() };
        let response = self.http.post(self.url("/api/auth/sign-in")).json(&body).send().await?;
        let session: SessionResponse = decode(response).await?;
        self.store.set(ADMIN_SESSION, &session.token);
        Ok(session.user)
    }

    /// Revokes the session server-side and always drops the local token.
    pub async fn sign_out(&self) -> Result<(), SiteError> {
        let token = self.bearer();
        self.store.remove(ADMIN_SESSION);
        self.http
            .post(self.url("/api/auth/sign-out"))
            .bearer_auth(token?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// The signed-in staff user, or a 401 problem.
    pub async fn me(&self) -> Result<StaffUser, SiteError> {
        let request = self.http.get(self.url("/api/auth/me")).bearer_auth(self.bearer()?);
        decode(request.send().await?).await
    }

    /// Forgets the local token without calling the API.
    pub fn drop_session(&self) {
        self.store.remove(ADMIN_SESSION);
    }
}

/// Turns a response into the expected body, or a [`SiteError::Api`] built
/// from the problem document on non-success statuses.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SiteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let fallback = status.canonical_reason().unwrap_or("Request failed");
    match response.json::<ProblemBody>().await {
        Ok(problem) => Err(SiteError::Api {
            status: if problem.status == 0 { status.as_u16() } else { problem.status },
            title: if problem.title.is_empty() { fallback.to_owned() } else { problem.title },
            errors: problem.errors,
        }),
        Err(_) => Err(SiteError::Api {
            status: status.as_u16(),
            title: fallback.to_owned(),
            errors: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("https://atelier.dev/", Arc::new(BrowserSessionStore::default()))
    }

    #[test]
    fn urls_join_without_double_slash() {
        let api = client();
        assert_eq!(api.url("/api/leads"), "https://atelier.dev/api/leads");
    }

    #[test]
    fn bearer_requires_a_stored_token() {
        let api = client();
        assert!(matches!(api.bearer(), Err(SiteError::Api { status: 401, .. })));

        api.store.set(ADMIN_SESSION, "tok");
        assert_eq!(api.bearer().expect("token"), "tok");
        assert!(api.has_session());
    }

    #[test]
    fn drop_session_forgets_the_token() {
        let api = client();
        api.store.set(ADMIN_SESSION, "tok");
        api.drop_session();
        assert!(!api.has_session());
    }

    #[test]
    fn problem_body_tolerates_partial_documents() {
        let problem: ProblemBody = serde_json::from_str(r#"{"title":"Nope"}"#).expect("decode");
        assert_eq!(problem.status, 0);
        assert_eq!(problem.title, "Nope");
        assert!(problem.errors.is_none());
    }
}
