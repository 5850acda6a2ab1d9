use std::time::Duration;

use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult};
use super::types::*;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the Namu service.
///
/// Authenticated routes send the session token as `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct NamuClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NamuClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorize(&self, request: RequestBuilder) -> ApiResult<RequestBuilder> {
        let token = self.token.as_deref()
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;
        Ok(request.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, endpoint: &str) -> ApiResult<T> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint, error = %e, "Namu service unreachable");
                ApiError::Unreachable(e)
            })?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "Namu service responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_response(status.as_u16(), &body);
            warn!(endpoint, status = status.as_u16(), error = %err, "API request failed");
            return Err(err);
        }

        response.json::<T>().await.map_err(ApiError::Decode)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, authed: bool) -> ApiResult<T> {
        let mut request = self.client.get(self.url(endpoint));
        if authed {
            request = self.authorize(request)?;
        }
        self.send(request, endpoint).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        authed: bool,
    ) -> ApiResult<T> {
        let mut request = self.client.post(self.url(endpoint)).json(body);
        if authed {
            request = self.authorize(request)?;
        }
        self.send(request, endpoint).await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.authorize(self.client.put(self.url(endpoint)).json(body))?;
        self.send(request, endpoint).await
    }

    /// Liveness probe
    pub async fn health(&self) -> ApiResult<HealthResponse> {
        self.get("/health", false).await
    }

    /// Exchange credentials for an access token
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        credentials.validate_for_login()?;
        self.post("/login", credentials, false).await
    }

    /// Create an account; the caller logs in afterwards
    pub async fn register(&self, credentials: &Credentials) -> ApiResult<RegisterResponse> {
        credentials.validate_for_register()?;
        self.post("/register", credentials, false).await
    }

    /// Check that the current token is still accepted
    pub async fn verify_session(&self) -> ApiResult<ProtectedResponse> {
        self.get("/protected", true).await
    }

    /// All entries of the token's user, oldest first
    pub async fn fetch_entries(&self) -> ApiResult<EntriesResponse> {
        self.get("/get/entries", true).await
    }

    pub async fn fetch_categories(&self) -> ApiResult<Vec<Category>> {
        let response: CategoriesResponse = self.get("/get/categories", false).await?;
        Ok(response.categories)
    }

    /// Create a category, or return the existing one with the same name
    pub async fn create_category(&self, category: &NewCategory) -> ApiResult<Category> {
        let response: CategoryResponse = self.post("/category", category, false).await?;
        Ok(response.category)
    }

    pub async fn create_entry(&self, entry: &NewEntry) -> ApiResult<CreatedEntry> {
        entry.validate()?;
        let authed = self.token.is_some();
        let response: CreatedEntryResponse = self.post("/create/entry", entry, authed).await?;
        Ok(response.entry)
    }

    pub async fn update_entry(&self, id: i64, update: &EntryUpdate) -> ApiResult<i64> {
        update.validate()?;
        let endpoint = format!("/entry/{}", id);
        let response: UpdatedEntryResponse = self.put(&endpoint, update).await?;
        Ok(response.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = NamuClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/get/entries"), "http://localhost:3000/get/entries");
    }

    #[tokio::test]
    async fn authenticated_routes_need_a_token() {
        let client = NamuClient::new("http://127.0.0.1:9").unwrap();
        let err = client.fetch_entries().await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn validation_fails_before_any_request() {
        let client = NamuClient::new("http://127.0.0.1:9").unwrap();
        let err = client
            .register(&Credentials::new("bob", "123"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
