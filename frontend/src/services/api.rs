use gloo::net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{
    AddPresenceRequest, AddPresenceResponse, Child, ChildPage, ClassPointsResponse,
    CreateChildRequest, DeleteChildrenRequest, ErrorResponse, LoginRequest, LoginResponse,
    StaffUser, UpdateChildRequest,
};

/// Default backend address; override at build time with `POINTS_API_URL`.
const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// API client for the points-tracking backend.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

/// Pull the human-readable message out of a failed response: the backend
/// attaches `{"error": "..."}` to rejected mutations; anything else falls
/// back to the status code.
async fn error_message(response: &Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => format!("Request failed with status {status}"),
    }
}

/// Resolve a send result to the response when it carries a 2xx status,
/// otherwise to the extracted error message.
async fn expect_ok(result: Result<Response, gloo::net::Error>) -> Result<Response, String> {
    match result {
        Ok(response) if response.ok() => Ok(response),
        Ok(response) => Err(error_message(&response).await),
        Err(e) => Err(format!("Network error: {e}")),
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: option_env!("POINTS_API_URL")
                .unwrap_or(DEFAULT_BASE_URL)
                .to_string(),
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    /// Absolute URL for a server-hosted asset such as a child's avatar.
    pub fn asset_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: String, what: &str) -> Result<T, String> {
        let response = expect_ok(Request::get(&url).send().await).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse {what}: {e}"))
    }

    // ---- authentication ----

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, String> {
        let url = format!("{}/login", self.base_url);
        let response = expect_ok(
            Request::post(&url)
                .json(request)
                .map_err(|e| format!("Failed to serialize request: {e}"))?
                .send()
                .await,
        )
        .await?;
        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| format!("Failed to parse login response: {e}"))
    }

    /// Cheap reachability probe used by the login screen: the roster
    /// endpoint answering with a non-empty array means the server is up.
    pub async fn health_check(&self) -> Result<bool, String> {
        let url = format!("{}/children/", self.base_url);
        let value: serde_json::Value = self.fetch_json(url, "server check").await?;
        Ok(value.as_array().map(|rows| !rows.is_empty()).unwrap_or(false))
    }

    // ---- children ----

    pub async fn children_by_age(
        &self,
        min_age: u32,
        max_age: u32,
        skip: u32,
        take: u32,
        search: Option<&str>,
    ) -> Result<ChildPage, String> {
        let mut url = format!(
            "{}/children/filterByAge?minAge={}&maxAge={}&skip={}&take={}",
            self.base_url, min_age, max_age, skip, take
        );
        if let Some(term) = search {
            url.push_str(&format!("&search={}", js_sys::encode_uri_component(term)));
        }
        self.fetch_json(url, "children page").await
    }

    pub async fn all_children(&self) -> Result<Vec<Child>, String> {
        let url = format!("{}/children", self.base_url);
        self.fetch_json(url, "children").await
    }

    pub async fn child_by_id(&self, id: i64) -> Result<Child, String> {
        let url = format!("{}/children/filterById/{}", self.base_url, id);
        self.fetch_json(url, "child").await
    }

    pub async fn create_child(&self, request: &CreateChildRequest) -> Result<(), String> {
        let url = format!("{}/children", self.base_url);
        expect_ok(
            Request::post(&url)
                .json(request)
                .map_err(|e| format!("Failed to serialize request: {e}"))?
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    pub async fn update_child(&self, id: i64, request: &UpdateChildRequest) -> Result<(), String> {
        let url = format!("{}/children/{}", self.base_url, id);
        expect_ok(
            Request::put(&url)
                .json(request)
                .map_err(|e| format!("Failed to serialize request: {e}"))?
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    pub async fn delete_children(&self, request: &DeleteChildrenRequest) -> Result<(), String> {
        let url = format!("{}/delete/", self.base_url);
        expect_ok(
            Request::delete(&url)
                .json(request)
                .map_err(|e| format!("Failed to serialize request: {e}"))?
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    // ---- points ----

    pub async fn add_point(&self, child_id: i64, user_id: &str) -> Result<(), String> {
        let url = format!("{}/addPoint/{}/{}", self.base_url, child_id, user_id);
        expect_ok(Request::post(&url).send().await).await?;
        Ok(())
    }

    pub async fn delete_point(&self, child_id: i64) -> Result<(), String> {
        let url = format!("{}/deletePoint/{}", self.base_url, child_id);
        expect_ok(Request::delete(&url).send().await).await?;
        Ok(())
    }

    pub async fn class_points(&self, class_id: i64) -> Result<ClassPointsResponse, String> {
        let url = format!("{}/children/getAllPoints/{}", self.base_url, class_id);
        self.fetch_json(url, "class points").await
    }

    /// Danger-zone reset of every child's points.
    pub async fn reset_all_points(&self) -> Result<(), String> {
        let url = format!("{}/reset/all/points", self.base_url);
        expect_ok(Request::post(&url).send().await).await?;
        Ok(())
    }

    /// Backend maintenance hook that reconciles its tables.
    pub async fn adjust_tables(&self) -> Result<(), String> {
        let url = format!("{}/admin", self.base_url);
        expect_ok(Request::post(&url).send().await).await?;
        Ok(())
    }

    // ---- staff and presence ----

    pub async fn list_users(&self) -> Result<Vec<StaffUser>, String> {
        let url = format!("{}/listUsers", self.base_url);
        self.fetch_json(url, "staff list").await
    }

    pub async fn user_by_token(&self, token: &str) -> Result<StaffUser, String> {
        let url = format!(
            "{}/listUsers?token={}",
            self.base_url,
            js_sys::encode_uri_component(token)
        );
        self.fetch_json(url, "user profile").await
    }

    /// Multipart profile update; the form may carry `username`, `password`
    /// and `avatar` entries.
    pub async fn update_user(&self, id: i64, form: &web_sys::FormData) -> Result<(), String> {
        let url = format!("{}/updateUser/{}", self.base_url, id);
        expect_ok(
            Request::put(&url)
                .body(form.clone())
                .map_err(|e| format!("Failed to build request: {e}"))?
                .send()
                .await,
        )
        .await?;
        Ok(())
    }

    pub async fn add_presence(
        &self,
        user_id: i64,
        request: &AddPresenceRequest,
    ) -> Result<AddPresenceResponse, String> {
        let url = format!("{}/AddPresence/{}", self.base_url, user_id);
        let response = expect_ok(
            Request::post(&url)
                .json(request)
                .map_err(|e| format!("Failed to serialize request: {e}"))?
                .send()
                .await,
        )
        .await?;
        response
            .json::<AddPresenceResponse>()
            .await
            .map_err(|e| format!("Failed to parse presence response: {e}"))
    }

    pub async fn remove_presence(&self, id: i64) -> Result<(), String> {
        let url = format!("{}/removePresence/{}", self.base_url, id);
        expect_ok(Request::delete(&url).send().await).await?;
        Ok(())
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
