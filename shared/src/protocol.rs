use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
}

// =========================================================
// Request Definitions
// =========================================================

/// Fetch the full settings bundle of the signed-in user.
///
/// The backend may return a partial map; it is merged over defaults client-side.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetPreferencesRequest;

impl ApiRequest for GetPreferencesRequest {
    type Response = Value;
    const PATH: &'static str = "/api/users/settings";
    const METHOD: HttpMethod = HttpMethod::Get;
}

/// Write a single changed key.
///
/// `version` increases per key on every local update, so the backend can
/// drop a write that arrives after a newer one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePreferenceRequest {
    pub key: String,
    pub value: Value,
    pub version: u64,
}

impl ApiRequest for UpdatePreferenceRequest {
    // Only used for logging
    type Response = Value;
    const PATH: &'static str = "/api/users/settings";
    const METHOD: HttpMethod = HttpMethod::Put;
}
