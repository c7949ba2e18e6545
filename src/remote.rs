//! 远端用户资料服务
//!
//! 核心只依赖两个操作："读取完整偏好包" 与 "写入单个键"。

use crate::config::StoreConfig;
use crate::error::{PrefsError, PrefsResult};
use crate::request::{HttpClient, HttpRequest};
use autofleet_shared::HEADER_AUTHORIZATION;
use autofleet_shared::protocol::{ApiRequest, GetPreferencesRequest, UpdatePreferenceRequest};
use serde_json::Value;

#[async_trait::async_trait(?Send)]
pub trait RemoteProfile {
    /// 读取偏好包（可能只包含部分键），返回 JSON 对象
    async fn fetch(&self) -> PrefsResult<Value>;
    /// 写入单个已变更的键
    async fn write(&self, update: &UpdatePreferenceRequest) -> PrefsResult<()>;
}

/// 基于 `HttpClient` 的远端实现
///
/// 这里接受任何实现了 HttpClient 的客户端，从而解耦了具体的 HTTP 实现
pub struct HttpRemoteProfile<C: HttpClient> {
    client: C,
    base_url: String,
    auth_token: Option<String>,
}

impl<C: HttpClient> HttpRemoteProfile<C> {
    pub fn new(client: C, config: &StoreConfig) -> Self {
        Self {
            client,
            base_url: config.api_base_url.clone(),
            auth_token: config.auth_token.clone(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn request<R: ApiRequest>(&self) -> HttpRequest {
        let url = format!("{}{}", self.base_url, R::PATH);
        let req = HttpRequest::new(&url, R::METHOD).with_header("Accept", "application/json");
        match &self.auth_token {
            Some(token) => req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token)),
            None => req,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient> RemoteProfile for HttpRemoteProfile<C> {
    async fn fetch(&self) -> PrefsResult<Value> {
        let req = self.request::<GetPreferencesRequest>();
        let url = req.url.clone();
        let res = self
            .client
            .send(req)
            .await
            .map_err(|e| e.in_op_with("remote.fetch", url.clone()))?;

        if !res.ok() {
            return Err(PrefsError::remote(res.status).in_op_with("remote.fetch", url));
        }

        let body: <GetPreferencesRequest as ApiRequest>::Response = res
            .json()
            .map_err(|e| e.in_op_with("remote.fetch", url.clone()))?;

        // 有些后端把设置包在 { "settings": {...} } 里
        let bundle = match body {
            Value::Object(mut map) if map.get("settings").is_some_and(Value::is_object) => {
                map.remove("settings").unwrap_or_default()
            }
            other => other,
        };

        if !bundle.is_object() {
            return Err(PrefsError::serialization("settings payload is not an object")
                .in_op_with("remote.fetch", url));
        }
        Ok(bundle)
    }

    async fn write(&self, update: &UpdatePreferenceRequest) -> PrefsResult<()> {
        let body = serde_json::to_value(update)?;
        let req = self.request::<UpdatePreferenceRequest>().with_body(body);
        let res = self
            .client
            .send(req)
            .await
            .map_err(|e| e.in_op_with("remote.write", update.key.clone()))?;

        if !res.ok() {
            return Err(
                PrefsError::remote(res.status).in_op_with("remote.write", update.key.clone())
            );
        }
        Ok(())
    }
}
