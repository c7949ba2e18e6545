//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 替代 `gloo-net`，为核心的 `HttpClient` 抽象提供浏览器实现。

use autofleet_hub::{HttpClient, HttpRequest, HttpResponse, PrefsError, PrefsResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn build_error(context: &str, e: JsValue) -> PrefsError {
    PrefsError::invalid_input(format!("{}: {:?}", context, e))
}

fn network_error(context: &str, e: JsValue) -> PrefsError {
    PrefsError::network(format!("{}: {:?}", context, e))
}

/// 轻量级 HTTP 客户端
///
/// 不设置超时，依赖浏览器 fetch 的默认行为。
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn build(req: &HttpRequest) -> PrefsResult<Request> {
        let headers = Headers::new().map_err(|e| build_error("创建 Headers 失败", e))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| build_error("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts).map_err(|e| build_error("请求构建失败", e))
    }

    /// 读取响应体文本
    async fn text(response: &Response) -> PrefsResult<String> {
        let promise = response
            .text()
            .map_err(|e| network_error("读取响应体失败", e))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| network_error("读取响应体失败", e))?;

        text.as_string()
            .ok_or_else(|| PrefsError::serialization("响应体无法转换为字符串"))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> PrefsResult<HttpResponse> {
        let request = Self::build(&req)?;

        let window = web_sys::window()
            .ok_or_else(|| PrefsError::network("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| network_error("网络错误", e))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| PrefsError::serialization(format!("Response 类型转换失败: {:?}", e)))?;

        let status = response.status();
        let body = Self::text(&response).await?;

        Ok(HttpResponse { status, body })
    }
}
