// =========================================================
// 动态运行时配置 (Runtime Configuration)
// =========================================================

use autofleet_shared::STORAGE_KEY_SETTINGS;

/// 如果构建/运行环境没有提供对应变量，则使用这些默认值
pub const DEFAULT_STORAGE_KEY: &str = STORAGE_KEY_SETTINGS;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

pub const VAR_STORAGE_KEY: &str = "AUTOFLEET_STORAGE_KEY";
pub const VAR_API_URL: &str = "AUTOFLEET_API_URL";
pub const VAR_API_TOKEN: &str = "AUTOFLEET_API_TOKEN";

/// 偏好存储配置
///
/// 负责从外部变量源读取配置，实现配置解耦
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// 本地持久化使用的命名空间键
    pub storage_key: String,
    /// 远端 API 根地址（不含末尾 `/`）
    pub api_base_url: String,
    /// 访问远端资料服务的 Bearer 令牌
    pub auth_token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_token: None,
        }
    }
}

impl StoreConfig {
    /// 从变量源构建配置
    ///
    /// `lookup` 返回 `None` 或空字符串时使用默认值。宿主机上可传入
    /// `|k| std::env::var(k).ok()`，前端传入编译期的 `option_env!` 值。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            storage_key: read(VAR_STORAGE_KEY).unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            api_base_url: read(VAR_API_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            auth_token: read(VAR_API_TOKEN),
        }
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.auth_token = token;
        }
        self
    }

    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}
