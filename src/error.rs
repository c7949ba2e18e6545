use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefsErrorStatus {
    /// 本地持久化读写失败 (如存储不可用、配额已满)
    Storage,
    /// 网络层失败 (请求未能送达或未收到响应)
    Network,
    /// 远端返回非 2xx 状态
    Remote,
    /// JSON 解析或序列化错误
    Serialization,
    /// 未知的偏好键或类型不匹配
    InvalidInput,
}

impl PrefsErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            PrefsErrorStatus::Storage => "STORAGE_ERROR",
            PrefsErrorStatus::Network => "NETWORK_ERROR",
            PrefsErrorStatus::Remote => "REMOTE_ERROR",
            PrefsErrorStatus::Serialization => "JSON_PARSE_ERROR",
            PrefsErrorStatus::InvalidInput => "INVALID_INPUT",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "storage.write", "remote.fetch"
    pub operation: String,
    /// 额外的细节信息，如偏好键、URL
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 偏好存储错误
///
/// - status: 错误类型
/// - message: 错误消息
/// - source: 原始错误（可选）
/// - spans: 结构化的调用追踪栈
#[derive(Debug)]
pub struct PrefsError {
    pub status: PrefsErrorStatus,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl PrefsError {
    pub fn new(status: PrefsErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(PrefsErrorStatus::Storage, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PrefsErrorStatus::Network, message)
    }

    pub fn remote(status_code: u16) -> Self {
        Self::new(
            PrefsErrorStatus::Remote,
            format!("unexpected status {}", status_code),
        )
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(PrefsErrorStatus::Serialization, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(PrefsErrorStatus::InvalidInput, message)
    }

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 设置原始错误源
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for PrefsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type PrefsResult<T> = std::result::Result<T, PrefsError>;

impl From<serde_json::Error> for PrefsError {
    fn from(e: serde_json::Error) -> Self {
        PrefsError::serialization(e.to_string()).with_source(e)
    }
}
