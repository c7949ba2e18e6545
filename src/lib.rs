//! AutoFleet Hub 偏好设置核心
//!
//! 与宿主环境无关的偏好存储引擎。所有外部协作者都通过 trait 注入：
//! - `storage::DurableStorage`: 本地持久化（浏览器中为 LocalStorage）
//! - `remote::RemoteProfile`: 远端用户资料服务
//! - `environment::Environment`: 渲染环境（主题、语言、文字方向）
//! - `runtime::Spawner`: 单线程任务派发
//!
//! 前端通过 Context 注入 `store::PreferenceStore` 句柄，测试则注入内存实现。

// =========================================================
// 跨平台日志宏
// =========================================================

#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => ($crate::logging::emit($crate::logging::Level::Info, &format!($($t)*)))
}

#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => ($crate::logging::emit($crate::logging::Level::Warn, &format!($($t)*)))
}

#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => ($crate::logging::emit($crate::logging::Level::Error, &format!($($t)*)))
}

pub mod config;
pub mod environment;
pub mod error;
pub mod logging;
pub mod remote;
pub mod request;
pub mod runtime;
pub mod storage;
pub mod store;

pub use autofleet_shared as shared;
pub use config::StoreConfig;
pub use environment::{Environment, NoopEnvironment, Presentation};
pub use error::{PrefsError, PrefsErrorStatus, PrefsResult};
pub use remote::{HttpRemoteProfile, RemoteProfile};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use runtime::Spawner;
pub use storage::{DurableStorage, MemoryStorage};
pub use store::{LoadPhase, PreferenceChange, PreferenceStore, Subscription, SubscriptionScope};
