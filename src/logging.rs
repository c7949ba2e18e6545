//! 日志输出后端
//!
//! WASM 下写入浏览器控制台，其他平台写入 stdout/stderr。
//! 通常不直接调用，而是使用 `log_info!` / `log_warn!` / `log_error!`。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[cfg(target_arch = "wasm32")]
pub fn emit(level: Level, msg: &str) {
    let value = msg.into();
    match level {
        Level::Info => web_sys::console::log_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Error => web_sys::console::error_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn emit(level: Level, msg: &str) {
    match level {
        Level::Info => println!("{}", msg),
        Level::Warn | Level::Error => eprintln!("{}", msg),
    }
}
