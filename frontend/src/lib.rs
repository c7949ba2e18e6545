//! AutoFleet Hub 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `preferences`: 偏好设置上下文（包装核心存储）
//! - `web`: 浏览器原生 API 封装
//! - `components`: UI 组件层

mod components {
    pub mod chat_widget;
    pub mod navbar;
    pub mod settings;
}
mod preferences;

use crate::components::chat_widget::ChatWidget;
use crate::components::navbar::NavBar;
use crate::components::settings::SettingsPage;
use crate::preferences::provide_preferences;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod document;
    mod http;
    mod spawner;
    mod storage;

    pub use document::{DocumentEnvironment, dispatch_window_event};
    pub use http::FetchClient;
    pub use spawner::LeptosSpawner;
    pub use storage::LocalStorage;
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建偏好上下文并开始加载（本地缓存同步应用，远端在后台合并）
    let prefs = provide_preferences();

    // 2. 界面开关直接由偏好驱动
    let show_nav = move || prefs.with(|p| p.show_nav_bar);
    let show_chat = move || prefs.with(|p| p.show_chat_widget);

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Show when=show_nav>
                <NavBar />
            </Show>
            <SettingsPage />
            <Show when=show_chat>
                <ChatWidget />
            </Show>
        </div>
    }
}
