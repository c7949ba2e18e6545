//! 文档级展示状态
//!
//! 将主题、语言与文字方向写到 `<html>` 上，并向 window 广播变更事件。

use autofleet_hub::{Environment, Presentation};
use autofleet_shared::Theme;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, HtmlElement};

/// 浏览器文档环境
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentEnvironment;

impl Environment for DocumentEnvironment {
    fn apply(&self, presentation: &Presentation) {
        let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };

        // daisyUI 读取 data-theme，Tailwind 的 dark: 变体读取 class
        let _ = root.set_attribute("data-theme", presentation.theme.as_str());
        let class_list = root.class_list();
        let _ = match presentation.theme {
            Theme::Dark => class_list.add_1("dark"),
            Theme::Light => class_list.remove_1("dark"),
        };

        let _ = root.set_attribute("lang", presentation.lang());
        let _ = root.set_attribute("dir", presentation.direction.as_str());

        if let Some(html) = root.dyn_ref::<HtmlElement>() {
            let _ = html
                .style()
                .set_property("color-scheme", presentation.theme.as_str());
        }
    }
}

/// 向 window 派发 `CustomEvent`，`detail` 为字符串
pub fn dispatch_window_event(name: &str, detail: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(detail));

    if let Ok(event) = CustomEvent::new_with_event_init_dict(name, &init) {
        let _ = window.dispatch_event(&event);
    }
}
