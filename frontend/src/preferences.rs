//! 偏好设置上下文
//!
//! 把核心的 `PreferenceStore` 接入 Leptos 响应式系统：
//! 存储负责持久化与远端同步，这里只维护一份快照信号供组件读取。

use crate::web::{DocumentEnvironment, FetchClient, LeptosSpawner, dispatch_window_event};
use autofleet_hub::config::{VAR_API_URL, VAR_STORAGE_KEY};
use autofleet_hub::{HttpRemoteProfile, PreferenceStore, StoreConfig, SubscriptionScope};
use autofleet_shared::{ChangeCategory, PreferenceKey, PreferenceSet, STORAGE_KEY_TOKEN};
use leptos::prelude::*;
use serde_json::Value;

/// 浏览器中使用的存储类型
pub type AppStore = PreferenceStore<
    crate::web::LocalStorage,
    HttpRemoteProfile<FetchClient>,
    DocumentEnvironment,
    LeptosSpawner,
>;

/// 偏好上下文
///
/// 存储句柄不是 `Send`，因此放在本地 arena 中；快照信号在每次变更后刷新。
#[derive(Clone, Copy)]
pub struct PreferencesContext {
    store: StoredValue<AppStore, leptos::reactive::owner::LocalStorage>,
    snapshot: RwSignal<PreferenceSet>,
}

impl PreferencesContext {
    /// 在响应式作用域中读取当前偏好
    pub fn with<U>(&self, f: impl FnOnce(&PreferenceSet) -> U) -> U {
        self.snapshot.with(f)
    }

    /// 翻译（随语言变化自动更新）
    pub fn t(&self, key: &str) -> String {
        self.snapshot.with(|p| p.locale().translate(key))
    }

    /// 按当前货币格式化价格
    pub fn price(&self, amount: f64) -> String {
        self.snapshot
            .with(|p| p.currency_config().format_price(amount))
    }

    /// 按键写入一个 JSON 值，类型不符时仅记录日志
    pub fn set(&self, key: PreferenceKey, value: Value) {
        let result = self.store.with_value(|s| s.update_raw(key.as_str(), &value));
        if let Err(e) = result {
            autofleet_hub::log_warn!("⚠️ 忽略无效的偏好值 {}: {}", key, e);
        }
    }

    /// 恢复所有默认值
    pub fn reset(&self) {
        self.store.with_value(|s| s.reset());
    }
}

/// 从 Context 获取偏好上下文
pub fn use_preferences() -> PreferencesContext {
    use_context::<PreferencesContext>().expect("PreferencesContext should be provided")
}

fn build_config() -> StoreConfig {
    StoreConfig::from_lookup(|name| match name {
        VAR_API_URL => option_env!("AUTOFLEET_API_URL").map(str::to_string),
        VAR_STORAGE_KEY => option_env!("AUTOFLEET_STORAGE_KEY").map(str::to_string),
        _ => None,
    })
    .with_auth_token(crate::web::LocalStorage::get(STORAGE_KEY_TOKEN))
}

/// 创建并注入偏好上下文，然后开始加载
///
/// 本地缓存同步应用，远端合并在后台完成。
pub fn provide_preferences() -> PreferencesContext {
    let config = build_config();
    let remote = HttpRemoteProfile::new(FetchClient, &config);
    let store = AppStore::new(
        config,
        crate::web::LocalStorage,
        remote,
        DocumentEnvironment,
        LeptosSpawner,
    );

    let snapshot = RwSignal::new(store.get());

    // 订阅与应用同生命周期，快照按变更值逐键更新
    store
        .subscribe(SubscriptionScope::All, move |change| {
            snapshot.update(|prefs| prefs.set(change.value.clone()))
        })
        .detach();

    for category in [ChangeCategory::Theme, ChangeCategory::Locale, ChangeCategory::Currency] {
        store
            .subscribe(SubscriptionScope::Category(category), move |change| {
                let detail = match change.value.to_json() {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                dispatch_window_event(category.event_name(), &detail);
            })
            .detach();
    }

    store.load();

    let ctx = PreferencesContext {
        store: StoredValue::new_local(store),
        snapshot,
    };
    provide_context(ctx);
    ctx
}
