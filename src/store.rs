//! 偏好存储 - 核心引擎
//!
//! 单一事实来源，本地优先：
//! 1. `update()` 同步修改内存状态并写入本地持久化，随后立即广播变更；
//! 2. 远端写入在后台进行，失败只记录日志，不回滚本地修改；
//! 3. 同一个键同时最多只有一个远端写入在途，期间的新值覆盖待发送值，
//!    在途写入结束后只发送最新值（附带递增版本号）。
//!
//! 生命周期：`Uninitialized` -> `LocallyHydrated` -> `Reconciled`。

use crate::config::StoreConfig;
use crate::environment::{Environment, Presentation};
use crate::error::{PrefsError, PrefsResult};
use crate::remote::RemoteProfile;
use crate::runtime::Spawner;
use crate::storage::DurableStorage;
use autofleet_shared::protocol::UpdatePreferenceRequest;
use autofleet_shared::{ChangeCategory, Preference, PreferenceKey, PreferenceSet};
use futures::FutureExt;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

#[cfg(test)]
mod tests;

/// 加载阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// 仅有默认值
    Uninitialized,
    /// 已应用本地缓存
    LocallyHydrated,
    /// 已尝试与远端合并（无论成功与否）
    Reconciled,
}

/// 一次变更通知
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceChange {
    pub key: PreferenceKey,
    pub value: Preference,
    pub category: Option<ChangeCategory>,
}

/// 订阅范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionScope {
    All,
    Key(PreferenceKey),
    Category(ChangeCategory),
}

impl SubscriptionScope {
    fn matches(&self, change: &PreferenceChange) -> bool {
        match self {
            SubscriptionScope::All => true,
            SubscriptionScope::Key(key) => *key == change.key,
            SubscriptionScope::Category(category) => change.category == Some(*category),
        }
    }
}

type Listener = Rc<dyn Fn(&PreferenceChange)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, SubscriptionScope, Listener)>,
}

/// 订阅句柄
///
/// Drop 时自动取消订阅。需要在整个应用生命周期内保持的订阅调用 `detach()`。
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .borrow_mut()
                .entries
                .retain(|(id, _, _)| *id != self.id);
        }
    }
}

/// 每个键的远端同步槽
#[derive(Debug, Default)]
struct SyncSlot {
    /// 本地更新次数，同时作为发送给远端的版本号
    version: u64,
    /// 等待发送的最新值
    pending: Option<UpdatePreferenceRequest>,
    /// 是否已有写入任务排队或在途
    in_flight: bool,
}

struct StoreInner<S, R, E, X> {
    config: StoreConfig,
    storage: S,
    remote: R,
    environment: E,
    spawner: X,
    state: RefCell<PreferenceSet>,
    phase: Cell<LoadPhase>,
    listeners: Rc<RefCell<Listeners>>,
    sync: RefCell<HashMap<PreferenceKey, SyncSlot>>,
}

/// 偏好存储句柄
///
/// 克隆成本很低（共享同一个内部状态），适合放入 UI Context。
pub struct PreferenceStore<S, R, E, X> {
    inner: Rc<StoreInner<S, R, E, X>>,
}

impl<S, R, E, X> Clone for PreferenceStore<S, R, E, X> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, R, E, X> PreferenceStore<S, R, E, X>
where
    S: DurableStorage + 'static,
    R: RemoteProfile + 'static,
    E: Environment + 'static,
    X: Spawner + 'static,
{
    pub fn new(config: StoreConfig, storage: S, remote: R, environment: E, spawner: X) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                config,
                storage,
                remote,
                environment,
                spawner,
                state: RefCell::new(PreferenceSet::default()),
                phase: Cell::new(LoadPhase::Uninitialized),
                listeners: Rc::new(RefCell::new(Listeners::default())),
                sync: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn phase(&self) -> LoadPhase {
        self.inner.phase.get()
    }

    /// 当前完整偏好集合的快照，未加载时为默认值
    pub fn get(&self) -> PreferenceSet {
        self.inner.state.borrow().clone()
    }

    pub fn value(&self, key: PreferenceKey) -> Preference {
        self.inner.state.borrow().get(key)
    }

    // =========================================================
    // 写入
    // =========================================================

    /// 修改单个偏好
    ///
    /// 流程：内存 -> 本地持久化 -> 渲染环境（仅主题/语言）-> 广播 -> 远端（后台）
    pub fn update(&self, pref: Preference) {
        let key = pref.key();
        {
            let mut state = self.inner.state.borrow_mut();
            let mut next = state.clone();
            next.set(pref.clone());
            *state = next;
        }

        // 标记为本会话已修改，合并缓存与远端时保持本地值
        self.inner.sync.borrow_mut().entry(key).or_default();
        self.persist();
        if key.affects_environment() {
            self.apply_to_environment();
        }
        self.notify(&[key]);
        self.queue_remote_write(pref);
    }

    /// 以字符串键和 JSON 值修改偏好
    ///
    /// 只校验键是否已知以及值类型；枚举类字符串（语言、货币等）原样保存，
    /// 在使用处回退。
    pub fn update_raw(&self, name: &str, value: &Value) -> PrefsResult<PreferenceKey> {
        let key = PreferenceKey::parse(name).ok_or_else(|| {
            PrefsError::invalid_input(format!("unknown preference key: {}", name))
                .in_op("store.update_raw")
        })?;
        let pref = Preference::from_json(key, value).ok_or_else(|| {
            PrefsError::invalid_input(format!("unexpected value for {}: {}", key, value))
                .in_op_with("store.update_raw", key.as_str())
        })?;

        self.update(pref);
        Ok(key)
    }

    /// 恢复默认值（只处理与默认值不同且用户可调整的键）
    pub fn reset(&self) {
        let defaults = PreferenceSet::default();
        let keys = self.get().diff(&defaults);
        for key in keys.into_iter().filter(PreferenceKey::is_user_adjustable) {
            self.update(defaults.get(key));
        }
    }

    // =========================================================
    // 加载
    // =========================================================

    /// 初始化：同步读取本地缓存，然后在后台与远端合并
    ///
    /// 只有第一次调用生效。
    pub fn load(&self) {
        if self.phase() != LoadPhase::Uninitialized {
            log_info!("[Preferences] already loaded, skipping");
            return;
        }

        self.hydrate_local();

        let store = self.clone();
        self.inner
            .spawner
            .spawn(async move { store.reconcile().await }.boxed_local());
    }

    fn hydrate_local(&self) {
        let storage_key = &self.inner.config.storage_key;
        let cached = self.inner.storage.read(storage_key).unwrap_or_else(|e| {
            log_warn!(
                "[Preferences] local cache unavailable, using defaults: {}",
                e.in_op_with("store.hydrate_local", storage_key.clone())
            );
            None
        });

        let changed = match cached.map(|raw| serde_json::from_str::<Value>(&raw)) {
            Some(Ok(value)) => self.merge(&value),
            Some(Err(e)) => {
                log_warn!(
                    "[Preferences] ignoring malformed local cache: {}",
                    PrefsError::from(e).in_op("store.hydrate_local")
                );
                Vec::new()
            }
            None => Vec::new(),
        };

        self.inner.phase.set(LoadPhase::LocallyHydrated);
        self.apply_to_environment();
        self.notify(&changed);
    }

    async fn reconcile(&self) {
        match self.inner.remote.fetch().await {
            Ok(bundle) => {
                let changed = self.merge(&bundle);
                if !changed.is_empty() {
                    self.persist();
                    if changed.iter().any(PreferenceKey::affects_environment) {
                        self.apply_to_environment();
                    }
                    self.notify(&changed);
                }
                log_info!(
                    "[Preferences] reconciled with remote profile, {} key(s) changed",
                    changed.len()
                );
            }
            Err(e) => {
                log_warn!(
                    "[Preferences] remote profile unavailable, keeping local values: {}",
                    e.in_op("store.reconcile")
                );
            }
        }
        self.inner.phase.set(LoadPhase::Reconciled);
    }

    /// 合并外部数据，返回值发生变化的键
    ///
    /// 本会话内已经通过 `update()` 修改过的键保持本地值。
    fn merge(&self, value: &Value) -> Vec<PreferenceKey> {
        let touched: HashSet<PreferenceKey> = self.inner.sync.borrow().keys().copied().collect();

        let mut state = self.inner.state.borrow_mut();
        let mut incoming = state.clone();
        let applied = incoming.merge_json(value);

        let mut next = state.clone();
        for key in applied.into_iter().filter(|k| !touched.contains(k)) {
            next.set(incoming.get(key));
        }

        let changed = state.diff(&next);
        *state = next;
        changed
    }

    // =========================================================
    // 派生值
    // =========================================================

    /// 按当前货币格式化价格，未知货币使用默认货币
    pub fn format_price(&self, amount: f64) -> String {
        self.inner
            .state
            .borrow()
            .currency_config()
            .format_price(amount)
    }

    /// 按当前语言翻译，找不到时返回键本身
    pub fn translate(&self, key: &str) -> String {
        self.inner.state.borrow().locale().translate(key)
    }

    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.inner.state.borrow().locale().lookup(key)
    }

    /// 将当前主题与语言推送到渲染环境
    pub fn apply_to_environment(&self) {
        let presentation = Presentation::from_preferences(&self.inner.state.borrow());
        self.inner.environment.apply(&presentation);
    }

    // =========================================================
    // 订阅
    // =========================================================

    pub fn subscribe<F>(&self, scope: SubscriptionScope, callback: F) -> Subscription
    where
        F: Fn(&PreferenceChange) + 'static,
    {
        let mut listeners = self.inner.listeners.borrow_mut();
        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners.entries.push((id, scope, Rc::new(callback)));

        Subscription {
            id,
            listeners: Rc::downgrade(&self.inner.listeners),
        }
    }

    fn notify(&self, keys: &[PreferenceKey]) {
        if keys.is_empty() {
            return;
        }

        // 先取快照，允许回调中重入 store（读取、更新、订阅）
        let listeners: Vec<(SubscriptionScope, Listener)> = self
            .inner
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, scope, listener)| (*scope, listener.clone()))
            .collect();

        for key in keys {
            let change = PreferenceChange {
                key: *key,
                value: self.value(*key),
                category: key.category(),
            };
            for (scope, listener) in &listeners {
                if scope.matches(&change) {
                    listener(&change);
                }
            }
        }
    }

    // =========================================================
    // 持久化与远端同步
    // =========================================================

    /// 本地缓存尚未读取时的待写入集合
    ///
    /// 以现有缓存为底，只覆盖本会话修改过的键，避免 `load()` 之前的写入抹掉缓存。
    fn overlay_cached(&self) -> PreferenceSet {
        let mut base = match self.inner.storage.read(&self.inner.config.storage_key) {
            Ok(Some(raw)) => PreferenceSet::from_json_str(&raw),
            _ => PreferenceSet::default(),
        };
        let state = self.inner.state.borrow();
        for key in self.inner.sync.borrow().keys() {
            base.set(state.get(*key));
        }
        base
    }

    fn persist(&self) {
        let snapshot = match self.phase() {
            LoadPhase::Uninitialized => self.overlay_cached(),
            _ => self.get(),
        };
        let serialized = match serde_json::to_string(&snapshot) {
            Ok(s) => s,
            Err(e) => {
                log_error!("[Preferences] failed to serialize preferences: {}", e);
                return;
            }
        };

        if let Err(e) = self
            .inner
            .storage
            .write(&self.inner.config.storage_key, &serialized)
        {
            log_error!(
                "[Preferences] failed to persist locally, change kept in memory only: {}",
                e.in_op("store.persist")
            );
        }
    }

    fn queue_remote_write(&self, pref: Preference) {
        let key = pref.key();
        let should_spawn = {
            let mut sync = self.inner.sync.borrow_mut();
            let slot = sync.entry(key).or_default();
            slot.version += 1;
            slot.pending = Some(UpdatePreferenceRequest {
                key: key.as_str().to_string(),
                value: pref.to_json(),
                version: slot.version,
            });
            !std::mem::replace(&mut slot.in_flight, true)
        };

        if should_spawn {
            let store = self.clone();
            self.inner
                .spawner
                .spawn(async move { store.drain_writes(key).await }.boxed_local());
        }
    }

    async fn drain_writes(&self, key: PreferenceKey) {
        loop {
            let next = {
                let mut sync = self.inner.sync.borrow_mut();
                let Some(slot) = sync.get_mut(&key) else {
                    return;
                };
                match slot.pending.take() {
                    Some(update) => update,
                    None => {
                        slot.in_flight = false;
                        return;
                    }
                }
            };

            match self.inner.remote.write(&next).await {
                Ok(()) => log_info!("[Remote] synced {} (v{})", next.key, next.version),
                Err(e) => log_warn!(
                    "[Remote] failed to sync {} (v{}), local value kept: {}",
                    next.key,
                    next.version,
                    e.in_op("store.sync")
                ),
            }
        }
    }
}
