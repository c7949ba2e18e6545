use super::*;
use crate::error::PrefsErrorStatus;
use crate::remote::HttpRemoteProfile;
use crate::request::{HttpMethod, MockHttpClient};
use crate::runtime::QueueSpawner;
use crate::storage::MemoryStorage;
use async_trait::async_trait;
use autofleet_shared::{CurrencyConfig, Theme};
use serde_json::json;

// =========================================================
// Shared Mock Components
// =========================================================

const KEY: &str = "autofleet_settings";

#[derive(Default)]
struct RemoteLog {
    /// None 表示远端不可达
    bundle: RefCell<Option<Value>>,
    fetches: Cell<usize>,
    writes: RefCell<Vec<UpdatePreferenceRequest>>,
    fail_writes: Cell<bool>,
    /// 第一次写入时执行（模拟请求在途期间用户继续修改）
    on_write: RefCell<Option<Box<dyn FnOnce()>>>,
}

#[derive(Clone, Default)]
struct TestRemote {
    log: Rc<RemoteLog>,
}

#[async_trait(?Send)]
impl RemoteProfile for TestRemote {
    async fn fetch(&self) -> PrefsResult<Value> {
        self.log.fetches.set(self.log.fetches.get() + 1);
        self.log
            .bundle
            .borrow()
            .clone()
            .ok_or_else(|| PrefsError::network("unreachable"))
    }

    async fn write(&self, update: &UpdatePreferenceRequest) -> PrefsResult<()> {
        self.log.writes.borrow_mut().push(update.clone());
        let hook = self.log.on_write.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
        if self.log.fail_writes.get() {
            return Err(PrefsError::network("unreachable"));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
struct TestEnvironment {
    applied: Rc<RefCell<Vec<Presentation>>>,
}

impl Environment for TestEnvironment {
    fn apply(&self, presentation: &Presentation) {
        self.applied.borrow_mut().push(*presentation);
    }
}

/// 读写都失败的存储（模拟存储被禁用或配额已满）
struct BrokenStorage;

impl DurableStorage for BrokenStorage {
    fn read(&self, _key: &str) -> PrefsResult<Option<String>> {
        Err(PrefsError::storage("storage disabled"))
    }

    fn write(&self, _key: &str, _value: &str) -> PrefsResult<()> {
        Err(PrefsError::storage("quota exceeded"))
    }

    fn remove(&self, _key: &str) -> PrefsResult<()> {
        Err(PrefsError::storage("storage disabled"))
    }
}

type TestStore = PreferenceStore<MemoryStorage, TestRemote, TestEnvironment, QueueSpawner>;

struct Harness {
    store: TestStore,
    storage: MemoryStorage,
    remote: TestRemote,
    env: TestEnvironment,
    spawner: QueueSpawner,
}

fn setup_with(storage: MemoryStorage) -> Harness {
    let remote = TestRemote::default();
    let env = TestEnvironment::default();
    let spawner = QueueSpawner::new();
    let store = PreferenceStore::new(
        StoreConfig::default(),
        storage.clone(),
        remote.clone(),
        env.clone(),
        spawner.clone(),
    );
    Harness {
        store,
        storage,
        remote,
        env,
        spawner,
    }
}

fn setup() -> Harness {
    setup_with(MemoryStorage::new())
}

fn cached(storage: &MemoryStorage) -> PreferenceSet {
    let raw = storage.read(KEY).unwrap().expect("preferences should be cached");
    PreferenceSet::from_json_str(&raw)
}

fn record_changes(
    store: &TestStore,
    scope: SubscriptionScope,
) -> (Rc<RefCell<Vec<PreferenceKey>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let sub = store.subscribe(scope, move |change| sink.borrow_mut().push(change.key));
    (seen, sub)
}

// =========================================================
// Tests
// =========================================================

#[test]
fn test_get_before_load_returns_defaults() {
    let h = setup();
    assert_eq!(h.store.phase(), LoadPhase::Uninitialized);
    assert_eq!(h.store.get(), PreferenceSet::default());
    assert_eq!(h.store.format_price(150.0), "$150");
    assert_eq!(h.store.translate("save"), "Save");
}

#[test]
fn test_update_is_visible_immediately() {
    let h = setup();
    let updates = vec![
        Preference::DarkMode(true),
        Preference::Language("fr".into()),
        Preference::SessionTimeout(90),
        Preference::SmsNotifications(true),
        Preference::ProfileVisibility("private".into()),
        Preference::ShowChatWidget(false),
    ];

    for pref in updates {
        h.store.update(pref.clone());
        assert_eq!(h.store.value(pref.key()), pref);
        assert_eq!(cached(&h.storage).get(pref.key()), pref);
    }
}

#[test]
fn test_format_price_after_currency_change() {
    let h = setup();
    h.store.update(Preference::Currency("RWF".into()));
    assert_eq!(h.store.format_price(150.0), "₣150");
    assert_eq!(h.store.format_price(2500.0), "₣2,500");
}

#[test]
fn test_unknown_currency_formats_like_default() {
    let h = setup();
    h.store.update(Preference::Currency("DOGE".into()));

    assert_eq!(h.store.get().currency, "DOGE");
    for amount in [0.0, 150.0, 1234.56, -9.5] {
        assert_eq!(
            h.store.format_price(amount),
            CurrencyConfig::default_config().format_price(amount)
        );
    }
}

#[test]
fn test_unsupported_language_translates_with_default() {
    let h = setup();
    let key = h.store.update_raw("language", &json!("xx")).unwrap();

    assert_eq!(key, PreferenceKey::Language);
    assert_eq!(h.store.get().language, "xx");
    assert_eq!(h.store.translate("save"), "Save");
    assert_eq!(h.store.lookup("save"), Some("Save"));
}

#[test]
fn test_translate_follows_language() {
    let h = setup();
    h.store.update(Preference::Language("fr".into()));
    assert_eq!(h.store.translate("save"), "Enregistrer");

    h.store.update(Preference::Language("rw".into()));
    assert_eq!(h.store.translate("save"), "Bika");
    // rw 字典缺失时逐键回退到英语
    assert_eq!(h.store.translate("twoFactorAuth"), "Two-factor authentication");
}

#[test]
fn test_update_raw_rejects_unknown_key_and_wrong_type() {
    let h = setup();

    let err = h.store.update_raw("favouriteColour", &json!("green")).unwrap_err();
    assert_eq!(err.status, PrefsErrorStatus::InvalidInput);

    let err = h.store.update_raw("darkMode", &json!("yes")).unwrap_err();
    assert_eq!(err.status, PrefsErrorStatus::InvalidInput);

    assert_eq!(h.store.get(), PreferenceSet::default());
    assert!(h.storage.is_empty());
    assert_eq!(h.spawner.pending(), 0);
}

#[tokio::test]
async fn test_reload_from_local_cache_when_remote_unreachable() {
    let first = setup();
    first.store.update(Preference::Currency("EUR".into()));
    first.store.update(Preference::SessionTimeout(15));
    first.spawner.run_all().await;

    // 模拟刷新页面：新的 store 共享同一份本地存储，远端不可达
    let second = setup_with(first.storage.clone());
    second.store.load();
    second.spawner.run_all().await;

    let prefs = second.store.get();
    assert_eq!(prefs.currency, "EUR");
    assert_eq!(prefs.session_timeout, 15);
    assert_eq!(second.store.phase(), LoadPhase::Reconciled);
}

#[tokio::test]
async fn test_partial_cache_merges_over_defaults() {
    let storage = MemoryStorage::new().with_entry(KEY, r#"{"darkMode": true}"#);
    let h = setup_with(storage);

    h.store.load();
    assert_eq!(h.store.phase(), LoadPhase::LocallyHydrated);
    assert!(h.store.get().dark_mode);

    h.spawner.run_all().await;
    assert_eq!(h.store.phase(), LoadPhase::Reconciled);

    let mut expected = PreferenceSet::default();
    expected.dark_mode = true;
    assert_eq!(h.store.get(), expected);
}

#[tokio::test]
async fn test_load_is_idempotent() {
    let storage = MemoryStorage::new().with_entry(KEY, r#"{"darkMode": true}"#);
    let h = setup_with(storage);
    *h.remote.log.bundle.borrow_mut() = Some(json!({ "currency": "RWF" }));
    let (seen, _sub) = record_changes(&h.store, SubscriptionScope::All);

    h.store.load();
    h.store.load();
    h.spawner.run_all().await;
    h.store.load();
    h.spawner.run_all().await;

    assert_eq!(h.remote.log.fetches.get(), 1);
    assert_eq!(
        *seen.borrow(),
        vec![PreferenceKey::DarkMode, PreferenceKey::Currency]
    );
    assert!(h.store.get().dark_mode);
    assert_eq!(h.store.get().currency, "RWF");
    assert_eq!(h.store.phase(), LoadPhase::Reconciled);
}

#[tokio::test]
async fn test_malformed_local_cache_is_ignored() {
    let storage = MemoryStorage::new().with_entry(KEY, "{definitely not json");
    let h = setup_with(storage);

    h.store.load();
    h.spawner.run_all().await;

    assert_eq!(h.store.get(), PreferenceSet::default());
    assert_eq!(h.store.phase(), LoadPhase::Reconciled);
}

#[tokio::test]
async fn test_remote_values_overwrite_local() {
    let storage =
        MemoryStorage::new().with_entry(KEY, r#"{"currency": "EUR", "weeklyReports": true}"#);
    let h = setup_with(storage);
    *h.remote.log.bundle.borrow_mut() = Some(json!({
        "currency": "RWF",
        "darkMode": true,
        "sessionTimeout": "never",
        "legacyFlag": 1,
    }));
    let (themes, _t) = record_changes(&h.store, SubscriptionScope::Category(ChangeCategory::Theme));
    let (currencies, _c) =
        record_changes(&h.store, SubscriptionScope::Category(ChangeCategory::Currency));

    h.store.load();
    h.spawner.run_all().await;

    let prefs = h.store.get();
    assert_eq!(prefs.currency, "RWF");
    assert!(prefs.dark_mode);
    assert!(prefs.weekly_reports);
    assert_eq!(prefs.session_timeout, 30);
    assert_eq!(cached(&h.storage), prefs);

    assert_eq!(*themes.borrow(), vec![PreferenceKey::DarkMode]);
    // 本地缓存一次（EUR），远端一次（RWF）
    assert_eq!(currencies.borrow().len(), 2);
    assert_eq!(h.env.applied.borrow().last().unwrap().theme, Theme::Dark);
    // 合并远端数据不会触发回写
    assert!(h.remote.log.writes.borrow().is_empty());
}

#[tokio::test]
async fn test_reconcile_keeps_keys_changed_during_load() {
    let h = setup();
    *h.remote.log.bundle.borrow_mut() = Some(json!({ "currency": "RWF", "language": "sw" }));

    h.store.load();
    h.store.update(Preference::Currency("EUR".into()));
    h.spawner.run_all().await;

    let prefs = h.store.get();
    assert_eq!(prefs.currency, "EUR");
    assert_eq!(prefs.language, "sw");
}

#[tokio::test]
async fn test_malformed_remote_payload_is_ignored() {
    let h = setup();
    *h.remote.log.bundle.borrow_mut() = Some(json!("not an object"));

    h.store.load();
    h.spawner.run_all().await;

    assert_eq!(h.store.get(), PreferenceSet::default());
    assert_eq!(h.store.phase(), LoadPhase::Reconciled);
}

#[tokio::test]
async fn test_rapid_updates_last_writer_wins() {
    let h = setup();

    h.store.update(Preference::Currency("EUR".into()));
    h.store.update(Preference::Currency("RWF".into()));
    assert_eq!(h.store.get().currency, "RWF");
    assert_eq!(h.spawner.pending(), 1);

    h.spawner.run_all().await;

    let writes = h.remote.log.writes.borrow();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].key, "currency");
    assert_eq!(writes[0].value, json!("RWF"));
    assert_eq!(writes[0].version, 2);
}

#[tokio::test]
async fn test_update_during_in_flight_write_is_sent_after() {
    let h = setup();
    let store = h.store.clone();
    *h.remote.log.on_write.borrow_mut() = Some(Box::new(move || {
        store.update(Preference::Currency("RWF".into()));
    }));

    h.store.update(Preference::Currency("EUR".into()));
    h.spawner.run_all().await;

    let writes = h.remote.log.writes.borrow();
    let sent: Vec<_> = writes.iter().map(|w| (w.value.clone(), w.version)).collect();
    assert_eq!(sent, vec![(json!("EUR"), 1), (json!("RWF"), 2)]);
    assert_eq!(h.store.get().currency, "RWF");
    // 在途期间的更新不会派发新任务
    assert_eq!(h.spawner.pending(), 0);
}

#[tokio::test]
async fn test_different_keys_sync_independently() {
    let h = setup();

    h.store.update(Preference::DarkMode(true));
    h.store.update(Preference::PaymentAlerts(false));
    assert_eq!(h.spawner.pending(), 2);

    h.spawner.run_all().await;

    let keys: Vec<_> = h.remote.log.writes.borrow().iter().map(|w| w.key.clone()).collect();
    assert_eq!(keys, vec!["darkMode", "paymentAlerts"]);

    // 同步完成后新的更新会重新派发任务
    h.store.update(Preference::DarkMode(false));
    assert_eq!(h.spawner.pending(), 1);
}

#[tokio::test]
async fn test_remote_write_failure_keeps_local_change() {
    let h = setup();
    h.remote.log.fail_writes.set(true);

    h.store.update(Preference::TwoFactorAuth(true));
    h.spawner.run_all().await;

    assert_eq!(h.remote.log.writes.borrow().len(), 1);
    assert!(h.store.get().two_factor_auth);
    assert!(cached(&h.storage).two_factor_auth);
}

#[test]
fn test_scoped_notifications() {
    let h = setup();
    let (all, _a) = record_changes(&h.store, SubscriptionScope::All);
    let (theme, _t) = record_changes(&h.store, SubscriptionScope::Category(ChangeCategory::Theme));
    let (locale, _l) =
        record_changes(&h.store, SubscriptionScope::Category(ChangeCategory::Locale));
    let (timeout, _k) =
        record_changes(&h.store, SubscriptionScope::Key(PreferenceKey::SessionTimeout));

    h.store.update(Preference::DarkMode(true));
    h.store.update(Preference::WeeklyReports(true));
    h.store.update(Preference::SessionTimeout(5));
    h.store.update(Preference::Language("ar".into()));

    assert_eq!(all.borrow().len(), 4);
    assert_eq!(*theme.borrow(), vec![PreferenceKey::DarkMode]);
    assert_eq!(*locale.borrow(), vec![PreferenceKey::Language]);
    assert_eq!(*timeout.borrow(), vec![PreferenceKey::SessionTimeout]);
}

#[test]
fn test_change_carries_new_value() {
    let h = setup();
    let seen = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    let _sub = h.store.subscribe(
        SubscriptionScope::Category(ChangeCategory::Currency),
        move |change| *sink.borrow_mut() = Some(change.clone()),
    );

    h.store.update(Preference::Currency("KES".into()));

    assert_eq!(
        *seen.borrow(),
        Some(PreferenceChange {
            key: PreferenceKey::Currency,
            value: Preference::Currency("KES".into()),
            category: Some(ChangeCategory::Currency),
        })
    );
}

#[test]
fn test_dropping_subscription_unsubscribes() {
    let h = setup();
    let (seen, sub) = record_changes(&h.store, SubscriptionScope::All);

    h.store.update(Preference::DarkMode(true));
    drop(sub);
    h.store.update(Preference::DarkMode(false));

    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_detached_subscription_stays_active() {
    let h = setup();
    let (seen, sub) = record_changes(&h.store, SubscriptionScope::All);
    sub.detach();

    h.store.update(Preference::SoundEnabled(false));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_listener_can_reenter_store() {
    let h = setup();
    let store = h.store.clone();
    let prices = Rc::new(RefCell::new(Vec::new()));
    let sink = prices.clone();
    h.store
        .subscribe(
            SubscriptionScope::Category(ChangeCategory::Currency),
            move |_| sink.borrow_mut().push(store.format_price(1500.0)),
        )
        .detach();

    // 回调内部可以再次 update（例如联动修改）
    let store = h.store.clone();
    h.store
        .subscribe(SubscriptionScope::Key(PreferenceKey::Language), move |change| {
            if change.value == Preference::Language("fr".into()) {
                store.update(Preference::Currency("EUR".into()));
            }
        })
        .detach();

    h.store.update(Preference::Language("fr".into()));

    assert_eq!(*prices.borrow(), vec!["€1.500".to_string()]);
}

#[test]
fn test_environment_follows_theme_and_locale() {
    let h = setup();

    h.store.load();
    assert_eq!(h.env.applied.borrow().len(), 1);

    h.store.update(Preference::Currency("GBP".into()));
    h.store.update(Preference::PushNotifications(false));
    assert_eq!(h.env.applied.borrow().len(), 1);

    h.store.update(Preference::DarkMode(true));
    h.store.update(Preference::Language("ar".into()));

    let applied = h.env.applied.borrow();
    assert_eq!(applied.len(), 3);
    let last = applied.last().unwrap();
    assert_eq!(last.theme, Theme::Dark);
    assert_eq!(last.lang(), "ar");
    assert_eq!(last.direction.as_str(), "rtl");
}

#[tokio::test]
async fn test_reset_restores_defaults() {
    let h = setup_with(
        MemoryStorage::new().with_entry(KEY, r#"{"userId":"u-42","darkMode":true}"#),
    );
    h.store.load();
    h.store.update(Preference::Currency("RWF".into()));
    let (seen, _sub) = record_changes(&h.store, SubscriptionScope::All);

    h.store.reset();

    let mut expected = PreferenceSet::default();
    expected.user_id = "u-42".to_string();
    assert_eq!(h.store.get(), expected);
    assert_eq!(cached(&h.storage), expected);
    assert_eq!(
        *seen.borrow(),
        vec![PreferenceKey::DarkMode, PreferenceKey::Currency]
    );

    h.spawner.run_all().await;
    let writes = h.remote.log.writes.borrow();
    assert!(writes.iter().all(|w| w.key != "userId"));
    assert!(writes.iter().any(|w| w.key == "darkMode" && w.value == json!(false)));
}

#[tokio::test]
async fn test_change_values_mirror_store_state() {
    let h = setup_with(MemoryStorage::new().with_entry(KEY, r#"{"language":"sw"}"#));
    h.remote.log.bundle.replace(Some(json!({ "currency": "KES", "smsNotifications": true })));

    let mirror = Rc::new(RefCell::new(h.store.get()));
    let sink = mirror.clone();
    let _sub = h.store.subscribe(SubscriptionScope::All, move |change| {
        sink.borrow_mut().set(change.value.clone())
    });

    h.store.load();
    h.store.update(Preference::DarkMode(true));
    h.spawner.run_all().await;
    h.store.reset();

    assert_eq!(*mirror.borrow(), h.store.get());
}

#[test]
fn test_update_before_load_keeps_cached_values() {
    let h = setup_with(
        MemoryStorage::new().with_entry(KEY, r#"{"darkMode":true,"currency":"RWF"}"#),
    );

    h.store.update(Preference::WeeklyReports(true));
    let on_disk = cached(&h.storage);
    assert!(on_disk.dark_mode);
    assert_eq!(on_disk.currency, "RWF");
    assert!(on_disk.weekly_reports);

    h.store.load();
    let prefs = h.store.get();
    assert!(prefs.dark_mode);
    assert_eq!(prefs.currency, "RWF");
    assert!(prefs.weekly_reports);
    assert_eq!(h.store.format_price(150.0), "₣150");
}

#[test]
fn test_update_before_load_wins_over_cache() {
    let h = setup_with(
        MemoryStorage::new().with_entry(KEY, r#"{"darkMode":true,"language":"fr"}"#),
    );

    h.store.update(Preference::DarkMode(false));
    h.store.load();

    let prefs = h.store.get();
    assert!(!prefs.dark_mode);
    assert_eq!(prefs.language, "fr");
    assert_eq!(cached(&h.storage), prefs);
}

#[tokio::test]
async fn test_broken_storage_is_not_fatal() {
    let remote = TestRemote::default();
    let spawner = QueueSpawner::new();
    let store = PreferenceStore::new(
        StoreConfig::default(),
        BrokenStorage,
        remote.clone(),
        TestEnvironment::default(),
        spawner.clone(),
    );

    store.load();
    store.update(Preference::DarkMode(true));
    spawner.run_all().await;

    assert!(store.get().dark_mode);
    assert_eq!(store.phase(), LoadPhase::Reconciled);
    assert_eq!(remote.log.writes.borrow().len(), 1);
}

#[tokio::test]
async fn test_end_to_end_with_http_remote() {
    let config = StoreConfig {
        api_base_url: "https://api.test".to_string(),
        auth_token: Some("tok".to_string()),
        ..StoreConfig::default()
    };
    let client = MockHttpClient::new();
    let url = config.url("/api/users/settings");
    client.mock_response(HttpMethod::Get, &url, 200, r#"{"language":"fr","unknown":true}"#);
    client.mock_response(HttpMethod::Put, &url, 204, "");

    let spawner = QueueSpawner::new();
    let remote = HttpRemoteProfile::new(client, &config);
    let store = PreferenceStore::new(
        config,
        MemoryStorage::new(),
        remote,
        TestEnvironment::default(),
        spawner.clone(),
    );

    store.load();
    spawner.run_all().await;
    assert_eq!(store.translate("settings"), "Paramètres");

    store.update(Preference::BookingReminders(false));
    spawner.run_all().await;

    let reqs = store.inner.remote.client().requests.borrow();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[1].1, "PUT");
    let body: Value = serde_json::from_str(reqs[1].3.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({ "key": "bookingReminders", "value": false, "version": 1 })
    );
}
