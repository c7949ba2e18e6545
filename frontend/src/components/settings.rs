use crate::preferences::use_preferences;
use autofleet_shared::{
    CurrencyConfig, Locale, MeasurementUnits, NotificationSound, PreferenceKey, ProfileVisibility,
};
use leptos::prelude::*;
use serde_json::Value;

const TIMEZONES: &[&str] = &[
    "UTC",
    "Africa/Kigali",
    "Africa/Nairobi",
    "Europe/London",
    "Europe/Paris",
    "America/New_York",
    "Asia/Dubai",
];

/// 布尔开关行，标签直接使用键名翻译
#[component]
fn ToggleRow(key: PreferenceKey) -> impl IntoView {
    let prefs = use_preferences();
    let checked = move || prefs.with(|p| p.get(key).to_json().as_bool().unwrap_or(false));

    view! {
        <div class="form-control">
            <label class="label cursor-pointer">
                <span class="label-text">{move || prefs.t(key.as_str())}</span>
                <input
                    type="checkbox"
                    class="toggle toggle-primary"
                    prop:checked=checked
                    on:change=move |ev| prefs.set(key, Value::Bool(event_target_checked(&ev)))
                />
            </label>
        </div>
    }
}

/// 下拉选择行
///
/// `options` 为 (线上取值, 标签)；标签有翻译时显示译文，否则原样显示。
#[component]
fn SelectRow(key: PreferenceKey, options: Vec<(&'static str, &'static str)>) -> impl IntoView {
    let prefs = use_preferences();
    let current = move || {
        prefs.with(|p| {
            p.get(key)
                .to_json()
                .as_str()
                .map(str::to_string)
                .unwrap_or_default()
        })
    };

    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{move || prefs.t(key.as_str())}</span>
            </label>
            <select
                class="select select-bordered w-full"
                on:change=move |ev| prefs.set(key, Value::String(event_target_value(&ev)))
            >
                {options
                    .into_iter()
                    .map(|(value, label)| {
                        view! {
                            <option value=value selected=move || current() == value>
                                {move || prefs.t(label)}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

#[component]
fn Section(title: &'static str, children: Children) -> impl IntoView {
    let prefs = use_preferences();
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body gap-2">
                <h2 class="card-title">{move || prefs.t(title)}</h2>
                {children()}
            </div>
        </div>
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let prefs = use_preferences();

    let languages: Vec<_> = Locale::ALL
        .iter()
        .map(|l| (l.code(), l.display_name()))
        .collect();
    let currencies: Vec<_> = CurrencyConfig::all()
        .iter()
        .map(|c| (c.code, c.name))
        .collect();
    let timezones: Vec<_> = TIMEZONES.iter().map(|tz| (*tz, *tz)).collect();
    // 单位的线上取值与翻译键相同
    let units: Vec<_> = MeasurementUnits::ALL
        .iter()
        .map(|u| (u.as_str(), u.as_str()))
        .collect();
    let visibilities: Vec<_> = ProfileVisibility::ALL
        .iter()
        .map(|v| (v.as_str(), v.as_str()))
        .collect();
    let sounds: Vec<_> = NotificationSound::ALL
        .iter()
        .map(|s| (s.as_str(), s.as_str()))
        .collect();

    let session_timeout = move || prefs.with(|p| p.session_timeout.to_string());
    let on_timeout = move |ev: leptos::ev::Event| {
        // 非数字输入交给存储校验并忽略
        let raw = event_target_value(&ev);
        let value = raw
            .trim()
            .parse::<u32>()
            .map(Value::from)
            .unwrap_or(Value::String(raw));
        prefs.set(PreferenceKey::SessionTimeout, value);
    };

    view! {
        <div class="p-4 md:p-8">
            <div class="max-w-3xl mx-auto space-y-6">
                <h1 class="text-3xl font-bold">{move || prefs.t("settings")}</h1>

                <Section title="appearance">
                    <ToggleRow key=PreferenceKey::DarkMode />
                    <SelectRow key=PreferenceKey::Language options=languages />
                    <SelectRow key=PreferenceKey::Currency options=currencies />
                    <SelectRow key=PreferenceKey::Timezone options=timezones />
                    <SelectRow key=PreferenceKey::MeasurementUnits options=units />
                </Section>

                <Section title="pricePreview">
                    <div class="stats stats-vertical md:stats-horizontal">
                        <div class="stat">
                            <div class="stat-title">{move || prefs.t("pricePerDay")}</div>
                            <div class="stat-value text-primary">{move || prefs.price(150.0)}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-value">{move || prefs.price(12500.5)}</div>
                        </div>
                    </div>
                </Section>

                <Section title="notifications">
                    <ToggleRow key=PreferenceKey::EmailNotifications />
                    <ToggleRow key=PreferenceKey::PushNotifications />
                    <ToggleRow key=PreferenceKey::SmsNotifications />
                    <ToggleRow key=PreferenceKey::BookingReminders />
                    <ToggleRow key=PreferenceKey::PaymentAlerts />
                    <ToggleRow key=PreferenceKey::PromotionalEmails />
                    <ToggleRow key=PreferenceKey::WeeklyReports />
                </Section>

                <Section title="privacy">
                    <SelectRow key=PreferenceKey::ProfileVisibility options=visibilities />
                    <ToggleRow key=PreferenceKey::DataSharing />
                    <ToggleRow key=PreferenceKey::LocationTracking />
                    <ToggleRow key=PreferenceKey::AnalyticsOptOut />
                </Section>

                <Section title="security">
                    <ToggleRow key=PreferenceKey::TwoFactorAuth />
                    <ToggleRow key=PreferenceKey::LoginAlerts />
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">{move || prefs.t("sessionTimeout")}</span>
                        </label>
                        <input
                            type="number"
                            min="1"
                            class="input input-bordered w-full"
                            prop:value=session_timeout
                            on:change=on_timeout
                        />
                    </div>
                </Section>

                <Section title="sound">
                    <ToggleRow key=PreferenceKey::SoundEnabled />
                    <SelectRow key=PreferenceKey::NotificationSound options=sounds />
                </Section>

                <Section title="interface">
                    <ToggleRow key=PreferenceKey::ShowNavBar />
                    <ToggleRow key=PreferenceKey::ShowChatWidget />
                </Section>

                <div class="flex justify-end">
                    <button class="btn btn-outline btn-error" on:click=move |_| prefs.reset()>
                        {move || prefs.t("restoreDefaults")}
                    </button>
                </div>
            </div>
        </div>
    }
}
