use crate::preferences::use_preferences;
use autofleet_shared::PreferenceKey;
use leptos::prelude::*;
use serde_json::Value;

#[component]
pub fn NavBar() -> impl IntoView {
    let prefs = use_preferences();
    let dark = move || prefs.with(|p| p.dark_mode);
    let currency = move || prefs.with(|p| p.currency_config().code);

    view! {
        <div class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1 gap-4">
                <span class="text-xl font-bold">{move || prefs.t("appName")}</span>
                <ul class="menu menu-horizontal px-1 hidden md:flex">
                    <li><a>{move || prefs.t("home")}</a></li>
                    <li><a>{move || prefs.t("vehicles")}</a></li>
                    <li><a>{move || prefs.t("bookings")}</a></li>
                    <li><a class="active">{move || prefs.t("settings")}</a></li>
                </ul>
            </div>
            <div class="flex-none gap-2">
                <span class="badge badge-outline">{currency}</span>
                <button
                    class="btn btn-ghost btn-sm"
                    on:click=move |_| prefs.set(PreferenceKey::DarkMode, Value::Bool(!dark()))
                >
                    {move || if dark() { "☀" } else { "☾" }}
                </button>
            </div>
        </div>
    }
}
