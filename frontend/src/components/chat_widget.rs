use crate::preferences::use_preferences;
use leptos::prelude::*;

/// 右下角的客服入口
#[component]
pub fn ChatWidget() -> impl IntoView {
    let prefs = use_preferences();
    let (open, set_open) = signal(false);

    view! {
        <div class="fixed bottom-4 end-4 z-40 flex flex-col items-end gap-2">
            <Show when=move || open.get()>
                <div class="card w-72 bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title text-base">{move || prefs.t("support")}</h3>
                        <p class="text-sm opacity-70">{move || prefs.t("welcome")}</p>
                    </div>
                </div>
            </Show>
            <button
                class="btn btn-primary btn-circle shadow-lg"
                on:click=move |_| set_open.update(|v| *v = !*v)
            >
                "?"
            </button>
        </div>
    }
}
