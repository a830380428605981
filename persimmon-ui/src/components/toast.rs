//! Toast and Banner Components
//!
//! The toast carries transient errors from global state. Banners are the
//! inline info, success and error boxes of the main panel.

use leptos::*;

use crate::state::global::use_global_state;

/// Error toast container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_global_state();

    view! {
        <div class="fixed bottom-20 right-4 z-50 space-y-2">
            {move || {
                state.error.get().map(|msg| view! {
                    <ToastMessage message=msg variant=BannerVariant::Error />
                })
            }}
        </div>
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerVariant {
    Info,
    Success,
    Error,
}

impl BannerVariant {
    fn style(self) -> (&'static str, &'static str) {
        match self {
            BannerVariant::Info => ("ℹ", "bg-blue-600"),
            BannerVariant::Success => ("✓", "bg-green-600"),
            BannerVariant::Error => ("✕", "bg-red-600"),
        }
    }
}

#[component]
fn ToastMessage(
    #[prop(into)]
    message: String,
    variant: BannerVariant,
) -> impl IntoView {
    let (icon, bg_class) = variant.style();

    view! {
        <div class=format!(
            "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
             transform transition-all duration-300 ease-out animate-slide-in",
            bg_class
        )>
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{message}</span>
        </div>
    }
}

/// Inline message box in the page flow
#[component]
pub fn Banner(
    #[prop(into)]
    message: String,
    variant: BannerVariant,
) -> impl IntoView {
    let (icon, bg_class) = variant.style();

    view! {
        <div class=format!("flex items-center space-x-3 {}/20 border-l-4 px-4 py-3 rounded", bg_class)>
            <span class="text-lg">{icon}</span>
            <span class="text-sm">{message}</span>
        </div>
    }
}
