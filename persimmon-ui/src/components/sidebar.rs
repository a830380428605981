//! Sidebar Component
//!
//! The three choosers. Each one writes straight into the global selection,
//! and the dashboard re-fetches whenever the triple changes.

use leptos::*;

use crate::state::global::use_global_state;

#[component]
pub fn Sidebar() -> impl IntoView {
    let state = use_global_state();

    let options = move || state.options.get();
    let states = Signal::derive(move || options().map(|o| o.states).unwrap_or_default());
    let age_groups = Signal::derive(move || options().map(|o| o.age_groups).unwrap_or_default());
    let electives = Signal::derive(move || options().map(|o| o.electives).unwrap_or_default());

    view! {
        <aside class="w-64 shrink-0 bg-gray-800 border-r border-gray-700 p-6 space-y-6">
            <h2 class="text-lg font-semibold">"Patient"</h2>

            <Chooser
                label="State"
                choices=states
                selected=Signal::derive(move || state.selection.get().state)
                on_change=Callback::new(move |value| state.set_state(value))
            />
            <Chooser
                label="Age group"
                choices=age_groups
                selected=Signal::derive(move || state.selection.get().age_group)
                on_change=Callback::new(move |value| state.set_age_group(value))
            />
            <Chooser
                label="Elective type"
                choices=electives
                selected=Signal::derive(move || state.selection.get().elective)
                on_change=Callback::new(move |value| state.set_elective(value))
            />
        </aside>
    }
}

/// Labelled `<select>` bound to one member of the selection
#[component]
fn Chooser(
    label: &'static str,
    #[prop(into)]
    choices: Signal<Vec<String>>,
    #[prop(into)]
    selected: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm text-gray-400 mb-1">{label}</span>
            <select
                class="w-full bg-gray-700 border border-gray-600 rounded-lg px-3 py-2 text-white"
                on:change=move |ev| on_change.call(event_target_value(&ev))
                prop:value=move || selected.get()
            >
                {move || {
                    let current = selected.get();
                    choices
                        .get()
                        .into_iter()
                        .map(|choice| {
                            let is_selected = choice == current;
                            view! {
                                <option value=choice.clone() selected=is_selected>{choice}</option>
                            }
                        })
                        .collect_view()
                }}
            </select>
        </label>
    }
}
