//! Dashboard Page
//!
//! The main panel: everything the API composed for the current selection,
//! in display order.

use leptos::*;

use crate::api::{self, ApiFailure};
use crate::components::{
    Banner, BannerVariant, ChartSkeleton, ComparativeTable, DatasetTable, LineChart, PairPlot, ScatterChart,
};
use crate::state::global::{use_global_state, CorrelationPanel, DashboardView, PersonaSection};

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_global_state();

    // Any change to the triple re-fetches the whole view; a response for an
    // older triple is dropped once a newer one is pending. Client-side only,
    // so the view never has to be serialized back out.
    let dashboard = create_local_resource(
        move || state.selection.get(),
        |selection| async move { api::fetch_dashboard(&selection).await },
    );

    create_effect(move |_| state.loading.set(dashboard.loading().get()));

    view! {
        <Transition fallback=move || view! { <ChartSkeleton /> }>
            {move || {
                dashboard.get().map(|result| match result {
                    Ok(view) => view! { <DashboardPanel view=view /> }.into_view(),
                    Err(failure) => view! { <ErrorScreen failure=failure /> }.into_view(),
                })
            }}
        </Transition>
    }
}

#[component]
fn DashboardPanel(view: DashboardView) -> impl IntoView {
    let correlation = match view.correlation {
        CorrelationPanel::Plot { plot } => view! { <PairPlot plot=plot /> }.into_view(),
        CorrelationPanel::Error { message } => {
            view! { <Banner message=message variant=BannerVariant::Error /> }.into_view()
        }
    };

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">{view.title}</h1>
                <p class="text-gray-400 mt-1 italic">{view.tagline}</p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <DatasetTable rows=view.preview />
                <Banner message=view.status variant=BannerVariant::Info />
            </section>

            <Persona section=view.patient />

            <Banner message=view.success variant=BannerVariant::Success />

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">
                    {format!("Weekly counts ({} weeks)", view.elective_rows)}
                </h2>
                <LineChart spec=view.line_chart />
            </section>

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"Patients by week"</h2>
                <ScatterChart spec=view.scatter_chart />
            </section>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <h2 class="text-xl font-semibold">{view.comparison_heading}</h2>
                <p class="text-gray-300">{view.comparison_note}</p>
                <ComparativeTable rows=view.comparative_preview />
                <p class="text-sm text-gray-400">
                    {format!(
                        "{} of {} COVID weeks overlap",
                        view.comparative_rows, view.covid_rows
                    )}
                </p>
                {correlation}
            </section>

            <Persona section=view.clinician />
        </div>
    }
}

/// Heading, description and bullet points of a persona
#[component]
fn Persona(section: PersonaSection) -> impl IntoView {
    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-2xl font-semibold mb-2">{section.heading}</h2>
            <p class="text-gray-300">{section.description}</p>
            <ul class="list-disc list-inside mt-2 text-gray-300">
                {section
                    .bullets
                    .into_iter()
                    .map(|b| view! { <li>{b}</li> })
                    .collect_view()}
            </ul>
        </section>
    }
}

fn error_title(code: &str) -> &'static str {
    match code {
        "DATASET_NOT_FOUND" => "Dataset not found",
        "DUPLICATE_WEEK" => "Cannot align the COVID and elective views",
        "NETWORK_ERROR" => "Cannot reach the Persimmon API",
        _ => "Cannot show this selection",
    }
}

/// Replaces the main panel when the view cannot be composed
#[component]
fn ErrorScreen(failure: ApiFailure) -> impl IntoView {
    let title = error_title(&failure.code);

    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">{title}</h1>
            <p class="text-gray-300 mb-2">{failure.message}</p>
            <p class="text-gray-500 text-sm">
                {failure.code}
                {failure.request_id.map(|id| format!(" · request {}", id))}
            </p>
        </div>
    }
}
