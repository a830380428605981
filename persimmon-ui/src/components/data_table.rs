//! Data Table Components
//!
//! Plain HTML tables for the raw dataset preview and the comparative preview.

use leptos::*;

use crate::state::global::{ComparativeRow, DatasetRow};

const DATASET_COLUMNS: [&str; 6] = ["age", "elective", "week", "patients", "physicians", "claims"];

const COMPARATIVE_COLUMNS: [&str; 6] = [
    "covid_patients",
    "covid_physicians",
    "covid_claims",
    "elective_patients",
    "elective_physicians",
    "elective_claims",
];

fn format_count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string())
}

#[component]
fn HeaderRow(columns: Vec<&'static str>) -> impl IntoView {
    view! {
        <thead>
            <tr class="text-left text-gray-400 border-b border-gray-700">
                {columns
                    .into_iter()
                    .map(|c| view! { <th class="px-3 py-2 font-medium">{c}</th> })
                    .collect_view()}
            </tr>
        </thead>
    }
}

/// First rows of the raw dataset
#[component]
pub fn DatasetTable(rows: Vec<DatasetRow>) -> impl IntoView {
    view! {
        <div class="overflow-x-auto">
            <table class="w-full text-sm">
                <HeaderRow columns=DATASET_COLUMNS.to_vec() />
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| view! {
                            <tr class="border-b border-gray-700 last:border-0">
                                <td class="px-3 py-2">{row.age}</td>
                                <td class="px-3 py-2">{row.elective}</td>
                                <td class="px-3 py-2">{row.week.format("%Y-%m-%d").to_string()}</td>
                                <td class="px-3 py-2 text-right">{format_count(row.patients)}</td>
                                <td class="px-3 py-2 text-right">{format_count(row.physicians)}</td>
                                <td class="px-3 py-2 text-right">{format_count(row.claims)}</td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}

/// First rows of the COVID vs. elective table
#[component]
pub fn ComparativeTable(rows: Vec<ComparativeRow>) -> impl IntoView {
    if rows.is_empty() {
        return view! {
            <p class="text-gray-400 text-sm">"No week has complete counts for both procedures"</p>
        }
        .into_view();
    }

    let mut columns = vec!["week"];
    columns.extend(COMPARATIVE_COLUMNS);

    view! {
        <div class="overflow-x-auto">
            <table class="w-full text-sm">
                <HeaderRow columns=columns />
                <tbody>
                    {rows
                        .into_iter()
                        .map(|row| view! {
                            <tr class="border-b border-gray-700 last:border-0">
                                <td class="px-3 py-2">{row.week.format("%Y-%m-%d").to_string()}</td>
                                {row.values()
                                    .into_iter()
                                    .map(|v| view! { <td class="px-3 py-2 text-right">{v}</td> })
                                    .collect_view()}
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_view()
}
