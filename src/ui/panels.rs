use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use std::path::Path;

use anyhow::Context;

use crate::data::error::NoData;
use crate::data::model::{CompanySize, PostingColumn};
use crate::data::query::KpiSummary;
use crate::state::{AppState, FILTER_COLUMNS};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter the Data");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            range_filters(ui, state);
            ui.separator();

            let mut industries_on = state.selection.industries.is_some();
            if ui.checkbox(&mut industries_on, "Filter by industry").changed() {
                state.set_industry_filter(industries_on);
            }
            ui.separator();

            for column in FILTER_COLUMNS {
                multiselect(ui, state, column);
            }
        });
}

/// Collapsible checkbox list for one categorical column.
fn multiselect(ui: &mut Ui, state: &mut AppState, column: PostingColumn) {
    // Industries only show up once their optional filter is enabled.
    let Some(selected) = state.selection.set_for(column) else {
        return;
    };
    let n_selected = selected.len();
    let values = state.choices_for(column).to_vec();
    let header_text = format!("{}  ({n_selected}/{})", column.label(), values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column.label())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            for value in &values {
                let mut checked = state
                    .selection
                    .set_for(column)
                    .is_some_and(|set| set.contains(value));
                let label = match column {
                    PostingColumn::CompanySize => size_label(value),
                    _ => value.clone(),
                };
                if ui.checkbox(&mut checked, label).changed() {
                    state.toggle_value(column, value);
                }
            }
        });
}

/// Salary and experience sliders, each behind an enable toggle.
fn range_filters(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let salary_bounds = dataset.salary_bounds();
    let experience_bounds = dataset.experience_bounds();

    let mut salary_on = state.selection.salary_range.is_some();
    if ui.checkbox(&mut salary_on, "Salary range (SAR)").changed() {
        state.set_salary_filter(salary_on);
    }
    if let (Some(range), Some((lo, hi))) = (state.selection.salary_range.clone(), salary_bounds) {
        let (mut min, mut max) = range.into_inner();
        let changed = ui.add(egui::Slider::new(&mut min, lo..=hi).text("min")).changed()
            | ui.add(egui::Slider::new(&mut max, lo..=hi).text("max")).changed();
        if changed {
            state.selection.salary_range = Some(min.min(max)..=max.max(min));
            state.refilter();
        }
    }

    let mut experience_on = state.selection.experience_range.is_some();
    if ui.checkbox(&mut experience_on, "Experience (years)").changed() {
        state.set_experience_filter(experience_on);
    }
    if let (Some(range), Some((lo, hi))) =
        (state.selection.experience_range.clone(), experience_bounds)
    {
        let (mut min, mut max) = range.into_inner();
        let changed = ui.add(egui::Slider::new(&mut min, lo..=hi).text("min")).changed()
            | ui.add(egui::Slider::new(&mut max, lo..=hi).text("max")).changed();
        if changed {
            state.selection.experience_range = Some(min.min(max)..=max.max(min));
            state.refilter();
        }
    }
}

fn size_label(code: &str) -> String {
    match CompanySize::parse(code).description() {
        Some(desc) => format!("{code} – {desc}"),
        None => code.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(views)) = (&state.dataset, &state.views) {
            ui.label(format!(
                "{} postings loaded, {} match the filters",
                ds.len(),
                views.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

/// KPIs for the filtered postings, with the whole-dataset figures beneath.
pub fn kpi_row(ui: &mut Ui, state: &AppState) {
    ui.heading("Key Market Indicators");
    match state.views.as_ref().map(|views| &views.kpis) {
        Some(Ok(kpi)) => kpi_metrics(ui, kpi),
        Some(Err(NoData)) => {
            ui.label("No data: no postings match the current filters.");
        }
        None => {
            ui.label("No data");
        }
    }

    if let Ok(full) = &state.kpis {
        let average = full
            .average_salary
            .map(|avg| format!("{avg:.0} SAR"))
            .unwrap_or_else(|| "no salaries".to_string());
        ui.label(
            RichText::new(format!(
                "Whole dataset: {} postings, average {average}, {} regions",
                full.total_count, full.distinct_region_count
            ))
            .weak(),
        );
    }
}

fn kpi_metrics(ui: &mut Ui, kpi: &KpiSummary) {
    let average = kpi
        .average_salary
        .map(|avg| format!("{avg:.0}"))
        .unwrap_or_else(|| "No data".to_string());

    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total Job Postings", &kpi.total_count.to_string());
        metric(&mut cols[1], "Average Salary (SAR)", &average);
        metric(
            &mut cols[2],
            "Most Common Experience",
            &format!("{} years", kpi.modal_experience),
        );
        metric(&mut cols[3], "Number of Regions", &kpi.distinct_region_count.to_string());
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(26.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Dataset preview
// ---------------------------------------------------------------------------

/// First rows of the filtered view.
pub fn preview_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Filtered Dataset Preview");
    let Some(views) = &state.views else {
        return;
    };
    if views.filtered.is_empty() {
        ui.label("No postings match the current filters.");
        return;
    }

    const HEADERS: [&str; 8] = [
        "Region",
        "Job Title",
        "Company",
        "Size",
        "Industry",
        "Salary",
        "Experience",
        "Date",
    ];

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().resizable(true), HEADERS.len())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in views.filtered.iter().take(state.config.preview_rows) {
                body.row(18.0, |mut table_row| {
                    let cells = [
                        row.region.clone(),
                        row.job_title.clone(),
                        row.company_name.clone(),
                        row.company_size.to_string(),
                        row.economic_activity.clone(),
                        row.salary.map(|s| format!("{s:.0}")).unwrap_or_default(),
                        row.experience_years.to_string(),
                        row.job_date.map(|d| d.to_string()).unwrap_or_default(),
                    ];
                    for cell in cells {
                        table_row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open job postings")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        open_path(state, &path);
    }
}

/// Load `path` into `state`; failures end up in the status bar.
fn open_path(state: &mut AppState, path: &Path) {
    match state
        .load(path)
        .with_context(|| format!("opening {}", path.display()))
    {
        Ok(()) => {
            let loaded = state.dataset.as_ref().map_or(0, |ds| ds.len());
            log::info!("Opened {} ({loaded} postings)", path.display());
        }
        Err(e) => {
            // Previous dataset stays active.
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DashboardConfig;

    #[test]
    fn opening_a_missing_file_reports_path_and_cause() {
        let mut state = AppState::new(DashboardConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        open_path(&mut state, &path);

        let msg = state.status_message.unwrap();
        assert!(msg.starts_with("Error: opening "));
        assert!(msg.contains("missing.csv"));
        assert!(state.dataset.is_none());
    }

    #[test]
    fn opening_a_valid_file_clears_the_status() {
        let mut state = AppState::new(DashboardConfig::default());
        state.status_message = Some("Error: earlier".into());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        std::fs::write(
            &path,
            "job_title,company_name,region,company_size,economic_activity,salary,experience_years,job_date\n\
             Accountant,Acme,Riyadh,SA,Retail,4000,1,2021-11-03\n",
        )
        .unwrap();

        open_path(&mut state, &path);

        assert!(state.status_message.is_none());
        assert_eq!(state.dataset.as_ref().unwrap().len(), 1);
    }
}
