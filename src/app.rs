use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, preview, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Saudi Job Market");
            ui.label(
                "Interactive analysis of salaries, experience, companies, and job market \
                 trends across Saudi Arabia.",
            );
            ui.separator();

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::kpi_row(ui, &self.state);
                    ui.separator();
                    panels::preview_table(ui, &self.state);
                    ui.separator();
                    charts::dashboard(ui, &self.state);
                });
        });
    }
}
