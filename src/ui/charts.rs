use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use crate::color::{sequential_palette, ColorMap};
use crate::data::model::{CompanySize, PostingColumn};
use crate::data::stats::Histogram;
use crate::state::{AppState, DashboardViews};
use crate::ui::insights;

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every chart section for the current views.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(views) = &state.views else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to start  (File → Open…)");
        });
        return;
    };

    section(ui, "Salary Analysis", |ui| {
        ui.columns(2, |cols: &mut [Ui]| {
            cols[0].strong("Salary Distribution (Boxplot)");
            salary_boxplot(&mut cols[0], views);
            cols[1].strong("Salary Distribution (Histogram)");
            histogram(
                &mut cols[1],
                "salary_hist",
                &views.salary_histogram,
                "Salary (SAR)",
                Color32::from_rgb(0x6A, 0x5A, 0xCD),
            );
        });
        insight(ui, insights::salary(views.salary_box.as_ref()));
    });

    section(ui, "Experience Analysis", |ui| {
        histogram(
            ui,
            "experience_hist",
            &views.experience_histogram,
            "Experience (years)",
            Color32::from_rgb(0xFF, 0x6B, 0x6B),
        );
        insight(ui, insights::experience(&views.experience_histogram));
    });

    section(ui, "Company Size vs Salary", |ui| {
        company_size_chart(ui, views);
        insight(ui, insights::company_size(&views.salary_by_size));
        size_legend(ui);
    });

    section(ui, "Monthly Job Posting Trend", |ui| {
        monthly_chart(ui, views);
        if !views.yearly.is_empty() {
            let years: Vec<String> = views
                .yearly
                .iter()
                .map(|(year, count)| format!("{year}: {count}"))
                .collect();
            ui.label(RichText::new(format!("Postings per year – {}", years.join(", "))).weak());
        }
        insight(ui, insights::monthly(&views.monthly));
    });

    section(ui, "Top Hiring Companies", |ui| {
        top_companies(ui, views);
        insight(
            ui,
            "These companies represent the top employers based on posting frequency.".to_string(),
        );
    });
}

fn section(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    ui.heading(title);
    add_contents(ui);
    ui.separator();
}

fn insight(ui: &mut Ui, text: String) {
    ui.label(RichText::new(format!("Insight: {text}")).italics());
}

fn static_plot(id: &str) -> Plot {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

fn salary_boxplot(ui: &mut Ui, views: &DashboardViews) {
    let Some(stats) = &views.salary_box else {
        ui.label("No data");
        return;
    };
    let color = Color32::from_rgb(0x4C, 0x9A, 0xFF);
    let elem = BoxElem::new(
        0.0,
        BoxSpread::new(stats.lower_whisker, stats.q1, stats.median, stats.q3, stats.upper_whisker),
    )
    .name("salary")
    .box_width(0.5)
    .whisker_width(0.3)
    .fill(color.linear_multiply(0.4))
    .stroke(egui::Stroke::new(1.5, color));

    let outliers: PlotPoints = stats.outliers.iter().map(|&v| [v, 0.0]).collect();

    static_plot("salary_box")
        .x_axis_label("Salary (SAR)")
        .show_y(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).horizontal());
            plot_ui.points(Points::new(outliers).radius(2.5).color(color));
        });
}

fn histogram(ui: &mut Ui, id: &str, hist: &Histogram, x_label: &str, color: Color32) {
    if hist.is_empty() {
        ui.label("No data");
        return;
    }
    let bars: Vec<Bar> = hist
        .bars()
        .map(|(centre, width, count)| Bar::new(centre, count as f64).width(width))
        .collect();

    static_plot(id)
        .x_axis_label(x_label)
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

// ---------------------------------------------------------------------------
// Categorical charts
// ---------------------------------------------------------------------------

fn company_size_chart(ui: &mut Ui, views: &DashboardViews) {
    let grouped = &views.salary_by_size;
    if grouped.averages.is_empty() {
        ui.label("No data");
        return;
    }
    let sizes: Vec<String> = grouped.averages.iter().map(|(size, _)| size.clone()).collect();
    let colors = ColorMap::new(&sizes, sequential_palette(215.0, sizes.len()));

    static_plot("size_salary")
        .legend(Legend::default())
        .x_axis_label(PostingColumn::CompanySize.label())
        .y_axis_label("Mean salary (SAR)")
        .show(ui, |plot_ui| {
            for (i, (size, avg)) in grouped.averages.iter().enumerate() {
                let color = colors.color_for(size);
                let bar = Bar::new(i as f64, *avg).width(0.7).name(size).fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(size).color(color));
            }
        });
}

fn size_legend(ui: &mut Ui) {
    egui::CollapsingHeader::new("Company Size Categories")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for size in CompanySize::KNOWN {
                if let Some(desc) = size.description() {
                    ui.label(format!("{} – {desc}", size.code()));
                }
            }
        });
}

fn monthly_chart(ui: &mut Ui, views: &DashboardViews) {
    let palette = sequential_palette(150.0, 12);
    let bars: Vec<Bar> = (1..=12u32)
        .map(|month| {
            Bar::new(f64::from(month), views.monthly.get(month) as f64)
                .width(0.8)
                .name(insights::month_name(month))
                .fill(palette[month as usize - 1])
        })
        .collect();

    static_plot("monthly")
        .x_axis_label("Month")
        .y_axis_label("Postings")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn top_companies(ui: &mut Ui, views: &DashboardViews) {
    if views.top_companies.is_empty() {
        ui.label("No data");
        return;
    }
    let names: Vec<String> = views.top_companies.iter().map(|(name, _)| name.clone()).collect();
    let colors = ColorMap::categorical(&names);
    let n = views.top_companies.len();

    ui.columns(2, |cols: &mut [Ui]| {
        // Highest count at the top.
        let bars: Vec<Bar> = views
            .top_companies
            .iter()
            .enumerate()
            .map(|(rank, (name, count))| {
                Bar::new((n - rank) as f64, *count as f64)
                    .width(0.7)
                    .name(name)
                    .fill(colors.color_for(name))
            })
            .collect();
        static_plot("top_companies")
            .x_axis_label("Postings")
            .show_y(false)
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });

        egui::Grid::new("top_companies_table")
            .striped(true)
            .show(&mut cols[1], |ui: &mut Ui| {
                for (rank, (name, count)) in views.top_companies.iter().enumerate() {
                    ui.label(format!("{}.", rank + 1));
                    ui.label(RichText::new(name).color(colors.color_for(name)));
                    ui.label(count.to_string());
                    ui.end_row();
                }
            });
    });
}
