use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::data::error::{LoadError, NoData};
use crate::data::filter::{filter_by_selection, Selection};
use crate::data::loader::load_file;
use crate::data::model::{PostingColumn, RecordSet};
use crate::data::query::{
    average_salary_by_group, count_by_month, count_by_year, experience_values, salary_values,
    summarize, top_companies_by_posting_count, GroupedAverages, KpiSummary, MonthlyCounts,
};
use crate::data::stats::{BoxStats, Histogram};
use crate::settings::DashboardConfig;

/// Columns offered as multiselect filters, in panel order.
pub const FILTER_COLUMNS: [PostingColumn; 4] = [
    PostingColumn::Region,
    PostingColumn::JobTitle,
    PostingColumn::CompanySize,
    PostingColumn::EconomicActivity,
];

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Everything the charts render, recomputed on every filter change.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub filtered: RecordSet,
    /// KPIs over the filtered postings; `Err(NoData)` when nothing matches.
    pub kpis: Result<KpiSummary, NoData>,
    pub salary_box: Option<BoxStats>,
    pub salary_histogram: Histogram,
    pub experience_histogram: Histogram,
    pub salary_by_size: GroupedAverages,
    pub monthly: MonthlyCounts,
    pub yearly: BTreeMap<i32, usize>,
    pub top_companies: Vec<(String, usize)>,
}

impl DashboardViews {
    pub fn compute(records: &RecordSet, selection: &Selection, top_n: usize) -> Self {
        let filtered = filter_by_selection(records, selection);
        let salaries = salary_values(&filtered);
        DashboardViews {
            kpis: summarize(&filtered),
            salary_box: BoxStats::from_values(&salaries),
            salary_histogram: Histogram::auto(&salaries),
            experience_histogram: Histogram::auto(&experience_values(&filtered)),
            salary_by_size: average_salary_by_group(&filtered, PostingColumn::CompanySize),
            monthly: count_by_month(&filtered),
            yearly: count_by_year(&filtered),
            top_companies: top_companies_by_posting_count(&filtered, top_n),
            filtered,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<RecordSet>,

    /// KPIs over the whole dataset, shown next to the filtered ones.
    pub kpis: Result<KpiSummary, NoData>,

    /// Observed values per filter column, first-seen order.
    pub choices: Vec<(PostingColumn, Vec<String>)>,

    /// Current filter predicates.
    pub selection: Selection,

    /// Views for the current selection (cached).
    pub views: Option<DashboardViews>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            kpis: Err(NoData),
            choices: Vec::new(),
            selection: Selection::default(),
            views: None,
            status_message: None,
        }
    }

    /// Load `path`, replacing the current dataset on success. On failure the
    /// previous dataset stays active and the error is shown.
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        match load_file(path) {
            Ok(records) => {
                self.set_dataset(records);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a newly loaded dataset, select everything and compute views.
    pub fn set_dataset(&mut self, records: RecordSet) {
        self.kpis = summarize(&records);
        self.choices = FILTER_COLUMNS
            .iter()
            .map(|&column| (column, records.distinct(column)))
            .collect();
        self.selection = Selection::everything(&records);
        self.dataset = Some(records);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the derived views after a selection change.
    pub fn refilter(&mut self) {
        if let Some(records) = &self.dataset {
            let views = DashboardViews::compute(records, &self.selection, self.config.top_n);
            log::debug!("Selection matches {} of {} postings", views.filtered.len(), records.len());
            self.views = Some(views);
        }
    }

    pub fn choices_for(&self, column: PostingColumn) -> &[String] {
        self.choices
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle_value(&mut self, column: PostingColumn, value: &str) {
        if let Some(selected) = self.selection.set_for_mut(column) {
            if !selected.remove(value) {
                selected.insert(value.to_string());
            }
            self.refilter();
        }
    }

    /// Select all observed values in a column.
    pub fn select_all(&mut self, column: PostingColumn) {
        let all: BTreeSet<String> = self.choices_for(column).iter().cloned().collect();
        if let Some(selected) = self.selection.set_for_mut(column) {
            *selected = all;
            self.refilter();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: PostingColumn) {
        if let Some(selected) = self.selection.set_for_mut(column) {
            selected.clear();
            self.refilter();
        }
    }

    /// Turn the optional industry predicate on (everything selected) or off.
    pub fn set_industry_filter(&mut self, enabled: bool) {
        self.selection.industries = enabled.then(|| {
            self.choices_for(PostingColumn::EconomicActivity)
                .iter()
                .cloned()
                .collect()
        });
        self.refilter();
    }

    /// Turn the salary range predicate on (full observed range) or off.
    pub fn set_salary_filter(&mut self, enabled: bool) {
        let bounds = self.dataset.as_ref().and_then(RecordSet::salary_bounds);
        self.selection.salary_range = match (enabled, bounds) {
            (true, Some((lo, hi))) => Some(lo..=hi),
            _ => None,
        };
        self.refilter();
    }

    pub fn set_experience_filter(&mut self, enabled: bool) {
        let bounds = self.dataset.as_ref().and_then(RecordSet::experience_bounds);
        self.selection.experience_range = match (enabled, bounds) {
            (true, Some((lo, hi))) => Some(lo..=hi),
            _ => None,
        };
        self.refilter();
    }
}
