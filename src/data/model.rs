use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// CompanySize – categorical company size code
// ---------------------------------------------------------------------------

/// Company size code as published in the dataset.
///
/// Unknown codes are kept verbatim in [`CompanySize::Other`] so the filter
/// choices always reflect what was actually observed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompanySize {
    /// Small company (11–50 employees).
    SA,
    /// Medium business (51–249 employees).
    MB,
    /// Medium company (250–999 employees).
    MA,
    /// Large company (1000–4999 employees).
    L,
    /// Giant / enterprise (5000+ employees).
    G,
    Other(String),
}

impl CompanySize {
    /// The five documented codes, smallest first.
    pub const KNOWN: [CompanySize; 5] = [
        CompanySize::SA,
        CompanySize::MB,
        CompanySize::MA,
        CompanySize::L,
        CompanySize::G,
    ];

    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "SA" => CompanySize::SA,
            "MB" => CompanySize::MB,
            "MA" => CompanySize::MA,
            "L" => CompanySize::L,
            "G" => CompanySize::G,
            other => CompanySize::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            CompanySize::SA => "SA",
            CompanySize::MB => "MB",
            CompanySize::MA => "MA",
            CompanySize::L => "L",
            CompanySize::G => "G",
            CompanySize::Other(code) => code,
        }
    }

    /// Human-readable description for the legend, `None` for unknown codes.
    pub fn description(&self) -> Option<&'static str> {
        match self {
            CompanySize::SA => Some("Small Company (11–50 employees)"),
            CompanySize::MB => Some("Medium Business (51–249 employees)"),
            CompanySize::MA => Some("Medium Company (250–999 employees)"),
            CompanySize::L => Some("Large Company (1000–4999 employees)"),
            CompanySize::G => Some("Giant / Enterprise (5000+ employees)"),
            CompanySize::Other(_) => None,
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// JobPosting – one row of the dataset
// ---------------------------------------------------------------------------

/// A single job posting (one CSV row).
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    pub region: String,
    pub job_title: String,
    pub company_name: String,
    pub company_size: CompanySize,
    /// Industry.
    pub economic_activity: String,
    /// Monthly salary in SAR; `None` when the cell was empty or not numeric.
    pub salary: Option<f64>,
    pub experience_years: u32,
    /// `None` when the source date could not be parsed.
    pub job_date: Option<NaiveDate>,
}

impl JobPosting {
    pub fn post_month(&self) -> Option<u32> {
        self.job_date.map(|d| d.month())
    }

    pub fn post_year(&self) -> Option<i32> {
        self.job_date.map(|d| d.year())
    }

    /// Value of a categorical column, used for grouping and filter choices.
    pub fn category(&self, column: PostingColumn) -> &str {
        match column {
            PostingColumn::Region => &self.region,
            PostingColumn::JobTitle => &self.job_title,
            PostingColumn::CompanyName => &self.company_name,
            PostingColumn::CompanySize => self.company_size.code(),
            PostingColumn::EconomicActivity => &self.economic_activity,
        }
    }
}

/// Categorical columns of a [`JobPosting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostingColumn {
    Region,
    JobTitle,
    CompanyName,
    CompanySize,
    EconomicActivity,
}

impl PostingColumn {
    pub fn label(self) -> &'static str {
        match self {
            PostingColumn::Region => "Region",
            PostingColumn::JobTitle => "Job Title",
            PostingColumn::CompanyName => "Company",
            PostingColumn::CompanySize => "Company Size",
            PostingColumn::EconomicActivity => "Industry",
        }
    }
}

// ---------------------------------------------------------------------------
// RecordSet – immutable snapshot of postings
// ---------------------------------------------------------------------------

/// An immutable, cheaply clonable set of postings.
///
/// The loaded dataset and every filtered view are `RecordSet`s; filtering
/// builds a new one and never touches its input.
#[derive(Debug, Clone)]
pub struct RecordSet {
    rows: Arc<[JobPosting]>,
}

impl RecordSet {
    pub fn new(rows: Vec<JobPosting>) -> Self {
        RecordSet { rows: rows.into() }
    }

    /// Distinct values of a categorical column in first-seen order.
    pub fn distinct(&self, column: PostingColumn) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|row| row.category(column))
            .filter(|value| seen.insert(*value))
            .map(str::to_string)
            .collect()
    }

    /// Smallest and largest salary present, if any row has one.
    pub fn salary_bounds(&self) -> Option<(f64, f64)> {
        self.rows
            .iter()
            .filter_map(|row| row.salary)
            .fold(None, |acc, s| match acc {
                None => Some((s, s)),
                Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
            })
    }

    pub fn experience_bounds(&self) -> Option<(u32, u32)> {
        let min = self.rows.iter().map(|row| row.experience_years).min()?;
        let max = self.rows.iter().map(|row| row.experience_years).max()?;
        Some((min, max))
    }
}

impl Default for RecordSet {
    fn default() -> Self {
        RecordSet::new(Vec::new())
    }
}

impl Deref for RecordSet {
    type Target = [JobPosting];

    fn deref(&self) -> &[JobPosting] {
        &self.rows
    }
}

impl FromIterator<JobPosting> for RecordSet {
    fn from_iter<I: IntoIterator<Item = JobPosting>>(iter: I) -> Self {
        RecordSet::new(iter.into_iter().collect())
    }
}

impl PartialEq for RecordSet {
    fn eq(&self, other: &Self) -> bool {
        self.rows[..] == other.rows[..]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Compact row builder shared by the data-layer tests.
    pub(crate) fn posting(region: &str, company: &str, salary: Option<f64>, exp: u32) -> JobPosting {
        JobPosting {
            region: region.to_string(),
            job_title: "Accountant".to_string(),
            company_name: company.to_string(),
            company_size: CompanySize::SA,
            economic_activity: "Retail".to_string(),
            salary,
            experience_years: exp,
            job_date: NaiveDate::from_ymd_opt(2021, 11, 3),
        }
    }

    #[test]
    fn unknown_company_size_is_preserved() {
        let size = CompanySize::parse("XL");
        assert_eq!(size, CompanySize::Other("XL".to_string()));
        assert_eq!(size.code(), "XL");
        assert!(size.description().is_none());
        assert_eq!(CompanySize::parse(" G "), CompanySize::G);
    }

    #[test]
    fn distinct_keeps_first_seen_order() {
        let records = RecordSet::new(vec![
            posting("Riyadh", "Acme", None, 1),
            posting("Makkah", "Acme", None, 1),
            posting("Riyadh", "Globex", None, 1),
        ]);
        assert_eq!(records.distinct(PostingColumn::Region), vec!["Riyadh", "Makkah"]);
        assert_eq!(records.distinct(PostingColumn::CompanySize), vec!["SA"]);
    }

    #[test]
    fn month_and_year_follow_job_date() {
        let mut row = posting("Riyadh", "Acme", None, 0);
        assert_eq!(row.post_month(), Some(11));
        assert_eq!(row.post_year(), Some(2021));
        row.job_date = None;
        assert_eq!(row.post_month(), None);
        assert_eq!(row.post_year(), None);
    }

    #[test]
    fn bounds_ignore_missing_salaries() {
        let records = RecordSet::new(vec![
            posting("Riyadh", "Acme", Some(7000.0), 4),
            posting("Riyadh", "Acme", None, 0),
            posting("Riyadh", "Acme", Some(3000.0), 2),
        ]);
        assert_eq!(records.salary_bounds(), Some((3000.0, 7000.0)));
        assert_eq!(records.experience_bounds(), Some((0, 4)));
        assert_eq!(RecordSet::default().salary_bounds(), None);
    }
}
