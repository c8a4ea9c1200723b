use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::error::LoadError;
use super::model::{CompanySize, JobPosting, RecordSet};

/// Columns every dataset must provide. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "salary",
    "experience_years",
    "region",
    "job_title",
    "company_size",
    "company_name",
    "economic_activity",
    "job_date",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the posting dataset from a CSV file.
pub fn load_file(path: &Path) -> Result<RecordSet, LoadError> {
    let file = File::open(path)?;
    let records = load_reader(file)?;
    log::info!("Loaded {} postings from {}", records.len(), path.display());
    Ok(records)
}

/// Load the posting dataset from any CSV byte stream.
///
/// Dates are parsed leniently: an unparseable `job_date` leaves the row's
/// date empty instead of failing the load.
pub fn load_reader<R: Read>(source: R) -> Result<RecordSet, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut bad_dates = 0usize;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let job_date = parse_job_date(cell(columns.job_date));
        if job_date.is_none() {
            bad_dates += 1;
        }

        rows.push(JobPosting {
            region: cell(columns.region).to_string(),
            job_title: cell(columns.job_title).to_string(),
            company_name: cell(columns.company_name).to_string(),
            company_size: CompanySize::parse(cell(columns.company_size)),
            economic_activity: cell(columns.economic_activity).to_string(),
            salary: parse_salary(cell(columns.salary)),
            experience_years: parse_experience(cell(columns.experience_years), line)?,
            job_date,
        });
    }

    if bad_dates > 0 {
        log::warn!("{bad_dates} of {} postings have an unparseable job_date", rows.len());
    }

    Ok(RecordSet::new(rows))
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

struct ColumnIndex {
    salary: usize,
    experience_years: usize,
    region: usize,
    job_title: usize,
    company_size: usize,
    company_name: usize,
    economic_activity: usize,
    job_date: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !headers.iter().any(|h| h.as_str() == **name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing));
        }

        // Every name is present at this point.
        let at = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
        Ok(ColumnIndex {
            salary: at("salary"),
            experience_years: at("experience_years"),
            region: at("region"),
            job_title: at("job_title"),
            company_size: at("company_size"),
            company_name: at("company_name"),
            economic_activity: at("economic_activity"),
            job_date: at("job_date"),
        })
    }
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

fn parse_salary(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Experience is a whole, non-negative number of years. Exports sometimes
/// write it as a float (`2.0`), which is accepted.
fn parse_experience(s: &str, line: u64) -> Result<u32, LoadError> {
    let invalid = || LoadError::InvalidValue {
        line,
        column: "experience_years",
        value: s.to_string(),
    };
    if let Ok(years) = s.parse::<u32>() {
        return Ok(years);
    }
    let value = s.parse::<f64>().map_err(|_| invalid())?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(invalid())
    }
}

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

/// Parse a posting date in any of the formats seen in job-board exports.
/// Returns `None` when nothing matches.
pub fn parse_job_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    // Longer timestamps: fall back to the leading YYYY-MM-DD.
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}
