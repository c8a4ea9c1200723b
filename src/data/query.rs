use std::collections::{BTreeMap, HashMap, HashSet};

use super::error::NoData;
use super::model::{PostingColumn, RecordSet};

/// Number of companies shown in the hiring ranking unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline indicators for a set of postings.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    pub total_count: usize,
    /// Mean over rows that have a salary; `None` if none do.
    pub average_salary: Option<f64>,
    /// Most frequent experience value, smallest value on ties.
    pub modal_experience: u32,
    pub distinct_region_count: usize,
}

/// Compute the KPI row. Empty input reports [`NoData`].
pub fn summarize(records: &RecordSet) -> Result<KpiSummary, NoData> {
    if records.is_empty() {
        return Err(NoData);
    }

    let mut experience_counts: BTreeMap<u32, usize> = BTreeMap::new();
    for row in records.iter() {
        *experience_counts.entry(row.experience_years).or_default() += 1;
    }
    // Ascending iteration + strict comparison keeps the smallest tied value.
    let mut modal_experience = 0;
    let mut best = 0;
    for (&years, &count) in &experience_counts {
        if count > best {
            best = count;
            modal_experience = years;
        }
    }

    let distinct_region_count = records
        .iter()
        .map(|row| row.region.as_str())
        .filter(|region| !region.is_empty())
        .collect::<HashSet<_>>()
        .len();

    Ok(KpiSummary {
        total_count: records.len(),
        average_salary: mean(records.iter().filter_map(|row| row.salary)),
        modal_experience,
        distinct_region_count,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Rankings and grouped aggregates
// ---------------------------------------------------------------------------

/// Companies ranked by number of postings, most first.
///
/// Ties keep the order in which the companies first appear in `records`.
pub fn top_companies_by_posting_count(records: &RecordSet, n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for row in records.iter() {
        match slot.get(row.company_name.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slot.insert(&row.company_name, counts.len());
                counts.push((row.company_name.clone(), 1));
            }
        }
    }
    // `sort_by` is stable.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Mean salary per group of a categorical column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedAverages {
    /// `(group, mean salary)` in first-seen group order.
    pub averages: Vec<(String, f64)>,
    /// Groups left out because none of their rows has a salary.
    pub omitted: Vec<String>,
}

pub fn average_salary_by_group(records: &RecordSet, group_key: PostingColumn) -> GroupedAverages {
    // (group, sum, salaried rows)
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for row in records.iter() {
        let key = row.category(group_key);
        let i = *slot.entry(key).or_insert_with(|| {
            groups.push((key, 0.0, 0));
            groups.len() - 1
        });
        if let Some(salary) = row.salary {
            groups[i].1 += salary;
            groups[i].2 += 1;
        }
    }

    let mut result = GroupedAverages::default();
    for (group, sum, n) in groups {
        if n == 0 {
            result.omitted.push(group.to_string());
        } else {
            result.averages.push((group.to_string(), sum / n as f64));
        }
    }
    if !result.omitted.is_empty() {
        log::debug!(
            "{} group(s) without salaries omitted from {} averages",
            result.omitted.len(),
            group_key.label()
        );
    }
    result
}

// ---------------------------------------------------------------------------
// Posting-date aggregates
// ---------------------------------------------------------------------------

/// Posting counts for every calendar month. Months without postings are an
/// explicit zero; rows without a date are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyCounts([usize; 12]);

impl MonthlyCounts {
    /// Count for `month` in `1..=12`; zero outside that range.
    pub fn get(&self, month: u32) -> usize {
        match month {
            1..=12 => self.0[month as usize - 1],
            _ => 0,
        }
    }

    /// `(month, count)` pairs for January through December.
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.0.iter().enumerate().map(|(i, &count)| (i as u32 + 1, count))
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

pub fn count_by_month(records: &RecordSet) -> MonthlyCounts {
    let mut counts = [0usize; 12];
    for month in records.iter().filter_map(|row| row.post_month()) {
        counts[month as usize - 1] += 1;
    }
    MonthlyCounts(counts)
}

/// Posting counts per year, ascending. Only years that occur are present.
pub fn count_by_year(records: &RecordSet) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for year in records.iter().filter_map(|row| row.post_year()) {
        *counts.entry(year).or_default() += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Column extraction for distribution charts
// ---------------------------------------------------------------------------

pub fn salary_values(records: &RecordSet) -> Vec<f64> {
    records.iter().filter_map(|row| row.salary).collect()
}

pub fn experience_values(records: &RecordSet) -> Vec<f64> {
    records
        .iter()
        .map(|row| f64::from(row.experience_years))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::tests::posting;
    use crate::data::model::{CompanySize, JobPosting};

    fn with_salaries(salaries: &[Option<f64>]) -> RecordSet {
        salaries
            .iter()
            .map(|&s| posting("Riyadh", "Acme", s, 1))
            .collect()
    }

    #[test]
    fn summarize_averages_only_salaried_rows() {
        let records = with_salaries(&[Some(4000.0), Some(5000.0), None, Some(9000.0), Some(15000.0)]);
        let kpi = summarize(&records).unwrap();
        assert_eq!(kpi.total_count, 5);
        let avg = kpi.average_salary.unwrap();
        assert_eq!(avg, 8250.0);
    }

    #[test]
    fn summarize_without_any_salary() {
        let kpi = summarize(&with_salaries(&[None, None])).unwrap();
        assert_eq!(kpi.average_salary, None);
        assert_eq!(kpi.total_count, 2);
    }

    #[test]
    fn modal_experience_prefers_smallest_on_ties() {
        let records: RecordSet = [1, 1, 2, 3, 1]
            .into_iter()
            .map(|exp| posting("Riyadh", "Acme", None, exp))
            .collect();
        assert_eq!(summarize(&records).unwrap().modal_experience, 1);

        let tied: RecordSet = [5, 2, 5, 2, 7]
            .into_iter()
            .map(|exp| posting("Riyadh", "Acme", None, exp))
            .collect();
        assert_eq!(summarize(&tied).unwrap().modal_experience, 2);
    }

    #[test]
    fn summarize_counts_distinct_regions() {
        let records = RecordSet::new(vec![
            posting("Riyadh", "Acme", None, 1),
            posting("Makkah", "Acme", None, 1),
            posting("Riyadh", "Acme", None, 1),
        ]);
        assert_eq!(summarize(&records).unwrap().distinct_region_count, 2);
    }

    #[test]
    fn summarize_empty_is_no_data() {
        assert_eq!(summarize(&RecordSet::default()), Err(NoData));
    }

    #[test]
    fn top_companies_ranks_by_count() {
        let records = RecordSet::new(vec![
            posting("Riyadh", "Acme", None, 1),
            posting("Riyadh", "Globex", None, 1),
            posting("Riyadh", "Acme", None, 1),
        ]);
        assert_eq!(
            top_companies_by_posting_count(&records, DEFAULT_TOP_N),
            vec![("Acme".to_string(), 2), ("Globex".to_string(), 1)]
        );
    }

    #[test]
    fn top_companies_ties_keep_first_seen_order_and_truncate() {
        let records: RecordSet = ["Initech", "Globex", "Acme", "Globex", "Initech", "Umbrella"]
            .into_iter()
            .map(|c| posting("Riyadh", c, None, 1))
            .collect();
        let top = top_companies_by_posting_count(&records, 3);
        let names: Vec<_> = top.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Initech", "Globex", "Acme"]);
        assert!(top_companies_by_posting_count(&RecordSet::default(), 10).is_empty());
    }

    #[test]
    fn average_by_company_size_omits_unsalaried_groups() {
        let mut rows = vec![
            posting("Riyadh", "Acme", Some(4000.0), 1),
            posting("Riyadh", "Acme", Some(6000.0), 1),
            posting("Riyadh", "Globex", Some(20000.0), 1),
            posting("Riyadh", "Initech", None, 1),
        ];
        rows[2].company_size = CompanySize::G;
        rows[3].company_size = CompanySize::Other("XL".into());
        let grouped = average_salary_by_group(&RecordSet::new(rows), PostingColumn::CompanySize);
        assert_eq!(
            grouped.averages,
            vec![("SA".to_string(), 5000.0), ("G".to_string(), 20000.0)]
        );
        assert_eq!(grouped.omitted, vec!["XL".to_string()]);
        assert!(grouped.averages.iter().all(|(_, avg)| avg.is_finite()));
    }

    #[test]
    fn monthly_counts_report_every_month() {
        let mut rows = vec![
            posting("Riyadh", "Acme", None, 1),
            posting("Riyadh", "Acme", None, 1),
            posting("Riyadh", "Acme", None, 1),
        ];
        rows[1].job_date = NaiveDate::from_ymd_opt(2022, 1, 20);
        rows[2].job_date = None;
        let months = count_by_month(&RecordSet::new(rows));
        assert_eq!(months.iter().count(), 12);
        assert_eq!(months.get(11), 1);
        assert_eq!(months.get(1), 1);
        assert_eq!(months.get(10), 0);
        assert_eq!(months.get(13), 0);
        assert_eq!(months.total(), 2);
    }

    #[test]
    fn yearly_counts_skip_undated_rows() {
        let mut rows = vec![
            posting("Riyadh", "Acme", None, 1),
            posting("Riyadh", "Acme", None, 1),
            posting("Riyadh", "Acme", None, 1),
        ];
        rows[1].job_date = NaiveDate::from_ymd_opt(2022, 1, 20);
        rows[2].job_date = None;
        let years: Vec<_> = count_by_year(&RecordSet::new(rows)).into_iter().collect();
        assert_eq!(years, vec![(2021, 1), (2022, 1)]);
    }

    fn arb_row() -> impl Strategy<Value = JobPosting> {
        (0usize..4, prop::option::of(1u32..=12), 0u32..6).prop_map(|(company, month, exp)| {
            let mut row = posting("Riyadh", ["Acme", "Globex", "Initech", "Umbrella"][company], None, exp);
            row.job_date = month.and_then(|m| NaiveDate::from_ymd_opt(2022, m, 1));
            row
        })
    }

    proptest! {
        #[test]
        fn monthly_counts_conserve_dated_rows(rows in prop::collection::vec(arb_row(), 0..60)) {
            let records = RecordSet::new(rows);
            let dated = records.iter().filter(|r| r.post_month().is_some()).count();
            prop_assert_eq!(count_by_month(&records).total(), dated);
        }

        #[test]
        fn top_companies_is_deterministic(
            rows in prop::collection::vec(arb_row(), 0..60),
            n in 0usize..6,
        ) {
            let records = RecordSet::new(rows);
            let first = top_companies_by_posting_count(&records, n);
            let second = top_companies_by_posting_count(&records, n);
            prop_assert!(first.len() <= n);
            prop_assert!(first.windows(2).all(|w| w[0].1 >= w[1].1));
            prop_assert_eq!(first, second);
        }
    }
}
