//! One-line textual insights shown under each chart, derived from the views.

use crate::data::query::{GroupedAverages, MonthlyCounts};
use crate::data::stats::{BoxStats, Histogram};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("?")
}

pub fn salary(stats: Option<&BoxStats>) -> String {
    match stats {
        Some(s) if s.outliers.is_empty() => format!(
            "Salaries mostly fall between {:.0}–{:.0} SAR (median {:.0}).",
            s.q1, s.q3, s.median
        ),
        Some(s) => format!(
            "Salaries mostly fall between {:.0}–{:.0} SAR (median {:.0}), with {} outliers \
             indicating high-paying specialized roles.",
            s.q1,
            s.q3,
            s.median,
            s.outliers.len()
        ),
        None => "No salaries in the current selection.".to_string(),
    }
}

/// Describes the most populated experience bin.
pub fn experience(histogram: &Histogram) -> String {
    let peak = histogram
        .bars()
        .enumerate()
        .max_by(|a, b| a.1 .2.cmp(&b.1 .2).then(b.0.cmp(&a.0)))
        .map(|(_, bar)| bar);
    match peak {
        Some((centre, width, _)) => format!(
            "Most job postings require {:.0}–{:.0} years of experience.",
            (centre - width / 2.0).max(0.0),
            centre + width / 2.0
        ),
        None => "No experience data in the current selection.".to_string(),
    }
}

pub fn company_size(grouped: &GroupedAverages) -> String {
    let best = grouped
        .averages
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1));
    let mut text = match best {
        Some((size, avg)) => format!("Company size {size} offers the highest mean salary ({avg:.0} SAR)."),
        None => "No salaried postings in the current selection.".to_string(),
    };
    if !grouped.omitted.is_empty() {
        text.push_str(&format!(
            " Not shown (no salary data): {}.",
            grouped.omitted.join(", ")
        ));
    }
    text
}

pub fn monthly(counts: &MonthlyCounts) -> String {
    if counts.total() == 0 {
        return "No dated postings in the current selection.".to_string();
    }
    // Earliest month wins ties in both directions.
    let mut peak = (1, 0);
    let mut low = (1, usize::MAX);
    for (month, count) in counts.iter() {
        if count > peak.1 {
            peak = (month, count);
        }
        if count < low.1 {
            low = (month, count);
        }
    }
    format!(
        "Job postings peak in {}, while {} is the lowest month.",
        month_name(peak.0),
        month_name(low.0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::posting;
    use crate::data::model::RecordSet;
    use crate::data::query::count_by_month;

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
        assert_eq!(month_name(0), "?");
        assert_eq!(month_name(13), "?");
    }

    #[test]
    fn monthly_peak_and_low() {
        // Every sample posting is dated in November.
        let records: RecordSet = (0..3).map(|_| posting("Riyadh", "Acme", None, 1)).collect();
        let text = monthly(&count_by_month(&records));
        assert_eq!(text, "Job postings peak in Nov, while Jan is the lowest month.");
        assert!(monthly(&MonthlyCounts::default()).starts_with("No dated"));
    }

    #[test]
    fn company_size_mentions_omitted_groups() {
        let grouped = GroupedAverages {
            averages: vec![("SA".into(), 5000.0), ("G".into(), 20000.0)],
            omitted: vec!["XL".into()],
        };
        let text = company_size(&grouped);
        assert!(text.starts_with("Company size G offers"));
        assert!(text.ends_with("Not shown (no salary data): XL."));
    }

    #[test]
    fn salary_without_data() {
        assert_eq!(salary(None), "No salaries in the current selection.");
        let stats = BoxStats::from_values(&[4000.0, 5000.0, 9000.0]).unwrap();
        assert!(salary(Some(&stats)).contains("4500–7000"));
    }

    #[test]
    fn experience_peak_bin() {
        let hist = Histogram::auto(&[0.0, 0.0, 1.0, 1.0, 2.0, 10.0]);
        assert!(experience(&hist).starts_with("Most job postings require 0–"));
        assert!(experience(&Histogram::default()).starts_with("No experience"));
    }
}
