use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::{JobPosting, PostingColumn, RecordSet};

// ---------------------------------------------------------------------------
// Selection: the active filter predicates
// ---------------------------------------------------------------------------

/// The filter predicates chosen by the user.
///
/// Set-valued predicates keep a row iff its value is in the set; an empty set
/// therefore keeps nothing. Optional predicates are inactive when `None`.
/// All active predicates are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub regions: BTreeSet<String>,
    pub job_titles: BTreeSet<String>,
    /// Company size codes, including unknown ones.
    pub company_sizes: BTreeSet<String>,
    pub industries: Option<BTreeSet<String>>,
    /// Inclusive SAR range. Rows without a salary fail it.
    pub salary_range: Option<RangeInclusive<f64>>,
    pub experience_range: Option<RangeInclusive<u32>>,
}

impl Selection {
    /// Selection with every observed region, title and size chosen and no
    /// optional predicate, i.e. the dashboard's initial state.
    pub fn everything(records: &RecordSet) -> Self {
        let all = |column: PostingColumn| -> BTreeSet<String> {
            records.distinct(column).into_iter().collect()
        };
        Selection {
            regions: all(PostingColumn::Region),
            job_titles: all(PostingColumn::JobTitle),
            company_sizes: all(PostingColumn::CompanySize),
            industries: None,
            salary_range: None,
            experience_range: None,
        }
    }

    /// The set backing a multiselect column, if the column is filterable.
    pub fn set_for(&self, column: PostingColumn) -> Option<&BTreeSet<String>> {
        match column {
            PostingColumn::Region => Some(&self.regions),
            PostingColumn::JobTitle => Some(&self.job_titles),
            PostingColumn::CompanySize => Some(&self.company_sizes),
            PostingColumn::EconomicActivity => self.industries.as_ref(),
            PostingColumn::CompanyName => None,
        }
    }

    pub fn set_for_mut(&mut self, column: PostingColumn) -> Option<&mut BTreeSet<String>> {
        match column {
            PostingColumn::Region => Some(&mut self.regions),
            PostingColumn::JobTitle => Some(&mut self.job_titles),
            PostingColumn::CompanySize => Some(&mut self.company_sizes),
            PostingColumn::EconomicActivity => self.industries.as_mut(),
            PostingColumn::CompanyName => None,
        }
    }

    /// Whether a single posting passes every active predicate.
    pub fn matches(&self, row: &JobPosting) -> bool {
        if !self.regions.contains(&row.region)
            || !self.job_titles.contains(&row.job_title)
            || !self.company_sizes.contains(row.company_size.code())
        {
            return false;
        }
        if let Some(industries) = &self.industries {
            if !industries.contains(&row.economic_activity) {
                return false;
            }
        }
        if let Some(range) = &self.salary_range {
            match row.salary {
                Some(salary) if range.contains(&salary) => {}
                _ => return false,
            }
        }
        if let Some(range) = &self.experience_range {
            if !range.contains(&row.experience_years) {
                return false;
            }
        }
        true
    }
}

/// Return the postings that pass `selection`, in their original order.
pub fn filter_by_selection(records: &RecordSet, selection: &Selection) -> RecordSet {
    records
        .iter()
        .filter(|row| selection.matches(row))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::tests::posting;
    use crate::data::model::CompanySize;

    fn sample() -> RecordSet {
        let mut rows = vec![
            posting("Riyadh", "Acme", Some(4000.0), 1),
            posting("Makkah", "Globex", Some(9000.0), 3),
            posting("Riyadh", "Initech", None, 0),
            posting("Eastern", "Acme", Some(15000.0), 8),
        ];
        rows[1].company_size = CompanySize::Other("XL".into());
        rows[3].economic_activity = "Energy".into();
        RecordSet::new(rows)
    }

    #[test]
    fn everything_keeps_all_rows() {
        let records = sample();
        let filtered = filter_by_selection(&records, &Selection::everything(&records));
        assert_eq!(filtered, records);
    }

    #[test]
    fn empty_region_set_yields_no_rows() {
        let records = sample();
        let mut selection = Selection::everything(&records);
        selection.regions.clear();
        assert!(filter_by_selection(&records, &selection).is_empty());
    }

    #[test]
    fn predicates_are_anded_and_order_preserved() {
        let records = sample();
        let mut selection = Selection::everything(&records);
        selection.regions = ["Riyadh".to_string(), "Eastern".to_string()].into();
        selection.experience_range = Some(1..=10);
        let filtered = filter_by_selection(&records, &selection);
        let companies: Vec<_> = filtered.iter().map(|r| r.company_name.as_str()).collect();
        assert_eq!(companies, vec!["Acme", "Acme"]);
        assert_eq!(filtered[0].region, "Riyadh");
        assert_eq!(filtered[1].region, "Eastern");
    }

    #[test]
    fn salary_range_is_inclusive_and_drops_missing_salaries() {
        let records = sample();
        let mut selection = Selection::everything(&records);
        selection.salary_range = Some(4000.0..=9000.0);
        let filtered = filter_by_selection(&records, &selection);
        let salaries: Vec<_> = filtered.iter().map(|r| r.salary).collect();
        assert_eq!(salaries, vec![Some(4000.0), Some(9000.0)]);
    }

    #[test]
    fn unknown_company_size_can_be_selected() {
        let records = sample();
        let mut selection = Selection::everything(&records);
        selection.company_sizes = ["XL".to_string()].into();
        let filtered = filter_by_selection(&records, &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].company_name, "Globex");
    }

    #[test]
    fn industry_filter_is_optional() {
        let records = sample();
        let mut selection = Selection::everything(&records);
        selection.industries = Some(["Energy".to_string()].into());
        let filtered = filter_by_selection(&records, &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].region, "Eastern");
    }

    #[test]
    fn filtering_leaves_input_untouched() {
        let records = sample();
        let before = records.clone();
        let mut selection = Selection::everything(&records);
        selection.regions.remove("Riyadh");
        let _ = filter_by_selection(&records, &selection);
        assert_eq!(records, before);
    }

    const REGIONS: [&str; 3] = ["Riyadh", "Makkah", "Eastern"];

    fn arb_records() -> impl Strategy<Value = RecordSet> {
        prop::collection::vec(
            (0..REGIONS.len(), prop::option::of(0u32..20_000), 0u32..10),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(region, salary, exp)| {
                    posting(REGIONS[region], "Acme", salary.map(f64::from), exp)
                })
                .collect::<RecordSet>()
        })
    }

    fn arb_regions() -> impl Strategy<Value = BTreeSet<String>> {
        prop::sample::subsequence(REGIONS.to_vec(), 0..=REGIONS.len())
            .prop_map(|picked| picked.into_iter().map(str::to_string).collect())
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            records in arb_records(),
            regions in arb_regions(),
            low in 0u32..20_000,
        ) {
            let mut selection = Selection::everything(&records);
            selection.regions = regions;
            selection.salary_range = Some(f64::from(low)..=20_000.0);
            let once = filter_by_selection(&records, &selection);
            let twice = filter_by_selection(&once, &selection);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn widening_regions_never_shrinks_result(
            records in arb_records(),
            regions in arb_regions(),
            extra in 0..REGIONS.len(),
        ) {
            let mut narrow = Selection::everything(&records);
            narrow.regions = regions;
            let mut wide = narrow.clone();
            wide.regions.insert(REGIONS[extra].to_string());
            let narrow_len = filter_by_selection(&records, &narrow).len();
            let wide_len = filter_by_selection(&records, &wide).len();
            prop_assert!(wide_len >= narrow_len);
        }
    }
}
