//! Distribution statistics behind the boxplot and histogram charts.

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// Five-number summary plus outliers, Tukey style (whiskers at 1.5 × IQR).
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` when there are no finite values.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        if sorted.is_empty() {
            return None;
        }
        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let fences = (q1 - 1.5 * iqr)..=(q3 + 1.5 * iqr);

        let (inside, outliers): (Vec<f64>, Vec<f64>) =
            sorted.iter().partition(|v| fences.contains(*v));
        // The quartiles always lie within the fences, so `inside` is never empty.
        let lower_whisker = inside.first().copied().unwrap_or(q1);
        let upper_whisker = inside.last().copied().unwrap_or(q3);

        Some(BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Linear-interpolation quantile of sorted, non-empty data.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Upper bound on automatically chosen bins; one extreme value would
/// otherwise shrink the Freedman–Diaconis width to almost nothing.
pub const MAX_BINS: usize = 200;

/// Equal-width histogram. `edges.len() == counts.len() + 1` unless empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` with an automatically chosen bin count: the finer of the
    /// Sturges and Freedman–Diaconis widths, capped at [`MAX_BINS`].
    pub fn auto(values: &[f64]) -> Self {
        let sorted = sorted_finite(values);
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Histogram::default();
        };
        let range = max - min;
        if range == 0.0 {
            return Histogram {
                edges: vec![min - 0.5, min + 0.5],
                counts: vec![sorted.len()],
            };
        }

        let n = sorted.len() as f64;
        let sturges = range / (n.log2() + 1.0);
        let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
        let fd = 2.0 * iqr / n.cbrt();
        let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
        let bins = ((range / width).ceil() as usize).clamp(1, MAX_BINS);

        Self::with_bins(&sorted, min, max, bins)
    }

    fn with_bins(sorted: &[f64], min: f64, max: f64, bins: usize) -> Self {
        let width = (max - min) / bins as f64;
        let edges = (0..=bins).map(|i| min + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for &v in sorted {
            // Last bin is closed on the right.
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }
        Histogram { edges, counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(bin centre, bin width, count)` triples for bar rendering.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| ((edge[0] + edge[1]) / 2.0, edge[1] - edge[0], count))
    }
}
