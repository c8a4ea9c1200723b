use anyhow::{Context, Result};
use serde::Serialize;

/// One output row, in the column layout of the published dataset.
#[derive(Serialize)]
struct Row<'a> {
    job_title: &'a str,
    company_name: &'a str,
    region: &'a str,
    company_size: &'a str,
    economic_activity: &'a str,
    salary: Option<f64>,
    experience_years: u32,
    job_date: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const REGIONS: [&str; 6] = ["Riyadh", "Makkah", "Eastern", "Madinah", "Qassim", "Asir"];
const TITLES: [&str; 6] = [
    "Accountant",
    "Sales Specialist",
    "Software Engineer",
    "Customer Service",
    "HR Officer",
    "Nurse",
];
const COMPANIES: [&str; 14] = [
    "Al Rajhi Trading",
    "Najd Contracting",
    "Gulf Retail Co",
    "Red Sea Logistics",
    "Tihama Foods",
    "Desert Tech",
    "Hijaz Medical",
    "Eastern Energy Services",
    "Oasis Hospitality",
    "Qassim Agro",
    "Asir Construction",
    "Madinah Education",
    "Jeddah Finance House",
    "Dammam Steel",
];
const INDUSTRIES: [&str; 5] = ["Retail", "Construction", "Health", "Energy", "Finance"];
/// Includes a code outside the documented set on purpose.
const SIZES: [&str; 6] = ["SA", "MB", "MA", "L", "G", "XL"];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cleaned_dataset.csv".to_string());
    let n_rows = 600;

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    for i in 0..n_rows {
        let size = rng.pick(&SIZES);
        let size_factor = match size {
            "SA" => 0.8,
            "MB" => 0.9,
            "MA" => 1.0,
            "L" => 1.25,
            "G" => 1.5,
            _ => 1.0,
        };
        // Skewed towards junior roles.
        let experience_years = (rng.next_f64().powi(3) * 12.0) as u32;
        let base = 4000.0 + 700.0 * f64::from(experience_years);
        let salary = (i % 37 != 0)
            .then(|| (rng.gauss(base, 900.0) * size_factor).max(3000.0).round());

        // Postings cluster at the end of the year; a few dates are malformed.
        let month = if rng.next_f64() < 0.35 {
            11 + (rng.next_u64() % 2) as u32
        } else {
            1 + (rng.next_u64() % 12) as u32
        };
        let day = 1 + (rng.next_u64() % 28) as u32;
        let job_date = if i % 53 == 0 {
            "unknown".to_string()
        } else {
            format!("2021-{month:02}-{day:02}")
        };

        writer.serialize(Row {
            job_title: rng.pick(&TITLES),
            company_name: rng.pick(&COMPANIES),
            region: rng.pick(&REGIONS),
            company_size: size,
            economic_activity: rng.pick(&INDUSTRIES),
            salary,
            experience_years,
            job_date,
        })?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {n_rows} postings to {output_path}");
    Ok(())
}
