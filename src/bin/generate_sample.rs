use chrono::{Duration, NaiveDate};

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Group an integer's digits with commas, so the generated file exercises
/// the thousands-separator tolerance of the CSV loader.
fn with_thousands(v: i64) -> String {
    let digits = v.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if v < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let wells = ["Well-7 #2", "Brent/Alpha", "Eagle Ford (S)"];
    let start = NaiveDate::from_ymd_opt(2023, 3, 1)
        .expect("valid date")
        .and_hms_opt(6, 0, 0)
        .expect("valid time");

    let output_path = "sample_wells.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "time",
            "well",
            "depth_m",
            "gamma_api",
            "porosity_frac",
            "flow_rate_bpd",
        ])
        .expect("Failed to write header");

    let mut n_rows = 0usize;
    for (w, well) in wells.iter().enumerate() {
        let mut depth = 1500.0 + 300.0 * w as f64;
        for hour in 0..200i64 {
            let timestamp = start + Duration::hours(hour);
            depth += 2.0 + rng.next_f64();

            // Sandier intervals read lower gamma and higher porosity.
            let sandy = ((depth / 80.0).sin() + 1.0) / 2.0;
            let gamma = rng.gauss(110.0 - 70.0 * sandy, 6.0);
            let porosity = (rng.gauss(0.05 + 0.22 * sandy, 0.015)).clamp(0.0, 0.4);
            let flow = rng.gauss(9_000.0 + 6_000.0 * sandy, 400.0) as i64;

            writer
                .write_record([
                    timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    well.to_string(),
                    format!("{depth:.1}"),
                    format!("{gamma:.2}"),
                    format!("{porosity:.3}"),
                    with_thousands(flow),
                ])
                .expect("Failed to write record");
            n_rows += 1;
        }
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_rows} rows for {} wells to {output_path}", wells.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_thousands_grouping() {
        assert_eq!(with_thousands(0), "0");
        assert_eq!(with_thousands(999), "999");
        assert_eq!(with_thousands(1000), "1,000");
        assert_eq!(with_thousands(1234567), "1,234,567");
        assert_eq!(with_thousands(-4500), "-4,500");
    }
}
