//! Writes `sample_data.csv`: a week of synthetic 5-minute water-quality
//! readings in Dutch locale conventions (`;` delimiter, `,` decimal mark,
//! day-first timestamps), with sensor dropouts and a few corrupt rows.

use chrono::{NaiveDate, TimeDelta};
use csv::WriterBuilder;

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

/// Daily cycle in [-1, 1], peaking mid-afternoon.
fn diurnal(minutes_of_day: f64) -> f64 {
    (2.0 * std::f64::consts::PI * (minutes_of_day - 900.0) / 1440.0).cos()
}

/// Format with a comma decimal mark, or empty for a dropout.
fn dutch(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}").replace('.', ","))
        .unwrap_or_default()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date");
    let step = TimeDelta::minutes(5);
    let n_rows = 7 * 24 * 12;

    let output_path = "sample_data.csv";
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .expect("Failed to create output file");

    writer
        .write_record(["Tijd", "Temperatuur", "pH", "Zuurstof", "Geleidbaarheid", "Status"])
        .expect("Failed to write header");

    let mut written = 0;
    for i in 0..n_rows {
        let ts = start + step * i;
        let minutes = (i % 288) as f64 * 5.0;
        let cycle = diurnal(minutes);

        let temp = 18.0 + 2.5 * cycle + rng.gauss(0.0, 0.15);
        let ph = 7.6 + 0.3 * cycle + rng.gauss(0.0, 0.03);
        let oxygen = 8.5 + 1.8 * cycle + rng.gauss(0.0, 0.2);
        let conductivity = 520.0 - 15.0 * cycle + rng.gauss(0.0, 4.0);

        // Roughly 2% dropouts per sensor.
        let mut maybe = |v: f64| (rng.next_f64() > 0.02).then_some(v);
        let temp = maybe(temp);
        let ph = maybe(ph);
        let oxygen = maybe(oxygen);

        let time_cell = if i % 500 == 250 {
            "sensor reset".to_string()
        } else {
            ts.format("%d-%m-%Y %H:%M").to_string()
        };
        let status = if oxygen.is_none() { "storing" } else { "ok" };

        writer
            .write_record([
                time_cell,
                dutch(temp, 2),
                dutch(ph, 2),
                dutch(oxygen, 2),
                dutch(Some(conductivity), 0),
                status.to_string(),
            ])
            .expect("Failed to write row");
        written += 1;
    }

    writer.flush().expect("Failed to flush output");

    println!("Wrote {written} readings (5-minute interval) to {output_path}");
}
