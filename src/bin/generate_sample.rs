use std::path::PathBuf;

use anyhow::{Context, Result};

/// Series RLC-ish inductor model: Ls rolls off past the self-resonance,
/// Rs grows with skin effect.
fn inductor_sample(f: f64, l0: f64, r0: f64, f_res: f64) -> (f64, f64) {
    let ratio = f / f_res;
    let ls = l0 / (1.0 - ratio * ratio).abs().max(0.05);
    let rs = r0 * (1.0 + (f / 10_000.0).sqrt());
    (ls, rs)
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_sweeps"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // 20 Hz → 2 MHz, 30 points per decade
    let frequencies: Vec<f64> = (0..=150)
        .map(|i| 20.0 * 10f64.powf(i as f64 / 30.0))
        .collect();

    let n_cores = 8;
    for core in 0..n_cores {
        // The last core is a deliberate outlier.
        let (l0, r0) = if core == n_cores - 1 {
            (1.35e-3, 0.9)
        } else {
            (1.0e-3 * (1.0 + rng.gauss(0.0, 0.02)), 0.5 * (1.0 + rng.gauss(0.0, 0.05)))
        };
        let f_res = 1.2e6 * (1.0 + rng.gauss(0.0, 0.03));

        let path = out_dir.join(format!("core_{:02}.csv", core + 1));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer.write_record(["FREQUENCY", "Ls", "Rs"])?;
        for &f in &frequencies {
            let (ls, rs) = inductor_sample(f, l0, r0, f_res);
            let ls = ls * (1.0 + rng.gauss(0.0, 0.002));
            let rs = rs * (1.0 + rng.gauss(0.0, 0.01));
            writer.write_record([format!("{f:.3}"), format!("{ls:.9}"), format!("{rs:.6}")])?;
        }
        writer.flush()?;
    }

    println!(
        "Wrote {n_cores} sweeps ({} frequencies each) to {}",
        frequencies.len(),
        out_dir.display()
    );
    Ok(())
}
