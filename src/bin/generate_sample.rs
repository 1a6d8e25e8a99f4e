use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use spotfield_stats::data::loader;
use spotfield_stats::{Data, Measurepoint};

/// Write a synthetic spotfield dataset for trying out the analysis
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Number of spotfields on the slide
    #[arg(long, default_value_t = 4)]
    spotfields: u32,

    /// Spot rows per spotfield
    #[arg(long, default_value_t = 3)]
    rows: u32,

    /// Spot columns per spotfield
    #[arg(long, default_value_t = 5)]
    cols: u32,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output file; the extension selects TSV or JSON
    #[arg(short, long, default_value = "sample_data.tsv")]
    output: PathBuf,
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
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

/// One spot: signal peaks at the centre column of the spotfield, each
/// spotfield has its own gain and background.
fn measure_spot(
    rng: &mut SimpleRng,
    args: &Args,
    spot: u32,
    row: u32,
    col: u32,
) -> Result<Measurepoint> {
    let gain = 1.0 + 0.1 * spot as f64;
    let background = 200.0 + 15.0 * spot as f64;
    let centre = (args.cols as f64 - 1.0) / 2.0;

    let signal = gaussian(col as f64, centre, 1.5, 800.0) * (1.0 + 0.05 * row as f64);
    let mean = (background + gain * signal + rng.gauss(0.0, 8.0)).max(0.0);
    let std_dev = rng.gauss(0.0, 0.05 * mean).abs() + 1.0;
    let min = (mean - 3.0 * std_dev).max(0.0);
    let max = mean + 3.0 * std_dev;

    Ok(Measurepoint::new(spot, row, col, min, max, mean, std_dev)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut measurepoints = Vec::new();
    for spot in 0..args.spotfields {
        for row in 0..args.rows {
            for col in 0..args.cols {
                measurepoints.push(measure_spot(&mut rng, &args, spot, row, col)?);
            }
        }
    }

    let data = Data::from_measurepoints(measurepoints)?;
    loader::save_data(&args.output, &data)?;

    println!(
        "Wrote {} spotfields ({}x{} spots each) to {}",
        args.spotfields,
        args.rows,
        args.cols,
        args.output.display()
    );
    Ok(())
}
