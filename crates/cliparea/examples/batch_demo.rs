//! Clip a handful of random triangle pairs and print areas with diagnostics.
//!
//! Usage:
//!   cargo run -p cliparea --example batch_demo -- [pairs] [seed]

use cliparea::prelude::*;

fn main() {
    let mut args = std::env::args().skip(1);
    let pairs = args.next().and_then(|s| s.parse().ok()).unwrap_or(8usize);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2025u64);

    let Some(batch) = draw_pair_batch(RadialCfg::default(), seed, pairs, 3) else {
        eprintln!("sampler could not draw {pairs} non-degenerate pairs");
        return;
    };
    let mut areas = vec![0.0; pairs];
    let cfg = BatchCfg {
        validate_clippers: true,
        ..BatchCfg::default()
    };
    match compute_areas(batch.layout, &batch.subjects, &batch.clippers, &mut areas, &cfg) {
        Ok(report) => {
            for (i, a) in areas.iter().enumerate() {
                println!("pair {i}: area={a:.6}");
            }
            println!("{report:?}");
        }
        Err(err) => eprintln!("batch rejected: {err}"),
    }
}
