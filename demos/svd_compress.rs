//! Compresses a grayscale image by keeping only its largest singular values.
//!
//! Usage: `cargo run --example svd_compress -- <input> <output> <rank>`

use std::env;

use anyhow::{bail, Context};
use minigrad::{kernel, Matrix};

fn main() -> anyhow::Result<()> {
    minigrad::init_logger!();

    let args: Vec<_> = env::args().skip(1).collect();
    let [input, output, rank] = &args[..] else {
        bail!("usage: svd_compress <input> <output> <rank>");
    };
    let rank: usize = rank
        .parse()
        .with_context(|| format!("invalid rank '{rank}'"))?;

    let image = Matrix::<f32>::load(input)?;
    log::info!(
        "decomposing {}x{} image with the {} kernel",
        image.nrows(),
        image.ncols(),
        kernel::default_kernel().kind()
    );

    let svd = image.svd()?;
    let sigma = svd.singular_values();
    let total: f32 = sigma.iter().map(|s| s * s).sum();
    let kept: f32 = sigma.iter().take(rank).map(|s| s * s).sum();
    log::info!(
        "keeping {} of {} singular values ({:.1}% of the energy)",
        rank.min(sigma.len()),
        sigma.len(),
        if total > 0.0 { kept / total * 100.0 } else { 100.0 },
    );

    let compressed = svd.low_rank(rank)?;
    compressed
        .to_luma8()?
        .save(output)
        .with_context(|| format!("failed to write '{output}'"))?;
    log::info!("wrote {output}");

    Ok(())
}
