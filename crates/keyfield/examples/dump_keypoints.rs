use anyhow::Context;
use keyfield::app::{write_json, KeypointOut};
use keyfield::{
    image_from_pixel_grid, pixel_grid_from_dynamic, run_pipeline, NormalizedChannels,
};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let input: PathBuf = args
        .next()
        .context("usage: dump_keypoints <image>")?
        .into();
    if let Some(other) = args.next() {
        anyhow::bail!("unknown argument: {other}");
    }

    let img = image::open(&input)?;
    let grid = pixel_grid_from_dynamic(&img);

    let started = Instant::now();
    let res = run_pipeline(&grid, &NormalizedChannels)?;
    let total_ms = started.elapsed().as_secs_f64() * 1000.0;

    println!("image {}x{} pixels", grid.width(), grid.height());
    println!("pipeline: {:5.2} ms", total_ms);
    println!(" -      resp: {:5.2} ms", res.resp_ms);
    println!(" -    detect: {:5.2} ms", res.detect_ms);
    println!(" - visualize: {:5.2} ms", res.visualize_ms);
    println!("Detected {} keypoints", res.keypoints.len());

    let json_out = input.with_extension("keypoints.json");
    let records: Vec<KeypointOut> = res.keypoints.iter().copied().map(Into::into).collect();
    write_json(&json_out, &records)?;
    println!("Saved JSON dump to {}", json_out.display());

    let out = input.with_extension("response.png");
    image_from_pixel_grid(&res.visualization).save(&out)?;
    println!("Saved visualization to {}", out.display());

    Ok(())
}
