//! Shared application-level helpers for the CLI and examples.
//!
//! These functions wire up I/O (load image, JSON/image output) around the
//! `keyfield` pipeline so the binary and the examples share the same behavior.

use crate::image::{image_from_pixel_grid, pixel_grid_from_dynamic};
use anyhow::{Context, Result};
use image::ImageReader;
use keyfield_core::detect::run_pipeline;
use keyfield_core::{Keypoint, NormalizedChannels};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Run configuration, loadable from JSON.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DetectionConfig {
    pub image: PathBuf,
    pub output_json: Option<PathBuf>,
    pub output_image: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl DetectionConfig {
    pub fn new(image: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }

    /// Keypoint JSON destination, `<stem>.keypoints.json` next to the input by default.
    pub fn json_path(&self) -> PathBuf {
        self.output_json
            .clone()
            .unwrap_or_else(|| sibling_path(&self.image, ".keypoints", "json"))
    }

    /// Visualization destination, `<stem>_filtered.<ext>` next to the input by default.
    pub fn image_path(&self) -> PathBuf {
        self.output_image.clone().unwrap_or_else(|| {
            let ext = self
                .image
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("png");
            sibling_path(&self.image, "_filtered", ext)
        })
    }
}

/// Serialized keypoint record; `x` precedes `y` in the output.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct KeypointOut {
    pub x: f32,
    pub y: f32,
}

impl From<Keypoint> for KeypointOut {
    fn from(k: Keypoint) -> Self {
        Self { x: k.x, y: k.y }
    }
}

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionSummary {
    pub image: PathBuf,
    pub width: u32,
    pub height: u32,
    pub keypoints: usize,
    pub output_json: PathBuf,
    pub output_image: PathBuf,
    pub resp_ms: f64,
    pub detect_ms: f64,
    pub visualize_ms: f64,
}

pub fn run_detection(cfg: &DetectionConfig) -> Result<DetectionSummary> {
    let img = ImageReader::open(&cfg.image)
        .with_context(|| format!("opening image {}", cfg.image.display()))?
        .decode()
        .with_context(|| format!("decoding image {}", cfg.image.display()))?;
    info!(
        width = img.width(),
        height = img.height(),
        "loaded {}",
        cfg.image.display()
    );

    let grid = pixel_grid_from_dynamic(&img);
    let res = run_pipeline(&grid, &NormalizedChannels)?;
    debug!(
        resp_ms = res.resp_ms,
        detect_ms = res.detect_ms,
        visualize_ms = res.visualize_ms,
        "pipeline finished"
    );

    let json_out = cfg.json_path();
    let records: Vec<KeypointOut> = res.keypoints.iter().copied().map(Into::into).collect();
    write_json(&json_out, &records)?;
    info!(count = records.len(), "wrote keypoints to {}", json_out.display());

    let image_out = cfg.image_path();
    image_from_pixel_grid(&res.visualization)
        .save(&image_out)
        .with_context(|| format!("writing visualization {}", image_out.display()))?;
    info!("wrote visualization to {}", image_out.display());

    Ok(DetectionSummary {
        image: cfg.image.clone(),
        width: img.width(),
        height: img.height(),
        keypoints: records.len(),
        output_json: json_out,
        output_image: image_out,
        resp_ms: res.resp_ms,
        detect_ms: res.detect_ms,
        visualize_ms: res.visualize_ms,
    })
}

pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value)
        .with_context(|| format!("serializing {}", path.display()))?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<DetectionConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: DetectionConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

fn sibling_path(image: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    image.with_file_name(format!("{stem}{suffix}.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_outputs_sit_next_to_the_input() {
        let cfg = DetectionConfig::new("data/fox.jpg");
        assert_eq!(cfg.json_path(), PathBuf::from("data/fox.keypoints.json"));
        assert_eq!(cfg.image_path(), PathBuf::from("data/fox_filtered.jpg"));

        let cfg = DetectionConfig::new("scan");
        assert_eq!(cfg.image_path(), PathBuf::from("scan_filtered.png"));
    }

    #[test]
    fn explicit_outputs_win() {
        let cfg = DetectionConfig {
            output_json: Some("out.json".into()),
            output_image: Some("vis.png".into()),
            ..DetectionConfig::new("fox.jpg")
        };
        assert_eq!(cfg.json_path(), PathBuf::from("out.json"));
        assert_eq!(cfg.image_path(), PathBuf::from("vis.png"));
    }

    #[test]
    fn keypoint_records_serialize_x_then_y() {
        let out = KeypointOut::from(Keypoint { x: 0.5, y: 0.25 });
        let json = serde_json::to_string(&[out]).unwrap();
        assert_eq!(json, r#"[{"x":0.5,"y":0.25}]"#);
    }

    #[test]
    fn config_parses_with_optional_fields() {
        let cfg: DetectionConfig =
            serde_json::from_str(r#"{"image": "fox.png", "log_level": "debug"}"#).unwrap();
        assert_eq!(cfg.image, PathBuf::from("fox.png"));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert!(cfg.output_json.is_none());
    }
}
