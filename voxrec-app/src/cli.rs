//! Command-line arguments.

use crate::config::DemoConfig;
use crate::errors::AppError;
use clap::Parser;
use std::path::PathBuf;

/// Voxrec - reconstruct a voxel grid from a directory of views
#[derive(Parser, Debug)]
#[command(name = "voxrec")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory of input images [default: ./input/chair1]
    pub input_dir: Option<PathBuf>,

    /// Maximum number of views to use, 0 for all [default: 0]
    pub input_num: Option<usize>,

    /// Output mesh file [default: prediction.obj]
    pub obj_path: Option<PathBuf>,

    /// Output probability dump [default: prediction.txt]
    pub text_path: Option<PathBuf>,

    /// JSON config file; command-line values take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Network variant (GRUNet, LSTMNet, ResidualGRUNet)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Local weights file
    #[arg(long)]
    pub weights: Option<PathBuf>,

    /// URL to download weights from when the local file is missing
    #[arg(long)]
    pub weights_url: Option<String>,

    /// ONNX graph output to read, instead of the first one
    #[arg(long)]
    pub output_name: Option<String>,

    /// Occupancy probability cutoff
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Mesh every occupied voxel instead of only exposed ones
    #[arg(long)]
    pub full_mesh: bool,

    /// Mesh viewer to launch after export
    #[arg(long)]
    pub viewer: Option<String>,

    /// Do not launch a mesh viewer
    #[arg(long)]
    pub no_viewer: bool,

    /// Log filter, e.g. "debug" or "voxrec_model=trace"
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Build the run configuration: defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<DemoConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load(path)?,
            None => DemoConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Overwrite config values with the flags that were given.
    pub fn apply(&self, config: &mut DemoConfig) {
        if let Some(dir) = &self.input_dir {
            config.input_dir = dir.clone();
        }
        if let Some(n) = self.input_num {
            config.max_views = n;
        }
        if let Some(path) = &self.obj_path {
            config.obj_path = path.clone();
        }
        if let Some(path) = &self.text_path {
            config.text_path = path.clone();
        }
        if let Some(model) = &self.model {
            config.model.variant = model.clone();
        }
        if let Some(weights) = &self.weights {
            config.model.weights_path = Some(weights.clone());
        }
        if let Some(url) = &self.weights_url {
            config.model.weights_url = Some(url.clone());
        }
        if let Some(name) = &self.output_name {
            config.model.output_name = Some(name.clone());
        }
        if let Some(threshold) = self.threshold {
            config.export.voxel_threshold = threshold;
        }
        if self.full_mesh {
            config.export.surface_only = false;
        }
        if let Some(viewer) = &self.viewer {
            config.viewer.command = viewer.clone();
        }
        if self.no_viewer {
            config.viewer.enabled = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_positional_arguments() {
        let args = Args::parse_from(["voxrec", "input/sofa", "3", "sofa.obj", "sofa.txt"]);
        let config = args.resolve().unwrap();

        assert_eq!(config.input_dir, PathBuf::from("input/sofa"));
        assert_eq!(config.max_views, 3);
        assert_eq!(config.obj_path, PathBuf::from("sofa.obj"));
        assert_eq!(config.text_path, PathBuf::from("sofa.txt"));
    }

    #[test]
    fn test_no_arguments_gives_defaults() {
        let config = Args::parse_from(["voxrec"]).resolve().unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxrec.json");
        fs::write(
            &path,
            r#"{ "input_dir": "from_file", "export": { "voxel_threshold": 0.2 }, "viewer": { "command": "f3d" } }"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "voxrec",
            "--config",
            path.to_str().unwrap(),
            "--threshold",
            "0.6",
            "--model",
            "GRUNet",
            "--full-mesh",
            "--no-viewer",
            "--output-name",
            "occupancy",
        ]);
        let config = args.resolve().unwrap();

        assert_eq!(config.input_dir, PathBuf::from("from_file"));
        assert_eq!(config.export.voxel_threshold, 0.6);
        assert_eq!(config.model.variant, "GRUNet");
        assert!(!config.export.surface_only);
        assert!(!config.viewer.enabled);
        assert_eq!(config.viewer.command, "f3d");
        assert_eq!(config.model.output_name.as_deref(), Some("occupancy"));
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args::parse_from(["voxrec", "--config", "/nonexistent/voxrec.json"]);
        assert!(matches!(args.resolve(), Err(AppError::Io(_))));
    }
}
