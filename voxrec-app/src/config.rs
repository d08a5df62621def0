//! Run configuration, loadable from a JSON file.

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use voxrec_capture::{DEFAULT_IMAGE_SIZE, PreprocessConfig};
use voxrec_data::{DEFAULT_VOXEL_THRESHOLD, MeshOptions};
use voxrec_model::NetworkVariant;

/// Everything a reconstruction run needs. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Directory holding the input views.
    pub input_dir: PathBuf,
    /// Maximum number of views to use; 0 uses every image.
    pub max_views: usize,
    /// Destination of the OBJ mesh.
    pub obj_path: PathBuf,
    /// Destination of the probability dump.
    pub text_path: PathBuf,
    pub model: ModelConfig,
    pub preprocess: PreprocessSettings,
    pub export: ExportConfig,
    pub viewer: ViewerConfig,
    pub logging: LoggingConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input/chair1"),
            max_views: 0,
            obj_path: PathBuf::from("prediction.obj"),
            text_path: PathBuf::from("prediction.txt"),
            model: ModelConfig::default(),
            preprocess: PreprocessSettings::default(),
            export: ExportConfig::default(),
            viewer: ViewerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), AppError> {
        self.variant()?;
        let threshold = self.export.voxel_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::InvalidConfig(format!(
                "voxel threshold must be within [0, 1], got {threshold}"
            )));
        }
        if self.export.mesh_scale <= 0.0 || self.export.mesh_spacing <= 0.0 {
            return Err(AppError::InvalidConfig(
                "mesh scale and spacing must be positive".to_string(),
            ));
        }
        self.preprocess.to_preprocess().validate()?;
        Ok(())
    }

    pub fn variant(&self) -> Result<NetworkVariant, AppError> {
        Ok(self.model.variant.parse::<NetworkVariant>()?)
    }
}

/// Which network to run and where its weights come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Variant name, e.g. `ResidualGRUNet`.
    pub variant: String,
    /// Local weights file; defaults to the variant's standard location.
    pub weights_path: Option<PathBuf>,
    /// Download URL; defaults to the variant's file on the public server.
    pub weights_url: Option<String>,
    /// Graph output holding the occupancy volume; defaults to the first output.
    pub output_name: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            variant: NetworkVariant::default().name().to_string(),
            weights_path: None,
            weights_url: None,
            output_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessSettings {
    pub image_size: u32,
    pub alpha_threshold: u8,
    pub background: [u8; 3],
}

impl PreprocessSettings {
    pub fn to_preprocess(&self) -> PreprocessConfig {
        PreprocessConfig {
            size: self.image_size,
            alpha_threshold: self.alpha_threshold,
            background: self.background,
        }
    }
}

impl Default for PreprocessSettings {
    fn default() -> Self {
        let defaults = PreprocessConfig::default();
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            alpha_threshold: defaults.alpha_threshold,
            background: defaults.background,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Probabilities strictly above this value count as occupied.
    pub voxel_threshold: f32,
    /// Mesh only voxels with an exposed side.
    pub surface_only: bool,
    pub mesh_scale: f32,
    pub mesh_spacing: f32,
}

impl ExportConfig {
    pub fn mesh_options(&self) -> MeshOptions {
        MeshOptions {
            scale: self.mesh_scale,
            spacing: self.mesh_spacing,
            surface_only: self.surface_only,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        let mesh = MeshOptions::default();
        Self {
            voxel_threshold: DEFAULT_VOXEL_THRESHOLD,
            surface_only: mesh.surface_only,
            mesh_scale: mesh.scale,
            mesh_spacing: mesh.spacing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Open the mesh in an external viewer after export.
    pub enabled: bool,
    pub command: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "meshlab".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub enable_tracy: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_tracy: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_demo() {
        let config = DemoConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("./input/chair1"));
        assert_eq!(config.max_views, 0);
        assert_eq!(config.obj_path, PathBuf::from("prediction.obj"));
        assert_eq!(config.text_path, PathBuf::from("prediction.txt"));
        assert_eq!(config.variant().unwrap(), NetworkVariant::ResidualGruNet);
        assert_eq!(config.export.voxel_threshold, 0.4);
        assert_eq!(config.preprocess.image_size, 127);
        assert_eq!(config.viewer.command, "meshlab");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DemoConfig::from_json(
            r#"{
                "input_dir": "views",
                "model": { "variant": "GRUNet", "output_name": "occupancy" },
                "export": { "voxel_threshold": 0.3 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.input_dir, PathBuf::from("views"));
        assert_eq!(config.variant().unwrap(), NetworkVariant::GruNet);
        assert_eq!(config.model.output_name.as_deref(), Some("occupancy"));
        assert_eq!(config.model.weights_path, None);
        assert_eq!(config.export.voxel_threshold, 0.3);
        assert!(config.export.surface_only);
        assert_eq!(config.obj_path, PathBuf::from("prediction.obj"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(DemoConfig::from_json(r#"{ "treshold": 0.5 }"#).is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = DemoConfig::load(&path).unwrap_err();
        assert!(matches!(err, AppError::ConfigParse { path: ref p, .. } if p == &path));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DemoConfig::default();
        config.export.voxel_threshold = 1.5;
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));

        let mut config = DemoConfig::default();
        config.model.variant = "VoxNet".to_string();
        assert!(matches!(config.validate(), Err(AppError::Model(_))));

        let mut config = DemoConfig::default();
        config.preprocess.image_size = 0;
        assert!(matches!(config.validate(), Err(AppError::Capture(_))));
    }
}
