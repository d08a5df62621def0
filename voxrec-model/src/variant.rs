//! Named network variants.

use crate::ModelError;
use crate::weights::WeightsLocation;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Directory under which default weights are stored, one subdirectory per variant.
pub const DEFAULT_WEIGHTS_ROOT: &str = "output";

/// File server hosting pretrained weights, one file per variant.
pub const DEFAULT_WEIGHTS_SERVER: &str = "ftp://cs.stanford.edu/cs/cvgl";

/// Recurrent reconstruction networks with published pretrained weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NetworkVariant {
    /// Shallow encoder with a 3D convolutional GRU.
    GruNet,
    /// Shallow encoder with a 3D convolutional LSTM.
    LstmNet,
    /// Deep residual encoder/decoder with a 3D convolutional GRU.
    #[default]
    ResidualGruNet,
}

impl NetworkVariant {
    pub const ALL: [NetworkVariant; 3] = [
        NetworkVariant::GruNet,
        NetworkVariant::LstmNet,
        NetworkVariant::ResidualGruNet,
    ];

    /// Canonical name, used for directories, file names and the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            NetworkVariant::GruNet => "GRUNet",
            NetworkVariant::LstmNet => "LSTMNet",
            NetworkVariant::ResidualGruNet => "ResidualGRUNet",
        }
    }

    /// `output/<Name>/default_model/weights.onnx`
    pub fn default_weights_path(&self) -> PathBuf {
        PathBuf::from(DEFAULT_WEIGHTS_ROOT)
            .join(self.name())
            .join("default_model")
            .join("weights.onnx")
    }

    /// `<server>/<Name>.onnx`
    pub fn weights_url(&self, server: &str) -> String {
        format!("{}/{}.onnx", server.trim_end_matches('/'), self.name())
    }

    /// Default local path paired with the default download URL.
    pub fn default_weights(&self) -> WeightsLocation {
        WeightsLocation::new(
            self.default_weights_path(),
            self.weights_url(DEFAULT_WEIGHTS_SERVER),
        )
    }
}

impl fmt::Display for NetworkVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkVariant {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::UnknownVariant(s.to_string()))
    }
}
