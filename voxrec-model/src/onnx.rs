//! ONNX Runtime backend for [`VoxelPredictor`].

use crate::{ModelError, NetworkVariant, VoxelPredictor};
use ndarray::{Array5, ArrayView5, Ix5};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// A network variant exported to ONNX and loaded into an ORT session.
pub struct OnnxNetwork {
    session: Mutex<Session>,
    variant: NetworkVariant,
    input_name: String,
    output_name: String,
    model_path: PathBuf,
}

impl std::fmt::Debug for OnnxNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxNetwork")
            .field("variant", &self.variant)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl OnnxNetwork {
    /// Load weights for `variant` from an ONNX file.
    ///
    /// The first graph input and output are used unless overridden with
    /// [`with_output_name`](Self::with_output_name).
    #[tracing::instrument(skip_all, fields(variant = %variant, path = %path.as_ref().display()))]
    pub fn load(variant: NetworkVariant, path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let session = Session::builder()?
            .with_log_level(LogLevel::Error)?
            .commit_from_file(path)
            .map_err(|source| ModelError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| ModelError::InvalidInput("model declares no inputs".to_string()))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| ModelError::InvalidOutput("model declares no outputs".to_string()))?;

        info!("Loaded {} ({} -> {})", variant, input_name, output_name);
        Ok(Self {
            session: Mutex::new(session),
            variant,
            input_name,
            output_name,
            model_path: path.to_path_buf(),
        })
    }

    /// Read the prediction from a named graph output instead of the first one.
    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = output_name.into();
        self
    }
}

impl VoxelPredictor for OnnxNetwork {
    fn predict(&self, input: ArrayView5<'_, f32>) -> Result<Array5<f32>, ModelError> {
        let input_shape = input.shape().to_vec();
        debug!("Running {} on input {:?}", self.variant, input_shape);

        let input_tensor = TensorRef::from_array_view(input)?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session = self
            .session
            .lock()
            .map_err(|_| ModelError::InvalidInput("session lock poisoned".to_string()))?;
        let outputs = session.run(inputs)?;

        let (shape, data) = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()?;
        if shape.len() != 5 {
            return Err(ModelError::InvalidOutput(format!(
                "expected a 5D output from '{}', got shape {:?}",
                self.output_name, shape
            )));
        }
        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        let volume = ndarray::ArrayViewD::from_shape(dims, data)?
            .into_dimensionality::<Ix5>()?
            .to_owned();

        debug!("Output shape {:?}", volume.shape());
        Ok(volume)
    }

    fn name(&self) -> &str {
        self.variant.name()
    }
}
