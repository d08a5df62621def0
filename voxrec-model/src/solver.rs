//! Single-shot inference wrapper around a [`VoxelPredictor`].

use crate::{ModelError, VoxelPredictor};
use ndarray::{Array5, Axis, s};
use tracing::info;
use voxrec_capture::ImageBatch;
use voxrec_data::ProbabilityGrid;

/// Index of the "occupied" class on the output class axis.
pub const OCCUPIED_CHANNEL: usize = 1;

/// Number of classes the network predicts per voxel (empty, occupied).
const NUM_CLASSES: usize = 2;

/// Runs a predictor on prepared batches and validates what comes back.
#[derive(Debug)]
pub struct Solver<P> {
    net: P,
    batch_size: usize,
}

impl<P: VoxelPredictor> Solver<P> {
    /// Wrap a network. The batch size defaults to 1, one object per run.
    pub fn new(net: P) -> Self {
        Self { net, batch_size: 1 }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn net(&self) -> &P {
        &self.net
    }

    /// Run one forward pass over every view in the batch.
    #[tracing::instrument(skip_all, fields(net = self.net.name(), views = batch.num_views()))]
    pub fn test_output(&self, batch: &ImageBatch) -> Result<Prediction, ModelError> {
        if batch.batch_size() != self.batch_size {
            return Err(ModelError::InvalidInput(format!(
                "batch axis has length {}, solver expects {}",
                batch.batch_size(),
                self.batch_size
            )));
        }

        let volume = self.net.predict(batch.view())?;
        let prediction = Prediction::new(volume)?;
        if prediction.batch_size() != self.batch_size {
            return Err(ModelError::InvalidOutput(format!(
                "network returned {} objects for a batch of {}",
                prediction.batch_size(),
                self.batch_size
            )));
        }

        info!("Predicted voxel grid {:?}", prediction.grid_dims());
        Ok(prediction)
    }
}

/// Raw network output laid out as `(batch, d0, classes, d1, d2)`.
#[derive(Debug, Clone)]
pub struct Prediction {
    volume: Array5<f32>,
}

impl Prediction {
    /// Validate the `(batch, n_vox, 2, n_vox, n_vox)` layout and wrap the volume.
    pub fn new(volume: Array5<f32>) -> Result<Self, ModelError> {
        let shape = volume.shape();
        if shape[2] != NUM_CLASSES {
            return Err(ModelError::InvalidOutput(format!(
                "expected {} classes on axis 2, got shape {:?}",
                NUM_CLASSES, shape
            )));
        }
        if shape[1] != shape[3] || shape[3] != shape[4] {
            return Err(ModelError::InvalidOutput(format!(
                "voxel grid is not cubic: shape {:?}",
                shape
            )));
        }
        if shape.iter().any(|&d| d == 0) {
            return Err(ModelError::InvalidOutput(format!(
                "empty output volume {:?}",
                shape
            )));
        }
        Ok(Self { volume })
    }

    pub fn batch_size(&self) -> usize {
        self.volume.len_of(Axis(0))
    }

    /// Voxel grid dimensions `[d0, d1, d2]`.
    pub fn grid_dims(&self) -> [usize; 3] {
        let shape = self.volume.shape();
        [shape[1], shape[3], shape[4]]
    }

    pub fn volume(&self) -> &Array5<f32> {
        &self.volume
    }

    /// Occupancy probabilities of one object, `volume[b, :, OCCUPIED_CHANNEL, :, :]`.
    pub fn occupancy_probabilities(&self, batch_index: usize) -> Result<ProbabilityGrid, ModelError> {
        if batch_index >= self.batch_size() {
            return Err(ModelError::InvalidInput(format!(
                "batch index {} out of range for {} objects",
                batch_index,
                self.batch_size()
            )));
        }
        let slice = self.volume.slice(s![batch_index, .., OCCUPIED_CHANNEL, .., ..]);
        Ok(ProbabilityGrid::from_view(slice))
    }
}
