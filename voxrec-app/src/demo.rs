//! The reconstruction run: views in, mesh and probability dump out.

use crate::config::DemoConfig;
use crate::errors::AppError;
use crate::viewer::{self, ViewerOutcome};
use std::path::PathBuf;
use tracing::info;
use voxrec_capture::{DirectorySource, ImageBatch};
use voxrec_data::{voxel_to_obj, write_text};
use voxrec_model::{
    CurlFetcher, Fetcher, NetworkVariant, OnnxNetwork, Solver, VoxelPredictor, WeightsLocation,
    ensure_weights,
};

/// Result of one reconstruction run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub views: usize,
    pub grid_dims: [usize; 3],
    pub occupied: usize,
    pub cubes: usize,
    pub obj_path: PathBuf,
    pub text_path: PathBuf,
}

/// A validated run configuration.
#[derive(Debug, Clone)]
pub struct Demo {
    config: DemoConfig,
    variant: NetworkVariant,
}

impl Demo {
    pub fn new(config: DemoConfig) -> Result<Self, AppError> {
        config.validate()?;
        let variant = config.variant()?;
        Ok(Self { config, variant })
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn variant(&self) -> NetworkVariant {
        self.variant
    }

    /// Configured weights location, falling back to the variant defaults.
    pub fn weights_location(&self) -> WeightsLocation {
        let defaults = self.variant.default_weights();
        WeightsLocation::new(
            self.config
                .model
                .weights_path
                .clone()
                .unwrap_or(defaults.path),
            self.config
                .model
                .weights_url
                .clone()
                .unwrap_or(defaults.url),
        )
    }

    /// Full run with the ONNX backend, curl downloads and the configured viewer.
    pub fn run(&self) -> Result<RunSummary, AppError> {
        self.run_with_fetcher(&CurlFetcher::new())
    }

    pub fn run_with_fetcher(&self, fetcher: &dyn Fetcher) -> Result<RunSummary, AppError> {
        let batch = self.load_views()?;

        let weights = ensure_weights(&self.weights_location(), fetcher)?;
        let mut net = OnnxNetwork::load(self.variant, &weights)?;
        if let Some(name) = &self.config.model.output_name {
            net = net.with_output_name(name.clone());
        }

        let summary = self.reconstruct(&batch, net)?;
        if self.config.viewer.enabled {
            if let ViewerOutcome::Exited(status) =
                viewer::open(&self.config.viewer.command, &summary.obj_path)?
            {
                info!("Viewer closed ({})", status);
            }
        }
        Ok(summary)
    }

    /// Read and preprocess the input views.
    pub fn load_views(&self) -> Result<ImageBatch, AppError> {
        let mut source =
            DirectorySource::open(&self.config.input_dir, self.config.preprocess.to_preprocess())?
                .with_limit(self.config.max_views);
        Ok(ImageBatch::collect(&mut source)?)
    }

    /// Run `net` once on `batch`, threshold the result and write both outputs.
    #[tracing::instrument(skip_all, fields(net = net.name()))]
    pub fn reconstruct<P: VoxelPredictor>(
        &self,
        batch: &ImageBatch,
        net: P,
    ) -> Result<RunSummary, AppError> {
        let solver = Solver::new(net);
        let prediction = solver.test_output(batch)?;
        let probabilities = prediction.occupancy_probabilities(0)?;

        let occupancy = probabilities.threshold(self.config.export.voxel_threshold);
        info!(
            "{} of {} voxels above threshold {}",
            occupancy.occupied_count(),
            probabilities.values().len(),
            self.config.export.voxel_threshold
        );

        let mesh = voxel_to_obj(
            &self.config.obj_path,
            &occupancy,
            &self.config.export.mesh_options(),
        )?;
        write_text(&self.config.text_path, &probabilities)?;

        Ok(RunSummary {
            views: batch.num_views(),
            grid_dims: probabilities.dims(),
            occupied: occupancy.occupied_count(),
            cubes: mesh.cube_count(),
            obj_path: self.config.obj_path.clone(),
            text_path: self.config.text_path.clone(),
        })
    }
}
