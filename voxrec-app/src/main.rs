//! Voxrec Demo
//!
//! Reconstructs a voxel grid from one or more views of an object with a
//! pretrained recurrent network, then exports it.
//!
//! Steps:
//! - Load and preprocess every image in the input directory
//! - Download pretrained weights if they are not on disk yet
//! - Run the network once over all views
//! - Threshold the occupancy volume, write an OBJ mesh and a text dump
//! - Open the mesh in an external viewer when one is installed

mod cli;
mod config;
mod demo;
mod errors;
mod viewer;

use clap::Parser;
use cli::Args;
use config::LoggingConfig;
use demo::Demo;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Console log layer shared by every subscriber setup.
fn fmt_layer<S>() -> tracing_subscriber::fmt::Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer().with_target(false)
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(fmt_layer().with_filter(filter));

    #[cfg(feature = "tracy")]
    {
        if logging.enable_tracy {
            registry.with(tracing_tracy::TracyLayer::default()).init();
            return;
        }
    }

    registry.init();
}

fn main() {
    let args = Args::parse();

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config.logging);

    let result = Demo::new(config).and_then(|demo| {
        info!(
            "Reconstructing {} with {}",
            demo.config().input_dir.display(),
            demo.variant()
        );
        demo.run()
    });

    match result {
        Ok(summary) => info!(
            "Reconstructed {:?} grid from {} views: {} occupied voxels, {} cubes -> {} and {}",
            summary.grid_dims,
            summary.views,
            summary.occupied,
            summary.cubes,
            summary.obj_path.display(),
            summary.text_path.display()
        ),
        Err(e) => {
            eprintln!("Application error: {}", e);
            std::process::exit(1);
        }
    }
}
