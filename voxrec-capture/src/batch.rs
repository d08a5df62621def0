//! Stacking preprocessed views into the network input tensor.

use crate::preprocess::to_chw;
use crate::source::{CaptureError, ViewImage, ViewSource};
use ndarray::{Array5, ArrayView5, Axis, stack};
use std::path::PathBuf;
use tracing::info;

/// Input tensor laid out as `(views, batch, channels, height, width)`.
///
/// The batch axis always has length 1: every view belongs to the same object.
#[derive(Debug, Clone)]
pub struct ImageBatch {
    tensor: Array5<f32>,
    sources: Vec<PathBuf>,
}

impl ImageBatch {
    /// Stack views that share one resolution.
    pub fn from_views(views: Vec<ViewImage>, origin: PathBuf) -> Result<Self, CaptureError> {
        let Some(first) = views.first() else {
            return Err(CaptureError::NoViews(origin));
        };
        let expected = first.dimensions();

        let mut planes = Vec::with_capacity(views.len());
        let mut sources = Vec::with_capacity(views.len());
        for view in views {
            if view.dimensions() != expected {
                return Err(CaptureError::SizeMismatch {
                    index: view.index,
                    expected,
                    actual: view.dimensions(),
                });
            }
            planes.push(to_chw(&view.image).insert_axis(Axis(0)));
            sources.push(view.path);
        }

        let plane_views: Vec<_> = planes.iter().map(|p| p.view()).collect();
        let tensor = stack(Axis(0), &plane_views)?;
        Ok(Self { tensor, sources })
    }

    /// Drain a source into a batch.
    #[tracing::instrument(skip_all, fields(origin = %source.origin().display()))]
    pub fn collect(source: &mut impl ViewSource) -> Result<Self, CaptureError> {
        let mut views = Vec::with_capacity(source.len_hint().unwrap_or(0));
        while let Some(view) = source.next_view()? {
            views.push(view);
        }
        let batch = Self::from_views(views, source.origin().to_path_buf())?;
        info!(
            "Collected {} views, tensor shape {:?}",
            batch.num_views(),
            batch.shape()
        );
        Ok(batch)
    }

    pub fn num_views(&self) -> usize {
        self.tensor.len_of(Axis(0))
    }

    /// Length of the batch axis.
    pub fn batch_size(&self) -> usize {
        self.tensor.len_of(Axis(1))
    }

    pub fn shape(&self) -> &[usize] {
        self.tensor.shape()
    }

    pub fn view(&self) -> ArrayView5<'_, f32> {
        self.tensor.view()
    }

    pub fn tensor(&self) -> &Array5<f32> {
        &self.tensor
    }

    /// Files the views were read from, in batch order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::Path;

    fn view(index: usize, size: u32, value: u8) -> ViewImage {
        ViewImage::new(
            RgbImage::from_pixel(size, size, Rgb([value, 0, 255])),
            PathBuf::from(format!("view_{index}.png")),
            index,
        )
    }

    struct FixedSource {
        views: Vec<ViewImage>,
    }

    impl ViewSource for FixedSource {
        fn next_view(&mut self) -> Result<Option<ViewImage>, CaptureError> {
            Ok(if self.views.is_empty() {
                None
            } else {
                Some(self.views.remove(0))
            })
        }

        fn len_hint(&self) -> Option<usize> {
            Some(self.views.len())
        }

        fn origin(&self) -> &Path {
            Path::new("fixed")
        }
    }

    #[test]
    fn test_batch_layout() {
        let batch = ImageBatch::from_views(
            vec![view(0, 4, 0), view(1, 4, 255)],
            PathBuf::from("in"),
        )
        .unwrap();

        assert_eq!(batch.shape(), &[2, 1, 3, 4, 4]);
        assert_eq!(batch.num_views(), 2);
        assert_eq!(batch.batch_size(), 1);
        assert_eq!(batch.tensor()[[0, 0, 0, 0, 0]], 0.0);
        assert_eq!(batch.tensor()[[1, 0, 0, 2, 3]], 1.0);
        assert_eq!(batch.tensor()[[1, 0, 2, 1, 1]], 1.0);
        assert_eq!(batch.sources()[1], PathBuf::from("view_1.png"));
    }

    #[test]
    fn test_empty_batch_is_error() {
        let result = ImageBatch::from_views(Vec::new(), PathBuf::from("input/chair1"));
        assert!(matches!(result, Err(CaptureError::NoViews(p)) if p == Path::new("input/chair1")));
    }

    #[test]
    fn test_mixed_sizes_rejected() {
        let result = ImageBatch::from_views(vec![view(0, 4, 0), view(1, 5, 0)], PathBuf::new());
        assert!(matches!(
            result,
            Err(CaptureError::SizeMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_collect_drains_source() {
        let mut source = FixedSource {
            views: vec![view(0, 3, 10), view(1, 3, 20), view(2, 3, 30)],
        };
        let batch = ImageBatch::collect(&mut source).unwrap();
        assert_eq!(batch.num_views(), 3);
        assert!(source.views.is_empty());
    }

    #[test]
    fn test_collect_empty_source() {
        let mut source = FixedSource { views: Vec::new() };
        let result = ImageBatch::collect(&mut source);
        assert!(matches!(result, Err(CaptureError::NoViews(_))));
    }
}
