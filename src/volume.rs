//! The intensity volume of a loaded subject.

use ndarray::{Array3, ArrayView3};
use ndarray_stats::QuantileExt;

use std::fmt;

/// A 3D integer label volume, `0` is unlabeled background.
pub type LabelVolume = Array3<i32>;

/// A 3D scalar intensity volume, normalized so that its maximum is `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    data: Array3<f32>,
}

impl Volume {

    /// Wrap raw intensities, dividing by the maximum so that the brightest voxel becomes `1.0`.
    ///
    /// NaN voxels are ignored when searching the maximum. If the maximum is not a positive
    /// finite number (e.g. an all-zero volume), the data is kept as is.
    pub fn from_raw(mut data: Array3<f32>) -> Volume {
        let max = *data.max_skipnan();
        if max.is_finite() && max > 0.0 {
            data.mapv_inplace(|v| v / max);
        } else {
            log::warn!("Volume maximum is {}, intensities left unnormalized.", max);
        }
        Volume { data }
    }

    pub fn shape(&self) -> [usize; 3] {
        let (d1, d2, d3) = self.data.dim();
        [d1, d2, d3]
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// Zero all voxels outside the given binary mask, e.g. to strip the skull. The result is re-normalized.
    ///
    /// # Panics
    ///
    /// If the mask does not have the shape of the volume.
    pub fn apply_mask(&self, mask: &Array3<u8>) -> Volume {
        let mut data = self.data.clone();
        ndarray::azip!((v in &mut data, &m in mask) if m == 0 { *v = 0.0 });
        Volume::from_raw(data)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [d1, d2, d3] = self.shape();
        write!(f, "Intensity volume of {}x{}x{} voxels.", d1, d2, d3)
    }
}
