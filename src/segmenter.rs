//! Automatic segmentation and skull stripping, used to pre-populate labels before manual editing.
//!
//! The models themselves (e.g. a trained segmentation network) live outside this crate and are
//! plugged in through the [`AutoSegmenter`] trait.

use ndarray::{Array3, Array4, Axis};

use crate::error::{BrainPaintError, Result};
use crate::volume::{LabelVolume, Volume};

/// The output of an automatic segmentation.
#[derive(Debug, Clone, PartialEq)]
pub enum Segmentation {
    /// One label code per voxel.
    Labels(LabelVolume),
    /// Per-class probabilities, with the class index on axis 0. Class `k` is label code `k`.
    Probabilities(Array4<f32>),
}

impl Segmentation {

    /// Turn the segmentation into a label volume, assigning each voxel its most probable class.
    ///
    /// Ties go to the lower class index, NaN probabilities never win.
    pub fn into_label_volume(self) -> Result<LabelVolume> {
        match self {
            Segmentation::Labels(labels) => Ok(labels),
            Segmentation::Probabilities(prob) => {
                if prob.len_of(Axis(0)) == 0 {
                    return Err(BrainPaintError::InvalidSegmentation(String::from("probability map without classes")));
                }
                let (_, d1, d2, d3) = prob.dim();
                let mut labels = Array3::zeros((d1, d2, d3));
                let mut best = Array3::from_elem((d1, d2, d3), f32::NEG_INFINITY);
                for (class, class_prob) in prob.axis_iter(Axis(0)).enumerate() {
                    ndarray::azip!((l in &mut labels, b in &mut best, &p in &class_prob) {
                        if p > *b {
                            *b = p;
                            *l = class as i32;
                        }
                    });
                }
                Ok(labels)
            }
        }
    }

    /// The 3D shape of the segmented volume.
    pub fn shape(&self) -> [usize; 3] {
        match self {
            Segmentation::Labels(labels) => {
                let (d1, d2, d3) = labels.dim();
                [d1, d2, d3]
            }
            Segmentation::Probabilities(prob) => {
                let (_, d1, d2, d3) = prob.dim();
                [d1, d2, d3]
            }
        }
    }
}


/// A model that segments an intensity volume into labelled regions.
pub trait AutoSegmenter {
    fn infer(&mut self, volume: &Volume) -> Result<Segmentation>;
}


/// Binary brain mask from a brain probability map: `1` where the probability exceeds `threshold`.
pub fn brain_mask(probabilities: &Array3<f32>, threshold: f32) -> Array3<u8> {
    probabilities.mapv(|p| if p > threshold { 1 } else { 0 })
}
