//! Projection of 3D volumes onto 2D slices for display, and the inverse mapping from
//! slice pixels back to voxels.
//!
//! All volumes of a subject (intensities, active mask, other labels) are sliced with the
//! same convention, so that slices taken at the same plane and index overlay pixel for pixel.
//! The first index into a projected slice is the `x` coordinate of a click, the second one
//! the `y` coordinate. [`project`] and [`voxel_for_click`] must be changed together.

use ndarray::{s, Array2, ArrayView3, Axis};

use std::convert::TryFrom;
use std::fmt;

use crate::error::{BrainPaintError, Result};

/// The viewing plane, identified by the volume axis that is held fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    /// Slices along axis 0, returned unmodified.
    Axial,
    /// Slices along axis 1, transposed and mirrored along both slice axes.
    Coronal,
    /// Slices along axis 2, transposed and mirrored along the second slice axis.
    Sagittal,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::Axial, Plane::Coronal, Plane::Sagittal];

    /// The volume axis held fixed by this plane.
    pub fn axis(self) -> usize {
        match self {
            Plane::Axial => 0,
            Plane::Coronal => 1,
            Plane::Sagittal => 2,
        }
    }

    /// Number of slices in this plane for a volume of the given shape.
    pub fn num_slices(self, shape: [usize; 3]) -> usize {
        shape[self.axis()]
    }

    /// The shape of a projected slice for a volume of the given shape.
    pub fn slice_shape(self, shape: [usize; 3]) -> [usize; 2] {
        let [d1, d2, d3] = shape;
        match self {
            Plane::Axial => [d2, d3],
            Plane::Coronal => [d3, d1],
            Plane::Sagittal => [d2, d1],
        }
    }
}

impl TryFrom<usize> for Plane {
    type Error = BrainPaintError;

    fn try_from(axis: usize) -> Result<Plane> {
        match axis {
            0 => Ok(Plane::Axial),
            1 => Ok(Plane::Coronal),
            2 => Ok(Plane::Sagittal),
            _ => Err(BrainPaintError::UnknownAxis(axis)),
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Plane::Axial => "axial",
            Plane::Coronal => "coronal",
            Plane::Sagittal => "sagittal",
        };
        write!(f, "{} plane (axis {})", name, self.axis())
    }
}


fn check_slice_index(plane: Plane, index: usize, shape: [usize; 3]) -> Result<()> {
    let len = plane.num_slices(shape);
    if index >= len {
        return Err(BrainPaintError::SliceOutOfBounds(plane.axis(), index, len));
    }
    Ok(())
}


/// Extract the 2D slice at `index` of the given plane from a 3D volume.
///
/// # Examples
///
/// ```
/// use brainpaint::{project, Plane};
/// let vol = ndarray::Array3::<i32>::zeros((4, 5, 6));
/// let slice = project(vol.view(), Plane::Coronal, 2).unwrap();
/// assert_eq!(slice.dim(), (6, 4));
/// ```
pub fn project<A: Clone>(volume: ArrayView3<'_, A>, plane: Plane, index: usize) -> Result<Array2<A>> {
    let (d1, d2, d3) = volume.dim();
    check_slice_index(plane, index, [d1, d2, d3])?;

    let plane_view = volume.index_axis(Axis(plane.axis()), index);
    let projected = match plane {
        Plane::Axial => plane_view.to_owned(),
        Plane::Coronal => plane_view.t().slice(s![..;-1, ..;-1]).to_owned(),
        Plane::Sagittal => plane_view.t().slice(s![.., ..;-1]).to_owned(),
    };
    Ok(projected)
}


/// Find the voxel displayed at pixel (`click_x`, `click_y`) of the slice at `slice_index` in the given plane.
///
/// This is the inverse of [`project`]: for every pixel of a projected slice, the returned voxel holds the
/// value displayed at that pixel.
pub fn voxel_for_click(plane: Plane, slice_index: usize, click_x: usize, click_y: usize, shape: [usize; 3]) -> Result<[usize; 3]> {
    check_slice_index(plane, slice_index, shape)?;

    let [rows, cols] = plane.slice_shape(shape);
    if click_x >= rows || click_y >= cols {
        return Err(BrainPaintError::ClickOutOfBounds(click_x, click_y));
    }

    let [d1, _, d3] = shape;
    let voxel = match plane {
        Plane::Axial => [slice_index, click_x, click_y],
        Plane::Coronal => [d1 - click_y - 1, slice_index, d3 - click_x - 1],
        Plane::Sagittal => [d1 - click_y - 1, click_x, slice_index],
    };
    Ok(voxel)
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{array, Array3};

    fn numbered_volume(shape: (usize, usize, usize)) -> Array3<usize> {
        let mut vol = Array3::zeros(shape);
        for (idx, v) in vol.iter_mut().enumerate() {
            *v = idx;
        }
        vol
    }

    #[test]
    fn planes_are_created_from_axis_numbers() {
        assert_eq!(Plane::Axial, Plane::try_from(0).unwrap());
        assert_eq!(Plane::Coronal, Plane::try_from(1).unwrap());
        assert_eq!(Plane::Sagittal, Plane::try_from(2).unwrap());
        assert!(matches!(Plane::try_from(3), Err(BrainPaintError::UnknownAxis(3))));
    }

    #[test]
    fn axial_slices_are_returned_unmodified() {
        let vol = numbered_volume((2, 2, 3));
        let slice = project(vol.view(), Plane::Axial, 1).unwrap();
        assert_eq!(slice, array![[6, 7, 8], [9, 10, 11]]);
    }

    #[test]
    fn coronal_slices_are_transposed_and_mirrored() {
        let vol = numbered_volume((2, 2, 3));
        // vol[:, 0] is [[0, 1, 2], [6, 7, 8]].
        let slice = project(vol.view(), Plane::Coronal, 0).unwrap();
        assert_eq!(slice, array![[8, 2], [7, 1], [6, 0]]);
    }

    #[test]
    fn sagittal_slices_are_transposed_and_mirrored_horizontally() {
        let vol = numbered_volume((2, 2, 3));
        // vol[:, :, 0] is [[0, 3], [6, 9]].
        let slice = project(vol.view(), Plane::Sagittal, 0).unwrap();
        assert_eq!(slice, array![[6, 0], [9, 3]]);
    }

    #[test]
    fn slice_shapes_match_projections() {
        let vol = numbered_volume((3, 4, 5));
        for plane in Plane::ALL.iter() {
            let slice = project(vol.view(), *plane, 0).unwrap();
            let [rows, cols] = plane.slice_shape([3, 4, 5]);
            assert_eq!((rows, cols), slice.dim());
        }
    }

    #[test]
    fn out_of_range_slices_are_rejected() {
        let vol = numbered_volume((2, 3, 4));
        let res = project(vol.view(), Plane::Sagittal, 4);
        assert!(matches!(res, Err(BrainPaintError::SliceOutOfBounds(2, 4, 4))));
        assert!(project(vol.view(), Plane::Sagittal, 3).is_ok());
    }

    #[test]
    fn clicks_map_back_to_the_projected_voxel_in_every_plane() {
        let shape = [3, 4, 5];
        let vol = numbered_volume((3, 4, 5));
        for plane in Plane::ALL.iter() {
            for index in 0..plane.num_slices(shape) {
                let slice = project(vol.view(), *plane, index).unwrap();
                for ((x, y), value) in slice.indexed_iter() {
                    let voxel = voxel_for_click(*plane, index, x, y, shape).unwrap();
                    assert_eq!(*value, vol[voxel], "{} slice {} pixel ({}, {})", plane, index, x, y);
                }
            }
        }
    }

    #[test]
    fn clicks_outside_the_slice_are_rejected() {
        let shape = [3, 4, 5];
        assert!(matches!(voxel_for_click(Plane::Coronal, 0, 5, 0, shape), Err(BrainPaintError::ClickOutOfBounds(5, 0))));
        assert!(matches!(voxel_for_click(Plane::Coronal, 0, 0, 3, shape), Err(BrainPaintError::ClickOutOfBounds(0, 3))));
        assert!(voxel_for_click(Plane::Coronal, 0, 4, 2, shape).is_ok());
        assert!(matches!(voxel_for_click(Plane::Axial, 3, 0, 0, shape), Err(BrainPaintError::SliceOutOfBounds(0, 3, 3))));
    }
}
