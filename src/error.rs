use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum BrainPaintError {
        /// A label volume does not have the shape of the intensity volume it belongs to.
        InvalidVolumeShape(expected: [usize; 3], found: Vec<usize>) {
            display("Invalid volume shape: expected {:?}, found {:?}", expected, found)
        }

        /// Slicing axis outside of 0, 1, 2.
        UnknownAxis(axis: usize) {
            display("Unknown axis {}, must be 0, 1 or 2", axis)
        }

        SliceOutOfBounds(axis: usize, index: usize, len: usize) {
            display("Slice index {} out of bounds for axis {} of length {}", index, axis, len)
        }

        /// A click position that maps to no voxel of the volume.
        ClickOutOfBounds(x: usize, y: usize) {
            display("Click at ({}, {}) is outside of the volume", x, y)
        }

        /// Invalid MGH file: wrong format version.
        InvalidFsMghFormat {
            display("Invalid MGH file")
        }

        UnsupportedMghDataType(dtype: i32) {
            display("Unsupported MGH data type {}", dtype)
        }

        /// Segmenter output that cannot be turned into a label volume.
        InvalidSegmentation(reason: String) {
            display("Invalid segmentation: {}", reason)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, BrainPaintError>;
