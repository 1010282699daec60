//! Functions for managing FreeSurfer brain volumes in binary 'MGH' files.
//!
//! MGZ files are MGH files with GZip compression, they are detected by their file extension.

use byteordered::ByteOrdered;
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{s, Array, Array3, Array4, ShapeBuilder};

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{BrainPaintError, Result};
use crate::util::is_gz_file;

pub const MGH_VERSION: i32 = 1;

pub const MGH_DATATYPE_NAMES : [&str; 4] = ["MRI_UCHAR", "MRI_INT", "MRI_FLOAT", "MRI_SHORT"];
pub const MGH_DATATYPE_CODES : [i32; 4] = [0, 1, 3, 4];
pub const MGH_DATA_START : usize = 284; // The index in bytes where the data part starts in an MGH file.

const MRI_UCHAR: i32 = 0;
const MRI_INT: i32 = 1;
const MRI_FLOAT: i32 = 3;
const MRI_SHORT: i32 = 4;

const MGH_HEADER_FIXED_SIZE: usize = 7 * 4 + 2;
const MGH_HEADER_RAS_SIZE: usize = 15 * 4;

// Upper bound for the up-front allocation, the header dimensions are not trusted.
const MAX_PREALLOCATED_VALUES: usize = 1 << 24;

/// Models the header of a FreeSurfer MGH file containing a brain volume.
#[derive(Debug, Clone, PartialEq)]
pub struct FsMghHeader {
    pub mgh_format_version: i32,
    pub dim1len: i32,
    pub dim2len: i32,
    pub dim3len: i32,
    pub dim4len: i32,  // aka "num_frames"
    pub dtype: i32,
    pub dof: i32,
    pub is_ras_good: i16,
    pub delta: [f32; 3],
    pub mdc_raw: [f32; 9],
    pub p_xyz_c: [f32; 3],
}


/// The voxel data of an MGH file, in the data type stored in the file.
#[derive(Debug, Clone, PartialEq)]
pub enum FsMghData {
    MriUchar(Array4<u8>),
    MriInt(Array4<i32>),
    MriFloat(Array4<f32>),
    MriShort(Array4<i16>),
}


/// Models a FreeSurfer MGH file.
#[derive(Debug, Clone, PartialEq)]
pub struct FsMgh {
    pub header: FsMghHeader,
    pub data: FsMghData,
}


impl Default for FsMghHeader {
    fn default() -> FsMghHeader {
        FsMghHeader {
            mgh_format_version: MGH_VERSION,
            dim1len: 0,
            dim2len: 0,
            dim3len: 0,
            dim4len: 0,
            dtype: MRI_INT,
            dof: 0,
            is_ras_good: 0,
            delta: [0.; 3],
            mdc_raw: [0.; 9],
            p_xyz_c: [0.; 3],
        }
    }
}

/// The header of an MGH/MGZ file.
impl FsMghHeader {

    /// Read an MGH header from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FsMghHeader> {
        let gz = is_gz_file(&path);
        let mut file = BufReader::new(File::open(path)?);
        if gz {
            FsMghHeader::from_reader(&mut GzDecoder::new(file))
        } else {
            FsMghHeader::from_reader(&mut file)
        }
    }


    /// Read an MGH header from the given byte stream.
    /// It is assumed that the input is currently at the start of the
    /// header. The input is left at the end of the RAS part, not at the start of the data.
    pub fn from_reader<S>(input: &mut S) -> Result<FsMghHeader>
    where
        S: Read,
    {
        let mut hdr = FsMghHeader::default();

        let mut input = ByteOrdered::be(input);

        hdr.mgh_format_version = input.read_i32()?;

        if hdr.mgh_format_version != MGH_VERSION {
            return Err(BrainPaintError::InvalidFsMghFormat);
        }

        hdr.dim1len = input.read_i32()?;
        hdr.dim2len = input.read_i32()?;
        hdr.dim3len = input.read_i32()?;
        hdr.dim4len = input.read_i32()?;

        hdr.dtype = input.read_i32()?;
        hdr.dof = input.read_i32()?;

        hdr.is_ras_good = input.read_i16()?;

        if hdr.is_ras_good == 1 {
            for idx in 0..3 { hdr.delta[idx] = input.read_f32()?; }
            for idx in 0..9 { hdr.mdc_raw[idx] = input.read_f32()?; }
            for idx in 0..3 { hdr.p_xyz_c[idx] = input.read_f32()?; }
        }

        if hdr.dim1len < 0 || hdr.dim2len < 0 || hdr.dim3len < 0 || hdr.dim4len < 1 {
            return Err(BrainPaintError::InvalidFsMghFormat);
        }
        Ok(hdr)
    }

    /// The number of bytes [`FsMghHeader::from_reader`] consumes for this header.
    fn encoded_len(&self) -> usize {
        if self.is_ras_good == 1 {
            MGH_HEADER_FIXED_SIZE + MGH_HEADER_RAS_SIZE
        } else {
            MGH_HEADER_FIXED_SIZE
        }
    }

    /// The 4D shape of the volume, the 4th dimension is the frame.
    pub fn dim(&self) -> (usize, usize, usize, usize) {
        (self.dim1len as usize, self.dim2len as usize, self.dim3len as usize, self.dim4len as usize)
    }

    /// Get the name of the data type, e.g. `MRI_FLOAT`.
    pub fn dtype_name(&self) -> Option<&'static str> {
        MGH_DATATYPE_CODES.iter().position(|c| *c == self.dtype).map(|idx| MGH_DATATYPE_NAMES[idx])
    }

    /// Write the header, padded with zeros up to the start of the data.
    pub fn to_writer<W>(&self, output: &mut W) -> Result<()>
    where
        W: Write,
    {
        let mut output = ByteOrdered::be(output);
        output.write_i32(self.mgh_format_version)?;
        output.write_i32(self.dim1len)?;
        output.write_i32(self.dim2len)?;
        output.write_i32(self.dim3len)?;
        output.write_i32(self.dim4len)?;
        output.write_i32(self.dtype)?;
        output.write_i32(self.dof)?;
        output.write_i16(self.is_ras_good)?;
        for v in self.delta.iter().chain(self.mdc_raw.iter()).chain(self.p_xyz_c.iter()) {
            output.write_f32(*v)?;
        }
        for _ in (MGH_HEADER_FIXED_SIZE + MGH_HEADER_RAS_SIZE)..MGH_DATA_START {
            output.write_u8(0)?;
        }
        Ok(())
    }
}


impl fmt::Display for FsMghHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MGH volume of {}x{}x{} voxels with {} frames, data type {}.", self.dim1len, self.dim2len, self.dim3len, self.dim4len, self.dtype_name().unwrap_or("unknown"))
    }
}


fn read_values<S, T, F>(input: &mut ByteOrdered<S, byteordered::Endianness>, dim: (usize, usize, usize, usize), mut read_one: F) -> Result<Array4<T>>
where
    S: Read,
    F: FnMut(&mut ByteOrdered<S, byteordered::Endianness>) -> io::Result<T>,
{
    let (d1, d2, d3, d4) = dim;
    let num_values = d1
        .checked_mul(d2)
        .and_then(|n| n.checked_mul(d3))
        .and_then(|n| n.checked_mul(d4))
        .ok_or(BrainPaintError::InvalidFsMghFormat)?;
    let mut values: Vec<T> = Vec::with_capacity(num_values.min(MAX_PREALLOCATED_VALUES));
    for _ in 0..num_values {
        values.push(read_one(input)?);
    }
    // MGH data is stored in column-major order.
    let data = Array::from_shape_vec(dim.f(), values)
        .map_err(|_| BrainPaintError::InvalidFsMghFormat)?;
    Ok(data)
}


impl FsMghData {

    /// Read the data part described by `hdr` from a byte stream positioned at the start of the data.
    pub fn from_reader<S>(input: S, hdr: &FsMghHeader) -> Result<FsMghData>
    where
        S: Read,
    {
        let mut input = ByteOrdered::runtime(input, byteordered::Endianness::Big);
        let dim = hdr.dim();
        let data = match hdr.dtype {
            MRI_UCHAR => FsMghData::MriUchar(read_values(&mut input, dim, |i| i.read_u8())?),
            MRI_INT => FsMghData::MriInt(read_values(&mut input, dim, |i| i.read_i32())?),
            MRI_FLOAT => FsMghData::MriFloat(read_values(&mut input, dim, |i| i.read_f32())?),
            MRI_SHORT => FsMghData::MriShort(read_values(&mut input, dim, |i| i.read_i16())?),
            other => return Err(BrainPaintError::UnsupportedMghDataType(other)),
        };
        Ok(data)
    }

    /// The 4D shape of the data.
    pub fn dim(&self) -> (usize, usize, usize, usize) {
        match self {
            FsMghData::MriUchar(d) => d.dim(),
            FsMghData::MriInt(d) => d.dim(),
            FsMghData::MriFloat(d) => d.dim(),
            FsMghData::MriShort(d) => d.dim(),
        }
    }

    /// Get one frame of the data as float values.
    ///
    /// # Panics
    ///
    /// If the frame does not exist.
    pub fn frame_f32(&self, frame: usize) -> Array3<f32> {
        match self {
            FsMghData::MriUchar(d) => d.slice(s![.., .., .., frame]).mapv(f32::from),
            FsMghData::MriInt(d) => d.slice(s![.., .., .., frame]).mapv(|v| v as f32),
            FsMghData::MriFloat(d) => d.slice(s![.., .., .., frame]).to_owned(),
            FsMghData::MriShort(d) => d.slice(s![.., .., .., frame]).mapv(f32::from),
        }
    }

    /// Get one frame of the data as integer values. Float data is rounded to the nearest integer.
    ///
    /// # Panics
    ///
    /// If the frame does not exist.
    pub fn frame_i32(&self, frame: usize) -> Array3<i32> {
        match self {
            FsMghData::MriUchar(d) => d.slice(s![.., .., .., frame]).mapv(i32::from),
            FsMghData::MriInt(d) => d.slice(s![.., .., .., frame]).to_owned(),
            FsMghData::MriFloat(d) => d.slice(s![.., .., .., frame]).mapv(|v| v.round() as i32),
            FsMghData::MriShort(d) => d.slice(s![.., .., .., frame]).mapv(i32::from),
        }
    }

    fn to_writer<W>(&self, output: &mut W) -> Result<()>
    where
        W: Write,
    {
        let mut output = ByteOrdered::be(output);
        // Column-major order: iterate over the reversed axes of the array.
        match self {
            FsMghData::MriUchar(d) => for v in d.t().iter() { output.write_u8(*v)?; },
            FsMghData::MriInt(d) => for v in d.t().iter() { output.write_i32(*v)?; },
            FsMghData::MriFloat(d) => for v in d.t().iter() { output.write_f32(*v)?; },
            FsMghData::MriShort(d) => for v in d.t().iter() { output.write_i16(*v)?; },
        }
        Ok(())
    }
}


impl FsMgh {

    /// Read an MGH or MGZ file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FsMgh> {
        let gz = is_gz_file(&path);
        let file = BufReader::new(File::open(path)?);
        if gz {
            FsMgh::from_reader(GzDecoder::new(file))
        } else {
            FsMgh::from_reader(file)
        }
    }

    /// Read an MGH volume from a byte stream positioned at the start of the header.
    pub fn from_reader<S>(mut input: S) -> Result<FsMgh>
    where
        S: Read,
    {
        let header = FsMghHeader::from_reader(&mut input)?;

        // Skip to the data by reading, GZip streams cannot seek.
        let padding = (MGH_DATA_START - header.encoded_len()) as u64;
        let skipped = io::copy(&mut (&mut input).take(padding), &mut io::sink())?;
        if skipped != padding {
            return Err(BrainPaintError::InvalidFsMghFormat);
        }

        let data = FsMghData::from_reader(input, &header)?;
        Ok(FsMgh { header, data })
    }

    /// Create a single frame MRI_INT volume from a 3D integer volume, e.g. a label map.
    ///
    /// The geometry (voxel sizes, orientation and center) is copied from `template` if given.
    pub fn from_i32_volume(volume: &Array3<i32>, template: Option<&FsMghHeader>) -> FsMgh {
        let (d1, d2, d3) = volume.dim();
        let mut header = match template {
            Some(t) => t.clone(),
            None => FsMghHeader::default(),
        };
        header.mgh_format_version = MGH_VERSION;
        header.dim1len = d1 as i32;
        header.dim2len = d2 as i32;
        header.dim3len = d3 as i32;
        header.dim4len = 1;
        header.dtype = MRI_INT;

        let data = volume.view().insert_axis(ndarray::Axis(3)).to_owned();
        FsMgh { header, data: FsMghData::MriInt(data) }
    }

    /// Write the volume in MGH format to the given stream.
    pub fn to_writer<W>(&self, output: &mut W) -> Result<()>
    where
        W: Write,
    {
        self.header.to_writer(output)?;
        self.data.to_writer(output)
    }

    /// Write the volume to an MGH file, or a GZip compressed MGZ file if the path ends with ".mgz" or ".gz".
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let gz = is_gz_file(&path);
        let file = BufWriter::new(File::create(path)?);
        if gz {
            let mut encoder = GzEncoder::new(file, Compression::default());
            self.to_writer(&mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            let mut file = file;
            self.to_writer(&mut file)?;
            file.flush()?;
        }
        Ok(())
    }
}


impl fmt::Display for FsMgh {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.header)
    }
}


/// Read an MGH or MGZ file.
///
/// # Examples
///
/// ```no_run
/// let mgh = brainpaint::read_mgh("/path/to/subjects_dir/subject1/mri/brain.mgz").unwrap();
/// println!("{}", mgh.header);
/// ```
pub fn read_mgh<P: AsRef<Path>>(path: P) -> Result<FsMgh> {
    FsMgh::from_file(path)
}


/// Write a 3D integer volume to an MGH or MGZ file.
pub fn write_mgh<P: AsRef<Path>>(path: P, volume: &Array3<i32>, template: Option<&FsMghHeader>) -> Result<()> {
    FsMgh::from_i32_volume(volume, template).to_file(path)
}
