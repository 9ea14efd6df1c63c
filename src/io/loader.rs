//! Decodes named dataset files into numeric arrays by extension
//!
//! `.npy` arrays keep their shape, TIFF files are read page by page into a
//! stack and PNG images become 16-bit grayscale planes. Every element is
//! widened to `f64`.

use crate::io::error::{DatasetError, Result, file_system, invalid_array_data};
use log::debug;
use ndarray::{ArrayD, IxDyn};
use ndarray_npy::{ReadNpyError, ReadableElement};
use num_traits::AsPrimitive;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};

/// File formats the loader knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayFormat {
    /// `NumPy` `.npy` array
    Npy,
    /// Single or multi-page TIFF
    Tiff,
    /// PNG image
    Png,
}

impl ArrayFormat {
    /// Format implied by a path's extension, compared case-insensitively
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "npy" => Some(Self::Npy),
            "tif" | "tiff" => Some(Self::Tiff),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Load every recognized file of a name to path mapping
///
/// Paths with an unrecognized extension produce no entry, so callers must
/// verify that every expected name is present in the result.
///
/// # Errors
///
/// Returns an error if a recognized file can't be read or decoded
pub fn load_data<I, K, P>(paths: I) -> Result<BTreeMap<String, ArrayD<f64>>>
where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: AsRef<Path>,
{
    let mut output = BTreeMap::new();
    for (name, path) in paths {
        let path = path.as_ref();
        let Some(format) = ArrayFormat::from_path(path) else {
            debug!("Skipping {} (unrecognized extension)", path.display());
            continue;
        };
        output.insert(name.into(), load_array(path, format)?);
    }
    Ok(output)
}

/// Decode one file in the given format
///
/// # Errors
///
/// Returns an error if the file can't be read or its contents can't be
/// represented as an `f64` array
pub fn load_array(path: &Path, format: ArrayFormat) -> Result<ArrayD<f64>> {
    match format {
        ArrayFormat::Npy => load_npy(path),
        ArrayFormat::Tiff => load_tiff(path),
        ArrayFormat::Png => load_png(path),
    }
}

/// Read a `.npy` file of any integer, float or boolean element type
///
/// Booleans load as 0.0 and 1.0.
///
/// # Errors
///
/// Returns an error if the file can't be read or holds an unsupported dtype
pub fn load_npy(path: &Path) -> Result<ArrayD<f64>> {
    // Each reader rejects a mismatching descriptor before touching the data
    let readers: [fn(&Path) -> std::result::Result<ArrayD<f64>, ReadNpyError>; 11] = [
        read_npy_as::<f64>,
        read_npy_as::<f32>,
        read_npy_as::<i64>,
        read_npy_as::<i32>,
        read_npy_as::<i16>,
        read_npy_as::<u64>,
        read_npy_as::<u32>,
        read_npy_as::<u16>,
        read_npy_as::<i8>,
        read_npy_as::<u8>,
        read_bool_npy,
    ];

    for reader in readers {
        match reader(path) {
            Ok(array) => return Ok(array),
            Err(ReadNpyError::WrongDescriptor(_)) => {}
            Err(source) => {
                return Err(DatasetError::NpyRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    Err(invalid_array_data(path, &"unsupported npy element type"))
}

fn read_npy_as<T>(path: &Path) -> std::result::Result<ArrayD<f64>, ReadNpyError>
where
    T: ReadableElement + AsPrimitive<f64>,
{
    let array: ArrayD<T> = ndarray_npy::read_npy(path)?;
    Ok(array.mapv(|value| value.as_()))
}

fn read_bool_npy(path: &Path) -> std::result::Result<ArrayD<f64>, ReadNpyError> {
    let array: ArrayD<bool> = ndarray_npy::read_npy(path)?;
    Ok(array.mapv(f64::from))
}

/// Read every page of a TIFF file
///
/// A single page yields `(h, w)` or `(h, w, samples)`; several pages add a
/// leading z axis.
///
/// # Errors
///
/// Returns an error if decoding fails or pages differ in shape
pub fn load_tiff(path: &Path) -> Result<ArrayD<f64>> {
    let tiff_error = |source: tiff::TiffError| DatasetError::TiffDecode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(file_system(path, "open TIFF"))?;
    let mut decoder = Decoder::new(BufReader::new(file))
        .map_err(tiff_error)?
        .with_limits(Limits::unlimited());

    let mut page_shape: Option<Vec<usize>> = None;
    let mut pages = 0usize;
    let mut data = Vec::new();

    loop {
        let (width, height) = decoder.dimensions().map_err(tiff_error)?;
        let samples = decoding_result_to_f64(decoder.read_image().map_err(tiff_error)?);

        let pixels = width as usize * height as usize;
        if pixels == 0 || samples.len() % pixels != 0 {
            return Err(invalid_array_data(
                path,
                &format!(
                    "page {pages} holds {} samples for {width}x{height} pixels",
                    samples.len()
                ),
            ));
        }
        let channels = samples.len() / pixels;
        let shape = if channels == 1 {
            vec![height as usize, width as usize]
        } else {
            vec![height as usize, width as usize, channels]
        };

        if let Some(expected) = &page_shape {
            if *expected != shape {
                return Err(invalid_array_data(
                    path,
                    &format!("page {pages} has shape {shape:?}, expected {expected:?}"),
                ));
            }
        } else {
            page_shape = Some(shape);
        }

        data.extend(samples);
        pages += 1;

        if !decoder.more_images() {
            break;
        }
        decoder.next_image().map_err(tiff_error)?;
    }

    let mut shape = page_shape.unwrap_or_default();
    if pages > 1 {
        shape.insert(0, pages);
    }

    ArrayD::from_shape_vec(IxDyn(&shape), data)
        .map_err(|e| invalid_array_data(path, &e.to_string()))
}

fn decoding_result_to_f64(result: DecodingResult) -> Vec<f64> {
    match result {
        DecodingResult::U8(buffer) => widen(buffer),
        DecodingResult::U16(buffer) => widen(buffer),
        DecodingResult::U32(buffer) => widen(buffer),
        DecodingResult::U64(buffer) => widen(buffer),
        DecodingResult::I8(buffer) => widen(buffer),
        DecodingResult::I16(buffer) => widen(buffer),
        DecodingResult::I32(buffer) => widen(buffer),
        DecodingResult::I64(buffer) => widen(buffer),
        DecodingResult::F32(buffer) => widen(buffer),
        DecodingResult::F64(buffer) => buffer,
    }
}

// 64-bit integers above 2^53 lose precision
fn widen<T: AsPrimitive<f64>>(buffer: Vec<T>) -> Vec<f64> {
    buffer.into_iter().map(|value| value.as_()).collect()
}

/// Read a PNG image as a 16-bit grayscale `(h, w)` plane
///
/// # Errors
///
/// Returns an error if the image can't be decoded
pub fn load_png(path: &Path) -> Result<ArrayD<f64>> {
    let decoded = image::open(path).map_err(|e| DatasetError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    let gray = decoded.into_luma16();
    let (width, height) = gray.dimensions();
    let data: Vec<f64> = gray.into_raw().into_iter().map(f64::from).collect();

    ArrayD::from_shape_vec(IxDyn(&[height as usize, width as usize]), data)
        .map_err(|e| invalid_array_data(path, &e.to_string()))
}
