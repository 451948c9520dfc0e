//! Read and write NDArrays as Numpy arrays
//!
//! Only 2D little-endian 64-bit float matrices in C order, which is all the embedding export
//! needs.
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use ndarray::prelude::*;
use ndarray as nd;
use regex::bytes::Regex;

use crate::errors::*;

/// Write an array as a numpy array
pub fn write_matrix<S, P>(path: P, arr: &ArrayBase<S, Ix2>) -> Result<()>
    where S: nd::Data<Elem=f64>, P: AsRef<Path> {
    let dict = format!("{{'descr': '<f8', 'fortran_order': False, 'shape': ({},{})}}",
        arr.shape()[0], arr.shape()[1]);
    // magic (6) + version (2) + header length (2) + dict + spaces + '\n' lands on 16 bytes
    let preamble = 6 + 2 + 2;
    let unpadded = preamble + dict.len() + 1;
    let spaces = (16 - unpadded % 16) % 16;
    let header_len = dict.len() + spaces + 1;
    if header_len > u16::max_value() as usize {
        return Err(Error::Other(format!("numpy header too long: {} bytes", header_len)));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(b"\x93NUMPY\x01\x00")?;
    writer.write_u16::<LittleEndian>(header_len as u16)?;
    writeln!(writer, "{}{}", dict, " ".repeat(spaces))?;
    // Row by row, so views with any strides come out in C order
    for row in arr.outer_iter() {
        for &x in row.iter() {
            writer.write_f64::<LittleEndian>(x)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read a Numpy matrix into memory. Be careful if it's large. You could run out of memory.
pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let header_match = Regex::new(
        r"(?-u)^\x93NUMPY\x01\x00(?s:..)\{'descr': ?'<f8', ?'fortran_order': ?False, ?'shape': ?\((\d+), ?(\d+),?\),? *\} *\n"
    ).map_err(|err| Error::Other(err.to_string()))?;
    let mut content = vec![];
    open_existing(path.as_ref(), "numpy matrix")?.read_to_end(&mut content)?;

    let (skip, h, w) = {
        let captures = header_match.captures(&content)
            .ok_or_else(|| helpful_complaint(path.as_ref(), &content))?;
        let dim = |i: usize| -> Result<usize> {
            str::from_utf8(&captures[i]).ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| helpful_complaint(path.as_ref(), &content))
        };
        // where the full match ends, then the shape as described in the metadata
        (captures[0].len(), dim(1)?, dim(2)?)
    };
    let body = &content[skip..];
    if body.len() != h * w * 8 {
        return Err(Error::Other(format!(
            "The numpy file's array is the wrong length for a {}x{} array. \
            It should be {} elements, ({} bytes), but it is actually {} bytes.",
            h, w, h * w, h * w * 8, body.len())));
    }
    let mut values = vec![0f64; h * w];
    LittleEndian::read_f64_into(body, &mut values);
    Ok(Array2::from_shape_vec((h, w), values)?)
}

/// Tell the user more info about the file
///
/// It seems verbose but you can see this error often so it save you time.
fn helpful_complaint(p: &Path, header: &[u8]) -> Error {
    let cap = ::std::cmp::min(header.len(), 100);
    let complaint = format!(
        "Expected {} to be an uncompressed numpy (.npy) file, but couldn't \
        parse the header. The first hundred bytes look like:

        {}


        As bytes, the header is as follows:

        {:?}


        It should look something like this example, where . are non-printable characters: \
        .NUMPY..{{'descr': '<f8', 'fortran_order': False, 'shape': (34, 27)}}\
        Note: only 2D little-endian 64-bit float matrices in C order are supported (for \
        simplicity). You may need to change the dtype accordingly.",
        p.display(),
        String::from_utf8_lossy(&header[..cap]),
        &header[..cap]);
    Error::Other(complaint)
}
