//! `.tns` interchange format support
//!
//! Reading and writing packed tensors as an ASCII interchange file that
//! downstream tensor-algebra tooling consumes. The layout is a FROSTT-style
//! coordinate listing with a small self-describing header so a file round
//! trips to an equivalent tensor: same extents, same mode formats, same
//! nonzero set (entry order is not significant).
//!
//! # Format
//!
//! ```text
//! %%tns tensor coordinate real
//! % name: B
//! 3
//! 3 3 3
//! d s g
//! 4
//! 1 2 3 0.5
//! ...
//! ```
//!
//! - Header line: `%%tns tensor coordinate real`
//! - Comment lines start with `%`; a `% name:` comment carries the tensor
//!   identifier
//! - Size lines: order, then the extents, then the mode format tokens, then
//!   the nonzero count
//! - Data lines: 1-indexed coordinates followed by the value
//!
//! Writing a file is all-or-nothing: [`save_tns`] writes to a sibling
//! temporary path and atomically renames it onto the target, so a failed
//! write never leaves a partial artifact that looks complete.
//!
//! # Examples
//!
//! ```
//! use std::io::Cursor;
//! use tnsgen_core::format::parse_formats;
//! use tnsgen_core::io::{read_tns, write_tns};
//! use tnsgen_core::pack::pack;
//! use tnsgen_core::tensor::SparseTensor;
//!
//! let formats = parse_formats("s,s").unwrap();
//! let mut tensor = SparseTensor::new("A", vec![3, 3], formats).unwrap();
//! tensor.push(vec![0, 1], 2.5).unwrap();
//! tensor.push(vec![2, 0], 1.5).unwrap();
//!
//! let mut output = Vec::new();
//! write_tns(&pack(&tensor).unwrap(), &mut output).unwrap();
//!
//! let back = read_tns::<f64>(Cursor::new(output)).unwrap();
//! assert_eq!(back.name(), "A");
//! assert_eq!(back.shape(), &[3, 3]);
//! assert_eq!(back.nnz(), 2);
//! ```

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use scirs2_core::numeric::Float;
use tracing::debug;

use crate::error::{TnsError, TnsResult};
use crate::format::ModeFormat;
use crate::pack::{pack, PackedTensor};
use crate::tensor::SparseTensor;

/// File extension of the interchange artifact
pub const TNS_EXTENSION: &str = "tns";

const HEADER: &str = "%%tns tensor coordinate real";

/// Write a packed tensor to `.tns` interchange format
///
/// Stored nonzeros are emitted via [`PackedTensor::entries`]; zero-valued
/// dense padding slots are skipped.
pub fn write_tns<T: Float + std::fmt::Display>(
    packed: &PackedTensor<T>,
    writer: &mut impl Write,
) -> TnsResult<()> {
    let entries = packed.entries()?;

    writeln!(writer, "{HEADER}")?;
    writeln!(writer, "% name: {}", packed.name())?;
    writeln!(writer, "{}", packed.rank())?;

    let extents: Vec<String> = packed.shape().iter().map(|e| e.to_string()).collect();
    writeln!(writer, "{}", extents.join(" "))?;

    let tokens: Vec<&str> = packed.formats().iter().map(|f| f.token()).collect();
    writeln!(writer, "{}", tokens.join(" "))?;

    writeln!(writer, "{}", entries.len())?;
    for (coordinate, value) in &entries {
        for coord in coordinate {
            // 1-indexed on disk
            write!(writer, "{} ", coord + 1)?;
        }
        writeln!(writer, "{value}")?;
    }

    Ok(())
}

/// Read a `.tns` interchange file back into a coordinate tensor
///
/// Lossless with respect to extents, mode formats, and the nonzero set;
/// packing the result reproduces an equivalent [`PackedTensor`].
pub fn read_tns<T: Float + FromStr>(reader: impl Read) -> TnsResult<SparseTensor<T>> {
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    reader.read_line(&mut line)?;
    if line.trim() != HEADER {
        return Err(TnsError::malformed(format!(
            "invalid header line {:?}",
            line.trim()
        )));
    }

    // Skip comments, picking up the name annotation if present.
    let mut name = String::from("tensor");
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(TnsError::malformed("missing order line"));
        }
        let trimmed = line.trim();
        if let Some(comment) = trimmed.strip_prefix('%') {
            if let Some(value) = comment.trim().strip_prefix("name:") {
                name = value.trim().to_string();
            }
            continue;
        }
        break;
    }

    let order: usize = line
        .trim()
        .parse()
        .map_err(|_| TnsError::malformed(format!("invalid order line {:?}", line.trim())))?;

    line.clear();
    reader.read_line(&mut line)?;
    let shape = parse_usize_row(&line, order, "extents")?;

    line.clear();
    reader.read_line(&mut line)?;
    let formats = line
        .split_whitespace()
        .map(ModeFormat::from_token)
        .collect::<Result<Vec<_>, _>>()?;
    if formats.len() != order {
        return Err(TnsError::malformed(format!(
            "expected {} mode format tokens, got {}",
            order,
            formats.len()
        )));
    }

    line.clear();
    reader.read_line(&mut line)?;
    let nnz: usize = line
        .trim()
        .parse()
        .map_err(|_| TnsError::malformed(format!("invalid nonzero count {:?}", line.trim())))?;

    let mut indices = Vec::with_capacity(nnz);
    let mut values = Vec::with_capacity(nnz);
    for _ in 0..nnz {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(TnsError::malformed("truncated data section"));
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != order + 1 {
            return Err(TnsError::malformed(format!(
                "expected {} fields per data line, got {}",
                order + 1,
                fields.len()
            )));
        }

        let mut coordinate = Vec::with_capacity(order);
        for field in &fields[..order] {
            let coord: usize = field
                .parse()
                .map_err(|_| TnsError::malformed(format!("invalid coordinate {field:?}")))?;
            if coord == 0 {
                return Err(TnsError::malformed("coordinates are 1-indexed on disk"));
            }
            coordinate.push(coord - 1);
        }

        let value = fields[order]
            .parse::<T>()
            .map_err(|_| TnsError::malformed(format!("invalid value {:?}", fields[order])))?;

        indices.push(coordinate);
        values.push(value);
    }

    Ok(SparseTensor::from_parts(name, shape, formats, indices, values)?)
}

fn parse_usize_row(line: &str, expected: usize, what: &str) -> TnsResult<Vec<usize>> {
    let row = line
        .split_whitespace()
        .map(|field| {
            field
                .parse::<usize>()
                .map_err(|_| TnsError::malformed(format!("invalid {what} token {field:?}")))
        })
        .collect::<TnsResult<Vec<usize>>>()?;
    if row.len() != expected {
        return Err(TnsError::malformed(format!(
            "expected {expected} {what}, got {}",
            row.len()
        )));
    }
    Ok(row)
}

/// Write a packed tensor to a named file, all-or-nothing
///
/// Writes to a sibling temporary path, flushes, then atomically renames
/// onto the target. On failure the temporary file is removed and the target
/// is left untouched.
pub fn save_tns<T: Float + std::fmt::Display>(
    packed: &PackedTensor<T>,
    path: impl AsRef<Path>,
) -> TnsResult<()> {
    let path = path.as_ref();
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    let result = (|| -> TnsResult<()> {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        write_tns(packed, &mut writer)?;
        writer.flush()?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    } else {
        debug!(path = %path.display(), nnz = packed.nnz(), "wrote tensor artifact");
    }
    result
}

/// Read a `.tns` file from disk
pub fn load_tns<T: Float + FromStr>(path: impl AsRef<Path>) -> TnsResult<SparseTensor<T>> {
    read_tns(File::open(path)?)
}

/// Pack a coordinate tensor and write it next to `dir` as `<name>.tns`
///
/// Returns the artifact path. This is the single operation the `gentensor`
/// command performs after generation.
pub fn save_packed_to_dir<T: Float + std::fmt::Display>(
    tensor: &SparseTensor<T>,
    dir: impl AsRef<Path>,
) -> TnsResult<std::path::PathBuf> {
    let packed = pack(tensor)?;
    let path = dir
        .as_ref()
        .join(format!("{}.{}", packed.name(), TNS_EXTENSION));
    save_tns(&packed, &path)?;
    Ok(path)
}
