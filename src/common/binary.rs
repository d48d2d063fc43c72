//! Binary data parsing utilities shared across formats.
//!
//! Little-endian reads with explicit bounds checks, used by the compound-file
//! reader, the record walker and the property-set decoder.

use zerocopy::{FromBytes, I32, LE, U16, U32};

/// Binary parsing error type
#[derive(Debug, Clone)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData { expected: usize, available: usize },
    /// Failed to parse the data
    ParseError(String),
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                expected,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data: expected {}, got {}",
                    expected, available
                )
            },
            BinaryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Read a little-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use deckling::common::binary::read_u16_le;
/// let data = [0x34, 0x12, 0x78, 0x56];
/// assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_le(&data, 2).unwrap(), 0x5678);
/// ```
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BinaryResult<u16> {
    if offset + 2 > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: offset + 2,
            available: data.len(),
        });
    }
    U16::<LE>::read_from_bytes(&data[offset..offset + 2])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u16".to_string()))
}

/// Read a little-endian u32 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use deckling::common::binary::read_u32_le;
/// let data = [0x78, 0x56, 0x34, 0x12];
/// assert_eq!(read_u32_le(&data, 0).unwrap(), 0x12345678);
/// ```
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> BinaryResult<u32> {
    if offset + 4 > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: offset + 4,
            available: data.len(),
        });
    }
    U32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u32".to_string()))
}

/// Read a little-endian i32 from a byte slice at the given offset.
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> BinaryResult<i32> {
    if offset + 4 > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: offset + 4,
            available: data.len(),
        });
    }
    I32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read i32".to_string()))
}
