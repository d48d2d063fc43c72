/// Magic bytes that should be at the beginning of every OLE file
pub const MAGIC: &[u8; 8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

/// Minimal size of an empty OLE file with 512-byte sectors (1536 bytes)
pub const MINIMAL_OLEFILE_SIZE: usize = 1536;

/// Size of a directory entry in bytes
pub const DIRENTRY_SIZE: usize = 128;

// Sector IDs (from AAF specifications)
/// End of a virtual stream chain
pub const ENDOFCHAIN: u32 = 0xFFFFFFFE; // -2
/// Unallocated sector
pub const FREESECT: u32 = 0xFFFFFFFF; // -1

// Directory Entry IDs (from AAF specifications)
/// Unallocated directory entry
pub const NOSTREAM: u32 = 0xFFFFFFFF; // -1

// Object types in storage (from AAF specifications)
/// Element is a storage object
pub const STGTY_STORAGE: u8 = 1;
/// Element is a stream object
pub const STGTY_STREAM: u8 = 2;
/// Element is a root storage
pub const STGTY_ROOT: u8 = 5;

// Property value types ([MS-OLEPS])
pub const VT_EMPTY: u32 = 0;
pub const VT_I2: u32 = 2;
pub const VT_I4: u32 = 3;
pub const VT_BOOL: u32 = 11;
pub const VT_LPSTR: u32 = 30;
pub const VT_LPWSTR: u32 = 31;
pub const VT_FILETIME: u32 = 64;

// Stream names consumed by the .ppt parser
/// Main presentation stream
pub const STREAM_POWERPOINT_DOCUMENT: &str = "PowerPoint Document";
/// Current editing session stream
pub const STREAM_CURRENT_USER: &str = "Current User";
/// Embedded pictures stream
pub const STREAM_PICTURES: &str = "Pictures";
/// Standard metadata property set
pub const STREAM_SUMMARY_INFORMATION: &str = "\u{5}SummaryInformation";
/// Extended metadata property set
pub const STREAM_DOCUMENT_SUMMARY_INFORMATION: &str = "\u{5}DocumentSummaryInformation";
