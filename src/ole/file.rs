use super::consts::*;
use std::io::{self, Read, Seek, SeekFrom};
use zerocopy::{FromBytes, LE, U16, U32, U64};
use zerocopy_derive::FromBytes as DeriveFromBytes;

/// Raw OLE header structure (512 bytes)
///
/// On-disk layout of the compound file header, including the 109 DIFAT
/// entries embedded in it. Based on the Microsoft CFB specification.
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
#[allow(dead_code)]
struct RawHeader {
    /// Signature (must equal `MAGIC`)
    magic: [u8; 8],
    /// Header CLSID (unused, all zero in practice)
    clsid: [u8; 16],
    /// Minor format version
    minor_version: U16<LE>,
    /// Major format version (3 = 512-byte sectors, 4 = 4096-byte sectors)
    dll_version: U16<LE>,
    /// Byte-order mark (must be 0xFFFE, i.e. little-endian)
    byte_order: U16<LE>,
    /// Sector size as a power of two
    sector_shift: U16<LE>,
    /// Mini sector size as a power of two
    mini_sector_shift: U16<LE>,
    /// Reserved
    reserved: [u8; 6],
    /// Number of directory sectors (version 4 only)
    num_dir_sectors: U32<LE>,
    /// Number of FAT sectors
    num_fat_sectors: U32<LE>,
    /// First sector of the directory stream
    first_dir_sector: U32<LE>,
    /// Transaction signature (unused)
    transaction_signature: U32<LE>,
    /// Streams smaller than this live in the ministream
    mini_stream_cutoff: U32<LE>,
    /// First MiniFAT sector
    first_minifat_sector: U32<LE>,
    /// Number of MiniFAT sectors
    num_minifat_sectors: U32<LE>,
    /// First DIFAT sector (beyond the embedded entries)
    first_difat_sector: U32<LE>,
    /// Number of DIFAT sectors
    num_difat_sectors: U32<LE>,
    /// First 109 FAT sector indexes
    difat: [U32<LE>; 109],
}

/// Raw OLE directory entry structure (128 bytes)
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
#[allow(dead_code)]
struct RawDirectoryEntry {
    /// Entry name in UTF-16LE (64 bytes, null-padded)
    name: [u8; 64],
    /// Length of name in bytes (including null terminator)
    name_len: U16<LE>,
    /// Entry type (1 = storage, 2 = stream, 5 = root)
    entry_type: u8,
    /// Node color (0 = red, 1 = black)
    node_color: u8,
    /// Left sibling SID
    sid_left: U32<LE>,
    /// Right sibling SID
    sid_right: U32<LE>,
    /// Child SID
    sid_child: U32<LE>,
    /// CLSID (16 bytes)
    clsid: [u8; 16],
    /// State bits
    state_bits: U32<LE>,
    /// Creation time (FILETIME)
    creation_time: U64<LE>,
    /// Modified time (FILETIME)
    modified_time: U64<LE>,
    /// Starting sector
    start_sector: U32<LE>,
    /// Stream size
    stream_size: U64<LE>,
}

/// Represents an OLE directory entry (stream or storage)
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Storage ID (index in directory)
    pub sid: u32,
    /// Entry name (UTF-16 decoded to UTF-8)
    pub name: String,
    /// Entry type (stream, storage, root)
    pub entry_type: u8,
    /// Index of left sibling in the red-black tree
    pub sid_left: u32,
    /// Index of right sibling in the red-black tree
    pub sid_right: u32,
    /// Index of child node in the red-black tree
    pub sid_child: u32,
    /// First sector of the stream
    pub start_sector: u32,
    /// Size of the stream in bytes
    pub size: u64,
    /// Whether this stream lives in the ministream
    pub is_minifat: bool,
}

/// Error types for OLE file parsing
#[derive(Debug)]
pub enum OleError {
    Io(io::Error),
    /// Signature or byte-order mark did not match
    NotOleFile,
    /// A header field failed a sanity check
    Header(&'static str),
    /// A FAT or MiniFAT chain left its table or looped
    Chain {
        table: &'static str,
        sector: u32,
    },
    /// The directory tree is malformed
    Directory(&'static str),
    /// A property stream could not be decoded
    Property(String),
    StreamNotFound,
}

impl From<io::Error> for OleError {
    fn from(err: io::Error) -> Self {
        OleError::Io(err)
    }
}

impl std::fmt::Display for OleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OleError::Io(e) => write!(f, "i/o failure: {}", e),
            OleError::NotOleFile => write!(f, "missing compound file signature"),
            OleError::Header(what) => write!(f, "malformed header: {}", what),
            OleError::Chain { table, sector } => {
                write!(f, "broken {} chain at sector {:#x}", table, sector)
            },
            OleError::Directory(what) => write!(f, "malformed directory: {}", what),
            OleError::Property(what) => write!(f, "malformed property stream: {}", what),
            OleError::StreamNotFound => write!(f, "no such stream"),
        }
    }
}

impl std::error::Error for OleError {}

/// Check if a byte slice starts with the OLE compound file signature.
pub fn is_ole_file(data: &[u8]) -> bool {
    data.len() >= MINIMAL_OLEFILE_SIZE && &data[0..8] == MAGIC
}

/// OLE compound file reader
///
/// Parses the FAT, MiniFAT and directory of an OLE2 structured storage file
/// and exposes its named streams as byte vectors.
#[derive(Debug)]
pub struct OleFile<R: Read + Seek> {
    reader: R,
    file_size: u64,
    /// Sector size (512 or 4096 bytes)
    sector_size: usize,
    /// Mini sector size (typically 64 bytes)
    mini_sector_size: usize,
    /// Streams smaller than this are read through the MiniFAT
    mini_stream_cutoff: u32,
    /// Maps a sector to the next sector in its chain
    fat: Vec<u32>,
    minifat: Vec<u32>,
    root: Option<DirectoryEntry>,
    /// All directory entries indexed by SID
    dir_entries: Vec<Option<DirectoryEntry>>,
    /// Ministream bytes, loaded on first MiniFAT read
    ministream: Option<Vec<u8>>,
}

impl<R: Read + Seek> OleFile<R> {
    /// Open and parse an OLE compound file from a reader.
    ///
    /// Fails with [`OleError::NotOleFile`] when the signature or byte-order
    /// mark does not match, which callers treat as "this is not a compound
    /// file at all" rather than as corruption.
    pub fn open(mut reader: R) -> Result<Self, OleError> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        if file_size < MINIMAL_OLEFILE_SIZE as u64 {
            return Err(OleError::NotOleFile);
        }

        let mut header_bytes = [0u8; 512];
        reader.read_exact(&mut header_bytes)?;

        let header = RawHeader::read_from_bytes(&header_bytes)
            .map_err(|_| OleError::Header("layout size disagrees"))?;

        if &header.magic != MAGIC {
            return Err(OleError::NotOleFile);
        }
        if header.byte_order.get() != 0xFFFE {
            return Err(OleError::NotOleFile);
        }

        let sector_shift = header.sector_shift.get();
        let mini_sector_shift = header.mini_sector_shift.get();
        if !(6..=12).contains(&sector_shift) || mini_sector_shift > 12 {
            return Err(OleError::Header("implausible sector shift"));
        }
        let sector_size = 1usize << sector_shift;
        let mini_sector_size = 1usize << mini_sector_shift;
        let dll_version = header.dll_version.get();

        if (dll_version == 3 && sector_size != 512) || (dll_version == 4 && sector_size != 4096) {
            return Err(OleError::Header("sector size disagrees with version"));
        }

        let mut ole = OleFile {
            reader,
            file_size,
            sector_size,
            mini_sector_size,
            mini_stream_cutoff: header.mini_stream_cutoff.get(),
            fat: Vec::new(),
            minifat: Vec::new(),
            root: None,
            dir_entries: Vec::new(),
            ministream: None,
        };

        ole.load_fat(&header)?;
        ole.load_directory(header.first_dir_sector.get())?;
        if header.num_minifat_sectors.get() > 0 {
            ole.load_minifat(header.first_minifat_sector.get())?;
        }

        Ok(ole)
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Collect the FAT sector list from the header DIFAT plus any chained
    /// DIFAT sectors, then read those sectors into the FAT table.
    fn load_fat(&mut self, header: &RawHeader) -> Result<(), OleError> {
        let mut fat_sectors = Vec::new();
        for entry in &header.difat {
            let sector = entry.get();
            if sector == FREESECT || sector == ENDOFCHAIN {
                break;
            }
            fat_sectors.push(sector);
        }

        let num_difat_sectors = header.num_difat_sectors.get();
        if num_difat_sectors > 0 {
            let entries_per_sector = (self.sector_size / 4) - 1; // last slot chains to next DIFAT
            let mut difat_sector = header.first_difat_sector.get();

            for _ in 0..num_difat_sectors {
                let sector_data = self.read_sector(difat_sector)?;
                for i in 0..entries_per_sector {
                    let sector = read_sector_id(&sector_data, i);
                    if sector == FREESECT || sector == ENDOFCHAIN {
                        break;
                    }
                    fat_sectors.push(sector);
                }
                difat_sector = read_sector_id(&sector_data, entries_per_sector);
                if difat_sector == ENDOFCHAIN || difat_sector == FREESECT {
                    break;
                }
            }
        }

        let entries_per_sector = self.sector_size / 4;
        self.fat.reserve(fat_sectors.len() * entries_per_sector);
        for &sector_id in &fat_sectors {
            let sector_data = self.read_sector(sector_id)?;
            for i in 0..entries_per_sector {
                self.fat.push(read_sector_id(&sector_data, i));
            }
        }

        Ok(())
    }

    /// Load the MiniFAT (sector chains for small streams).
    fn load_minifat(&mut self, first_minifat_sector: u32) -> Result<(), OleError> {
        let minifat_data = self.read_chain(first_minifat_sector)?;
        let entries_count = minifat_data.len() / 4;
        self.minifat.reserve(entries_count);
        for i in 0..entries_count {
            self.minifat.push(read_sector_id(&minifat_data, i));
        }
        Ok(())
    }

    /// Load directory entries, starting from the root at SID 0.
    fn load_directory(&mut self, first_dir_sector: u32) -> Result<(), OleError> {
        let dir_data = self.read_chain(first_dir_sector)?;
        let num_entries = dir_data.len() / DIRENTRY_SIZE;
        self.dir_entries = vec![None; num_entries];

        if num_entries == 0 {
            return Err(OleError::Directory("no entries"));
        }

        let root = self.decode_entry(&dir_data[0..DIRENTRY_SIZE], 0)?;
        let root_child = root.sid_child;
        self.root = Some(root);
        self.link_directory(root_child, &dir_data, 0)?;

        Ok(())
    }

    /// Decode one 128-byte directory entry.
    fn decode_entry(&self, bytes: &[u8], sid: u32) -> Result<DirectoryEntry, OleError> {
        let raw = RawDirectoryEntry::read_from_bytes(bytes)
            .map_err(|_| OleError::Directory("entry bytes misaligned"))?;

        let name = dir_entry_name(&raw.name, raw.name_len.get());

        // Version-3 writers leave garbage in the upper half of the 64-bit
        // size field; only the low word is meaningful there.
        let mut size = raw.stream_size.get();
        if self.sector_size == 512 {
            size &= u64::from(u32::MAX);
        }

        let entry_type = raw.entry_type;
        let in_ministream =
            entry_type == STGTY_STREAM && size < u64::from(self.mini_stream_cutoff);

        Ok(DirectoryEntry {
            sid,
            name,
            entry_type,
            sid_left: raw.sid_left.get(),
            sid_right: raw.sid_right.get(),
            sid_child: raw.sid_child.get(),
            start_sector: raw.start_sector.get(),
            size,
            is_minifat: in_ministream,
        })
    }

    /// Decode the directory subtree rooted at `sid`, depth-bounded so a
    /// cyclic sibling graph cannot recurse forever.
    fn link_directory(&mut self, sid: u32, dir_data: &[u8], depth: usize) -> Result<(), OleError> {
        if sid == NOSTREAM || depth > 64 {
            return Ok(());
        }

        let index = sid as usize;
        if index >= dir_data.len() / DIRENTRY_SIZE {
            return Err(OleError::Directory("child index out of range"));
        }

        if self.dir_entries[index].is_some() {
            // Already visited; a repeat SID means the sibling links form a cycle.
            return Ok(());
        }

        let offset = index * DIRENTRY_SIZE;
        let entry = self.decode_entry(&dir_data[offset..offset + DIRENTRY_SIZE], sid)?;
        let (left, right, child) = (entry.sid_left, entry.sid_right, entry.sid_child);
        self.dir_entries[index] = Some(entry);

        self.link_directory(left, dir_data, depth + 1)?;
        self.link_directory(right, dir_data, depth + 1)?;
        self.link_directory(child, dir_data, depth + 1)?;

        Ok(())
    }

    /// Read a single sector from the file.
    fn read_sector(&mut self, sector_id: u32) -> Result<Vec<u8>, OleError> {
        let position = ((sector_id as u64) + 1) * (self.sector_size as u64);
        self.reader.seek(SeekFrom::Start(position))?;
        let mut buffer = vec![0u8; self.sector_size];
        self.reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Follow a FAT chain from `start`, concatenating its sectors.
    ///
    /// A well-formed chain visits each FAT slot at most once, so iteration
    /// is capped at the table length; running past it means the links loop.
    fn read_chain(&mut self, start: u32) -> Result<Vec<u8>, OleError> {
        let mut data = Vec::new();
        let mut next = start;

        for _ in 0..=self.fat.len() {
            if next == ENDOFCHAIN {
                return Ok(data);
            }
            let Some(&following) = self.fat.get(next as usize) else {
                return Err(OleError::Chain {
                    table: "FAT",
                    sector: next,
                });
            };
            data.extend_from_slice(&self.read_sector(next)?);
            next = following;
        }

        Err(OleError::Chain {
            table: "FAT",
            sector: next,
        })
    }

    /// Make sure the ministream (the root entry's own chain) is in memory.
    fn load_ministream(&mut self) -> Result<(), OleError> {
        if self.ministream.is_some() {
            return Ok(());
        }
        let start = self
            .root
            .as_ref()
            .ok_or(OleError::Directory("root entry absent"))?
            .start_sector;
        let data = self.read_chain(start)?;
        self.ministream = Some(data);
        Ok(())
    }

    /// Follow a MiniFAT chain, slicing mini sectors out of the ministream.
    fn read_mini_chain(&mut self, start: u32, size: u64) -> Result<Vec<u8>, OleError> {
        self.load_ministream()?;
        let ministream = self.ministream.as_deref().unwrap_or_default();

        let mut data = Vec::with_capacity(size as usize);
        let mut next = start;

        for _ in 0..=self.minifat.len() {
            if next == ENDOFCHAIN {
                data.truncate(size as usize);
                return Ok(data);
            }
            let Some(&following) = self.minifat.get(next as usize) else {
                return Err(OleError::Chain {
                    table: "MiniFAT",
                    sector: next,
                });
            };
            let offset = (next as usize) * self.mini_sector_size;
            let Some(block) = ministream.get(offset..offset + self.mini_sector_size) else {
                return Err(OleError::Chain {
                    table: "MiniFAT",
                    sector: next,
                });
            };
            data.extend_from_slice(block);
            next = following;
        }

        Err(OleError::Chain {
            table: "MiniFAT",
            sector: next,
        })
    }

    /// Open a stream by path and return its contents.
    ///
    /// Most PowerPoint streams live at the root (`["PowerPoint Document"]`);
    /// dual-storage files nest them one level down. Storages have no bytes
    /// to read, so a path naming one reports the stream as absent.
    pub fn open_stream(&mut self, path: &[&str]) -> Result<Vec<u8>, OleError> {
        let entry = self.lookup(path).ok_or(OleError::StreamNotFound)?;
        if entry.entry_type != STGTY_STREAM {
            return Err(OleError::StreamNotFound);
        }
        let (start, size, in_ministream) = (entry.start_sector, entry.size, entry.is_minifat);

        if in_ministream {
            self.read_mini_chain(start, size)
        } else {
            let mut data = self.read_chain(start)?;
            data.truncate(size as usize);
            Ok(data)
        }
    }

    /// Check if a stream or storage exists at the given path.
    pub fn exists(&self, path: &[&str]) -> bool {
        self.lookup(path).is_some()
    }

    /// Names of all entries directly under the root, in tree order.
    pub fn root_entry_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Some(ref root) = self.root {
            self.collect_names(root.sid_child, &mut names, 0);
        }
        names
    }

    fn collect_names(&self, sid: u32, names: &mut Vec<String>, depth: usize) {
        if sid == NOSTREAM || sid as usize >= self.dir_entries.len() || depth > 64 {
            return;
        }
        if let Some(ref entry) = self.dir_entries[sid as usize] {
            self.collect_names(entry.sid_left, names, depth + 1);
            names.push(entry.name.clone());
            self.collect_names(entry.sid_right, names, depth + 1);
        }
    }

    /// Resolve a path of names from the root. An empty path yields the root
    /// itself.
    fn lookup(&self, path: &[&str]) -> Option<&DirectoryEntry> {
        let root = self.root.as_ref()?;
        let mut scope = root.sid_child;
        let mut found = None;

        for name in path {
            let entry = self.child_named(scope, name)?;
            scope = entry.sid_child;
            found = Some(entry);
        }

        found.or(Some(root))
    }

    /// Search the sibling tree rooted at `sid` for an entry by name
    /// (case-insensitive).
    ///
    /// The siblings form a red-black tree keyed by name, but real-world
    /// writers do not reliably keep it sorted, so the whole tree is visited
    /// instead of descending by comparison. Iterative, with the visit count
    /// capped by the directory size so cyclic links terminate.
    fn child_named(&self, sid: u32, name: &str) -> Option<&DirectoryEntry> {
        let mut pending = vec![sid];
        let mut visited = 0usize;

        while let Some(current) = pending.pop() {
            if current == NOSTREAM {
                continue;
            }
            visited += 1;
            if visited > self.dir_entries.len() {
                break;
            }
            let Some(entry) = self
                .dir_entries
                .get(current as usize)
                .and_then(|slot| slot.as_ref())
            else {
                continue;
            };
            if entry.name.eq_ignore_ascii_case(name) {
                return Some(entry);
            }
            pending.push(entry.sid_left);
            pending.push(entry.sid_right);
        }

        None
    }
}

/// Read the `index`-th little-endian u32 sector id from a sector buffer.
#[inline]
fn read_sector_id(data: &[u8], index: usize) -> u32 {
    let offset = index * 4;
    U32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .unwrap_or(FREESECT)
}

/// Decode a directory entry name: UTF-16LE, `length` bytes including the
/// terminator, clamped to the 64-byte field.
fn dir_entry_name(field: &[u8; 64], length: u16) -> String {
    let byte_len = (length as usize).min(64).saturating_sub(2);
    field[..byte_len]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .filter_map(|unit| char::from_u32(unit as u32))
        .collect()
}
