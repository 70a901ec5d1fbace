//! Physical (ZIP) container of an OPC package.
//!
//! Reading decompresses every member up front into a name-keyed map, so the
//! package reader can walk the relationship graph without touching the archive
//! again. Writing deflates members into an in-memory archive.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Largest buffer reserved up front for a member; bigger members grow as read.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

/// Decompressed members of a package archive, keyed by member name.
#[derive(Debug, Default)]
pub struct PhysPkgReader {
    members: HashMap<String, Vec<u8>>,
}

/// Buffer size to reserve for a member whose header declares `declared` bytes.
/// The header is untrusted, so the reservation is capped.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOCATION)).unwrap_or(0)
}

impl PhysPkgReader {
    /// Read a package file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }
        let file = std::fs::File::open(path)?;
        Self::new(std::io::BufReader::new(file))
    }

    /// Read a package held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::new(Cursor::new(data))
    }

    pub fn new<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut members = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(initial_capacity(file.size()));
            file.read_to_end(&mut data)?;
            members.insert(file.name().to_string(), data);
        }

        Ok(Self { members })
    }

    /// Content of `[Content_Types].xml`.
    pub fn content_types_xml(&self) -> Result<&[u8]> {
        self.members
            .get(CONTENT_TYPES_URI.trim_start_matches('/'))
            .map(Vec::as_slice)
            .ok_or_else(|| OpcError::PartNotFound("[Content_Types].xml".to_string()))
    }

    /// Content of the `.rels` part for a source, if it has one.
    pub fn rels_xml_for(&self, source_uri: &PackURI) -> Result<Option<&[u8]>> {
        let rels_uri = source_uri.rels_uri().map_err(OpcError::InvalidPackUri)?;
        Ok(self.members.get(rels_uri.membername()).map(Vec::as_slice))
    }

    /// Move a member's bytes out of the reader.
    pub fn take_blob(&mut self, pack_uri: &PackURI) -> Result<Vec<u8>> {
        self.members
            .remove(pack_uri.membername())
            .ok_or_else(|| OpcError::PartNotFound(pack_uri.to_string()))
    }

    #[inline]
    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        self.members.contains_key(pack_uri.membername())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Writes package members into an in-memory ZIP archive.
pub struct PhysPkgWriter {
    zip_writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    pub fn new() -> Self {
        Self {
            zip_writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write a member with Deflate compression.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip_writer.start_file(pack_uri.membername(), options)?;
        self.zip_writer.write_all(blob)?;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip_writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}
