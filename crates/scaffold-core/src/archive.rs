//! Archive packaging
//!
//! Entries are written in the given order with pinned compression settings,
//! timestamps and permissions, so equal inputs give byte-identical archives.
//! Directories are implied by entry paths and never written separately.

use crate::error::Result;
use crate::templates::GeneratedFile;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Deflate level used for every entry
const COMPRESSION_LEVEL: i64 = 6;

/// Permissions recorded for every entry
const FILE_MODE: u32 = 0o644;

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
        // 1980-01-01, the zip epoch; never the wall clock
        .last_modified_time(DateTime::default())
        .unix_permissions(FILE_MODE)
}

/// Serialize files into a zip archive held in memory
pub fn pack(files: &[GeneratedFile]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = entry_options();

        for file in files {
            zip.start_file(file.path.as_str(), options)?;
            zip.write_all(&file.content)?;
        }

        zip.finish()?;
    }
    Ok(buffer)
}

/// Read an archive back into files, in entry order
pub fn unpack(bytes: &[u8]) -> Result<Vec<GeneratedFile>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut files = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        files.push(GeneratedFile::new(entry.name(), content));
    }

    Ok(files)
}
