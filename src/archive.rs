//! Archive extraction
//!
//! Downloaded assets are either archives, unpacked into the staging directory,
//! or raw executables, copied there verbatim. Archive-ness is decided purely by
//! the final file extension.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::{debug, warn};
use xz2::read::XzDecoder;

use crate::common::fs as fs_utils;
use crate::error::{RelbinError, Result};

/// Extensions that mark a file as an archive
pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    "br", "bz2", "zip", "gz", "lz4", "sz", "xz", "zst", "tar", "rar",
];

/// Internal buffer size of the brotli decoder
const BROTLI_BUFFER: usize = 4096;

/// Unpacks downloaded assets into a directory
pub trait Extractor {
    /// Populate `dest` with the contents of `archive`
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Extractor backed by the tar, zip and stream decoder crates
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveExtractor;

impl Extractor for ArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        extract(archive, dest)
    }
}

/// Lowercased final extension, if it is one of [`ARCHIVE_EXTENSIONS`]
fn archive_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    ARCHIVE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Check if a path names an archive
#[allow(dead_code)] // Used by tests
pub fn is_archive(path: &Path) -> bool {
    archive_extension(path).is_some()
}

/// Remove every trailing archive extension from a file name
///
/// `tool.tar.gz` becomes `tool`; names without archive extensions are
/// returned unchanged.
pub fn strip_archive_extensions(name: &str) -> &str {
    let mut stem = name;
    while let Some((head, ext)) = stem.rsplit_once('.') {
        if head.is_empty() || !ARCHIVE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            break;
        }
        stem = head;
    }
    stem
}

/// Extract `archive` into `dest`, or copy it there when it is not an archive
pub fn extract(archive: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest).map_err(|e| extraction_failed(archive, &e))?;

    let Some(ext) = archive_extension(archive) else {
        debug!("{} is not an archive, copying as-is", archive.display());
        return copy_raw(archive, dest);
    };

    debug!("Extracting {} ({ext}) into {}", archive.display(), dest.display());

    match ext.as_str() {
        "tar" => {
            let file = open(archive)?;
            unpack_tar(archive, file, dest)
        }
        "gz" => {
            let file = open(archive)?;
            decompress(archive, GzDecoder::new(file), dest)
        }
        "xz" => {
            let file = open(archive)?;
            decompress(archive, XzDecoder::new(file), dest)
        }
        "zst" => {
            let file = open(archive)?;
            let decoder =
                zstd::stream::read::Decoder::new(file).map_err(|e| extraction_failed(archive, &e))?;
            decompress(archive, decoder, dest)
        }
        "bz2" => {
            let file = open(archive)?;
            decompress(archive, bzip2::read::MultiBzDecoder::new(file), dest)
        }
        "br" => {
            let file = open(archive)?;
            decompress(archive, brotli::Decompressor::new(file, BROTLI_BUFFER), dest)
        }
        "lz4" => {
            let file = open(archive)?;
            decompress(archive, lz4_flex::frame::FrameDecoder::new(file), dest)
        }
        "sz" => {
            let file = open(archive)?;
            decompress(archive, snap::read::FrameDecoder::new(file), dest)
        }
        "zip" => unpack_zip(archive, dest),
        // rar is recognised so it is never installed as a raw binary
        _ => Err(RelbinError::UnsupportedArchive {
            path: archive.display().to_string(),
        }),
    }
}

fn extraction_failed(archive: &Path, reason: &dyn std::fmt::Display) -> RelbinError {
    RelbinError::ExtractionFailed {
        path: archive.display().to_string(),
        reason: reason.to_string(),
    }
}

fn open(archive: &Path) -> Result<File> {
    File::open(archive).map_err(|e| extraction_failed(archive, &e))
}

/// Copy a non-archive file into `dest` under its own name
fn copy_raw(file: &Path, dest: &Path) -> Result<()> {
    let Some(name) = file.file_name() else {
        return Err(extraction_failed(file, &"path has no file name"));
    };
    fs_utils::copy_executable(file, &dest.join(name))
}

fn unpack_tar<R: Read>(archive: &Path, reader: R, dest: &Path) -> Result<()> {
    tar::Archive::new(reader)
        .unpack(dest)
        .map_err(|e| extraction_failed(archive, &e))
}

/// Decompress a single-stream file; `.tar.*` payloads are untarred
fn decompress<R: Read>(archive: &Path, mut reader: R, dest: &Path) -> Result<()> {
    let stem = archive
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| extraction_failed(archive, &"path has no file name"))?;

    if Path::new(stem)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tar"))
    {
        return unpack_tar(archive, reader, dest);
    }

    let out_path = dest.join(stem);
    let mut out = File::create(&out_path).map_err(|e| extraction_failed(archive, &e))?;
    io::copy(&mut reader, &mut out).map_err(|e| extraction_failed(archive, &e))?;
    fs_utils::set_executable(&out_path)
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| extraction_failed(archive, &e))?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| extraction_failed(archive, &e))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping zip entry with unsafe path: {}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| extraction_failed(archive, &e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| extraction_failed(archive, &e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| extraction_failed(archive, &e))?;
        io::copy(&mut entry, &mut out).map_err(|e| extraction_failed(archive, &e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                    .map_err(|e| extraction_failed(archive, &e))?;
            }
        }
    }

    Ok(())
}
