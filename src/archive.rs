//! WhatsApp export archive handling.
//!
//! An export zip unpacks into a directory holding one `_chat.txt` transcript
//! and the attached media. This module extracts the archive and locates the
//! pieces the pipeline needs; it knows nothing about their contents.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::Result;

/// Image extensions the pipeline considers.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Extracts the export zip into `dest` (created if absent).
pub fn extract_archive(zip_path: &Path, dest: &Path) -> Result<()> {
    info!(zip = %zip_path.display(), dest = %dest.display(), "extracting export archive");
    fs::create_dir_all(dest)?;
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(dest)?;
    Ok(())
}

/// Locates the chat transcript in an extracted export.
///
/// Prefers a `*_chat.txt` (WhatsApp's convention); falls back to any `.txt`.
/// Candidates are taken in sorted order so repeated runs pick the same file.
pub fn find_chat_file(dir: &Path) -> Option<PathBuf> {
    let mut txt_files: Vec<PathBuf> = list_files(dir)
        .into_iter()
        .filter(|p| p.extension().is_some_and(|e| e.eq_ignore_ascii_case("txt")))
        .collect();
    txt_files.sort();

    let preferred = txt_files.iter().find(|p| {
        p.file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with("_chat.txt"))
    });

    preferred.or_else(|| txt_files.first()).cloned()
}

/// Collects all image files under `dir`, recursively, in sorted order.
pub fn find_images(dir: &Path) -> Vec<PathBuf> {
    let mut images: Vec<PathBuf> = Vec::new();
    collect_images(dir, &mut images);
    images.sort();
    debug!(count = images.len(), dir = %dir.display(), "image scan complete");
    images
}

fn collect_images(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_images(&path, out);
        } else if path.extension().is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        }) {
            out.push(path);
        }
    }
}

/// Non-recursive file listing, empty on unreadable directories.
fn list_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .collect()
        })
        .unwrap_or_default()
}
