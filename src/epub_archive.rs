use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use log::debug;

use crate::file_utils::FileManager;

// @module: EPUB container extraction and repacking

/// Reads and writes the EPUB zip container by driving the system `unzip`
/// and `zip` binaries
pub struct EpubArchive;

impl EpubArchive {
    /// Extract an EPUB into a directory
    pub fn extract<P1: AsRef<Path>, P2: AsRef<Path>>(epub_path: P1, dest_dir: P2) -> Result<()> {
        let epub_path = epub_path.as_ref();
        let dest_dir = dest_dir.as_ref();

        if !epub_path.exists() {
            return Err(anyhow!("EPUB file does not exist: {:?}", epub_path));
        }
        FileManager::ensure_dir(dest_dir)?;

        let output = Command::new("unzip")
            .args([
                "-o",
                "-q",
                epub_path.to_str().unwrap_or(""),
                "-d",
                dest_dir.to_str().unwrap_or(""),
            ])
            .output()
            .context("Failed to execute unzip command - is unzip installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("unzip failed for {:?}: {}", epub_path, stderr.trim()));
        }

        debug!("Extracted {:?} to {:?}", epub_path, dest_dir);
        Ok(())
    }

    /// Pack a directory back into an EPUB.
    ///
    /// The `mimetype` entry must be first in the archive and stored
    /// uncompressed per the EPUB OCF spec, so it is added alone before the
    /// rest of the tree is appended.
    pub fn pack<P1: AsRef<Path>, P2: AsRef<Path>>(src_dir: P1, epub_path: P2) -> Result<()> {
        let src_dir = src_dir.as_ref();
        let epub_path = std::path::absolute(epub_path.as_ref())
            .context("Failed to resolve output path")?;

        if !src_dir.is_dir() {
            return Err(anyhow!("Package directory does not exist: {:?}", src_dir));
        }
        if epub_path.exists() {
            std::fs::remove_file(&epub_path)
                .with_context(|| format!("Failed to replace existing output: {:?}", epub_path))?;
        }
        if let Some(parent) = epub_path.parent() {
            FileManager::ensure_dir(parent)?;
        }

        let epub_arg = epub_path.to_str().unwrap_or("");

        let has_mimetype = src_dir.join("mimetype").is_file();
        if has_mimetype {
            let output = Command::new("zip")
                .current_dir(src_dir)
                .args(["-X", "-0", "-q", epub_arg, "mimetype"])
                .output()
                .context("Failed to execute zip command - is zip installed?")?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(anyhow!("zip failed adding mimetype: {}", stderr.trim()));
            }
        }

        let mut args = vec!["-X", "-r", "-q"];
        if has_mimetype {
            // Grow the archive started with the stored mimetype entry
            args.push("-g");
        }
        args.extend([epub_arg, ".", "-x", "mimetype"]);
        let output = Command::new("zip")
            .current_dir(src_dir)
            .args(&args)
            .output()
            .context("Failed to execute zip command - is zip installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("zip failed for {:?}: {}", src_dir, stderr.trim()));
        }

        debug!("Packed {:?} into {:?}", src_dir, epub_path);
        Ok(())
    }
}
