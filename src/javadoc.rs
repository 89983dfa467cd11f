// src/javadoc.rs

//! Normalization of the package index file downstream documentation
//! tooling expects.
//!
//! Newer toolchains emit `element-list` where older consumers look for
//! `package-list`. After a module's documentation tree is in place, the
//! conventional name must exist if either does.

use std::path::Path;

use anyhow::{Context, Result};

use crate::fs::FileSystem;

pub const PACKAGE_LIST: &str = "package-list";
pub const ELEMENT_LIST: &str = "element-list";

/// Ensure `dest_dir` carries a `package-list` if it carries an
/// `element-list`.
///
/// Returns `true` if a copy was made. An absent destination dir is fine —
/// nothing was unpacked for that artifact. I/O failures propagate: a broken
/// output layout must not be silently ignored.
pub fn normalize_package_list(fs: &dyn FileSystem, dest_dir: &Path) -> Result<bool> {
    let package_list = dest_dir.join(PACKAGE_LIST);
    if fs.is_file(&package_list) {
        return Ok(false);
    }
    let element_list = dest_dir.join(ELEMENT_LIST);
    if !fs.is_file(&element_list) {
        return Ok(false);
    }
    fs.copy(&element_list, &package_list)
        .with_context(|| format!("normalizing package index in {:?}", dest_dir))?;
    Ok(true)
}
