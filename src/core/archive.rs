//! Access to the Apple Health export bundle.
//!
//! The iPhone "Export All Health Data" action produces `export.zip` with the
//! document at [`EXPORT_XML_PATH`]. An already-extracted `Export.xml` is
//! accepted as well.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::util::constants::EXPORT_XML_PATH;
use crate::util::error::{HealthFluxError, Result};

/// Read the export document into memory.
///
/// Paths ending in `.xml` are read as-is; anything else is opened as a zip
/// archive and the fixed member [`EXPORT_XML_PATH`] is extracted.
///
/// # Errors
/// Returns [`HealthFluxError::Io`] if the file cannot be read, or
/// [`HealthFluxError::Archive`] if it is not a zip or lacks the member.
pub fn read_export_xml(path: &Path) -> Result<String> {
    let is_plain_xml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
    if is_plain_xml {
        tracing::debug!("Reading extracted export document {}", path.display());
        return Ok(std::fs::read_to_string(path)?);
    }

    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| {
        HealthFluxError::Archive(format!("Failed to open {}: {e}", path.display()))
    })?;
    let mut member = archive.by_name(EXPORT_XML_PATH).map_err(|e| {
        HealthFluxError::Archive(format!(
            "{EXPORT_XML_PATH} not found in {}: {e}",
            path.display()
        ))
    })?;

    let mut xml = String::with_capacity(usize::try_from(member.size()).unwrap_or(0));
    member.read_to_string(&mut xml)?;
    tracing::debug!(
        "Extracted {} ({} bytes) from {}",
        EXPORT_XML_PATH,
        xml.len(),
        path.display()
    );
    Ok(xml)
}

/// File name of the archive, used to tag the run's `Import` point.
pub fn archive_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
