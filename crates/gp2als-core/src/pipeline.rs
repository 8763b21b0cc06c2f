use crate::config::ImportConfig;
use crate::error::Result;
use crate::notation::MarkerRecord;
use crate::project::SavedProject;
use crate::{locators, notation, project};

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub saved: SavedProject,
    pub markers: Vec<MarkerRecord>,
}

/// Load the Live set, read the rehearsal marks, splice them in as locators
/// and write the set back.
///
/// Everything up to the final save works in memory, so an error before that
/// point leaves both files untouched.
pub fn run(config: ImportConfig) -> Result<ImportReport> {
    let mut document = project::load(&config.project)?;

    log::debug!("Reading rehearsal marks from {}", config.notation.display());
    let markers = notation::extract(&config.notation)?;

    let count = locators::apply(&mut document, &markers)?;
    log::info!("Prepared {} locators", count);

    let saved = project::save(&config.project, &document)?;
    Ok(ImportReport { saved, markers })
}
