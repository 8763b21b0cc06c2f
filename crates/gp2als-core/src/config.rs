use std::path::PathBuf;

/// Inputs of one import run.
///
/// Built once at process start from the command line and passed by value
/// into [`crate::pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Live set to update. The `.als` extension is optional.
    pub project: PathBuf,

    /// MusicXML export from Guitar Pro. Used as given.
    pub notation: PathBuf,
}

impl ImportConfig {
    #[must_use]
    pub fn new(project: impl Into<PathBuf>, notation: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            notation: notation.into(),
        }
    }

    /// The Live set path with the extension filled in.
    #[must_use]
    pub fn project_file(&self) -> PathBuf {
        crate::project::project_path(&self.project)
    }
}
