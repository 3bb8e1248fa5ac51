use crate::cursor::{Bounds, LoopMode};
use crate::table::extract::Orientation;
use std::path::{Path, PathBuf};

/// Extension of the state files written next to a table source.
pub(crate) const STATE_FILE_EXTENSION: &str = "txt";

/// Source extension left out of the key.
const SOURCE_EXTENSION: &str = "csv";

/// Identity of a table cursor configuration.
///
/// Two cursors with equal fingerprints share one persisted position; any
/// differing component gives a separate position. The key is human readable
/// and used verbatim as a file name, so column references are expected to be
/// plain labels.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Fingerprint {
    source: PathBuf,
    orientation: Orientation,
    references: Vec<String>,
    mode: LoopMode,
    bounds: Bounds,
}

impl Fingerprint {
    /// Column references only count in specific-columns orientation.
    pub(crate) fn new(
        source: &Path,
        orientation: Orientation,
        references: &[String],
        mode: &LoopMode,
        bounds: Bounds,
    ) -> Self {
        let references = match orientation {
            Orientation::SpecificColumns => references.to_vec(),
            Orientation::Row | Orientation::Column => Vec::new(),
        };
        Fingerprint {
            source: source.to_path_buf(),
            orientation,
            references,
            mode: mode.to_owned(),
            bounds,
        }
    }

    /// `<name>_state_<orientation>_<refs>_<mode>_<start>_<end>_<step>`
    pub(crate) fn key(&self) -> String {
        format!(
            "{}_state_{}_{}_{}_{}_{}_{}",
            self.source_name(),
            self.orientation.as_str(),
            self.references.join("_"),
            self.mode.as_str(),
            self.bounds.start,
            self.bounds.end,
            self.bounds.step,
        )
    }

    /// The source stem, followed by `_<extension>` unless the extension is
    /// exactly `csv`, so `data.csv`, `data.CSV` and `data` keep apart.
    fn source_name(&self) -> String {
        let stem = self
            .source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.source.extension() {
            Some(extension) if extension == SOURCE_EXTENSION => stem,
            extension => format!(
                "{}_{}",
                stem,
                extension.map(|extension| extension.to_string_lossy()).unwrap_or_default()
            ),
        }
    }

    /// State file location: next to the source, named after the key.
    pub(crate) fn state_file(&self) -> PathBuf {
        self.source
            .with_file_name(format!("{}.{}", self.key(), STATE_FILE_EXTENSION))
    }
}
