//! # Sequence Module
//!
//! Cursor over an ordered list of image files. Unlike the table cursor it
//! wraps around in both directions and keeps a single position for the
//! whole session instead of one per configuration.
use crate::cursor::store::PositionStore;
use crate::error::RustyCursorError;
use crate::sequence::assets::{discover, read_prompt, Asset};
use crate::session::Session;
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub(crate) mod assets;

/// Upper limit accepted for the explicit 1-based position.
pub(crate) const POSITION_MAX: i64 = 1_000;

#[derive(Error, Debug)]
pub(crate) enum SequenceError {
    #[error("Directory not found: {0}")]
    DirectoryNotFoundError(String),

    #[error("No images found")]
    EmptyListError,
}

/// Advancement policy of the sequence cursor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum SequenceMode {
    /// One step forward, wrapping to the first item
    #[default]
    Increment,
    /// One step back, wrapping to the last item
    Decrement,
    /// Uniformly sampled over the whole list
    Random,
    /// Stay on the stored item
    Disabled,
    /// Jump to an explicit 1-based position
    Position,
}

impl SequenceMode {
    /// Parses a mode name (case-insensitive); unknown names keep the stored item.
    pub(crate) fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "increment" => Self::Increment,
            "decrement" => Self::Decrement,
            "random" => Self::Random,
            "position" => Self::Position,
            _ => Self::Disabled,
        }
    }

    pub(crate) const fn as_str(&self) -> &'static str {
        match self {
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Random => "random",
            Self::Disabled => "disabled",
            Self::Position => "position",
        }
    }
}

/// Cursor over a list of `length` items whose position lives in `state_file`.
pub(crate) struct SequenceCursor<'a, S: PositionStore + ?Sized> {
    store: &'a S,
    state_file: &'a Path,
}

impl<'a, S: PositionStore + ?Sized> SequenceCursor<'a, S> {
    pub(crate) fn new(store: &'a S, state_file: &'a Path) -> Self {
        SequenceCursor { store, state_file }
    }

    /// Moves the cursor and returns the new 0-based index in `[0, length)`.
    ///
    /// The stored position is read first (0 when missing or corrupt), moved
    /// according to `mode`, reduced modulo `length` and always written back,
    /// even when it did not change. `position` is 1-based and only used in
    /// `Position` mode.
    pub(crate) fn resolve<R: Rng>(
        &self,
        mode: SequenceMode,
        length: usize,
        position: i64,
        rng: &mut R,
    ) -> Result<usize, RustyCursorError> {
        if length == 0 {
            Err(SequenceError::EmptyListError)?;
        }
        let count = i64::try_from(length).unwrap_or(i64::MAX);
        let current = self.store.read(self.state_file, 0);
        let next = match mode {
            SequenceMode::Increment => current.saturating_add(1),
            SequenceMode::Decrement => current.saturating_sub(1),
            SequenceMode::Random => rng.random_range(0..count),
            SequenceMode::Position => position.saturating_sub(1),
            SequenceMode::Disabled => current,
        }
        .rem_euclid(count);
        self.store.write(self.state_file, next)?;
        Ok(next as usize)
    }
}

/// Options of one image sequence call.
#[derive(Clone, Debug)]
pub(crate) struct SequenceRequest {
    pub(crate) directory: PathBuf,
    pub(crate) mode: SequenceMode,
    /// 1-based position used by `Position` mode
    pub(crate) position: i64,
    /// Whether to load the `<stem>.txt` sidecar as prompt text
    pub(crate) show_text: bool,
}

impl Default for SequenceRequest {
    fn default() -> Self {
        SequenceRequest {
            directory: PathBuf::new(),
            mode: SequenceMode::default(),
            position: 1,
            show_text: true,
        }
    }
}

/// What an image sequence call hands back to the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ImageSelection {
    /// Full path of the selected image
    pub(crate) image_path: String,
    /// Sidecar text, a placeholder message, or a diagnostic for sentinels
    pub(crate) prompt_text: String,
    /// File stem of the selected image
    pub(crate) file_name: String,
    /// "<index + 1>/<count>"
    pub(crate) image_count: String,
}

impl ImageSelection {
    /// Sentinel for failed calls: no image, the message as prompt text and "0/0".
    pub(crate) fn sentinel(message: String) -> Self {
        ImageSelection {
            image_path: String::new(),
            prompt_text: message,
            file_name: String::new(),
            image_count: "0/0".to_string(),
        }
    }
}

/// Selects the next image for `request`; the position is kept in the session's sequence state file.
pub(crate) fn select_image<R: Rng>(
    session: &Session,
    request: &SequenceRequest,
    rng: &mut R,
) -> Result<ImageSelection, RustyCursorError> {
    let assets = discover(&request.directory)?;
    if assets.is_empty() {
        Err(SequenceError::EmptyListError)?;
    }
    let cursor = SequenceCursor::new(session.store(), session.sequence_state_file());
    let position = request.position.clamp(1, POSITION_MAX);
    let index = cursor.resolve(request.mode, assets.len(), position, rng)?;
    let asset = Asset::new(assets[index].to_owned());
    info!(
        index = index + 1,
        count = assets.len(),
        file_name = %asset.stem,
        mode = request.mode.as_str(),
        "loading image"
    );

    let prompt_text = if request.show_text {
        read_prompt(&request.directory, &asset.stem)?
    } else {
        String::new()
    };
    Ok(ImageSelection {
        image_path: asset.path.display().to_string(),
        prompt_text,
        file_name: asset.stem,
        image_count: format!("{}/{}", index + 1, assets.len()),
    })
}

/// Like [`select_image`], but every failure becomes a sentinel selection.
pub(crate) fn select_image_or_sentinel<R: Rng>(
    session: &Session,
    request: &SequenceRequest,
    rng: &mut R,
) -> ImageSelection {
    match select_image(session, request, rng) {
        Ok(selection) => selection,
        Err(RustyCursorError::SequenceError(error)) => {
            debug!(%error, directory = %request.directory.display(), "no image selected");
            ImageSelection::sentinel(error.to_string())
        }
        Err(error) => {
            warn!(%error, directory = %request.directory.display(), "image sequence failed");
            ImageSelection::sentinel(format!("Error: {error}"))
        }
    }
}
