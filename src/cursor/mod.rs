//! # Cursor Module
//!
//! The index cursor decides which position of a dataset a call uses. It is
//! stateless itself: `increment` mode keeps its position in a
//! [`store::PositionStore`] under the configuration's
//! [`fingerprint::Fingerprint`], every other mode is computed on the spot.
use crate::cursor::fingerprint::Fingerprint;
use crate::cursor::store::PositionStore;
use crate::error::RustyCursorError;
use rand::Rng;

pub(crate) mod fingerprint;
pub(crate) mod store;

/// Upper limit accepted for the configured start index.
pub(crate) const START_INDEX_MAX: i64 = 100_000;
/// Upper limit accepted for the configured end index.
pub(crate) const END_INDEX_MAX: i64 = 999_999;
/// Upper limit accepted for the configured step size.
pub(crate) const STEP_SIZE_MAX: i64 = 1_000;

/// Advancement policy of the table cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum LoopMode {
    /// Always the start bound
    #[default]
    Disabled,
    /// Uniformly sampled within the bounds
    Random,
    /// Stored position, advanced by the step after every call
    Increment,
    /// Unrecognised name; behaves like `Disabled` but keeps its own fingerprint
    Unknown(String),
}

impl LoopMode {
    /// Parses a loop mode name (case-insensitive). Unknown names never fail.
    pub(crate) fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "disabled" => Self::Disabled,
            "random" => Self::Random,
            "increment" => Self::Increment,
            _ => Self::Unknown(name.to_owned()),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            Self::Disabled => "disabled",
            Self::Random => "random",
            Self::Increment => "increment",
            Self::Unknown(name) => name.as_str(),
        }
    }
}

/// Inclusive `[start, end]` range walked by a cursor, plus its step size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Bounds {
    pub(crate) start: i64,
    pub(crate) end: i64,
    pub(crate) step: i64,
}

impl Bounds {
    /// Creates bounds from user input, clamping each value into its accepted range.
    pub(crate) fn new(start: i64, end: i64, step: i64) -> Self {
        Bounds {
            start: start.clamp(0, START_INDEX_MAX),
            end: end.clamp(0, END_INDEX_MAX),
            step: step.clamp(1, STEP_SIZE_MAX),
        }
    }

    /// Fits the bounds to a dataset with `extent` positions.
    ///
    /// `start` is raised to 0, `end` is lowered to `extent - 1`, and the two
    /// are swapped when `end` ends up below `start`. With an empty dataset
    /// the range becomes `[-1, start]`, so the chosen index is never valid.
    pub(crate) fn normalize(self, extent: usize) -> Self {
        let last = i64::try_from(extent).unwrap_or(i64::MAX) - 1;
        let start = self.start.max(0);
        let end = self.end.min(last);
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        Bounds { start, end, step: self.step }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            start: 0,
            end: END_INDEX_MAX,
            step: 1,
        }
    }
}

/// The table cursor state machine for one configuration.
#[derive(Clone, Debug)]
pub(crate) struct IndexCursor {
    mode: LoopMode,
    bounds: Bounds,
}

impl IndexCursor {
    pub(crate) fn new(mode: LoopMode, bounds: Bounds) -> Self {
        IndexCursor { mode, bounds }
    }

    /// Picks the index for this call.
    ///
    /// In `increment` mode the stored position (or the start bound when
    /// nothing is stored) is returned, and the position after it is written
    /// back: `current + step`, or the start bound once that passes `end`.
    /// The store is not touched in any other mode.
    pub(crate) fn resolve<S, R>(
        &self,
        fingerprint: &Fingerprint,
        store: &S,
        rng: &mut R,
    ) -> Result<i64, RustyCursorError>
    where
        S: PositionStore + ?Sized,
        R: Rng,
    {
        let Bounds { start, end, step } = self.bounds;
        match self.mode {
            LoopMode::Disabled | LoopMode::Unknown(_) => Ok(start),
            LoopMode::Random => Ok(rng.random_range(start.min(end)..=end.max(start))),
            LoopMode::Increment => {
                let state_file = fingerprint.state_file();
                let current = store.read(&state_file, start);
                let next = current.saturating_add(step);
                let next = if next > end { start } else { next };
                store.write(&state_file, next)?;
                Ok(current)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::store::tests::MemoryPositionStore;
    use crate::table::extract::Orientation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::Path;

    fn fingerprint(mode: &LoopMode, bounds: Bounds) -> Fingerprint {
        Fingerprint::new(Path::new("/data/prompts.csv"), Orientation::Row, &[], mode, bounds)
    }

    fn run(mode: LoopMode, bounds: Bounds, store: &MemoryPositionStore, times: usize) -> Vec<i64> {
        let mut rng = StdRng::seed_from_u64(7);
        let cursor = IndexCursor::new(mode.clone(), bounds);
        let key = fingerprint(&mode, bounds);
        (0..times)
            .map(|_| cursor.resolve(&key, store, &mut rng).unwrap())
            .collect()
    }

    #[test]
    fn test_loop_mode_parse() {
        assert_eq!(LoopMode::parse("increment"), LoopMode::Increment);
        assert_eq!(LoopMode::parse("Random"), LoopMode::Random);
        assert_eq!(LoopMode::parse("disabled"), LoopMode::Disabled);
        assert_eq!(LoopMode::parse("sideways"), LoopMode::Unknown("sideways".to_string()));
        assert_eq!(LoopMode::parse("sideways").as_str(), "sideways");
    }

    #[test]
    fn test_bounds_clamp_user_input() {
        assert_eq!(Bounds::new(-5, 5_000_000, 0), Bounds { start: 0, end: END_INDEX_MAX, step: 1 });
        assert_eq!(Bounds::new(200_000, 3, 5000), Bounds { start: START_INDEX_MAX, end: 3, step: STEP_SIZE_MAX });
    }

    #[test]
    fn test_bounds_normalize() {
        let bounds = Bounds { start: 2, end: 999_999, step: 1 };
        assert_eq!(bounds.normalize(5), Bounds { start: 2, end: 4, step: 1 });

        // Reversed bounds are swapped
        let bounds = Bounds { start: 7, end: 3, step: 1 };
        assert_eq!(bounds.normalize(10), Bounds { start: 3, end: 7, step: 1 });

        // Start past the end of a short table
        let bounds = Bounds { start: 5, end: 10, step: 1 };
        assert_eq!(bounds.normalize(2), Bounds { start: 1, end: 5, step: 1 });

        // Empty dataset
        let bounds = Bounds { start: 0, end: 10, step: 1 };
        assert_eq!(bounds.normalize(0), Bounds { start: -1, end: 0, step: 1 });
    }

    #[test]
    fn test_bounds_normalize_reversed_property() {
        for start in 0..12 {
            for end in 0..start {
                let bounds = Bounds { start, end, step: 1 }.normalize(100);
                assert_eq!((bounds.start, bounds.end), (end, start));
            }
        }
    }

    #[test]
    fn test_disabled_returns_start() {
        let store = MemoryPositionStore::default();
        let bounds = Bounds { start: 3, end: 9, step: 1 };
        store.insert(&fingerprint(&LoopMode::Disabled, bounds), 6);
        assert_eq!(run(LoopMode::Disabled, bounds, &store, 3), vec![3, 3, 3]);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_unknown_mode_behaves_as_disabled() {
        let store = MemoryPositionStore::default();
        let bounds = Bounds { start: 4, end: 9, step: 1 };
        assert_eq!(run(LoopMode::parse("bogus"), bounds, &store, 2), vec![4, 4]);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_random_stays_within_bounds() {
        let store = MemoryPositionStore::default();
        let bounds = Bounds { start: 2, end: 5, step: 1 };
        let values = run(LoopMode::Random, bounds, &store, 200);
        assert!(values.iter().all(|value| (2..=5).contains(value)));
        for expected in 2..=5 {
            assert!(values.contains(&expected));
        }
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_increment_wraps_after_end() {
        let store = MemoryPositionStore::default();
        let bounds = Bounds { start: 1, end: 3, step: 1 };
        assert_eq!(run(LoopMode::Increment, bounds, &store, 7), vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn test_increment_with_step() {
        let store = MemoryPositionStore::default();
        let bounds = Bounds { start: 0, end: 6, step: 3 };
        assert_eq!(run(LoopMode::Increment, bounds, &store, 5), vec![0, 3, 6, 0, 3]);
    }

    #[test]
    fn test_increment_persists_next_index() {
        let store = MemoryPositionStore::default();
        let bounds = Bounds { start: 0, end: 4, step: 1 };
        assert_eq!(run(LoopMode::Increment, bounds, &store, 2), vec![0, 1]);
        assert_eq!(store.get(&fingerprint(&LoopMode::Increment, bounds)), Some(2));

        // A new cursor over the same store continues where the last one stopped
        assert_eq!(run(LoopMode::Increment, bounds, &store, 1), vec![2]);
    }

    #[test]
    fn test_increment_isolated_by_fingerprint() {
        let store = MemoryPositionStore::default();
        let first = Bounds { start: 0, end: 4, step: 1 };
        let second = Bounds { start: 0, end: 4, step: 2 };
        assert_eq!(run(LoopMode::Increment, first, &store, 2), vec![0, 1]);
        assert_eq!(run(LoopMode::Increment, second, &store, 2), vec![0, 2]);
        assert_eq!(run(LoopMode::Increment, first, &store, 1), vec![2]);
    }
}
