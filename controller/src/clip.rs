use crate::constants::SENTINEL_CLIP;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// The clips the locomotion state machine switches between.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClipName {
    Idle,
    Walk,
    Run,
    WalkBack,
    Punch,
}

impl ClipName {
    pub const ALL: [ClipName; 5] = [
        ClipName::Idle,
        ClipName::Walk,
        ClipName::Run,
        ClipName::WalkBack,
        ClipName::Punch,
    ];

    /// The clip name as authored in the character asset.
    pub fn as_str(self) -> &'static str {
        match self {
            ClipName::Idle => "Idle",
            ClipName::Walk => "Walk",
            ClipName::Run => "Run",
            ClipName::WalkBack => "WalkBack",
            ClipName::Punch => "Punch",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|clip| clip.as_str() == name)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ClipName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClipTableError {
    #[error("character asset has no `{0}` clip")]
    Missing(ClipName),
}

/// Playable action for every [`ClipName`].
///
/// A table can only be built complete, so holding one means every lookup succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipTable<A> {
    actions: [A; 5],
}

impl<A> ClipTable<A> {
    /// Builds the table from the asset's `(name, action)` list.
    ///
    /// The Mixamo sentinel and names outside [`ClipName`] are skipped. A later duplicate replaces
    /// an earlier one.
    pub fn from_named<N, I>(clips: I) -> Result<Self, ClipTableError>
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, A)>,
    {
        let mut slots: [Option<A>; 5] = [None, None, None, None, None];

        for (name, action) in clips {
            let name = name.as_ref();
            if name == SENTINEL_CLIP {
                continue;
            }
            match ClipName::parse(name) {
                Some(clip) => slots[clip.slot()] = Some(action),
                None => debug!(clip = name, "ignoring clip outside the locomotion set"),
            }
        }

        let [idle, walk, run, walk_back, punch] = slots;
        Ok(Self {
            actions: [
                idle.ok_or(ClipTableError::Missing(ClipName::Idle))?,
                walk.ok_or(ClipTableError::Missing(ClipName::Walk))?,
                run.ok_or(ClipTableError::Missing(ClipName::Run))?,
                walk_back.ok_or(ClipTableError::Missing(ClipName::WalkBack))?,
                punch.ok_or(ClipTableError::Missing(ClipName::Punch))?,
            ],
        })
    }

    pub fn get(&self, clip: ClipName) -> &A {
        &self.actions[clip.slot()]
    }
}
