use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier for a vertex or leg inside one cycle evaluation.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    ///
    /// Returns `None` when `index + 1` does not fit in a `u32`.
    pub fn from_index(index: usize) -> Option<Self> {
        let index = u32::try_from(index).ok()?;
        NonZeroU32::new(index.wrapping_add(1)).map(Self)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Position in the owning sequence.
    pub fn as_usize(self) -> usize {
        self.index() as usize
    }

    /// Conventional 1-based number used on diagrams ("state 1", "state 2", ...).
    pub fn number(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Vertex of a cycle.
pub type StateId = Id;
/// Process leg of a cycle.
pub type ProcessId = Id;
