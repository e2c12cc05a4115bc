//! Identifier and file-path interning.
//!
//! One [`Control`] is shared by every document of a compilation session.
//! Interning guarantees that two equal spellings receive the same handle,
//! so identifier comparisons on the lookup hot path are a single `u32`
//! compare and never touch string contents.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

use crate::base::FileId;

/// An interned identifier spelling.
///
/// `Identifier` is a lightweight handle (just a u32) into the session's
/// [`Control`]. Handles from the same `Control` compare equal exactly when
/// their spellings are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Identifier(u32);

impl Identifier {
    #[inline]
    pub(crate) const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

#[derive(Default)]
struct InternTable {
    /// Map from spelling to index
    map: FxHashMap<SmolStr, u32>,
    /// Storage of all interned spellings
    strings: Vec<SmolStr>,
}

impl InternTable {
    fn intern(&mut self, s: &str) -> u32 {
        if let Some(&index) = self.map.get(s) {
            return index;
        }
        let smol = SmolStr::new(s);
        let index = self.strings.len() as u32;
        self.strings.push(smol.clone());
        self.map.insert(smol, index);
        index
    }

    fn lookup(&self, index: u32) -> Option<SmolStr> {
        self.strings.get(index as usize).cloned()
    }

    fn get(&self, s: &str) -> Option<u32> {
        self.map.get(s).copied()
    }
}

/// The symbol-table factory shared across one compilation session.
///
/// `Control` owns the interning tables for identifier spellings and for
/// file paths. Every [`Document`](crate::model::Document) of a session
/// holds the same `Control`, which is what makes handle-equality a valid
/// substitute for spelling comparison during lookup.
///
/// Thread-safe via internal locking, so one session can serve concurrent
/// lookups.
#[derive(Default)]
pub struct Control {
    identifiers: RwLock<InternTable>,
    files: RwLock<InternTable>,
}

impl Control {
    /// Create a new empty control.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an identifier spelling, returning its handle.
    ///
    /// If the spelling has been interned before, returns the existing
    /// handle.
    pub fn identifier(&self, spelling: &str) -> Identifier {
        // Fast path: already interned (read lock)
        {
            let table = self.identifiers.read();
            if let Some(index) = table.get(spelling) {
                return Identifier::from_raw(index);
            }
        }

        let mut table = self.identifiers.write();
        Identifier::from_raw(table.intern(spelling))
    }

    /// Look up the spelling of an identifier handle.
    ///
    /// Returns `None` if the handle was created by a different control.
    pub fn identifier_text(&self, id: Identifier) -> Option<SmolStr> {
        self.identifiers.read().lookup(id.index())
    }

    /// Look up an identifier handle without interning.
    ///
    /// Returns `None` if the spelling has never been interned here. Used
    /// to translate handles between controls defensively.
    pub fn find_identifier(&self, spelling: &str) -> Option<Identifier> {
        self.identifiers.read().get(spelling).map(Identifier::from_raw)
    }

    /// Intern a file path, returning its [`FileId`].
    pub fn file_id(&self, path: &str) -> FileId {
        {
            let table = self.files.read();
            if let Some(index) = table.get(path) {
                return FileId::new(index);
            }
        }

        let mut table = self.files.write();
        FileId::new(table.intern(path))
    }

    /// Look up the path of a file handle.
    pub fn file_path(&self, file: FileId) -> Option<SmolStr> {
        self.files.read().lookup(file.index())
    }

    /// Number of distinct identifier spellings interned.
    pub fn identifier_count(&self) -> usize {
        self.identifiers.read().strings.len()
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("identifiers", &self.identifiers.read().strings.len())
            .field("files", &self.files.read().strings.len())
            .finish()
    }
}
