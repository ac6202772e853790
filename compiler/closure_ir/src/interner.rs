//! String interner for owner names, literal contents and method names.
//!
//! One interner serves one compilation; it is shared by reference between
//! the resolver that builds trees and the emitter that renders generated
//! method names. Lookups and inserts go through a `parking_lot::RwLock`, so
//! a `&StringInterner` can be used from the parallel per-unit driver.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// The table exceeded the `u32` index space.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "string interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

#[derive(Default)]
struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<Box<str>, u32>,
    /// Index to string content (parallel with insertion order).
    strings: Vec<Box<str>>,
}

/// Append-only string table.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned as
    /// [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut table = InternTable::default();
        table.map.insert("".into(), 0);
        table.strings.push("".into());
        Self {
            table: RwLock::new(table),
        }
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        // Fast path: already interned.
        if let Some(&index) = self.table.read().map.get(s) {
            return Ok(Name::from_raw(index));
        }

        let mut table = self.table.write();
        // Another writer may have won the race between the locks.
        if let Some(&index) = table.map.get(s) {
            return Ok(Name::from_raw(index));
        }
        let count = table.strings.len();
        let index = u32::try_from(count).map_err(|_| InternError::Overflow { count })?;
        table.strings.push(s.into());
        table.map.insert(s.into(), index);
        Ok(Name::from_raw(index))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if the table exceeds `u32::MAX` strings. Use
    /// [`try_intern`](Self::try_intern) for fallible interning.
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Look up the string for a Name.
    ///
    /// Returns an owned copy since the table lives behind a lock.
    pub fn lookup(&self, name: Name) -> String {
        self.table
            .read()
            .strings
            .get(name.index())
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Check if the interner only holds the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
