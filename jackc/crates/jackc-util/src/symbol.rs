//! String interning for identifiers, type names, and class names.
//!
//! A [`Symbol`] is a 4-byte handle to an interned string. The same string
//! always interns to the same symbol, so equality is an integer compare and
//! symbols can be copied freely through tokens, bindings, and the deferred
//! work-list. Interned strings live for the whole run; the table is never
//! shrunk, which is fine for a compiler whose memory is bounded by the size
//! of the source it reads.
//!
//! # Examples
//!
//! ```
//! use jackc_util::Symbol;
//!
//! let a = Symbol::intern("Square");
//! let b = Symbol::intern("Square");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str(), "Square");
//! ```

use std::fmt;
use std::sync::OnceLock;

use dashmap::DashMap;
use parking_lot::RwLock;

/// A compact handle to an interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

/// The global intern table.
///
/// `map` answers "is this string already interned" without locking the
/// whole table; `strings` maps a symbol index back to its string. New
/// interns serialise on the `strings` write lock, which also guards
/// against racing inserts of the same string.
struct Interner {
    map: DashMap<&'static str, u32, ahash::RandomState>,
    strings: RwLock<Vec<&'static str>>,
}

fn interner() -> &'static Interner {
    static INTERNER: OnceLock<Interner> = OnceLock::new();
    INTERNER.get_or_init(|| Interner {
        map: DashMap::with_hasher(ahash::RandomState::new()),
        strings: RwLock::new(Vec::new()),
    })
}

impl Symbol {
    /// Interns a string, returning its symbol.
    ///
    /// Fast path is a lock-free map hit; a miss takes the write lock,
    /// re-checks, and appends a leaked `'static` copy of the string.
    pub fn intern(string: &str) -> Symbol {
        let table = interner();

        if let Some(index) = table.map.get(string) {
            return Symbol(*index);
        }

        let mut strings = table.strings.write();
        // A racing intern of the same string may have won the lock first.
        if let Some(index) = table.map.get(string) {
            return Symbol(*index);
        }

        let leaked: &'static str = Box::leak(string.to_string().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(leaked);
        table.map.insert(leaked, index);
        Symbol(index)
    }

    /// Returns the interned string.
    pub fn as_str(self) -> &'static str {
        interner().strings.read()[self.0 as usize]
    }

    /// Whether the interned string is empty.
    pub fn is_empty(self) -> bool {
        self.as_str().is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_same_symbol() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_strings_different_symbols() {
        let a = Symbol::intern("foo");
        let b = Symbol::intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn test_as_str_round_trip() {
        let s = Symbol::intern("Memory.alloc");
        assert_eq!(s.as_str(), "Memory.alloc");
    }

    #[test]
    fn test_empty_string() {
        let s = Symbol::intern("");
        assert!(s.is_empty());
        assert_eq!(s.as_str(), "");
    }

    #[test]
    fn test_display_matches_contents() {
        let s = Symbol::intern("Square");
        assert_eq!(format!("{}", s), "Square");
    }

    #[test]
    fn test_concurrent_interning() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Symbol::intern("shared")))
            .collect();
        let symbols: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(symbols.windows(2).all(|w| w[0] == w[1]));
    }
}
