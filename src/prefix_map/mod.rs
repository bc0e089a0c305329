//! PrefixMaps are string keyed maps that support finding values with a longest prefix
//!
//! They are used by the tokenizer to find keywords by seeing if the prefix of the remaining input
//! maps to a known symbol. The tokenizer only relies on the [PrefixMap] trait, so any map that
//! answers longest-prefix queries can drive it, but the symbol tables in this crate are all
//! backed by an [AlphabetTrie].
//!
//! # Example
//!
//! ```
//! use asciimath_tex::prefix_map::{AlphabetTrie, PrefixMap};
//!
//! let trie = AlphabetTrie::from_entries([("<", 0), ("<=", 1), ("<=>", 2)]).unwrap();
//! assert_eq!(trie.get_longest_prefix("<=x"), Some((2, &1)));
//! ```

mod trie;

pub use trie::AlphabetTrie;

/// A PrefixMap is a map that supports operations on the prefix of an input
pub trait PrefixMap<V> {
    /// Get the corresponding byte length and value of the key that is the longest prefix of inp
    ///
    /// # Example
    /// ```
    /// use asciimath_tex::prefix_map::{AlphabetTrie, PrefixMap};
    ///
    /// let map = AlphabetTrie::from_entries([("a", 1), ("abc", 3)]).unwrap();
    /// assert_eq!(map.get_longest_prefix("ab"), Some((1, &1)));
    /// ```
    fn get_longest_prefix<P: AsRef<str>>(&self, inp: P) -> Option<(usize, &V)>;

    /// Whether a non-empty key starts at the beginning of inp
    fn starts_keyword<P: AsRef<str>>(&self, inp: P) -> bool {
        matches!(self.get_longest_prefix(inp), Some((len, _)) if len > 0)
    }
}
