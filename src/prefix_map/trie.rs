use super::PrefixMap;
use crate::error::TrieError;
use fnv::FnvHashMap;

#[derive(Debug, Clone)]
struct TrieNode<V> {
    children: Box<[Option<usize>]>,
    value: Option<V>,
}

impl<V> TrieNode<V> {
    fn new(width: usize) -> Self {
        TrieNode {
            children: vec![None; width].into(),
            value: None,
        }
    }
}

/// A prefix map backed by a trie over a fixed alphabet
///
/// Every node holds a dense array of children indexed by a character's position in the alphabet
/// rather than by the character itself, so lookups take `O(longest_prefix)` and never hash more
/// than one character per step. Characters outside the alphabet can't be inserted, and simply end
/// a lookup.
///
/// # Example
/// ```
/// use asciimath_tex::prefix_map::{AlphabetTrie, PrefixMap};
///
/// let mut trie = AlphabetTrie::with_alphabet(["a", "b"]).unwrap();
/// trie.insert("ab", 'x').unwrap();
/// assert_eq!(trie.get_longest_prefix("abba"), Some((2, &'x')));
/// assert!(trie.insert("c", 'y').is_err());
/// ```
#[derive(Debug, Clone)]
pub struct AlphabetTrie<V> {
    alphabet: FnvHashMap<char, usize>,
    nodes: Vec<TrieNode<V>>,
}

impl<V> AlphabetTrie<V> {
    /// Create an empty trie over an alphabet of single character strings
    ///
    /// Duplicate entries are ignored.
    pub fn with_alphabet<I, S>(entries: I) -> Result<Self, TrieError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut alphabet = FnvHashMap::default();
        for entry in entries {
            let entry = entry.as_ref();
            let mut chars = entry.chars();
            match (chars.next(), chars.next()) {
                (Some(chr), None) => {
                    let next = alphabet.len();
                    alphabet.entry(chr).or_insert(next);
                }
                _ => return Err(TrieError::InvalidAlphabetEntry(entry.to_owned())),
            }
        }
        if alphabet.is_empty() {
            return Err(TrieError::EmptyAlphabet);
        }
        let width = alphabet.len();
        Ok(AlphabetTrie {
            alphabet,
            nodes: vec![TrieNode::new(width)],
        })
    }

    /// Create a trie whose alphabet is every character of the keys plus the space character
    ///
    /// Later entries replace earlier entries with the same key.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, TrieError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
    {
        let entries: Vec<_> = entries.into_iter().collect();
        let mut alphabet: Vec<String> = vec![" ".into()];
        alphabet.extend(
            entries
                .iter()
                .flat_map(|(key, _)| key.as_ref().chars())
                .map(String::from),
        );
        let mut trie = Self::with_alphabet(alphabet)?;
        for (key, val) in entries {
            trie.insert(key.as_ref(), val)?;
        }
        Ok(trie)
    }

    /// The number of distinct characters in the alphabet
    pub fn alphabet_len(&self) -> usize {
        self.alphabet.len()
    }

    /// Whether chr is part of the alphabet
    pub fn contains_char(&self, chr: char) -> bool {
        self.alphabet.contains_key(&chr)
    }

    /// Insert a value, returning the value previously stored under key
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, TrieError> {
        // check the whole key first so a failed insert leaves no dangling nodes
        if let Some(ch) = key.chars().find(|chr| !self.contains_char(*chr)) {
            return Err(TrieError::OutOfAlphabet {
                ch,
                key: key.to_owned(),
            });
        }
        let width = self.alphabet.len();
        let mut node = 0;
        for chr in key.chars() {
            let slot = self.alphabet[&chr];
            node = match self.nodes[node].children[slot] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::new(width));
                    self.nodes[node].children[slot] = Some(child);
                    child
                }
            };
        }
        Ok(self.nodes[node].value.replace(value))
    }

    /// Get the value stored under exactly key
    pub fn get(&self, key: &str) -> Option<&V> {
        let mut node = 0;
        for chr in key.chars() {
            let slot = *self.alphabet.get(&chr)?;
            node = self.nodes[node].children[slot]?;
        }
        self.nodes[node].value.as_ref()
    }
}

impl<V> PrefixMap<V> for AlphabetTrie<V> {
    fn get_longest_prefix<P: AsRef<str>>(&self, inp: P) -> Option<(usize, &V)> {
        let mut node = 0;
        let mut res = self.nodes[node].value.as_ref().map(|val| (0, val));
        for (ind, chr) in inp.as_ref().char_indices() {
            let Some(&slot) = self.alphabet.get(&chr) else {
                break;
            };
            match self.nodes[node].children[slot] {
                Some(child) => node = child,
                None => break,
            }
            if let Some(val) = &self.nodes[node].value {
                res = Some((ind + chr.len_utf8(), val));
            }
        }
        res
    }
}
