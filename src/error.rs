//! Errors raised while configuring a converter or converting a single input
use crate::tokenizer::Position;
use thiserror::Error;

/// An error building an [`AlphabetTrie`][crate::prefix_map::AlphabetTrie]
///
/// These can only happen while a symbol table is being assembled, never while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieError {
    /// The alphabet had no characters
    #[error("trie alphabet is empty")]
    EmptyAlphabet,
    /// An alphabet entry was not exactly one character
    #[error("alphabet entry {0:?} is not a single character")]
    InvalidAlphabetEntry(String),
    /// A key used a character the alphabet doesn't contain
    #[error("character {ch:?} of key {key:?} is outside the trie alphabet")]
    OutOfAlphabet {
        /// The offending character
        ch: char,
        /// The key being inserted
        key: String,
    },
}

/// An error in an [`AsciiMathConfig`][crate::AsciiMathConfig]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The symbol table couldn't be turned into a trie
    #[error(transparent)]
    Trie(#[from] TrieError),
    /// A preprocessing rule had a pattern that isn't a valid regex
    #[error("preprocessing rule {index} has an invalid pattern")]
    InvalidRule {
        /// Position of the rule in the configured list
        index: usize,
        /// The regex compilation error
        #[source]
        source: regex::Error,
    },
}

/// An error converting a single input
///
/// [`AsciiMathToTex::convert`][crate::AsciiMathToTex::convert] never returns these, it renders
/// them as text instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The tokenizer stopped making progress
    #[error("tokenizer made no progress at {position} within {budget} attempts")]
    Tokenizer {
        /// Where the tokenizer got stuck
        position: Position,
        /// The number of stalled attempts allowed for this input
        budget: usize,
    },
    /// A token had a category the parser has no rule for
    #[error("no parse rule for token {value:?} at {position}")]
    UnhandledToken {
        /// The source text of the token
        value: String,
        /// Where the token started
        position: Position,
    },
    /// Brackets, operators or scripts nested past what the parser will follow
    #[error("input nests deeper than {} levels at {position}", crate::parse::MAX_DEPTH)]
    NestingTooDeep {
        /// The token that would have gone one level too deep
        position: Position,
    },
}

/// A bracket that has no closing partner before the end of its region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no closing bracket before end of region")]
pub(crate) struct UnmatchedParen;
