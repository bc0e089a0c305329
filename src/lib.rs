//! A fast extensible asciimath to TeX converter
//!
//! Conversion runs in three stages that are each exposed so they can be inspected or replaced:
//! [`tokenize`] splits input on the longest keywords of a [`SymbolTable`], [`parse`] builds a
//! [`Node`][tree::Node] tree, and [`render`] turns that tree into TeX.
//!
//! ## Usage
//!
//! ```sh
//! cargo add asciimath-tex
//! ```
//!
//! then
//!
//! ```
//! assert_eq!(asciimath_tex::convert("a/b"), r"\frac{ a }{ b }");
//! ```
//!
//! [`convert`] never fails. Anything that goes wrong while converting is rendered as
//! `\text{...}` with the escaped error message, so a bad formula can't take down a larger
//! document. Use [`AsciiMathToTex::try_convert`] to get the error instead.
//!
//! ## Dialect
//!
//! Asciimath is a loose standard that aims for fault-tolerant parsing while looking close to what
//! you might type in ascii. This converter follows the common dialect with a few rules worth
//! knowing:
//!
//! - Brackets are matched by scanning ahead. A bracketed region that contains an un-nested `;`
//!   is a matrix, with `;` separating rows and `,` separating cells, so `[a,b;c,d]` is a 2x2
//!   matrix. A `|` after the start of a cell draws a vertical rule after it. `{` closed by `:}`
//!   makes a left aligned matrix, which is how cases are written.
//! - `|` and `||` are matched greedily against the same bar. A bar with no partner before the
//!   enclosing region closes renders as a relation, which makes "{ x | x > 0 }" work.
//! - Operands lose their brackets, so `sqrt(x)` renders `\sqrt{ x }`, but postfix operators keep
//!   them: `(n)!`.
//! - Scripts attach to whatever precedes them and don't combine: `x^2^3` is `x ^{ 2 } ^{ 3 }`.
//! - A blank line or `&` anywhere at the top level wraps the output in an aligned environment.
//! - Derivative variables can be plain letters or greek letters and keep their scripts, so
//!   `pp f x_i` renders `\frac{ \partial f }{ \partial x _{ i } }`.
//! - Nesting is limited to 64 levels of brackets, operators or chained scripts. Deeper input is
//!   [`ConvertError::NestingTooDeep`].
//!
//! ## Extending
//!
//! An [`AsciiMathToTex`] engine owns its own symbol table, so engines with different extra
//! symbols can coexist.
//!
//! ```
//! use asciimath_tex::{AsciiMathConfig, AsciiMathToTex};
//!
//! let config = AsciiMathConfig {
//!     extra_symbols: vec![("RRR".into(), r"\mathbb{R}^3".into())],
//!     preprocessing_rules: vec![(r"\bdeg\b".into(), "^@".into())],
//!     ..AsciiMathConfig::default()
//! };
//! let engine = AsciiMathToTex::new(config).unwrap();
//! assert_eq!(engine.convert("x in RRR"), r"x \in \mathbb{R}^3");
//! assert_eq!(engine.convert("90 deg"), r"90 ^{ \circ }");
//! ```
//!
//! For more control, build a [`SymbolTable`] by hand from [`ASCIIMATH_SYMBOLS`] and drive the
//! stages directly.
#![warn(missing_docs)]
mod error;
mod parse;
pub mod prefix_map;
mod preprocess;
mod render;
mod symbols;
mod tokenizer;
pub mod tree;

pub use error::{ConfigError, ConvertError, TrieError};
pub use parse::parse;
pub use preprocess::Preprocessor;
pub use render::render;
pub use symbols::{Category, Symbol, SymbolFlag, SymbolTable, ASCIIMATH_SYMBOLS};
pub use tokenizer::{tokenize, Position, Token, Tokenizer};

use lazy_static::lazy_static;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DISPLAY_STYLE: &str = r"\displaystyle ";

/// Options for an [`AsciiMathToTex`] engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case", default))]
pub struct AsciiMathConfig {
    /// Prefix output with `\displaystyle`
    pub display_mode: bool,
    /// `(keyword, template)` pairs added to the default symbols, later pairs winning
    ///
    /// A keyword that already exists keeps its parse behavior and only gets the new template.
    /// New keywords are operators if their template uses `$1` or `$2`, and constants otherwise.
    pub extra_symbols: Vec<(String, String)>,
    /// `(pattern, replacement)` regex rules applied in order before tokenizing
    pub preprocessing_rules: Vec<(String, String)>,
}

/// A configured converter
#[derive(Debug, Clone)]
pub struct AsciiMathToTex {
    display_mode: bool,
    symbols: SymbolTable,
    preprocessor: Preprocessor,
}

impl AsciiMathToTex {
    /// Build an engine, compiling its symbol table and preprocessing rules
    pub fn new(config: AsciiMathConfig) -> Result<Self, ConfigError> {
        let symbols = SymbolTable::with_extras(
            ASCIIMATH_SYMBOLS.iter().cloned(),
            config.extra_symbols,
        )?;
        let preprocessor = Preprocessor::new(config.preprocessing_rules)?;
        Ok(AsciiMathToTex {
            display_mode: config.display_mode,
            symbols,
            preprocessor,
        })
    }

    /// Convert asciimath to TeX, rendering any error as text
    pub fn convert(&self, inp: &str) -> String {
        match self.try_convert(inp) {
            Ok(tex) => tex,
            Err(err) => format!(r"\text{{{}}}", render::escape_text(&err.to_string())),
        }
    }

    /// Convert asciimath to TeX
    pub fn try_convert(&self, inp: &str) -> Result<String, ConvertError> {
        let inp = self.preprocessor.apply(inp);
        let tokens = tokenize(&inp, &self.symbols)?;
        let tree = parse(&tokens)?;
        let body = render(&tree);
        Ok(if self.display_mode {
            format!("{DISPLAY_STYLE}{body}")
        } else {
            body
        })
    }

    /// Tokenize input with this engine's symbols
    ///
    /// Preprocessing rules are not applied, see [`preprocess`][AsciiMathToTex::preprocess].
    pub fn tokenize<'a>(&'a self, inp: &'a str) -> Result<Vec<Token<'a>>, ConvertError> {
        tokenize(inp, &self.symbols)
    }

    /// Apply this engine's preprocessing rules
    pub fn preprocess<'a>(&self, inp: &'a str) -> std::borrow::Cow<'a, str> {
        self.preprocessor.apply(inp)
    }

    /// The symbol table this engine tokenizes with
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

lazy_static! {
    static ref DEFAULT_ENGINE: AsciiMathToTex = AsciiMathToTex::new(AsciiMathConfig::default())
        .expect("default symbols form a valid trie");
}

/// Convert asciimath to TeX with the default configuration
///
/// # Example
/// ```
/// assert_eq!(asciimath_tex::convert("abs(x)"), r"\left| x \right|");
/// ```
pub fn convert(inp: &str) -> String {
    DEFAULT_ENGINE.convert(inp)
}

#[cfg(test)]
mod tests {
    use super::{convert, AsciiMathConfig, AsciiMathToTex, ConfigError, ConvertError};

    #[test]
    fn display_mode() {
        let engine = AsciiMathToTex::new(AsciiMathConfig {
            display_mode: true,
            ..AsciiMathConfig::default()
        })
        .unwrap();
        assert_eq!(engine.convert("x"), r"\displaystyle x");
    }

    #[test]
    fn extras_stay_with_their_engine() {
        let engine = AsciiMathToTex::new(AsciiMathConfig {
            extra_symbols: vec![("alpha".into(), "a".into()), ("pair".into(), "($1, $2)".into())],
            ..AsciiMathConfig::default()
        })
        .unwrap();
        assert_eq!(engine.convert("alpha pair x y"), "a (x, y)");
        assert_eq!(convert("alpha"), r"\alpha");
    }

    #[test]
    fn invalid_rule() {
        let err = AsciiMathToTex::new(AsciiMathConfig {
            preprocessing_rules: vec![("[".into(), "".into())],
            ..AsciiMathConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRule { index: 0, .. }));
    }

    #[test]
    fn errors_render_as_text() {
        let err = ConvertError::UnhandledToken {
            value: "_x".into(),
            position: crate::Position::START,
        };
        assert_eq!(
            format!(r"\text{{{}}}", crate::render::escape_text(&err.to_string())),
            r#"\text{no parse rule for token "\_x" at 1:1}"#
        );
    }
}
