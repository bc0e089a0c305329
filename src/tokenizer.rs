use crate::error::ConvertError;
use crate::prefix_map::PrefixMap;
use crate::symbols::{Category, Symbol, SymbolFlag};
use std::borrow::Cow;
use std::fmt;
use std::iter::FusedIterator;

/// The template of the row break produced by a blank line
pub(crate) const ROW_BREAK: &str = r"\\";

/// How many stalled attempts per input character the tokenizer allows before giving up
const BUDGET_FACTOR: usize = 4;

/// A one-based line and column, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// The line, starting at 1
    pub line: usize,
    /// The column, starting at 1
    pub column: usize,
}

impl Position {
    /// The position of the first character
    pub const START: Position = Position { line: 1, column: 1 };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A token of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The matched source text
    pub value: &'a str,
    /// The TeX this token renders to
    pub template: Cow<'a, str>,
    /// The category the parser dispatches on
    pub category: Category,
    /// Whether this token came from the symbol table
    pub keyword: bool,
    /// The flag of the matched symbol
    pub flag: Option<SymbolFlag>,
    /// Where the token starts
    pub position: Position,
}

impl<'a> Token<'a> {
    fn literal(value: &'a str, category: Category, position: Position) -> Self {
        Token {
            value,
            template: Cow::Borrowed(value),
            category,
            keyword: false,
            flag: None,
            position,
        }
    }
}

fn number_len(inp: &str) -> usize {
    let mut seen_decimal = false;
    let len = inp
        .char_indices()
        .find(|(_, c)| match c {
            '.' if !seen_decimal => {
                seen_decimal = true;
                false
            }
            '0'..='9' => false,
            _ => true,
        })
        .map(|(i, _)| i)
        .unwrap_or(inp.len());
    if len > 1 || (!seen_decimal && len > 0) {
        len
    } else {
        0
    }
}

fn is_inline_space(chr: char) -> bool {
    chr.is_whitespace() && chr != '\n'
}

/// Byte length of the text inside a parenthesis that opens inp, and of the whole group
fn paren_group_len(inp: &str) -> (usize, usize) {
    let mut depth = 0;
    for (ind, chr) in inp.char_indices() {
        match chr {
            '(' => depth += 1,
            ')' if depth == 1 => return (ind - 1, ind + 1),
            ')' => depth -= 1,
            _ => {}
        }
    }
    (inp.len() - 1, inp.len())
}

/// A tokenizer that splits input on the longest keyword of a symbol table
///
/// Text that isn't a keyword, number or quoted string is grouped into runs that stop at
/// whitespace or wherever a keyword starts. Two or more newlines produce a row break.
///
/// # Example
/// ```
/// use asciimath_tex::{Category, SymbolTable, Tokenizer};
///
/// let table = SymbolTable::asciimath().unwrap();
/// let res: Vec<_> = Tokenizer::with_symbols("xy^2", &table)
///     .map(|token| token.map(|token| (token.value, token.category)))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(
///     res,
///     [("xy", Category::Str), ("^", Category::Script), ("2", Category::Number)],
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a, 'b, T> {
    remaining: &'a str,
    token_map: &'b T,
    position: Position,
    pending: Option<Token<'a>>,
    stalls: usize,
    budget: usize,
}

impl<'a, 'b, T> Tokenizer<'a, 'b, T> {
    /// Create a new tokenizer over a symbol table
    pub fn with_symbols(inp: &'a str, token_map: &'b T) -> Self {
        Tokenizer {
            remaining: inp,
            token_map,
            position: Position::START,
            pending: None,
            stalls: 0,
            budget: BUDGET_FACTOR * (inp.chars().count() + 1),
        }
    }

    fn take(&mut self, len: usize) -> &'a str {
        let (pref, rem) = self.remaining.split_at(len);
        for chr in pref.chars() {
            if chr == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        self.remaining = rem;
        pref
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        let len = self
            .remaining
            .find(|chr| !pred(chr))
            .unwrap_or(self.remaining.len());
        self.take(len);
    }

    fn blank_line(&mut self) -> Option<Token<'a>> {
        let len = self
            .remaining
            .find(|chr: char| !chr.is_whitespace())?;
        if self.remaining[..len].matches('\n').count() < 2 {
            return None;
        }
        let position = self.position;
        let value = self.take(len);
        Some(Token {
            value,
            template: Cow::Borrowed(ROW_BREAK),
            category: Category::AlignMark,
            keyword: false,
            flag: None,
            position,
        })
    }

    fn raw_text(&mut self) -> Token<'a> {
        self.skip_while(is_inline_space);
        let position = self.position;
        if self.remaining.starts_with('(') {
            let rem = self.remaining;
            let (inner, total) = paren_group_len(rem);
            let value = &rem[1..1 + inner];
            self.take(total);
            Token::literal(value, Category::Text, position)
        } else {
            let len = self
                .remaining
                .find(char::is_whitespace)
                .unwrap_or(self.remaining.len());
            Token::literal(self.take(len), Category::Text, position)
        }
    }

    fn quoted_literal(&mut self) -> Token<'a> {
        self.skip_while(is_inline_space);
        if !self.remaining.starts_with('"') {
            return self.raw_text();
        }
        let position = self.position;
        let (value, total) = quoted_len(self.remaining);
        self.take(total);
        Token::literal(value, Category::Text, position)
    }

    fn color_spec(&mut self) -> Token<'a> {
        self.skip_while(is_inline_space);
        let bracketed = self.remaining.starts_with(['(', '[', '{']);
        if bracketed {
            self.take(1);
        }
        let position = self.position;
        let len = self
            .remaining
            .find(|chr: char| chr != '#' && !chr.is_ascii_alphanumeric())
            .unwrap_or(self.remaining.len());
        let value = self.take(len);
        if bracketed && self.remaining.starts_with([')', ']', '}']) {
            self.take(1);
        }
        Token::literal(value, Category::Text, position)
    }

    fn argument(&mut self, flag: SymbolFlag) -> Option<Token<'a>> {
        match flag {
            SymbolFlag::RawText => Some(self.raw_text()),
            SymbolFlag::TexLiteral | SymbolFlag::HspaceLiteral => Some(self.quoted_literal()),
            SymbolFlag::ColorSpec => Some(self.color_spec()),
            SymbolFlag::RowRule => None,
        }
    }
}

/// The text between a leading quote and the next quote, and the byte length consumed
///
/// An unterminated quote runs to the end of input.
fn quoted_len(inp: &str) -> (&str, usize) {
    match inp[1..].find('"') {
        // NOTE off by 1 because we skipped the first byte
        Some(len) => (&inp[1..len + 1], len + 2),
        None => (&inp[1..], inp.len()),
    }
}

impl<'a, 'b: 'a, T> Tokenizer<'a, 'b, T>
where
    T: PrefixMap<Symbol>,
{
    fn next_token(&mut self) -> Option<Token<'a>> {
        let position = self.position;
        let token_map = self.token_map;
        // keyword
        if let Some((len, symbol)) = token_map.get_longest_prefix(self.remaining) {
            if len > 0 && self.remaining.is_char_boundary(len) {
                let value = self.take(len);
                let token = Token {
                    value,
                    template: Cow::Borrowed(symbol.template.as_ref()),
                    category: symbol.category,
                    keyword: true,
                    flag: symbol.flag,
                    position,
                };
                if let Some(flag) = symbol.flag {
                    self.pending = self.argument(flag);
                }
                return Some(token);
            }
        }
        // number
        let len = number_len(self.remaining);
        if len > 0 {
            return Some(Token::literal(self.take(len), Category::Number, position));
        }
        // text
        if self.remaining.starts_with('"') {
            let (text, total) = quoted_len(self.remaining);
            self.take(total);
            return Some(Token {
                value: text,
                template: Cow::Owned(format!(r"\text{{{text}}}")),
                category: Category::Text,
                keyword: false,
                flag: None,
                position,
            });
        }
        // run of anything else
        let len = self
            .remaining
            .char_indices()
            .find(|&(i, c)| c.is_whitespace() || token_map.starts_keyword(&self.remaining[i..]))
            .map(|(i, _)| i)
            .unwrap_or(self.remaining.len());
        if len == 0 {
            None
        } else {
            Some(Token::literal(self.take(len), Category::Str, position))
        }
    }
}

impl<'a, 'b: 'a, T> Iterator for Tokenizer<'a, 'b, T>
where
    T: PrefixMap<Symbol>,
{
    type Item = Result<Token<'a>, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(Ok(token));
        }
        loop {
            if let Some(token) = self.blank_line() {
                return Some(Ok(token));
            }
            self.skip_while(char::is_whitespace);
            if self.remaining.is_empty() {
                return None;
            }
            let before = self.remaining.len();
            match self.next_token() {
                Some(token) if self.remaining.len() < before => return Some(Ok(token)),
                _ => {
                    self.stalls += 1;
                    if self.stalls > self.budget {
                        self.remaining = "";
                        return Some(Err(ConvertError::Tokenizer {
                            position: self.position,
                            budget: self.budget,
                        }));
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (
            usize::from(self.pending.is_some()),
            Some(self.remaining.len() + 1),
        )
    }
}

impl<'a, 'b: 'a, T> FusedIterator for Tokenizer<'a, 'b, T> where T: PrefixMap<Symbol> {}

/// Tokenize a whole input
pub fn tokenize<'a, 'b: 'a, T>(inp: &'a str, token_map: &'b T) -> Result<Vec<Token<'a>>, ConvertError>
where
    T: PrefixMap<Symbol>,
{
    Tokenizer::with_symbols(inp, token_map).collect()
}
