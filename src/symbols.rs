//! The keyword table that drives tokenizing
//!
//! Every keyword maps to a [`Symbol`]: the TeX template it renders to, the [`Category`] the
//! parser dispatches on, and an optional [`SymbolFlag`] asking the tokenizer to read a delimited
//! argument right after the keyword. Templates of operators reference their arguments as `$1` and
//! `$2`.
use crate::error::TrieError;
use crate::prefix_map::{AlphabetTrie, PrefixMap};
use fnv::FnvHashMap;
use std::borrow::Cow;

/// The role a token plays for the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A symbol rendered as is, e.g. `infty`
    Const,
    /// A letter symbol that can name a variable, e.g. `theta`
    Letter,
    /// Text, either quoted or the argument of a text-like keyword
    Text,
    /// A number literal
    Number,
    /// A run of characters that aren't keywords
    Str,
    /// An opening bracket
    LeftParen,
    /// A closing bracket
    RightParen,
    /// A bar that can open, close, or separate: `|` and `||`
    BarParen,
    /// A cell or row separator, `,` and `;`
    Split,
    /// An alignment point, `&` or a blank line
    AlignMark,
    /// A superscript `^` or subscript `_`
    Script,
    /// A `+` or `-` that may be a sign
    Sign,
    /// An operator taking one following argument, e.g. `sqrt`
    PrefixUnary,
    /// An operator taking two following arguments, e.g. `frac`
    PrefixBinary,
    /// An operator between two arguments, e.g. `/`
    Infix,
    /// An operator after its argument, e.g. `!`
    Postfix,
    /// An operator with an optional superscript and subscript, e.g. `xrarr`
    OptionalScripts,
    /// A derivative operator, e.g. `pp`
    Derivative,
    /// A keyword without parse semantics
    None,
}

impl Category {
    /// Whether a token of this category expects an operand after it
    ///
    /// A sign right after such a token is unary.
    pub fn takes_operand(self) -> bool {
        matches!(
            self,
            Category::Script
                | Category::PrefixUnary
                | Category::PrefixBinary
                | Category::Infix
                | Category::OptionalScripts
                | Category::Derivative
        )
    }
}

/// A delimited argument the tokenizer reads right after a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolFlag {
    /// Parenthesized text up to the matching `)`, or text up to the next whitespace
    RawText,
    /// A color name or hex code, optionally in brackets
    ColorSpec,
    /// A double quoted TeX literal
    TexLiteral,
    /// A double quoted length
    HspaceLiteral,
    /// A rule that belongs to the first row of a following matrix
    RowRule,
}

/// What a keyword turns into
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// The TeX template
    pub template: Cow<'static, str>,
    /// The parser category
    pub category: Category,
    /// A delimited argument to read after the keyword
    pub flag: Option<SymbolFlag>,
}

impl Symbol {
    /// Create a symbol from a static template
    pub const fn new(category: Category, template: &'static str, flag: Option<SymbolFlag>) -> Self {
        Symbol {
            template: Cow::Borrowed(template),
            category,
            flag,
        }
    }

    /// Create a caller defined symbol
    ///
    /// The category is inferred from the placeholders in the template: `$2` makes a
    /// [binary][Category::PrefixBinary] operator, `$1` a [unary][Category::PrefixUnary] one,
    /// and anything else a [constant][Category::Const].
    pub fn custom<T: Into<String>>(template: T) -> Self {
        let template = template.into();
        let category = if template.contains("$2") {
            Category::PrefixBinary
        } else if template.contains("$1") {
            Category::PrefixUnary
        } else {
            Category::Const
        };
        Symbol {
            template: template.into(),
            category,
            flag: None,
        }
    }
}

macro_rules! flag {
    () => {
        None
    };
    ($flag:ident) => {
        Some(SymbolFlag::$flag)
    };
}

macro_rules! symbols {
    ($($category:ident => $($key:literal : $tex:literal $([$flag:ident])?),+;)+) => {
        [
            $(
                $(
                    ($key, Symbol::new(Category::$category, $tex, flag!($($flag)?))),
                )+
            )+
        ]
    };
}

/// The symbols of standard asciimath with TeX templates
///
/// This is exported to enable building alternate tables, e.g. by filtering or extending it
/// before handing it to [`SymbolTable::new`].
pub static ASCIIMATH_SYMBOLS: &[(&str, Symbol)] = &symbols!(
    Script => "^": "^{ $1 }", "_": "_{ $1 }";
    Split => ",": ",", ";": ";";
    AlignMark => "&": "&";
    Sign => "+": "+", "-": "-";
    Infix => "/": r"\frac{ $1 }{ $2 }", "choose": r"\binom{ $1 }{ $2 }";
    Postfix => "!": "$1 !", "!!": "$1 !!";
    // greek
    Letter => "alpha": r"\alpha", "beta": r"\beta", "chi": r"\chi", "delta": r"\delta",
        "Delta": r"\Delta", "epsi": r"\epsilon", "epsilon": r"\epsilon",
        "varepsilon": r"\varepsilon", "eta": r"\eta", "gamma": r"\gamma", "Gamma": r"\Gamma",
        "iota": r"\iota", "kappa": r"\kappa", "lambda": r"\lambda", "Lambda": r"\Lambda",
        "lamda": r"\lambda", "Lamda": r"\Lambda", "mu": r"\mu", "nu": r"\nu",
        "omega": r"\omega", "Omega": r"\Omega", "phi": r"\phi", "varphi": r"\varphi",
        "Phi": r"\Phi", "pi": r"\pi", "Pi": r"\Pi", "psi": r"\psi", "Psi": r"\Psi",
        "rho": r"\rho", "sigma": r"\sigma", "Sigma": r"\Sigma", "tau": r"\tau",
        "theta": r"\theta", "vartheta": r"\vartheta", "Theta": r"\Theta",
        "upsilon": r"\upsilon", "xi": r"\xi", "Xi": r"\Xi", "zeta": r"\zeta";
    // operations
    Const => "*": r"\cdot", "cdot": r"\cdot", "**": r"\ast", "ast": r"\ast", "***": r"\star",
        "star": r"\star", "//": "/", "\\\\": r"\backslash", "backslash": r"\backslash",
        "setminus": r"\setminus", "xx": r"\times", "times": r"\times", "|><": r"\ltimes",
        "ltimes": r"\ltimes", "><|": r"\rtimes", "rtimes": r"\rtimes", "|><|": r"\bowtie",
        "bowtie": r"\bowtie", "-:": r"\div", "div": r"\div", "divide": r"\div", "@": r"\circ",
        "circ": r"\circ", "o+": r"\oplus", "oplus": r"\oplus", "ox": r"\otimes",
        "otimes": r"\otimes", "o.": r"\odot", "odot": r"\odot", "sum": r"\sum",
        "prod": r"\prod", "^^": r"\wedge", "wedge": r"\wedge", "^^^": r"\bigwedge",
        "bigwedge": r"\bigwedge", "vv": r"\vee", "vee": r"\vee", "vvv": r"\bigvee",
        "bigvee": r"\bigvee", "nn": r"\cap", "cap": r"\cap", "nnn": r"\bigcap",
        "bigcap": r"\bigcap", "uu": r"\cup", "cup": r"\cup", "uuu": r"\bigcup",
        "bigcup": r"\bigcup";
    // relations
    Const => "=": "=", "!=": r"\neq", "ne": r"\neq", ":=": ":=", "<": "<", "lt": "<",
        "<=": r"\leq", "le": r"\leq", "lt=": r"\leq", "leq": r"\leq", ">": ">", "gt": ">",
        "mlt": r"\ll", "ll": r"\ll", ">=": r"\geq", "ge": r"\geq", "gt=": r"\geq",
        "geq": r"\geq", "mgt": r"\gg", "gg": r"\gg", "-<": r"\prec", "prec": r"\prec",
        "-lt": r"\prec", ">-": r"\succ", "succ": r"\succ", "-<=": r"\preceq",
        "preceq": r"\preceq", ">-=": r"\succeq", "succeq": r"\succeq", "in": r"\in",
        "!in": r"\notin", "notin": r"\notin", "sub": r"\subset", "subset": r"\subset",
        "sup": r"\supset", "supset": r"\supset", "sube": r"\subseteq",
        "subseteq": r"\subseteq", "supe": r"\supseteq", "supseteq": r"\supseteq",
        "-=": r"\equiv", "equiv": r"\equiv", "~=": r"\cong", "cong": r"\cong",
        "~~": r"\approx", "approx": r"\approx", "~": r"\sim", "sim": r"\sim",
        "prop": r"\propto", "propto": r"\propto";
    // logical
    Const => "and": r"\text{ and }", "or": r"\text{ or }", "not": r"\neg", "neg": r"\neg",
        "=>": r"\Rightarrow", "implies": r"\Rightarrow", "if": r"\text{ if }",
        "<=>": r"\Leftrightarrow", "iff": r"\Leftrightarrow", "AA": r"\forall",
        "forall": r"\forall", "EE": r"\exists", "exists": r"\exists", "_|_": r"\bot",
        "bot": r"\bot", "TT": r"\top", "top": r"\top", "|--": r"\vdash", "vdash": r"\vdash",
        "|==": r"\models", "models": r"\models";
    // misc
    Const => "int": r"\int", "iint": r"\iint", "oint": r"\oint", "del": r"\partial",
        "partial": r"\partial", "grad": r"\nabla", "nabla": r"\nabla", "+-": r"\pm",
        "pm": r"\pm", "-+": r"\mp", "mp": r"\mp", "O/": r"\emptyset",
        "emptyset": r"\emptyset", "oo": r"\infty", "infty": r"\infty", "aleph": r"\aleph",
        "...": r"\ldots", "ldots": r"\ldots", ":.": r"\therefore", "therefore": r"\therefore",
        ":'": r"\because", "because": r"\because", "/_": r"\angle", "angle": r"\angle",
        "/_\\": r"\triangle", "triangle": r"\triangle", "'": "'", "prime": r"\prime",
        "\\ ": r"\ ", "frown": r"\frown", "quad": r"\quad", "qquad": r"\qquad",
        "cdots": r"\cdots", "vdots": r"\vdots", "ddots": r"\ddots", "diamond": r"\diamond",
        "square": r"\square", "|__": r"\lfloor", "lfloor": r"\lfloor", "__|": r"\rfloor",
        "rfloor": r"\rfloor", "|~": r"\lceil", "lceiling": r"\lceil", "~|": r"\rceil",
        "rceiling": r"\rceil", "CC": r"\mathbb{C}", "NN": r"\mathbb{N}", "QQ": r"\mathbb{Q}",
        "RR": r"\mathbb{R}", "ZZ": r"\mathbb{Z}", "hline": r"\hline" [RowRule];
    // underover and functions
    Const => "lim": r"\lim", "Lim": r"\operatorname{Lim}", "dim": r"\dim", "mod": r"\bmod",
        "lub": r"\operatorname{lub}", "glb": r"\operatorname{glb}", "min": r"\min",
        "max": r"\max", "sin": r"\sin", "cos": r"\cos", "tan": r"\tan", "sinh": r"\sinh",
        "cosh": r"\cosh", "tanh": r"\tanh", "cot": r"\cot", "sec": r"\sec", "csc": r"\csc",
        "arcsin": r"\arcsin", "arccos": r"\arccos", "arctan": r"\arctan", "coth": r"\coth",
        "sech": r"\operatorname{sech}", "csch": r"\operatorname{csch}", "exp": r"\exp",
        "log": r"\log", "ln": r"\ln", "det": r"\det", "gcd": r"\gcd",
        "lcm": r"\operatorname{lcm}";
    // arrows
    Const => "uarr": r"\uparrow", "uparrow": r"\uparrow", "darr": r"\downarrow",
        "downarrow": r"\downarrow", "rarr": r"\rightarrow", "rightarrow": r"\rightarrow",
        "->": r"\to", "to": r"\to", ">->": r"\rightarrowtail",
        "rightarrowtail": r"\rightarrowtail", "->>": r"\twoheadrightarrow",
        "twoheadrightarrow": r"\twoheadrightarrow", "|->": r"\mapsto", "mapsto": r"\mapsto",
        "larr": r"\leftarrow", "leftarrow": r"\leftarrow", "harr": r"\leftrightarrow",
        "leftrightarrow": r"\leftrightarrow", "rArr": r"\Rightarrow",
        "Rightarrow": r"\Rightarrow", "lArr": r"\Leftarrow", "Leftarrow": r"\Leftarrow",
        "hArr": r"\Leftrightarrow", "Leftrightarrow": r"\Leftrightarrow";
    OptionalScripts => "xrarr": r"\xrightarrow[ $2 ]{ $1 }",
        "xlarr": r"\xleftarrow[ $2 ]{ $1 }", "xharr": r"\xleftrightarrow[ $2 ]{ $1 }";
    Derivative => "pp": r"\partial", "dd": r"\mathrm{d}";
    // accents, fonts and text
    PrefixUnary => "sqrt": r"\sqrt{ $1 }", "abs": r"\left| $1 \right|",
        "norm": r"\left\| $1 \right\|", "floor": r"\left\lfloor $1 \right\rfloor",
        "ceil": r"\left\lceil $1 \right\rceil", "hat": r"\hat{ $1 }", "bar": r"\overline{ $1 }",
        "overline": r"\overline{ $1 }", "vec": r"\vec{ $1 }", "dot": r"\dot{ $1 }",
        "ddot": r"\ddot{ $1 }", "tilde": r"\tilde{ $1 }", "ul": r"\underline{ $1 }",
        "underline": r"\underline{ $1 }", "ubrace": r"\underbrace{ $1 }",
        "underbrace": r"\underbrace{ $1 }", "obrace": r"\overbrace{ $1 }",
        "overbrace": r"\overbrace{ $1 }", "cancel": r"\cancel{ $1 }", "bb": r"\mathbf{ $1 }",
        "mathbf": r"\mathbf{ $1 }", "sf": r"\mathsf{ $1 }", "mathsf": r"\mathsf{ $1 }",
        "bbb": r"\mathbb{ $1 }", "mathbb": r"\mathbb{ $1 }", "cc": r"\mathcal{ $1 }",
        "mathcal": r"\mathcal{ $1 }", "tt": r"\mathtt{ $1 }", "mathtt": r"\mathtt{ $1 }",
        "fr": r"\mathfrak{ $1 }", "mathfrak": r"\mathfrak{ $1 }",
        "text": r"\text{$1}" [RawText], "mbox": r"\mbox{$1}" [RawText],
        "op": r"\operatorname{$1}" [RawText], "tex": "$1" [TexLiteral],
        "hspace": r"\hspace{$1}" [HspaceLiteral];
    PrefixBinary => "frac": r"\frac{ $1 }{ $2 }", "root": r"\sqrt[ $1 ]{ $2 }",
        "stackrel": r"\stackrel{ $1 }{ $2 }", "overset": r"\overset{ $1 }{ $2 }",
        "underset": r"\underset{ $1 }{ $2 }", "color": r"{ \color{$1} $2 }" [ColorSpec];
    // brackets
    LeftParen => "(": r"\left(", "[": r"\left[", "{": r"\left\lbrace", "(:": r"\left\langle",
        "<<": r"\left\langle", "langle": r"\left\langle", "{:": r"\left.", "|:": r"\left|";
    RightParen => ")": r"\right)", "]": r"\right]", "}": r"\right\rbrace",
        ":)": r"\right\rangle", ">>": r"\right\rangle", "rangle": r"\right\rangle",
        ":}": r"\right.", ":|": r"\right|";
    BarParen => "|": "|", "||": r"\|";
    // defined identifiers
    Const => "dx": "dx", "dy": "dy", "dz": "dz", "dt": "dt";
);

/// A keyword table ready for tokenizing
///
/// The table owns a trie derived from its own keywords, so every lookup the tokenizer makes stays
/// inside the trie's alphabet.
///
/// # Example
/// ```
/// use asciimath_tex::{SymbolTable, ASCIIMATH_SYMBOLS};
///
/// let table = SymbolTable::with_extras(
///     ASCIIMATH_SYMBOLS.iter().cloned(),
///     [("RRR", r"\mathbb{R}^3")],
/// )
/// .unwrap();
/// assert_eq!(table.get("RRR").unwrap().template, r"\mathbb{R}^3");
/// ```
#[derive(Debug, Clone)]
pub struct SymbolTable {
    trie: AlphabetTrie<Symbol>,
}

impl SymbolTable {
    /// Create a table from keyword entries, later entries replacing earlier ones
    pub fn new<I, K>(entries: I) -> Result<Self, TrieError>
    where
        I: IntoIterator<Item = (K, Symbol)>,
        K: AsRef<str>,
    {
        Ok(SymbolTable {
            trie: AlphabetTrie::from_entries(entries)?,
        })
    }

    /// Create a table from base entries and caller supplied `(keyword, template)` pairs
    ///
    /// Extras are merged in order. An extra that names an existing keyword replaces its template
    /// but keeps its category and flag, otherwise its category comes from [`Symbol::custom`].
    pub fn with_extras<I, K, E, S, T>(base: I, extras: E) -> Result<Self, TrieError>
    where
        I: IntoIterator<Item = (K, Symbol)>,
        K: AsRef<str>,
        E: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<String>,
    {
        let mut entries: Vec<(String, Symbol)> = base
            .into_iter()
            .map(|(key, symbol)| (key.as_ref().to_owned(), symbol))
            .collect();
        let mut index: FnvHashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(ind, (key, _))| (key.clone(), ind))
            .collect();
        for (key, template) in extras {
            let key = key.as_ref();
            match index.get(key) {
                Some(&ind) => entries[ind].1.template = Cow::Owned(template.into()),
                None => {
                    index.insert(key.to_owned(), entries.len());
                    entries.push((key.to_owned(), Symbol::custom(template)));
                }
            }
        }
        Self::new(entries)
    }

    /// The standard asciimath table
    pub fn asciimath() -> Result<Self, TrieError> {
        Self::new(ASCIIMATH_SYMBOLS.iter().cloned())
    }

    /// Get the symbol for exactly keyword
    pub fn get(&self, keyword: &str) -> Option<&Symbol> {
        self.trie.get(keyword)
    }
}

impl PrefixMap<Symbol> for SymbolTable {
    fn get_longest_prefix<P: AsRef<str>>(&self, inp: P) -> Option<(usize, &Symbol)> {
        self.trie.get_longest_prefix(inp)
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Symbol, SymbolFlag, SymbolTable, ASCIIMATH_SYMBOLS};
    use crate::prefix_map::PrefixMap;

    #[test]
    fn default_table_builds() {
        let table = SymbolTable::asciimath().unwrap();
        assert_eq!(table.get("alpha").unwrap().template, r"\alpha");
        assert_eq!(table.get("hline").unwrap().flag, Some(SymbolFlag::RowRule));
        assert_eq!(table.get("|").unwrap().category, Category::BarParen);
        assert_eq!(table.get("theta").unwrap().category, Category::Letter);
        assert_eq!(table.get("in").unwrap().category, Category::Const);
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = ASCIIMATH_SYMBOLS.iter().map(|(key, _)| *key).collect();
        keys.sort_unstable();
        let len = keys.len();
        keys.dedup();
        assert_eq!(keys.len(), len);
    }

    #[test]
    fn longest_keyword_wins() {
        let table = SymbolTable::asciimath().unwrap();
        let (len, symbol) = table.get_longest_prefix("<=>x").unwrap();
        assert_eq!(len, 3);
        assert_eq!(symbol.template, r"\Leftrightarrow");
        assert!(table.starts_keyword("sqrt"));
        assert!(!table.starts_keyword("q"));
    }

    #[test]
    fn custom_categories() {
        assert_eq!(Symbol::custom(r"\mathrm{d}").category, Category::Const);
        assert_eq!(Symbol::custom(r"\bar{$1}").category, Category::PrefixUnary);
        assert_eq!(
            Symbol::custom(r"\frac{$1}{$2}").category,
            Category::PrefixBinary
        );
    }

    #[test]
    fn extras_override_templates_only() {
        let table = SymbolTable::with_extras(
            ASCIIMATH_SYMBOLS.iter().cloned(),
            [
                ("abs", r"\lvert $1 \rvert"),
                ("ee", r"\mathrm{e}"),
                ("ee", r"\operatorname{e}"),
            ],
        )
        .unwrap();
        let abs = table.get("abs").unwrap();
        assert_eq!(abs.category, Category::PrefixUnary);
        assert_eq!(abs.template, r"\lvert $1 \rvert");
        assert_eq!(table.get("ee").unwrap().template, r"\operatorname{e}");
    }

    #[test]
    fn extras_extend_alphabet() {
        let table =
            SymbolTable::with_extras(ASCIIMATH_SYMBOLS.iter().cloned(), [("√", r"\surd")])
                .unwrap();
        assert_eq!(table.get_longest_prefix("√x").map(|(len, _)| len), Some(3));
    }
}
