//! The module containing all of the structures that define a parsed representation of asciimath
//!
//! - [`Node`] - A single node, the closed set of shapes the parser produces
//! - [`Const`] - A leaf that renders to a fixed template
//! - [`ParamOne`] - A template with one argument, like `\sqrt{ $1 }`
//! - [`ParamTwo`] - A template with two arguments, like `\frac{ $1 }{ $2 }`
//! - [`Matrix`] - A delimited table of cells with optional column dividers
//!
//! Templates and source text are kept as [`Cow`]s so that tokens borrowed from the input or the
//! symbol table don't need to be copied. Every node owns its children outright.
use std::borrow::Cow;

/// A leaf
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Const<'a> {
    /// The TeX this renders to
    pub template: Cow<'a, str>,
    /// The source text this came from
    pub source: Cow<'a, str>,
}

impl<'a> Const<'a> {
    /// Create a leaf from its template and source
    pub fn new<T, S>(template: T, source: S) -> Self
    where
        T: Into<Cow<'a, str>>,
        S: Into<Cow<'a, str>>,
    {
        Const {
            template: template.into(),
            source: source.into(),
        }
    }

    /// Create a leaf whose template is its source
    pub fn verbatim(source: &'a str) -> Self {
        Const::new(source, source)
    }
}

/// A template with a single `$1` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamOne<'a> {
    /// The template
    pub template: Cow<'a, str>,
    arg: Box<Node<'a>>,
}

impl<'a> ParamOne<'a> {
    /// Create a one argument node
    pub fn new<T, A>(template: T, arg: A) -> Self
    where
        T: Into<Cow<'a, str>>,
        A: Into<Node<'a>>,
    {
        ParamOne {
            template: template.into(),
            arg: Box::new(arg.into()),
        }
    }

    /// The argument
    pub fn arg(&self) -> &Node<'a> {
        &self.arg
    }
}

/// A template with `$1` and `$2` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamTwo<'a> {
    /// The template
    pub template: Cow<'a, str>,
    first: Box<Node<'a>>,
    second: Box<Node<'a>>,
}

impl<'a> ParamTwo<'a> {
    /// Create a two argument node
    pub fn new<T, F, S>(template: T, first: F, second: S) -> Self
    where
        T: Into<Cow<'a, str>>,
        F: Into<Node<'a>>,
        S: Into<Node<'a>>,
    {
        ParamTwo {
            template: template.into(),
            first: Box::new(first.into()),
            second: Box::new(second.into()),
        }
    }

    /// The argument substituted for `$1`
    pub fn first(&self) -> &Node<'a> {
        &self.first
    }

    /// The argument substituted for `$2`
    pub fn second(&self) -> &Node<'a> {
        &self.second
    }
}

/// How cells of a matrix are aligned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Left aligned, as for cases
    Left,
    /// Centered
    #[default]
    Center,
}

impl Alignment {
    /// The column specifier letter
    pub fn letter(self) -> char {
        match self {
            Alignment::Left => 'l',
            Alignment::Center => 'c',
        }
    }
}

/// A matrix e.g. "[a, b; c, d]"
///
/// Rows can be ragged. The matrix is as wide as its widest row, and dividers are column
/// boundaries where a vertical rule is drawn, `0` being before the first column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<'a> {
    /// The left delimiter markup
    pub left: Cow<'a, str>,
    rows: Vec<Vec<Node<'a>>>,
    /// The right delimiter markup
    pub right: Cow<'a, str>,
    /// Cell alignment
    pub alignment: Alignment,
    dividers: Vec<usize>,
}

impl<'a> Matrix<'a> {
    /// Create a new matrix
    ///
    /// Dividers are sorted and deduplicated.
    ///
    /// # Panics
    /// When a divider lies beyond the widest row.
    pub fn new<L, R, D>(
        left: L,
        rows: Vec<Vec<Node<'a>>>,
        right: R,
        alignment: Alignment,
        dividers: D,
    ) -> Self
    where
        L: Into<Cow<'a, str>>,
        R: Into<Cow<'a, str>>,
        D: IntoIterator<Item = usize>,
    {
        let mut dividers: Vec<_> = dividers.into_iter().collect();
        dividers.sort_unstable();
        dividers.dedup();
        let matrix = Matrix {
            left: left.into(),
            rows,
            right: right.into(),
            alignment,
            dividers,
        };
        assert!(
            matrix.dividers.iter().all(|&div| div <= matrix.num_cols()),
            "divider beyond the widest row"
        );
        matrix
    }

    /// The number of columns, the length of the widest row
    pub fn num_cols(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The rows from top to bottom
    pub fn rows(&self) -> &[Vec<Node<'a>>] {
        &self.rows
    }

    /// The sorted column boundaries that get a vertical rule
    pub fn dividers(&self) -> &[usize] {
        &self.dividers
    }

    /// The array column specifier, e.g. `cc|c`
    ///
    /// This always declares exactly [`num_cols`][Matrix::num_cols] columns.
    pub fn column_spec(&self) -> String {
        let num_cols = self.num_cols();
        let mut dividers = self.dividers.iter().peekable();
        let mut spec = String::with_capacity(num_cols + self.dividers.len());
        for col in 0..=num_cols {
            if dividers.next_if(|&&div| div == col).is_some() {
                spec.push('|');
            }
            if col < num_cols {
                spec.push(self.alignment.letter());
            }
        }
        spec
    }
}

/// A node of the parse tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    /// A leaf
    Const(Const<'a>),
    /// Siblings without delimiters of their own
    Flat(Vec<Node<'a>>),
    /// A one argument template
    ParamOne(ParamOne<'a>),
    /// A two argument template
    ParamTwo(ParamTwo<'a>),
    /// A matrix
    Matrix(Matrix<'a>),
    /// The top level of a parse
    Root(Vec<Node<'a>>),
}

impl<'a> Node<'a> {
    /// A leaf that renders to nothing
    ///
    /// This stands in for missing arguments, e.g. "sqrt" by itself.
    pub fn empty() -> Self {
        Node::Const(Const::default())
    }

    /// Whether this is a leaf that renders to nothing
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Const(leaf) if leaf.template.is_empty())
    }
}

impl Default for Node<'_> {
    fn default() -> Self {
        Node::empty()
    }
}

// macro to derive from for component types
macro_rules! node_from {
    ($from:ty => $to:ident) => {
        impl<'a> From<$from> for Node<'a> {
            fn from(inp: $from) -> Self {
                Node::$to(inp)
            }
        }
    };
}

node_from!(Const<'a> => Const);
node_from!(ParamOne<'a> => ParamOne);
node_from!(ParamTwo<'a> => ParamTwo);
node_from!(Matrix<'a> => Matrix);
