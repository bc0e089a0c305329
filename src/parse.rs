//! Recursive descent over a token slice
//!
//! The parser walks tokens left to right. Prefix operators pull their operands by walking again,
//! and after every top level walk the parser looks for followers (scripts, infix and postfix
//! operators) that attach to what it just built. Brackets are matched by scanning ahead, which
//! also decides whether a bracketed region is a group or a matrix.
use crate::error::{ConvertError, UnmatchedParen};
use crate::symbols::{Category, SymbolFlag};
use crate::tokenizer::Token;
use crate::tree::{Alignment, Const, Matrix, Node, ParamOne, ParamTwo};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::mem;

const FRACTION: &str = r"\frac{ $1 }{ $2 }";
const UNMATCHED_OPEN: &str = r"\left.";
const UNMATCHED_CLOSE: &str = r"\right.";

/// How deep walks and follower chains may nest before parsing gives up
///
/// Each level costs a few stack frames, so this stays well below what a debug build's smallest
/// thread stack can hold.
pub(crate) const MAX_DEPTH: usize = 64;

// groups that are dropped when they wrap an operand
const GROUP_OPENERS: [&str; 4] = ["(", "[", "{", "{:"];
const GROUP_CLOSERS: [&str; 4] = [")", "]", "}", ":}"];

fn leaf<'a>(token: &Token<'a>) -> Node<'a> {
    Const::new(token.template.clone(), token.value).into()
}

fn is_row_split(token: &Token<'_>) -> bool {
    token.category == Category::Split && token.value == ";"
}

fn starts_variable(token: &Token<'_>) -> bool {
    matches!(
        token.category,
        Category::Letter | Category::Str | Category::Text | Category::LeftParen
    )
}

fn bar_relation<'a>(bar: &Token<'a>) -> Cow<'a, str> {
    match bar.template.as_ref() {
        "|" => Cow::Borrowed(r"\mid"),
        r"\|" => Cow::Borrowed(r"\parallel"),
        _ => bar.template.clone(),
    }
}

/// Turn a list of siblings into one node
fn collapse(mut nodes: Vec<Node<'_>>) -> Node<'_> {
    match nodes.len() {
        0 => Node::empty(),
        1 => nodes.remove(0),
        _ => Node::Flat(nodes),
    }
}

fn is_bracket(node: Option<&Node<'_>>, brackets: &[&str]) -> bool {
    matches!(node, Some(Node::Const(Const { source, .. })) if brackets.contains(&source.as_ref()))
}

/// The contents of a bracket group, or the node back if it isn't one
fn group_body(node: Node<'_>) -> Result<Vec<Node<'_>>, Node<'_>> {
    match node {
        Node::Flat(mut children)
            if children.len() >= 2
                && is_bracket(children.first(), &GROUP_OPENERS)
                && is_bracket(children.last(), &GROUP_CLOSERS) =>
        {
            children.pop();
            children.remove(0);
            Ok(children)
        }
        node => Err(node),
    }
}

/// Drop the brackets around an operand, e.g. `sqrt(x)` renders as `\sqrt{ x }`
fn strip_brackets(node: Node<'_>) -> Node<'_> {
    group_body(node).map_or_else(|node| node, collapse)
}

/// Where a bracketed region closes, and whether it has rows
struct Region {
    close: usize,
    rows: bool,
}

type Rows<'a> = (Vec<Vec<Node<'a>>>, Vec<usize>);

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    cursor: usize,
    end: usize,
    depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn peek(&self) -> Option<&'t Token<'a>> {
        let tokens: &'t [Token<'a>] = self.tokens;
        tokens[..self.end].get(self.cursor)
    }

    /// Run f with the parser confined to tokens before end
    fn bounded<R>(&mut self, end: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        let outer = mem::replace(&mut self.end, end);
        let res = f(self);
        self.end = outer;
        res
    }

    fn sequence(&mut self) -> Result<Vec<Node<'a>>, ConvertError> {
        let mut nodes = Vec::new();
        while self.cursor < self.end {
            nodes.push(self.walk(true)?);
        }
        Ok(nodes)
    }

    /// Parse one node, consuming at least one token unless the region is exhausted
    fn walk(&mut self, attach: bool) -> Result<Node<'a>, ConvertError> {
        let Some(token) = self.peek() else {
            return Ok(Node::empty());
        };
        if self.depth >= MAX_DEPTH {
            return Err(ConvertError::NestingTooDeep {
                position: token.position,
            });
        }
        self.depth += 1;
        let res = self.walk_token(token, attach);
        self.depth -= 1;
        res
    }

    fn walk_token(
        &mut self,
        token: &'t Token<'a>,
        attach: bool,
    ) -> Result<Node<'a>, ConvertError> {
        let node = match token.category {
            Category::Const
            | Category::Letter
            | Category::Text
            | Category::Number
            | Category::Str => {
                self.cursor += 1;
                let node = leaf(token);
                match self.peek() {
                    Some(next)
                        if token.flag == Some(SymbolFlag::RowRule)
                            && next.category == Category::LeftParen =>
                    {
                        self.paren_region(Some(node))?
                    }
                    _ => node,
                }
            }
            Category::LeftParen => self.paren_region(None)?,
            Category::BarParen => self.bar_region()?,
            Category::Script | Category::PrefixUnary => {
                self.cursor += 1;
                let arg = strip_brackets(self.operand()?);
                ParamOne::new(token.template.clone(), arg).into()
            }
            Category::PrefixBinary => {
                self.cursor += 1;
                let first = strip_brackets(self.operand()?);
                let second = strip_brackets(self.operand()?);
                ParamTwo::new(token.template.clone(), first, second).into()
            }
            Category::Sign => {
                let unary =
                    self.cursor == 0 || self.tokens[self.cursor - 1].category.takes_operand();
                self.cursor += 1;
                if unary {
                    Node::Flat(vec![leaf(token), self.operand()?])
                } else {
                    leaf(token)
                }
            }
            Category::OptionalScripts => self.optional_scripts(token)?,
            Category::Derivative => self.derivative(token)?,
            Category::Split | Category::AlignMark => {
                self.cursor += 1;
                leaf(token)
            }
            Category::RightParen => {
                // a closer with nothing to close
                self.cursor += 1;
                Const::new(format!("{UNMATCHED_OPEN} {}", token.template), token.value).into()
            }
            Category::Infix | Category::Postfix => {
                // an operator with nothing before it
                self.cursor += 1;
                Const::verbatim(token.value).into()
            }
            Category::None => {
                return Err(ConvertError::UnhandledToken {
                    value: token.value.to_owned(),
                    position: token.position,
                })
            }
        };
        if attach {
            self.attach_followers(node)
        } else {
            Ok(node)
        }
    }

    /// The operand of an operator, empty when nothing can be one
    fn operand(&mut self) -> Result<Node<'a>, ConvertError> {
        match self.peek() {
            Some(token)
                if !matches!(
                    token.category,
                    Category::Split | Category::AlignMark | Category::RightParen
                ) =>
            {
                self.walk(false)
            }
            _ => Ok(Node::empty()),
        }
    }

    fn attach_followers(&mut self, mut node: Node<'a>) -> Result<Node<'a>, ConvertError> {
        let mut links = 0;
        while let Some(token) = self.peek() {
            if matches!(
                token.category,
                Category::Script | Category::Infix | Category::Postfix
            ) {
                self.check_chain(token, links)?;
                links += 1;
            }
            node = match token.category {
                Category::Script => self.script(token, node)?,
                Category::Infix => {
                    self.cursor += 1;
                    let second = self.operand()?;
                    let second = self.attach_scripts(second)?;
                    ParamTwo::new(
                        token.template.clone(),
                        strip_brackets(node),
                        strip_brackets(second),
                    )
                    .into()
                }
                Category::Postfix => {
                    self.cursor += 1;
                    ParamOne::new(token.template.clone(), node).into()
                }
                _ => break,
            };
        }
        Ok(node)
    }

    fn attach_scripts(&mut self, mut node: Node<'a>) -> Result<Node<'a>, ConvertError> {
        let mut links = 0;
        while let Some(token) = self
            .peek()
            .filter(|token| token.category == Category::Script)
        {
            self.check_chain(token, links)?;
            links += 1;
            node = self.script(token, node)?;
        }
        Ok(node)
    }

    /// Every follower wraps the node before it, so long chains nest as deep as recursion does
    fn check_chain(&self, token: &Token<'_>, links: usize) -> Result<(), ConvertError> {
        if self.depth + links >= MAX_DEPTH {
            Err(ConvertError::NestingTooDeep {
                position: token.position,
            })
        } else {
            Ok(())
        }
    }

    fn script(&mut self, token: &'t Token<'a>, base: Node<'a>) -> Result<Node<'a>, ConvertError> {
        self.cursor += 1;
        let arg = strip_brackets(self.operand()?);
        Ok(Node::Flat(vec![
            base,
            ParamOne::new(token.template.clone(), arg).into(),
        ]))
    }

    fn optional_scripts(&mut self, op: &'t Token<'a>) -> Result<Node<'a>, ConvertError> {
        self.cursor += 1;
        let (mut over, mut under) = (None, None);
        while let Some(token) = self
            .peek()
            .filter(|token| token.category == Category::Script)
        {
            let slot = if token.value == "^" {
                &mut over
            } else {
                &mut under
            };
            if slot.is_some() {
                break;
            }
            self.cursor += 1;
            *slot = Some(strip_brackets(self.operand()?));
        }
        Ok(ParamTwo::new(
            op.template.clone(),
            over.unwrap_or_default(),
            under.unwrap_or_default(),
        )
        .into())
    }

    /// `pp^2 f (x y)` becomes a fraction of partials
    fn derivative(&mut self, op: &'t Token<'a>) -> Result<Node<'a>, ConvertError> {
        self.cursor += 1;
        let order = match self.peek() {
            Some(token) if token.category == Category::Script && token.value == "^" => {
                self.cursor += 1;
                let arg = strip_brackets(self.operand()?);
                Some(Node::from(ParamOne::new(token.template.clone(), arg)))
            }
            _ => None,
        };
        let function = strip_brackets(self.operand()?);
        let mut numerator = vec![leaf(op)];
        numerator.extend(order.clone());
        numerator.push(function);
        let denominator = if self.peek().is_some_and(starts_variable) {
            let terms = match group_body(self.walk(false)?) {
                Ok(body) => body,
                Err(node) => vec![self.attach_scripts(node)?],
            };
            if terms.len() > 1 {
                Node::Flat(terms.into_iter().flat_map(|term| [leaf(op), term]).collect())
            } else {
                let mut parts = vec![leaf(op)];
                parts.extend(terms);
                parts.extend(order);
                Node::Flat(parts)
            }
        } else {
            Node::empty()
        };
        Ok(ParamTwo::new(FRACTION, Node::Flat(numerator), denominator).into())
    }

    /// Find the closer matching the opener at open
    fn scan_paren(&self, open: usize) -> Result<Region, UnmatchedParen> {
        let mut depth = 0usize;
        let mut rows = false;
        for (ind, token) in self.tokens[..self.end].iter().enumerate().skip(open + 1) {
            match token.category {
                Category::LeftParen => depth += 1,
                Category::RightParen if depth == 0 => return Ok(Region { close: ind, rows }),
                Category::RightParen => depth -= 1,
                Category::Split if depth == 0 && is_row_split(token) => rows = true,
                _ => {}
            }
        }
        Err(UnmatchedParen)
    }

    fn paren_region(&mut self, leading: Option<Node<'a>>) -> Result<Node<'a>, ConvertError> {
        let tokens: &'t [Token<'a>] = self.tokens;
        let open_index = self.cursor;
        let open = &tokens[open_index];
        self.cursor += 1;
        match self.scan_paren(open_index) {
            Err(UnmatchedParen) => {
                let mut children: Vec<_> = leading.into_iter().collect();
                children.push(leaf(open));
                children.extend(self.sequence()?);
                children.push(Const::new(UNMATCHED_CLOSE, "").into());
                Ok(Node::Flat(children))
            }
            Ok(Region { close, rows: false }) => {
                let mut children: Vec<_> = leading.into_iter().collect();
                children.push(leaf(open));
                children.extend(self.bounded(close, Self::sequence)?);
                children.push(leaf(&tokens[close]));
                self.cursor = close + 1;
                Ok(Node::Flat(children))
            }
            Ok(Region { close, rows: true }) => {
                let closer = &tokens[close];
                let (rows, dividers) =
                    self.bounded(close, |parser| parser.matrix_rows(true, leading))?;
                self.cursor = close + 1;
                let alignment = if open.value == "{" && closer.value == ":}" {
                    Alignment::Left
                } else {
                    Alignment::Center
                };
                Ok(Matrix::new(
                    open.template.clone(),
                    rows,
                    closer.template.clone(),
                    alignment,
                    dividers,
                )
                .into())
            }
        }
    }

    /// Split the rest of the region into rows on `;` and cells on `,`
    ///
    /// With dividers, a `|` after the start of a cell ends it and draws a rule after it.
    fn matrix_rows(
        &mut self,
        dividers: bool,
        leading: Option<Node<'a>>,
    ) -> Result<Rows<'a>, ConvertError> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut cell: Vec<_> = leading.into_iter().collect();
        let mut columns = BTreeSet::new();
        while let Some(token) = self.peek() {
            match token.category {
                Category::Split if is_row_split(token) => {
                    self.cursor += 1;
                    if !cell.is_empty() {
                        row.push(collapse(mem::take(&mut cell)));
                    }
                    rows.push(mem::take(&mut row));
                }
                Category::Split => {
                    self.cursor += 1;
                    row.push(collapse(mem::take(&mut cell)));
                }
                Category::BarParen if dividers && token.value == "|" && !cell.is_empty() => {
                    self.cursor += 1;
                    row.push(collapse(mem::take(&mut cell)));
                    columns.insert(row.len());
                }
                _ => cell.push(self.walk(true)?),
            }
        }
        if !cell.is_empty() {
            row.push(collapse(cell));
        }
        if !row.is_empty() {
            rows.push(row);
        }
        Ok((rows, columns.into_iter().collect()))
    }

    fn bar_region(&mut self) -> Result<Node<'a>, ConvertError> {
        let tokens: &'t [Token<'a>] = self.tokens;
        let open_index = self.cursor;
        let bar = &tokens[open_index];
        self.cursor += 1;
        let mut depth = 0usize;
        let mut rows = false;
        let mut close = None;
        for (ind, token) in tokens[..self.end].iter().enumerate().skip(open_index + 1) {
            match token.category {
                Category::LeftParen => depth += 1,
                Category::RightParen if depth == 0 => break,
                Category::RightParen => depth -= 1,
                Category::BarParen if depth == 0 && token.value == bar.value => {
                    close = Some(ind);
                    break;
                }
                Category::Split if depth == 0 && is_row_split(token) => rows = true,
                _ => {}
            }
        }
        let Some(close) = close else {
            return Ok(Const::new(bar_relation(bar), bar.value).into());
        };
        let left = format!(r"\left{}", bar.template);
        let right = format!(r"\right{}", bar.template);
        let node = if rows {
            let (rows, dividers) = self.bounded(close, |parser| parser.matrix_rows(false, None))?;
            Matrix::new(left, rows, right, Alignment::Center, dividers).into()
        } else {
            let mut children = vec![Node::from(Const::new(left, bar.value))];
            children.extend(self.bounded(close, Self::sequence)?);
            children.push(Const::new(right, bar.value).into());
            Node::Flat(children)
        };
        self.cursor = close + 1;
        Ok(node)
    }
}

/// Parse tokens into a tree
///
/// Parsing is total for every category the parser knows; only tokens of
/// [`Category::None`] are rejected.
///
/// # Example
/// ```
/// use asciimath_tex::{parse, render, tokenize, SymbolTable};
///
/// let table = SymbolTable::asciimath().unwrap();
/// let tokens = tokenize("sqrt(x)", &table).unwrap();
/// let tree = parse(&tokens).unwrap();
/// assert_eq!(render(&tree), r"\sqrt{ x }");
/// ```
pub fn parse<'a>(tokens: &[Token<'a>]) -> Result<Node<'a>, ConvertError> {
    let mut parser = Parser {
        tokens,
        cursor: 0,
        end: tokens.len(),
        depth: 0,
    };
    Ok(Node::Root(parser.sequence()?))
}

#[cfg(test)]
mod tests {
    use super::{parse, MAX_DEPTH};
    use crate::error::ConvertError;
    use crate::symbols::{Category, Symbol, SymbolTable, ASCIIMATH_SYMBOLS};
    use crate::tokenizer::{tokenize, Position};
    use crate::tree::{Alignment, Const, Matrix, Node, ParamOne, ParamTwo};
    use lazy_static::lazy_static;

    lazy_static! {
        static ref TABLE: SymbolTable = SymbolTable::asciimath().unwrap();
    }

    fn parsed(inp: &'static str) -> Vec<Node<'static>> {
        match parse(&tokenize(inp, &*TABLE).unwrap()).unwrap() {
            Node::Root(children) => children,
            node => panic!("expected root, got {node:?}"),
        }
    }

    fn verb(source: &'static str) -> Node<'static> {
        Const::verbatim(source).into()
    }

    fn tex(template: &'static str, source: &'static str) -> Node<'static> {
        Const::new(template, source).into()
    }

    #[test]
    fn simple_sequence() {
        assert_eq!(
            parsed("x = 2"),
            [verb("x"), verb("="), verb("2")]
        );
    }

    #[test]
    fn groups_keep_brackets() {
        assert_eq!(
            parsed("(a)"),
            [Node::Flat(vec![tex(r"\left(", "("), verb("a"), tex(r"\right)", ")")])]
        );
    }

    #[test]
    fn operands_drop_brackets() {
        assert_eq!(
            parsed("sqrt(x) frac{a}[b]"),
            [
                ParamOne::new(r"\sqrt{ $1 }", verb("x")).into(),
                ParamTwo::new(r"\frac{ $1 }{ $2 }", verb("a"), verb("b")).into(),
            ]
        );
    }

    #[test]
    fn angle_groups_stay() {
        let expected = Node::Flat(vec![
            tex(r"\left\langle", "<<"),
            verb("a"),
            tex(r"\right\rangle", ">>"),
        ]);
        assert_eq!(
            parsed("sqrt<<a>>"),
            [ParamOne::new(r"\sqrt{ $1 }", expected).into()]
        );
    }

    #[test]
    fn missing_operands() {
        // an operator at the end of a group still consumes nothing past it
        assert_eq!(
            parsed("(sqrt)"),
            [Node::Flat(vec![
                tex(r"\left(", "("),
                ParamOne::new(r"\sqrt{ $1 }", Node::empty()).into(),
                tex(r"\right)", ")"),
            ])]
        );
    }

    #[test]
    fn infix_takes_neighbors() {
        assert_eq!(
            parsed("(a+b)/c^2"),
            [ParamTwo::new(
                r"\frac{ $1 }{ $2 }",
                Node::Flat(vec![verb("a"), verb("+"), verb("b")]),
                Node::Flat(vec![
                    verb("c"),
                    ParamOne::new("^{ $1 }", verb("2")).into()
                ]),
            )
            .into()]
        );
    }

    #[test]
    fn postfix_keeps_brackets() {
        assert_eq!(
            parsed("(n)!"),
            [ParamOne::new(
                "$1 !",
                Node::Flat(vec![tex(r"\left(", "("), verb("n"), tex(r"\right)", ")")]),
            )
            .into()]
        );
    }

    #[test]
    fn scripts_chain() {
        let first = Node::Flat(vec![verb("x"), ParamOne::new("^{ $1 }", verb("2")).into()]);
        assert_eq!(
            parsed("x^2^3"),
            [Node::Flat(vec![
                first,
                ParamOne::new("^{ $1 }", verb("3")).into()
            ])]
        );
    }

    #[test]
    fn unary_signs() {
        assert_eq!(
            parsed("-x^-2"),
            [Node::Flat(vec![
                Node::Flat(vec![verb("-"), verb("x")]),
                ParamOne::new("^{ $1 }", Node::Flat(vec![verb("-"), verb("2")])).into(),
            ])]
        );
        assert_eq!(parsed("a - b"), [verb("a"), verb("-"), verb("b")]);
    }

    #[test]
    fn stray_operators() {
        assert_eq!(parsed("/ x"), [verb("/"), verb("x")]);
        assert_eq!(parsed("!"), [verb("!")]);
        assert_eq!(parsed(")"), [tex(r"\left. \right)", ")")]);
    }

    #[test]
    fn unmatched_open() {
        assert_eq!(
            parsed("(a"),
            [Node::Flat(vec![
                tex(r"\left(", "("),
                verb("a"),
                tex(r"\right.", "")
            ])]
        );
    }

    #[test]
    fn matrix_rows_and_columns() {
        let expected = Matrix::new(
            r"\left[",
            vec![vec![verb("a"), verb("b")], vec![verb("c"), verb("d")]],
            r"\right]",
            Alignment::Center,
            [],
        );
        assert_eq!(parsed("[a,b;c,d]"), [expected.into()]);
    }

    #[test]
    fn matrix_dividers() {
        let expected = Matrix::new(
            r"\left[",
            vec![
                vec![verb("a"), verb("b"), verb("c")],
                vec![verb("d"), verb("e"), verb("f")],
            ],
            r"\right]",
            Alignment::Center,
            [2],
        );
        assert_eq!(parsed("[a,b|c;d,e|f]"), [expected.into()]);
    }

    #[test]
    fn empty_cells() {
        let expected = Matrix::new(
            r"\left(",
            vec![vec![Node::empty(), verb("a")], vec![verb("b")]],
            r"\right)",
            Alignment::Center,
            [],
        );
        assert_eq!(parsed("(,a;b;)"), [expected.into()]);
    }

    #[test]
    fn cases_align_left() {
        let expected = Matrix::new(
            r"\left\lbrace",
            vec![vec![verb("1"), verb("x")], vec![verb("0"), verb("y")]],
            r"\right.",
            Alignment::Left,
            [],
        );
        assert_eq!(parsed("{1,x;0,y:}"), [expected.into()]);
    }

    #[test]
    fn hline_joins_first_cell() {
        let expected = Matrix::new(
            r"\left[",
            vec![
                vec![Node::Flat(vec![tex(r"\hline", "hline"), verb("a")])],
                vec![verb("b")],
            ],
            r"\right]",
            Alignment::Center,
            [],
        );
        assert_eq!(parsed("hline[a;b]"), [expected.into()]);
    }

    #[test]
    fn bars_match_eagerly() {
        let abs = |inner| Node::Flat(vec![tex(r"\left|", "|"), inner, tex(r"\right|", "|")]);
        assert_eq!(
            parsed("|a|b|c|"),
            [abs(verb("a")), verb("b"), abs(verb("c"))]
        );
    }

    #[test]
    fn bars_stop_at_closers() {
        assert_eq!(
            parsed("{ a | b }"),
            [Node::Flat(vec![
                tex(r"\left\lbrace", "{"),
                verb("a"),
                tex(r"\mid", "|"),
                verb("b"),
                tex(r"\right\rbrace", "}"),
            ])]
        );
        assert_eq!(parsed("a || b"), [verb("a"), tex(r"\parallel", "||"), verb("b")]);
    }

    #[test]
    fn bar_matrix_has_no_dividers() {
        let expected = Matrix::new(
            r"\left|",
            vec![vec![verb("a"), verb("b")], vec![verb("c"), verb("d")]],
            r"\right|",
            Alignment::Center,
            [],
        );
        assert_eq!(parsed("|a,b;c,d|"), [expected.into()]);
    }

    #[test]
    fn optional_scripts_any_order() {
        let expected: Node = ParamTwo::new(r"\xrightarrow[ $2 ]{ $1 }", verb("f"), verb("n")).into();
        assert_eq!(parsed("xrarr_n^f"), [expected.clone()]);
        assert_eq!(parsed("xrarr^f_n"), [expected]);
        assert_eq!(
            parsed("xrarr"),
            [ParamTwo::new(r"\xrightarrow[ $2 ]{ $1 }", Node::empty(), Node::empty()).into()]
        );
    }

    #[test]
    fn partial_derivatives() {
        let pp = || tex(r"\partial", "pp");
        let order: Node = ParamOne::new("^{ $1 }", verb("2")).into();
        assert_eq!(
            parsed("pp^2 f x"),
            [ParamTwo::new(
                r"\frac{ $1 }{ $2 }",
                Node::Flat(vec![pp(), order.clone(), verb("f")]),
                Node::Flat(vec![pp(), verb("x"), order]),
            )
            .into()]
        );
        assert_eq!(
            parsed("pp f (x y)"),
            [ParamTwo::new(
                r"\frac{ $1 }{ $2 }",
                Node::Flat(vec![pp(), verb("f")]),
                Node::Flat(vec![pp(), verb("x"), pp(), verb("y")]),
            )
            .into()]
        );
    }

    #[test]
    fn derivative_variables() {
        let pp = || tex(r"\partial", "pp");
        assert_eq!(
            parsed("pp f theta"),
            [ParamTwo::new(
                r"\frac{ $1 }{ $2 }",
                Node::Flat(vec![pp(), verb("f")]),
                Node::Flat(vec![pp(), tex(r"\theta", "theta")]),
            )
            .into()]
        );
        let sub: Node = ParamOne::new("_{ $1 }", verb("i")).into();
        assert_eq!(
            parsed("pp f x_i"),
            [ParamTwo::new(
                r"\frac{ $1 }{ $2 }",
                Node::Flat(vec![pp(), verb("f")]),
                Node::Flat(vec![pp(), Node::Flat(vec![verb("x"), sub])]),
            )
            .into()]
        );
        // relations don't name variables
        assert_eq!(
            parsed("pp f in")[1],
            tex(r"\in", "in")
        );
    }

    #[test]
    fn deep_nesting() {
        let inp = "(".repeat(MAX_DEPTH + 1);
        assert_eq!(
            parse(&tokenize(&inp, &*TABLE).unwrap()).unwrap_err(),
            ConvertError::NestingTooDeep {
                position: Position {
                    line: 1,
                    column: MAX_DEPTH + 1
                },
            }
        );

        let inp = "(".repeat(MAX_DEPTH - 1);
        assert!(parse(&tokenize(&inp, &*TABLE).unwrap()).is_ok());

        let inp = "sqrt ".repeat(MAX_DEPTH) + "x";
        assert!(matches!(
            parse(&tokenize(&inp, &*TABLE).unwrap()),
            Err(ConvertError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn long_script_chains() {
        let inp = "x".to_owned() + &"^2".repeat(MAX_DEPTH);
        assert!(matches!(
            parse(&tokenize(&inp, &*TABLE).unwrap()),
            Err(ConvertError::NestingTooDeep { .. })
        ));
        let inp = "x".to_owned() + &"^2".repeat(MAX_DEPTH / 2);
        assert!(parse(&tokenize(&inp, &*TABLE).unwrap()).is_ok());
    }

    #[test]
    fn unhandled_category() {
        let table = SymbolTable::new(
            ASCIIMATH_SYMBOLS
                .iter()
                .cloned()
                .chain([("??", Symbol::new(Category::None, "", None))]),
        )
        .unwrap();
        let tokens = tokenize("a ??", &table).unwrap();
        assert_eq!(
            parse(&tokens).unwrap_err(),
            ConvertError::UnhandledToken {
                value: "??".into(),
                position: Position { line: 1, column: 3 },
            }
        );
    }
}
