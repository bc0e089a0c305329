//! Rendering parse trees to TeX
use crate::tokenizer::ROW_BREAK;
use crate::tree::{Matrix, Node};

/// Substitute `$1` and `$2` in a template in a single pass
///
/// Placeholders inside substituted arguments are left alone, as is any `$` that isn't followed by
/// a placeholder digit.
fn substitute(out: &mut String, template: &str, args: &[String]) {
    let mut rest = template;
    while let Some(ind) = rest.find('$') {
        out.push_str(&rest[..ind]);
        let arg = match rest.as_bytes().get(ind + 1) {
            Some(b'1') => args.first(),
            Some(b'2') => args.get(1),
            _ => None,
        };
        match arg {
            Some(arg) => {
                out.push_str(arg);
                rest = &rest[ind + 2..];
            }
            None => {
                out.push('$');
                rest = &rest[ind + 1..];
            }
        }
    }
    out.push_str(rest);
}

fn is_alignment_marker(node: &Node<'_>) -> bool {
    matches!(node, Node::Const(leaf) if leaf.template == "&" || leaf.template == ROW_BREAK)
}

/// Join renders with single spaces, skipping children that render to nothing
fn write_joined(out: &mut String, nodes: &[Node<'_>]) {
    let mut first = true;
    for node in nodes.iter().filter(|node| !node.is_empty()) {
        let rendered = render(node);
        if rendered.is_empty() {
            continue;
        }
        if !first {
            out.push(' ');
        }
        out.push_str(&rendered);
        first = false;
    }
}

fn write_matrix(out: &mut String, matrix: &Matrix<'_>) {
    out.push_str(&matrix.left);
    out.push_str(r" \begin{array}{");
    out.push_str(&matrix.column_spec());
    out.push_str("} ");
    for (ind, row) in matrix.rows().iter().enumerate() {
        let cells: Vec<_> = row.iter().map(render).collect();
        out.push_str(&cells.join(" & "));
        if ind + 1 < matrix.num_rows() {
            out.push_str(r" \\ ");
        }
    }
    out.push_str(r" \end{array} ");
    out.push_str(&matrix.right);
}

fn write_node(out: &mut String, node: &Node<'_>) {
    match node {
        Node::Const(leaf) => out.push_str(&leaf.template),
        Node::Flat(children) => write_joined(out, children),
        Node::ParamOne(param) => substitute(out, &param.template, &[render(param.arg())]),
        Node::ParamTwo(param) => substitute(
            out,
            &param.template,
            &[render(param.first()), render(param.second())],
        ),
        Node::Matrix(matrix) => write_matrix(out, matrix),
        Node::Root(children) if children.iter().any(is_alignment_marker) => {
            out.push_str(r"\begin{aligned} ");
            write_joined(out, children);
            out.push_str(r" \end{aligned}");
        }
        Node::Root(children) => write_joined(out, children),
    }
}

/// Render a tree to TeX
///
/// # Example
/// ```
/// use asciimath_tex::render;
/// use asciimath_tex::tree::{Const, Node, ParamOne};
///
/// let node: Node = ParamOne::new(r"\sqrt{ $1 }", Const::verbatim("x")).into();
/// assert_eq!(render(&node), r"\sqrt{ x }");
/// ```
pub fn render(node: &Node<'_>) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

/// Escape text so it can sit inside `\text{}`
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for chr in text.chars() {
        match chr {
            '\\' => out.push_str(r"\textbackslash{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '{' | '}' | '$' | '&' | '#' | '%' | '_' => {
                out.push('\\');
                out.push(chr);
            }
            _ => out.push(chr),
        }
    }
    out
}
