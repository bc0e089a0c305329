use asciimath_tex::{convert, AsciiMathConfig, AsciiMathToTex};
use insta::assert_snapshot;

#[test]
fn matrices() {
    assert_snapshot!(convert("[a,b;c,d]"), @r"\left[ \begin{array}{cc} a & b \\ c & d \end{array} \right]");
    assert_snapshot!(convert("[a,b|c;d,e|f]"), @r"\left[ \begin{array}{cc|c} a & b & c \\ d & e & f \end{array} \right]");
    assert_snapshot!(convert("|a,b;c,d|"), @r"\left| \begin{array}{cc} a & b \\ c & d \end{array} \right|");
    assert_snapshot!(convert("hline[a,b;c,d]"), @r"\left[ \begin{array}{cc} \hline a & b \\ c & d \end{array} \right]");
}

#[test]
fn cases() {
    assert_snapshot!(
        convert("{x, if x >= 0; -x, if x < 0:}"),
        @r"\left\lbrace \begin{array}{ll} x & \text{ if } x \geq 0 \\ - x & \text{ if } x < 0 \end{array} \right."
    );
}

#[test]
fn fractions() {
    assert_snapshot!(convert("a/b"), @r"\frac{ a }{ b }");
    assert_snapshot!(convert("frac(a+b)(2)"), @r"\frac{ a + b }{ 2 }");
    assert_snapshot!(convert("n choose k"), @r"\binom{ n }{ k }");
}

#[test]
fn operands_lose_brackets() {
    assert_snapshot!(convert("abs(x)"), @r"\left| x \right|");
    assert_snapshot!(convert("root(3)(x)"), @r"\sqrt[ 3 ]{ x }");
    assert_snapshot!(convert("x_(n+1)"), @r"x _{ n + 1 }");
}

#[test]
fn bars() {
    assert_snapshot!(convert("{ a | b }"), @r"\left\lbrace a \mid b \right\rbrace");
    assert_snapshot!(convert("p(x|y)"), @r"p \left( x \mid y \right)");
    assert_snapshot!(convert("||x||"), @r"\left\| x \right\|");
}

#[test]
fn scripts() {
    // chained superscripts stay separate
    assert_snapshot!(convert("x^2^3"), @r"x ^{ 2 } ^{ 3 }");
    assert_snapshot!(convert("sum_(i=1)^n i"), @r"\sum _{ i = 1 } ^{ n } i");
    assert_snapshot!(convert("int_0^1 f(x) dx"), @r"\int _{ 0 } ^{ 1 } f \left( x \right) dx");
    assert_snapshot!(convert("A xrarr^f B"), @r"A \xrightarrow[  ]{ f } B");
}

#[test]
fn derivatives() {
    assert_snapshot!(convert("dd y x"), @r"\frac{ \mathrm{d} y }{ \mathrm{d} x }");
    assert_snapshot!(convert("pp^2 f x"), @r"\frac{ \partial ^{ 2 } f }{ \partial x ^{ 2 } }");
    assert_snapshot!(convert("pp f theta"), @r"\frac{ \partial f }{ \partial \theta }");
    assert_snapshot!(convert("pp f x_i"), @r"\frac{ \partial f }{ \partial x _{ i } }");
}

#[test]
fn text_and_literals() {
    assert_snapshot!(convert(r#"text(a b) + "c""#), @r"\text{a b} + \text{c}");
    assert_snapshot!(convert("color(red)(x+1)"), @r"{ \color{red} x + 1 }");
    assert_snapshot!(convert(r#"tex"\mathrm{e}"^x"#), @r"\mathrm{e} ^{ x }");
    assert_snapshot!(convert("n!"), @"n !");
}

#[test]
fn alignment() {
    assert_snapshot!(
        convert("a &= b\n\nc &= d"),
        @r"\begin{aligned} a & = b \\ c & = d \end{aligned}"
    );
}

#[test]
fn recovery() {
    assert_snapshot!(convert("(a"), @r"\left( a \right.");
    assert_snapshot!(convert("a)"), @r"a \left. \right)");
    assert_snapshot!(convert("sqrt"), @r"\sqrt{  }");
    assert_snapshot!(convert("x y z"), @"x y z");
}

#[test]
fn display_mode() {
    let engine = AsciiMathToTex::new(AsciiMathConfig {
        display_mode: true,
        ..AsciiMathConfig::default()
    })
    .unwrap();
    assert_snapshot!(engine.convert("sqrt 2"), @r"\displaystyle \sqrt{ 2 }");
}
