//! Integration tests for the whole pipeline.
//!
//! These tests verify that source text flows through tokenization and
//! parsing into a tree, that malformed input degrades into diagnostics
//! plus error markers instead of a failed parse, and that the canonical
//! rendering of a tree re-parses to the same structure.

use morpho_parser::ast::ast::{Stmt, StmtType};
use morpho_parser::ast::statements::ClassDeclStmt;
use morpho_parser::{display_error, parse};

fn reparse_is_stable(source: &str) {
    let (program, errors) = parse(source.to_string(), Some("test.morpho".to_string()));
    assert!(errors.is_empty(), "diagnostics for {:?}: {:?}", source, errors);

    let rendered = program.unparse();
    let (reparsed, errors) = parse(rendered.clone(), Some("test.morpho".to_string()));
    assert!(
        errors.is_empty(),
        "diagnostics for rendering {:?}: {:?}",
        rendered,
        errors
    );

    // a canonical rendering is a fixed point of parse-then-render
    assert_eq!(rendered, reparsed.unparse());
}

#[test]
fn test_parse_complete_program() {
    let source = r#"
        import maths for sin, cos

        class Oscillator is Object with Printable {
            var amplitude = 1.0, phase
            init(Float freq, damping = 0.5) {
                self.freq = freq
                self.damping = damping
            }
            sample(t) {
                return self.amplitude * sin(self.freq * t + self.phase)
            }
        }

        fn simulate(osc, steps) {
            var total = 0
            for (i = 0; i < steps; i = i + 1) {
                total += osc.sample(i / 100.0)
            }
            for (x in [1, 2, 3]) print x
            return total
        }

        var osc = Oscillator(2.5, 0.1)
        print "result: ${simulate(osc, 100)}"
    "#;

    let (program, errors) = parse(source.to_string(), Some("test.morpho".to_string()));

    assert!(errors.is_empty(), "diagnostics: {:?}", errors);
    assert_eq!(program.body.len(), 5);
    assert_eq!(program.body[0].get_stmt_type(), StmtType::ImportStmt);
    assert_eq!(program.body[1].get_stmt_type(), StmtType::ClassDeclStmt);
    assert_eq!(program.body[2].get_stmt_type(), StmtType::FnDeclStmt);
    assert_eq!(program.body[3].get_stmt_type(), StmtType::VarDeclStmt);
    assert_eq!(program.body[4].get_stmt_type(), StmtType::PrintStmt);

    let class = program.body[1]
        .as_any()
        .downcast_ref::<ClassDeclStmt>()
        .unwrap();
    assert_eq!(class.name, "Oscillator");
    assert_eq!(class.members.len(), 3);
}

#[test]
fn test_reparse_stability_expressions() {
    reparse_is_stable("1 + 2 * 3;");
    reparse_is_stable("2 ^ 3 ^ 2;");
    reparse_is_stable("a = b = c;");
    reparse_is_stable("x ? y : z ? w : v;");
    reparse_is_stable("-a.b(c)[d] + @e;");
    reparse_is_stable("(1 + 2) * 3;");
    reparse_is_stable("[1, 2.5, 3im, :sym, nil, true];");
    reparse_is_stable("var d = { \"a\": 1, 2: [3, 4] };");
    reparse_is_stable("1..10;");
    reparse_is_stable("a and b or !c;");
}

#[test]
fn test_reparse_stability_strings() {
    reparse_is_stable(r#"print "plain";"#);
    reparse_is_stable(r#"print "tab\there";"#);
    reparse_is_stable(r#"print "a${1 + 2}b";"#);
    reparse_is_stable(r#"print "${x}${y}";"#);
    reparse_is_stable(r#"print "nested ${ "inner ${n}" }";"#);
}

#[test]
fn test_reparse_stability_statements() {
    reparse_is_stable("var a = 1, b, c = 3;");
    reparse_is_stable("if (x > 0) print 1; else { print 2; }");
    reparse_is_stable("while (i < 10) i += 1;");
    reparse_is_stable("do { i = i + 1; } while (i < 10);");
    reparse_is_stable("for (i = 0; i < 10; i = i + 1) { print i; }");
    reparse_is_stable("for (;;) break;");
    reparse_is_stable("for (x in 1..5) print x;");
    reparse_is_stable("fn f(...rest, Matrix m, scale = 1.0) { return scale; }");
    reparse_is_stable("var g = fn() { return nil; };");
    reparse_is_stable("import maths for sin, cos as m;");
    reparse_is_stable("try { risky(); } catch { \"Tag\" with e print e; }");
    reparse_is_stable(
        "class Shape is Object with Printable { var sides = 0; area() { return 0; } }",
    );
}

#[test]
fn test_reparse_preserves_dictionary_statement() {
    // an expression statement that begins with a dictionary literal must
    // survive the round trip through the block-vs-dictionary decision
    reparse_is_stable("{ 1: 2 }.count();");
}

#[test]
fn test_error_tolerant_parse_keeps_tree() {
    let source = "var = 1;\nprint 2;\nvar ok = 3;\nwhile (;\nprint 4;";
    let (program, errors) = parse(source.to_string(), Some("test.morpho".to_string()));

    // two malformed statements, two diagnostics, and the healthy
    // statements are all present
    assert_eq!(errors.len(), 2);
    let kinds: Vec<StmtType> = program.iter().map(|stmt| stmt.get_stmt_type()).collect();
    assert!(kinds.contains(&StmtType::PrintStmt));
    assert!(kinds.contains(&StmtType::VarDeclStmt));
    assert_eq!(
        kinds
            .iter()
            .filter(|kind| **kind == StmtType::ErrorStmt)
            .count(),
        2
    );
    assert_eq!(
        kinds
            .iter()
            .filter(|kind| **kind == StmtType::PrintStmt)
            .count(),
        2
    );
}

#[test]
fn test_lex_and_syntax_errors_accumulate_in_order() {
    let source = "var a = \"unterminated\nvar b = ;";
    let (_, errors) = parse(source.to_string(), Some("test.morpho".to_string()));

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].get_error_name(), "UnterminatedString");
    assert!(errors[0].get_span().start.offset <= errors[1].get_span().start.offset);
}

#[test]
fn test_display_error_renders() {
    let source = "var a = ;";
    let (_, errors) = parse(source.to_string(), Some("test.morpho".to_string()));

    assert_eq!(errors.len(), 1);
    // rendering must not panic, including for spans at line ends
    display_error(&errors[0], source);
}

#[test]
fn test_parse_is_independent_per_call() {
    let (first, errors) = parse("print 1;".to_string(), None);
    assert!(errors.is_empty());
    let (second, errors) = parse("print 2;".to_string(), None);
    assert!(errors.is_empty());

    // no state leaks between parses; each tree is self-contained
    assert_eq!(first.body.len(), 1);
    assert_eq!(second.body.len(), 1);
    assert_ne!(first.unparse(), second.unparse());
}

#[test]
fn test_semicolons_and_newlines_interchangeable() {
    let with_semicolons = parse("print 1; print 2;".to_string(), None).0;
    let with_newlines = parse("print 1\nprint 2".to_string(), None).0;

    assert_eq!(with_semicolons.unparse(), with_newlines.unparse());
}
