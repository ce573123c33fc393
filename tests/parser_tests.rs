// tests/parser_tests.rs

use lambda_filter::ast::{BinOp, Expr, Literal, LogicalOp, UnaryOp};
use lambda_filter::lexer::Lexer;
use lambda_filter::parser::{ParseError, Parser};
use lambda_filter::{CompileOptions, DEFAULT_MAX_DEPTH, LexError, Predicate, compile, compile_with};
use pretty_assertions::assert_eq;

fn parse(input: &str) -> Predicate {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer).unwrap();
    parser.parse_predicate().unwrap()
}

fn body(input: &str) -> Expr {
    parse(input).body().clone()
}

fn rendered(input: &str) -> String {
    parse(input).to_string()
}

// ============================================================================
// Header
// ============================================================================

#[test]
fn test_parameter_name() {
    assert_eq!(parse("(v) => v > 1").parameter(), "v");
    assert_eq!(parse("( student ) => student.Age > 1").parameter(), "student");
    assert_eq!(parse("(_x1) => _x1 == 2").parameter(), "_x1");
}

#[test]
fn test_missing_parameter() {
    for input in ["v => v > 1", "() => 1 > 0", "(1) => true", "=> v"] {
        assert!(
            matches!(compile(input), Err(ParseError::MissingParameter { .. })),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_missing_arrow() {
    let err = compile("(v) v > 1").unwrap_err();
    assert!(matches!(err, ParseError::MissingArrow { .. }));
    assert_eq!(err.position().column, 5);
}

#[test]
fn test_unclosed_parameter_list() {
    assert!(matches!(
        compile("(v => v > 1"),
        Err(ParseError::UnbalancedParenthesis { position }) if position.offset == 0
    ));
    assert!(matches!(
        compile("(v w) => v"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_empty_body() {
    assert!(matches!(compile("(v) =>"), Err(ParseError::EmptyBody { .. })));
    assert!(matches!(compile("(v) =>   "), Err(ParseError::EmptyBody { .. })));
}

// ============================================================================
// Primaries
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(body("(v) => 42"), Expr::Literal(Literal::Integer(42)));
    assert_eq!(body("(v) => 2.5"), Expr::Literal(Literal::Float(2.5)));
    assert_eq!(body(r#"(v) => "tom""#), Expr::string("tom"));
    assert_eq!(body("(v) => true"), Expr::boolean(true));
}

#[test]
fn test_param() {
    assert_eq!(body("(v) => v"), Expr::Param);
}

#[test]
fn test_field_chain_is_left_associative() {
    assert_eq!(
        body("(v) => v.Address.City"),
        Expr::field(Expr::field(Expr::Param, "Address"), "City")
    );
}

#[test]
fn test_field_name_required_after_dot() {
    assert!(matches!(
        compile("(v) => v. > 1"),
        Err(ParseError::UnexpectedToken { expected: "field name after `.`", .. })
    ));
    assert!(matches!(
        compile("(v) => v.1"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_unknown_identifier_is_rejected() {
    let err = compile("(v) => w.Age > 1").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownIdentifier {
            position: err.position(),
            name: "w".to_string(),
            parameter: "v".to_string(),
        }
    );
    assert_eq!(err.position().offset, 7);
}

#[test]
fn test_field_names_are_not_checked_against_parameter() {
    // `v` as a field name is fine
    assert_eq!(body("(v) => v.v"), Expr::field(Expr::Param, "v"));
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_arithmetic() {
    // Should be: Add(1, Multiply(2, 3))
    match body("(v) => 1 + 2 * 3") {
        Expr::Binary {
            op: BinOp::Add,
            left,
            right,
        } => {
            assert_eq!(*left, Expr::integer(1));
            assert_eq!(*right, Expr::binary(BinOp::Multiply, Expr::integer(2), Expr::integer(3)));
        }
        other => panic!("Expected addition, got {:?}", other),
    }
}

#[test]
fn test_parentheses() {
    assert_eq!(rendered("(v) => (1 + 2) * 3"), "(v) => ((1 + 2) * 3)");
}

#[test]
fn test_additive_binds_tighter_than_relational() {
    assert_eq!(rendered("(v) => v > 5+1"), "(v) => (v > (5 + 1))");
}

#[test]
fn test_bitand_binds_tighter_than_equality() {
    assert_eq!(rendered("(v) => v&1 == 0"), "(v) => ((v & 1) == 0)");
}

#[test]
fn test_full_precedence_ladder() {
    let cases = vec![
        ("a || b && c", "(a || (b && c))"),
        ("a && b == c", "(a && (b == c))"),
        ("a == b < c", "(a == (b < c))"),
        ("a < b | c", "(a < (b | c))"),
        ("a | b ^ c", "(a | (b ^ c))"),
        ("a ^ b & c", "(a ^ (b & c))"),
        ("a & b << c", "(a & (b << c))"),
        ("a << b + c", "(a << (b + c))"),
        ("a + b * c", "(a + (b * c))"),
        ("a * -b", "(a * -b)"),
        ("-a.x * b", "(-a.x * b)"),
    ];

    for (source, expected) in cases {
        let input = format!("(a) => {}", source.replace(['b', 'c'], "a"));
        let expected = format!("(a) => {}", expected.replace(['b', 'c'], "a"));
        assert_eq!(rendered(&input), expected, "Failed for input: {}", source);
    }
}

#[test]
fn test_left_associativity() {
    assert_eq!(rendered("(v) => v - 1 - 2"), "(v) => ((v - 1) - 2)");
    assert_eq!(rendered("(v) => (v<<2)>>1 == 8"), "(v) => (((v << 2) >> 1) == 8)");
    assert_eq!(rendered("(v) => 1+2+3/(0+1)"), "(v) => ((1 + 2) + (3 / (0 + 1)))");
    assert_eq!(rendered("(v) => v == 1 == true"), "(v) => ((v == 1) == true)");
}

#[test]
fn test_logical_nodes() {
    match body(r#"(v) => v.Age < 23 || v.Name == "tom""#) {
        Expr::Logical {
            op: LogicalOp::Or,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::Binary { op: BinOp::LessThan, .. }));
            assert!(matches!(*right, Expr::Binary { op: BinOp::Equal, .. }));
        }
        other => panic!("Expected logical or, got {:?}", other),
    }
}

#[test]
fn test_unary_chain() {
    assert_eq!(
        body("(v) => !!v"),
        Expr::unary(UnaryOp::Not, Expr::unary(UnaryOp::Not, Expr::Param))
    );
    assert_eq!(
        body("(v) => --v"),
        Expr::unary(UnaryOp::Negate, Expr::unary(UnaryOp::Negate, Expr::Param))
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unbalanced_parentheses() {
    let cases = vec!["(v) => (v > 1", "(v) => ((v > 1)", "(v) => v > 1)", "(v) => )"];

    for input in cases {
        assert!(
            matches!(compile(input), Err(ParseError::UnbalancedParenthesis { .. })),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_empty_parentheses() {
    assert!(matches!(
        compile("(v) => ()"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_missing_operand() {
    for input in ["(v) => v >", "(v) => v + * 2", "(v) => && v", "(v) => !"] {
        assert!(
            matches!(compile(input), Err(ParseError::UnexpectedToken { .. })),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_trailing_input() {
    assert!(matches!(
        compile("(v) => v > 1 2"),
        Err(ParseError::TrailingInput { .. })
    ));
    assert!(matches!(
        compile("(v) => v => v"),
        Err(ParseError::TrailingInput { .. })
    ));
}

#[test]
fn test_lex_errors_surface_through_compile() {
    assert!(matches!(
        compile("(v) => v = 1"),
        Err(ParseError::Lex(LexError::LoneEquals { .. }))
    ));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        compile("(v) => x > 1").unwrap_err().to_string(),
        "Unknown identifier `x` at line 1, column 8: the only name in scope is `v`"
    );
    assert_eq!(
        compile("(v) v").unwrap_err().to_string(),
        "Missing `=>` at line 1, column 5, got identifier `v`"
    );
}

// ============================================================================
// Nesting limit
// ============================================================================

#[test]
fn test_deep_parentheses_are_rejected() {
    let depth = 10_000;
    let input = format!("(v) => {}v{} > 1", "(".repeat(depth), ")".repeat(depth));
    assert!(matches!(
        compile(&input),
        Err(ParseError::NestingTooDeep { limit, .. }) if limit == DEFAULT_MAX_DEPTH
    ));
}

#[test]
fn test_deep_unary_chain_is_rejected() {
    let input = format!("(v) => {}v", "!".repeat(10_000));
    assert!(matches!(
        compile(&input),
        Err(ParseError::NestingTooDeep { .. })
    ));
}

#[test]
fn test_long_operator_chain_is_rejected() {
    let input = format!("(v) => v{} > 0", " + 1".repeat(500_000));
    assert!(matches!(
        compile(&input),
        Err(ParseError::NestingTooDeep { limit, .. }) if limit == DEFAULT_MAX_DEPTH
    ));
}

#[test]
fn test_long_field_chain_is_rejected() {
    let input = format!("(v) => v{} == 1", ".a".repeat(500_000));
    assert!(matches!(
        compile(&input),
        Err(ParseError::NestingTooDeep { .. })
    ));
}

#[test]
fn test_long_logical_chain_fails_at_compile_time() {
    let terms: Vec<String> = (0..200).map(|n| format!("v == {}", n)).collect();
    let input = format!("(v) => {}", terms.join(" || "));
    assert!(matches!(
        compile(&input),
        Err(ParseError::NestingTooDeep { .. })
    ));
}

#[test]
fn test_chain_up_to_the_limit_compiles_and_evaluates() {
    // `v` at depth 1, each `+ 1` adds a level, `> 0` adds the root
    let fits = DEFAULT_MAX_DEPTH - 2;
    let input = format!("(v) => v{} > 0", " + 1".repeat(fits));
    let predicate = compile(&input).unwrap();
    assert_eq!(predicate.body().depth(), DEFAULT_MAX_DEPTH);
    assert_eq!(predicate.apply(&[1, -1000]).unwrap(), vec![1]);

    let input = format!("(v) => v{} > 0", " + 1".repeat(fits + 1));
    assert!(matches!(
        compile(&input),
        Err(ParseError::NestingTooDeep { .. })
    ));
}

#[test]
fn test_tree_depth_limit_is_configurable() {
    let options = CompileOptions { max_depth: 4 };
    // Binary(>, Binary(+, Binary(+, v, 1), 1), 0) has depth 4
    assert!(compile_with("(v) => v + 1 + 1 > 0", &options).is_ok());
    assert!(matches!(
        compile_with("(v) => v + 1 + 1 + 1 > 0", &options),
        Err(ParseError::NestingTooDeep { limit: 4, .. })
    ));
    assert!(compile_with("(v) => v.a.b.c", &options).is_ok());
    assert!(compile_with("(v) => v.a.b.c.d", &options).is_err());
    assert!(compile_with("(v) => ---v", &options).is_ok());
    assert!(compile_with("(v) => ----v", &options).is_err());
}

#[test]
fn test_configured_nesting_limit() {
    let options = CompileOptions { max_depth: 3 };
    assert!(compile_with("(v) => (((v))) > 1", &options).is_ok());
    assert!(matches!(
        compile_with("(v) => ((((v)))) > 1", &options),
        Err(ParseError::NestingTooDeep { limit: 3, .. })
    ));
    assert_eq!(compile_with("(v) => v > 1", &options).unwrap().max_depth(), 3);
}

// ============================================================================
// Display round trip
// ============================================================================

#[test]
fn test_display_reparses_to_same_tree() {
    let sources = vec![
        "(v) => v*2 >= 5+1+1*((2+1*10000)*0+1)",
        r#"(s) => s.Age < 23 || s.Name == "to\"m""#,
        "(v) => -(v + 1) < -2.5 && !(v == 3)",
        "(v) => (v<<2)>>1 ^ 3 | 1 & 7 == 8",
    ];

    for source in sources {
        let first = parse(source);
        let second = parse(&first.to_string());
        assert_eq!(first, second, "Failed for input: {}", source);
    }
}
