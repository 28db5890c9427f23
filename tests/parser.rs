#[cfg(test)]
mod parser_tests {
    use nyasharp::ast::{Ast, Stmt};
    use nyasharp::ast_printer::AstPrinter;
    use nyasharp::parser::{Parsed, Parser};
    use nyasharp::scanner::scan;

    fn parse(source: &str) -> (Ast, Parsed) {
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty(), "scan errors: {:?}", errors);

        let mut ast = Ast::new();
        let parsed = Parser::new(&tokens, &mut ast).parse();

        (ast, parsed)
    }

    /// Parse `source` without errors and render every statement.
    fn assert_prints(source: &str, expected: &[&str]) {
        let (ast, parsed) = parse(source);
        assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);

        let printer = AstPrinter::new(&ast);
        let rendered: Vec<_> = parsed
            .statements
            .iter()
            .map(|stmt| printer.print_stmt(stmt.as_ref().expect("statement parsed")))
            .collect();

        assert_eq!(rendered, expected);
    }

    fn error_messages(source: &str) -> Vec<String> {
        let (_, parsed) = parse(source);
        parsed.errors.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parser_01_precedence() {
        assert_prints("1 +.+ 2 +.* 3;", &["(; (+.+ 1 (+.* 2 3)))"]);
        assert_prints("1 -.- 2 -.- 3;", &["(; (-.- (-.- 1 2) 3))"]);
        assert_prints("1 +.+ 2 %.% 3 +.+ 4;", &["(; (%.% (+.+ 1 2) (+.+ 3 4)))"]);
        assert_prints(
            "a \\o/ 1 /o/ 2 v.v b &.& ~c;",
            &["(; (v.v (\\o/ a (/o/ 1 2)) (&.& b (~ c))))"],
        );
    }

    #[test]
    fn test_parser_02_grouping_and_unary() {
        assert_prints(
            "pwint (1 +.+ 2) +.* -.- 3;",
            &["(pwint (+.* (group (+.+ 1 2)) (-.- 3)))"],
        );
    }

    #[test]
    fn test_parser_03_assignment_is_right_associative() {
        assert_prints("a o/ b o/ 3;", &["(; (o/ a (o/ b 3)))"]);
    }

    #[test]
    fn test_parser_04_calls_and_literals() {
        assert_prints(
            "f(1, \"two\", twue)(nuww);",
            &["(; (call (call f 1 \"two\" twue) nuww))"],
        );
        assert_prints(
            ">.< t o/ Numbew;",
            &["(>.< t \"Numbew\")"],
        );
    }

    #[test]
    fn test_parser_05_declarations() {
        assert_prints(
            ":D add(a, b) :> c: a +.+ b; <: >.< x;",
            &["(:D add (a b) (c: (+.+ a b)))", "(>.< x)"],
        );
    }

    #[test]
    fn test_parser_06_control_flow() {
        assert_prints(
            "^u^ (x) pwint 1; ^e^ pwint 2; ^w^ (fawse) :> <:",
            &[
                "(^u^ x (pwint 1) (pwint 2))",
                "(^w^ fawse (block))",
            ],
        );
    }

    #[test]
    fn test_for_loop_desugars_to_while() {
        assert_prints(
            "^o^ (>.< i o/ 0; i /o/ 3; i o/ i +.+ 1) pwint i;",
            &["(block (>.< i 0) (^w^ (/o/ i 3) (block (pwint i) (; (o/ i (+.+ i 1))))))"],
        );

        // Missing clauses: no initializer block, condition becomes `twue`.
        assert_prints("^o^ (;;) pwint 1;", &["(^w^ twue (pwint 1))"]);
    }

    #[test]
    fn test_error_recovery_reports_each_bad_declaration_once() {
        let (_, parsed) = parse("pwint 1;\npwint +.+;\npwint 3;");

        assert_eq!(parsed.statements.len(), 3);
        assert!(parsed.statements[0].is_some());
        assert!(parsed.statements[1].is_none());
        assert!(parsed.statements[2].is_some());

        let errors: Vec<_> = parsed.errors.iter().map(ToString::to_string).collect();
        assert_eq!(errors, vec!["[line 2] Error at '+.+': Expected expression."]);
    }

    #[test]
    fn test_missing_semicolon_at_end() {
        assert_eq!(
            error_messages(">.< a o/ 1"),
            vec!["[line 1] Error at end: Expected ';' after variable declaration."]
        );
    }

    #[test]
    fn test_unclosed_block() {
        assert_eq!(
            error_messages(":> pwint 1;"),
            vec!["[line 1] Error at end: Expected '<:' after block."]
        );
    }

    #[test]
    fn test_invalid_assignment_target_is_not_fatal() {
        let (_, parsed) = parse("1 +.+ 2 o/ 3; pwint 4;");

        let errors: Vec<_> = parsed.errors.iter().map(ToString::to_string).collect();
        assert_eq!(errors, vec!["[line 1] Error at 'o/': Invalid assignment target."]);

        // Both statements are still produced.
        assert_eq!(parsed.statements.iter().flatten().count(), 2);
    }

    #[test]
    fn test_const_is_reserved() {
        assert_eq!(
            error_messages(">w< x o/ 1; pwint x;"),
            vec!["[line 1] Error at '>w<': Expected expression."]
        );
    }

    #[test]
    fn test_argument_limit() {
        let args = vec!["1"; 256].join(", ");
        let errors = error_messages(&format!("f({});", args));

        assert_eq!(errors.len(), 1);
        assert!(
            errors[0].ends_with("Can't have more than 255 arguments."),
            "got {}",
            errors[0]
        );
    }

    #[test]
    fn test_block_drops_failed_inner_declaration() {
        let (_, parsed) = parse(":> pwint ; pwint 2; <:");

        assert_eq!(parsed.errors.len(), 1);
        match parsed.statements[0].as_ref() {
            Some(Stmt::Block(inner)) => assert_eq!(inner.len(), 1),
            other => panic!("expected block, got {:?}", other),
        }
    }
}
