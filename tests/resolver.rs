#[cfg(test)]
mod resolver_tests {
    use nyasharp::ast::{ExprId, Stmt};
    use nyasharp::error::NyaError;
    use nyasharp::interpreter::Interpreter;
    use nyasharp::parser::Parser;
    use nyasharp::reporter::CapturedOutput;
    use nyasharp::resolver::Resolver;
    use nyasharp::scanner::scan;

    fn resolve(source: &str) -> (Interpreter, Vec<Stmt>, Vec<NyaError>) {
        let mut interpreter = Interpreter::new(Box::new(CapturedOutput::new()));

        let (tokens, errors) = scan(source);
        assert!(errors.is_empty(), "scan errors: {:?}", errors);

        let parsed = Parser::new(&tokens, interpreter.ast_mut()).parse();
        assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);

        let statements: Vec<Stmt> = parsed.statements.into_iter().flatten().collect();
        let errors = Resolver::new(&mut interpreter).resolve(&statements);

        (interpreter, statements, errors)
    }

    fn error_messages(source: &str) -> Vec<String> {
        let (_, _, errors) = resolve(source);
        errors.iter().map(ToString::to_string).collect()
    }

    /// The expression of the first `pwint` found depth-first.
    fn first_print(statements: &[Stmt]) -> Option<ExprId> {
        statements.iter().find_map(|stmt| match stmt {
            Stmt::Print(expr) => Some(*expr),
            Stmt::Block(inner) => first_print(inner),
            Stmt::Function(decl) => first_print(&decl.body),
            _ => None,
        })
    }

    #[test]
    fn test_local_distance_counts_scopes() {
        let (interpreter, statements, errors) =
            resolve(":> >.< a o/ 1; :> :> pwint a; <: <: <:");
        assert!(errors.is_empty());

        let id = first_print(&statements).expect("print statement");
        assert_eq!(interpreter.resolved_depth(id), Some(2));
    }

    #[test]
    fn test_globals_are_left_unresolved() {
        let (interpreter, statements, errors) = resolve(">.< a o/ 1; :> pwint a; <:");
        assert!(errors.is_empty());

        let id = first_print(&statements).expect("print statement");
        assert_eq!(interpreter.resolved_depth(id), None);
    }

    #[test]
    fn test_parameters_resolve_in_function_scope() {
        let (interpreter, statements, errors) = resolve(":D f(x) :> pwint x; <:");
        assert!(errors.is_empty());

        // Parameters and body share the function's scope.
        let id = first_print(&statements).expect("print statement");
        assert_eq!(interpreter.resolved_depth(id), Some(0));
    }

    #[test]
    fn test_read_in_own_initializer() {
        assert_eq!(
            error_messages(":> >.< a o/ a; <:"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );

        // At top level the name simply refers to the global.
        assert!(error_messages(">.< a o/ a;").is_empty());
    }

    #[test]
    fn test_duplicate_local_declaration() {
        assert_eq!(
            error_messages(":> >.< a o/ 1; >.< a o/ 2; <:"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );

        // Redeclaring a global is allowed.
        assert!(error_messages(">.< a o/ 1; >.< a o/ 2;").is_empty());
    }

    #[test]
    fn test_duplicate_parameter() {
        assert_eq!(
            error_messages(":D f(a, a) :> <:"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_top_level_return() {
        assert_eq!(
            error_messages("c: 1;"),
            vec!["[line 1] Error at 'c:': Can't return from top-level code."]
        );

        assert!(error_messages(":D f() :> c: 1; <:").is_empty());
    }

    #[test]
    fn test_resolution_continues_after_error() {
        let errors = error_messages("c: 1;\n:> >.< b o/ b; <:");

        assert_eq!(errors.len(), 2);
        assert!(errors[1].starts_with("[line 2]"));
    }
}
