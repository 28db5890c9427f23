#[cfg(test)]
mod interpreter_tests {
    use nyasharp::callable::NativeFunction;
    use nyasharp::interpreter::Interpreter;
    use nyasharp::reporter::CapturedOutput;
    use nyasharp::session::{RunStatus, Session};
    use nyasharp::value::Value;

    fn session() -> (Session, CapturedOutput) {
        let output = CapturedOutput::new();
        (Session::new(Box::new(output.clone())), output)
    }

    /// Run `source` in a fresh session and return status, prints and errors.
    fn run(source: &str) -> (RunStatus, Vec<String>, Vec<String>) {
        let (mut session, output) = session();
        let status = session.run(source);

        (status, output.prints(), output.errors())
    }

    fn assert_prints(source: &str, expected: &[&str]) {
        let (status, prints, errors) = run(source);

        assert_eq!(errors, Vec::<String>::new());
        assert_eq!(status, RunStatus::Ok);
        assert_eq!(prints, expected);
    }

    fn assert_runtime_error(source: &str, expected: &str) {
        let (status, _, errors) = run(source);

        assert_eq!(status, RunStatus::RuntimeError);
        assert_eq!(errors, vec![expected.to_string()]);
    }

    // ───────────────────────────── expressions ─────────────────────────────

    #[test]
    fn test_interpreter_01_arithmetic() {
        assert_prints(
            "pwint 2 +.+ 3 +.* 4; pwint (2 +.+ 3) +.* 4; pwint 7 -.* 2; pwint 7 %.% 3; pwint -.- 1.5;",
            &["14", "20", "3.5", "1", "-1.5"],
        );
    }

    #[test]
    fn test_interpreter_02_comparison_and_equality() {
        assert_prints(
            "pwint 1 /o/ 2; pwint 2 _o/ 2; pwint 3 \\o\\ 4; pwint 4 \\o_ 4; \
             pwint 1 \\o/ 1; pwint \"a\" _o_ \"a\"; pwint nuww \\o/ fawse;",
            &["twue", "twue", "fawse", "twue", "twue", "fawse", "fawse"],
        );
    }

    #[test]
    fn test_interpreter_03_literals_and_truthiness() {
        assert_prints(
            "pwint nuww; pwint ~nuww; pwint ~0; pwint ~\"\"; pwint twue;",
            &["nuww", "twue", "fawse", "fawse", "twue"],
        );
    }

    #[test]
    fn test_interpreter_04_logical_short_circuit() {
        assert_prints(
            "pwint nuww v.v \"yes\"; pwint 1 &.& 2; pwint fawse &.& undefined; pwint 1 v.v undefined;",
            &["yes", "2", "fawse", "1"],
        );
    }

    #[test]
    fn test_string_concatenation() {
        assert_prints(
            "pwint \"nya\" +.+ \"nya\"; pwint \"n\" +.+ 1; pwint 2 +.+ \"x\"; pwint \"b\" +.+ twue;",
            &["nyanya", "n1", "2x", "btwue"],
        );
    }

    #[test]
    fn test_division_by_zero_is_ieee() {
        assert_prints("pwint 1 -.* 0; pwint -.- 1 -.* 0;", &["inf", "-inf"]);
    }

    #[test]
    fn test_nan_equality_and_negative_zero() {
        assert_prints(
            ">.< nan o/ 0 -.* 0; pwint nan \\o/ nan; pwint nan _o_ nan; pwint nan /o/ nan; \
             pwint -.- 0; pwint 0 \\o/ -.- 0;",
            &["twue", "fawse", "fawse", "-0", "twue"],
        );
    }

    #[test]
    fn test_type_keywords_and_typeof() {
        assert_prints(
            "pwint Numbew; pwint typeof(1) \\o/ Numbew; pwint typeof(\"s\") \\o/ Stwing; \
             pwint typeof(twue) \\o/ Boowean; pwint typeof(nuww); pwint typeof(clock);",
            &["Numbew", "twue", "twue", "twue", "nuww", "Function"],
        );
    }

    // ───────────────────────────── statements ──────────────────────────────

    #[test]
    fn test_variables_and_shadowing() {
        assert_prints(
            ">.< a o/ \"global\"; :> >.< a o/ \"local\"; pwint a; <: pwint a; >.< b; pwint b;",
            &["local", "global", "nuww"],
        );
    }

    #[test]
    fn test_assignment_walks_to_enclosing_scope() {
        assert_prints(
            ">.< a o/ 1; :> a o/ 2; :> a o/ a +.+ 1; <: <: pwint a;",
            &["3"],
        );
    }

    #[test]
    fn test_control_flow() {
        assert_prints(
            "^u^ (1 \\o\\ 2) pwint \"then\"; ^e^ pwint \"else\"; \
             >.< i o/ 0; ^w^ (i /o/ 3) :> pwint i; i o/ i +.+ 1; <: \
             ^o^ (>.< j o/ 0; j /o/ 2; j o/ j +.+ 1) pwint j;",
            &["else", "0", "1", "2", "0", "1"],
        );
    }

    #[test]
    fn test_for_loop_variable_is_scoped() {
        let (status, _, errors) = run("^o^ (>.< k o/ 0; k /o/ 1; k o/ k +.+ 1) :> <: pwint k;");

        assert_eq!(status, RunStatus::RuntimeError);
        assert_eq!(errors, vec!["[line 1] Undefined variable 'k'."]);
    }

    // ───────────────────────────── functions ───────────────────────────────

    #[test]
    fn test_function_call_and_return() {
        assert_prints(
            ":D add(a, b) :> c: a +.+ b; <: pwint add(1, 2); \
             :D nothing() :> <: pwint nothing(); \
             :D early() :> ^w^ (twue) :> c: \"out\"; <: <: pwint early(); \
             pwint add;",
            &["3", "nuww", "out", "<fn add>"],
        );
    }

    #[test]
    fn test_recursion() {
        assert_prints(
            ":D fib(n) :> ^u^ (n /o/ 2) c: n; c: fib(n -.- 1) +.+ fib(n -.- 2); <: pwint fib(15);",
            &["610"],
        );
    }

    #[test]
    fn test_closures_capture_defining_scope() {
        assert_prints(
            ":D makeCounter() :> >.< i o/ 0; :D count() :> i o/ i +.+ 1; c: i; <: c: count; <: \
             >.< a o/ makeCounter(); >.< b o/ makeCounter(); \
             pwint a(); pwint a(); pwint b();",
            &["1", "2", "1"],
        );
    }

    #[test]
    fn test_closures_share_captured_scope() {
        assert_prints(
            ">.< get; >.< set; \
             :D make() :> >.< v o/ 1; :D g() :> c: v; <: :D s(x) :> v o/ x; <: get o/ g; set o/ s; <: \
             make(); set(42); pwint get();",
            &["42"],
        );
    }

    #[test]
    fn test_function_identity() {
        assert_prints(
            ":D f() :> <: >.< g o/ f; pwint f \\o/ g; \
             :D make() :> :D inner() :> <: c: inner; <: pwint make() \\o/ make();",
            &["twue", "fawse"],
        );
    }

    #[test]
    fn test_static_binding_ignores_later_shadowing() {
        assert_prints(
            ">.< a o/ \"global\"; \
             :> :D show() :> pwint a; <: show(); >.< a o/ \"block\"; show(); <:",
            &["global", "global"],
        );
    }

    #[test]
    fn test_natives() {
        assert_prints(
            "pwint uwuify(\"hello world\"); pwint clock() \\o\\ 0; pwint clock;",
            &["hewwo wuwwd", "twue", "<native fn clock>"],
        );
    }

    #[test]
    fn test_emoticon_native() {
        let (status, prints, _) = run("pwint emoticon();");

        assert_eq!(status, RunStatus::Ok);
        assert!(
            nyasharp::natives::EMOTICONS
                .iter()
                .any(|face| prints[0] == format!(" {}", face)),
            "got {:?}",
            prints
        );
    }

    #[test]
    fn test_host_registered_native() {
        fn double(_: &mut Interpreter, args: &[Value]) -> Result<Value, String> {
            match args {
                [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
                _ => Err("double expects a number.".to_string()),
            }
        }

        let output = CapturedOutput::new();
        let interpreter = Interpreter::with_natives(
            Box::new(output.clone()),
            vec![NativeFunction::new("double", 1, double)],
        );
        let mut session = Session::with_interpreter(interpreter);

        assert_eq!(session.run("pwint double(21);"), RunStatus::Ok);
        assert_eq!(session.run("double(\"x\");"), RunStatus::RuntimeError);
        // Only the natives handed in are installed.
        assert_eq!(session.run("clock();"), RunStatus::RuntimeError);

        assert_eq!(output.prints(), vec!["42"]);
        assert_eq!(
            output.errors(),
            vec![
                "[line 1] double expects a number.",
                "[line 1] Undefined variable 'clock'.",
            ]
        );
    }

    // ───────────────────────────── runtime errors ──────────────────────────

    #[test]
    fn test_runtime_type_errors() {
        assert_runtime_error("pwint -.- \"a\";", "[line 1] Operand of '-.-' must be a number.");
        assert_runtime_error(
            "pwint 1 +.* \"a\";",
            "[line 1] Operands of '+.*' must be numbers.",
        );
        assert_runtime_error(
            "pwint twue +.+ 1;",
            "[line 1] Operands of '+.+' must be numbers, or one must be a string.",
        );
        assert_runtime_error("pwint \"x\"();", "[line 1] Can only call functions.");
        assert_runtime_error("pwint ghost;", "[line 1] Undefined variable 'ghost'.");
        assert_runtime_error("ghost o/ 1;", "[line 1] Undefined variable 'ghost'.");
    }

    #[test]
    fn test_arity_mismatch_names_both_counts() {
        assert_runtime_error(
            ":D f(a, b) :> <:\nf(1);",
            "[line 2] Expected 2 arguments but got 1.",
        );
        assert_runtime_error(
            ":D f(a, b) :> <:\nf(1, 2, 3);",
            "[line 2] Expected 2 arguments but got 3.",
        );
        assert_runtime_error("typeof();", "[line 1] Expected 1 arguments but got 0.");
    }

    #[test]
    fn test_deep_recursion_on_default_stack() {
        assert_prints(
            ":D sum(n) :> ^u^ (n \\o/ 0) c: 0; c: n +.+ sum(n -.- 1); <: pwint sum(1000);",
            &["500500"],
        );
    }

    #[test]
    fn test_unbounded_recursion_is_a_runtime_error() {
        assert_runtime_error(
            ":D loop() :> c: loop(); <: loop();",
            "[line 1] Stack overflow.",
        );
    }

    #[test]
    fn test_runtime_error_keeps_earlier_output() {
        let (status, prints, errors) = run("pwint 1;\npwint nope;\npwint 3;");

        assert_eq!(status, RunStatus::RuntimeError);
        assert_eq!(prints, vec!["1"]);
        assert_eq!(errors, vec!["[line 2] Undefined variable 'nope'."]);
    }

    // ───────────────────────────── static errors ───────────────────────────

    #[test]
    fn test_static_error_blocks_execution() {
        let (status, prints, errors) = run("pwint 1;\npwint +.+;\npwint 3;");

        assert_eq!(status, RunStatus::StaticError);
        assert!(prints.is_empty());
        assert_eq!(errors, vec!["[line 2] Error at '+.+': Expected expression."]);
    }

    #[test]
    fn test_scan_and_parse_errors_are_all_reported() {
        let (status, prints, errors) = run("pwint 1;\n$\npwint (;");

        assert_eq!(status, RunStatus::StaticError);
        assert!(prints.is_empty());
        assert_eq!(
            errors,
            vec![
                "[line 2] Error: Unexpected character: $",
                "[line 3] Error at ';': Expected expression.",
            ]
        );
    }

    #[test]
    fn test_resolve_error_blocks_execution() {
        let (status, prints, errors) = run("pwint 1; c: 2;");

        assert_eq!(status, RunStatus::StaticError);
        assert!(prints.is_empty());
        assert_eq!(
            errors,
            vec!["[line 1] Error at 'c:': Can't return from top-level code."]
        );
    }

    // ───────────────────────────── sessions ────────────────────────────────

    #[test]
    fn test_session_state_persists_between_runs() {
        let (mut session, output) = session();

        assert_eq!(session.run(">.< a o/ 1;"), RunStatus::Ok);
        assert_eq!(session.run(":D inc() :> a o/ a +.+ 1; c: a; <:"), RunStatus::Ok);
        assert_eq!(session.run("pwint inc();"), RunStatus::Ok);
        assert_eq!(session.run("pwint oops;"), RunStatus::RuntimeError);
        assert_eq!(session.run("pwint +.+;"), RunStatus::StaticError);
        assert_eq!(session.run("pwint inc();"), RunStatus::Ok);

        assert_eq!(output.prints(), vec!["2", "3"]);
        assert_eq!(output.errors().len(), 2);
        assert_eq!(
            session.interpreter().global("a"),
            Some(Value::Number(3.0))
        );
    }

    #[test]
    fn test_runtime_error_inside_block_restores_scope() {
        let (mut session, output) = session();

        assert_eq!(
            session.run(">.< a o/ \"outer\"; :> >.< a o/ \"inner\"; boom(); <:"),
            RunStatus::RuntimeError
        );
        assert_eq!(session.run("pwint a;"), RunStatus::Ok);

        assert_eq!(output.prints(), vec!["outer"]);
    }
}
