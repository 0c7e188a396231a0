mod common;

use common::{analyze, findings, lines};
use indoc::indoc;
use pretty_assertions::assert_eq;

#[test]
fn test_descends_into_every_statement_kind() {
    let diagnostics = analyze(indoc! {r#"
        package p

        import (
            "context"
            "os"
            "testing"
        )

        func TestShapes(t *testing.T) {
            if err := os.Setenv("A", "b"); err != nil {
                os.Setenv("B", "c")
            } else if os.Chdir("/") != nil {
                os.Setenv("C", "d")
            } else {
                os.Setenv("D", "e")
            }
            for i := 0; i < len(os.TempDir()); i++ {
                os.Setenv("E", "f")
            }
            for _, r := range os.TempDir() {
                _ = r
            }
            defer os.Chdir("/")
            go os.Setenv("F", "g")
            var ctx = context.Background()
            _ = ctx
            switch os.TempDir() {
            case os.TempDir():
                os.Setenv("G", "h")
            default:
                os.Setenv("H", "i")
            }
            var v interface{} = 1
            switch x := v.(type) {
            case int:
                _ = x
                os.Setenv("I", "j")
            }
            ch := make(chan int)
            select {
            case <-ch:
                os.Setenv("J", "k")
            default:
                os.Setenv("K", "l")
            }
            {
                os.Setenv("L", "m")
            }
        }
    "#});

    assert_eq!(
        lines(&diagnostics),
        vec![10, 11, 12, 13, 15, 17, 18, 20, 23, 24, 25, 27, 28, 29, 31, 37, 42, 44, 47]
    );
}

#[test]
fn test_return_values_and_expressions() {
    let diagnostics = analyze(indoc! {r#"
        package p

        import (
            "context"
            "os"
            "testing"
        )

        func TestExprs(t *testing.T) (context.Context, string) {
            m := map[string]string{"dir": os.TempDir()}
            _ = m
            _ = len(os.TempDir()) + len(os.TempDir())
            _ = (os.TempDir())
            _ = []string{os.TempDir()}[0]
            _ = os.TempDir()[1:]
            return context.TODO(), os.TempDir()
        }
    "#});

    assert_eq!(lines(&diagnostics), vec![10, 12, 12, 13, 14, 15, 16, 16]);
}

#[test]
fn test_terminal_statements_are_not_expanded() {
    let diagnostics = analyze(indoc! {r#"
        package p

        import (
            "os"
            "testing"
        )

        func TestTerminal(t *testing.T) {
            ch := make(chan string, 1)
            ch <- os.TempDir()
        loop:
            for {
                os.Setenv("A", "b")
                break loop
            }
        }
    "#});

    assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
}

#[test]
fn test_nested_closures_share_the_enclosing_test() {
    let diagnostics = analyze(indoc! {r#"
        package p

        import (
            "os"
            "testing"
        )

        func TestTable(t *testing.T) {
            cases := []struct{ name string }{{"a"}}
            for _, tc := range cases {
                t.Run(tc.name, func(t *testing.T) {
                    os.Setenv("A", "b")
                })
                func() {
                    os.Setenv("B", "c")
                }()
            }
        }
    "#});

    assert_eq!(
        findings(&diagnostics),
        vec![
            (
                12,
                "os.Setenv() could be replaced by t.Setenv() in anonymous function".to_string()
            ),
            (
                15,
                "os.Setenv() could be replaced by t.Setenv() in TestTable".to_string()
            ),
        ]
    );
}

#[test]
fn test_eligible_literals_outside_tests() {
    let diagnostics = analyze(indoc! {r#"
        package p

        import (
            "os"
            "testing"
        )

        var check = func(tb testing.TB) {
            os.Setenv("A", "b")
        }

        func register(f func(*testing.T)) {}

        func init() {
            os.Setenv("B", "c")
            register(func(t *testing.T) {
                os.Setenv("C", "d")
            })
        }
    "#});

    assert_eq!(
        findings(&diagnostics),
        vec![
            (
                9,
                "os.Setenv() could be replaced by tb.Setenv() in anonymous function".to_string()
            ),
            (
                17,
                "os.Setenv() could be replaced by t.Setenv() in anonymous function".to_string()
            ),
        ]
    );
}

#[test]
fn test_call_site_match_is_not_reported_twice() {
    let diagnostics = analyze(indoc! {r#"
        package p

        import (
            "os"
            "testing"
        )

        func TestOnce(t *testing.T) {
            os.CreateTemp("", os.TempDir())
        }
    "#});

    let rules: Vec<_> = diagnostics.iter().map(|d| d.rule.to_string()).collect();
    assert_eq!(rules, vec!["ostempdir", "oscreatetemp"]);
}

#[test]
fn test_long_operator_chain() {
    let terms = vec![r#""a""#; 5000].join(" + ");
    let source = format!(
        "package p\n\nimport (\n\t\"os\"\n\t\"testing\"\n)\n\nfunc TestChain(t *testing.T) {{\n\t_ = {terms} + os.TempDir()\n}}\n"
    );

    let diagnostics = analyze(&source);

    let rules: Vec<_> = diagnostics.iter().map(|d| d.rule.to_string()).collect();
    assert_eq!(rules, vec!["ostempdir"]);
    assert_eq!(lines(&diagnostics), vec![9]);
}
