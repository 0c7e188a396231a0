//! Go front end: tree-sitter-go parsing and import-based symbol resolution.

mod imports;
mod lower;

pub use imports::{default_package_name, ImportResolver};

use crate::core::ast::{Pos, SourceFile};
use crate::core::errors::Error;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tree_sitter::{Node, Parser};

use lower::Lowerer;

/// A lowered file plus the names it declares at any scope.
#[derive(Debug)]
pub struct ParsedFile {
    pub ast: SourceFile,
    pub declared: HashSet<String>,
}

pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .context("Failed to set Go language")?;
        Ok(Self { parser })
    }

    /// Parse `source` as the contents of `path`.
    ///
    /// Files with syntax errors are rejected rather than partially lowered.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<ParsedFile> {
        let tree = self
            .parser
            .parse(source, None)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let root = tree.root_node();

        if root.has_error() {
            let at = first_error(root).unwrap_or_default();
            return Err(Error::parse(path, format!("syntax error at {at}")).into());
        }

        let mut lowerer = Lowerer::new(source);
        let ast = lowerer.lower_file(root, path.to_path_buf());
        tracing::debug!(
            file = %path.display(),
            decls = ast.decls.len(),
            imports = ast.imports.len(),
            "lowered Go file"
        );

        Ok(ParsedFile {
            ast,
            declared: lowerer.into_declared(),
        })
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedFile> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.parse(&source, path)
    }
}

/// Pre-order search for the first error or missing node, descending only
/// into subtrees that contain one.
fn first_error(root: Node) -> Option<Pos> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            let start = node.start_position();
            return Some(Pos::new(start.row + 1, start.column + 1));
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::{Decl, Expr, ImportName, Stmt};

    fn parse(source: &str) -> ParsedFile {
        GoParser::new()
            .unwrap()
            .parse(source, Path::new("x_test.go"))
            .unwrap()
    }

    #[test]
    fn test_lowers_package_imports_and_functions() {
        let parsed = parse(
            "package p\n\nimport (\n\t\"os\"\n\tctx \"context\"\n\t. \"testing\"\n)\n\nfunc TestA(t *T) {\n\tos.Setenv(\"A\", \"b\")\n}\n",
        );
        let ast = &parsed.ast;

        assert_eq!(ast.package, "p");
        assert_eq!(ast.imports.len(), 3);
        assert_eq!(ast.imports[0].name, ImportName::Default);
        assert_eq!(ast.imports[1].name, ImportName::Alias("ctx".into()));
        assert_eq!(ast.imports[2].name, ImportName::Dot);
        assert_eq!(ast.imports[2].path, "testing");

        let Decl::Func(func) = &ast.decls[0] else {
            panic!("expected a function, got {:?}", ast.decls[0]);
        };
        assert_eq!(func.name.name, "TestA");
        assert_eq!(func.ty.params[0].names[0].name, "t");
        assert!(matches!(func.ty.params[0].ty, Expr::Star { .. }));

        let body = func.body.as_ref().unwrap();
        let Stmt::Expr(Expr::Call(call)) = &body.stmts[0] else {
            panic!("expected a call statement, got {:?}", body.stmts[0]);
        };
        assert_eq!((call.pos.line, call.pos.column), (10, 2));
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn test_records_declared_names() {
        let parsed = parse(
            "package p\n\nvar Setenv = 1\n\nfunc helper(a int) {\n\tb := a\n\t_ = b\n}\n",
        );
        for name in ["Setenv", "helper", "a", "b"] {
            assert!(parsed.declared.contains(name), "{name} not recorded");
        }
        assert!(!parsed.declared.contains("_"));
    }

    #[test]
    fn test_lowers_operator_chain_flat() {
        let parsed = parse("package p\n\nfunc f() {\n\t_ = a - b + c\n}\n");
        let Decl::Func(func) = &parsed.ast.decls[0] else {
            panic!("expected a function, got {:?}", parsed.ast.decls[0]);
        };
        let Stmt::Assign { rhs, .. } = &func.body.as_ref().unwrap().stmts[0] else {
            panic!("expected an assignment");
        };
        let Expr::Binary { x, rest, .. } = &rhs[0] else {
            panic!("expected a binary expression, got {:?}", rhs[0]);
        };

        assert!(matches!(&**x, Expr::Ident(id) if id.name == "a"));
        let ops: Vec<_> = rest.iter().map(|(op, _)| op.as_str()).collect();
        assert_eq!(ops, vec!["-", "+"]);
        assert!(matches!(&rest[1].1, Expr::Ident(id) if id.name == "c"));
    }

    #[test]
    fn test_rejects_syntax_errors() {
        let err = GoParser::new()
            .unwrap()
            .parse("package p\nfunc (", Path::new("bad.go"))
            .unwrap_err();
        assert!(err.to_string().contains("bad.go"));
    }
}
