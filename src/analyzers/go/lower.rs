//! Lowering of tree-sitter-go concrete syntax into [`crate::core::ast`].
//!
//! Node kinds the analyzer has no use for become [`Stmt::Bad`] or
//! [`Expr::Other`]. While lowering, every name the file declares (function
//! and type names, parameters, `:=` targets, `var`/`const` names) is
//! recorded so the import resolver can tell a local binding from a
//! dot-imported symbol.

use crate::core::ast::{
    BasicLit, Block, BranchKind, CallExpr, CaseClause, CommClause, Decl, Expr, Field, FuncDecl,
    FuncLit, FuncType, GenDecl, GenKind, Ident, ImportName, ImportSpec, LitKind, Pos,
    SelectorExpr, SourceFile, Stmt, ValueSpec,
};
use std::collections::HashSet;
use std::path::PathBuf;
use tree_sitter::Node;

pub(crate) struct Lowerer<'s> {
    source: &'s [u8],
    declared: HashSet<String>,
}

impl<'s> Lowerer<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Self {
            source: source.as_bytes(),
            declared: HashSet::new(),
        }
    }

    pub(crate) fn into_declared(self) -> HashSet<String> {
        self.declared
    }

    pub(crate) fn lower_file(&mut self, root: Node, path: PathBuf) -> SourceFile {
        let mut file = SourceFile {
            path,
            ..SourceFile::default()
        };

        for child in named_children(root) {
            match child.kind() {
                "package_clause" => {
                    if let Some(name) = named_children(child).first() {
                        file.package = self.text(*name).to_string();
                    }
                }
                "import_declaration" => self.lower_imports(child, &mut file.imports),
                "function_declaration" | "method_declaration" => {
                    file.decls.push(Decl::Func(self.lower_func_decl(child)));
                }
                "var_declaration" | "const_declaration" => {
                    file.decls.push(Decl::Gen(self.lower_gen_decl(child)));
                }
                "type_declaration" => {
                    self.declare_types(child);
                    file.decls.push(Decl::Other(pos(child)));
                }
                _ => file.decls.push(Decl::Other(pos(child))),
            }
        }

        file
    }

    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source).unwrap_or_default()
    }

    fn ident(&self, node: Node) -> Ident {
        Ident::new(self.text(node), pos(node))
    }

    fn declare(&mut self, ident: &Ident) {
        if !ident.is_blank() {
            self.declared.insert(ident.name.clone());
        }
    }

    fn declare_exprs(&mut self, exprs: &[Expr]) {
        for ident in exprs.iter().filter_map(Expr::as_ident) {
            self.declare(ident);
        }
    }

    // Imports

    fn lower_imports(&self, node: Node, imports: &mut Vec<ImportSpec>) {
        for child in named_children(node) {
            match child.kind() {
                "import_spec" => imports.extend(self.lower_import_spec(child)),
                "import_spec_list" => {
                    for spec in named_children(child) {
                        if spec.kind() == "import_spec" {
                            imports.extend(self.lower_import_spec(spec));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn lower_import_spec(&self, node: Node) -> Option<ImportSpec> {
        let path = node.child_by_field_name("path")?;
        let name = match node.child_by_field_name("name") {
            None => ImportName::Default,
            Some(name) => match name.kind() {
                "dot" => ImportName::Dot,
                "blank_identifier" => ImportName::Blank,
                _ => ImportName::Alias(self.text(name).to_string()),
            },
        };

        Some(ImportSpec {
            name,
            path: self.text(path).trim_matches(|c| c == '"' || c == '`').to_string(),
            pos: pos(node),
        })
    }

    // Declarations

    fn lower_func_decl(&mut self, node: Node) -> FuncDecl {
        let name = node
            .child_by_field_name("name")
            .map(|name| self.ident(name))
            .unwrap_or_else(|| Ident::new("", pos(node)));
        // Methods live in their receiver's method set, not the package scope.
        if node.kind() == "function_declaration" {
            self.declare(&name);
        }

        let recv = node
            .child_by_field_name("receiver")
            .and_then(|receiver| self.lower_params(receiver).params.into_iter().next());

        FuncDecl {
            name,
            recv,
            ty: self.lower_signature(node),
            body: node.child_by_field_name("body").map(|body| self.lower_block(body)),
        }
    }

    fn lower_signature(&mut self, node: Node) -> FuncType {
        if let Some(result) = node.child_by_field_name("result") {
            if result.kind() == "parameter_list" {
                self.lower_params(result);
            }
        }
        node.child_by_field_name("parameters")
            .map(|params| self.lower_params(params))
            .unwrap_or_default()
    }

    fn lower_params(&mut self, node: Node) -> FuncType {
        let mut params = Vec::new();
        for param in named_children(node) {
            if !matches!(
                param.kind(),
                "parameter_declaration" | "variadic_parameter_declaration"
            ) {
                continue;
            }

            let names: Vec<Ident> = children_by_field(param, "name")
                .into_iter()
                .map(|name| self.ident(name))
                .collect();
            for name in &names {
                self.declare(name);
            }

            let ty = param
                .child_by_field_name("type")
                .map(|ty| self.lower_type(ty))
                .unwrap_or(Expr::Other(pos(param)));
            params.push(Field { names, ty });
        }
        FuncType { params }
    }

    fn lower_gen_decl(&mut self, node: Node) -> GenDecl {
        let kind = if node.kind() == "const_declaration" {
            GenKind::Const
        } else {
            GenKind::Var
        };

        let mut specs = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "var_spec" | "const_spec" => specs.push(self.lower_value_spec(child)),
                "var_spec_list" | "const_spec_list" => {
                    for spec in named_children(child) {
                        if matches!(spec.kind(), "var_spec" | "const_spec") {
                            specs.push(self.lower_value_spec(spec));
                        }
                    }
                }
                _ => {}
            }
        }

        GenDecl {
            kind,
            specs,
            pos: pos(node),
        }
    }

    fn lower_value_spec(&mut self, node: Node) -> ValueSpec {
        let names: Vec<Ident> = children_by_field(node, "name")
            .into_iter()
            .map(|name| self.ident(name))
            .collect();
        for name in &names {
            self.declare(name);
        }

        ValueSpec {
            names,
            ty: node.child_by_field_name("type").map(|ty| self.lower_type(ty)),
            values: self.lower_expr_list(node.child_by_field_name("value")),
        }
    }

    fn declare_types(&mut self, node: Node) {
        for spec in named_children(node) {
            if let Some(name) = spec.child_by_field_name("name") {
                let name = self.ident(name);
                self.declare(&name);
            }
        }
    }

    // Statements

    fn lower_block(&mut self, node: Node) -> Block {
        Block {
            stmts: self.lower_statements(node),
            pos: pos(node),
        }
    }

    /// Statements directly under `node`, skipping fielded children such as a
    /// case's expression list.
    fn lower_statements(&mut self, node: Node) -> Vec<Stmt> {
        unfielded_children(node)
            .into_iter()
            .flat_map(|child| {
                if child.kind() == "statement_list" {
                    named_children(child)
                } else {
                    vec![child]
                }
            })
            .map(|child| self.lower_stmt(child))
            .collect()
    }

    fn lower_boxed_stmt(&mut self, node: Option<Node>) -> Option<Box<Stmt>> {
        node.map(|node| Box::new(self.lower_stmt(node)))
    }

    fn lower_stmt(&mut self, node: Node) -> Stmt {
        let at = pos(node);
        match node.kind() {
            "expression_statement" => named_children(node)
                .first()
                .map_or(Stmt::Bad(at), |expr| Stmt::Expr(self.lower_expr(*expr))),
            "assignment_statement" => Stmt::Assign {
                lhs: self.lower_expr_list(node.child_by_field_name("left")),
                rhs: self.lower_expr_list(node.child_by_field_name("right")),
                define: false,
                pos: at,
            },
            "short_var_declaration" => {
                let lhs = self.lower_expr_list(node.child_by_field_name("left"));
                self.declare_exprs(&lhs);
                Stmt::Assign {
                    lhs,
                    rhs: self.lower_expr_list(node.child_by_field_name("right")),
                    define: true,
                    pos: at,
                }
            }
            "receive_statement" => self.lower_receive(node),
            "inc_statement" | "dec_statement" => match named_children(node).first() {
                Some(x) => Stmt::IncDec {
                    x: self.lower_expr(*x),
                    inc: node.kind() == "inc_statement",
                    pos: at,
                },
                None => Stmt::Bad(at),
            },
            "send_statement" => match (
                node.child_by_field_name("channel"),
                node.child_by_field_name("value"),
            ) {
                (Some(chan), Some(value)) => Stmt::Send {
                    chan: self.lower_expr(chan),
                    value: self.lower_expr(value),
                    pos: at,
                },
                _ => Stmt::Bad(at),
            },
            "if_statement" => self.lower_if(node),
            "for_statement" => self.lower_for(node),
            "defer_statement" | "go_statement" => {
                let Some(expr) = named_children(node).first().map(|e| self.lower_expr(*e)) else {
                    return Stmt::Bad(at);
                };
                match (node.kind(), expr) {
                    ("defer_statement", Expr::Call(call)) => Stmt::Defer(call),
                    (_, Expr::Call(call)) => Stmt::Go(call),
                    (_, expr) => Stmt::Expr(expr),
                }
            }
            "return_statement" => Stmt::Return {
                results: self.lower_expr_list(
                    named_children(node)
                        .into_iter()
                        .find(|c| c.kind() == "expression_list"),
                ),
                pos: at,
            },
            "var_declaration" | "const_declaration" => Stmt::Decl(self.lower_gen_decl(node)),
            "type_declaration" => {
                // Local types hold no calls.
                self.declare_types(node);
                Stmt::Empty(at)
            }
            "expression_switch_statement" => Stmt::Switch {
                init: self.lower_boxed_stmt(node.child_by_field_name("initializer")),
                tag: node.child_by_field_name("value").map(|v| self.lower_expr(v)),
                clauses: self.lower_case_clauses(node, "value"),
                pos: at,
            },
            "type_switch_statement" => self.lower_type_switch(node),
            "select_statement" => Stmt::Select {
                clauses: named_children(node)
                    .into_iter()
                    .filter(|c| matches!(c.kind(), "communication_case" | "default_case"))
                    .map(|c| CommClause {
                        comm: self.lower_boxed_stmt(c.child_by_field_name("communication")),
                        body: self.lower_statements(c),
                        pos: pos(c),
                    })
                    .collect(),
                pos: at,
            },
            "block" => Stmt::Block(self.lower_block(node)),
            "labeled_statement" => {
                let label = node
                    .child_by_field_name("label")
                    .map(|l| self.ident(l))
                    .unwrap_or_else(|| Ident::new("", at));
                let stmt = unfielded_children(node)
                    .first()
                    .map_or(Stmt::Empty(at), |s| self.lower_stmt(*s));
                Stmt::Labeled {
                    label,
                    stmt: Box::new(stmt),
                    pos: at,
                }
            }
            "break_statement" => self.lower_branch(node, BranchKind::Break),
            "continue_statement" => self.lower_branch(node, BranchKind::Continue),
            "goto_statement" => self.lower_branch(node, BranchKind::Goto),
            "fallthrough_statement" => self.lower_branch(node, BranchKind::Fallthrough),
            "empty_statement" => Stmt::Empty(at),
            _ => match self.lower_expr(node) {
                Expr::Other(_) => Stmt::Bad(at),
                expr => Stmt::Expr(expr),
            },
        }
    }

    fn lower_receive(&mut self, node: Node) -> Stmt {
        let at = pos(node);
        let Some(right) = node.child_by_field_name("right") else {
            return Stmt::Bad(at);
        };
        let rhs = self.lower_expr(right);

        match node.child_by_field_name("left") {
            None => Stmt::Expr(rhs),
            Some(left) => {
                let define = has_token(node, ":=");
                let lhs = self.lower_expr_list(Some(left));
                if define {
                    self.declare_exprs(&lhs);
                }
                Stmt::Assign {
                    lhs,
                    rhs: vec![rhs],
                    define,
                    pos: at,
                }
            }
        }
    }

    fn lower_if(&mut self, node: Node) -> Stmt {
        let at = pos(node);
        let cond = node
            .child_by_field_name("condition")
            .map_or(Expr::Other(at), |c| self.lower_expr(c));
        let body = node
            .child_by_field_name("consequence")
            .map(|b| self.lower_block(b))
            .unwrap_or_default();

        Stmt::If {
            init: self.lower_boxed_stmt(node.child_by_field_name("initializer")),
            cond,
            body,
            els: self.lower_boxed_stmt(node.child_by_field_name("alternative")),
            pos: at,
        }
    }

    fn lower_for(&mut self, node: Node) -> Stmt {
        let at = pos(node);
        let body_node = node.child_by_field_name("body");
        let body = body_node.map(|b| self.lower_block(b)).unwrap_or_default();
        let header = named_children(node)
            .into_iter()
            .find(|c| Some(*c) != body_node);

        match header {
            Some(clause) if clause.kind() == "range_clause" => {
                let define = has_token(clause, ":=");
                let left = self.lower_expr_list(clause.child_by_field_name("left"));
                if define {
                    self.declare_exprs(&left);
                }
                let mut left = left.into_iter();
                Stmt::Range {
                    key: left.next(),
                    value: left.next(),
                    define,
                    expr: clause
                        .child_by_field_name("right")
                        .map_or(Expr::Other(at), |r| self.lower_expr(r)),
                    body,
                    pos: at,
                }
            }
            Some(clause) if clause.kind() == "for_clause" => Stmt::For {
                init: self.lower_boxed_stmt(clause.child_by_field_name("initializer")),
                cond: clause
                    .child_by_field_name("condition")
                    .map(|c| self.lower_expr(c)),
                post: self.lower_boxed_stmt(clause.child_by_field_name("update")),
                body,
                pos: at,
            },
            header => Stmt::For {
                init: None,
                cond: header.map(|c| self.lower_expr(c)),
                post: None,
                body,
                pos: at,
            },
        }
    }

    fn lower_type_switch(&mut self, node: Node) -> Stmt {
        let at = pos(node);
        let subject = node
            .child_by_field_name("value")
            .map_or(Expr::Other(at), |v| self.lower_expr(v));
        let guard = Expr::TypeAssert {
            x: Box::new(subject),
            ty: None,
            pos: at,
        };

        let assign = match node.child_by_field_name("alias") {
            Some(alias) => {
                let lhs = self.lower_expr_list(Some(alias));
                self.declare_exprs(&lhs);
                Stmt::Assign {
                    lhs,
                    rhs: vec![guard],
                    define: true,
                    pos: pos(alias),
                }
            }
            None => Stmt::Expr(guard),
        };

        Stmt::TypeSwitch {
            init: self.lower_boxed_stmt(node.child_by_field_name("initializer")),
            assign: Box::new(assign),
            clauses: self.lower_case_clauses(node, "type"),
            pos: at,
        }
    }

    /// `case`/`default` clauses of a switch; `list_field` names the field
    /// holding a case's expressions (`value`) or types (`type`).
    fn lower_case_clauses(&mut self, node: Node, list_field: &str) -> Vec<CaseClause> {
        named_children(node)
            .into_iter()
            .filter(|c| {
                matches!(
                    c.kind(),
                    "expression_case" | "type_case" | "default_case"
                )
            })
            .map(|case| {
                let list = children_by_field(case, list_field)
                    .into_iter()
                    .flat_map(|list| self.lower_expr_list(Some(list)))
                    .collect();
                CaseClause {
                    list,
                    body: self.lower_statements(case),
                    pos: pos(case),
                }
            })
            .collect()
    }

    fn lower_branch(&self, node: Node, kind: BranchKind) -> Stmt {
        Stmt::Branch {
            kind,
            label: named_children(node)
                .into_iter()
                .find(|c| c.kind() == "label_name")
                .map(|l| self.ident(l)),
            pos: pos(node),
        }
    }

    // Expressions

    fn lower_expr_list(&mut self, node: Option<Node>) -> Vec<Expr> {
        match node {
            None => Vec::new(),
            Some(list) if list.kind() == "expression_list" => named_children(list)
                .into_iter()
                .map(|e| self.lower_expr(e))
                .collect(),
            Some(expr) => vec![self.lower_expr(expr)],
        }
    }

    fn lower_boxed(&mut self, node: Option<Node>, at: Pos) -> Box<Expr> {
        Box::new(node.map_or(Expr::Other(at), |n| self.lower_expr(n)))
    }

    fn lower_expr(&mut self, node: Node) -> Expr {
        let at = pos(node);
        match node.kind() {
            "identifier" | "field_identifier" | "package_identifier" | "type_identifier"
            | "nil" | "true" | "false" | "iota" => Expr::Ident(self.ident(node)),
            "interpreted_string_literal" | "raw_string_literal" => self.lit(node, LitKind::String),
            "int_literal" => self.lit(node, LitKind::Int),
            "float_literal" => self.lit(node, LitKind::Float),
            "imaginary_literal" => self.lit(node, LitKind::Imag),
            "rune_literal" => self.lit(node, LitKind::Char),
            "selector_expression" => match node.child_by_field_name("field") {
                Some(field) => Expr::Selector(SelectorExpr {
                    x: self.lower_boxed(node.child_by_field_name("operand"), at),
                    sel: self.ident(field),
                    pos: at,
                }),
                None => Expr::Other(at),
            },
            "call_expression" => Expr::Call(CallExpr {
                fun: self.lower_boxed(node.child_by_field_name("function"), at),
                args: node
                    .child_by_field_name("arguments")
                    .map(|args| self.lower_args(args))
                    .unwrap_or_default(),
                pos: at,
            }),
            "type_conversion_expression" => Expr::Call(CallExpr {
                fun: Box::new(
                    node.child_by_field_name("type")
                        .map_or(Expr::Other(at), |t| self.lower_type(t)),
                ),
                args: vec![*self.lower_boxed(node.child_by_field_name("operand"), at)],
                pos: at,
            }),
            "parenthesized_expression" => Expr::Paren {
                x: self.lower_boxed(named_children(node).first().copied(), at),
                pos: at,
            },
            "unary_expression" => {
                let x = self.lower_boxed(node.child_by_field_name("operand"), at);
                let op = node
                    .child_by_field_name("operator")
                    .map_or("", |op| self.text(op));
                if op == "*" {
                    Expr::Star { x, pos: at }
                } else {
                    Expr::Unary {
                        op: op.to_string(),
                        x,
                        pos: at,
                    }
                }
            }
            "binary_expression" => self.lower_binary(node),
            "func_literal" => Expr::FuncLit(FuncLit {
                ty: self.lower_signature(node),
                body: node
                    .child_by_field_name("body")
                    .map(|b| self.lower_block(b))
                    .unwrap_or_default(),
                pos: at,
            }),
            "type_assertion_expression" => Expr::TypeAssert {
                x: self.lower_boxed(node.child_by_field_name("operand"), at),
                ty: node
                    .child_by_field_name("type")
                    .map(|t| Box::new(self.lower_type(t))),
                pos: at,
            },
            "index_expression" => Expr::Index {
                x: self.lower_boxed(node.child_by_field_name("operand"), at),
                indices: node
                    .child_by_field_name("index")
                    .map(|i| vec![self.lower_expr(i)])
                    .unwrap_or_default(),
                pos: at,
            },
            "slice_expression" => Expr::Slice {
                x: self.lower_boxed(node.child_by_field_name("operand"), at),
                bounds: ["start", "end", "capacity"]
                    .into_iter()
                    .filter_map(|field| node.child_by_field_name(field))
                    .map(|b| self.lower_expr(b))
                    .collect(),
                pos: at,
            },
            "composite_literal" => Expr::Composite {
                ty: node
                    .child_by_field_name("type")
                    .map(|t| Box::new(self.lower_type(t))),
                elts: node
                    .child_by_field_name("body")
                    .map(|body| self.lower_elements(body))
                    .unwrap_or_default(),
                pos: at,
            },
            "literal_value" => Expr::Composite {
                ty: None,
                elts: self.lower_elements(node),
                pos: at,
            },
            "literal_element" => {
                let inner = named_children(node).first().copied();
                *self.lower_boxed(inner, at)
            }
            "keyed_element" => {
                let parts = named_children(node);
                Expr::KeyValue {
                    key: self.lower_boxed(parts.first().copied(), at),
                    value: self.lower_boxed(parts.get(1).copied(), at),
                    pos: at,
                }
            }
            "qualified_type" | "pointer_type" => self.lower_type(node),
            _ => Expr::Other(at),
        }
    }

    /// Follows the left spine iteratively; generated code can chain
    /// thousands of `+` terms.
    fn lower_binary(&mut self, node: Node) -> Expr {
        let at = pos(node);
        let mut operands = Vec::new();
        let mut left = Some(node);
        while let Some(binary) = left.filter(|n| n.kind() == "binary_expression") {
            let op = binary
                .child_by_field_name("operator")
                .map_or_else(String::new, |op| self.text(op).to_string());
            operands.push((op, binary.child_by_field_name("right")));
            left = binary.child_by_field_name("left");
        }

        let x = self.lower_boxed(left, at);
        let rest = operands
            .into_iter()
            .rev()
            .map(|(op, right)| (op, *self.lower_boxed(right, at)))
            .collect();
        Expr::Binary { x, rest, pos: at }
    }

    fn lit(&self, node: Node, kind: LitKind) -> Expr {
        Expr::BasicLit(BasicLit {
            kind,
            value: self.text(node).to_string(),
            pos: pos(node),
        })
    }

    fn lower_args(&mut self, node: Node) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .map(|arg| match arg.kind() {
                "variadic_argument" => {
                    let inner = named_children(arg).first().copied();
                    *self.lower_boxed(inner, pos(arg))
                }
                _ => self.lower_expr(arg),
            })
            .collect()
    }

    fn lower_elements(&mut self, node: Node) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .map(|element| self.lower_expr(element))
            .collect()
    }

    /// Types matter only for parameter eligibility: named, qualified and
    /// pointer types are kept, everything else is opaque.
    fn lower_type(&mut self, node: Node) -> Expr {
        let at = pos(node);
        match node.kind() {
            "type_identifier" | "identifier" | "package_identifier" => {
                Expr::Ident(self.ident(node))
            }
            "qualified_type" => match (
                node.child_by_field_name("package"),
                node.child_by_field_name("name"),
            ) {
                (Some(package), Some(name)) => Expr::Selector(SelectorExpr {
                    x: Box::new(Expr::Ident(self.ident(package))),
                    sel: self.ident(name),
                    pos: at,
                }),
                _ => Expr::Other(at),
            },
            "pointer_type" => match named_children(node).first() {
                Some(inner) => Expr::Star {
                    x: Box::new(self.lower_type(*inner)),
                    pos: at,
                },
                None => Expr::Other(at),
            },
            "parenthesized_type" => match named_children(node).first() {
                Some(inner) => self.lower_type(*inner),
                None => Expr::Other(at),
            },
            _ => Expr::Other(at),
        }
    }
}

fn pos(node: Node) -> Pos {
    let start = node.start_position();
    Pos::new(start.row + 1, start.column + 1)
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

fn children_by_field<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children = node
        .children_by_field_name(field, &mut cursor)
        .filter(|child| child.is_named())
        .collect();
    children
}

/// Named children that are not attached to any grammar field.
fn unfielded_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let mut children = Vec::new();
    if !cursor.goto_first_child() {
        return children;
    }
    loop {
        let child = cursor.node();
        if cursor.field_name().is_none() && child.is_named() && child.kind() != "comment" {
            children.push(child);
        }
        if !cursor.goto_next_sibling() {
            return children;
        }
    }
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}
