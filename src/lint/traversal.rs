//! Recursive descent over a compilation unit.
//!
//! Every statement and expression is visited once. The walk carries the
//! enclosing eligible function's context; outside eligible functions it
//! still descends, looking for eligible function literals, but reports
//! nothing. Matches over `Stmt` and `Expr` are exhaustive so a new node
//! shape has to be handled here before the crate compiles.

use super::eligibility::{check_function, FunctionContext, ANONYMOUS_FUNCTION};
use super::matcher::{Match, Matcher};
use super::report::{emit, DiagnosticSink};
use super::resolver::SymbolResolver;
use crate::core::ast::{
    Block, CallExpr, CaseClause, CommClause, Decl, Expr, FuncDecl, FuncLit, GenDecl, SourceFile,
    Stmt,
};
use std::path::Path;

/// `None` outside any eligible function.
type Scope<'c> = Option<&'c FunctionContext>;

pub struct Walker<'a> {
    matcher: Matcher<'a>,
    resolver: &'a dyn SymbolResolver,
    file: &'a Path,
    sink: &'a mut dyn DiagnosticSink,
}

impl<'a> Walker<'a> {
    pub fn new(
        matcher: Matcher<'a>,
        resolver: &'a dyn SymbolResolver,
        file: &'a Path,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            matcher,
            resolver,
            file,
            sink,
        }
    }

    pub fn walk_file(&mut self, file: &SourceFile) {
        for decl in &file.decls {
            match decl {
                Decl::Func(func) => self.walk_func_decl(func),
                Decl::Gen(gen) => self.walk_gen_decl(None, gen),
                Decl::Other(_) => {}
            }
        }
    }

    fn walk_func_decl(&mut self, func: &FuncDecl) {
        let Some(body) = &func.body else {
            return;
        };

        let ctx = check_function(&func.name.name, &func.ty, self.resolver);
        if let Some(ctx) = &ctx {
            tracing::trace!(function = %ctx.name, handle = %ctx.handle, "scanning");
        }

        self.walk_block(ctx.as_ref(), body);
    }

    /// A literal with its own test handle starts a new context; any other
    /// literal runs in the enclosing one.
    fn walk_func_lit(&mut self, scope: Scope<'_>, lit: &FuncLit) {
        let own = check_function(ANONYMOUS_FUNCTION, &lit.ty, self.resolver);
        self.walk_block(own.as_ref().or(scope), &lit.body);
    }

    fn walk_block(&mut self, scope: Scope<'_>, block: &Block) {
        self.walk_stmts(scope, &block.stmts);
    }

    fn walk_stmts(&mut self, scope: Scope<'_>, stmts: &[Stmt]) {
        for stmt in stmts {
            self.walk_stmt(scope, stmt);
        }
    }

    fn walk_opt_stmt(&mut self, scope: Scope<'_>, stmt: Option<&Stmt>) {
        if let Some(stmt) = stmt {
            self.walk_stmt(scope, stmt);
        }
    }

    fn walk_stmt(&mut self, scope: Scope<'_>, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.walk_expr(scope, expr),

            Stmt::Assign { rhs, .. } => self.walk_exprs(scope, rhs),

            Stmt::If {
                init,
                cond,
                body,
                els,
                ..
            } => {
                self.walk_opt_stmt(scope, init.as_deref());
                self.walk_expr(scope, cond);
                self.walk_block(scope, body);
                self.walk_opt_stmt(scope, els.as_deref());
            }

            Stmt::For {
                init,
                cond,
                post,
                body,
                ..
            } => {
                self.walk_opt_stmt(scope, init.as_deref());
                if let Some(cond) = cond {
                    self.walk_expr(scope, cond);
                }
                self.walk_opt_stmt(scope, post.as_deref());
                self.walk_block(scope, body);
            }

            Stmt::Range { expr, body, .. } => {
                self.walk_expr(scope, expr);
                self.walk_block(scope, body);
            }

            Stmt::Defer(call) | Stmt::Go(call) => self.walk_call(scope, call),

            Stmt::Return { results, .. } => self.walk_exprs(scope, results),

            Stmt::Decl(gen) => self.walk_gen_decl(scope, gen),

            Stmt::Switch {
                init, tag, clauses, ..
            } => {
                self.walk_opt_stmt(scope, init.as_deref());
                if let Some(tag) = tag {
                    self.walk_expr(scope, tag);
                }
                self.walk_case_clauses(scope, clauses, true);
            }

            Stmt::TypeSwitch {
                init,
                assign,
                clauses,
                ..
            } => {
                self.walk_opt_stmt(scope, init.as_deref());
                self.walk_stmt(scope, assign);
                // Case lists of a type switch hold types, not values.
                self.walk_case_clauses(scope, clauses, false);
            }

            Stmt::Select { clauses, .. } => self.walk_comm_clauses(scope, clauses),

            Stmt::Block(block) => self.walk_block(scope, block),

            Stmt::Branch { .. }
            | Stmt::Send { .. }
            | Stmt::IncDec { .. }
            | Stmt::Labeled { .. }
            | Stmt::Empty(_)
            | Stmt::Bad(_) => {}
        }
    }

    fn walk_gen_decl(&mut self, scope: Scope<'_>, gen: &GenDecl) {
        for spec in &gen.specs {
            self.walk_exprs(scope, &spec.values);
        }
    }

    fn walk_case_clauses(&mut self, scope: Scope<'_>, clauses: &[CaseClause], with_list: bool) {
        for clause in clauses {
            if with_list {
                self.walk_exprs(scope, &clause.list);
            }
            self.walk_stmts(scope, &clause.body);
        }
    }

    fn walk_comm_clauses(&mut self, scope: Scope<'_>, clauses: &[CommClause]) {
        for clause in clauses {
            self.walk_opt_stmt(scope, clause.comm.as_deref());
            self.walk_stmts(scope, &clause.body);
        }
    }

    fn walk_exprs(&mut self, scope: Scope<'_>, exprs: &[Expr]) {
        for expr in exprs {
            self.walk_expr(scope, expr);
        }
    }

    fn walk_expr(&mut self, scope: Scope<'_>, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => {
                if let Some(ctx) = scope {
                    let found = self.matcher.match_ident(ident);
                    self.report(ctx, found);
                }
            }

            Expr::Selector(sel) => {
                if let Some(ctx) = scope {
                    let found = self.matcher.match_selector(sel);
                    self.report(ctx, found);
                }
                // `pkg.Name` is fully handled above; a chained operand may
                // still hide a call.
                if sel.x.as_ident().is_none() {
                    self.walk_expr(scope, &sel.x);
                }
            }

            Expr::Call(call) => self.walk_call(scope, call),

            Expr::Binary { x, rest, .. } => {
                self.walk_expr(scope, x);
                for (_, y) in rest {
                    self.walk_expr(scope, y);
                }
            }

            Expr::FuncLit(lit) => self.walk_func_lit(scope, lit),

            Expr::TypeAssert { x, .. }
            | Expr::Unary { x, .. }
            | Expr::Star { x, .. }
            | Expr::Paren { x, .. } => self.walk_expr(scope, x),

            Expr::Index { x, indices: rest, .. } | Expr::Slice { x, bounds: rest, .. } => {
                self.walk_expr(scope, x);
                self.walk_exprs(scope, rest);
            }

            Expr::Composite { elts, .. } => self.walk_exprs(scope, elts),

            Expr::KeyValue { key, value, .. } => {
                self.walk_expr(scope, key);
                self.walk_expr(scope, value);
            }

            Expr::BasicLit(_) | Expr::Other(_) => {}
        }
    }

    /// Arguments first, then the callee. A call that fires as a call-site
    /// match is not looked at again as a bare reference.
    fn walk_call(&mut self, scope: Scope<'_>, call: &CallExpr) {
        self.walk_exprs(scope, &call.args);

        if let Some(ctx) = scope {
            if let Some(found) = self.matcher.match_call(call) {
                self.report(ctx, Some(found));
                return;
            }
        }

        self.walk_expr(scope, &call.fun);
    }

    fn report(&mut self, ctx: &FunctionContext, found: Option<Match>) {
        if let Some(found) = found {
            emit(&mut *self.sink, self.file, &found, ctx);
        }
    }
}
