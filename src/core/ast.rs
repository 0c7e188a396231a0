//! Closed syntax tree for Go compilation units.
//!
//! The tree keeps only what the analyzer needs: statements and expressions
//! that can contain calls, parameter lists for eligibility, and imports for
//! symbol resolution. Every shape the front end does not model lowers to
//! [`Stmt::Bad`] or [`Expr::Other`] so partial trees still walk cleanly.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// 1-based source position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

impl Ident {
    pub fn new(name: impl Into<String>, pos: Pos) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }

    /// Go visibility rule: a name is exported when it starts with an upper-case letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }

    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// One parsed `.go` file.
#[derive(Clone, Debug, Default)]
pub struct SourceFile {
    pub path: PathBuf,
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportName {
    /// `import "os"`
    Default,
    /// `import foo "os"`
    Alias(String),
    /// `import . "os"`
    Dot,
    /// `import _ "os"`
    Blank,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: ImportName,
    pub path: String,
    pub pos: Pos,
}

#[derive(Clone, Debug)]
pub enum Decl {
    Func(FuncDecl),
    /// Package-level `var`/`const` declarations.
    Gen(GenDecl),
    /// Type declarations and anything else without executable expressions.
    Other(Pos),
}

#[derive(Clone, Debug)]
pub struct FuncDecl {
    pub name: Ident,
    pub recv: Option<Field>,
    pub ty: FuncType,
    /// `None` for external (assembly-backed) declarations.
    pub body: Option<Block>,
}

#[derive(Clone, Debug, Default)]
pub struct FuncType {
    pub params: Vec<Field>,
}

/// A parameter group: `a, b int` has two names, `*testing.T` has none.
#[derive(Clone, Debug)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
}

#[derive(Clone, Debug, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub pos: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenKind {
    Var,
    Const,
}

#[derive(Clone, Debug)]
pub struct GenDecl {
    pub kind: GenKind,
    pub specs: Vec<ValueSpec>,
    pub pos: Pos,
}

#[derive(Clone, Debug)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
}

#[derive(Clone, Debug)]
pub struct CaseClause {
    /// Empty for `default:`.
    pub list: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub pos: Pos,
}

#[derive(Clone, Debug)]
pub struct CommClause {
    /// `None` for `default:`.
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
    pub pos: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

#[derive(Clone, Debug)]
pub enum Stmt {
    Expr(Expr),
    Assign {
        lhs: Vec<Expr>,
        rhs: Vec<Expr>,
        /// `:=` rather than `=`/`op=`.
        define: bool,
        pos: Pos,
    },
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        body: Block,
        els: Option<Box<Stmt>>,
        pos: Pos,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Block,
        pos: Pos,
    },
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        expr: Expr,
        body: Block,
        pos: Pos,
    },
    Defer(CallExpr),
    Go(CallExpr),
    Return {
        results: Vec<Expr>,
        pos: Pos,
    },
    Decl(GenDecl),
    Switch {
        init: Option<Box<Stmt>>,
        tag: Option<Expr>,
        clauses: Vec<CaseClause>,
        pos: Pos,
    },
    TypeSwitch {
        init: Option<Box<Stmt>>,
        assign: Box<Stmt>,
        clauses: Vec<CaseClause>,
        pos: Pos,
    },
    Select {
        clauses: Vec<CommClause>,
        pos: Pos,
    },
    Block(Block),
    Branch {
        kind: BranchKind,
        label: Option<Ident>,
        pos: Pos,
    },
    Send {
        chan: Expr,
        value: Expr,
        pos: Pos,
    },
    IncDec {
        x: Expr,
        inc: bool,
        pos: Pos,
    },
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
        pos: Pos,
    },
    Empty(Pos),
    /// A statement the front end could not model.
    Bad(Pos),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    /// Source text, quotes included.
    pub value: String,
    pub pos: Pos,
}

impl BasicLit {
    /// The interpreted literal `""`. An empty raw string is not matched.
    pub fn is_empty_string(&self) -> bool {
        self.kind == LitKind::String && self.value == "\"\""
    }
}

#[derive(Clone, Debug)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
    pub pos: Pos,
}

#[derive(Clone, Debug)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub args: Vec<Expr>,
    pub pos: Pos,
}

#[derive(Clone, Debug)]
pub struct FuncLit {
    pub ty: FuncType,
    pub body: Block,
    pub pos: Pos,
}

#[derive(Clone, Debug)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    Selector(SelectorExpr),
    Call(CallExpr),
    /// A left-associated operator chain: `x op y0 op y1` groups as
    /// `(x op y0) op y1`. Kept flat so long concatenations do not nest.
    Binary {
        x: Box<Expr>,
        rest: Vec<(String, Expr)>,
        pos: Pos,
    },
    Unary {
        op: String,
        x: Box<Expr>,
        pos: Pos,
    },
    /// `*x`, either a dereference or a pointer type.
    Star {
        x: Box<Expr>,
        pos: Pos,
    },
    Paren {
        x: Box<Expr>,
        pos: Pos,
    },
    FuncLit(FuncLit),
    /// `x.(T)`; `ty` is `None` for the `x.(type)` of a type switch.
    TypeAssert {
        x: Box<Expr>,
        ty: Option<Box<Expr>>,
        pos: Pos,
    },
    Index {
        x: Box<Expr>,
        indices: Vec<Expr>,
        pos: Pos,
    },
    Slice {
        x: Box<Expr>,
        bounds: Vec<Expr>,
        pos: Pos,
    },
    Composite {
        ty: Option<Box<Expr>>,
        elts: Vec<Expr>,
        pos: Pos,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
        pos: Pos,
    },
    /// Type expressions and anything else that cannot contain a call.
    Other(Pos),
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Ident(ident) => ident.pos,
            Expr::BasicLit(lit) => lit.pos,
            Expr::Selector(sel) => sel.pos,
            Expr::Call(call) => call.pos,
            Expr::FuncLit(lit) => lit.pos,
            Expr::Binary { pos, .. }
            | Expr::Unary { pos, .. }
            | Expr::Star { pos, .. }
            | Expr::Paren { pos, .. }
            | Expr::TypeAssert { pos, .. }
            | Expr::Index { pos, .. }
            | Expr::Slice { pos, .. }
            | Expr::Composite { pos, .. }
            | Expr::KeyValue { pos, .. }
            | Expr::Other(pos) => *pos,
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}
