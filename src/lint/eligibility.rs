use super::resolver::{NameRef, SymbolResolver};
use crate::core::ast::{Expr, FuncType};

pub const TESTING_MODULE: &str = "testing";

/// Name used for function literals in messages.
pub const ANONYMOUS_FUNCTION: &str = "anonymous function";

/// Stands in for the test handle when the parameter is unnamed or `_`.
pub const HANDLE_PLACEHOLDER: &str = "<t/b/tb>";

/// Concrete handle types, always taken by pointer.
const POINTER_HANDLES: [&str; 3] = ["T", "B", "F"];

/// The interface handle type, taken by value.
const INTERFACE_HANDLES: [&str; 1] = ["TB"];

/// Per-function facts used to phrase diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionContext {
    pub name: String,
    pub handle: String,
}

/// Returns a context when the function's first parameter is a test handle:
/// `*testing.T`, `*testing.B`, `*testing.F` or `testing.TB`, under any
/// import alias or through a dot import.
pub fn check_function(
    name: &str,
    ty: &FuncType,
    resolver: &dyn SymbolResolver,
) -> Option<FunctionContext> {
    let first = ty.params.first()?;

    if !is_test_handle_type(&first.ty, resolver) {
        return None;
    }

    let handle = first
        .names
        .first()
        .filter(|ident| !ident.is_blank())
        .map_or(HANDLE_PLACEHOLDER, |ident| ident.name.as_str());

    Some(FunctionContext {
        name: name.to_string(),
        handle: handle.to_string(),
    })
}

fn is_test_handle_type(ty: &Expr, resolver: &dyn SymbolResolver) -> bool {
    match ty {
        Expr::Star { x, .. } => names_testing_type(x, &POINTER_HANDLES, resolver),
        Expr::Paren { x, .. } => is_test_handle_type(x, resolver),
        other => names_testing_type(other, &INTERFACE_HANDLES, resolver),
    }
}

fn names_testing_type(ty: &Expr, names: &[&str], resolver: &dyn SymbolResolver) -> bool {
    let reference = match ty {
        Expr::Selector(sel) => match sel.x.as_ref() {
            Expr::Ident(qualifier) => NameRef::Qualified {
                qualifier,
                name: &sel.sel,
            },
            _ => return false,
        },
        Expr::Ident(ident) => NameRef::Bare(ident),
        Expr::Paren { x, .. } => return names_testing_type(x, names, resolver),
        _ => return false,
    };

    names.contains(&reference.name().name.as_str())
        && resolver.origin_module(reference) == Some(TESTING_MODULE)
}
