//! Symbol resolution capability.
//!
//! The analyzer never inspects imports itself. A host supplies a
//! [`SymbolResolver`] that maps a name reference to the module it is
//! declared in, whatever local alias was used at the reference site.

use crate::core::ast::Ident;
use std::collections::HashMap;

/// A reference to a name, in one of the two shapes Go allows for
/// package-level declarations of another package.
#[derive(Clone, Copy, Debug)]
pub enum NameRef<'a> {
    /// `qualifier.name`, e.g. `os.Setenv` or `foo.Setenv` with `import foo "os"`.
    Qualified { qualifier: &'a Ident, name: &'a Ident },
    /// `name` brought into scope by a dot import.
    Bare(&'a Ident),
}

impl<'a> NameRef<'a> {
    pub fn name(&self) -> &'a Ident {
        match self {
            Self::Qualified { name, .. } => name,
            Self::Bare(name) => name,
        }
    }
}

/// Maps a name reference to its originating module.
///
/// `None` means the reference is not tied to any module (a local variable,
/// an unresolved identifier); the analyzer treats it as "not tracked".
pub trait SymbolResolver: Sync {
    fn origin_module(&self, reference: NameRef<'_>) -> Option<&str>;
}

/// Table-driven resolver for embedding hosts and tests.
///
/// Qualifiers and bare names are looked up in two independent maps, with
/// no scoping.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    qualifiers: HashMap<String, String>,
    bare: HashMap<String, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conventional imports: each module is reachable through its own name.
    pub fn with_modules<'m>(modules: impl IntoIterator<Item = &'m str>) -> Self {
        modules
            .into_iter()
            .fold(Self::new(), |resolver, module| resolver.alias(module, module))
    }

    /// `import <alias> "<module>"`
    pub fn alias(mut self, alias: &str, module: &str) -> Self {
        self.qualifiers.insert(alias.to_string(), module.to_string());
        self
    }

    /// A bare name that resolves to `module`, as a dot import would provide.
    pub fn bare(mut self, name: &str, module: &str) -> Self {
        self.bare.insert(name.to_string(), module.to_string());
        self
    }
}

impl SymbolResolver for StaticResolver {
    fn origin_module(&self, reference: NameRef<'_>) -> Option<&str> {
        let module = match reference {
            NameRef::Qualified { qualifier, .. } => self.qualifiers.get(&qualifier.name),
            NameRef::Bare(ident) => self.bare.get(&ident.name),
        };
        module.map(String::as_str)
    }
}
