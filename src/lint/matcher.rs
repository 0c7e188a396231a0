//! Classifies candidate nodes against the active rules.

use super::resolver::{NameRef, SymbolResolver};
use super::rules::{Rule, RuleSet};
use crate::core::ast::{CallExpr, Expr, Ident, Pos, SelectorExpr};

/// A rule firing at a source position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub pos: Pos,
    pub rule: &'static Rule,
}

pub struct Matcher<'a> {
    rules: &'a RuleSet,
    resolver: &'a dyn SymbolResolver,
}

impl<'a> Matcher<'a> {
    pub fn new(rules: &'a RuleSet, resolver: &'a dyn SymbolResolver) -> Self {
        Self { rules, resolver }
    }

    /// Call-site form: the callee names a call rule and the arguments satisfy
    /// its shape. Reported at the call's position.
    pub fn match_call(&self, call: &CallExpr) -> Option<Match> {
        let reference = callee_reference(&call.fun)?;
        let name = reference.name();

        if !name.is_exported() || !self.rules.has_call_rule_named(&name.name) {
            return None;
        }

        let origin = self.resolver.origin_module(reference)?;

        self.rules
            .find_call(origin, &name.name, call)
            .map(|rule| Match {
                pos: call.pos,
                rule,
            })
    }

    /// Bare-reference form for `qualifier.Name`.
    pub fn match_selector(&self, sel: &SelectorExpr) -> Option<Match> {
        let Expr::Ident(qualifier) = sel.x.as_ref() else {
            return None;
        };

        self.match_reference(
            NameRef::Qualified {
                qualifier,
                name: &sel.sel,
            },
            sel.pos,
        )
    }

    /// Bare-reference form for an identifier reachable through a dot import.
    pub fn match_ident(&self, ident: &Ident) -> Option<Match> {
        self.match_reference(NameRef::Bare(ident), ident.pos)
    }

    fn match_reference(&self, reference: NameRef<'_>, pos: Pos) -> Option<Match> {
        let name = reference.name();

        if !name.is_exported() || !self.rules.has_reference_rule_named(&name.name) {
            return None;
        }

        let origin = self.resolver.origin_module(reference)?;

        self.rules
            .find_reference(origin, &name.name)
            .map(|rule| Match { pos, rule })
    }
}

fn callee_reference(fun: &Expr) -> Option<NameRef<'_>> {
    match fun {
        Expr::Selector(sel) => match sel.x.as_ref() {
            Expr::Ident(qualifier) => Some(NameRef::Qualified {
                qualifier,
                name: &sel.sel,
            }),
            _ => None,
        },
        Expr::Ident(ident) => Some(NameRef::Bare(ident)),
        Expr::Paren { x, .. } => callee_reference(x),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::{BasicLit, LitKind};
    use crate::lint::resolver::StaticResolver;
    use crate::lint::rules::RuleId;
    use crate::lint::version::ResolvedVersion;

    fn ident(name: &str, column: usize) -> Ident {
        Ident::new(name, Pos::new(1, column))
    }

    fn selector(qualifier: &str, name: &str) -> SelectorExpr {
        SelectorExpr {
            x: Box::new(Expr::Ident(ident(qualifier, 1))),
            sel: ident(name, qualifier.len() + 2),
            pos: Pos::new(1, 1),
        }
    }

    fn string_arg(value: &str) -> Expr {
        Expr::BasicLit(BasicLit {
            kind: LitKind::String,
            value: value.to_string(),
            pos: Pos::new(1, 20),
        })
    }

    fn all_rules() -> RuleSet {
        RuleSet::active(|_| true, ResolvedVersion::Newest)
    }

    #[test]
    fn test_selector_matches_tracked_function() {
        let rules = all_rules();
        let resolver = StaticResolver::with_modules(["os", "context"]);
        let matcher = Matcher::new(&rules, &resolver);

        let found = matcher.match_selector(&selector("os", "Setenv")).unwrap();
        assert_eq!(found.rule.id, RuleId::OsSetenv);
        assert_eq!(found.pos, Pos::new(1, 1));

        assert!(matcher.match_selector(&selector("os", "Getenv")).is_none());
        assert!(matcher.match_selector(&selector("context", "Setenv")).is_none());
    }

    #[test]
    fn test_unresolved_qualifier_never_matches() {
        let rules = all_rules();
        let resolver = StaticResolver::new();
        let matcher = Matcher::new(&rules, &resolver);

        assert!(matcher.match_selector(&selector("os", "Setenv")).is_none());
    }

    #[test]
    fn test_unexported_names_are_skipped() {
        let rules = all_rules();
        let resolver = StaticResolver::new().bare("setenv", "os");
        let matcher = Matcher::new(&rules, &resolver);

        assert!(matcher.match_ident(&ident("setenv", 1)).is_none());
    }

    #[test]
    fn test_dot_imported_ident_matches() {
        let rules = all_rules();
        let resolver = StaticResolver::new().bare("Chdir", "os");
        let matcher = Matcher::new(&rules, &resolver);

        let found = matcher.match_ident(&ident("Chdir", 4)).unwrap();
        assert_eq!(found.rule.id, RuleId::OsChdir);
        assert_eq!(found.pos, Pos::new(1, 4));
    }

    #[test]
    fn test_call_form_requires_shape() {
        let rules = all_rules();
        let resolver = StaticResolver::with_modules(["os"]);
        let matcher = Matcher::new(&rules, &resolver);

        let call = |first: Expr| CallExpr {
            fun: Box::new(Expr::Selector(selector("os", "CreateTemp"))),
            args: vec![first, string_arg("\"x\"")],
            pos: Pos::new(1, 1),
        };

        let found = matcher.match_call(&call(string_arg("\"\""))).unwrap();
        assert_eq!(found.rule.id, RuleId::OsCreateTemp);

        assert!(matcher.match_call(&call(string_arg("\"/tmp\""))).is_none());
    }

    #[test]
    fn test_create_temp_reference_alone_never_matches() {
        let rules = all_rules();
        let resolver = StaticResolver::with_modules(["os"]);
        let matcher = Matcher::new(&rules, &resolver);

        assert!(matcher.match_selector(&selector("os", "CreateTemp")).is_none());
    }
}
