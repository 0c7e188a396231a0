//! The rule table: tracked library functions and their in-test replacements.
//!
//! Rules are plain data consulted by one generic matcher. Their order in
//! [`RULES`] is the priority order: when several rules could match the same
//! occurrence only the first applicable one fires.

use super::version::{GoVersion, ResolvedVersion};
use crate::core::ast::{CallExpr, Expr};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OS_MODULE: &str = "os";
pub const CONTEXT_MODULE: &str = "context";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleId {
    OsCreateTemp,
    OsMkdirTemp,
    OsTempDir,
    OsSetenv,
    OsChdir,
    ContextBackground,
    ContextTodo,
}

impl RuleId {
    pub const ALL: [RuleId; 7] = [
        RuleId::OsCreateTemp,
        RuleId::OsMkdirTemp,
        RuleId::OsTempDir,
        RuleId::OsSetenv,
        RuleId::OsChdir,
        RuleId::ContextBackground,
        RuleId::ContextTodo,
    ];

    /// Name of the enable/disable flag for this rule.
    pub fn flag_name(&self) -> &'static str {
        match self {
            Self::OsCreateTemp => "oscreatetemp",
            Self::OsMkdirTemp => "osmkdirtemp",
            Self::OsTempDir => "ostempdir",
            Self::OsSetenv => "ossetenv",
            Self::OsChdir => "oschdir",
            Self::ContextBackground => "contextbackground",
            Self::ContextTodo => "contexttodo",
        }
    }

    pub fn from_flag_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.flag_name() == name)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag_name())
    }
}

/// Predicate over the first argument of a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgPredicate {
    /// The literal empty string.
    EmptyString,
}

impl ArgPredicate {
    pub fn holds(&self, arg: &Expr) -> bool {
        match (self, arg) {
            (Self::EmptyString, Expr::BasicLit(lit)) => lit.is_empty_string(),
            _ => false,
        }
    }
}

/// Extra constraints that turn a rule into a call-site rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallShape {
    pub arity: Option<usize>,
    pub first_arg: Option<ArgPredicate>,
}

impl CallShape {
    pub fn accepts(&self, call: &CallExpr) -> bool {
        if self.arity.is_some_and(|arity| call.args.len() != arity) {
            return false;
        }

        match self.first_arg {
            Some(predicate) => call.args.first().is_some_and(|arg| predicate.holds(arg)),
            None => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    pub origin: &'static str,
    pub name: &'static str,
    /// Method of the test handle to use instead.
    pub replacement: &'static str,
    pub min_version: Option<GoVersion>,
    /// `Some` for rules matched at call sites only.
    pub call_shape: Option<CallShape>,
}

impl Rule {
    pub fn is_call_rule(&self) -> bool {
        self.call_shape.is_some()
    }

    pub fn targets(&self, origin: &str, name: &str) -> bool {
        self.origin == origin && self.name == name
    }
}

pub static RULES: [Rule; 7] = [
    Rule {
        id: RuleId::OsCreateTemp,
        origin: OS_MODULE,
        name: "CreateTemp",
        replacement: "TempDir",
        min_version: None,
        // os.CreateTemp(dir, pattern)
        call_shape: Some(CallShape {
            arity: Some(2),
            first_arg: Some(ArgPredicate::EmptyString),
        }),
    },
    Rule {
        id: RuleId::OsMkdirTemp,
        origin: OS_MODULE,
        name: "MkdirTemp",
        replacement: "TempDir",
        min_version: None,
        call_shape: None,
    },
    Rule {
        id: RuleId::OsTempDir,
        origin: OS_MODULE,
        name: "TempDir",
        replacement: "TempDir",
        min_version: None,
        call_shape: None,
    },
    Rule {
        id: RuleId::OsSetenv,
        origin: OS_MODULE,
        name: "Setenv",
        replacement: "Setenv",
        min_version: None,
        call_shape: None,
    },
    Rule {
        id: RuleId::OsChdir,
        origin: OS_MODULE,
        name: "Chdir",
        replacement: "Chdir",
        min_version: Some(GoVersion::GO1_24),
        call_shape: None,
    },
    Rule {
        id: RuleId::ContextBackground,
        origin: CONTEXT_MODULE,
        name: "Background",
        replacement: "Context",
        min_version: Some(GoVersion::GO1_24),
        call_shape: None,
    },
    Rule {
        id: RuleId::ContextTodo,
        origin: CONTEXT_MODULE,
        name: "TODO",
        replacement: "Context",
        min_version: Some(GoVersion::GO1_24),
        call_shape: None,
    },
];

/// Look up a rule by id; [`RULES`] is stored in [`RuleId::ALL`] order.
pub fn rule(id: RuleId) -> &'static Rule {
    &RULES[id as usize]
}

/// The rules that can fire in one compilation unit: enabled, and passing
/// their version gate against the unit's resolved version. Built once per
/// unit, read-only during traversal.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<&'static Rule>,
}

impl RuleSet {
    pub fn active(enabled: impl Fn(RuleId) -> bool, version: ResolvedVersion) -> Self {
        let rules = RULES
            .iter()
            .filter(|rule| enabled(rule.id))
            .filter(|rule| rule.min_version.is_none_or(|min| version.satisfies(min)))
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.rules.iter().map(|rule| rule.id)
    }

    pub fn has_call_rule_named(&self, name: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.is_call_rule() && rule.name == name)
    }

    pub fn has_reference_rule_named(&self, name: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| !rule.is_call_rule() && rule.name == name)
    }

    /// First call-site rule for `origin.name` whose shape accepts `call`.
    pub fn find_call(&self, origin: &str, name: &str, call: &CallExpr) -> Option<&'static Rule> {
        self.rules.iter().copied().find(|rule| {
            rule.targets(origin, name)
                && rule.call_shape.is_some_and(|shape| shape.accepts(call))
        })
    }

    /// First bare-reference rule for `origin.name`.
    pub fn find_reference(&self, origin: &str, name: &str) -> Option<&'static Rule> {
        self.rules
            .iter()
            .copied()
            .find(|rule| !rule.is_call_rule() && rule.targets(origin, name))
    }
}
