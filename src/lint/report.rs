//! Formats matches into diagnostics and hands them to the host.

use super::eligibility::FunctionContext;
use super::matcher::Match;
use super::rules::Rule;
use crate::core::Diagnostic;
use std::path::Path;

/// The reporting channel owned by the host.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

pub fn format_message(rule: &Rule, ctx: &FunctionContext) -> String {
    if rule.call_shape.is_some_and(|shape| shape.first_arg.is_some()) {
        // Only the first argument is replaced: the call's other arguments and
        // results stay as they are.
        format!(
            r#"{origin}.{name}("", ...) could be replaced by {origin}.{name}({handle}.{replacement}(), ...) in {function}"#,
            origin = rule.origin,
            name = rule.name,
            handle = ctx.handle,
            replacement = rule.replacement,
            function = ctx.name,
        )
    } else {
        format!(
            "{}.{}() could be replaced by {}.{}() in {}",
            rule.origin, rule.name, ctx.handle, rule.replacement, ctx.name
        )
    }
}

pub fn emit(sink: &mut dyn DiagnosticSink, file: &Path, found: &Match, ctx: &FunctionContext) {
    tracing::debug!(rule = %found.rule.id, pos = %found.pos, function = %ctx.name, "match");

    sink.report(Diagnostic {
        file: file.to_path_buf(),
        pos: found.pos,
        rule: found.rule.id,
        function: ctx.name.clone(),
        message: format_message(found.rule, ctx),
    });
}
