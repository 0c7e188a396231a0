use crate::config::AnalyzerConfig;
use crate::lint::{Rule, RULES};
use anyhow::Result;
use colored::*;
use std::io::Write;

/// Print the rule table with each rule's effective enable state.
pub fn write_rules(out: &mut dyn Write, config: &AnalyzerConfig) -> Result<()> {
    for rule in &RULES {
        let state = if config.is_enabled(rule.id) {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };
        let gate = rule
            .min_version
            .map(|min| format!("  (Go {min}+)"))
            .unwrap_or_default();

        writeln!(
            out,
            "{:<18} {:<9} {}{}",
            rule.id.to_string(),
            state,
            describe(rule),
            gate
        )?;
    }

    if config.skip_go_version_detection {
        writeln!(out)?;
        writeln!(out, "Go version detection is skipped: gated rules always apply")?;
    }
    Ok(())
}

fn describe(rule: &Rule) -> String {
    if rule.is_call_rule() {
        format!(
            "{o}.{n}(\"\", ...) -> {o}.{n}(t.{r}(), ...)",
            o = rule.origin,
            n = rule.name,
            r = rule.replacement
        )
    } else {
        format!(
            "{}.{}() -> t.{}()",
            rule.origin, rule.name, rule.replacement
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_rule_with_state() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_rules(&mut out, &AnalyzerConfig::default()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), RULES.len());
        assert!(text.contains("osmkdirtemp        enabled   os.MkdirTemp() -> t.TempDir()"));
        assert!(text.contains("contexttodo        disabled  context.TODO() -> t.Context()  (Go 1.24+)"));
        assert!(text.contains(r#"os.CreateTemp("", ...) -> os.CreateTemp(t.TempDir(), ...)"#));
    }
}
