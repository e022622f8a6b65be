use std::sync::OnceLock;

use super::presets::builtin_presets;
use super::rule::CompiledRule;
use super::{ImportRule, ImportRuleEngine, RuleError, RuleMatch, RuleReport};
use crate::cst::SyntaxTree;

/// Table-driven engine: user rules first, then built-in presets.
///
/// For each import site the first rule active for the target that matches
/// wins. Rule patterns compile once, on first use.
#[derive(Debug)]
pub struct SpecifierRuleEngine {
    rules: Vec<ImportRule>,
    compiled: OnceLock<Result<Vec<CompiledRule>, RuleError>>,
}

impl Default for SpecifierRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecifierRuleEngine {
    /// Engine with the built-in presets only.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Vec::new())
    }

    /// Engine with `rules` ahead of the built-in presets.
    #[must_use]
    pub fn with_rules(rules: Vec<ImportRule>) -> Self {
        let mut all = rules;
        let mut targets: Vec<_> = builtin_presets().keys().copied().collect();
        targets.sort_unstable();
        for target in targets {
            all.extend(builtin_presets()[target].iter().cloned());
        }
        Self::without_presets(all)
    }

    /// Engine with exactly `rules`.
    #[must_use]
    pub fn without_presets(rules: Vec<ImportRule>) -> Self {
        Self {
            rules,
            compiled: OnceLock::new(),
        }
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[ImportRule] {
        &self.rules
    }

    fn compiled(&self) -> Result<&[CompiledRule], RuleError> {
        self.compiled
            .get_or_init(|| self.rules.iter().map(ImportRule::compile).collect())
            .as_deref()
            .map_err(Clone::clone)
    }
}

impl ImportRuleEngine for SpecifierRuleEngine {
    fn apply(
        &self,
        tree: &mut SyntaxTree,
        target: &str,
    ) -> Result<Option<RuleReport>, RuleError> {
        let active: Vec<&CompiledRule> = self
            .compiled()?
            .iter()
            .filter(|c| c.rule.applies_to(target))
            .collect();

        let mut warnings = Vec::new();
        let mut changes = Vec::new();
        let mut imports = Vec::new();

        if active.is_empty() {
            warnings.push(format!("No import rules registered for target '{target}'"));
        }

        for site in tree.imports_mut() {
            imports.push(site.specifier.clone());

            let Some((compiled, outcome)) = active
                .iter()
                .find_map(|c| c.resolve(&site.specifier).map(|m| (c, m)))
            else {
                continue;
            };
            let note = compiled
                .rule
                .note
                .as_deref()
                .map(|n| format!(": {n}"))
                .unwrap_or_default();

            match outcome {
                RuleMatch::Rewrite(replacement) => {
                    if replacement == site.specifier {
                        continue;
                    }
                    changes.push(format!(
                        "Rewrote {} '{}' -> '{}' (line {})",
                        site.kind, site.specifier, replacement, site.line
                    ));
                    site.rewrite(replacement);
                }
                RuleMatch::Unsupported => {
                    warnings.push(format!(
                        "Import '{}' has no equivalent for target '{target}' (line {}){note}",
                        site.specifier, site.line
                    ));
                }
            }
        }

        tracing::debug!(
            target_name = target,
            inspected = imports.len(),
            rewritten = changes.len(),
            "import rules applied"
        );

        Ok(Some(RuleReport {
            warnings: Some(warnings),
            changes: Some(changes),
            imports: Some(imports),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{Parser, TreeSitterParser};
    use crate::options::TransformOptions;

    fn tree(source: &str) -> SyntaxTree {
        TreeSitterParser::new()
            .parse(source, &TransformOptions::default())
            .unwrap()
    }

    #[test]
    fn test_rewrites_matching_import() {
        let engine = SpecifierRuleEngine::with_rules(vec![ImportRule::exact("old-lib", "new-lib")]);
        let mut tree = tree("import a from 'old-lib';\nconsole.log(a);");

        let report = engine.apply(&mut tree, "react-vite").unwrap().unwrap();
        assert_eq!(report.imports, Some(vec!["old-lib".to_owned()]));
        let changes = report.changes.unwrap();
        assert_eq!(changes.len(), 1);
        assert!(changes[0].contains("'old-lib' -> 'new-lib'"));
        assert_eq!(tree.imports()[0].current(), "new-lib");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let engine = SpecifierRuleEngine::without_presets(vec![
            ImportRule::exact("a", "first"),
            ImportRule::exact("a", "second"),
        ]);
        let mut tree = tree("import x from 'a';");
        engine.apply(&mut tree, "any").unwrap();
        assert_eq!(tree.imports()[0].current(), "first");
    }

    #[test]
    fn test_user_rules_precede_presets() {
        let engine =
            SpecifierRuleEngine::with_rules(vec![ImportRule::exact("@jest/globals", "custom")]);
        let mut tree = tree("import { it } from '@jest/globals';");
        engine.apply(&mut tree, "react-vite").unwrap();
        assert_eq!(tree.imports()[0].current(), "custom");
    }

    #[test]
    fn test_preset_unsupported_warns_without_rewrite() {
        let engine = SpecifierRuleEngine::new();
        let mut tree = tree("import 'react-app-polyfill/ie11';\n");

        let report = engine.apply(&mut tree, "react-vite").unwrap().unwrap();
        let warnings = report.warnings.unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("react-app-polyfill/ie11"));
        assert!(warnings[0].contains("plugin-legacy"));
        assert!(report.changes.unwrap().is_empty());
        assert!(!tree.is_modified());
    }

    #[test]
    fn test_rules_for_other_targets_are_skipped() {
        let engine = SpecifierRuleEngine::without_presets(vec![
            ImportRule::exact("a", "b").for_target("node-esm"),
            ImportRule::exact("c", "d"),
        ]);
        let mut tree = tree("import x from 'a';\nimport y from 'c';\n");
        let report = engine.apply(&mut tree, "react-vite").unwrap().unwrap();
        assert_eq!(report.changes.unwrap().len(), 1);
        assert_eq!(tree.imports()[0].current(), "a");
        assert_eq!(tree.imports()[1].current(), "d");
    }

    #[test]
    fn test_unknown_target_warns_once() {
        let engine = SpecifierRuleEngine::new();
        let mut tree = tree("import x from 'a';\nimport y from 'b';\n");
        let report = engine.apply(&mut tree, "mystery").unwrap().unwrap();
        assert_eq!(
            report.warnings.unwrap(),
            vec!["No import rules registered for target 'mystery'".to_owned()]
        );
        assert_eq!(report.imports.unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_pattern_fails_every_apply() {
        let engine = SpecifierRuleEngine::without_presets(vec![ImportRule::regex("([", "x")]);
        let mut tree = tree("import x from 'a';");
        assert!(engine.apply(&mut tree, "t").is_err());
        assert!(engine.apply(&mut tree, "t").is_err());
    }

    #[test]
    fn test_identity_rewrite_is_not_a_change() {
        let engine = SpecifierRuleEngine::without_presets(vec![ImportRule::regex("^(.*)$", "$1")]);
        let mut tree = tree("import x from 'a';");
        let report = engine.apply(&mut tree, "t").unwrap().unwrap();
        assert!(report.changes.unwrap().is_empty());
        assert!(!tree.is_modified());
    }
}
