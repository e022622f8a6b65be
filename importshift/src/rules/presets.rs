use rustc_hash::FxHashMap;
use std::sync::OnceLock;

use super::ImportRule;

/// Built-in rules for every known target.
#[must_use]
pub fn builtin_presets() -> &'static FxHashMap<&'static str, Vec<ImportRule>> {
    static PRESETS: OnceLock<FxHashMap<&'static str, Vec<ImportRule>>> = OnceLock::new();
    PRESETS.get_or_init(|| {
        let mut m = FxHashMap::default();
        m.insert("react-vite", react_vite());
        m
    })
}

/// Rules for `target`, empty when the target has no preset.
#[must_use]
pub fn preset_for(target: &str) -> &'static [ImportRule] {
    match builtin_presets().get(target) {
        Some(rules) => rules,
        None => &[],
    }
}

/// Create React App to Vite (with Vitest as the test runner).
fn react_vite() -> Vec<ImportRule> {
    vec![
        ImportRule::exact("@jest/globals", "vitest")
            .with_note("Vitest provides the Jest globals API"),
        ImportRule::exact("@testing-library/jest-dom", "@testing-library/jest-dom/vitest"),
        ImportRule::unsupported("react-scripts")
            .with_note("Vite replaces react-scripts; remove this import"),
        ImportRule::unsupported("react-app-polyfill")
            .with_note("use @vitejs/plugin-legacy for legacy browser support"),
    ]
    .into_iter()
    .map(|rule| rule.for_target("react-vite"))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_react_vite_preset_registered() {
        let rules = preset_for("react-vite");
        assert!(!rules.is_empty());
        assert!(rules.iter().all(|r| r.applies_to("react-vite")));
    }

    #[test]
    fn test_unknown_target_has_no_preset() {
        assert!(preset_for("no-such-target").is_empty());
    }
}
