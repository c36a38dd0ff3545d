// medallion-core/src/domain/lookup/rename.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::table::{Rule, RuleTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Exact,
    CaseInsensitive,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct RenameRule {
    #[validate(length(min = 1, message = "Rename source cannot be empty"))]
    pub source: String,
    #[validate(length(min = 1, message = "Canonical name cannot be empty"))]
    pub canonical: String,
    #[serde(default)]
    pub matching: MatchMode,
}

impl RenameRule {
    pub fn exact(source: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            canonical: canonical.into(),
            matching: MatchMode::Exact,
        }
    }

    pub fn case_insensitive(source: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            source: fold(&source.into()),
            canonical: canonical.into(),
            matching: MatchMode::CaseInsensitive,
        }
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Rule for RenameRule {
    type Input = str;

    fn matches(&self, input: &str) -> bool {
        match self.matching {
            MatchMode::Exact => self.source == input,
            MatchMode::CaseInsensitive => self.source == fold(input),
        }
    }

    fn output(&self) -> &str {
        &self.canonical
    }
}

/// A rename rule that can never fire because an earlier rule catches its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadowedRename {
    pub index: usize,
    pub source: String,
    pub shadowed_by: usize,
}

/// Maps raw display names to canonical names. Unmatched names pass through.
#[derive(Debug, Clone, Default)]
pub struct RenameResolver {
    table: RuleTable<RenameRule>,
}

impl RenameResolver {
    pub fn new(rules: Vec<RenameRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|mut rule| {
                if rule.matching == MatchMode::CaseInsensitive {
                    rule.source = fold(&rule.source);
                }
                rule
            })
            .collect();
        Self {
            table: RuleTable::new(rules),
        }
    }

    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.table.first_match(name).unwrap_or(name)
    }

    pub fn rules(&self) -> &[RenameRule] {
        self.table.rules()
    }

    pub fn shadowed(&self) -> Vec<ShadowedRename> {
        let rules = self.table.rules();
        let mut shadowed = Vec::new();

        for (index, rule) in rules.iter().enumerate() {
            let earlier = rules[..index].iter().position(|prev| {
                match (prev.matching, rule.matching) {
                    // An exact rule only ever sees its own source.
                    (_, MatchMode::Exact) => prev.matches(&rule.source),
                    (MatchMode::CaseInsensitive, MatchMode::CaseInsensitive) => {
                        prev.source == rule.source
                    }
                    (MatchMode::Exact, MatchMode::CaseInsensitive) => false,
                }
            });
            if let Some(shadowed_by) = earlier {
                shadowed.push(ShadowedRename {
                    index,
                    source: rule.source.clone(),
                    shadowed_by,
                });
            }
        }

        shadowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> RenameResolver {
        RenameResolver::new(vec![
            RenameRule::exact("San Paolo Gelato - Amélia", "Doce Vórtice - Açai - Amélia"),
            RenameRule::exact(
                "San Paolo Gelato - Riomar Kennedy ",
                "Doce Vórtice - Açai - Riomar Kennedy",
            ),
            RenameRule::case_insensitive(
                "San Paolo - Cookie&Brownie - Design Mall",
                "Doce Vórtice - Salgados - Design Mall",
            ),
        ])
    }

    #[test]
    fn test_exact_match() {
        let r = resolver();
        assert_eq!(
            r.resolve("San Paolo Gelato - Amélia"),
            "Doce Vórtice - Açai - Amélia"
        );
        // Exact rules are case and whitespace sensitive.
        assert_eq!(r.resolve("san paolo gelato - amélia"), "san paolo gelato - amélia");
        assert_eq!(
            r.resolve("San Paolo Gelato - Riomar Kennedy"),
            "San Paolo Gelato - Riomar Kennedy"
        );
        assert_eq!(
            r.resolve("San Paolo Gelato - Riomar Kennedy "),
            "Doce Vórtice - Açai - Riomar Kennedy"
        );
    }

    #[test]
    fn test_case_insensitive_match_trims_and_folds() {
        let r = resolver();
        for name in [
            "san paolo - cookie&brownie - design mall",
            "  SAN PAOLO - COOKIE&BROWNIE - DESIGN MALL ",
            "San Paolo - Cookie&brownie - Design mall",
        ] {
            assert_eq!(r.resolve(name), "Doce Vórtice - Salgados - Design Mall");
        }
    }

    #[test]
    fn test_unmatched_name_is_identity() {
        let r = resolver();
        assert_eq!(r.resolve("Pizzaria do Bairro"), "Pizzaria do Bairro");
        assert_eq!(r.resolve(""), "");
    }

    #[test]
    fn test_rule_order_decides_precedence() {
        let r = RenameResolver::new(vec![
            RenameRule::case_insensitive("loja a", "first"),
            RenameRule::exact("Loja A", "second"),
        ]);
        assert_eq!(r.resolve("Loja A"), "first");
    }

    #[test]
    fn test_shadowed_rules_are_reported() {
        let r = RenameResolver::new(vec![
            RenameRule::exact("Loja A", "A1"),
            RenameRule::case_insensitive("loja b", "B1"),
            RenameRule::exact("Loja A", "A2"),
            RenameRule::exact("  LOJA B", "B2"),
            RenameRule::case_insensitive(" Loja B ", "B3"),
            RenameRule::case_insensitive("loja a", "A3"),
        ]);
        let shadowed: Vec<(usize, usize)> = r
            .shadowed()
            .iter()
            .map(|s| (s.index, s.shadowed_by))
            .collect();
        assert_eq!(shadowed, vec![(2, 0), (3, 1), (4, 1)]);
        assert!(resolver().shadowed().is_empty());
    }
}
