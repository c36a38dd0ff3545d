// medallion-core/src/domain/lookup/table.rs
//
// Generic first-match scan shared by every lookup table.

/// A single lookup entry: a predicate over an input and the value it yields.
pub trait Rule {
    type Input: ?Sized;

    fn matches(&self, input: &Self::Input) -> bool;

    fn output(&self) -> &str;
}

/// Ordered list of rules; the first matching rule wins.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable<R> {
    rules: Vec<R>,
}

impl<R: Rule> RuleTable<R> {
    pub fn new(rules: Vec<R>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[R] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Position and rule of the first match.
    pub fn find(&self, input: &R::Input) -> Option<(usize, &R)> {
        self.rules.iter().enumerate().find(|(_, r)| r.matches(input))
    }

    pub fn first_match(&self, input: &R::Input) -> Option<&str> {
        self.find(input).map(|(_, r)| r.output())
    }
}

impl<R> Default for RuleTable<R> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Prefix(&'static str, &'static str);

    impl Rule for Prefix {
        type Input = str;

        fn matches(&self, input: &str) -> bool {
            input.starts_with(self.0)
        }

        fn output(&self) -> &str {
            self.1
        }
    }

    #[test]
    fn test_first_match_wins() {
        let table = RuleTable::new(vec![Prefix("ab", "first"), Prefix("a", "second")]);
        assert_eq!(table.first_match("abc"), Some("first"));
        assert_eq!(table.first_match("acd"), Some("second"));
        assert_eq!(table.find("acd").map(|(i, _)| i), Some(1));
        assert_eq!(table.first_match("zzz"), None);
    }

    #[test]
    fn test_empty_table_never_matches() {
        let table: RuleTable<Prefix> = RuleTable::default();
        assert!(table.is_empty());
        assert_eq!(table.first_match("anything"), None);
    }
}
