//! French rule families. Each family has its tables, pure resolvers and the
//! `Rule`s that bind them to the engine.

pub mod calendar;
pub mod characters;
pub mod numeral;

use crate::Rule;

/// Every rule of every family, in a stable order.
pub fn get() -> Vec<Rule> {
    let mut rules = numeral::rules::get();
    rules.extend(calendar::rules::get());
    rules.extend(characters::rules::get());
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rule_names_are_unique() {
        let rules = get();
        let mut names = HashSet::new();
        for rule in &rules {
            assert!(names.insert(rule.name), "duplicate rule name {}", rule.name);
        }
    }

    #[test]
    fn every_rule_has_a_pattern() {
        assert!(get().iter().all(|r| !r.pattern.is_empty()));
    }
}
