//! Rule compilation and indexing.
//!
//! Parsing is split in two phases:
//!
//! 1. **Compile/index rules** (this module): keep references to the rule set
//!    and pre-index it with coarse metadata (`CompiledRules`).
//! 2. **Run** (see `parser.rs`): scan the input for triggers (`trigger.rs`),
//!    select a subset of rules, then saturate and resolve.
//!
//! - **Buckets** (`BucketMask`): coarse features of the input ("contains
//!   digits", "names a month") that switch whole groups of rules on.
//! - **Phrases** (on each `RuleMeta`): key words checked by the parser.
//!
//! Adding a bucket means a new `BucketMask` bit, a `BUCKET_*` index, a line
//! in `CompiledRules::new`, detection in `TriggerInfo::scan` and activation
//! in `Parser::new_compiled`.
//!
//! `RuleId` indexes both `CompiledRules::rules` and `CompiledRules::metas`;
//! the two vectors stay aligned.

use crate::{Dimension, Rule};

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

bitflags::bitflags! {
    /// Coarse buckets for fast input classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BucketMask: u32 {
        const HAS_DIGITS   = 1 << 0;
        const WEEKDAYISH   = 1 << 1;
        const MONTHISH     = 1 << 2;
        const MAGNITUDE    = 1 << 3;
        const SPELLING     = 1 << 4;
    }
}

bitflags::bitflags! {
    /// Dimensions present in the stash. Rules whose `deps` are missing are
    /// skipped for the pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DimensionSet: u8 {
        const NUMERAL    = 1 << 0;
        const DIGITS     = 1 << 1;
        const DATE       = 1 << 2;
        const TIME       = 1 << 3;
        const CHARACTERS = 1 << 4;
        const LEXEME     = 1 << 5;
        const REGEX      = 1 << 6;
    }
}

impl From<Dimension> for DimensionSet {
    fn from(dim: Dimension) -> Self {
        match dim {
            Dimension::Numeral => DimensionSet::NUMERAL,
            Dimension::Digits => DimensionSet::DIGITS,
            Dimension::Date => DimensionSet::DATE,
            Dimension::Time => DimensionSet::TIME,
            Dimension::Characters => DimensionSet::CHARACTERS,
            Dimension::Lexeme => DimensionSet::LEXEME,
            Dimension::RegexMatch => DimensionSet::REGEX,
        }
    }
}

/// Per-rule activation metadata.
#[derive(Clone, Copy, Debug)]
pub struct RuleMeta {
    pub required_phrases: &'static [&'static str],
    pub optional_phrases: &'static [&'static str],
    pub buckets: BucketMask,
    pub deps: DimensionSet,
}

#[derive(Default, Debug)]
pub struct RuleIndex {
    pub always_on: Vec<RuleId>,
    pub by_bucket: [Vec<RuleId>; BUCKET_COUNT],
}

pub const BUCKET_COUNT: usize = 5;
pub const BUCKET_HAS_DIGITS: usize = 0;
pub const BUCKET_WEEKDAYISH: usize = 1;
pub const BUCKET_MONTHISH: usize = 2;
pub const BUCKET_MAGNITUDE: usize = 3;
pub const BUCKET_SPELLING: usize = 4;

/// Bucket bits paired with their index slot.
pub(crate) const BUCKETS: [(BucketMask, usize); BUCKET_COUNT] = [
    (BucketMask::HAS_DIGITS, BUCKET_HAS_DIGITS),
    (BucketMask::WEEKDAYISH, BUCKET_WEEKDAYISH),
    (BucketMask::MONTHISH, BUCKET_MONTHISH),
    (BucketMask::MAGNITUDE, BUCKET_MAGNITUDE),
    (BucketMask::SPELLING, BUCKET_SPELLING),
];

/// Pre-compiled rule set with metadata and indexes.
#[derive(Debug)]
pub struct CompiledRules<'a> {
    pub rules: Vec<&'a Rule>,
    pub metas: Vec<RuleMeta>,
    pub index: RuleIndex,
}

impl<'a> CompiledRules<'a> {
    /// Index `rules` by bucket. A rule with several bucket bits is listed
    /// under each of them and activates when any one is present.
    pub fn new(rules: &'a [Rule]) -> Self {
        let rule_refs: Vec<&Rule> = rules.iter().collect();

        let metas: Vec<RuleMeta> = rule_refs
            .iter()
            .map(|r| RuleMeta {
                required_phrases: r.required_phrases,
                optional_phrases: r.optional_phrases,
                buckets: BucketMask::from_bits_truncate(r.buckets),
                deps: r.deps.iter().fold(DimensionSet::empty(), |acc, &d| acc | DimensionSet::from(d)),
            })
            .collect();

        let mut index = RuleIndex::default();
        for (id, meta) in metas.iter().enumerate() {
            if meta.buckets.is_empty() {
                // Phrase gating still applies later.
                index.always_on.push(id);
                continue;
            }
            for (bit, slot) in BUCKETS {
                if meta.buckets.contains(bit) {
                    index.by_bucket[slot].push(id);
                }
            }
        }

        CompiledRules { rules: rule_refs, metas, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_indexed_by_bucket() {
        let rules = crate::rules::get();
        let compiled = CompiledRules::new(&rules);
        assert_eq!(compiled.rules.len(), compiled.metas.len());
        assert!(!compiled.index.always_on.is_empty());
        for slot in [BUCKET_HAS_DIGITS, BUCKET_WEEKDAYISH, BUCKET_MONTHISH, BUCKET_MAGNITUDE, BUCKET_SPELLING] {
            assert!(!compiled.index.by_bucket[slot].is_empty(), "bucket {slot} has no rules");
        }
    }

    #[test]
    fn deps_fold_into_a_set() {
        let rules = crate::rules::get();
        let compiled = CompiledRules::new(&rules);
        let id = compiled.rules.iter().position(|r| r.name == "<day> <month>").unwrap();
        assert_eq!(compiled.metas[id].deps, DimensionSet::NUMERAL | DimensionSet::LEXEME);
    }
}
