//! Integer grammar elements and the magnitude composition chain.
//!
//! Every integer-producing element of the grammar is an [`IntBuilder`] with a
//! half-open value band. A [`MagnitudeRule`] composes
//! `multiplier × factor + remainder` where the multiplier and remainder must
//! each come from one of the rule's accepted builders:
//!
//! ```text
//! tens        <multiplier> [<remainder>]             ×10
//! hundreds    [<multiplier>] cent [<remainder>]      ×100
//! big hundreds <multiplier> cent [<remainder>]       ×100   "dix neuf cent"
//! thousands   [<multiplier>] mille [<remainder>]     ×1000
//! millions    [<multiplier>] million [<remainder>]   ×1000000
//! ```
//!
//! Sub-values are already resolved integers by the time a rule sees them, so
//! `resolve` is plain arithmetic plus band checks.

use crate::error::{DicteeError, Result};
use crate::phrase::{PhrasePattern, SEPARATOR};

/// Identity of an integer-producing grammar element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntBuilder {
    /// "zero"
    Zero,
    /// 1..=9
    Units,
    /// 10..=19
    Teens,
    /// Tens word used as a multiplier of ten ("vingt" = 2).
    TensWord,
    /// 20..=99
    Tens,
    /// 100..=999
    Hundreds,
    /// 1000..=9999 spoken in hundreds ("dix neuf cent").
    HundredsBig,
    /// 1000..=999999
    Thousands,
    /// 1000000..=999999999
    Millions,
}

impl IntBuilder {
    /// Half-open `[min, max)` band of values this element produces.
    pub const fn band(self) -> (i64, i64) {
        match self {
            IntBuilder::Zero => (0, 1),
            IntBuilder::Units => (1, 10),
            IntBuilder::Teens => (10, 20),
            IntBuilder::TensWord => (2, 10),
            IntBuilder::Tens => (20, 100),
            IntBuilder::Hundreds => (100, 1_000),
            IntBuilder::HundredsBig => (1_000, 10_000),
            IntBuilder::Thousands => (1_000, 1_000_000),
            IntBuilder::Millions => (1_000_000, 1_000_000_000),
        }
    }

    pub fn contains(self, value: i64) -> bool {
        let (min, max) = self.band();
        min <= value && value < max
    }

    /// Builder for a written-out integer ("2024"): the first of
    /// [`INTEGER_BUILDERS`] whose band holds it. Values past the millions
    /// band have no spoken form in this grammar.
    pub fn classify(value: i64) -> Option<IntBuilder> {
        INTEGER_BUILDERS.iter().copied().find(|b| b.contains(value))
    }
}

/// Builders that make up the top-level integer element. Big hundreds share
/// the thousands band and come after it, so a digit string is never one.
pub const INTEGER_BUILDERS: &[IntBuilder] = &[
    IntBuilder::Zero,
    IntBuilder::Units,
    IntBuilder::Teens,
    IntBuilder::Tens,
    IntBuilder::Hundreds,
    IntBuilder::Thousands,
    IntBuilder::HundredsBig,
    IntBuilder::Millions,
];

/// A set of builders accepted at one grammar position, with its pattern.
#[derive(Debug)]
pub struct CollectionRule {
    pub name: &'static str,
    pub spec: &'static str,
    pub members: &'static [IntBuilder],
}

impl CollectionRule {
    pub fn accepts(&self, builder: IntBuilder) -> bool {
        self.members.contains(&builder)
    }

    /// Regex for what sits between the previous word and `<element>`: a
    /// separator, then the words `spec` puts before the slot ("[et]").
    pub fn lead_regex(&self) -> Result<String> {
        let split = PhrasePattern::parse(self.spec)?.split_at_slot("element")?;
        Ok(format!("{SEPARATOR}{}", split.before.unwrap_or_default()))
    }
}

const UNDER_100: &[IntBuilder] = &[IntBuilder::Units, IntBuilder::Teens, IntBuilder::Tens];

/// "[et] <element>": 1..=99 with an optional leading "et".
pub static AND_UNDER_100: CollectionRule = CollectionRule { name: "and 1..99", spec: "[et] <element>", members: UNDER_100 };

/// `value = multiplier × factor + remainder`.
#[derive(Debug)]
pub struct MagnitudeRule {
    pub name: &'static str,
    pub builder: IntBuilder,
    pub factor: i64,
    pub spec: &'static str,
    pub multipliers: &'static [IntBuilder],
    pub remainders: &'static [IntBuilder],
}

pub static TENS: MagnitudeRule = MagnitudeRule {
    name: "tens",
    builder: IntBuilder::Tens,
    factor: 10,
    spec: "<multiplier> [<remainder>]",
    multipliers: &[IntBuilder::TensWord],
    remainders: &[IntBuilder::Units],
};

pub static HUNDREDS: MagnitudeRule = MagnitudeRule {
    name: "hundreds",
    builder: IntBuilder::Hundreds,
    factor: 100,
    spec: "[<multiplier>] cent [<remainder>]",
    multipliers: &[IntBuilder::Units],
    remainders: UNDER_100,
};

pub static HUNDREDS_BIG: MagnitudeRule = MagnitudeRule {
    name: "big hundreds",
    builder: IntBuilder::HundredsBig,
    factor: 100,
    spec: "<multiplier> cent [<remainder>]",
    multipliers: &[IntBuilder::Teens, IntBuilder::Tens],
    remainders: UNDER_100,
};

pub static THOUSANDS: MagnitudeRule = MagnitudeRule {
    name: "thousands",
    builder: IntBuilder::Thousands,
    factor: 1_000,
    spec: "[<multiplier>] mille [<remainder>]",
    multipliers: &[IntBuilder::Units, IntBuilder::Teens, IntBuilder::Tens, IntBuilder::Hundreds],
    remainders: &[IntBuilder::Units, IntBuilder::Teens, IntBuilder::Tens, IntBuilder::Hundreds],
};

pub static MILLIONS: MagnitudeRule = MagnitudeRule {
    name: "millions",
    builder: IntBuilder::Millions,
    factor: 1_000_000,
    spec: "[<multiplier>] million [<remainder>]",
    multipliers: &[
        IntBuilder::Units,
        IntBuilder::Teens,
        IntBuilder::Tens,
        IntBuilder::Hundreds,
        IntBuilder::Thousands,
    ],
    remainders: &[
        IntBuilder::Units,
        IntBuilder::Teens,
        IntBuilder::Tens,
        IntBuilder::Hundreds,
        IntBuilder::Thousands,
    ],
};

impl MagnitudeRule {
    pub fn accepts_multiplier(&self, builder: IntBuilder) -> bool {
        self.multipliers.contains(&builder)
    }

    pub fn accepts_remainder(&self, builder: IntBuilder) -> bool {
        self.remainders.contains(&builder)
    }

    /// Whether the spoken form may leave the multiplier out ("cent", "mille").
    pub fn multiplier_optional(&self) -> bool {
        PhrasePattern::parse(self.spec).map(|p| p.is_slot_optional("multiplier")).unwrap_or(false)
    }

    /// Compose the value. A missing multiplier means 1, a missing remainder 0.
    ///
    /// ```
    /// use dictee::number::{HUNDREDS, THOUSANDS};
    ///
    /// assert_eq!(THOUSANDS.resolve(Some(2), Some(34)), Ok(2034));
    /// assert_eq!(HUNDREDS.resolve(None, Some(5)), Ok(105));
    /// ```
    pub fn resolve(&self, multiplier: Option<i64>, remainder: Option<i64>) -> Result<i64> {
        if let Some(m) = multiplier {
            self.check_band("multiplier", m, self.multipliers)?;
        } else if !self.multiplier_optional() {
            let (min, max) = (self.min_of(self.multipliers), self.max_of(self.multipliers));
            return Err(DicteeError::out_of_range(self.name, 1, min, max));
        }

        let rem = match remainder {
            Some(r) => {
                if r >= self.factor {
                    return Err(DicteeError::AmbiguousMagnitude { rule: self.name, factor: self.factor, remainder: r });
                }
                self.check_band("remainder", r, self.remainders)?;
                r
            }
            None => 0,
        };

        multiplier
            .unwrap_or(1)
            .checked_mul(self.factor)
            .and_then(|v| v.checked_add(rem))
            .ok_or_else(|| DicteeError::out_of_range(self.name, i64::MAX, 0, i64::MAX))
    }

    fn check_band(&self, what: &'static str, value: i64, builders: &[IntBuilder]) -> Result<()> {
        if builders.iter().any(|b| b.contains(value)) {
            Ok(())
        } else {
            Err(DicteeError::out_of_range(what, value, self.min_of(builders), self.max_of(builders)))
        }
    }

    fn min_of(&self, builders: &[IntBuilder]) -> i64 {
        builders.iter().map(|b| b.band().0).min().unwrap_or(0)
    }

    fn max_of(&self, builders: &[IntBuilder]) -> i64 {
        builders.iter().map(|b| b.band().1).max().unwrap_or(0)
    }
}

/// 70..=79 and 90..=99: "soixante dix", "quatre vingt dix neuf".
pub fn compose_vigesimal(base: i64, teen: i64) -> Result<i64> {
    if base != 60 && base != 80 {
        return Err(DicteeError::out_of_range("vigesimal base", base, 60, 81));
    }
    if !IntBuilder::Teens.contains(teen) {
        let (min, max) = IntBuilder::Teens.band();
        return Err(DicteeError::out_of_range("vigesimal teen", teen, min, max));
    }
    Ok(base + teen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_chain_values() {
        assert_eq!(THOUSANDS.resolve(Some(2), Some(34)), Ok(2034));
        assert_eq!(HUNDREDS.resolve(None, Some(5)), Ok(105));
        assert_eq!(HUNDREDS.resolve(None, None), Ok(100));
        assert_eq!(HUNDREDS_BIG.resolve(Some(19), Some(99)), Ok(1999));
        assert_eq!(MILLIONS.resolve(Some(3), Some(200_000)), Ok(3_200_000));
        assert_eq!(TENS.resolve(Some(2), Some(1)), Ok(21));
    }

    #[test]
    fn remainder_reaching_factor_is_ambiguous() {
        assert_eq!(
            HUNDREDS.resolve(Some(2), Some(150)),
            Err(DicteeError::AmbiguousMagnitude { rule: "hundreds", factor: 100, remainder: 150 })
        );
        assert!(matches!(TENS.resolve(Some(2), Some(10)), Err(DicteeError::AmbiguousMagnitude { .. })));
    }

    #[test]
    fn sub_values_outside_bands_are_rejected() {
        assert!(matches!(HUNDREDS.resolve(Some(12), None), Err(DicteeError::OutOfRange { .. })));
        assert!(matches!(THOUSANDS.resolve(Some(1_000), None), Err(DicteeError::OutOfRange { .. })));
        assert!(matches!(HUNDREDS.resolve(Some(2), Some(0)), Err(DicteeError::OutOfRange { .. })));
    }

    #[test]
    fn big_hundreds_need_a_multiplier() {
        assert!(!HUNDREDS_BIG.multiplier_optional());
        assert!(HUNDREDS.multiplier_optional());
        assert!(HUNDREDS_BIG.resolve(None, None).is_err());
    }

    #[test]
    fn vigesimal_composition() {
        assert_eq!(compose_vigesimal(60, 11), Ok(71));
        assert_eq!(compose_vigesimal(80, 19), Ok(99));
        assert!(compose_vigesimal(70, 10).is_err());
        assert!(compose_vigesimal(80, 9).is_err());
    }

    #[test]
    fn and_collection_renders_its_lead_words() {
        let re = regex::Regex::new(&AND_UNDER_100.lead_regex().unwrap()).unwrap();
        assert_eq!(re.find(" et un").unwrap().as_str(), " et ");
        assert_eq!(re.find("-deux").unwrap().as_str(), "-");
        assert!(AND_UNDER_100.accepts(IntBuilder::Tens));
        assert!(!AND_UNDER_100.accepts(IntBuilder::Hundreds));
        assert_eq!(HUNDREDS.remainders, AND_UNDER_100.members);
    }

    #[test]
    fn classify_digit_strings() {
        assert_eq!(IntBuilder::classify(0), Some(IntBuilder::Zero));
        assert_eq!(IntBuilder::classify(2024), Some(IntBuilder::Thousands));
        assert_eq!(IntBuilder::classify(1900), Some(IntBuilder::Thousands));
        assert_eq!(IntBuilder::classify(57), Some(IntBuilder::Tens));
        assert_eq!(IntBuilder::classify(1_000_000_000), None);
        assert_eq!(IntBuilder::classify(-3), None);
    }
}
