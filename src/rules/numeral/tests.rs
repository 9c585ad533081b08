use crate::rules::numeral;
use crate::{Context, Dimension, Options, TokenKind};
use chrono::NaiveDate;

fn ctx() -> Context {
    Context::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
}

fn full_span_values(input: &str, dim: Dimension) -> Vec<String> {
    let rules = numeral::rules::get();
    let ctx = ctx();
    let opts = Options::default();

    // Run the full parser so composite rules can fire.
    let parser = crate::engine::Parser::new(input, &rules);
    parser
        .run(&ctx, &opts)
        .into_iter()
        .filter(|rt| rt.node.token.dim == dim && rt.node.range.start == 0 && rt.node.range.end == input.len())
        .map(|rt| rt.value)
        .collect()
}

#[test]
fn spoken_numbers_resolve() {
    // Array of (expected_value, input_string)
    let cases: Vec<(i64, &str)> = vec![
        (0, "zero"),
        (0, "zéro"),
        (0, "0"),
        (1, "un"),
        (1, "une"),
        (7, "Sept"),
        (11, "onze"),
        (17, "dix sept"),
        (17, "dix-sept"),
        (19, "dix neuf"),
        (20, "vingt"),
        (21, "vingt et un"),
        (22, "vingt-deux"),
        (35, "trente cinq"),
        (60, "soixante"),
        (70, "soixante dix"),
        (71, "soixante et onze"),
        (77, "soixante-dix-sept"),
        (70, "septante"),
        (80, "quatre vingts"),
        (80, "quatre-vingt"),
        (81, "quatre vingt un"),
        (90, "quatre vingt dix"),
        (99, "quatre vingt dix neuf"),
        (90, "nonante"),
        (100, "cent"),
        (105, "cent cinq"),
        (121, "cent vingt et un"),
        (200, "deux cents"),
        (999, "neuf cent quatre vingt dix neuf"),
        (1000, "mille"),
        (1900, "dix neuf cent"),
        (1984, "dix neuf cent quatre vingt quatre"),
        (1990, "mille neuf cent quatre vingt dix"),
        (2015, "deux mille quinze"),
        (2034, "deux mille trente quatre"),
        (21000, "vingt et un mille"),
        (100000, "cent mille"),
        (200000, "deux cent mille"),
        (1000000, "million"),
        (1000000, "un million"),
        (3000000, "trois millions"),
        (3200000, "trois millions deux cent mille"),
        (2024, "2024"),
    ];

    for (expected, input) in cases {
        let values = full_span_values(input, Dimension::Numeral);
        assert_eq!(values, vec![expected.to_string()], "numeral values for '{input}'");
    }
}

#[test]
fn ill_formed_numbers_do_not_compose() {
    // Hundreds only take 1..9 as multiplier; "onze cent" is the big form.
    assert_eq!(full_span_values("onze cent", Dimension::Numeral), vec!["1100"]);
    // A remainder must stay below the factor.
    assert!(full_span_values("cent mille deux", Dimension::Numeral).contains(&"100002".to_string()));
    assert!(full_span_values("vingt onze", Dimension::Numeral).is_empty());
    assert!(full_span_values("soixante neuf dix", Dimension::Numeral).is_empty());
}

#[test]
fn spoken_digit_sequences() {
    assert_eq!(full_span_values("un deux trois", Dimension::Digits), vec!["123"]);
    assert_eq!(full_span_values("zéro cinq", Dimension::Digits), vec!["05"]);
    // A single digit word is a numeral, not a digit sequence.
    assert!(full_span_values("sept", Dimension::Digits).is_empty());
}

#[test]
fn numeral_tokens_keep_their_builder() {
    let rules = numeral::rules::get();
    let parser = crate::engine::Parser::new("deux cent mille", &rules);
    let resolved = parser.run(&ctx(), &Options::default());
    let top = resolved.iter().find(|rt| rt.node.token.dim == Dimension::Numeral).unwrap();
    match &top.node.token.kind {
        TokenKind::Numeral(nd) => {
            assert_eq!(nd.value, 200_000);
            assert_eq!(nd.builder, crate::number::IntBuilder::Thousands);
        }
        other => panic!("unexpected token {other:?}"),
    }
}
