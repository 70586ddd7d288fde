//! Property-based tests for logman using proptest

use logman::{tokenize, ColorKey, ColorScheme, Message, Value};
use proptest::prelude::*;

fn arb_primitive() -> BoxedStrategy<Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u32>().prop_map(Value::from),
        (-1.0e9..1.0e9f64).prop_map(Value::from),
        "[a-z0-9]{0,8}".prop_map(Value::from),
    ]
    .boxed()
}

// Composite values without nil maps: a nil map legitimately renders an
// unmatched closing token, which the balance property excludes by
// definition.
fn arb_value() -> BoxedStrategy<Value> {
    arb_primitive()
        .prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(("[a-z]{1,6}".prop_map(String::from), inner.clone()), 0..4)
                    .prop_map(|fields| Value::record("rec", fields)),
                inner.clone().prop_map(|v| Value::ptr(Some(v))),
                Just(Value::ptr(None)),
                prop::collection::vec(inner.clone(), 0..4)
                    .prop_map(|items| Value::slice("elem", Some(items))),
                Just(Value::slice("elem", None)),
                prop::collection::vec((inner.clone(), inner.clone()), 0..3)
                    .prop_map(|pairs| Value::map(Some(pairs))),
                inner.clone().prop_map(|v| Value::boxed(Some(v))),
                Just(Value::channel(Some("0xc0de"))),
                Just(Value::channel(None)),
                Just(Value::func(Some("handler"))),
                Just(Value::func(None)),
            ]
            .boxed()
        })
        .boxed()
}

proptest! {
    /// Every primitive tokenizes to exactly one token whose trimmed text
    /// is the value's canonical textual form.
    #[test]
    fn test_primitive_single_token(value in arb_primitive()) {
        let tokens = tokenize(&value);
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(tokens[0].text.trim_end(), value.to_string());
        prop_assert_eq!(tokens[0].tag.as_str(), value.kind());
    }

    /// Opening structural tokens always pair with closing ones.
    #[test]
    fn test_structural_balance(value in arb_value()) {
        let tokens = tokenize(&value);
        let opens = tokens
            .iter()
            .filter(|t| matches!(t.text.as_str(), "{" | "&{" | "[" | "map["))
            .count();
        let closes = tokens
            .iter()
            .filter(|t| matches!(t.text.trim_end(), "}" | "]"))
            .count();
        prop_assert_eq!(opens, closes);
    }

    /// Tokenization is deterministic for a given value.
    #[test]
    fn test_tokenize_deterministic(value in arb_value()) {
        prop_assert_eq!(tokenize(&value), tokenize(&value));
    }

    /// Color lookups are stable across repeated calls absent overrides.
    #[test]
    fn test_color_lookup_idempotent(
        name in "[a-z]{1,8}",
        index in any::<u8>(),
    ) {
        let scheme = ColorScheme::default_scheme()
            .with_colors([(ColorKey::fg(name.as_str()), index)]);
        let key = ColorKey::fg(name.as_str());
        let first = scheme.get(&key);
        prop_assert_eq!(first, index);
        for _ in 0..4 {
            prop_assert_eq!(scheme.get(&key), first);
        }
    }

    /// The eagerly rendered message field round-trips the template.
    #[test]
    fn test_message_round_trip(text in "[a-z0-9 ]{0,16}", number in any::<i64>()) {
        let msg = Message::new(
            "t=%v n=%v",
            vec![Value::from(text.as_str()), Value::from(number)],
        );
        let expected = format!("t={} n={}", text, number);
        prop_assert_eq!(
            msg.value("message").map(|v| v.to_string()),
            Some(expected)
        );
    }

    /// The last token of a colorized rendering never carries trailing
    /// whitespace.
    #[test]
    fn test_colorized_output_right_trimmed(value in arb_value()) {
        use logman::Colorize;
        let scheme = ColorScheme::default_scheme();
        let styled = scheme.colorize_by_type(&value);
        // Strip the trailing reset escape and check the visible text.
        if let Some(body) = styled.strip_suffix("\x1b[0m") {
            prop_assert!(!body.ends_with(' '));
        }
    }
}
