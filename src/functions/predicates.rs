//! Conditions over the current value. None of these rewrite the span.

use crate::pattern::char_class::{
    char_len, find, prefix_len, set_contains, suffix_start, text_eq,
};
use crate::span::AnnotatedSpan;
use crate::value::ValueGroup;

use super::EvalContext;

/// `min <= value <= max`; when `min > max` the range is inverted and the
/// value must lie outside `[max, min]`.
fn in_range(value: i64, min: i64, max: i64) -> bool {
    if min > max {
        !(max..=min).contains(&value)
    } else {
        (min..=max).contains(&value)
    }
}

pub fn length(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let min = group.int32(0).unwrap_or(0);
    let max = group.int32(1).unwrap_or(i32::MAX);
    let len = i64::try_from(char_len(&span.text)).unwrap_or(i64::MAX);
    in_range(len, min.into(), max.into())
}

pub fn number32(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let min = group.int32(0).unwrap_or(i32::MIN);
    let max = group.int32(1).unwrap_or(i32::MAX);
    span.text
        .trim()
        .parse::<i32>()
        .is_ok_and(|n| in_range(n.into(), min.into(), max.into()))
}

pub fn number64(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let min = group.int64(0).unwrap_or(i64::MIN);
    let max = group.int64(1).unwrap_or(i64::MAX);
    span.text
        .trim()
        .parse::<i64>()
        .is_ok_and(|n| in_range(n, min, max))
}

pub fn equals(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    text_eq(&span.text, group.text(0), group.nocase(0))
}

pub fn contains(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    find(&span.text, group.text(0), 0, group.nocase(0)).is_some()
}

pub fn starts(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    prefix_len(&span.text, group.text(0), group.nocase(0)).is_some()
}

pub fn ends(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    suffix_start(&span.text, group.text(0), group.nocase(0)).is_some()
}

pub fn charset(span: &mut AnnotatedSpan, group: &ValueGroup, _: &mut EvalContext<'_>) -> bool {
    let set = group.text(0);
    let nocase = group.nocase(0);
    span.text.chars().all(|c| set_contains(set, c, nocase))
}

// ─── Examples ────────────────────────────────────────────────────────────────

/// A length inside the accepted range, as close to `current` as possible.
fn accepted_length(current: i64, min: i64, max: i64) -> i64 {
    if in_range(current, min, max) {
        current
    } else if min > max {
        // Anything past the excluded window.
        min + 1
    } else {
        current.clamp(min.max(0), max)
    }
}

pub fn length_example(sample: &mut String, group: &ValueGroup) {
    let min = group.int32(0).unwrap_or(0);
    let max = group.int32(1).unwrap_or(i32::MAX);
    let current = i64::try_from(char_len(sample)).unwrap_or(i64::MAX);
    let target = usize::try_from(accepted_length(current, min.into(), max.into())).unwrap_or(0);
    let current = char_len(sample);
    if target < current {
        *sample = sample.chars().take(target).collect();
    } else {
        sample.extend(std::iter::repeat_n('x', target - current));
    }
}

fn number_example(sample: &mut String, min: i64, max: i64) {
    if sample.trim().parse::<i64>().is_ok_and(|n| in_range(n, min, max)) {
        return;
    }
    let value = if min <= max {
        min
    } else if max > i64::MIN {
        max - 1
    } else {
        min + 1
    };
    *sample = value.to_string();
}

pub fn number32_example(sample: &mut String, group: &ValueGroup) {
    let min = group.int32(0).map_or(0, i64::from);
    let max = group.int32(1).map_or(i32::MAX.into(), i64::from);
    number_example(sample, min, max);
}

pub fn number64_example(sample: &mut String, group: &ValueGroup) {
    let min = group.int64(0).unwrap_or(0);
    let max = group.int64(1).unwrap_or(i64::MAX);
    number_example(sample, min, max);
}

pub fn equals_example(sample: &mut String, group: &ValueGroup) {
    *sample = group.text(0).to_string();
}

pub fn contains_example(sample: &mut String, group: &ValueGroup) {
    if find(sample, group.text(0), 0, group.nocase(0)).is_none() {
        sample.push_str(group.text(0));
    }
}

pub fn starts_example(sample: &mut String, group: &ValueGroup) {
    if prefix_len(sample, group.text(0), group.nocase(0)).is_none() {
        sample.insert_str(0, group.text(0));
    }
}

pub fn ends_example(sample: &mut String, group: &ValueGroup) {
    if suffix_start(sample, group.text(0), group.nocase(0)).is_none() {
        sample.push_str(group.text(0));
    }
}

pub fn charset_example(sample: &mut String, group: &ValueGroup) {
    let set = group.text(0);
    let nocase = group.nocase(0);
    sample.retain(|c| set_contains(set, c, nocase));
    if sample.is_empty()
        && let Some(first) = set.chars().next()
    {
        sample.push(first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Mode;
    use crate::params::ParamMap;
    use crate::pattern::FormatOptions;
    use crate::value::{Component, Value};
    use proptest::prelude::*;

    fn ints(values: &[i32]) -> ValueGroup {
        ValueGroup::new(
            values
                .iter()
                .map(|&n| {
                    Some(Component {
                        value: Value::Int32(n),
                        nocase: false,
                    })
                })
                .collect(),
        )
    }

    fn text(s: &str, nocase: bool) -> ValueGroup {
        ValueGroup::new(vec![Some(Component {
            value: Value::Text(s.to_string()),
            nocase,
        })])
    }

    fn run(
        f: fn(&mut AnnotatedSpan, &ValueGroup, &mut EvalContext<'_>) -> bool,
        value: &str,
        group: &ValueGroup,
    ) -> bool {
        let mut params = ParamMap::new();
        let mut ctx = EvalContext {
            params: &mut params,
            mode: Mode::Check,
            depth: 0,
            options: FormatOptions::default(),
        };
        let mut span = AnnotatedSpan::parameter("v", value, 0);
        f(&mut span, group, &mut ctx)
    }

    #[test]
    fn length_range() {
        assert!(run(length, "abc", &ints(&[1, 3])));
        assert!(!run(length, "abcd", &ints(&[1, 3])));
        assert!(run(length, "abcd", &ints(&[2])));
        assert!(run(length, "héé", &ints(&[3, 3])));
    }

    #[test]
    fn length_inverted_range() {
        assert!(!run(length, "abc", &ints(&[3, 1])));
        assert!(run(length, "", &ints(&[3, 1])));
        assert!(run(length, "abcd", &ints(&[3, 1])));
    }

    #[test]
    fn number_ranges() {
        assert!(run(number32, "42", &ints(&[0, 100])));
        assert!(run(number32, " 42 ", &ints(&[0, 100])));
        assert!(!run(number32, "4x2", &ints(&[0, 100])));
        assert!(run(number32, "42", &ints(&[100, 50])));
        assert!(!run(number32, "75", &ints(&[100, 50])));
        assert!(run(number32, "101", &ints(&[100, 50])));
        assert!(!run(number32, "99999999999", &ints(&[0])));
    }

    #[test]
    fn number64_accepts_large_values() {
        let group = ValueGroup::new(vec![Some(Component {
            value: Value::Int64(10_000_000_000),
            nocase: false,
        })]);
        assert!(run(number64, "99999999999", &group));
        assert!(!run(number64, "9999", &group));
    }

    #[test]
    fn text_conditions() {
        assert!(run(equals, "Bob", &text("bob", true)));
        assert!(!run(equals, "Bob", &text("bob", false)));
        assert!(run(contains, "hello world", &text("o w", false)));
        assert!(run(starts, "hello", &text("he", false)));
        assert!(run(ends, "hello", &text("LO", true)));
        assert!(!run(ends, "hello", &text("LO", false)));
        assert!(run(charset, "0123", &text("0123456789", false)));
        assert!(!run(charset, "01a3", &text("0123456789", false)));
    }

    #[test]
    fn examples_satisfy_their_predicates() {
        let cases: Vec<(
            fn(&mut AnnotatedSpan, &ValueGroup, &mut EvalContext<'_>) -> bool,
            fn(&mut String, &ValueGroup),
            ValueGroup,
        )> = vec![
            (length, length_example, ints(&[4, 6])),
            (length, length_example, ints(&[2, 1])),
            (number32, number32_example, ints(&[10, 20])),
            (number32, number32_example, ints(&[20, 10])),
            (equals, equals_example, text("op", false)),
            (contains, contains_example, text("@", false)),
            (starts, starts_example, text("[", false)),
            (ends, ends_example, text("]", false)),
            (charset, charset_example, text("abc", false)),
        ];
        for (eval, example, group) in cases {
            let mut sample = String::from("sample");
            example(&mut sample, &group);
            assert!(run(eval, &sample, &group), "{sample:?} for {group:?}");
        }
    }

    proptest! {
        #[test]
        fn inverted_length_is_negation(value in "[a-z]{0,12}", a in 0i32..12, b in 0i32..12) {
            prop_assume!(a != b);
            let (low, high) = (a.min(b), a.max(b));
            let normal = run(length, &value, &ints(&[low, high]));
            let inverted = run(length, &value, &ints(&[high, low]));
            prop_assert_eq!(inverted, !normal);
        }
    }
}
