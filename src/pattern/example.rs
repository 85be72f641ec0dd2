//! Sample input generation.
//!
//! Each parameter starts from an empty sample that its tags bend in turn
//! using their functions' example behavior. The result is a plausible input,
//! not a guaranteed match: tags that reject rather than describe values
//! (negated tags, cross-parameter checks) are not satisfied.

use super::ast::{CompiledPattern, Parameter, Part};
use super::char_class::char_len;

/// Filler for length constraints no tag already satisfied.
const FILL: char = 'x';

impl CompiledPattern {
    pub fn example(&self) -> String {
        example(self)
    }
}

/// Render a sample input for `pattern`.
pub fn example(pattern: &CompiledPattern) -> String {
    pattern
        .parts
        .iter()
        .map(|part| match part {
            Part::Literal(literal) => literal.text.clone(),
            Part::Parameter(param) => parameter_example(param),
        })
        .collect()
}

fn parameter_example(param: &Parameter) -> String {
    let mut sample = String::new();
    for tag in &param.tags {
        tag.example(&mut sample);
    }
    let len = char_len(&sample);
    match (param.length_fixed, param.length_min) {
        (Some(fixed), _) if len > fixed => sample.chars().take(fixed).collect(),
        (Some(want), _) | (None, Some(want)) if len < want => {
            sample.extend(std::iter::repeat_n(FILL, want - len));
            sample
        }
        _ => sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamMap;
    use crate::pattern::CompileOptions;
    use crate::pattern::parser::compile;

    fn sample(source: &str) -> String {
        compile(source, CompileOptions::default()).example()
    }

    #[test]
    fn literals_verbatim() {
        assert_eq!(sample(r"hello\, world"), "hello, world");
    }

    #[test]
    fn tags_shape_the_sample() {
        assert_eq!(sample("<%[n{equals=bob}]>"), "<bob>");
        assert_eq!(sample("%[v{length=3,5}]"), "xxx");
        assert_eq!(sample("%[v{starts=#}{ends=!}]"), "#!");
        assert_eq!(sample("%[v{number32=10,20}]"), "10");
    }

    #[test]
    fn length_directives_pad_and_truncate() {
        assert_eq!(sample("%[v{plm=3}]"), "xxx");
        assert_eq!(sample("%[v{plf=2}{equals=abcd}]"), "ab");
        assert_eq!(sample("%[v{plf=4}{equals=ab}]"), "abxx");
    }

    #[test]
    fn negated_tags_are_skipped() {
        assert_eq!(sample("%[v{equals(not)=x}]"), "");
    }

    #[test]
    fn nested_pattern_example() {
        assert_eq!(sample("%[v{pattern=%[a{equals=1}]-%[b{equals=2}]}]"), "1-2");
    }

    #[test]
    fn sample_matches_its_pattern() {
        let pattern = compile(
            "%[y{plf=4}{number32=1900,2100}]-%[m{plf=2}{equals=07}]:%[rest{starts=>}]",
            CompileOptions::default(),
        );
        let input = pattern.example();
        let mut params = ParamMap::new();
        assert!(pattern.check(&input, &mut params).is_some(), "{input:?}");
    }
}
