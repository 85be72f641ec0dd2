//! Pattern matcher: check input text against a [`CompiledPattern`].
//!
//! Literal parts anchor the match. Each run of consecutive parameters
//! captures up to the first occurrence of the next literal (searched from
//! the run's minimum length) or to the end of input. There is no
//! backtracking: once a run's right edge is chosen the match either
//! proceeds from there or fails.
//!
//! Offsets in the returned spans are byte offsets into the input.

use crate::functions::{EvalContext, Mode};
use crate::params::ParamMap;
use crate::span::AnnotatedSpan;

use super::ast::{CompiledPattern, Literal, Parameter, Part};
use super::char_class::{advance, char_len, find, prefix_len};
use super::formatter::FormatOptions;

/// Options for patterns formatted from inside a check (`validate`, `ifelse`).
const CHECK_FORMAT_OPTIONS: FormatOptions = FormatOptions {
    ignore_missing: true,
    ignore_tag_failure: false,
    remove_consumed: false,
};

impl CompiledPattern {
    /// Match `input` against this pattern.
    ///
    /// On success the named captures are stored in `params` and the returned
    /// spans cover `input` exactly. On failure `params` is left untouched.
    pub fn check(&self, input: &str, params: &mut ParamMap) -> Option<Vec<AnnotatedSpan>> {
        let spans = check_parts(self, input, params, 0);
        tracing::debug!(
            pattern = %self.source,
            matched = spans.is_some(),
            "checked input"
        );
        spans
    }
}

/// Match `input` against a pattern nested `depth` levels deep.
pub(crate) fn check_parts(
    pattern: &CompiledPattern,
    input: &str,
    params: &mut ParamMap,
    depth: usize,
) -> Option<Vec<AnnotatedSpan>> {
    if depth > pattern.options.max_depth {
        tracing::trace!(depth, "pattern nesting too deep to check");
        return None;
    }
    let mut scratch = params.clone();
    let spans = Matcher {
        input,
        params: &mut scratch,
        depth,
        cursor: 0,
        spans: Vec::with_capacity(pattern.parts.len()),
    }
    .run(&pattern.parts)?;
    *params = scratch;
    Some(spans)
}

struct Matcher<'a, 'p> {
    input: &'a str,
    params: &'p mut ParamMap,
    depth: usize,
    /// Byte offset of the first unmatched input character.
    cursor: usize,
    spans: Vec<AnnotatedSpan>,
}

impl Matcher<'_, '_> {
    fn run(mut self, parts: &[Part]) -> Option<Vec<AnnotatedSpan>> {
        let mut index = 0;
        while index < parts.len() {
            match &parts[index] {
                Part::Literal(literal) => {
                    self.literal(literal)?;
                    index += 1;
                }
                Part::Parameter(_) => {
                    let run_end = parts[index..]
                        .iter()
                        .position(|part| part.as_literal().is_some())
                        .map_or(parts.len(), |n| index + n);
                    let run: Vec<&Parameter> = parts[index..run_end]
                        .iter()
                        .filter_map(Part::as_parameter)
                        .collect();
                    let next = parts.get(run_end).and_then(Part::as_literal);
                    self.parameters(&run, next)?;
                    index = run_end;
                }
            }
        }
        if self.cursor < self.input.len() {
            tracing::trace!(
                rest = &self.input[self.cursor..],
                "unconsumed trailing input"
            );
            return None;
        }
        Some(self.spans)
    }

    fn literal(&mut self, literal: &Literal) -> Option<()> {
        let rest = &self.input[self.cursor..];
        let Some(len) = prefix_len(rest, &literal.text, !literal.case_sensitive) else {
            tracing::trace!(expected = %literal.text, at = self.cursor, "literal mismatch");
            return None;
        };
        self.spans
            .push(AnnotatedSpan::literal(&rest[..len], self.cursor, len));
        self.cursor += len;
        Some(())
    }

    /// Capture a run of adjacent parameters ending at `next`, or at the end
    /// of input when there is no following literal.
    fn parameters(&mut self, run: &[&Parameter], next: Option<&Literal>) -> Option<()> {
        let start = self.cursor;
        let min: usize = run.iter().map(|param| param.min_len()).sum();
        let Some(search_from) = advance(self.input, start, min) else {
            tracing::trace!(min, "input shorter than parameter minimum");
            return None;
        };
        let all_fixed = run.iter().all(|param| param.length_fixed.is_some());
        let end = match next {
            _ if all_fixed => search_from,
            Some(literal) => {
                let (at, _) = find(self.input, &literal.text, search_from, !literal.case_sensitive)?;
                at
            }
            None => self.input.len(),
        };

        let total = char_len(&self.input[start..end]);
        let free = run.iter().rposition(|param| param.length_fixed.is_none());
        let mut pos = start;
        for (i, param) in run.iter().enumerate() {
            let len = if Some(i) == free {
                total - (min - param.min_len())
            } else {
                param.min_len()
            };
            let param_end = advance(self.input, pos, len)?;
            self.capture(param, pos, param_end)?;
            pos = param_end;
        }
        self.cursor = end;
        Some(())
    }

    /// Run the parameter's tags over `input[start..end]` and emit its spans.
    fn capture(&mut self, param: &Parameter, start: usize, end: usize) -> Option<()> {
        let mut span = AnnotatedSpan::parameter(&param.name, &self.input[start..end], start);
        let mut ctx = EvalContext {
            params: &mut *self.params,
            mode: Mode::Check,
            depth: self.depth,
            options: CHECK_FORMAT_OPTIONS,
        };
        for tag in &param.tags {
            if !tag.evaluate(&mut span, &mut ctx) {
                tracing::trace!(param = %param.name, tag = %tag.name, "tag rejected capture");
                return None;
            }
        }

        // Text sliced away by narrowing stays in the output as plain spans.
        let range = span.source_range();
        let kept_start = range.start.clamp(start, end);
        let kept_end = range.end.clamp(kept_start, end);
        if kept_start > start {
            self.spans.push(AnnotatedSpan::literal(
                &self.input[start..kept_start],
                start,
                kept_start - start,
            ));
        }
        self.spans.push(AnnotatedSpan {
            text: self.input[kept_start..kept_end].to_string(),
            source_offset: kept_start,
            source_len: kept_end - kept_start,
            is_param: true,
            name: span.name.clone(),
            rewritten: false,
        });
        if kept_end < end {
            self.spans.push(AnnotatedSpan::literal(
                &self.input[kept_end..end],
                kept_end,
                end - kept_end,
            ));
        }

        if !param.is_anonymous() {
            self.params.insert(param.name.as_str(), span.text);
        }
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::CompileOptions;
    use crate::pattern::parser::compile;
    use crate::span::render;
    use pretty_assertions::assert_eq;

    fn check(pattern: &str, input: &str) -> Option<(Vec<AnnotatedSpan>, ParamMap)> {
        let pattern = compile(pattern, CompileOptions::default());
        let mut params = ParamMap::new();
        let spans = pattern.check(input, &mut params)?;
        Some((spans, params))
    }

    fn captures(pattern: &str, input: &str) -> Option<Vec<(String, String)>> {
        let (_, params) = check(pattern, input)?;
        Some(
            params
                .sorted_names()
                .into_iter()
                .map(|name| (name.to_string(), params.get(name).unwrap_or_default()))
                .collect(),
        )
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // --- Literals ---

    #[test]
    fn literal_exact() {
        assert!(check("hello", "hello").is_some());
        assert!(check("hello", "hellO").is_none());
        assert!(check("hello", "hello!").is_none());
        assert!(check("hello", "hell").is_none());
    }

    #[test]
    fn literal_ignore_case() {
        let pattern = compile("hello", CompileOptions::default().ignore_case());
        let mut params = ParamMap::new();
        let spans = pattern.check("HeLLo", &mut params).unwrap();
        assert_eq!(render(&spans), "HeLLo");
    }

    #[test]
    fn empty_pattern_matches_only_empty_input() {
        assert!(check("", "").is_some());
        assert!(check("", "x").is_none());
    }

    // --- Parameter runs ---

    #[test]
    fn single_parameter_takes_everything() {
        assert_eq!(captures("%[all]", "a b c"), Some(pairs(&[("all", "a b c")])));
    }

    #[test]
    fn parameter_stops_at_first_delimiter() {
        assert_eq!(
            captures("%[a]:%[b]", "x:y:z"),
            Some(pairs(&[("a", "x"), ("b", "y:z")]))
        );
    }

    #[test]
    fn irc_style_line() {
        assert_eq!(
            captures("<%[nick]> %[msg]", "<bob> hi there"),
            Some(pairs(&[("msg", "hi there"), ("nick", "bob")]))
        );
    }

    #[test]
    fn minimum_length_moves_search() {
        // Without the minimum the first ':' would end `a`.
        assert_eq!(
            captures("%[a{plm=2}]:%[b]", ":x:y"),
            Some(pairs(&[("a", ":x"), ("b", "y")]))
        );
    }

    #[test]
    fn minimum_exceeding_input_fails() {
        assert!(check("%[a{plm=5}]", "abc").is_none());
    }

    #[test]
    fn fixed_lengths_split_a_run() {
        assert_eq!(
            captures("%[y{plf=4}]%[m{plf=2}]%[d{plf=2}]", "20240131"),
            Some(pairs(&[("d", "31"), ("m", "01"), ("y", "2024")]))
        );
        assert!(check("%[y{plf=4}]%[m{plf=2}]", "2024011").is_none());
        assert!(check("%[y{plf=4}]%[m{plf=2}]", "202401x").is_none());
    }

    #[test]
    fn fixed_run_before_literal_must_end_at_literal() {
        assert!(check("%[a{plf=2}]-%[b]", "ab-c").is_some());
        assert!(check("%[a{plf=2}]-%[b]", "abc-d").is_none());
    }

    #[test]
    fn last_free_parameter_takes_remainder() {
        assert_eq!(
            captures("%[a]%[b{plf=1}]", "abcd"),
            Some(pairs(&[("a", "abc"), ("b", "d")]))
        );
        assert_eq!(
            captures("%[a]%[b]", "abcd"),
            Some(pairs(&[("a", ""), ("b", "abcd")]))
        );
    }

    #[test]
    fn lengths_are_characters() {
        assert_eq!(
            captures("%[a{plf=2}]%[b]", "héllo"),
            Some(pairs(&[("a", "hé"), ("b", "llo")]))
        );
    }

    #[test]
    fn missing_delimiter_fails() {
        assert!(check("%[a]:%[b]", "no colon").is_none());
    }

    // --- Tags ---

    #[test]
    fn failing_tag_fails_match_and_leaves_params() {
        let pattern = compile("%[n{number32=1,10}]", CompileOptions::default());
        let mut params = ParamMap::new();
        params.insert("keep", "me");
        assert!(pattern.check("42", &mut params).is_none());
        assert_eq!(params.sorted_names(), vec!["keep"]);
        assert!(pattern.check("7", &mut params).is_some());
        assert_eq!(params.get("n").as_deref(), Some("7"));
    }

    #[test]
    fn unknown_function_never_matches() {
        assert!(check("%[{unknownfn=1}]", "").is_none());
        assert!(check("%[{unknownfn=1}]", "anything").is_none());
    }

    #[test]
    fn anonymous_parameters_are_not_stored() {
        let (spans, params) = check("%[]=%[v]", "k=v").unwrap();
        assert_eq!(params.sorted_names(), vec!["v"]);
        assert_eq!(spans[0].name, None);
        assert!(spans[0].is_param);
    }

    #[test]
    fn narrowing_keeps_coverage() {
        let (spans, params) = check("%[host{delimit=@,,!, }]", "nick!user@host.net").unwrap();
        assert_eq!(params.get("host").as_deref(), Some("user@host.net"));
        assert_eq!(
            spans,
            vec![
                AnnotatedSpan::literal("nick!", 0, 5),
                AnnotatedSpan {
                    text: "user@host.net".into(),
                    source_offset: 5,
                    source_len: 13,
                    is_param: true,
                    name: Some("host".into()),
                    rewritten: false,
                },
            ]
        );
    }

    #[test]
    fn strip_keeps_coverage() {
        let (spans, params) = check("[%[v{strip}]]", "[  x ]").unwrap();
        assert_eq!(params.get("v").as_deref(), Some("x"));
        assert_eq!(render(&spans), "[  x ]");
        let param = spans.iter().find(|span| span.is_param).unwrap();
        assert_eq!(param.text, "x");
        assert_eq!(param.source_range(), 3..4);
    }

    #[test]
    fn rewritten_value_keeps_source_text() {
        let (spans, params) = check("%[v{append=!}]", "hey").unwrap();
        assert_eq!(params.get("v").as_deref(), Some("hey!"));
        assert_eq!(render(&spans), "hey");
    }

    #[test]
    fn same_length_rewrite_keeps_whole_capture() {
        let (spans, params) = check("%[v{delete=a}{append=z}{resize=-1}]", "ab").unwrap();
        assert_eq!(params.get("v").as_deref(), Some("z"));
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "ab");
        assert!(spans[0].is_param);
        assert_eq!(spans[0].source_range(), 0..2);
    }

    #[test]
    fn span_offsets_are_bytes() {
        let (spans, _) = check("é=%[v]", "é=ü").unwrap();
        assert_eq!(spans[0].source_range(), 0..3);
        assert_eq!(spans[1].source_range(), 3..5);
    }
}
