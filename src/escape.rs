//! Escaping for pattern text and for persisted literal data.
//!
//! Two independent forms:
//!
//! * Backslash escapes, understood everywhere in pattern text. [`escape`]
//!   makes arbitrary text safe to embed as a literal or tag argument.
//! * Run-length hex escapes (`#0D0A#`), used when patterns are persisted so
//!   control characters survive document formats that would mangle them.

/// Characters with structural meaning somewhere in pattern text.
pub const SPECIAL_CHARS: &[char] = &['\\', '%', '[', ']', '{', '}', ',', ';', '=', ':'];

const HEX_MARK: char = '#';

/// Backslash-escape every structural character in `text`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Drop escaping backslashes. A trailing lone backslash is kept.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

fn needs_hex(c: char) -> bool {
    c == HEX_MARK || c.is_ascii_control()
}

/// Encode control characters and `#` as `#HEXHEX...#` runs.
pub fn escape_hex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    for c in text.chars() {
        if needs_hex(c) {
            run.push_str(&format!("{:02X}", c as u32));
            continue;
        }
        flush_hex_run(&mut out, &mut run);
        out.push(c);
    }
    flush_hex_run(&mut out, &mut run);
    out
}

fn flush_hex_run(out: &mut String, run: &mut String) {
    if !run.is_empty() {
        out.push(HEX_MARK);
        out.push_str(run);
        out.push(HEX_MARK);
        run.clear();
    }
}

/// Decode `#HEXHEX...#` runs. Malformed runs are left as they are.
pub fn unescape_hex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(HEX_MARK) {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let decoded = after
            .find(HEX_MARK)
            .and_then(|end| decode_hex_run(&after[..end]).map(|run| (end, run)));
        match decoded {
            Some((end, run)) => {
                out.push_str(&run);
                rest = &after[end + 1..];
            }
            None => {
                out.push(HEX_MARK);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_hex_run(hex: &str) -> Option<String> {
    if hex.is_empty() || hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let bytes = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escape_special_chars() {
        assert_eq!(escape("a%[b]"), r"a\%\[b\]");
        assert_eq!(escape("x,y;z"), r"x\,y\;z");
    }

    #[test]
    fn unescape_drops_backslashes() {
        assert_eq!(unescape(r"a\%\[b\]"), "a%[b]");
        assert_eq!(unescape(r"\\"), r"\");
        assert_eq!(unescape(r"end\"), r"end\");
    }

    #[test]
    fn hex_escapes_control_runs() {
        assert_eq!(escape_hex("a\r\nb"), "a#0D0A#b");
        assert_eq!(escape_hex("#1"), "#23#1");
        assert_eq!(escape_hex("plain"), "plain");
    }

    #[test]
    fn hex_unescape_leaves_malformed_runs() {
        assert_eq!(unescape_hex("a#0D0A#b"), "a\r\nb");
        assert_eq!(unescape_hex("#1"), "#1");
        assert_eq!(unescape_hex("#zz#"), "#zz#");
        assert_eq!(unescape_hex("#ABC#"), "#ABC#");
    }

    proptest! {
        #[test]
        fn hex_round_trip(text in "\\PC*|[\\x00-\\x1f#a-z]*") {
            prop_assert_eq!(unescape_hex(&escape_hex(&text)), text);
        }

        #[test]
        fn backslash_round_trip(text in "[a-z%\\[\\]{},;=:\\\\]*") {
            prop_assert_eq!(unescape(&escape(&text)), text);
        }
    }
}
