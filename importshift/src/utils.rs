//! String literal helpers shared by the parser and the printer.

/// Decodes the body of a JS string literal (without its quotes).
///
/// Unknown escapes decode to the escaped character itself, as JS does.
#[must_use]
pub fn unescape_js_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            out.push('\\');
            break;
        };
        match esc {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' => out.push('\0'),
            // Line continuation
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, "\\x");
            }
            'u' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    let hex: String = chars.by_ref().take_while(|&h| h != '}').collect();
                    push_code_point(&mut out, &hex, "\\u{");
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    let Ok(unit) = u32::from_str_radix(&hex, 16) else {
                        out.push_str("\\u");
                        out.push_str(&hex);
                        continue;
                    };
                    // Surrogate pair written as two \u escapes
                    if (0xD800..0xDC00).contains(&unit) {
                        let mut lookahead = chars.clone();
                        if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
                            let low_hex: String = lookahead.by_ref().take(4).collect();
                            if let Ok(low) = u32::from_str_radix(&low_hex, 16) {
                                if (0xDC00..0xE000).contains(&low) {
                                    let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                                    if let Some(ch) = char::from_u32(combined) {
                                        out.push(ch);
                                        chars = lookahead;
                                        continue;
                                    }
                                }
                            }
                        }
                    }
                    out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            other => out.push(other),
        }
    }

    out
}

fn push_code_point(out: &mut String, hex: &str, prefix: &str) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(ch) => out.push(ch),
        None => {
            out.push_str(prefix);
            out.push_str(hex);
        }
    }
}

/// Renders `value` as a JS string literal delimited by `quote`.
///
/// With `minimal` set, only the backslash, the delimiter and line
/// terminators are escaped. Otherwise every non-ASCII character is written
/// as a `\uXXXX` escape as well.
#[must_use]
pub fn quote_js_string(value: &str, quote: char, minimal: bool) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !minimal && !c.is_ascii() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04X}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
