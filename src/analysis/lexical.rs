//! Line-level lexical helpers shared by the scanner.
//!
//! The scanner is line-oriented, so the only lexical state carried across
//! lines is whether we are inside a `/* ... */` block comment. Within a line
//! we track string literals so that `//` and `/*` inside strings are not
//! mistaken for comments.

use crate::config::BraceCounting;
use crate::language::SourceLanguage;

/// A source line that carries code or braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Line number (1-indexed).
    pub number: usize,
    /// Trimmed code with comments removed. Empty for a comment-only line
    /// whose braces still count under [`BraceCounting::Raw`].
    pub code: String,
    pub opens: usize,
    pub closes: usize,
}

impl SourceLine {
    /// Net change in brace depth contributed by this line.
    pub fn depth_delta(&self) -> isize {
        self.opens as isize - self.closes as isize
    }
}

/// String delimiters recognized per language.
fn string_delimiters(language: SourceLanguage) -> &'static [char] {
    match language {
        // Single quotes are char literals and lifetimes, not strings.
        SourceLanguage::Motoko | SourceLanguage::Rust => &['"'],
        SourceLanguage::JavaScript => &['"', '\'', '`'],
    }
}

/// Iterator over the code lines of a source text.
pub struct SourceLines<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    delimiters: &'static [char],
    counting: BraceCounting,
    in_block_comment: bool,
}

/// Iterate the lines of `source` that carry code or counted braces.
pub fn source_lines(source: &str, language: SourceLanguage, counting: BraceCounting) -> SourceLines<'_> {
    SourceLines {
        lines: source.lines().enumerate(),
        delimiters: string_delimiters(language),
        counting,
        in_block_comment: false,
    }
}

impl Iterator for SourceLines<'_> {
    type Item = SourceLine;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            let scan = scan_line(line, self.delimiters, &mut self.in_block_comment);
            let (opens, closes) = match self.counting {
                BraceCounting::Raw => (line.matches('{').count(), line.matches('}').count()),
                BraceCounting::CodeOnly => (scan.opens, scan.closes),
            };

            if scan.code.is_empty() && opens == 0 && closes == 0 {
                continue;
            }

            return Some(SourceLine {
                number: idx + 1,
                code: scan.code,
                opens,
                closes,
            });
        }
        None
    }
}

/// Replace the contents of string literals with spaces, keeping the quotes.
///
/// Keyword tests run on the masked text so that `"public func"` inside a
/// string does not look like a declaration.
pub fn mask_strings(code: &str, language: SourceLanguage) -> String {
    let delimiters = string_delimiters(language);
    let mut out = String::with_capacity(code.len());
    let mut string_char: Option<char> = None;
    let mut escaped = false;

    for ch in code.chars() {
        match string_char {
            Some(quote) => {
                if escaped {
                    escaped = false;
                    out.push(' ');
                } else if ch == '\\' {
                    escaped = true;
                    out.push(' ');
                } else if ch == quote {
                    string_char = None;
                    out.push(ch);
                } else {
                    out.push(' ');
                }
            }
            None => {
                if delimiters.contains(&ch) {
                    string_char = Some(ch);
                }
                out.push(ch);
            }
        }
    }
    out
}

struct LineScan {
    code: String,
    opens: usize,
    closes: usize,
}

/// Strip comments from one physical line and count the braces left in code.
///
/// A block comment left open at the end of the line sets `in_block_comment`
/// for the next one. A comment in the middle of code becomes a single space.
fn scan_line(line: &str, delimiters: &[char], in_block_comment: &mut bool) -> LineScan {
    let mut code = String::with_capacity(line.len());
    let mut string_char: Option<char> = None;
    let mut escaped = false;
    let mut opens = 0;
    let mut closes = 0;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if *in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_block_comment = false;
            }
            continue;
        }

        if let Some(quote) = string_char {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                string_char = None;
            }
            code.push(ch);
            continue;
        }

        match ch {
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_block_comment = true;
                code.push(' ');
                continue;
            }
            '{' => opens += 1,
            '}' => closes += 1,
            c if delimiters.contains(&c) => string_char = Some(c),
            _ => {}
        }
        code.push(ch);
    }

    LineScan {
        code: code.trim().to_string(),
        opens,
        closes,
    }
}

/// Split `s` on `separator` where it is not nested in brackets.
///
/// `<`/`>` count as brackets so generic arguments stay intact, except for
/// the `>` of a `->` arrow.
pub fn split_top_level(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    let mut prev = '\0';

    for (i, ch) in s.char_indices() {
        match ch {
            '(' | '[' | '{' | '<' => depth += 1,
            '>' if prev == '-' => {}
            ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
        prev = ch;
    }
    parts.push(&s[start..]);
    parts
}

/// Byte index of the last top-level single `:` (never half of a `::`).
pub fn last_top_level_colon(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth: usize = 0;
    let mut found = None;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b')' | b']' | b'}' | b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 => {
                let double = (i > 0 && bytes[i - 1] == b':')
                    || bytes.get(i + 1).copied() == Some(b':');
                if !double {
                    found = Some(i);
                }
            }
            _ => {}
        }
    }
    found
}
