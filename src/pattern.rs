//! Timestamp pattern translation.
//!
//! Ingestion configs describe timestamps with the `yyyy-MM-dd HH:mm:ss`
//! style mini-language. chrono speaks strftime, so the configured pattern is
//! translated once at construction; a pattern that cannot be translated is a
//! configuration error, never a per-message one.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,

    #[error("unsupported pattern letter '{letter}' in \"{pattern}\"")]
    UnsupportedToken { letter: char, pattern: String },

    #[error("unterminated quoted literal in \"{pattern}\"")]
    UnterminatedQuote { pattern: String },
}

/// Translate a `yyyy-MM-dd` style pattern into a chrono strftime string.
///
/// Supported letters follow the common subset of the mini-language: year
/// (`yyyy`/`yy`), month (`M`..`MMMM`), day (`d`), hours (`H` 0-23, `h`
/// 1-12), minutes (`m`), seconds (`s`), fractional seconds (exactly `SSS`,
/// `SSSSSS`, or `SSSSSSSSS` — chrono parses fixed-width fractions only),
/// weekday (`E`), AM/PM (`a`), and zone offsets (`Z`, `X`).
/// Single-quoted runs are literal text, `''` is a literal quote, and any
/// other ASCII letter is rejected.
pub fn to_strftime(pattern: &str) -> Result<String, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }

    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            quoted_literal(&mut chars, &mut out)
                .map_err(|_| PatternError::UnterminatedQuote {
                    pattern: pattern.to_string(),
                })?;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(c, &mut out);
            continue;
        }

        let mut count = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            count += 1;
        }

        let directive = match (c, count) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1 | 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', _) => "%d",
            ('H', _) => "%H",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('S', 3) => "%3f",
            ('S', 6) => "%6f",
            ('S', 9) => "%9f",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('a', _) => "%p",
            ('Z', _) => "%z",
            ('X', 1 | 2) => "%z",
            ('X', _) => "%:z",
            _ => {
                return Err(PatternError::UnsupportedToken {
                    letter: c,
                    pattern: pattern.to_string(),
                })
            }
        };
        out.push_str(directive);
    }

    Ok(out)
}

fn quoted_literal(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    out: &mut String,
) -> Result<(), ()> {
    // '' inside or outside a quoted run is a single literal quote
    if chars.peek() == Some(&'\'') {
        chars.next();
        out.push('\'');
        return Ok(());
    }

    loop {
        match chars.next() {
            // '' inside the run is a literal quote; the run continues
            Some('\'') if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            Some('\'') => return Ok(()),
            Some(c) => push_literal(c, out),
            None => return Err(()),
        }
    }
}

fn push_literal(c: char, out: &mut String) {
    // a raw '%' in the pattern must not become a strftime directive
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_patterns() {
        assert_eq!(to_strftime("yyyy-MM-dd").unwrap(), "%Y-%m-%d");
        assert_eq!(
            to_strftime("yyyy-MM-dd HH:mm:ss").unwrap(),
            "%Y-%m-%d %H:%M:%S"
        );
        assert_eq!(to_strftime("yyyyMMdd").unwrap(), "%Y%m%d");
        assert_eq!(to_strftime("dd/MM/yy").unwrap(), "%d/%m/%y");
    }

    #[test]
    fn test_quoted_literals() {
        assert_eq!(
            to_strftime("yyyy-MM-dd'T'HH:mm:ssXXX").unwrap(),
            "%Y-%m-%dT%H:%M:%S%:z"
        );
        assert_eq!(to_strftime("yyyy 'year'").unwrap(), "%Y year");
        assert_eq!(to_strftime("hh'' a").unwrap(), "%I' %p");
    }

    #[test]
    fn test_doubled_quote_inside_quoted_run() {
        assert_eq!(to_strftime("hh 'o''clock' a").unwrap(), "%I o'clock %p");
        assert_eq!(to_strftime("'it''s' HH:mm").unwrap(), "it's %H:%M");
    }

    #[test]
    fn test_fractional_seconds_and_zones() {
        assert_eq!(
            to_strftime("yyyy-MM-dd HH:mm:ss.SSS").unwrap(),
            "%Y-%m-%d %H:%M:%S.%3f"
        );
        assert_eq!(to_strftime("HH:mm Z").unwrap(), "%H:%M %z");
        assert_eq!(
            to_strftime("HH:mm:ss.SSSSSS").unwrap(),
            "%H:%M:%S.%6f"
        );
    }

    #[test]
    fn test_variable_width_fractions_rejected() {
        // chrono has no variable-width fraction directive, so only the
        // fixed widths documented on to_strftime are accepted
        for pattern in ["HH:mm:ss.SS", "HH:mm:ss.SSSS"] {
            assert_eq!(
                to_strftime(pattern),
                Err(PatternError::UnsupportedToken {
                    letter: 'S',
                    pattern: pattern.to_string(),
                })
            );
        }
    }

    #[test]
    fn test_percent_is_escaped() {
        assert_eq!(to_strftime("yyyy%MM").unwrap(), "%Y%%%m");
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert_eq!(to_strftime(""), Err(PatternError::Empty));
    }

    #[test]
    fn test_unsupported_letter_rejected() {
        assert_eq!(
            to_strftime("yyyy-MM-dd'T'HH:mm:ss.SSS'Z' w"),
            Err(PatternError::UnsupportedToken {
                letter: 'w',
                pattern: "yyyy-MM-dd'T'HH:mm:ss.SSS'Z' w".to_string(),
            })
        );
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        assert_eq!(
            to_strftime("yyyy-MM-dd'T"),
            Err(PatternError::UnterminatedQuote {
                pattern: "yyyy-MM-dd'T".to_string(),
            })
        );
    }
}
