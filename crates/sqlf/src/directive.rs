//! Printf-style directive scanning and argument index resolution.
//!
//! Templates use printf-style directives (`%s`, `%d`, `%[1]s`, `%%`, plus
//! flags, width and precision). The verb and decorations carry no meaning
//! here, every non-literal directive becomes one positional placeholder, but
//! they must be scanned precisely so the surrounding SQL text is preserved.

use crate::error::{SqlfError, SqlfResult};

/// One parsed directive in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Directive {
    /// Byte offset of the `%` marker.
    pub(crate) start: usize,
    /// Byte offset one past the verb.
    pub(crate) end: usize,
    /// Explicit 1-based argument index from a leading `[n]`, if present.
    pub(crate) explicit_index: Option<usize>,
    /// True for `%%`, which renders as a literal `%` and binds no argument.
    pub(crate) is_literal: bool,
}

/// Scan an optional `[n]` at `i`, returning the position after it and the
/// parsed index. An unclosed or empty bracket is left untouched.
fn scan_optional_index(bytes: &[u8], i: usize) -> (usize, Option<usize>) {
    if i < bytes.len() && bytes[i] == b'[' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > i + 1 && j < bytes.len() && bytes[j] == b']' {
            // Saturate rather than overflow on absurd indices; resolution
            // rejects anything outside the argument count anyway.
            let mut n: usize = 0;
            for &b in &bytes[i + 1..j] {
                n = n.saturating_mul(10).saturating_add((b - b'0') as usize);
            }
            return (j + 1, Some(n));
        }
    }
    (i, None)
}

fn is_flag(b: u8) -> bool {
    // `'` is the grouping flag, ` ` the sign-space flag.
    matches!(b, b'#' | b'0' | b'+' | b'-' | b' ' | b'\'')
}

/// Scan `template` and return its directives in source order.
///
/// Handles `%%`, `%s`, `%d`, `%[1]s`, `%+d`, `%02d`, `%.2f`, `%[1]02d`,
/// `%'d`, `%*[2]d` and the like. A trailing `%` with no verb at end of input
/// emits nothing.
pub(crate) fn parse_directives(template: &str) -> Vec<Directive> {
    let bytes = template.as_bytes();
    let mut directives = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        let start = i;
        i += 1; // '%'
        if i >= bytes.len() {
            break; // dangling marker: dropped
        }

        if bytes[i] == b'%' {
            directives.push(Directive {
                start,
                end: i + 1,
                explicit_index: None,
                is_literal: true,
            });
            i += 1;
            continue;
        }

        // Optional explicit argument index [n].
        let (next, explicit_index) = scan_optional_index(bytes, i);
        i = next;

        // Flags.
        while i < bytes.len() && is_flag(bytes[i]) {
            i += 1;
        }

        // Width: digits, or `*` optionally sourced from its own [n]. The
        // width's argument index is irrelevant for binding but must be
        // consumed so the verb is found in the right place.
        if i < bytes.len() && bytes[i] == b'*' {
            i += 1;
            i = scan_optional_index(bytes, i).0;
        } else {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }

        // Precision: '.' then digits or `*` (again with optional [n]).
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            if i < bytes.len() && bytes[i] == b'*' {
                i += 1;
                i = scan_optional_index(bytes, i).0;
            } else {
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
        }

        // The verb: one character. Advance a full char so directive spans
        // stay on UTF-8 boundaries.
        if i < bytes.len() {
            let verb_len = template[i..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
            i += verb_len;
            directives.push(Directive {
                start,
                end: i,
                explicit_index,
                is_literal: false,
            });
        }
    }
    directives
}

/// Assign each directive its zero-based argument index.
///
/// Implicit directives consume the next argument left to right. An explicit
/// `[n]` selects argument `n-1` and re-anchors the implicit counter so later
/// implicit directives continue at `n` (0-based), matching printf semantics.
/// Literal directives get `None`.
pub(crate) fn resolve_indices(
    directives: &[Directive],
    arg_count: usize,
) -> SqlfResult<Vec<Option<usize>>> {
    let mut resolved = Vec::with_capacity(directives.len());
    let mut next_implicit = 0usize;
    for d in directives {
        if d.is_literal {
            resolved.push(None);
            continue;
        }
        let idx = match d.explicit_index {
            Some(n) => {
                if n == 0 || n > arg_count {
                    return Err(SqlfError::IndexOutOfRange {
                        index: n,
                        count: arg_count,
                    });
                }
                next_implicit = n;
                n - 1
            }
            None => {
                let idx = next_implicit;
                if idx >= arg_count {
                    return Err(SqlfError::IndexOutOfRange {
                        index: idx + 1,
                        count: arg_count,
                    });
                }
                next_implicit += 1;
                idx
            }
        };
        resolved.push(Some(idx));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans<'a>(template: &'a str) -> Vec<&'a str> {
        parse_directives(template)
            .iter()
            .map(|d| &template[d.start..d.end])
            .collect()
    }

    #[test]
    fn scans_simple_verbs() {
        assert_eq!(spans("a = %s AND b = %d"), vec!["%s", "%d"]);
    }

    #[test]
    fn scans_literal_percent() {
        let ds = parse_directives("x <<%% %s");
        assert_eq!(ds.len(), 2);
        assert!(ds[0].is_literal);
        assert_eq!(&"x <<%% %s"[ds[0].start..ds[0].end], "%%");
        assert!(!ds[1].is_literal);
    }

    #[test]
    fn scans_explicit_index() {
        let ds = parse_directives("a = %[1]s AND b = %[12]d");
        assert_eq!(ds[0].explicit_index, Some(1));
        assert_eq!(ds[1].explicit_index, Some(12));
    }

    #[test]
    fn scans_flags_width_precision() {
        assert_eq!(spans("%+d %02d %.2f %'d %#x %-5s % d"), vec![
            "%+d", "%02d", "%.2f", "%'d", "%#x", "%-5s", "% d"
        ]);
        assert_eq!(spans("%[1]10.2f"), vec!["%[1]10.2f"]);
        assert_eq!(spans("%[1]02d"), vec!["%[1]02d"]);
    }

    #[test]
    fn scans_star_width_and_precision() {
        let ds = parse_directives("%[1]*[2]d and %.*[3]f and %*d");
        assert_eq!(ds.len(), 3);
        assert_eq!(ds[0].explicit_index, Some(1));
        assert_eq!(&"%[1]*[2]d"[ds[0].start..ds[0].end], "%[1]*[2]d");
        // Width/precision indices are consumed but never bind.
        assert_eq!(ds[1].explicit_index, None);
        assert_eq!(ds[2].explicit_index, None);
    }

    #[test]
    fn dangling_trailing_marker_is_dropped() {
        assert_eq!(parse_directives("%").len(), 0);
        assert_eq!(spans("a = %s %"), vec!["%s"]);
    }

    #[test]
    fn unclosed_bracket_consumes_bracket_as_verb() {
        assert_eq!(spans("%[12s"), vec!["%["]);
        assert_eq!(spans("%[]s"), vec!["%["]);
    }

    #[test]
    fn multibyte_verb_keeps_char_boundary() {
        let ds = parse_directives("a = %é rest");
        assert_eq!(ds.len(), 1);
        assert_eq!(&"a = %é rest"[ds[0].start..ds[0].end], "%é");
    }

    #[test]
    fn resolves_implicit_in_order() {
        let ds = parse_directives("%s %s %s");
        assert_eq!(
            resolve_indices(&ds, 3).unwrap(),
            vec![Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn explicit_index_reanchors_implicit_counter() {
        let ds = parse_directives("%[2]s %s");
        assert_eq!(resolve_indices(&ds, 3).unwrap(), vec![Some(1), Some(2)]);

        let ds = parse_directives("%[1]s %s %s");
        assert_eq!(
            resolve_indices(&ds, 3).unwrap(),
            vec![Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn literals_resolve_to_none() {
        let ds = parse_directives("%% %s");
        assert_eq!(resolve_indices(&ds, 1).unwrap(), vec![None, Some(0)]);
    }

    #[test]
    fn implicit_overflow_is_fatal() {
        let ds = parse_directives("%s %s");
        assert_eq!(
            resolve_indices(&ds, 1),
            Err(SqlfError::IndexOutOfRange { index: 2, count: 1 })
        );
    }

    #[test]
    fn explicit_out_of_range_is_fatal() {
        let ds = parse_directives("%[3]s");
        assert_eq!(
            resolve_indices(&ds, 1),
            Err(SqlfError::IndexOutOfRange { index: 3, count: 1 })
        );
        let ds = parse_directives("%[0]s");
        assert_eq!(
            resolve_indices(&ds, 1),
            Err(SqlfError::IndexOutOfRange { index: 0, count: 1 })
        );
    }
}
