//! File naming for fragments.

use std::cmp::Ordering;

/// Prefix that marks a header fragment.
pub const HEADER_PREFIX: &str = "__";

/// Maps a structural key (a path template, a schema name) to a file stem.
///
/// Path separators and spaces become `_`, braces are dropped. Nothing else is
/// touched, so two keys can map to the same stem; callers detect that.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '/' | '\\' | ' ' => out.push('_'),
            '{' | '}' => {}
            c => out.push(c),
        }
    }
    out
}

/// Prefix added to stems that would otherwise be read back as something other
/// than a content fragment.
pub const ESCAPE_PREFIX: &str = "~";

/// Sanitizes `raw` and escapes the result when it is empty, starts with the
/// header prefix, or starts with `.` (discovery skips dot-files). The key
/// itself is stored inside the fragment, so the escape never needs undoing.
pub fn fragment_stem(raw: &str) -> String {
    let stem = sanitize(raw);
    if stem.is_empty() || stem.starts_with(HEADER_PREFIX) || stem.starts_with('.') {
        format!("{}{}", ESCAPE_PREFIX, stem)
    } else {
        stem
    }
}

/// Returns true for header fragment file names such as `__paths.yaml`.
pub fn is_header(file_name: &str) -> bool {
    file_name.starts_with(HEADER_PREFIX)
}

/// Compares file names with embedded numbers by value, so `server-2`
/// sorts before `server-10`. Ties fall back to plain byte order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut ra, mut rb) = (a, b);
    loop {
        match (ra.chars().next(), rb.chars().next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let (na, rest_a) = split_digits(ra);
                let (nb, rest_b) = split_digits(rb);
                let ord = compare_digit_runs(na, nb);
                if ord != Ordering::Equal {
                    return ord;
                }
                ra = rest_a;
                rb = rest_b;
            }
            (Some(ca), Some(cb)) => {
                if ca != cb {
                    return ca.cmp(&cb);
                }
                ra = &ra[ca.len_utf8()..];
                rb = &rb[cb.len_utf8()..];
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

// Digit runs of any length, without parsing into a fixed-width integer.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
