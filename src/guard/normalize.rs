//! Request path canonicalization.
//!
//! # Responsibilities
//! - Collapse runs of consecutive slashes to a single slash
//! - Strip literal `/../` traversal sequences
//! - Run both rewrites to a fixed point so obfuscated sequences
//!   (e.g. `/a//../b`) cannot survive one rewrite and reappear after
//!   the other
//!
//! # Design Decisions
//! - Pure function over the raw path string; routing itself is the
//!   framework's job, this output is used only for origin classification
//! - Single-dot segments (`/./`) are left untouched
//! - Fixed-point iteration terminates because every rewrite strictly
//!   shrinks the string

/// Canonicalize a raw request path for classification.
///
/// Repeats slash collapsing and `/../` stripping until the output is
/// stable. Idempotent: `normalize(normalize(p)) == normalize(p)`.
pub fn normalize(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = strip_traversal(&collapse_slashes(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Replace any run of 2+ `/` characters with a single `/`.
fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_was_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !prev_was_slash {
                out.push(c);
            }
            prev_was_slash = true;
        } else {
            out.push(c);
            prev_was_slash = false;
        }
    }
    out
}

/// Remove literal `/../` occurrences (left to right, non-overlapping).
fn strip_traversal(path: &str) -> String {
    path.replace("/../", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "/api//products///x",
            "/api/../secret",
            "/api/..././../secret",
            "/api/..//../secret",
            "/",
            "",
            "/plain/path",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn collapses_consecutive_slashes() {
        assert_eq!(normalize("/api//products///x"), "/api/products/x");
    }

    #[test]
    fn strips_traversal_segment() {
        assert_eq!(normalize("/api/../secret"), "/api/secret");
    }

    #[test]
    fn nested_traversal_reaches_fixed_point() {
        // A single rewrite pass would leave "/api/../secret" behind here;
        // the fixed-point loop keeps rewriting until stable.
        assert_eq!(normalize("/api/..//../secret"), "/api/secret");
    }

    #[test]
    fn dot_dot_mixed_with_single_dots() {
        // Single-dot segments are out of scope for the rewrite rules and
        // survive normalization.
        assert_eq!(normalize("/api/..././../secret"), "/api/..././secret");
    }

    #[test]
    fn untouched_paths_pass_through() {
        assert_eq!(normalize("/api/products"), "/api/products");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "");
    }
}
