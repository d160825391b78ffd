//! Path pattern matching logic.
//!
//! # Responsibilities
//! - Match one route pattern against one concrete pathname
//! - Extract `:name` parameters, percent-decoded
//!
//! # Design Decisions
//! - Literal segments compare exactly and case-sensitively
//! - Segments are paired positionally; a missing literal segment on the
//!   shorter side compares as the empty string, which tolerates a
//!   single trailing slash but nothing looser
//! - A `:name` segment only binds when its pathname segment exists
//!   (possibly empty); a pathname that ends early never matches
//! - No regex to guarantee O(n) matching

use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Decoded route parameters, name → value.
pub type Params = HashMap<String, String>;

/// Match `pathname` against `pattern`, extracting `:name` parameters.
///
/// Returns `None` as soon as a literal segment differs; parameters
/// collected up to that point are dropped with the attempt.
pub fn match_path(pattern: &str, pathname: &str) -> Option<Params> {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let pathname_parts: Vec<&str> = pathname.split('/').collect();

    let mut params = Params::new();
    let len = pattern_parts.len().max(pathname_parts.len());
    for i in 0..len {
        let pattern_part = pattern_parts.get(i).copied().unwrap_or("");

        if let Some(name) = pattern_part.strip_prefix(':') {
            // A parameter needs its segment to exist: an empty trailing
            // segment still binds, a pathname that ends early does not.
            match pathname_parts.get(i) {
                Some(value) => {
                    params.insert(name.to_string(), decode_segment(value));
                }
                None => return None,
            }
            continue;
        }
        let pathname_part = pathname_parts.get(i).copied().unwrap_or("");
        if pattern_part != pathname_part {
            return None;
        }
    }
    Some(params)
}

/// Percent-decode one pathname segment, replacing invalid UTF-8.
fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
