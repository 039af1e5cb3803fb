//! Canonical identifier derivation.
//!
//! Every name that crosses a template boundary (component names, hook names,
//! module keys, file paths) is produced here. Templates import what other
//! templates declare, so two stages deriving the same identifier differently
//! would emit code whose imports do not resolve.
//!
//! Conversion only splits on separators (`-`, `_`, whitespace). Existing
//! camel humps are preserved, which makes every conversion idempotent:
//!
//! ```rust
//! use uiscaffold::naming::{to_camel_case, to_pascal_case};
//!
//! assert_eq!(to_camel_case("tax-invoice"), "taxInvoice");
//! assert_eq!(to_pascal_case("tax-invoice"), "TaxInvoice");
//! assert_eq!(to_camel_case(&to_camel_case("tax-invoice")), "taxInvoice");
//! ```

use std::collections::HashSet;

fn segments(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

fn upper_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert `tax-invoice`, `tax_invoice` or `TaxInvoice` to `taxInvoice`.
pub fn to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, segment) in segments(input).enumerate() {
        if i == 0 {
            out.push_str(&lower_first(segment));
        } else {
            out.push_str(&upper_first(segment));
        }
    }
    out
}

/// Convert `tax-invoice`, `tax_invoice` or `taxInvoice` to `TaxInvoice`.
pub fn to_pascal_case(input: &str) -> String {
    segments(input).map(upper_first).collect()
}

/// Uppercase only the first character, leaving the rest untouched.
pub fn capitalize(input: &str) -> String {
    upper_first(input)
}

/// `use` + Pascal(entity), the data hook every page imports from `@primes/hooks`.
pub fn hook_name(entity: &str) -> String {
    format!("use{}", to_pascal_case(entity))
}

/// `use` + Pascal(entity) + suffix, e.g. `useOrderMaster`.
pub fn hook_name_with_suffix(entity: &str, suffix: &str) -> String {
    format!("use{}{}", to_pascal_case(entity), suffix)
}

/// Base page name: Pascal(solution) + Pascal(entity).
pub fn page_base_name(solution: &str, entity: &str) -> String {
    format!("{}{}", to_pascal_case(solution), to_pascal_case(entity))
}

/// Component name: Pascal(solution) + Pascal(entity) + suffix.
pub fn component_name(solution: &str, entity: &str, suffix: &str) -> String {
    format!("{}{}", page_base_name(solution, entity), suffix)
}

/// `{Pascal(module)}TabNavigation`, shared by the tab template and the route table.
pub fn tab_navigation_name(module_key: &str) -> String {
    format!("{}TabNavigation", to_pascal_case(module_key))
}

/// `{Pascal(solution)}Routes`, the exported route array.
pub fn routes_const_name(solution: &str) -> String {
    format!("{}Routes", to_pascal_case(solution))
}

/// Split a camelCase segment into space separated words.
///
/// `vendorPlaceholder` becomes `vendor Placeholder`: a space goes before each
/// uppercase letter and the result is trimmed.
pub fn split_camel_words(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if c.is_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out.trim().to_string()
}

/// Return `name`, or `name_1`, `name_2`... when `name` was already taken.
pub fn unique_name(seen: &mut HashSet<String>, name: &str) -> String {
    if seen.insert(name.to_string()) {
        return name.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{name}_{counter}");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}
