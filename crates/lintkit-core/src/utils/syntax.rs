//! Attribute and path helpers for `syn` visitors.

use syn::{Attribute, Path};

/// Checks if attributes contain an `#[allow(...)]` for one of `lint_names`.
///
/// Lint names are matched with whitespace removed, so
/// `"clippy::unwrap_used"` matches `#[allow(clippy :: unwrap_used)]`.
#[must_use]
pub fn has_allow_attr(attrs: &[Attribute], lint_names: &[&str]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("allow"))
        .any(|attr| {
            let text = quote::quote!(#attr).to_string().replace(' ', "");
            lint_names
                .iter()
                .any(|name| text.contains(&name.replace(' ', "")))
        })
}

/// Checks if attributes contain a `#[test]` attribute.
#[must_use]
pub fn has_test_attr(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("test"))
}

/// Checks if attributes contain a `#[cfg(...)]` mentioning `test`.
#[must_use]
pub fn has_cfg_test(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("cfg"))
        .any(|attr| quote::quote!(#attr).to_string().contains("test"))
}

/// Joins the segments of a path with `::`.
///
/// ```ignore
/// let path: syn::Path = syn::parse_quote!(std::fs::read);
/// assert_eq!(path_to_string(&path), "std::fs::read");
/// ```
#[must_use]
pub fn path_to_string(path: &Path) -> String {
    path.segments
        .iter()
        .map(|seg| seg.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}
