//! Lazily-compiled static regex patterns.
//!
//! Every regex literal in the crate goes through [`static_regex!`] so that an
//! invalid pattern panics with the pattern text instead of a bare `.unwrap()`.

/// Declare a module-private function returning `&'static regex::Regex`,
/// compiled on first access and cached in a `std::sync::OnceLock`.
///
/// The calling module must have `use regex::Regex;` in scope.
///
/// # Example
///
/// ```ignore
/// use regex::Regex;
/// use crate::regex_util::static_regex;
///
/// static_regex!(fn canonical_rel, r"(?i)^canonical$");
///
/// assert!(canonical_rel().is_match("Canonical"));
/// ```
macro_rules! static_regex {
    (fn $fname:ident, $pattern:expr) => {
        fn $fname() -> &'static Regex {
            static STORE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
            STORE.get_or_init(|| {
                Regex::new($pattern).expect(concat!("BUG: invalid static regex: ", $pattern))
            })
        }
    };
}
pub(crate) use static_regex;
