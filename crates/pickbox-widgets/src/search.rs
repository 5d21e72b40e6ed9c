//! Substring filtering of option lists.

use crate::option::SelectOption;

/// Filter `options` by `query`.
///
/// An empty query returns every option. Otherwise an option is kept when its
/// value is non-empty and its [`display`](SelectOption::display) text
/// contains `query` (case-sensitive). Order is preserved.
#[must_use]
pub fn filter_options(options: &[SelectOption], query: &str) -> Vec<SelectOption> {
    if query.is_empty() {
        return options.to_vec();
    }
    options
        .iter()
        .filter(|opt| matches(opt, query))
        .cloned()
        .collect()
}

/// Whether a single option survives a non-empty query.
#[must_use]
pub fn matches(option: &SelectOption, query: &str) -> bool {
    !option.value.is_empty() && option.display().contains(query)
}
