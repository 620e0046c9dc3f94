//! Tab completion of command names.
//!
//! Completion never goes past the longest prefix shared by every candidate.
//! When there is nothing left to add, a second consecutive tab lists the
//! candidates instead.

use crate::registry::Registry;
use tracing::trace;

/// What a tab press should do to the line being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion<'a> {
    /// Leave the line alone.
    Nothing,
    /// Append this text to the buffer and echo it.
    Insert(String),
    /// Show these names below the line, then redraw the prompt and buffer.
    List(Vec<&'a str>),
}

/// Longest leading substring shared by `names`.
///
/// The scan is bounded by the shortest name and every name is compared against
/// `names[0]`, stopping at the first mismatch. An empty slice gives `""` and a
/// single name is returned unchanged.
pub fn longest_common_prefix<'a>(names: &[&'a str]) -> &'a str {
    let Some(&first) = names.first() else {
        return "";
    };
    if names.len() == 1 {
        return first;
    }

    let bound = names.iter().map(|name| name.len()).min().unwrap_or(0);
    let anchor = first.as_bytes();
    let mut len = 0;
    while len < bound && names.iter().all(|name| name.as_bytes()[len] == anchor[len]) {
        len += 1;
    }
    while !first.is_char_boundary(len) {
        len -= 1;
    }
    &first[..len]
}

/// Decide what a tab press does for the current `buffer`.
///
/// `tab_pending` is whether the previous key event was also a tab with no
/// printable key typed since.
pub fn suggest<'a>(buffer: &str, registry: &'a Registry, tab_pending: bool) -> Suggestion<'a> {
    let name = buffer.trim();
    if name.contains(' ') {
        return Suggestion::Nothing;
    }

    let candidates = registry.lookup_by_prefix(name);
    match candidates.as_slice() {
        [] => return Suggestion::Nothing,
        [only] if *only == name => return Suggestion::Nothing,
        _ => {}
    }

    let common = longest_common_prefix(&candidates);
    let Some(index) = common.find(name) else {
        return Suggestion::Nothing;
    };
    let suffix = &common[index + name.len()..];
    trace!(name, common, candidates = candidates.len(), "tab completion");

    if !suffix.is_empty() {
        let mut text = suffix.to_string();
        if candidates.len() == 1 && !buffer.ends_with(' ') {
            text.push(' ');
        }
        Suggestion::Insert(text)
    } else if tab_pending {
        Suggestion::List(candidates)
    } else {
        Suggestion::Nothing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;

    fn noop(_params: &str, _out: &mut dyn Write) -> Result<bool> {
        Ok(true)
    }

    fn registry_of(names: &[&str]) -> Registry {
        let mut registry = Registry::new();
        for name in names {
            assert!(registry.install(name, noop));
        }
        registry
    }

    #[test]
    fn test_common_prefix_of_nothing_and_one() {
        assert_eq!(longest_common_prefix(&[]), "");
        assert_eq!(longest_common_prefix(&["x"]), "x");
    }

    #[test]
    fn test_common_prefix_bounded_by_shortest() {
        assert_eq!(longest_common_prefix(&["getAll", "get"]), "get");
        assert_eq!(longest_common_prefix(&["get", "getAll"]), "get");
        assert_eq!(longest_common_prefix(&["status", "stop", "start"]), "st");
        assert_eq!(longest_common_prefix(&["clear", "help"]), "");
    }

    #[test]
    fn test_common_prefix_identical_names() {
        assert_eq!(longest_common_prefix(&["led", "led"]), "led");
    }

    #[test]
    fn test_common_prefix_stops_on_char_boundary() {
        // 'é' and 'è' share their first UTF-8 byte.
        assert_eq!(longest_common_prefix(&["café", "cafè"]), "caf");
    }

    #[test]
    fn test_ambiguous_candidates_extend_without_space() {
        let registry = registry_of(&["get", "getAll"]);
        assert_eq!(
            suggest("ge", &registry, false),
            Suggestion::Insert("t".to_string())
        );
    }

    #[test]
    fn test_single_candidate_extends_with_space() {
        let registry = registry_of(&["help"]);
        assert_eq!(
            suggest("he", &registry, false),
            Suggestion::Insert("lp ".to_string())
        );
    }

    #[test]
    fn test_exact_single_match_does_nothing() {
        let registry = registry_of(&["help"]);
        assert_eq!(suggest("help", &registry, true), Suggestion::Nothing);
    }

    #[test]
    fn test_no_candidates_or_multi_token_does_nothing() {
        let registry = registry_of(&["help"]);
        assert_eq!(suggest("x", &registry, true), Suggestion::Nothing);
        assert_eq!(suggest("help cl", &registry, true), Suggestion::Nothing);
    }

    #[test]
    fn test_list_only_on_repeated_tab() {
        let registry = registry_of(&["get", "getAll"]);
        assert_eq!(suggest("get", &registry, false), Suggestion::Nothing);
        assert_eq!(
            suggest("get", &registry, true),
            Suggestion::List(vec!["get", "getAll"])
        );
    }

    #[test]
    fn test_empty_buffer_lists_everything_on_repeated_tab() {
        let registry = registry_of(&["clear", "help"]);
        assert_eq!(suggest("", &registry, false), Suggestion::Nothing);
        assert_eq!(
            suggest("  ", &registry, true),
            Suggestion::List(vec!["clear", "help"])
        );
    }

    #[test]
    fn test_leading_spaces_are_ignored() {
        let registry = registry_of(&["reboot"]);
        assert_eq!(
            suggest("  re", &registry, false),
            Suggestion::Insert("boot ".to_string())
        );
    }
}
