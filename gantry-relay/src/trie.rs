//! Prefix trie over version strings
//!
//! Backs tool-version resolution: the trie is seeded once at startup from the
//! local tool inventory and is read-only afterwards, so concurrent queries
//! need no locking. Nodes are append-only and carry no terminal marker; a
//! query that was never inserted can still resolve when a unique single-child
//! chain leads to a leaf. That approximate matching is intentional (see
//! [`VersionTrie::best_match`]).

use std::collections::HashMap;

#[derive(Debug, Default)]
struct Node {
    children: HashMap<char, Node>,
}

/// Prefix tree keyed by codepoint, for matching version strings
#[derive(Debug, Default)]
pub struct VersionTrie {
    root: Node,
}

impl VersionTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trie from an iterator of version strings
    pub fn from_versions<I, S>(versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for version in versions {
            trie.insert(version.as_ref());
        }
        trie
    }

    /// Insert a string character by character, creating missing nodes.
    /// Re-inserting an existing string is a no-op.
    pub fn insert(&mut self, s: &str) {
        let mut node = &mut self.root;
        for ch in s.chars() {
            node = node.children.entry(ch).or_default();
        }
    }

    /// Walk `s` following existing children and return the consumed prefix,
    /// plus whether the entire input was consumed. The flag means "no
    /// mismatch encountered", not "s was previously inserted"; the empty
    /// string always yields `("", true)`.
    pub fn longest_prefix_match(&self, s: &str) -> (String, bool) {
        let mut matched = String::new();
        let mut node = &self.root;
        for ch in s.chars() {
            match node.children.get(&ch) {
                Some(next) => {
                    matched.push(ch);
                    node = next;
                }
                None => return (matched, false),
            }
        }
        (matched, true)
    }

    /// Find the most specific stored version compatible with `s`.
    ///
    /// If the whole input matches, it is returned with `resolved = true`.
    /// Otherwise, from the point of mismatch, the walk descends while the
    /// current node has exactly one child; reaching a leaf yields the
    /// completed string with `resolved = true` (a unique completion exists).
    /// Hitting a branch point with two or more children returns the
    /// pre-completion prefix with `resolved = false` — the trie never picks
    /// between sibling versions, since guessing could select an incompatible
    /// tool.
    pub fn best_match(&self, s: &str) -> (String, bool) {
        let mut matched = String::new();
        let mut node = &self.root;
        let mut mismatch = false;
        for ch in s.chars() {
            match node.children.get(&ch) {
                Some(next) => {
                    matched.push(ch);
                    node = next;
                }
                None => {
                    mismatch = true;
                    break;
                }
            }
        }

        if !mismatch {
            return (matched, true);
        }

        // Auto-complete only while the continuation is unambiguous.
        let mut remainder = String::new();
        while node.children.len() == 1 {
            let (ch, next) = node.children.iter().next().expect("len checked");
            remainder.push(*ch);
            node = next;
        }

        if node.children.is_empty() {
            matched.push_str(&remainder);
            return (matched, true);
        }

        (matched, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory_trie() -> VersionTrie {
        VersionTrie::from_versions(["1.5.8", "1.6.13", "1.7.12", "1.8.6", "1.9.1", "1.9.2"])
    }

    #[test]
    fn test_exact_match_for_inserted_strings() {
        let trie = inventory_trie();
        for version in ["1.5.8", "1.6.13", "1.7.12", "1.8.6", "1.9.1", "1.9.2"] {
            assert_eq!(trie.longest_prefix_match(version), (version.to_string(), true));
            assert_eq!(trie.best_match(version), (version.to_string(), true));
        }
    }

    #[test]
    fn test_longest_prefix_stops_at_first_mismatch() {
        let trie = inventory_trie();
        assert_eq!(trie.longest_prefix_match("1.8.5"), ("1.8.".to_string(), false));
        assert_eq!(trie.longest_prefix_match("1.9.3"), ("1.9.".to_string(), false));
        assert_eq!(trie.longest_prefix_match("2.0.0"), ("".to_string(), false));
    }

    #[test]
    fn test_best_match_auto_completes_unique_branch() {
        let trie = inventory_trie();
        // After "1.8." the only continuation is "6"
        assert_eq!(trie.best_match("1.8.5"), ("1.8.6".to_string(), true));
    }

    #[test]
    fn test_best_match_refuses_ambiguous_branch() {
        let trie = inventory_trie();
        // "1.9." continues with both "1" and "2": never guess
        assert_eq!(trie.best_match("1.9.3"), ("1.9.".to_string(), false));
    }

    #[test]
    fn test_best_match_unseen_leading_character() {
        let trie = inventory_trie();
        // '2' never matches; auto-completion from the root walks "1." and
        // then hits the five-way minor-version branch, so the result is the
        // unresolved pre-completion prefix (empty here)
        assert_eq!(trie.best_match("2.0.0-gke.0"), ("".to_string(), false));
    }

    #[test]
    fn test_best_match_resolves_uninserted_prefix_with_unique_completion() {
        // No terminal markers: "1.8" was never inserted, yet the unique
        // chain to the "1.8.6" leaf resolves it. Intended behavior.
        let trie = inventory_trie();
        assert_eq!(trie.best_match("1.8"), ("1.8".to_string(), true));
        assert_eq!(trie.best_match("1.8.99"), ("1.8.6".to_string(), true));
    }

    #[test]
    fn test_empty_input_is_exact() {
        let trie = inventory_trie();
        assert_eq!(trie.longest_prefix_match(""), ("".to_string(), true));
        assert_eq!(trie.best_match(""), ("".to_string(), true));
        // And on an empty trie too
        let empty = VersionTrie::new();
        assert_eq!(empty.longest_prefix_match(""), ("".to_string(), true));
        assert_eq!(empty.best_match(""), ("".to_string(), true));
    }

    #[test]
    fn test_queries_on_empty_trie_do_not_panic() {
        let trie = VersionTrie::new();
        assert_eq!(trie.longest_prefix_match("1.9.1"), ("".to_string(), false));
        // The root of an empty trie is a leaf, so the empty completion counts
        // as resolved; callers treat an empty match as unresolved
        assert_eq!(trie.best_match("1.9.1"), ("".to_string(), true));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut trie = VersionTrie::new();
        trie.insert("1.9.1");
        trie.insert("1.9.1");
        assert_eq!(trie.best_match("1.9"), ("1.9.1".to_string(), true));
    }

    #[test]
    fn test_non_ascii_codepoints() {
        let mut trie = VersionTrie::new();
        trie.insert("1.9-α2");
        assert_eq!(trie.best_match("1.9-α"), ("1.9-α2".to_string(), true));
        assert_eq!(trie.longest_prefix_match("1.9-β"), ("1.9-".to_string(), false));
    }

    #[test]
    fn test_query_longer_than_any_entry() {
        let trie = inventory_trie();
        let (matched, resolved) = trie.best_match("1.9.2.extra.suffix");
        // "1.9.2" consumes fully, then ".extra.suffix" mismatches at a leaf
        // (zero children), so the empty remainder completes it
        assert_eq!(matched, "1.9.2");
        assert!(resolved);
    }
}
