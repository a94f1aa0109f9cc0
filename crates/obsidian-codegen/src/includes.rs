//! Header paths that the generated artifact re-includes.

use std::collections::HashSet;

use log::trace;

/// Canonical separator used in every emitted `#include`.
const SEPARATOR: char = '/';

/// Turn every `\` into `/` and collapse separator runs into one.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut previous_was_separator = false;
    for ch in path.chars() {
        let is_separator = ch == '/' || ch == '\\';
        if is_separator {
            if !previous_was_separator {
                normalized.push(SEPARATOR);
            }
        } else {
            normalized.push(ch);
        }
        previous_was_separator = is_separator;
    }
    normalized
}

/// Normalises and deduplicates header paths, keeping first occurrences.
#[derive(Debug, Clone, Default)]
pub struct IncludeDeduplicator {
    /// Normalised roots without a trailing separator, longest first.
    roots: Vec<String>,
}

impl IncludeDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths under `root` are emitted relative to it.
    pub fn with_root(mut self, root: &str) -> Self {
        let root = normalize_path(root).trim_end_matches(SEPARATOR).to_string();
        if !root.is_empty() && !self.roots.contains(&root) {
            self.roots.push(root);
            self.roots.sort_by(|a, b| b.len().cmp(&a.len()));
        }
        self
    }

    pub fn with_roots<I, S>(self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roots
            .into_iter()
            .fold(self, |dedup, root| dedup.with_root(root.as_ref()))
    }

    fn relativize<'p>(&self, path: &'p str) -> &'p str {
        for root in &self.roots {
            if let Some(rest) = path
                .strip_prefix(root.as_str())
                .and_then(|rest| rest.strip_prefix(SEPARATOR))
            {
                return rest;
            }
        }
        path
    }

    /// Ordered unique normalised paths. Empty paths are dropped.
    pub fn normalize<I, S>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for path in paths {
            let normalized = normalize_path(path.as_ref());
            let relative = self.relativize(&normalized);
            if relative.is_empty() {
                continue;
            }
            if seen.insert(relative.to_string()) {
                unique.push(relative.to_string());
            } else {
                trace!("include `{relative}` already listed");
            }
        }
        unique
    }
}

/// One `#include "..."` line per path.
pub fn include_block(paths: &[String]) -> String {
    paths
        .iter()
        .map(|path| format!("#include \"{path}\""))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_variants_collapse() {
        let dedup = IncludeDeduplicator::new();
        assert_eq!(dedup.normalize(["a/b.h", "a\\b.h", "a//b.h"]), vec!["a/b.h"]);
    }

    #[test]
    fn test_first_occurrence_order_is_kept() {
        let dedup = IncludeDeduplicator::new();
        let paths = ["z.h", "a.h", "z.h", "m\\\\n.h", "a.h", "m/n.h"];
        assert_eq!(dedup.normalize(paths), vec!["z.h", "a.h", "m/n.h"]);
    }

    #[test]
    fn test_windows_paths() {
        assert_eq!(
            normalize_path("C:\\\\work\\include\\\\types.hpp"),
            "C:/work/include/types.hpp"
        );
    }

    #[test]
    fn test_roots_are_stripped() {
        let dedup = IncludeDeduplicator::new().with_roots(["/src", "/src/include/"]);
        let paths = ["/src/include/types.hpp", "/src/main.h", "/srcx/other.h", "\\src\\include\\types.hpp"];
        assert_eq!(
            dedup.normalize(paths),
            vec!["types.hpp", "main.h", "/srcx/other.h"]
        );
    }

    #[test]
    fn test_empty_paths_are_dropped() {
        let dedup = IncludeDeduplicator::new();
        assert_eq!(dedup.normalize(["", "a.h", ""]), vec!["a.h"]);
    }

    #[test]
    fn test_include_block() {
        let paths = vec!["a.h".to_string(), "b/c.h".to_string()];
        assert_eq!(include_block(&paths), "#include \"a.h\"\n#include \"b/c.h\"");
        assert_eq!(include_block(&[]), "");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn path_strategy() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            ("[a-z]{1,6}", prop::sample::select(vec!["/", "\\", "//", "\\\\", "/\\"])),
            1..5,
        )
        .prop_map(|parts| {
            parts
                .into_iter()
                .map(|(segment, separator)| format!("{segment}{separator}"))
                .collect::<String>()
                + "file.h"
        })
    }

    proptest! {
        #[test]
        fn normalized_path_has_no_backslash_or_double_slash(path in path_strategy()) {
            let normalized = normalize_path(&path);
            prop_assert!(!normalized.contains('\\'));
            prop_assert!(!normalized.contains("//"));
        }

        #[test]
        fn normalize_is_idempotent(path in path_strategy()) {
            let once = normalize_path(&path);
            prop_assert_eq!(normalize_path(&once), once.clone());
        }

        #[test]
        fn dedup_output_is_unique(paths in proptest::collection::vec(path_strategy(), 0..12)) {
            let unique = IncludeDeduplicator::new().normalize(&paths);
            let set: HashSet<_> = unique.iter().collect();
            prop_assert_eq!(set.len(), unique.len());
            prop_assert!(unique.len() <= paths.len());
        }
    }
}
