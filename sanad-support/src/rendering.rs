//! Text rendering utilities for human-friendly error messages.
//!
//! Formats resolution chains, derives short class names from Rust type
//! paths and ranks near-miss names for "did you mean?" hints.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use sanad_support::rendering::render_chain;
///
/// let chain = vec!["mailer", "Transport", "mailer"];
/// assert_eq!(render_chain(&chain), "mailer → Transport → mailer");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Strips module paths from a fully qualified Rust type name.
///
/// Used to give a Rust type a class name that reads like the one a user
/// would write in a binding file.
///
/// ```
/// use sanad_support::rendering::short_class_name;
///
/// assert_eq!(short_class_name("my_app::logging::FileLogger"), "FileLogger");
/// assert_eq!(
///     short_class_name("my_app::repo::Repository<my_app::model::User>"),
///     "Repository<User>"
/// );
/// ```
pub fn short_class_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut segment = String::new();
    let mut chars = full_name.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                result.push_str(&segment);
                result.push(ch);
                segment.clear();
            }
            _ => segment.push(ch),
        }
    }

    result.push_str(&segment);
    result
}

/// Levenshtein edit distance between two strings, compared by `char`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Ranks `available` names by how closely they match `requested`.
///
/// Substring matches (ignoring case) rank first, then names within a
/// third of the requested length in edit distance. At most
/// `max_suggestions` names are returned, best first.
///
/// ```
/// use sanad_support::rendering::suggest_similar;
///
/// let names = ["FileLogger", "Database", "Mailer"];
/// assert_eq!(suggest_similar("FileLoger", &names, 3), vec!["FileLogger"]);
/// ```
pub fn suggest_similar(
    requested: &str,
    available: &[impl AsRef<str>],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let threshold = (requested_lower.chars().count() / 3).max(1);

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| *name != requested)
        .filter_map(|name| {
            let name_lower = name.to_lowercase();

            if name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower) {
                return Some((name, 0));
            }

            let distance = edit_distance(&requested_lower, &name_lower);
            (distance <= threshold).then_some((name, distance))
        })
        .collect();

    scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    scored.dedup_by(|a, b| a.0 == b.0);
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_simple_chain() {
        let chain = vec!["A", "B", "C", "A"];
        assert_eq!(render_chain(&chain), "A → B → C → A");
    }

    #[test]
    fn render_empty_chain() {
        let chain: Vec<&str> = vec![];
        assert_eq!(render_chain(&chain), "");
    }

    #[test]
    fn shorten_simple_path() {
        assert_eq!(short_class_name("my_app::services::Mailer"), "Mailer");
    }

    #[test]
    fn shorten_with_generics_and_refs() {
        assert_eq!(
            short_class_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
            "Arc<dyn Logger>"
        );
        assert_eq!(short_class_name("&[core::option::Option<u8>]"), "&[Option<u8>]");
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(short_class_name("Database"), "Database");
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("Database", "Databse"), 1);
    }

    #[test]
    fn suggest_typo() {
        let available = ["UserService", "UserRepository", "Logger", "Database"];
        let suggestions = suggest_similar("UserServise", &available, 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("UserService"));
    }

    #[test]
    fn suggest_substring_ranks_first() {
        let available = ["logger.file", "loger", "db"];
        let suggestions = suggest_similar("logger", &available, 3);
        assert_eq!(suggestions, vec!["logger.file", "loger"]);
    }

    #[test]
    fn suggest_skips_exact_name() {
        let available = ["db"];
        assert!(suggest_similar("db", &available, 3).is_empty());
    }

    #[test]
    fn suggest_no_match() {
        let available = ["Database"];
        assert!(suggest_similar("XyzAbcDef", &available, 3).is_empty());
    }

    #[test]
    fn suggest_respects_limit() {
        let available = ["cache1", "cache2", "cache3"];
        assert_eq!(suggest_similar("cache", &available, 2).len(), 2);
    }
}
