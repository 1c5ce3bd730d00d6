//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to format resolution chains, type names,
//! constructor signatures and "did you mean?" suggestions.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use sanduq_support::rendering::render_chain;
///
/// let chain = vec!["UserService", "UserRepo", "Database", "UserService"];
/// let rendered = render_chain(&chain);
/// assert_eq!(rendered, "UserService → UserRepo → Database → UserService");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// One constructor parameter, as shown in a rendered signature.
#[derive(Debug, Clone, Copy)]
pub struct SignatureParameter<'a> {
    /// Parameter name
    pub name: &'a str,
    /// Declared type identifier, `None` for untyped parameters
    pub declared_type: Option<&'a str>,
    /// Whether a default value is available
    pub has_default: bool,
}

/// Renders a constructor signature on a single line.
///
/// ```
/// use sanduq_support::rendering::{render_signature, SignatureParameter};
///
/// let params = [
///     SignatureParameter { name: "repo", declared_type: Some("app::UserRepo"), has_default: false },
///     SignatureParameter { name: "retries", declared_type: None, has_default: true },
/// ];
/// assert_eq!(
///     render_signature("app::UserService", &params),
///     "UserService::new(repo: UserRepo, retries = default)"
/// );
/// ```
pub fn render_signature(type_name: &str, parameters: &[SignatureParameter<'_>]) -> String {
    let rendered: Vec<String> = parameters
        .iter()
        .map(|p| {
            let mut out = p.name.to_string();
            if let Some(declared) = p.declared_type {
                out.push_str(": ");
                out.push_str(&shorten_type_name(declared));
            }
            if p.has_default {
                out.push_str(" = default");
            }
            out
        })
        .collect();

    format!("{}::new({})", shorten_type_name(type_name), rendered.join(", "))
}

/// Shortens a fully qualified type name for display.
///
/// ```
/// use sanduq_support::rendering::shorten_type_name;
///
/// let short = shorten_type_name("my_app::services::user::UserService");
/// assert_eq!(short, "UserService");
///
/// let short = shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>");
/// assert_eq!(short, "Arc<dyn Logger>");
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut current_segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                current_segment.clear();
            }
            '<' | '>' | ',' | ' ' => {
                result.push_str(&current_segment);
                result.push(ch);
                current_segment.clear();
            }
            _ => {
                current_segment.push(ch);
            }
        }
    }

    result.push_str(&current_segment);
    result
}

/// Generates "did you mean?" suggestions from the known identifiers.
///
/// Exact substring matches rank first, then matches on the shortened
/// name, then identifiers sharing a prefix of at least three characters.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_lower.contains(&requested_lower)
                || requested_lower.contains(&name_lower)
            {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short)
                || requested_short.contains(&name_short)
            {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    // stable sort keeps caller order among equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1));
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
        assert_eq!(
            shorten_type_name("my_app::services::UserService"),
            "UserService"
        );
    }

    #[test]
    fn shorten_with_generics() {
        assert_eq!(
            shorten_type_name("alloc::sync::Arc<dyn my_app::traits::Logger>"),
            "Arc<dyn Logger>"
        );
    }

    #[test]
    fn shorten_no_path() {
        assert_eq!(shorten_type_name("Mailer"), "Mailer");
    }

    #[test]
    fn signature_without_parameters() {
        assert_eq!(render_signature("app::Clock", &[]), "Clock::new()");
    }

    #[test]
    fn signature_marks_untyped_and_defaults() {
        let params = [
            SignatureParameter { name: "clock", declared_type: Some("Clock"), has_default: false },
            SignatureParameter { name: "greeting", declared_type: None, has_default: false },
            SignatureParameter { name: "level", declared_type: Some("Level"), has_default: true },
        ];
        assert_eq!(
            render_signature("Greeter", &params),
            "Greeter::new(clock: Clock, greeting, level: Level = default)"
        );
    }

    #[test]
    fn suggest_similar_types() {
        let available = vec![
            "my_app::UserService",
            "my_app::UserRepository",
            "my_app::Logger",
            "my_app::Database",
        ];

        let suggestions = suggest_similar("UserServise", &available, 3);
        assert!(!suggestions.is_empty());
        assert!(suggestions[0].contains("UserService"));
    }

    #[test]
    fn suggest_skips_exact_request() {
        let available = vec!["Mailer", "MailerFactory"];
        let suggestions = suggest_similar("Mailer", &available, 3);
        assert_eq!(suggestions, vec!["MailerFactory".to_string()]);
    }

    #[test]
    fn suggest_no_match() {
        let available = vec!["my_app::Database"];
        let suggestions = suggest_similar("XyzAbcDef", &available, 3);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn suggest_respects_limit() {
        let available = vec!["UserA", "UserB", "UserC", "UserD"];
        assert_eq!(suggest_similar("User", &available, 2).len(), 2);
    }
}
