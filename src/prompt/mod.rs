//! Keyword-driven prompt interpreter
//!
//! Two declarative tables decide the output:
//!
//! - [`BASE_TEMPLATES`] is an ordered priority list. The first keyword found
//!   in the prompt picks the only base template; with no match the
//!   [`templates::fallback`] shape is used.
//! - [`OVERLAYS`] are additive. Every overlay whose keyword appears is
//!   appended after the base, whatever base was chosen.
//!
//! Matching is a case-insensitive substring test, so `"sunset"` selects the
//! sun. The interpreter is pure and never returns an empty sequence.

pub mod templates;

use tracing::debug;

use crate::command::Command;

/// Exclusive base shape, selected by keyword
#[derive(Debug, Clone, Copy)]
pub struct BaseTemplate {
    pub keyword: &'static str,
    pub build: fn() -> Vec<Command>,
}

/// Additive shape, appended when its keyword appears
#[derive(Debug, Clone, Copy)]
pub struct Overlay {
    pub keyword: &'static str,
    pub build: fn() -> Vec<Command>,
}

/// Base templates in priority order
pub const BASE_TEMPLATES: &[BaseTemplate] = &[
    BaseTemplate { keyword: "house", build: templates::house },
    BaseTemplate { keyword: "sun", build: templates::sun },
    BaseTemplate { keyword: "tree", build: templates::tree },
    BaseTemplate { keyword: "boat", build: templates::boat },
    BaseTemplate { keyword: "flower", build: templates::flower },
    BaseTemplate { keyword: "heart", build: templates::heart },
    BaseTemplate { keyword: "star", build: templates::star },
];

pub const OVERLAYS: &[Overlay] = &[Overlay {
    keyword: "rainbow",
    build: templates::rainbow,
}];

/// Base template the prompt selects, if any keyword matches
pub fn select_base(prompt: &str) -> Option<&'static BaseTemplate> {
    let lower = prompt.to_lowercase();
    BASE_TEMPLATES.iter().find(|t| lower.contains(t.keyword))
}

/// Overlays the prompt enables, in table order
pub fn select_overlays(prompt: &str) -> Vec<&'static Overlay> {
    let lower = prompt.to_lowercase();
    OVERLAYS.iter().filter(|o| lower.contains(o.keyword)).collect()
}

/// Translate free text into a drawing.
pub fn interpret(prompt: &str) -> Vec<Command> {
    let base = select_base(prompt);
    let mut commands = match base {
        Some(template) => (template.build)(),
        None => templates::fallback(),
    };

    let overlays = select_overlays(prompt);
    for overlay in &overlays {
        commands.extend((overlay.build)());
    }

    debug!(
        base = base.map_or("fallback", |t| t.keyword),
        overlays = overlays.len(),
        commands = commands.len(),
        "Interpreted prompt"
    );
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_first_match_wins() {
        // "house" outranks "sun" regardless of position in the prompt
        assert_eq!(select_base("a sun over a house").map(|t| t.keyword), Some("house"));
        assert_eq!(interpret("a sun over a house"), templates::house());
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(interpret("DRAW A SUN"), templates::sun());
    }

    #[test]
    fn test_fallback_never_empty() {
        assert_eq!(interpret("asdkjh"), templates::fallback());
        assert!(!interpret("").is_empty());
    }

    #[test]
    fn test_overlay_on_fallback() {
        let commands = interpret("just a rainbow");
        let mut expected = templates::fallback();
        expected.extend(templates::rainbow());
        assert_eq!(commands, expected);
    }

    #[test]
    fn test_keyword_tables_are_disjoint() {
        for overlay in OVERLAYS {
            assert!(BASE_TEMPLATES.iter().all(|b| b.keyword != overlay.keyword));
        }
    }
}
