//! ConditionTemplateCatalog - Named guard expression templates
//!
//! Templates help authoring transitions. They are plain text: resolving one
//! never parses, validates or escapes anything. Whether the resulting
//! expression makes sense is decided by the execution runtime.

/// Placeholder substituted by parametrized templates
pub const VALUE_PLACEHOLDER: &str = "{value}";

/// How a template turns user input into a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Fixed expression, input ignored
    Literal(&'static str),
    /// Expression with a single `{value}` placeholder
    Parametrized(&'static str),
    /// User text passed through unchanged
    Custom,
}

/// A named guard template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionTemplate {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: TemplateKind,
}

impl ConditionTemplate {
    pub fn needs_value(&self) -> bool {
        !matches!(self.kind, TemplateKind::Literal(_))
    }

    /// Raw template text (`""` for the custom pseudo-template)
    pub fn template(&self) -> &'static str {
        match self.kind {
            TemplateKind::Literal(text) | TemplateKind::Parametrized(text) => text,
            TemplateKind::Custom => "",
        }
    }

    /// Build a condition. `input` replaces the placeholder verbatim.
    pub fn resolve(&self, input: &str) -> String {
        match self.kind {
            TemplateKind::Literal(text) => text.to_string(),
            TemplateKind::Parametrized(text) => text.replacen(VALUE_PLACEHOLDER, input, 1),
            TemplateKind::Custom => input.to_string(),
        }
    }
}

static BUILTIN: [ConditionTemplate; 8] = [
    ConditionTemplate {
        key: "always_true",
        label: "Always True",
        kind: TemplateKind::Literal("True"),
    },
    ConditionTemplate {
        key: "else",
        label: "Else (fallback)",
        kind: TemplateKind::Literal("else"),
    },
    ConditionTemplate {
        key: "next_goal_equals",
        label: "Next Goal == value",
        kind: TemplateKind::Parametrized("{next_goal} == '{value}'"),
    },
    ConditionTemplate {
        key: "action_name_equals",
        label: "Action Name == value",
        kind: TemplateKind::Parametrized("action.name == '{value}'"),
    },
    ConditionTemplate {
        key: "current_location_equals",
        label: "Current Location == value",
        kind: TemplateKind::Parametrized("{current_location} == '{value}'"),
    },
    ConditionTemplate {
        key: "locations_to_visit_empty",
        label: "Locations to Visit Empty",
        kind: TemplateKind::Literal("{locations_to_be_visited} == []"),
    },
    ConditionTemplate {
        key: "past_locations_greater_than",
        label: "Past Locations > N",
        kind: TemplateKind::Parametrized("len({past_locations}) > {value}"),
    },
    ConditionTemplate {
        key: "custom",
        label: "Custom Condition",
        kind: TemplateKind::Custom,
    },
];

/// The fixed catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionTemplateCatalog;

impl ConditionTemplateCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn templates(&self) -> &'static [ConditionTemplate] {
        &BUILTIN
    }

    /// Look a template up by key or by label
    pub fn find(&self, name: &str) -> Option<&'static ConditionTemplate> {
        BUILTIN.iter().find(|t| t.key == name || t.label == name)
    }

    /// Resolve by name in one step
    pub fn resolve(&self, name: &str, input: &str) -> Option<String> {
        self.find(name).map(|t| t.resolve(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_ignores_input() {
        let catalog = ConditionTemplateCatalog::new();
        assert_eq!(catalog.resolve("always_true", "whatever").as_deref(), Some("True"));
        assert_eq!(catalog.resolve("Else (fallback)", "").as_deref(), Some("else"));
    }

    #[test]
    fn test_parametrized_substitutes_verbatim() {
        let catalog = ConditionTemplateCatalog::new();

        assert_eq!(
            catalog.resolve("next_goal_equals", "ground").as_deref(),
            Some("{next_goal} == 'ground'")
        );
        assert_eq!(
            catalog.resolve("past_locations_greater_than", "3").as_deref(),
            Some("len({past_locations}) > 3")
        );
        // No escaping: a broken expression is accepted as-is
        assert_eq!(
            catalog.resolve("action_name_equals", "it's").as_deref(),
            Some("action.name == 'it's'")
        );
    }

    #[test]
    fn test_custom_passes_text_through() {
        let catalog = ConditionTemplateCatalog::new();
        let custom = catalog.find("custom").unwrap();

        assert!(custom.needs_value());
        assert_eq!(custom.template(), "");
        assert_eq!(custom.resolve("{plan} != []"), "{plan} != []");
    }

    #[test]
    fn test_unknown_template() {
        assert!(ConditionTemplateCatalog::new().find("nope").is_none());
    }
}
