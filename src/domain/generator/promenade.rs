use super::{characteristics, Generator};
use crate::domain::pattern::Pattern;

/// A gift picked up on a virtual walk, described along with a drawable graphic
#[derive(Debug, Clone, Default)]
pub struct PromenadeGenerator {
    model: Option<String>,
}

impl PromenadeGenerator {
    pub const NAMESPACE: &'static str = "promenade";

    pub const SYSTEM_ROLE: &'static str =
        "You are a game character with freedom to make decisions. You are on a walk through the nature.";

    /// Format the response must end with so clients can draw the gift
    pub const GRAPHIC_FORMAT: &'static str =
        r#"[{shape: "rectangle", color: "blue"}, {shape: "ellipse", color: "green"}, ...]"#;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Generator for PromenadeGenerator {
    fn namespace(&self) -> &str {
        Self::NAMESPACE
    }

    fn system_role(&self) -> &str {
        Self::SYSTEM_ROLE
    }

    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn build_prompt(&self, pattern: &Pattern) -> String {
        format!(
            "Context: In your virtual walk, what would you pick up and gift to the user as a gift \
             from the nature, as a gift from your venture?\n\
             \n\
             Figure out the user's emotion state from the following interaction pattern parameters.\n\
             \n\
             {characteristics}\n\
             \n\
             How would you describe the graphic element of this gift such that a computer program \
             can read your response for color and shape information and draw out an imagery? \
             Provide the construction of this graphic in the following format, at the very end of \
             your response: {format}\n\
             \n\
             IMPORTANT: Give your responses concisely with minimal narrations.",
            characteristics = characteristics(pattern),
            format = Self::GRAPHIC_FORMAT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_and_role() {
        let generator = PromenadeGenerator::new().with_model("claude-3-5-sonnet-20241022");
        assert_eq!(generator.namespace(), "promenade");
        assert!(generator.system_role().contains("walk through the nature"));
        assert_eq!(generator.model(), Some("claude-3-5-sonnet-20241022"));
    }

    #[test]
    fn test_prompt_requests_graphic_description() {
        let generator = PromenadeGenerator::new();
        let prompt = generator.build_prompt(&Pattern::new("promenade", "0.9", "0.1", "frantic"));

        assert!(prompt.contains("Recent Interaction Pattern: frantic"));
        assert!(prompt.contains("this pattern is 0.9"));
        assert!(prompt.contains("this pattern is 0.1"));
        assert!(prompt.contains(r#"{shape: "rectangle", color: "blue"}"#));
        assert!(prompt.ends_with("minimal narrations."));
    }
}
