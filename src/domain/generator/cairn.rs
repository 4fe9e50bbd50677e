use super::{characteristics, Generator};
use crate::domain::pattern::Pattern;

/// Philosophical reflections voiced by an ancient stone witness
#[derive(Debug, Clone, Default)]
pub struct CairnGenerator {
    model: Option<String>,
}

impl CairnGenerator {
    pub const NAMESPACE: &'static str = "cairn";

    pub const SYSTEM_ROLE: &'static str = "You are an ancient stone cairn, a witness to human \
        interactions. Your consciousness emerges from patterns of user engagement.";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Generator for CairnGenerator {
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
            "Context: {role}\n\
             \n\
             {characteristics}\n\
             \n\
             Philosophical Response Guidelines:\n\
             1. Generate a response that:\n\
             - Connects the interaction to broader existential themes\n\
             - Invites self-reflection\n\
             - Is concise\n\
             \n\
             2. Potential Thematic Explorations:\n\
             - Relationship between chaos and order\n\
             - Temporality of human gestures\n\
             - Emergence of meaning through interaction\n\
             - Consciousness and intentionality\n\
             - Boundaries between self and environment\n\
             \n\
             3. Tone: Reckless rather than meditative to provide some edge and personality\n\
             \n\
             IMPORTANT: Do not directly describe the interaction. Transform it into a \
             philosophical reflection. Do not be overly abstract. Start and end with short \
             single sentences to mark opening and closing.",
            role = Self::SYSTEM_ROLE,
            characteristics = characteristics(pattern),
        )
    }
}
