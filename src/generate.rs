//! Free-text party plan generation.
//!
//! [`PlanGenerator`] guards the operator's input, wraps it in the plan
//! prompt and hands it to a [`TextGenerator`]. It always answers with a
//! string: collaborator failures are logged and replaced with a fixed
//! message.

use tracing::{error, info, warn};

use crate::error::PlannerError;
use crate::llm::TextGenerator;
use crate::prompt;

/// Longest accepted input, in characters, after trimming.
pub const MAX_INPUT_CHARS: usize = 1000;

pub const EMPTY_INPUT_MESSAGE: &str = "I'm sorry, but it seems you haven't provided any details. \
Could you please describe the party you'd like to plan?";

pub const INPUT_TOO_LONG_MESSAGE: &str =
    "Your input seems quite lengthy. Please simplify your request to make it more concise.";

pub const CLARIFY_MESSAGE: &str = "I'm sorry, but I didn't understand that. \
Could you please provide more specific details about your party?";

pub const GENERATION_FAILED_MESSAGE: &str =
    "An error occurred while generating the party plan. Please try again later.";

/// Reply marker that means the model could not produce a plan.
const UNKNOWN_MARKER: &str = "I don't know";

pub struct PlanGenerator {
    generator: Box<dyn TextGenerator>,
    template: Option<String>,
}

impl PlanGenerator {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self {
            generator,
            template: None,
        }
    }

    /// Use `template` (with a `{{DETAILS}}` placeholder) instead of the built-in prompt.
    pub fn with_template(mut self, template: Option<String>) -> Self {
        self.template = template;
        self
    }

    fn build_prompt(&self, details: &str) -> String {
        match &self.template {
            Some(t) => prompt::party_plan_prompt_from_template(t, details),
            None => prompt::party_plan_prompt(details),
        }
    }

    /// Produce a party plan for `raw` input, or one of the fixed messages.
    pub fn generate(&self, raw: &str) -> String {
        let details = raw.trim();
        if details.is_empty() {
            return EMPTY_INPUT_MESSAGE.to_owned();
        }
        if details.chars().count() > MAX_INPUT_CHARS {
            warn!(input_chars = details.chars().count(), "plan request too long");
            return INPUT_TOO_LONG_MESSAGE.to_owned();
        }

        match self.try_generate(details) {
            Ok(reply) if reply.contains(UNKNOWN_MARKER) => {
                warn!("text generator could not answer, asking for details");
                CLARIFY_MESSAGE.to_owned()
            }
            Ok(reply) => {
                info!("party plan generated");
                reply.trim().to_owned()
            }
            Err(e) => {
                error!(err = %e, "party plan generation failed");
                GENERATION_FAILED_MESSAGE.to_owned()
            }
        }
    }

    fn try_generate(&self, details: &str) -> Result<String, PlannerError> {
        let prompt = self.build_prompt(details);
        self.generator.complete(&prompt)
    }
}
