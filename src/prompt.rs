//! The prompt sent to the text generator when asking for a party plan.
//!
//! The operator's free text is fenced with `---DETAILS---` so the model
//! can tell the request details apart from the instructions around them.

/// Delimiter fencing the operator's party details.
const DETAILS_DELIMITER: &str = "---DETAILS---";

/// Placeholder in custom template files; replaced by the party details.
pub const DETAILS_PLACEHOLDER: &str = "{{DETAILS}}";

const INSTRUCTIONS: &str = "You are a helpful assistant specializing in birthday party planning. \
Based on the party details below, provide a detailed party plan with exactly these sections:\n\n\
1. **Themes**: Suggest three distinct themes for the party.\n\
2. **Venue Suggestions**: Provide three suitable venue options for the suggested themes.\n\
3. **Activities**: List three engaging activities for guests that align with the themes.\n\n\
Use a clear heading for each section and keep the plan informative and organized. \
Do not repeat the details; just provide the plan.\n\n";

/// Build the plan-generation prompt around `details`.
pub fn party_plan_prompt(details: &str) -> String {
    format!(
        "{INSTRUCTIONS}\
         {DETAILS_DELIMITER}\n\
         {details}\n\
         {DETAILS_DELIMITER}"
    )
}

/// Build the prompt from a custom `template`, substituting every
/// [`DETAILS_PLACEHOLDER`] with `details`.
pub fn party_plan_prompt_from_template(template: &str, details: &str) -> String {
    template.replace(DETAILS_PLACEHOLDER, details)
}

/// The built-in template with the placeholder in place of the details,
/// as printed by `partyplan prompt`.
pub fn default_template() -> String {
    party_plan_prompt(DETAILS_PLACEHOLDER)
}
