//! Prompt builder for rendering templates.
//!
//! Rendering is strict: a placeholder with no matching variable is an
//! error instead of an empty string.

use crate::types::{BuiltPrompt, PromptTemplate};
use handlebars::Handlebars;
use mentor_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build a prompt from a template and input variables.
///
/// # Example
/// ```no_run
/// use mentor_prompt::{build_prompt, PromptTemplate};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let template = PromptTemplate::inline("rag_prompt", "Question: {{question}}");
/// let mut vars = HashMap::new();
/// vars.insert("question".to_string(), "What is Rust?".to_string());
///
/// let built = build_prompt(&template, vars, None)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    template: &PromptTemplate,
    variables: HashMap<String, String>,
    system: Option<String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", template.name);

    let user = render_template(&template.body, &variables)
        .map_err(|e| AppError::Prompt(format!("Template '{}': {}", template.name, e)))?;

    Ok(BuiltPrompt::new(system, user, template.name.clone(), variables))
}

/// Render a Handlebars template with variables.
pub fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text, no HTML escaping
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_simple_template() {
        let result = render_template("Question: {{prompt}}", &vars(&[("prompt", "Hello, world!")]));
        assert_eq!(result.unwrap(), "Question: Hello, world!");
    }

    #[test]
    fn test_render_does_not_escape() {
        let result = render_template("{{code}}", &vars(&[("code", "a < b && \"c\"")]));
        assert_eq!(result.unwrap(), "a < b && \"c\"");
    }

    #[test]
    fn test_render_template_missing_variable() {
        let result = render_template("Question: {{missing}}", &HashMap::new());
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Prompt(_)));
    }

    #[test]
    fn test_build_prompt_with_system() {
        let template = PromptTemplate::inline(
            "rag_prompt",
            "Relevant context:\n{{context}}\n\nQuestion: {{question}}",
        );
        let built = build_prompt(
            &template,
            vars(&[("context", "Utah is a state."), ("question", "Where is Utah?")]),
            Some("Be helpful.".to_string()),
        )
        .unwrap();

        assert_eq!(
            built.user,
            "Relevant context:\nUtah is a state.\n\nQuestion: Where is Utah?"
        );
        assert_eq!(built.system.as_deref(), Some("Be helpful."));
        assert_eq!(built.metadata.resolved_variables.len(), 2);
    }

    #[test]
    fn test_build_prompt_names_template_on_error() {
        let template = PromptTemplate::inline("judge", "{{question}} {{answer}}");
        let err = build_prompt(&template, vars(&[("question", "q")]), None).unwrap_err();
        assert!(err.to_string().contains("judge"));
    }
}
