//! Prompt loader for `prompts/*.txt` files.
//!
//! System prompts are versioned by file name:
//! `system_prompt_<version>.txt`.

use crate::types::PromptTemplate;
use mentor_core::{AppError, AppResult};
use std::path::Path;

const SYSTEM_PROMPT_PREFIX: &str = "system_prompt_";

/// Load a versioned system prompt, trimmed.
///
/// # Example
/// ```no_run
/// use mentor_prompt::load_system_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let system = load_system_prompt(Path::new("prompts"), "v1")?;
/// println!("{}", system);
/// # Ok(())
/// # }
/// ```
pub fn load_system_prompt(prompts_dir: &Path, version: &str) -> AppResult<String> {
    let file_path = prompts_dir.join(format!("{}{}.txt", SYSTEM_PROMPT_PREFIX, version));

    tracing::debug!("Loading system prompt from: {:?}", file_path);

    if !file_path.is_file() {
        return Err(AppError::Prompt(format!(
            "Prompt version '{}' not found at {}",
            version,
            file_path.display()
        )));
    }

    let contents = std::fs::read_to_string(&file_path).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            file_path, e
        ))
    })?;

    Ok(contents.trim().to_string())
}

/// Load a named template (`<name>.txt`) from the prompts directory.
pub fn load_template(prompts_dir: &Path, name: &str) -> AppResult<PromptTemplate> {
    let file_path = prompts_dir.join(format!("{}.txt", name));

    tracing::debug!("Loading template from: {:?}", file_path);

    if !file_path.is_file() {
        return Err(AppError::Prompt(format!(
            "Template file not found: {:?}",
            file_path
        )));
    }

    let body = std::fs::read_to_string(&file_path).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read template file {:?}: {}",
            file_path, e
        ))
    })?;

    if body.trim().is_empty() {
        return Err(AppError::Prompt(format!(
            "Template cannot be empty: {:?}",
            file_path
        )));
    }

    tracing::info!("Loaded template: {}", name);

    Ok(PromptTemplate {
        name: name.to_string(),
        source: file_path,
        body,
    })
}

/// List all template names (file stems) in the prompts directory.
pub fn list_prompts(prompts_dir: &Path) -> AppResult<Vec<String>> {
    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();

    for entry in walkdir::WalkDir::new(prompts_dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("txt") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }

    Ok(names)
}

/// List the available system prompt versions, sorted.
pub fn list_system_prompt_versions(prompts_dir: &Path) -> AppResult<Vec<String>> {
    Ok(list_prompts(prompts_dir)?
        .into_iter()
        .filter_map(|name| name.strip_prefix(SYSTEM_PROMPT_PREFIX).map(str::to_string))
        .collect())
}
