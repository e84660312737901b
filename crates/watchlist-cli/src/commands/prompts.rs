use crate::output::Output;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_builder = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);

    if let Some(default_value) = default {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Masked prompt for a secret; re-asks until something non-empty is entered
pub fn prompt_secret(prompt: &str, output: &Output) -> Result<String> {
    loop {
        let input = Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to read {}: {}", prompt, e))?;

        let trimmed = input.trim();
        if trimmed.is_empty() {
            output.error(format!("{} cannot be empty", prompt));
            continue;
        }
        return Ok(trimmed.to_string());
    }
}

/// Prompt for yes/no with optional default and output handler
pub fn prompt_yes_no_with_output(prompt: &str, default: Option<bool>, output: Option<&Output>) -> Result<bool> {
    let mut confirm_builder = Confirm::new().with_prompt(prompt);

    if let Some(default_value) = default {
        confirm_builder = confirm_builder.default(default_value);
    }

    confirm_builder.interact().map_err(|e| {
        if let Some(out) = output {
            out.error(format!("Failed to read confirmation: {}", e));
        }
        color_eyre::eyre::eyre!("Failed to read confirmation: {}", e)
    })
}
