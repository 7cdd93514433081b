//! Interactive entry of parameter lists.

use anyhow::Result;
use inquire::Text;
use paperfetch_core::PaperParams;

use super::split_values;

/// Asks for each list in turn. An empty answer keeps the current values.
pub fn prompt_params(params: &mut PaperParams) -> Result<()> {
    prompt_list("Exam code(s)", &mut params.codes)?;
    prompt_list("Season(s)", &mut params.seasons)?;
    prompt_list("Year(s)", &mut params.years)?;
    prompt_list("Paper type(s)", &mut params.paper_types)?;
    prompt_list("Component number(s)", &mut params.component_numbers)?;
    prompt_list("Time zone(s)", &mut params.time_zones)?;
    Ok(())
}

fn prompt_list(label: &str, values: &mut Vec<String>) -> Result<()> {
    let current = values.join(" ");
    let message = format!("{label}:");
    let answer = Text::new(&message)
        .with_default(&current)
        .with_help_message("separate multiple values with spaces")
        .prompt()?;
    let parsed = split_values(&[answer]);
    if !parsed.is_empty() {
        *values = parsed;
    }
    Ok(())
}
