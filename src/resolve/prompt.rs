//! Instruction document for the assisted resolver.

use crate::tools::ToolCatalog;

/// Substituted for tools that ship without a description.
pub const NO_DESCRIPTION: &str = "No description";

const REPLY_CONTRACT: &str = "\
You are an assistant that maps a user request onto exactly one tool call.
When the user asks something, return a JSON object with:
- \"tool\": the name of the tool to call
- \"args\": an object mapping parameter names to argument values
Only respond with the JSON object, nothing else.";

/// Render the catalog into instruction text.
///
/// Pure and ordered by discovery, so an unchanged catalog always yields the
/// same document.
pub fn build_instructions(catalog: &ToolCatalog) -> String {
    let mut lines = Vec::with_capacity(catalog.len() + 2);
    lines.push(REPLY_CONTRACT.to_string());
    lines.push("Available tools:".to_string());
    for tool in catalog.iter() {
        lines.push(tool.to_prompt_line(NO_DESCRIPTION));
    }
    lines.join("\n")
}
