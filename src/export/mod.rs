//! Secondary outputs: standalone HTML and shopping lists.

pub mod html;
pub mod shopping_list;

pub use html::{markdown_to_html, HtmlExporter};
pub use shopping_list::{categorize, extract_ingredients, generate_shopping_list, Category};

use std::path::{Path, PathBuf};

/// `<stem>.html` beside the markdown output.
pub fn html_path(markdown_output: &Path) -> PathBuf {
    markdown_output.with_extension("html")
}

/// `<stem>-shopping-list.md` in `output_dir`, or beside the input.
pub fn shopping_list_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recipe".to_string());
    let name = format!("{}-shopping-list.md", stem);
    match output_dir {
        Some(dir) => dir.join(name),
        None => input
            .parent()
            .map(|p| p.join(&name))
            .unwrap_or_else(|| PathBuf::from(&name)),
    }
}

/// First `# ` heading, used as the HTML document title.
pub fn recipe_title(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
}
