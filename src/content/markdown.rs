//! Markdown rendering for post bodies

use pulldown_cmark::{html, Options, Parser};

/// Render a markdown post body to HTML.
///
/// MDX component tags pass through as raw inline HTML; the admin editor
/// only produces plain markdown, so no JSX evaluation happens here.
pub fn render(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_GFM;
    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}
