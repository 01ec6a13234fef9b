//! Markdown to HTML renderer using pulldown-cmark

use pulldown_cmark::{html, Event, Options, Parser, Tag};

use super::PreviewTheme;

/// Convert markdown to a complete HTML document with styling
pub fn markdown_to_html(markdown: &str, theme: &PreviewTheme) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>{}</style>
</head>
<body>
<div id="content">{}</div>
</body>
</html>"#,
        generate_css(theme),
        markdown_to_fragment(markdown)
    )
}

/// Render markdown to an HTML fragment, tagging blocks with their source line
pub fn markdown_to_fragment(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(markdown, options);
    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, add_line_markers(parser, markdown));
    html_output
}

fn generate_css(theme: &PreviewTheme) -> String {
    format!(
        r#"
body {{
    font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif;
    font-size: 14px;
    line-height: 1.6;
    color: {text};
    background: {background};
    margin: 0;
    padding: 12px 16px;
}}
h1, h2, h3, h4, h5, h6 {{ color: {heading}; margin: 20px 0 12px; line-height: 1.25; }}
h1, h2 {{ border-bottom: 1px solid {border}; padding-bottom: 0.3em; }}
a {{ color: {link}; }}
code, pre {{ background: {code_background}; font-family: Consolas, Menlo, monospace; }}
code {{ padding: 0.1em 0.3em; border-radius: 3px; }}
pre {{ padding: 12px; border-radius: 4px; overflow-x: auto; }}
pre code {{ padding: 0; }}
blockquote {{ border-left: 3px solid {border}; margin: 0 0 12px; padding: 0 12px; color: {muted}; }}
table {{ border-collapse: collapse; margin-bottom: 12px; }}
th, td {{ border: 1px solid {border}; padding: 4px 10px; }}
del {{ color: {muted}; }}
img {{ max-width: 100%; }}
"#,
        text = theme.text,
        background = theme.background,
        heading = theme.heading,
        link = theme.link,
        code_background = theme.code_background,
        border = theme.border,
        muted = theme.muted,
    )
}

/// Put an empty `data-line` anchor before each block so hosts can sync scrolling
fn add_line_markers<'a>(parser: Parser<'a>, markdown: &'a str) -> impl Iterator<Item = Event<'a>> {
    let mut current_line = 1;
    let mut last_offset = 0;

    parser.into_offset_iter().flat_map(move |(event, range)| {
        if range.start >= last_offset {
            current_line += markdown[last_offset..range.start].matches('\n').count();
            last_offset = range.start;
        }

        let is_block = matches!(
            &event,
            Event::Start(
                Tag::Heading { .. }
                    | Tag::Paragraph
                    | Tag::BlockQuote(_)
                    | Tag::CodeBlock(_)
                    | Tag::List(_)
            )
        );
        if is_block {
            let marker = format!(r#"<span data-line="{}"></span>"#, current_line);
            vec![Event::Html(marker.into()), event]
        } else {
            vec![event]
        }
    })
}
