//! Shared page shell: head, navbar, footer

use chrono::{Datelike, Utc};

/// Fragments that make up one rendered page
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub title: String,
    pub main_content: String,
    pub additional_css: String,
    pub additional_js: String,
}

impl Page {
    pub fn new(title: impl Into<String>, main_content: String) -> Self {
        Self {
            title: title.into(),
            main_content,
            ..Self::default()
        }
    }

    /// Attach a script served from `/assets`
    pub fn with_script(mut self, asset: &str) -> Self {
        self.additional_js
            .push_str(&format!("<script src=\"/assets/{}\"></script>\n", escape_html(asset)));
        self
    }

    pub fn with_stylesheet(mut self, href: &str) -> Self {
        self.additional_css.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            escape_html(href)
        ));
        self
    }
}

/// Escape text for use in HTML bodies and double-quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const NAV_LINKS: &[(&str, &str, &str)] = &[
    ("/", "fas fa-home", "Home"),
    ("/markdown-viewer", "fab fa-markdown", "Markdown Viewer"),
    ("/image-creator", "fas fa-image", "Image Creator"),
];

fn navbar() -> String {
    let items: String = NAV_LINKS
        .iter()
        .map(|(href, icon, label)| {
            format!(
                "<li class=\"nav-item\"><a class=\"nav-link\" href=\"{href}\"><i class=\"{icon} me-1\"></i>{label}</a></li>"
            )
        })
        .collect();

    format!(
        r##"<nav class="navbar navbar-expand-lg navbar-dark bg-dark">
    <div class="container">
        <a class="navbar-brand fw-bold" href="/">WOKMASGO</a>
        <button class="navbar-toggler" type="button" data-bs-toggle="collapse" data-bs-target="#mainNav" aria-controls="mainNav" aria-expanded="false" aria-label="Toggle navigation">
            <span class="navbar-toggler-icon"></span>
        </button>
        <div class="collapse navbar-collapse" id="mainNav">
            <ul class="navbar-nav ms-auto">{items}</ul>
        </div>
    </div>
</nav>"##
    )
}

fn footer() -> String {
    format!(
        r#"<footer class="py-4 mt-5 border-top">
    <div class="container text-center text-muted">
        &copy; {} WOKMASGO. All rights reserved.
    </div>
</footer>"#,
        Utc::now().year()
    )
}

/// Compose the full HTML document for a page
pub fn render(page: &Page) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css">
{css}</head>
<body>
{nav}
<main>
{main}
</main>
{footer}
<script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js"></script>
{js}</body>
</html>
"#,
        title = escape_html(&page.title),
        css = page.additional_css,
        nav = navbar(),
        main = page.main_content,
        footer = footer(),
        js = page.additional_js,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_composes_fragments() {
        let page = Page::new("Tools <beta>", "<p>hello</p>".to_string())
            .with_script("image-creator.js")
            .with_stylesheet("https://cdn.example.com/x.css");
        let html = render(&page);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Tools &lt;beta&gt;</title>"));
        assert!(html.contains("<p>hello</p>"));
        assert!(html.contains(r#"<script src="/assets/image-creator.js"></script>"#));
        assert!(html.contains(r#"href="https://cdn.example.com/x.css""#));
        assert!(html.contains(r#"href="/markdown-viewer""#));
        assert!(html.contains(&Utc::now().year().to_string()));
    }
}
