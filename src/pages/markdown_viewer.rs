//! Markdown previewer page
//!
//! Parsing and sanitizing happen in the browser; this only lays out the
//! editor, the preview pane and the toolbar.

use crate::pages::layout::Page;

const MARKDOWN_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/github-markdown-css/5.2.0/github-markdown.min.css";

const CONTENT: &str = r#"<section class="markdown-viewer-section py-5">
    <div class="container-fluid px-4">
        <div class="text-center mb-4">
            <h1 class="page-title"><i class="fab fa-markdown me-2"></i>Markdown Viewer</h1>
            <p class="page-subtitle">Write or upload Markdown and preview it live</p>
        </div>
        <div class="d-flex flex-wrap gap-2 mb-3">
            <label class="btn btn-outline-secondary mb-0" for="markdownFileInput">
                <i class="fas fa-upload me-1"></i>Upload .md
            </label>
            <input type="file" id="markdownFileInput" accept=".md,.markdown,.txt,text/markdown" class="d-none">
            <button type="button" class="btn btn-outline-secondary" id="copyHtmlBtn"><i class="fas fa-copy me-1"></i>Copy HTML</button>
            <button type="button" class="btn btn-outline-secondary" id="downloadHtmlBtn"><i class="fas fa-download me-1"></i>Download HTML</button>
            <button type="button" class="btn btn-outline-danger" id="clearBtn"><i class="fas fa-trash me-1"></i>Clear</button>
        </div>
        <div class="row g-3">
            <div class="col-lg-6">
                <textarea id="markdownInput" class="form-control font-monospace" rows="24" placeholder="Type Markdown here..."></textarea>
            </div>
            <div class="col-lg-6">
                <div id="markdownPreview" class="markdown-body border rounded p-3 h-100"></div>
            </div>
        </div>
    </div>
</section>"#;

pub fn render() -> Page {
    Page::new("Markdown Viewer - WOKMASGO", CONTENT.to_string())
        .with_stylesheet(MARKDOWN_CSS)
        .with_script("markdown-viewer.js")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_wires_script_and_editor() {
        let page = render();
        assert_eq!(page.title, "Markdown Viewer - WOKMASGO");
        assert!(page.main_content.contains("id=\"markdownInput\""));
        assert!(page.main_content.contains("id=\"markdownPreview\""));
        assert!(page.additional_js.contains("/assets/markdown-viewer.js"));
        assert!(page.additional_css.contains("github-markdown"));
    }
}
