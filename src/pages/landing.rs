//! Landing page listing the available tools

use crate::pages::layout::{Page, escape_html};

/// An entry on the landing page
pub struct AppCard {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub url: &'static str,
}

pub const APPS: &[AppCard] = &[
    AppCard {
        name: "Markdown Viewer",
        description: "Convert and preview Markdown files",
        icon: "fab fa-markdown",
        url: "/markdown-viewer",
    },
    AppCard {
        name: "Image Creator",
        description: "Create logos and advertisement flyers with AI",
        icon: "fas fa-image",
        url: "/image-creator",
    },
];

fn app_card(app: &AppCard) -> String {
    format!(
        r#"<div class="col-md-6 mb-4">
    <div class="card h-100 shadow-sm text-center app-card">
        <div class="card-body">
            <i class="{icon} fa-3x mb-3"></i>
            <h3 class="app-name">{name}</h3>
            <p class="app-description">{description}</p>
            <a href="{url}" class="btn btn-primary app-button">Open App <i class="fas fa-arrow-right ms-1"></i></a>
        </div>
    </div>
</div>"#,
        icon = escape_html(app.icon),
        name = escape_html(app.name),
        description = escape_html(app.description),
        url = escape_html(app.url),
    )
}

pub fn render() -> Page {
    let cards: String = APPS.iter().map(app_card).collect();
    let main = format!(
        r#"<section class="hero-section py-5 text-center">
    <div class="container">
        <h1 class="hero-title">Welcome to WOKMASGO</h1>
        <p class="hero-subtitle">Your all-in-one toolbox</p>
    </div>
</section>
<section class="apps-section">
    <div class="container">
        <h2 class="section-title text-center">Available Applications</h2>
        <p class="section-subtitle text-center">Choose an application to get started</p>
        <div class="row apps-grid">{cards}</div>
    </div>
</section>"#
    );

    Page::new("WOKMASGO - Home", main)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_app() {
        let page = render();
        assert_eq!(page.title, "WOKMASGO - Home");
        for app in APPS {
            assert!(page.main_content.contains(app.name));
            assert!(page.main_content.contains(&format!("href=\"{}\"", app.url)));
        }
    }
}
