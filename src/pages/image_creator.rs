//! Image creator pages: type chooser, mode chooser and the generator forms

use crate::pages::layout::{Page, escape_html};
use std::fmt;
use std::str::FromStr;

/// What the user is producing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Logo,
    Flyer,
}

/// Whether the model starts from scratch or modifies uploaded images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Create,
    Edit,
}

impl ImageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Logo => "logo",
            ImageKind::Flyer => "flyer",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ImageKind::Logo => "Logo",
            ImageKind::Flyer => "Advertisement Flyer",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            ImageKind::Logo => "fas fa-trademark",
            ImageKind::Flyer => "fas fa-file-alt",
        }
    }

    /// Aspect ratio choices as `(value, label)`, default first
    pub fn aspect_ratios(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ImageKind::Logo => &[
                ("1:1", "Square (1:1) - 1024×1024 - Recommended"),
                ("2:3", "Portrait 2:3 - 832×1248"),
                ("3:2", "Landscape 3:2 - 1248×832"),
                ("3:4", "Portrait 3:4 - 864×1184"),
                ("4:3", "Landscape 4:3 - 1184×864"),
                ("4:5", "Portrait 4:5 - 896×1152"),
                ("5:4", "Landscape 5:4 - 1152×896"),
            ],
            ImageKind::Flyer => &[
                ("2:3", "Portrait 2:3 - 832×1248 - Recommended"),
                ("3:4", "Portrait 3:4 - 864×1184"),
                ("4:5", "Portrait 4:5 - 896×1152"),
                ("9:16", "Vertical 9:16 - 768×1344"),
                ("1:1", "Square (1:1) - 1024×1024"),
                ("3:2", "Landscape 3:2 - 1248×832"),
                ("4:3", "Landscape 4:3 - 1184×864"),
                ("16:9", "Widescreen 16:9 - 1344×768"),
            ],
        }
    }
}

impl GenerationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::Create => "create",
            GenerationMode::Edit => "edit",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logo" => Ok(ImageKind::Logo),
            "flyer" => Ok(ImageKind::Flyer),
            _ => Err(()),
        }
    }
}

impl FromStr for GenerationMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(GenerationMode::Create),
            "edit" => Ok(GenerationMode::Edit),
            _ => Err(()),
        }
    }
}

fn choice_card(href: &str, icon: &str, heading: &str, text: &str) -> String {
    format!(
        r#"<div class="col-md-6 mb-3">
    <a href="{href}" class="text-decoration-none">
        <div class="card h-100 image-type-card text-center p-4">
            <div class="type-icon"><i class="{icon} fa-3x mb-3"></i></div>
            <h4>{heading}</h4>
            <p>{text}</p>
        </div>
    </a>
</div>"#,
        href = escape_html(href),
        icon = escape_html(icon),
        heading = escape_html(heading),
        text = escape_html(text),
    )
}

fn section(icon: &str, title: &str, subtitle: &str, back: Option<(&str, &str)>, body: &str) -> String {
    let back_link = back
        .map(|(href, label)| {
            format!(
                r#"<div class="mb-4"><a href="{}" class="btn btn-outline-secondary"><i class="fas fa-arrow-left me-2"></i>{}</a></div>"#,
                escape_html(href),
                escape_html(label)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<section class="image-creator-section py-5">
    <div class="container">
        <div class="text-center mb-5">
            <h1 class="page-title"><i class="{icon} me-2"></i>{title}</h1>
            <p class="page-subtitle">{subtitle}</p>
        </div>
        {back_link}
        {body}
    </div>
</section>"#,
        icon = escape_html(icon),
        title = escape_html(title),
        subtitle = escape_html(subtitle),
    )
}

/// `/image-creator`: pick logo or flyer
pub fn render_index() -> Page {
    let cards = [ImageKind::Logo, ImageKind::Flyer]
        .iter()
        .map(|kind| {
            let text = match kind {
                ImageKind::Logo => "Create professional logos for your brand",
                ImageKind::Flyer => "Design eye-catching advertisement flyers",
            };
            choice_card(&format!("/image-creator/{kind}"), kind.icon(), kind.label(), text)
        })
        .collect::<String>();

    let body = format!(
        r#"<div class="card shadow-lg mb-4"><div class="card-body">
    <h3 class="card-title mb-4">Select Image Type</h3>
    <div class="row">{cards}</div>
</div></div>
<div class="card shadow-sm mt-4 bg-light"><div class="card-body">
    <h5 class="card-title">Tips for Better Results</h5>
    <ul class="mb-0">
        <li>Be specific about the style you want (modern, vintage, minimalist)</li>
        <li>Mention preferred colors and color schemes</li>
        <li>For logos: include your brand name and industry</li>
        <li>For flyers: describe the product, promotion and target audience</li>
        <li>Image editing: upload an image and describe what should change</li>
    </ul>
</div></div>"#
    );

    Page::new(
        "Image Creator - WOKMASGO",
        section(
            "fas fa-image",
            "Image Creator",
            "Create stunning logos and advertisement flyers with AI",
            Some(("/", "Back to Home")),
            &body,
        ),
    )
}

/// `/image-creator/{kind}`: pick create or edit
pub fn render_mode_chooser(kind: ImageKind) -> Page {
    let label = kind.label();
    let cards = format!(
        "{}{}",
        choice_card(
            &format!("/image-creator/{kind}/create"),
            "fas fa-plus-circle",
            &format!("Create New {label}"),
            "Generate a brand new design from scratch",
        ),
        choice_card(
            &format!("/image-creator/{kind}/edit"),
            "fas fa-edit",
            &format!("Edit Existing {label}"),
            "Modify an existing image",
        ),
    );
    let body = format!(
        r#"<div class="card shadow-lg mb-4"><div class="card-body">
    <h3 class="card-title mb-4">Select {label} Option</h3>
    <div class="row">{cards}</div>
</div></div>"#,
        label = escape_html(label),
    );

    Page::new(
        format!("{label} - Image Creator - WOKMASGO"),
        section(
            kind.icon(),
            &format!("{label} Creator"),
            "Create a new design or edit an existing one",
            Some(("/image-creator", "Back to Image Creator")),
            &body,
        ),
    )
}

fn upload_area(input_id: &str, preview_id: &str, label: &str, hint: &str, multiple: bool) -> String {
    format!(
        r#"<div class="mb-4">
    <label class="form-label fw-bold" for="{input_id}"><i class="fas fa-file-upload me-2"></i>{label}</label>
    <div class="form-text mb-2">{hint}</div>
    <div class="upload-area border rounded p-3">
        <input type="file" id="{input_id}" class="form-control" accept="image/*,.heic,.heif"{multiple}>
        <div class="image-previews d-flex flex-wrap gap-2 mt-3" id="{preview_id}"></div>
    </div>
</div>"#,
        input_id = escape_html(input_id),
        preview_id = escape_html(preview_id),
        label = escape_html(label),
        hint = escape_html(hint),
        multiple = if multiple { " multiple" } else { "" },
    )
}

fn uploads_for(kind: ImageKind, mode: GenerationMode) -> String {
    const LIMITS: &str = "JPG, PNG, GIF, WEBP, AVIF, HEIC (max 5MB each)";
    match (kind, mode) {
        (ImageKind::Logo, GenerationMode::Create) => String::new(),
        (ImageKind::Logo, GenerationMode::Edit) => upload_area(
            "baseImageInput",
            "baseImagePreviews",
            "Upload Logo to Edit *",
            LIMITS,
            false,
        ),
        (ImageKind::Flyer, GenerationMode::Edit) => upload_area(
            "baseImageInput",
            "baseImagePreviews",
            "Upload Images to Edit *",
            &format!("{LIMITS}. Click the star to choose the primary image; the others can be inserted into it."),
            true,
        ),
        (ImageKind::Flyer, GenerationMode::Create) => format!(
            "{}{}",
            upload_area(
                "templateInput",
                "templatePreview",
                "Template Image (optional)",
                LIMITS,
                false,
            ),
            upload_area(
                "productImagesInput",
                "productPreviews",
                "Product Images (optional)",
                LIMITS,
                true,
            ),
        ),
    }
}

fn aspect_ratio_select(kind: ImageKind) -> String {
    let options: String = kind
        .aspect_ratios()
        .iter()
        .enumerate()
        .map(|(i, (value, label))| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape_html(value),
                if i == 0 { " selected" } else { "" },
                escape_html(label)
            )
        })
        .collect();

    format!(
        r#"<div class="mb-4">
    <label for="aspectRatioSelect" class="form-label fw-bold"><i class="fas fa-expand-arrows-alt me-2"></i>Output Aspect Ratio</label>
    <select class="form-select" id="aspectRatioSelect">{options}</select>
</div>"#
    )
}

/// `/image-creator/{kind}/{mode}`: the generator form
///
/// Embeds a fresh anti-forgery token under `csrf_name` for the script to
/// echo back on submit.
pub fn render_generator(
    kind: ImageKind,
    mode: GenerationMode,
    csrf_name: &str,
    csrf_token: &str,
) -> Page {
    let label = kind.label();
    let (title, icon, prompt_label, button) = match mode {
        GenerationMode::Create => (
            format!("Create New {label}"),
            "fas fa-plus-circle",
            "Describe Your Design",
            "Generate",
        ),
        GenerationMode::Edit => (
            format!("Edit Existing {label}"),
            "fas fa-edit",
            "Describe Your Changes",
            "Apply Changes",
        ),
    };

    let body = format!(
        r#"<div class="card shadow-lg"><div class="card-body" id="generatorRoot" data-endpoint="/image-creator/generate" data-csrf-name="{csrf_name}">
    <input type="hidden" name="{csrf_name}" value="{csrf_token}">
    <input type="hidden" id="imageType" value="{kind}">
    <input type="hidden" id="imageMode" value="{mode}">
    {uploads}
    {ratios}
    <div class="mb-4">
        <label for="promptInput" class="form-label fw-bold"><i class="fas fa-pencil-alt me-2"></i>{prompt_label}</label>
        <textarea class="form-control" id="promptInput" rows="4" placeholder="Be specific about style, colors and content"></textarea>
    </div>
    <div class="text-center">
        <button type="button" class="btn btn-lg btn-primary" id="generateBtn"><i class="fas fa-magic me-2"></i>{button}</button>
    </div>
    <div class="text-center mt-4" id="loadingContainer" style="display: none;">
        <div class="spinner-border" role="status"></div>
        <p class="mt-2">Generating, this can take up to two minutes...</p>
    </div>
    <div class="mt-4 text-center" id="resultSection" style="display: none;">
        <img id="generatedImage" src="" alt="Generated {kind}" class="img-fluid rounded shadow">
        <div class="mt-3">
            <button type="button" class="btn btn-success" id="downloadBtn"><i class="fas fa-download me-2"></i>Download</button>
            <button type="button" class="btn btn-secondary" id="resetBtn"><i class="fas fa-redo me-2"></i>Create Another</button>
        </div>
    </div>
</div></div>"#,
        csrf_name = escape_html(csrf_name),
        csrf_token = escape_html(csrf_token),
        uploads = uploads_for(kind, mode),
        ratios = aspect_ratio_select(kind),
    );

    let back = format!("/image-creator/{kind}");
    Page::new(
        format!("{title} - Image Creator - WOKMASGO"),
        section(
            icon,
            &title,
            "Powered by an AI image model",
            Some((back.as_str(), "Back to Options")),
            &body,
        ),
    )
    .with_script("image-creator.js")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::ASPECT_RATIOS;

    #[test]
    fn test_parse_segments() {
        assert_eq!("logo".parse(), Ok(ImageKind::Logo));
        assert_eq!("flyer".parse(), Ok(ImageKind::Flyer));
        assert!("poster".parse::<ImageKind>().is_err());
        assert_eq!("edit".parse(), Ok(GenerationMode::Edit));
        assert!("Edit".parse::<GenerationMode>().is_err());
    }

    #[test]
    fn test_aspect_ratio_defaults() {
        assert_eq!(ImageKind::Logo.aspect_ratios()[0].0, "1:1");
        assert_eq!(ImageKind::Flyer.aspect_ratios()[0].0, "2:3");
        for kind in [ImageKind::Logo, ImageKind::Flyer] {
            for (value, _) in kind.aspect_ratios() {
                assert!(ASPECT_RATIOS.contains(value), "{value} not accepted upstream");
            }
        }
    }

    #[test]
    fn test_generator_embeds_token_and_mode() {
        let page = render_generator(
            ImageKind::Flyer,
            GenerationMode::Edit,
            "csrf_test_name",
            "abc123",
        );
        let html = &page.main_content;
        assert!(html.contains(r#"<input type="hidden" name="csrf_test_name" value="abc123">"#));
        assert!(html.contains(r#"id="imageType" value="flyer""#));
        assert!(html.contains(r#"id="imageMode" value="edit""#));
        assert!(html.contains(r#"id="baseImageInput""#));
        assert!(html.contains(r#"<option value="2:3" selected>"#));
        assert!(html.contains(r#"id="resetBtn""#));
        assert!(page.additional_js.contains("/assets/image-creator.js"));
    }

    #[test]
    fn test_uploads_match_kind_and_mode() {
        let logo_create = render_generator(ImageKind::Logo, GenerationMode::Create, "t", "v");
        assert!(!logo_create.main_content.contains("type=\"file\""));

        let logo_edit = render_generator(ImageKind::Logo, GenerationMode::Edit, "t", "v");
        assert!(logo_edit.main_content.contains("id=\"baseImageInput\""));
        assert!(!logo_edit.main_content.contains(" multiple"));

        let flyer_create = render_generator(ImageKind::Flyer, GenerationMode::Create, "t", "v");
        assert!(flyer_create.main_content.contains("id=\"templateInput\""));
        assert!(flyer_create.main_content.contains("id=\"productImagesInput\""));
    }

    #[test]
    fn test_mode_chooser_links() {
        let page = render_mode_chooser(ImageKind::Logo);
        assert!(page.main_content.contains("href=\"/image-creator/logo/create\""));
        assert!(page.main_content.contains("href=\"/image-creator/logo/edit\""));
    }

    #[test]
    fn test_index_links_both_kinds() {
        let page = render_index();
        assert_eq!(page.title, "Image Creator - WOKMASGO");
        assert!(page.main_content.contains("href=\"/image-creator/logo\""));
        assert!(page.main_content.contains("href=\"/image-creator/flyer\""));
    }
}
