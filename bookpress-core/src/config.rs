//! Conversion options, resource limits and page styling

/// Default directory scanned for input packages
pub const DEFAULT_SOURCE_DIR: &str = "source_book";

/// Default directory receiving rendered documents
pub const DEFAULT_OUTPUT_DIR: &str = "output_book";

/// Per-file resource bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of images embedded per book
    pub max_images: usize,
    /// Images larger than this many bytes are left out
    pub max_image_bytes: usize,
    /// Maximum number of path variants tried per image reference
    pub max_candidates: usize,
    /// Image tags per fragment before falling back to blanket placeholders
    pub max_image_tags: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_images: 500,
            max_image_bytes: 5 * 1024 * 1024,
            max_candidates: 10,
            max_image_tags: 10_000,
        }
    }
}

/// Page configuration for the embedded style sheet
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// CSS page size (e.g., "A4", "letter", "148mm 210mm")
    pub size: String,
    /// Page and body margin
    pub margin: String,
    /// Body font stack, serif with fallbacks
    pub font_family: String,
    /// Base font size
    pub font_size: String,
    /// Body line height
    pub line_height: String,
    /// Print page numbers in the bottom margin
    pub page_numbers: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: "A4".to_string(),
            margin: "2cm".to_string(),
            font_family: r#""Noto Serif", "Noto Serif CJK SC", "SimSun", serif"#.to_string(),
            font_size: "12pt".to_string(),
            line_height: "1.6".to_string(),
            page_numbers: true,
        }
    }
}

/// Everything that tunes a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub limits: Limits,
    pub page: PageConfig,
    /// Convert even when the output is newer than the input
    pub force: bool,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set resource limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set page configuration
    pub fn with_page_config(mut self, page: PageConfig) -> Self {
        self.page = page;
        self
    }

    /// Ignore the up-to-date check
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
