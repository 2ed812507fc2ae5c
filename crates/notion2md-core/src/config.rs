//! Generation options

use std::path::PathBuf;

/// User-specified generation parameters
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Emit Hugo shortcodes for callouts and bookmarks
    pub use_shortcodes: bool,
    /// Directory where downloaded images are written
    pub images_folder: PathBuf,
    /// URL path under which `images_folder` is served
    pub images_link: String,
    /// Front matter template
    pub archetype_file: PathBuf,
    /// Page property holding the description (rich text)
    pub description_property: String,
    /// Page property holding tags (multi-select)
    pub tags_property: String,
    /// Page property holding categories (multi-select)
    pub categories_property: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            use_shortcodes: false,
            images_folder: PathBuf::from("static/images"),
            images_link: "/images".to_string(),
            archetype_file: PathBuf::from("archetypes/default.md"),
            description_property: "Description".to_string(),
            tags_property: "Tags".to_string(),
            categories_property: "Categories".to_string(),
        }
    }
}
