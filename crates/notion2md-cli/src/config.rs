//! Configuration file support for notion2md CLI
//!
//! Loads settings from a `notion2md.toml` file at the site root.

use anyhow::{Context, Result};
use notion2md_core::RenderConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "notion2md.toml";

/// Schema file referenced by generated configuration files
pub const SCHEMA_FILE_NAME: &str = "notion2md.schema.json";

/// Default folder for generated content files
pub const DEFAULT_CONTENT_FOLDER: &str = "content/posts";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Output configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
    /// Image download configuration
    #[serde(skip_serializing_if = "ImagesConfig::is_empty")]
    pub images: ImagesConfig,
    /// Names of the page properties used for front matter
    #[serde(skip_serializing_if = "PropertiesConfig::is_empty")]
    pub properties: PropertiesConfig,
}

/// Output configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Front matter template with [[ ]] placeholders (default: "archetypes/default.md")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archetype_file: Option<PathBuf>,
    /// Folder where content files are written when no output is given (default: "content/posts")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_folder: Option<PathBuf>,
    /// Render callouts and bookmarks as Hugo shortcodes (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_shortcodes: Option<bool>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.archetype_file.is_none()
            && self.content_folder.is_none()
            && self.use_shortcodes.is_none()
    }
}

/// Image download configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct ImagesConfig {
    /// Folder where downloaded images are stored (default: "static/images")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
    /// URL path under which the site serves the image folder (default: "/images")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ImagesConfig {
    fn is_empty(&self) -> bool {
        self.folder.is_none() && self.link.is_none()
    }
}

/// Page property names
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct PropertiesConfig {
    /// Rich text property holding the description (default: "Description")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Multi-select property holding the tags (default: "Tags")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Multi-select property holding the categories (default: "Categories")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
}

impl PropertiesConfig {
    fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_none() && self.categories.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `notion2md.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generation options with defaults applied
    ///
    /// Relative paths are resolved against `base_dir`, the directory of the
    /// configuration file.
    pub fn render_config(&self, base_dir: &Path) -> RenderConfig {
        let defaults = RenderConfig::default();
        RenderConfig {
            use_shortcodes: self.output.use_shortcodes.unwrap_or(defaults.use_shortcodes),
            images_folder: resolve(
                base_dir,
                self.images.folder.as_deref().unwrap_or(&defaults.images_folder),
            ),
            images_link: self.images.link.clone().unwrap_or(defaults.images_link),
            archetype_file: resolve(
                base_dir,
                self.output
                    .archetype_file
                    .as_deref()
                    .unwrap_or(&defaults.archetype_file),
            ),
            description_property: self
                .properties
                .description
                .clone()
                .unwrap_or(defaults.description_property),
            tags_property: self.properties.tags.clone().unwrap_or(defaults.tags_property),
            categories_property: self
                .properties
                .categories
                .clone()
                .unwrap_or(defaults.categories_property),
        }
    }

    /// Folder for content files, resolved against `base_dir`
    pub fn content_folder(&self, base_dir: &Path) -> PathBuf {
        resolve(
            base_dir,
            self.output
                .content_folder
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_CONTENT_FOLDER)),
        )
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema ./{}\n\n{}", SCHEMA_FILE_NAME, toml_content))
    }

    /// Create a sample configuration with common defaults for init command
    pub fn sample() -> Self {
        Config {
            output: OutputConfig {
                archetype_file: Some(PathBuf::from("archetypes/default.md")),
                content_folder: Some(PathBuf::from(DEFAULT_CONTENT_FOLDER)),
                use_shortcodes: Some(true),
            },
            images: ImagesConfig {
                folder: Some(PathBuf::from("static/images")),
                link: Some("/images".to_string()),
            },
            properties: PropertiesConfig {
                description: Some("Description".to_string()),
                tags: Some("Tags".to_string()),
                categories: Some("Categories".to_string()),
            },
        }
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.output.archetype_file.is_none());
        assert!(config.images.link.is_none());
    }

    #[test]
    fn test_parse_output_section() {
        let config: Config = toml::from_str(
            r#"
            [output]
            archetype_file = "archetypes/post.md"
            content_folder = "content/blog"
            use_shortcodes = true
            "#,
        )
        .unwrap();

        assert_eq!(
            config.output.archetype_file,
            Some(PathBuf::from("archetypes/post.md"))
        );
        assert_eq!(
            config.output.content_folder,
            Some(PathBuf::from("content/blog"))
        );
        assert_eq!(config.output.use_shortcodes, Some(true));
    }

    #[test]
    fn test_parse_images_and_properties() {
        let config: Config = toml::from_str(
            r#"
            [images]
            folder = "static/img"
            link = "/img"

            [properties]
            description = "Summary"
            tags = "Keywords"
            "#,
        )
        .unwrap();

        assert_eq!(config.images.folder, Some(PathBuf::from("static/img")));
        assert_eq!(config.images.link, Some("/img".to_string()));
        assert_eq!(config.properties.description, Some("Summary".to_string()));
        assert_eq!(config.properties.tags, Some("Keywords".to_string()));
        assert!(config.properties.categories.is_none());
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let config: Config = toml::from_str(
            r#"
            [output]
            use_shortcodes = false
            theme = "paper"
            "#,
        )
        .unwrap();
        assert_eq!(config.output.use_shortcodes, Some(false));
    }

    #[test]
    fn test_render_config_defaults() {
        let render = Config::default().render_config(Path::new(""));
        assert!(!render.use_shortcodes);
        assert_eq!(render.images_folder, PathBuf::from("static/images"));
        assert_eq!(render.images_link, "/images");
        assert_eq!(render.archetype_file, PathBuf::from("archetypes/default.md"));
        assert_eq!(render.description_property, "Description");
        assert_eq!(render.tags_property, "Tags");
        assert_eq!(render.categories_property, "Categories");
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let config: Config = toml::from_str(
            r#"
            [output]
            archetype_file = "archetypes/post.md"

            [images]
            folder = "/var/www/images"
            "#,
        )
        .unwrap();

        let render = config.render_config(Path::new("/site"));
        assert_eq!(render.archetype_file, PathBuf::from("/site/archetypes/post.md"));
        assert_eq!(render.images_folder, PathBuf::from("/var/www/images"));
        assert_eq!(
            config.content_folder(Path::new("/site")),
            PathBuf::from("/site/content/posts")
        );
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[images]\nlink = \"/media\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.images.link, Some("/media".to_string()));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[output\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_serialize_empty_config() {
        let config = Config::default();
        let toml = config.to_toml_with_schema().unwrap();
        assert!(toml.starts_with("#:schema"));
        // Empty config should have minimal content
        assert!(!toml.contains("[output]"));
    }

    #[test]
    fn test_serialize_sample_config() {
        let config = Config::sample();
        let toml = config.to_toml_with_schema().unwrap();
        assert!(toml.starts_with("#:schema ./notion2md.schema.json"));
        assert!(toml.contains("[output]"));
        assert!(toml.contains("use_shortcodes = true"));
        assert!(toml.contains("link = \"/images\""));
    }

    #[test]
    fn test_json_schema_generation() {
        let schema = Config::json_schema_string().unwrap();
        assert!(schema.contains("\"title\""));
        assert!(schema.contains("OutputConfig"));
        assert!(schema.contains("archetype_file"));
    }

    #[test]
    fn test_roundtrip() {
        let config = Config::sample();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.output.archetype_file, parsed.output.archetype_file);
        assert_eq!(config.images.link, parsed.images.link);
    }
}
