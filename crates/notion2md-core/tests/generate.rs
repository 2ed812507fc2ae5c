//! End-to-end generation from a document dump and an archetype file

use std::path::PathBuf;

use notion_blocks::Document;
use notion2md_core::{
    Archetype, Collaborators, CollectDiagnostics, Error, ImageError, ImageStore, Notice, Offline,
    RenderConfig, generate, generate_with,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn document() -> Document {
    let json = std::fs::read_to_string(fixtures_dir().join("tuscan-kale.json")).unwrap();
    Document::from_json(&json).unwrap()
}

fn config(use_shortcodes: bool) -> RenderConfig {
    RenderConfig {
        use_shortcodes,
        archetype_file: fixtures_dir().join("archetype.md"),
        ..Default::default()
    }
}

fn generate_offline(config: &RenderConfig) -> (String, Vec<Notice>) {
    let mut images = Offline;
    let mut scraper = Offline;
    let mut diagnostics = CollectDiagnostics::default();
    let mut collaborators = Collaborators::new(&mut images, &mut scraper, &mut diagnostics);

    let mut output = Vec::new();
    generate(&mut output, &document(), config, &mut collaborators).unwrap();
    (String::from_utf8(output).unwrap(), diagnostics.notices)
}

#[test]
fn test_generate_with_shortcodes() {
    let (output, notices) = generate_offline(&config(true));

    insta::assert_snapshot!(output, @r#"
    ---
    title: "Tuscan kale"
    description: "A dark green leafy vegetable"
    date: 2022-03-01T19:05:00.000Z
    lastmod: 2022-07-06T20:25:00.000Z
    banner: "https://example.com/cover.jpg"
    slug: tuscan-kale
    tags:
      - food
      - green
    ---

    ## Why kale

    Kale is **tasty** and [healthy](https://example.com/health)

    > Eat your greens

    1. Wash
    1. Chop

    {{< admonition tip >}}
    Use fresh leaves
    Older leaves are bitter
    {{< /admonition >}}

    {{< bookmark url="https://example.com/recipes" title="" img="" >}}{{< /bookmark >}}
    ![Kale](https://example.com/kale.png)

    ```rust
    let kale = 1;
    ```

    <!-- more -->

    Happy cooking
    "#);

    assert_eq!(
        notices,
        vec![Notice::UnhandledBlock {
            kind: "table_of_contents".to_string()
        }]
    );
}

#[test]
fn test_generate_without_shortcodes() {
    let (output, _) = generate_offline(&config(false));

    assert!(!output.contains("admonition"));
    assert!(!output.contains("Use fresh leaves"));
    assert!(output.contains("1. Chop\n\n[https://example.com/recipes](https://example.com/recipes)\n"));
}

/// Image store that must never be reached
struct Unreachable;

impl ImageStore for Unreachable {
    fn store(&mut self, url: &str) -> Result<String, ImageError> {
        panic!("unexpected image download: {url}");
    }
}

#[test]
fn test_missing_archetype_fails_before_rendering() {
    let mut images = Unreachable;
    let mut scraper = Offline;
    let mut diagnostics = CollectDiagnostics::default();
    let mut collaborators = Collaborators::new(&mut images, &mut scraper, &mut diagnostics);

    let config = RenderConfig {
        archetype_file: fixtures_dir().join("does-not-exist.md"),
        ..Default::default()
    };
    let mut output = Vec::new();
    let err = generate(&mut output, &document(), &config, &mut collaborators).unwrap_err();

    assert!(matches!(err, Error::Template(_)));
    assert!(output.is_empty());
}

#[test]
fn test_generate_with_parsed_archetype() {
    let archetype = Archetype::parse("inline.md", "# [[title]]\n[[content]]").unwrap();
    let document = Document::new(document().page, Vec::new());

    let mut images = Offline;
    let mut scraper = Offline;
    let mut diagnostics = CollectDiagnostics::default();
    let mut collaborators = Collaborators::new(&mut images, &mut scraper, &mut diagnostics);

    let mut output = Vec::new();
    generate_with(
        &archetype,
        &mut output,
        &document,
        &RenderConfig::default(),
        &mut collaborators,
    )
    .unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), "# Tuscan kale\n");
}
