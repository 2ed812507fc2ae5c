//! Integration tests for the notion2md binary
//!
//! Every render runs with `--offline` on a saved document, so no test
//! talks to the network.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn notion2md() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_notion2md"));
    cmd.env_remove("NOTION_TOKEN").env_remove("RUST_LOG");
    cmd
}

/// Copy the fixture site (config and archetype) into a fresh directory
fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let source = fixtures_dir().join("site");
    fs::create_dir_all(dir.path().join("archetypes")).unwrap();
    for file in ["notion2md.toml", "archetypes/post.md"] {
        fs::copy(source.join(file), dir.path().join(file)).unwrap();
    }
    dir
}

fn run(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("Failed to run notion2md");
    assert!(
        output.status.success(),
        "notion2md failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn render_to(site: &Path, output: &Path, extra: &[&str]) -> String {
    let mut cmd = notion2md();
    cmd.arg("render")
        .arg("--input")
        .arg(fixtures_dir().join("hello-hugo.json"))
        .arg("-c")
        .arg(site.join("notion2md.toml"))
        .arg("-o")
        .arg(output)
        .arg("--offline")
        .args(extra);
    run(&mut cmd);
    fs::read_to_string(output).expect("Failed to read output file")
}

#[test]
fn test_render_saved_document() {
    let site = site();
    let output = render_to(site.path(), &site.path().join("out.md"), &[]);

    insta::assert_snapshot!(output, @r#"
    +++
    title = "Hello, Hugo!"
    description = "A first post"
    date = 2023-05-14T08:30:00.000Z
    categories = [ "notes" ]
    +++

    Welcome to the blog.

    {{< admonition warning >}}
    Drafts are not published
    {{< /admonition >}}

    - Write
    - Publish
    "#);
}

#[test]
fn test_no_shortcodes_flag_overrides_config() {
    let site = site();
    let output = render_to(
        site.path(),
        &site.path().join("out.md"),
        &["--no-shortcodes"],
    );

    assert!(!output.contains("admonition"));
    assert!(output.contains("Welcome to the blog.\n\n- Write\n- Publish\n"));
}

#[test]
fn test_default_output_path_uses_title_slug() {
    let site = site();
    let mut cmd = notion2md();
    cmd.arg("render")
        .arg("--input")
        .arg(fixtures_dir().join("hello-hugo.json"))
        .arg("-c")
        .arg(site.path().join("notion2md.toml"))
        .arg("--offline");
    let output = run(&mut cmd);

    let expected = site.path().join("content/posts/hello-hugo.md");
    assert!(expected.exists(), "missing {}", expected.display());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        expected.display().to_string()
    );
}

#[test]
fn test_quiet_prints_nothing() {
    let site = site();
    let mut cmd = notion2md();
    cmd.arg("render")
        .arg("--input")
        .arg(fixtures_dir().join("hello-hugo.json"))
        .arg("-c")
        .arg(site.path().join("notion2md.toml"))
        .arg("-o")
        .arg(site.path().join("out.md"))
        .arg("--offline")
        .arg("--quiet");
    let output = run(&mut cmd);

    assert!(output.stdout.is_empty());
    assert!(site.path().join("out.md").exists());
}

#[test]
fn test_missing_archetype_fails() {
    let site = site();
    fs::remove_file(site.path().join("archetypes/post.md")).unwrap();

    let output = notion2md()
        .arg("render")
        .arg("--input")
        .arg(fixtures_dir().join("hello-hugo.json"))
        .arg("-c")
        .arg(site.path().join("notion2md.toml"))
        .arg("-o")
        .arg(site.path().join("out.md"))
        .arg("--offline")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error parsing archetype file"));
    assert!(!site.path().join("out.md").exists());
}

#[test]
fn test_render_requires_page_or_input() {
    let output = notion2md().arg("render").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_fetch_requires_token() {
    let output = notion2md().args(["fetch", "some-page"]).output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("NOTION_TOKEN"));
}

#[test]
fn test_init_writes_sample_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notion2md.toml");

    run(notion2md().arg("init").arg("-o").arg(&path));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("#:schema ./notion2md.schema.json"));
    assert!(content.contains("[output]"));
    assert!(content.contains("[images]"));

    // Refuses to overwrite without --force
    let output = notion2md().arg("init").arg("-o").arg(&path).output().unwrap();
    assert!(!output.status.success());

    run(notion2md().arg("init").arg("-o").arg(&path).arg("--force"));
}

#[test]
fn test_init_schema_to_stdout() {
    let output = run(notion2md().args(["init", "--schema"]));
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["title"], "Config");
}
