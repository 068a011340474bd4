//! Build automation tasks for Plumber
//!
//! Usage:
//!   cargo xtask build-web [--dev]              # WASM build staged in dist/web
//!   cargo xtask package-itch                   # dist/web zipped for itch.io
//!   cargo xtask package-native [--platform P]  # release binary staged in dist/native/P
//!
//! Every target ships the same runtime assets: the config, the levels and
//! the sound files named in the manifests `build.rs` writes. Anything else
//! under assets/ stays behind.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// macroquad's JS loader, pinned to the crate version we build against
const MQ_JS_URL: &str = "https://raw.githubusercontent.com/not-fl3/macroquad/v0.4.14/js/mq_js_bundle.js";
const CONFIG_FILE: &str = "assets/config.ron";
const LEVEL_DIR: &str = "assets/levels";
const SOUND_DIRS: [&str; 2] = ["assets/audio", "assets/music"];

/// Page used when the project has no web/index.html of its own
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Plumber</title>
<style>
html, body, canvas { margin: 0; padding: 0; width: 100%; height: 100%; overflow: hidden; background: black; }
</style>
</head>
<body>
<canvas id="glcanvas" tabindex="1"></canvas>
<script src="mq_js_bundle.js"></script>
<script>load("plumber.wasm");</script>
</body>
</html>
"#;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for Plumber")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the WASM game into dist/web
    BuildWeb {
        /// Tag the page title with [DEV]
        #[arg(long)]
        dev: bool,
    },
    /// Zip dist/web for itch.io
    PackageItch,
    /// Build a native release into dist/native/<platform>
    PackageNative {
        /// Defaults to the host platform
        #[arg(long, value_enum)]
        platform: Option<Platform>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Platform {
    Windows,
    Macos,
    Linux,
}

impl Platform {
    fn host() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Macos
        } else {
            Platform::Linux
        }
    }

    fn dir_name(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Macos => "macos",
            Platform::Linux => "linux",
        }
    }

    fn binary_name(self) -> &'static str {
        match self {
            Platform::Windows => "plumber.exe",
            _ => "plumber",
        }
    }
}

fn main() -> Result<()> {
    let root = project_root();
    match Cli::parse().command {
        Task::BuildWeb { dev } => build_web(&root, dev).map(|_| ()),
        Task::PackageItch => package_itch(&root),
        Task::PackageNative { platform } => {
            package_native(&root, platform.unwrap_or_else(Platform::host))
        }
    }
}

fn project_root() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.parent().unwrap_or(manifest).to_path_buf()
}

fn run(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().with_context(|| format!("can't start {:?}", cmd.get_program()))?;
    if !status.success() {
        bail!("{:?} exited with {}", cmd.get_program(), status);
    }
    Ok(())
}

fn cargo_release(root: &Path, target: Option<&str>) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(root).args(["build", "--release", "-p", "plumber"]);
    if let Some(target) = target {
        cmd.args(["--target", target]);
    }
    run(&mut cmd)
}

/// Empty `dir`, creating it if needed.
fn fresh_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("can't clear {}", dir.display()))?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Sound files named by a manifest, skipping blank lines and `#` comments.
fn manifest_entries(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Copy `rel` from `root` to the same relative path under `dest`.
fn copy_rel(root: &Path, dest: &Path, rel: &Path) -> Result<()> {
    let to = dest.join(rel);
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(root.join(rel), &to).with_context(|| format!("can't copy {}", rel.display()))?;
    Ok(())
}

/// Copy the files the game reads at runtime into `dest`, returning how
/// many were staged. A manifest naming a missing sound is an error, so a
/// stale manifest can't ship.
fn stage_assets(root: &Path, dest: &Path) -> Result<usize> {
    let mut staged = 0;

    copy_rel(root, dest, Path::new(CONFIG_FILE))?;
    staged += 1;

    let levels = root.join(LEVEL_DIR);
    let entries =
        fs::read_dir(&levels).with_context(|| format!("can't read {}", levels.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "ron") {
            let rel = Path::new(LEVEL_DIR).join(path.file_name().unwrap_or_default());
            copy_rel(root, dest, &rel)?;
            staged += 1;
        }
    }

    for dir in SOUND_DIRS {
        let manifest = Path::new(dir).join("manifest.txt");
        // no manifest means the game runs silent
        let Ok(text) = fs::read_to_string(root.join(&manifest)) else { continue };
        for name in manifest_entries(&text) {
            let rel = Path::new(dir).join(name);
            if !root.join(&rel).is_file() {
                bail!("{} lists {}, which doesn't exist", manifest.display(), name);
            }
            copy_rel(root, dest, &rel)?;
            staged += 1;
        }
        copy_rel(root, dest, &manifest)?;
    }

    Ok(staged)
}

fn index_page(root: &Path, dev: bool) -> Result<String> {
    let custom = root.join("web/index.html");
    let page = if custom.exists() { fs::read_to_string(custom)? } else { INDEX_HTML.to_string() };
    Ok(if dev { page.replace("<title>", "<title>[DEV] ") } else { page })
}

/// Returns the staged web folder.
fn build_web(root: &Path, dev: bool) -> Result<PathBuf> {
    println!("Building WASM...");
    cargo_release(root, Some("wasm32-unknown-unknown"))?;

    let dist = root.join("dist/web");
    fresh_dir(&dist)?;
    fs::copy(
        root.join("target/wasm32-unknown-unknown/release/plumber.wasm"),
        dist.join("plumber.wasm"),
    )
    .context("wasm build produced no plumber.wasm")?;
    fs::write(dist.join("index.html"), index_page(root, dev)?)?;

    println!("Downloading {}...", MQ_JS_URL);
    let bundle = dist.join("mq_js_bundle.js");
    run(Command::new("curl").args(["-L", "-f", "-o"]).arg(bundle).arg(MQ_JS_URL))?;

    let staged = stage_assets(root, &dist)?;
    println!("Web build complete: {} ({} asset files)", dist.display(), staged);
    Ok(dist)
}

fn package_itch(root: &Path) -> Result<()> {
    let web = build_web(root, false)?;
    let zip = root.join("dist/plumber-itch.zip");
    if zip.exists() {
        fs::remove_file(&zip)?;
    }
    // itch.io wants index.html at the top of the archive
    run(Command::new("zip").current_dir(&web).arg("-r").arg(&zip).arg("."))?;
    println!("itch.io package ready: {}", zip.display());
    Ok(())
}

fn package_native(root: &Path, platform: Platform) -> Result<()> {
    println!("Building native release for {}...", platform.dir_name());
    cargo_release(root, None)?;

    let dist = root.join("dist/native").join(platform.dir_name());
    fresh_dir(&dist)?;
    let binary = platform.binary_name();
    fs::copy(root.join("target/release").join(binary), dist.join(binary))
        .with_context(|| format!("release build produced no {}", binary))?;

    let staged = stage_assets(root, &dist)?;
    println!("Native build complete: {} ({} asset files)", dist.display(), staged);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), CONFIG_FILE, "()");
        write(dir.path(), "assets/levels/world-1-1.ron", "()");
        write(dir.path(), "assets/levels/notes.txt", "scratch");
        write(dir.path(), "assets/audio/jump.ogg", "ogg");
        write(dir.path(), "assets/audio/unused.wav", "wav");
        write(dir.path(), "assets/audio/manifest.txt", "# cues\njump.ogg\n\n");
        dir
    }

    #[test]
    fn test_manifest_skips_comments_and_blanks() {
        let entries = manifest_entries("# header\n\n coin.wav \nbump.ogg\n");
        assert_eq!(entries, vec!["coin.wav", "bump.ogg"]);
    }

    #[test]
    fn test_stages_only_runtime_assets() {
        let project = project();
        let out = tempfile::tempdir().unwrap();

        let staged = stage_assets(project.path(), out.path()).unwrap();

        assert_eq!(staged, 3);
        assert!(out.path().join("assets/config.ron").is_file());
        assert!(out.path().join("assets/levels/world-1-1.ron").is_file());
        assert!(out.path().join("assets/audio/jump.ogg").is_file());
        assert!(out.path().join("assets/audio/manifest.txt").is_file());
        assert!(!out.path().join("assets/levels/notes.txt").exists());
        assert!(!out.path().join("assets/audio/unused.wav").exists());
        assert!(!out.path().join("assets/music").exists());
    }

    #[test]
    fn test_stale_manifest_is_an_error() {
        let project = project();
        write(project.path(), "assets/music/manifest.txt", "theme.ogg\n");
        let out = tempfile::tempdir().unwrap();

        let err = stage_assets(project.path(), out.path()).unwrap_err();
        assert!(err.to_string().contains("theme.ogg"));
    }

    #[test]
    fn test_dev_page_is_tagged() {
        let project = project();
        let page = index_page(project.path(), true).unwrap();
        assert!(page.contains("<title>[DEV] Plumber</title>"));
        assert!(page.contains("load(\"plumber.wasm\")"));
    }

    #[test]
    fn test_binary_name_per_platform() {
        assert_eq!(Platform::Windows.binary_name(), "plumber.exe");
        assert_eq!(Platform::Linux.binary_name(), "plumber");
    }
}
