//! Build script to generate sound manifests for WASM builds
//!
//! Scans assets/audio/ and assets/music/ and writes a manifest.txt into
//! each, listing the sound files found, since WASM can't enumerate
//! directories at runtime.

use std::fs;
use std::io::Write;
use std::path::Path;

const SOUND_DIRS: [&str; 2] = ["assets/audio", "assets/music"];
const EXTENSIONS: [&str; 2] = ["ogg", "wav"];

fn main() {
    for dir in SOUND_DIRS {
        println!("cargo:rerun-if-changed={}", dir);
        write_manifest(Path::new(dir));
    }
}

fn write_manifest(dir: &Path) {
    fs::create_dir_all(dir).unwrap();

    let mut sounds: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| {
                    let ext = ext.to_ascii_lowercase();
                    EXTENSIONS.iter().any(|wanted| ext == *wanted)
                })
                .unwrap_or(false)
        })
        .collect();

    sounds.sort_by_key(|e| e.file_name());

    let mut manifest = String::new();
    for entry in sounds {
        manifest.push_str(&format!("{}\n", entry.file_name().to_string_lossy()));
    }

    // Only touch the file when the listing changed, so rerun-if-changed
    // doesn't keep firing on our own write
    let manifest_path = dir.join("manifest.txt");
    if fs::read_to_string(&manifest_path).ok().as_deref() == Some(manifest.as_str()) {
        return;
    }
    let mut file = fs::File::create(manifest_path).unwrap();
    file.write_all(manifest.as_bytes()).unwrap();
}
