//! Sound playback
//!
//! Cues and music are plain files under `assets/audio` and `assets/music`,
//! listed in a `manifest.txt` next to them (written by `build.rs`, since
//! WASM can't enumerate directories). A cue without a file is logged once
//! at load time and then silently skipped.

use std::collections::HashMap;
use macroquad::audio::{load_sound, play_sound, play_sound_once, stop_sound, PlaySoundParams, Sound};
use macroquad::prelude::load_string;
use crate::game::{SoundEvent, Sfx};

pub const AUDIO_DIR: &str = "assets/audio";
pub const MUSIC_DIR: &str = "assets/music";
pub const MUSIC_STEM: &str = "overworld";
const MUSIC_VOLUME: f32 = 0.6;
/// Formats macroquad can decode, in order of preference
const EXTENSIONS: [&str; 2] = ["ogg", "wav"];

/// File names listed in a manifest, ignoring blanks and comments.
pub fn parse_manifest(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Pick the file for `stem` out of a manifest listing.
pub fn file_for<'a>(stem: &str, files: &'a [String]) -> Option<&'a str> {
    EXTENSIONS.iter().find_map(|ext| {
        let wanted = format!("{}.{}", stem, ext);
        files.iter().find(|f| **f == wanted).map(String::as_str)
    })
}

/// Read `<dir>/manifest.txt`. A missing manifest just means no files.
pub async fn load_manifest(dir: &str) -> Vec<String> {
    match load_string(&format!("{}/manifest.txt", dir)).await {
        Ok(text) => parse_manifest(&text),
        Err(e) => {
            log::warn!("No audio manifest in {}: {}", dir, e);
            Vec::new()
        }
    }
}

async fn load_file(dir: &str, stem: &str, files: &[String]) -> Option<Sound> {
    let Some(file) = file_for(stem, files) else {
        log::warn!("Missing sound {}/{}", dir, stem);
        return None;
    };
    let path = format!("{}/{}", dir, file);
    match load_sound(&path).await {
        Ok(sound) => Some(sound),
        Err(e) => {
            log::warn!("Failed to load sound {}: {}", path, e);
            None
        }
    }
}

#[derive(Default)]
pub struct Audio {
    cues: HashMap<Sfx, Sound>,
    music: Option<Sound>,
    music_playing: bool,
}

impl Audio {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load_cue(&mut self, sfx: Sfx, files: &[String]) {
        if let Some(sound) = load_file(AUDIO_DIR, sfx.stem(), files).await {
            self.cues.insert(sfx, sound);
        }
    }

    pub async fn load_music(&mut self, files: &[String]) {
        self.music = load_file(MUSIC_DIR, MUSIC_STEM, files).await;
    }

    pub fn loaded_cues(&self) -> usize {
        self.cues.len()
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn handle(&mut self, event: SoundEvent) {
        match event {
            SoundEvent::Play(sfx) => {
                if let Some(sound) = self.cues.get(&sfx) {
                    play_sound_once(sound);
                }
            }
            SoundEvent::StopAll => {
                for sound in self.cues.values() {
                    stop_sound(sound);
                }
                if let Some(music) = &self.music {
                    stop_sound(music);
                }
                self.music_playing = false;
            }
            SoundEvent::ResumeMusic => {
                if self.music_playing {
                    return;
                }
                self.music_playing = true;
                if let Some(music) = &self.music {
                    play_sound(music, PlaySoundParams { looped: true, volume: MUSIC_VOLUME });
                }
            }
        }
    }
}
