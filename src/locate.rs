//! Where the game keeps its saves and quality definitions.

use crate::statics;
use directories::BaseDirs;
use std::path::{Path, PathBuf};

#[cfg(target_os = "macos")]
const GAME_DIR: &[&str] = &["Library", "Application Support", "unity.Failbetter Games.Sunless Sea"];
#[cfg(target_os = "windows")]
const GAME_DIR: &[&str] = &["AppData", "LocalLow", "Failbetter Games", "Sunless Sea"];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const GAME_DIR: &[&str] = &[".config", "unity3d", "Failbetter Games", "Sunless Sea"];

/// The game's data directory under the user's home; `None` if there is no home directory.
pub fn game_data_dir() -> Option<PathBuf> {
    let dirs = BaseDirs::new()?;
    Some(game_data_dir_in(dirs.home_dir()))
}

pub fn game_data_dir_in(home: &Path) -> PathBuf {
    GAME_DIR.iter().fold(home.to_path_buf(), |dir, part| dir.join(part))
}

pub fn saves_dir() -> Option<PathBuf> {
    game_data_dir().map(|dir| saves_dir_in(&dir))
}

pub fn saves_dir_in(data_dir: &Path) -> PathBuf {
    data_dir.join(statics::SS_DIR_SAVES)
}

pub fn qualities_path() -> Option<PathBuf> {
    game_data_dir().map(|dir| qualities_path_in(&dir))
}

pub fn qualities_path_in(data_dir: &Path) -> PathBuf {
    data_dir
        .join(statics::SS_DIR_ENTITIES)
        .join(statics::SS_FILE_QUALITIES)
}
