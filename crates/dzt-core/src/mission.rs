use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub const MISSION_FILES: &[&str] = &["types.xml", "spawnabletypes.xml"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionScan {
    pub mission_folder: PathBuf,
    pub exists: bool,
    pub is_directory: bool,
    pub is_map_empty: bool,
    pub files: BTreeMap<String, bool>,
}

/// Reports which economy files a mission folder already has. Never fails.
pub fn scan_mission_folder(folder: &Path) -> MissionScan {
    let mut scan = MissionScan {
        mission_folder: folder.to_path_buf(),
        exists: folder.exists(),
        is_directory: folder.is_dir(),
        is_map_empty: false,
        files: BTreeMap::new(),
    };
    if !scan.is_directory {
        return scan;
    }
    scan.is_map_empty = folder
        .file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|n| n.ends_with(".map.empty"));
    for name in MISSION_FILES {
        scan.files.insert((*name).to_string(), folder.join(name).exists());
    }
    scan
}
