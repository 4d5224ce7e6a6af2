//! Host persistence backend: two record files under a hidden
//! directory in the user's home.

use log::{debug, warn};
use std::fs;
use std::path::PathBuf;

use super::format;
use super::{MemoryStatus, MemoryStore};
use crate::grid::GridMap;
use crate::learning::Heuristics;

const HEURISTICS_FILE: &str = "heuristics.bin";
const MAP_FILE: &str = "map.bin";

/// File-backed [`MemoryStore`].
///
/// Records live as `heuristics.bin` and `map.bin` inside one
/// directory, by default `~/.vyuha_maze`. Filesystem errors fail the
/// operation without corrupting what is already on disk; heuristics
/// additionally keep a session-local copy so a load after a failed
/// read still returns the last saved value, mirroring the embedded
/// backend.
pub struct FileStore {
    dir: PathBuf,
    last_heuristics: Option<Heuristics>,
}

impl FileStore {
    /// Backend rooted at an explicit directory (used by tests).
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            last_heuristics: None,
        }
    }

    /// Default storage directory: `.vyuha_maze` under the home path.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".vyuha_maze"))
    }

    /// Backend rooted at the default directory, if a home exists.
    pub fn open_default() -> Option<Self> {
        Self::default_dir().map(Self::new)
    }

    /// Storage directory in use.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> bool {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("[pmem] create {:?} failed: {}", self.dir, e);
            return false;
        }
        let path = self.dir.join(name);
        match fs::write(&path, bytes) {
            Ok(()) => {
                debug!("[pmem] wrote {:?} ({} bytes)", path, bytes.len());
                true
            }
            Err(e) => {
                warn!("[pmem] write {:?} failed: {}", path, e);
                false
            }
        }
    }
}

impl MemoryStore for FileStore {
    fn save_heuristics(&mut self, h: &Heuristics) -> bool {
        if !self.write_file(HEURISTICS_FILE, &format::encode_heuristics(h)) {
            return false;
        }
        // Refresh the session copy only once the bytes are on disk, so
        // a failed save cannot shadow the last value actually stored.
        self.last_heuristics = Some(*h);
        true
    }

    fn load_heuristics(&mut self) -> Option<Heuristics> {
        let from_disk = fs::read(self.dir.join(HEURISTICS_FILE))
            .ok()
            .and_then(|bytes| format::decode_heuristics(&bytes));
        match from_disk {
            Some(h) => {
                self.last_heuristics = Some(h);
                Some(h)
            }
            None => self.last_heuristics,
        }
    }

    fn save_map_snapshot(&mut self, map: &GridMap) -> bool {
        self.write_file(MAP_FILE, &format::encode_map(map))
    }

    fn load_map_snapshot(&mut self, out: &mut GridMap) -> bool {
        match fs::read(self.dir.join(MAP_FILE)) {
            Ok(bytes) => format::decode_map(&bytes, out),
            Err(_) => false,
        }
    }

    fn erase_all(&mut self) -> bool {
        self.last_heuristics = None;
        let mut ok = true;
        for name in [HEURISTICS_FILE, MAP_FILE] {
            let path = self.dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => debug!("[pmem] removed {:?}", path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("[pmem] remove {:?} failed: {}", path, e);
                    ok = false;
                }
            }
        }
        ok
    }

    fn status(&self) -> MemoryStatus {
        let valid = fs::read(self.dir.join(HEURISTICS_FILE))
            .ok()
            .and_then(|bytes| format::decode_heuristics(&bytes))
            .is_some();
        MemoryStatus {
            saved_count: valid as u32,
            active_profile: 0,
        }
    }
}
