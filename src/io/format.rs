//! Binary record codecs for persisted state.
//!
//! Two independent little-endian records, each guarded by a magic
//! number and a layout version:
//!
//! - Heuristics record (24 bytes):
//!   `[u32 magic "MZHU"][u16 version][u16 size = 16]`
//!   `[f32 w_right][f32 w_front][f32 w_left][f32 w_back]`
//! - Map snapshot (12-byte header + W*H payload):
//!   `[u32 magic "MZMP"][u16 version][u16 width][u16 height][u16 size]`
//!   then one NESW mask byte per cell (`bit0=N bit1=E bit2=S bit3=W`),
//!   row-major, y increasing.
//!
//! The codecs operate on byte slices only; where those bytes live
//! (file, flash page, RAM) is the backend's business.

use crate::core::{Cell, Heading, Point};
use crate::grid::GridMap;
use crate::learning::Heuristics;

/// Magic for the heuristics record ("MZHU")
pub const HEUR_MAGIC: u32 = 0x4D5A_4855;
/// Heuristics record layout version
pub const HEUR_VERSION: u16 = 1;
/// Heuristics payload size in bytes (four f32)
pub const HEUR_PAYLOAD_LEN: usize = 16;
/// Full heuristics record length (header + payload)
pub const HEUR_RECORD_LEN: usize = 8 + HEUR_PAYLOAD_LEN;

/// Magic for the map snapshot ("MZMP")
pub const MAP_MAGIC: u32 = 0x4D5A_4D50;
/// Map snapshot layout version
pub const MAP_VERSION: u16 = 1;
/// Map snapshot header length
pub const MAP_HEADER_LEN: usize = 12;

/// Encode a heuristics record.
pub fn encode_heuristics(h: &Heuristics) -> [u8; HEUR_RECORD_LEN] {
    let mut buf = [0u8; HEUR_RECORD_LEN];
    buf[0..4].copy_from_slice(&HEUR_MAGIC.to_le_bytes());
    buf[4..6].copy_from_slice(&HEUR_VERSION.to_le_bytes());
    buf[6..8].copy_from_slice(&(HEUR_PAYLOAD_LEN as u16).to_le_bytes());
    buf[8..12].copy_from_slice(&h.w_right.to_le_bytes());
    buf[12..16].copy_from_slice(&h.w_front.to_le_bytes());
    buf[16..20].copy_from_slice(&h.w_left.to_le_bytes());
    buf[20..24].copy_from_slice(&h.w_back.to_le_bytes());
    buf
}

/// Decode a heuristics record.
///
/// Returns `None` on short input or any magic/version/size mismatch.
pub fn decode_heuristics(bytes: &[u8]) -> Option<Heuristics> {
    if bytes.len() < HEUR_RECORD_LEN {
        return None;
    }
    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let size = u16::from_le_bytes([bytes[6], bytes[7]]);
    if magic != HEUR_MAGIC || version != HEUR_VERSION || size as usize != HEUR_PAYLOAD_LEN {
        return None;
    }
    let f = |off: usize| {
        f32::from_le_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]])
    };
    Some(Heuristics {
        w_right: f(8),
        w_front: f(12),
        w_left: f(16),
        w_back: f(20),
    })
}

/// Encode a map snapshot (header + one mask byte per cell).
pub fn encode_map(map: &GridMap) -> Vec<u8> {
    let payload = map.width() * map.height();
    let mut buf = Vec::with_capacity(MAP_HEADER_LEN + payload);
    buf.extend_from_slice(&MAP_MAGIC.to_le_bytes());
    buf.extend_from_slice(&MAP_VERSION.to_le_bytes());
    buf.extend_from_slice(&(map.width() as u16).to_le_bytes());
    buf.extend_from_slice(&(map.height() as u16).to_le_bytes());
    buf.extend_from_slice(&(payload as u16).to_le_bytes());
    buf.extend(map.cells().iter().map(Cell::encode));
    buf
}

/// Decode a map snapshot into `out`.
///
/// `out` must already have the snapshot's dimensions. Header fields
/// and payload length are validated before the map is touched, so a
/// failed decode leaves `out` exactly as it was. Returns false on
/// magic/version mismatch, dimension mismatch, or short payload.
pub fn decode_map(bytes: &[u8], out: &mut GridMap) -> bool {
    if bytes.len() < MAP_HEADER_LEN {
        return false;
    }
    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let w = u16::from_le_bytes([bytes[6], bytes[7]]) as usize;
    let h = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let size = u16::from_le_bytes([bytes[10], bytes[11]]) as usize;

    if magic != MAP_MAGIC || version != MAP_VERSION {
        return false;
    }
    if w != out.width() || h != out.height() {
        return false;
    }
    if size != w * h || bytes.len() < MAP_HEADER_LEN + size {
        return false;
    }

    let payload = &bytes[MAP_HEADER_LEN..MAP_HEADER_LEN + size];
    for y in 0..h {
        for x in 0..w {
            let cell = Cell::decode(payload[y * w + x]);
            let p = Point::new(x as i32, y as i32);
            for dir in Heading::ALL {
                out.set_wall(p, dir, cell.wall(dir));
            }
        }
    }
    true
}
