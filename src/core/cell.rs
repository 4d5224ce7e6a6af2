//! Maze cell: wall presence on each of the four faces.

use serde::{Deserialize, Serialize};

use super::heading::Heading;

/// One square of the maze grid.
///
/// Each flag records a wall on that face. Unknown is treated as open
/// until observed, so a fresh cell has no walls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Wall on the north face
    pub wall_n: bool,
    /// Wall on the east face
    pub wall_e: bool,
    /// Wall on the south face
    pub wall_s: bool,
    /// Wall on the west face
    pub wall_w: bool,
}

impl Cell {
    /// Wall presence on the given face.
    #[inline]
    pub fn wall(&self, dir: Heading) -> bool {
        match dir {
            Heading::North => self.wall_n,
            Heading::East => self.wall_e,
            Heading::South => self.wall_s,
            Heading::West => self.wall_w,
        }
    }

    /// True when the given face has no wall.
    #[inline]
    pub fn is_open(&self, dir: Heading) -> bool {
        !self.wall(dir)
    }

    /// Set wall presence on the given face.
    #[inline]
    pub fn set_wall(&mut self, dir: Heading, present: bool) {
        match dir {
            Heading::North => self.wall_n = present,
            Heading::East => self.wall_e = present,
            Heading::South => self.wall_s = present,
            Heading::West => self.wall_w = present,
        }
    }

    /// Encode the four faces as `bit0=N | bit1=E | bit2=S | bit3=W`.
    ///
    /// This is the persisted snapshot byte layout.
    pub fn encode(&self) -> u8 {
        let mut b = 0u8;
        if self.wall_n {
            b |= 1;
        }
        if self.wall_e {
            b |= 2;
        }
        if self.wall_s {
            b |= 4;
        }
        if self.wall_w {
            b |= 8;
        }
        b
    }

    /// Decode a NESW mask byte. Bits above bit3 are ignored.
    pub fn decode(byte: u8) -> Self {
        Self {
            wall_n: byte & 1 != 0,
            wall_e: byte & 2 != 0,
            wall_s: byte & 4 != 0,
            wall_w: byte & 8 != 0,
        }
    }
}
