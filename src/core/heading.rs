//! Cardinal directions, relative sides, and discrete actions.
//!
//! All direction math is modular arithmetic on the `u8` encoding
//! `0=N, 1=E, 2=S, 3=W`. Relative sides map onto absolute directions
//! as: left `(h+3) & 3`, front `h`, right `(h+1) & 3`, back `(h+2) & 3`.

use serde::{Deserialize, Serialize};

use super::point::Point;

/// Absolute cardinal direction.
///
/// Serves both as the robot's heading and as a wall face selector on
/// [`crate::core::Cell`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Heading {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Heading {
    /// All four directions in N, E, S, W order.
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// Decode from the `0=N, 1=E, 2=S, 3=W` integer encoding.
    ///
    /// Values are taken modulo 4.
    #[inline]
    pub fn from_index(i: u8) -> Self {
        Self::ALL[(i & 3) as usize]
    }

    /// The `0=N, 1=E, 2=S, 3=W` integer encoding.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Direction 90 degrees counter-clockwise.
    #[inline]
    pub fn left(self) -> Self {
        Self::from_index(self.index().wrapping_add(3))
    }

    /// Direction 90 degrees clockwise.
    #[inline]
    pub fn right(self) -> Self {
        Self::from_index(self.index().wrapping_add(1))
    }

    /// Opposite direction.
    #[inline]
    pub fn reverse(self) -> Self {
        Self::from_index(self.index().wrapping_add(2))
    }

    /// One-cell translation along this direction.
    ///
    /// North is `y - 1`: the grid origin is top-left with `+y` south.
    #[inline]
    pub fn step(self, p: Point) -> Point {
        match self {
            Heading::North => Point::new(p.x, p.y - 1),
            Heading::East => Point::new(p.x + 1, p.y),
            Heading::South => Point::new(p.x, p.y + 1),
            Heading::West => Point::new(p.x - 1, p.y),
        }
    }

    /// Direction of a single-cell move `from -> to`, if the cells are
    /// 4-adjacent.
    pub fn from_delta(from: Point, to: Point) -> Option<Heading> {
        let d = to - from;
        match (d.x, d.y) {
            (0, -1) => Some(Heading::North),
            (1, 0) => Some(Heading::East),
            (0, 1) => Some(Heading::South),
            (-1, 0) => Some(Heading::West),
            _ => None,
        }
    }
}

/// Relative side covered by one proximity sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Front,
    Right,
}

impl Side {
    /// Candidate enumeration order used by the decision policy.
    pub const ALL: [Side; 3] = [Side::Left, Side::Front, Side::Right];

    /// Absolute direction this side faces at the given heading.
    #[inline]
    pub fn to_absolute(self, heading: Heading) -> Heading {
        match self {
            Side::Left => heading.left(),
            Side::Front => heading,
            Side::Right => heading.right(),
        }
    }

    /// The turn-and-advance action that enters this side.
    #[inline]
    pub fn action(self) -> Action {
        match self {
            Side::Left => Action::Left,
            Side::Front => Action::Forward,
            Side::Right => Action::Right,
        }
    }
}

/// Discrete body-frame action emitted once per control tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    Right = 0,
    Forward = 1,
    Left = 2,
    Back = 3,
}

impl Action {
    /// Weight-table index (`0=right, 1=front, 2=left, 3=back`).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Relative action that turns the robot from `heading` toward the
    /// absolute direction `target`.
    pub fn toward(heading: Heading, target: Heading) -> Action {
        // 0=front, 1=right, 2=back, 3=left
        match target.index().wrapping_sub(heading.index()) & 3 {
            0 => Action::Forward,
            1 => Action::Right,
            3 => Action::Left,
            _ => Action::Back,
        }
    }

    /// New heading after executing this action.
    ///
    /// `Forward` keeps the heading; turns rotate in place. `Back` is a
    /// pure 180-degree rotation with no translation.
    #[inline]
    pub fn rotate(self, heading: Heading) -> Heading {
        match self {
            Action::Right => heading.right(),
            Action::Forward => heading,
            Action::Left => heading.left(),
            Action::Back => heading.reverse(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Right => "right",
            Action::Forward => "forward",
            Action::Left => "left",
            Action::Back => "back",
        };
        write!(f, "{}", name)
    }
}
