//! Tetromino shape classes and their orientation templates
//!
//! Every shape is described relative to the cell holding role 0 of a placed
//! piece. An orientation lists where roles 1, 2 and 3 sit for one rotation or
//! reflection of the shape. The table is a fixed geometric fact: changing an
//! entry changes which tilings the encoder can find.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Relative `(row, col)` offset from the role-0 cell
pub type Offset = (isize, isize);

/// Offsets of roles 1, 2 and 3 for one orientation of a shape
pub type Orientation = [Offset; 3];

/// Raised when a shape id outside `1..=7` is converted into a [`ShapeClass`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown shape id {0} (expected 1..=7)")]
pub struct UnknownShapeId(pub u8);

/// The seven tetromino shape classes, numbered 1 to 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ShapeClass {
    Bar,
    Square,
    L,
    ReverseL,
    Snake,
    ReverseSnake,
    Castle,
}

const BAR: &[Orientation] = &[
    [(0, 1), (0, 2), (0, 3)],
    [(1, 0), (2, 0), (3, 0)],
];

const SQUARE: &[Orientation] = &[[(0, 1), (1, 0), (1, 1)]];

const L: &[Orientation] = &[
    [(1, 0), (2, 0), (2, 1)],
    [(0, 1), (0, 2), (-1, 2)],
    [(-1, 0), (-2, 0), (-2, -1)],
    [(0, -1), (0, -2), (1, -2)],
];

const REVERSE_L: &[Orientation] = &[
    [(1, 0), (2, 0), (2, -1)],
    [(0, 1), (0, 2), (1, 2)],
    [(-1, 0), (-2, 0), (-2, 1)],
    [(0, -1), (0, -2), (-1, -2)],
];

const SNAKE: &[Orientation] = &[
    [(0, 1), (-1, 1), (-1, 2)],
    [(1, 0), (1, 1), (2, 1)],
];

const REVERSE_SNAKE: &[Orientation] = &[
    [(0, 1), (1, 1), (1, 2)],
    [(1, 0), (1, -1), (2, -1)],
];

const CASTLE: &[Orientation] = &[
    [(1, -1), (1, 0), (1, 1)],
    [(-1, -1), (0, -1), (1, -1)],
    [(-1, -1), (-1, 0), (-1, 1)],
    [(-1, 1), (0, 1), (1, 1)],
];

/// Orientation templates indexed by `ShapeClass as usize`
const CATALOG: [&[Orientation]; 7] = [BAR, SQUARE, L, REVERSE_L, SNAKE, REVERSE_SNAKE, CASTLE];

impl ShapeClass {
    /// All shape classes in id order
    pub const ALL: [ShapeClass; 7] = [
        ShapeClass::Bar,
        ShapeClass::Square,
        ShapeClass::L,
        ShapeClass::ReverseL,
        ShapeClass::Snake,
        ShapeClass::ReverseSnake,
        ShapeClass::Castle,
    ];

    /// Look up a shape by its numeric id (1..=7)
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Numeric id of the shape, as used in piece lists and rendered layouts
    pub fn id(self) -> u8 {
        self as u8 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeClass::Bar => "bar",
            ShapeClass::Square => "square",
            ShapeClass::L => "L",
            ShapeClass::ReverseL => "reversed L",
            ShapeClass::Snake => "snake",
            ShapeClass::ReverseSnake => "reversed snake",
            ShapeClass::Castle => "castle",
        }
    }

    /// Orientation templates registered for this shape
    pub fn orientations(self) -> &'static [Orientation] {
        CATALOG[self as usize]
    }

    /// Small drawing of the shape in its first orientation
    pub fn sketch(self) -> &'static str {
        match self {
            ShapeClass::Bar => "OOOO",
            ShapeClass::Square => "OO\nOO",
            ShapeClass::L => "O\nO\nOO",
            ShapeClass::ReverseL => " O\n O\nOO",
            ShapeClass::Snake => " OO\nOO",
            ShapeClass::ReverseSnake => "OO\n OO",
            ShapeClass::Castle => " O\nOOO",
        }
    }
}

impl TryFrom<u8> for ShapeClass {
    type Error = UnknownShapeId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(UnknownShapeId(id))
    }
}

impl From<ShapeClass> for u8 {
    fn from(shape: ShapeClass) -> Self {
        shape.id()
    }
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Absolute cells of roles 0..=3 when `orientation` is anchored at `(row, col)`
pub fn anchored_cells(row: isize, col: isize, orientation: &Orientation) -> [(isize, isize); 4] {
    let [(r1, c1), (r2, c2), (r3, c3)] = *orientation;
    [
        (row, col),
        (row + r1, col + c1),
        (row + r2, col + c2),
        (row + r3, col + c3),
    ]
}
