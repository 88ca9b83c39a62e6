use std::fmt::{self, Display, Formatter};
use std::ops::Add;

use glam::IVec2;

/// A tile coordinate. `x` grows to the east, `y` grows to the south.
///
/// Points deliberately have no ordering: the only comparison the map needs
/// is rectangle containment, which is [`Point::in_rect`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Point(IVec2);

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    /// True when `lo <= self <= hi` holds on both axes.
    pub fn in_rect(&self, lo: Point, hi: Point) -> bool {
        self.0.cmpge(lo.0).all() && self.0.cmple(hi.0).all()
    }
}

impl Add<Heading> for Point {
    type Output = Point;

    fn add(self, heading: Heading) -> Point {
        Point(self.0 + heading.offset())
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0.x, self.0.y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Heading {
    North, // ^
    South, // v
    East,  // >
    West,  // <
}

const GLYPHS: [(char, Heading); 4] = [
    ('^', Heading::North),
    ('v', Heading::South),
    ('>', Heading::East),
    ('<', Heading::West),
];

impl Heading {
    pub const ALL: [Heading; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub const fn offset(self) -> IVec2 {
        match self {
            Self::North => IVec2::NEG_Y,
            Self::South => IVec2::Y,
            Self::East => IVec2::X,
            Self::West => IVec2::NEG_X,
        }
    }

    pub const fn rotate_clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        GLYPHS
            .iter()
            .find(|(c, _)| *c == glyph)
            .map(|(_, heading)| *heading)
    }

    pub fn glyph(self) -> char {
        GLYPHS
            .iter()
            .find(|(_, heading)| *heading == self)
            .map_or('?', |(c, _)| *c)
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// The guard's instantaneous pose: where it stands and which way it faces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Vector {
    pub origin: Point,
    pub heading: Heading,
}

impl Vector {
    pub const fn new(origin: Point, heading: Heading) -> Self {
        Self { origin, heading }
    }

    pub fn next_step(&self) -> Point {
        self.origin + self.heading
    }

    /// True when `target` lies strictly ahead on the ray from `origin`.
    pub fn points_at(&self, target: Point) -> bool {
        let delta = target.0 - self.origin.0;
        let direction = self.heading.offset();
        delta.perp_dot(direction) == 0 && delta.dot(direction) > 0
    }

    pub fn rotated(&self) -> Self {
        Self::new(self.origin, self.heading.rotate_clockwise())
    }
}
