use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::error::MapError;
use crate::geometry::{Point, Vector};
use crate::parser::{self, Glyph, GlyphRows};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Obstacle,
    /// Added for a single obstruction trial, see [`Map::place_obstacle`].
    Hypothetical,
}

impl Tile {
    pub fn is_obstacle(&self) -> bool {
        matches!(self, Tile::Obstacle | Tile::Hypothetical)
    }

    pub fn is_hypothetical_obstacle(&self) -> bool {
        matches!(self, Tile::Hypothetical)
    }
}

/// The static part of the puzzle: the bounded grid, its obstacles and where
/// the guard starts. Everything that changes during a walk lives in
/// [`crate::patrol::Patrol`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    tiles: Vec<Tile>,
    width: usize,
    height: usize,
    upper_left: Point,
    lower_right: Point,
    obstacles: HashSet<Point>,
    start: Vector,
}

impl Map {
    #[tracing::instrument(skip(input), fields(len = input.len()))]
    pub fn parse(input: &str) -> Result<Self, MapError> {
        let rows = parser::parse_input(input)?;
        Self::from_rows(input, &rows)
    }

    fn from_rows(input: &str, rows: &GlyphRows) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        if width == 0 {
            return Err(MapError::Empty);
        }

        if let Some((y, row)) = rows.iter().find_position(|row| row.len() != width) {
            let start = row.first().map_or(0, |g| g.offset());
            let end = row.last().map_or(start, |g| g.offset() + 1);
            return Err(MapError::RaggedRows {
                row: y,
                expected: width,
                found: row.len(),
                src: input.to_string(),
                span: (start, end - start).into(),
            });
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut obstacles = HashSet::new();
        let mut guards = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            for (x, located) in row.iter().enumerate() {
                let point = Point::new(x as i32, y as i32);
                match located.glyph {
                    Glyph::Empty => tiles.push(Tile::Empty),
                    Glyph::Obstacle => {
                        obstacles.insert(point);
                        tiles.push(Tile::Obstacle);
                    }
                    Glyph::Guard(heading) => {
                        guards.push((Vector::new(point, heading), located.offset()));
                        tiles.push(Tile::Empty);
                    }
                }
            }
        }

        let start = match guards.as_slice() {
            [] => return Err(MapError::MissingGuard),
            [(start, _)] => *start,
            [(_, first), (_, second), ..] => {
                return Err(MapError::MultipleGuards {
                    src: input.to_string(),
                    first: (*first, 1).into(),
                    second: (*second, 1).into(),
                })
            }
        };

        tracing::debug!(width, height, obstacles = obstacles.len(), start = %start.origin, "parsed map");

        Ok(Self {
            tiles,
            width,
            height,
            upper_left: Point::new(0, 0),
            lower_right: Point::new(width as i32 - 1, height as i32 - 1),
            obstacles,
            start,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn upper_left_bound(&self) -> Point {
        self.upper_left
    }

    pub fn lower_right_bound(&self) -> Point {
        self.lower_right
    }

    /// The guard's starting pose.
    pub fn start(&self) -> Vector {
        self.start
    }

    /// Obstacles present in the input. Hypothetical obstacles are not listed.
    pub fn obstacles(&self) -> &HashSet<Point> {
        &self.obstacles
    }

    pub fn contains(&self, point: Point) -> bool {
        point.in_rect(self.upper_left, self.lower_right)
    }

    /// Row-major index of an in-bounds point.
    pub fn index_of(&self, point: Point) -> Option<usize> {
        self.contains(point)
            .then(|| point.y() as usize * self.width + point.x() as usize)
    }

    pub fn point_at(&self, index: usize) -> Point {
        Point::new((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn get(&self, point: Point) -> Option<Tile> {
        self.index_of(point).map(|i| self.tiles[i])
    }

    pub fn is_obstacle(&self, point: Point) -> bool {
        self.get(point).is_some_and(|tile| tile.is_obstacle())
    }

    /// Marks an empty tile as a hypothetical obstacle. Returns false (and
    /// changes nothing) when the point is out of bounds or already blocked.
    ///
    /// The guard's start tile is not protected here; callers skip it.
    pub fn place_obstacle(&mut self, point: Point) -> bool {
        match self.index_of(point) {
            Some(i) if self.tiles[i] == Tile::Empty => {
                self.tiles[i] = Tile::Hypothetical;
                true
            }
            _ => false,
        }
    }

    /// Clears a hypothetical obstacle. Obstacles from the input stay put.
    pub fn remove_obstacle(&mut self, point: Point) -> bool {
        match self.index_of(point) {
            Some(i) if self.tiles[i] == Tile::Hypothetical => {
                self.tiles[i] = Tile::Empty;
                true
            }
            _ => false,
        }
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, tile) in self.tiles.iter().enumerate() {
            let point = self.point_at(i);
            let c = match tile {
                _ if point == self.start.origin => self.start.heading.glyph(),
                Tile::Empty => parser::EMPTY,
                Tile::Obstacle => parser::OBSTACLE,
                Tile::Hypothetical => 'O',
            };
            write!(f, "{c}")?;
            if point.x() as usize == self.width - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
