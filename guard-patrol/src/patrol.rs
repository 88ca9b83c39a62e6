use std::fmt::{self, Display, Formatter};

use crate::error::PatrolError;
use crate::geometry::{Heading, Point, Vector};
use crate::map::{Map, Tile};
use crate::parser;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PatrolState {
    Running,
    /// The guard stepped off the map.
    Exited,
    /// The guard is back in a pose it already held and will repeat forever.
    Looped,
}

impl PatrolState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PatrolState::Running)
    }
}

/// Both modes share the transition rule and the pose history. `Walk`
/// additionally records the route for the obstruction search.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    Walk,
    LoopDetect,
}

/// The headings a tile has been crossed with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Headings(u8);

impl Headings {
    fn bit(heading: Heading) -> u8 {
        1 << heading as u8
    }

    /// Returns false if the heading was already present.
    pub fn insert(&mut self, heading: Heading) -> bool {
        let fresh = !self.contains(heading);
        self.0 |= Self::bit(heading);
        fresh
    }

    pub fn contains(&self, heading: Heading) -> bool {
        self.0 & Self::bit(heading) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Heading> {
        Heading::ALL.into_iter().filter(move |h| self.contains(*h))
    }
}

/// A tile entered for the first time, with the pose the guard held just
/// before stepping onto it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Waypoint {
    pub tile: Point,
    pub approach: Vector,
}

/// One guard walking one map. The map is only borrowed, so any number of
/// patrols can share it.
#[derive(Debug, Clone)]
pub struct Patrol<'m> {
    map: &'m Map,
    obstruction: Option<Point>,
    mode: Mode,
    guard: Vector,
    trail: Vec<Headings>,
    visited: usize,
    route: Vec<Waypoint>,
    moves: usize,
    state: PatrolState,
}

impl<'m> Patrol<'m> {
    pub fn new(map: &'m Map, mode: Mode) -> Self {
        Self::from_pose(map, map.start(), mode)
    }

    /// Starts a patrol from an arbitrary pose. A pose outside the map is
    /// already `Exited`.
    pub fn from_pose(map: &'m Map, pose: Vector, mode: Mode) -> Self {
        let mut trail = vec![Headings::default(); map.width() * map.height()];
        let (visited, state) = match map.index_of(pose.origin) {
            Some(i) => {
                trail[i].insert(pose.heading);
                (1, PatrolState::Running)
            }
            None => (0, PatrolState::Exited),
        };

        Self {
            map,
            obstruction: None,
            mode,
            guard: pose,
            trail,
            visited,
            route: Vec::new(),
            moves: 0,
            state,
        }
    }

    /// Treats `point` as blocked for this patrol only. The map is untouched.
    pub fn with_obstruction(mut self, point: Point) -> Self {
        self.obstruction = Some(point);
        self
    }

    /// Number of distinct poses on the map; no loop-free walk can move more
    /// often than this.
    pub fn safety_cap(&self) -> usize {
        self.trail.len() * Heading::ALL.len()
    }

    fn is_blocked(&self, point: Point) -> bool {
        self.obstruction == Some(point) || self.map.is_obstacle(point)
    }

    /// Advances the guard by one transition: exit, turn in place, or move.
    pub fn step(&mut self) -> PatrolState {
        if self.state.is_terminal() {
            return self.state;
        }

        let next = self.guard.next_step();
        let Some(index) = self.map.index_of(next) else {
            self.state = PatrolState::Exited;
            return self.state;
        };

        if self.is_blocked(next) {
            self.guard = self.guard.rotated();
            tracing::trace!(at = %self.guard.origin, heading = ?self.guard.heading, "turned");
            // The turned pose is a pose like any other; a guard boxed in on
            // every side comes back to its first heading here.
            if let Some(i) = self.map.index_of(self.guard.origin) {
                if !self.trail[i].insert(self.guard.heading) {
                    self.state = PatrolState::Looped;
                }
            }
            return self.state;
        }

        let tile = &mut self.trail[index];
        let first_visit = tile.is_empty();
        if !tile.insert(self.guard.heading) {
            self.state = PatrolState::Looped;
            return self.state;
        }

        if first_visit {
            self.visited += 1;
            if self.mode == Mode::Walk {
                self.route.push(Waypoint {
                    tile: next,
                    approach: self.guard,
                });
            }
        }

        self.guard.origin = next;
        self.moves += 1;
        self.state
    }

    /// Steps until the guard exits or loops.
    #[tracing::instrument(level = "debug", skip(self), fields(from = %self.guard.origin, obstruction = ?self.obstruction))]
    pub fn run(&mut self) -> Result<PatrolState, PatrolError> {
        let cap = self.safety_cap();
        loop {
            let state = self.step();
            if state.is_terminal() {
                tracing::debug!(?state, moves = self.moves, visited = self.visited, "patrol finished");
                return Ok(state);
            }
            if self.moves > cap {
                tracing::error!(moves = self.moves, cap, "pose history failed to catch a loop");
                return Err(PatrolError::SafetyCapExceeded {
                    moves: self.moves,
                    cap,
                });
            }
        }
    }

    pub fn state(&self) -> PatrolState {
        self.state
    }

    pub fn guard(&self) -> Vector {
        self.guard
    }

    /// Moves made so far. Turns in place are not counted.
    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn visited_count(&self) -> usize {
        self.visited
    }

    pub fn visited(&self) -> impl Iterator<Item = Point> + '_ {
        self.trail
            .iter()
            .enumerate()
            .filter(|(_, headings)| !headings.is_empty())
            .map(|(i, _)| self.map.point_at(i))
    }

    pub fn headings_at(&self, point: Point) -> Headings {
        self.map
            .index_of(point)
            .map_or_else(Headings::default, |i| self.trail[i])
    }

    /// Tiles in first-visit order, excluding the starting tile. Empty in
    /// [`Mode::LoopDetect`].
    pub fn route(&self) -> &[Waypoint] {
        &self.route
    }

    pub fn into_route(self) -> Vec<Waypoint> {
        self.route
    }
}

/// Debug dump: `|`, `-` and `+` mark tiles crossed vertically,
/// horizontally or both, `O` the trial obstruction.
impl Display for Patrol<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, headings) in self.trail.iter().enumerate() {
            let point = self.map.point_at(i);
            let tile = self.map.get(point).unwrap_or_default();
            let vertical = headings.iter().any(|h| h.is_vertical());
            let horizontal = headings.iter().any(|h| !h.is_vertical());

            let c = if point == self.guard.origin && self.state == PatrolState::Running {
                self.guard.heading.glyph()
            } else if self.obstruction == Some(point) || tile.is_hypothetical_obstacle() {
                'O'
            } else if tile == Tile::Obstacle {
                parser::OBSTACLE
            } else {
                match (vertical, horizontal) {
                    (true, true) => '+',
                    (true, false) => '|',
                    (false, true) => '-',
                    (false, false) => parser::EMPTY,
                }
            };
            write!(f, "{c}")?;
            if point.x() as usize == self.map.width() - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
