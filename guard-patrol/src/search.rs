use rayon::prelude::*;

use crate::error::PatrolError;
use crate::geometry::{Point, Vector};
use crate::map::Map;
use crate::patrol::{Mode, Patrol, PatrolState, Waypoint};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Strategy {
    /// Every trial restarts from the guard's starting pose.
    Exhaustive,
    /// Every trial starts from the pose the guard held just before it first
    /// reached the candidate tile.
    #[default]
    Resume,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    /// Run trials on the rayon pool, sharing the map read-only. Otherwise a
    /// single scratch map is reused with one obstacle placed at a time.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            parallel: true,
        }
    }
}

/// Finds every tile on `route` where one new obstacle traps the guard in a
/// loop. Tiles off the route are never candidates: the guard would not meet
/// an obstacle there, so its walk would not change.
#[tracing::instrument(skip(map, route), fields(candidates = route.len()))]
pub fn find_loop_obstructions(
    map: &Map,
    route: &[Waypoint],
    config: SearchConfig,
) -> Result<Vec<Point>, PatrolError> {
    let start = map.start().origin;
    let candidates = route
        .iter()
        .filter(|waypoint| waypoint.tile != start)
        .filter(|waypoint| {
            let blocked = map.is_obstacle(waypoint.tile);
            if blocked {
                tracing::warn!(tile = %waypoint.tile, "route passes through an obstacle, skipping");
            }
            !blocked
        })
        .copied()
        .collect::<Vec<_>>();

    let outcomes = if config.parallel {
        candidates
            .par_iter()
            .map(|waypoint| {
                let patrol = trial_patrol(map, *waypoint, config.strategy)
                    .map(|patrol| patrol.with_obstruction(waypoint.tile));
                finish_trial(patrol, waypoint.tile)
            })
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let mut scratch = map.clone();
        candidates
            .iter()
            .map(|waypoint| {
                let placed = scratch.place_obstacle(waypoint.tile);
                debug_assert!(placed, "candidate {} is not an empty tile", waypoint.tile);
                let outcome =
                    finish_trial(trial_patrol(&scratch, *waypoint, config.strategy), waypoint.tile);
                let removed = scratch.remove_obstacle(waypoint.tile);
                debug_assert!(removed, "obstacle at {} vanished during its trial", waypoint.tile);
                outcome
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let locations = outcomes.into_iter().flatten().collect::<Vec<_>>();
    tracing::info!(
        candidates = candidates.len(),
        loops = locations.len(),
        ?config,
        "obstruction search finished"
    );
    Ok(locations)
}

/// Builds the patrol for one trial, or `None` when the trial is already
/// known to end with the guard leaving the map.
fn trial_patrol(map: &Map, waypoint: Waypoint, strategy: Strategy) -> Option<Patrol<'_>> {
    let from = match strategy {
        Strategy::Exhaustive => map.start(),
        Strategy::Resume => {
            if clear_after_turn(map, waypoint.approach) {
                tracing::trace!(tile = %waypoint.tile, "nothing ahead after turning");
                return None;
            }
            waypoint.approach
        }
    };
    Some(Patrol::from_pose(map, from, Mode::LoopDetect))
}

fn finish_trial(patrol: Option<Patrol<'_>>, tile: Point) -> Result<Option<Point>, PatrolError> {
    let Some(mut patrol) = patrol else {
        return Ok(None);
    };
    let looped = patrol.run()? == PatrolState::Looped;
    tracing::debug!(%tile, looped, moves = patrol.moves(), "trial finished");
    Ok(looped.then_some(tile))
}

/// After bumping into the new obstacle the guard turns right. If no input
/// obstacle lies on that ray, it walks straight off the map.
fn clear_after_turn(map: &Map, approach: Vector) -> bool {
    let turned = approach.rotated();
    !map.obstacles()
        .iter()
        .any(|obstacle| turned.points_at(*obstacle))
}
