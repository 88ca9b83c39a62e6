use crate::error::PatrolError;
use crate::map::Map;
use crate::patrol::{Mode, Patrol};

/// Walks the guard off the map (or into a loop) with the route recorded.
pub fn walk(map: &Map) -> Result<Patrol<'_>, PatrolError> {
    let mut patrol = Patrol::new(map, Mode::Walk);
    let state = patrol.run()?;
    tracing::info!(?state, moves = patrol.moves(), visited = patrol.visited_count(), "walk finished");
    Ok(patrol)
}

#[tracing::instrument]
pub fn process(input: &str) -> miette::Result<String> {
    let map = Map::parse(input)?;
    let patrol = walk(&map)?;

    Ok(patrol.visited_count().to_string())
}
