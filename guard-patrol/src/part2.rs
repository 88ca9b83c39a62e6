use crate::geometry::Point;
use crate::map::Map;
use crate::part1::walk;
use crate::search::{find_loop_obstructions, SearchConfig};

#[tracing::instrument]
pub fn process(input: &str, config: SearchConfig) -> miette::Result<(Vec<Point>, String)> {
    let map = Map::parse(input)?;
    let patrol = walk(&map)?;

    let loop_locations = find_loop_obstructions(&map, patrol.route(), config)?;
    let count = loop_locations.len();

    Ok((loop_locations, count.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Strategy;
    use miette::IntoDiagnostic;
    use rstest::rstest;

    const INPUT: &str = "\
....#.....
.........#
..........
..#.......
.......#..
..........
.#..^.....
........#.
#.........
......#...";

    #[test]
    fn test_process() -> miette::Result<()> {
        assert_eq!("6", process(INPUT, SearchConfig::default())?.1);
        Ok(())
    }

    #[rstest]
    #[case(Strategy::Exhaustive)]
    #[case(Strategy::Resume)]
    fn test_process2(#[case] strategy: Strategy) -> miette::Result<()> {
        let answers: Vec<Point> = vec![
            Point::new(3, 6),
            Point::new(6, 7),
            Point::new(7, 7),
            Point::new(1, 8),
            Point::new(3, 8),
            Point::new(7, 9),
        ];

        let config = SearchConfig {
            strategy,
            parallel: true,
        };
        let mut found = process(INPUT, config)?.0;
        found.sort_by_key(|p| (p.y(), p.x()));

        assert_eq!(answers, found);
        Ok(())
    }

    #[test]
    fn test_bounded_by_visited_tiles() -> miette::Result<()> {
        let input = "\
....#.
.....#
..#...
..^...
#.....
.....#";
        let visited = crate::part1::process(input)?
            .parse::<usize>()
            .into_diagnostic()?;
        let (found, count) = process(input, SearchConfig::default())?;
        assert_eq!(found.len().to_string(), count);
        assert!(found.len() < visited);
        Ok(())
    }
}
