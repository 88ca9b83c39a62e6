use guard_patrol::map::Map;
use guard_patrol::part1::walk;
use guard_patrol::search::{find_loop_obstructions, SearchConfig, Strategy};

fn main() {
    divan::main();
}

const SAMPLE_INPUT: &str = "\
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

#[divan::bench]
fn part1() {
    guard_patrol::part1::process(divan::black_box(SAMPLE_INPUT)).unwrap();
}

#[divan::bench]
fn part2() {
    guard_patrol::part2::process(divan::black_box(SAMPLE_INPUT), SearchConfig::default()).unwrap();
}

#[divan::bench]
fn parse_sample() {
    Map::parse(divan::black_box(SAMPLE_INPUT)).unwrap();
}

#[divan::bench(args = [Strategy::Exhaustive, Strategy::Resume])]
fn search_parallel(bencher: divan::Bencher, strategy: Strategy) {
    let map = Map::parse(SAMPLE_INPUT).unwrap();
    let route = walk(&map).unwrap().into_route();
    let config = SearchConfig {
        strategy,
        parallel: true,
    };
    bencher.bench(|| find_loop_obstructions(&map, divan::black_box(&route), config).unwrap());
}

#[divan::bench(args = [Strategy::Exhaustive, Strategy::Resume])]
fn search_sequential(bencher: divan::Bencher, strategy: Strategy) {
    let map = Map::parse(SAMPLE_INPUT).unwrap();
    let route = walk(&map).unwrap().into_route();
    let config = SearchConfig {
        strategy,
        parallel: false,
    };
    bencher.bench(|| find_loop_obstructions(&map, divan::black_box(&route), config).unwrap());
}
