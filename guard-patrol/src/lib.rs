pub mod error;
pub mod geometry;
pub mod map;
pub mod parser;
pub mod part1;
pub mod part2;
pub mod patrol;
pub mod search;
