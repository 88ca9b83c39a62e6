use nom::{
    character::complete::{anychar, line_ending, multispace0, space0},
    combinator::map_opt,
    multi::{many1, separated_list1},
    sequence::{delimited, preceded},
    IResult,
};
use nom_locate::LocatedSpan;

use crate::error::MapError;
use crate::geometry::Heading;

pub type Span<'a> = LocatedSpan<&'a str>;

pub const OBSTACLE: char = '#';
pub const EMPTY: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Empty,
    Obstacle,
    Guard(Heading),
}

impl Glyph {
    fn from_char(c: char) -> Option<Self> {
        match c {
            EMPTY => Some(Self::Empty),
            OBSTACLE => Some(Self::Obstacle),
            c => Heading::from_glyph(c).map(Self::Guard),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LocatedGlyph<'a> {
    pub glyph: Glyph,
    pub position: Span<'a>,
}

impl LocatedGlyph<'_> {
    pub fn offset(&self) -> usize {
        self.position.location_offset()
    }
}

pub type GlyphRows<'a> = Vec<Vec<LocatedGlyph<'a>>>;

fn parse_glyph(input: Span) -> IResult<Span, LocatedGlyph> {
    let position = input;
    let (input, glyph) = map_opt(anychar, Glyph::from_char)(input)?;
    Ok((input, LocatedGlyph { glyph, position }))
}

// Spaces and tabs around a row are trimmed.
fn parse_row(input: Span) -> IResult<Span, Vec<LocatedGlyph>> {
    delimited(space0, many1(parse_glyph), space0)(input)
}

// Blank or whitespace-only lines between rows are skipped rather than
// ending the grid.
fn parse_rows(input: Span) -> IResult<Span, GlyphRows> {
    delimited(
        multispace0,
        separated_list1(many1(preceded(space0, line_ending)), parse_row),
        multispace0,
    )(input)
}

/// Where the parser stopped, moved back onto the whitespace that cut a row
/// short when a valid tile follows it.
fn stray_offset(input: &str, offset: usize) -> usize {
    let tile_follows = input[offset..]
        .chars()
        .next()
        .and_then(Glyph::from_char)
        .is_some();
    if tile_follows {
        input[..offset].trim_end_matches([' ', '\t']).len()
    } else {
        offset
    }
}

/// Splits the input into rows of located glyphs. Row lengths are not
/// checked here.
pub fn parse_input(input: &str) -> Result<GlyphRows, MapError> {
    if input.trim().is_empty() {
        return Err(MapError::Empty);
    }

    let unexpected = |offset: usize| MapError::UnexpectedGlyph {
        glyph: input[offset..].chars().next().unwrap_or_default(),
        src: input.to_string(),
        span: (offset, 1).into(),
    };

    match parse_rows(Span::new(input)) {
        Ok((rest, rows)) if rest.fragment().is_empty() => Ok(rows),
        Ok((rest, _)) => Err(unexpected(stray_offset(input, rest.location_offset()))),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(unexpected(e.input.location_offset())),
        Err(nom::Err::Incomplete(_)) => Err(MapError::Empty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser() -> miette::Result<()> {
        let input = "\
..#
.^.
#..
";
        let rows = parse_input(input)?;
        assert_eq!(3, rows.len());
        assert!(rows.iter().all(|row| row.len() == 3));
        assert_eq!(Glyph::Obstacle, rows[0][2].glyph);
        assert_eq!(Glyph::Guard(Heading::North), rows[1][1].glyph);
        assert_eq!(5, rows[1][1].offset());
        Ok(())
    }

    #[test]
    fn skips_blank_lines_and_crlf() -> miette::Result<()> {
        let rows = parse_input("\n.>\r\n\r\n#.\r\n")?;
        assert_eq!(2, rows.len());
        assert_eq!(Glyph::Guard(Heading::East), rows[0][1].glyph);
        assert_eq!(Glyph::Obstacle, rows[1][0].glyph);
        Ok(())
    }

    #[test]
    fn rejects_unknown_glyph() {
        let err = parse_input("..\n.X\n").unwrap_err();
        match err {
            MapError::UnexpectedGlyph { glyph, span, .. } => {
                assert_eq!('X', glyph);
                assert_eq!(4, span.offset());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn trims_whitespace_around_rows() -> miette::Result<()> {
        let rows = parse_input(".^ \n..\n")?;
        assert_eq!(vec![2, 2], rows.iter().map(Vec::len).collect::<Vec<_>>());

        let rows = parse_input("  #.\t\n \t \n\t.^  \n")?;
        assert_eq!(2, rows.len());
        assert_eq!(Glyph::Obstacle, rows[0][0].glyph);
        assert_eq!(Glyph::Guard(Heading::North), rows[1][1].glyph);
        Ok(())
    }

    #[test]
    fn blames_whitespace_inside_a_row() {
        for (input, offset) in [(". .\n.^.\n", 1), ("...\n.^\t\t.\n", 6)] {
            match parse_input(input).unwrap_err() {
                MapError::UnexpectedGlyph { glyph, span, .. } => {
                    assert!(glyph == ' ' || glyph == '\t');
                    assert_eq!(offset, span.offset());
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(parse_input(" \n\n"), Err(MapError::Empty)));
    }
}
