// ABOUTME: Parser for replay scripts of pointer and resize input.
// ABOUTME: One command per line; `#` starts a comment.

use anyhow::{bail, Context, Result};
use split_core::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Grab a splitter by index
    Grab(usize),
    /// Grab whichever splitter's hit band contains the point
    GrabAt(Point),
    Move(Point),
    Release,
    Resize { width: f64, height: f64 },
    /// Change the number of panes
    Panes(usize),
}

pub fn parse(source: &str) -> Result<Vec<Command>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(number, line)| {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                None
            } else {
                Some(parse_line(line).with_context(|| format!("line {}: {:?}", number + 1, line)))
            }
        })
        .collect()
}

fn parse_line(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let command = match (verb, args.as_slice()) {
        ("down", [index]) => Command::Grab(index.parse()?),
        ("down", [x, y]) => Command::GrabAt(Point::new(x.parse()?, y.parse()?)),
        ("move", [x, y]) => Command::Move(Point::new(x.parse()?, y.parse()?)),
        ("up", []) => Command::Release,
        ("resize", [width, height]) => Command::Resize {
            width: width.parse()?,
            height: height.parse()?,
        },
        ("panes", [count]) => Command::Panes(count.parse()?),
        _ => bail!("unrecognised command"),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        let commands = parse(
            "# drag the first splitter\n\
             down 0\n\
             move 350 10   # most of the way\n\
             up\n\
             \n\
             down 120 5\n\
             resize 800 600\n\
             panes 3\n",
        )
        .unwrap();

        assert_eq!(
            commands,
            vec![
                Command::Grab(0),
                Command::Move(Point::new(350.0, 10.0)),
                Command::Release,
                Command::GrabAt(Point::new(120.0, 5.0)),
                Command::Resize {
                    width: 800.0,
                    height: 600.0
                },
                Command::Panes(3),
            ]
        );
    }

    #[test]
    fn reports_line_of_bad_command() {
        let err = parse("down 0\njump 4\n").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(parse("move left 10").is_err());
        assert!(parse("up now").is_err());
    }
}
