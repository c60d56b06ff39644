use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};

use super::{LevelData, Precompute};
use crate::common::State;

/// A parsed level: static geometry plus the starting configuration.
#[derive(Debug, Clone)]
pub struct Level {
    pub data: LevelData,
    pub initial: State,
}

impl Level {
    pub fn from_file(path: &str, precompute: Precompute) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read level {path}"))?;
        Self::parse_with(&content, precompute).with_context(|| format!("Invalid level {path}"))
    }

    /// Parse the text format:
    /// `#` wall, `.` goal, `$` box, `*` box on goal, `@` player,
    /// `+` player on goal, and ` `, `-` or `_` for floor.
    pub fn parse_with(s: &str, precompute: Precompute) -> Result<Self> {
        let mut walls = Vec::new();
        let mut goals = Vec::new();
        let mut boxes = Vec::new();
        let mut player = None;

        for (y, line) in s.lines().enumerate() {
            for (x, ch) in line.trim_end().chars().enumerate() {
                let pos = (x as i32, y as i32);
                match ch {
                    '#' => walls.push(pos),
                    '.' => goals.push(pos),
                    '$' => boxes.push(pos),
                    '*' => {
                        boxes.push(pos);
                        goals.push(pos);
                    }
                    '@' | '+' => {
                        ensure!(player.is_none(), "Multiple players");
                        player = Some(pos);
                        if ch == '+' {
                            goals.push(pos);
                        }
                    }
                    ' ' | '-' | '_' => {}
                    _ => bail!("Invalid cell {ch:?} at ({x}, {y})"),
                }
            }
        }

        let player = player.context("Missing player")?;
        ensure!(
            boxes.len() == goals.len(),
            "Box count {} does not match goal count {}",
            boxes.len(),
            goals.len()
        );

        Ok(Level {
            data: LevelData::with_options(walls, goals, precompute),
            initial: State::new(player, boxes),
        })
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, Precompute::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cells() {
        let level = "#####\n#+$ #\n# *.#\n#####".parse::<Level>();
        // Goals: (1, 1), (2, 2), (3, 2); boxes: (2, 1), (2, 2).
        assert!(level.is_err());

        let level = "######\n#+$  #\n# *$.#\n######".parse::<Level>().unwrap();
        assert_eq!(level.initial.player(), (1, 1));
        assert_eq!(level.initial.boxes(), &[(2, 1), (2, 2), (3, 2)]);
        assert_eq!(level.data.goals(), &[(1, 1), (2, 2), (4, 2)]);
    }

    #[test]
    fn test_alternative_floor_cells() {
        let level = "#####\n#@-$.#\n#____#\n######".parse::<Level>();
        assert!(level.is_ok());
    }

    #[test]
    fn test_rejects_malformed_levels() {
        let no_player = "#####\n# $.#\n#####".parse::<Level>().unwrap_err();
        assert!(no_player.to_string().contains("Missing player"));

        let two_players = "#####\n#@$@#\n#.  #\n#####".parse::<Level>().unwrap_err();
        assert!(two_players.to_string().contains("Multiple players"));

        let bad_cell = "#####\n#@$x#\n#.  #\n#####".parse::<Level>().unwrap_err();
        assert!(bad_cell.to_string().contains("Invalid cell"));

        let unbalanced = "#####\n#@$$#\n#.  #\n#####".parse::<Level>().unwrap_err();
        assert!(unbalanced.to_string().contains("does not match"));
    }

    #[test]
    fn test_missing_file() {
        let missing = Level::from_file("map_file/test/missing.txt", Precompute::default());
        assert!(missing.is_err());
    }
}
