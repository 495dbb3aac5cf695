//! ASCII maze shared by the demo binaries.
//!
//! Legend: `#` wall, `.` floor, `~` mud (costs extra to enter), `S` start,
//! `G` goal. Rows must all have the same width.

use std::fmt::Write as _;

use lodestar_paths::{Graph, Heuristic};

/// Cost of entering a mud tile on top of the step itself.
pub const MUD_WEIGHT: f32 = 3.0;

pub const DEFAULT_MAZE: &str = "\
##########################
#S.....#.........#.......#
#.####.#.#######.#.#####.#
#.#....#.#.....#...#...#.#
#.#.####.#.###.#####.#.#.#
#.#......#.#~#.......#...#
#.########.#~#########.###
#..........#~~~~~~~~~#..G#
##########################";

/// A grid position: `(x, y)`, origin top-left.
pub type Tile = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terrain {
    Wall,
    Floor,
    Mud,
}

/// Parsed maze. Every passage is two-way, so its adjacency serves both
/// backward and forward searches.
#[derive(Debug, Clone)]
pub struct Maze {
    width: i32,
    height: i32,
    terrain: Vec<Terrain>,
    start: Tile,
    goal: Tile,
}

/// Errors that can occur when parsing a maze.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze: row {row} has width {found}, expected {expected}")]
    InconsistentWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("maze: unknown tile {ch:?} at ({x}, {y})")]
    InvalidTile { ch: char, x: i32, y: i32 },
    #[error("maze: no start tile 'S'")]
    MissingStart,
    #[error("maze: no goal tile 'G'")]
    MissingGoal,
}

impl Maze {
    pub fn parse(s: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = s.trim().lines().collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut terrain = Vec::with_capacity(width * rows.len());
        let mut start = None;
        let mut goal = None;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MazeError::InconsistentWidth {
                    row: y,
                    found,
                    expected: width,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let pos = (x as i32, y as i32);
                let t = match ch {
                    '#' => Terrain::Wall,
                    '.' => Terrain::Floor,
                    '~' => Terrain::Mud,
                    'S' => {
                        start = Some(pos);
                        Terrain::Floor
                    }
                    'G' => {
                        goal = Some(pos);
                        Terrain::Floor
                    }
                    _ => {
                        return Err(MazeError::InvalidTile {
                            ch,
                            x: pos.0,
                            y: pos.1,
                        });
                    }
                };
                terrain.push(t);
            }
        }

        Ok(Self {
            width: width as i32,
            height: rows.len() as i32,
            terrain,
            start: start.ok_or(MazeError::MissingStart)?,
            goal: goal.ok_or(MazeError::MissingGoal)?,
        })
    }

    pub fn start(&self) -> Tile {
        self.start
    }

    pub fn goal(&self) -> Tile {
        self.goal
    }

    fn terrain(&self, (x, y): Tile) -> Terrain {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return Terrain::Wall;
        }
        self.terrain[(y * self.width + x) as usize]
    }

    /// Render the maze with `path` drawn as `*` (endpoints keep their
    /// letters).
    pub fn render(&self, path: &[Tile]) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let p = (x, y);
                let ch = if p == self.start {
                    'S'
                } else if p == self.goal {
                    'G'
                } else if path.contains(&p) {
                    '*'
                } else {
                    match self.terrain(p) {
                        Terrain::Wall => '#',
                        Terrain::Floor => '.',
                        Terrain::Mud => '~',
                    }
                };
                out.push(ch);
            }
            let _ = writeln!(out);
        }
        out
    }
}

impl Graph<Tile> for Maze {
    fn count(&self) -> usize {
        self.terrain.len()
    }

    fn neighbours(&self, &(x, y): &Tile, buf: &mut Vec<Tile>) {
        for p in [(x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)] {
            if self.terrain(p) != Terrain::Wall {
                buf.push(p);
            }
        }
    }
}

impl Heuristic<Tile> for Maze {
    /// Manhattan distance: exact for neighbours, admissible otherwise.
    fn distance(&self, a: &Tile, b: &Tile) -> f32 {
        ((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f32
    }

    fn weight(&self, p: &Tile) -> f32 {
        match self.terrain(*p) {
            Terrain::Mud => MUD_WEIGHT,
            _ => 0.0,
        }
    }
}
