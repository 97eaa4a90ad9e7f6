use crate::coords::MatrixPosition;

/// Boolean matrix over the level, one flag per tile.
///
/// Out-of-range reads report `true` so searches and walkers treat the map
/// edge as a wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGrid {
    pub width: usize,
    pub height: usize,
    cells: Vec<bool>,
}

impl CollisionGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn in_bounds(&self, position: MatrixPosition) -> bool {
        self.index(position.x, position.y).is_some()
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map_or(true, |i| self.cells[i])
    }

    pub fn is_blocked(&self, position: MatrixPosition) -> bool {
        self.get(position.x, position.y)
    }

    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    /// Build from rows where `#` marks a blocked cell
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                grid.set(x as i32, y as i32, c == '#');
            }
        }
        grid
    }
}
