//! Static terrain: what each cell is made of and what it costs to enter.

use rustc_hash::FxHashMap;

use cb_core::{GridCell, RegionId, REGION_SIZE};

use crate::{SpatialError, SpatialResult};

const CELLS_PER_REGION: usize = REGION_SIZE as usize * REGION_SIZE as usize;

/// What a single cell is made of.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Plain,
    /// Passable but slow.
    Swamp,
    Wall,
}

impl Tile {
    /// Base cost of entering a cell of this kind.  `None` for walls.
    #[inline]
    pub fn move_cost(self) -> Option<u32> {
        match self {
            Tile::Plain => Some(2),
            Tile::Swamp => Some(10),
            Tile::Wall  => None,
        }
    }
}

/// Read-only terrain lookup.  Implemented by the host for the live world.
pub trait Terrain {
    fn tile(&self, cell: GridCell) -> Tile;

    #[inline]
    fn is_passable(&self, cell: GridCell) -> bool {
        self.tile(cell) != Tile::Wall
    }
}

// ── TerrainGrid ───────────────────────────────────────────────────────────────

/// In-memory terrain, one dense tile array per known region.
///
/// Cells in unknown regions or outside the region bounds read as `Wall`.
#[derive(Clone, Debug, Default)]
pub struct TerrainGrid {
    regions: FxHashMap<RegionId, Vec<Tile>>,
}

impl TerrainGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `region` filled with plain ground.  No-op if it already exists.
    pub fn add_region(&mut self, region: RegionId) -> &mut Self {
        self.regions
            .entry(region)
            .or_insert_with(|| vec![Tile::Plain; CELLS_PER_REGION]);
        self
    }

    /// Overwrite one cell, creating its region if needed.
    pub fn set(&mut self, cell: GridCell, tile: Tile) -> &mut Self {
        if cell.in_bounds() {
            self.add_region(cell.region);
            if let Some(tiles) = self.regions.get_mut(&cell.region) {
                tiles[index(cell)] = tile;
            }
        }
        self
    }

    /// Build a region from ASCII rows: `.` plain, `~` swamp, `#` wall.
    ///
    /// Rows shorter than the region, and missing rows, are plain.
    pub fn from_rows(region: RegionId, rows: &[&str]) -> SpatialResult<Self> {
        let mut grid = Self::new();
        grid.add_region(region);
        if rows.len() > REGION_SIZE as usize {
            return Err(SpatialError::Parse(format!("{} rows exceed region height", rows.len())));
        }
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() > REGION_SIZE as usize {
                return Err(SpatialError::Parse(format!("row {y} exceeds region width")));
            }
            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '.' => Tile::Plain,
                    '~' => Tile::Swamp,
                    '#' => Tile::Wall,
                    other => {
                        return Err(SpatialError::Parse(format!(
                            "unexpected {other:?} at ({x}, {y}): expected '.', '~' or '#'"
                        )));
                    }
                };
                grid.set(GridCell::new(region, x as u8, y as u8), tile);
            }
        }
        Ok(grid)
    }
}

impl Terrain for TerrainGrid {
    fn tile(&self, cell: GridCell) -> Tile {
        if !cell.in_bounds() {
            return Tile::Wall;
        }
        self.regions
            .get(&cell.region)
            .map_or(Tile::Wall, |tiles| tiles[index(cell)])
    }
}

#[inline]
fn index(cell: GridCell) -> usize {
    cell.y as usize * REGION_SIZE as usize + cell.x as usize
}
