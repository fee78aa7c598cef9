//! The building: an ordered, fixed-size array of floors.

use crate::{BuildingError, BuildingResult, Floor};

/// A building with `floor_count` floors, indexed from 0 (the lobby).
///
/// Floors are created with the building and never destroyed.  No motion
/// lives here; the building only tracks who is waiting or staying where.
#[derive(Debug, Clone)]
pub struct Building {
    floors: Vec<Floor>,
}

impl Building {
    pub fn new(floor_count: u32) -> BuildingResult<Self> {
        if floor_count < 1 {
            return Err(BuildingError::EmptyBuilding);
        }
        Ok(Self {
            floors: (0..floor_count).map(Floor::new).collect(),
        })
    }

    #[inline]
    pub fn floor_count(&self) -> u32 {
        self.floors.len() as u32
    }

    /// Bounds-checked floor access.
    pub fn get_floor(&self, index: u32) -> BuildingResult<&Floor> {
        self.floors
            .get(index as usize)
            .ok_or(BuildingError::FloorOutOfRange {
                floor: index,
                count: self.floor_count(),
            })
    }

    pub fn get_floor_mut(&mut self, index: u32) -> BuildingResult<&mut Floor> {
        let count = self.floor_count();
        self.floors
            .get_mut(index as usize)
            .ok_or(BuildingError::FloorOutOfRange { floor: index, count })
    }

    /// Read-only view of all floors in index order (for snapshots).
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }
}
