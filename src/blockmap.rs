//! The blockmap: a coarse grid over the level, each cell listing the lines that touch it and the
//! things whose centers are in it.

use fixed::{Fixed, FRACBITS, FRACUNIT};
use map::{Handle, Level, Line};
use mobj::MobjId;

pub const MAPBLOCKUNITS: i32 = 128;
pub const MAPBLOCKSIZE: Fixed = MAPBLOCKUNITS * FRACUNIT;
pub const MAPBLOCKSHIFT: u32 = FRACBITS + 7;
pub const MAPBMASK: Fixed = MAPBLOCKSIZE - 1;
pub const MAPBTOFRAC: u32 = MAPBLOCKSHIFT - FRACBITS;

pub struct Blockmap {
    pub orgx: Fixed,
    pub orgy: Fixed,
    pub width: i32,
    pub height: i32,
    lines: Vec<Vec<Handle<Line>>>,
    things: Vec<Vec<MobjId>>,
}

impl Blockmap {
    pub fn empty() -> Blockmap {
        Blockmap::new(0, 0, 0, 0)
    }

    pub fn new(orgx: Fixed, orgy: Fixed, width: i32, height: i32) -> Blockmap {
        let cells = (width.max(0) * height.max(0)) as usize;
        Blockmap {
            orgx,
            orgy,
            width,
            height,
            lines: vec![Vec::new(); cells],
            things: vec![Vec::new(); cells],
        }
    }

    /// Build from an already-parsed cell list, in row-major order starting at the bottom left.
    pub fn from_cells(orgx: Fixed, orgy: Fixed, width: i32, height: i32, cells: Vec<Vec<Handle<Line>>>) -> Blockmap {
        let mut blockmap = Blockmap::new(orgx, orgy, width, height);
        for (slot, cell) in blockmap.lines.iter_mut().zip(cells.into_iter()) {
            *slot = cell;
        }
        blockmap
    }

    /// Build a blockmap covering every vertex in the level.  A line is listed in every cell its
    /// segment passes through; lines lying exactly along a cell edge end up in both neighbors.
    pub fn generate(level: &Level) -> Blockmap {
        let bbox = level.bbox();
        if bbox.is_empty() {
            return Blockmap::empty();
        }

        // Align the origin to whole map units, like the lump format does
        let orgx = bbox.left & !(FRACUNIT - 1);
        let orgy = bbox.bottom & !(FRACUNIT - 1);
        let width = (bbox.right.wrapping_sub(orgx) >> MAPBLOCKSHIFT) + 1;
        let height = (bbox.top.wrapping_sub(orgy) >> MAPBLOCKSHIFT) + 1;
        let mut blockmap = Blockmap::new(orgx, orgy, width, height);

        for (i, line) in level.iter_lines().enumerate() {
            let v1 = level.vertex(line.v1);
            let bx0 = blockmap.block_x(line.bbox.left);
            let bx1 = blockmap.block_x(line.bbox.right);
            let by0 = blockmap.block_y(line.bbox.bottom);
            let by1 = blockmap.block_y(line.bbox.top);
            for by in by0 ..= by1 {
                for bx in bx0 ..= bx1 {
                    let left = orgx + (bx << MAPBLOCKSHIFT);
                    let bottom = orgy + (by << MAPBLOCKSHIFT);
                    let corners = [
                        (left, bottom),
                        (left + MAPBLOCKSIZE, bottom),
                        (left, bottom + MAPBLOCKSIZE),
                        (left + MAPBLOCKSIZE, bottom + MAPBLOCKSIZE),
                    ];
                    // The line's box already overlaps this cell, so the segment touches it unless
                    // every corner is strictly on the same side
                    let mut sides = corners.iter().map(|&(cx, cy)| {
                        let cross = line.dy as i64 * (cx as i64 - v1.x as i64)
                            - line.dx as i64 * (cy as i64 - v1.y as i64);
                        cross.signum()
                    });
                    let first = sides.next().unwrap_or(0);
                    let crossed = first == 0 || sides.any(|s| s != first);
                    if crossed {
                        let index = blockmap.index(bx, by);
                        if let Some(index) = index {
                            blockmap.lines[index].push(i.into());
                        }
                    }
                }
            }
        }

        blockmap
    }

    #[inline]
    pub fn block_x(&self, x: Fixed) -> i32 {
        x.wrapping_sub(self.orgx) >> MAPBLOCKSHIFT
    }

    #[inline]
    pub fn block_y(&self, y: Fixed) -> i32 {
        y.wrapping_sub(self.orgy) >> MAPBLOCKSHIFT
    }

    pub fn contains(&self, bx: i32, by: i32) -> bool {
        bx >= 0 && by >= 0 && bx < self.width && by < self.height
    }

    fn index(&self, bx: i32, by: i32) -> Option<usize> {
        if self.contains(bx, by) {
            Some((by * self.width + bx) as usize)
        }
        else {
            None
        }
    }

    /// Lines touching a cell.  Cells off the edge of the map are empty.
    pub fn lines_in(&self, bx: i32, by: i32) -> &[Handle<Line>] {
        match self.index(bx, by) {
            Some(i) => &self.lines[i],
            None => &[],
        }
    }

    /// Things whose centers are in a cell.
    pub fn things_in(&self, bx: i32, by: i32) -> &[MobjId] {
        match self.index(bx, by) {
            Some(i) => &self.things[i],
            None => &[],
        }
    }

    /// Link a thing into the cell containing (x, y).  Returns false if that's off the map, in
    /// which case the thing simply isn't findable by traces.
    pub fn link_thing(&mut self, id: MobjId, x: Fixed, y: Fixed) -> bool {
        let (bx, by) = (self.block_x(x), self.block_y(y));
        match self.index(bx, by) {
            Some(i) => {
                self.things[i].push(id);
                true
            }
            None => false,
        }
    }

    pub fn unlink_thing(&mut self, id: MobjId, x: Fixed, y: Fixed) {
        let (bx, by) = (self.block_x(x), self.block_y(y));
        if let Some(i) = self.index(bx, by) {
            if let Some(pos) = self.things[i].iter().position(|&other| other == id) {
                // Keep the order stable; traces visit things in link order
                self.things[i].remove(pos);
            }
        }
    }

    pub fn num_cells(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::to_fixed;

    #[test]
    fn generated_cells_cover_a_diagonal() {
        let mut level = Level::new();
        let sector = level.add_sector(0, to_fixed(128));
        let side = level.add_side(sector);
        let a = level.add_vertex(0, 0);
        let b = level.add_vertex(to_fixed(383), to_fixed(383));
        let line = level.add_line(a, b, Some(side), None);
        let blockmap = Blockmap::generate(&level);

        assert_eq!(blockmap.width, 3);
        assert_eq!(blockmap.height, 3);
        for i in 0 .. 3 {
            assert_eq!(blockmap.lines_in(i, i), &[line]);
        }
        // A diagonal only clips the corners of its off-diagonal neighbors, if that
        assert!(blockmap.lines_in(2, 0).is_empty());
        assert!(blockmap.lines_in(0, 2).is_empty());
    }

    #[test]
    fn out_of_bounds_cells_are_empty() {
        let blockmap = Blockmap::new(0, 0, 2, 2);
        assert!(blockmap.lines_in(-1, 0).is_empty());
        assert!(blockmap.lines_in(0, 2).is_empty());
        assert!(blockmap.things_in(5, 5).is_empty());
    }

    #[test]
    fn thing_links_follow_position() {
        let mut blockmap = Blockmap::new(0, 0, 4, 4);
        let id = MobjId::new(3, 1);
        assert!(blockmap.link_thing(id, to_fixed(300), to_fixed(10)));
        assert_eq!(blockmap.things_in(2, 0), &[id]);
        blockmap.unlink_thing(id, to_fixed(300), to_fixed(10));
        assert!(blockmap.things_in(2, 0).is_empty());
        assert!(!blockmap.link_thing(id, to_fixed(-1), 0));
    }
}
