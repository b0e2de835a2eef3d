//! Stepping a ray through blockmap cells, nearest cell first.

use blockmap::{Blockmap, MAPBLOCKSHIFT, MAPBLOCKSIZE, MAPBTOFRAC};
use divline::Divline;
use fixed::{Fixed, FRACBITS, FRACUNIT, fixed_div, fixed_mul};

/// Hard cap on cells visited by one trace.  The stepping can be thrown off by rounding, and this
/// is what stops it from wandering forever.
pub const MAX_BLOCK_STEPS: u32 = 64;

/// Iterator over the cells a ray passes through, in order from the start point.  Cells are
/// yielded even if they're off the edge of the blockmap; looking them up just finds nothing.
#[derive(Clone, Debug)]
pub struct BlockWalk {
    mapx: i32,
    mapy: i32,
    endx: i32,
    endy: i32,
    mapxstep: i32,
    mapystep: i32,
    xstep: Fixed,
    ystep: Fixed,
    xintercept: Fixed,
    yintercept: Fixed,
    steps: u32,
    finished: bool,
}

/// Set up a trace from (x1, y1) to (x2, y2).  Returns the trace line, which may start slightly off
/// the given point, and the cell walk.
pub fn trace_blocks(blockmap: &Blockmap, mut x1: Fixed, mut y1: Fixed, x2: Fixed, y2: Fixed) -> (Divline, BlockWalk) {
    // Never start exactly on a cell boundary
    if (x1.wrapping_sub(blockmap.orgx) & (MAPBLOCKSIZE - 1)) == 0 {
        x1 = x1.wrapping_add(FRACUNIT);
    }
    if (y1.wrapping_sub(blockmap.orgy) & (MAPBLOCKSIZE - 1)) == 0 {
        y1 = y1.wrapping_add(FRACUNIT);
    }
    let trace = Divline::new(x1, y1, x2.wrapping_sub(x1), y2.wrapping_sub(y1));

    let x1 = x1.wrapping_sub(blockmap.orgx);
    let y1 = y1.wrapping_sub(blockmap.orgy);
    let x2 = x2.wrapping_sub(blockmap.orgx);
    let y2 = y2.wrapping_sub(blockmap.orgy);
    let xt1 = x1 >> MAPBLOCKSHIFT;
    let yt1 = y1 >> MAPBLOCKSHIFT;
    let xt2 = x2 >> MAPBLOCKSHIFT;
    let yt2 = y2 >> MAPBLOCKSHIFT;

    let (mapxstep, partial, ystep) =
        if xt2 > xt1 {
            (1, FRACUNIT - ((x1 >> MAPBTOFRAC) & (FRACUNIT - 1)), fixed_div(y2.wrapping_sub(y1), x2.wrapping_sub(x1).wrapping_abs()))
        }
        else if xt2 < xt1 {
            (-1, (x1 >> MAPBTOFRAC) & (FRACUNIT - 1), fixed_div(y2.wrapping_sub(y1), x2.wrapping_sub(x1).wrapping_abs()))
        }
        else {
            (0, FRACUNIT, 256 * FRACUNIT)
        };
    let yintercept = (y1 >> MAPBTOFRAC).wrapping_add(fixed_mul(partial, ystep));

    let (mapystep, partial, xstep) =
        if yt2 > yt1 {
            (1, FRACUNIT - ((y1 >> MAPBTOFRAC) & (FRACUNIT - 1)), fixed_div(x2.wrapping_sub(x1), y2.wrapping_sub(y1).wrapping_abs()))
        }
        else if yt2 < yt1 {
            (-1, (y1 >> MAPBTOFRAC) & (FRACUNIT - 1), fixed_div(x2.wrapping_sub(x1), y2.wrapping_sub(y1).wrapping_abs()))
        }
        else {
            (0, FRACUNIT, 256 * FRACUNIT)
        };
    let xintercept = (x1 >> MAPBTOFRAC).wrapping_add(fixed_mul(partial, xstep));

    let walk = BlockWalk {
        mapx: xt1,
        mapy: yt1,
        endx: xt2,
        endy: yt2,
        mapxstep,
        mapystep,
        xstep,
        ystep,
        xintercept,
        yintercept,
        steps: 0,
        finished: false,
    };
    (trace, walk)
}

impl BlockWalk {
    pub fn start_cell(&self) -> (i32, i32) {
        (self.mapx, self.mapy)
    }

    pub fn end_cell(&self) -> (i32, i32) {
        (self.endx, self.endy)
    }

    /// Whether both ends of the ray are inside the blockmap.
    pub fn endpoints_in(&self, blockmap: &Blockmap) -> bool {
        blockmap.contains(self.mapx, self.mapy) && blockmap.contains(self.endx, self.endy)
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// True if the walk got to the end cell, rather than running out of steps.
    pub fn reached_end(&self) -> bool {
        self.finished
    }
}

impl Iterator for BlockWalk {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.finished {
            return None;
        }
        if self.steps >= MAX_BLOCK_STEPS {
            debug!("block walk gave up after {} cells, short of ({}, {})", self.steps, self.endx, self.endy);
            return None;
        }
        self.steps += 1;

        let cell = (self.mapx, self.mapy);
        if cell == (self.endx, self.endy) {
            self.finished = true;
            return Some(cell);
        }

        if (self.yintercept >> FRACBITS) == self.mapy {
            self.yintercept = self.yintercept.wrapping_add(self.ystep);
            self.mapx += self.mapxstep;
        }
        else if (self.xintercept >> FRACBITS) == self.mapx {
            self.xintercept = self.xintercept.wrapping_add(self.xstep);
            self.mapy += self.mapystep;
        }
        return Some(cell);
    }
}
