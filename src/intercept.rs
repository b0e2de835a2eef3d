//! Scratch state shared by every ray trace: the per-line visit stamps and the intercept buffer.
//! Each world owns one of these, so independent worlds never share trace state.

use fixed::{Fixed, FIXED_MAX};
use map::{Handle, Line};
use mobj::MobjId;

pub const DEFAULT_MAX_INTERCEPTS: usize = 512;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InterceptTarget {
    Line(Handle<Line>),
    Thing(MobjId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Intercept {
    /// How far along the trace, 0 at the start and FRACUNIT at the end
    pub frac: Fixed,
    pub target: InterceptTarget,
}

/// Bounded intercept storage.  Once full it refuses further intercepts for the rest of the trace
/// instead of growing.
pub struct InterceptBuffer {
    items: Vec<Intercept>,
    capacity: usize,
    overflowed: bool,
    remaining: usize,
}

impl InterceptBuffer {
    pub fn with_capacity(capacity: usize) -> InterceptBuffer {
        InterceptBuffer {
            items: Vec::with_capacity(capacity),
            capacity,
            overflowed: false,
            remaining: 0,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.overflowed = false;
        self.remaining = 0;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Add an intercept.  Returns false, and logs once per trace, if the buffer is full.
    pub fn push(&mut self, frac: Fixed, target: InterceptTarget) -> bool {
        if self.items.len() >= self.capacity {
            if !self.overflowed {
                warn!("intercept buffer full at {} entries; ignoring the rest of this trace's intercepts", self.capacity);
                self.overflowed = true;
            }
            return false;
        }
        self.items.push(Intercept{ frac, target });
        return true;
    }

    pub fn iter_mut(&mut self) -> ::std::slice::IterMut<Intercept> {
        self.items.iter_mut()
    }

    /// Start handing out intercepts nearest-first.
    pub fn begin_traversal(&mut self) {
        self.remaining = self.items.len();
    }

    /// The nearest intercept not yet handed out, as long as it's no farther than `maxfrac`.
    /// Each one is handed out once; it's marked by pushing its distance to the maximum.
    pub fn next_nearest(&mut self, maxfrac: Fixed) -> Option<Intercept> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let mut best: Option<usize> = None;
        let mut dist = FIXED_MAX;
        for (i, item) in self.items.iter().enumerate() {
            if item.frac < dist {
                dist = item.frac;
                best = Some(i);
            }
        }

        let index = best?;
        if dist > maxfrac {
            self.remaining = 0;
            return None;
        }
        let found = self.items[index];
        self.items[index].frac = FIXED_MAX;
        return Some(found);
    }
}

/// Per-line "already looked at this trace" stamps.  Every trace gets a fresh generation, so
/// nothing ever needs clearing between traces.
pub struct VisitStamps {
    stamps: Vec<u32>,
    generation: u32,
}

impl VisitStamps {
    pub fn new() -> VisitStamps {
        VisitStamps{ stamps: Vec::new(), generation: 0 }
    }

    /// Begin a new trace over a level with `numlines` lines.
    pub fn begin(&mut self, numlines: usize) {
        if self.stamps.len() != numlines {
            self.stamps = vec![0; numlines];
            self.generation = 0;
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped all the way around; old stamps could collide now
            for stamp in self.stamps.iter_mut() {
                *stamp = 0;
            }
            self.generation = 1;
        }
    }

    /// Mark a line visited.  Returns false if it had already been visited during this trace.
    pub fn visit(&mut self, line: Handle<Line>) -> bool {
        match self.stamps.get_mut(line.index()) {
            Some(stamp) if *stamp == self.generation => false,
            Some(stamp) => {
                *stamp = self.generation;
                true
            }
            None => false,
        }
    }
}

pub struct TraceScratch {
    pub stamps: VisitStamps,
    pub intercepts: InterceptBuffer,
}

impl TraceScratch {
    pub fn new(max_intercepts: usize) -> TraceScratch {
        TraceScratch {
            stamps: VisitStamps::new(),
            intercepts: InterceptBuffer::with_capacity(max_intercepts),
        }
    }
}
