//! Line of sight between two things.
//!
//! A sight check first asks the reject table, which can rule a pair out instantly.  Otherwise it
//! walks the blockmap along the ray collecting every line the ray crosses, bailing as soon as it
//! hits a solid wall, then goes back over the collected lines nearest-first and narrows the cone
//! of visible slopes through each opening.

use divline::{Divline, intercept_vector};
use fixed::{Fixed, FIXED_MAX, fixed_div};
use intercept::{InterceptTarget, TraceScratch};
use map::{Level, Line};
use blockwalk::trace_blocks;
use mobj::MobjId;
use world::World;

/// The range of vertical slopes, as seen from `startz`, that can still see the target.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SightCone {
    pub startz: Fixed,
    pub topslope: Fixed,
    pub bottomslope: Fixed,
}

impl SightCone {
    /// Narrow the cone through the opening of a two-sided line crossed `frac` of the way along the
    /// ray.  Returns false once nothing can get through.
    fn narrow(&mut self, level: &Level, line: &Line, frac: Fixed) -> bool {
        let opening = level.line_opening(line);
        if opening.bottom >= opening.top {
            return false;
        }

        let (front, back) = match (line.front_sector, line.back_sector) {
            (Some(front), Some(back)) => (level.sector(front), level.sector(back)),
            _ => { return false; }
        };
        if front.floorheight != back.floorheight {
            let slope = fixed_div(opening.bottom.wrapping_sub(self.startz), frac);
            if slope > self.bottomslope {
                self.bottomslope = slope;
            }
        }
        if front.ceilingheight != back.ceilingheight {
            let slope = fixed_div(opening.top.wrapping_sub(self.startz), frac);
            if slope < self.topslope {
                self.topslope = slope;
            }
        }

        return self.topslope > self.bottomslope;
    }
}

/// Collect the lines in one cell that the trace crosses.  Returns false on a solid wall or a shut
/// door, either of which blocks sight no matter where along the ray it is.
fn sight_block_lines(level: &Level, scratch: &mut TraceScratch, trace: &Divline, bx: i32, by: i32) -> bool {
    for &handle in level.blockmap.lines_in(bx, by) {
        if !scratch.stamps.visit(handle) {
            continue;
        }

        let line = level.line(handle);
        let v1 = level.vertex(line.v1);
        let v2 = level.vertex(line.v2);
        if trace.point_on_side(v1.x, v1.y) == trace.point_on_side(v2.x, v2.y) {
            continue;
        }
        let dl = Divline::from_line(level, line);
        if dl.point_on_side(trace.x, trace.y) == dl.point_on_side(trace.end_x(), trace.end_y()) {
            continue;
        }

        if line.is_one_sided() {
            return false;
        }
        let opening = level.line_opening(line);
        if opening.bottom >= opening.top {
            return false;
        }

        // The distance is filled in once the walk is done
        scratch.intercepts.push(0, InterceptTarget::Line(handle));
    }
    return true;
}

impl World {
    /// Whether `looker`'s eyes can see any part of `target`.  Things that no longer exist can't
    /// see or be seen.
    pub fn check_sight(&mut self, looker: MobjId, target: MobjId) -> bool {
        let (t1, t2) = match (self.mobjs.get(looker), self.mobjs.get(target)) {
            (Some(t1), Some(t2)) => (t1, t2),
            _ => { return false; }
        };

        if let (Some(s1), Some(s2)) = (self.sector_of(t1), self.sector_of(t2)) {
            if self.level.reject.is_rejected(s1.index(), s2.index()) {
                trace!("sight {:?} -> {:?} rejected outright", looker, target);
                return false;
            }
        }

        let startz = t1.z.wrapping_add(t1.height).wrapping_sub(t1.height >> 2);
        let mut cone = SightCone {
            startz,
            topslope: t2.z.wrapping_add(t2.height).wrapping_sub(startz),
            bottomslope: t2.z.wrapping_sub(startz),
        };
        let (x1, y1, x2, y2) = (t1.x, t1.y, t2.x, t2.y);
        return self.sight_path_traverse(x1, y1, x2, y2, &mut cone);
    }

    /// Trace from (x1, y1) to (x2, y2), narrowing `cone` through every opening along the way.
    /// True if the cone never closes.
    pub fn sight_path_traverse(&mut self, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed, cone: &mut SightCone) -> bool {
        let level = &self.level;
        let scratch = &mut self.scratch;
        scratch.stamps.begin(level.num_lines());
        scratch.intercepts.clear();

        let (trace, walk) = trace_blocks(&level.blockmap, x1, y1, x2, y2);
        // Points should never be off the map, but check once here instead of in every cell
        if !walk.endpoints_in(&level.blockmap) {
            return false;
        }
        for (bx, by) in walk {
            if !sight_block_lines(level, scratch, &trace, bx, by) {
                return false;
            }
        }

        // Cells hand back lines in whatever order they were stored, so go over them again in
        // order of distance
        for intercept in scratch.intercepts.iter_mut() {
            if let InterceptTarget::Line(handle) = intercept.target {
                intercept.frac = intercept_vector(&trace, &Divline::from_line(level, level.line(handle)));
            }
        }
        scratch.intercepts.begin_traversal();
        while let Some(intercept) = scratch.intercepts.next_nearest(FIXED_MAX) {
            if let InterceptTarget::Line(handle) = intercept.target {
                if !cone.narrow(level, level.line(handle), intercept.frac) {
                    return false;
                }
            }
        }
        return true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::to_fixed;
    use info::MobjType;
    use rules::GameConfig;
    use world::ONFLOORZ;

    /// A 1024-wide room split down the middle at x = 0 by a two-sided line into sectors 0 (west)
    /// and 1 (east).
    fn split_room(east_floor: i32, east_ceiling: i32) -> World {
        let mut level = Level::new();
        let west = level.add_sector(0, to_fixed(128));
        let east = level.add_sector(to_fixed(east_floor), to_fixed(east_ceiling));
        let wside = level.add_side(west);
        let eside = level.add_side(east);
        let nw = level.add_vertex(to_fixed(-512), to_fixed(512));
        let n = level.add_vertex(0, to_fixed(512));
        let ne = level.add_vertex(to_fixed(512), to_fixed(512));
        let se = level.add_vertex(to_fixed(512), to_fixed(-512));
        let s = level.add_vertex(0, to_fixed(-512));
        let sw = level.add_vertex(to_fixed(-512), to_fixed(-512));
        level.add_line(sw, nw, Some(wside), None);
        level.add_line(nw, n, Some(wside), None);
        level.add_line(n, ne, Some(eside), None);
        level.add_line(ne, se, Some(eside), None);
        level.add_line(se, s, Some(eside), None);
        level.add_line(s, sw, Some(wside), None);
        // Runs south, so west is the front
        level.add_line(n, s, Some(wside), Some(eside));
        level.add_subsector(west);
        level.add_subsector(east);
        level.add_node(::bsp::Node {
            x: 0,
            y: to_fixed(512),
            dx: 0,
            dy: to_fixed(-1024),
            bbox: [::geom::BBox::empty(), ::geom::BBox::empty()],
            children: [::bsp::NodeChild::Subsector(0), ::bsp::NodeChild::Subsector(1)],
        });
        level.reject = ::reject::Reject::all_visible(2);
        level.generate_blockmap();
        World::new(level, GameConfig::default())
    }

    #[test]
    fn sees_through_an_open_line() {
        let mut world = split_room(0, 128);
        let a = world.spawn_mobj(to_fixed(-300), to_fixed(10), ONFLOORZ, MobjType::Troop);
        let b = world.spawn_mobj(to_fixed(300), to_fixed(-10), ONFLOORZ, MobjType::Troop);
        assert!(world.check_sight(a, b));
        assert!(world.check_sight(b, a));
    }

    #[test]
    fn shut_door_blocks() {
        let mut world = split_room(0, 0);
        let a = world.spawn_mobj(to_fixed(-300), to_fixed(10), ONFLOORZ, MobjType::Troop);
        let b = world.spawn_mobj(to_fixed(300), to_fixed(-10), 0, MobjType::Troop);
        assert!(!world.check_sight(a, b));
    }

    #[test]
    fn high_ledge_hides_a_short_target() {
        // The east floor is a 100-unit step up; something standing at the foot of it on the far
        // side can't be seen over the lip from far away
        let mut world = split_room(100, 228);
        let a = world.spawn_mobj(to_fixed(-400), 0, ONFLOORZ, MobjType::Troop);
        let b = world.spawn_mobj(to_fixed(400), 0, 0, MobjType::Troop);
        assert!(!world.check_sight(a, b));
    }

    #[test]
    fn reject_short_circuits() {
        let mut world = split_room(0, 128);
        let a = world.spawn_mobj(to_fixed(-300), 0, ONFLOORZ, MobjType::Troop);
        let b = world.spawn_mobj(to_fixed(300), 0, ONFLOORZ, MobjType::Troop);
        world.level.reject.set_rejected(0, 1, true);
        assert!(!world.check_sight(a, b));
        assert!(world.check_sight(b, a));
    }

    #[test]
    fn removed_things_are_never_seen() {
        let mut world = split_room(0, 128);
        let a = world.spawn_mobj(to_fixed(-300), 0, ONFLOORZ, MobjType::Troop);
        let b = world.spawn_mobj(to_fixed(300), 0, ONFLOORZ, MobjType::Troop);
        world.remove_mobj(b);
        assert!(!world.check_sight(a, b));
    }
}
