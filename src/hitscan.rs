//! Instant-hit attacks: finding something to aim at, and shooting along a line.
//!
//! Both are built on `path_traverse`, which collects every line and thing along a ray and then
//! feeds them to a callback nearest-first until the callback says to stop.

use blockwalk::trace_blocks;
use divline::{Divline, intercept_vector};
use fixed::{Fixed, FRACBITS, FRACUNIT, fixed_div, fixed_mul};
use info::{MobjType, StateNum};
use intercept::{Intercept, InterceptTarget, TraceScratch};
use map::{Handle, Level, Line, LineFlags};
use mobj::{MobjArena, MobjFlags, MobjId};
use tables::Angle;
use world::World;

pub const MISSILERANGE: Fixed = 32 * 64 * FRACUNIT;
pub const MELEERANGE: Fixed = 64 * FRACUNIT;

/// Traces shorter than this in both directions test line sides against the real line, since the
/// trace itself is too short to give a reliable answer.
const SHORT_TRACE: Fixed = 16 * FRACUNIT;

bitflags! {
    pub struct PathFlags: u8 {
        const ADDLINES = 0x1;
        const ADDTHINGS = 0x2;
    }
}

fn add_line_intercepts(level: &Level, scratch: &mut TraceScratch, trace: &Divline, bx: i32, by: i32) {
    let short = trace.dx.wrapping_abs() <= SHORT_TRACE && trace.dy.wrapping_abs() <= SHORT_TRACE;
    for &handle in level.blockmap.lines_in(bx, by) {
        if !scratch.stamps.visit(handle) {
            continue;
        }

        let line = level.line(handle);
        let dl = Divline::from_line(level, line);
        let (s1, s2) =
            if short {
                (dl.point_on_side(trace.x, trace.y), dl.point_on_side(trace.end_x(), trace.end_y()))
            }
            else {
                let v1 = level.vertex(line.v1);
                let v2 = level.vertex(line.v2);
                (trace.point_on_side(v1.x, v1.y), trace.point_on_side(v2.x, v2.y))
            };
        if s1 == s2 {
            continue;
        }

        let frac = intercept_vector(trace, &dl);
        if frac < 0 {
            continue;
        }
        scratch.intercepts.push(frac, InterceptTarget::Line(handle));
    }
}

fn add_thing_intercepts(level: &Level, mobjs: &MobjArena, scratch: &mut TraceScratch, trace: &Divline, bx: i32, by: i32) {
    // Test against whichever diagonal of the bounding box crosses the trace
    let tracepositive = (trace.dx ^ trace.dy) > 0;
    for &id in level.blockmap.things_in(bx, by) {
        let thing = match mobjs.get(id) {
            Some(thing) => thing,
            None => { continue; }
        };
        let (x1, y1, x2, y2) =
            if tracepositive {
                (thing.x - thing.radius, thing.y + thing.radius, thing.x + thing.radius, thing.y - thing.radius)
            }
            else {
                (thing.x - thing.radius, thing.y - thing.radius, thing.x + thing.radius, thing.y + thing.radius)
            };
        if trace.point_on_side(x1, y1) == trace.point_on_side(x2, y2) {
            continue;
        }

        let dl = Divline::new(x1, y1, x2.wrapping_sub(x1), y2.wrapping_sub(y1));
        let frac = intercept_vector(trace, &dl);
        if frac < 0 {
            continue;
        }
        scratch.intercepts.push(frac, InterceptTarget::Thing(id));
    }
}

/// Running state of an aim.
struct Aim {
    shooter: MobjId,
    shootz: Fixed,
    range: Fixed,
    topslope: Fixed,
    bottomslope: Fixed,
    /// Skip fellow friends, unless they're players
    friend_filter: bool,
    shooter_friend: bool,
    target: Option<MobjId>,
    slope: Fixed,
}

/// Running state of a shot.
struct Shot {
    shooter: MobjId,
    shootz: Fixed,
    range: Fixed,
    slope: Fixed,
    damage: i32,
    /// Keep going after hitting a thing
    rip: bool,
}

impl World {
    /// Collect everything along the ray from (x1, y1) to (x2, y2), then hand it to `traverser`
    /// nearest-first.  Returns false if the traverser stopped early.  The traverser must not start another trace of its own.
    pub fn path_traverse<F>(&mut self, x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed, flags: PathFlags, mut traverser: F) -> bool
        where F: FnMut(&mut World, &Divline, Intercept) -> bool
    {
        let trace = {
            let World{ ref level, ref mobjs, ref mut scratch, .. } = *self;
            scratch.stamps.begin(level.num_lines());
            scratch.intercepts.clear();

            let (trace, walk) = trace_blocks(&level.blockmap, x1, y1, x2, y2);
            for (bx, by) in walk {
                if flags.contains(PathFlags::ADDLINES) {
                    add_line_intercepts(level, scratch, &trace, bx, by);
                }
                if flags.contains(PathFlags::ADDTHINGS) {
                    add_thing_intercepts(level, mobjs, scratch, &trace, bx, by);
                }
            }
            trace
        };

        self.scratch.intercepts.begin_traversal();
        while let Some(intercept) = self.scratch.intercepts.next_nearest(FRACUNIT) {
            if !traverser(self, &trace, intercept) {
                return false;
            }
        }
        return true;
    }

    /// Height a thing's attacks come from.
    fn shoot_z(&self, id: MobjId) -> Option<Fixed> {
        let mo = self.mobjs.get(id)?;
        Some(mo.z + (mo.height >> 1) + 8 * FRACUNIT)
    }

    /// Look along `angle` for the nearest shootable thing within `distance`.  Returns the slope to
    /// aim at it, or 0 if nothing turned up; the thing found is left in `linetarget` and the
    /// slope in `aim_slope`.
    pub fn aim_line_attack(&mut self, shooter: MobjId, angle: Angle, distance: Fixed, friend_filter: bool) -> Fixed {
        self.linetarget = None;
        self.aim_slope = 0;
        let (x1, y1, shooter_friend) = match self.mobjs.get(shooter) {
            Some(mo) => (mo.x, mo.y, mo.is_friend()),
            None => { return 0; }
        };
        let shootz = match self.shoot_z(shooter) {
            Some(z) => z,
            None => { return 0; }
        };
        let x2 = x1.wrapping_add((distance >> FRACBITS).wrapping_mul(angle.cos()));
        let y2 = y1.wrapping_add((distance >> FRACBITS).wrapping_mul(angle.sin()));

        let mut aim = Aim {
            shooter,
            shootz,
            range: distance,
            topslope: 100 * FRACUNIT / 160,
            bottomslope: -100 * FRACUNIT / 160,
            friend_filter,
            shooter_friend,
            target: None,
            slope: 0,
        };
        self.path_traverse(x1, y1, x2, y2, PathFlags::ADDLINES | PathFlags::ADDTHINGS,
            |world, _trace, intercept| world.aim_traverse(&mut aim, intercept));

        self.linetarget = aim.target;
        if aim.target.is_some() {
            self.aim_slope = aim.slope;
            return aim.slope;
        }
        return 0;
    }

    fn aim_traverse(&self, aim: &mut Aim, intercept: Intercept) -> bool {
        let dist = fixed_mul(aim.range, intercept.frac);
        match intercept.target {
            InterceptTarget::Line(handle) => {
                let line = self.level.line(handle);
                if !line.flags.contains(LineFlags::TWO_SIDED) || line.is_one_sided() {
                    return false;
                }
                let opening = self.level.line_opening(line);
                if opening.bottom >= opening.top {
                    return false;
                }
                let (front, back) = match (line.front_sector, line.back_sector) {
                    (Some(front), Some(back)) => (self.level.sector(front), self.level.sector(back)),
                    _ => { return false; }
                };
                if front.floorheight != back.floorheight {
                    let slope = fixed_div(opening.bottom - aim.shootz, dist);
                    if slope > aim.bottomslope {
                        aim.bottomslope = slope;
                    }
                }
                if front.ceilingheight != back.ceilingheight {
                    let slope = fixed_div(opening.top - aim.shootz, dist);
                    if slope < aim.topslope {
                        aim.topslope = slope;
                    }
                }
                return aim.topslope > aim.bottomslope;
            }
            InterceptTarget::Thing(id) => {
                if id == aim.shooter {
                    return true;
                }
                let th = match self.mobjs.get(id) {
                    Some(th) => th,
                    None => { return true; }
                };
                if !th.flags.contains(MobjFlags::SHOOTABLE) {
                    return true;
                }
                if aim.friend_filter && aim.shooter_friend && th.is_friend() && th.player.is_none() {
                    return true;
                }

                let mut thingtopslope = fixed_div(th.z + th.height - aim.shootz, dist);
                if thingtopslope < aim.bottomslope {
                    // Shot over it
                    return true;
                }
                let mut thingbottomslope = fixed_div(th.z - aim.shootz, dist);
                if thingbottomslope > aim.topslope {
                    // Shot under it
                    return true;
                }

                if thingtopslope > aim.topslope {
                    thingtopslope = aim.topslope;
                }
                if thingbottomslope < aim.bottomslope {
                    thingbottomslope = aim.bottomslope;
                }
                aim.slope = (thingtopslope + thingbottomslope) / 2;
                aim.target = Some(id);
                return false;
            }
        }
    }

    /// Fire a hitscan shot.  The first wall or thing in the way takes the hit: walls get a puff,
    /// things get blood (or a puff) and `damage`.
    pub fn line_attack(&mut self, shooter: MobjId, angle: Angle, distance: Fixed, slope: Fixed, damage: i32) {
        self.trace_attack(shooter, angle, distance, slope, damage, false);
    }

    /// Like `line_attack`, but the shot carries on through every thing it hits until it reaches a
    /// wall or runs out of range.
    pub fn rip_attack(&mut self, shooter: MobjId, angle: Angle, distance: Fixed, slope: Fixed, damage: i32) {
        self.trace_attack(shooter, angle, distance, slope, damage, true);
    }

    fn trace_attack(&mut self, shooter: MobjId, angle: Angle, distance: Fixed, slope: Fixed, damage: i32, rip: bool) {
        let (x1, y1) = match self.mobjs.get(shooter) {
            Some(mo) => (mo.x, mo.y),
            None => { return; }
        };
        let shootz = match self.shoot_z(shooter) {
            Some(z) => z,
            None => { return; }
        };
        let x2 = x1.wrapping_add((distance >> FRACBITS).wrapping_mul(angle.cos()));
        let y2 = y1.wrapping_add((distance >> FRACBITS).wrapping_mul(angle.sin()));

        let shot = Shot{ shooter, shootz, range: distance, slope, damage, rip };
        self.path_traverse(x1, y1, x2, y2, PathFlags::ADDLINES | PathFlags::ADDTHINGS,
            |world, trace, intercept| world.shoot_traverse(&shot, trace, intercept));
    }

    fn shoot_traverse(&mut self, shot: &Shot, trace: &Divline, intercept: Intercept) -> bool {
        match intercept.target {
            InterceptTarget::Line(handle) => {
                if self.level.line(handle).special != 0 {
                    self.events.push(::world::GameEvent::LineShot{ line: handle, by: shot.shooter });
                }
                if self.shot_passes_line(shot, handle, intercept.frac) {
                    return true;
                }

                // Back the puff off the wall a little
                let frac = intercept.frac - fixed_div(4 * FRACUNIT, shot.range);
                let x = trace.x + fixed_mul(trace.dx, frac);
                let y = trace.y + fixed_mul(trace.dy, frac);
                let z = shot.shootz + fixed_mul(shot.slope, fixed_mul(frac, shot.range));
                self.spawn_puff(x, y, z, shot.range == MELEERANGE);
                return false;
            }
            InterceptTarget::Thing(id) => {
                if id == shot.shooter {
                    return true;
                }
                let (thz, thheight, noblood) = match self.mobjs.get(id) {
                    Some(th) if th.flags.contains(MobjFlags::SHOOTABLE) =>
                        (th.z, th.height, th.flags.contains(MobjFlags::NOBLOOD)),
                    _ => { return true; }
                };

                let dist = fixed_mul(shot.range, intercept.frac);
                let thingtopslope = fixed_div(thz + thheight - shot.shootz, dist);
                if thingtopslope < shot.slope {
                    return true;
                }
                let thingbottomslope = fixed_div(thz - shot.shootz, dist);
                if thingbottomslope > shot.slope {
                    return true;
                }

                // Blood goes a bit in front of the target
                let frac = intercept.frac - fixed_div(10 * FRACUNIT, shot.range);
                let x = trace.x + fixed_mul(trace.dx, frac);
                let y = trace.y + fixed_mul(trace.dy, frac);
                let z = shot.shootz + fixed_mul(shot.slope, fixed_mul(frac, shot.range));
                if noblood {
                    self.spawn_puff(x, y, z, shot.range == MELEERANGE);
                }
                else {
                    self.spawn_blood(x, y, z, shot.damage);
                }

                if shot.damage != 0 {
                    self.damage_mobj(id, Some(shot.shooter), Some(shot.shooter), shot.damage);
                }
                return shot.rip;
            }
        }
    }

    /// Whether a shot at `shot.slope` makes it through a line's opening.
    fn shot_passes_line(&self, shot: &Shot, handle: Handle<Line>, frac: Fixed) -> bool {
        let line = self.level.line(handle);
        if !line.flags.contains(LineFlags::TWO_SIDED) || line.is_one_sided() {
            return false;
        }
        let opening = self.level.line_opening(line);
        let (front, back) = match (line.front_sector, line.back_sector) {
            (Some(front), Some(back)) => (self.level.sector(front), self.level.sector(back)),
            _ => { return false; }
        };
        let dist = fixed_mul(shot.range, frac);
        if front.floorheight != back.floorheight {
            let slope = fixed_div(opening.bottom - shot.shootz, dist);
            if slope > shot.slope {
                return false;
            }
        }
        if front.ceilingheight != back.ceilingheight {
            let slope = fixed_div(opening.top - shot.shootz, dist);
            if slope < shot.slope {
                return false;
            }
        }
        return true;
    }

    /// Follow `n` states on from `start` without running any of them.
    fn state_after(&self, start: StateNum, n: usize) -> StateNum {
        let mut state = start;
        for _ in 0..n {
            state = match self.info.state(state) {
                Some(def) => def.next,
                None => { return state; }
            };
        }
        state
    }

    pub fn spawn_puff(&mut self, x: Fixed, y: Fixed, z: Fixed, melee: bool) -> MobjId {
        let z = z + (self.p_signed_random() << 10);
        let id = self.spawn_mobj(x, y, z, MobjType::Puff);
        let jitter = self.p_random() & 3;
        if let Some(mo) = self.mobjs.get_mut(id) {
            mo.momz = FRACUNIT;
            mo.tics = (mo.tics - jitter).max(1);
        }
        // Punches and chainsaws skip the spark
        if melee {
            let spawnstate = self.info.info(MobjType::Puff).spawnstate;
            let state = self.state_after(spawnstate, 2);
            self.set_mobj_state(id, state);
        }
        return id;
    }

    pub fn spawn_blood(&mut self, x: Fixed, y: Fixed, z: Fixed, damage: i32) -> MobjId {
        let z = z + (self.p_signed_random() << 10);
        let id = self.spawn_mobj(x, y, z, MobjType::Blood);
        let jitter = self.p_random() & 3;
        if let Some(mo) = self.mobjs.get_mut(id) {
            mo.momz = 2 * FRACUNIT;
            mo.tics = (mo.tics - jitter).max(1);
        }
        // Less damage, less blood
        let skip = if damage < 9 { 2 } else if damage <= 12 { 1 } else { 0 };
        if skip > 0 {
            let spawnstate = self.info.info(MobjType::Blood).spawnstate;
            let state = self.state_after(spawnstate, skip);
            self.set_mobj_state(id, state);
        }
        return id;
    }
}
