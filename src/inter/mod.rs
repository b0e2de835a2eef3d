//! What happens when things meet: picking items up, getting hurt, dying.
//!
//! Every operation here is a method on `World`, works on player indices and `MobjId`s, and
//! tolerates references to things that have since been removed.  Nothing returns an error; bad
//! table data goes through `World::soft_error` and the operation is skipped.

mod damage;
mod give;
mod heretic;
mod kill;
mod touch;

pub use self::damage::{BASETHRESHOLD, TELEFRAG_DAMAGE};

use fixed::FRACUNIT;
use world::World;

/// Doom's `HITDICE`: a multiple of `n` from one to eight.
pub fn hit_dice(world: &mut World, n: i32) -> i32 {
    ((world.p_random() & 7) + 1) * n
}

/// How far apart two things can be vertically and still touch, for pickups.
pub(crate) fn within_reach(special_z: i32, special_height: i32, toucher_z: i32, toucher_height: i32) -> bool {
    let delta = special_z - toucher_z;
    delta <= toucher_height && delta >= -special_height
}

/// Powered staff knockback, in place of the usual thrust.
pub(crate) const STAFF_POWER_THRUST: i32 = 10 * FRACUNIT;

#[cfg(test)]
pub(crate) mod testing {
    use fixed::to_fixed;
    use map::Level;
    use rules::GameConfig;
    use tables::Angle;
    use world::World;

    /// A plain 512-square room with one player standing in the middle.
    pub fn world_with(config: GameConfig) -> (World, usize) {
        let mut level = Level::new();
        let sector = level.add_sector(0, to_fixed(128));
        let side = level.add_side(sector);
        let a = level.add_vertex(to_fixed(-256), to_fixed(-256));
        let b = level.add_vertex(to_fixed(-256), to_fixed(256));
        let c = level.add_vertex(to_fixed(256), to_fixed(256));
        let d = level.add_vertex(to_fixed(256), to_fixed(-256));
        level.add_line(a, b, Some(side), None);
        level.add_line(b, c, Some(side), None);
        level.add_line(c, d, Some(side), None);
        level.add_line(d, a, Some(side), None);
        level.add_subsector(sector);
        level.generate_blockmap();
        let mut world = World::new(level, config);
        let p = world.add_player();
        world.spawn_player(p, 0, 0, Angle(0));
        (world, p)
    }
}
