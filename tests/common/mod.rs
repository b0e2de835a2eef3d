//! Procedurally built levels for the integration tests.

#![allow(dead_code)]

use idplaysim::fixed::{Fixed, to_fixed};
use idplaysim::map::{Handle, Level, Sector, Side};
use idplaysim::reject::Reject;
use idplaysim::rules::GameConfig;
use idplaysim::tables::Angle;
use idplaysim::World;

/// A single-sector box room centered on the origin, sizes in map units.
pub struct Room {
    pub level: Level,
    pub sector: Handle<Sector>,
    pub side: Handle<Side>,
}

impl Room {
    pub fn new(half_width: i32, half_height: i32) -> Room {
        let mut level = Level::new();
        let sector = level.add_sector(0, to_fixed(128));
        let side = level.add_side(sector);
        let corners = [
            (-half_width, -half_height),
            (-half_width, half_height),
            (half_width, half_height),
            (half_width, -half_height),
        ];
        let vertices: Vec<_> = corners.iter()
            .map(|&(x, y)| level.add_vertex(to_fixed(x), to_fixed(y)))
            .collect();
        for i in 0 .. 4 {
            level.add_line(vertices[i], vertices[(i + 1) % 4], Some(side), None);
        }
        level.add_subsector(sector);
        Room{ level, sector, side }
    }

    /// Add a solid one-sided wall between two points, in map units.
    pub fn wall(mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Room {
        let a = self.level.add_vertex(to_fixed(x1), to_fixed(y1));
        let b = self.level.add_vertex(to_fixed(x2), to_fixed(y2));
        self.level.add_line(a, b, Some(self.side), None);
        self
    }

    /// Finish the level and start a world on it with one player standing at the origin.
    pub fn world(self, config: GameConfig) -> (World, usize) {
        let mut level = self.level;
        level.generate_blockmap();
        level.reject = Reject::all_visible(level.num_sectors());
        let mut world = World::new(level, config);
        let p = world.add_player();
        world.spawn_player(p, 0, 0, Angle(0));
        (world, p)
    }
}

pub fn units(n: i32) -> Fixed {
    to_fixed(n)
}
