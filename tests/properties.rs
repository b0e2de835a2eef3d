extern crate idplaysim;
#[macro_use]
extern crate proptest;

mod common;

use proptest::prelude::*;

use common::Room;
use idplaysim::info::MobjType;
use idplaysim::player::Cheats;
use idplaysim::rules::{GameConfig, Ruleset, Skill};
use idplaysim::weapons::ALL_AMMO;
use idplaysim::world::ONFLOORZ;

fn ruleset() -> impl Strategy<Value = Ruleset> {
    prop_oneof![
        Just(Ruleset::Vanilla),
        Just(Ruleset::Boom),
        Just(Ruleset::Mbf),
        Just(Ruleset::Mbf21),
        Just(Ruleset::Heretic),
    ]
}

fn any_ruleset() -> impl Strategy<Value = Ruleset> {
    prop_oneof![ruleset(), Just(Ruleset::Hexen)]
}

fn skill() -> impl Strategy<Value = Skill> {
    prop_oneof![
        Just(Skill::Baby),
        Just(Skill::Easy),
        Just(Skill::Medium),
        Just(Skill::Hard),
        Just(Skill::Nightmare),
    ]
}

fn config(ruleset: Ruleset, skill: Skill) -> GameConfig {
    let mut config = GameConfig::default();
    config.ruleset = ruleset;
    config.skill = skill;
    config
}

proptest! {
    #[test]
    fn ammo_never_passes_the_maximum(
        ruleset in ruleset(),
        skill in skill(),
        which in 0usize .. 6,
        start in 0i32 .. 400,
        count in 0i32 .. 400,
    ) {
        let (mut world, p) = Room::new(256, 256).world(config(ruleset, skill));
        let ammo = ALL_AMMO[which];
        let slot = ammo.index().unwrap();
        let max = world.players[p].maxammo[slot];
        let before = start.min(max);
        world.players[p].ammo[slot] = before;

        let took = world.give_ammo(p, ammo, count);
        let after = world.players[p].ammo[slot];
        prop_assert!(after <= max);
        prop_assert!(after >= before);
        if before >= max {
            prop_assert!(!took);
            prop_assert_eq!(after, before);
        }
    }

    #[test]
    fn zero_damage_leaves_a_player_alone(
        ruleset in ruleset(),
        armortype in 0i32 .. 3,
        armorpoints in 1i32 .. 200,
    ) {
        let (mut world, p) = Room::new(256, 256).world(config(ruleset, Skill::Medium));
        world.players[p].armortype = armortype;
        world.players[p].armorpoints = armorpoints;
        let me = world.players[p].mo.unwrap();

        world.damage_mobj(me, None, None, 0);
        prop_assert_eq!(world.players[p].health, 100);
        prop_assert_eq!(world.players[p].armortype, armortype);
        prop_assert_eq!(world.players[p].armorpoints, armorpoints);
        prop_assert_eq!(world.mobj(me).unwrap().health, 100);
    }

    #[test]
    fn zero_damage_leaves_any_thing_alone(
        ruleset in any_ruleset(),
        solid_corpse in any::<bool>(),
        // 0 alive, 1 a fresh corpse, 2 gibbed
        condition in 0usize .. 3,
    ) {
        let mut config = config(ruleset, Skill::Medium);
        config.solid_corpse = solid_corpse;
        let (mut world, _) = Room::new(256, 256).world(config);
        let imp = world.spawn_mobj(common::units(100), 0, ONFLOORZ, MobjType::Troop);
        if condition >= 1 {
            world.damage_mobj(imp, None, None, 61);
        }
        if condition >= 2 {
            world.damage_mobj(imp, None, None, 100);
        }
        world.drain_events();
        let before = {
            let mo = world.mobj(imp).unwrap();
            (mo.health, mo.radius, mo.height, mo.state, mo.flags)
        };

        prop_assert!(!world.damage_mobj(imp, None, None, 0));
        let mo = world.mobj(imp).unwrap();
        prop_assert_eq!((mo.health, mo.radius, mo.height, mo.state, mo.flags), before);
        prop_assert!(world.events.is_empty());
    }

    #[test]
    fn telefrag_damage_gets_through_god_mode(
        ruleset in ruleset(),
        damage in 10000i32 .. 1_000_000,
    ) {
        let (mut world, p) = Room::new(256, 256).world(config(ruleset, Skill::Medium));
        world.players[p].cheats |= Cheats::GODMODE;
        let me = world.players[p].mo.unwrap();

        prop_assert!(world.damage_mobj(me, None, None, damage));
        prop_assert!(world.players[p].health <= 0);
    }
}
