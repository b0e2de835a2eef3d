extern crate idplaysim;

mod common;

use common::{Room, units};
use idplaysim::fixed::{FRACUNIT, fixed_mul};
use idplaysim::info::MobjType;
use idplaysim::mobj::MobjFlags;
use idplaysim::player::Cheats;
use idplaysim::rules::{GameConfig, Ruleset};
use idplaysim::tables::{Angle, point_to_angle2};
use idplaysim::weapons::{AmmoType, DroppedAmmo, WeaponType};
use idplaysim::world::ONFLOORZ;

#[test]
fn open_room_sight_is_stable_and_symmetric() {
    let (mut world, p) = Room::new(1024, 512).world(GameConfig::default());
    let me = world.players[p].mo.unwrap();
    let imp = world.spawn_mobj(units(500), 0, ONFLOORZ, MobjType::Troop);

    assert!(world.check_sight(me, imp));
    assert!(world.check_sight(me, imp));
    assert!(world.check_sight(imp, me));
}

#[test]
fn a_wall_blocks_sight() {
    let (mut world, p) = Room::new(1024, 512)
        .wall(250, -100, 250, 100)
        .world(GameConfig::default());
    let me = world.players[p].mo.unwrap();
    let imp = world.spawn_mobj(units(500), 0, ONFLOORZ, MobjType::Troop);

    assert!(!world.check_sight(me, imp));
    assert!(!world.check_sight(imp, me));

    // Step out from behind it
    world.set_position(imp, units(500), units(300));
    assert!(world.check_sight(me, imp));
}

#[test]
fn ammo_for_an_empty_gun_switches_to_the_favorite() {
    let mut config = GameConfig::default();
    config.original_weapon_switch = false;
    let (mut world, p) = Room::new(512, 512).world(config);
    let clip = AmmoType::Clip.index().unwrap();
    {
        let player = &mut world.players[p];
        player.ammo[clip] = 0;
        player.weaponowned[WeaponType::Chaingun.index()] = true;
        player.favoriteweapon[WeaponType::Chaingun.index()] = 9;
        // Holding something that can't fire; a loaded pistol would stay in hand
        player.weaponowned[WeaponType::Shotgun.index()] = true;
        player.readyweapon = WeaponType::Shotgun;
    }

    let clip_ammo = world.limits.clip_ammo[clip];
    assert!(world.give_ammo(p, AmmoType::Clip, clip_ammo));
    assert_eq!(world.players[p].ammo[clip], clip_ammo);
    assert_eq!(world.players[p].pendingweapon, Some(WeaponType::Chaingun));
}

fn rocket_push(ruleset: Ruleset, factor: i32) {
    let mut config = GameConfig::default();
    config.ruleset = ruleset;
    let (mut world, p) = Room::new(1024, 1024).world(config);
    let me = world.players[p].mo.unwrap();
    world.info.info_mut(MobjType::Troop).mass = 100;
    let imp = world.spawn_mobj(units(200), units(100), ONFLOORZ, MobjType::Troop);
    let rocket = world.spawn_mobj(units(120), units(40), ONFLOORZ, MobjType::Rocket);

    assert!(world.damage_mobj(imp, Some(rocket), Some(me), 40));

    let thrust = factor * 40 / 100;
    let angle = point_to_angle2(units(120), units(40), units(200), units(100));
    let mo = world.mobj(imp).unwrap();
    assert_eq!(mo.health, 20);
    assert_eq!(mo.momx, fixed_mul(thrust, angle.cos()));
    assert_eq!(mo.momy, fixed_mul(thrust, angle.sin()));
    assert!(mo.momx > 0 && mo.momy > 0);
}

#[test]
fn rockets_push_by_the_doom_constant() {
    rocket_push(Ruleset::Vanilla, 100 * (FRACUNIT >> 3));
}

#[test]
fn rockets_push_harder_in_heretic() {
    rocket_push(Ruleset::Heretic, 150 * (FRACUNIT >> 3));
}

#[test]
fn telefrags_ignore_god_mode() {
    let (mut world, p) = Room::new(512, 512).world(GameConfig::default());
    let me = world.players[p].mo.unwrap();
    world.players[p].cheats |= Cheats::GODMODE;
    let imp = world.spawn_mobj(units(100), 0, ONFLOORZ, MobjType::Troop);

    world.damage_mobj(me, Some(imp), Some(imp), 30);
    assert_eq!(world.players[p].health, 100);

    world.damage_mobj(me, Some(imp), Some(imp), 10000);
    assert!(world.players[p].health < 100);
    assert!(world.mobj(me).unwrap().flags.contains(MobjFlags::CORPSE));
}

#[test]
fn dropped_weapons_remember_an_empty_clip() {
    let mut config = GameConfig::default();
    config.multiplayer = true;
    config.deathmatch = 1;
    config.frags_weapon_falling = true;
    let (mut world, p) = Room::new(512, 512).world(config);
    let me = world.players[p].mo.unwrap();
    let q = world.add_player();
    let them = world.spawn_player(q, units(200), 0, Angle(0)).unwrap();
    {
        let player = &mut world.players[p];
        player.weaponowned[WeaponType::Shotgun.index()] = true;
        player.readyweapon = WeaponType::Shotgun;
        player.ammo[AmmoType::Shell.index().unwrap()] = 0;
    }

    world.damage_mobj(me, Some(them), Some(them), 1000);

    let dropped: Vec<_> = world.mobjs.iter()
        .filter(|&(_, mo)| mo.kind == MobjType::Shotgun)
        .map(|(_, mo)| (mo.flags, DroppedAmmo::decode(mo.dropped_ammo_count)))
        .collect();
    assert_eq!(dropped.len(), 1);
    assert!(dropped[0].0.contains(MobjFlags::DROPPED));
    assert_eq!(dropped[0].1, DroppedAmmo::Count(0));
    assert_ne!(dropped[0].1, DroppedAmmo::NoAmmoType);
    assert_eq!(world.players[q].frags[p], 1);
}
