use info::{MobjType, SpriteNum};
use messages::*;
use mobj::{MobjFlags, MobjId};
use player::{Artifact, KeyCards, PICKUP_FLASH_TICS, PowerType, BONUSADD};
use rules::{GameMode, VoodooMode};
use weapons::*;
use world::{GameEvent, Sound, World};

use super::within_reach;

/// What a pickup turned out to be, once it's been accepted.
struct Picked {
    message: Option<&'static str>,
    msglevel: u8,
    sound: Sound,
    key: bool,
}

impl Picked {
    fn new(message: &'static str, msglevel: u8) -> Picked {
        Picked{ message: Some(message), msglevel, sound: Sound::ItemUp, key: false }
    }

    fn sound(mut self, sound: Sound) -> Picked {
        self.sound = sound;
        self
    }
}

fn artifact_for_sprite(sprite: SpriteNum) -> Option<(Artifact, &'static str, u8)> {
    let found = match sprite {
        SpriteNum::PTN2 => (Artifact::Health, TXT_ARTIHEALTH, 28),
        SpriteNum::SOAR => (Artifact::Fly, TXT_ARTIFLY, 31),
        SpriteNum::INVU => (Artifact::Invulnerability, TXT_ARTIINVULNERABILITY, 31),
        SpriteNum::PWBK => (Artifact::TomeOfPower, TXT_ARTITOMEOFPOWER, 31),
        SpriteNum::INVS => (Artifact::Invisibility, TXT_ARTIINVISIBILITY, 31),
        SpriteNum::EGGC => (Artifact::Egg, TXT_ARTIEGG, 31),
        SpriteNum::SPHL => (Artifact::SuperHealth, TXT_ARTISUPERHEALTH, 31),
        SpriteNum::TRCH => (Artifact::Torch, TXT_ARTITORCH, 31),
        SpriteNum::FBMB => (Artifact::FireBomb, TXT_ARTIFIREBOMB, 31),
        SpriteNum::ATLP => (Artifact::Teleport, TXT_ARTITELEPORT, 31),
        _ => { return None; }
    };
    return Some(found);
}

fn heretic_ammo_for_sprite(sprite: SpriteNum) -> Option<(AmmoType, &'static str)> {
    let found = match sprite {
        SpriteNum::AMG1 => (AM_GOLDWAND, TXT_AMMOGOLDWAND1),
        SpriteNum::AMG2 => (AM_GOLDWAND, TXT_AMMOGOLDWAND2),
        SpriteNum::AMM1 => (AM_MACE, TXT_AMMOMACE1),
        SpriteNum::AMM2 => (AM_MACE, TXT_AMMOMACE2),
        SpriteNum::AMC1 => (AM_CROSSBOW, TXT_AMMOCROSSBOW1),
        SpriteNum::AMC2 => (AM_CROSSBOW, TXT_AMMOCROSSBOW2),
        SpriteNum::AMB1 => (AM_BLASTER, TXT_AMMOBLASTER1),
        SpriteNum::AMB2 => (AM_BLASTER, TXT_AMMOBLASTER2),
        SpriteNum::AMS1 => (AM_SKULLROD, TXT_AMMOSKULLROD1),
        SpriteNum::AMS2 => (AM_SKULLROD, TXT_AMMOSKULLROD2),
        SpriteNum::AMP1 => (AM_PHOENIXROD, TXT_AMMOPHOENIXROD1),
        SpriteNum::AMP2 => (AM_PHOENIXROD, TXT_AMMOPHOENIXROD2),
        _ => { return None; }
    };
    return Some(found);
}

/// Weapon pickups: the weapon, its message and level, and whether a dropped one still counts as
/// dropped.
fn weapon_for_sprite(sprite: SpriteNum) -> Option<(WeaponType, &'static str, u8, bool)> {
    let found = match sprite {
        SpriteNum::BFUG => (WeaponType::Bfg, GOTBFG9000, 38, true),
        SpriteNum::MGUN => (WeaponType::Chaingun, GOTCHAINGUN, 29, true),
        SpriteNum::CSAW => (WeaponType::Chainsaw, GOTCHAINSAW, 21, false),
        SpriteNum::LAUN => (WeaponType::Missile, GOTLAUNCHER, 32, true),
        SpriteNum::PLAS => (WeaponType::Plasma, GOTPLASMA, 32, true),
        SpriteNum::SHOT => (WeaponType::Shotgun, GOTSHOTGUN, 24, true),
        SpriteNum::SGN2 => (WeaponType::SuperShotgun, GOTSHOTGUN2, 32, true),
        SpriteNum::WMCE => (MACE, TXT_WPNMACE, 32, true),
        SpriteNum::WBOW => (CROSSBOW, TXT_WPNCROSSBOW, 24, true),
        SpriteNum::WBLS => (BLASTER, TXT_WPNBLASTER, 32, true),
        SpriteNum::WSKL => (SKULLROD, TXT_WPNSKULLROD, 36, true),
        SpriteNum::WPHX => (PHOENIXROD, TXT_WPNPHOENIXROD, 38, true),
        SpriteNum::WGNT => (GAUNTLETS, TXT_WPNGAUNTLETS, 21, false),
        _ => { return None; }
    };
    return Some(found);
}

fn key_for_sprite(sprite: SpriteNum) -> Option<(KeyCards, &'static str)> {
    let found = match sprite {
        SpriteNum::BKYY | SpriteNum::BKEY => (KeyCards::BLUE_CARD, GOTBLUECARD),
        SpriteNum::CKYY | SpriteNum::YKEY => (KeyCards::YELLOW_CARD, GOTYELWCARD),
        SpriteNum::AKYY | SpriteNum::RKEY => (KeyCards::RED_CARD, GOTREDCARD),
        SpriteNum::BSKU => (KeyCards::BLUE_SKULL, GOTBLUESKUL),
        SpriteNum::YSKU => (KeyCards::YELLOW_SKULL, GOTYELWSKUL),
        SpriteNum::RSKU => (KeyCards::RED_SKULL, GOTREDSKULL),
        _ => { return None; }
    };
    return Some(found);
}

/// Ammo in a Doom box pickup: how many clips, and the message.
fn doom_ammo_for_sprite(sprite: SpriteNum) -> Option<(AmmoType, i32, &'static str)> {
    let found = match sprite {
        SpriteNum::AMMO => (AmmoType::Clip, 5, GOTCLIPBOX),
        SpriteNum::ROCK => (AmmoType::Missile, 1, GOTROCKET),
        SpriteNum::BROK => (AmmoType::Missile, 5, GOTROCKBOX),
        SpriteNum::CELL => (AmmoType::Cell, 1, GOTCELL),
        SpriteNum::CELP => (AmmoType::Cell, 5, GOTCELLBOX),
        SpriteNum::SHEL => (AmmoType::Shell, 1, GOTSHELLS),
        SpriteNum::SBOX => (AmmoType::Shell, 5, GOTSHELLBOX),
        _ => { return None; }
    };
    return Some(found);
}

impl World {
    /// `toucher` ran into `special`.  Works out what the item is from its sprite, hands it to the
    /// player, and removes it if it was taken.
    pub fn touch_special_thing(&mut self, special: MobjId, toucher: MobjId) {
        let (special_z, special_height, sprite, special_flags, dropped_raw, special_health) = match self.mobjs.get(special) {
            Some(mo) => (mo.z, mo.height, mo.sprite, mo.flags, mo.dropped_ammo_count, mo.health),
            None => { return; }
        };
        let (toucher_z, toucher_height, toucher_health, toucher_flags, toucher_player) = match self.mobjs.get(toucher) {
            Some(mo) => (mo.z, mo.height, mo.health, mo.flags, mo.player),
            None => { return; }
        };

        if !within_reach(special_z, special_height, toucher_z, toucher_height) {
            return;
        }
        // A sliding corpse
        if toucher_health <= 0 || toucher_flags.contains(MobjFlags::CORPSE) {
            return;
        }

        let mut player = match toucher_player {
            Some(player) if player < self.players.len() => player,
            Some(player) => {
                self.soft_error(format_args!("{:?} belongs to nonexistent player {}", toucher, player));
                return;
            }
            None => { return; }
        };
        if self.players[player].mo != Some(toucher) {
            // A voodoo doll: blame whoever last set off a line, if that's wanted
            if self.config.voodoo_mode >= VoodooMode::Target {
                if let Some(last) = self.spechit_player {
                    if self.players.get(last).map_or(false, |p| p.mo.is_some()) {
                        player = last;
                    }
                }
            }
            if self.players[player].mo.is_none() {
                return;
            }
        }

        if let Some((artifact, message, msglevel)) = artifact_for_sprite(sprite) {
            if self.give_artifact(player, artifact, Some(special)) {
                let show = self.config.show_messages;
                set_message(&mut self.players[player], message, msglevel, show);
                self.set_dormant_artifact(special);
            }
            return;
        }

        let dropped = DroppedAmmo::decode(dropped_raw);
        let special_dropped = special_flags.contains(MobjFlags::DROPPED);
        let picked = match self.pick_up(player, sprite, special_dropped, dropped, special_health) {
            Some(picked) => picked,
            None => { return; }
        };

        if let Some(message) = picked.message {
            let show = self.config.show_messages;
            set_message(&mut self.players[player], message, picked.msglevel, show);
        }
        let mut sound = picked.sound;
        if picked.key {
            if self.config.ruleset.is_heretic() {
                sound = Sound::KeyUp;
            }
            // Keys stay put for everyone else
            if self.config.multiplayer {
                return;
            }
        }

        if special_flags.contains(MobjFlags::COUNTITEM) {
            self.players[player].itemcount += 1;
        }
        self.remove_mobj(special);
        self.players[player].bonuscount += BONUSADD;
        if player == self.consoleplayer {
            self.start_sound(None, sound);
        }
        debug!("player {} picked up {:?}", player, sprite);
        self.events.push(GameEvent::Pickup{ player, sprite });
    }

    /// Hand the item over.  None means the player didn't take it and it stays where it is.
    fn pick_up(&mut self, player: usize, sprite: SpriteNum, special_dropped: bool, dropped: DroppedAmmo, special_health: i32) -> Option<Picked> {
        if let Some((card, message)) = key_for_sprite(sprite) {
            let mut picked = Picked{ message: None, msglevel: 20, sound: Sound::ItemUp, key: true };
            if self.give_card(player, card) {
                picked.message = Some(message);
                picked.msglevel = 45;
            }
            return Some(picked);
        }

        if let Some((weapon, message, msglevel, keeps_dropped)) = weapon_for_sprite(sprite) {
            let dropped = if special_dropped && keeps_dropped { Some(dropped) } else { None };
            if !self.give_weapon(player, weapon, dropped) {
                return None;
            }
            return Some(Picked::new(message, msglevel).sound(Sound::WpnUp));
        }

        if let Some((ammo, message)) = heretic_ammo_for_sprite(sprite) {
            if !self.give_ammo(player, ammo, special_health) {
                return None;
            }
            return Some(Picked::new(message, 20));
        }

        if let Some((ammo, clips, message)) = doom_ammo_for_sprite(sprite) {
            let count = clips * self.clip_of(ammo);
            if !self.give_ammo(player, ammo, count) {
                return None;
            }
            return Some(Picked::new(message, 20));
        }

        let max_health = self.limits.max_health;
        let picked = match sprite {
            SpriteNum::ARM1 | SpriteNum::SHLD => {
                if !self.give_armor(player, self.limits.green_armor_class) {
                    return None;
                }
                Picked::new(GOTARMOR, 28)
            }
            SpriteNum::ARM2 | SpriteNum::SHD2 => {
                if !self.give_armor(player, self.limits.blue_armor_class) {
                    return None;
                }
                Picked::new(GOTMEGA, 37)
            }

            // Bonuses go over the usual maximum
            SpriteNum::BON1 => {
                let health = {
                    let p = &mut self.players[player];
                    let health = (p.health + 1).min(2 * max_health);
                    if health > p.health && p.health_pickup < 35 {
                        p.health_pickup += PICKUP_FLASH_TICS / 2;
                    }
                    p.health = health;
                    health
                };
                self.sync_body_health(player, health);
                Picked::new(GOTHTHBONUS, 22)
            }
            SpriteNum::BON2 => {
                let max_armor = self.limits.max_armor;
                let p = &mut self.players[player];
                let armor = (p.armorpoints + 1).min(max_armor);
                if armor > p.armorpoints && p.armor_pickup < 35 {
                    p.armor_pickup += PICKUP_FLASH_TICS / 2;
                }
                p.armorpoints = armor;
                if p.armortype == 0 {
                    p.armortype = 1;
                }
                Picked::new(GOTARMBONUS, 22)
            }
            SpriteNum::SOUL => {
                let (soul, max_soul) = (self.limits.soul_health, self.limits.max_soul_health);
                let health = {
                    let p = &mut self.players[player];
                    let health = (p.health + soul).min(max_soul);
                    if health > p.health && p.health_pickup < 35 {
                        p.health_pickup += PICKUP_FLASH_TICS;
                    }
                    p.health = health;
                    health
                };
                self.sync_body_health(player, health);
                Picked::new(GOTSUPER, 38).sound(Sound::GetPow)
            }
            SpriteNum::MEGA => {
                if self.config.gamemode != GameMode::Commercial {
                    return None;
                }
                let health = self.limits.mega_health;
                {
                    let p = &mut self.players[player];
                    if p.health_pickup < 35 {
                        p.health_pickup += PICKUP_FLASH_TICS;
                    }
                    p.health = health;
                }
                self.sync_body_health(player, health);
                self.give_armor(player, 2);
                Picked::new(GOTMSPHERE, 38).sound(Sound::GetPow)
            }

            SpriteNum::PTN1 | SpriteNum::STIM => {
                if !self.give_health(player, 10) {
                    return None;
                }
                Picked::new(GOTSTIM, 20)
            }
            SpriteNum::MEDI => {
                if !self.give_health(player, 25) {
                    return None;
                }
                // Health was under 25 before this
                if self.players[player].health < 50 {
                    Picked::new(GOTMEDINEED, 31)
                }
                else {
                    Picked::new(GOTMEDIKIT, 23)
                }
            }

            SpriteNum::PINV => {
                if !self.give_power(player, PowerType::Invulnerability) {
                    return None;
                }
                Picked::new(GOTINVUL, 34).sound(Sound::GetPow)
            }
            SpriteNum::PSTR => {
                if !self.give_power(player, PowerType::Strength) {
                    return None;
                }
                let p = &mut self.players[player];
                if p.readyweapon != WeaponType::Fist {
                    p.pendingweapon = Some(WeaponType::Fist);
                }
                Picked::new(GOTBERSERK, 34).sound(Sound::GetPow)
            }
            SpriteNum::PINS => {
                if !self.give_power(player, PowerType::Invisibility) {
                    return None;
                }
                Picked::new(GOTINVIS, 34).sound(Sound::GetPow)
            }
            SpriteNum::SUIT => {
                if !self.give_power(player, PowerType::IronFeet) {
                    return None;
                }
                Picked::new(GOTSUIT, 32).sound(Sound::GetPow)
            }
            SpriteNum::SPMP | SpriteNum::PMAP => {
                if !self.give_power(player, PowerType::AllMap) {
                    return None;
                }
                let picked = Picked::new(GOTMAP, 31);
                if self.config.ruleset.is_doom() { picked.sound(Sound::GetPow) } else { picked }
            }
            SpriteNum::PVIS => {
                if !self.give_power(player, PowerType::Infrared) {
                    return None;
                }
                Picked::new(GOTVISOR, 32).sound(Sound::GetPow)
            }

            SpriteNum::CLIP => {
                let clip = self.clip_of(AmmoType::Clip);
                let count = if special_dropped { clip / 2 } else { clip };
                if !self.give_ammo(player, AmmoType::Clip, count) {
                    return None;
                }
                Picked::new(GOTCLIP, 20)
            }
            SpriteNum::BPAK => {
                self.give_backpack(player);
                for &ammo in ALL_AMMO.iter() {
                    let count = self.clip_of(ammo);
                    self.give_ammo(player, ammo, count);
                }
                Picked::new(GOTBACKPACK, 27)
            }
            SpriteNum::BAGH => {
                self.give_backpack(player);
                self.give_ammo(player, AM_GOLDWAND, 10);
                self.give_ammo(player, AM_BLASTER, 10);
                self.give_ammo(player, AM_CROSSBOW, 5);
                self.give_ammo(player, AM_SKULLROD, 20);
                self.give_ammo(player, AM_PHOENIXROD, 1);
                Picked::new(TXT_ITEMBAGOFHOLDING, 27)
            }

            _ => {
                trace!("{:?} isn't something that can be picked up", sprite);
                return None;
            }
        };
        return Some(picked);
    }

    fn clip_of(&self, ammo: AmmoType) -> i32 {
        ammo.index().map_or(0, |slot| self.limits.clip_ammo[slot])
    }

    /// A picked-up artifact stops being collectable and plays its pickup animation.  In
    /// deathmatch most of them come back later.
    pub fn set_dormant_artifact(&mut self, artifact: MobjId) {
        let kind = match self.mobjs.get_mut(artifact) {
            Some(mo) => {
                mo.flags.remove(MobjFlags::SPECIAL);
                mo.kind
            }
            None => { return; }
        };
        let respawns = self.config.is_deathmatch()
            && kind != MobjType::ArtiInvulnerability
            && kind != MobjType::ArtiInvisibility;
        let state = if respawns { self.info.dormant_artifact_state } else { self.info.dead_artifact_state };
        self.start_sound(Some(artifact), Sound::ArtiUp);
        self.set_mobj_state(artifact, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::to_fixed;
    use inter::testing::world_with;
    use rules::{GameConfig, Ruleset};
    use world::ONFLOORZ;

    fn drop_at_feet(world: &mut World, kind: MobjType) -> MobjId {
        world.spawn_mobj(to_fixed(8), 0, ONFLOORZ, kind)
    }

    fn body(world: &World, p: usize) -> MobjId {
        world.players[p].mo.unwrap()
    }

    #[test]
    fn stimpack_heals_and_goes_away() {
        let (mut world, p) = world_with(GameConfig::default());
        world.players[p].health = 50;
        let stim = drop_at_feet(&mut world, MobjType::Stimpack);
        let me = body(&world, p);
        world.touch_special_thing(stim, me);
        assert_eq!(world.players[p].health, 60);
        assert_eq!(world.mobj(me).unwrap().health, 60);
        assert!(world.mobj(stim).is_none());
        assert_eq!(world.players[p].bonuscount, BONUSADD);
        assert_eq!(world.players[p].message.as_ref().map(|s| s.as_str()), Some(GOTSTIM));
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::Sound{ origin: None, sound: Sound::ItemUp }));
        assert!(events.contains(&GameEvent::Pickup{ player: p, sprite: SpriteNum::STIM }));
    }

    #[test]
    fn refused_items_stay() {
        let (mut world, p) = world_with(GameConfig::default());
        let stim = drop_at_feet(&mut world, MobjType::Stimpack);
        let me = body(&world, p);
        world.touch_special_thing(stim, me);
        assert!(world.mobj(stim).is_some());
        assert_eq!(world.players[p].bonuscount, 0);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn out_of_reach_items_are_ignored() {
        let (mut world, p) = world_with(GameConfig::default());
        world.players[p].health = 50;
        let stim = world.spawn_mobj(to_fixed(8), 0, to_fixed(100), MobjType::Stimpack);
        let me = body(&world, p);
        world.touch_special_thing(stim, me);
        assert_eq!(world.players[p].health, 50);
        assert!(world.mobj(stim).is_some());
    }

    #[test]
    fn medikit_message_depends_on_need() {
        let (mut world, p) = world_with(GameConfig::default());
        world.players[p].health = 10;
        let medi = drop_at_feet(&mut world, MobjType::Medikit);
        let me = body(&world, p);
        world.touch_special_thing(medi, me);
        assert_eq!(world.players[p].message.as_ref().map(|s| s.as_str()), Some(GOTMEDINEED));
    }

    #[test]
    fn health_bonus_goes_past_the_normal_max() {
        let (mut world, p) = world_with(GameConfig::default());
        let bonus = drop_at_feet(&mut world, MobjType::HealthBonus);
        let me = body(&world, p);
        world.touch_special_thing(bonus, me);
        assert_eq!(world.players[p].health, 101);
        assert_eq!(world.players[p].itemcount, 1);
    }

    #[test]
    fn megasphere_needs_commercial() {
        let mut config = GameConfig::default();
        config.gamemode = GameMode::Retail;
        let (mut world, p) = world_with(config);
        let mega = drop_at_feet(&mut world, MobjType::Megasphere);
        let me = body(&world, p);
        world.touch_special_thing(mega, me);
        assert!(world.mobj(mega).is_some());

        let (mut world, p) = world_with(GameConfig::default());
        let mega = drop_at_feet(&mut world, MobjType::Megasphere);
        let me = body(&world, p);
        world.touch_special_thing(mega, me);
        assert_eq!(world.players[p].health, 200);
        assert_eq!(world.players[p].armorpoints, 200);
    }

    #[test]
    fn keys_stay_in_multiplayer() {
        let mut config = GameConfig::default();
        config.multiplayer = true;
        let (mut world, p) = world_with(config);
        let key = drop_at_feet(&mut world, MobjType::RedCard);
        let me = body(&world, p);
        world.touch_special_thing(key, me);
        assert!(world.players[p].cards.contains(KeyCards::RED_CARD));
        assert!(world.mobj(key).is_some());
    }

    #[test]
    fn dropped_clip_is_half() {
        let (mut world, p) = world_with(GameConfig::default());
        let clip = drop_at_feet(&mut world, MobjType::Clip);
        world.mobj_mut(clip).unwrap().flags |= MobjFlags::DROPPED;
        let me = body(&world, p);
        world.touch_special_thing(clip, me);
        assert_eq!(world.players[p].ammo[0], 55);
    }

    #[test]
    fn backpack_doubles_capacity_once() {
        let (mut world, p) = world_with(GameConfig::default());
        let me = body(&world, p);
        let pack = drop_at_feet(&mut world, MobjType::Backpack);
        world.touch_special_thing(pack, me);
        assert_eq!(world.players[p].maxammo[0], 400);
        assert_eq!(world.players[p].ammo[1], 4);
        let pack = drop_at_feet(&mut world, MobjType::Backpack);
        world.touch_special_thing(pack, me);
        assert_eq!(world.players[p].maxammo[0], 400);
    }

    #[test]
    fn dropped_weapon_carries_its_clip() {
        let (mut world, p) = world_with(GameConfig::default());
        let gun = drop_at_feet(&mut world, MobjType::Shotgun);
        {
            let mo = world.mobj_mut(gun).unwrap();
            mo.flags |= MobjFlags::DROPPED;
            mo.dropped_ammo_count = DroppedAmmo::Count(3).encode();
        }
        let me = body(&world, p);
        world.touch_special_thing(gun, me);
        assert!(world.players[p].owns(WeaponType::Shotgun));
        assert_eq!(world.players[p].ammo[AmmoType::Shell.index().unwrap()], 3);
        assert!(world.drain_events().contains(&GameEvent::Sound{ origin: None, sound: Sound::WpnUp }));
    }

    #[test]
    fn heretic_artifacts_go_dormant_instead_of_vanishing() {
        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Heretic;
        let (mut world, p) = world_with(config);
        let flask = drop_at_feet(&mut world, MobjType::ArtiHealth);
        let me = body(&world, p);
        world.touch_special_thing(flask, me);
        assert_eq!(world.players[p].artifact_count(Artifact::Health), 1);
        assert_eq!(world.players[p].itemcount, 1);
        let mo = world.mobj(flask).unwrap();
        assert!(!mo.flags.contains(MobjFlags::SPECIAL));
        assert_eq!(mo.state, world.info.dead_artifact_state);
        assert_eq!(world.players[p].bonuscount, 0);
    }

    #[test]
    fn heretic_ammo_uses_spawn_health() {
        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Heretic;
        let (mut world, p) = world_with(config);
        let runes = drop_at_feet(&mut world, MobjType::AmmoSkullRodHefty);
        let me = body(&world, p);
        world.touch_special_thing(runes, me);
        assert_eq!(world.players[p].ammo[AM_SKULLROD.index().unwrap()], 100);
    }

    #[test]
    fn voodoo_doll_pickups_go_to_the_last_line_user() {
        let mut config = GameConfig::default();
        config.voodoo_mode = VoodooMode::Target;
        let (mut world, p) = world_with(config);
        let other = world.add_player();
        world.spawn_player(other, to_fixed(100), 0, ::tables::Angle(0));
        world.players[other].health = 40;
        world.spechit_player = Some(other);

        let doll = world.spawn_mobj(to_fixed(-100), 0, ONFLOORZ, MobjType::Player);
        world.mobj_mut(doll).unwrap().player = Some(p);
        let stim = world.spawn_mobj(to_fixed(-100), 0, ONFLOORZ, MobjType::Stimpack);
        world.touch_special_thing(stim, doll);
        assert_eq!(world.players[other].health, 50);
        assert_eq!(world.players[p].health, 100);
    }

    #[test]
    fn sprite_decides_not_type() {
        // A reskinned thing acts like whatever its sprite says it is
        let (mut world, p) = world_with(GameConfig::default());
        world.players[p].health = 50;
        let thing = drop_at_feet(&mut world, MobjType::Clip);
        world.mobj_mut(thing).unwrap().sprite = SpriteNum::STIM;
        let me = body(&world, p);
        world.touch_special_thing(thing, me);
        assert_eq!(world.players[p].health, 60);
        assert_eq!(world.players[p].ammo[0], 50);
    }
}
