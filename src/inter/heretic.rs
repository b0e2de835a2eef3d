//! Heretic's extra ways of getting hurt and saved: the morph ovum, whirlwinds, the minotaur's
//! charge, and artifacts that use themselves when things get bad.

use fixed::{FRACUNIT, fixed_mul};
use info::MobjType;
use mobj::{MobjFlags, MobjFlags2, MobjId};
use player::{Artifact, CHICKENTICS, MAXCHICKENHEALTH, MAXHEALTH, PowerType, TICRATE};
use rules::Skill;
use tables::{Angle, point_to_angle2};
use weapons::{BEAK, WeaponType};
use world::{GameEvent, Sound, World};

use super::hit_dice;

impl World {
    /// The minotaur has charged into `target`: fling it and hurt it.
    pub fn minotaur_slam(&mut self, minotaur: MobjId, target: MobjId) {
        let (sx, sy) = match self.mobjs.get(minotaur) {
            Some(mo) => (mo.x, mo.y),
            None => { return; }
        };
        let (tx, ty) = match self.mobjs.get(target) {
            Some(mo) => (mo.x, mo.y),
            None => { return; }
        };
        let angle = point_to_angle2(sx, sy, tx, ty);
        let thrust = 16 * FRACUNIT + (self.p_random() << 10);
        if let Some(mo) = self.mobjs.get_mut(target) {
            mo.momx += fixed_mul(thrust, angle.cos());
            mo.momy += fixed_mul(thrust, angle.sin());
        }
        let damage = hit_dice(self, 6);
        self.damage_mobj(target, None, None, damage);
        if self.player_of(target).is_some() {
            let stun = 14 + (self.p_random() & 7);
            if let Some(mo) = self.mobjs.get_mut(target) {
                mo.reactiontime = stun;
            }
        }
    }

    /// Caught in a whirlwind: spun, shoved, sometimes lifted, and hurt every eighth tic.
    pub fn touch_whirlwind(&mut self, target: MobjId) -> bool {
        let spin = self.p_signed_random() << 20;
        let dx = self.p_signed_random() << 10;
        let dy = self.p_signed_random() << 10;
        let boss = match self.mobjs.get_mut(target) {
            Some(mo) => {
                mo.angle += Angle(spin as u32);
                mo.momx += dx;
                mo.momy += dy;
                mo.flags2.contains(MobjFlags2::BOSS)
            }
            None => { return false; }
        };
        if self.leveltime & 16 != 0 && !boss {
            let lift = self.p_random().min(160) << 10;
            if let Some(mo) = self.mobjs.get_mut(target) {
                mo.momz = (mo.momz + lift).min(12 * FRACUNIT);
            }
        }
        if self.leveltime & 7 == 0 {
            return self.damage_mobj(target, None, None, 3);
        }
        return false;
    }

    /// Turn a thing into something else in place, keeping where it is and what it's after.  Flags
    /// in `keep` carry over from the old form.
    pub fn morph_mobj(&mut self, id: MobjId, into: MobjType, keep: MobjFlags) -> bool {
        let (spawnstate, radius, height, flags, flags2, flags3, health) = {
            let info = self.info.info(into);
            (info.spawnstate, info.radius, info.height, info.flags, info.flags2, info.flags3, info.spawnhealth)
        };
        match self.mobjs.get_mut(id) {
            Some(mo) => {
                mo.kind = into;
                mo.radius = radius;
                mo.height = height;
                mo.flags = flags | (mo.flags & keep);
                mo.flags2 = flags2;
                mo.flags3 = flags3;
                mo.health = health;
            }
            None => { return false; }
        }
        self.set_mobj_state(id, spawnstate);
        self.start_sound(Some(id), Sound::Telept);
        self.events.push(GameEvent::Morphed{ mobj: id, into });
        return true;
    }

    /// Hit by the morph ovum.  True if the player became a chicken; a player who already is one
    /// gets angrier instead.
    pub fn chicken_morph_player(&mut self, player: usize) -> bool {
        let (chicken_tics, powered, invulnerable) = match self.players.get(player) {
            Some(p) => (p.chicken_tics, p.power(PowerType::WeaponLevel2), p.power(PowerType::Invulnerability)),
            None => { return false; }
        };
        if chicken_tics > 0 {
            if chicken_tics < CHICKENTICS - TICRATE && powered == 0 {
                self.give_power(player, PowerType::WeaponLevel2);
            }
            return false;
        }
        if invulnerable > 0 {
            return false;
        }
        let body = match self.players[player].mo {
            Some(body) => body,
            None => { return false; }
        };
        let flying = self.mobjs.get(body).map_or(MobjFlags2::empty(), |mo| mo.flags2 & MobjFlags2::FLY);
        if !self.morph_mobj(body, MobjType::ChicPlayer, MobjFlags::empty()) {
            return false;
        }

        let ready = self.players[player].readyweapon;
        if let Some(mo) = self.mobjs.get_mut(body) {
            // Remembered for turning back
            mo.special1 = ready.index() as i32;
            mo.flags2 |= flying;
            mo.health = MAXCHICKENHEALTH;
        }
        {
            let p = &mut self.players[player];
            p.health = MAXCHICKENHEALTH;
            p.armorpoints = 0;
            p.armortype = 0;
            p.set_power(PowerType::Invisibility, 0);
            p.set_power(PowerType::WeaponLevel2, 0);
            p.chicken_tics = CHICKENTICS;
        }
        self.activate_beak(player);
        debug!("player {} morphed into a chicken", player);
        return true;
    }

    fn activate_beak(&mut self, player: usize) {
        let ready = self.weapon_info(player, BEAK).map(|w| w.readystate);
        let p = &mut self.players[player];
        p.readyweapon = BEAK;
        p.pendingweapon = None;
        p.refire = 0;
        p.psprite = ready;
    }

    /// Turn a chicken player back, as the Tome of Power does.
    pub fn undo_player_chicken(&mut self, player: usize) -> bool {
        let body = match self.players.get(player) {
            Some(p) if p.chicken_tics > 0 => match p.mo {
                Some(body) => body,
                None => { return false; }
            },
            _ => { return false; }
        };
        let weapon = self.mobjs.get(body)
            .and_then(|mo| WeaponType::from_index(mo.special1 as usize))
            .unwrap_or(WeaponType::Pistol);
        let flying = self.mobjs.get(body).map_or(MobjFlags2::empty(), |mo| mo.flags2 & MobjFlags2::FLY);
        if !self.morph_mobj(body, MobjType::Player, MobjFlags::empty()) {
            return false;
        }
        if let Some(mo) = self.mobjs.get_mut(body) {
            mo.flags2 |= flying;
            mo.health = MAXHEALTH;
        }
        let ready = self.weapon_info(player, weapon).map(|w| w.upstate);
        let p = &mut self.players[player];
        p.health = MAXHEALTH;
        p.chicken_tics = 0;
        p.readyweapon = weapon;
        p.pendingweapon = None;
        p.psprite = ready;
        return true;
    }

    /// Hit by the morph ovum, for anything that isn't a player.
    pub fn chicken_morph(&mut self, actor: MobjId) -> bool {
        let kind = match self.mobjs.get(actor) {
            Some(mo) if mo.player.is_none() => mo.kind,
            _ => { return false; }
        };
        if World::resists_morph(kind) {
            return false;
        }
        if !self.morph_mobj(actor, MobjType::Chicken, MobjFlags::SHADOW) {
            return false;
        }
        let tics = CHICKENTICS + self.p_random();
        if let Some(mo) = self.mobjs.get_mut(actor) {
            mo.special1 = tics;
            // What to turn back into
            mo.special2 = kind as i32;
        }
        return true;
    }

    /// About to be telefragged by a mace sphere: use a chaos device to get away, at the cost of
    /// half your health.
    pub fn auto_use_chaos_device(&mut self, player: usize) -> bool {
        match self.players.get(player) {
            Some(p) if p.artifact_count(Artifact::Teleport) > 0 => {}
            _ => { return false; }
        }
        self.use_artifact(player, Artifact::Teleport);
        let health = (self.players[player].health + 1) / 2;
        self.players[player].health = health;
        self.sync_body_health(player, health);
        return true;
    }

    /// About to take `save_health` more damage than the player can survive: drink enough from the
    /// inventory to live through it.  Quartz flasks only get used on the easiest skill.
    pub fn auto_use_health(&mut self, player: usize, save_health: i32) {
        let (normal, urns) = match self.players.get(player) {
            Some(p) => (p.artifact_count(Artifact::Health), p.artifact_count(Artifact::SuperHealth)),
            None => { return; }
        };
        let baby = self.config.skill == Skill::Baby;
        if baby && normal * 25 >= save_health {
            for _ in 0..(save_health + 24) / 25 {
                self.use_artifact(player, Artifact::Health);
            }
        }
        else if urns * 100 >= save_health {
            for _ in 0..(save_health + 99) / 100 {
                self.use_artifact(player, Artifact::SuperHealth);
            }
        }
        else if baby && urns * 100 + normal * 25 >= save_health {
            let flasks = (save_health + 24) / 25;
            for _ in 0..flasks {
                self.use_artifact(player, Artifact::Health);
            }
            let rest = save_health - flasks * 25;
            for _ in 0..(rest + 99) / 100 {
                self.use_artifact(player, Artifact::SuperHealth);
            }
        }
        let health = self.players[player].health;
        self.sync_body_health(player, health);
    }

    /// Use one of an artifact from the player's inventory.  False if they don't have one or it
    /// wouldn't do anything right now, in which case it isn't used up.
    pub fn use_artifact(&mut self, player: usize, artifact: Artifact) -> bool {
        match self.players.get(player) {
            Some(p) if p.artifact_count(artifact) > 0 => {}
            _ => { return false; }
        }
        let used = match artifact {
            Artifact::Health => self.give_health(player, 25),
            Artifact::SuperHealth => self.give_health(player, 100),
            Artifact::Invulnerability => self.give_power(player, PowerType::Invulnerability),
            Artifact::Invisibility => self.give_power(player, PowerType::Invisibility),
            Artifact::Torch => self.give_power(player, PowerType::Infrared),
            Artifact::Fly => self.give_power(player, PowerType::Flight),
            Artifact::TomeOfPower => {
                if self.players[player].is_chicken() {
                    self.undo_player_chicken(player)
                }
                else {
                    self.give_power(player, PowerType::WeaponLevel2)
                }
            }
            Artifact::Teleport => {
                // Where to is up to whoever knows the player starts
                if self.players[player].is_chicken() {
                    self.undo_player_chicken(player);
                }
                match self.players[player].mo {
                    Some(body) => {
                        self.events.push(GameEvent::Teleported(body));
                        true
                    }
                    None => false,
                }
            }
            Artifact::FireBomb | Artifact::Egg => {
                // These launch projectiles, which belong to the missile code
                debug!("{:?} can't be used from here", artifact);
                false
            }
        };
        if !used {
            return false;
        }
        self.players[player].take_artifact(artifact, 1);
        let body = self.players[player].mo;
        self.start_sound(body, Sound::ArtiUp);
        self.events.push(GameEvent::ArtifactUsed{ player, artifact });
        return true;
    }

    /// D'Sparil blinks away from a hit.  The caller moves him to one of the map's boss spots.
    pub fn dsparil_teleport(&mut self, sorcerer: MobjId) {
        if !self.mobjs.contains(sorcerer) {
            return;
        }
        self.start_sound(Some(sorcerer), Sound::Telept);
        self.events.push(GameEvent::Teleported(sorcerer));
    }
}
