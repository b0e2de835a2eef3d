//! The player's side of weapons: running out of ammo, aiming bullets, and the melee attacks.
//!
//! Projectile weapons live with the missile code, outside this crate; everything here fires
//! instantly through `hitscan`.

use fixed::{Fixed, FRACUNIT};
use hitscan::{MELEERANGE, MISSILERANGE};
use mobj::{MobjFlags, MobjId};
use player::PowerType;
use rules::GameMode;
use tables::{ANG180, ANG90, ANGLETOFINESHIFT, Angle, FINEMASK, finetangent, point_to_angle2};
use weapons::{AmmoType, WeaponType, BLASTER, CROSSBOW, GAUNTLETS, GOLDWAND, MACE, PHOENIXROD, SKULLROD, STAFF};
use world::{Sound, World};

/// How far bullets look for something to aim at.
const BULLET_AIM_RANGE: Fixed = 16 * 64 * FRACUNIT;
/// Angle between the three bullet aim attempts.
const AIM_SPREAD: u32 = 1 << 26;

impl World {
    fn owns_loaded(&self, player: usize, weapon: WeaponType, more_than_one_shot: bool) -> bool {
        let p = &self.players[player];
        let def = match self.weapon_info(player, weapon) {
            Some(def) => def,
            None => { return false; }
        };
        let ammo = def.ammo.index().map_or(0, |slot| p.ammo[slot]);
        if more_than_one_shot {
            ammo > def.ammo_per_shot
        }
        else {
            ammo >= def.ammo_per_shot
        }
    }

    /// Whether the ready weapon has enough ammo for a shot.  If it doesn't, pick something else
    /// to switch to and start lowering the empty one.
    pub fn check_ammo(&mut self, player: usize) -> bool {
        let ready = match self.players.get(player) {
            Some(p) => p.readyweapon,
            None => { return false; }
        };
        let (ammo, per_shot, downstate) = match self.weapon_info(player, ready) {
            Some(def) => (def.ammo, def.ammo_per_shot, def.downstate),
            None => {
                self.soft_error(format_args!("player {} holds {:?}, which has no weapon info", player, ready));
                return false;
            }
        };
        let have = ammo.index().map_or(0, |slot| self.players[player].ammo[slot]);
        if ammo == AmmoType::NoAmmo || have >= per_shot {
            return true;
        }

        if !self.players[player].originalweaponswitch {
            self.switch_to_favorite(player);
        }
        else {
            let owned = |world: &World, weapon: WeaponType| world.players[player].owns(weapon);
            let next = if self.config.ruleset.is_heretic() {
                // Heretic wants more than one shot's worth before it'll switch
                if owned(self, SKULLROD) && self.owns_loaded(player, SKULLROD, true) { SKULLROD }
                else if owned(self, BLASTER) && self.owns_loaded(player, BLASTER, true) { BLASTER }
                else if owned(self, CROSSBOW) && self.owns_loaded(player, CROSSBOW, true) { CROSSBOW }
                else if owned(self, MACE) && self.owns_loaded(player, MACE, true) { MACE }
                else if self.owns_loaded(player, GOLDWAND, true) { GOLDWAND }
                else if owned(self, GAUNTLETS) { GAUNTLETS }
                else if owned(self, PHOENIXROD) && self.owns_loaded(player, PHOENIXROD, true) { PHOENIXROD }
                else { STAFF }
            }
            else {
                let mode = self.config.gamemode;
                if owned(self, WeaponType::Plasma) && self.owns_loaded(player, WeaponType::Plasma, false)
                    && mode != GameMode::Shareware { WeaponType::Plasma }
                else if owned(self, WeaponType::SuperShotgun) && self.owns_loaded(player, WeaponType::SuperShotgun, false)
                    && mode == GameMode::Commercial { WeaponType::SuperShotgun }
                else if owned(self, WeaponType::Chaingun) && self.owns_loaded(player, WeaponType::Chaingun, false) { WeaponType::Chaingun }
                else if owned(self, WeaponType::Shotgun) && self.owns_loaded(player, WeaponType::Shotgun, false) { WeaponType::Shotgun }
                else if self.owns_loaded(player, WeaponType::Pistol, false) { WeaponType::Pistol }
                else if owned(self, WeaponType::Chainsaw) { WeaponType::Chainsaw }
                else if owned(self, WeaponType::Missile) && self.owns_loaded(player, WeaponType::Missile, false) { WeaponType::Missile }
                else if owned(self, WeaponType::Bfg) && self.owns_loaded(player, WeaponType::Bfg, false)
                    && mode != GameMode::Shareware { WeaponType::Bfg }
                else { WeaponType::Fist }
            };
            self.players[player].pendingweapon = Some(next);
        }

        self.players[player].psprite = Some(downstate);
        return false;
    }

    /// Use up `amount` of the ready weapon's ammo, stopping at zero.
    pub fn subtract_ammo(&mut self, player: usize, amount: i32) {
        let ready = match self.players.get(player) {
            Some(p) => p.readyweapon,
            None => { return; }
        };
        let slot = match self.weapon_info(player, ready).and_then(|def| def.ammo.index()) {
            Some(slot) => slot,
            None => { return; }
        };
        let ammo = &mut self.players[player].ammo[slot];
        *ammo = (*ammo - amount).max(0);
    }

    /// Put the weapon away, as when the player dies.
    pub fn drop_weapon(&mut self, player: usize) {
        let ready = match self.players.get(player) {
            Some(p) => p.readyweapon,
            None => { return; }
        };
        let downstate = self.weapon_info(player, ready).map(|def| def.downstate);
        self.players[player].psprite = downstate;
    }

    /// Work out where the player's bullets go: straight ahead if that finds a target, else a
    /// little either side, else wherever the player is looking.  Under MBF friends are passed
    /// over on the first try.
    pub fn bullet_slope(&mut self, shooter: MobjId) -> Fixed {
        let (angle, player) = match self.mobjs.get(shooter) {
            Some(mo) => (mo.angle, mo.player.filter(|&p| p < self.players.len())),
            None => { return 0; }
        };
        let autoaim = player.map_or(true, |p| self.players[p].autoaim);

        if autoaim {
            let mut friend_protect = self.config.policy().mbf_features;
            loop {
                for &spread in [0, AIM_SPREAD, AIM_SPREAD.wrapping_neg()].iter() {
                    let slope = self.aim_line_attack(shooter, angle + Angle(spread), BULLET_AIM_RANGE, friend_protect);
                    if self.linetarget.is_some() {
                        self.bulletslope = slope;
                        return slope;
                    }
                }
                if !friend_protect {
                    break;
                }
                friend_protect = false;
            }
        }

        let aiming = player.map_or(Angle(0), |p| self.players[p].aiming);
        let index = (2048 + (aiming.signed() >> ANGLETOFINESHIFT)) as usize & FINEMASK;
        self.bulletslope = finetangent(index);
        return self.bulletslope;
    }

    /// One bullet from a pistol, shotgun pellet, or chaingun, along the last bullet slope.
    /// Inaccurate shots wander a little.
    pub fn gun_shot(&mut self, shooter: MobjId, accurate: bool) {
        let damage = 5 * (self.p_random() % 3 + 1);
        let mut angle = match self.mobjs.get(shooter) {
            Some(mo) => mo.angle,
            None => { return; }
        };
        if !accurate {
            angle += Angle((self.p_signed_random() << 18) as u32);
        }
        let slope = self.bulletslope;
        self.line_attack(shooter, angle, MISSILERANGE, slope, damage);
    }

    /// Aim a melee attack, preferring enemies under MBF.
    fn melee_aim(&mut self, shooter: MobjId, angle: Angle, range: Fixed, friend_protect: bool) -> Fixed {
        let slope = self.aim_line_attack(shooter, angle, range, friend_protect);
        if self.config.policy().mbf_features && self.linetarget.is_none() {
            return self.aim_line_attack(shooter, angle, range, false);
        }
        return slope;
    }

    pub fn punch(&mut self, player: usize) {
        let body = match self.players.get(player).and_then(|p| p.mo) {
            Some(body) => body,
            None => { return; }
        };
        let mut damage = (self.p_random() % 10 + 1) << 1;
        if self.players[player].power(PowerType::Strength) > 0 {
            damage *= 10;
        }
        let facing = match self.mobjs.get(body) {
            Some(mo) => mo.angle,
            None => { return; }
        };
        let angle = facing + Angle((self.p_signed_random() << 18) as u32);
        let slope = self.melee_aim(body, angle, MELEERANGE, true);
        self.line_attack(body, angle, MELEERANGE, slope, damage);

        if let Some(target) = self.linetarget {
            self.start_sound(Some(body), Sound::Punch);
            self.face(body, target);
        }
    }

    pub fn saw(&mut self, player: usize) {
        let body = match self.players.get(player).and_then(|p| p.mo) {
            Some(body) => body,
            None => { return; }
        };
        let damage = 2 * (self.p_random() % 10 + 1);
        let facing = match self.mobjs.get(body) {
            Some(mo) => mo.angle,
            None => { return; }
        };
        let angle = facing + Angle((self.p_signed_random() << 18) as u32);

        // One past melee range, so the puff doesn't skip the spark
        let range = MELEERANGE + 1;
        let mbf = self.config.policy().mbf_features;
        let slope = self.melee_aim(body, angle, range, mbf);
        self.line_attack(body, angle, range, slope, damage);

        let target = match self.linetarget {
            Some(target) => target,
            None => {
                self.start_sound(Some(body), Sound::SawFull);
                return;
            }
        };
        self.start_sound(Some(body), Sound::SawHit);

        // Turn toward the victim, a bit at a time
        let toward = match self.mobjs.get(target) {
            Some(t) => {
                let (x, y) = match self.mobjs.get(body) {
                    Some(mo) => (mo.x, mo.y),
                    None => { return; }
                };
                point_to_angle2(x, y, t.x, t.y)
            }
            None => { return; }
        };
        let step = ANG90.0 / 20;
        let near = ANG90.0 / 21;
        let delta = toward.0.wrapping_sub(facing.0);
        let turned =
            if delta > ANG180.0 {
                // Negated before dividing, so this almost never snaps
                if delta < ANG90.0.wrapping_neg() / 20 {
                    toward.0.wrapping_add(near)
                }
                else {
                    facing.0.wrapping_sub(step)
                }
            }
            else if delta > step {
                toward.0.wrapping_sub(near)
            }
            else {
                facing.0.wrapping_add(step)
            };
        if let Some(mo) = self.mobjs.get_mut(body) {
            mo.angle = Angle(turned);
            mo.flags |= MobjFlags::JUSTATTACKED;
        }
    }

    fn face(&mut self, id: MobjId, target: MobjId) {
        let (tx, ty) = match self.mobjs.get(target) {
            Some(t) => (t.x, t.y),
            None => { return; }
        };
        if let Some(mo) = self.mobjs.get_mut(id) {
            mo.angle = point_to_angle2(mo.x, mo.y, tx, ty);
        }
    }
}
