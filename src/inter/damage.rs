use fixed::{Fixed, FRACUNIT, fixed_div, fixed_mul};
use info::{MobjType, StateNum};
use mobj::{ExtraFlags, MobjFlags, MobjFlags2, MobjFlags3, MobjId, both_friend, same_friend};
use player::{Cheats, PowerType};
use rules::{ArmorAbsorb, Skill, VoodooMode};
use tables::{ANG180, point_to_angle2};
use weapons::{STAFF, WeaponFlags};
use world::World;

use super::STAFF_POWER_THRUST;

/// How long a monster sticks with whoever just hurt it before it can be distracted
pub const BASETHRESHOLD: i32 = 100;
/// Damage at or above this gets through invulnerability and god mode
pub const TELEFRAG_DAMAGE: i32 = 10000;

/// What a Heretic inflictor does before the usual damage runs.
enum InflictorEffect {
    /// Damage as usual, possibly with a new amount
    Proceed(i32),
    /// Skip the rest, with this result
    Done(bool),
}

impl World {
    /// Hurt `target`.  `inflictor` is what hit it (a missile, a puff, the attacker itself for
    /// melee) and `source` is whoever is responsible; either can be None for environmental
    /// damage.  True if the damage went through.
    pub fn damage_mobj(&mut self, target: MobjId, inflictor: Option<MobjId>, source: Option<MobjId>, damage: i32) -> bool {
        // Nothing to do, and a zero hit mustn't roll for pain or re-gib a corpse
        if damage <= 0 {
            return false;
        }
        let mut target = target;
        let mut damage = damage;
        let policy = self.config.policy();
        debug_assert!(!(policy.heretic_specials && policy.hexen_specials), "Heretic and Hexen rules both active");
        debug_assert!(!(policy.mbf_features && (policy.heretic_specials || policy.hexen_specials)),
            "MBF and Raven flag meanings overlap");

        let nplayers = self.players.len();
        let source_player = source
            .and_then(|id| self.mobjs.get(id))
            .and_then(|mo| mo.player)
            .filter(|&p| p < nplayers);
        let mut target_player = match self.mobjs.get(target) {
            Some(mo) => mo.player.filter(|&p| p < nplayers),
            None => { return false; }
        };

        let mut voodoo = false;
        if let Some(mut tp) = target_player {
            voodoo = self.players[tp].mo != Some(target);
            if voodoo {
                let doll = target;
                let mode = self.config.voodoo_mode;
                if mode >= VoodooMode::Target {
                    let shooter = source_player.filter(|&sp| self.players[sp].mo == source);
                    let switcher = self.spechit_player
                        .filter(|&sp| self.players.get(sp).map_or(false, |p| p.mo.is_some()));
                    if let Some(sp) = shooter.or(switcher) {
                        tp = sp;
                    }
                }

                let real = match self.players[tp].mo {
                    Some(real) => real,
                    None => {
                        // Nobody to pass it on to
                        if mode < VoodooMode::Target {
                            self.remove_mobj(doll);
                        }
                        return false;
                    }
                };

                if mode != VoodooMode::Vanilla {
                    if self.config.multiplayer && damage > self.players[tp].health {
                        // A doll in a crusher would otherwise kill the player again on every respawn
                        if let Some(mo) = self.mobjs.get_mut(doll) {
                            mo.health = 0;
                            mo.player = None;
                        }
                        self.kill_mobj(doll, inflictor, source);
                        self.spechit_player = None;
                    }
                    target = real;
                }
                target_player = Some(tp);
            }

            if self.config.skill == Skill::Baby {
                damage >>= 1;
            }
        }

        let (flags, flags3, eflags, health, kind) = match self.mobjs.get(target) {
            Some(mo) => (mo.flags, mo.flags3, mo.eflags, mo.health, mo.kind),
            None => { return false; }
        };
        let (inflictor_kind, inflictor_flags, inflictor_flags2, inflictor_flags3) =
            match inflictor.and_then(|id| self.mobjs.get(id)) {
                Some(mo) => (Some(mo.kind), mo.flags, mo.flags2, mo.flags3),
                None => (None, MobjFlags::empty(), MobjFlags2::empty(), MobjFlags3::empty()),
            };

        if !flags.intersects(MobjFlags::SHOOTABLE | MobjFlags::BOUNCES) {
            return false;
        }

        if health <= 0 {
            if policy.hexen_specials {
                if inflictor_flags3.contains(MobjFlags3::ICEDAMAGE) {
                    return false;
                }
                if eflags.contains(ExtraFlags::ICECORPSE) {
                    // Frozen solid; let it shatter
                    if let Some(mo) = self.mobjs.get_mut(target) {
                        mo.tics = 1;
                        mo.momx = 0;
                        mo.momy = 0;
                    }
                }
            }
            // Only corpses can be hurt any further, into gibs
            if !flags.contains(MobjFlags::CORPSE) {
                return false;
            }
        }

        if policy.hexen_specials {
            if flags3.contains(MobjFlags3::INVULNERABLE) && damage < TELEFRAG_DAMAGE {
                return false;
            }
            if let Some(tp) = target_player {
                let p = &self.players[tp];
                if (p.is_god() || p.power(PowerType::Invulnerability) > 0) && damage < TELEFRAG_DAMAGE {
                    return false;
                }
            }
        }

        if flags.contains(MobjFlags::SKULLFLY) {
            // The minotaur can't be hurt mid-charge
            if kind == MobjType::Minotaur {
                return false;
            }
            if let Some(mo) = self.mobjs.get_mut(target) {
                mo.momx = 0;
                mo.momy = 0;
                mo.momz = 0;
            }
        }

        if flags3.contains(MobjFlags3::DORMANT) {
            return false;
        }

        if policy.heretic_specials {
            if let (Some(inf), Some(inf_kind)) = (inflictor, inflictor_kind) {
                match self.heretic_inflictor(target, target_player, inf, inf_kind, inflictor_flags, damage) {
                    InflictorEffect::Proceed(amount) => damage = amount,
                    InflictorEffect::Done(result) => { return result; }
                }
            }
        }

        // Knockback, unless the weapon is one that holds its victim in place
        let no_thrust_weapon = match source_player {
            Some(sp) => {
                let ready = self.players[sp].readyweapon;
                policy.hexen_specials
                    || self.weapon_info(sp, ready).map_or(false, |w| w.flags.contains(WeaponFlags::NO_THRUST))
            }
            None => false,
        };
        if inflictor_kind.is_some()
            && !flags.contains(MobjFlags::NOCLIP)
            && !inflictor_flags2.contains(MobjFlags2::NODMGTHRUST)
            && !no_thrust_weapon
        {
            if let Some(inf) = inflictor {
                let staff_powered = policy.heretic_specials
                    && source.is_some()
                    && source == inflictor
                    && source_player.map_or(false, |sp| {
                        let p = &self.players[sp];
                        p.power(PowerType::WeaponLevel2) > 0 && p.readyweapon == STAFF
                    });
                self.thrust_from(target, inf, damage, staff_powered);
            }
        }

        if flags.contains(MobjFlags::CORPSE) {
            let spawnhealth = self.info.info(kind).spawnhealth;
            // Only the hit that crosses the line blows it apart
            let gibbed = match self.mobjs.get_mut(target) {
                Some(mo) => {
                    let old = mo.health;
                    mo.health -= damage;
                    old >= -spawnhealth && mo.health < -spawnhealth
                }
                None => false,
            };
            if gibbed {
                self.kill_mobj(target, inflictor, source);
            }
            // Corpses never roll for pain
            return true;
        }

        let mut takedamage = true;
        if let Some(tp) = target_player {
            let (target_health, special) = match self.mobjs.get(target) {
                Some(mo) => (mo.health, self.sector_of(mo).map_or(0, |s| self.level.sector(s).special)),
                None => { return false; }
            };
            // The end of the game can't kill you
            if self.config.ruleset.is_doom() && special == 11 && damage >= target_health {
                damage = target_health - 1;
            }

            if policy.armor == ArmorAbsorb::Hexen {
                damage = self.absorb_hexen_armor(tp, damage);
            }
            else {
                {
                    let p = &self.players[tp];
                    if p.is_god() || p.power(PowerType::Invulnerability) > 0 {
                        if p.cheats.contains(Cheats::GODMODE) && self.config.invul_god {
                            return false;
                        }
                        if damage < 1000 {
                            return false;
                        }
                    }
                }
                damage = self.absorb_armor(tp, policy.armor, damage);
            }

            let allowed = source.is_none()
                || source_player.is_none()
                || voodoo
                || damage > 1000
                || source == Some(target)
                || !self.config.multiplayer
                || (!self.config.is_deathmatch() && self.config.teamdamage)
                || (self.config.is_deathmatch() && (
                        !self.config.teamplay
                        || self.config.teamdamage
                        || source_player.map_or(true, |sp| self.players[sp].team != self.players[tp].team)));
            if allowed {
                let (health, chicken) = (self.players[tp].health, self.players[tp].is_chicken());
                if damage >= health
                    && (self.config.skill == Skill::Baby || self.config.is_deathmatch())
                    && !chicken
                {
                    self.auto_use_health(tp, damage - health + 1);
                }
                let p = &mut self.players[tp];
                p.health = (p.health - damage).max(0);
                p.damagecount = (p.damagecount + damage).min(100);
            }
            else {
                takedamage = false;
            }
            self.players[tp].attacker = source;
        }

        let mut mbf_justhit = false;
        if takedamage {
            let health = match self.mobjs.get_mut(target) {
                Some(mo) => {
                    mo.health -= damage;
                    mo.health
                }
                None => { return false; }
            };

            if health <= 0 {
                self.mark_death_kind(target, target_player, inflictor_kind, inflictor_flags2, inflictor_flags3, damage, health);
                self.kill_mobj(target, inflictor, source);
                return true;
            }

            if let Some(tp) = target_player {
                let health = self.players[tp].health;
                self.sync_body_health(tp, health);
            }

            if policy.mbf_features && target_player.is_some() {
                // So friends can tell who's hurting their player
                if let Some(mo) = self.mobjs.get_mut(target) {
                    mo.target = source;
                }
            }

            let (painchance, painstate) = {
                let info = self.info.info(kind);
                (info.painchance, info.painstate)
            };
            let roll = self.p_random();
            if roll < painchance && !flags.intersects(MobjFlags::SKULLFLY | MobjFlags::CORPSE) {
                if policy.mbf_features {
                    mbf_justhit = true;
                }
                else if let Some(mo) = self.mobjs.get_mut(target) {
                    mo.flags |= MobjFlags::JUSTHIT;
                }
                self.set_mobj_state(target, painstate);
            }

            if let Some(mo) = self.mobjs.get_mut(target) {
                mo.reactiontime = 0;
            }
        }

        if let Some(src) = source {
            if src != target && self.provokes(target, src) {
                self.retaliate(target, src);
            }
        }

        if mbf_justhit {
            let fight_back = match self.mobjs.get(target) {
                Some(mo) => match mo.target.and_then(|t| self.mobjs.get(t)) {
                    None => true,
                    Some(enemy) => mo.target == source || !both_friend(mo, enemy),
                },
                None => false,
            };
            if fight_back {
                if let Some(mo) = self.mobjs.get_mut(target) {
                    mo.flags |= MobjFlags::JUSTHIT;
                }
            }
        }

        return takedamage;
    }

    fn heretic_inflictor(&mut self, target: MobjId, target_player: Option<usize>, inflictor: MobjId,
                         inflictor_kind: MobjType, inflictor_flags: MobjFlags, damage: i32) -> InflictorEffect {
        let (kind, flags2) = match self.mobjs.get(target) {
            Some(mo) => (mo.kind, mo.flags2),
            None => { return InflictorEffect::Done(false); }
        };
        match inflictor_kind {
            MobjType::EggFx => {
                match target_player {
                    Some(tp) => { self.chicken_morph_player(tp); }
                    None => { self.chicken_morph(target); }
                }
                return InflictorEffect::Done(false);
            }
            MobjType::Whirlwind => {
                return InflictorEffect::Done(self.touch_whirlwind(target));
            }
            MobjType::Minotaur => {
                if inflictor_flags.contains(MobjFlags::SKULLFLY) {
                    self.minotaur_slam(inflictor, target);
                    return InflictorEffect::Done(true);
                }
            }
            MobjType::MaceFx4 => {
                // No cheap boss kills
                if flags2.contains(MobjFlags2::BOSS) || kind == MobjType::HHead {
                    return InflictorEffect::Proceed(damage);
                }
                if let Some(tp) = target_player {
                    if self.players[tp].power(PowerType::Invulnerability) > 0 {
                        return InflictorEffect::Proceed(damage);
                    }
                    if self.auto_use_chaos_device(tp) {
                        return InflictorEffect::Done(false);
                    }
                }
                return InflictorEffect::Proceed(TELEFRAG_DAMAGE);
            }
            MobjType::PhoenixFx2 => {
                if target_player.is_some() && self.p_random() < 128 {
                    if let Some(mo) = self.mobjs.get_mut(target) {
                        mo.reactiontime += 4;
                    }
                }
            }
            MobjType::RainPlr1 | MobjType::RainPlr2 | MobjType::RainPlr3 | MobjType::RainPlr4 => {
                if flags2.contains(MobjFlags2::BOSS) {
                    return InflictorEffect::Proceed((self.p_random() & 7) + 1);
                }
            }
            MobjType::HornRodFx2 | MobjType::PhoenixFx1 => {
                if kind == MobjType::Sorcerer2 && self.p_random() < 96 {
                    self.dsparil_teleport(target);
                    return InflictorEffect::Done(false);
                }
            }
            MobjType::BlasterFx1 | MobjType::Ripper => {
                if kind == MobjType::HHead {
                    let damage = self.p_random() & 1;
                    if damage == 0 {
                        return InflictorEffect::Done(false);
                    }
                    return InflictorEffect::Proceed(damage);
                }
            }
            _ => {}
        }
        return InflictorEffect::Proceed(damage);
    }

    /// Push `target` away from `inflictor`, harder for more damage and less for more mass.
    fn thrust_from(&mut self, target: MobjId, inflictor: MobjId, damage: i32, staff_powered: bool) {
        let (ix, iy, iz, imomz) = match self.mobjs.get(inflictor) {
            Some(mo) => (mo.x, mo.y, mo.z, mo.momz),
            None => { return; }
        };
        let (tx, ty, tz, theight, thealth, tflags, kind) = match self.mobjs.get(target) {
            Some(mo) => (mo.x, mo.y, mo.z, mo.height, mo.health, mo.flags, mo.kind),
            None => { return; }
        };
        let mass = self.info.info(kind).mass.max(1);
        let factor = self.config.policy().thrust_factor;

        let mut angle = point_to_angle2(ix, iy, tx, ty);
        // Unsigned, so huge telefrag damage wraps instead of flipping sign
        let mut thrust = ((factor as u32).wrapping_mul(damage as u32) / mass as u32) as Fixed;

        // Sometimes a kill from below knocks the victim forward off a ledge
        if damage < 40
            && damage > thealth
            && tz.wrapping_sub(iz) > 64 * FRACUNIT
            && (self.p_random() & 1) != 0
        {
            angle += ANG180;
            thrust = thrust.wrapping_mul(4);
        }

        let rocket_jump = self.config.rocket_jump;
        let mo = match self.mobjs.get_mut(target) {
            Some(mo) => mo,
            None => { return; }
        };
        if staff_powered {
            mo.momx = mo.momx.wrapping_add(fixed_mul(STAFF_POWER_THRUST, angle.cos()));
            mo.momy = mo.momy.wrapping_add(fixed_mul(STAFF_POWER_THRUST, angle.sin()));
            if !tflags.contains(MobjFlags::NOGRAVITY) {
                mo.momz = mo.momz.wrapping_add(5 * FRACUNIT);
            }
            return;
        }

        let amomx = fixed_mul(thrust, angle.cos());
        let amomy = fixed_mul(thrust, angle.sin());
        mo.momx = mo.momx.wrapping_add(amomx);
        mo.momy = mo.momy.wrapping_add(amomy);
        if rocket_jump {
            let below = iz.wrapping_sub(tz).wrapping_abs();
            let above = iz.wrapping_sub(tz.wrapping_add(theight)).wrapping_abs();
            let mut amomz = (amomx.wrapping_abs().wrapping_add(amomy.wrapping_abs())) >> 1;
            if below >= above && imomz < 0 {
                amomz = -amomz;
            }
            mo.momz = mo.momz.wrapping_add(amomz);
        }
    }

    /// Doom and Heretic armor: the class decides what fraction is soaked up, until the armor runs
    /// out.  Returns what gets through.
    fn absorb_armor(&mut self, player: usize, absorb: ArmorAbsorb, damage: i32) -> i32 {
        let p = &mut self.players[player];
        if p.armortype == 0 {
            return damage;
        }
        let mut saved = match (absorb, p.armortype) {
            (ArmorAbsorb::Heretic, 1) => damage >> 1,
            (ArmorAbsorb::Heretic, _) => (damage >> 1) + (damage >> 2),
            (_, 1) => damage / 3,
            (_, _) => damage / 2,
        };
        if p.armorpoints <= saved {
            saved = p.armorpoints;
            p.armortype = 0;
        }
        p.armorpoints -= saved;
        return damage - saved;
    }

    /// Hexen armor: every piece worn adds to a percentage saved, and each hit wears the pieces
    /// down by an amount that depends on the class.
    fn absorb_hexen_armor(&mut self, player: usize, damage: i32) -> i32 {
        let p = &mut self.players[player];
        let class = match p.pclass {
            Some(class) => class,
            None => { return damage; }
        };
        let mut saved_per = class.auto_armor_save();
        for &points in p.hexen_armor.iter() {
            saved_per = saved_per.wrapping_add(points);
        }
        if saved_per == 0 {
            return damage;
        }
        saved_per = saved_per.min(100 * FRACUNIT);

        let fixed_damage = damage.wrapping_shl(16);
        for (slot, points) in p.hexen_armor.iter_mut().enumerate() {
            if *points != 0 {
                let wear = fixed_mul(fixed_damage, class.armor_increment(slot));
                *points -= fixed_div(wear, 300 * FRACUNIT);
            }
            if *points < 2 * FRACUNIT {
                *points = 0;
            }
        }
        let saved: Fixed = fixed_div(fixed_mul(fixed_damage, saved_per), 100 * FRACUNIT)
            .min(saved_per.wrapping_mul(2));
        return damage - (saved >> 16);
    }

    /// Record how something died, for the death animation to pick up.
    fn mark_death_kind(&mut self, target: MobjId, target_player: Option<usize>, inflictor_kind: Option<MobjType>,
                       inflictor_flags2: MobjFlags2, inflictor_flags3: MobjFlags3, damage: i32, health: i32) {
        let policy = self.config.policy();
        let chicken = target_player.map_or(false, |tp| self.players[tp].is_chicken());
        let mo = match self.mobjs.get_mut(target) {
            Some(mo) => mo,
            None => { return; }
        };
        if policy.heretic_specials {
            mo.special1 = damage;
            if target_player.is_some() && !chicken && inflictor_kind.is_some() {
                let flame = inflictor_flags2.contains(MobjFlags2::FIREDAMAGE)
                    || (inflictor_kind == Some(MobjType::PhoenixFx1) && health > -50 && damage > 25);
                if flame {
                    mo.flags2 |= MobjFlags2::FIREDAMAGE;
                }
            }
        }
        else if policy.hexen_specials && inflictor_kind.is_some() {
            if inflictor_flags2.contains(MobjFlags2::FIREDAMAGE) {
                if target_player.is_some() && !chicken {
                    if health > -50 && damage > 25 {
                        mo.flags2 |= MobjFlags2::FIREDAMAGE;
                    }
                }
                else {
                    mo.flags2 |= MobjFlags2::FIREDAMAGE;
                }
            }
            else if inflictor_flags3.contains(MobjFlags3::ICEDAMAGE) {
                mo.flags3 |= MobjFlags3::ICEDAMAGE;
            }
        }
    }

    /// Whether `source` hurting `target` is enough to make it turn on `source`.
    fn provokes(&self, target: MobjId, source: MobjId) -> bool {
        let policy = self.config.policy();
        let (t, s) = match (self.mobjs.get(target), self.mobjs.get(source)) {
            (Some(t), Some(s)) => (t, s),
            _ => { return false; }
        };
        if s.flags3.contains(MobjFlags3::DMGIGNORED) {
            return false;
        }
        if t.threshold != 0 && !t.flags3.contains(MobjFlags3::NOTHRESHOLD) {
            return false;
        }
        if (policy.heretic_specials || policy.hexen_specials)
            && (s.flags2.contains(MobjFlags2::BOSS)
                || (s.kind == MobjType::Wizard && t.kind == MobjType::Sorcerer2))
        {
            return false;
        }
        if !self.config.monster_infighting && policy.mbf_features && same_friend(s, t) {
            return false;
        }
        if policy.mbf21_features {
            let group = self.info.info(t.kind).infight_group;
            if group != 0 && group == self.info.info(s.kind).infight_group {
                return false;
            }
        }
        return true;
    }

    fn retaliate(&mut self, target: MobjId, source: MobjId) {
        let mbf = self.config.policy().mbf_features;
        let (current, lastenemy, state, kind) = match self.mobjs.get(target) {
            Some(mo) => (mo.target, mo.lastenemy, mo.state, mo.kind),
            None => { return; }
        };

        // Remember the old enemy, so the monster doesn't go back to sleep once this one is dead
        let forget = match lastenemy.and_then(|id| self.mobjs.get(id)) {
            None => true,
            Some(enemy) if enemy.health <= 0 => true,
            Some(enemy) => {
                if mbf {
                    match self.mobjs.get(target) {
                        Some(t) => current != Some(source) && same_friend(t, enemy),
                        None => false,
                    }
                }
                else {
                    enemy.player.is_none()
                }
            }
        };

        let (spawnstate, seestate) = {
            let info = self.info.info(kind);
            (info.spawnstate, info.seestate)
        };
        if let Some(mo) = self.mobjs.get_mut(target) {
            if forget {
                mo.lastenemy = current;
            }
            mo.target = Some(source);
            mo.threshold = BASETHRESHOLD;
        }
        if state == spawnstate && seestate != StateNum::NULL {
            self.set_mobj_state(target, seestate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::to_fixed;
    use inter::testing::world_with;
    use player::PlayerClass;
    use rules::{GameConfig, Ruleset};
    use tables::{Angle, ANG90};
    use weapons::WeaponType;
    use world::ONFLOORZ;

    fn monster(world: &mut World, x: i32, kind: MobjType) -> MobjId {
        world.spawn_mobj(to_fixed(x), 0, ONFLOORZ, kind)
    }

    #[test]
    fn plain_damage_and_death() {
        let (mut world, _) = world_with(GameConfig::default());
        let imp = monster(&mut world, 100, MobjType::Troop);
        assert!(world.damage_mobj(imp, None, None, 20));
        assert_eq!(world.mobj(imp).unwrap().health, 40);
        assert!(world.damage_mobj(imp, None, None, 100));
        let mo = world.mobj(imp).unwrap();
        assert!(mo.flags.contains(MobjFlags::CORPSE));
        assert!(!mo.flags.contains(MobjFlags::SHOOTABLE));
        // Dead and unshootable now
        assert!(!world.damage_mobj(imp, None, None, 10));
    }

    #[test]
    fn unshootable_things_are_untouched() {
        let (mut world, _) = world_with(GameConfig::default());
        let stim = monster(&mut world, 50, MobjType::Stimpack);
        assert!(!world.damage_mobj(stim, None, None, 10));
        assert_eq!(world.mobj(stim).unwrap().health, 1000);
    }

    #[test]
    fn zero_damage_changes_nothing() {
        let (mut world, p) = world_with(GameConfig::default());
        world.players[p].armortype = 1;
        world.players[p].armorpoints = 50;
        let me = world.players[p].mo.unwrap();
        world.damage_mobj(me, None, None, 0);
        assert_eq!(world.players[p].health, 100);
        assert_eq!(world.players[p].armorpoints, 50);
        assert_eq!(world.mobj(me).unwrap().health, 100);
    }

    #[test]
    fn green_armor_takes_a_third() {
        let (mut world, p) = world_with(GameConfig::default());
        world.players[p].armortype = 1;
        world.players[p].armorpoints = 100;
        let me = world.players[p].mo.unwrap();
        world.damage_mobj(me, None, None, 30);
        assert_eq!(world.players[p].armorpoints, 90);
        assert_eq!(world.players[p].health, 80);
        assert_eq!(world.mobj(me).unwrap().health, 80);
        assert_eq!(world.players[p].damagecount, 20);
    }

    #[test]
    fn worn_out_armor_is_dropped() {
        let (mut world, p) = world_with(GameConfig::default());
        world.players[p].armortype = 2;
        world.players[p].armorpoints = 5;
        let me = world.players[p].mo.unwrap();
        world.damage_mobj(me, None, None, 40);
        assert_eq!(world.players[p].armortype, 0);
        assert_eq!(world.players[p].armorpoints, 0);
        assert_eq!(world.players[p].health, 65);
    }

    #[test]
    fn heretic_armor_is_stronger() {
        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Heretic;
        let (mut world, p) = world_with(config);
        world.players[p].armortype = 2;
        world.players[p].armorpoints = 200;
        let me = world.players[p].mo.unwrap();
        world.damage_mobj(me, None, None, 40);
        assert_eq!(world.players[p].armorpoints, 170);
        assert_eq!(world.players[p].health, 90);
    }

    #[test]
    fn telefrag_beats_god_mode() {
        let (mut world, p) = world_with(GameConfig::default());
        world.players[p].cheats |= Cheats::GODMODE;
        let me = world.players[p].mo.unwrap();
        assert!(!world.damage_mobj(me, None, None, 500));
        assert_eq!(world.players[p].health, 100);
        assert!(world.damage_mobj(me, None, None, TELEFRAG_DAMAGE));
        assert!(world.players[p].health < 100);

        // Unless god mode is meant to be absolute
        let mut config = GameConfig::default();
        config.invul_god = true;
        let (mut world, p) = world_with(config);
        world.players[p].cheats |= Cheats::GODMODE;
        let me = world.players[p].mo.unwrap();
        assert!(!world.damage_mobj(me, None, None, TELEFRAG_DAMAGE));
    }

    #[test]
    fn baby_skill_halves_player_damage() {
        let mut config = GameConfig::default();
        config.skill = Skill::Baby;
        let (mut world, p) = world_with(config);
        let me = world.players[p].mo.unwrap();
        world.damage_mobj(me, None, None, 30);
        assert_eq!(world.players[p].health, 85);
    }

    #[test]
    fn thrust_follows_the_ruleset_constant() {
        for &(ruleset, factor) in [(Ruleset::Vanilla, 100), (Ruleset::Heretic, 150)].iter() {
            let mut config = GameConfig::default();
            config.ruleset = ruleset;
            let (mut world, p) = world_with(config);
            let me = world.players[p].mo.unwrap();
            world.players[p].readyweapon = WeaponType::Missile;
            let target = monster(&mut world, 200, MobjType::Sergeant);
            world.info.info_mut(MobjType::Sergeant).mass = 100;
            let rocket = world.spawn_mobj(to_fixed(100), 0, 0, MobjType::Rocket);
            world.damage_mobj(target, Some(rocket), Some(me), 40);

            let thrust = factor * (FRACUNIT >> 3) * 40 / 100;
            let mo = world.mobj(target).unwrap();
            assert_eq!(mo.momx, fixed_mul(thrust, Angle(0).cos()));
            assert_eq!(mo.momy, fixed_mul(thrust, Angle(0).sin()));
            assert_eq!(mo.momz, 0);
        }
    }

    #[test]
    fn chainsaw_doesnt_push() {
        let (mut world, p) = world_with(GameConfig::default());
        let me = world.players[p].mo.unwrap();
        world.players[p].readyweapon = WeaponType::Chainsaw;
        let target = monster(&mut world, 40, MobjType::Sergeant);
        world.damage_mobj(target, Some(me), Some(me), 10);
        let mo = world.mobj(target).unwrap();
        assert_eq!((mo.momx, mo.momy), (0, 0));
    }

    #[test]
    fn rocket_jump_adds_lift() {
        let mut config = GameConfig::default();
        config.rocket_jump = true;
        let (mut world, p) = world_with(config);
        let me = world.players[p].mo.unwrap();
        world.players[p].readyweapon = WeaponType::Missile;
        let rocket = world.spawn_mobj(to_fixed(-10), 0, 0, MobjType::Rocket);
        world.damage_mobj(me, Some(rocket), Some(me), 20);
        let mo = world.mobj(me).unwrap();
        assert!(mo.momx > 0);
        assert_eq!(mo.momz, (mo.momx.abs() + mo.momy.abs()) >> 1);
    }

    #[test]
    fn monsters_turn_on_their_attacker() {
        let (mut world, _) = world_with(GameConfig::default());
        let imp = monster(&mut world, 100, MobjType::Troop);
        let demon = monster(&mut world, -100, MobjType::Sergeant);
        world.damage_mobj(imp, Some(demon), Some(demon), 1);
        let mo = world.mobj(imp).unwrap();
        assert_eq!(mo.target, Some(demon));
        assert_eq!(mo.threshold, BASETHRESHOLD);
        assert_eq!(mo.reactiontime, 0);
    }

    #[test]
    fn archviles_are_ignored() {
        let (mut world, _) = world_with(GameConfig::default());
        let imp = monster(&mut world, 100, MobjType::Troop);
        let vile = monster(&mut world, -100, MobjType::Vile);
        world.damage_mobj(imp, Some(vile), Some(vile), 1);
        assert_eq!(world.mobj(imp).unwrap().target, None);
    }

    #[test]
    fn threshold_holds_attention() {
        let (mut world, _) = world_with(GameConfig::default());
        let imp = monster(&mut world, 100, MobjType::Troop);
        let a = monster(&mut world, -100, MobjType::Sergeant);
        let b = monster(&mut world, -200, MobjType::Sergeant);
        world.damage_mobj(imp, Some(a), Some(a), 1);
        world.damage_mobj(imp, Some(b), Some(b), 1);
        assert_eq!(world.mobj(imp).unwrap().target, Some(a));
    }

    #[test]
    fn infight_groups_are_immune_under_mbf21() {
        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Mbf21;
        let (mut world, _) = world_with(config);
        world.info.info_mut(MobjType::Troop).infight_group = 3;
        world.info.info_mut(MobjType::Sergeant).infight_group = 3;
        let imp = monster(&mut world, 100, MobjType::Troop);
        let demon = monster(&mut world, -100, MobjType::Sergeant);
        world.damage_mobj(imp, Some(demon), Some(demon), 1);
        assert_eq!(world.mobj(imp).unwrap().target, None);
    }

    #[test]
    fn coop_players_dont_hurt_each_other() {
        let mut config = GameConfig::default();
        config.multiplayer = true;
        let (mut world, p) = world_with(config);
        let q = world.add_player();
        let them = world.spawn_player(q, to_fixed(100), 0, ANG90).unwrap();
        let me = world.players[p].mo.unwrap();
        assert!(!world.damage_mobj(them, Some(me), Some(me), 10));
        assert_eq!(world.players[q].health, 100);
        // Telefrags always count
        assert!(world.damage_mobj(them, Some(me), Some(me), TELEFRAG_DAMAGE));
    }

    #[test]
    fn deathmatch_teams() {
        let mut config = GameConfig::default();
        config.multiplayer = true;
        config.deathmatch = 2;
        config.teamplay = true;
        let (mut world, p) = world_with(config);
        let q = world.add_player();
        let them = world.spawn_player(q, to_fixed(100), 0, ANG90).unwrap();
        let me = world.players[p].mo.unwrap();
        assert!(!world.damage_mobj(them, Some(me), Some(me), 10));
        world.players[q].team = 1;
        assert!(world.damage_mobj(them, Some(me), Some(me), 10));
        assert_eq!(world.players[q].health, 90);
    }

    #[test]
    fn vanilla_voodoo_dolls_pass_damage_on() {
        let (mut world, p) = world_with(GameConfig::default());
        let doll = monster(&mut world, -100, MobjType::Player);
        world.mobj_mut(doll).unwrap().player = Some(p);
        assert!(world.damage_mobj(doll, None, None, 10));
        assert_eq!(world.players[p].health, 90);
        let me = world.players[p].mo.unwrap();
        assert_eq!(world.mobj(me).unwrap().health, 90);
    }

    #[test]
    fn targeted_voodoo_blames_the_shooter() {
        let mut config = GameConfig::default();
        config.voodoo_mode = VoodooMode::Target;
        config.multiplayer = true;
        let (mut world, p) = world_with(config);
        let q = world.add_player();
        let shooter = world.spawn_player(q, to_fixed(100), 0, ANG90).unwrap();
        let doll = monster(&mut world, -100, MobjType::Player);
        world.mobj_mut(doll).unwrap().player = Some(p);
        world.damage_mobj(doll, Some(shooter), Some(shooter), 10);
        assert_eq!(world.players[q].health, 90);
        assert_eq!(world.players[p].health, 100);
    }

    #[test]
    fn dolls_without_a_player_are_cleared_away() {
        let (mut world, p) = world_with(GameConfig::default());
        let doll = monster(&mut world, -100, MobjType::Player);
        world.mobj_mut(doll).unwrap().player = Some(p);
        let me = world.players[p].mo.unwrap();
        world.remove_mobj(me);
        world.players[p].mo = None;
        assert!(!world.damage_mobj(doll, None, None, 10));
        assert!(world.mobj(doll).is_none());
    }

    #[test]
    fn end_of_game_sector_leaves_one_health() {
        let (mut world, p) = world_with(GameConfig::default());
        let me = world.players[p].mo.unwrap();
        let sector = world.sector_of(world.mobj(me).unwrap()).unwrap();
        world.level.sector_mut(sector).special = 11;
        world.damage_mobj(me, None, None, 500);
        assert_eq!(world.players[p].health, 1);
    }

    #[test]
    fn hexen_armor_soaks_by_class() {
        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Hexen;
        let (mut world, p) = world_with(config);
        world.players[p].pclass = Some(PlayerClass::Fighter);
        world.players[p].hexen_armor = [25 * FRACUNIT, 0, 0, 0];
        let me = world.players[p].mo.unwrap();
        world.damage_mobj(me, None, None, 20);
        // 40% of 20 saved
        assert_eq!(world.players[p].health, 88);
        assert!(world.players[p].hexen_armor[0] < 25 * FRACUNIT);
    }

    #[test]
    fn minotaur_is_immune_while_charging() {
        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Heretic;
        let (mut world, _) = world_with(config);
        let bull = monster(&mut world, 100, MobjType::Minotaur);
        world.mobj_mut(bull).unwrap().flags |= MobjFlags::SKULLFLY;
        assert!(!world.damage_mobj(bull, None, None, 50));
        assert_eq!(world.mobj(bull).unwrap().health, 3000);
    }

    #[test]
    fn solid_corpses_gib() {
        let mut config = GameConfig::default();
        config.solid_corpse = true;
        let (mut world, _) = world_with(config);
        let imp = monster(&mut world, 100, MobjType::Troop);
        world.damage_mobj(imp, None, None, 61);
        assert!(world.mobj(imp).unwrap().flags.contains(MobjFlags::SHOOTABLE));
        assert!(world.damage_mobj(imp, None, None, 100));
        assert_eq!(world.mobj(imp).unwrap().state, world.info.gibs_state);
        assert_eq!(world.mobj(imp).unwrap().height, 0);
    }

    #[test]
    fn gibs_stay_gibbed() {
        let mut config = GameConfig::default();
        config.solid_corpse = true;
        let (mut world, _) = world_with(config);
        let imp = monster(&mut world, 100, MobjType::Troop);
        world.damage_mobj(imp, None, None, 61);
        world.damage_mobj(imp, None, None, 100);
        let (health, radius) = {
            let mo = world.mobj(imp).unwrap();
            (mo.health, mo.radius)
        };
        world.drain_events();

        assert!(!world.damage_mobj(imp, None, None, 0));
        assert_eq!(world.mobj(imp).unwrap().health, health);
        assert_eq!(world.mobj(imp).unwrap().radius, radius);
        assert!(world.events.is_empty());

        // Further hits still land, but only the first one past the line blows it apart
        for _ in 0 .. 12 {
            assert!(world.damage_mobj(imp, None, None, 10));
        }
        assert_eq!(world.mobj(imp).unwrap().health, health - 120);
        assert_eq!(world.mobj(imp).unwrap().radius, radius);
        assert_eq!(world.mobj(imp).unwrap().state, world.info.gibs_state);
        assert!(world.events.is_empty());
    }

    #[test]
    fn hexen_invulnerable_things_only_fall_to_telefrags() {
        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Hexen;
        let (mut world, _) = world_with(config);
        let imp = monster(&mut world, 100, MobjType::Troop);
        let rocket = monster(&mut world, 40, MobjType::Rocket);
        world.mobj_mut(imp).unwrap().flags3 |= MobjFlags3::INVULNERABLE;

        assert!(!world.damage_mobj(imp, Some(rocket), None, 50));
        assert!(!world.damage_mobj(imp, None, None, TELEFRAG_DAMAGE - 1));
        assert_eq!(world.mobj(imp).unwrap().health, 60);
        assert!(world.damage_mobj(imp, None, None, TELEFRAG_DAMAGE));
        assert!(world.mobj(imp).unwrap().flags.contains(MobjFlags::CORPSE));
    }

    #[test]
    fn removed_targets_are_a_no_op() {
        let (mut world, _) = world_with(GameConfig::default());
        let imp = monster(&mut world, 100, MobjType::Troop);
        world.remove_mobj(imp);
        assert!(!world.damage_mobj(imp, None, None, 10));
    }
}
