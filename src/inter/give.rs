use info::MobjType;
use mobj::{MobjFlags, MobjFlags2, MobjFlags3, MobjId};
use player::{Artifact, BLINKTHRESHOLD, InventorySlot, MAXARTECONT, MAXCHICKENHEALTH, PICKUP_FLASH_TICS, PlayerClass, PowerType, BONUSADD, KeyCards};
use rules::{AutoswitchPolicy, GameMode, Skill, SkillAmmoBonus, autoswitch_policy};
use weapons::{AmmoType, DroppedAmmo, GAUNTLETS, HERETIC_AMMO_CHANGE, STAFF, WEAPON_AMMO_PICKUP, WeaponFlags, WeaponInfo, WeaponType, ALL_WEAPONS};
use world::{Sound, World};

impl World {
    fn player_exists(&self, player: usize) -> bool {
        if player < self.players.len() {
            return true;
        }
        self.soft_error(format_args!("no player {}", player));
        return false;
    }

    /// Copy of a player's table entry for `weapon`, so it can be looked at while the player changes.
    fn weapon_def(&self, player: usize, weapon: WeaponType) -> Option<WeaponInfo> {
        self.weapon_info(player, weapon).cloned()
    }

    /// Whether the player has enough ammo to fire `weapon` once.  Weapons without ammo always can.
    pub(crate) fn can_fire(&self, player: usize, weapon: WeaponType) -> bool {
        let def = match self.weapon_def(player, weapon) {
            Some(def) => def,
            None => { return false; }
        };
        match def.ammo.index() {
            Some(slot) => self.players[player].ammo[slot] >= def.ammo_per_shot,
            None => true,
        }
    }

    /// The owned, loaded weapon the player likes best.  Ties go to the lower slot.
    pub fn find_best_weapon(&self, player: usize) -> WeaponType {
        let mut best = WeaponType::Fist;
        let mut best_priority: i32 = -1;
        let p = &self.players[player];
        for &weapon in ALL_WEAPONS.iter() {
            if self.config.gamemode != GameMode::Commercial && weapon == WeaponType::SuperShotgun {
                continue;
            }
            if self.config.gamemode == GameMode::Shareware && (weapon == WeaponType::Plasma || weapon == WeaponType::Bfg) {
                continue;
            }

            let priority = p.favoriteweapon[weapon.index()] as i32;
            if p.owns(weapon) && priority > best_priority && self.can_fire(player, weapon) {
                best = weapon;
                best_priority = priority;
            }
        }
        return best;
    }

    /// Switch to the favorite weapon, unless a switch is already on its way.
    pub(crate) fn switch_to_favorite(&mut self, player: usize) {
        if self.players[player].pendingweapon.is_some() {
            return;
        }
        let best = self.find_best_weapon(player);
        if best != self.players[player].readyweapon {
            self.players[player].pendingweapon = Some(best);
        }
    }

    /// Hand out `count` rounds of `ammo`, clamped to the player's maximum, and maybe switch weapons.
    /// False if the player was already full.
    pub fn give_ammo(&mut self, player: usize, ammo: AmmoType, count: i32) -> bool {
        if !self.player_exists(player) {
            return false;
        }
        let slot = match ammo.index() {
            Some(slot) => slot,
            None => { return false; }
        };

        let oldammo = self.players[player].ammo[slot];
        if oldammo >= self.players[player].maxammo[slot] {
            return false;
        }

        let mut count = count;
        if self.config.skill == Skill::Baby || self.config.skill == Skill::Nightmare {
            match self.config.policy().skill_ammo {
                SkillAmmoBonus::Half => count += count >> 1,
                SkillAmmoBonus::Double => count <<= 1,
            }
        }

        let readyweapon = self.players[player].readyweapon;
        let ready = self.weapon_def(player, readyweapon);
        {
            let p = &mut self.players[player];
            let newammo = (oldammo + count).min(p.maxammo[slot]);
            p.ammo[slot] = newammo;
            if newammo > oldammo {
                if ready.as_ref().map_or(false, |def| def.ammo == ammo) {
                    p.ammo_pickup = PICKUP_FLASH_TICS;
                }
                else {
                    p.ammo_pickup = (p.ammo_pickup + PICKUP_FLASH_TICS / 2).min(35);
                }
            }
        }

        let policy = autoswitch_policy(self.config.ruleset, self.players[player].originalweaponswitch);
        if policy == AutoswitchPolicy::Mbf21Flags {
            self.autoswitch_by_flags(player, ammo, oldammo, ready.as_ref());
            return true;
        }

        // The player ran dry on purpose if there was anything left
        if oldammo != 0 {
            return true;
        }

        match policy {
            AutoswitchPolicy::Mbf21Flags => {}
            AutoswitchPolicy::Favorite => {
                if !self.can_fire(player, readyweapon) {
                    self.switch_to_favorite(player);
                }
            }
            AutoswitchPolicy::HereticTable => {
                let change = HERETIC_AMMO_CHANGE[slot];
                let p = &mut self.players[player];
                if (readyweapon == STAFF || readyweapon == GAUNTLETS) && p.owns(change) {
                    p.pendingweapon = Some(change);
                }
            }
            AutoswitchPolicy::FixedPriority => {
                let p = &mut self.players[player];
                let from_fist = readyweapon == WeaponType::Fist;
                let from_pistol = from_fist || readyweapon == WeaponType::Pistol;
                match ammo {
                    AmmoType::Clip if from_fist => {
                        p.pendingweapon = Some(
                            if p.owns(WeaponType::Chaingun) { WeaponType::Chaingun } else { WeaponType::Pistol });
                    }
                    AmmoType::Shell if from_pistol && p.owns(WeaponType::Shotgun) => {
                        p.pendingweapon = Some(WeaponType::Shotgun);
                    }
                    AmmoType::Cell if from_pistol && p.owns(WeaponType::Plasma) => {
                        p.pendingweapon = Some(WeaponType::Plasma);
                    }
                    AmmoType::Missile if from_fist && p.owns(WeaponType::Missile) => {
                        p.pendingweapon = Some(WeaponType::Missile);
                    }
                    _ => {}
                }
            }
        }
        return true;
    }

    /// Per-weapon switching flags: leave a weapon marked as switchable-from for the highest slot
    /// that uses the new ammo, couldn't fire before, and now can.
    fn autoswitch_by_flags(&mut self, player: usize, ammo: AmmoType, oldammo: i32, ready: Option<&WeaponInfo>) {
        let ready = match ready {
            Some(def) => def,
            None => { return; }
        };
        if !ready.flags.contains(WeaponFlags::AUTOSWITCH_FROM) || ready.ammo == ammo {
            return;
        }
        let readyweapon = self.players[player].readyweapon;
        for &weapon in ALL_WEAPONS.iter().rev() {
            if weapon <= readyweapon {
                break;
            }
            if !self.players[player].owns(weapon) {
                continue;
            }
            let def = match self.weapon_def(player, weapon) {
                Some(def) => def,
                None => { continue; }
            };
            let now = ammo.index().map_or(0, |slot| self.players[player].ammo[slot]);
            if !def.flags.contains(WeaponFlags::NO_AUTOSWITCH_TO)
                && def.ammo == ammo
                && oldammo < def.ammo_per_shot
                && def.ammo_per_shot <= now
            {
                self.players[player].pendingweapon = Some(weapon);
                break;
            }
        }
    }

    /// Give a weapon, with the ammo it comes with.  `dropped` is the ammo a dropped weapon carries,
    /// or None for one placed on the map.  True if the player got the weapon or any ammo.
    pub fn give_weapon(&mut self, player: usize, weapon: WeaponType, dropped: Option<DroppedAmmo>) -> bool {
        if !self.player_exists(player) {
            return false;
        }
        let ammo = match self.weapon_def(player, weapon) {
            Some(def) => def.ammo,
            None => {
                self.soft_error(format_args!("no weapon table entry for {:?}", weapon));
                return false;
            }
        };
        let readyweapon = self.players[player].readyweapon;

        if self.config.multiplayer && self.config.weapons_persist() && dropped.is_none() {
            // Placed weapons stay put for everyone; each player gets each one once per map
            {
                let p = &self.players[player];
                if p.owns(weapon) || p.weapons_taken[weapon.index()] {
                    return false;
                }
            }
            {
                let p = &mut self.players[player];
                p.bonuscount += BONUSADD;
                p.weapon_pickup = PICKUP_FLASH_TICS;
                p.weaponowned[weapon.index()] = true;
                p.weapons_taken[weapon.index()] = true;
            }
            let count =
                if self.config.is_deathmatch() {
                    5 * ammo.index().map_or(0, |slot| self.limits.clip_ammo[slot])
                }
                else {
                    WEAPON_AMMO_PICKUP[weapon.index()]
                };
            self.give_ammo(player, ammo, count);

            let p = &mut self.players[player];
            if p.originalweaponswitch || p.favoriteweapon[weapon.index()] > p.favoriteweapon[readyweapon.index()] {
                p.pendingweapon = Some(weapon);
            }
            if player == self.consoleplayer {
                self.start_sound(None, Sound::WpnUp);
            }
            return false;
        }

        let mut gaveammo = false;
        if let Some(slot) = ammo.index() {
            let count = match dropped {
                Some(DroppedAmmo::NoAmmoType) => self.limits.clip_ammo[slot],
                Some(DroppedAmmo::Count(n)) => n as i32,
                None => WEAPON_AMMO_PICKUP[weapon.index()],
            };
            gaveammo = self.give_ammo(player, ammo, count);
        }

        let p = &mut self.players[player];
        let mut gaveweapon = false;
        if !p.owns(weapon) {
            gaveweapon = true;
            p.weaponowned[weapon.index()] = true;
            p.weapon_pickup = PICKUP_FLASH_TICS;
            if p.originalweaponswitch || p.favoriteweapon[weapon.index()] > p.favoriteweapon[readyweapon.index()] {
                p.pendingweapon = Some(weapon);
            }
        }
        return gaveweapon || gaveammo;
    }

    /// Heal up to the normal maximum.  False if already there.
    pub fn give_health(&mut self, player: usize, amount: i32) -> bool {
        if !self.player_exists(player) {
            return false;
        }
        let max = if self.players[player].is_chicken() { MAXCHICKENHEALTH } else { self.limits.max_health };
        let health = {
            let p = &mut self.players[player];
            if p.health >= max {
                return false;
            }
            p.health = (p.health + amount).min(max);
            p.health_pickup = PICKUP_FLASH_TICS;
            p.health
        };
        self.sync_body_health(player, health);
        return true;
    }

    pub(crate) fn sync_body_health(&mut self, player: usize, health: i32) {
        if let Some(mo) = self.players[player].mo {
            if let Some(body) = self.mobjs.get_mut(mo) {
                body.health = health;
            }
        }
    }

    /// Put on armor of the given class, worth a hundred points per class.  Refused if what the
    /// player is wearing is already as good.
    pub fn give_armor(&mut self, player: usize, armortype: i32) -> bool {
        if !self.player_exists(player) {
            return false;
        }
        let hits = armortype * 100;
        let p = &mut self.players[player];
        if p.armorpoints >= hits {
            return false;
        }
        p.armortype = armortype;
        p.armorpoints = hits;
        p.armor_pickup = PICKUP_FLASH_TICS;
        return true;
    }

    pub fn give_card(&mut self, player: usize, card: KeyCards) -> bool {
        if !self.player_exists(player) {
            return false;
        }
        let p = &mut self.players[player];
        if p.cards.contains(card) {
            return false;
        }
        p.cards |= card;
        p.bonuscount = BONUSADD;
        p.key_pickup = PICKUP_FLASH_TICS;
        return true;
    }

    /// Switch on a power.  Timed powers that are still going strong are refused under the Raven
    /// rules; flight and light amplification always are.
    pub fn give_power(&mut self, player: usize, power: PowerType) -> bool {
        if !self.player_exists(player) {
            return false;
        }
        let refuse_blinking = self.config.policy().refuse_blinking_powers;
        let hexen = self.config.policy().hexen_specials;
        let current = self.players[player].power(power);
        let mo = self.players[player].mo;

        let tics = match power {
            PowerType::Invulnerability => {
                if refuse_blinking && current > BLINKTHRESHOLD {
                    return false;
                }
                if hexen {
                    let reflective = self.players[player].pclass == Some(PlayerClass::Mage);
                    if let Some(body) = mo.and_then(|id| self.mobjs.get_mut(id)) {
                        body.flags3 |= MobjFlags3::INVULNERABLE;
                        if reflective {
                            body.flags3 |= MobjFlags3::REFLECTIVE;
                        }
                    }
                }
                power.duration()
            }
            PowerType::WeaponLevel2 => {
                if refuse_blinking && current > BLINKTHRESHOLD {
                    return false;
                }
                power.duration()
            }
            PowerType::Invisibility => {
                if refuse_blinking && current > BLINKTHRESHOLD {
                    return false;
                }
                if let Some(body) = mo.and_then(|id| self.mobjs.get_mut(id)) {
                    body.flags |= MobjFlags::SHADOW;
                }
                power.duration()
            }
            PowerType::Flight => {
                if current > BLINKTHRESHOLD {
                    return false;
                }
                let mut grounded = false;
                if let Some(body) = mo.and_then(|id| self.mobjs.get_mut(id)) {
                    body.flags2 |= MobjFlags2::FLY;
                    body.flags |= MobjFlags::NOGRAVITY;
                    grounded = body.z <= body.floorz;
                }
                if grounded {
                    // Give a little lift off the ground
                    self.players[player].flyheight = 10;
                }
                power.duration()
            }
            PowerType::Infrared => {
                if current > BLINKTHRESHOLD {
                    return false;
                }
                power.duration()
            }
            PowerType::IronFeet => power.duration(),
            PowerType::Strength => {
                self.give_health(player, 100);
                Some(1)
            }
            PowerType::AllMap => {
                if current != 0 {
                    return false;
                }
                Some(1)
            }
        };

        self.players[player].set_power(power, tics.unwrap_or(1));
        return true;
    }

    /// Add one of an artifact to the inventory, up to a stack of sixteen.  `from` is the map
    /// object it came from, for the item count.
    pub fn give_artifact(&mut self, player: usize, artifact: Artifact, from: Option<MobjId>) -> bool {
        if !self.player_exists(player) {
            return false;
        }
        let counts_as_item = from
            .and_then(|id| self.mobjs.get(id))
            .map_or(false, |mo| mo.flags.contains(MobjFlags::COUNTITEM));

        let p = &mut self.players[player];
        let index = match p.inventory.iter().position(|slot| slot.artifact == artifact) {
            Some(index) => {
                if p.inventory[index].count >= MAXARTECONT {
                    return false;
                }
                p.inventory[index].count += 1;
                index
            }
            None => {
                p.inventory.push(InventorySlot{ artifact, count: 1 });
                p.inventory.len() - 1
            }
        };
        // Point at the new artifact if the cursor was on nothing
        if p.inventory.get(p.inv_ptr).map_or(true, |slot| slot.count == 0) {
            p.inv_ptr = index;
        }
        if counts_as_item {
            p.itemcount += 1;
        }
        return true;
    }

    /// Double the player's ammo capacity, once.
    pub(crate) fn give_backpack(&mut self, player: usize) {
        let p = &mut self.players[player];
        if !p.backpack {
            for max in p.maxammo.iter_mut() {
                *max *= 2;
            }
            p.backpack = true;
        }
    }

    /// Whether a thing is one the morph ovum can't touch.
    pub(crate) fn resists_morph(kind: MobjType) -> bool {
        match kind {
            MobjType::Pod | MobjType::Chicken | MobjType::HHead | MobjType::Minotaur
                | MobjType::Sorcerer1 | MobjType::Sorcerer2 => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inter::testing::world_with;
    use rules::{GameConfig, Ruleset};
    use weapons::{NUMAMMO, SKULLROD, AM_SKULLROD};

    #[test]
    fn ammo_is_clamped_and_refused_when_full() {
        let (mut world, p) = world_with(GameConfig::default());
        assert!(world.give_ammo(p, AmmoType::Clip, 500));
        assert_eq!(world.players[p].ammo[0], 200);
        assert!(!world.give_ammo(p, AmmoType::Clip, 10));
        assert_eq!(world.players[p].ammo[0], 200);
        assert!(!world.give_ammo(p, AmmoType::NoAmmo, 10));
    }

    #[test]
    fn skill_bonus_depends_on_ruleset() {
        let mut config = GameConfig::default();
        config.skill = Skill::Baby;
        let (mut world, p) = world_with(config.clone());
        world.give_ammo(p, AmmoType::Shell, 4);
        assert_eq!(world.players[p].ammo[AmmoType::Shell.index().unwrap()], 8);

        config.ruleset = Ruleset::Heretic;
        let (mut world, p) = world_with(config);
        world.give_ammo(p, AM_SKULLROD, 20);
        assert_eq!(world.players[p].ammo[AM_SKULLROD.index().unwrap()], 30);
    }

    #[test]
    fn fixed_priority_switches_from_fist_to_chaingun() {
        let (mut world, p) = world_with(GameConfig::default());
        {
            let player = &mut world.players[p];
            player.ammo = [0; NUMAMMO];
            player.readyweapon = WeaponType::Fist;
            player.weaponowned[WeaponType::Chaingun.index()] = true;
        }
        world.give_ammo(p, AmmoType::Clip, 10);
        assert_eq!(world.players[p].pendingweapon, Some(WeaponType::Chaingun));
    }

    #[test]
    fn no_switch_when_not_empty() {
        let (mut world, p) = world_with(GameConfig::default());
        world.players[p].readyweapon = WeaponType::Fist;
        world.give_ammo(p, AmmoType::Clip, 10);
        assert_eq!(world.players[p].pendingweapon, None);
    }

    #[test]
    fn heretic_table_switches_off_the_staff() {
        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Heretic;
        let (mut world, p) = world_with(config);
        {
            let player = &mut world.players[p];
            player.ammo = [0; NUMAMMO];
            player.readyweapon = STAFF;
            player.weaponowned[SKULLROD.index()] = true;
        }
        world.give_ammo(p, AM_SKULLROD, 20);
        assert_eq!(world.players[p].pendingweapon, Some(SKULLROD));
    }

    #[test]
    fn mbf21_flags_pick_the_highest_eligible_slot() {
        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Mbf21;
        let (mut world, p) = world_with(config);
        {
            let player = &mut world.players[p];
            player.ammo = [0; NUMAMMO];
            player.ammo[0] = 10;
            player.weaponowned[WeaponType::Plasma.index()] = true;
            player.weaponowned[WeaponType::Bfg.index()] = true;
        }
        // Pistol is marked switchable-from; 20 cells fires the plasma gun but not the BFG
        world.give_ammo(p, AmmoType::Cell, 20);
        assert_eq!(world.players[p].pendingweapon, Some(WeaponType::Plasma));
    }

    #[test]
    fn weapons_are_owned_once_but_ammo_keeps_coming() {
        let (mut world, p) = world_with(GameConfig::default());
        assert!(world.give_weapon(p, WeaponType::Shotgun, None));
        assert_eq!(world.players[p].ammo[AmmoType::Shell.index().unwrap()], 8);
        assert!(world.give_weapon(p, WeaponType::Shotgun, None));
        assert_eq!(world.players[p].ammo[AmmoType::Shell.index().unwrap()], 16);
        assert!(world.players[p].owns(WeaponType::Shotgun));
    }

    #[test]
    fn dropped_weapon_ammo_follows_the_sentinel() {
        let (mut world, p) = world_with(GameConfig::default());
        world.give_weapon(p, WeaponType::Shotgun, Some(DroppedAmmo::NoAmmoType));
        assert_eq!(world.players[p].ammo[AmmoType::Shell.index().unwrap()], 4);

        let (mut world, p) = world_with(GameConfig::default());
        assert!(world.give_weapon(p, WeaponType::Shotgun, Some(DroppedAmmo::Count(0))));
        assert_eq!(world.players[p].ammo[AmmoType::Shell.index().unwrap()], 0);

        let (mut world, p) = world_with(GameConfig::default());
        world.give_weapon(p, WeaponType::Shotgun, Some(DroppedAmmo::Count(7)));
        assert_eq!(world.players[p].ammo[AmmoType::Shell.index().unwrap()], 7);
    }

    #[test]
    fn persistent_weapons_are_taken_once_per_map() {
        let mut config = GameConfig::default();
        config.multiplayer = true;
        config.deathmatch = 3;
        let (mut world, p) = world_with(config);
        assert!(!world.give_weapon(p, WeaponType::Chaingun, None));
        assert!(world.players[p].owns(WeaponType::Chaingun));
        assert_eq!(world.players[p].ammo[0], 50 + 5 * 10);

        // Even after losing it, the same map weapon isn't handed out again
        world.players[p].weaponowned[WeaponType::Chaingun.index()] = false;
        let before = world.players[p].ammo[0];
        assert!(!world.give_weapon(p, WeaponType::Chaingun, None));
        assert!(!world.players[p].owns(WeaponType::Chaingun));
        assert_eq!(world.players[p].ammo[0], before);
    }

    #[test]
    fn health_and_armor_caps() {
        let (mut world, p) = world_with(GameConfig::default());
        assert!(!world.give_health(p, 10));
        world.players[p].health = 95;
        assert!(world.give_health(p, 10));
        assert_eq!(world.players[p].health, 100);
        let body = world.players[p].mo.unwrap();
        assert_eq!(world.mobj(body).unwrap().health, 100);

        assert!(world.give_armor(p, 1));
        assert!(!world.give_armor(p, 1));
        assert!(world.give_armor(p, 2));
        assert_eq!(world.players[p].armorpoints, 200);
    }

    #[test]
    fn cards_are_given_once() {
        let (mut world, p) = world_with(GameConfig::default());
        assert!(world.give_card(p, KeyCards::RED_SKULL));
        assert!(!world.give_card(p, KeyCards::RED_SKULL));
    }

    #[test]
    fn raven_rules_refuse_topping_up_powers() {
        let (mut world, p) = world_with(GameConfig::default());
        assert!(world.give_power(p, PowerType::Invulnerability));
        assert!(world.give_power(p, PowerType::Invulnerability));

        let mut config = GameConfig::default();
        config.ruleset = Ruleset::Heretic;
        let (mut world, p) = world_with(config);
        assert!(world.give_power(p, PowerType::Invulnerability));
        assert!(!world.give_power(p, PowerType::Invulnerability));
        assert!(world.give_power(p, PowerType::AllMap));
        assert!(!world.give_power(p, PowerType::AllMap));
    }

    #[test]
    fn artifacts_stack_to_sixteen() {
        let (mut world, p) = world_with(GameConfig::default());
        for _ in 0..16 {
            assert!(world.give_artifact(p, Artifact::Health, None));
        }
        assert!(!world.give_artifact(p, Artifact::Health, None));
        assert_eq!(world.players[p].artifact_count(Artifact::Health), 16);
        assert!(world.give_artifact(p, Artifact::Fly, None));
        assert_eq!(world.players[p].inv_ptr, 0);
    }
}
