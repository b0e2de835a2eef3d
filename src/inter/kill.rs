use info::{MobjType, StateNum};
use messages::{Cause, obituary};
use mobj::{ExtraFlags, MobjFlags, MobjFlags2, MobjFlags3, MobjId};
use player::{PlayerState, PowerType};
use rules::GameMode;
use tables::Angle;
use weapons::{AmmoType, DroppedAmmo, WeaponType, BLASTER, CROSSBOW, MACE, PHOENIXROD, SKULLROD};
use world::{GameEvent, ONFLOORZ, Sound, World};

/// Below this much health, a player killed by another player was telefragged.
const TELEFRAG_HEALTH: i32 = -9000;

impl World {
    /// `target` has run out of health: make it a corpse, hand out credit, and drop whatever it
    /// was carrying.  Killing something that's already a corpse blows it apart.
    pub fn kill_mobj(&mut self, target: MobjId, inflictor: Option<MobjId>, source: Option<MobjId>) {
        let policy = self.config.policy();
        let nplayers = self.players.len();
        let source_player = source
            .and_then(|id| self.mobjs.get(id))
            .and_then(|mo| mo.player)
            .filter(|&p| p < nplayers);
        let solid_corpse = self.config.solid_corpse;

        let gibs = self.info.gibs_state;
        let (kind, target_player, was_corpse) = match self.mobjs.get_mut(target) {
            Some(mo) if mo.state == gibs => { return; }
            Some(mo) => {
                if !solid_corpse {
                    mo.flags.remove(MobjFlags::SHOOTABLE);
                }
                mo.flags.remove(MobjFlags::FLOAT | MobjFlags::SKULLFLY);
                if mo.kind != MobjType::Skull {
                    mo.flags.remove(MobjFlags::NOGRAVITY);
                }
                (mo.kind, mo.player.filter(|&p| p < nplayers), mo.flags.contains(MobjFlags::CORPSE))
            }
            None => { return; }
        };

        if was_corpse {
            self.set_mobj_state(target, gibs);
            if let Some(mo) = self.mobjs.get_mut(target) {
                mo.flags.remove(MobjFlags::SOLID);
                mo.height = 0;
                mo.radius <<= 1;
            }
            self.start_sound(Some(target), Sound::Slop);
            return;
        }

        if let Some(mo) = self.mobjs.get_mut(target) {
            // Whoever set off a barrel gets the frag for anything the blast kills
            if (kind == MobjType::Barrel || kind == MobjType::Pod) && source_player.is_some() {
                mo.target = source;
            }
            mo.flags |= MobjFlags::CORPSE | MobjFlags::DROPOFF;
            mo.height >>= 2;
            mo.radius -= mo.radius >> 4;
        }

        let console = self.consoleplayer;
        if target_player == Some(console) || source_player == Some(console) {
            if let Some(text) = self.death_message(target, inflictor, source) {
                self.events.push(GameEvent::Obituary(text));
            }
        }

        let countkill = self.mobjs.get(target).map_or(false, |mo| mo.flags.contains(MobjFlags::COUNTKILL));
        if let Some(sp) = source_player {
            if countkill {
                self.players[sp].killcount += 1;
            }
            if let Some(tp) = target_player {
                self.players[sp].frags[tp] += 1;
                if policy.heretic_specials {
                    if sp == console {
                        self.start_sound(None, Sound::GFrag);
                    }
                    // Chickens that score get the powered beak
                    if self.players[sp].is_chicken() {
                        self.give_power(sp, PowerType::WeaponLevel2);
                    }
                }
                if self.config.fraglimit > 0 {
                    self.check_frag_limit(sp);
                }
            }
        }
        else if !self.config.multiplayer && countkill {
            // Monsters killing each other still count, in single player
            if let Some(p) = self.players.first_mut() {
                p.killcount += 1;
            }
        }

        if let Some(tp) = target_player {
            if source.is_none() {
                self.players[tp].frags[tp] += 1;
            }
            if let Some(mo) = self.mobjs.get_mut(target) {
                if !solid_corpse {
                    mo.flags.remove(MobjFlags::SOLID);
                }
                mo.flags2.remove(MobjFlags2::FLY);
                if policy.hexen_specials && mo.flags3.contains(MobjFlags3::ICEDAMAGE) {
                    mo.eflags |= ExtraFlags::ICECORPSE;
                }
            }
            {
                let p = &mut self.players[tp];
                p.set_power(PowerType::Flight, 0);
                p.set_power(PowerType::WeaponLevel2, 0);
                p.playerstate = PlayerState::Dead;
                p.aiming = Angle(0);
            }
            self.drop_weapon(tp);
        }

        let (deathstate, xdeathstate, spawnhealth, dropitem) = {
            let info = self.info.info(kind);
            (info.deathstate, info.xdeathstate, info.spawnhealth, info.dropitem)
        };
        let health = self.mobjs.get(target).map_or(0, |mo| mo.health);
        let overkill = spawnhealth >> policy.xdeath_shift;
        if xdeathstate != StateNum::NULL && health < -overkill {
            self.set_mobj_state(target, xdeathstate);
        }
        else {
            self.set_mobj_state(target, deathstate);
        }
        let jitter = self.p_random() & 3;
        if let Some(mo) = self.mobjs.get_mut(target) {
            mo.tics = (mo.tics - jitter).max(1);
        }

        debug!("{:?} ({:?}) killed by {:?}", target, kind, source);
        self.events.push(GameEvent::Killed{ target, source });

        // What it leaves behind
        let mut dropped = DroppedAmmo::NoAmmoType;
        let item = match target_player {
            Some(tp) if self.config.frags_weapon_falling => {
                dropped = self.ammo_in_weapon(tp);
                match self.dropped_weapon_kind(self.players[tp].readyweapon) {
                    Some(item) => item,
                    None => { return; }
                }
            }
            _ => {
                // Chex Quest monsters don't drop ammo
                if self.config.gamemode == GameMode::Chex {
                    return;
                }
                match dropitem {
                    Some(item) => item,
                    None => { return; }
                }
            }
        };
        let (x, y) = match self.mobjs.get(target) {
            Some(mo) => (mo.x, mo.y),
            None => { return; }
        };
        let drop = self.spawn_mobj(x, y, ONFLOORZ, item);
        if let Some(mo) = self.mobjs.get_mut(drop) {
            mo.flags |= MobjFlags::DROPPED;
            mo.dropped_ammo_count = dropped.encode();
        }
    }

    /// What a player's current weapon would hand over if dropped: its ammo, or a marker that it
    /// doesn't use any.
    pub fn ammo_in_weapon(&self, player: usize) -> DroppedAmmo {
        let p = match self.players.get(player) {
            Some(p) => p,
            None => { return DroppedAmmo::NoAmmoType; }
        };
        let ammo = self.weapon_info(player, p.readyweapon).map_or(AmmoType::NoAmmo, |w| w.ammo);
        match ammo.index() {
            None => DroppedAmmo::NoAmmoType,
            Some(slot) => {
                let count = p.ammo[slot];
                if count <= 0 {
                    DroppedAmmo::Count(0)
                }
                else {
                    DroppedAmmo::Count(count.min(u16::max_value() as i32 - 1) as u16)
                }
            }
        }
    }

    /// The pickup a dying player's weapon turns into, when weapons fall.  Starting weapons don't
    /// drop.
    fn dropped_weapon_kind(&self, weapon: WeaponType) -> Option<MobjType> {
        if self.config.ruleset.is_heretic() {
            return match weapon {
                w if w == CROSSBOW => Some(MobjType::WCrossbow),
                w if w == BLASTER => Some(MobjType::WBlaster),
                w if w == SKULLROD => Some(MobjType::WSkullRod),
                w if w == PHOENIXROD => Some(MobjType::WPhoenixRod),
                w if w == MACE => Some(MobjType::WMace),
                _ => None,
            };
        }
        match weapon {
            WeaponType::Shotgun => Some(MobjType::Shotgun),
            WeaponType::SuperShotgun => Some(MobjType::SuperShotgun),
            WeaponType::Chaingun => Some(MobjType::Chaingun),
            WeaponType::Missile => Some(MobjType::RocketLauncher),
            WeaponType::Plasma => Some(MobjType::PlasmaGun),
            WeaponType::Bfg => Some(MobjType::Bfg9000),
            _ => None,
        }
    }

    /// The obituary for a dying player, or None if the target isn't a player's real body.
    pub fn death_message(&self, target: MobjId, inflictor: Option<MobjId>, source: Option<MobjId>) -> Option<String> {
        let victim = self.player_of(target)?;
        let health = self.mobjs.get(target)?.health;

        let source_mo = source.and_then(|id| self.mobjs.get(id));
        let cause = match source_mo {
            None => Cause::Environment(self.players[victim].specialsector),
            Some(src) => match src.player.filter(|&p| p < self.players.len()) {
                Some(killer) if killer == victim => Cause::Suicide,
                Some(killer) if health < TELEFRAG_HEALTH => Cause::Telefrag{ killer },
                Some(killer) => {
                    let weapon = match inflictor.and_then(|id| self.mobjs.get(id)).map(|mo| mo.kind) {
                        Some(MobjType::Rocket) => WeaponType::Missile,
                        Some(MobjType::Plasma) => WeaponType::Plasma,
                        Some(MobjType::BfgShot) => WeaponType::Bfg,
                        _ => self.players[killer].readyweapon,
                    };
                    let info = self.info.info(MobjType::Player);
                    let gibbed = health < -info.spawnhealth && info.xdeathstate != StateNum::NULL;
                    Cause::Weapon{ killer, weapon, gibbed }
                }
                None => {
                    let barrel_killer = if src.kind == MobjType::Barrel {
                        src.target.and_then(|id| self.mobjs.get(id)).and_then(|mo| mo.player)
                    }
                    else {
                        None
                    };
                    match barrel_killer {
                        Some(killer) => Cause::BarrelFrag{ killer },
                        None => Cause::Monster(src.kind),
                    }
                }
            },
        };
        return Some(obituary(victim, cause));
    }

    /// End the level if `player`, or their team, has reached the frag limit.
    pub fn check_frag_limit(&mut self, player: usize) {
        let team = match self.players.get(player) {
            Some(p) => p.team,
            None => { return; }
        };
        let total: i32 =
            if self.config.teamplay {
                (0..self.players.len())
                    .filter(|&i| self.players[i].team == team)
                    .map(|i| self.player_frags(i))
                    .sum()
            }
            else {
                self.player_frags(player)
            };
        if total >= self.config.fraglimit {
            debug!("frag limit {} reached by player {}", self.config.fraglimit, player);
            self.events.push(GameEvent::ExitLevel);
        }
    }

    /// Frags as the scoreboard counts them: everyone else killed, minus suicides.
    pub fn player_frags(&self, player: usize) -> i32 {
        let p = match self.players.get(player) {
            Some(p) => p,
            None => { return 0; }
        };
        let mut frags = 0;
        for (i, &count) in p.frags.iter().enumerate().take(self.players.len()) {
            if i == player {
                frags -= count;
            }
            else {
                frags += count;
            }
        }
        return frags;
    }
}
