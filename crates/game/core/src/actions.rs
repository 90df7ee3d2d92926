//! Player actions charged during Prepare and released during `Battle.Actions`.
//!
//! Each action owns an [`EnergyStore`] sized from its declared
//! [`Capabilities`]. When executed it drains the store, launches projectiles
//! from the base, and completes only once every projectile (and fuse) it
//! launched has resolved.

use glam::Vec2;

use crate::actor::{Actor, ActorContext, ActorCore, ActorKind, Capabilities, ExecutionState};
use crate::combat::Projectile;
use crate::config::SimConfig;
use crate::energy::EnergyStore;
use crate::world::{EffectKind, SimEvent};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionKind {
    /// One projectile; range scales with force.
    Throw,
    /// One projectile that explodes after a charged fuse delay.
    Bomb,
    /// Several projectiles at once; the count scales with the spread charge.
    Volley,
}

impl ActionKind {
    /// Capabilities an action of this kind declares unless overridden.
    pub fn default_capabilities(self) -> Capabilities {
        match self {
            ActionKind::Throw => Capabilities::THROW_FORCE,
            ActionKind::Bomb => Capabilities::THROW_FORCE | Capabilities::FUSE_DELAY,
            ActionKind::Volley => Capabilities::THROW_FORCE | Capabilities::SPREAD,
        }
    }
}

/// Static description of a player action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionTemplate {
    pub name: String,
    pub kind: ActionKind,
    /// Declared charge needs; one energy slot per flag.
    #[cfg_attr(feature = "serde", serde(default))]
    pub capabilities: Option<Capabilities>,
    pub damage: i32,
    pub radius: f32,
    /// Distance travelled per unit of force.
    pub range_per_force: f32,
    pub projectile_speed: f32,
    /// Fuse seconds per unit of fuse charge.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fuse_per_charge: f32,
    /// Extra projectiles per unit of spread charge.
    #[cfg_attr(feature = "serde", serde(default))]
    pub spread_per_charge: f32,
    /// Overrides [`SimConfig::charge_max`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub charge_max: Option<f32>,
    /// Overrides [`SimConfig::charge_rate`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub charge_rate: Option<f32>,
}

impl ActionTemplate {
    pub fn new(name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            capabilities: None,
            damage: 5,
            radius: 1.5,
            range_per_force: 3.0,
            projectile_speed: 10.0,
            fuse_per_charge: 0.5,
            spread_per_charge: 1.0,
            charge_max: None,
            charge_rate: None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
            .unwrap_or_else(|| self.kind.default_capabilities())
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Shot {
    Flying {
        projectile: Projectile,
        fuse: f32,
    },
    Fusing {
        at: Vec2,
        remaining: f32,
    },
}

/// A charged player action.
pub struct PlayerAction {
    core: ActorCore,
    template: ActionTemplate,
    capabilities: Capabilities,
    shots: Vec<Shot>,
}

impl PlayerAction {
    pub fn new(template: ActionTemplate, config: &SimConfig) -> Self {
        let capabilities = template.capabilities();
        let energy = EnergyStore::with_slots(
            template.charge_max.unwrap_or(config.charge_max),
            template.charge_rate.unwrap_or(config.charge_rate),
            capabilities.required_slots(),
        );
        Self {
            core: ActorCore::new(Some(energy)),
            template,
            capabilities,
            shots: Vec::new(),
        }
    }

    pub fn template(&self) -> &ActionTemplate {
        &self.template
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Projectiles or fuses still pending.
    pub fn pending_shots(&self) -> usize {
        self.shots.len()
    }

    /// Drains the store: multi-slot actions read every slot, single-slot
    /// actions take the summed charge.
    fn drain_charges(&mut self) -> Vec<f32> {
        let Some(store) = self.core.energy_mut() else {
            return Vec::new();
        };
        if store.required_slots() > 1 {
            store.consume_all_slots()
        } else {
            vec![store.consume()]
        }
    }

    fn charge_for(&self, charges: &[f32], capability: Capabilities) -> f32 {
        self.capabilities
            .slot_of(capability)
            .and_then(|slot| charges.get(slot).copied())
            .unwrap_or(0.0)
    }

    fn launch(&mut self, charges: &[f32], ctx: &mut ActorContext<'_>) {
        let origin = ctx.battlefield.base.position;
        let force = self.charge_for(charges, Capabilities::THROW_FORCE);
        let range = force * self.template.range_per_force;
        let fuse = match self.template.kind {
            ActionKind::Bomb => {
                self.charge_for(charges, Capabilities::FUSE_DELAY) * self.template.fuse_per_charge
            }
            _ => 0.0,
        };

        let count = match self.template.kind {
            ActionKind::Volley => {
                let spread = self.charge_for(charges, Capabilities::SPREAD);
                1 + (spread * self.template.spread_per_charge).floor().max(0.0) as usize
            }
            _ => 1,
        };

        for i in 0..count {
            let lateral = (i as f32 - (count - 1) as f32 / 2.0) * self.template.radius;
            let target = origin + Vec2::new(range, lateral);
            self.shots.push(Shot::Flying {
                projectile: Projectile::launch(origin, target, self.template.projectile_speed),
                fuse,
            });
        }

        ctx.commands.emit(SimEvent::Effect {
            kind: EffectKind::ProjectileLaunched,
            position: origin,
        });
        tracing::debug!(
            target: "battle::actions",
            actor = %ctx.id,
            name = %self.template.name,
            force,
            fuse,
            count,
            "action launched"
        );
    }

    fn detonate(&self, at: Vec2, ctx: &mut ActorContext<'_>) {
        let kind = match self.template.kind {
            ActionKind::Bomb => EffectKind::Explosion,
            _ => EffectKind::ProjectileLanded,
        };
        ctx.commands
            .damage_area(at, self.template.radius, self.template.damage);
        ctx.commands.emit(SimEvent::Effect { kind, position: at });
    }

    fn advance_shots(&mut self, dt: f32, ctx: &mut ActorContext<'_>) {
        let mut shots = std::mem::take(&mut self.shots);
        shots.retain_mut(|shot| match shot {
            Shot::Flying { projectile, fuse } => {
                if !projectile.advance(dt) {
                    return true;
                }
                let at = projectile.target;
                let fuse = *fuse;
                if fuse > 0.0 {
                    ctx.commands.emit(SimEvent::Effect {
                        kind: EffectKind::ProjectileLanded,
                        position: at,
                    });
                    *shot = Shot::Fusing {
                        at,
                        remaining: fuse,
                    };
                    return true;
                }
                self.detonate(at, ctx);
                false
            }
            Shot::Fusing { at, remaining } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return true;
                }
                self.detonate(*at, ctx);
                false
            }
        });
        self.shots = shots;

        if self.shots.is_empty() {
            self.core.complete();
        }
    }
}

impl Actor for PlayerAction {
    fn kind(&self) -> ActorKind {
        ActorKind::Action
    }

    fn name(&self) -> &str {
        &self.template.name
    }

    fn core(&self) -> &ActorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActorCore {
        &mut self.core
    }

    fn execute(&mut self, ctx: &mut ActorContext<'_>) {
        if !self.core.begin() {
            return;
        }
        let charges = self.drain_charges();
        self.launch(&charges, ctx);
        self.advance_shots(0.0, ctx);
    }

    fn resume(&mut self, dt: f32, ctx: &mut ActorContext<'_>) {
        if self.core.state() != ExecutionState::Executing {
            return;
        }
        self.advance_shots(dt, ctx);
    }

    fn reset_for_new_cycle(&mut self) {
        self.shots.clear();
        self.core.reset();
    }
}
