//! Health and armor state.
//!
//! `Live` is a plain value type; the combat system applies it to entities
//! and turns the returned outcomes into events.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveState {
    Alive,
    Dead,
}

/// What a `damage` call actually did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Damage absorbed by armor plus damage taken by health
    pub applied: f32,
    pub armor_lost: f32,
    pub health_lost: f32,
    /// This call moved the entity from alive to dead
    pub died: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Live {
    health: f32,
    max_health: f32,
    armor: f32,
    max_armor: f32,
    state: LiveState,
}

impl Live {
    pub fn new(max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            health: max_health,
            max_health,
            armor: 0.0,
            max_armor: 0.0,
            state: if max_health > 0.0 {
                LiveState::Alive
            } else {
                LiveState::Dead
            },
        }
    }

    pub fn with_armor(mut self, max_armor: f32) -> Self {
        self.set_max_armor(max_armor);
        self.armor = self.max_armor;
        self
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn armor(&self) -> f32 {
        self.armor
    }

    pub fn max_armor(&self) -> f32 {
        self.max_armor
    }

    pub fn state(&self) -> LiveState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == LiveState::Dead
    }

    pub fn is_max_health(&self) -> bool {
        self.health >= self.max_health
    }

    /// Take damage, armor first. Negative and NaN amounts count as zero.
    pub fn damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::default();
        }
        let amount = if amount.is_nan() { 0.0 } else { amount.max(0.0) };

        let armor_lost = amount.min(self.armor);
        self.armor -= armor_lost;

        let health_lost = (amount - armor_lost).min(self.health);
        self.health -= health_lost;

        let died = self.health <= 0.0;
        if died {
            self.health = 0.0;
            self.state = LiveState::Dead;
        }

        DamageOutcome {
            applied: armor_lost + health_lost,
            armor_lost,
            health_lost,
            died,
        }
    }

    /// Restore health up to the maximum. Returns the amount restored, or
    /// `None` when dead or already full.
    pub fn heal(&mut self, amount: f32) -> Option<f32> {
        if self.is_dead() || self.is_max_health() {
            return None;
        }
        let amount = if amount.is_nan() { 0.0 } else { amount.max(0.0) };
        let healed = amount.min(self.max_health - self.health);
        self.health += healed;
        Some(healed)
    }

    /// Change the maximum, clamping current health into the new range. A
    /// maximum of zero kills.
    pub fn set_max_health(&mut self, max_health: f32) {
        self.max_health = max_health.max(0.0);
        self.health = self.health.min(self.max_health);
        if self.max_health <= 0.0 {
            self.health = 0.0;
            self.state = LiveState::Dead;
        }
    }

    pub fn set_max_armor(&mut self, max_armor: f32) {
        self.max_armor = max_armor.max(0.0);
        self.armor = self.armor.min(self.max_armor);
    }

    /// Add to current health without the heal bookkeeping. Used by upgrades.
    pub fn add_health(&mut self, amount: f32) {
        if self.is_dead() {
            return;
        }
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    pub fn set_health(&mut self, health: f32) {
        if self.is_dead() {
            return;
        }
        self.health = health.clamp(0.0, self.max_health);
    }

    pub fn set_armor(&mut self, armor: f32) {
        self.armor = armor.clamp(0.0, self.max_armor);
    }
}
