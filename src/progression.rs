//! Stat progression formulas.
//!
//! Every scaled number in the game (enemy health, upgrade costs, player
//! reach, spawn levels) comes from one of these two curves.

/// `default_value * (1 + scale * min(level, max_level))`
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearProgression {
    pub default_value: f32,
    pub scale: f32,
    pub level: u32,
    pub max_level: Option<u32>,
    pub round_to: Option<f32>,
}

/// `default_value * (1 + scale * f(level))`, with `f` quadratic up to the
/// retardation level and damped by `sqrt(R / level)` after it
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticProgression {
    pub default_value: f32,
    pub scale: f32,
    pub level: u32,
    pub retardation_level: Option<u32>,
    pub round_to: Option<f32>,
}

fn round_to_multiple(value: f32, round_to: Option<f32>) -> f32 {
    match round_to {
        Some(step) if step > 0.0 => (value / step).round() * step,
        _ => value,
    }
}

pub fn progression_linear(p: LinearProgression) -> f32 {
    let level = p.max_level.map_or(p.level, |max| p.level.min(max)) as f32;
    round_to_multiple(p.default_value * (1.0 + p.scale * level), p.round_to)
}

/// Growth term of the quadratic curve
fn quadratic_growth(level: u32, retardation_level: Option<u32>) -> f32 {
    let l = level as f32;
    match retardation_level {
        Some(r) if level > r && r > 0 => l * l * (r as f32 / l).sqrt(),
        _ => l * l,
    }
}

pub fn progression_quadratic(p: QuadraticProgression) -> f32 {
    let growth = quadratic_growth(p.level, p.retardation_level);
    round_to_multiple(p.default_value * (1.0 + p.scale * growth), p.round_to)
}
