use crate::brain::{
    BrainLogic, BRAIN_MEMORY, INPUT_COLOR, INPUT_MEMORY, INPUT_SENSOR, OUTPUT_BACKWARD,
    OUTPUT_EAT, OUTPUT_FORWARD, OUTPUT_LAY_EGG, OUTPUT_MEMORY, OUTPUT_STAB, OUTPUT_STRAFE_LEFT,
    OUTPUT_STRAFE_RIGHT, OUTPUT_TURN_NEGATIVE, OUTPUT_TURN_POSITIVE,
};
use crate::config::{AppConfig, WorldConfig};
use crate::lifecycle;
use crate::systems::interaction::hit_strength;
use protocell_data::{Cell, Intents, Vec2};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Motion decided by one brain evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    pub movement: f32,
    pub strafe: f32,
    pub angular: f32,
}

/// Keeps a heading within `[-2π, 2π]`.
#[must_use]
pub fn wrap_angle(mut angle: f32) -> f32 {
    while angle > TAU {
        angle -= TAU;
    }
    while angle < -TAU {
        angle += TAU;
    }
    angle
}

/// Folds a position back onto the torus when wrapping is enabled.
pub fn wrap_position(position: &mut Vec2, world: &WorldConfig) {
    if !world.wrap {
        return;
    }
    let half = world.map_size / 2.0;
    if position.x > half {
        position.x -= world.map_size;
    } else if position.x < -half {
        position.x += world.map_size;
    }
    if position.y > half {
        position.y -= world.map_size;
    } else if position.y < -half {
        position.y += world.map_size;
    }
}

/// Loads sensor and memory inputs and runs the brain.
fn think(cell: &mut Cell, config: &AppConfig) {
    let strength = hit_strength(
        cell.sensor.hit_distance,
        cell.genome.vision_range,
        config.interaction.clamp_sensor_strength,
    );
    let color = cell.sensor.color;

    cell.brain.reset();
    cell.brain.set_input(INPUT_SENSOR, strength);
    cell.brain.set_input(INPUT_COLOR, color.r / 255.0);
    cell.brain.set_input(INPUT_COLOR + 1, color.g / 255.0);
    cell.brain.set_input(INPUT_COLOR + 2, color.b / 255.0);
    for (slot, value) in cell.memory.iter().enumerate() {
        cell.brain.set_input(INPUT_MEMORY + slot, *value);
    }
    cell.brain.evaluate();
}

/// Reads motion, memory and intents off the evaluated brain.
fn decide(cell: &mut Cell, config: &AppConfig) -> Motion {
    let out = |index| cell.brain.output(index);
    let speed = cell.genome.speed * config.motion.speed_multiplier;
    let motion = Motion {
        movement: (out(OUTPUT_FORWARD) - out(OUTPUT_BACKWARD)) * speed,
        strafe: (out(OUTPUT_STRAFE_RIGHT) - out(OUTPUT_STRAFE_LEFT)) * speed,
        angular: (out(OUTPUT_TURN_POSITIVE) - out(OUTPUT_TURN_NEGATIVE))
            * config.motion.angular_speed_multiplier,
    };
    let mut memory = [0.0; BRAIN_MEMORY];
    for (slot, value) in memory.iter_mut().enumerate() {
        *value = out(OUTPUT_MEMORY + slot);
    }
    let intents = Intents {
        eat: out(OUTPUT_EAT) > config.interaction.want_eat_threshold,
        lay_egg: out(OUTPUT_LAY_EGG) > config.interaction.want_egg_threshold,
        stab: out(OUTPUT_STAB) > config.interaction.want_stab_threshold,
    };

    cell.memory = memory;
    cell.intents = intents;
    motion
}

fn pay_costs(cell: &mut Cell, motion: &Motion, config: &AppConfig) {
    let m = &config.metabolism;
    let area = cell.radius * cell.radius;
    if cell.intents.stab {
        lifecycle::use_energy(cell, m.stab_cost * m.cost_multiplier, m);
    }
    lifecycle::use_energy(cell, m.passive_cost * m.cost_multiplier * area, m);
    lifecycle::use_energy(
        cell,
        m.linear_cost * m.cost_multiplier * (motion.movement.abs() + motion.strafe.abs()) * area,
        m,
    );
    lifecycle::use_energy(
        cell,
        m.angular_cost * m.cost_multiplier * motion.angular.abs() * area,
        m,
    );
    lifecycle::spend_surplus(cell, m);
}

/// Advances one living cell by a tick: think, move, digest, pay, age.
pub fn tick_cell(cell: &mut Cell, config: &AppConfig) -> Motion {
    think(cell, config);
    let motion = decide(cell, config);
    let multiplier = config.motion.movement_multiplier;

    cell.angle = wrap_angle(cell.angle + motion.angular * multiplier);
    let (sin, cos) = cell.angle.sin_cos();
    let (side_sin, side_cos) = (cell.angle + FRAC_PI_2).sin_cos();
    cell.velocity = Vec2::new(
        cos * motion.movement * multiplier + side_cos * motion.strafe * multiplier,
        sin * motion.movement * multiplier + side_sin * motion.strafe * multiplier,
    );
    cell.position.x += cell.velocity.x;
    cell.position.y += cell.velocity.y;
    wrap_position(&mut cell.position, &config.world);

    lifecycle::digest(cell, &config.metabolism);
    pay_costs(cell, &motion, config);
    cell.age += 1;
    motion
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn hatched(config: &AppConfig, seed: u64) -> Cell {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut egg = lifecycle::new_egg(0, None, 60.0, Vec2::default(), 1.0);
        lifecycle::hatch_with_rng(&mut egg, 1, config, &mut rng)
    }

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(1.0), 1.0);
        assert!((wrap_angle(TAU + 1.0) - 1.0).abs() < 1e-5);
        assert!((wrap_angle(-TAU - 1.0) + 1.0).abs() < 1e-5);
        assert_eq!(wrap_angle(TAU), TAU);
    }

    #[test]
    fn test_wrap_position_only_when_enabled() {
        let mut world = WorldConfig::default();
        let mut position = Vec2::new(5001.0, -5002.0);
        wrap_position(&mut position, &world);
        assert_eq!(position, Vec2::new(5001.0, -5002.0));

        world.wrap = true;
        wrap_position(&mut position, &world);
        assert_eq!(position, Vec2::new(-4999.0, 4998.0));
    }

    #[test]
    fn test_tick_ages_and_costs() {
        let config = AppConfig::default();
        let mut cell = hatched(&config, 9);
        let energy = cell.energy;
        tick_cell(&mut cell, &config);
        assert_eq!(cell.age, 1);
        assert!(cell.energy < energy);
        assert!(cell.waste > 0.0);
        assert!(cell.angle.abs() <= TAU);
    }

    #[test]
    fn test_tick_is_deterministic() {
        let config = AppConfig::default();
        let mut a = hatched(&config, 10);
        let mut b = a.clone();
        for _ in 0..5 {
            tick_cell(&mut a, &config);
            tick_cell(&mut b, &config);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_motion_moves_cell_by_velocity() {
        let config = AppConfig::default();
        let mut cell = hatched(&config, 12);
        let before = cell.position;
        tick_cell(&mut cell, &config);
        assert!((cell.position.x - (before.x + cell.velocity.x)).abs() < 1e-5);
        assert!((cell.position.y - (before.y + cell.velocity.y)).abs() < 1e-5);
    }

    #[test]
    fn test_memory_feeds_back() {
        let config = AppConfig::default();
        let mut cell = hatched(&config, 13);
        tick_cell(&mut cell, &config);
        let outputs = cell.brain.outputs();
        assert_eq!(cell.memory[0], outputs[OUTPUT_MEMORY]);
        assert_eq!(cell.memory[2], outputs[OUTPUT_MEMORY + 2]);
    }
}
