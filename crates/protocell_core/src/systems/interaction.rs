use crate::config::InteractionConfig;
use crate::interaction::InteractionCommand;
use crate::lifecycle;
use protocell_data::{Cell, Food, Rgb, Sensor, Vec2};

/// Axis-aligned box spanned by a ray's start and end points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl RayBounds {
    #[must_use]
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            min: Vec2::new(start.x.min(end.x), start.y.min(end.y)),
            max: Vec2::new(start.x.max(end.x), start.y.max(end.y)),
        }
    }

    /// Inclusive test on a target centre.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// End point of the centre sensor ray.
#[must_use]
pub fn sensor_ray(cell: &Cell) -> Vec2 {
    lifecycle::polar_offset(cell, cell.genome.vision_range, 0.0)
}

/// Distance from `start` to the first intersection with a circle.
///
/// Returns `None` when the perpendicular distance from the circle's centre
/// to the ray line is at least `radius`; a tangent ray misses.
#[must_use]
pub fn cast_ray(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let ray_x = end.x - start.x;
    let ray_y = end.y - start.y;
    let length = (ray_x * ray_x + ray_y * ray_y).sqrt();
    if length <= 0.0 {
        return None;
    }
    let to_x = center.x - start.x;
    let to_y = center.y - start.y;

    let h = (ray_x * to_y - to_x * ray_y).abs() / length;
    if h >= radius {
        return None;
    }
    let dx = ray_x / length;
    let dy = ray_y / length;
    let t = dx * to_x + dy * to_y;
    let dt = (radius * radius - h * h).sqrt();
    Some((t - dt).abs())
}

/// Sensor reading of a cell that sees nothing.
#[must_use]
pub fn empty_sensor(vision_range: f32) -> Sensor {
    Sensor {
        hit_distance: vision_range,
        color: Rgb::default(),
    }
}

/// Converts a hit distance into the brain's sensor strength input.
#[must_use]
pub fn hit_strength(hit_distance: f32, vision_range: f32, clamp: bool) -> f32 {
    let strength = (vision_range - hit_distance) / vision_range;
    if clamp {
        strength.clamp(0.0, 1.0)
    } else {
        strength
    }
}

/// Scans everything visible along cell `index`'s centre ray.
///
/// Pushes stab and eat commands for targets within reach and returns the
/// nearest hit as the new sensor reading. Dead cells produce no reading.
pub fn scan_cell(
    index: usize,
    cells: &[Cell],
    foods: &[Food],
    config: &InteractionConfig,
    commands: &mut Vec<InteractionCommand>,
) -> Option<Sensor> {
    let cell = &cells[index];
    if lifecycle::is_dead(cell) {
        return None;
    }

    let start = cell.position;
    let end = sensor_ray(cell);
    let bounds = RayBounds::new(start, end);
    let stab_range = cell.radius + config.stab_reach;
    let eat_range = cell.radius + config.eat_reach;
    let mut sensor = empty_sensor(cell.genome.vision_range);

    for (target_idx, target) in cells.iter().enumerate() {
        if target_idx == index || !bounds.contains(target.position) || lifecycle::is_dead(target) {
            continue;
        }
        let Some(hit) = cast_ray(start, end, target.position, target.radius) else {
            continue;
        };
        if cell.intents.stab && hit <= stab_range {
            commands.push(InteractionCommand::Stab {
                attacker_idx: index,
                target_idx,
                damage: lifecycle::stab_damage(cell, config.combat_damage),
            });
        }
        if hit < sensor.hit_distance {
            sensor = Sensor {
                hit_distance: hit,
                color: Rgb::new(target.genome.red, target.genome.green, target.genome.blue),
            };
        }
    }

    for (food_idx, food) in foods.iter().enumerate() {
        if !bounds.contains(food.position) || food.consumed {
            continue;
        }
        let Some(hit) = cast_ray(start, end, food.position, food.radius) else {
            continue;
        };
        if cell.intents.eat && hit <= eat_range {
            commands.push(InteractionCommand::EatFood {
                eater_idx: index,
                food_idx,
            });
        }
        if hit < sensor.hit_distance {
            sensor = Sensor {
                hit_distance: hit,
                color: food.color(),
            };
        }
    }

    Some(sensor)
}

/// Counts of effects that took hold when commands were applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedEffects {
    pub stabs: usize,
    pub meals: usize,
    /// Eat commands that lost the food to an earlier caster.
    pub contested: usize,
}

/// Applies commands single-threaded in ascending caster order.
///
/// The sort is stable, so commands from one caster keep their scan order.
/// A food item goes to the first caster that reaches it.
pub fn apply_commands(
    cells: &mut [Cell],
    foods: &mut [Food],
    mut commands: Vec<InteractionCommand>,
) -> AppliedEffects {
    commands.sort_by_key(InteractionCommand::caster);
    let mut applied = AppliedEffects::default();

    for command in commands {
        match command {
            InteractionCommand::Stab {
                target_idx, damage, ..
            } => {
                if let Some(target) = cells.get_mut(target_idx) {
                    lifecycle::stab(target, damage);
                    applied.stabs += 1;
                }
            }
            InteractionCommand::EatFood {
                eater_idx,
                food_idx,
            } => {
                let (Some(cell), Some(food)) = (cells.get_mut(eater_idx), foods.get_mut(food_idx))
                else {
                    continue;
                };
                if food.consumed {
                    applied.contested += 1;
                    continue;
                }
                lifecycle::consume(cell, food);
                applied.meals += 1;
            }
        }
    }
    applied
}
