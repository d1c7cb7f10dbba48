use super::brain::Brain;
use super::genome::Genome;
use serde::{Deserialize, Serialize};

/// World position or displacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Color channels on a 0..=255 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Nearest thing seen along the centre ray during the last interaction phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub hit_distance: f32,
    pub color: Rgb,
}

/// Undigested calories, split by source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stomach {
    pub plant_calories: f32,
    pub meat_calories: f32,
}

impl Stomach {
    #[must_use]
    pub fn total(&self) -> f32 {
        self.plant_calories + self.meat_calories
    }
}

/// Boolean decisions taken from the last brain evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intents {
    pub eat: bool,
    pub lay_egg: bool,
    pub stab: bool,
}

/// A living organism.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub id: u64,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading in radians, kept within ±2π.
    pub angle: f32,
    pub radius: f32,
    pub age: u64,
    pub health: f32,
    pub energy: f32,
    pub base_energy: f32,
    pub waste: f32,
    pub memory: [f32; 3],
    pub intents: Intents,
    pub sensor: Sensor,
    pub stomach: Stomach,
    pub genome: Genome,
    pub brain: Brain,
}

/// A dormant offspring waiting to hatch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Egg {
    pub id: u64,
    pub position: Vec2,
    pub radius: f32,
    pub age: u64,
    pub energy: f32,
    pub hatched: bool,
    /// `None` once the genome has been handed to the hatched cell.
    pub genome: Option<Genome>,
}
