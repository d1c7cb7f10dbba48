use super::entity::{Rgb, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Plant,
    Meat,
}

impl FoodKind {
    /// Color a sensor reports when its ray hits this kind of food.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            FoodKind::Plant => Rgb::new(0.0, 255.0, 0.0),
            FoodKind::Meat => Rgb::new(255.0, 0.0, 0.0),
        }
    }
}

/// A consumable calorie source.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Food {
    pub id: u64,
    pub kind: FoodKind,
    pub position: Vec2,
    pub radius: f32,
    pub calories: f32,
    pub consumed: bool,
}

impl Food {
    #[must_use]
    pub fn new(id: u64, kind: FoodKind, calories: f32, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            radius: Self::radius_for(calories),
            calories,
            consumed: false,
        }
    }

    /// Radius of a food item holding `calories`.
    #[must_use]
    pub fn radius_for(calories: f32) -> f32 {
        (calories / 4.0).sqrt()
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    /// Empties the item and returns what it held.
    pub fn take_calories(&mut self) -> f32 {
        std::mem::take(&mut self.calories)
    }
}
