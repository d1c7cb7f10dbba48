//! Read-only per-tick view handed to rendering and inspection tools.

use crate::brain::{GenomeLogic, INPUT_LABELS, OUTPUT_LABELS};
use crate::world::{Simulation, WorldStats};
use protocell_data::{Cell, FoodKind, Rgb, Stomach, Vec2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Genome traits shown when inspecting a cell.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TraitView {
    pub radius: f32,
    pub diet: f32,
    pub speed: f32,
    pub vision_range: f32,
    pub egg_energy_transfer: f32,
    pub metabolism: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CellView {
    pub id: u64,
    pub position: Vec2,
    pub angle: f32,
    pub radius: f32,
    pub vision_range: f32,
    pub color: Rgb,
    pub health: f32,
    pub max_health: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub waste: f32,
    pub stomach: Stomach,
    pub wants_stab: bool,
    pub traits: TraitView,
    /// Neuron values of the last brain evaluation, input layer first.
    pub activations: Vec<f32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BodyView {
    pub id: u64,
    pub position: Vec2,
    pub radius: f32,
    pub color: Rgb,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WorldView {
    pub stats: WorldStats,
    pub cells: Vec<CellView>,
    pub eggs: Vec<BodyView>,
    pub foods: Vec<BodyView>,
}

const EGG_COLOR: Rgb = Rgb::new(245.0, 245.0, 245.0);

fn cell_view(cell: &Cell, sim: &Simulation) -> CellView {
    let metabolism = &sim.config().metabolism;
    CellView {
        id: cell.id,
        position: cell.position,
        angle: cell.angle,
        radius: cell.radius,
        vision_range: cell.genome.vision_range,
        color: cell.genome.color(),
        health: cell.health,
        max_health: cell.genome.max_health(metabolism),
        energy: cell.energy,
        max_energy: cell.genome.max_energy(metabolism),
        waste: cell.waste,
        stomach: cell.stomach,
        wants_stab: cell.intents.stab,
        traits: TraitView {
            radius: cell.genome.radius,
            diet: cell.genome.diet,
            speed: cell.genome.speed,
            vision_range: cell.genome.vision_range,
            egg_energy_transfer: cell.genome.egg_energy_transfer,
            metabolism: cell.genome.metabolism,
        },
        activations: cell.brain.values.clone(),
    }
}

impl WorldView {
    /// Captures the current world state.
    #[must_use]
    pub fn capture(sim: &Simulation) -> Self {
        let cells = sim.cells.par_iter().map(|c| cell_view(c, sim)).collect();
        let eggs = sim
            .eggs
            .par_iter()
            .map(|e| BodyView {
                id: e.id,
                position: e.position,
                radius: e.radius,
                color: EGG_COLOR,
            })
            .collect();
        let foods = sim
            .foods
            .par_iter()
            .map(|f| BodyView {
                id: f.id,
                position: f.position,
                radius: f.radius,
                color: f.color(),
            })
            .collect();
        Self {
            stats: sim.stats(),
            cells,
            eggs,
            foods,
        }
    }

    #[must_use]
    pub fn find_cell(&self, id: u64) -> Option<&CellView> {
        self.cells.iter().find(|c| c.id == id)
    }

    /// Food items of one kind, identified by color.
    pub fn foods_of(&self, kind: FoodKind) -> impl Iterator<Item = &BodyView> {
        let color = kind.color();
        self.foods.iter().filter(move |f| f.color == color)
    }
}

impl CellView {
    /// Labelled input and output activations for inspection.
    #[must_use]
    pub fn labelled_io(&self) -> (Vec<(&'static str, f32)>, Vec<(&'static str, f32)>) {
        let inputs = INPUT_LABELS
            .iter()
            .zip(&self.activations)
            .map(|(label, value)| (*label, *value))
            .collect();
        let start = self.activations.len().saturating_sub(OUTPUT_LABELS.len());
        let outputs = OUTPUT_LABELS
            .iter()
            .zip(&self.activations[start..])
            .map(|(label, value)| (*label, *value))
            .collect();
        (inputs, outputs)
    }
}
