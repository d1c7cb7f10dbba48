//! Field layouts of the entities stored in a snapshot.
//!
//! A record is a fixed sequence of fields, except for the genome, whose
//! weight and bias counts follow from the layer sizes written before them.

use crate::error::Result;
use crate::fields::{FieldReader, FieldWriter};
use protocell_core::brain::{BrainLogic, GenomeLogic, BRAIN_INPUTS, BRAIN_OUTPUTS};
use protocell_core::config::AppConfig;
use protocell_data::{
    Activation, Brain, Cell, Egg, Food, FoodKind, Genome, Intents, LayerActivations, Rgb, Sensor,
    Stomach, Topology, Vec2,
};
use std::io::Write;

/// Upper bounds that keep a corrupt topology from allocating unbounded memory.
const MAX_LAYERS: usize = 64;
const MAX_LAYER_SIZE: usize = 4096;

/// An entity that can be written to and read from a field stream.
pub trait FieldRecord: Sized {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()>;

    fn read_fields(input: &mut FieldReader<'_>, config: &AppConfig) -> Result<Self>;
}

/// Writes every record of `items` back to back.
pub fn write_all<'a, T, W, I>(out: &mut FieldWriter<W>, items: I) -> Result<usize>
where
    T: FieldRecord + 'a,
    W: Write,
    I: IntoIterator<Item = &'a T>,
{
    let mut count = 0;
    for item in items {
        item.write_fields(out)?;
        count += 1;
    }
    Ok(count)
}

/// Reads records until the stream is exhausted.
pub fn read_all<T: FieldRecord>(input: &mut FieldReader<'_>, config: &AppConfig) -> Result<Vec<T>> {
    let mut items = Vec::new();
    while !input.is_exhausted() {
        items.push(T::read_fields(input, config)?);
    }
    Ok(items)
}

fn write_vec2<W: Write>(out: &mut FieldWriter<W>, v: Vec2) -> Result<()> {
    out.field(v.x)?;
    out.field(v.y)
}

fn read_vec2(input: &mut FieldReader<'_>, what: &str) -> Result<Vec2> {
    Ok(Vec2::new(input.next(what)?, input.next(what)?))
}

/// Reads a quantity that must be a non-negative number.
fn read_amount(input: &mut FieldReader<'_>, what: &str) -> Result<f32> {
    let value: f32 = input.next(what)?;
    if value.is_nan() || value < 0.0 {
        return Err(input.error(format!("{what} must be non-negative, got {value}")));
    }
    Ok(value)
}

fn activation_code(activation: Activation) -> u8 {
    match activation {
        Activation::Identity => 0,
        Activation::Relu => 1,
        Activation::LeakyRelu => 2,
        Activation::Sigmoid => 3,
        Activation::Tanh => 4,
        Activation::SquareRoot => 5,
    }
}

fn read_activation(input: &mut FieldReader<'_>, what: &str) -> Result<Activation> {
    match input.next::<u8>(what)? {
        0 => Ok(Activation::Identity),
        1 => Ok(Activation::Relu),
        2 => Ok(Activation::LeakyRelu),
        3 => Ok(Activation::Sigmoid),
        4 => Ok(Activation::Tanh),
        5 => Ok(Activation::SquareRoot),
        other => Err(input.error(format!("unknown activation code {other}"))),
    }
}

fn read_topology(input: &mut FieldReader<'_>) -> Result<Topology> {
    let count: usize = input.next("layer count")?;
    if !(2..=MAX_LAYERS).contains(&count) {
        return Err(input.error(format!("layer count {count} outside 2..={MAX_LAYERS}")));
    }
    let mut layers = Vec::with_capacity(count);
    for _ in 0..count {
        let size: usize = input.next("layer size")?;
        if !(1..=MAX_LAYER_SIZE).contains(&size) {
            return Err(input.error(format!("layer size {size} outside 1..={MAX_LAYER_SIZE}")));
        }
        layers.push(size);
    }
    let topology = Topology { layers };
    if topology.input_count() != BRAIN_INPUTS || topology.output_count() != BRAIN_OUTPUTS {
        return Err(input.error(format!(
            "network must have {BRAIN_INPUTS} inputs and {BRAIN_OUTPUTS} outputs, got {} and {}",
            topology.input_count(),
            topology.output_count()
        )));
    }
    Ok(topology)
}

impl FieldRecord for Genome {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.fields(&[
            self.radius,
            self.diet,
            self.speed,
            self.vision_range,
            self.egg_energy_transfer,
            self.metabolism,
            self.red,
            self.green,
            self.blue,
        ])?;
        out.field(self.topology.layer_count())?;
        for size in &self.topology.layers {
            out.field(size)?;
        }
        out.fields(&self.weights)?;
        out.fields(&self.biases)
    }

    fn read_fields(input: &mut FieldReader<'_>, config: &AppConfig) -> Result<Self> {
        let first_line = input.line() + 1;
        let genome = Genome {
            radius: input.next("radius")?,
            diet: input.next("diet")?,
            speed: input.next("speed")?,
            vision_range: input.next("vision range")?,
            egg_energy_transfer: input.next("egg energy transfer")?,
            metabolism: input.next("metabolism")?,
            red: input.next("red")?,
            green: input.next("green")?,
            blue: input.next("blue")?,
            topology: Topology { layers: Vec::new() },
            weights: Vec::new(),
            biases: Vec::new(),
        };
        if let Some(name) = genome.out_of_range_trait(&config.genome) {
            return Err(input.error_at(first_line, format!("genome trait `{name}` out of range")));
        }
        let topology = read_topology(input)?;
        let weights = input.floats("weight", topology.weight_count())?;
        let biases = input.floats("bias", topology.neuron_count())?;
        Ok(Genome {
            topology,
            weights,
            biases,
            ..genome
        })
    }
}

impl FieldRecord for Cell {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.field(self.id)?;
        write_vec2(out, self.position)?;
        write_vec2(out, self.velocity)?;
        out.field(self.angle)?;
        out.field(self.radius)?;
        out.field(self.age)?;
        out.fields(&[self.health, self.energy, self.base_energy, self.waste])?;
        out.fields(&self.memory)?;
        out.flag(self.intents.eat)?;
        out.flag(self.intents.lay_egg)?;
        out.flag(self.intents.stab)?;
        out.fields(&[
            self.sensor.hit_distance,
            self.sensor.color.r,
            self.sensor.color.g,
            self.sensor.color.b,
        ])?;
        out.fields(&[self.stomach.plant_calories, self.stomach.meat_calories])?;
        self.genome.write_fields(out)?;
        let activations = self.brain.activations;
        for activation in [activations.input, activations.hidden, activations.output] {
            out.field(activation_code(activation))?;
        }
        out.fields(&self.brain.values)
    }

    fn read_fields(input: &mut FieldReader<'_>, config: &AppConfig) -> Result<Self> {
        let id = input.next("id")?;
        let position = read_vec2(input, "position")?;
        let velocity = read_vec2(input, "velocity")?;
        let angle = input.next("angle")?;
        let radius = input.next("radius")?;
        let age = input.next("age")?;
        let health = read_amount(input, "health")?;
        let energy = read_amount(input, "energy")?;
        let base_energy = read_amount(input, "base energy")?;
        let waste = read_amount(input, "waste")?;
        let memory = [
            input.next("memory")?,
            input.next("memory")?,
            input.next("memory")?,
        ];
        let intents = Intents {
            eat: input.flag("eat intent")?,
            lay_egg: input.flag("lay egg intent")?,
            stab: input.flag("stab intent")?,
        };
        let sensor = Sensor {
            hit_distance: input.next("sensor distance")?,
            color: Rgb::new(
                input.next("sensor red")?,
                input.next("sensor green")?,
                input.next("sensor blue")?,
            ),
        };
        let stomach = Stomach {
            plant_calories: read_amount(input, "plant calories")?,
            meat_calories: read_amount(input, "meat calories")?,
        };
        let genome = Genome::read_fields(input, config)?;
        let activations = LayerActivations {
            input: read_activation(input, "input activation")?,
            hidden: read_activation(input, "hidden activation")?,
            output: read_activation(input, "output activation")?,
        };
        let mut brain = Brain::from_genome(&genome, activations);
        brain.values = input.floats("neuron value", genome.topology.neuron_count())?;

        Ok(Cell {
            id,
            position,
            velocity,
            angle,
            radius,
            age,
            health,
            energy,
            base_energy,
            waste,
            memory,
            intents,
            sensor,
            stomach,
            genome,
            brain,
        })
    }
}

impl FieldRecord for Egg {
    fn write_fields<W: Write>(&self, out: &mut FieldWriter<W>) -> Result<()> {
        out.field(self.id)?;
        write_vec2(out, self.position)?;
        out.field(self.radius)?;
        out.field(self.age)?;
        out.field(self.energy)?;
        out.flag(self.hatched)?;
        out.flag(self.genome.is_some())?;
        match &self.genome {
            Some(genome) => genome.write_fields(out),
            None => Ok(()),
        }
    }

    fn read_fields(input: &mut FieldReader<'_>, config: &AppConfig) -> Result<Self> {
        let id = input.next("id")?;
        let position = read_vec2(input, "position")?;
        let radius = input.next("radius")?;
        let age = input.next("age")?;
        let energy = read_amount(input, "energy")?;
        let energy_line = input.line();
        let hatched = input.flag("hatched")?;
        if !hatched && energy < config.metabolism.base_energy {
            return Err(input.error_at(
                energy_line,
                format!(
                    "egg energy {energy} below hatchling base energy {}",
                    config.metabolism.base_energy
                ),
            ));
        }
        let genome = if input.flag("has genome")? {
            Some(Genome::read_fields(input, config)?)
        } else {
            None
        };
        Ok(Egg {
            id,
            position,
            radius,
            age,
            energy,
            hatched,
            genome,
        })
    }
}

fn write_food_record<W: Write>(out: &mut FieldWriter<W>, food: &Food) -> Result<()> {
    out.field(food.id)?;
    write_vec2(out, food.position)?;
    out.field(food.radius)?;
    out.field(food.calories)?;
    out.flag(food.consumed)
}

/// Writes food of one kind; items of other kinds are skipped.
pub fn write_food<'a, W, I>(out: &mut FieldWriter<W>, kind: FoodKind, foods: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Food>,
{
    let mut count = 0;
    for food in foods.into_iter().filter(|f| f.kind == kind) {
        write_food_record(out, food)?;
        count += 1;
    }
    Ok(count)
}

/// Reads a whole food stream; the kind is implied by the stream.
pub fn read_food(input: &mut FieldReader<'_>, kind: FoodKind) -> Result<Vec<Food>> {
    let mut foods = Vec::new();
    while !input.is_exhausted() {
        let id = input.next("id")?;
        let position = read_vec2(input, "position")?;
        let radius = input.next("radius")?;
        let calories = read_amount(input, "calories")?;
        let consumed = input.flag("consumed")?;
        foods.push(Food {
            id,
            kind,
            position,
            radius,
            calories,
            consumed,
        });
    }
    Ok(foods)
}
