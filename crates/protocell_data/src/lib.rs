//! Plain data types shared by every Protocell crate.
//!
//! Nothing in here knows how to simulate; behaviour lives in `protocell_core`
//! as extension traits over these structs.

pub mod data;

pub use data::brain::{Activation, Brain, LayerActivations};
pub use data::entity::{Cell, Egg, Intents, Rgb, Sensor, Stomach, Vec2};
pub use data::food::{Food, FoodKind};
pub use data::genome::{Genome, Topology};
