use super::*;

/// Applies `activation` to a single neuron value.
#[must_use]
pub fn activate(activation: Activation, x: f32) -> f32 {
    match activation {
        Activation::Identity => x,
        Activation::Relu => x.max(0.0),
        // Negative inputs are mirrored and damped.
        Activation::LeakyRelu => {
            if x < 0.0 {
                x * -0.1
            } else {
                x
            }
        }
        Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        Activation::Tanh => x.tanh(),
        Activation::SquareRoot => x.max(0.0).sqrt(),
    }
}

fn layer_activation(brain: &Brain, layer: usize) -> Activation {
    if layer + 1 == brain.topology.layer_count() {
        brain.activations.output
    } else if layer == 0 {
        brain.activations.input
    } else {
        brain.activations.hidden
    }
}

fn apply_activation(brain: &mut Brain, layer: usize) {
    let activation = layer_activation(brain, layer);
    if activation == Activation::Identity {
        return;
    }
    let start = brain.topology.layer_start(layer);
    let end = start + brain.topology.layer_size(layer);
    for value in &mut brain.values[start..end] {
        *value = activate(activation, *value);
    }
}

/// Adds the weighted previous layer into `layer`, then activates it.
fn pass_layer(brain: &mut Brain, layer: usize) {
    let inputs = brain.topology.layer_size(layer - 1);
    let input_start = brain.topology.layer_start(layer - 1);
    let start = brain.topology.layer_start(layer);
    let weight_start = brain.topology.weight_start(layer);

    for neuron in 0..brain.topology.layer_size(layer) {
        let weights = &brain.weights[weight_start + neuron * inputs..][..inputs];
        let sum: f32 = brain.values[input_start..input_start + inputs]
            .iter()
            .zip(weights)
            .map(|(value, weight)| value * weight)
            .sum();
        brain.values[start + neuron] += sum;
    }
    apply_activation(brain, layer);
}

/// Runs one full pass over the network.
///
/// Biases are added to every neuron, inputs included. The input layer is
/// then activated with its own function before layer 1 is computed; every
/// later layer is activated as it is passed.
pub fn evaluate(brain: &mut Brain) {
    for (value, bias) in brain.values.iter_mut().zip(&brain.biases) {
        *value += bias;
    }
    apply_activation(brain, 0);
    for layer in 1..brain.topology.layer_count() {
        pass_layer(brain, layer);
    }
}
