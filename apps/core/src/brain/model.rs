//! Trained classifier model.
//!
//! The trainer exports a small dense feed-forward network as JSON:
//!
//! ```json
//! {
//!   "input_dim": 3,
//!   "layers": [
//!     {"weights": [[0.1, 0.2, 0.3], [0.0, 1.0, 0.0]], "bias": [0.0, 0.0], "activation": "relu"},
//!     {"weights": [[1.0, -1.0], [-1.0, 1.0]], "bias": [0.0, 0.0], "activation": "softmax"}
//!   ]
//! }
//! ```
//!
//! `weights` is `[output][input]`. Inference is a plain forward pass.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Anything that maps a bag-of-words vector to a probability distribution.
pub trait IntentModel: Send + Sync {
    /// Expected length of the input vector.
    fn input_dim(&self) -> usize;

    /// Length of the returned probability vector.
    fn output_dim(&self) -> usize;

    /// Probabilities over the class list for one input vector.
    fn predict(&self, input: &[f32]) -> Result<Vec<f32>, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Softmax,
}

impl Activation {
    fn apply(self, values: &mut [f32]) {
        match self {
            Activation::Linear => {}
            Activation::Relu => values.iter_mut().for_each(|v| *v = v.max(0.0)),
            Activation::Sigmoid => values
                .iter_mut()
                .for_each(|v| *v = 1.0 / (1.0 + (-*v).exp())),
            Activation::Softmax => {
                let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let mut sum = 0.0;
                for v in values.iter_mut() {
                    *v = (*v - max).exp();
                    sum += *v;
                }
                if sum > 0.0 {
                    values.iter_mut().for_each(|v| *v /= sum);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

impl DenseLayer {
    fn output_dim(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut out: Vec<f32> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect();
        self.activation.apply(&mut out);
        out
    }
}

/// Dense feed-forward network loaded from the trainer's JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    input_dim: usize,
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Builds a network and checks that layer shapes chain correctly.
    pub fn new(input_dim: usize, layers: Vec<DenseLayer>) -> Result<Self, AppError> {
        let network = Self { input_dim, layers };
        network.check_shapes()?;
        Ok(network)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        let network: DenseNetwork = serde_json::from_str(&raw)
            .map_err(|e| AppError::Model(format!("invalid model file {:?}: {}", path, e)))?;
        network.check_shapes()?;
        info!(
            "Loaded model from {:?} ({} layers, {} -> {})",
            path,
            network.layers.len(),
            network.input_dim,
            network.output_dim()
        );
        Ok(network)
    }

    fn check_shapes(&self) -> Result<(), AppError> {
        if self.layers.is_empty() {
            return Err(AppError::Model("model has no layers".to_string()));
        }
        let mut expected = self.input_dim;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.output_dim() == 0 {
                return Err(AppError::Model(format!("layer {} has no units", i)));
            }
            if layer.bias.len() != layer.output_dim() {
                return Err(AppError::Model(format!(
                    "layer {}: {} biases for {} units",
                    i,
                    layer.bias.len(),
                    layer.output_dim()
                )));
            }
            if let Some(row) = layer.weights.iter().find(|row| row.len() != expected) {
                return Err(AppError::Model(format!(
                    "layer {}: expected {} inputs, found a row of {}",
                    i,
                    expected,
                    row.len()
                )));
            }
            expected = layer.output_dim();
        }
        Ok(())
    }
}

impl IntentModel for DenseNetwork {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.layers.last().map(DenseLayer::output_dim).unwrap_or(0)
    }

    fn predict(&self, input: &[f32]) -> Result<Vec<f32>, AppError> {
        if input.len() != self.input_dim {
            return Err(AppError::Model(format!(
                "input has {} features, model expects {}",
                input.len(),
                self.input_dim
            )));
        }
        let mut activations = input.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }
        Ok(activations)
    }
}
