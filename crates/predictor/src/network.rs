//! Feed-forward rating regressor.
//!
//! The training job exports the network as JSON:
//!
//! ```json
//! {
//!   "layers": [
//!     {"type": "dense", "weights": [[...], ...], "bias": [...], "activation": "relu"},
//!     {"type": "batch_norm", "gamma": [...], "beta": [...],
//!      "moving_mean": [...], "moving_variance": [...], "epsilon": 0.001},
//!     {"type": "dense", "weights": [[...]], "bias": [...], "activation": "linear"}
//!   ]
//! }
//! ```
//!
//! Dense weights are `[out][in]`. Dropout and flatten do nothing at inference
//! time, so the exporter leaves them out. The last layer must produce a
//! single value: the predicted average rating.

use crate::vocabulary::EmotionVector;
use crate::PredictorError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Anything that maps an emotion vector to a predicted rating.
///
/// Implementations must be pure: the same vector always gives the same
/// prediction.
pub trait RatingPredictor: Send + Sync {
    /// Width of the vectors this predictor accepts
    fn input_width(&self) -> usize;

    fn predict(&self, vector: &EmotionVector) -> Result<f64, PredictorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    #[default]
    Linear,
}

impl Activation {
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Linear => x,
        }
    }
}

fn default_epsilon() -> f32 {
    1e-3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Dense {
        weights: Vec<Vec<f32>>,
        bias: Vec<f32>,
        #[serde(default)]
        activation: Activation,
    },
    /// Batch normalization in inference form (moving statistics)
    BatchNorm {
        gamma: Vec<f32>,
        beta: Vec<f32>,
        moving_mean: Vec<f32>,
        moving_variance: Vec<f32>,
        #[serde(default = "default_epsilon")]
        epsilon: f32,
    },
}

impl Layer {
    /// Check the layer accepts `width` inputs; returns its output width
    fn check(&self, index: usize, width: Option<usize>) -> Result<usize, String> {
        match self {
            Layer::Dense { weights, bias, .. } => {
                let inputs = weights
                    .first()
                    .map(Vec::len)
                    .ok_or_else(|| format!("layer {}: dense layer has no units", index))?;
                if let Some(row) = weights.iter().position(|r| r.len() != inputs) {
                    return Err(format!("layer {}: weight row {} has the wrong length", index, row));
                }
                if bias.len() != weights.len() {
                    return Err(format!(
                        "layer {}: {} biases for {} units",
                        index,
                        bias.len(),
                        weights.len()
                    ));
                }
                if let Some(w) = width.filter(|w| *w != inputs) {
                    return Err(format!("layer {}: expects {} inputs, previous layer gives {}", index, inputs, w));
                }
                Ok(weights.len())
            }
            Layer::BatchNorm {
                gamma,
                beta,
                moving_mean,
                moving_variance,
                epsilon,
            } => {
                let n = gamma.len();
                if beta.len() != n || moving_mean.len() != n || moving_variance.len() != n {
                    return Err(format!("layer {}: batch norm parameters differ in length", index));
                }
                if let Some(w) = width.filter(|w| *w != n) {
                    return Err(format!("layer {}: expects {} inputs, previous layer gives {}", index, n, w));
                }
                if moving_variance.iter().any(|v| v + epsilon <= 0.0) {
                    return Err(format!("layer {}: non-positive variance", index));
                }
                Ok(n)
            }
        }
    }

    fn input_width(&self) -> usize {
        match self {
            Layer::Dense { weights, .. } => weights.first().map(Vec::len).unwrap_or(0),
            Layer::BatchNorm { gamma, .. } => gamma.len(),
        }
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        match self {
            Layer::Dense {
                weights,
                bias,
                activation,
            } => weights
                .iter()
                .zip(bias)
                .map(|(row, b)| {
                    let z: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b;
                    activation.apply(z)
                })
                .collect(),
            Layer::BatchNorm {
                gamma,
                beta,
                moving_mean,
                moving_variance,
                epsilon,
            } => input
                .iter()
                .enumerate()
                .map(|(i, x)| {
                    gamma[i] * (x - moving_mean[i]) / (moving_variance[i] + epsilon).sqrt() + beta[i]
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NetworkFile {
    layers: Vec<Layer>,
}

/// A validated stack of layers ending in a single output
#[derive(Debug, Clone, PartialEq)]
pub struct DenseNetwork {
    layers: Vec<Layer>,
    input_width: usize,
}

impl DenseNetwork {
    /// Validate shapes and build the network
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, String> {
        let first = layers.first().ok_or("network has no layers")?;
        let input_width = first.input_width();

        let mut width = None;
        for (index, layer) in layers.iter().enumerate() {
            width = Some(layer.check(index, width)?);
        }
        if width != Some(1) {
            return Err(format!(
                "network must end in a single output, got {}",
                width.unwrap_or(0)
            ));
        }

        Ok(Self {
            layers,
            input_width,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let file: NetworkFile = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Self::from_layers(file.layers)
    }

    /// Load a network exported by the training job
    pub fn load(path: &Path) -> Result<Self, PredictorError> {
        if !path.exists() {
            return Err(PredictorError::ArtifactMissing {
                path: path.display().to_string(),
            });
        }
        let data = fs::read_to_string(path)?;
        let network = Self::from_json_str(&data).map_err(|reason| PredictorError::InvalidArtifact {
            path: path.display().to_string(),
            reason,
        })?;
        debug!(
            "Loaded network from {:?}: {} layers, input width {}",
            path,
            network.layers.len(),
            network.input_width
        );
        Ok(network)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

impl RatingPredictor for DenseNetwork {
    fn input_width(&self) -> usize {
        self.input_width
    }

    fn predict(&self, vector: &EmotionVector) -> Result<f64, PredictorError> {
        if vector.len() != self.input_width {
            return Err(PredictorError::DimensionMismatch {
                expected: self.input_width,
                found: vector.len(),
            });
        }

        let mut activations = vector.as_slice().to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations);
        }

        let output = activations[0];
        if !output.is_finite() {
            return Err(PredictorError::NonFiniteOutput);
        }
        Ok(output as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;

    fn vocab() -> Vocabulary {
        Vocabulary::fit([vec!["Anger", "Fear", "Joy"]])
    }

    fn small_network() -> DenseNetwork {
        DenseNetwork::from_json_str(
            r#"{
                "layers": [
                    {"type": "dense", "weights": [[1.0, 0.0, 2.0], [0.0, -1.0, 0.0]],
                     "bias": [0.5, 0.0], "activation": "relu"},
                    {"type": "batch_norm", "gamma": [2.0, 1.0], "beta": [0.0, 1.0],
                     "moving_mean": [0.5, 0.0], "moving_variance": [1.0, 1.0], "epsilon": 0.0},
                    {"type": "dense", "weights": [[0.5, 1.0]], "bias": [1.0]}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_forward_pass() {
        let network = small_network();
        assert_eq!(network.input_width(), 3);

        // x = [0, 1, 1] (Fear, Joy)
        // dense relu: [0 + 2 + 0.5, max(-1, 0)] = [2.5, 0]
        // batch norm: [2 * (2.5 - 0.5) / 1 + 0, 1 * 0 / 1 + 1] = [4, 1]
        // dense linear: 0.5 * 4 + 1 * 1 + 1 = 4
        let vector = vocab().encode(&["Fear", "Joy"]).unwrap();
        assert_eq!(network.predict(&vector).unwrap(), 4.0);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let network = small_network();
        let vector = vocab().encode(&["Anger"]).unwrap();
        let first = network.predict(&vector).unwrap();
        for _ in 0..10 {
            assert_eq!(network.predict(&vector).unwrap(), first);
        }
    }

    #[test]
    fn test_wrong_input_width() {
        let network = small_network();
        let vector = Vocabulary::fit([vec!["Joy"]]).encode(&["Joy"]).unwrap();
        let err = network.predict(&vector).unwrap_err();
        assert!(matches!(
            err,
            PredictorError::DimensionMismatch { expected: 3, found: 1 }
        ));
    }

    #[test]
    fn test_shape_validation() {
        // bias length mismatch
        assert!(DenseNetwork::from_layers(vec![Layer::Dense {
            weights: vec![vec![1.0, 1.0]],
            bias: vec![0.0, 0.0],
            activation: Activation::Linear,
        }])
        .is_err());

        // layers don't chain
        assert!(DenseNetwork::from_layers(vec![
            Layer::Dense {
                weights: vec![vec![1.0], vec![1.0]],
                bias: vec![0.0, 0.0],
                activation: Activation::Relu,
            },
            Layer::Dense {
                weights: vec![vec![1.0, 1.0, 1.0]],
                bias: vec![0.0],
                activation: Activation::Linear,
            },
        ])
        .is_err());

        // more than one output
        assert!(DenseNetwork::from_layers(vec![Layer::Dense {
            weights: vec![vec![1.0], vec![1.0]],
            bias: vec![0.0, 0.0],
            activation: Activation::Linear,
        }])
        .is_err());

        assert!(DenseNetwork::from_layers(vec![]).is_err());
    }

    #[test]
    fn test_unknown_layer_type_rejected() {
        let result = DenseNetwork::from_json_str(r#"{"layers": [{"type": "conv2d"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing() {
        let err = DenseNetwork::load(Path::new("nowhere/model.json")).unwrap_err();
        assert!(matches!(err, PredictorError::ArtifactMissing { .. }));
    }
}
