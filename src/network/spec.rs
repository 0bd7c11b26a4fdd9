use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::network::network::Network;

/// Serializable description of a network architecture and its
/// hyperparameters.
///
/// Activations are kept as names so configuration files can carry any
/// string; unknown names resolve to ReLU when the network is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub hidden_sizes: Vec<usize>,
    pub output_size: usize,
    pub learning_rate: f64,
    pub regularization: f64,
    /// One name per layer, output last; shorter lists are padded.
    pub activations: Vec<String>,
}

impl Default for NetworkSpec {
    /// The board-evaluation architecture: 72 → 32 → 16 → 8 → 4 → 2 → 1.
    fn default() -> Self {
        NetworkSpec {
            input_size: crate::encoding::FEATURE_COUNT,
            hidden_sizes: vec![32, 16, 8, 4, 2],
            output_size: 1,
            learning_rate: 3e-3,
            regularization: 0.0,
            activations: Vec::new(),
        }
    }
}

/// A built network plus the activation names that had to be replaced.
#[derive(Debug)]
pub struct BuiltNetwork {
    pub network: Network,
    pub unknown_activations: Vec<String>,
}

impl NetworkSpec {
    /// Uses `activation` for every hidden layer and Sigmoid for the output.
    pub fn with_hidden_activation(mut self, activation: &str) -> Self {
        self.activations = vec![activation.to_string(); self.hidden_sizes.len()];
        self.activations.push(ActivationFunction::Sigmoid.to_string());
        self
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<BuiltNetwork> {
        let mut unknown_activations = Vec::new();
        let functions: Vec<ActivationFunction> = self.activations.iter()
            .map(|name| {
                let choice = ActivationFunction::resolve(name);
                if let Some(bad) = choice.unknown_name {
                    unknown_activations.push(bad);
                }
                choice.function
            })
            .collect();

        let network = Network::new(
            self.input_size,
            &self.hidden_sizes,
            self.output_size,
            self.learning_rate,
            self.regularization,
            &functions,
            rng,
        )?;
        Ok(BuiltNetwork { network, unknown_activations })
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkSpec> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
