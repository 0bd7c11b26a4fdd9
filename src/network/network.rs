use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::layers::composite::CompositeLayer;
use crate::loss::bce::BinaryCrossEntropy;
use crate::math::matrix::Matrix;
use crate::network::metadata::ModelMetadata;

/// Version written into every model artifact.
pub const ARTIFACT_VERSION: u32 = 1;

/// Hidden stack of composite layers followed by one output layer, trained
/// against binary cross-entropy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub hidden: Vec<CompositeLayer>,
    pub output: CompositeLayer,
    #[serde(default)]
    pub metadata: ModelMetadata,
    #[serde(skip)]
    loss: BinaryCrossEntropy,
}

#[derive(Serialize)]
struct ArtifactRef<'a> {
    version: u32,
    dimensions: Vec<usize>,
    activations: Vec<ActivationFunction>,
    network: &'a Network,
}

#[derive(Deserialize)]
struct Artifact {
    version: u32,
    dimensions: Vec<usize>,
    activations: Vec<ActivationFunction>,
    network: Network,
}

impl Network {
    /// Builds `input → hidden_sizes… → output_size`.
    ///
    /// `activations` lists one function per layer, output last. A shorter
    /// list is padded with ReLU for the remaining hidden layers and Sigmoid
    /// for the output layer.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        hidden_sizes: &[usize],
        output_size: usize,
        learning_rate: f64,
        regularization: f64,
        activations: &[ActivationFunction],
        rng: &mut R,
    ) -> Result<Network> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(NnError::InvalidConfig(format!("learning rate must be positive, got {learning_rate}")));
        }
        if !regularization.is_finite() || regularization < 0.0 {
            return Err(NnError::InvalidConfig(format!("regularization must be non-negative, got {regularization}")));
        }
        let activations = pad_activations(activations, hidden_sizes.len())?;

        let mut dims = Vec::with_capacity(hidden_sizes.len() + 2);
        dims.push(input_size);
        dims.extend_from_slice(hidden_sizes);

        let mut hidden = Vec::with_capacity(hidden_sizes.len());
        for (i, window) in dims.windows(2).enumerate() {
            hidden.push(CompositeLayer::new(
                window[0],
                window[1],
                learning_rate,
                regularization,
                activations[i],
                rng,
            )?);
        }

        let output = CompositeLayer::new(
            dims[dims.len() - 1],
            output_size,
            learning_rate,
            regularization,
            activations[activations.len() - 1],
            rng,
        )?;

        let network = Network {
            hidden,
            output,
            metadata: ModelMetadata::default(),
            loss: BinaryCrossEntropy::new(),
        };
        log::info!("{}", network.summary());
        Ok(network)
    }

    /// Assembles a network from existing layers, checking the dimension chain.
    pub fn from_layers(hidden: Vec<CompositeLayer>, output: CompositeLayer) -> Result<Network> {
        let network = Network {
            hidden,
            output,
            metadata: ModelMetadata::default(),
            loss: BinaryCrossEntropy::new(),
        };
        network.validate()?;
        Ok(network)
    }

    pub fn input_size(&self) -> usize {
        self.hidden.first().unwrap_or(&self.output).input_size()
    }

    pub fn output_size(&self) -> usize {
        self.output.units()
    }

    /// `[input, hidden…, output]` unit counts.
    pub fn dimensions(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers().map(|l| l.units()))
            .collect()
    }

    pub fn activations(&self) -> Vec<ActivationFunction> {
        self.layers().map(|l| l.activation_function()).collect()
    }

    /// Hidden layers then the output layer.
    pub fn layers(&self) -> impl Iterator<Item = &CompositeLayer> {
        self.hidden.iter().chain(std::iter::once(&self.output))
    }

    /// Checks every layer's parameters and the layer-to-layer dimension chain.
    pub fn validate(&self) -> Result<()> {
        let mut expected = self.input_size();
        for layer in self.layers() {
            layer.linear.check_parameters()?;
            if layer.input_size() != expected {
                return Err(NnError::shape("Network layer chain", format!("{expected} inputs"), layer.input_size()));
            }
            expected = layer.units();
        }
        Ok(())
    }

    pub fn set_learning_rate(&mut self, value: f64) {
        for layer in self.hidden.iter_mut().chain(std::iter::once(&mut self.output)) {
            layer.linear.learning_rate = value;
        }
    }

    /// Forward pass without caching; `x` is (features x examples) and the
    /// result is (output units x examples).
    pub fn predict_matrix(&self, x: &Matrix) -> Result<Matrix> {
        let mut current = self.hidden.iter()
            .try_fold(x.clone(), |acc, layer| layer.apply(&acc))?;
        current = self.output.apply(&current)?;
        Ok(current)
    }

    /// Flattened predictions, one per example for a single-unit output.
    pub fn predict(&self, x: &Matrix) -> Result<Vec<f64>> {
        Ok(self.predict_matrix(x)?.flatten())
    }

    /// One gradient step over the batch `x` with `labels` shaped like the
    /// output (output units x examples). Returns the predictions made
    /// before the update and the batch cost.
    pub fn train_step(&mut self, x: &Matrix, labels: &Matrix) -> Result<(Vec<f64>, f64)> {
        let mut current = x.clone();
        for layer in &mut self.hidden {
            current = layer.forward(current)?;
        }
        let scores = self.output.forward(current)?;
        let cost = self.loss.forward(&scores, labels)?;

        let mut delta = self.loss.backward(labels)?;
        delta = self.output.backward(&delta)?.input;
        for layer in self.hidden.iter_mut().rev() {
            delta = layer.backward(&delta)?.input;
        }

        Ok((scores.flatten(), cost))
    }

    pub fn summary(&self) -> String {
        let mut out = format!(
            "network: {} input features, {} hidden layers",
            self.input_size(),
            self.hidden.len()
        );
        for (i, layer) in self.hidden.iter().enumerate() {
            out.push_str(&format!(
                "; hidden {}: {} units ({})",
                i + 1,
                layer.units(),
                layer.activation_function()
            ));
        }
        out.push_str(&format!(
            "; output: {} units ({})",
            self.output.units(),
            self.output.activation_function()
        ));
        out
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.artifact())?)
    }

    pub fn from_json_str(json: &str) -> Result<Network> {
        let artifact: Artifact = serde_json::from_str(json)
            .map_err(|e| NnError::CorruptModel(e.to_string()))?;
        Network::from_artifact(artifact)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.artifact())?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let artifact: Artifact = serde_json::from_reader(reader)
            .map_err(|e| NnError::CorruptModel(e.to_string()))?;
        Network::from_artifact(artifact)
    }

    fn artifact(&self) -> ArtifactRef<'_> {
        ArtifactRef {
            version: ARTIFACT_VERSION,
            dimensions: self.dimensions(),
            activations: self.activations(),
            network: self,
        }
    }

    fn from_artifact(artifact: Artifact) -> Result<Network> {
        if artifact.version != ARTIFACT_VERSION {
            return Err(NnError::CorruptModel(format!(
                "unsupported artifact version {} (expected {ARTIFACT_VERSION})",
                artifact.version
            )));
        }
        let network = artifact.network;
        network.validate().map_err(|e| NnError::CorruptModel(e.to_string()))?;
        if network.dimensions() != artifact.dimensions || network.activations() != artifact.activations {
            return Err(NnError::CorruptModel(
                "recorded architecture does not match the stored layers".into(),
            ));
        }
        Ok(network)
    }
}

/// Pads a per-layer activation list to `hidden + 1` entries.
pub fn pad_activations(activations: &[ActivationFunction], hidden: usize) -> Result<Vec<ActivationFunction>> {
    let total = hidden + 1;
    if activations.len() > total {
        return Err(NnError::InvalidConfig(format!(
            "{} activations given for {total} layers",
            activations.len()
        )));
    }
    let mut padded = activations.to_vec();
    if padded.len() < total {
        padded.resize(hidden, ActivationFunction::ReLU);
        padded.push(ActivationFunction::Sigmoid);
    }
    Ok(padded)
}
