use std::fs;
use std::path::Path;

use rand::Rng;

use crate::error::{NetworkError, PersistenceError};

/// Default learning rate for freshly constructed networks.
const LEARNING_RATE: f64 = 0.1;

/// A single-hidden-layer sigmoid network trained by per-example stochastic
/// gradient descent.
///
/// The serialized form uses camelCase field names (`inputSize`,
/// `weightsInputHidden`, ...) so model files match the original format read
/// by the evaluator.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    /// `input_size` rows x `hidden_size` cols.
    weights_input_hidden: Vec<Vec<f64>>,
    bias_hidden: Vec<f64>,
    /// `hidden_size` rows x `output_size` cols.
    weights_hidden_output: Vec<Vec<f64>>,
    bias_output: Vec<f64>,
    learning_rate: f64,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative expressed in terms of the post-activation value.
fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

impl Network {
    /// Create a network with Xavier-style random weights and zero biases.
    ///
    /// Layer weights are drawn uniformly from `[-L, L]` with
    /// `L = sqrt(6 / (fan_in + fan_out))`.
    pub fn new<R: Rng>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Self {
        assert!(
            input_size > 0 && hidden_size > 0 && output_size > 0,
            "layer sizes must be positive"
        );

        let limit_ih = (6.0 / (input_size + hidden_size) as f64).sqrt();
        let weights_input_hidden = (0..input_size)
            .map(|_| {
                (0..hidden_size)
                    .map(|_| rng.gen_range(-limit_ih..=limit_ih))
                    .collect()
            })
            .collect();

        let limit_ho = (6.0 / (hidden_size + output_size) as f64).sqrt();
        let weights_hidden_output = (0..hidden_size)
            .map(|_| {
                (0..output_size)
                    .map(|_| rng.gen_range(-limit_ho..=limit_ho))
                    .collect()
            })
            .collect();

        Network {
            input_size,
            hidden_size,
            output_size,
            weights_input_hidden,
            bias_hidden: vec![0.0; hidden_size],
            weights_hidden_output,
            bias_output: vec![0.0; output_size],
            learning_rate: LEARNING_RATE,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    fn check_input(&self, input: &[f64]) -> Result<(), NetworkError> {
        if input.len() != self.input_size {
            return Err(NetworkError::DimensionMismatch {
                what: "input",
                expected: self.input_size,
                actual: input.len(),
            });
        }
        Ok(())
    }

    /// Forward pass, returning hidden and output activations.
    fn forward(&self, input: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut hidden = Vec::with_capacity(self.hidden_size);
        for j in 0..self.hidden_size {
            let mut sum = self.bias_hidden[j];
            for (i, &x) in input.iter().enumerate() {
                sum += x * self.weights_input_hidden[i][j];
            }
            hidden.push(sigmoid(sum));
        }

        let mut output = Vec::with_capacity(self.output_size);
        for k in 0..self.output_size {
            let mut sum = self.bias_output[k];
            for (j, &h) in hidden.iter().enumerate() {
                sum += h * self.weights_hidden_output[j][k];
            }
            output.push(sigmoid(sum));
        }

        (hidden, output)
    }

    /// Run inference on an input vector. Every output component lies
    /// strictly within (0, 1). Side-effect free.
    pub fn guess(&self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.check_input(input)?;
        let (_, output) = self.forward(input);
        Ok(output)
    }

    /// Apply one step of backpropagation on a single example, using the
    /// mean-squared-error gradient convention.
    ///
    /// Both layers' deltas are computed from the pre-update weights; the
    /// output layer is only mutated afterwards.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<(), NetworkError> {
        self.check_input(input)?;
        if target.len() != self.output_size {
            return Err(NetworkError::DimensionMismatch {
                what: "target",
                expected: self.output_size,
                actual: target.len(),
            });
        }

        let (hidden, output) = self.forward(input);

        let output_delta: Vec<f64> = (0..self.output_size)
            .map(|k| (target[k] - output[k]) * sigmoid_derivative(output[k]))
            .collect();

        let hidden_delta: Vec<f64> = (0..self.hidden_size)
            .map(|j| {
                let error: f64 = (0..self.output_size)
                    .map(|k| output_delta[k] * self.weights_hidden_output[j][k])
                    .sum();
                error * sigmoid_derivative(hidden[j])
            })
            .collect();

        for j in 0..self.hidden_size {
            for k in 0..self.output_size {
                self.weights_hidden_output[j][k] += self.learning_rate * output_delta[k] * hidden[j];
            }
        }
        for k in 0..self.output_size {
            self.bias_output[k] += self.learning_rate * output_delta[k];
        }

        for i in 0..self.input_size {
            for j in 0..self.hidden_size {
                self.weights_input_hidden[i][j] += self.learning_rate * hidden_delta[j] * input[i];
            }
        }
        for j in 0..self.hidden_size {
            self.bias_hidden[j] += self.learning_rate * hidden_delta[j];
        }

        Ok(())
    }

    /// Serialize the full parameter set to pretty-printed JSON.
    ///
    /// The write goes through a temporary file renamed into place, so a
    /// failed save never leaves a partial model file behind and the
    /// in-memory network stays valid.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self).expect("network serializes");

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = std::path::PathBuf::from(tmp);

        let write_err = |e: std::io::Error| PersistenceError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        };
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(e));
        }
        fs::rename(&tmp, path).map_err(write_err)
    }

    /// Load a network from a model file, validating that the declared
    /// dimensions agree with the matrix contents.
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        let json = fs::read_to_string(path).map_err(|e| PersistenceError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let network: Network =
            serde_json::from_str(&json).map_err(|e| PersistenceError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        network.validate_shape(path)?;
        Ok(network)
    }

    fn validate_shape(&self, path: &Path) -> Result<(), PersistenceError> {
        let mismatch = |field, expected, actual| PersistenceError::ShapeMismatch {
            path: path.to_path_buf(),
            field,
            expected,
            actual,
        };

        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(mismatch("inputSize", 1, 0));
        }
        if self.weights_input_hidden.len() != self.input_size {
            return Err(mismatch(
                "weightsInputHidden",
                self.input_size,
                self.weights_input_hidden.len(),
            ));
        }
        for row in &self.weights_input_hidden {
            if row.len() != self.hidden_size {
                return Err(mismatch("weightsInputHidden", self.hidden_size, row.len()));
            }
        }
        if self.bias_hidden.len() != self.hidden_size {
            return Err(mismatch("biasHidden", self.hidden_size, self.bias_hidden.len()));
        }
        if self.weights_hidden_output.len() != self.hidden_size {
            return Err(mismatch(
                "weightsHiddenOutput",
                self.hidden_size,
                self.weights_hidden_output.len(),
            ));
        }
        for row in &self.weights_hidden_output {
            if row.len() != self.output_size {
                return Err(mismatch("weightsHiddenOutput", self.output_size, row.len()));
            }
        }
        if self.bias_output.len() != self.output_size {
            return Err(mismatch("biasOutput", self.output_size, self.bias_output.len()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_construction_shapes() {
        let net = Network::new(4, 6, 2, &mut rng());
        assert_eq!(net.weights_input_hidden.len(), 4);
        assert!(net.weights_input_hidden.iter().all(|r| r.len() == 6));
        assert_eq!(net.bias_hidden.len(), 6);
        assert_eq!(net.weights_hidden_output.len(), 6);
        assert!(net.weights_hidden_output.iter().all(|r| r.len() == 2));
        assert_eq!(net.bias_output.len(), 2);
    }

    #[test]
    fn test_biases_start_at_zero() {
        let net = Network::new(3, 5, 2, &mut rng());
        assert!(net.bias_hidden.iter().all(|&b| b == 0.0));
        assert!(net.bias_output.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_xavier_init_range() {
        let net = Network::new(10, 20, 5, &mut rng());
        let limit_ih = (6.0 / 30.0f64).sqrt();
        let limit_ho = (6.0 / 25.0f64).sqrt();
        for row in &net.weights_input_hidden {
            assert!(row.iter().all(|&w| w.abs() <= limit_ih));
        }
        for row in &net.weights_hidden_output {
            assert!(row.iter().all(|&w| w.abs() <= limit_ho));
        }
    }

    #[test]
    fn test_seeded_init_is_reproducible() {
        let a = Network::new(5, 7, 3, &mut SmallRng::seed_from_u64(9));
        let b = Network::new(5, 7, 3, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a.weights_input_hidden, b.weights_input_hidden);
        assert_eq!(a.weights_hidden_output, b.weights_hidden_output);
    }

    #[test]
    fn test_guess_rejects_wrong_input_length() {
        let net = Network::new(4, 6, 2, &mut rng());
        let err = net.guess(&[0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::DimensionMismatch {
                expected: 4,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_train_rejects_wrong_target_length() {
        let mut net = Network::new(4, 6, 2, &mut rng());
        let err = net.train(&[0.0; 4], &[0.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::DimensionMismatch {
                expected: 2,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_guess_is_deterministic() {
        let net = Network::new(4, 6, 2, &mut rng());
        let input = [0.1, 0.5, 0.9, 0.3];
        assert_eq!(net.guess(&input).unwrap(), net.guess(&input).unwrap());
    }

    #[test]
    fn test_guess_outputs_in_open_unit_interval() {
        let net = Network::new(4, 6, 2, &mut rng());
        let output = net.guess(&[1.0, -1.0, 0.5, 0.0]).unwrap();
        assert!(output.iter().all(|&o| o > 0.0 && o < 1.0));
    }

    #[test]
    fn test_training_reduces_loss() {
        let mut net = Network::new(2, 4, 1, &mut rng());
        let input = [1.0, 0.0];
        let target = [1.0];

        let loss = |net: &Network| {
            let out = net.guess(&input).unwrap();
            (target[0] - out[0]).powi(2)
        };

        let mut previous = loss(&net);
        for _ in 0..10 {
            net.train(&input, &target).unwrap();
            let current = loss(&net);
            assert!(current < previous, "loss must strictly decrease");
            previous = current;
        }
    }

    #[test]
    fn test_repeated_training_converges() {
        let mut net = Network::new(2, 3, 1, &mut SmallRng::seed_from_u64(0));
        for _ in 0..500 {
            net.train(&[1.0, 0.0], &[1.0]).unwrap();
        }
        assert!(net.guess(&[1.0, 0.0]).unwrap()[0] > 0.9);
    }

    #[test]
    fn test_save_load_round_trip_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.nn");

        let mut net = Network::new(4, 6, 4, &mut rng());
        net.train(&[0.2, 0.4, 0.6, 0.8], &[1.0, 0.0, 1.0, 0.0])
            .unwrap();
        net.save(&path).unwrap();
        let restored = Network::load(&path).unwrap();

        assert_eq!(net.weights_input_hidden, restored.weights_input_hidden);
        assert_eq!(net.bias_hidden, restored.bias_hidden);
        assert_eq!(net.weights_hidden_output, restored.weights_hidden_output);
        assert_eq!(net.bias_output, restored.bias_output);

        let input = [0.3, 0.1, 0.7, 0.9];
        assert_eq!(net.guess(&input).unwrap(), restored.guess(&input).unwrap());
    }

    #[test]
    fn test_full_size_round_trip_guess() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.nn");

        let net = Network::new(25, 128, 25, &mut rng());
        net.save(&path).unwrap();
        let restored = Network::load(&path).unwrap();

        let zeros = vec![0.0; 25];
        assert_eq!(net.guess(&zeros).unwrap(), restored.guess(&zeros).unwrap());
    }

    #[test]
    fn test_model_file_uses_camel_case_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.nn");
        Network::new(2, 3, 2, &mut rng()).save(&path).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"inputSize\""));
        assert!(json.contains("\"weightsInputHidden\""));
        assert!(json.contains("\"learningRate\""));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = Network::load(Path::new("no_such_model.nn")).unwrap_err();
        assert!(matches!(err, PersistenceError::FileRead { .. }));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.nn");
        std::fs::write(&path, "not json").unwrap();
        let err = Network::load(&path).unwrap_err();
        assert!(matches!(err, PersistenceError::Parse { .. }));
    }

    #[test]
    fn test_load_rejects_inconsistent_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.nn");

        let mut net = Network::new(2, 3, 2, &mut rng());
        net.bias_hidden.pop();
        let json = serde_json::to_string_pretty(&net).unwrap();
        std::fs::write(&path, json).unwrap();

        let err = Network::load(&path).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::ShapeMismatch {
                field: "biasHidden",
                ..
            }
        ));
    }

    #[test]
    fn test_save_failure_leaves_network_usable() {
        let net = Network::new(2, 3, 2, &mut rng());
        let err = net.save(Path::new("/no/such/dir/model.nn")).unwrap_err();
        assert!(matches!(err, PersistenceError::FileWrite { .. }));
        // The in-memory network is untouched by the failed save.
        assert!(net.guess(&[0.5, 0.5]).is_ok());
    }
}
