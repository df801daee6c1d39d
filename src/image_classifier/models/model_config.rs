#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: String,
    /// (height, width)
    pub input_shape: (u32, u32),
    /// One label per model output, in output order.
    pub labels: Vec<String>,
    /// Set when the model emits logits rather than probabilities.
    pub apply_softmax: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            onnx_model_path: "./models/cat_dog_rabbit.onnx".to_string(),
            input_shape: (224, 224),
            labels: vec!["cat".to_string(), "dog".to_string(), "rabbit".to_string()],
            apply_softmax: true,
        }
    }
}
