use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

use super::files::{ModelFiles, WeightsFormat};

struct BertForQuestionAnsweringImpl {
    bert: BertModel,
    qa_outputs: Linear,
}

impl BertForQuestionAnsweringImpl {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        // One logit for "span starts here", one for "span ends here".
        let qa_outputs = candle_nn::linear(config.hidden_size, 2, vb.pp("qa_outputs"))?;

        Ok(Self { bert, qa_outputs })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<(Tensor, Tensor)> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let logits = self.qa_outputs.forward(&hidden)?;
        let start = logits.i((.., .., 0))?.contiguous()?;
        let end = logits.i((.., .., 1))?.contiguous()?;
        Ok((start, end))
    }
}

/// BERT encoder with a SQuAD span head (`qa_outputs`).
#[derive(Clone)]
pub struct BertForQuestionAnswering(std::sync::Arc<BertForQuestionAnsweringImpl>);

impl BertForQuestionAnswering {
    pub fn load(files: &ModelFiles, device: &Device) -> Result<Self> {
        let config = Self::read_config(&files.config)?;

        let vb = match files.weights_format {
            WeightsFormat::Safetensors => unsafe {
                VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, device)?
            },
            WeightsFormat::Pytorch => VarBuilder::from_pth(&files.weights, DType::F32, device)?,
        };

        let model = BertForQuestionAnsweringImpl::load(vb, &config)?;

        Ok(Self(std::sync::Arc::new(model)))
    }

    fn read_config(path: &Path) -> Result<Config> {
        let config_content = std::fs::read_to_string(path)?;
        serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))
    }

    /// Returns `(start_logits, end_logits)`, each shaped `[batch, seq_len]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<(Tensor, Tensor)> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_CONFIG: &str = r#"{
        "vocab_size": 32,
        "hidden_size": 8,
        "num_hidden_layers": 1,
        "num_attention_heads": 2,
        "intermediate_size": 16,
        "hidden_act": "gelu",
        "hidden_dropout_prob": 0.0,
        "max_position_embeddings": 16,
        "type_vocab_size": 2,
        "initializer_range": 0.02,
        "layer_norm_eps": 1e-12,
        "pad_token_id": 0,
        "classifier_dropout": null,
        "model_type": "bert"
    }"#;

    #[test]
    fn test_span_head_returns_one_score_row_per_token() {
        let device = Device::Cpu;
        let config: Config = serde_json::from_str(TINY_CONFIG).unwrap();
        let vb = VarBuilder::zeros(DType::F32, &device);
        let model = BertForQuestionAnsweringImpl::load(vb, &config).unwrap();

        let ids = Tensor::new(&[[2u32, 5, 6, 3, 7, 8, 9, 3]], &device).unwrap();
        let type_ids = Tensor::new(&[[0u32, 0, 0, 0, 1, 1, 1, 1]], &device).unwrap();
        let mask = Tensor::ones((1, 8), DType::U32, &device).unwrap();

        let (start, end) = model.forward(&ids, &type_ids, Some(&mask)).unwrap();

        assert_eq!(start.dims(), &[1, 8]);
        assert_eq!(end.dims(), &[1, 8]);
        let start = start.squeeze(0).unwrap().to_vec1::<f32>().unwrap();
        assert_eq!(start.len(), 8);
    }
}
