//! BERT span-scoring binding (Candle).
//!
//! Adapts a BERT question-answering checkpoint (`config.json` +
//! `model.safetensors` with a two-unit `qa_outputs` head) to the
//! [`ScoringEngine`] contract. The transformer computation itself lives in
//! `candle-transformers`; this module only assembles tensors and splits the
//! head's logits into start/end score vectors.

use std::path::Path;
use std::sync::Arc;

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use tracing::{debug, info};

use crate::encoding::EncodedInput;

use super::device::select_device;
use super::error::EngineError;
use super::{ScorePrediction, ScoringEngine, ScoringSession};

struct BertForSpanScoringImpl {
    bert: BertModel,
    qa_outputs: Linear,
}

impl BertForSpanScoringImpl {
    fn load(vb: VarBuilder, config: &Config) -> candle_core::Result<Self> {
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        let qa_outputs = candle_nn::linear(config.hidden_size, 2, vb.pp("qa_outputs"))?;

        Ok(Self { bert, qa_outputs })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> candle_core::Result<(Vec<f32>, Vec<f32>)> {
        let sequence = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;

        // [1, seq_len, 2] -> per-position (start, end) logits.
        let logits = self.qa_outputs.forward(&sequence)?;
        let start = logits.i((.., .., 0))?.flatten_all()?.to_vec1::<f32>()?;
        let end = logits.i((.., .., 1))?.flatten_all()?.to_vec1::<f32>()?;

        Ok((start, end))
    }
}

/// Shared, immutable BERT span-scoring model.
#[derive(Clone)]
pub struct BertQaEngine {
    model: Arc<BertForSpanScoringImpl>,
    device: Device,
}

impl std::fmt::Debug for BertQaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertQaEngine")
            .field("device", &format!("{:?}", self.device))
            .finish()
    }
}

impl BertQaEngine {
    /// Loads a checkpoint directory (`config.json` + `model.safetensors`).
    pub fn load<P: AsRef<Path>>(model_dir: P) -> Result<Self, EngineError> {
        let model_dir = model_dir.as_ref();

        if !model_dir.exists() {
            return Err(EngineError::ModelNotFound {
                path: model_dir.to_path_buf(),
            });
        }

        let config_path = model_dir.join("config.json");
        if !config_path.exists() {
            return Err(EngineError::ModelLoadFailed {
                reason: format!("Missing config.json in {}", model_dir.display()),
            });
        }

        let weights_path = model_dir.join("model.safetensors");
        if !weights_path.exists() {
            return Err(EngineError::ModelLoadFailed {
                reason: format!("Missing model.safetensors in {}", model_dir.display()),
            });
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for span scoring");

        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| EngineError::ModelLoadFailed {
                reason: format!("Failed to parse config: {e}"),
            })?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)? };

        let model = BertForSpanScoringImpl::load(vb, &config).map_err(|e| {
            EngineError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {e}"),
            }
        })?;

        info!(
            model_dir = %model_dir.display(),
            hidden_size = config.hidden_size,
            "Span-scoring model loaded"
        );

        Ok(Self {
            model: Arc::new(model),
            device,
        })
    }
}

impl ScoringEngine for BertQaEngine {
    type Session = BertQaSession;

    fn create_session(&self) -> Result<Self::Session, EngineError> {
        Ok(BertQaSession {
            model: Arc::clone(&self.model),
            device: self.device.clone(),
        })
    }
}

/// Exclusive scoring handle over the shared BERT model.
pub struct BertQaSession {
    model: Arc<BertForSpanScoringImpl>,
    device: Device,
}

impl ScoringSession for BertQaSession {
    fn score(&mut self, input: &EncodedInput) -> Result<ScorePrediction, EngineError> {
        let input_ids = Tensor::new(input.input_ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let segment_ids = Tensor::new(input.segment_ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let input_mask = Tensor::new(input.input_mask.as_slice(), &self.device)?.unsqueeze(0)?;

        let (start_scores, end_scores) = self
            .model
            .forward(&input_ids, &segment_ids, Some(&input_mask))
            .map_err(|e| EngineError::ScoringFailed {
                reason: e.to_string(),
            })?;

        debug!(
            token_count = input.token_count(),
            unique_id = input.unique_id(),
            "Scored input (BERT)"
        );

        let prediction = ScorePrediction {
            start_scores,
            end_scores,
            unique_id: input.unique_id(),
        };
        prediction.validate()?;
        Ok(prediction)
    }
}
