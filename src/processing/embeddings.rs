//! Sentence embedding backends behind a single capability trait

use crate::config::{Config, EmbeddingBackend};
use crate::error::{RelevanceError, Result};
use crate::processing::embedding_manager::EmbeddingModelManager;
use log::info;
use model2vec_rs::model::StaticModel;
use regex::Regex;
use siphasher::sip::SipHasher13;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Anything that can turn text into fixed-dimension vectors.
///
/// Implementations must be deterministic and must not mutate state while
/// encoding: one instance is shared by every scoring call in the process.
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    /// Vector length, when known before the first encode
    fn dimension(&self) -> Option<usize>;

    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Model2Vec static embeddings
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEmbedder {
    /// Load from a local model folder or a Hugging Face repo id
    pub fn load(repo_or_path: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", repo_or_path);

        let model = StaticModel::from_pretrained(
            repo_or_path,
            None, // token
            None, // normalize
            None, // subfolder
        )?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: repo_or_path.to_string(),
        })
    }

    /// Resolve the configured model: downloaded copy first, then the hub
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = Self::model_source(config);
        Self::load(&source.to_string_lossy())
    }

    fn model_source(config: &Config) -> PathBuf {
        let model_id = &config.models.embedding_model;

        let local_path = config.models_dir().join(model_id);
        if local_path.exists() {
            return local_path;
        }

        EmbeddingModelManager::catalog()
            .into_iter()
            .find(|(id, _)| id == model_id)
            .map(|(_, info)| PathBuf::from(info.repo_id))
            .unwrap_or_else(|| PathBuf::from(model_id))
    }
}

impl Embedder for Model2VecEmbedder {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let embeddings = self.model.encode(texts);
        if embeddings.len() != texts.len() {
            return Err(RelevanceError::Embedding(format!(
                "Model returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }
        Ok(embeddings)
    }
}

/// Fixed SipHash keys so buckets don't move between runs or Rust releases
const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

/// Feature-hashing bag-of-words embedder.
///
/// Needs no model files; identical token multisets map to identical vectors.
pub struct HashingEmbedder {
    dimension: usize,
    word_regex: Regex,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        let word_regex = Regex::new(r"\w+")
            .map_err(|e| RelevanceError::Processing(format!("Invalid word regex: {}", e)))?;
        Ok(Self {
            dimension: dimension.max(1),
            word_regex,
        })
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        (hasher.finish() % self.dimension as u64) as usize
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();
        for token in self.word_regex.find_iter(&lowered) {
            vector[self.bucket(token.as_str())] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }
}

static SHARED_EMBEDDER: OnceLock<Arc<dyn Embedder>> = OnceLock::new();

/// Process-wide embedder, built from `config` on first use and reused after.
///
/// Later calls ignore `config`.
pub fn shared_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    if let Some(embedder) = SHARED_EMBEDDER.get() {
        return Ok(Arc::clone(embedder));
    }

    let embedder = build_embedder(config)?;
    // A concurrent first call may have won the race; keep whichever landed
    Ok(Arc::clone(SHARED_EMBEDDER.get_or_init(|| embedder)))
}

pub fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    let embedder: Arc<dyn Embedder> = match config.models.backend {
        EmbeddingBackend::Model2Vec => Arc::new(Model2VecEmbedder::from_config(config)?),
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.models.hashing_dimension)?),
    };
    Ok(embedder)
}
