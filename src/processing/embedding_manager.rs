//! Embedding model management for downloading and locating Model2Vec models

use crate::error::{RelevanceError, Result};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Files a local Model2Vec folder needs before it can be loaded
const REQUIRED_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];
const OPTIONAL_FILES: [&str; 1] = ["README.md"];

/// Manager for embedding models - handles download, caching, and selection
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                RelevanceError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: Self::catalog().into_iter().collect(),
            downloaded_models: HashSet::new(),
        };

        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    /// Known Model2Vec models keyed by short id
    pub fn catalog() -> Vec<(String, EmbeddingModelInfo)> {
        vec![
            (
                "potion-base-8M".to_string(),
                EmbeddingModelInfo {
                    name: "Potion Base 8M".to_string(),
                    repo_id: "minishlab/potion-base-8M".to_string(),
                    size_mb: 33,
                    description: "High-quality Model2Vec embeddings with 8M parameters".to_string(),
                    dimensions: 256,
                },
            ),
            (
                "m2v-base".to_string(),
                EmbeddingModelInfo {
                    name: "Model2Vec Base".to_string(),
                    repo_id: "minishlab/M2V_base_output".to_string(),
                    size_mb: 90,
                    description: "Legacy Model2Vec base embeddings model".to_string(),
                    dimensions: 256,
                },
            ),
            (
                "m2v-large".to_string(),
                EmbeddingModelInfo {
                    name: "Model2Vec Large".to_string(),
                    repo_id: "minishlab/M2V_large_output".to_string(),
                    size_mb: 250,
                    description: "High-capacity Model2Vec large embeddings model".to_string(),
                    dimensions: 512,
                },
            ),
        ]
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            RelevanceError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && Self::is_valid_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_valid_model_directory(path: &Path) -> bool {
        for file in &REQUIRED_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download a catalog model from the Hugging Face Hub into the models dir
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_info = self.available_models.get(model_id).ok_or_else(|| {
            RelevanceError::NotFound(format!("Unknown embedding model: {}", model_id))
        })?;

        let model_dir = self.models_dir.join(model_id);
        if self.downloaded_models.contains(model_id) {
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );

        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| RelevanceError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model_info.repo_id.clone());

        for file in REQUIRED_FILES.iter().chain(OPTIONAL_FILES.iter()) {
            match repo.get(file).await {
                Ok(cached_path) => {
                    fs::copy(&cached_path, model_dir.join(file)).await.map_err(|e| {
                        RelevanceError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("Downloaded: {}", file);
                }
                Err(e) if OPTIONAL_FILES.contains(file) => {
                    warn!("Optional file {} not found: {}", file, e);
                }
                Err(e) => {
                    return Err(RelevanceError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded_models.insert(model_id.to_string());
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        if self.is_model_downloaded(model_id) {
            Some(self.models_dir.join(model_id))
        } else {
            None
        }
    }

    pub fn list_available_models(&self) -> Vec<(&String, &EmbeddingModelInfo)> {
        self.available_models.iter().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Resolve model ID from various formats (id, repo_id, display name)
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        if let Some((id, _)) = self.available_models.iter().find(|(_, info)| info.repo_id == input) {
            return Some(id.clone());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|(_, info)| info.name.to_lowercase() == input_lower)
            .map(|(id, _)| id.clone())
    }
}
