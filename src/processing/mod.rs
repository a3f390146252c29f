//! Text processing and relevance scoring

pub mod embedding_manager;
pub mod embeddings;
pub mod feedback;
pub mod hard_matcher;
pub mod missing;
pub mod scorer;
pub mod sections;
pub mod semantic_matcher;
pub mod text_processor;
pub mod weights;
