//! Vector indexer (§4.7, component C7): document projection, embedding and
//! Qdrant upsert, plus the similarity search behind the Document Links
//! stage engine.

pub mod candidates;
pub mod errors;
pub mod indexer;
pub mod projection;
pub mod qdrant_facade;

pub use candidates::{find_link_candidates, LinkCandidate};
pub use errors::{IndexError, IndexResult};
pub use indexer::VectorIndexer;
pub use projection::DocumentProjection;
pub use qdrant_facade::QdrantFacade;
