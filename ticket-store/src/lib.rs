//! Filtered similarity search over a hosted index of helpdesk tickets.
//!
//! This crate provides:
//! - [`VectorStore`], the backend-agnostic search seam
//! - two backends: Qdrant (`qdrant-client`) and Pinecone (REST)
//! - [`MetadataFilter`] for single-field equality constraints
//!
//! Indexes are populated elsewhere; this crate only reads.

mod config;
mod errors;
mod filters;
mod pinecone;
mod qdrant_facade;
mod record;
mod store;

pub use config::{PineconeConfig, QdrantConfig, StoreConfig};
pub use errors::StoreError;
pub use filters::{to_pinecone_filter, to_qdrant_filter};
pub use pinecone::PineconeStore;
pub use qdrant_facade::QdrantFacade;
pub use record::{MetadataFilter, StoreHealth, TicketMatch};
pub use store::{VectorStore, connect};
