//! Peering record model
//!
//! Defines the nested peering dataset produced by the community-based peering
//! collector, and the two closed enumerations used throughout Peerscope:
//!
//! ```text
//! PeeringDataset
//!   └─ entity id ──► EntityRecord        { peers }
//!        └─ peer id ──► PeerRecord       { location_peerings }
//!             └─ Region ──► RegionRecord { peerings_in_loc }
//!                  └─ Role ──► RoleRecord { peerings_by_ver }
//!                       └─ address family ──► opaque leaf (JSON)
//! ```
//!
//! Decoding is strict about shapes and tags (unknown roles or regions are
//! rejected) but lenient about absent levels, which simply mean "empty".

pub mod dataset;
pub mod tags;

pub use dataset::{
    EntityId, EntityRecord, PeerRecord, PeeringDataset, RegionRecord, RoleRecord,
    DEFAULT_WRAPPER_KEY,
};
pub use tags::{Region, Role};

use thiserror::Error;

/// Errors raised while decoding a peering document.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The document has no top-level key wrapping the dataset.
    #[error("malformed dataset: top-level key `{key}` not found")]
    MissingWrapper { key: String },

    #[error("malformed dataset at `{path}`: {message}")]
    MalformedDataset { path: String, message: String },

    #[error("unknown relationship role `{name}` at `{path}`")]
    UnknownRole { path: String, name: String },

    #[error("unknown region `{name}` at `{path}`")]
    UnknownRegion { path: String, name: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// True for every error that describes a badly shaped document (as opposed
    /// to an unknown tag or a JSON syntax error).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ModelError::MissingWrapper { .. } | ModelError::MalformedDataset { .. }
        )
    }
}
