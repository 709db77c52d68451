//! Backend selection and connection settings, loaded from the environment.
//!
//! | Variable                  | Default                                  |
//! |---------------------------|------------------------------------------|
//! | `VECTOR_STORE`            | `pinecone` if `PINECONE_API_KEY` is set, else `qdrant` |
//! | `PINECONE_API_KEY`        | required for Pinecone                    |
//! | `PINECONE_INDEX_NAME`     | required for Pinecone                    |
//! | `PINECONE_INDEX_HOST`     | resolved through the control plane       |
//! | `PINECONE_CONTROLLER_URL` | `https://api.pinecone.io`                |
//! | `PINECONE_NAMESPACE`      | default namespace                        |
//! | `QDRANT_URL`              | `http://127.0.0.1:6334`                  |
//! | `QDRANT_API_KEY`          | none                                     |
//! | `QDRANT_COLLECTION`       | `helpdesk_tickets`                       |
//! | `RAG_EXACT_SEARCH`        | `false`                                  |
//! | `LLM_TIMEOUT_SECS`        | `30` (shared per-call timeout)           |

use std::fmt;
use std::time::Duration;

use ai_llm_service::{EnvLookup, opt_var};

use crate::errors::StoreError;

pub const DEFAULT_PINECONE_CONTROLLER: &str = "https://api.pinecone.io";
pub const DEFAULT_QDRANT_URL: &str = "http://127.0.0.1:6334";
pub const DEFAULT_COLLECTION: &str = "helpdesk_tickets";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Qdrant connection settings.
#[derive(Clone, Debug)]
pub struct QdrantConfig {
    /// gRPC endpoint, e.g. `http://localhost:6334`.
    pub url: String,
    /// Optional API key for Qdrant Cloud.
    pub api_key: Option<String>,
    pub collection: String,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    pub timeout_secs: u64,
}

/// Pinecone connection settings.
#[derive(Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    /// Data-plane host; resolved from `index_name` when `None`.
    pub index_host: Option<String>,
    pub controller_url: String,
    pub namespace: Option<String>,
    pub timeout_secs: u64,
}

impl fmt::Debug for PineconeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PineconeConfig")
            .field("api_key", &"<redacted>")
            .field("index_name", &self.index_name)
            .field("index_host", &self.index_host)
            .field("controller_url", &self.controller_url)
            .field("namespace", &self.namespace)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Which backend to connect to, with its settings.
#[derive(Clone, Debug)]
pub enum StoreConfig {
    Qdrant(QdrantConfig),
    Pinecone(PineconeConfig),
}

impl QdrantConfig {
    /// Sane defaults for a local Qdrant and the given collection.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            collection: collection.into(),
            exact_search: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.url.trim().is_empty() {
            return Err(StoreError::Config("QDRANT_URL is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("QDRANT_COLLECTION is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout must be > 0".into()));
        }
        Ok(())
    }
}

impl PineconeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.api_key.trim().is_empty() {
            return Err(StoreError::Config("PINECONE_API_KEY is empty".into()));
        }
        if self.index_name.trim().is_empty() && self.index_host.is_none() {
            return Err(StoreError::Config(
                "PINECONE_INDEX_NAME or PINECONE_INDEX_HOST is required".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout must be > 0".into()));
        }
        Ok(())
    }
}

impl StoreConfig {
    /// Loads the backend selection from the process environment.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(&|k: &str| std::env::var(k).ok())
    }

    /// Loads the backend selection from an arbitrary variable source.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, StoreError> {
        let get = |k: &str| opt_var(lookup, k);

        let timeout_secs = match get("LLM_TIMEOUT_SECS") {
            Some(v) => v.parse::<u64>().map_err(|_| {
                StoreError::Config("LLM_TIMEOUT_SECS must be a positive integer".into())
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let backend = get("VECTOR_STORE")
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_else(|| {
                if get("PINECONE_API_KEY").is_some() {
                    "pinecone".into()
                } else {
                    "qdrant".into()
                }
            });

        let cfg = match backend.as_str() {
            "qdrant" => {
                let exact_search = match get("RAG_EXACT_SEARCH") {
                    Some(v) => parse_bool("RAG_EXACT_SEARCH", &v)?,
                    None => false,
                };
                Self::Qdrant(QdrantConfig {
                    url: get("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.into()),
                    api_key: get("QDRANT_API_KEY"),
                    collection: get("QDRANT_COLLECTION")
                        .unwrap_or_else(|| DEFAULT_COLLECTION.into()),
                    exact_search,
                    timeout_secs,
                })
            }
            "pinecone" => Self::Pinecone(PineconeConfig {
                api_key: get("PINECONE_API_KEY")
                    .ok_or_else(|| StoreError::Config("PINECONE_API_KEY is not set".into()))?,
                index_name: get("PINECONE_INDEX_NAME").unwrap_or_default(),
                index_host: get("PINECONE_INDEX_HOST"),
                controller_url: get("PINECONE_CONTROLLER_URL")
                    .unwrap_or_else(|| DEFAULT_PINECONE_CONTROLLER.into()),
                namespace: get("PINECONE_NAMESPACE"),
                timeout_secs,
            }),
            other => {
                return Err(StoreError::Config(format!(
                    "unsupported VECTOR_STORE '{other}' (expected qdrant or pinecone)"
                )));
            }
        };

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        match self {
            Self::Qdrant(c) => c.validate(),
            Self::Pinecone(c) => c.validate(),
        }
    }
}

fn parse_bool(var: &str, v: &str) -> Result<bool, StoreError> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StoreError::Config(format!("{var} must be a boolean"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<StoreConfig, StoreError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StoreConfig::from_lookup(&|k: &str| env.get(k).cloned())
    }

    #[test]
    fn defaults_to_local_qdrant() {
        match load(&[]).unwrap() {
            StoreConfig::Qdrant(c) => {
                assert_eq!(c.url, DEFAULT_QDRANT_URL);
                assert_eq!(c.collection, "helpdesk_tickets");
                assert!(!c.exact_search);
                assert_eq!(c.timeout_secs, 30);
            }
            other => panic!("expected qdrant, got {other:?}"),
        }
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        match load(&[("QDRANT_URL", "   "), ("QDRANT_COLLECTION", " tickets ")]).unwrap() {
            StoreConfig::Qdrant(c) => {
                assert_eq!(c.url, DEFAULT_QDRANT_URL);
                assert_eq!(c.collection, "tickets");
            }
            other => panic!("expected qdrant, got {other:?}"),
        }
    }

    #[test]
    fn pinecone_key_selects_pinecone() {
        let cfg = load(&[
            ("PINECONE_API_KEY", "pc-secret"),
            ("PINECONE_INDEX_NAME", "helpdesk"),
        ])
        .unwrap();
        match &cfg {
            StoreConfig::Pinecone(c) => {
                assert_eq!(c.index_name, "helpdesk");
                assert_eq!(c.controller_url, DEFAULT_PINECONE_CONTROLLER);
                assert!(c.index_host.is_none());
            }
            other => panic!("expected pinecone, got {other:?}"),
        }
        assert!(!format!("{cfg:?}").contains("pc-secret"));
    }

    #[test]
    fn pinecone_without_index_is_rejected() {
        let err = load(&[("VECTOR_STORE", "pinecone"), ("PINECONE_API_KEY", "k")]).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = load(&[("VECTOR_STORE", "milvus")]).unwrap_err();
        assert!(err.to_string().contains("milvus"));
    }

    #[test]
    fn exact_search_flag_is_parsed() {
        match load(&[("RAG_EXACT_SEARCH", "true")]).unwrap() {
            StoreConfig::Qdrant(c) => assert!(c.exact_search),
            other => panic!("expected qdrant, got {other:?}"),
        }
        assert!(load(&[("RAG_EXACT_SEARCH", "maybe")]).is_err());
    }
}
