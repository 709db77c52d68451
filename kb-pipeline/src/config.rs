//! Runtime configuration loaded from environment variables.

use ai_llm_service::{EnvLookup, opt_var};

use crate::error::KbError;

pub const DEFAULT_TOP_K: u64 = 10;
pub const DEFAULT_MAX_TOP_K: u64 = 20;
pub const DEFAULT_FILTER_FIELD: &str = "CF_VMS";
pub const DEFAULT_TEXT_FIELD: &str = "Comments";
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;

/// Config bag for the pipeline. All fields have defaults via `from_env`.
#[derive(Clone, Debug, PartialEq)]
pub struct KbConfig {
    /// Result count used when the caller does not ask for one.
    pub default_top_k: u64,
    /// Hard upper bound on the result count sent to the store.
    pub max_top_k: u64,
    /// Metadata field the optional filter value is matched against.
    pub filter_field: String,
    /// Ordered identifier candidates; the first non-empty one wins.
    pub id_fields: Vec<String>,
    /// Free-text field concatenated into the prompt.
    pub text_field: String,
    /// Extra per-ticket fields shown above the comments (empty = none).
    pub detail_fields: Vec<String>,
    /// Character budget for the ticket section of the prompt.
    pub max_context_chars: usize,
    /// Expected embedding length; checked when set.
    pub embedding_dim: Option<usize>,
}

impl Default for KbConfig {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            max_top_k: DEFAULT_MAX_TOP_K,
            filter_field: DEFAULT_FILTER_FIELD.into(),
            id_fields: vec!["IssueKey".into(), "id".into()],
            text_field: DEFAULT_TEXT_FIELD.into(),
            detail_fields: vec!["Title".into(), "Description".into()],
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            embedding_dim: None,
        }
    }
}

impl KbConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, KbError> {
        Self::from_lookup(&|k: &str| std::env::var(k).ok())
    }

    /// Build from an arbitrary variable source.
    ///
    /// | Variable                | Default               |
    /// |-------------------------|-----------------------|
    /// | `RAG_TOP_K`             | 10                    |
    /// | `RAG_MAX_TOP_K`         | 20                    |
    /// | `RAG_FILTER_FIELD`      | `CF_VMS`              |
    /// | `TICKET_ID_FIELDS`      | `IssueKey,id`         |
    /// | `TICKET_TEXT_FIELD`     | `Comments`            |
    /// | `TICKET_DETAILS`        | `true`                |
    /// | `TICKET_DETAIL_FIELDS`  | `Title,Description`   |
    /// | `RAG_MAX_CONTEXT_CHARS` | 12000                 |
    /// | `EMBEDDING_DIM`         | unset                 |
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, KbError> {
        let get = |k: &str| opt_var(lookup, k);
        let d = Self::default();

        let with_details = match get("TICKET_DETAILS") {
            Some(v) => parse_bool("TICKET_DETAILS", &v)?,
            None => true,
        };
        let detail_fields = if with_details {
            get("TICKET_DETAIL_FIELDS")
                .map(|v| split_list(&v))
                .unwrap_or(d.detail_fields)
        } else {
            Vec::new()
        };

        let cfg = Self {
            default_top_k: parse_num(get("RAG_TOP_K"), "RAG_TOP_K", d.default_top_k)?,
            max_top_k: parse_num(get("RAG_MAX_TOP_K"), "RAG_MAX_TOP_K", d.max_top_k)?,
            filter_field: get("RAG_FILTER_FIELD").unwrap_or(d.filter_field),
            id_fields: get("TICKET_ID_FIELDS")
                .map(|v| split_list(&v))
                .unwrap_or(d.id_fields),
            text_field: get("TICKET_TEXT_FIELD").unwrap_or(d.text_field),
            detail_fields,
            max_context_chars: parse_num(
                get("RAG_MAX_CONTEXT_CHARS"),
                "RAG_MAX_CONTEXT_CHARS",
                d.max_context_chars,
            )?,
            embedding_dim: get("EMBEDDING_DIM")
                .map(|v| parse_num(Some(v), "EMBEDDING_DIM", 0usize))
                .transpose()?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), KbError> {
        if self.max_top_k == 0 {
            return Err(KbError::Config("RAG_MAX_TOP_K must be > 0".into()));
        }
        if self.default_top_k == 0 || self.default_top_k > self.max_top_k {
            return Err(KbError::Config(format!(
                "RAG_TOP_K must be within 1..={}",
                self.max_top_k
            )));
        }
        if self.id_fields.is_empty() {
            return Err(KbError::Config("TICKET_ID_FIELDS is empty".into()));
        }
        if self.filter_field.is_empty() || self.text_field.is_empty() {
            return Err(KbError::Config("metadata field names must not be empty".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(KbError::Config("EMBEDDING_DIM must be > 0".into()));
        }
        Ok(())
    }
}

fn split_list(v: &str) -> Vec<String> {
    v.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_num<T: std::str::FromStr>(v: Option<String>, var: &str, dflt: T) -> Result<T, KbError> {
    match v {
        Some(s) => s
            .parse()
            .map_err(|_| KbError::Config(format!("{var} must be a non-negative integer"))),
        None => Ok(dflt),
    }
}

fn parse_bool(var: &str, v: &str) -> Result<bool, KbError> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(KbError::Config(format!("{var} must be a boolean"))),
    }
}
