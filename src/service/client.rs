use super::{extract_json, reaction_id, ReactionCache, ServiceError};
use crate::model::{ReactionDesc, ReactionRecord};
use crate::options::ColorOptions;

/// Transport to a reaction-generating model.
///
/// Implementations receive the fully composed prompt (see
/// [`compose_prompt`](super::compose_prompt)) and return the model's raw
/// reply text.
pub trait ReactionService {
    /// Send `prompt` and return the raw reply.
    fn query(&self, prompt: &str) -> Result<String, ServiceError>;
}

/// Service that never answers. Lookups through a client built on it are
/// served from the cache or fail with [`ServiceError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineService;

impl ReactionService for OfflineService {
    fn query(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Query("no reaction service configured".to_owned()))
    }
}

/// Result of [`ReactionClient::fetch`].
#[derive(Debug, Clone)]
pub struct FetchedReaction {
    /// Cache key derived from the prompt.
    pub reaction_id: String,
    /// Record as stored in the cache, tagged with id and prompt.
    pub desc: ReactionDesc,
    /// Validated record.
    pub record: ReactionRecord,
    /// Whether the record came from the cache.
    pub cached: bool,
}

/// Cache-first reaction lookup.
#[derive(Debug)]
pub struct ReactionClient<S, C> {
    service: S,
    cache: C,
    colors: ColorOptions,
    offline: bool,
}

impl<S: ReactionService, C: ReactionCache> ReactionClient<S, C> {
    /// Client over `service` and `cache`, validating records with
    /// `colors`.
    pub fn new(service: S, cache: C, colors: ColorOptions) -> Self {
        Self {
            service,
            cache,
            colors,
            offline: false,
        }
    }

    /// Never query the service; a cache miss becomes
    /// [`ServiceError::Unavailable`].
    #[must_use]
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Underlying cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Look up the reaction for `prompt`.
    ///
    /// A cached record is returned without querying the service. On a miss
    /// the service is queried once; the reply is stripped of code fences,
    /// parsed and validated, and only a valid record is written to the
    /// cache.
    pub fn fetch(&self, prompt: &str) -> Result<FetchedReaction, ServiceError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ServiceError::EmptyPrompt);
        }
        let id = reaction_id(prompt);

        if let Some(desc) = self.cache.get(&id)? {
            log::info!("reaction {id} served from cache");
            let record = ReactionRecord::from_desc(&desc, &self.colors)
                .map_err(ServiceError::InvalidResponse)?;
            return Ok(FetchedReaction {
                reaction_id: id,
                desc,
                record,
                cached: true,
            });
        }

        if self.offline {
            return Err(ServiceError::Unavailable { reaction_id: id });
        }

        log::info!("querying reaction service for {id}");
        let reply = self.service.query(&super::compose_prompt(prompt))?;
        let json = extract_json(&reply);
        let mut desc: ReactionDesc = serde_json::from_str(json)
            .map_err(|e| ServiceError::InvalidResponse(e.into()))?;
        let record = ReactionRecord::from_desc(&desc, &self.colors)
            .map_err(ServiceError::InvalidResponse)?;

        desc.reaction_id = Some(id.clone());
        desc.prompt = Some(prompt.to_owned());
        self.cache.put(&id, &desc)?;

        Ok(FetchedReaction {
            reaction_id: id,
            desc,
            record,
            cached: false,
        })
    }
}
