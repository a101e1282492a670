//! Best-effort resolution of a user-typed name to a rules entry.
//!
//! Resolution tries, in order:
//! 1. the exact slug under the kind's primary category,
//! 2. a scan of that category's index scored by token overlap,
//! 3. exact slugs under secondary categories (magic items for equipment).
//!
//! Every step swallows its errors. A name that cannot be resolved simply
//! yields `None` and the caller shows a placeholder.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::cache::LookupCache;
use crate::api::client::{RulesClient, RulesSource};
use crate::api::suggest::rank_suggestions;
use crate::api::{ApiReference, RulesEntry};
use crate::character::armor::split_enchantment;
use crate::character::record::ListKind;
use crate::core::config::Config;
use crate::utils::url::slugify;

/// Lowest index-scan score accepted as a match.
pub const MATCH_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Item,
    Spell,
    Feat,
}

impl LookupKind {
    pub fn primary_category(&self) -> &'static str {
        match self {
            LookupKind::Item => "equipment",
            LookupKind::Spell => "spells",
            LookupKind::Feat => "feats",
        }
    }

    /// Categories only tried by exact slug after the index scan fails.
    pub fn fallback_categories(&self) -> &'static [&'static str] {
        match self {
            LookupKind::Item => &["magic-items"],
            LookupKind::Spell => &[],
            LookupKind::Feat => &["features", "traits"],
        }
    }

    pub fn for_list(kind: ListKind) -> Self {
        match kind {
            ListKind::Feats => LookupKind::Feat,
            ListKind::Spells => LookupKind::Spell,
            ListKind::Inventory => LookupKind::Item,
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LookupKind::Item => "item",
            LookupKind::Spell => "spell",
            LookupKind::Feat => "feat",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for LookupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "item" | "items" | "equipment" => Ok(LookupKind::Item),
            "spell" | "spells" => Ok(LookupKind::Spell),
            "feat" | "feats" | "feature" | "features" => Ok(LookupKind::Feat),
            other => Err(format!("unknown lookup kind '{other}' (use item, spell or feat)")),
        }
    }
}

/// Lowercase alphanumeric tokens of a name.
pub fn tokenize(name: &str) -> HashSet<String> {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// Similarity between a query and a candidate name in `[0, 1]`.
///
/// Identical slugs score 1.0. Otherwise the score is the Jaccard overlap of
/// the two token sets, plus a small bonus when the candidate starts with the
/// query, kept below an exact match.
pub fn match_score(query: &str, candidate: &str) -> f32 {
    let query_slug = slugify(query);
    let candidate_slug = slugify(candidate);
    if query_slug.is_empty() || candidate_slug.is_empty() {
        return 0.0;
    }
    if query_slug == candidate_slug {
        return 1.0;
    }

    let query_tokens = tokenize(query);
    let candidate_tokens = tokenize(candidate);
    let shared = query_tokens.intersection(&candidate_tokens).count();
    let union = query_tokens.union(&candidate_tokens).count();
    let mut score = if union == 0 {
        0.0
    } else {
        shared as f32 / union as f32
    };

    if candidate_slug.starts_with(&query_slug) {
        score += 0.25;
    }
    score.min(0.99)
}

/// Highest-scoring index entry at or above [`MATCH_THRESHOLD`].
pub fn best_match<'a>(query: &str, index: &'a [ApiReference]) -> Option<(&'a ApiReference, f32)> {
    index
        .iter()
        .map(|reference| (reference, match_score(query, &reference.name)))
        .filter(|(_, score)| *score >= MATCH_THRESHOLD)
        .fold(None, |best, candidate| match best {
            Some((_, best_score)) if best_score >= candidate.1 => best,
            _ => Some(candidate),
        })
}

/// Lookup front door shared by the editor and the CLI.
pub struct RulesService {
    source: Option<Arc<dyn RulesSource>>,
    cache: LookupCache,
}

impl RulesService {
    pub fn new(source: Arc<dyn RulesSource>) -> Self {
        Self {
            source: Some(source),
            cache: LookupCache::new(),
        }
    }

    /// A service that never touches the network; every lookup misses.
    pub fn offline() -> Self {
        Self {
            source: None,
            cache: LookupCache::new(),
        }
    }

    /// Build the service the configuration asks for. A client that cannot
    /// be constructed degrades to offline mode.
    pub fn from_config(config: &Config, offline: bool) -> Self {
        if offline || !config.enrich_enabled() {
            return Self::offline();
        }
        match RulesClient::new(config.api_base_url(), config.request_timeout()) {
            Ok(client) => Self::new(Arc::new(client)),
            Err(err) => {
                warn!(error = %err, "rules client unavailable; lookups disabled");
                Self::offline()
            }
        }
    }

    pub fn is_online(&self) -> bool {
        self.source.is_some()
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    pub async fn resolve(&self, name: &str, kind: LookupKind) -> Option<RulesEntry> {
        let source = self.source.as_ref()?;
        let (base_name, _) = split_enchantment(name);
        let slug = slugify(base_name);
        if slug.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.entry(kind, &slug) {
            return cached;
        }

        let mut had_error = false;
        let resolved = self
            .resolve_uncached(source.as_ref(), base_name, &slug, kind, &mut had_error)
            .await;

        if resolved.is_some() || !had_error {
            self.cache.store_entry(kind, &slug, resolved.clone());
        }
        resolved
    }

    async fn resolve_uncached(
        &self,
        source: &dyn RulesSource,
        name: &str,
        slug: &str,
        kind: LookupKind,
        had_error: &mut bool,
    ) -> Option<RulesEntry> {
        let primary = kind.primary_category();

        match source.resource(primary, slug).await {
            Ok(Some(resource)) => {
                debug!(name, category = primary, "exact rules match");
                return Some(RulesEntry::from_resource(primary, resource));
            }
            Ok(None) => {}
            Err(err) => {
                debug!(name, error = %err, "exact rules lookup failed");
                *had_error = true;
            }
        }

        if let Some(index) = self.index(primary).await {
            if let Some((reference, score)) = best_match(name, &index) {
                debug!(name, candidate = %reference.name, score, "index scan match");
                match source.referenced(primary, reference).await {
                    Ok(Some(resource)) => {
                        return Some(RulesEntry::from_resource(primary, resource));
                    }
                    Ok(None) => {}
                    Err(err) => {
                        debug!(name, error = %err, "index match fetch failed");
                        *had_error = true;
                    }
                }
            }
        } else {
            *had_error = true;
        }

        for category in kind.fallback_categories() {
            match source.resource(category, slug).await {
                Ok(Some(resource)) => {
                    debug!(name, category, "fallback rules match");
                    return Some(RulesEntry::from_resource(category, resource));
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(name, category, error = %err, "fallback rules lookup failed");
                    *had_error = true;
                }
            }
        }

        None
    }

    /// Cached name index for a category; `None` if it cannot be fetched.
    pub async fn index(&self, category: &str) -> Option<Arc<Vec<ApiReference>>> {
        if let Some(index) = self.cache.index(category) {
            return Some(index);
        }
        let source = self.source.as_ref()?;
        match source.index(category).await {
            Ok(index) => Some(self.cache.store_index(category, index)),
            Err(err) => {
                debug!(category, error = %err, "rules index fetch failed");
                None
            }
        }
    }

    /// Autocomplete candidates for a partially typed name.
    pub async fn suggest(&self, prefix: &str, kind: LookupKind, limit: usize) -> Vec<String> {
        if prefix.trim().is_empty() {
            return Vec::new();
        }
        match self.index(kind.primary_category()).await {
            Some(index) => rank_suggestions(&index, prefix, limit),
            None => Vec::new(),
        }
    }
}
