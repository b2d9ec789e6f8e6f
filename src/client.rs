//! Top-level entry points
//!
//! [`OtakuClient`] ties the fetch client, page cache and enricher together
//! behind one value built from [`Config`]. Every entry point is a single
//! request followed by extraction, except the ongoing listing, which walks
//! its pages lazily.

use crate::config::Config;
use crate::enrich::{EnrichOptions, Enricher, EnrichmentBatch, EnrichmentKind};
use crate::extract::catalog::{self, DaySchedule};
use crate::extract::{anime, batch, episode, listing, parse_document, search};
use crate::fetch::{Fetcher, RequestOptions};
use crate::pagination::{PageCache, PageWalker};
use crate::record::Record;
use crate::Result;
use serde::Serialize;
use serde_json::Value;
use url::Url;

const ONGOING_PATH: &str = "ongoing-anime/";
const SCHEDULES_PATH: &str = "jadwal-rilis/";
const ANIME_LIST_PATH: &str = "anime-list/";

/// Which result type a search asks the site for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Anime,
    Episode,
    Batch,
    All,
}

impl SearchKind {
    /// Value of the `post_type` query parameter; `All` sends none
    pub fn post_type(&self) -> Option<&'static str> {
        match self {
            Self::Anime => Some("anime"),
            Self::Episode => Some("episode"),
            Self::Batch => Some("batch"),
            Self::All => None,
        }
    }
}

/// Which search results to enrich from their detail pages
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    pub anime_details: bool,
    pub episode_details: bool,
    pub batch_details: bool,
    pub enrich: EnrichOptions,
}

/// Options for single detail pages
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailOptions {
    /// Enrich the page's episode list from each episode's own page
    pub episode_details: bool,
    pub enrich: EnrichOptions,
}

/// Results of one search, split by result type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub anime: Vec<Record>,
    pub episodes: Vec<Record>,
    pub batch: Vec<Record>,
}

/// Client for the site's public pages
#[derive(Debug, Clone)]
pub struct OtakuClient {
    config: Config,
    base_url: Url,
    fetcher: Fetcher,
    enricher: Enricher,
    page_cache: Option<PageCache>,
}

impl OtakuClient {
    /// Creates a client from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(OtakuClient)` - Ready client with its own connection pool
    /// * `Err(OtakuError)` - The base URL or HTTP client settings are invalid
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a client around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Result<Self> {
        let base_url = Url::parse(&config.client.base_url)?;
        let page_cache = config.pagination.use_cache.then(PageCache::new);
        Ok(Self {
            enricher: Enricher::new(fetcher.clone()),
            config,
            base_url,
            fetcher,
            page_cache,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn enricher(&self) -> &Enricher {
        &self.enricher
    }

    /// Cache shared by every ongoing-listing walker of this client
    pub fn page_cache(&self) -> Option<&PageCache> {
        self.page_cache.as_ref()
    }

    /// Enrichment options taken from the `[enrichment]` config section
    pub fn enrich_options(&self) -> EnrichOptions {
        EnrichOptions::from_config(&self.config.enrichment)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Searches the site and optionally enriches the results
    ///
    /// All requested enrichment runs as one concurrent call.
    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        options: &SearchOptions,
    ) -> Result<SearchResults> {
        let mut params = vec![("s", query)];
        if let Some(post_type) = kind.post_type() {
            params.push(("post_type", post_type));
        }

        let body = self
            .fetcher
            .fetch_with(self.base_url.as_str(), &RequestOptions::with_query(params))
            .await?;
        let mut results = {
            let doc = parse_document(&body);
            SearchResults {
                anime: search::anime_results(&doc),
                episodes: search::episode_results(&doc),
                batch: search::batch_results(&doc),
            }
        };
        tracing::info!(
            "Search {:?} found {} anime, {} episodes, {} batch",
            query,
            results.anime.len(),
            results.episodes.len(),
            results.batch.len()
        );

        let wanted = [
            (options.anime_details, EnrichmentKind::Anime),
            (options.episode_details, EnrichmentKind::Episode),
            (options.batch_details, EnrichmentKind::Batch),
        ];
        if !wanted.iter().any(|(on, _)| *on) {
            return Ok(results);
        }

        let batches: Vec<EnrichmentBatch> = wanted
            .into_iter()
            .filter(|(on, _)| *on)
            .map(|(_, kind)| {
                let records = match kind {
                    EnrichmentKind::Anime => std::mem::take(&mut results.anime),
                    EnrichmentKind::Episode => std::mem::take(&mut results.episodes),
                    EnrichmentKind::Batch => std::mem::take(&mut results.batch),
                };
                EnrichmentBatch::new(kind, records)
            })
            .collect();

        let report = self.enricher.enrich(batches, &options.enrich).await?;
        for enriched in report.batches {
            match enriched.kind {
                EnrichmentKind::Anime => results.anime = enriched.records,
                EnrichmentKind::Episode => results.episodes = enriched.records,
                EnrichmentKind::Batch => results.batch = enriched.records,
            }
        }
        Ok(results)
    }

    /// Walker over the ongoing-anime listing, seeded at its first page
    pub async fn ongoing(&self) -> Result<PageWalker> {
        PageWalker::open(
            self.fetcher.clone(),
            self.endpoint(ONGOING_PATH)?,
            listing::ongoing_releases,
            self.page_cache.clone(),
        )
        .await
    }

    /// Every ongoing release across all listing pages
    pub async fn ongoing_all(&self) -> Result<Vec<Record>> {
        let mut walker = self.ongoing().await?;
        walker.collect_all().await
    }

    /// Weekly release schedule
    pub async fn schedules(&self) -> Result<Vec<DaySchedule>> {
        let body = self.fetch(self.endpoint(SCHEDULES_PATH)?.as_str()).await?;
        Ok(catalog::schedules(&parse_document(&body)))
    }

    /// The site's full alphabetical anime index
    pub async fn anime_list(&self) -> Result<Vec<Record>> {
        let body = self.fetch(self.endpoint(ANIME_LIST_PATH)?.as_str()).await?;
        Ok(catalog::anime_list(&parse_document(&body)))
    }

    /// One anime page
    pub async fn anime(&self, url: &str, options: &DetailOptions) -> Result<Record> {
        let body = self.fetch(url).await?;
        let record = anime::page(&parse_document(&body));
        self.with_episode_details(record, options).await
    }

    /// One episode page
    pub async fn episode(&self, url: &str, options: &DetailOptions) -> Result<Record> {
        let body = self.fetch(url).await?;
        let record = episode::page(&parse_document(&body));
        self.with_episode_details(record, options).await
    }

    /// One batch download page
    pub async fn batch(&self, url: &str) -> Result<Record> {
        let body = self.fetch(url).await?;
        Ok(batch::page(&parse_document(&body)))
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        Ok(self.fetcher.fetch_page(url).await?)
    }

    /// Enriches the record's `episodes` list in place when asked to
    async fn with_episode_details(
        &self,
        mut record: Record,
        options: &DetailOptions,
    ) -> Result<Record> {
        if !options.episode_details {
            return Ok(record);
        }

        let episodes: Vec<Record> = match record.get("episodes") {
            Some(Value::Array(items)) => items.iter().cloned().map(Record::from_value).collect(),
            _ => return Ok(record),
        };

        let episodes = self
            .enricher
            .enrich_records(episodes, EnrichmentKind::Episode, &options.enrich)
            .await?;
        record.insert(
            "episodes",
            Value::Array(episodes.into_iter().map(Record::into_value).collect()),
        );
        Ok(record)
    }
}
