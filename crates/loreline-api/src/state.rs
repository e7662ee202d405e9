//! Application state wiring all services together.
//!
//! `Storage` opens the data directory, config and database; CLI commands
//! that only touch storage stop there. `AppState` adds the generation
//! provider and pins the core services to the concrete infra types.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use loreline_core::auth::resolver::CredentialResolver;
use loreline_core::campaign::service::CampaignService;
use loreline_core::chat::context::ContextAssembler;
use loreline_core::chat::lock::CampaignLocks;
use loreline_core::chat::orchestrator::{ChatOrchestrator, GenerationSettings};
use loreline_core::chat::pruner::HistoryPruner;
use loreline_core::llm::box_provider::BoxLlmProvider;
use loreline_infra::config::{load_global_config, resolve_data_dir, resolve_default_prompt};
use loreline_infra::crypto::hash::Sha256CredentialHasher;
use loreline_infra::llm::create_provider;
use loreline_infra::sqlite::campaign::SqliteCampaignRepository;
use loreline_infra::sqlite::credential::SqliteCredentialRepository;
use loreline_infra::sqlite::pool::{DatabasePool, database_url};
use loreline_infra::sqlite::turn::SqliteTurnRepository;
use loreline_types::config::GlobalConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteCampaignService = CampaignService<SqliteCampaignRepository>;

pub type ConcreteChatOrchestrator = ChatOrchestrator<SqliteCampaignRepository, SqliteTurnRepository>;

pub type ConcreteHistoryPruner = HistoryPruner<SqliteCampaignRepository, SqliteTurnRepository>;

pub type ConcreteResolver = CredentialResolver<SqliteCredentialRepository, Sha256CredentialHasher>;

/// Data directory, parsed config and database pool.
pub struct Storage {
    pub data_dir: PathBuf,
    pub config: GlobalConfig,
    pub db_pool: DatabasePool,
}

impl Storage {
    /// Open storage in the default data directory.
    pub async fn open() -> anyhow::Result<Self> {
        Self::open_at(resolve_data_dir()).await
    }

    /// Open storage rooted at `data_dir`, creating it if needed.
    pub async fn open_at(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir))
            .await
            .context("failed to open database")?;

        Ok(Self {
            data_dir,
            config,
            db_pool,
        })
    }

    pub fn credentials(&self) -> SqliteCredentialRepository {
        SqliteCredentialRepository::new(self.db_pool.clone())
    }

    pub fn campaigns(&self) -> SqliteCampaignRepository {
        SqliteCampaignRepository::new(self.db_pool.clone())
    }

    pub fn turns(&self) -> SqliteTurnRepository {
        SqliteTurnRepository::new(self.db_pool.clone())
    }
}

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub campaigns: Arc<ConcreteCampaignService>,
    pub chat: Arc<ConcreteChatOrchestrator>,
    pub pruner: Arc<ConcreteHistoryPruner>,
    pub resolver: Arc<ConcreteResolver>,
}

impl AppState {
    /// Build state with the provider described by the config.
    pub async fn init(storage: Storage) -> anyhow::Result<Self> {
        let provider = create_provider(&storage.config.generation).with_context(|| {
            format!(
                "no generation API key: set the {} environment variable",
                storage.config.generation.api_key_env
            )
        })?;
        Ok(Self::new(storage, provider).await)
    }

    /// Wire every service around an explicit provider.
    pub async fn new(storage: Storage, provider: BoxLlmProvider) -> Self {
        let Storage {
            data_dir,
            config,
            db_pool,
        } = storage;

        let default_prompt = resolve_default_prompt(&config.campaign, &data_dir).await;
        let locks = CampaignLocks::new();
        let assembler = ContextAssembler::from_config(&config.campaign);
        let settings = GenerationSettings {
            model: config.generation.model.clone(),
            max_tokens: config.generation.max_tokens,
            temperature: config.generation.temperature,
        };

        let campaigns = CampaignService::new(
            SqliteCampaignRepository::new(db_pool.clone()),
            locks.clone(),
            default_prompt,
        );
        let chat = ChatOrchestrator::new(
            SqliteCampaignRepository::new(db_pool.clone()),
            SqliteTurnRepository::new(db_pool.clone()),
            provider,
            locks.clone(),
            assembler.clone(),
            settings,
        );
        let pruner = HistoryPruner::new(
            SqliteCampaignRepository::new(db_pool.clone()),
            SqliteTurnRepository::new(db_pool.clone()),
            locks,
            assembler,
        );
        let resolver = CredentialResolver::new(
            SqliteCredentialRepository::new(db_pool),
            Sha256CredentialHasher::new(),
        );

        Self {
            campaigns: Arc::new(campaigns),
            chat: Arc::new(chat),
            pruner: Arc::new(pruner),
            resolver: Arc::new(resolver),
        }
    }
}
