pub mod brickset;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod testing;

pub use brickset::{
    BricksetClient, CatalogApi, CatalogApiError, SetDecodeError, SetsPage, SetsQuery,
    DEFAULT_PAGE_SIZE,
};
pub use catalog::{SetRecord, SetStore, SqliteSetStore, StoreError, StoreStats};
pub use config::{
    load_config, load_config_from_str, validate_config, BricksetConfig, Config, ConfigError,
    DatabaseConfig, IngestConfig, SanitizedConfig,
};
pub use extract::{extract_json, json_prefix, ExtractError};
pub use ingest::{
    load_themes, ConsoleReporter, IngestEvent, IngestRunner, IngestSummary, Pacer,
    ProgressReporter, SilentReporter, ThemeError, ThemeSourceError, TokioPacer,
};
