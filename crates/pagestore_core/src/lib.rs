//! Core library for pagestore: paged reads over in-memory keyed stores, with
//! deep copies so callers never alias stored entities.

pub mod config;
pub mod copy;
pub mod db;
pub mod logging;
pub mod model;
pub mod paging;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, CopyConfig, CoreConfig, LoggingConfig, PagingConfig};
pub use copy::{
    clone_json, clone_json_opt, copy_matching_fields, CopierRegistry, CopyContext, CopyError,
    CopyResult, CopyStrategy, DeepCopy, ObjectCopier,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::city::{
    City, CityDto, CityId, CityValidationError, CityWithoutPointsOfInterestDto, PointOfInterest,
    PointOfInterestDto,
};
pub use model::member::{Comment, Member, MemberComment};
pub use paging::{
    paginate, paginate_request, total_pages, Page, PageError, PageMetadata, PageRequest,
    PageResult, PageSource,
};
pub use repo::city_repo::{
    CityRepository, InMemoryCityRepository, RepoError, RepoResult, SqliteCityRepository,
    SqliteCitySource,
};
pub use service::city_service::{CityService, CityView, ListParameters};
pub use store::keyed_store::{KeyedStore, StoreError, StoreKey, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
