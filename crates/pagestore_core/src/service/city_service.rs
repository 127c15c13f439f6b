//! City use-case service.
//!
//! # Responsibility
//! - Answer "list cities, page N of size S" with navigation metadata.
//! - Answer "get city by id" with or without points of interest.
//!
//! # Invariants
//! - Missing page number means page 1; missing page size means the configured
//!   default; larger sizes are clamped to the configured maximum.
//! - Zero page number or size is rejected, not corrected.

use crate::config::PagingConfig;
use crate::model::city::{City, CityDto, CityId, CityWithoutPointsOfInterestDto};
use crate::paging::{Page, PageRequest};
use crate::repo::city_repo::{CityRepository, RepoResult};
use log::info;
use serde::{Deserialize, Serialize};

/// Caller-supplied list parameters, as parsed from a transport query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParameters {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

/// Result shape of a single-city lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CityView {
    Detailed(CityDto),
    Summary(CityWithoutPointsOfInterestDto),
}

/// City use cases over any [`CityRepository`].
pub struct CityService<R: CityRepository> {
    repo: R,
    paging: PagingConfig,
}

impl<R: CityRepository> CityService<R> {
    pub fn new(repo: R, paging: PagingConfig) -> Self {
        Self { repo, paging }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Resolves defaults and the size cap into a validated request.
    pub fn page_request(&self, params: &ListParameters) -> RepoResult<PageRequest> {
        let page_number = params.page_number.unwrap_or(1);
        let page_size = params
            .page_size
            .unwrap_or(self.paging.default_page_size)
            .min(self.paging.max_page_size);
        Ok(PageRequest::new(page_number, page_size)?)
    }

    /// Lists one page of cities without points of interest.
    pub fn list_cities(
        &self,
        params: &ListParameters,
    ) -> RepoResult<Page<CityWithoutPointsOfInterestDto>> {
        let request = self.page_request(params)?;
        let page = self
            .repo
            .cities_page(request)?
            .map(CityWithoutPointsOfInterestDto::from);

        info!(
            "event=list_cities module=service status=ok page={} page_size={} total_count={} items={}",
            page.current_page(),
            page.page_size(),
            page.total_count(),
            page.len()
        );
        Ok(page)
    }

    /// Gets one city as a detailed or summary view.
    pub fn get_city(
        &self,
        id: CityId,
        include_points_of_interest: bool,
    ) -> RepoResult<Option<CityView>> {
        let city = self.repo.get_city(id, include_points_of_interest)?;
        Ok(city.map(|city| {
            if include_points_of_interest {
                CityView::Detailed(CityDto::from(city))
            } else {
                CityView::Summary(CityWithoutPointsOfInterestDto::from(city))
            }
        }))
    }

    pub fn create_city(&mut self, city: &City) -> RepoResult<CityId> {
        self.repo.add_city(city)
    }

    pub fn remove_city(&mut self, id: CityId) -> RepoResult<bool> {
        self.repo.remove_city(id)
    }
}
