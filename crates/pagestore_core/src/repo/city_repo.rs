//! City repository contracts, in-memory and SQLite implementations.

use crate::copy::{CopyError, ObjectCopier};
use crate::db::{ensure_current_schema, DbError};
use crate::model::city::{City, CityId, CityValidationError, PointOfInterest};
use crate::paging::{paginate_request, Page, PageError, PageRequest, PageSource};
use crate::store::keyed_store::{KeyedStore, StoreError};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CITY_SELECT_SQL: &str = "SELECT id, name, description FROM cities";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error covering validation, storage, paging and copy failures.
#[derive(Debug)]
pub enum RepoError {
    Validation(CityValidationError),
    Store(StoreError),
    Paging(PageError),
    Copy(CopyError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Paging(err) => write!(f, "{err}"),
            Self::Copy(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted city data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Paging(err) => Some(err),
            Self::Copy(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<CityValidationError> for RepoError {
    fn from(value: CityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<PageError> for RepoError {
    fn from(value: PageError) -> Self {
        Self::Paging(value)
    }
}

impl From<CopyError> for RepoError {
    fn from(value: CopyError) -> Self {
        Self::Copy(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for city resources.
pub trait CityRepository {
    /// Stores a new city. Fails with `DuplicateKey` if the id is taken.
    fn add_city(&mut self, city: &City) -> RepoResult<CityId>;
    /// Loads one city; points of interest only when asked for.
    fn get_city(&self, id: CityId, include_points_of_interest: bool) -> RepoResult<Option<City>>;
    /// Removes one city, returning whether it existed.
    fn remove_city(&mut self, id: CityId) -> RepoResult<bool>;
    fn city_count(&self) -> RepoResult<u64>;
    /// Returns one page of cities ordered by id, without points of interest.
    fn cities_page(&self, request: PageRequest) -> RepoResult<Page<City>>;
}

/// City repository held entirely in memory.
///
/// Single reads and list pages both hand out copies produced by the
/// configured [`ObjectCopier`], so callers can never reach the stored values.
#[derive(Debug)]
pub struct InMemoryCityRepository {
    cities: KeyedStore<City>,
    copier: ObjectCopier,
}

impl InMemoryCityRepository {
    pub const STORE_NAME: &'static str = "cities";

    pub fn new(copier: ObjectCopier) -> RepoResult<Self> {
        Ok(Self {
            cities: KeyedStore::new(Self::STORE_NAME)?,
            copier,
        })
    }

    pub fn store(&self) -> &KeyedStore<City> {
        &self.cities
    }
}

impl CityRepository for InMemoryCityRepository {
    fn add_city(&mut self, city: &City) -> RepoResult<CityId> {
        city.validate()?;
        if self.cities.contains_key(city.id) {
            return Err(StoreError::DuplicateKey(city.id).into());
        }

        let stored = self.copier.snapshot(city)?;
        self.cities.add(city.id, stored)?;
        Ok(city.id)
    }

    fn get_city(&self, id: CityId, include_points_of_interest: bool) -> RepoResult<Option<City>> {
        let Some(city) = self.cities.get(id) else {
            return Ok(None);
        };

        let copy = self.copier.snapshot(city)?;
        if include_points_of_interest {
            Ok(Some(copy))
        } else {
            Ok(Some(copy.into_summary()))
        }
    }

    fn remove_city(&mut self, id: CityId) -> RepoResult<bool> {
        Ok(self.cities.remove(id))
    }

    fn city_count(&self) -> RepoResult<u64> {
        Ok(self.cities.count() as u64)
    }

    fn cities_page(&self, request: PageRequest) -> RepoResult<Page<City>> {
        let page = paginate_request(&self.cities, request)?;
        Ok(page.try_map(|city| self.copier.snapshot(&city.into_summary()))?)
    }
}

/// City repository over a migrated SQLite connection.
pub struct SqliteCityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCityRepository<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    ///
    /// # Errors
    /// - `Db(OutdatedSchema)` when the connection schema is older than this
    ///   build.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_current_schema(conn)?;
        Ok(Self { conn })
    }

    /// Page source view over the `cities` table.
    pub fn source(&self) -> SqliteCitySource<'conn> {
        SqliteCitySource { conn: self.conn }
    }

    fn load_points_of_interest(&self, city_id: CityId) -> RepoResult<Vec<PointOfInterest>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description
             FROM points_of_interest
             WHERE city_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([city_id])?;
        let mut points = Vec::new();
        while let Some(row) = rows.next()? {
            points.push(PointOfInterest {
                id: row.get("id")?,
                name: row.get("name")?,
                description: row.get("description")?,
            });
        }
        Ok(points)
    }
}

impl CityRepository for SqliteCityRepository<'_> {
    fn add_city(&mut self, city: &City) -> RepoResult<CityId> {
        city.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM cities WHERE id = ?1);",
            [city.id],
            |row| row.get(0),
        )?;
        if exists {
            return Err(StoreError::DuplicateKey(city.id).into());
        }

        tx.execute(
            "INSERT INTO cities (id, name, description) VALUES (?1, ?2, ?3);",
            params![city.id, city.name.as_str(), city.description.as_deref()],
        )?;
        for point in &city.points_of_interest {
            tx.execute(
                "INSERT INTO points_of_interest (city_id, id, name, description)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    city.id,
                    point.id,
                    point.name.as_str(),
                    point.description.as_deref()
                ],
            )?;
        }
        tx.commit()?;

        debug!(
            "event=city_add module=repo status=ok backend=sqlite city_id={} points={}",
            city.id,
            city.points_of_interest.len()
        );
        Ok(city.id)
    }

    fn get_city(&self, id: CityId, include_points_of_interest: bool) -> RepoResult<Option<City>> {
        let city = self
            .conn
            .query_row(
                &format!("{CITY_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_city_row,
            )
            .optional()?;

        match city {
            Some(mut city) if include_points_of_interest => {
                city.points_of_interest = self.load_points_of_interest(id)?;
                Ok(Some(city))
            }
            other => Ok(other),
        }
    }

    fn remove_city(&mut self, id: CityId) -> RepoResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM points_of_interest WHERE city_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM cities WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(changed > 0)
    }

    fn city_count(&self) -> RepoResult<u64> {
        self.source().total_count()
    }

    fn cities_page(&self, request: PageRequest) -> RepoResult<Page<City>> {
        paginate_request(&self.source(), request)
    }
}

/// Countable, sliceable query over the `cities` table, ordered by id.
///
/// Only the requested range is loaded.
#[derive(Clone, Copy)]
pub struct SqliteCitySource<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCitySource<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PageSource for SqliteCitySource<'_> {
    type Item = City;
    type Error = RepoError;

    fn total_count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cities;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative city count `{count}`")))
    }

    fn fetch_range(&self, offset: u64, limit: u64) -> RepoResult<Vec<City>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CITY_SELECT_SQL} ORDER BY id ASC LIMIT ?1 OFFSET ?2;"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let mut rows = stmt.query(params![limit, offset])?;
        let mut cities = Vec::new();
        while let Some(row) = rows.next()? {
            cities.push(parse_city_row(row)?);
        }
        Ok(cities)
    }
}

fn parse_city_row(row: &Row<'_>) -> rusqlite::Result<City> {
    Ok(City {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        points_of_interest: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::{CityRepository, InMemoryCityRepository, RepoError};
    use crate::config::CopyConfig;
    use crate::copy::{CopyError, CopyStrategy, ObjectCopier};
    use crate::model::city::City;
    use crate::paging::PageRequest;

    #[test]
    fn memory_pages_are_copied_through_the_configured_copier() {
        let mut repo = InMemoryCityRepository::new(ObjectCopier::default()).unwrap();
        repo.add_city(&City::new(1, "Paris")).unwrap();

        repo.copier = ObjectCopier::new(&CopyConfig {
            strategy: CopyStrategy::Structural,
            max_depth: 1,
        });
        let err = repo
            .cities_page(PageRequest::new(1, 10).unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Copy(CopyError::RecursionLimitExceeded { limit: 1 })
        ));
    }
}
