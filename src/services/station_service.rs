//! Station Service - Pure business logic without HTTP layer

use crate::domain::{
    CreateStationInput, DomainError, Page, PageRequest, Station, StationRepository,
    UpdateStationInput,
};

const LOCATION_TAKEN: &str = "Station location already exists";
const NAME_TAKEN: &str = "Station name already exists";

pub async fn create_station(
    repo: &dyn StationRepository,
    input: CreateStationInput,
) -> Result<Station, DomainError> {
    if repo.find_by_location(&input.station_location).await?.is_some() {
        return Err(DomainError::Conflict(LOCATION_TAKEN.to_string()));
    }
    if repo.find_by_name(&input.station_name).await?.is_some() {
        return Err(DomainError::Conflict(NAME_TAKEN.to_string()));
    }

    let station = repo.create(input).await?;
    tracing::info!("Created station {} ({})", station.station_name, station.station_id);
    Ok(station)
}

pub async fn get_station(repo: &dyn StationRepository, id: &str) -> Result<Station, DomainError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound("Station".to_string()))
}

pub async fn list_stations(
    repo: &dyn StationRepository,
    page: &PageRequest,
) -> Result<Page<Station>, DomainError> {
    repo.find_page(page).await
}

/// Every matching station, unpaginated
pub async fn list_all_stations(
    repo: &dyn StationRepository,
    search: &str,
) -> Result<Vec<Station>, DomainError> {
    repo.find_matching(search.trim()).await
}

pub async fn update_station(
    repo: &dyn StationRepository,
    id: &str,
    input: UpdateStationInput,
) -> Result<Station, DomainError> {
    if input.is_empty() {
        return Err(DomainError::Validation("No fields to update".to_string()));
    }

    get_station(repo, id).await?;

    if let Some(location) = &input.station_location
        && let Some(other) = repo.find_by_location(location).await?
        && other.station_id != id
    {
        return Err(DomainError::Conflict(LOCATION_TAKEN.to_string()));
    }
    if let Some(name) = &input.station_name
        && let Some(other) = repo.find_by_name(name).await?
        && other.station_id != id
    {
        return Err(DomainError::Conflict(NAME_TAKEN.to_string()));
    }

    repo.update(id, input).await
}

/// Delete a station and every stop that references it.
pub async fn delete_station(repo: &dyn StationRepository, id: &str) -> Result<(), DomainError> {
    let stops = repo.delete_with_schedules(id).await?;
    tracing::info!("Deleted station {} and {} stop(s)", id, stops);
    Ok(())
}
