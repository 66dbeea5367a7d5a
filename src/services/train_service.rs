//! Train Service - Pure business logic without HTTP layer

use crate::domain::{
    CreateTrainInput, DomainError, Page, PageRequest, Train, TrainRepository, UpdateTrainInput,
};
use crate::infrastructure::locks::TrainLocks;

pub async fn create_train(
    repo: &dyn TrainRepository,
    input: CreateTrainInput,
) -> Result<Train, DomainError> {
    if repo.find_by_name(&input.train_name).await?.is_some() {
        return Err(DomainError::Conflict("Train name already exists".to_string()));
    }

    let train = repo.create(input).await?;
    tracing::info!("Created train {} ({})", train.train_name, train.train_id);
    Ok(train)
}

pub async fn get_train(repo: &dyn TrainRepository, id: &str) -> Result<Train, DomainError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound("Train".to_string()))
}

pub async fn list_trains(
    repo: &dyn TrainRepository,
    page: &PageRequest,
) -> Result<Page<Train>, DomainError> {
    tracing::debug!(
        "List trains - page={}, limit={}, search={:?}",
        page.page,
        page.limit,
        page.search
    );
    repo.find_page(page).await
}

pub async fn update_train(
    repo: &dyn TrainRepository,
    id: &str,
    input: UpdateTrainInput,
) -> Result<Train, DomainError> {
    if input.is_empty() {
        return Err(DomainError::Validation("No fields to update".to_string()));
    }

    get_train(repo, id).await?;

    if let Some(name) = &input.train_name
        && let Some(other) = repo.find_by_name(name).await?
        && other.train_id != id
    {
        return Err(DomainError::Conflict("Train name already exists".to_string()));
    }

    repo.update(id, input).await
}

/// Delete a train together with its stops, then drop its lock entry.
pub async fn delete_train(
    repo: &dyn TrainRepository,
    locks: &TrainLocks,
    id: &str,
) -> Result<(), DomainError> {
    let guard = locks.acquire(id).await;
    let removed = repo.delete_with_schedules(id).await;
    drop(guard);

    match removed {
        Ok(stops) => {
            locks.forget(id);
            tracing::info!("Deleted train {} and {} stop(s)", id, stops);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
