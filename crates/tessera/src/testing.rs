//! Shared User lifecycle scenario
//!
//! Drives a `UserService` through a fixed sequence of use cases and records
//! what every step observed. Running it over two repositories and comparing
//! the transcripts checks that they are interchangeable behind the port.
//!
//! Emails carry a caller-chosen tag so the scenario can run against a shared
//! database next to other data. Listings only record this run's Users.

use crate::application::{CreateUser, UpdateUser, UserService, UserView};
use crate::domain::{DomainError, PageRequest, MAX_PAGE_LIMIT};
use crate::ports::UserRepository;

/// A view with the store-assigned parts (id, timestamps) removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    pub name: String,
    pub email: String,
    pub is_active: bool,
}

impl From<&UserView> for Observed {
    fn from(view: &UserView) -> Self {
        Self {
            name: view.name.clone(),
            email: view.email.clone(),
            is_active: view.is_active,
        }
    }
}

/// Outcome of one scenario step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Ok(Observed),
    Listed(Vec<Observed>),
    Deleted,
    Err(&'static str),
}

pub fn error_kind(err: &DomainError) -> &'static str {
    match err {
        DomainError::NotFound { .. } => "not_found",
        DomainError::Validation(_) => "validation",
        DomainError::Conflict(_) => "conflict",
        DomainError::Repository(_) => "repository",
    }
}

fn step(result: Result<UserView, DomainError>) -> Step {
    match result {
        Ok(view) => Step::Ok(Observed::from(&view)),
        Err(e) => Step::Err(error_kind(&e)),
    }
}

fn deleted(result: Result<(), DomainError>) -> Step {
    match result {
        Ok(()) => Step::Deleted,
        Err(e) => Step::Err(error_kind(&e)),
    }
}

/// Every User whose email carries `tag`, in listing order
async fn listed<R>(service: &UserService<R>, tag: &str) -> Result<Step, DomainError>
where
    R: UserRepository + ?Sized,
{
    let mut mine = Vec::new();
    let mut offset = 0;
    loop {
        let page = service.list(PageRequest::new(offset, MAX_PAGE_LIMIT)?).await?;
        if page.items.is_empty() {
            break;
        }
        offset += page.items.len() as u64;
        mine.extend(
            page.items
                .iter()
                .filter(|u| u.email.contains(tag))
                .map(Observed::from),
        );
    }
    Ok(Step::Listed(mine))
}

/// Run the lifecycle scenario and return one entry per step.
///
/// Every User created here is deleted again before returning.
pub async fn run_scenario<R>(
    service: &UserService<R>,
    tag: &str,
) -> Result<Vec<Step>, DomainError>
where
    R: UserRepository + ?Sized,
{
    let ada_email = format!("ada.{tag}@example.com");
    let grace_email = format!("grace.{tag}@example.com");
    let lovelace_email = format!("lovelace.{tag}@example.com");
    let mut steps = Vec::new();

    let ada = service.create(CreateUser::new("Ada", &ada_email)?).await?;
    steps.push(Step::Ok(Observed::from(&ada)));

    steps.push(step(service.create(CreateUser::new("Imposter", &ada_email)?).await));

    let grace = service
        .create(CreateUser::new("Grace", &grace_email)?)
        .await?;
    steps.push(Step::Ok(Observed::from(&grace)));

    steps.push(step(
        service
            .update(
                ada.id,
                UpdateUser::new(Some("Ada Lovelace"), Some(&lovelace_email))?,
            )
            .await,
    ));
    steps.push(step(
        service
            .update(grace.id, UpdateUser::new(None, Some(&lovelace_email))?)
            .await,
    ));
    steps.push(step(service.deactivate(grace.id).await));
    steps.push(step(service.deactivate(grace.id).await));
    steps.push(step(
        service
            .update(grace.id, UpdateUser::new(Some("Grace Hopper"), None)?)
            .await,
    ));
    steps.push(step(service.activate(grace.id).await));
    steps.push(step(service.get_by_id(ada.id).await));
    steps.push(listed(service, tag).await?);

    steps.push(deleted(service.delete(ada.id).await));
    steps.push(step(service.get_by_id(ada.id).await));
    steps.push(deleted(service.delete(ada.id).await));
    steps.push(listed(service, tag).await?);

    steps.push(deleted(service.delete(grace.id).await));
    steps.push(listed(service, tag).await?);

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CachedUserRepository, InMemoryUserRepository};
    use std::sync::Arc;

    fn repositories() -> Vec<(&'static str, Arc<dyn UserRepository>)> {
        vec![
            ("memory", Arc::new(InMemoryUserRepository::new())),
            (
                "cached",
                Arc::new(CachedUserRepository::new(Arc::new(
                    InMemoryUserRepository::new(),
                ))),
            ),
            (
                "cached(capacity=1)",
                Arc::new(CachedUserRepository::with_capacity(
                    Arc::new(InMemoryUserRepository::new()),
                    1,
                )),
            ),
        ]
    }

    #[tokio::test]
    async fn test_repositories_are_substitutable() {
        let mut transcripts = Vec::new();
        for (name, repo) in repositories() {
            let service: UserService<dyn UserRepository> = UserService::new(repo);
            transcripts.push((name, run_scenario(&service, "run").await.unwrap()));
        }

        let (first_name, first) = &transcripts[0];
        for (name, transcript) in &transcripts[1..] {
            assert_eq!(first, transcript, "{name} diverged from {first_name}");
        }

        assert_eq!(first[1], Step::Err("conflict"));
        assert_eq!(first[4], Step::Err("conflict"));
        assert_eq!(first[7], Step::Err("conflict"));
        assert_eq!(first[12], Step::Err("not_found"));
        assert_eq!(first[13], Step::Err("not_found"));
        assert_eq!(first[16], Step::Listed(Vec::new()));
    }

    #[tokio::test]
    async fn test_listing_ignores_other_tags() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(Arc::clone(&repo));
        service
            .create(CreateUser::new("Bystander", "bystander@example.com").unwrap())
            .await
            .unwrap();

        let steps = run_scenario(&service, "tagged").await.unwrap();
        let Step::Listed(first_listing) = &steps[10] else {
            panic!("expected a listing, got {:?}", steps[10]);
        };
        assert_eq!(first_listing.len(), 2);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
