//! End-to-end User lifecycle scenarios run against every storage-agnostic
//! repository, including concurrent callers.

use std::sync::Arc;

use tessera::{
    CachedUserRepository, CreateUser, InMemoryUserRepository, PageRequest, UpdateUser,
    UserRepository, UserService,
};

type DynService = UserService<dyn UserRepository>;

fn repositories() -> Vec<(&'static str, Arc<dyn UserRepository>)> {
    let memory: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let cached: Arc<dyn UserRepository> = Arc::new(CachedUserRepository::new(Arc::new(
        InMemoryUserRepository::new(),
    )));
    let tiny_cache: Arc<dyn UserRepository> = Arc::new(CachedUserRepository::with_capacity(
        Arc::new(InMemoryUserRepository::new()),
        1,
    ));
    vec![
        ("memory", memory),
        ("cached", cached),
        ("cached(capacity=1)", tiny_cache),
    ]
}

#[tokio::test]
async fn test_concrete_ada_scenario() {
    for (name, repo) in repositories() {
        let service: DynService = UserService::new(Arc::clone(&repo));

        let created = service
            .create(CreateUser::new("Ada", "ada@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(created.name, "Ada", "{name}");

        let dup = service
            .create(CreateUser::new("Ada", "ada@example.com").unwrap())
            .await
            .unwrap_err();
        assert!(dup.is_conflict(), "{name}");
        assert_eq!(repo.count().await.unwrap(), 1, "{name}");

        let deactivated = service.deactivate(created.id).await.unwrap();
        assert!(!deactivated.is_active, "{name}");
        assert_eq!(deactivated.id, created.id, "{name}");

        let again = service.deactivate(created.id).await.unwrap();
        assert!(!again.is_active, "{name}");

        let missing = service.delete(tessera::UserId::generate()).await.unwrap_err();
        assert!(missing.is_not_found(), "{name}");
        assert_eq!(repo.count().await.unwrap(), 1, "{name}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_creates_on_one_email_yield_single_success() {
    for (name, repo) in repositories() {
        let service: Arc<DynService> = Arc::new(UserService::new(Arc::clone(&repo)));

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .create(CreateUser::new(&format!("Racer {i}"), "race@example.com").unwrap())
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(e.is_conflict(), "{name}: unexpected {e}"),
            }
        }

        assert_eq!(successes, 1, "{name}");
        assert_eq!(repo.count().await.unwrap(), 1, "{name}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_not_lost() {
    for (name, repo) in repositories() {
        let service: Arc<DynService> = Arc::new(UserService::new(Arc::clone(&repo)));
        let created = service
            .create(CreateUser::new("Counter", "counter@example.com").unwrap())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .update(
                        created.id,
                        UpdateUser::new(Some(&format!("Writer {i}")), None).unwrap(),
                    )
                    .await
            }));
        }

        let mut winners = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(view) => winners.push(view.name),
                Err(e) => assert!(e.is_conflict(), "{name}: unexpected {e}"),
            }
        }

        // Every successful write bumped the version exactly once
        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.version(), 1 + winners.len() as i64, "{name}");
        assert!(winners.contains(&stored.name().to_string()), "{name}");
    }
}

#[tokio::test]
async fn test_list_paging_is_stable() {
    for (name, repo) in repositories() {
        let service: DynService = UserService::new(repo);
        for i in 0..7 {
            let cmd = CreateUser::new(&format!("User {i}"), &format!("user{i}@example.com"));
            service.create(cmd.unwrap()).await.unwrap();
        }

        let mut seen = Vec::new();
        let mut offset = 0;
        loop {
            let page = service
                .list(PageRequest::new(offset, 3).unwrap())
                .await
                .unwrap();
            assert_eq!(page.total, 7, "{name}");
            if page.items.is_empty() {
                break;
            }
            offset += page.items.len() as u64;
            seen.extend(page.items.into_iter().map(|u| u.name));
        }

        let expected: Vec<String> = (0..7).map(|i| format!("User {i}")).collect();
        assert_eq!(seen, expected, "{name}");
    }
}
