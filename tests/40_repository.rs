mod common;

use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use tenant_guard::repository::{
    MemoryStore, RepositoryError, RepositorySettings, ScopedRepository,
};
use tenant_guard::{ApiError, Principal, TenantError};

fn repository(
    store: &Arc<MemoryStore>,
    conceal_mismatch: bool,
) -> ScopedRepository<MemoryStore> {
    let settings = RepositorySettings { conceal_mismatch };
    ScopedRepository::with_settings("projects", store.clone(), settings)
}

fn id_of(record: &tenant_guard::Payload) -> Uuid {
    record["id"].as_str().and_then(|id| Uuid::parse_str(id).ok()).expect("record id")
}

#[tokio::test]
async fn create_stamps_tenant_and_system_fields() -> anyhow::Result<()> {
    common::init_tracing();
    let store = Arc::new(MemoryStore::new());
    let projects = repository(&store, false);

    let created = projects
        .create(&common::member("o1"), common::project("Library expansion", None))
        .await?;

    assert_eq!(created["organization_id"], "o1");
    assert_eq!(created["name"], "Library expansion");
    assert!(created["created_at"].is_string());
    assert_eq!(created["created_at"], created["updated_at"]);

    let fetched = projects.get(&common::member("o1"), id_of(&created)).await?;
    assert_eq!(fetched, created);

    Ok(())
}

#[tokio::test]
async fn create_into_another_tenant_is_rejected() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let projects = repository(&store, false);

    let result = projects
        .create(&common::member("o1"), common::project("Hijack", Some("o2")))
        .await;

    assert!(matches!(result, Err(RepositoryError::Tenant(TenantError::Mismatch { .. }))));
    assert!(projects.list(&Principal::unscoped()).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn system_fields_are_rejected() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let projects = repository(&store, false);

    let input = common::payload(json!({ "id": Uuid::new_v4().to_string(), "name": "Forged" }));
    let err = projects.create(&common::member("o1"), input).await.unwrap_err();
    assert!(matches!(err, RepositoryError::SystemField(ref field) if field == "id"));
    assert_eq!(ApiError::from(err).status_code(), 400);

    let created = projects
        .create(&common::member("o1"), common::project("Real", None))
        .await?;
    let patch = common::payload(json!({ "created_at": "1999-01-01T00:00:00Z" }));
    let err = projects
        .update(&common::member("o1"), id_of(&created), patch)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::SystemField(_)));

    Ok(())
}

#[tokio::test]
async fn cross_tenant_read_is_forbidden() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let projects = repository(&store, false);

    let created = projects
        .create(&common::member("o1"), common::project("Hospital wing", None))
        .await?;

    let err = projects
        .get(&common::member("o2"), id_of(&created))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Tenant(_)));

    let api_error = ApiError::from(err);
    assert_eq!(api_error.status_code(), 403);
    assert_eq!(api_error.message(), "Tenant scope mismatch");

    Ok(())
}

#[tokio::test]
async fn concealed_mismatch_looks_like_a_missing_row() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let projects = repository(&store, true);

    let created = projects
        .create(&common::member("o1"), common::project("Data center", None))
        .await?;
    let id = id_of(&created);

    let foreign = projects.get(&common::member("o2"), id).await.unwrap_err();
    let missing = projects.get(&common::member("o2"), Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(foreign, RepositoryError::NotFound(found) if found == id));
    assert_eq!(ApiError::from(foreign), ApiError::from(RepositoryError::NotFound(id)));
    assert_eq!(ApiError::from(missing).status_code(), 404);

    let patch = common::payload(json!({ "status": "lost" }));
    let update = projects.update(&common::member("o2"), id, patch).await;
    assert!(matches!(update, Err(RepositoryError::NotFound(found)) if found == id));

    let delete = projects.delete(&common::member("o2"), id).await;
    assert!(matches!(delete, Err(RepositoryError::NotFound(found)) if found == id));

    let untouched = projects.get(&common::member("o1"), id).await?;
    assert_eq!(untouched, created);

    Ok(())
}

#[tokio::test]
async fn list_returns_own_and_unscoped_rows() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    store
        .seed(
            "projects",
            vec![(Uuid::new_v4(), common::project("Legacy import", None))],
        )
        .await;

    let projects = repository(&store, false);
    projects.create(&common::member("o1"), common::project("Ours A", None)).await?;
    projects.create(&common::member("o2"), common::project("Theirs", None)).await?;
    projects.create(&common::member("o1"), common::project("Ours B", None)).await?;

    let names = |rows: Vec<tenant_guard::Payload>| -> Vec<String> {
        rows.iter()
            .filter_map(|row| row["name"].as_str().map(str::to_string))
            .collect()
    };

    assert_eq!(
        names(projects.list(&common::member("o1")).await?),
        vec!["Legacy import", "Ours A", "Ours B"]
    );
    assert_eq!(
        names(projects.list(&common::member("o2")).await?),
        vec!["Legacy import", "Theirs"]
    );
    assert_eq!(projects.list(&Principal::unscoped()).await?.len(), 4);

    Ok(())
}

#[tokio::test]
async fn update_merges_and_keeps_tenant() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let projects = repository(&store, false);
    let owner = common::member("o1");

    let created = projects.create(&owner, common::project("School gym", None)).await?;
    let id = id_of(&created);

    let patch = common::payload(json!({ "status": "awarded", "organization_id": null }));
    let updated = projects.update(&owner, id, patch).await?;

    assert_eq!(updated["status"], "awarded");
    assert_eq!(updated["name"], "School gym");
    assert_eq!(updated["organization_id"], "o1");
    assert_eq!(updated["created_at"], created["created_at"]);

    Ok(())
}

#[tokio::test]
async fn update_stamps_unscoped_row_with_editor_tenant() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let id = Uuid::new_v4();
    store
        .seed("projects", vec![(id, common::project("Legacy import", None))])
        .await;

    let projects = repository(&store, false);
    let patch = common::payload(json!({ "bid_total": 1_200_000 }));
    let updated = projects.update(&common::member("o1"), id, patch).await?;

    assert_eq!(updated["organization_id"], "o1");
    assert_eq!(updated["bid_total"], 1_200_000);

    let err = projects.get(&common::member("o2"), id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Tenant(TenantError::Mismatch { .. })));
    assert_eq!(projects.list(&common::member("o2")).await?.len(), 0);

    Ok(())
}

#[tokio::test]
async fn update_cannot_move_row_to_another_tenant() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let projects = repository(&store, false);
    let owner = common::member("o1");

    let created = projects.create(&owner, common::project("Bridge deck", None)).await?;
    let id = id_of(&created);

    let patch = common::payload(json!({ "organization_id": "o2" }));
    let err = projects.update(&owner, id, patch).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Tenant(_)));

    let unchanged = projects.get(&owner, id).await?;
    assert_eq!(unchanged["organization_id"], "o1");

    let foreign_patch = common::payload(json!({ "status": "lost" }));
    assert!(projects.update(&common::member("o2"), id, foreign_patch).await.is_err());

    Ok(())
}

#[tokio::test]
async fn delete_requires_same_tenant() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let projects = repository(&store, false);
    let owner = common::member("o1");

    let created = projects.create(&owner, common::project("Retaining wall", None)).await?;
    let id = id_of(&created);

    assert!(projects.delete(&common::member("o2"), id).await.is_err());
    assert!(projects.get(&owner, id).await.is_ok());

    let removed = projects.delete(&owner, id).await?;
    assert_eq!(removed["name"], Value::from("Retaining wall"));
    assert!(matches!(
        projects.get(&owner, id).await,
        Err(RepositoryError::NotFound(_))
    ));

    Ok(())
}
