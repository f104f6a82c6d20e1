mod common;

use std::time::Duration;

use health_declaration_server::entities::health_declaration::DeclarationStatus;
use health_declaration_server::error::AppError;
use health_declaration_server::payload::{DeclarationPatch, NewDeclaration};
use health_declaration_server::seed;
use health_declaration_server::store::{ListOptions, SortField, SortOrder};
use uuid::Uuid;

use common::{declaration, setup_store};

fn validation_field(err: AppError) -> &'static str {
    match err {
        AppError::Validation(e) => e.field,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_stamps_pending_status_and_audit_fields() {
    let store = setup_store().await;

    let input = NewDeclaration {
        name: "  John Doe ".into(),
        ..declaration("")
    };
    let created = store
        .create(input, Some("127.0.0.1".into()), Some("test-agent".into()))
        .await
        .unwrap();

    assert_eq!(created.name, "John Doe");
    assert_eq!(created.status, DeclarationStatus::Pending);
    assert_eq!(created.ip_address.as_deref(), Some("127.0.0.1"));
    assert_eq!(created.user_agent.as_deref(), Some("test-agent"));
    assert_eq!(created.created_at, created.updated_at);

    let fetched = store.find_one(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_generates_distinct_ids() {
    let store = setup_store().await;

    let a = store.create(declaration("John Doe"), None, None).await.unwrap();
    let b = store.create(declaration("John Doe"), None, None).await.unwrap();

    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn create_rejects_flagged_fields_without_details() {
    let store = setup_store().await;

    for symptoms in [None, Some(""), Some("   ")] {
        let input = NewDeclaration {
            has_symptoms: true,
            symptoms: symptoms.map(str::to_string),
            ..declaration("John Doe")
        };
        let err = store.create(input, None, None).await.unwrap_err();
        assert_eq!(validation_field(err), "symptoms");
    }

    let input = NewDeclaration {
        has_contact: true,
        contact_details: Some("\n".into()),
        ..declaration("John Doe")
    };
    let err = store.create(input, None, None).await.unwrap_err();
    assert_eq!(validation_field(err), "contactDetails");

    assert_eq!(store.stats().await.unwrap().total, 0);
}

#[tokio::test]
async fn create_rejects_out_of_range_values() {
    let store = setup_store().await;

    let err = store.create(declaration("A"), None, None).await.unwrap_err();
    assert_eq!(validation_field(err), "name");

    let input = NewDeclaration {
        temperature: 50.0,
        ..declaration("John Doe")
    };
    let err = store.create(input, None, None).await.unwrap_err();
    assert_eq!(validation_field(err), "temperature");
}

#[tokio::test]
async fn find_all_pages_newest_first() {
    let store = setup_store().await;

    let mut ids = Vec::new();
    for name in ["Alice Able", "Bob Baker", "Carol Cole"] {
        ids.push(store.create(declaration(name), None, None).await.unwrap().id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let first = store
        .find_all(&ListOptions {
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.page, 1);
    assert_eq!(first.limit, 2);
    let first_ids: Vec<Uuid> = first.data.iter().map(|d| d.id).collect();
    assert_eq!(first_ids, vec![ids[2], ids[1]]);

    let second = store
        .find_all(&ListOptions {
            page: 2,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(second.data.len(), 1);
    assert_eq!(second.data[0].id, ids[0]);

    let beyond = store
        .find_all(&ListOptions {
            page: 5,
            limit: 2,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.total, 3);
}

#[tokio::test]
async fn find_all_on_empty_table() {
    let store = setup_store().await;

    let page = store.find_all(&ListOptions::default()).await.unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn find_all_filters_by_status() {
    let store = setup_store().await;

    let approved = store.create(declaration("Alice Able"), None, None).await.unwrap();
    store.create(declaration("Bob Baker"), None, None).await.unwrap();
    store
        .update(
            approved.id,
            DeclarationPatch {
                status: Some(DeclarationStatus::Approved),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let page = store
        .find_all(&ListOptions {
            status: Some(DeclarationStatus::Approved),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert!(page
        .data
        .iter()
        .all(|d| d.status == DeclarationStatus::Approved));
    assert_eq!(page.data[0].id, approved.id);
}

#[tokio::test]
async fn find_all_searches_text_fields_case_insensitively() {
    let store = setup_store().await;

    let by_name = store.create(declaration("John Doe"), None, None).await.unwrap();
    let by_symptoms = store
        .create(
            NewDeclaration {
                has_symptoms: true,
                symptoms: Some("caught a cold from johnny".into()),
                ..declaration("Mary Major")
            },
            None,
            None,
        )
        .await
        .unwrap();
    let by_contact = store
        .create(
            NewDeclaration {
                has_contact: true,
                contact_details: Some("Shared an office with JOHN".into()),
                ..declaration("Pat Poe")
            },
            None,
            None,
        )
        .await
        .unwrap();
    store.create(declaration("Jane Roe"), None, None).await.unwrap();

    let page = store
        .find_all(&ListOptions {
            search: Some("John".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut found: Vec<Uuid> = page.data.iter().map(|d| d.id).collect();
    let mut expected = vec![by_name.id, by_symptoms.id, by_contact.id];
    found.sort();
    expected.sort();
    assert_eq!(found, expected);
    assert_eq!(page.total, 3);
}

#[tokio::test]
async fn find_all_treats_wildcards_literally() {
    let store = setup_store().await;

    store.create(declaration("John Doe"), None, None).await.unwrap();

    let page = store
        .find_all(&ListOptions {
            search: Some("%".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn find_all_sorts_by_requested_field() {
    let store = setup_store().await;

    for (name, temperature) in [("Carol Cole", 36.1), ("Alice Able", 38.2), ("Bob Baker", 37.0)] {
        let input = NewDeclaration {
            temperature,
            ..declaration(name)
        };
        store.create(input, None, None).await.unwrap();
    }

    let by_name = store
        .find_all(&ListOptions {
            sort_by: SortField::Name,
            sort_order: SortOrder::Asc,
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<&str> = by_name.data.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Alice Able", "Bob Baker", "Carol Cole"]);

    let by_temperature = store
        .find_all(&ListOptions {
            sort_by: SortField::Temperature,
            sort_order: SortOrder::Desc,
            ..Default::default()
        })
        .await
        .unwrap();
    let temperatures: Vec<f64> = by_temperature.data.iter().map(|d| d.temperature).collect();
    assert_eq!(temperatures, [38.2, 37.0, 36.1]);
}

#[tokio::test]
async fn find_one_missing_is_not_found() {
    let store = setup_store().await;

    let err = store.find_one(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let store = setup_store().await;

    let err = store
        .update(Uuid::new_v4(), DeclarationPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn update_requires_detail_when_none_is_stored() {
    let store = setup_store().await;
    let created = store.create(declaration("John Doe"), None, None).await.unwrap();

    let err = store
        .update(
            created.id,
            DeclarationPatch {
                has_symptoms: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(validation_field(err), "symptoms");

    let unchanged = store.find_one(created.id).await.unwrap();
    assert!(!unchanged.has_symptoms);
}

#[tokio::test]
async fn update_merges_against_stored_detail() {
    let store = setup_store().await;
    let created = store
        .create(
            NewDeclaration {
                has_contact: true,
                contact_details: Some("Neighbour tested positive".into()),
                ..declaration("John Doe")
            },
            None,
            None,
        )
        .await
        .unwrap();

    // The stored detail satisfies the flag even though the patch blanks it.
    let updated = store
        .update(
            created.id,
            DeclarationPatch {
                has_contact: Some(true),
                contact_details: Some("  ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.has_contact);
    assert_eq!(updated.contact_details.as_deref(), Some(""));
}

#[tokio::test]
async fn update_applies_partial_changes() {
    let store = setup_store().await;
    let created = store.create(declaration("John Doe"), None, None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let updated = store
        .update(
            created.id,
            DeclarationPatch {
                temperature: Some(37.25),
                has_symptoms: Some(true),
                symptoms: Some(" dry cough ".into()),
                status: Some(DeclarationStatus::Rejected),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "John Doe");
    assert_eq!(updated.temperature, 37.25);
    assert_eq!(updated.symptoms.as_deref(), Some("dry cough"));
    assert_eq!(updated.status, DeclarationStatus::Rejected);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    // Any status may move to any other.
    let reopened = store
        .update(
            created.id,
            DeclarationPatch {
                status: Some(DeclarationStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reopened.status, DeclarationStatus::Pending);
}

#[tokio::test]
async fn update_rejects_invalid_fields() {
    let store = setup_store().await;
    let created = store.create(declaration("John Doe"), None, None).await.unwrap();

    let err = store
        .update(
            created.id,
            DeclarationPatch {
                name: Some("R2-D2".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(validation_field(err), "name");
}

#[tokio::test]
async fn remove_then_find_is_not_found() {
    let store = setup_store().await;
    let created = store.create(declaration("John Doe"), None, None).await.unwrap();

    store.remove(created.id).await.unwrap();

    assert!(matches!(
        store.find_one(created.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        store.remove(created.id).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn stats_count_by_status_and_day() {
    let store = setup_store().await;

    let mut ids = Vec::new();
    for name in ["Alice Able", "Bob Baker", "Carol Cole", "Dan Dole"] {
        ids.push(store.create(declaration(name), None, None).await.unwrap().id);
    }
    for (id, status) in [
        (ids[0], DeclarationStatus::Approved),
        (ids[1], DeclarationStatus::Approved),
        (ids[2], DeclarationStatus::Rejected),
    ] {
        store
            .update(
                id,
                DeclarationPatch {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.approved, 2);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.today_submissions, 4);
}

#[tokio::test]
async fn seed_fills_only_an_empty_table() {
    let store = setup_store().await;

    let inserted = seed::run(store.connection()).await.unwrap();
    assert_eq!(inserted, 5);
    assert_eq!(seed::run(store.connection()).await.unwrap(), 0);

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.approved, 2);
    assert_eq!(stats.rejected, 1);
    assert!(stats.today_submissions <= 5);
}
