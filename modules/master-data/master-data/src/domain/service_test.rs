use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use admin_api::{Page, PageRequest};
use admin_security::SecurityContext;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use master_data_sdk::{MasterDataPatch, MasterDataRecord, NewMasterData, RawRow};
use tracing_test::traced_test;

use super::error::DomainError;
use super::repo::{MasterDataRepository, NewRecord, UserDirectory};
use super::service::Service;

const ADMIN_ID: i32 = 1;

#[derive(Default)]
struct MemoryRepository {
    rows: Mutex<Vec<MasterDataRecord>>,
    fail_batch: AtomicBool,
    batches: Mutex<Vec<usize>>,
}

impl MemoryRepository {
    fn failing_batches() -> Self {
        let repo = Self::default();
        repo.fail_batch.store(true, Ordering::SeqCst);
        repo
    }

    fn keys(&self) -> Vec<(String, String)> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.category.clone(), r.code.clone()))
            .collect()
    }

    fn push(&self, record: NewRecord) -> MasterDataRecord {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let stored = MasterDataRecord {
            id,
            category: record.category,
            code: record.code,
            name: record.name,
            description: record.description,
            icon: record.icon,
            tags: record.tags,
            sort_order: record.sort_order,
            is_active: record.is_active,
            created_by_id: record.created_by_id,
            created_at: record.created_at,
            updated_at: Utc::now(),
        };
        rows.push(stored.clone());
        stored
    }
}

#[async_trait]
impl MasterDataRepository for MemoryRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<MasterDataRecord>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_key(
        &self,
        category: &str,
        code: &str,
    ) -> Result<Option<MasterDataRecord>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.category == category && r.code == code)
            .cloned())
    }

    async fn list(
        &self,
        category: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<MasterDataRecord>, DomainError> {
        let mut rows: Vec<MasterDataRecord> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| category.is_none_or(|c| r.category == c))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.category, a.sort_order, a.id).cmp(&(&b.category, b.sort_order, b.id)));
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap())
            .take(usize::try_from(page.per_page).unwrap())
            .collect();
        Ok(Page::new(items, page, total))
    }

    async fn categories(&self) -> Result<Vec<String>, DomainError> {
        let mut categories: Vec<String> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn insert(&self, record: NewRecord) -> Result<MasterDataRecord, DomainError> {
        Ok(self.push(record))
    }

    async fn insert_batch(&self, records: Vec<NewRecord>) -> Result<u64, DomainError> {
        self.batches.lock().unwrap().push(records.len());
        if self.fail_batch.load(Ordering::SeqCst) {
            return Err(DomainError::batch_commit("disk I/O error"));
        }
        let inserted = records.len() as u64;
        for record in records {
            self.push(record);
        }
        Ok(inserted)
    }

    async fn update(
        &self,
        id: i32,
        patch: MasterDataPatch,
    ) -> Result<MasterDataRecord, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found(id))?;
        if let Some(v) = patch.category {
            row.category = v;
        }
        if let Some(v) = patch.code {
            row.code = v;
        }
        if let Some(v) = patch.name {
            row.name = v;
        }
        if let Some(v) = patch.description {
            row.description = (!v.is_empty()).then_some(v);
        }
        if let Some(v) = patch.sort_order {
            row.sort_order = v;
        }
        if let Some(v) = patch.is_active {
            row.is_active = v;
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let count = rows.len() as u64;
        rows.clear();
        Ok(count)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

struct StaticDirectory {
    users: HashMap<String, i32>,
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn user_id_by_email(&self, email: &str) -> Result<Option<i32>, DomainError> {
        if email == "broken@example.com" {
            return Err(DomainError::database("connection reset"));
        }
        Ok(self.users.get(email).copied())
    }
}

fn service_with(repo: Arc<MemoryRepository>) -> Service {
    let directory = StaticDirectory {
        users: HashMap::from([("jane@example.com".to_owned(), 7)]),
    };
    Service::new(repo, Arc::new(directory))
}

fn admin() -> SecurityContext {
    SecurityContext::builder()
        .subject_id(ADMIN_ID)
        .username("admin")
        .admin(true)
        .build()
}

fn row(category: &str, code: &str, description: &str) -> RawRow {
    RawRow::from([
        ("category".to_owned(), category.to_owned()),
        ("code".to_owned(), code.to_owned()),
        ("description".to_owned(), description.to_owned()),
        ("icon".to_owned(), String::new()),
        ("tags".to_owned(), String::new()),
        ("is_active".to_owned(), "TRUE".to_owned()),
    ])
}

fn with(mut raw: RawRow, column: &str, value: &str) -> RawRow {
    raw.insert(column.to_owned(), value.to_owned());
    raw
}

fn new_record(category: &str, code: &str) -> NewMasterData {
    NewMasterData {
        category: category.to_owned(),
        code: code.to_owned(),
        name: code.to_uppercase(),
        description: None,
        icon: None,
        tags: None,
        sort_order: 0,
        is_active: true,
    }
}

#[tokio::test]
async fn import_adds_new_rows_with_description_as_name() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());

    let result = svc
        .import_batch(
            &admin(),
            vec![
                with(row("color", "red", "Red colour"), "tags", "warm"),
                row("color", "blue", "Blue"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(result.rows_seen, 2);
    assert_eq!(result.rows_added, 2);
    assert!(result.is_balanced());

    let stored = repo.rows.lock().unwrap().clone();
    assert_eq!(stored[0].name, "Red colour");
    assert_eq!(stored[0].description.as_deref(), Some("Red colour"));
    assert_eq!(stored[0].tags.as_deref(), Some("warm"));
    assert!(stored[0].icon.is_none());
    assert_eq!(stored[0].sort_order, 0);
    assert!(stored[0].is_active);
}

#[tokio::test]
async fn reimport_is_idempotent() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());
    let rows = vec![row("color", "red", "Red"), row("size", "xl", "Extra large")];

    let first = svc.import_batch(&admin(), rows.clone()).await.unwrap();
    assert_eq!(first.rows_added, 2);

    for _ in 0..2 {
        let again = svc.import_batch(&admin(), rows.clone()).await.unwrap();
        assert_eq!(again.rows_added, 0);
        assert_eq!(again.rows_skipped_existing, 2);
        assert!(again.is_balanced());
    }
    assert_eq!(repo.keys().len(), 2);
}

#[tokio::test]
async fn import_never_overwrites_existing_record() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());
    svc.create(&admin(), new_record("color", "red")).await.unwrap();

    let result = svc
        .import_batch(&admin(), vec![row("color", "red", "Imported red")])
        .await
        .unwrap();

    assert_eq!(result.rows_skipped_existing, 1);
    assert_eq!(repo.rows.lock().unwrap()[0].name, "RED");
    assert_eq!(repo.batches.lock().unwrap().len(), 0);
}

#[tokio::test]
async fn duplicate_key_within_one_batch_is_skipped() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());

    let result = svc
        .import_batch(
            &admin(),
            vec![row("color", "red", "First"), row("color", "red", "Second")],
        )
        .await
        .unwrap();

    assert_eq!(result.rows_seen, 2);
    assert_eq!(result.rows_added, 1);
    assert_eq!(result.rows_skipped_existing, 1);
    assert_eq!(result.rows_failed, 0);
    let stored = repo.rows.lock().unwrap().clone();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "First");
}

#[tokio::test]
#[traced_test]
async fn bad_rows_are_counted_and_do_not_abort_the_batch() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());

    let mut missing_code = row("color", "x", "No code");
    missing_code.remove("code");
    let mut missing_description = row("color", "green", "");
    missing_description.remove("description");
    let rows = vec![
        row("color", "red", "Red"),
        missing_code,
        row("", "empty", "Empty category"),
        row("color", "long", &"d".repeat(101)),
        missing_description,
        with(row("color", "lookup", "Lookup"), "created_by", "broken@example.com"),
        row("color", "blue", "Blue"),
    ];

    let result = svc.import_batch(&admin(), rows).await.unwrap();

    assert_eq!(result.rows_seen, 7);
    assert_eq!(result.rows_added, 2);
    assert_eq!(result.rows_failed, 5);
    assert!(result.is_balanced());
    assert_eq!(
        repo.keys(),
        vec![
            ("color".to_owned(), "red".to_owned()),
            ("color".to_owned(), "blue".to_owned())
        ]
    );
    assert!(logs_contain("Error processing row"));
    assert!(logs_contain("Master Data Import"));
}

#[tokio::test]
async fn creator_resolved_by_email_with_fallback_to_caller() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());

    svc.import_batch(
        &admin(),
        vec![
            with(row("color", "red", "Red"), "created_by", "jane@example.com"),
            with(row("color", "blue", "Blue"), "created_by", "ghost@example.com"),
            row("color", "green", "Green"),
        ],
    )
    .await
    .unwrap();

    let owners: Vec<i32> = repo
        .rows
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.created_by_id)
        .collect();
    assert_eq!(owners, vec![7, ADMIN_ID, ADMIN_ID]);
}

#[tokio::test]
async fn is_active_and_created_on_are_parsed_leniently() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());
    let before = Utc::now();

    svc.import_batch(
        &admin(),
        vec![
            with(
                with(row("flag", "a", "A"), "is_active", "true"),
                "created_on",
                "2024-02-03T04:05:06",
            ),
            with(
                with(row("flag", "b", "B"), "is_active", "yes"),
                "created_on",
                "not a date",
            ),
        ],
    )
    .await
    .unwrap();

    let stored = repo.rows.lock().unwrap().clone();
    assert!(stored[0].is_active);
    assert_eq!(
        stored[0].created_at,
        Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap()
    );
    assert!(!stored[1].is_active);
    assert!(stored[1].created_at >= before);
}

#[tokio::test]
async fn failed_commit_surfaces_and_adds_nothing() {
    let repo = Arc::new(MemoryRepository::failing_batches());
    let svc = service_with(repo.clone());

    let err = svc
        .import_batch(
            &admin(),
            vec![row("color", "red", "Red"), row("color", "blue", "Blue")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::BatchCommit { .. }));
    assert_eq!(*repo.batches.lock().unwrap(), vec![2]);
    assert!(repo.keys().is_empty());
}

#[tokio::test]
async fn csv_import_counts_undecodable_records_as_failed() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());
    let mut csv = b"category,code,description,icon,tags,is_active,created_on,created_by\n".to_vec();
    csv.extend_from_slice(b"color,red,Red,,,TRUE,2024-01-01,\n");
    csv.extend_from_slice(b"color,\xff,Bad,,,TRUE,,\n");
    csv.extend_from_slice(b"color,blue,Blue,,,FALSE,,jane@example.com\n");

    let result = svc.import_csv(&admin(), &csv).await.unwrap();

    assert_eq!(result.rows_seen, 3);
    assert_eq!(result.rows_added, 2);
    assert_eq!(result.rows_failed, 1);
    let stored = repo.rows.lock().unwrap().clone();
    assert!(!stored[1].is_active);
    assert_eq!(stored[1].created_by_id, 7);
}

#[tokio::test]
async fn csv_with_unreadable_header_is_rejected() {
    let svc = service_with(Arc::new(MemoryRepository::default()));
    let err = svc
        .import_csv(&admin(), b"cat\xffegory,code\n")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidCsv(_)));
}

#[tokio::test]
async fn delete_all_requires_confirmation() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());
    let rows = (0..5)
        .map(|i| row("color", &format!("c{i}"), "Colour"))
        .collect();
    svc.import_batch(&admin(), rows).await.unwrap();

    assert_eq!(svc.delete_all(&admin(), false).await.unwrap(), 5);
    assert_eq!(repo.keys().len(), 5);

    assert_eq!(svc.delete_all(&admin(), true).await.unwrap(), 5);
    assert!(repo.keys().is_empty());
}

#[tokio::test]
async fn non_admin_is_refused_before_any_work() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());
    let user = SecurityContext::builder()
        .subject_id(3)
        .username("jane")
        .build();

    let err = svc
        .import_batch(&user, vec![row("color", "red", "Red")])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
    assert!(matches!(
        svc.delete_all(&user, true).await,
        Err(DomainError::Forbidden(_))
    ));
    assert!(repo.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_duplicate_and_invalid_records() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());

    let created = svc.create(&admin(), new_record("color", "red")).await.unwrap();
    assert_eq!(created.created_by_id, ADMIN_ID);

    let err = svc
        .create(&admin(), new_record("color", "red"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateKey { .. }));

    let mut blank_name = new_record("color", "blue");
    blank_name.name = " ".to_owned();
    let err = svc.create(&admin(), blank_name).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "name", .. }));

    let mut long_icon = new_record("color", "green");
    long_icon.icon = Some("i".repeat(51));
    let err = svc.create(&admin(), long_icon).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "icon", .. }));
}

#[tokio::test]
async fn update_checks_key_collisions() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo.clone());
    let red = svc.create(&admin(), new_record("color", "red")).await.unwrap();
    svc.create(&admin(), new_record("color", "blue")).await.unwrap();

    let err = svc
        .update(
            &admin(),
            red.id,
            MasterDataPatch {
                code: Some("blue".to_owned()),
                ..MasterDataPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateKey { .. }));

    let updated = svc
        .update(
            &admin(),
            red.id,
            MasterDataPatch {
                code: Some("red".to_owned()),
                sort_order: Some(4),
                description: Some("Warm".to_owned()),
                ..MasterDataPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.sort_order, 4);
    assert_eq!(updated.description.as_deref(), Some("Warm"));

    let err = svc
        .update(&admin(), 99, MasterDataPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { id: 99 }));
}

#[tokio::test]
async fn list_filters_by_category_and_orders() {
    let repo = Arc::new(MemoryRepository::default());
    let svc = service_with(repo);
    for (category, code, order) in [("size", "xl", 2), ("color", "red", 1), ("size", "s", 1)] {
        let mut new = new_record(category, code);
        new.sort_order = order;
        svc.create(&admin(), new).await.unwrap();
    }

    let page = svc
        .list(&admin(), Some("size"), PageRequest::new(1, 10))
        .await
        .unwrap();
    let codes: Vec<&str> = page.items.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["s", "xl"]);
    assert_eq!(page.total, 2);

    let all = svc
        .list(&admin(), Some(""), PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(all.total, 3);

    assert_eq!(svc.categories(&admin()).await.unwrap(), vec!["color", "size"]);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let svc = service_with(Arc::new(MemoryRepository::default()));
    let created = svc.create(&admin(), new_record("color", "red")).await.unwrap();
    svc.delete(&admin(), created.id).await.unwrap();
    assert!(matches!(
        svc.delete(&admin(), created.id).await,
        Err(DomainError::NotFound { .. })
    ));
}
