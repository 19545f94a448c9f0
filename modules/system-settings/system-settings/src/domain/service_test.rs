use std::sync::{Arc, Mutex};

use admin_security::SecurityContext;
use chrono::{DateTime, Utc};
use system_settings_sdk::{BackupInfo, BackupKind, ConfigPatch};
use tracing_test::traced_test;

use super::error::DomainError;
use super::naming;
use super::service::Service;
use super::store::ConfigStore;
use crate::config::FieldLimits;

#[derive(Default)]
struct MemoryStore {
    live: Mutex<Option<Vec<u8>>>,
    backups: Mutex<Vec<(String, Vec<u8>)>>,
    fail_backup: bool,
    fail_replace: bool,
}

impl MemoryStore {
    fn with_live(doc: &str) -> Self {
        Self {
            live: Mutex::new(Some(doc.as_bytes().to_vec())),
            ..Self::default()
        }
    }

    fn live(&self) -> Option<String> {
        self.live
            .lock()
            .unwrap()
            .as_ref()
            .map(|b| String::from_utf8(b.clone()).unwrap())
    }

    fn backups(&self) -> Vec<(String, Vec<u8>)> {
        self.backups.lock().unwrap().clone()
    }
}

fn io_error() -> std::io::Error {
    std::io::Error::other("disk full")
}

impl ConfigStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_owned()
    }

    fn live_exists(&self) -> bool {
        self.live.lock().unwrap().is_some()
    }

    fn read_live(&self) -> Result<Vec<u8>, DomainError> {
        self.live
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DomainError::StorageUnavailable {
                path: "memory".to_owned(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }

    fn write_backup(
        &self,
        kind: BackupKind,
        taken_at: DateTime<Utc>,
        bytes: &[u8],
    ) -> Result<String, DomainError> {
        let mut backups = self.backups.lock().unwrap();
        let mut attempt = 0;
        let mut name = naming::backup_file_name(kind, taken_at, attempt);
        while backups.iter().any(|(n, _)| *n == name) {
            attempt += 1;
            name = naming::backup_file_name(kind, taken_at, attempt);
        }
        if self.fail_backup {
            return Err(DomainError::BackupWrite {
                file: name,
                source: io_error(),
            });
        }
        backups.push((name.clone(), bytes.to_vec()));
        Ok(name)
    }

    fn replace_live(&self, bytes: &[u8]) -> Result<(), DomainError> {
        if self.fail_replace {
            return Err(DomainError::LiveWrite {
                backup_file: None,
                source: io_error(),
            });
        }
        *self.live.lock().unwrap() = Some(bytes.to_vec());
        Ok(())
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>, DomainError> {
        Ok(Vec::new())
    }
}

const LIVE: &str = r#"{"app_name":"Old","client_name":"Client","theme":{"default":"light","available":["light","dark"]},"mail_server":{"smtp_host":"smtp.example.com","smtp_port":587,"smtp_user":"","smtp_password":"","use_tls":true},"security":{"session_lifetime":86400,"password_min_length":8},"admin_email":"","database":{"uri":  "sqlite:///app.db"}}"#;

fn admin() -> SecurityContext {
    SecurityContext::builder()
        .subject_id(1)
        .username("admin")
        .admin(true)
        .build()
}

fn service(store: &Arc<MemoryStore>) -> Service {
    Service::new(store.clone(), FieldLimits::default())
}

fn rename(name: &str) -> ConfigPatch {
    ConfigPatch {
        app_name: Some(name.to_owned()),
        ..ConfigPatch::default()
    }
}

#[test]
fn update_backs_up_then_replaces() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let svc = service(&store);

    let doc = svc.update(&admin(), rename("New")).unwrap();
    assert_eq!(doc.app_name, "New");

    let loaded = svc.load(&admin()).unwrap();
    assert_eq!(loaded.app_name, "New");
    assert_eq!(loaded.client_name, "Client");
    assert!(store.live().unwrap().contains(r#"{"uri":  "sqlite:///app.db"}"#));

    let backups = store.backups();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].1, LIVE.as_bytes());
    let parsed = naming::parse_backup_name(&backups[0].0).unwrap();
    assert_eq!(parsed.kind, BackupKind::Routine);
}

#[test]
fn update_of_minimal_document_fills_defaults() {
    let store = Arc::new(MemoryStore::with_live(r#"{"app_name":"Old"}"#));
    let svc = service(&store);

    let doc = svc.update(&admin(), rename("New")).unwrap();
    assert_eq!(doc.app_name, "New");
    assert_eq!(svc.load(&admin()).unwrap().app_name, "New");

    let backups = store.backups();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].0.starts_with("config_backup_"));
    assert!(backups[0].0.ends_with(".json"));
    assert_eq!(backups[0].1, br#"{"app_name":"Old"}"#);
}

#[test]
fn failed_backup_leaves_live_unchanged() {
    let store = Arc::new(MemoryStore {
        fail_backup: true,
        ..MemoryStore::with_live(LIVE)
    });
    let svc = service(&store);

    let err = svc.update(&admin(), rename("New")).unwrap_err();
    assert!(matches!(err, DomainError::BackupWrite { .. }));
    assert_eq!(store.live().unwrap(), LIVE);
    assert_eq!(svc.load(&admin()).unwrap().app_name, "Old");
}

#[test]
fn failed_replace_keeps_backup_for_forensics() {
    let store = Arc::new(MemoryStore {
        fail_replace: true,
        ..MemoryStore::with_live(LIVE)
    });
    let svc = service(&store);

    let err = svc.update(&admin(), rename("New")).unwrap_err();
    let backup_file = err.backup_file().map(str::to_owned);
    assert!(matches!(err, DomainError::LiveWrite { .. }));
    assert_eq!(store.live().unwrap(), LIVE);
    assert_eq!(store.backups().len(), 1);
    assert_eq!(backup_file.as_deref(), Some(store.backups()[0].0.as_str()));
}

#[test]
fn validation_happens_before_any_io() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let err = service(&store).update(&admin(), rename("")).unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "app_name", .. }));
    assert!(store.backups().is_empty());
}

#[test]
fn non_admin_is_refused_before_io() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let svc = service(&store);
    let user = SecurityContext::builder().subject_id(5).build();

    assert!(matches!(svc.load(&user), Err(DomainError::Forbidden(_))));
    assert!(matches!(
        svc.update(&user, rename("X")),
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        svc.restore(&SecurityContext::anonymous(), LIVE.as_bytes(), None),
        Err(DomainError::Forbidden(_))
    ));
    assert!(store.backups().is_empty());
    assert_eq!(store.live().unwrap(), LIVE);
}

#[test]
fn load_reports_missing_and_malformed_documents() {
    let missing = Arc::new(MemoryStore::default());
    assert!(matches!(
        service(&missing).load(&admin()),
        Err(DomainError::StorageUnavailable { .. })
    ));

    let broken = Arc::new(MemoryStore::with_live("{not json"));
    assert!(matches!(
        service(&broken).load(&admin()),
        Err(DomainError::MalformedDocument(_))
    ));
}

#[test]
fn restore_writes_upload_verbatim_after_backup() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let svc = service(&store);
    let uploaded = r#"{ "app_name": "Restored", "client_name": "C", "theme": {}, "mail_server": {}, "security": {} }"#;

    let outcome = svc
        .restore(&admin(), uploaded.as_bytes(), Some("snapshot.json"))
        .unwrap();
    assert_eq!(outcome.restored_from.as_deref(), Some("snapshot.json"));
    assert_eq!(store.live().unwrap(), uploaded);

    let backups = store.backups();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].1, LIVE.as_bytes());
    assert!(backups[0].0.starts_with("config_backup_before_restore_"));
    assert_eq!(outcome.backup_file.as_deref(), Some(backups[0].0.as_str()));
}

#[test]
fn restore_missing_security_is_rejected() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let uploaded = r#"{"app_name":"A","client_name":"C","theme":{},"mail_server":{}}"#;

    let err = service(&store)
        .restore(&admin(), uploaded.as_bytes(), None)
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidRestoreDocument(ref m) if m.contains("security")));
    assert_eq!(store.live().unwrap(), LIVE);
    assert!(store.backups().is_empty());
}

#[test]
fn restore_rejects_non_objects() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let svc = service(&store);
    for uploaded in ["[1, 2]", "not json", r#""app_name""#] {
        let err = svc.restore(&admin(), uploaded.as_bytes(), None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRestoreDocument(_)), "{uploaded}");
    }
    assert_eq!(store.live().unwrap(), LIVE);
    assert!(store.backups().is_empty());
}

#[test]
fn restore_checks_keys_not_section_contents() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let uploaded = r#"{"app_name":1,"client_name":"C","theme":{},"mail_server":{"smtp_port":"587"},"security":{}}"#;

    service(&store)
        .restore(&admin(), uploaded.as_bytes(), None)
        .unwrap();
    assert_eq!(store.live().unwrap(), uploaded);
    assert_eq!(store.backups().len(), 1);
}

#[test]
fn restore_without_live_document_skips_backup() {
    let store = Arc::new(MemoryStore::default());
    let uploaded = r#"{"app_name":"A","client_name":"C","theme":{},"mail_server":{},"security":{}}"#;

    service(&store)
        .restore(&admin(), uploaded.as_bytes(), None)
        .unwrap();
    assert!(store.backups().is_empty());
    assert_eq!(store.live().unwrap(), uploaded);
}

#[test]
fn restore_backs_up_malformed_live_document_raw() {
    let store = Arc::new(MemoryStore::with_live("{broken"));
    let uploaded = r#"{"app_name":"A","client_name":"C","theme":{},"mail_server":{},"security":{}}"#;

    service(&store)
        .restore(&admin(), uploaded.as_bytes(), None)
        .unwrap();
    assert_eq!(store.backups()[0].1, b"{broken");
}

#[test]
fn export_returns_live_bytes_without_backup() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let exported = service(&store).export_backup(&admin()).unwrap();
    assert_eq!(exported.bytes, LIVE.as_bytes());
    assert!(naming::parse_backup_name(&exported.file_name).is_some());
    assert!(store.backups().is_empty());
}

#[test]
fn repeated_updates_in_one_second_keep_every_backup() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let svc = service(&store);
    svc.update(&admin(), rename("One")).unwrap();
    svc.update(&admin(), rename("Two")).unwrap();
    svc.update(&admin(), rename("Three")).unwrap();

    let backups = store.backups();
    assert_eq!(backups.len(), 3);
    let mut names: Vec<_> = backups.iter().map(|(n, _)| n.clone()).collect();
    names.dedup();
    assert_eq!(names.len(), 3);
}

#[test]
#[traced_test]
fn update_is_audited_with_backup_file() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    service(&store).update(&admin(), rename("New")).unwrap();

    let backup_file = store.backups()[0].0.clone();
    assert!(logs_contain("Operation: System Settings Update - Status: Success"));
    assert!(logs_contain(&backup_file));
}

#[test]
#[traced_test]
fn restore_outcomes_are_audited() {
    let store = Arc::new(MemoryStore::with_live(LIVE));
    let svc = service(&store);

    svc.restore(&admin(), b"[]", None).unwrap_err();
    assert!(logs_contain("Rejected restore document"));
    assert!(logs_contain("Operation: Configuration Restore - Status: Error"));

    let uploaded = r#"{"app_name":"A","client_name":"C","theme":{},"mail_server":{},"security":{}}"#;
    svc.restore(&admin(), uploaded.as_bytes(), Some("snapshot.json"))
        .unwrap();
    assert!(logs_contain("Operation: Configuration Restore - Status: Success"));
    assert!(logs_contain("snapshot.json"));
}
