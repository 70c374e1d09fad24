//! Encrypted persistence of the connection-profile list.
//!
//! The favorites file holds the entire profile list; every mutation
//! (create, edit, duplicate, delete) rewrites it whole — there are no
//! partial updates. Files written by pre-encryption clients are plain JSON
//! arrays and are upgraded transparently on first read.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use querydock_driver::ConnectionProfile;

use crate::crypto::{self, KeyCache};
use crate::error::{CoreError, CoreResult};
use crate::traits::{ProfileFile, SecretStore};

/// Persists and loads the connection-profile list through the encrypted
/// envelope and a [`ProfileFile`] collaborator.
///
/// All writes are serialized through one internal lock, so concurrent
/// mutations cannot interleave and silently drop each other's full-list
/// overwrite. Integrity and key failures always propagate — a corrupted or
/// unreadable file is never presented as an empty list.
pub struct FavoritesStore {
    file: Arc<dyn ProfileFile>,
    secrets: Arc<dyn SecretStore>,
    key_cache: KeyCache,
    write_lock: Mutex<()>,
}

fn parse_profiles(text: &str) -> CoreResult<Vec<ConnectionProfile>> {
    serde_json::from_str(text)
        .map_err(|e| CoreError::Format(format!("malformed profile list: {e}")))
}

fn ensure_unique_ids(profiles: &[ConnectionProfile]) -> CoreResult<()> {
    let mut seen = std::collections::HashSet::new();
    for profile in profiles {
        if let Some(ref id) = profile.id {
            if !seen.insert(id.as_str()) {
                return Err(CoreError::Validation(format!("duplicate profile id: {id}")));
            }
        }
    }
    Ok(())
}

impl FavoritesStore {
    pub fn new(file: Arc<dyn ProfileFile>, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            file,
            secrets,
            key_cache: KeyCache::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the profile list.
    ///
    /// Missing file → empty list. Encrypted file → decrypted and parsed.
    /// Legacy plaintext array → parsed, then immediately re-saved encrypted
    /// (one-time transparent upgrade); if that upgrade write fails, the
    /// error surfaces rather than leaving the file plaintext silently.
    pub async fn load(&self) -> CoreResult<Vec<ConnectionProfile>> {
        let _guard = self.write_lock.lock().await;
        self.load_locked().await
    }

    /// Encrypts and writes the full profile list in one write.
    pub async fn save(&self, profiles: &[ConnectionProfile]) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.save_locked(profiles).await
    }

    /// Appends a profile, assigning a fresh id unless it already has one.
    /// Returns the stored profile.
    pub async fn add(&self, mut profile: ConnectionProfile) -> CoreResult<ConnectionProfile> {
        let _guard = self.write_lock.lock().await;
        if profile.id.is_none() {
            profile.id = Some(Uuid::new_v4().to_string());
        }
        let mut profiles = self.load_locked().await?;
        profiles.push(profile.clone());
        self.save_locked(&profiles).await?;
        Ok(profile)
    }

    /// Replaces the stored profile with the same id.
    pub async fn update(&self, profile: &ConnectionProfile) -> CoreResult<()> {
        let Some(ref id) = profile.id else {
            return Err(CoreError::Validation(
                "cannot update a profile without an id".to_string(),
            ));
        };

        let _guard = self.write_lock.lock().await;
        let mut profiles = self.load_locked().await?;
        let Some(slot) = profiles.iter_mut().find(|p| p.id.as_ref() == Some(id)) else {
            return Err(CoreError::Validation(format!("unknown profile id: {id}")));
        };
        *slot = profile.clone();
        self.save_locked(&profiles).await
    }

    /// Duplicates the profile with the given id, inserting the copy (fresh
    /// id, `"<name> - Copy"`) right after the original.
    pub async fn duplicate(&self, id: &str) -> CoreResult<ConnectionProfile> {
        let _guard = self.write_lock.lock().await;
        let mut profiles = self.load_locked().await?;
        let Some(index) = profiles.iter().position(|p| p.id.as_deref() == Some(id)) else {
            return Err(CoreError::Validation(format!("unknown profile id: {id}")));
        };

        let mut copy = profiles[index].clone();
        copy.id = Some(Uuid::new_v4().to_string());
        copy.name = format!("{} - Copy", copy.name);
        profiles.insert(index + 1, copy.clone());

        self.save_locked(&profiles).await?;
        Ok(copy)
    }

    /// Deletes the profile with the given id. Unknown ids are a no-op.
    pub async fn remove(&self, id: &str) -> CoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut profiles = self.load_locked().await?;
        profiles.retain(|p| p.id.as_deref() != Some(id));
        self.save_locked(&profiles).await
    }

    /// Drops the cached symmetric key (test isolation hook).
    pub async fn reset_key_cache(&self) {
        self.key_cache.reset().await;
    }

    async fn load_locked(&self) -> CoreResult<Vec<ConnectionProfile>> {
        if !self.file.exists().await? {
            return Ok(Vec::new());
        }

        let text = self.file.read().await?;
        if crypto::is_encrypted(&text) {
            let key = self.key_cache.get(self.secrets.as_ref()).await?;
            let plaintext = crypto::decrypt(&text, &key)?;
            return parse_profiles(&plaintext);
        }

        // Legacy plaintext file: upgrade in place on first successful read.
        let profiles = parse_profiles(&text)?;
        log::info!(
            "migrating {} plaintext connection profiles to encrypted storage",
            profiles.len()
        );
        self.save_locked(&profiles).await?;
        Ok(profiles)
    }

    async fn save_locked(&self, profiles: &[ConnectionProfile]) -> CoreResult<()> {
        ensure_unique_ids(profiles)?;

        let key = self.key_cache.get(self.secrets.as_ref()).await?;
        let json = serde_json::to_string(profiles)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        let payload = crypto::encrypt(&json, &key)?;
        self.file.write(&payload).await?;

        log::info!("saved {} connection profiles", profiles.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_store, MemoryProfileFile, MockSecretStore, TEST_KEY_HEX};
    use querydock_driver::{DriverKind, DriverOpts};

    fn profile(id: Option<&str>, name: &str) -> ConnectionProfile {
        ConnectionProfile {
            id: id.map(str::to_string),
            name: name.to_string(),
            driver_name: Some(DriverKind::Sqlite),
            ..ConnectionProfile::default()
        }
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_list() {
        let (store, _file) = create_test_store();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (store, file) = create_test_store();
        let profiles = vec![
            ConnectionProfile {
                id: Some("p1".to_string()),
                name: "データベース".to_string(),
                driver_name: Some(DriverKind::Mysql),
                driver_opts: DriverOpts::default(),
                ..ConnectionProfile::default()
            },
            profile(Some("p2"), "local"),
        ];

        store.save(&profiles).await.unwrap();
        assert_eq!(store.load().await.unwrap(), profiles);

        // the raw file is an encrypted envelope, not plaintext
        let raw = file.raw().await.expect("file written");
        assert!(crypto::is_encrypted(&raw));
        assert!(!raw.contains("データベース"));
    }

    #[tokio::test]
    async fn legacy_plaintext_list_migrates_on_load() {
        let (store, file) = create_test_store();
        file.seed(r#"[{"id":"a","name":"x"}]"#).await;

        let profiles = store.load().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].id.as_deref(), Some("a"));
        assert_eq!(profiles[0].name, "x");

        let raw = file.raw().await.expect("file rewritten");
        assert!(crypto::is_encrypted(&raw));

        // and the upgraded file still loads
        assert_eq!(store.load().await.unwrap(), profiles);
    }

    #[tokio::test]
    async fn integrity_failure_is_never_swallowed() {
        let (store, file) = create_test_store();
        store.save(&[profile(Some("a"), "x")]).await.unwrap();

        let raw = file.raw().await.expect("file written");
        let tampered = raw.replacen("\"ciphertext\":\"", "\"ciphertext\":\"00", 1);
        file.seed(&tampered).await;

        assert!(matches!(
            store.load().await.unwrap_err(),
            CoreError::Integrity
        ));
    }

    #[tokio::test]
    async fn key_unavailable_is_fatal_to_save_and_migration() {
        let file = Arc::new(MemoryProfileFile::new());
        let store = FavoritesStore::new(
            file.clone(),
            Arc::new(MockSecretStore::failing("keychain locked")),
        );

        assert!(matches!(
            store.save(&[]).await.unwrap_err(),
            CoreError::KeyUnavailable(_)
        ));

        // legacy migration must not silently fall back to plaintext
        file.seed(r#"[{"id":"a","name":"x"}]"#).await;
        assert!(matches!(
            store.load().await.unwrap_err(),
            CoreError::KeyUnavailable(_)
        ));
        assert_eq!(file.raw().await.as_deref(), Some(r#"[{"id":"a","name":"x"}]"#));
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let (store, _file) = create_test_store();
        let err = store
            .save(&[profile(Some("a"), "x"), profile(Some("a"), "y")])
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn add_assigns_an_id_once() {
        let (store, _file) = create_test_store();
        let stored = store.add(profile(None, "new one")).await.unwrap();
        let id = stored.id.clone().expect("id assigned");

        let listed = store.load().await.unwrap();
        assert_eq!(listed, vec![stored]);

        // ids are stable across subsequent saves
        store.save(&listed).await.unwrap();
        assert_eq!(store.load().await.unwrap()[0].id.as_ref(), Some(&id));
    }

    #[tokio::test]
    async fn duplicate_copies_next_to_original() {
        let (store, _file) = create_test_store();
        store
            .save(&[profile(Some("a"), "prod"), profile(Some("b"), "staging")])
            .await
            .unwrap();

        let copy = store.duplicate("a").await.unwrap();
        assert_eq!(copy.name, "prod - Copy");
        assert_ne!(copy.id.as_deref(), Some("a"));

        let listed = store.load().await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[1], copy);
        assert_eq!(listed[2].id.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn update_and_remove_rewrite_the_whole_list() {
        let (store, _file) = create_test_store();
        store
            .save(&[profile(Some("a"), "prod"), profile(Some("b"), "staging")])
            .await
            .unwrap();

        let mut edited = profile(Some("a"), "production");
        edited.color = Some("#ff0000".to_string());
        store.update(&edited).await.unwrap();

        store.remove("b").await.unwrap();
        let listed = store.load().await.unwrap();
        assert_eq!(listed, vec![edited]);

        // removing an unknown id is a no-op
        store.remove("nope").await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_unknown_profile_is_a_validation_error() {
        let (store, _file) = create_test_store();
        let err = store.update(&profile(Some("ghost"), "x")).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn concurrent_saves_serialize() {
        let (store, file) = create_test_store();
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add(profile(None, &format!("fav-{i}"))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // every addition survived: no interleaved full-list overwrite lost
        assert_eq!(store.load().await.unwrap().len(), 8);
        assert!(crypto::is_encrypted(&file.raw().await.expect("written")));
    }

    #[tokio::test]
    async fn reset_key_cache_refetches() {
        let file = Arc::new(MemoryProfileFile::new());
        let secrets = Arc::new(MockSecretStore::with_key(TEST_KEY_HEX));
        let store = FavoritesStore::new(file, secrets.clone());

        store.save(&[]).await.unwrap();
        store.save(&[]).await.unwrap();
        assert_eq!(secrets.fetch_count(), 1);

        store.reset_key_cache().await;
        store.load().await.unwrap();
        assert_eq!(secrets.fetch_count(), 2);
    }
}
