use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::filters::{self, FilterOptions, Filters};
use crate::models::{Comment, Complaint, NewComplaint, Status, User};
use crate::permissions::Permission;
use crate::storage::Storage;

// Mutations change nothing and return Ok(false) or Ok(None) when the user,
// the complaint or the permission is missing.
pub struct ComplaintStore {
    storage: Storage,
    complaints: Vec<Complaint>,
    filtered: Vec<Complaint>,
    current_user: Option<User>,
    filters: Filters,
}

impl ComplaintStore {
    pub fn open(storage: Storage) -> Result<Self> {
        storage.initialize().context("Failed to initialize storage")?;
        let current_user = storage.load_current_user()?;
        let mut store = ComplaintStore {
            storage,
            complaints: Vec::new(),
            filtered: Vec::new(),
            current_user,
            filters: Filters::default(),
        };
        store.refresh()?;
        Ok(store)
    }

    pub fn complaints(&self) -> &[Complaint] {
        &self.complaints
    }

    pub fn filtered(&self) -> &[Complaint] {
        &self.filtered
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn complaint(&self, id: &str) -> Option<&Complaint> {
        self.complaints.iter().find(|c| c.id == id)
    }

    pub fn filter_options(&self) -> FilterOptions {
        filters::options(&self.complaints)
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.storage.load_users()
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.apply_filters();
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.complaints = self.storage.load()?;
        self.apply_filters();
        Ok(())
    }

    fn apply_filters(&mut self) {
        self.filtered = self.filters.apply(&self.complaints);
    }

    /// Switches the current user to a seeded user. Returns false when no
    /// user has that id.
    pub fn login(&mut self, user_id: &str) -> Result<bool> {
        let user = match self.users()?.into_iter().find(|u| u.id == user_id) {
            Some(u) => u,
            None => {
                tracing::debug!(user_id, "login: unknown user");
                return Ok(false);
            }
        };
        self.storage.set_current_user(&user)?;
        tracing::info!(user_id, admin = user.is_admin, "logged in");
        self.current_user = Some(user);
        Ok(true)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.storage.clear_current_user()?;
        self.current_user = None;
        Ok(())
    }

    fn actor(&self, permission: Permission, op: &str) -> Option<User> {
        match &self.current_user {
            None => {
                tracing::debug!(op, "no current user");
                None
            }
            Some(user) if !user.can(permission) => {
                tracing::debug!(op, user_id = %user.id, ?permission, "permission denied");
                None
            }
            Some(user) => Some(user.clone()),
        }
    }

    pub fn add_complaint(&mut self, data: NewComplaint) -> Result<Option<String>> {
        let Some(user) = self.actor(Permission::PostComplaint, "add_complaint") else {
            return Ok(None);
        };

        let now = Utc::now();
        let id = unique_id("complaint", now, |id| {
            self.complaints.iter().any(|c| c.id == id)
        });
        let complaint = Complaint {
            id: id.clone(),
            title: data.title,
            description: data.description,
            city: data.city,
            category: data.category,
            kind: data.kind,
            status: Status::Awaiting,
            images: data.images,
            user_id: user.id,
            user_name: user.name,
            user_avatar: user.avatar,
            date: now,
            likes: Vec::new(),
            comments: Vec::new(),
            location: data.location,
            response: None,
        };

        self.storage.save(&complaint)?;
        tracing::info!(id = %id, "complaint added");
        self.refresh()?;
        Ok(Some(id))
    }

    pub fn like_complaint(&mut self, id: &str) -> Result<bool> {
        let Some(user) = self.actor(Permission::Like, "like_complaint") else {
            return Ok(false);
        };
        let found = self.storage.like(id, &user.id)?;
        self.refresh()?;
        Ok(found)
    }

    pub fn add_comment(&mut self, id: &str, text: &str) -> Result<bool> {
        let Some(user) = self.actor(Permission::Comment, "add_comment") else {
            return Ok(false);
        };

        let now = Utc::now();
        let existing: Vec<&str> = self
            .complaints
            .iter()
            .flat_map(|c| c.comments.iter().map(|cm| cm.id.as_str()))
            .collect();
        let comment_id = unique_id("comment", now, |cid| existing.contains(&cid));
        let comment = Comment {
            id: comment_id,
            user_id: user.id,
            user_name: user.name,
            user_avatar: user.avatar,
            text: text.to_string(),
            date: now,
        };

        let found = self.storage.add_comment(id, comment)?;
        self.refresh()?;
        Ok(found)
    }

    pub fn respond_to_complaint(&mut self, id: &str, text: &str) -> Result<bool> {
        let Some(admin) = self.actor(Permission::Respond, "respond_to_complaint") else {
            return Ok(false);
        };
        let found = self.storage.respond(id, text, &admin.name, Utc::now())?;
        self.refresh()?;
        Ok(found)
    }

    pub fn update_complaint_status(&mut self, id: &str, status: Status) -> Result<bool> {
        if self
            .actor(Permission::ChangeStatus, "update_complaint_status")
            .is_none()
        {
            return Ok(false);
        }
        let found = self.storage.update_status(id, status)?;
        self.refresh()?;
        Ok(found)
    }

    pub fn delete_complaint(&mut self, id: &str) -> Result<bool> {
        let Some(user) = self.actor(Permission::DeleteOwn, "delete_complaint") else {
            return Ok(false);
        };
        let owned = match self.storage.get(id)? {
            Some(c) => user.can_delete(&c),
            None => {
                tracing::debug!(id, "delete: complaint not found");
                false
            }
        };
        if !owned {
            tracing::debug!(id, user_id = %user.id, "delete: not the author");
            return Ok(false);
        }

        let removed = self.storage.delete(id)?;
        tracing::info!(id, "complaint deleted");
        self.refresh()?;
        Ok(removed)
    }
}

fn unique_id<F>(prefix: &str, now: DateTime<Utc>, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut millis = now.timestamp_millis();
    loop {
        let id = format!("{}-{}", prefix, millis);
        if !taken(&id) {
            return id;
        }
        millis += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::seed;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    const ADMIN_ID: &str = "user-admin-1";
    const CITIZEN_ID: &str = "user-1";

    fn setup_test_store() -> (ComplaintStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = Storage::new(Database::open(&db_path).unwrap());
        let data = seed::generate(&mut StdRng::seed_from_u64(11), Utc::now());
        storage.write_seed(&data).unwrap();
        let store = ComplaintStore::open(storage).unwrap();
        (store, dir)
    }

    fn new_complaint(title: &str) -> NewComplaint {
        NewComplaint {
            title: title.to_string(),
            description: "Poste apagado há semanas".to_string(),
            city: "Curitiba".to_string(),
            category: "Infraestrutura".to_string(),
            kind: "Iluminação Pública".to_string(),
            images: vec!["/foto.jpg".to_string()],
            location: None,
        }
    }

    #[test]
    fn test_open_loads_seeded_state() {
        let (store, _dir) = setup_test_store();
        assert_eq!(store.complaints().len(), seed::COMPLAINT_COUNT);
        assert_eq!(store.filtered().len(), seed::COMPLAINT_COUNT);
        assert_eq!(store.current_user().unwrap().id, CITIZEN_ID);
    }

    #[test]
    fn test_open_empty_database_seeds() {
        let storage = Storage::new(Database::open_in_memory().unwrap());
        let store = ComplaintStore::open(storage).unwrap();
        assert_eq!(store.complaints().len(), seed::COMPLAINT_COUNT);
    }

    #[test]
    fn test_add_complaint_defaults() {
        let (mut store, _dir) = setup_test_store();
        let id = store.add_complaint(new_complaint("Poste apagado")).unwrap().unwrap();

        let c = store.complaint(&id).unwrap();
        assert!(id.starts_with("complaint-"));
        assert_eq!(c.status, Status::Awaiting);
        assert!(c.likes.is_empty());
        assert!(c.comments.is_empty());
        assert!(c.response.is_none());
        assert_eq!(c.user_id, CITIZEN_ID);
        assert_eq!(c.user_name, "Usuário Teste");
        assert_eq!(store.complaints().len(), seed::COMPLAINT_COUNT + 1);
    }

    #[test]
    fn test_add_complaint_ids_are_unique() {
        let (mut store, _dir) = setup_test_store();
        let a = store.add_complaint(new_complaint("A")).unwrap().unwrap();
        let b = store.add_complaint(new_complaint("B")).unwrap().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_complaint_requires_user() {
        let (mut store, _dir) = setup_test_store();
        store.logout().unwrap();
        assert_eq!(store.add_complaint(new_complaint("X")).unwrap(), None);
        assert_eq!(store.complaints().len(), seed::COMPLAINT_COUNT);
    }

    #[test]
    fn test_like_twice_unlikes() {
        let (mut store, _dir) = setup_test_store();
        assert!(store.like_complaint("complaint-1").unwrap());
        assert!(store.complaint("complaint-1").unwrap().is_liked_by(CITIZEN_ID));
        assert!(store.like_complaint("complaint-1").unwrap());
        assert!(!store.complaint("complaint-1").unwrap().is_liked_by(CITIZEN_ID));
    }

    #[test]
    fn test_like_without_user_is_noop() {
        let (mut store, _dir) = setup_test_store();
        store.logout().unwrap();
        let before = store.complaints().to_vec();
        assert!(!store.like_complaint("complaint-1").unwrap());
        assert_eq!(store.complaints(), before.as_slice());
    }

    #[test]
    fn test_like_missing_complaint_is_noop() {
        let (mut store, _dir) = setup_test_store();
        assert!(!store.like_complaint("complaint-999").unwrap());
    }

    #[test]
    fn test_add_comment_appends_in_order() {
        let (mut store, _dir) = setup_test_store();
        let before = store.complaint("complaint-3").unwrap().comments.len();
        assert!(store.add_comment("complaint-3", "Primeiro").unwrap());
        assert!(store.add_comment("complaint-3", "Segundo").unwrap());

        let comments = &store.complaint("complaint-3").unwrap().comments;
        assert_eq!(comments.len(), before + 2);
        assert_eq!(comments[before].text, "Primeiro");
        assert_eq!(comments[before + 1].text, "Segundo");
        assert_eq!(comments[before].user_id, CITIZEN_ID);
        assert_ne!(comments[before].id, comments[before + 1].id);
    }

    #[test]
    fn test_add_comment_without_user_is_noop() {
        let (mut store, _dir) = setup_test_store();
        store.logout().unwrap();
        let before = store.complaint("complaint-3").unwrap().comments.len();
        assert!(!store.add_comment("complaint-3", "Oi").unwrap());
        assert_eq!(store.complaint("complaint-3").unwrap().comments.len(), before);
    }

    #[test]
    fn test_respond_requires_admin() {
        let (mut store, _dir) = setup_test_store();
        let before = store.complaint("complaint-2").unwrap().clone();
        assert!(!store.respond_to_complaint("complaint-2", "Vamos ver").unwrap());
        assert_eq!(store.complaint("complaint-2").unwrap(), &before);
    }

    #[test]
    fn test_respond_promotes_awaiting() {
        let (mut store, _dir) = setup_test_store();
        let id = store.add_complaint(new_complaint("Nova")).unwrap().unwrap();
        store.login(ADMIN_ID).unwrap();

        assert!(store.respond_to_complaint(&id, "Equipe enviada").unwrap());
        let c = store.complaint(&id).unwrap();
        assert_eq!(c.status, Status::InProgress);
        let response = c.response.as_ref().unwrap();
        assert_eq!(response.text, "Equipe enviada");
        assert_eq!(response.admin_name, "Admin Principal");
    }

    #[test]
    fn test_respond_keeps_non_awaiting_status() {
        let (mut store, _dir) = setup_test_store();
        store.login(ADMIN_ID).unwrap();
        for status in [Status::InProgress, Status::Resolved] {
            store.update_complaint_status("complaint-4", status).unwrap();
            assert!(store.respond_to_complaint("complaint-4", "Atualização").unwrap());
            let c = store.complaint("complaint-4").unwrap();
            assert_eq!(c.status, status);
            assert_eq!(c.response.as_ref().unwrap().text, "Atualização");
        }
    }

    #[test]
    fn test_update_status_any_transition() {
        let (mut store, _dir) = setup_test_store();
        store.login(ADMIN_ID).unwrap();
        for status in [Status::Resolved, Status::Awaiting, Status::InProgress, Status::Resolved] {
            assert!(store.update_complaint_status("complaint-6", status).unwrap());
            assert_eq!(store.complaint("complaint-6").unwrap().status, status);
        }
    }

    #[test]
    fn test_update_status_requires_admin() {
        let (mut store, _dir) = setup_test_store();
        let before = store.complaint("complaint-6").unwrap().status;
        let target = if before == Status::Resolved {
            Status::Awaiting
        } else {
            Status::Resolved
        };
        assert!(!store.update_complaint_status("complaint-6", target).unwrap());
        assert_eq!(store.complaint("complaint-6").unwrap().status, before);
    }

    #[test]
    fn test_delete_by_owner() {
        let (mut store, _dir) = setup_test_store();
        let id = store.add_complaint(new_complaint("Minha")).unwrap().unwrap();
        let before = store.complaints().len();

        assert!(store.delete_complaint(&id).unwrap());
        assert_eq!(store.complaints().len(), before - 1);
        assert!(store.complaint(&id).is_none());
    }

    #[test]
    fn test_delete_by_non_owner_is_noop() {
        let (mut store, _dir) = setup_test_store();
        let id = store.add_complaint(new_complaint("Minha")).unwrap().unwrap();
        store.login(ADMIN_ID).unwrap();
        let before = store.complaints().to_vec();

        assert!(!store.delete_complaint(&id).unwrap());
        assert_eq!(store.complaints(), before.as_slice());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let (mut store, _dir) = setup_test_store();
        assert!(!store.delete_complaint("complaint-999").unwrap());
        assert_eq!(store.complaints().len(), seed::COMPLAINT_COUNT);
    }

    #[test]
    fn test_filters_recomputed_on_change() {
        let (mut store, _dir) = setup_test_store();
        store.set_filters(Filters {
            status: "Resolvido".to_string(),
            ..Default::default()
        });
        let resolved = store
            .complaints()
            .iter()
            .filter(|c| c.status == Status::Resolved)
            .count();
        assert_eq!(store.filtered().len(), resolved);

        // A mutation refreshes the filtered view
        store.login(ADMIN_ID).unwrap();
        let pending = store
            .complaints()
            .iter()
            .find(|c| c.status != Status::Resolved)
            .map(|c| c.id.clone())
            .unwrap();
        store.update_complaint_status(&pending, Status::Resolved).unwrap();
        assert_eq!(store.filtered().len(), resolved + 1);
    }

    #[test]
    fn test_login_unknown_user() {
        let (mut store, _dir) = setup_test_store();
        assert!(!store.login("user-ghost").unwrap());
        assert_eq!(store.current_user().unwrap().id, CITIZEN_ID);
    }

    #[test]
    fn test_login_persists_across_open() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        {
            let storage = Storage::new(Database::open(&db_path).unwrap());
            let mut store = ComplaintStore::open(storage).unwrap();
            store.login(ADMIN_ID).unwrap();
        }
        let storage = Storage::new(Database::open(&db_path).unwrap());
        let store = ComplaintStore::open(storage).unwrap();
        assert!(store.current_user().unwrap().is_admin);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_like_sequence_has_no_duplicates(
            ops in proptest::collection::vec((0usize..3, 1usize..6), 0..12)
        ) {
            let (mut store, _dir) = setup_test_store();
            let users = [CITIZEN_ID, ADMIN_ID, "user-3"];
            for (u, c) in ops {
                store.login(users[u]).unwrap();
                store.like_complaint(&format!("complaint-{}", c)).unwrap();
            }
            for c in store.complaints() {
                let mut likes = c.likes.clone();
                likes.sort();
                likes.dedup();
                prop_assert_eq!(likes.len(), c.likes.len());
            }
        }
    }
}
