//! Process-local adapters for running without PostgreSQL.
//!
//! [`InMemoryStore`] implements every repository port over a single mutex so
//! cross-entity rules (unique emails, cascading label links) behave like the
//! database schema. State is lost on restart.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AuthTokenRepository, AuthTokenRepositoryError, ImageStore, ImageStoreError, LabelRepository,
    LabelRepositoryError, RecipeRepository, RecipeRepositoryError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Email, Label, LabelId, LabelKind, LabelName, NewLabel, Recipe, RecipeDraft, RecipeFilter,
    RecipeId, TokenDigest, User, UserId, sort_for_listing,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Clone)]
struct StoredRecipe {
    owner: UserId,
    draft: RecipeDraft,
    image: Option<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    tokens: HashMap<String, UserId>,
    labels: BTreeMap<(LabelKind, LabelId), Label>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    last_tag_id: i64,
    last_ingredient_id: i64,
    last_recipe_id: i64,
}

impl MemoryState {
    fn next_label_id(&mut self, kind: LabelKind) -> LabelId {
        let counter = match kind {
            LabelKind::Tag => &mut self.last_tag_id,
            LabelKind::Ingredient => &mut self.last_ingredient_id,
        };
        *counter += 1;
        LabelId::new(*counter)
    }

    /// Linked labels in ascending id order, matching the Diesel adapter.
    fn resolve_labels(&self, kind: LabelKind, ids: &[LabelId]) -> Vec<Label> {
        let mut labels: Vec<Label> = ids
            .iter()
            .filter_map(|id| self.labels.get(&(kind, *id)).cloned())
            .collect();
        labels.sort_by_key(Label::id);
        labels
    }

    fn resolve(&self, id: RecipeId, stored: &StoredRecipe) -> Recipe {
        let draft = &stored.draft;
        Recipe {
            id,
            owner: stored.owner,
            title: draft.title.clone(),
            time_minutes: draft.time_minutes,
            price: draft.price,
            link: draft.link.clone(),
            image: stored.image.clone(),
            tags: self.resolve_labels(LabelKind::Tag, &draft.tags),
            ingredients: self.resolve_labels(LabelKind::Ingredient, &draft.ingredients),
        }
    }

    fn owned_recipe(&self, owner: &UserId, id: RecipeId) -> Option<Recipe> {
        self.recipes
            .get(&id)
            .filter(|stored| stored.owner == *owner)
            .map(|stored| self.resolve(id, stored))
    }

    fn is_assigned(&self, kind: LabelKind, id: LabelId) -> bool {
        self.recipes.values().any(|stored| match kind {
            LabelKind::Tag => stored.draft.tags.contains(&id),
            LabelKind::Ingredient => stored.draft.ingredients.contains(&id),
        })
    }

    fn email_taken(&self, email: &Email, except: Option<&UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email() == email && Some(user.id()) != except)
    }
}

fn dedup(ids: &[LabelId]) -> Vec<LabelId> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

fn normalized(draft: &RecipeDraft) -> RecipeDraft {
    let mut draft = draft.clone();
    draft.tags = dedup(&draft.tags);
    draft.ingredients = dedup(&draft.ingredients);
    draft
}

/// Thread-safe in-memory implementation of all repository ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, String> {
        self.state.lock().map_err(|_| POISONED.to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.email_taken(user.email(), None) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.email_taken(user.email(), Some(user.id())) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        match state.users.get_mut(user.id()) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user not found for update")),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryStore {
    async fn store(
        &self,
        user: &UserId,
        digest: &TokenDigest,
    ) -> Result<(), AuthTokenRepositoryError> {
        let mut state = self.lock().map_err(AuthTokenRepositoryError::query)?;
        state.tokens.insert(digest.as_str().to_owned(), *user);
        Ok(())
    }

    async fn find_user(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, AuthTokenRepositoryError> {
        let state = self.lock().map_err(AuthTokenRepositoryError::query)?;
        Ok(state.tokens.get(digest.as_str()).copied())
    }
}

#[async_trait]
impl LabelRepository for InMemoryStore {
    async fn list(
        &self,
        owner: &UserId,
        kind: LabelKind,
        assigned_only: bool,
    ) -> Result<Vec<Label>, LabelRepositoryError> {
        let state = self.lock().map_err(LabelRepositoryError::query)?;
        let mut labels: Vec<Label> = state
            .labels
            .values()
            .filter(|label| label.kind() == kind && label.owner() == owner)
            .filter(|label| !assigned_only || state.is_assigned(kind, label.id()))
            .cloned()
            .collect();
        sort_for_listing(&mut labels);
        Ok(labels)
    }

    async fn find_many(
        &self,
        owner: &UserId,
        kind: LabelKind,
        ids: &[LabelId],
    ) -> Result<Vec<Label>, LabelRepositoryError> {
        let state = self.lock().map_err(LabelRepositoryError::query)?;
        Ok(state
            .resolve_labels(kind, &dedup(ids))
            .into_iter()
            .filter(|label| label.owner() == owner)
            .collect())
    }

    async fn insert(&self, label: &NewLabel) -> Result<Label, LabelRepositoryError> {
        let mut state = self.lock().map_err(LabelRepositoryError::query)?;
        let id = state.next_label_id(label.kind);
        let created = Label::new(id, label.owner, label.kind, label.name.clone());
        state.labels.insert((label.kind, id), created.clone());
        Ok(created)
    }

    async fn rename(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
        name: &LabelName,
    ) -> Result<Option<Label>, LabelRepositoryError> {
        let mut state = self.lock().map_err(LabelRepositoryError::query)?;
        let Some(existing) = state
            .labels
            .get_mut(&(kind, id))
            .filter(|label| label.owner() == owner)
        else {
            return Ok(None);
        };
        *existing = existing.clone().with_name(name.clone());
        Ok(Some(existing.clone()))
    }

    async fn delete(
        &self,
        owner: &UserId,
        kind: LabelKind,
        id: LabelId,
    ) -> Result<bool, LabelRepositoryError> {
        let mut state = self.lock().map_err(LabelRepositoryError::query)?;
        let owned = state
            .labels
            .get(&(kind, id))
            .is_some_and(|label| label.owner() == owner);
        if !owned {
            return Ok(false);
        }
        state.labels.remove(&(kind, id));
        for stored in state.recipes.values_mut() {
            let links = match kind {
                LabelKind::Tag => &mut stored.draft.tags,
                LabelKind::Ingredient => &mut stored.draft.ingredients,
            };
            links.retain(|linked| *linked != id);
        }
        Ok(true)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::query)?;
        Ok(state
            .recipes
            .iter()
            .rev()
            .filter(|(_, stored)| stored.owner == *owner)
            .map(|(id, stored)| state.resolve(*id, stored))
            .filter(|recipe| filter.matches(recipe))
            .collect())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::query)?;
        Ok(state.owned_recipe(owner, id))
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        state.last_recipe_id += 1;
        let id = RecipeId::new(state.last_recipe_id);
        let stored = StoredRecipe {
            owner: *owner,
            draft: normalized(draft),
            image: None,
        };
        let recipe = state.resolve(id, &stored);
        state.recipes.insert(id, stored);
        Ok(recipe)
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        match state.recipes.get_mut(&id).filter(|s| s.owner == *owner) {
            Some(stored) => stored.draft = normalized(draft),
            None => return Ok(None),
        }
        Ok(state.owned_recipe(owner, id))
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        let owned = state
            .recipes
            .get(&id)
            .is_some_and(|stored| stored.owner == *owner);
        if owned {
            state.recipes.remove(&id);
        }
        Ok(owned)
    }

    async fn set_image(
        &self,
        owner: &UserId,
        id: RecipeId,
        image: &str,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        match state.recipes.get_mut(&id).filter(|s| s.owner == *owner) {
            Some(stored) => stored.image = Some(image.to_owned()),
            None => return Ok(None),
        }
        Ok(state.owned_recipe(owner, id))
    }
}

/// Image store keeping uploads in memory, keyed by relative path.
#[derive(Debug, Default)]
pub struct InMemoryImageStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored at `path`, if any.
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(path).cloned())
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn save(&self, relative_path: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| ImageStoreError::write(POISONED))?;
        files.insert(relative_path.to_owned(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests;
