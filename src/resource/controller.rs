//! Generic CRUD controller.
//!
//! The held collection is always the last list the server returned. Mutations
//! never patch it: a successful create/update/delete must be followed by
//! [`ResourceController::list`], which [`ResourceController::commit`] does
//! for you.

use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::Resource;
use crate::api::{AdminApi, CallContext};
use crate::error::{ConsoleError, ConsoleResult};
use crate::session::SessionContext;

/// Server-confirmed snapshot of one resource collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<R> {
    pub items: Vec<R>,
    /// Number of successful `list()` calls that produced this snapshot
    pub revision: u64,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            revision: 0,
        }
    }
}

impl<R: Resource> Collection<R> {
    pub fn find(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True until the first successful `list()`
    pub fn is_unloaded(&self) -> bool {
        self.revision == 0
    }
}

/// A single write against the server.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<R> {
    Create(R),
    Update { id: String, record: R },
    Delete { id: String },
}

/// CRUD over one resource kind.
pub struct ResourceController<R: Resource> {
    api: Arc<dyn AdminApi>,
    collection: RwLock<Collection<R>>,
    _kind: PhantomData<R>,
}

impl<R: Resource> ResourceController<R> {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            collection: RwLock::new(Collection::default()),
            _kind: PhantomData,
        }
    }

    /// Last snapshot returned by `list()`.
    pub async fn collection(&self) -> Collection<R> {
        self.collection.read().await.clone()
    }

    /// Fetch the full collection and replace the held snapshot with it.
    /// Order is whatever the server returns.
    pub async fn list(
        &self,
        session: &SessionContext,
        ctx: &CallContext,
    ) -> ConsoleResult<Collection<R>> {
        let raw = self
            .api
            .list(R::KIND, session.token(), ctx)
            .await
            .map_err(|e| {
                warn!(kind = %R::KIND, error = %e, "List failed");
                ConsoleError::from(e)
            })?;

        let mut items = Vec::with_capacity(raw.len());
        for value in raw {
            let item = serde_json::from_value::<R>(value).map_err(|e| {
                warn!(kind = %R::KIND, error = %e, "Undecodable record in list");
                ConsoleError::Network(format!("invalid {} record: {}", R::KIND.label(), e))
            })?;
            items.push(item);
        }

        let mut collection = self.collection.write().await;
        let revision = collection.revision + 1;
        *collection = Collection { items, revision };
        debug!(kind = %R::KIND, count = collection.len(), "Collection refreshed");
        Ok(collection.clone())
    }

    /// Submit a new record. Does not touch the held collection.
    pub async fn create(
        &self,
        session: &SessionContext,
        draft: &R,
        ctx: &CallContext,
    ) -> ConsoleResult<Option<String>> {
        let body = to_body(draft)?;
        let ack = self
            .api
            .create(R::KIND, session.token(), &body, ctx)
            .await?;
        info!(kind = %R::KIND, id = ?ack.id, "Record created");
        Ok(ack.id)
    }

    /// Replace record `id` with `draft`. Does not touch the held collection.
    pub async fn update(
        &self,
        session: &SessionContext,
        id: &str,
        draft: &R,
        ctx: &CallContext,
    ) -> ConsoleResult<()> {
        let body = to_body(draft)?;
        self.api
            .update(R::KIND, id, session.token(), &body, ctx)
            .await?;
        info!(kind = %R::KIND, id, "Record updated");
        Ok(())
    }

    /// Delete record `id`. Confirmation is the caller's job.
    pub async fn delete(
        &self,
        session: &SessionContext,
        id: &str,
        ctx: &CallContext,
    ) -> ConsoleResult<()> {
        self.api.delete(R::KIND, id, session.token(), ctx).await?;
        info!(kind = %R::KIND, id, "Record deleted");
        Ok(())
    }

    /// Run `mutation`, then refetch. A failed mutation returns the error and
    /// leaves the held collection exactly as it was.
    pub async fn commit(
        &self,
        session: &SessionContext,
        mutation: Mutation<R>,
        ctx: &CallContext,
    ) -> ConsoleResult<Collection<R>> {
        match &mutation {
            Mutation::Create(record) => {
                self.create(session, record, ctx).await?;
            }
            Mutation::Update { id, record } => self.update(session, id, record, ctx).await?,
            Mutation::Delete { id } => self.delete(session, id, ctx).await?,
        }
        self.list(session, ctx).await
    }
}

fn to_body<R: Resource>(record: &R) -> ConsoleResult<serde_json::Value> {
    serde_json::to_value(record)
        .map_err(|e| ConsoleError::Network(format!("could not encode {}: {}", R::KIND.label(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;
    use crate::testing::{member, FakeAdminApi};
    use oscode_records::{ContactMessage, TeamMember};
    use std::time::Duration;

    fn ctx() -> CallContext {
        CallContext::new(Duration::from_secs(5))
    }

    async fn setup() -> (Arc<FakeAdminApi>, ResourceController<TeamMember>, SessionContext) {
        let fake = Arc::new(FakeAdminApi::new());
        let session = fake.open_session("admin").await;
        let controller = ResourceController::<TeamMember>::new(fake.clone());
        (fake, controller, session)
    }

    #[tokio::test]
    async fn test_list_replaces_snapshot() {
        let (fake, controller, session) = setup().await;
        fake.seed(ResourceKind::TeamMember, vec![member("A"), member("B")]).await;

        let first = controller.list(&session, &ctx()).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first.revision, 1);

        fake.seed(ResourceKind::TeamMember, vec![member("C")]).await;
        let second = controller.list(&session, &ctx()).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second.items[0].name, "C");
        assert_eq!(controller.collection().await, second);
    }

    #[tokio::test]
    async fn test_list_accepts_null_optional_fields() {
        let (fake, controller, session) = setup().await;
        fake.seed(
            ResourceKind::TeamMember,
            vec![serde_json::json!({
                "name": "A",
                "role": "Member",
                "year": "1st Year",
                "department": "CSE",
                "bio": "bio",
                "image_url": null,
                "linkedin_url": null,
                "github_url": null,
                "email": null
            })],
        )
        .await;

        let listed = controller.list(&session, &ctx()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.items[0].linkedin_url, "");
        assert_eq!(listed.items[0].email, "");
        assert!(listed.items[0].image_url.is_none());
    }

    #[tokio::test]
    async fn test_create_does_not_touch_snapshot() {
        let (_fake, controller, session) = setup().await;
        controller.list(&session, &ctx()).await.unwrap();

        let id = controller
            .create(&session, &member("A"), &ctx())
            .await
            .unwrap();
        assert!(id.is_some());
        assert!(controller.collection().await.is_empty());

        let refreshed = controller.list(&session, &ctx()).await.unwrap();
        assert_eq!(refreshed.len(), 1);
        assert_eq!(refreshed.items[0].id.as_deref(), id.as_deref());
    }

    #[tokio::test]
    async fn test_commit_sequence_matches_server() {
        let (fake, controller, session) = setup().await;

        controller
            .commit(&session, Mutation::Create(member("A")), &ctx())
            .await
            .unwrap();
        let after_b = controller
            .commit(&session, Mutation::Create(member("B")), &ctx())
            .await
            .unwrap();
        let a_id = after_b.items[0].id.clone().unwrap();

        let mut renamed = after_b.items[0].clone();
        renamed.name = "A2".to_string();
        controller
            .commit(
                &session,
                Mutation::Update {
                    id: a_id.clone(),
                    record: renamed,
                },
                &ctx(),
            )
            .await
            .unwrap();
        let last = controller
            .commit(&session, Mutation::Delete { id: a_id }, &ctx())
            .await
            .unwrap();

        let server: Vec<TeamMember> = fake.records(ResourceKind::TeamMember).await;
        assert_eq!(last.items, server);
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].name, "B");
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_prior_list() {
        let (fake, controller, session) = setup().await;
        fake.seed(ResourceKind::TeamMember, vec![member("A")]).await;
        let before = controller.list(&session, &ctx()).await.unwrap();

        let lists_before = fake.calls("list").await;
        let result = controller
            .commit(
                &session,
                Mutation::Delete {
                    id: "missing".to_string(),
                },
                &ctx(),
            )
            .await;

        assert!(matches!(result, Err(ConsoleError::Network(_))));
        assert_eq!(controller.collection().await, before);
        assert_eq!(fake.calls("list").await, lists_before, "no refetch after failure");
    }

    #[tokio::test]
    async fn test_expired_session_is_auth_error() {
        let (fake, controller, session) = setup().await;
        fake.expire_all().await;

        let err = controller.list(&session, &ctx()).await.unwrap_err();
        assert!(err.is_auth());
        assert!(controller.collection().await.is_unloaded());
    }

    #[tokio::test]
    async fn test_contact_messages_list_and_delete() {
        let fake = Arc::new(FakeAdminApi::new());
        let session = fake.open_session("admin").await;
        fake.seed(
            ResourceKind::ContactMessage,
            vec![ContactMessage {
                name: "Grace".to_string(),
                email: "grace@example.org".to_string(),
                subject: "Hi".to_string(),
                message: "Hello".to_string(),
                ..Default::default()
            }],
        )
        .await;

        let controller = ResourceController::<ContactMessage>::new(fake.clone());
        let listed = controller.list(&session, &ctx()).await.unwrap();
        let id = listed.items[0].id.clone().unwrap();

        let after = controller
            .commit(&session, Mutation::Delete { id: id.clone() }, &ctx())
            .await
            .unwrap();
        assert!(after.find(&id).is_none());
        assert!(after.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_call_is_reported() {
        let (_fake, controller, session) = setup().await;
        let ctx = ctx();
        ctx.cancel.cancel();

        let err = controller.list(&session, &ctx).await.unwrap_err();
        assert_eq!(err, ConsoleError::Cancelled);
    }
}
