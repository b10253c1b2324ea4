//! Repository for the publishable site content collections.
//!
//! Public reads only ever return published entries. Admin writes create
//! drafts and flip them to published.

use mhc_core::collections::{AWARDS, BLOG_POSTS, CLIENT_LOGOS, PROJECTS, TEAM_MEMBERS};
use mhc_core::content::{
    Award, BlogPost, BlogPostDraft, ClientLogo, Project, ProjectDraft, PublicationStatus,
    TeamMember, STATUS_FIELD,
};
use mhc_core::types::DocId;
use serde_json::json;

use super::decode_all;
use crate::error::GatewayError;
use crate::query::{to_fields, CollectionQuery, Direction, Fields};
use crate::store::{now_timestamp, DocumentStore, CREATED_AT};

const COMPLETED_DATE: &str = "completedDate";
const PUBLISHED_DATE: &str = "publishedDate";
const FEATURED: &str = "featured";

fn published(collection: &str) -> CollectionQuery {
    CollectionQuery::new(collection).where_eq(STATUS_FIELD, PublicationStatus::Published.as_str())
}

pub struct ContentRepo;

impl ContentRepo {
    // -- Projects --

    /// Every published project, most recently completed first.
    pub async fn published_projects(store: &dyn DocumentStore) -> Result<Vec<Project>, GatewayError> {
        let query = published(PROJECTS).order_by(COMPLETED_DATE, Direction::Descending);
        Ok(decode_all(PROJECTS, store.query(&query).await?))
    }

    pub async fn featured_projects(
        store: &dyn DocumentStore,
        limit: usize,
    ) -> Result<Vec<Project>, GatewayError> {
        let query = published(PROJECTS)
            .where_eq(FEATURED, true)
            .order_by(COMPLETED_DATE, Direction::Descending)
            .limit(limit);
        Ok(decode_all(PROJECTS, store.query(&query).await?))
    }

    /// A single project. Drafts are reported as missing.
    pub async fn project(store: &dyn DocumentStore, id: &str) -> Result<Option<Project>, GatewayError> {
        let Some(doc) = store.get_document(PROJECTS, id).await? else {
            return Ok(None);
        };
        let project: Project = doc.into_typed()?;
        Ok((project.status == PublicationStatus::Published).then_some(project))
    }

    pub async fn create_project_draft(
        store: &dyn DocumentStore,
        draft: &ProjectDraft,
    ) -> Result<DocId, GatewayError> {
        let mut fields = to_fields(draft)?;
        fields.insert(STATUS_FIELD.into(), json!(PublicationStatus::Draft.as_str()));
        let id = store.add_document(PROJECTS, fields).await?;
        tracing::info!(id = %id, "Project draft created");
        Ok(id)
    }

    /// Merge `changes` into a project. The id and status cannot be changed
    /// this way.
    pub async fn update_project(
        store: &dyn DocumentStore,
        id: &str,
        mut changes: Fields,
    ) -> Result<(), GatewayError> {
        changes.remove("id");
        changes.remove(STATUS_FIELD);
        store.update_document(PROJECTS, id, changes).await
    }

    pub async fn publish_project(store: &dyn DocumentStore, id: &str) -> Result<(), GatewayError> {
        let mut fields = Fields::new();
        fields.insert(STATUS_FIELD.into(), json!(PublicationStatus::Published.as_str()));
        store.update_document(PROJECTS, id, fields).await?;
        tracing::info!(id, "Project published");
        Ok(())
    }

    // -- Blog posts --

    pub async fn latest_blog_posts(
        store: &dyn DocumentStore,
        limit: usize,
    ) -> Result<Vec<BlogPost>, GatewayError> {
        let query = published(BLOG_POSTS)
            .order_by(PUBLISHED_DATE, Direction::Descending)
            .limit(limit);
        Ok(decode_all(BLOG_POSTS, store.query(&query).await?))
    }

    pub async fn create_blog_post_draft(
        store: &dyn DocumentStore,
        draft: &BlogPostDraft,
    ) -> Result<DocId, GatewayError> {
        let mut fields = to_fields(draft)?;
        fields.insert(STATUS_FIELD.into(), json!(PublicationStatus::Draft.as_str()));
        let id = store.add_document(BLOG_POSTS, fields).await?;
        tracing::info!(id = %id, "Blog post draft created");
        Ok(id)
    }

    /// Publish a post and stamp its publication date.
    pub async fn publish_blog_post(store: &dyn DocumentStore, id: &str) -> Result<(), GatewayError> {
        let mut fields = Fields::new();
        fields.insert(STATUS_FIELD.into(), json!(PublicationStatus::Published.as_str()));
        fields.insert(PUBLISHED_DATE.into(), now_timestamp());
        store.update_document(BLOG_POSTS, id, fields).await?;
        tracing::info!(id, "Blog post published");
        Ok(())
    }

    // -- About page --

    pub async fn latest_awards(store: &dyn DocumentStore, limit: usize) -> Result<Vec<Award>, GatewayError> {
        let query = CollectionQuery::new(AWARDS)
            .order_by(CREATED_AT, Direction::Descending)
            .limit(limit);
        Ok(decode_all(AWARDS, store.query(&query).await?))
    }

    pub async fn team_members(store: &dyn DocumentStore) -> Result<Vec<TeamMember>, GatewayError> {
        let query = CollectionQuery::new(TEAM_MEMBERS).order_by(CREATED_AT, Direction::Descending);
        Ok(decode_all(TEAM_MEMBERS, store.query(&query).await?))
    }

    pub async fn client_logos(store: &dyn DocumentStore) -> Result<Vec<ClientLogo>, GatewayError> {
        let query = CollectionQuery::new(CLIENT_LOGOS).order_by(CREATED_AT, Direction::Descending);
        Ok(decode_all(CLIENT_LOGOS, store.query(&query).await?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
