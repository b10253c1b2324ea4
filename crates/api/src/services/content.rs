//! Read side of the site content, with graceful degradation.
//!
//! A failed read never fails the request: the affected collection comes back
//! empty (or as the sample portfolio, for projects) with a notice.

use std::sync::Arc;

use mhc_core::analytics::{PROJECT_FILTER_USED, PROJECT_MODAL_OPENED, PROJECT_SEARCH};
use mhc_core::catalog::{self, CatalogView, FILTER_ALL};
use mhc_core::content::{
    sample_projects, Award, BlogPost, ClientLogo, Project, TeamMember, AWARD_LIMIT,
    FEATURED_PROJECT_LIMIT,
};
use mhc_core::error::CoreError;
use mhc_events::Analytics;
use mhc_gateway::repositories::ContentRepo;
use mhc_gateway::{DocumentStore, GatewayError};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};

/// Items plus an optional notice explaining why they may be incomplete.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: T,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
    pub projects: Vec<Project>,
    pub filter: String,
    pub page: usize,
    pub total_matching: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

fn unavailable_notice(what: &str) -> String {
    format!("We couldn't load {what} right now. Please try again later.")
}

/// Turn a failed read into an empty listing with a notice.
fn degrade<T>(what: &str, result: Result<Vec<T>, GatewayError>) -> Listing<Vec<T>> {
    match result {
        Ok(items) => Listing {
            items,
            notice: None,
        },
        Err(e) => {
            tracing::warn!(collection = what, error = %e, "Content read failed, serving empty list");
            Listing {
                items: Vec::new(),
                notice: Some(unavailable_notice(what)),
            }
        }
    }
}

pub struct ContentService {
    store: Arc<dyn DocumentStore>,
    analytics: Arc<dyn Analytics>,
    sample_fallback: bool,
}

impl ContentService {
    pub fn new(store: Arc<dyn DocumentStore>, analytics: Arc<dyn Analytics>, sample_fallback: bool) -> Self {
        Self {
            store,
            analytics,
            sample_fallback,
        }
    }

    // -- projects --

    /// Published projects, or the sample portfolio when the store has none
    /// or cannot be reached and the fallback is enabled.
    async fn portfolio(&self) -> Listing<Vec<Project>> {
        let listing = degrade("projects", ContentRepo::published_projects(self.store.as_ref()).await);
        if listing.items.is_empty() && self.sample_fallback {
            tracing::debug!("Serving sample portfolio");
            return Listing {
                items: sample_projects(),
                notice: listing.notice,
            };
        }
        listing
    }

    pub async fn catalog(&self, query: &CatalogQuery) -> Listing<CatalogPage> {
        let Listing { items, notice } = self.portfolio().await;
        let mut view = CatalogView::new(items);

        if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
            view.apply_filter(category);
            if !category.eq_ignore_ascii_case(FILTER_ALL) {
                self.analytics
                    .track(PROJECT_FILTER_USED, json!({ "filter_category": category }));
            }
        }
        if let Some(q) = query.q.as_deref() {
            view.search(q);
            if !q.trim().is_empty() {
                self.analytics.track(
                    PROJECT_SEARCH,
                    json!({ "search_term": q.trim(), "results_count": view.total_matching() }),
                );
            }
        }
        if let Some(page) = query.page {
            view.set_page(page);
        }

        let page = CatalogPage {
            projects: view.visible().into_iter().cloned().collect(),
            filter: view.filter().to_string(),
            page: view.page(),
            total_matching: view.total_matching(),
            total_pages: view.total_pages(),
            has_more: view.has_more(),
        };
        Listing { items: page, notice }
    }

    pub async fn featured(&self) -> Listing<Vec<Project>> {
        let listing = degrade(
            "featured projects",
            ContentRepo::featured_projects(self.store.as_ref(), FEATURED_PROJECT_LIMIT).await,
        );
        if listing.items.is_empty() && self.sample_fallback {
            let samples = sample_projects();
            return Listing {
                items: catalog::featured(&samples, FEATURED_PROJECT_LIMIT)
                    .into_iter()
                    .cloned()
                    .collect(),
                notice: listing.notice,
            };
        }
        listing
    }

    /// Detail for the project modal. Unknown ids are not found.
    pub async fn project(&self, id: &str) -> AppResult<Project> {
        let found = match ContentRepo::project(self.store.as_ref(), id).await {
            Ok(found) => found,
            Err(e) if self.sample_fallback => {
                tracing::warn!(project_id = id, error = %e, "Project read failed, checking samples");
                None
            }
            Err(e) => return Err(e.into()),
        };
        let found = found.or_else(|| {
            self.sample_fallback
                .then(|| CatalogView::new(sample_projects()).find(id).cloned())
                .flatten()
        });

        let project = found.ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Project",
                id: id.to_string(),
            })
        })?;
        self.analytics.track(
            PROJECT_MODAL_OPENED,
            json!({ "project_id": project.id, "project_title": project.title }),
        );
        Ok(project)
    }

    // -- other collections --

    pub async fn blog_posts(&self, limit: usize) -> Listing<Vec<BlogPost>> {
        degrade("blog posts", ContentRepo::latest_blog_posts(self.store.as_ref(), limit).await)
    }

    pub async fn awards(&self) -> Listing<Vec<Award>> {
        degrade("awards", ContentRepo::latest_awards(self.store.as_ref(), AWARD_LIMIT).await)
    }

    pub async fn team_members(&self) -> Listing<Vec<TeamMember>> {
        degrade("team members", ContentRepo::team_members(self.store.as_ref()).await)
    }

    pub async fn client_logos(&self) -> Listing<Vec<ClientLogo>> {
        degrade("client logos", ContentRepo::client_logos(self.store.as_ref()).await)
    }
}

#[cfg(test)]
mod tests {
    use mhc_events::NoopAnalytics;
    use mhc_gateway::MemoryStore;

    use super::*;

    fn service(memory: &Arc<MemoryStore>, sample_fallback: bool) -> ContentService {
        ContentService::new(memory.clone(), Arc::new(NoopAnalytics), sample_fallback)
    }

    #[tokio::test]
    async fn empty_store_serves_samples() {
        let memory = Arc::new(MemoryStore::new());
        let listing = service(&memory, true).catalog(&CatalogQuery::default()).await;
        assert_eq!(listing.items.total_matching, sample_projects().len());
        assert!(listing.notice.is_none());
    }

    #[tokio::test]
    async fn failed_read_without_samples_is_empty_with_notice() {
        let memory = Arc::new(MemoryStore::new());
        memory.set_failing(true);
        let listing = service(&memory, false).catalog(&CatalogQuery::default()).await;
        assert!(listing.items.projects.is_empty());
        assert!(listing.notice.is_some());
    }

    #[tokio::test]
    async fn failed_award_read_degrades() {
        let memory = Arc::new(MemoryStore::new());
        memory.set_failing(true);
        let listing = service(&memory, true).awards().await;
        assert!(listing.items.is_empty());
        assert!(listing.notice.unwrap().contains("awards"));
    }

    #[tokio::test]
    async fn sample_project_detail_is_found_when_fallback_enabled() {
        let memory = Arc::new(MemoryStore::new());
        let content = service(&memory, true);
        assert!(content.project("sample-1").await.is_ok());
        assert!(content.project("missing").await.is_err());
        assert!(service(&memory, false).project("sample-1").await.is_err());
    }
}
