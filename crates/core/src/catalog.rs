//! Project catalog: category filter, text search and "load more" paging.

use crate::content::Project;

/// Filter value that selects every project.
pub const FILTER_ALL: &str = "all";

/// Projects revealed per "load more" step.
pub const PROJECTS_PER_PAGE: usize = 12;

/// Projects whose category equals `category`, ignoring case.
///
/// `"all"` returns the full set. Original order is kept either way.
pub fn filter_by_category<'a>(projects: &'a [Project], category: &str) -> Vec<&'a Project> {
    if category.eq_ignore_ascii_case(FILTER_ALL) {
        return projects.iter().collect();
    }
    projects
        .iter()
        .filter(|p| p.category.eq_ignore_ascii_case(category))
        .collect()
}

/// Case-insensitive substring match over title, description, location and
/// category.
pub fn search<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let needle = query.trim().to_lowercase();
    projects
        .iter()
        .filter(|p| matches_query(p, &needle))
        .collect()
}

fn matches_query(project: &Project, needle: &str) -> bool {
    [
        &project.title,
        &project.description,
        &project.location,
        &project.category,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Paged view over a project list.
///
/// Changing the filter or the search resets paging to the first page.
#[derive(Debug, Clone)]
pub struct CatalogView {
    projects: Vec<Project>,
    matching: Vec<usize>,
    filter: String,
    page: usize,
}

impl CatalogView {
    pub fn new(projects: Vec<Project>) -> Self {
        let matching = (0..projects.len()).collect();
        Self {
            projects,
            matching,
            filter: FILTER_ALL.to_string(),
            page: 1,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn apply_filter(&mut self, category: &str) {
        self.filter = category.to_string();
        self.matching = self.indices(|p| {
            category.eq_ignore_ascii_case(FILTER_ALL) || p.category.eq_ignore_ascii_case(category)
        });
        self.page = 1;
    }

    /// Search the whole catalog. An empty query re-applies the current filter.
    pub fn search(&mut self, query: &str) {
        if query.trim().is_empty() {
            let filter = self.filter.clone();
            self.apply_filter(&filter);
            return;
        }
        let needle = query.trim().to_lowercase();
        self.matching = self.indices(|p| matches_query(p, &needle));
        self.page = 1;
    }

    /// Reveal the next page. Returns `false` when nothing more is left.
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Jump to `page` (1-based), clamped to the available pages.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    /// Matching projects on pages `1..=page`.
    pub fn visible(&self) -> Vec<&Project> {
        self.matching
            .iter()
            .take(self.page * PROJECTS_PER_PAGE)
            .map(|&i| &self.projects[i])
            .collect()
    }

    pub fn total_matching(&self) -> usize {
        self.matching.len()
    }

    pub fn total_pages(&self) -> usize {
        self.matching.len().div_ceil(PROJECTS_PER_PAGE)
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Look up a project in the whole catalog, regardless of filter.
    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn indices(&self, keep: impl Fn(&Project) -> bool) -> Vec<usize> {
        self.projects
            .iter()
            .enumerate()
            .filter(|(_, p)| keep(p))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Up to `limit` featured projects, in catalog order.
pub fn featured(projects: &[Project], limit: usize) -> Vec<&Project> {
    projects.iter().filter(|p| p.featured).take(limit).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
