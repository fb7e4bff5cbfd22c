//! Browse state for the client-rendered surface
//!
//! Holds what a single-page app keeps in memory instead of the address
//! bar: the view toggle, the active search and the current page.

use crate::dataset::RankingDataset;
use crate::listing::{build_listing, Listing, ListingRequest, View};
use crate::lookup::normalize_query;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseSession {
    view: View,
    page: u64,
    search: Option<String>,
    template: ListingRequest,
}

impl Default for BrowseSession {
    fn default() -> Self {
        Self::new(ListingRequest::default())
    }
}

impl BrowseSession {
    /// Start a session; `template` supplies page size and top count
    pub fn new(template: ListingRequest) -> Self {
        Self {
            view: View::Top10,
            page: 1,
            search: None,
            template,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn active_search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Submit a search. Blank input is rejected and leaves state alone.
    pub fn search(&mut self, query: &str) -> bool {
        match normalize_query(query) {
            Some(q) => {
                self.search = Some(q.to_string());
                self.view = View::Top10;
                true
            }
            None => false,
        }
    }

    pub fn clear_search(&mut self) {
        self.search = None;
    }

    /// Switch view; the paged view always starts from page 1
    pub fn set_view(&mut self, view: View) {
        if view != self.view {
            self.page = 1;
        }
        self.view = view;
    }

    /// Move to `page` if it lies in `1..=total_pages`
    pub fn go_to_page(&mut self, page: u64, total_pages: u64) -> bool {
        if page >= 1 && page <= total_pages {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self, total_pages: u64) -> bool {
        self.page < total_pages && self.go_to_page(self.page + 1, total_pages)
    }

    pub fn previous_page(&mut self, total_pages: u64) -> bool {
        self.page > 1 && self.go_to_page(self.page - 1, total_pages)
    }

    pub fn first_page(&mut self, total_pages: u64) -> bool {
        self.go_to_page(1, total_pages)
    }

    pub fn last_page(&mut self, total_pages: u64) -> bool {
        self.go_to_page(total_pages, total_pages)
    }

    /// The request this session currently represents
    pub fn request(&self) -> ListingRequest {
        ListingRequest {
            page: self.page,
            view: self.view,
            search: self.search.clone().unwrap_or_default(),
            ..self.template.clone()
        }
    }

    pub fn listing(&self, dataset: &RankingDataset) -> Listing {
        build_listing(dataset, &self.request())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeRanking;

    fn dataset(n: usize) -> RankingDataset {
        RankingDataset::from_entries(
            (0..n)
                .map(|i| NodeRanking::new(format!("GNODE{:03}", i), "", None))
                .collect(),
        )
    }

    #[test]
    fn test_search_rejects_blank_and_resets_view() {
        let mut session = BrowseSession::default();
        session.set_view(View::All);
        assert!(!session.search("   "));
        assert_eq!(session.view(), View::All);

        assert!(session.search("  node007 "));
        assert_eq!(session.active_search(), Some("node007"));
        assert_eq!(session.view(), View::Top10);

        session.clear_search();
        assert_eq!(session.active_search(), None);
    }

    #[test]
    fn test_page_navigation_bounds() {
        let mut session = BrowseSession::default();
        session.set_view(View::All);

        assert!(!session.previous_page(3));
        assert!(session.next_page(3));
        assert!(session.next_page(3));
        assert!(!session.next_page(3));
        assert_eq!(session.page(), 3);

        assert!(!session.go_to_page(4, 3));
        assert!(!session.go_to_page(0, 3));
        assert!(session.first_page(3));
        assert_eq!(session.page(), 1);
        assert!(session.last_page(3));
        assert_eq!(session.page(), 3);
        assert!(!session.first_page(0));
    }

    #[test]
    fn test_switching_view_resets_page() {
        let mut session = BrowseSession::default();
        session.set_view(View::All);
        session.go_to_page(2, 5);
        session.set_view(View::Top10);
        session.set_view(View::All);
        assert_eq!(session.page(), 1);
    }

    #[test]
    fn test_listing_follows_state() {
        let data = dataset(45);
        let mut session = BrowseSession::default();
        assert!(matches!(session.listing(&data), Listing::Top { .. }));

        session.set_view(View::All);
        session.go_to_page(3, data.stats().total_pages);
        match session.listing(&data) {
            Listing::Paged { nodes, page, .. } => {
                assert_eq!(page, 3);
                assert_eq!(nodes.len(), 5);
                assert_eq!(nodes[0].display_rank, 41);
            }
            other => panic!("expected paged listing, got {:?}", other),
        }

        session.search("GNODE044");
        match session.listing(&data) {
            Listing::Search { result, .. } => assert!(result.found),
            other => panic!("expected search listing, got {:?}", other),
        }
    }
}
