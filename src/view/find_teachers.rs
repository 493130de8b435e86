//! State machine behind the find-teachers page.
//!
//! The view owns the filter state and the accumulated results. It never
//! performs I/O: callers drive it with [`FindTeachersView::tick`], send the
//! returned [`ListingRequest`] to `GET /listings`, and hand the outcome back
//! through [`FindTeachersView::receive`].
//!
//! `assets/js/find_teachers.js` follows the same rules in the browser:
//! a debounced page-1 search per edit, "load more" only while idle with no
//! edit pending, and responses dropped unless they carry the latest
//! sequence number.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::domain::listing::{SortField, SortOrder, TeacherListing};
use crate::dto::listings::ListingQuery;
use crate::pagination::{DEFAULT_PAGE_SIZE, PageMetadata, PageRequest, Paginated};

/// Quiet period after the last filter edit before a search is issued.
pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Skeleton cards shown while the first page is loading.
pub const PLACEHOLDER_COUNT: usize = 6;

/// Filters, sort and paging as edited on the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    pub q: String,
    pub location: String,
    pub subject: String,
    pub min_rating: Option<f64>,
    pub sort: SortField,
    pub order: SortOrder,
    pub page: usize,
    pub limit: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            q: String::new(),
            location: String::new(),
            subject: String::new(),
            min_rating: None,
            sort: SortField::default(),
            order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl FilterState {
    /// Restores the state from the listing query parameters.
    pub fn from_query(query: &ListingQuery) -> Self {
        let request = PageRequest::new(query.page, query.limit);
        Self {
            q: query.q.clone().unwrap_or_default(),
            location: query.location.clone().unwrap_or_default(),
            subject: query.subject.clone().unwrap_or_default(),
            min_rating: query.min_rating.filter(|r| r.is_finite()),
            sort: query.sort.unwrap_or_default(),
            order: query.order.unwrap_or_default(),
            page: request.page(),
            limit: request.limit(),
        }
    }

    /// Listing parameters for `page`, omitting blank filters.
    pub fn to_query(&self, page: usize) -> ListingQuery {
        ListingQuery {
            subject: non_blank(&self.subject),
            location: non_blank(&self.location),
            min_rating: self.min_rating.filter(|r| r.is_finite()),
            q: non_blank(&self.q),
            page: Some(page.max(1)),
            limit: Some(self.limit),
            sort: Some(self.sort),
            order: Some(self.order),
        }
    }

    /// URL-encoded parameters of `page`, e.g. for a "next page" link.
    pub fn query_string(&self, page: usize) -> Result<String, serde_html_form::ser::Error> {
        serde_html_form::to_string(self.to_query(page))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    /// Fetching page 1 for the current filters.
    Searching,
    /// Fetching the page after the last one received.
    LoadingMore,
}

/// One outgoing listing request, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub seq: u64,
    pub query: ListingQuery,
}

impl ListingRequest {
    pub fn query_string(&self) -> Result<String, serde_html_form::ser::Error> {
        serde_html_form::to_string(&self.query)
    }
}

#[derive(Debug)]
pub struct FindTeachersView {
    filters: FilterState,
    state: ViewState,
    results: Vec<TeacherListing>,
    metadata: Option<PageMetadata>,
    error: Option<String>,
    debounce_until: Option<Instant>,
    last_seq: u64,
    in_flight: Option<u64>,
}

impl Default for FindTeachersView {
    fn default() -> Self {
        Self::new(FilterState::default())
    }
}

impl FindTeachersView {
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            state: ViewState::Idle,
            results: Vec::new(),
            metadata: None,
            error: None,
            debounce_until: None,
            last_seq: 0,
            in_flight: None,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn results(&self) -> &[TeacherListing] {
        &self.results
    }

    pub fn metadata(&self) -> Option<&PageMetadata> {
        self.metadata.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.metadata.is_some_and(|m| m.has_more)
    }

    /// "Load more" is offered only between requests, with no filter edit
    /// waiting on the debounce, and while pages remain.
    pub fn can_load_more(&self) -> bool {
        self.state == ViewState::Idle && self.debounce_until.is_none() && self.has_more()
    }

    pub fn placeholder_count(&self) -> usize {
        if self.state == ViewState::Searching {
            PLACEHOLDER_COUNT
        } else {
            0
        }
    }

    fn changed(&mut self, now: Instant) {
        self.filters.page = 1;
        self.debounce_until = Some(now + DEBOUNCE);
    }

    pub fn set_query(&mut self, q: &str, now: Instant) {
        if self.filters.q != q {
            self.filters.q = q.to_string();
            self.changed(now);
        }
    }

    pub fn set_location(&mut self, location: &str, now: Instant) {
        if self.filters.location != location {
            self.filters.location = location.to_string();
            self.changed(now);
        }
    }

    pub fn set_subject(&mut self, subject: &str, now: Instant) {
        if self.filters.subject != subject {
            self.filters.subject = subject.to_string();
            self.changed(now);
        }
    }

    pub fn set_min_rating(&mut self, min_rating: Option<f64>, now: Instant) {
        let min_rating = min_rating.filter(|r| r.is_finite());
        if self.filters.min_rating != min_rating {
            self.filters.min_rating = min_rating;
            self.changed(now);
        }
    }

    pub fn set_sort(&mut self, sort: SortField, now: Instant) {
        if self.filters.sort != sort {
            self.filters.sort = sort;
            self.changed(now);
        }
    }

    pub fn toggle_order(&mut self, now: Instant) {
        self.filters.order = self.filters.order.toggled();
        self.changed(now);
    }

    fn issue(&mut self, state: ViewState, page: usize) -> ListingRequest {
        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        self.state = state;
        self.error = None;
        ListingRequest {
            seq: self.last_seq,
            query: self.filters.to_query(page),
        }
    }

    /// Issues the page-1 search once the debounce period has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<ListingRequest> {
        match self.debounce_until {
            Some(deadline) if now >= deadline => Some(self.search_now()),
            _ => None,
        }
    }

    /// Searches immediately, cancelling any pending debounce.
    pub fn search_now(&mut self) -> ListingRequest {
        self.debounce_until = None;
        self.filters.page = 1;
        self.issue(ViewState::Searching, 1)
    }

    /// Requests the next page, or `None` when loading more is disabled.
    pub fn load_more(&mut self) -> Option<ListingRequest> {
        if !self.can_load_more() {
            return None;
        }
        let next = self.metadata.map_or(1, |m| m.page.saturating_add(1));
        Some(self.issue(ViewState::LoadingMore, next))
    }

    /// Applies the outcome of request `seq`.
    ///
    /// Returns `false` when the response was discarded because a newer
    /// request has been issued since.
    pub fn receive(&mut self, seq: u64, outcome: Result<Paginated<TeacherListing>, String>) -> bool {
        if self.in_flight != Some(seq) {
            log::debug!("Discarding stale listing response {seq}");
            return false;
        }

        let kind = self.state;
        self.in_flight = None;
        self.state = ViewState::Idle;

        match outcome {
            Ok(page) => {
                if kind == ViewState::LoadingMore {
                    self.results.extend(page.data);
                } else {
                    self.results = page.data;
                }
                self.filters.page = page.metadata.page;
                self.metadata = Some(page.metadata);
            }
            Err(message) => {
                if kind == ViewState::Searching {
                    self.results.clear();
                    self.metadata = None;
                }
                self.error = Some(message);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::listing::ListingOwner;
    use crate::domain::types::{ProfileId, TeacherId};

    fn listing(id: i32) -> TeacherListing {
        TeacherListing {
            id: TeacherId::new(id).unwrap(),
            headline: format!("Teacher {id}"),
            bio: String::new(),
            subjects: vec!["Math".to_string()],
            location: "Delhi".to_string(),
            rating: 4.0,
            review_count: 1,
            hourly_rate: None,
            featured: false,
            created_at: Utc::now().naive_utc(),
            owner: ListingOwner {
                profile_id: ProfileId::new(id).unwrap(),
                name: format!("Owner {id}"),
                avatar_url: "/assets/img/avatar.svg".to_string(),
            },
        }
    }

    fn page(ids: std::ops::RangeInclusive<i32>, total: usize, page: usize) -> Paginated<TeacherListing> {
        Paginated::new(
            ids.map(listing).collect(),
            total,
            PageRequest::new(Some(page), Some(10)),
        )
    }

    #[test]
    fn edits_are_debounced() {
        let start = Instant::now();
        let mut view = FindTeachersView::default();

        view.set_subject("Ma", start);
        view.set_subject("Math", start + Duration::from_millis(300));

        assert_eq!(view.tick(start + Duration::from_millis(600)), None);
        let request = view
            .tick(start + Duration::from_millis(800))
            .expect("debounced search");
        assert_eq!(request.query.subject.as_deref(), Some("Math"));
        assert_eq!(request.query.page, Some(1));
        assert_eq!(view.state(), ViewState::Searching);
        assert_eq!(view.placeholder_count(), PLACEHOLDER_COUNT);
        assert_eq!(view.tick(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn unchanged_value_does_not_schedule_search() {
        let mut view = FindTeachersView::default();
        let start = Instant::now();
        view.set_location("", start);
        assert_eq!(view.tick(start + DEBOUNCE * 10), None);
    }

    #[test]
    fn filter_change_resets_page_and_replaces_results() {
        let start = Instant::now();
        let mut view = FindTeachersView::default();

        let first = view.search_now();
        assert!(view.receive(first.seq, Ok(page(1..=10, 25, 1))));
        let more = view.load_more().expect("has more");
        assert_eq!(more.query.page, Some(2));
        assert!(view.receive(more.seq, Ok(page(11..=20, 25, 2))));
        assert_eq!(view.results().len(), 20);
        assert_eq!(view.filters().page, 2);

        view.set_min_rating(Some(4.5), start);
        assert_eq!(view.filters().page, 1);
        let search = view.tick(start + DEBOUNCE).expect("search");
        assert_eq!(search.query.page, Some(1));
        assert_eq!(search.query.min_rating, Some(4.5));
        assert!(view.receive(search.seq, Ok(page(1..=3, 3, 1))));

        assert_eq!(view.results().len(), 3);
        assert!(!view.has_more());
    }

    #[test]
    fn load_more_is_disabled_without_more_pages_or_in_flight() {
        let mut view = FindTeachersView::default();
        assert_eq!(view.load_more(), None);

        let first = view.search_now();
        assert_eq!(view.load_more(), None, "request in flight");
        view.receive(first.seq, Ok(page(1..=10, 25, 1)));

        let second = view.load_more().expect("has more");
        assert_eq!(view.state(), ViewState::LoadingMore);
        assert_eq!(view.placeholder_count(), 0);
        view.receive(second.seq, Ok(page(11..=20, 25, 2)));
        let third = view.load_more().expect("has more");
        view.receive(third.seq, Ok(page(21..=25, 25, 3)));

        assert_eq!(view.results().len(), 25);
        assert!(!view.can_load_more());
        assert_eq!(view.load_more(), None);
    }

    #[test]
    fn stale_responses_are_discarded() {
        let start = Instant::now();
        let mut view = FindTeachersView::default();

        view.set_query("an", start);
        let old = view.tick(start + DEBOUNCE).expect("first search");
        view.set_query("anita", start + DEBOUNCE);
        let new = view.tick(start + DEBOUNCE * 2).expect("second search");
        assert!(new.seq > old.seq);

        assert!(view.receive(new.seq, Ok(page(1..=1, 1, 1))));
        assert!(!view.receive(old.seq, Ok(page(1..=10, 40, 1))));

        assert_eq!(view.results().len(), 1);
        assert_eq!(view.metadata().map(|m| m.total), Some(1));
    }

    #[test]
    fn new_search_supersedes_load_more() {
        let start = Instant::now();
        let mut view = FindTeachersView::default();
        let first = view.search_now();
        view.receive(first.seq, Ok(page(1..=10, 25, 1)));

        let more = view.load_more().expect("has more");
        view.set_subject("Art", start);
        let search = view.tick(start + DEBOUNCE).expect("search");

        assert!(!view.receive(more.seq, Ok(page(11..=20, 25, 2))));
        assert!(view.receive(search.seq, Ok(page(1..=2, 2, 1))));
        assert_eq!(view.results().len(), 2);
    }

    #[test]
    fn load_more_waits_for_pending_filter_edit() {
        let start = Instant::now();
        let mut view = FindTeachersView::default();
        let first = view.search_now();
        view.receive(first.seq, Ok(page(1..=10, 25, 1)));
        assert!(view.can_load_more());

        view.set_subject("Art", start);
        assert!(!view.can_load_more());
        assert_eq!(view.load_more(), None);

        let search = view.tick(start + DEBOUNCE).expect("search");
        assert_eq!(search.query.subject.as_deref(), Some("Art"));
        assert_eq!(search.query.page, Some(1));
        assert!(view.receive(search.seq, Ok(page(1..=10, 12, 1))));
        assert_eq!(view.load_more().and_then(|r| r.query.page), Some(2));
    }

    #[test]
    fn errors_are_shown_without_retry() {
        let mut view = FindTeachersView::default();
        let request = view.search_now();

        assert!(view.receive(request.seq, Err("database is locked".to_string())));

        assert_eq!(view.error(), Some("database is locked"));
        assert_eq!(view.state(), ViewState::Idle);
        assert!(view.results().is_empty());
        assert_eq!(view.tick(Instant::now() + DEBOUNCE * 10), None);
    }

    #[test]
    fn query_string_omits_blank_filters() {
        let filters = FilterState {
            subject: "Math".to_string(),
            location: " ".to_string(),
            sort: SortField::Rating,
            order: SortOrder::Asc,
            ..FilterState::default()
        };

        let qs = filters.query_string(2).unwrap();
        assert_eq!(qs, "subject=Math&page=2&limit=10&sort=rating&order=asc");

        let restored: ListingQuery = serde_html_form::from_str(&qs).unwrap();
        assert_eq!(FilterState::from_query(&restored).page, 2);
    }

    #[test]
    fn request_query_string_has_defaults() {
        let mut view = FindTeachersView::default();
        let request = view.search_now();
        assert_eq!(
            request.query_string().unwrap(),
            "page=1&limit=10&sort=created_at&order=desc"
        );
    }
}
