/// One page of an in-memory list, with the metadata list templates need.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

pub const MAX_PER_PAGE: usize = 100;

/// Slice `items` into the 1-based `page` of size `per_page`.
///
/// `per_page` is clamped to `1..=MAX_PER_PAGE` and `page` to
/// `1..=max(total_pages, 1)`, so a stale page number in a link lands on the
/// last page instead of an empty one.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let total_count = items.len();
    let total_pages = total_count.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let offset = (page - 1) * per_page;

    let items = items.into_iter().skip(offset).take(per_page).collect();

    Page {
        items,
        page,
        per_page,
        total_count,
        total_pages,
    }
}

impl<T> Page<T> {
    /// Link data for the shared pager partial. `base` is the list URL
    /// including any filter query (`/logs?action=LOGIN`).
    pub fn pager(&self, base: &str) -> Pager {
        Pager {
            page: self.page,
            total_pages: self.total_pages,
            total_count: self.total_count,
            base: base.to_string(),
        }
    }
}

/// Page links, independent of the item type.
#[derive(Debug, Clone)]
pub struct Pager {
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    base: String,
}

impl Pager {
    pub fn href(&self, page: &usize) -> String {
        let sep = if self.base.contains('?') { '&' } else { '?' };
        format!("{}{sep}page={page}", self.base)
    }

    pub fn is_current(&self, page: &usize) -> bool {
        self.page == *page
    }

    pub fn show(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn prev_href(&self) -> String {
        self.href(&self.page.saturating_sub(1).max(1))
    }

    pub fn next_href(&self) -> String {
        self.href(&(self.page + 1).min(self.total_pages.max(1)))
    }

    pub fn numbers(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_no_pages() {
        let p = paginate(Vec::<u32>::new(), 3, 10);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.page, 1);
        assert!(p.items.is_empty());
        assert!(!p.pager("/rooms").show());
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let p = paginate((1..=25).collect::<Vec<_>>(), 9, 10);
        assert_eq!(p.page, 3);
        assert_eq!(p.items, vec![21, 22, 23, 24, 25]);
        let pager = p.pager("/rooms");
        assert!(pager.has_prev());
        assert!(!pager.has_next());
        assert_eq!(pager.next_href(), "/rooms?page=3");
    }

    #[test]
    fn pager_links_keep_filters() {
        let p = paginate((1..=45).collect::<Vec<_>>(), 2, 20);
        let pager = p.pager("/logs?action=LOGIN");
        assert_eq!(pager.prev_href(), "/logs?action=LOGIN&page=1");
        assert_eq!(pager.next_href(), "/logs?action=LOGIN&page=3");
        assert_eq!(p.pager("/rooms").href(&2), "/rooms?page=2");
        assert!(pager.show());
    }

    #[test]
    fn zero_per_page_is_treated_as_one() {
        let p = paginate(vec!['a', 'b'], 2, 0);
        assert_eq!(p.per_page, 1);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.items, vec!['b']);
    }

    #[test]
    fn pages_cover_every_item_once() {
        let items: Vec<u32> = (1..=47).collect();
        let first = paginate(items.clone(), 1, 10);
        assert_eq!(first.total_pages, 5);

        let joined: Vec<u32> = (1..=first.total_pages)
            .flat_map(|n| paginate(items.clone(), n, 10).items)
            .collect();
        assert_eq!(joined, items);
    }
}
