//! Generic scrollable + filterable list.

pub struct ScrollableList<T> {
    pub items: Vec<T>,
    pub filtered_indices: Vec<usize>,
    pub selected: usize,
    pub scroll_offset: usize,
    pub filter: String,
    filter_fn: Box<dyn Fn(&T, &str) -> bool + Send + Sync>,
}

impl<T> ScrollableList<T> {
    pub fn new(filter_fn: impl Fn(&T, &str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            items: Vec::new(),
            filtered_indices: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            filter: String::new(),
            filter_fn: Box::new(filter_fn),
        }
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.rebuild_filter();
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        let old_idx = self.filtered_indices.get(self.selected).copied();
        self.rebuild_filter();
        // keep the same item selected when it survives the filter
        self.selected = old_idx
            .and_then(|prev| self.filtered_indices.iter().position(|&i| i == prev))
            .unwrap_or(0);
        self.scroll_offset = 0;
    }

    fn rebuild_filter(&mut self) {
        if self.filter.is_empty() {
            self.filtered_indices = (0..self.items.len()).collect();
        } else {
            self.filtered_indices = self
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| (self.filter_fn)(item, &self.filter))
                .map(|(i, _)| i)
                .collect();
        }
        if self.selected >= self.filtered_indices.len() {
            self.selected = self.filtered_indices.len().saturating_sub(1);
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.filtered_indices.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.filtered_indices.len() - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.filtered_indices.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        let idx = self.filtered_indices.get(self.selected)?;
        self.items.get(*idx)
    }

    /// Returns (original_index, &item) pairs visible in `height` rows.
    /// Call `ensure_visible` first to update `scroll_offset`.
    pub fn visible_items(&self, height: usize) -> Vec<(usize, &T)> {
        if height == 0 || self.filtered_indices.is_empty() {
            return Vec::new();
        }
        let start = self.scroll_offset.min(self.filtered_indices.len());
        let end = (start + height).min(self.filtered_indices.len());
        self.filtered_indices[start..end]
            .iter()
            .map(|&i| (i, &self.items[i]))
            .collect()
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// Select the row clicked at `row` within the rendered area.
    /// Returns true if that row holds an item.
    pub fn handle_click(&mut self, row: usize) -> bool {
        let target = self.scroll_offset + row;
        if target < self.filtered_indices.len() {
            self.selected = target;
            return true;
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        self.filtered_indices.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.items.len()
    }

    pub fn selected_in_view(&self) -> usize {
        self.selected.saturating_sub(self.scroll_offset)
    }

    /// Move the selection to the first item matching `pred`.
    pub fn select_where(&mut self, pred: impl Fn(&T) -> bool) -> bool {
        match self
            .filtered_indices
            .iter()
            .position(|&i| pred(&self.items[i]))
        {
            Some(pos) => {
                self.selected = pos;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> ScrollableList<&'static str> {
        let mut list = ScrollableList::new(|s: &&str, q: &str| s.contains(q));
        list.set_items(vec!["rain", "coffee", "train", "study"]);
        list
    }

    #[test]
    fn test_filter_keeps_selection_when_possible() {
        let mut list = words();
        list.select_down(2);
        assert_eq!(list.selected_item(), Some(&"train"));
        list.set_filter("ain");
        assert_eq!(list.selected_item(), Some(&"train"));
        list.set_filter("study");
        assert_eq!(list.selected_item(), Some(&"study"));
        list.set_filter("zzz");
        assert!(list.is_empty());
        assert_eq!(list.selected_item(), None);
        assert_eq!(list.total_len(), 4);
    }

    #[test]
    fn test_scrolling_window() {
        let mut list = words();
        list.select_last();
        list.ensure_visible(2);
        assert_eq!(list.scroll_offset, 2);
        let visible: Vec<_> = list.visible_items(2).into_iter().map(|(_, s)| *s).collect();
        assert_eq!(visible, vec!["train", "study"]);
        assert_eq!(list.selected_in_view(), 1);

        assert!(list.handle_click(0));
        assert_eq!(list.selected_item(), Some(&"train"));
        assert!(!list.handle_click(5));
    }

    #[test]
    fn test_shrinking_items_clamps_selection() {
        let mut list = words();
        list.select_last();
        list.set_items(vec!["only"]);
        assert_eq!(list.selected_item(), Some(&"only"));
        assert!(list.select_where(|s| *s == "only"));
        assert!(!list.select_where(|s| *s == "gone"));
    }
}
