//! Splits a long item list into pages of [`PAGE_SIZE`] slots.
//!
//! Every page except the last gives its final slot to a synthetic "more" tile, so a page
//! advances the underlying list by `PAGE_SIZE - 1` real items.

use crate::item::MenuItem;
use std::borrow::Cow;

pub const PAGE_SIZE: usize = 6;
const STRIDE: usize = PAGE_SIZE - 1;

pub fn is_paginated(len: usize) -> bool {
    len > PAGE_SIZE
}

/// Index of the first real item shown on `page`.
pub fn page_start(page: usize) -> usize {
    STRIDE * page.saturating_sub(1)
}

fn window_end(page: usize) -> usize {
    page_start(page) + PAGE_SIZE
}

pub fn page_count(len: usize) -> usize {
    if !is_paginated(len) {
        return 1;
    }
    (len - 1).div_ceil(STRIDE)
}

/// Page on which the item at `index` is displayed as a real slice.
pub fn page_of(index: usize, len: usize) -> usize {
    if !is_paginated(len) {
        return 1;
    }
    (index / STRIDE + 1).min(page_count(len))
}

pub fn clamp_page(page: usize, len: usize) -> usize {
    page.clamp(1, page_count(len))
}

/// Absolute index of the slot `relative` on `page`.
pub fn absolute_index(page: usize, relative: usize) -> usize {
    page_start(page) + relative
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisiblePage<'a> {
    pub page: usize,
    pub items: Vec<Cow<'a, MenuItem>>,
}

impl<'a> VisiblePage<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, relative: usize) -> Option<&MenuItem> {
        self.items.get(relative).map(|item| &**item)
    }

    pub fn has_more(&self) -> bool {
        self.items.last().is_some_and(|item| item.is_more)
    }

    /// Real items on this page, paired with their absolute index.
    pub fn real_items(&self) -> impl Iterator<Item = (usize, &MenuItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_more)
            .map(|(i, item)| (absolute_index(self.page, i), &**item))
    }
}

pub fn paginate<'a>(items: &'a [MenuItem], page: usize, more_label: &str) -> VisiblePage<'a> {
    if !is_paginated(items.len()) {
        return VisiblePage {
            page: 1,
            items: items.iter().map(Cow::Borrowed).collect(),
        };
    }

    let page = clamp_page(page, items.len());
    let end = window_end(page);
    let mut visible: Vec<_> = items[page_start(page)..end.min(items.len())]
        .iter()
        .map(Cow::Borrowed)
        .collect();

    if end < items.len()
        && let Some(last) = visible.last_mut()
    {
        *last = Cow::Owned(MenuItem::more(more_label));
    }

    VisiblePage {
        page,
        items: visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<MenuItem> {
        (0..n).map(|i| MenuItem::new(format!("item {i}"))).collect()
    }

    fn labels(page: &VisiblePage) -> Vec<String> {
        page.items.iter().map(|i| i.label.clone()).collect()
    }

    #[test]
    fn test_short_lists_are_untouched() {
        for n in 0..=PAGE_SIZE {
            let all = items(n);
            for page in [1, 2, 5] {
                let visible = paginate(&all, page, "More");
                assert_eq!(visible.page, 1);
                assert_eq!(visible.len(), n);
                assert!(!visible.has_more());
                assert!(visible.items.iter().all(|i| matches!(i, Cow::Borrowed(_))));
            }
        }
    }

    #[test]
    fn test_thirteen_items() {
        let all = items(13);
        assert_eq!(page_count(13), 3);

        let first = paginate(&all, 1, "More");
        assert_eq!(
            labels(&first),
            vec!["item 0", "item 1", "item 2", "item 3", "item 4", "More"]
        );
        assert!(first.has_more());

        let second = paginate(&all, 2, "More");
        assert_eq!(
            labels(&second),
            vec!["item 5", "item 6", "item 7", "item 8", "item 9", "More"]
        );

        let third = paginate(&all, 3, "More");
        assert_eq!(labels(&third), vec!["item 10", "item 11", "item 12"]);
        assert!(!third.has_more());
    }

    #[test]
    fn test_more_tile_shape() {
        let all = items(7);
        let visible = paginate(&all, 1, "Plus");
        let more = visible.get(5).unwrap();

        assert!(more.is_more);
        assert_eq!(more.label, "Plus");
        assert_eq!(more.icon, Some(crate::item::IconSource::from("ellipsis-h")));
    }

    #[test]
    fn test_pages_partition_the_list() {
        for n in PAGE_SIZE + 1..=40 {
            let all = items(n);
            let pages = page_count(n);
            let mut seen = Vec::new();

            for page in 1..=pages {
                let visible = paginate(&all, page, "More");
                assert!(visible.len() <= PAGE_SIZE);
                assert_eq!(visible.has_more(), page < pages, "n={n} page={page}");
                assert_eq!(
                    visible.items.iter().filter(|i| i.is_more).count(),
                    usize::from(page < pages)
                );
                for (index, item) in visible.real_items() {
                    assert_eq!(item, &all[index]);
                    seen.push(index);
                }
            }

            assert_eq!(seen, (0..n).collect::<Vec<_>>(), "n={n}");
        }
    }

    #[test]
    fn test_last_page_keeps_its_final_item() {
        for n in PAGE_SIZE + 1..=40 {
            let all = items(n);
            let last = paginate(&all, page_count(n), "More");
            assert_eq!(last.items.last().unwrap().label, all[n - 1].label);
        }
    }

    #[test]
    fn test_page_of_matches_layout() {
        for n in 0..=40 {
            let all = items(n);
            for index in 0..n {
                let page = page_of(index, n);
                let visible = paginate(&all, page, "More");
                assert!(
                    visible.real_items().any(|(i, _)| i == index),
                    "n={n} index={index} page={page}"
                );
            }
        }
    }

    #[test]
    fn test_absolute_index() {
        assert_eq!(absolute_index(1, 3), 3);
        assert_eq!(absolute_index(2, 1), 6);
        assert_eq!(absolute_index(3, 0), 10);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let all = items(13);
        assert_eq!(paginate(&all, 0, "More").page, 1);
        assert_eq!(paginate(&all, 9, "More").page, 3);
    }
}
