use crate::item::{MenuId, MenuItem};
use crate::pagination::{self, VisiblePage};
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum PageStep {
    Forward,
    Backward,
}

/// Items, sub-menu flag and current page. Only the navigator mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuState {
    items: Vec<MenuItem>,
    is_sub_menu: bool,
    page: usize,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_sub_menu: false,
            page: 1,
        }
    }
}

impl MenuState {
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn is_sub_menu(&self) -> bool {
        self.is_sub_menu
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        pagination::page_count(self.items.len())
    }

    pub fn visible_page(&self, more_label: &str) -> VisiblePage<'_> {
        pagination::paginate(&self.items, self.page, more_label)
    }

    pub(crate) fn open(
        &mut self,
        items: Vec<MenuItem>,
        is_sub_menu: bool,
        focus: Option<&MenuId>,
    ) {
        self.page = focus
            .and_then(|id| items.iter().position(|item| item.belongs_to(id)))
            .map_or(1, |index| pagination::page_of(index, items.len()));
        self.items = items;
        self.is_sub_menu = is_sub_menu;
    }

    pub(crate) fn refresh(&mut self, items: Vec<MenuItem>) {
        self.items = items;
        self.page = pagination::clamp_page(self.page, self.items.len());
    }

    /// Moves one page in `step` direction. Returns false at either end.
    pub(crate) fn set_page(&mut self, step: PageStep) -> bool {
        let target = match step {
            PageStep::Forward => self.page + 1,
            PageStep::Backward => self.page.saturating_sub(1),
        };
        if target < 1 || target > self.page_count() {
            return false;
        }
        self.page = target;
        true
    }
}
