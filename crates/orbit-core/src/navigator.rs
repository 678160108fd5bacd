//! Interaction bridge between pointer gestures, the menu state and the host.

use crate::geometry::{self, Hit, Point};
use crate::host::{Host, HostEvent, OpenMenu, OpenPayload, Request, TransitionId};
use crate::item::MenuItem;
use crate::pagination::{self, VisiblePage};
use crate::state::{MenuState, PageStep};
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum CenterIcon {
    Close,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterAction {
    PreviousPage,
    Back,
    Close,
}

impl CenterAction {
    pub fn resolve(page: usize, is_sub_menu: bool) -> Self {
        if page > 1 {
            Self::PreviousPage
        } else if is_sub_menu {
            Self::Back
        } else {
            Self::Close
        }
    }

    pub fn icon(self) -> CenterIcon {
        match self {
            Self::Close => CenterIcon::Close,
            Self::PreviousPage | Self::Back => CenterIcon::Back,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hidden,
    Visible { page: usize },
    Transitioning { id: TransitionId, step: PageStep },
}

/// Transient view state, never reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub hovered_slice: Option<usize>,
    pub center_hovered: bool,
    pub visible: bool,
}

impl InteractionState {
    fn clear_hover(&mut self) {
        self.hovered_slice = None;
        self.center_hovered = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorOptions {
    pub more_label: String,
    /// Show the unchanged page again when the host vetoes a transition. When false the content
    /// stays hidden until the host sends another event.
    pub reveal_on_veto: bool,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            more_label: "More".to_string(),
            reveal_on_veto: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    id: TransitionId,
    step: PageStep,
}

#[derive(Debug, Default)]
pub struct Navigator {
    state: MenuState,
    interaction: InteractionState,
    shown: bool,
    pending: Option<PendingTransition>,
    last_transition: TransitionId,
    options: NavigatorOptions,
}

impl Navigator {
    pub fn new(options: NavigatorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn set_options(&mut self, options: NavigatorOptions) {
        self.options = options;
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn is_visible(&self) -> bool {
        self.interaction.visible
    }

    pub fn phase(&self) -> Phase {
        match (self.pending, self.shown) {
            (Some(p), _) => Phase::Transitioning {
                id: p.id,
                step: p.step,
            },
            (None, true) => Phase::Visible {
                page: self.state.page(),
            },
            (None, false) => Phase::Hidden,
        }
    }

    pub fn visible_page(&self) -> VisiblePage<'_> {
        self.state.visible_page(&self.options.more_label)
    }

    pub fn center_action(&self) -> CenterAction {
        CenterAction::resolve(self.state.page(), self.state.is_sub_menu())
    }

    pub fn center_icon(&self) -> CenterIcon {
        self.center_action().icon()
    }

    fn is_interactive(&self) -> bool {
        self.shown && self.interaction.visible && self.pending.is_none()
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::OpenRadialMenu(OpenPayload::Show(menu)) => self.open(menu),
            HostEvent::OpenRadialMenu(OpenPayload::Hide) => self.hide(),
            HostEvent::RefreshItems(items) => self.refresh(items),
            HostEvent::TransitionResolved { id, granted } => {
                self.resolve_transition(id, granted);
            }
        }
    }

    pub fn open(&mut self, menu: OpenMenu) {
        if let Some(pending) = self.pending.take() {
            log::debug!("Open replaces pending transition {}", pending.id);
        }
        self.state
            .open(menu.items, menu.is_sub_menu, menu.focus_menu_id.as_ref());
        self.shown = true;
        self.interaction.clear_hover();
        self.interaction.visible = true;
        log::debug!(
            "Menu opened with {} items on page {}",
            self.state.items().len(),
            self.state.page()
        );
    }

    /// Hides the menu. Items are kept so the exit animation still has data to draw.
    pub fn hide(&mut self) {
        self.pending = None;
        self.shown = false;
        self.interaction.clear_hover();
        self.interaction.visible = false;
    }

    pub fn refresh(&mut self, items: Vec<MenuItem>) {
        self.state.refresh(items);
        let len = self.visible_page().len();
        if self.interaction.hovered_slice.is_some_and(|i| i >= len) {
            self.interaction.hovered_slice = None;
        }
    }

    /// Applies the host's answer to a page transition. Answers for anything but the pending
    /// transition are dropped.
    pub fn resolve_transition(&mut self, id: TransitionId, granted: bool) -> bool {
        let Some(pending) = self.pending.filter(|p| p.id == id) else {
            log::warn!("Ignoring answer for stale page transition {}", id);
            return false;
        };
        self.pending = None;

        if granted {
            if !self.state.set_page(pending.step) {
                log::warn!("Page transition {} went out of range", id);
            }
            self.interaction.visible = true;
        } else {
            log::debug!("Host vetoed page transition {}", id);
            self.interaction.visible = self.options.reveal_on_veto;
        }
        true
    }

    /// Updates hover state. Returns whether anything changed.
    pub fn hover(&mut self, hit: Hit) -> bool {
        if !self.is_interactive() {
            return false;
        }
        let (slice, center) = match hit {
            Hit::Slice(i) => (Some(i), false),
            Hit::Center => (None, true),
            Hit::None => (None, false),
        };
        let changed =
            self.interaction.hovered_slice != slice || self.interaction.center_hovered != center;
        self.interaction.hovered_slice = slice;
        self.interaction.center_hovered = center;
        changed
    }

    pub fn hit(&self, offset: Point) -> Hit {
        geometry::hit_test(self.visible_page().len(), offset)
    }

    pub fn pointer_moved(&mut self, offset: Point) -> bool {
        self.hover(self.hit(offset))
    }

    /// Primary click at `offset` from the menu centre.
    pub fn click(&mut self, offset: Point, host: &mut impl Host) {
        match self.hit(offset) {
            Hit::Slice(i) => self.click_slice(i, host),
            Hit::Center => self.click_center(host),
            Hit::None => {}
        }
    }

    pub fn click_slice(&mut self, relative: usize, host: &mut impl Host) {
        if !self.is_interactive() {
            return;
        }
        let (page, is_more) = {
            let visible = self.visible_page();
            match visible.get(relative) {
                Some(item) => (visible.page, item.is_more),
                None => return,
            }
        };

        if is_more {
            self.begin_transition(PageStep::Forward, host);
        } else {
            host.send(Request::Select(pagination::absolute_index(page, relative)));
        }
    }

    pub fn click_center(&mut self, host: &mut impl Host) {
        self.retreat(host);
    }

    /// Right click anywhere on the menu.
    pub fn secondary_click(&mut self, host: &mut impl Host) {
        self.retreat(host);
    }

    /// Closes the menu regardless of page.
    pub fn dismiss(&mut self, host: &mut impl Host) {
        if !self.shown {
            return;
        }
        host.send(Request::Close);
        self.hide();
    }

    fn retreat(&mut self, host: &mut impl Host) {
        if !self.is_interactive() {
            return;
        }
        match self.center_action() {
            CenterAction::PreviousPage => self.begin_transition(PageStep::Backward, host),
            CenterAction::Back => host.send(Request::Back),
            CenterAction::Close => {
                host.send(Request::Close);
                self.hide();
            }
        }
    }

    fn begin_transition(&mut self, step: PageStep, host: &mut impl Host) {
        let id = self.last_transition.next();
        self.last_transition = id;
        self.pending = Some(PendingTransition { id, step });
        self.interaction.clear_hover();
        self.interaction.visible = false;
        log::debug!(
            "Requesting page transition {} ({}) from page {}",
            id,
            step,
            self.state.page()
        );
        host.send(Request::PageTransition(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CONTENT_RADIUS, SliceGeometry};
    use crate::item::MenuId;

    fn items(n: usize) -> Vec<MenuItem> {
        (0..n).map(|i| MenuItem::new(format!("item {i}"))).collect()
    }

    fn opened(n: usize, is_sub_menu: bool) -> Navigator {
        let mut nav = Navigator::default();
        nav.open(OpenMenu {
            items: items(n),
            is_sub_menu,
            focus_menu_id: None,
        });
        nav
    }

    fn pending_id(nav: &Navigator) -> TransitionId {
        match nav.phase() {
            Phase::Transitioning { id, .. } => id,
            other => panic!("expected a transition, got {other:?}"),
        }
    }

    #[test]
    fn test_center_icon_names() {
        assert_eq!(CenterIcon::Close.to_string(), "close");
        assert_eq!("back".parse::<CenterIcon>(), Ok(CenterIcon::Back));
        assert_eq!(CenterAction::resolve(1, false), CenterAction::Close);
        assert_eq!(CenterAction::resolve(1, true), CenterAction::Back);
        assert_eq!(CenterAction::resolve(2, false), CenterAction::PreviousPage);
    }

    #[test]
    fn test_open_and_hide_events() {
        let mut nav = Navigator::default();
        assert_eq!(nav.phase(), Phase::Hidden);

        nav.handle_event(HostEvent::OpenRadialMenu(OpenPayload::Show(OpenMenu {
            items: items(3),
            ..OpenMenu::default()
        })));
        assert_eq!(nav.phase(), Phase::Visible { page: 1 });
        assert!(nav.is_visible());

        nav.handle_event(HostEvent::OpenRadialMenu(OpenPayload::Hide));
        assert_eq!(nav.phase(), Phase::Hidden);
        assert!(!nav.is_visible());
        assert_eq!(nav.state().items().len(), 3);
    }

    #[test]
    fn test_open_with_focus_menu() {
        let mut menu_items = items(13);
        menu_items[11] = MenuItem::new("Seats").with_menu("x");

        let mut nav = Navigator::default();
        nav.open(OpenMenu {
            items: menu_items,
            is_sub_menu: true,
            focus_menu_id: Some(MenuId::new("x")),
        });

        assert_eq!(nav.phase(), Phase::Visible { page: 3 });
    }

    #[test]
    fn test_empty_menu_still_opens() {
        let mut nav = Navigator::default();
        nav.handle_event(HostEvent::OpenRadialMenu(OpenPayload::Show(
            OpenMenu::default(),
        )));

        assert!(nav.is_visible());
        assert!(nav.visible_page().is_empty());
        assert_eq!(nav.hit(Point::new(0.0, 100.0)), Hit::None);
    }

    #[test]
    fn test_select_sends_absolute_index() {
        let mut nav = opened(13, false);
        let mut host = Vec::new();

        nav.click_slice(2, &mut host);
        assert_eq!(host, vec![Request::Select(2)]);

        nav.click_slice(5, &mut host);
        let id = pending_id(&nav);
        assert!(nav.resolve_transition(id, true));
        assert_eq!(nav.phase(), Phase::Visible { page: 2 });

        host.clear();
        nav.click_slice(1, &mut host);
        assert_eq!(host, vec![Request::Select(6)]);
        assert_eq!(nav.phase(), Phase::Visible { page: 2 });
    }

    #[test]
    fn test_more_tile_transition_granted() {
        let mut nav = opened(13, false);
        let mut host = Vec::new();
        nav.hover(Hit::Slice(5));

        nav.click_slice(5, &mut host);
        let id = pending_id(&nav);
        assert_eq!(host, vec![Request::PageTransition(id)]);
        assert!(!nav.is_visible());
        assert_eq!(nav.interaction().hovered_slice, None);
        assert_eq!(nav.state().page(), 1);

        nav.handle_event(HostEvent::TransitionResolved { id, granted: true });
        assert_eq!(nav.phase(), Phase::Visible { page: 2 });
        assert!(nav.is_visible());
    }

    #[test]
    fn test_more_tile_transition_vetoed() {
        let mut nav = opened(13, false);
        let before: Vec<_> = nav.visible_page().items.iter().map(|i| i.label.clone()).collect();
        let mut host = Vec::new();

        nav.click_slice(5, &mut host);
        let id = pending_id(&nav);
        nav.resolve_transition(id, false);

        assert_eq!(nav.phase(), Phase::Visible { page: 1 });
        assert!(nav.is_visible());
        let after: Vec<_> = nav.visible_page().items.iter().map(|i| i.label.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_veto_can_leave_content_hidden() {
        let mut nav = Navigator::new(NavigatorOptions {
            reveal_on_veto: false,
            ..NavigatorOptions::default()
        });
        nav.open(OpenMenu {
            items: items(13),
            ..OpenMenu::default()
        });
        let mut host = Vec::new();

        nav.click_slice(5, &mut host);
        let id = pending_id(&nav);
        nav.resolve_transition(id, false);

        assert_eq!(nav.phase(), Phase::Visible { page: 1 });
        assert!(!nav.is_visible());

        host.clear();
        nav.click_slice(0, &mut host);
        assert!(host.is_empty());
    }

    #[test]
    fn test_clicks_ignored_while_transitioning() {
        let mut nav = opened(13, false);
        let mut host = Vec::new();

        nav.click_slice(5, &mut host);
        let id = pending_id(&nav);
        nav.click_slice(0, &mut host);
        nav.click_center(&mut host);
        nav.secondary_click(&mut host);
        assert!(!nav.hover(Hit::Slice(1)));

        assert_eq!(host, vec![Request::PageTransition(id)]);
    }

    #[test]
    fn test_stale_answers_are_ignored() {
        let mut nav = opened(13, false);
        let mut host = Vec::new();

        nav.click_slice(5, &mut host);
        let first = pending_id(&nav);
        nav.open(OpenMenu {
            items: items(13),
            ..OpenMenu::default()
        });

        assert!(!nav.resolve_transition(first, true));
        assert_eq!(nav.phase(), Phase::Visible { page: 1 });
    }

    #[test]
    fn test_center_click_closes_root_menu() {
        let mut nav = opened(4, false);
        let mut host = Vec::new();
        assert_eq!(nav.center_icon(), CenterIcon::Close);

        nav.click_center(&mut host);

        assert_eq!(host, vec![Request::Close]);
        assert_eq!(nav.phase(), Phase::Hidden);
    }

    #[test]
    fn test_back_in_sub_menu_leaves_visibility_to_host() {
        let mut nav = opened(4, true);
        let mut host = Vec::new();
        assert_eq!(nav.center_icon(), CenterIcon::Back);

        nav.secondary_click(&mut host);

        assert_eq!(host, vec![Request::Back]);
        assert_eq!(nav.phase(), Phase::Visible { page: 1 });
        assert!(nav.is_visible());
    }

    #[test]
    fn test_center_click_goes_back_a_page_first() {
        let mut nav = opened(13, true);
        let mut host = Vec::new();
        nav.click_slice(5, &mut host);
        nav.resolve_transition(pending_id(&nav), true);
        assert_eq!(nav.center_action(), CenterAction::PreviousPage);
        assert_eq!(nav.center_icon(), CenterIcon::Back);

        host.clear();
        nav.click_center(&mut host);
        let id = pending_id(&nav);
        assert_eq!(host, vec![Request::PageTransition(id)]);

        nav.resolve_transition(id, true);
        assert_eq!(nav.phase(), Phase::Visible { page: 1 });
    }

    #[test]
    fn test_refresh_keeps_page_and_flag() {
        let mut nav = opened(13, true);
        let mut host = Vec::new();
        nav.click_slice(5, &mut host);
        nav.resolve_transition(pending_id(&nav), true);
        nav.hover(Hit::Slice(4));

        nav.handle_event(HostEvent::RefreshItems(items(8)));

        assert_eq!(nav.phase(), Phase::Visible { page: 2 });
        assert!(nav.state().is_sub_menu());
        assert_eq!(nav.visible_page().len(), 3);
        assert_eq!(nav.interaction().hovered_slice, None);
    }

    #[test]
    fn test_dismiss() {
        let mut nav = opened(13, true);
        let mut host = Vec::new();
        nav.click_slice(5, &mut host);
        nav.resolve_transition(pending_id(&nav), true);

        host.clear();
        nav.dismiss(&mut host);
        assert_eq!(host, vec![Request::Close]);
        assert_eq!(nav.phase(), Phase::Hidden);

        host.clear();
        nav.dismiss(&mut host);
        assert!(host.is_empty());
    }

    #[test]
    fn test_pointer_hover_and_click() {
        let mut nav = opened(4, false);
        let geometry = SliceGeometry::calculate(4, 2);
        let angle = geometry.screen_bisector().to_radians();
        let offset = Point::new(CONTENT_RADIUS * angle.cos(), CONTENT_RADIUS * angle.sin());
        let mut host = Vec::new();

        assert!(nav.pointer_moved(offset));
        assert_eq!(nav.interaction().hovered_slice, Some(2));
        assert!(!nav.pointer_moved(offset));

        assert!(nav.pointer_moved(Point::new(3.0, 4.0)));
        assert!(nav.interaction().center_hovered);
        assert_eq!(nav.interaction().hovered_slice, None);

        nav.click(offset, &mut host);
        assert_eq!(host, vec![Request::Select(2)]);
    }
}
