use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::menu::{self, MenuModel};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use crate::sys::monitor;
use crate::sys::server::HostLink;
use gtk::prelude::*;
use gtk4 as gtk;
use orbit_core::{Hit, HostEvent, OpenPayload, Phase, Point};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use strum::FromRepr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u32)]
enum MouseButton {
    Primary = 1,
    Middle = 2,
    Secondary = 3,
}

pub struct AppModel {
    pub menu: Rc<RefCell<MenuModel>>,
    pub config: Config,
    pub host: HostLink,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

impl AppModel {
    /// The window stays mapped while a page transition is pending, only the menu is blanked.
    fn window_visible(&self) -> bool {
        self.menu.borrow().navigator.phase() != Phase::Hidden
    }

    fn place_on_active_monitor(&mut self) {
        let monitor_height = monitor::get_active_monitor()
            .and_then(|name| window::move_to_monitor(&self.root, &name))
            .unwrap_or(menu::REFERENCE_HEIGHT);
        self.menu
            .borrow_mut()
            .place(monitor_height, self.config.scale);
    }
}

#[derive(Debug)]
pub enum AppMsg {
    Host(HostEvent),
    Click(u32, Point),
    CursorMove(Point),
    CursorLeave,
    Escape,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Host(e) => AppMsg::Host(e),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, HostLink, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Orbit"),
            #[watch]
            set_visible: model.window_visible(),
            add_css_class: "orbit-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Escape);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "orbit-drawing-area",

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::CursorMove(Point::new(x, y)));
                    },
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::CursorLeave);
                    }
                },

                add_controller = gtk::GestureClick {
                    set_button: 0, // Listen to all buttons
                    connect_released[sender] => move |gesture, _, x, y| {
                        sender.input(AppMsg::Click(gesture.current_button(), Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, host, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let menu = Rc::new(RefCell::new(MenuModel::new(
            config.navigator_options(),
            config.scale,
        )));

        let model = AppModel {
            menu: menu.clone(),
            config,
            host,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let menu_draw = model.menu.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = menu::draw(cr, &menu_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let menu_resize = model.menu.clone();
        widgets
            .drawing_area
            .connect_resize(move |_, width, height| {
                menu_resize
                    .borrow_mut()
                    .resize(width as f64, height as f64);
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Host(event) => {
                let opening = !self.window_visible()
                    && matches!(event, HostEvent::OpenRadialMenu(OpenPayload::Show(_)));
                {
                    let mut menu = self.menu.borrow_mut();
                    menu.navigator.handle_event(event);
                    menu.sync_icons();
                }
                if opening {
                    self.place_on_active_monitor();
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::Click(button, point) => {
                let mut menu = self.menu.borrow_mut();
                match MouseButton::from_repr(button) {
                    Some(MouseButton::Primary) => {
                        let offset = menu.to_menu_offset(point);
                        menu.navigator.click(offset, &mut self.host);
                    }
                    Some(MouseButton::Secondary) => menu.navigator.secondary_click(&mut self.host),
                    Some(MouseButton::Middle) | None => return,
                }
                menu.sync_icons();
                self.drawing_area.queue_draw();
            }
            AppMsg::CursorMove(point) => {
                let mut menu = self.menu.borrow_mut();
                let offset = menu.to_menu_offset(point);
                if menu.navigator.pointer_moved(offset) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::CursorLeave => {
                if self.menu.borrow_mut().navigator.hover(Hit::None) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Escape => {
                if self.config.escape_closes {
                    self.menu.borrow_mut().navigator.dismiss(&mut self.host);
                }
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    if new_config.socket_path != self.config.socket_path {
                        log::warn!("socket_path changes take effect after a restart");
                    }
                    {
                        let mut menu = self.menu.borrow_mut();
                        menu.navigator.set_options(new_config.navigator_options());
                        menu.rescale(new_config.scale);
                    }
                    self.config = new_config;
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
