pub mod config;
pub mod events;

pub mod gui {
    pub mod app;
    pub mod menu;
    pub mod theme;
    pub mod window;
}

pub mod sys {
    pub mod monitor;
    pub mod runtime;
    pub mod server;
}
