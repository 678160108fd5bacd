use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, serde_as};

pub const DEFAULT_ICON_SIZE: f64 = 50.0;
pub const MAX_ICON_SIZE: f64 = 100.0;
pub const MORE_ICON: &str = "ellipsis-h";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct IconName(String);

crate::impl_string_newtype!(IconName);

/// Sub-menu group an item belongs to, used to pick the page a menu opens on.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct MenuId(String);

crate::impl_string_newtype!(MenuId);

/// Either a symbolic icon name or a direct image location.
///
/// Hosts send a plain string or a `[prefix, name]` pair (`["fas", "car"]`); the prefix only
/// selects an icon style on the host side and is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawIcon", into = "String")]
pub enum IconSource {
    Url(String),
    Named(IconName),
}

impl IconSource {
    pub fn is_url(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl From<String> for IconSource {
    fn from(s: String) -> Self {
        if looks_like_url(&s) {
            Self::Url(s)
        } else {
            Self::Named(IconName::new(s))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIcon {
    Text(String),
    Prefixed(String, String),
}

impl From<RawIcon> for IconSource {
    fn from(raw: RawIcon) -> Self {
        match raw {
            RawIcon::Text(s) => Self::from(s),
            RawIcon::Prefixed(_, name) => Self::Named(IconName::new(name)),
        }
    }
}

impl From<&str> for IconSource {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<IconSource> for String {
    fn from(icon: IconSource) -> Self {
        match icon {
            IconSource::Url(url) => url,
            IconSource::Named(name) => name.into(),
        }
    }
}

fn looks_like_url(s: &str) -> bool {
    s.contains("://") || s.starts_with('/') || s.starts_with("./") || s.starts_with("../")
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(default)]
    pub label: String,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconSource>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_width: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<MenuId>,
    /// Set only on the synthetic tile that leads to the next page.
    #[serde(skip)]
    pub is_more: bool,
}

impl MenuItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_icon(mut self, icon: impl Into<IconSource>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_menu(mut self, menu: impl Into<String>) -> Self {
        self.menu = Some(MenuId::new(menu));
        self
    }

    pub fn more(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: Some(IconSource::Named(IconName::new(MORE_ICON))),
            is_more: true,
            ..Self::default()
        }
    }

    /// Icon box size in view-box units. Zero counts as unset.
    pub fn icon_size(&self) -> (f64, f64) {
        (
            clamp_icon_dimension(self.icon_width),
            clamp_icon_dimension(self.icon_height),
        )
    }

    pub fn belongs_to(&self, menu: &MenuId) -> bool {
        self.menu.as_ref() == Some(menu)
    }
}

fn clamp_icon_dimension(value: Option<f64>) -> f64 {
    value
        .filter(|v| *v != 0.0 && !v.is_nan())
        .unwrap_or(DEFAULT_ICON_SIZE)
        .clamp(0.0, MAX_ICON_SIZE)
}
