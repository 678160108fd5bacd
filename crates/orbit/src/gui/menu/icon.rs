use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use orbit_core::{IconName, IconSource};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Host icon names that have a different freedesktop spelling.
const ALIASES: &[(&str, &str)] = &[
    ("ellipsis-h", "view-more-horizontal"),
    ("close", "window-close"),
    ("xmark", "window-close"),
    ("back", "edit-undo"),
    ("arrow-rotate-left", "edit-undo"),
];

static LOOKUPS: OnceLock<RwLock<HashMap<IconName, Option<PathBuf>>>> = OnceLock::new();

pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    let cache = LOOKUPS.get_or_init(|| RwLock::new(HashMap::new()));
    if let Some(hit) = cache.read().get(icon_name) {
        return hit.clone();
    }

    let found = lookup_theme(icon_name);
    if found.is_none() {
        log::debug!("No theme icon for '{}'", icon_name);
    }
    cache.write().insert(icon_name.clone(), found.clone());
    found
}

fn lookup_theme(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let name = ALIASES
        .iter()
        .find(|(alias, _)| *alias == icon_name.as_str())
        .map_or(icon_name.as_str(), |(_, name)| *name);

    [name.to_string(), format!("{name}-symbolic")]
        .iter()
        .find_map(|candidate| lookup(candidate).with_size(64).with_scale(1).find())
}

fn local_path(url: &str) -> Option<PathBuf> {
    let path = url.strip_prefix("file://").unwrap_or(url);
    if path.contains("://") {
        log::warn!("Remote icon '{}' is not supported, showing label only", url);
        return None;
    }
    let path = Path::new(path);
    path.exists().then(|| path.to_path_buf())
}

pub fn resolve(source: &IconSource) -> Option<PathBuf> {
    match source {
        IconSource::Named(name) => find_icon_path(name),
        IconSource::Url(url) => local_path(url),
    }
}

pub fn load(source: &IconSource, size: i32) -> Option<Pixbuf> {
    let path = resolve(source)?;
    Pixbuf::from_file_at_scale(&path, size, size, true)
        .map_err(|e| log::warn!("Failed to load icon {}: {}", path.display(), e))
        .ok()
}
