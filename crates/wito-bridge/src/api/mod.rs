//! The standard host capability: window, screen, theme, filesystem, and
//! notification operations.
//!
//! Compose it with application capabilities through
//! [`RegistryBuilder::with`](crate::registry::RegistryBuilder::with).

pub mod fs;
mod services;

#[cfg(test)]
mod tests;

pub use services::{
    HostServices, LogNotifier, Notifier, ScreenSource, ThemeSource, WindowControl,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use wito_common::{Notification, NotificationPriority, WindowSize};

use crate::args::Args;
use crate::registry::{Capability, ExposureTable};

pub struct HostApi {
    services: HostServices,
    app_path: PathBuf,
}

impl HostApi {
    /// `app_path` is what `fs_get_app_path` reports.
    pub fn new(services: HostServices, app_path: impl Into<PathBuf>) -> Self {
        Self {
            services,
            app_path: app_path.into(),
        }
    }

    pub fn app_path(&self) -> &Path {
        &self.app_path
    }
}

fn path_arg(args: &Args) -> Result<PathBuf, wito_common::BridgeError> {
    args.get::<PathBuf>("path")
}

impl Capability for HostApi {
    fn expose(self: Arc<Self>, table: &mut ExposureTable) {
        let s = &self.services;

        let theme = Arc::clone(&s.theme);
        table.method("get_theme_mode", &[], move |_| Ok(theme.theme()));

        let screen = Arc::clone(&s.screen);
        table.method("screen_get_info", &[], move |_| Ok(screen.screen_info()));

        let win = Arc::clone(&s.window);
        table.method("win_is_fullscreen", &[], move |_| Ok(win.is_fullscreen()));

        let win = Arc::clone(&s.window);
        table.method("win_fullscreen", &[], move |_| {
            win.set_fullscreen(true);
            Ok(())
        });

        let win = Arc::clone(&s.window);
        table.method("win_unfullscreen", &[], move |_| {
            win.set_fullscreen(false);
            Ok(())
        });

        let win = Arc::clone(&s.window);
        table.method("win_get_focus", &[], move |_| Ok(win.has_focus()));

        let win = Arc::clone(&s.window);
        table.method("win_set_focus", &[], move |_| {
            win.focus();
            Ok(())
        });

        let win = Arc::clone(&s.window);
        table.method("win_set_title", &["title"], move |args| {
            let title: String = args.get("title")?;
            win.set_title(&title);
            Ok(json!({ "success": true }))
        });

        let win = Arc::clone(&s.window);
        table.method("win_get_size", &[], move |_| Ok(win.inner_size()));

        let win = Arc::clone(&s.window);
        table.method("win_set_size", &["width", "height"], move |args| {
            let size = WindowSize {
                width: args.get("width")?,
                height: args.get("height")?,
            };
            win.request_size(size);
            Ok(json!({ "success": true }))
        });

        let this = Arc::clone(&self);
        table.method("fs_get_app_path", &[], move |_| {
            Ok(json!({ "path": this.app_path.to_string_lossy() }))
        });

        table.background("fs_list_dir", &["path"], |args| Ok(fs::list_dir(&path_arg(args)?)));
        table.method("fs_create_dir", &["path"], |args| Ok(fs::create_dir(&path_arg(args)?)));
        table.background("fs_del_file", &["path"], |args| Ok(fs::delete_file(&path_arg(args)?)));
        table.background("fs_read_file", &["path"], |args| Ok(fs::read_file(&path_arg(args)?)));
        table.background("fs_save_file", &["path", "content"], |args| {
            let content: String = args.get("content")?;
            Ok(fs::save_file(&path_arg(args)?, &content))
        });
        table.method("fs_file_exists", &["path"], |args| Ok(fs::file_exists(&path_arg(args)?)));

        let notifier = Arc::clone(&s.notifier);
        table.method("notify", &["title", "body", "priority"], move |args| {
            let priority: String = args.get_or("priority", "normal".to_string())?;
            let notification = Notification::new(
                args.get::<String>("title")?,
                args.get::<String>("body")?,
            )
            .with_priority(NotificationPriority::parse(&priority));
            Ok(notifier.notify(&notification))
        });
    }
}
