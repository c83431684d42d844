//! Global Application State
//!
//! Toasts, the loading flag, and the browser implementations of the host
//! capabilities (dialogs, navigation, session cookie).

use expense_dash::{expired_cookie, DashError, DashResult, Navigator, Notifier, Page, SessionStore};
use leptos::*;
use wasm_bindgen::JsCast;

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// A page load or refresh is in flight
    pub loading: RwSignal<bool>,
    /// When the last load finished (ms since epoch)
    pub last_refresh: RwSignal<Option<i64>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        loading: create_rw_signal(false),
        last_refresh: create_rw_signal(None),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Record a finished load
    pub fn mark_refreshed(&self) {
        self.loading.set(false);
        self.last_refresh.set(Some(chrono::Utc::now().timestamp_millis()));
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        web_sys::console::error_1(&message.into());
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}

/// Full page navigation
pub fn go_to(page: Page) {
    if let Some(window) = web_sys::window() {
        if window.location().set_href(page.path()).is_err() {
            web_sys::console::error_1(&format!("Failed to navigate to {}", page.path()).into());
        }
    }
}

/// Blocking browser dialogs, navigation and the session cookie
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHost;

impl Notifier for BrowserHost {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn notify(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

impl Navigator for BrowserHost {
    fn navigate(&self, page: Page) {
        go_to(page);
    }
}

impl SessionStore for BrowserHost {
    fn clear_session(&self) -> DashResult<()> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
            .ok_or_else(|| DashError::Io("no document".to_string()))?;

        document
            .set_cookie(&expired_cookie())
            .map_err(|_| DashError::Io("cannot clear session cookie".to_string()))
    }
}
