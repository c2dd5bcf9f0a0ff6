/// Top-level views of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    /// OAuth redirect target carrying the authorization code
    Callback,
    View,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Callback => "/callback",
            Route::View => "/view",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Route changes requested by the orchestrator.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
