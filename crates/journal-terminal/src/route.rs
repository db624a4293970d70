// crates/journal-terminal/src/route.rs

/// One screen of the terminal, addressed like a web path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Dashboard,
    Trades,
    TradeDetail(String),
    Metrics,
    ImportExport,
    AdminUsers,
}

impl Route {
    /// Screens reachable from the tab bar, in order.
    pub const TABS: [Route; 5] = [
        Route::Dashboard,
        Route::Trades,
        Route::Metrics,
        Route::ImportExport,
        Route::AdminUsers,
    ];

    /// Unknown paths fall back to the dashboard.
    pub fn parse(path: &str) -> Route {
        let path = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["dashboard"] => Route::Dashboard,
            ["trades"] => Route::Trades,
            ["trades", id] => Route::TradeDetail(id.to_string()),
            ["metrics"] => Route::Metrics,
            ["import-export"] => Route::ImportExport,
            ["admin", "users"] => Route::AdminUsers,
            _ => Route::Dashboard,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/dashboard".to_string(),
            Route::Trades => "/trades".to_string(),
            Route::TradeDetail(id) => format!("/trades/{}", id),
            Route::Metrics => "/metrics".to_string(),
            Route::ImportExport => "/import-export".to_string(),
            Route::AdminUsers => "/admin/users".to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Trades => "Trades",
            Route::TradeDetail(_) => "Trade",
            Route::Metrics => "Metrics",
            Route::ImportExport => "Import/Export",
            Route::AdminUsers => "Admin",
        }
    }

    /// Tab to highlight; a trade detail belongs to the trades tab.
    pub fn tab_index(&self) -> usize {
        match self {
            Route::Dashboard => 0,
            Route::Trades | Route::TradeDetail(_) => 1,
            Route::Metrics => 2,
            Route::ImportExport => 3,
            Route::AdminUsers => 4,
        }
    }

    pub fn next_tab(&self) -> Route {
        Route::TABS[(self.tab_index() + 1) % Route::TABS.len()].clone()
    }

    pub fn prev_tab(&self) -> Route {
        let n = Route::TABS.len();
        Route::TABS[(self.tab_index() + n - 1) % n].clone()
    }
}
