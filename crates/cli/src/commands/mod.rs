pub mod list;
pub mod submit;

use billed_core::Route;
use billed_employee::Navigator;
use tracing::info;

/// Navigator for a terminal session: there is no page to move to, so the
/// requested route is only logged.
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        info!(route = %route, "navigate");
    }
}
