pub mod about;
pub mod not_found;
pub mod user_detail;
pub mod users;

use crate::config::Config;
use crate::routes::Route;
use crate::store::UserStore;
use crate::ui::view::View;

pub use about::AboutView;
pub use not_found::NotFoundView;
pub use users::UsersView;

/// Build the view that renders `route`
pub fn for_route(route: &Route, store: &mut UserStore, config: &Config) -> Box<dyn View> {
  match route {
    Route::Users | Route::UserDetail(_) => {
      Box::new(UsersView::new(route, store, config.debounce()))
    }
    Route::About => Box::new(AboutView::new(config)),
    Route::NotFound(path) => Box::new(NotFoundView::new(path)),
  }
}
