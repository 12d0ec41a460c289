// Browser automation over the Chrome DevTools Protocol

mod chrome_finder;
mod error;
mod launcher;
mod locator;
mod profile;
mod session;

pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use launcher::ChromeLauncher;
pub use profile::ProfileManager;
pub use session::ChromeSession;
