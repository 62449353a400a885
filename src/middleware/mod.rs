pub mod cache;
pub mod locale;
pub mod minify;

pub use cache::cache_control_middleware;
pub use locale::locale_middleware;
pub use minify::minify_html_middleware;
