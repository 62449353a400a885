mod locale;
mod negotiate;
mod preference;
mod resolve;

pub use locale::*;
pub use negotiate::negotiate;
pub use preference::*;
pub use resolve::*;
