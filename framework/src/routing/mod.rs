mod group;
mod router;
mod table;
mod urls;

pub use group::{GroupBuilder, GroupRouter};
pub use router::{BoxedHandler, Dispatch, RouteBuilder, Router};
pub use table::{Route, RouteError, RouteTable};
pub use urls::Urls;
