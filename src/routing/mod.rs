// routing/mod.rs - hand-rolled API routing
//
// Every request that is not `/health` lands in `dispatcher::dispatch`, which
// classifies the path (`matcher`), looks up what the route allows (`policy`)
// and then invokes one resource operation from `handlers`.

pub mod dispatcher;
pub mod matcher;
pub mod policy;

pub use dispatcher::dispatch;
pub use matcher::{classify, CollectionRoute, Resource, Route};
pub use policy::{ApiMethod, Rule};
