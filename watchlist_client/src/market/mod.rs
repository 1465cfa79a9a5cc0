//! Market data client: the provider seam, its HTTP implementation, and the
//! dispatcher that runs requests off the state-owning thread.
pub mod dispatcher;
pub mod provider;
