use thiserror::Error;

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("no negotiation providers registered, at least one is required")]
    NoProviders,
}
