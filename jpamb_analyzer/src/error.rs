/// Result type used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Fatal errors surfaced by either half of the driver, following the
/// `#[error(transparent)]` wrapping convention used at every crate boundary
/// in this workspace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Abstract(#[from] jpamb_abstract::Error),
    #[error(transparent)]
    Concrete(#[from] jpamb_concrete::Error),
    #[error(transparent)]
    Loader(#[from] jpamb_loader::Error),
}
