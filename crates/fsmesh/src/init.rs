//! Initialization and lifecycle management for fsmesh-rs.

use fsmesh_core::Options;

use crate::Result;

/// Initializes fsmesh with default options.
///
/// This sets up logging (if the host has not already installed a logger) and
/// the global model registry used by [`crate::load_surface`].
///
/// # Errors
///
/// Returns an error if fsmesh has already been initialized.
///
/// # Example
///
/// ```no_run
/// use fsmesh_rs::*;
///
/// fn main() -> Result<()> {
///     init()?;
///     let model = load_surface("subjects/bert/surf/lh.white");
///     assert!(model.is_some());
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    let _ = env_logger::try_init();
    fsmesh_core::state::init_context()?;
    log::info!("fsmesh-rs initialized");
    Ok(())
}

/// Initializes fsmesh and installs the given options.
pub fn init_with_options(options: Options) -> Result<()> {
    init()?;
    fsmesh_core::with_context_mut(|ctx| ctx.options = options);
    Ok(())
}

/// Returns whether fsmesh has been initialized.
#[must_use]
pub fn is_initialized() -> bool {
    fsmesh_core::state::is_initialized()
}

/// Shuts down fsmesh, dropping every loaded model.
///
/// [`init()`] may be called again afterwards.
pub fn shutdown() {
    fsmesh_core::state::shutdown_context();
    log::info!("fsmesh-rs shut down");
}
