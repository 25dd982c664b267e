use crate::app::controller::AppController;
use crate::app::state::ConverterState;
use crate::config::Config;
use crate::error::Result;

/// Entry point used by `main` to bootstrap the controller stack. Fetching
/// the symbol catalog or resolving the default selections can fail here, in
/// which case the interactive flow never starts.
pub async fn run() -> Result<()> {
    let config = Config::builtin();
    let state = ConverterState::new(config).await?;
    let controller = AppController::new(state);
    controller.run().await
}
