use crate::app::state::ConverterState;
use crate::error::Result;
use crate::ui::components::chart::DEFAULT_TIMEFRAME_INDEX;
use crate::ui::{run_amount_editor, run_converter_screen, run_currency_picker, ConverterAction};

/// Coordinates the converter state and the TUI screens. Screens are
/// synchronous loops; the network calls happen between them, awaited one at
/// a time.
pub struct AppController {
    state: ConverterState,
    timeframe_index: usize,
}

impl AppController {
    pub fn new(state: ConverterState) -> Self {
        Self {
            state,
            timeframe_index: DEFAULT_TIMEFRAME_INDEX,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.state.refresh().await;

        loop {
            match run_converter_screen(&self.state, &mut self.timeframe_index)? {
                ConverterAction::PickBase => {
                    let picked = run_currency_picker(
                        "Select base currency",
                        self.state.catalog(),
                        self.state.base(),
                    )?;
                    if let Some(code) = picked {
                        if self.state.set_base(&code) {
                            self.state.refresh().await;
                        }
                    }
                }
                ConverterAction::PickTarget => {
                    let picked = run_currency_picker(
                        "Select conversion currency",
                        self.state.catalog(),
                        self.state.target(),
                    )?;
                    if let Some(code) = picked {
                        if self.state.set_target(&code) {
                            self.state.refresh().await;
                        }
                    }
                }
                ConverterAction::EditAmount => {
                    if let Some(amount) =
                        run_amount_editor(self.state.base(), self.state.amount())?
                    {
                        self.state.set_amount(amount);
                    }
                }
                ConverterAction::Refresh => {
                    self.state.refresh().await;
                }
                ConverterAction::Exit => return Ok(()),
            }
        }
    }
}
