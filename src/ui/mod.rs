pub mod components;
pub mod screens;

pub use components::terminal::TerminalSession;
pub use screens::{
    run_amount_editor, run_converter_screen, run_currency_picker, ConverterAction,
};
