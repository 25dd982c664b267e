use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::time::Duration;

use crate::app::state::ConverterState;
use crate::error::Result;
use crate::ui::components::chart::{render_rate_chart, TIMEFRAMES};
use crate::ui::components::utils::split_vertical;
use crate::ui::TerminalSession;

/// Actions the dashboard hands back to the controller. Timeframe cycling is
/// handled inside the screen; everything that needs a fetch or another
/// screen leaves the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ConverterAction {
    PickBase,
    PickTarget,
    EditAmount,
    Refresh,
    Exit,
}

pub fn run_converter_screen(
    state: &ConverterState,
    timeframe_index: &mut usize,
) -> Result<ConverterAction> {
    let mut session = TerminalSession::open()?;

    loop {
        session.draw(|f| draw_dashboard(f, state, *timeframe_index))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('b') => {
                        session.release()?;
                        return Ok(ConverterAction::PickBase);
                    }
                    KeyCode::Char('t') => {
                        session.release()?;
                        return Ok(ConverterAction::PickTarget);
                    }
                    KeyCode::Char('a') | KeyCode::Enter => {
                        session.release()?;
                        return Ok(ConverterAction::EditAmount);
                    }
                    KeyCode::Char('r') => {
                        session.release()?;
                        return Ok(ConverterAction::Refresh);
                    }
                    KeyCode::Left | KeyCode::Char('h') => {
                        *timeframe_index =
                            (*timeframe_index + TIMEFRAMES.len() - 1) % TIMEFRAMES.len();
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        *timeframe_index = (*timeframe_index + 1) % TIMEFRAMES.len();
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        session.release()?;
                        return Ok(ConverterAction::Exit);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        session.release()?;
                        return Ok(ConverterAction::Exit);
                    }
                    _ => {}
                }
            }
        }
    }
}

fn draw_dashboard(f: &mut Frame<'_>, state: &ConverterState, timeframe_index: usize) {
    let chunks = split_vertical(
        f.size(),
        &[
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(1),
        ],
    );

    let base = state.base();
    let target = state.target();

    let rate_line = match (state.rate(), state.rate_error()) {
        (Some(rate), _) => Line::from(format!("1 {} = {:.4} {}", base, rate, target)),
        (None, Some(err)) => Line::from(err.to_string()).red(),
        (None, None) => Line::from("No rate available."),
    };
    let header = Paragraph::new(vec![
        Line::from(format!("Currency Converter — {} -> {}", base, target))
            .style(Style::default().fg(Color::Cyan)),
        rate_line,
    ]);
    f.render_widget(header, chunks[0]);

    let converted_line = match state.converted_amount() {
        Some(converted) => Line::from(format!(
            "{} {} = {:.4} {}",
            state.amount(),
            base,
            converted,
            target
        )),
        None => Line::from("Converted amount unavailable.").gray(),
    };
    let converter = Paragraph::new(vec![
        Line::from(format!("Amount: {} {}", state.amount(), base)),
        converted_line,
    ])
    .block(Block::default().borders(Borders::ALL).title("Converter"));
    f.render_widget(converter, chunks[1]);

    if let Some(series) = state.series() {
        render_rate_chart(f, chunks[2], base, target, series, timeframe_index);
    } else {
        let message = match (state.series_error(), state.rate_error()) {
            (Some(err), _) => err.to_string(),
            (None, Some(_)) => "History skipped after the rate fetch failed.".to_string(),
            (None, None) => "No historical data.".to_string(),
        };
        f.render_widget(
            Paragraph::new(message).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{}/{} — history", base, target)),
            ),
            chunks[2],
        );
    }

    let help = Paragraph::new(
        "b base • t target • a amount • r refresh • ←/→ timeframe • q quit",
    )
    .style(Style::default().fg(Color::Gray));
    f.render_widget(help, chunks[3]);
}
