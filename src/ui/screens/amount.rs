use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::time::Duration;

use crate::error::Result;
use crate::ui::components::utils::centered_rect;
use crate::ui::TerminalSession;

/// Numeric amount editor. Accepts only digits and one decimal point while
/// typing; Enter hands back a finite value, Esc keeps the previous amount.
pub fn run_amount_editor(base: &str, current: f64) -> Result<Option<f64>> {
    let mut session = TerminalSession::open()?;
    let mut buffer = current.to_string();
    let mut invalid = false;

    loop {
        session.draw(|f| {
            let area = centered_rect(60, 40, f.size());
            f.render_widget(Clear, area);

            let mut lines = vec![
                Line::from(format!("Enter the amount of {} to convert", base)),
                Line::from(format!("> {}_", buffer)),
            ];
            if invalid {
                lines.push(Line::from("Not a finite number.").red());
            }
            lines.push(Line::from("Enter accept • Esc cancel").gray());

            let editor = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Amount"));
            f.render_widget(editor, area);
        })?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char(c) if c.is_ascii_digit() => {
                        buffer.push(c);
                        invalid = false;
                    }
                    KeyCode::Char('.') if !buffer.contains('.') => {
                        buffer.push('.');
                        invalid = false;
                    }
                    KeyCode::Backspace => {
                        buffer.pop();
                        invalid = false;
                    }
                    KeyCode::Enter => match buffer.trim().parse::<f64>() {
                        Ok(value) if value.is_finite() => {
                            session.release()?;
                            return Ok(Some(value));
                        }
                        _ => invalid = true,
                    },
                    KeyCode::Esc => {
                        session.release()?;
                        return Ok(None);
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        session.release()?;
                        return Ok(None);
                    }
                    _ => {}
                }
            }
        }
    }
}
