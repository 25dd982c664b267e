use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{prelude::*, widgets::*};
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::fetch::CurrencySymbol;
use crate::ui::components::utils::split_vertical;
use crate::ui::TerminalSession;

/// Scrollable catalog picker with type-to-filter. Returns the chosen code,
/// or `None` when the user backs out (the current selection stays).
pub fn run_currency_picker(
    title: &str,
    symbols: &[CurrencySymbol],
    current: &str,
) -> Result<Option<String>> {
    if symbols.is_empty() {
        return Err(AppError::message("No currencies available to pick from"));
    }

    let mut session = TerminalSession::open()?;
    let mut query = String::new();
    let mut selected = symbols
        .iter()
        .position(|symbol| symbol.code == current)
        .unwrap_or(0);

    loop {
        let filtered = filter_symbols(symbols, &query);
        if selected >= filtered.len() {
            selected = filtered.len().saturating_sub(1);
        }

        session.draw(|f| {
            let chunks = split_vertical(
                f.size(),
                &[
                    Constraint::Length(2),
                    Constraint::Min(3),
                    Constraint::Length(1),
                ],
            );

            let header = Paragraph::new(vec![
                Line::from(title.to_string()).style(Style::default().fg(Color::Cyan)),
                Line::from(format!("Filter: {}_", query)),
            ]);
            f.render_widget(header, chunks[0]);

            let items: Vec<ListItem> = filtered
                .iter()
                .map(|&idx| {
                    let symbol = &symbols[idx];
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:<5}", symbol.code),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw("  "),
                        Span::raw(symbol.description.as_str()),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Currencies (type to filter, ↑/↓ move)"),
                )
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

            let mut list_state = ListState::default();
            if !filtered.is_empty() {
                list_state.select(Some(selected));
            }
            f.render_stateful_widget(list, chunks[1], &mut list_state);

            let help = Paragraph::new("Enter select • Backspace edit filter • Esc cancel")
                .style(Style::default().fg(Color::Gray));
            f.render_widget(help, chunks[2]);
        })?;

        if event::poll(Duration::from_millis(150))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Up => {
                        if !filtered.is_empty() {
                            selected = if selected == 0 {
                                filtered.len() - 1
                            } else {
                                selected - 1
                            };
                        }
                    }
                    KeyCode::Down => {
                        if !filtered.is_empty() {
                            selected = (selected + 1) % filtered.len();
                        }
                    }
                    KeyCode::Enter => {
                        if let Some(&idx) = filtered.get(selected) {
                            let code = symbols[idx].code.clone();
                            session.release()?;
                            return Ok(Some(code));
                        }
                    }
                    KeyCode::Backspace => {
                        query.pop();
                        selected = 0;
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        session.release()?;
                        return Ok(None);
                    }
                    KeyCode::Char(c) if !c.is_control() => {
                        query.push(c);
                        selected = 0;
                    }
                    KeyCode::Esc => {
                        session.release()?;
                        return Ok(None);
                    }
                    _ => {}
                }
            }
        }
    }
}

fn filter_symbols(symbols: &[CurrencySymbol], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..symbols.len()).collect();
    }

    let needle = query.to_lowercase();
    symbols
        .iter()
        .enumerate()
        .filter(|(_, symbol)| {
            symbol.code.to_lowercase().contains(&needle)
                || symbol.description.to_lowercase().contains(&needle)
        })
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CurrencySymbol> {
        [
            ("USD", "United States Dollar"),
            ("EUR", "Euro"),
            ("JPY", "Japanese Yen"),
        ]
        .into_iter()
        .map(|(code, description)| CurrencySymbol {
            code: code.to_string(),
            description: description.to_string(),
        })
        .collect()
    }

    #[test]
    fn empty_query_keeps_catalog_order() {
        assert_eq!(filter_symbols(&catalog(), ""), vec![0, 1, 2]);
    }

    #[test]
    fn query_matches_code_and_description() {
        let symbols = catalog();
        assert_eq!(filter_symbols(&symbols, "eur"), vec![1]);
        assert_eq!(filter_symbols(&symbols, "yen"), vec![2]);
        assert!(filter_symbols(&symbols, "zzz").is_empty());
    }
}
