//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] intents.  While the input field has
//! focus, printable characters are typed into it; elsewhere they are
//! commands.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the intent (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the `status.help` string in [`crate::i18n`] for every language.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tracing::warn;

use crate::app::{App, Focus};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.surface().detail.is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Char('o') => app.open_link(),
            KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
            _ => {}
        }
        return;
    }

    let result = match (app.focus, key.code) {
        (_, KeyCode::Tab) => {
            app.focus = app.focus.next();
            Ok(())
        }
        (_, KeyCode::Enter) => app.activate(),
        (_, KeyCode::Esc) => {
            app.quit = true;
            Ok(())
        }
        (Focus::Input, KeyCode::Char(c)) => {
            app.type_char(c);
            Ok(())
        }
        (Focus::Input, KeyCode::Backspace) => {
            app.backspace();
            Ok(())
        }
        (Focus::Input, _) => Ok(()),

        (_, KeyCode::Char('q')) => {
            app.quit = true;
            Ok(())
        }
        (_, KeyCode::Down | KeyCode::Char('j')) => {
            app.select_next();
            Ok(())
        }
        (_, KeyCode::Up | KeyCode::Char('k')) => {
            app.select_previous();
            Ok(())
        }
        (_, KeyCode::Home | KeyCode::Char('g')) => {
            app.select_first();
            Ok(())
        }
        (_, KeyCode::End | KeyCode::Char('G')) => {
            app.select_last();
            Ok(())
        }
        (_, KeyCode::Char('l')) => {
            app.cycle_language();
            Ok(())
        }
        (_, KeyCode::Char('n')) => {
            app.dismiss_banner();
            Ok(())
        }
        (Focus::Sources, KeyCode::Char('d') | KeyCode::Delete) => {
            match app.highlighted_source().map(String::from) {
                Some(id) => app.delete_source(&id),
                None => Ok(()),
            }
        }
        (Focus::Posts, KeyCode::Char('m')) => match app.highlighted_post().map(String::from) {
            Some(id) => app.mark_post_read(&id),
            None => Ok(()),
        },
        _ => Ok(()),
    };

    if let Err(err) = result {
        warn!(%err, "key action rejected");
    }
}
