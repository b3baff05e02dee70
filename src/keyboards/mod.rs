//! Keyboard rendering
//!
//! The presentation adapter: maps the engine's abstract [`Markup`] onto
//! Telegram reply and inline keyboards. Main menus are rendered straight
//! from the menu registry so the buttons and the dispatch table can never
//! drift apart.

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};

use crate::handlers::menu::{MenuRegistry, CANCEL_CALLBACK, CANCEL_LABEL};
use crate::handlers::{Markup, OptionItem};
use crate::models::user::Role;

/// Render a reply's markup into transport markup.
pub fn render(markup: &Markup, menu: &MenuRegistry) -> Option<ReplyMarkup> {
    match markup {
        Markup::None => None,
        Markup::Menu(role) => Some(ReplyMarkup::Keyboard(main_menu(menu, *role))),
        Markup::Cancel => Some(ReplyMarkup::Keyboard(cancel_keyboard())),
        Markup::Options(options) => Some(ReplyMarkup::InlineKeyboard(options_keyboard(options))),
    }
}

/// The role's main menu as a reply keyboard, two buttons per row.
pub fn main_menu(menu: &MenuRegistry, role: Role) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = menu
        .labels_for(role)
        .chunks(2)
        .map(|chunk| chunk.iter().map(|label| KeyboardButton::new(*label)).collect())
        .collect();

    let mut markup = KeyboardMarkup::new(rows);
    markup.resize_keyboard = true;
    markup
}

/// Just the cancel button.
pub fn cancel_keyboard() -> KeyboardMarkup {
    let mut markup = KeyboardMarkup::new(vec![vec![KeyboardButton::new(CANCEL_LABEL)]]);
    markup.resize_keyboard = true;
    markup
}

/// A closed option set as an inline keyboard, one option per row, with a
/// cancel button appended.
pub fn options_keyboard(options: &[OptionItem]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = options
        .iter()
        .map(|option| {
            vec![InlineKeyboardButton::callback(
                option.label.clone(),
                option.token.clone(),
            )]
        })
        .collect();
    rows.push(vec![InlineKeyboardButton::callback(
        CANCEL_LABEL,
        CANCEL_CALLBACK,
    )]);

    InlineKeyboardMarkup::new(rows)
}
