//! Selector catalogue for the Catch-e screens.
//!
//! Each control is described by an ordered list of candidates. The first
//! candidate present on the page wins, so the most specific selector comes
//! first and looser fallbacks follow.

use serde::Serialize;
use std::fmt;

/// How to find an element on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// Plain CSS selector
    Css(&'static str),
    /// Elements matching `scope` whose text equals (`exact`) or contains `text`
    Text {
        scope: &'static str,
        text: &'static str,
        exact: bool,
    },
}

impl Selector {
    pub const fn css(selector: &'static str) -> Self {
        Selector::Css(selector)
    }

    pub const fn contains(scope: &'static str, text: &'static str) -> Self {
        Selector::Text {
            scope,
            text,
            exact: false,
        }
    }

    pub const fn exact(text: &'static str) -> Self {
        Selector::Text {
            scope: "*",
            text,
            exact: true,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => write!(f, "{}", css),
            Selector::Text {
                text, exact: true, ..
            } => write!(f, "text=\"{}\"", text),
            Selector::Text { scope, text, .. } => write!(f, "{}:has-text(\"{}\")", scope, text),
        }
    }
}

// Login form

pub const USERNAME: &[Selector] = &[
    Selector::css("input[name='username']"),
    Selector::css("input[name='user']"),
    Selector::css("input[name='email']"),
    Selector::css("input[name='login']"),
    Selector::css("input[type='text']"),
    Selector::css("#username"),
    Selector::css("#user"),
    Selector::css("#email"),
];

pub const PASSWORD: &[Selector] = &[
    Selector::css("input[name='password']"),
    Selector::css("input[type='password']"),
    Selector::css("#password"),
];

pub const SUBMIT: &[Selector] = &[
    Selector::css("button[type='submit']"),
    Selector::css("input[type='submit']"),
    Selector::contains("button", "Login"),
    Selector::contains("button", "Sign in"),
    Selector::css("input[value*='Login']"),
];

// Top navigation

pub const FLEET_MENU: &[Selector] = &[
    Selector::css("td[id=\"HM_Menu1_top\"]"),
    Selector::contains("td", "Fleet"),
    Selector::css("[onmouseover*=\"HM_Menu1\"]"),
    Selector::contains(".top_menu_off", "Fleet"),
];

pub const CARD_SERVICES_MENU: &[Selector] = &[
    Selector::exact("Card Services"),
    Selector::contains("td", "Card Services"),
    Selector::contains("[onmouseover]", "Card Services"),
];

pub const TRANSACTIONS_MENU: &[Selector] = &[
    Selector::exact("Transactions"),
    Selector::contains("td", "Transactions"),
    Selector::contains("a", "Transactions"),
];

// Import flow

pub const IMPORT_BUTTON: &[Selector] = &[
    Selector::css("input[name=\"button_import\"]"),
    Selector::css("input[id=\"button_import\"]"),
    Selector::css("input[value=\"Import\"]"),
    Selector::css(".formbutton[value=\"Import\"]"),
];

pub const INTERFACE_CODE_INPUT: &[Selector] = &[
    Selector::css("input[name=\"fm_int_interface_code\"]"),
    Selector::css("input[id=\"fm_int_interface_code\"]"),
    Selector::css(".forminput.border_input[name=\"fm_int_interface_code\"]"),
];

pub const SEARCH_BUTTON: &[Selector] = &[
    Selector::css("i.catch_e_icon_search"),
    Selector::css("i.catch-e-icon-lookingglass1"),
    Selector::css("i[title=\"Find\"]"),
    Selector::css(".catch_e_icon_search"),
    Selector::css(".catch-e-icon-lookingglass1"),
    Selector::css("i[class*=\"catch_e_icon_search\"]"),
    Selector::css("i[class*=\"lookingglass\"]"),
];

// Upload controls

/// The "browse" link inside the attachment dropzone; opens the file chooser
pub const DROPZONE_BROWSE: Selector = Selector::css("#file-attachment-dropzone a");
