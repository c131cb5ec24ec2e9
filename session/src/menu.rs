//! Clickable buttons of the menu and shop screens.

use glam::Vec2;
use lane_defence_core::{DefenderKind, GameState, PixelRect, Rules};

const MENU_BUTTON_WIDTH: i32 = 200;
const SHOP_BUTTON_WIDTH: i32 = 300;
const BUTTON_HEIGHT: i32 = 50;
const BUTTON_SPACING: i32 = 60;

/// Effect of clicking a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// Starts a new round.
    StartGame,
    /// Opens the shop.
    OpenShop,
    /// Ends the frame loop.
    Exit,
    /// Selects a defender kind for placement.
    Select(DefenderKind),
    /// Returns from the shop to the menu.
    BackToMenu,
}

/// Labelled rectangle reacting to pointer hover and clicks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    /// Caption drawn in the centre of the button.
    pub label: String,
    /// Screen area covered by the button.
    pub rect: PixelRect,
    /// Effect triggered on click.
    pub action: ButtonAction,
    /// Whether the pointer currently rests on the button.
    pub hovered: bool,
}

impl Button {
    fn new(label: impl Into<String>, rect: PixelRect, action: ButtonAction) -> Self {
        Self {
            label: label.into(),
            rect,
            action,
            hovered: false,
        }
    }

    fn contains(&self, position: Vec2) -> bool {
        self.rect
            .contains(position.x.floor() as i32, position.y.floor() as i32)
    }
}

/// Buttons of the menu and shop screens laid out around the screen centre.
#[derive(Clone, Debug)]
pub(crate) struct MenuLayout {
    menu: Vec<Button>,
    shop: Vec<Button>,
}

impl MenuLayout {
    pub(crate) fn new(rules: &Rules) -> Self {
        let center_x = rules.screen_width / 2;
        let center_y = rules.screen_height / 2;
        let column = |width: i32, index: i32| {
            PixelRect::new(
                center_x - width / 2,
                center_y - BUTTON_SPACING + index * BUTTON_SPACING,
                width,
                BUTTON_HEIGHT,
            )
        };

        let menu = vec![
            Button::new(
                "Start Game",
                column(MENU_BUTTON_WIDTH, 0),
                ButtonAction::StartGame,
            ),
            Button::new("Shop", column(MENU_BUTTON_WIDTH, 1), ButtonAction::OpenShop),
            Button::new("Exit", column(MENU_BUTTON_WIDTH, 2), ButtonAction::Exit),
        ];
        let shop = vec![
            Button::new(
                shop_label(rules, DefenderKind::Attacker),
                column(SHOP_BUTTON_WIDTH, 0),
                ButtonAction::Select(DefenderKind::Attacker),
            ),
            Button::new(
                shop_label(rules, DefenderKind::Blocker),
                column(SHOP_BUTTON_WIDTH, 1),
                ButtonAction::Select(DefenderKind::Blocker),
            ),
            Button::new(
                "Back to Menu",
                column(SHOP_BUTTON_WIDTH, 2),
                ButtonAction::BackToMenu,
            ),
        ];

        Self { menu, shop }
    }

    /// Buttons shown in the provided state.
    pub(crate) fn buttons(&self, state: GameState) -> &[Button] {
        match state {
            GameState::Menu => &self.menu,
            GameState::Shop => &self.shop,
            GameState::Playing => &[],
        }
    }

    /// Refreshes hover flags for the pointer position.
    pub(crate) fn hover(&mut self, state: GameState, position: Vec2) {
        let buttons = match state {
            GameState::Menu => &mut self.menu,
            GameState::Shop => &mut self.shop,
            GameState::Playing => return,
        };
        for button in buttons {
            button.hovered = button.contains(position);
        }
    }

    /// Action of the button under the pointer, if any.
    pub(crate) fn hit(&self, state: GameState, position: Vec2) -> Option<ButtonAction> {
        self.buttons(state)
            .iter()
            .find(|button| button.contains(position))
            .map(|button| button.action)
    }
}

fn shop_label(rules: &Rules, kind: DefenderKind) -> String {
    format!("{} - {} Sun", kind.label(), rules.cost(kind))
}
