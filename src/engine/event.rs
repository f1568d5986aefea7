//! Transport-neutral inbound events and outbound replies

/// What the user did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `/name` command, name without the slash
    Command(String),
    /// Inline button press carrying a [`MenuAction::id`]
    ButtonPress(String),
    FreeText(String),
}

impl InboundEvent {
    /// Classify raw message text: a leading `/` makes it a command
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.strip_prefix('/') {
            Some(rest) if !rest.is_empty() => {
                let name = rest.split_whitespace().next().unwrap_or(rest);
                // "/start@my_bot" in group chats
                let name = name.split('@').next().unwrap_or(name);
                InboundEvent::Command(name.to_string())
            }
            _ => InboundEvent::FreeText(trimmed.to_string()),
        }
    }
}

/// Main menu buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    TotalTime,
    AverageTime,
    TotalWeight,
    LastTraining,
    Motivate,
    NewTraining,
}

impl MenuAction {
    /// Callback payload sent back by the transport
    pub fn id(&self) -> &'static str {
        match self {
            MenuAction::TotalTime => "TOTAL_TIME",
            MenuAction::AverageTime => "AVERAGE_TIME",
            MenuAction::TotalWeight => "TOTAL_WEIGHT",
            MenuAction::LastTraining => "LAST_TRAINING",
            MenuAction::Motivate => "MOTIVATE",
            MenuAction::NewTraining => "NEW_TRAINING",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::TotalTime => "⏱ Общее время",
            MenuAction::AverageTime => "📊 Среднее время",
            MenuAction::TotalWeight => "⚖️ Вес",
            MenuAction::LastTraining => "📅 Последняя тренировка",
            MenuAction::Motivate => "💪 Мотивация",
            MenuAction::NewTraining => "➕ Новая тренировка",
        }
    }

    pub fn all() -> &'static [MenuAction] {
        &[
            MenuAction::TotalTime,
            MenuAction::AverageTime,
            MenuAction::TotalWeight,
            MenuAction::LastTraining,
            MenuAction::Motivate,
            MenuAction::NewTraining,
        ]
    }

    /// Exact, case-sensitive match on the payload
    pub fn from_id(id: &str) -> Option<MenuAction> {
        Self::all().iter().copied().find(|action| action.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub action: MenuAction,
}

impl From<MenuAction> for MenuButton {
    fn from(action: MenuAction) -> Self {
        Self {
            label: action.label().to_string(),
            action,
        }
    }
}

/// Keyboard layout, row by row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub rows: Vec<Vec<MenuButton>>,
}

impl Menu {
    pub fn main() -> Self {
        let row = |actions: &[MenuAction]| -> Vec<MenuButton> {
            actions.iter().copied().map(MenuButton::from).collect()
        };
        Self {
            rows: vec![
                row(&[MenuAction::TotalTime, MenuAction::AverageTime]),
                row(&[MenuAction::TotalWeight, MenuAction::LastTraining]),
                row(&[MenuAction::Motivate]),
                row(&[MenuAction::NewTraining]),
            ],
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &MenuButton> {
        self.rows.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub text: String,
    pub menu: Option<Menu>,
}

impl OutboundReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            menu: None,
        }
    }

    pub fn with_menu(text: impl Into<String>, menu: Menu) -> Self {
        Self {
            text: text.into(),
            menu: Some(menu),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_command() {
        assert_eq!(
            InboundEvent::from_text("/start"),
            InboundEvent::Command("start".to_string())
        );
        assert_eq!(
            InboundEvent::from_text("  /Start@gym_bot  "),
            InboundEvent::Command("Start".to_string())
        );
        assert_eq!(
            InboundEvent::from_text("/help me"),
            InboundEvent::Command("help".to_string())
        );
    }

    #[test]
    fn test_from_text_free_text() {
        assert_eq!(
            InboundEvent::from_text(" Ноги "),
            InboundEvent::FreeText("Ноги".to_string())
        );
        assert_eq!(InboundEvent::from_text("/"), InboundEvent::FreeText("/".to_string()));
    }

    #[test]
    fn test_menu_action_ids_round_trip() {
        for action in MenuAction::all() {
            assert_eq!(MenuAction::from_id(action.id()), Some(*action));
        }
    }

    #[test]
    fn test_menu_action_ids_are_exact() {
        assert_eq!(MenuAction::from_id("total_time"), None);
        assert_eq!(MenuAction::from_id(" TOTAL_TIME"), None);
        assert_eq!(MenuAction::from_id(""), None);
    }

    #[test]
    fn test_main_menu_has_every_action_once() {
        let menu = Menu::main();
        let actions: Vec<_> = menu.buttons().map(|b| b.action).collect();
        assert_eq!(actions.len(), MenuAction::all().len());
        for action in MenuAction::all() {
            assert!(actions.contains(action), "{:?} missing from menu", action);
        }
    }
}
