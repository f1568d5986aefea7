//! Conversation engine - menu-driven dialogue for logging a training

mod event;

use tracing::{debug, error};

use crate::error::{StoreError, parse_decimal};
use crate::motivation::{MotivationProvider, RandomMotivation};
use crate::report;
use crate::store::{ChatIdentity, ChatSession, DialogueState, UserStore};

pub use event::{InboundEvent, Menu, MenuAction, MenuButton, OutboundReply};

const MENU_TITLE: &str = "📊 Тренировочный бот\nВыбери действие:";
const HELP_TEXT: &str = "Бот ведёт дневник тренировок.\n\n\
    ➕ Новая тренировка - группа мышц, продолжительность, вес\n\
    ⏱ Общее время и 📊 Среднее время - по всем тренировкам\n\
    ⚖️ Вес - суммарный вес\n\
    📅 Последняя тренировка - что было в прошлый раз\n\n\
    /start - открыть меню";
const USE_MENU: &str = "Напиши /start, чтобы открыть меню.";
const ASK_MUSCLE_GROUP: &str = "Начинаем новую тренировку. Введи группу мышц:";
const ASK_DURATION: &str =
    "Группа мышц сохранена. Теперь введи продолжительность (в часах, например 1.5):";
const ASK_WEIGHT: &str = "Продолжительность сохранена. Теперь введи вес (кг) или 'Нет':";
const BAD_DURATION: &str = "Ошибка: введи число, например 1.5";
const BAD_WEIGHT: &str = "Ошибка: введи число или 'Нет'";
const NO_DATA: &str = "📅 Нет данных о последней тренировке.";
const NO_AVERAGE: &str = "📊 Пока нет тренировок для подсчёта среднего.";
const NO_WEIGHT: &str = "⚖️ Вес не указан ни в одной тренировке.";
const BROKEN_DIALOGUE: &str = "⚠️ Что-то пошло не так. Начни тренировку заново.";

/// Words that skip the weight step
const SKIP_WEIGHT: &[&str] = &["нет", "no"];

/// Anything that can turn an inbound event into a reply
pub trait ConversationHandler: Send + Sync {
    fn handle(&self, chat: ChatIdentity, event: InboundEvent) -> OutboundReply;
}

/// State machine over [`DialogueState`], one instance shared by all chats
pub struct ConversationEngine {
    store: UserStore,
    motivation: Box<dyn MotivationProvider>,
}

impl ConversationEngine {
    pub fn new() -> Self {
        Self::with_motivation(RandomMotivation)
    }

    pub fn with_motivation(motivation: impl MotivationProvider + 'static) -> Self {
        Self {
            store: UserStore::new(),
            motivation: Box::new(motivation),
        }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    fn on_command(&self, name: &str) -> OutboundReply {
        match name.trim().trim_start_matches('/').to_lowercase().as_str() {
            "start" => OutboundReply::with_menu(MENU_TITLE, Menu::main()),
            "help" => OutboundReply::with_menu(HELP_TEXT, Menu::main()),
            other => {
                debug!("Unknown command: {}", other);
                OutboundReply::text(USE_MENU)
            }
        }
    }

    fn on_button(&self, session: &mut ChatSession, id: &str) -> OutboundReply {
        let Some(action) = MenuAction::from_id(id) else {
            debug!("Chat {} pressed unknown button {:?}", session.chat(), id);
            return OutboundReply::text(USE_MENU);
        };

        let history = session.history();
        match action {
            MenuAction::TotalTime => OutboundReply::text(report::total_time(history)),
            MenuAction::AverageTime => {
                OutboundReply::text(report::average_time(history).unwrap_or_else(|| NO_AVERAGE.to_string()))
            }
            MenuAction::TotalWeight => OutboundReply::text(match report::total_weight(history) {
                Some(kg) => format!("⚖️ Общий вес за все тренировки: {:.1} кг", kg),
                None => NO_WEIGHT.to_string(),
            }),
            MenuAction::LastTraining => {
                OutboundReply::text(report::last_entry(history).unwrap_or_else(|| NO_DATA.to_string()))
            }
            MenuAction::Motivate => OutboundReply::text(self.motivation.random()),
            MenuAction::NewTraining => {
                session.set_state(DialogueState::AwaitingMuscleGroup);
                OutboundReply::text(ASK_MUSCLE_GROUP)
            }
        }
    }

    fn on_text(&self, session: &mut ChatSession, text: &str) -> Result<OutboundReply, StoreError> {
        let text = text.trim();

        let reply = match session.state() {
            DialogueState::Idle => OutboundReply::text(USE_MENU),

            DialogueState::AwaitingMuscleGroup => {
                if text.is_empty() {
                    return Ok(OutboundReply::text(ASK_MUSCLE_GROUP));
                }
                session.save_muscle_group(text)?;
                session.set_state(DialogueState::AwaitingDuration);
                OutboundReply::text(ASK_DURATION)
            }

            DialogueState::AwaitingDuration => match parse_decimal(text) {
                Ok(hours) => {
                    session.save_duration(hours)?;
                    session.set_state(DialogueState::AwaitingWeight);
                    OutboundReply::text(ASK_WEIGHT)
                }
                Err(e) => {
                    debug!("Chat {} sent bad duration: {}", session.chat(), e);
                    OutboundReply::text(BAD_DURATION)
                }
            },

            DialogueState::AwaitingWeight => {
                if !is_skip_word(text) {
                    match parse_decimal(text) {
                        Ok(kg) => session.save_weight(kg)?,
                        Err(e) => {
                            debug!("Chat {} sent bad weight: {}", session.chat(), e);
                            return Ok(OutboundReply::text(BAD_WEIGHT));
                        }
                    }
                }
                if !session.finish_training()? {
                    return Err(StoreError::NoActiveEntry(session.chat()));
                }
                session.set_state(DialogueState::Idle);
                OutboundReply::with_menu(
                    format!("✅ Тренировка сохранена!\n{}", report::total_time(session.history())),
                    Menu::main(),
                )
            }
        };

        Ok(reply)
    }

    /// The dialogue lost its in-flight entry; nothing to resume, so start over
    fn recover(session: &mut ChatSession, err: StoreError) -> OutboundReply {
        error!("Dialogue broken for chat {} in {:?}: {}", session.chat(), session.state(), err);
        session.set_state(DialogueState::Idle);
        OutboundReply::with_menu(BROKEN_DIALOGUE, Menu::main())
    }
}

impl Default for ConversationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationHandler for ConversationEngine {
    fn handle(&self, chat: ChatIdentity, event: InboundEvent) -> OutboundReply {
        // Whole event under the chat's lock: no interleaving within one chat
        self.store.with_session(chat, |session| match event {
            InboundEvent::Command(name) => self.on_command(&name),
            InboundEvent::ButtonPress(id) => self.on_button(session, &id),
            InboundEvent::FreeText(text) => {
                let result = self.on_text(session, &text);
                result.unwrap_or_else(|err| Self::recover(session, err))
            }
        })
    }
}

fn is_skip_word(text: &str) -> bool {
    SKIP_WEIGHT.iter().any(|word| text.to_lowercase() == *word)
}
