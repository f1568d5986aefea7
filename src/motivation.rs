//! Motivation module - случайная фраза для кнопки "Мотивация"

use rand::seq::SliceRandom;

/// Source of motivational text
pub trait MotivationProvider: Send + Sync {
    fn random(&self) -> String;
}

pub const PHRASES: &[&str] = &[
    "💪 Единственная плохая тренировка — та, которой не было.",
    "🔥 Сегодня тяжело, завтра легче. Продолжай!",
    "🏋️ Сила приходит не от побед, а от преодоления.",
    "⏱ Двадцать минут лучше, чем ноль. Начни прямо сейчас.",
    "🥇 Дисциплина — это делать то, что нужно, даже когда не хочется.",
    "🚀 Каждый подход приближает тебя к цели.",
    "🧠 Тело достигает того, во что верит разум.",
    "📈 Маленький прогресс — всё равно прогресс.",
    "😤 Устал? Отдохни. Но не сдавайся.",
    "🌅 Лучшее время начать было вчера. Следующее лучшее — сегодня.",
];

/// Picks a phrase from [`PHRASES`] uniformly at random
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomMotivation;

impl MotivationProvider for RandomMotivation {
    fn random(&self) -> String {
        PHRASES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(PHRASES[0])
            .to_string()
    }
}
