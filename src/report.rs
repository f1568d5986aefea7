//! Reports over a chat's training history

use crate::store::TrainingEntry;

const HOURS_PER_DAY: f64 = 24.0;
const HOURS_PER_MONTH: f64 = 24.0 * 30.0;

fn total_hours(history: &[TrainingEntry]) -> f64 {
    history.iter().map(|e| e.duration_hours).sum()
}

/// Total training time, scaled to hours, days or months
pub fn total_time(history: &[TrainingEntry]) -> String {
    if history.is_empty() {
        return "Общее время тренировок: 0 часов.".to_string();
    }

    let hours = total_hours(history);
    if hours < HOURS_PER_DAY {
        format!("Общее время тренировок: {:.2} часа.", hours)
    } else if hours < HOURS_PER_MONTH {
        format!("Общее время тренировок: {:.2} дней.", hours / HOURS_PER_DAY)
    } else {
        format!("Общее время тренировок: {:.2} месяцев.", hours / HOURS_PER_MONTH)
    }
}

/// Mean session length in hours
pub fn average_time(history: &[TrainingEntry]) -> Option<String> {
    if history.is_empty() {
        return None;
    }

    let average = total_hours(history) / history.len() as f64;
    Some(format!("Среднее время тренировки: {:.2} часа.", average))
}

/// Sum of recorded weights. `None` both for an empty history and for one
/// where nothing positive was recorded; callers cannot tell them apart.
pub fn total_weight(history: &[TrainingEntry]) -> Option<f64> {
    let total: f64 = history.iter().map(|e| e.weight.unwrap_or(0.0)).sum();
    (total > 0.0).then_some(total)
}

/// Human-readable length of a single session.
///
/// Thresholds differ from [`total_time`]: minutes below one hour, days only
/// above 24 hours.
pub fn duration_label(hours: f64) -> String {
    if hours < 1.0 {
        format!("{} минут", (hours * 60.0).round() as i64)
    } else if hours > HOURS_PER_DAY {
        format!("{:.2} дней", hours / HOURS_PER_DAY)
    } else {
        format!("{:.2} часа", hours)
    }
}

/// Summary of the most recent training
pub fn last_entry(history: &[TrainingEntry]) -> Option<String> {
    let last = history.last()?;

    let weight = match last.weight {
        Some(kg) => format!("Вес: {:.1} кг", kg),
        None => "Вес: не указан".to_string(),
    };

    Some(format!(
        "📅 Последняя тренировка\n\
        Группа мышц: {}\n\
        Продолжительность: {}\n\
        {}",
        last.muscle_group,
        duration_label(last.duration_hours),
        weight
    ))
}
