//! Notification texts.

use crate::errors::Error;

pub const NO_CHANGE_NOTICE: &str = "Новые статусы в домашней работе отсутствуют";
pub const STARTUP_NOTICE: &str = "Бот включен.";

pub fn format_change_notice(homework_name: &str, verdict: &str) -> String {
    format!("Изменился статус проверки работы \"{homework_name}\". {verdict}")
}

pub fn format_no_change_notice() -> String {
    NO_CHANGE_NOTICE.to_string()
}

pub fn format_startup_notice() -> String {
    STARTUP_NOTICE.to_string()
}

/// Failure report for the chat, prefixed by what kind of fault it was.
pub fn format_failure_notice(err: &Error) -> String {
    match err {
        Error::Transport { .. } => format!("Неполадки соединения: {err}"),
        Error::Access { .. } | Error::ServerRejection { .. } => {
            format!("Ошибка доступа: {err}")
        }
        _ => format!("Сбой в работе программы: {err}"),
    }
}

/// Cut `text` to at most `max_len` bytes on a char boundary.
pub fn truncate_for_delivery(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
