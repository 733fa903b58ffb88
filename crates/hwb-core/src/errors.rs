/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the poll loop
/// can classify failures in one place. The messages are operator-facing: they
/// end up inside the failure reports sent to the chat.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Нет доступа к токенам: {}", .names.join(", "))]
    TokenMissing { names: Vec<&'static str> },

    #[error("config error: {0}")]
    Config(String),

    #[error(
        "Непредвиденная ошибка при запросе к API Практикума. \
         Параметры запроса: url={endpoint}. Ошибка - {cause}"
    )]
    Transport { endpoint: String, cause: String },

    #[error(
        "Ошибка доступа к API Практикума. \
         Параметры запроса: url={endpoint}. Статус.код: {status}"
    )]
    Access { status: u16, endpoint: String },

    #[error("Невозможно распарсить JSON из ответа API. В ответе: {excerpt}. Ошибка {cause}")]
    MalformedPayload { excerpt: String, cause: String },

    #[error(
        "Отказ в обслуживании сервера Практикума. \
         Параметры запроса: url={endpoint}. Сообщение сервера: {details}"
    )]
    ServerRejection { endpoint: String, details: String },

    #[error("Ответ API не содержит словаря, получен {found}")]
    InvalidResponseShape { found: &'static str },

    #[error("Отсутствует необходимый ключ \"{field}\" в {scope}")]
    MissingField {
        field: &'static str,
        scope: &'static str,
    },

    #[error("Неверный тип поля \"{field}\": получен {found}, должен быть {expected}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Неизвестный статус домашней работы: {status}")]
    UnknownStatus { status: String },

    #[error("Сбой при отправке сообщения в Телеграм: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Short JSON type name used in shape/type errors.
pub fn json_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "dict",
    }
}
