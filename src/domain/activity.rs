// Activity log domain model

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Ok,
    Err,
}

impl LogLevel {
    pub fn icon(self) -> &'static str {
        match self {
            LogLevel::Ok => "✔",
            LogLevel::Err => "✖",
            LogLevel::Info => "•",
        }
    }
}
