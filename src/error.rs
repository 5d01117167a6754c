/// Input table missing or unreadable.
pub const EXIT_INPUT: u8 = 2;
/// Input table lacks one or more required columns.
pub const EXIT_SCHEMA: u8 = 3;
/// Figure could not be rendered or written.
pub const EXIT_OUTPUT: u8 = 4;
/// Invalid configuration (flags or environment).
pub const EXIT_SETTINGS: u8 = 5;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(EXIT_SCHEMA, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(EXIT_OUTPUT, message)
    }

    pub fn settings(message: impl Into<String>) -> Self {
        Self::new(EXIT_SETTINGS, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
