use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор окна X11
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

impl WindowHandle {
    /// Разобрать идентификатор в десятичной или шестнадцатеричной (0x...) форме
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let value = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok()?,
            None => raw.parse().ok()?,
        };
        if value == 0 {
            return None;
        }
        Some(Self(value))
    }

    /// Формат, который принимает `wmctrl -i`
    pub fn to_hex(&self) -> String {
        format!("0x{:08x}", self.0)
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Информация о найденном окне
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    pub class: String,
}

impl WindowInfo {
    pub fn new(handle: WindowHandle, title: String) -> Self {
        Self {
            handle,
            title,
            class: String::new(),
        }
    }

    pub fn with_class(mut self, class: String) -> Self {
        self.class = class;
        self
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.class.is_empty() {
            write!(f, "#{} \"{}\"", self.handle, self.title)
        } else {
            write!(f, "#{} \"{}\" ({})", self.handle, self.title, self.class)
        }
    }
}
