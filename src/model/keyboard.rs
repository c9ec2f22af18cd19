use crate::services::keycode_map::KeycodeMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl From<evdev::KeyCode> for KeyCode {
    fn from(key: evdev::KeyCode) -> Self {
        Self(key.code())
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match KeycodeMap::get_key_name(self.0) {
            Some(name) => f.write_str(name),
            None => write!(f, "KEY_{}", self.0),
        }
    }
}

/// Комбинация клавиш: модификаторы удерживаются, пока нажимается основная клавиша
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub modifiers: SmallVec<[KeyCode; 2]>,
    pub key: KeyCode,
}

impl KeyChord {
    /// Разобрать запись вида `ctrl+pagedown`
    pub fn parse(spec: &str) -> Result<Self, String> {
        let parts: Vec<&str> = spec
            .split('+')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let (key_name, modifier_names) = match parts.split_last() {
            Some(split) => split,
            None => return Err(format!("Пустая комбинация клавиш: '{}'", spec)),
        };

        let mut modifiers = SmallVec::new();
        for name in modifier_names {
            if !KeycodeMap::is_modifier(name) {
                return Err(format!("'{}' не является модификатором в '{}'", name, spec));
            }
            modifiers.push(KeyCode(KeycodeMap::get_keycode(name)?));
        }

        Ok(Self {
            modifiers,
            key: KeyCode(KeycodeMap::get_keycode(key_name)?),
        })
    }

    /// Последовательность событий: модификаторы вниз, клавиша вниз/вверх, модификаторы вверх
    pub fn events(&self) -> Vec<VirtualKeyEvent> {
        let mut events = Vec::with_capacity(self.modifiers.len() * 2 + 2);
        events.extend(self.modifiers.iter().map(|m| VirtualKeyEvent::press(*m)));
        events.push(VirtualKeyEvent::press(self.key));
        events.push(VirtualKeyEvent::release(self.key));
        events.extend(self.modifiers.iter().rev().map(|m| VirtualKeyEvent::release(*m)));
        events
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        write!(f, "{}", self.key)
    }
}

/// События для виртуальной клавиатуры
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualKeyEvent {
    pub key_code: KeyCode,
    pub state: KeyState,
}

impl VirtualKeyEvent {
    pub fn press(key_code: KeyCode) -> Self {
        Self {
            key_code,
            state: KeyState::Pressed,
        }
    }

    pub fn release(key_code: KeyCode) -> Self {
        Self {
            key_code,
            state: KeyState::Released,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_key() {
        let chord = KeyChord::parse("pagedown").unwrap();
        assert!(chord.modifiers.is_empty());
        assert_eq!(chord.key, KeyCode::from(evdev::KeyCode::KEY_PAGEDOWN));
    }

    #[test]
    fn test_parse_chord_with_modifier() {
        let chord = KeyChord::parse("Ctrl + PageUp").unwrap();
        assert_eq!(chord.modifiers.as_slice(), &[KeyCode::from(evdev::KeyCode::KEY_LEFTCTRL)]);
        assert_eq!(chord.key, KeyCode::from(evdev::KeyCode::KEY_PAGEUP));
        assert_eq!(chord.to_string(), "ctrl+pageup");
    }

    #[test]
    fn test_parse_rejects_non_modifier_prefix() {
        assert!(KeyChord::parse("a+pagedown").is_err());
        assert!(KeyChord::parse("").is_err());
        assert!(KeyChord::parse("ctrl+nosuchkey").is_err());
    }

    #[test]
    fn test_chord_event_order() {
        let chord = KeyChord::parse("ctrl+pagedown").unwrap();
        let ctrl = KeyCode::from(evdev::KeyCode::KEY_LEFTCTRL);
        let pgdn = KeyCode::from(evdev::KeyCode::KEY_PAGEDOWN);
        assert_eq!(
            chord.events(),
            vec![
                VirtualKeyEvent::press(ctrl),
                VirtualKeyEvent::press(pgdn),
                VirtualKeyEvent::release(pgdn),
                VirtualKeyEvent::release(ctrl),
            ]
        );
    }
}
