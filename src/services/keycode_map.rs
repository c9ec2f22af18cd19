use evdev::KeyCode;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Маппинг между именами клавиш и кодами evdev
pub struct KeycodeMap;

// Клавиши, которые нужны для навигации по документам
static KEY_NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // Навигация
    map.insert("pagedown", KeyCode::KEY_PAGEDOWN.code());
    map.insert("pageup", KeyCode::KEY_PAGEUP.code());
    map.insert("home", KeyCode::KEY_HOME.code());
    map.insert("end", KeyCode::KEY_END.code());
    map.insert("up", KeyCode::KEY_UP.code());
    map.insert("down", KeyCode::KEY_DOWN.code());
    map.insert("left", KeyCode::KEY_LEFT.code());
    map.insert("right", KeyCode::KEY_RIGHT.code());

    // Цифры (набор номера слайда)
    map.insert("0", KeyCode::KEY_0.code());
    map.insert("1", KeyCode::KEY_1.code());
    map.insert("2", KeyCode::KEY_2.code());
    map.insert("3", KeyCode::KEY_3.code());
    map.insert("4", KeyCode::KEY_4.code());
    map.insert("5", KeyCode::KEY_5.code());
    map.insert("6", KeyCode::KEY_6.code());
    map.insert("7", KeyCode::KEY_7.code());
    map.insert("8", KeyCode::KEY_8.code());
    map.insert("9", KeyCode::KEY_9.code());

    // Специальные клавиши
    map.insert("space", KeyCode::KEY_SPACE.code());
    map.insert("enter", KeyCode::KEY_ENTER.code());
    map.insert("escape", KeyCode::KEY_ESC.code());
    map.insert("tab", KeyCode::KEY_TAB.code());
    map.insert("f5", KeyCode::KEY_F5.code());

    // Буквы горячих клавиш (ctrl+g - переход к странице)
    map.insert("g", KeyCode::KEY_G.code());

    // Модификаторы
    map.insert("ctrl", KeyCode::KEY_LEFTCTRL.code());
    map.insert("alt", KeyCode::KEY_LEFTALT.code());
    map.insert("shift", KeyCode::KEY_LEFTSHIFT.code());
    map.insert("super", KeyCode::KEY_LEFTMETA.code());

    map
});

static CODE_TO_KEY_NAME: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    KEY_NAME_TO_CODE.iter().map(|(&name, &code)| (code, name)).collect()
});

impl KeycodeMap {
    /// Получить код клавиши по её имени
    pub fn get_keycode(key_name: &str) -> Result<u16, String> {
        let normalized = key_name.to_lowercase();
        let normalized = match normalized.as_str() {
            "page_down" | "pgdn" => "pagedown",
            "page_up" | "pgup" => "pageup",
            "esc" => "escape",
            "return" => "enter",
            "control" => "ctrl",
            other => other,
        };
        KEY_NAME_TO_CODE
            .get(normalized)
            .copied()
            .ok_or_else(|| format!("Unknown key: {}", key_name))
    }

    /// Получить имя клавиши по её коду
    pub fn get_key_name(keycode: u16) -> Option<&'static str> {
        CODE_TO_KEY_NAME.get(&keycode).copied()
    }

    /// Проверить, является ли клавиша модификатором
    pub fn is_modifier(key_name: &str) -> bool {
        let normalized = key_name.to_lowercase();
        matches!(normalized.as_str(), "ctrl" | "control" | "alt" | "shift" | "super")
    }

    /// Имена клавиш для набора десятичного числа
    pub fn digits_of(number: usize) -> Vec<&'static str> {
        number
            .to_string()
            .bytes()
            .filter_map(|b| match b {
                b'0' => Some("0"),
                b'1' => Some("1"),
                b'2' => Some("2"),
                b'3' => Some("3"),
                b'4' => Some("4"),
                b'5' => Some("5"),
                b'6' => Some("6"),
                b'7' => Some("7"),
                b'8' => Some("8"),
                b'9' => Some("9"),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_key_mapping() {
        assert_eq!(KeycodeMap::get_keycode("pagedown").unwrap(), 109);
        assert_eq!(KeycodeMap::get_keycode("enter").unwrap(), 28);
        assert_eq!(KeycodeMap::get_keycode("ctrl").unwrap(), 29);
    }

    #[test]
    fn test_aliases_and_case() {
        assert_eq!(KeycodeMap::get_keycode("Page_Down").unwrap(), 109);
        assert_eq!(KeycodeMap::get_keycode("PGUP").unwrap(), 104);
        assert_eq!(KeycodeMap::get_keycode("Return").unwrap(), 28);
    }

    #[test]
    fn test_reverse_mapping() {
        assert_eq!(KeycodeMap::get_key_name(109), Some("pagedown"));
        assert_eq!(KeycodeMap::get_key_name(2), Some("1"));
    }

    #[test]
    fn test_invalid_key() {
        assert!(KeycodeMap::get_keycode("invalid_key").is_err());
    }

    #[test]
    fn test_modifier_detection() {
        assert!(KeycodeMap::is_modifier("ctrl"));
        assert!(KeycodeMap::is_modifier("SHIFT"));
        assert!(!KeycodeMap::is_modifier("pagedown"));
    }

    #[test]
    fn test_digits_of() {
        assert_eq!(KeycodeMap::digits_of(7), vec!["7"]);
        assert_eq!(KeycodeMap::digits_of(120), vec!["1", "2", "0"]);
    }
}
