use image::{DynamicImage, Rgba, RgbaImage};
use parking_lot::Mutex;
use std::sync::Arc;

const FRAME_WIDTH: u32 = 160;
const FRAME_HEIGHT: u32 = 120;

#[derive(Debug)]
struct ScreenState {
    current: usize,
    total: usize,
}

/// Общий для dry-run сервисов "экран" с документом из `total` страниц.
///
/// Документ листает его по индексу или вперёд, захват рисует текущую страницу.
/// Прокрутка за последнюю страницу ничего не меняет, как в настоящем просмотрщике.
#[derive(Debug, Clone)]
pub struct SimulatedScreen {
    state: Arc<Mutex<ScreenState>>,
}

impl SimulatedScreen {
    pub fn new(total: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScreenState { current: 1, total })),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.state.lock().total
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().current
    }

    /// Перейти к странице по номеру (с 1); `false`, если номера нет
    pub fn select(&self, index: usize) -> bool {
        let mut state = self.state.lock();
        if index == 0 || index > state.total {
            return false;
        }
        state.current = index;
        true
    }

    pub fn scroll_forward(&self) {
        let mut state = self.state.lock();
        if state.current < state.total {
            state.current += 1;
        }
    }

    /// Кадр однозначно определяется номером текущей страницы
    pub fn render(&self) -> DynamicImage {
        let page = self.current_page();
        let shade = (page * 37 % 256) as u8;
        let stripe_top = (page as u32 * 7) % FRAME_HEIGHT;

        let frame = RgbaImage::from_fn(FRAME_WIDTH, FRAME_HEIGHT, |_, y| {
            if y >= stripe_top && y < stripe_top + 4 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([shade, 255 - shade, (page % 256) as u8, 255])
            }
        });
        DynamicImage::ImageRgba8(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_saturates_at_last_page() {
        let screen = SimulatedScreen::new(2);
        screen.scroll_forward();
        screen.scroll_forward();
        assert_eq!(screen.current_page(), 2);
    }

    #[test]
    fn test_select_bounds() {
        let screen = SimulatedScreen::new(3);
        assert!(screen.select(3));
        assert!(!screen.select(4));
        assert!(!screen.select(0));
        assert_eq!(screen.current_page(), 3);
    }

    #[test]
    fn test_render_differs_between_pages() {
        let screen = SimulatedScreen::new(3);
        let first = screen.render().to_rgba8();
        screen.scroll_forward();
        let second = screen.render().to_rgba8();
        assert_ne!(first.as_raw(), second.as_raw());

        let again = screen.render().to_rgba8();
        assert_eq!(second.as_raw(), again.as_raw());
    }
}
