use crate::config::Config;
use crate::error::{PagecapError, Result};
use crate::model::{KeyChord, KeyState, VirtualKeyEvent};
use crate::services::simulated_screen::SimulatedScreen;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Отправка синтетических нажатий в окно, имеющее фокус
pub trait KeySender: Send + Sync {
    fn tap(&self, chord: &KeyChord) -> Result<()>;

    fn tap_sequence(&self, chords: &[KeyChord]) -> Result<()> {
        for chord in chords {
            self.tap(chord)?;
        }
        Ok(())
    }
}

pub struct VirtualDevice {
    device: Mutex<uinput::Device>,
    device_name: String,
}

impl VirtualDevice {
    pub fn new(device_name: &str) -> Result<Self> {
        info!("Инициализация VirtualDevice '{}'", device_name);

        Ok(Self {
            device: Mutex::new(Self::create_virtual_device(device_name)?),
            device_name: device_name.to_string(),
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!("Создание виртуального устройства uinput '{}' для инъекции клавиш", device_name);

        let virtual_device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .create()
            .map_err(|e| {
                PagecapError::Internal(format!(
                    "Не удалось создать виртуальное устройство '{}': {}",
                    device_name, e
                ))
            })?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(virtual_device)
    }

    pub fn send_event(&self, event: VirtualKeyEvent) -> Result<()> {
        debug!("Обработка виртуального события: {:?}", event);

        let keycode = event.key_code.value() as i32;
        let value = match event.state {
            KeyState::Pressed => 1,
            KeyState::Released => 0,
        };

        let mut device = self.device.lock();

        // Отправляем событие клавиши
        if let Err(e) = device.write(1, keycode, value) {
            return Err(PagecapError::Internal(format!(
                "Не удалось отправить событие клавиши {}: {}",
                keycode, e
            )));
        }

        // Синхронизируем события
        if let Err(e) = device.write(0, 0, 0) {
            return Err(PagecapError::Internal(format!(
                "Не удалось синхронизировать события: {}",
                e
            )));
        }

        Ok(())
    }
}

impl KeySender for VirtualDevice {
    fn tap(&self, chord: &KeyChord) -> Result<()> {
        debug!("Нажатие {} через '{}'", chord, self.device_name);
        for event in chord.events() {
            self.send_event(event)?;
        }
        Ok(())
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        info!("Закрытие виртуального устройства '{}'", self.device_name);
    }
}

/// Нажатия в режиме сухого запуска: PageDown листает симулированный экран
pub struct DryRunKeySender {
    screen: SimulatedScreen,
    advance: KeyChord,
}

impl DryRunKeySender {
    pub fn new(screen: SimulatedScreen, advance: KeyChord) -> Self {
        Self { screen, advance }
    }
}

impl KeySender for DryRunKeySender {
    fn tap(&self, chord: &KeyChord) -> Result<()> {
        info!("[DRY RUN] Нажатие {}", chord);
        if *chord == self.advance {
            self.screen.scroll_forward();
        }
        Ok(())
    }
}

/// Factory function to create a key sender based on the dry_run flag
pub fn create_key_sender(
    config: &Config,
    screen: SimulatedScreen,
    dry_run: bool,
) -> Result<Arc<dyn KeySender>> {
    if dry_run {
        Ok(Arc::new(DryRunKeySender::new(screen, config.advance_chord()?)))
    } else {
        Ok(Arc::new(VirtualDevice::new("Pagecap Virtual Keyboard")?))
    }
}
