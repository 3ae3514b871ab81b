//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                 | Connects to                  |
//! |------------|----------------------------|------------------------------|
//! | `hardware` | IndicatorPort, ButtonPort  | LEDC PWM, button GPIO        |
//! | `flash`    | FlashPort                  | `hsvstore` partition / RAM   |
//! | `log_sink` | EventSink                  | Serial log output            |
//! | `time`     | -                          | ESP32 system timer           |
//! | `console`  | -                          | stdin/stdout serial console  |

pub mod console;
pub mod flash;
pub mod hardware;
pub mod log_sink;
pub mod time;
