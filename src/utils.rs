//! 通用工具：控制台日志与计时。

use std::time::Duration;

/// 输出到浏览器控制台，非 wasm32 目标下为空操作。
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            $crate::utils::log_line(&format!($($arg)*));
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

#[cfg(target_arch = "wasm32")]
pub fn log_line(message: &str) {
    web_sys::console::log_1(&message.into());
}

/// 计时器，浏览器中使用 `Date::now`。
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    #[cfg(target_arch = "wasm32")]
    started_ms: f64,
    #[cfg(not(target_arch = "wasm32"))]
    started: std::time::Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            #[cfg(target_arch = "wasm32")]
            started_ms: web_sys::js_sys::Date::now(),
            #[cfg(not(target_arch = "wasm32"))]
            started: std::time::Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        #[cfg(target_arch = "wasm32")]
        {
            let elapsed_ms = web_sys::js_sys::Date::now() - self.started_ms;
            Duration::from_millis(elapsed_ms.max(0.0) as u64)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.started.elapsed()
        }
    }
}
