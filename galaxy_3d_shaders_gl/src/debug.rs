/// GL debug output - routes KHR_debug messages to the engine logger
///
/// Messages are counted per severity so a run can end with a short report.
/// Only compiled with the `gl-debug` feature.

use colored::*;
use galaxy_3d_shaders::{engine_error, engine_info, engine_trace, engine_warn};
use glow::HasContext;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::gl_device::GlDevice;

/// Global debug message counters (thread-safe atomic counters)
static DEBUG_STATS: DebugStatsTracker = DebugStatsTracker::new();

/// Debug message counts since the callback was installed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugStats {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub notification: u32,
}

impl DebugStats {
    pub fn total(&self) -> u32 {
        self.high + self.medium + self.low + self.notification
    }
}

struct DebugStatsTracker {
    high: AtomicU32,
    medium: AtomicU32,
    low: AtomicU32,
    notification: AtomicU32,
}

impl DebugStatsTracker {
    const fn new() -> Self {
        Self {
            high: AtomicU32::new(0),
            medium: AtomicU32::new(0),
            low: AtomicU32::new(0),
            notification: AtomicU32::new(0),
        }
    }

    fn counter(&self, severity: u32) -> &AtomicU32 {
        match severity {
            glow::DEBUG_SEVERITY_HIGH => &self.high,
            glow::DEBUG_SEVERITY_MEDIUM => &self.medium,
            glow::DEBUG_SEVERITY_LOW => &self.low,
            _ => &self.notification,
        }
    }

    fn get_stats(&self) -> DebugStats {
        DebugStats {
            high: self.high.load(Ordering::Relaxed),
            medium: self.medium.load(Ordering::Relaxed),
            low: self.low.load(Ordering::Relaxed),
            notification: self.notification.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.high.store(0, Ordering::Relaxed);
        self.medium.store(0, Ordering::Relaxed);
        self.low.store(0, Ordering::Relaxed);
        self.notification.store(0, Ordering::Relaxed);
    }
}

/// Install the debug callback on the device's context and enable synchronous
/// debug output. Does nothing on contexts without KHR_debug.
pub fn install_debug_callback(device: &mut GlDevice) {
    if !device.gl().supports_debug() {
        engine_warn!("galaxy3d::gl", "Context has no debug output, gl-debug callback not installed");
        return;
    }
    DEBUG_STATS.reset();
    let gl = device.gl_mut();
    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(gl_debug_callback);
    }
    engine_info!("galaxy3d::gl", "GL debug output enabled");
}

/// Get current debug message counts
pub fn get_debug_stats() -> DebugStats {
    DEBUG_STATS.get_stats()
}

/// Print debug message counts
pub fn print_debug_stats_report() {
    let stats = get_debug_stats();

    if stats.total() == 0 {
        println!("\n{}", "No GL debug messages".green().bold());
        return;
    }

    println!("\n{}", "=== GL Debug Output Report ===".bright_blue().bold());
    if stats.high > 0 {
        println!("  {} {}", "High:".red().bold(), stats.high);
    }
    if stats.medium > 0 {
        println!("  {} {}", "Medium:".yellow().bold(), stats.medium);
    }
    if stats.low > 0 {
        println!("  {} {}", "Low:".cyan(), stats.low);
    }
    if stats.notification > 0 {
        println!("  {} {}", "Notification:".bright_black(), stats.notification);
    }
    println!("  {} {}", "Total:".white().bold(), stats.total());
    println!("{}\n", "==============================".bright_blue().bold());
}

fn source_name(source: u32) -> &'static str {
    match source {
        glow::DEBUG_SOURCE_API => "API",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window system",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "Third party",
        glow::DEBUG_SOURCE_APPLICATION => "Application",
        _ => "Other",
    }
}

fn type_name(message_type: u32) -> &'static str {
    match message_type {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined behavior",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        _ => "Other",
    }
}

fn gl_debug_callback(source: u32, message_type: u32, id: u32, severity: u32, message: &str) {
    DEBUG_STATS.counter(severity).fetch_add(1, Ordering::Relaxed);

    let context = format!("[{} / {} #{}]", source_name(source), type_name(message_type), id);
    match severity {
        glow::DEBUG_SEVERITY_HIGH => engine_error!("galaxy3d::gl", "{} {}", context, message),
        glow::DEBUG_SEVERITY_MEDIUM => engine_warn!("galaxy3d::gl", "{} {}", context, message),
        glow::DEBUG_SEVERITY_LOW => engine_info!("galaxy3d::gl", "{} {}", context, message),
        _ => engine_trace!("galaxy3d::gl", "{} {}", context, message),
    }
}
