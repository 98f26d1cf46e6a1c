//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (pure state in [`input`])
//! - Fullscreen and orientation lock (web only)
//! - Touch device detection

pub mod input;

pub use input::{InputState, Joystick};

/// Whether the page runs on a touch device
#[cfg(target_arch = "wasm32")]
pub fn is_touch_device() -> bool {
    web_sys::window()
        .map(|w| w.navigator().max_touch_points() > 0)
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn is_touch_device() -> bool {
    false
}

/// Enter fullscreen and try to lock landscape, or leave fullscreen
///
/// Browser refusals are logged and otherwise ignored.
#[cfg(target_arch = "wasm32")]
pub fn toggle_fullscreen() {
    use wasm_bindgen_futures::JsFuture;
    use web_sys::OrientationLockType;

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    if document.fullscreen_element().is_some() {
        document.exit_fullscreen();
        if let Ok(screen) = window.screen() {
            if let Err(e) = screen.orientation().unlock() {
                log::warn!("Orientation unlock failed: {:?}", e);
            }
        }
        return;
    }

    let Some(root) = document.document_element() else {
        return;
    };
    if let Err(e) = root.request_fullscreen() {
        log::error!("Error attempting to enable fullscreen: {:?}", e);
        return;
    }

    let Ok(screen) = window.screen() else {
        return;
    };
    match screen.orientation().lock(OrientationLockType::Landscape) {
        Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("Orientation lock not supported or failed: {:?}", e);
            }
        }),
        Err(e) => log::warn!("Orientation lock not supported or failed: {:?}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn toggle_fullscreen() {
    log::info!("Fullscreen is only available in the browser");
}
