//! Page integration - container lookup, canvas creation, button wiring

use showroom_core::RenderSurface;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::actions::{ActionQueue, ViewerAction};

/// Id given to the canvas created inside the container
pub const CANVAS_ID: &str = "showroom-canvas";

/// The page element the viewer renders into
pub struct DomSurface {
    window: web_sys::Window,
    document: Document,
    container: HtmlElement,
}

impl DomSurface {
    /// Look up the container by id
    pub fn find(container_id: &str) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let container = document
            .get_element_by_id(container_id)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(Self {
            window,
            document,
            container,
        })
    }

    /// Append a full-size canvas to the container and return its CSS selector
    pub fn attach_canvas(&self) -> Result<String, JsValue> {
        let canvas = self.document.create_element("canvas")?;
        canvas.set_id(CANVAS_ID);
        canvas.set_attribute("style", "display:block;width:100%;height:100%;outline:none")?;
        self.container.append_child(&canvas)?;
        Ok(format!("#{}", CANVAS_ID))
    }

    /// Add a click listener to an optional button. Returns false if the
    /// button is not on the page.
    pub fn wire_button(&self, id: &str, queue: &ActionQueue, action: ViewerAction) -> bool {
        let Some(button) = self.document.get_element_by_id(id) else {
            tracing::debug!("No #{} button, {:?} not wired", id, action);
            return false;
        };

        let queue = queue.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || queue.push(action));
        if let Err(e) = button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()) {
            tracing::warn!("Failed to wire #{}: {:?}", id, e);
            return false;
        }
        // The listener lives as long as the page
        on_click.forget();
        true
    }
}

impl RenderSurface for DomSurface {
    fn client_size(&self) -> (u32, u32) {
        (
            self.container.client_width().max(0) as u32,
            self.container.client_height().max(0) as u32,
        )
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.window.device_pixel_ratio() as f32
    }
}
