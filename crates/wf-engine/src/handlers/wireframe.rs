//! `CREATE_WIREFRAME`.

use super::decode;
use crate::engine::Engine;
use crate::error::CommandResult;
use serde::Deserialize;
use serde_json::{Value, json};
use wf_core::color::parse_color_str;
use wf_core::{BrandColors, Host, Paint, PrimitiveKind, extract_brand_colors};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireframePayload {
    name: Option<String>,
    description: Option<String>,
    pages: Option<Vec<String>>,
    width: Option<f32>,
    height: Option<f32>,
    device_type: Option<String>,
    brand_colors: Option<BrandColors>,
}

/// Create a host page for the wireframe with one frame per named page,
/// laid out left to right, and make it the active context.
pub fn create_wireframe<H: Host>(engine: &mut Engine<H>, payload: Value) -> CommandResult<Value> {
    let payload: WireframePayload = decode(payload)?;
    let name = payload.name.unwrap_or_else(|| "Wireframe".to_string());

    let mut brand = extract_brand_colors(payload.description.as_deref().unwrap_or_default());
    if let Some(explicit) = payload.brand_colors {
        brand.extend(explicit);
    }
    engine.session.set_brand_colors(brand.clone());

    let page = engine.host.create_page(&name);
    if !engine.session.switch_to_page(&mut engine.host, page) {
        log::warn!("could not focus new page {page}");
    }

    let preset = engine
        .config
        .devices
        .for_device(payload.device_type.as_deref().unwrap_or("desktop"));
    let width = payload.width.unwrap_or(preset.width);
    let height = payload.height.unwrap_or(preset.height);
    let background = brand
        .get("background")
        .map(|_| parse_color_str("brand:background", Some(&brand)));

    let page_names = match payload.pages {
        Some(pages) if !pages.is_empty() => pages,
        _ => vec!["Home".to_string()],
    };
    let mut frames = Vec::with_capacity(page_names.len());
    for (i, page_name) in page_names.iter().enumerate() {
        let frame = engine.host.create_node(PrimitiveKind::Frame)?;
        engine.host.resize(frame, width, height)?;
        engine
            .host
            .set_position(frame, i as f32 * (width + engine.config.frame_gap), 0.0)?;
        if let Some(node) = engine.host.node_mut(frame) {
            node.name = page_name.clone();
            if let Some(color) = background {
                node.fills = vec![Paint::Solid(color)];
            }
        }
        engine.host.append_child(page, frame)?;
        frames.push(frame);
    }

    engine.session.set_active_wireframe(page, page, &name);
    for &frame in &frames {
        engine.session.add_node_to_wireframe(Some(page), Some(frame));
    }
    log::info!("created wireframe `{name}` with {} pages", frames.len());

    Ok(json!({
        "wireframeId": page,
        "pageId": page,
        "name": name,
        "pageIds": frames,
        "brandColors": brand,
    }))
}
