//! SVG export for [`MemoryHost`] subtrees.

use crate::memory::MemoryHost;
use crate::model::*;
use petgraph::graph::NodeIndex;
use std::fmt::Write;

fn paint_to_svg(p: &Paint) -> String {
    let c = p.color();
    if (c.a - 1.0).abs() < f32::EPSILON {
        c.to_hex()
    } else {
        format!(
            "rgba({}, {}, {}, {})",
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            c.a
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render `idx` and its subtree, translated so the node's top-left is the
/// SVG origin. `scale` multiplies the document size.
pub fn render_svg(host: &MemoryHost, idx: NodeIndex, scale: f32) -> String {
    let bounds = host.absolute_bounds(idx);
    let scale = if scale > 0.0 { scale } else { 1.0 };
    let width = bounds.width * scale;
    let height = bounds.height * scale;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {} {}\">",
        bounds.width, bounds.height
    );
    let _ = writeln!(
        svg,
        "<g transform=\"translate({}, {})\">",
        -bounds.x, -bounds.y
    );
    render_node(&mut svg, host, idx);
    svg.push_str("</g>\n</svg>");
    svg
}

fn render_node(out: &mut String, host: &MemoryHost, idx: NodeIndex) {
    let node = &host.graph[idx];
    if !node.visible {
        return;
    }
    let b = host.absolute_bounds(idx);
    let fill = node
        .fills
        .first()
        .map(paint_to_svg)
        .unwrap_or_else(|| "none".to_string());
    let stroke = node
        .strokes
        .first()
        .map(paint_to_svg)
        .unwrap_or_else(|| "none".to_string());
    let stroke_width = if node.strokes.is_empty() {
        0.0
    } else {
        node.stroke_weight
    };

    let wrapped = node.opacity < 1.0;
    if wrapped {
        let _ = writeln!(out, "<g opacity=\"{}\">", node.opacity);
    }

    match &node.kind {
        NodeKind::Frame
        | NodeKind::Component
        | NodeKind::Instance { .. }
        | NodeKind::Rectangle
        | NodeKind::Polygon { .. }
        | NodeKind::Star { .. }
        | NodeKind::Vector => {
            let r = node.corner_radius.uniform();
            let _ = writeln!(
                out,
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" />",
                b.x, b.y, b.width, b.height
            );
        }
        NodeKind::Ellipse => {
            let (cx, cy) = b.center();
            let _ = writeln!(
                out,
                "  <ellipse cx=\"{cx}\" cy=\"{cy}\" rx=\"{}\" ry=\"{}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" />",
                b.width / 2.0,
                b.height / 2.0
            );
        }
        NodeKind::Line => {
            let _ = writeln!(
                out,
                "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\" />",
                b.x,
                b.y,
                b.x + b.width,
                b.y + b.height
            );
        }
        NodeKind::Text => {
            if let Some(text) = &node.text {
                let (anchor, x) = match text.align {
                    TextAlign::Center => ("middle", b.x + b.width / 2.0),
                    TextAlign::Right => ("end", b.x + b.width),
                    TextAlign::Left | TextAlign::Justified => ("start", b.x),
                };
                let _ = writeln!(
                    out,
                    "  <text x=\"{x}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" text-anchor=\"{anchor}\" fill=\"{fill}\">{}</text>",
                    b.y + text.font_size,
                    escape(&text.font.family),
                    text.font_size,
                    escape(&text.characters)
                );
            }
        }
        NodeKind::Document | NodeKind::Page | NodeKind::Group => {}
    }

    for child in host.child_indices(idx) {
        render_node(out, host, child);
    }

    if wrapped {
        out.push_str("</g>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;

    #[test]
    fn frame_with_children_renders_in_local_space() {
        let mut host = MemoryHost::new();
        let frame = host.create_node(PrimitiveKind::Frame).unwrap();
        host.set_position(frame, 100.0, 50.0).unwrap();
        let ellipse = host.create_node(PrimitiveKind::Ellipse).unwrap();
        host.resize(ellipse, 20.0, 20.0).unwrap();
        host.set_position(ellipse, 10.0, 10.0).unwrap();
        host.append_child(frame, ellipse).unwrap();

        let idx = host.index_of(frame).unwrap();
        let svg = render_svg(&host, idx, 2.0);
        assert!(svg.contains("width=\"200\" height=\"200\""));
        assert!(svg.contains("translate(-100, -50)"));
        assert!(svg.contains("<ellipse cx=\"120\" cy=\"70\""));
        assert!(svg.contains("fill=\"#FFFFFF\""));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
