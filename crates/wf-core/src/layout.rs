//! Auto-layout reflow for [`MemoryHost`].
//!
//! Horizontal and vertical containers place their visible children in a
//! line along the primary axis, separated by `item_spacing` and inset by
//! `padding`. Hug sizing shrinks the container to its content; fill and
//! stretch children take the remaining space.

use crate::memory::MemoryHost;
use crate::model::*;
use petgraph::graph::NodeIndex;

/// Reflow one container's children. No-op for nodes without auto layout.
pub fn reflow(host: &mut MemoryHost, idx: NodeIndex) {
    let Some(layout) = host.graph[idx].layout else {
        return;
    };
    let horizontal = match layout.mode {
        LayoutMode::Horizontal => true,
        LayoutMode::Vertical => false,
        LayoutMode::None => return,
    };

    let children: Vec<NodeIndex> = host
        .child_indices(idx)
        .into_iter()
        .filter(|&c| host.graph[c].visible)
        .collect();

    let pad = layout.padding;
    let (pad_main_start, pad_main_end, pad_cross_start, pad_cross_end) = if horizontal {
        (pad.left, pad.right, pad.top, pad.bottom)
    } else {
        (pad.top, pad.bottom, pad.left, pad.right)
    };

    // (main, cross) sizes in child order
    let mut sizes: Vec<(f32, f32)> = children
        .iter()
        .map(|&c| {
            let n = &host.graph[c];
            if horizontal {
                (n.width, n.height)
            } else {
                (n.height, n.width)
            }
        })
        .collect();

    let gaps = layout.item_spacing * children.len().saturating_sub(1) as f32;
    let content_main: f32 = sizes.iter().map(|s| s.0).sum::<f32>() + gaps;
    let content_cross = sizes.iter().map(|s| s.1).fold(0.0f32, f32::max);

    // Hug sizing resizes the container before children are placed.
    {
        let container = &mut host.graph[idx];
        let hug_main = layout.primary_sizing == SizingMode::Hug;
        let hug_cross = layout.counter_sizing == SizingMode::Hug;
        let main = content_main + pad_main_start + pad_main_end;
        let cross = content_cross + pad_cross_start + pad_cross_end;
        if horizontal {
            if hug_main {
                container.width = main;
            }
            if hug_cross {
                container.height = cross;
            }
        } else {
            if hug_main {
                container.height = main;
            }
            if hug_cross {
                container.width = cross;
            }
        }
    }

    let container = &host.graph[idx];
    let (outer_main, outer_cross) = if horizontal {
        (container.width, container.height)
    } else {
        (container.height, container.width)
    };
    let inner_main = (outer_main - pad_main_start - pad_main_end).max(0.0);
    let inner_cross = (outer_cross - pad_cross_start - pad_cross_end).max(0.0);

    // Growing children share whatever the fixed ones leave.
    let total_grow: f32 = children.iter().map(|&c| host.graph[c].layout_grow.max(0.0)).sum();
    if total_grow > 0.0 {
        let fixed: f32 = children
            .iter()
            .zip(&sizes)
            .filter(|&(&c, _)| host.graph[c].layout_grow <= 0.0)
            .map(|(_, s)| s.0)
            .sum();
        let free = (inner_main - fixed - gaps).max(0.0);
        for (&c, size) in children.iter().zip(sizes.iter_mut()) {
            let grow = host.graph[c].layout_grow;
            if grow > 0.0 {
                size.0 = free * grow / total_grow;
            }
        }
    }
    for (&c, size) in children.iter().zip(sizes.iter_mut()) {
        if host.graph[c].layout_align == LayoutAlign::Stretch {
            size.1 = inner_cross;
        }
    }

    let used: f32 = sizes.iter().map(|s| s.0).sum();
    let n = children.len();
    let (mut cursor, spacing) = match layout.primary_align {
        AxisAlign::Min => (pad_main_start, layout.item_spacing),
        AxisAlign::Center => (
            pad_main_start + (inner_main - used - gaps) / 2.0,
            layout.item_spacing,
        ),
        AxisAlign::Max => (pad_main_start + inner_main - used - gaps, layout.item_spacing),
        AxisAlign::SpaceBetween if n > 1 => {
            (pad_main_start, ((inner_main - used) / (n - 1) as f32).max(0.0))
        }
        AxisAlign::SpaceBetween => (pad_main_start, 0.0),
    };

    for (&c, &(main, cross)) in children.iter().zip(&sizes) {
        let offset = match layout.counter_align {
            AxisAlign::Min | AxisAlign::SpaceBetween => 0.0,
            AxisAlign::Center => (inner_cross - cross) / 2.0,
            AxisAlign::Max => inner_cross - cross,
        };
        let cross_pos = pad_cross_start + offset;
        let (x, y, w, h) = if horizontal {
            (cursor, cross_pos, main, cross)
        } else {
            (cross_pos, cursor, cross, main)
        };
        host.place(c, x, y);
        let child = &mut host.graph[c];
        if !matches!(child.kind, NodeKind::Group) {
            child.width = w;
            child.height = h;
        }
        cursor += main + spacing;
    }

    log::trace!(
        "reflowed {} children of {}",
        children.len(),
        host.graph[idx].id
    );
}

/// Reflow `idx` and then every ancestor, since a size change can ripple up
/// through nested layout containers.
pub fn reflow_upwards(host: &mut MemoryHost, idx: NodeIndex) {
    let mut current = Some(idx);
    while let Some(idx) = current {
        reflow(host, idx);
        current = host.parent_index(idx);
    }
}
