use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    NodeId,
    core::{focus::FocusManager, layout::LayoutKind, world::Core},
    error::{Error, Result},
};

/// Render a node subtree as an indented, coloured listing of names, rects,
/// layouts and state flags. This is a debug function.
pub fn dump(core: &Core, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, core, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Like [`dump`], without colour codes.
pub fn dump_plain(core: &Core, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, core, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Write an indented, coloured label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> Result<()> {
    write!(buffer, "{indent}  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(buffer, "{label}")?;
    buffer.reset()?;
    writeln!(buffer, " {value}")?;
    Ok(())
}

/// Walk a node subtree and emit formatted debug output.
fn dump_node(buffer: &mut Buffer, core: &Core, id: NodeId, level: usize) -> Result<()> {
    let node = core.node(id).ok_or(Error::NodeNotFound(id))?;
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{}", node.name())?;
    buffer.reset()?;
    write!(buffer, " {id:?}")?;

    let mut indicators = Vec::new();
    if core.is_focused(id) {
        indicators.push(("FOCUSED", Color::Magenta));
    } else if node.focused() {
        indicators.push(("focus-path", Color::Magenta));
    }
    if core.hovered() == Some(id) {
        indicators.push(("hovered", Color::Blue));
    }
    if core.drag_state().is_some_and(|d| d.target == id) {
        indicators.push(("dragging", Color::Red));
    }
    if node.is_modal() {
        indicators.push(("modal", Color::Red));
    } else if node.window().is_some() {
        indicators.push(("window", Color::White));
    }
    if !node.visible() {
        indicators.push(("hidden", Color::Yellow));
    }
    if !node.enabled() {
        indicators.push(("disabled", Color::Yellow));
    }
    for (i, (label, color)) in indicators.iter().enumerate() {
        write!(buffer, "{}", if i == 0 { " " } else { ", " })?;
        buffer.set_color(ColorSpec::new().set_fg(Some(*color)))?;
        write!(buffer, "{label}")?;
        buffer.reset()?;
    }
    writeln!(buffer)?;

    let r = node.rect();
    write_field(
        buffer,
        &indent,
        "rect:",
        &format!("x: {}, y: {}, w: {}, h: {}", r.pos.x, r.pos.y, r.size.width, r.size.height),
    )?;
    if let Some(layout) = node.layout() {
        let kind = match layout.kind() {
            LayoutKind::Box(a) => format!("{a:?}"),
            LayoutKind::Grid { columns } => format!("Grid({columns})"),
        };
        write_field(
            buffer,
            &indent,
            "layout:",
            &format!(
                "{kind} {:?} spacing {}",
                layout.size_policy(),
                layout.spacing()
            ),
        )?;
    }
    if let Some(tip) = node.tooltip() {
        write_field(buffer, &indent, "tooltip:", tip)?;
    }

    if node.visible() {
        for child in node.children() {
            dump_node(buffer, core, *child, level + 1)?;
        }
    }
    Ok(())
}
