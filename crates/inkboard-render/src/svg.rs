//! SVG export backend.

use crate::display::{DisplayItem, Primitive, Scene};
use crate::renderer::{RenderResult, Renderer, RendererError};
use inkboard_core::layers::TextAlign;
use kurbo::{Affine, Size};
use peniko::Color;
use std::fmt::Write;

/// Renders scenes to an SVG document string.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    size: Size,
    output: String,
}

impl SvgRenderer {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            output: String::new(),
        }
    }

    /// The document produced by the last [`render`](Renderer::render).
    pub fn svg(&self) -> &str {
        &self.output
    }

    pub fn into_svg(self) -> String {
        self.output
    }

    fn write_item(&self, out: &mut String, view: Affine, item: &DisplayItem) -> std::fmt::Result {
        let transform = matrix(view * item.transform);
        let paint = paint_attrs(item);
        match &item.primitive {
            Primitive::Text {
                text,
                font_size,
                font_family,
                align,
                bounds,
            } => {
                let (anchor, x) = match align {
                    TextAlign::Left => ("start", bounds.x0),
                    TextAlign::Center => ("middle", bounds.center().x),
                    TextAlign::Right => ("end", bounds.x1),
                };
                writeln!(
                    out,
                    r#"<text transform="{transform}" x="{x}" y="{y}" font-size="{font_size}" font-family="{family}" text-anchor="{anchor}"{paint}>{text}</text>"#,
                    y = bounds.y0 + font_size,
                    family = escape(font_family),
                    text = escape(text),
                )
            }
            primitive => {
                let Some(path) = primitive.to_path() else {
                    return Ok(());
                };
                writeln!(
                    out,
                    r#"<path transform="{transform}" d="{d}"{paint}/>"#,
                    d = path.to_svg(),
                )
            }
        }
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, scene: &Scene) -> RenderResult<()> {
        let mut out = String::new();
        let write = |out: &mut String| -> std::fmt::Result {
            writeln!(
                out,
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                w = self.size.width,
                h = self.size.height,
            )?;
            writeln!(
                out,
                r#"<rect width="100%" height="100%" fill="{}"/>"#,
                hex(self.background_color(scene))
            )?;
            for item in &scene.items {
                self.write_item(out, scene.view_transform, item)?;
            }
            writeln!(out, "</svg>")
        };
        write(&mut out).map_err(|err| RendererError::RenderFailed(err.to_string()))?;
        log::debug!("Rendered {} items to SVG", scene.items.len());
        self.output = out;
        Ok(())
    }
}

fn matrix(affine: Affine) -> String {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    format!("matrix({a} {b} {c} {d} {e} {f})")
}

fn paint_attrs(item: &DisplayItem) -> String {
    let mut attrs = String::new();
    match item.fill {
        Some(color) => {
            let _ = write!(attrs, r#" fill="{}""#, hex(color));
        }
        None => attrs.push_str(r#" fill="none""#),
    }
    if let Some((stroke, color)) = &item.stroke {
        let _ = write!(
            attrs,
            r#" stroke="{}" stroke-width="{}""#,
            hex(*color),
            stroke.width
        );
        if !stroke.dash_pattern.is_empty() {
            let dashes: Vec<String> = stroke.dash_pattern.iter().map(f64::to_string).collect();
            let _ = write!(attrs, r#" stroke-dasharray="{}""#, dashes.join(" "));
        }
    }
    if item.opacity < 1.0 {
        let _ = write!(attrs, r#" opacity="{}""#, item.opacity);
    }
    attrs
}

fn hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_core::{LayerType, Mode, PointerInput, Whiteboard};

    fn render(board: &Whiteboard) -> String {
        let mut renderer = SvgRenderer::new(Size::new(800.0, 600.0));
        renderer.render(&Scene::from_board(board)).unwrap();
        renderer.into_svg()
    }

    #[test]
    fn test_empty_document() {
        let svg = render(&Whiteboard::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r##"fill="#fafafa""##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_layers_and_overlay() {
        let mut board = Whiteboard::default();
        board.create_layer(LayerType::Rectangle).unwrap();
        let svg = render(&board);
        assert!(svg.contains("matrix(1 0 0 1 350 250)"));
        assert!(svg.contains(r##"stroke="#000000" stroke-width="2""##));
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut board = Whiteboard::default();
        let id = board.create_layer(LayerType::Text).unwrap();
        board.update_layer(&id, &inkboard_core::LayerUpdate::new().with_text("a < b & c"));
        let svg = render(&board);
        assert!(svg.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_preview_opacity() {
        let mut board = Whiteboard::default();
        board.set_mode(Mode::Pencil);
        board.pointer_down(&PointerInput::at(5.0, 5.0));
        board.pointer_move(&PointerInput::at(30.0, 12.0));
        let svg = render(&board);
        assert!(svg.contains(r#"opacity="0.6""#));
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(Color::from_rgba8(59, 130, 246, 255)), "#3b82f6");
        assert_eq!(hex(Color::from_rgba8(0, 0, 0, 128)), "#00000080");
    }
}
