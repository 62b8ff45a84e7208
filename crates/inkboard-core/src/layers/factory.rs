//! Default-configured layer construction.

use super::{
    CircleLayer, Layer, LayerBase, LayerColor, LayerType, RectangleLayer, TextLayer,
};
use crate::error::{BoardError, BoardResult};
use kurbo::{Point, Size};

/// Default shape size.
const SHAPE_SIZE: f64 = 100.0;
const SHAPE_STROKE_WIDTH: f64 = 2.0;
const TEXT_WIDTH: f64 = 200.0;
const TEXT_HEIGHT: f64 = 50.0;
const TEXT_PLACEHOLDER: &str = "Type something...";

/// Where a new layer should be placed.
#[derive(Debug, Clone, Copy)]
pub enum FactoryContext {
    /// Toolbar creation: near the centre of a viewport of this size.
    Viewport(Size),
    /// Click-to-place: origin at this canvas point.
    At(Point),
}

impl FactoryContext {
    fn origin(self) -> Point {
        match self {
            FactoryContext::Viewport(size) => Point::new(
                size.width / 2.0 - SHAPE_SIZE / 2.0,
                size.height / 2.0 - SHAPE_SIZE / 2.0,
            ),
            FactoryContext::At(point) => point,
        }
    }
}

/// Construct a default layer of `kind`.
///
/// Paths only come from committed freehand capture and icons have no
/// representation, so both are rejected.
pub fn create_layer_factory(kind: LayerType, context: FactoryContext) -> BoardResult<Layer> {
    let origin = context.origin();
    let shape_base = || {
        let mut base = LayerBase::new(origin.x, origin.y, SHAPE_SIZE, SHAPE_SIZE);
        base.fill = LayerColor::transparent();
        base.stroke = Some(LayerColor::black());
        base.stroke_width = SHAPE_STROKE_WIDTH;
        base
    };

    match kind {
        LayerType::Rectangle => Ok(Layer::Rectangle(RectangleLayer::new(shape_base()))),
        LayerType::Circle => Ok(Layer::Circle(CircleLayer::new(shape_base()))),
        LayerType::Text => {
            let mut base = LayerBase::new(origin.x, origin.y, TEXT_WIDTH, TEXT_HEIGHT);
            base.fill = LayerColor::black();
            base.stroke = None;
            base.stroke_width = 0.0;
            Ok(Layer::Text(TextLayer::new(base, TEXT_PLACEHOLDER)))
        }
        LayerType::Path | LayerType::Icon => Err(BoardError::UnsupportedLayerType(kind)),
    }
}
