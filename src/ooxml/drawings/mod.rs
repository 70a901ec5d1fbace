//! DrawingML (DML) helpers shared by PresentationML shapes.
//!
//! Shapes of every kind describe their placement with a DrawingML transform
//! (`a:xfrm`) and pictures reference their image through `a:blip`.

pub mod blip;
pub mod xfrm;
