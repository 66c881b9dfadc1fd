//! Charts module - static PNG chart rendering

mod renderer;

pub use renderer::ChartRenderer;
