//! mathrender - cached KaTeX rendering
//!
//! Turns prose with `$...$` / `$$...$$` formulas and bare LaTeX
//! environments into HTML, memoizing every formula it renders.

pub mod cache;
pub mod classify;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod render;
pub mod split;
pub mod ui;

pub use error::{MathError, MathResult};
pub use render::{MathRenderer, Markup, RenderMode};
