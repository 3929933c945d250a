//! Line-oriented terminal front end: text commands in, rendered view out.
pub(crate) mod command;
pub(crate) mod render;

pub(crate) use command::{parse_line, Input};
pub(crate) use render::{render, render_feedback, HELP};
