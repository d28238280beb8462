//! A plain box with no content of its own.

use super::AreaBehavior;

#[derive(Debug, Clone, Default)]
pub struct Container;

impl AreaBehavior for Container {}
