//! Grouping of consecutive list item lines.

use ctfboard_markdown_models::{InlineRun, List, ListItem, ListKind};

/// List grouping state. At most one kind of list is open at a time.
#[derive(Debug, Default)]
pub enum ListState {
    #[default]
    None,
    InUnordered(Vec<ListItem>),
    InOrdered(Vec<ListItem>),
}

impl ListState {
    /// Adds an item of `kind`.
    ///
    /// If a list of the other kind is open it is closed and returned, and a
    /// new list is opened for this item.
    pub fn item(&mut self, kind: ListKind, content: InlineRun) -> Option<List> {
        let closed = if self.kind() == Some(kind) {
            None
        } else {
            self.close()
        };

        if matches!(self, Self::None) {
            *self = match kind {
                ListKind::Unordered => Self::InUnordered(Vec::new()),
                ListKind::Ordered => Self::InOrdered(Vec::new()),
            };
        }

        if let Self::InUnordered(items) | Self::InOrdered(items) = self {
            items.push(ListItem {
                index: items.len() + 1,
                content,
            });
        }

        closed
    }

    /// Closes the open list, if any.
    pub fn close(&mut self) -> Option<List> {
        match std::mem::take(self) {
            Self::None => None,
            Self::InUnordered(items) => Some(List {
                kind: ListKind::Unordered,
                items,
            }),
            Self::InOrdered(items) => Some(List {
                kind: ListKind::Ordered,
                items,
            }),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> Option<ListKind> {
        match self {
            Self::None => None,
            Self::InUnordered(_) => Some(ListKind::Unordered),
            Self::InOrdered(_) => Some(ListKind::Ordered),
        }
    }
}
