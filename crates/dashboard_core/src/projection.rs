use crate::{Filter, Message, MessageKind, RedoCommand};

/// Items selected by the active filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Messages(Vec<Message>),
    Redo(Vec<RedoCommand>),
}

impl Projection {
    pub fn len(&self) -> usize {
        match self {
            Projection::Messages(items) => items.len(),
            Projection::Redo(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derives the visible list from the current snapshot and filter.
///
/// Never reorders: message filters keep the server's order, and `Redo`
/// returns the separately fetched redo list unchanged.
pub fn project(snapshot: &[Message], redo: &[RedoCommand], filter: Filter) -> Projection {
    match filter {
        Filter::Redo => Projection::Redo(redo.to_vec()),
        other => Projection::Messages(project_messages(snapshot, other.message_kind())),
    }
}

/// Order-preserving subsequence of `snapshot` with the given type, or the
/// whole snapshot when `kind` is `None`.
pub fn project_messages(snapshot: &[Message], kind: Option<MessageKind>) -> Vec<Message> {
    match kind {
        None => snapshot.to_vec(),
        Some(kind) => snapshot
            .iter()
            .filter(|message| message.kind == kind)
            .cloned()
            .collect(),
    }
}
