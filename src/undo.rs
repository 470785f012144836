use crate::message::Message;

/// How a message interacts with the undo history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    /// Leaves the document alone.
    None,
    /// Moves through the history itself.
    Navigate,
    /// Marks the start of a gesture whose steps arrive as `Live` edits.
    Checkpoint,
    /// Changes the document without creating an undo point.
    Live,
    /// Changes the document and creates an undo point.
    Record,
    /// Swaps in a whole new document and forgets the old history.
    Load,
}

pub fn history_action(message: &Message) -> HistoryAction {
    // Selection lives in the document so it persists, but moving it around
    // should not fill the undo stack.
    match message {
        Message::Tick(_) => HistoryAction::None,
        Message::Copy => HistoryAction::None,
        Message::Undo => HistoryAction::Navigate,
        Message::Redo => HistoryAction::Navigate,
        Message::SelectSheet(_) => HistoryAction::Live,
        Message::SelectPalette(_) => HistoryAction::Live,
        Message::SelectColor(_) => HistoryAction::Live,
        Message::SelectRegion(_) => HistoryAction::Live,
        Message::BeginStroke => HistoryAction::Checkpoint,
        Message::PaintPixel { .. } => HistoryAction::Live,
        Message::SetPixel { .. } => HistoryAction::Record,
        Message::BrushColor { .. } => HistoryAction::Record,
        Message::AddSheet => HistoryAction::Record,
        Message::DeleteSheet => HistoryAction::Record,
        Message::Cut => HistoryAction::Record,
        Message::Paste { .. } => HistoryAction::Record,
        Message::Clear => HistoryAction::Record,
        Message::ImportTiles(_) => HistoryAction::Record,
        Message::ImportPalettes(_) => HistoryAction::Record,
        Message::LoadDocument(_) => HistoryAction::Load,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn painting_is_live_inside_a_checkpointed_stroke() {
        assert_eq!(history_action(&Message::BeginStroke), HistoryAction::Checkpoint);
        let paint = Message::PaintPixel {
            tile_idx: 0,
            x: 1,
            y: 1,
        };
        assert_eq!(history_action(&paint), HistoryAction::Live);
    }

    #[test]
    fn clipboard_copy_does_not_touch_history() {
        assert_eq!(history_action(&Message::Copy), HistoryAction::None);
        assert_eq!(history_action(&Message::Cut), HistoryAction::Record);
    }
}
